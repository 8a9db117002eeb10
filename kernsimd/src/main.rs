//! Command-line entry point

use kernsimd::{MetricsMode, RuntimeConfig, SimRuntime, DEFAULT_METRICS_PATH};
use std::env;
use std::path::PathBuf;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    let config = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        print_usage(&args[0]);
        process::exit(1);
    });

    let mut runtime = SimRuntime::new(config).unwrap_or_else(|e| {
        eprintln!("Failed to start simulator: {e}");
        process::exit(1);
    });

    if let Err(e) = runtime.run() {
        eprintln!("Simulation error: {e}");
        process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Result<RuntimeConfig, String> {
    let mut config = RuntimeConfig::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-f" | "--workload" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for -f".to_string());
                }
                config.workload_path = Some(PathBuf::from(&args[i]));
            }
            "-c" | "--config" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for -c".to_string());
                }
                config.config_path = Some(PathBuf::from(&args[i]));
            }
            "-m" | "--metrics" => {
                // Optional value: the next token is a path unless it
                // looks like another option.
                let path = match args.get(i + 1) {
                    Some(next) if !next.starts_with('-') => {
                        i += 1;
                        PathBuf::from(next)
                    }
                    _ => PathBuf::from(DEFAULT_METRICS_PATH),
                };
                config.metrics = MetricsMode::File(path);
            }
            "-h" | "--help" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other => {
                return Err(format!("Unknown option: {other}"));
            }
        }
        i += 1;
    }

    Ok(config)
}

fn print_usage(program: &str) {
    eprintln!("Usage: {program} [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -f, --workload <FILE>  Workload file (one process per line)");
    eprintln!("  -c, --config <FILE>    Configuration file (key=value)");
    eprintln!("  -m, --metrics [<PATH>] Emit the JSON-line trace, optionally to PATH");
    eprintln!("                         (default: {DEFAULT_METRICS_PATH})");
    eprintln!("  -h, --help             Show this help message");
    eprintln!();
    eprintln!("Without -f the driver runs its built-in demo workloads.");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {program} -f demos/workload.txt -c demos/config.txt -m");
    eprintln!("  {program} -f demos/workload.txt -m trace.jsonl");
}
