//! Config-file parsing
//!
//! `key=value` lines with `#` comments. Unknown keys are ignored so a
//! config can carry annotations for other tools; unknown values for
//! known keys are errors, surfaced before the simulator starts.

use core_types::{IoSchedulingAlgorithm, ReplacementAlgorithm, SchedulingAlgorithm, SimConfig};
use std::path::Path;
use thiserror::Error;

/// Configuration failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("config line {line}: {message}")]
    Invalid { line: usize, message: String },
}

fn invalid(line: usize, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        line,
        message: message.into(),
    }
}

fn parse_numeric<T: std::str::FromStr>(
    line: usize,
    key: &str,
    value: &str,
) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| invalid(line, format!("non-numeric value for {key}: '{value}'")))
}

/// Parses a configuration text into a validated [`SimConfig`]
pub fn parse_config_str(text: &str) -> Result<SimConfig, ConfigError> {
    let mut config = SimConfig::default();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(invalid(line_no, format!("expected key=value, got '{line}'")));
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            "total_memory_frames" => {
                let frames: usize = parse_numeric(line_no, key, value)?;
                if frames < 1 {
                    return Err(invalid(line_no, "total_memory_frames must be >= 1"));
                }
                config.total_memory_frames = frames;
            }
            "frame_size" => {
                config.frame_size = parse_numeric(line_no, key, value)?;
            }
            "scheduling_algorithm" => {
                config.scheduling_algorithm = value
                    .parse::<SchedulingAlgorithm>()
                    .map_err(|e| invalid(line_no, e.to_string()))?;
            }
            "page_replacement_algorithm" => {
                config.page_replacement_algorithm = value
                    .parse::<ReplacementAlgorithm>()
                    .map_err(|e| invalid(line_no, e.to_string()))?;
            }
            "io_scheduling_algorithm" => {
                config.io_scheduling_algorithm = value
                    .parse::<IoSchedulingAlgorithm>()
                    .map_err(|e| invalid(line_no, e.to_string()))?;
            }
            "quantum" => {
                let quantum: u64 = parse_numeric(line_no, key, value)?;
                if quantum < 1 {
                    return Err(invalid(line_no, "quantum must be >= 1"));
                }
                config.quantum = quantum;
            }
            "io_quantum" => {
                let quantum: u64 = parse_numeric(line_no, key, value)?;
                if quantum < 1 {
                    return Err(invalid(line_no, "io_quantum must be >= 1"));
                }
                config.io_quantum = quantum;
            }
            "page_fault_latency" => {
                let latency: u64 = parse_numeric(line_no, key, value)?;
                if latency < 1 {
                    return Err(invalid(line_no, "page_fault_latency must be >= 1"));
                }
                config.page_fault_latency = latency;
            }
            // Unknown keys are tolerated.
            _ => {}
        }
    }
    Ok(config)
}

/// Reads and parses a configuration file
pub fn load_config_file(path: impl AsRef<Path>) -> Result<SimConfig, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    parse_config_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let config = parse_config_str(
            "\
# simulator settings
total_memory_frames = 8
frame_size = 4096
scheduling_algorithm = RoundRobin
page_replacement_algorithm = LRU
io_scheduling_algorithm = RoundRobin
quantum = 3
io_quantum = 2
page_fault_latency = 2
",
        )
        .unwrap();
        assert_eq!(config.total_memory_frames, 8);
        assert_eq!(config.scheduling_algorithm, SchedulingAlgorithm::RoundRobin);
        assert_eq!(config.page_replacement_algorithm, ReplacementAlgorithm::Lru);
        assert_eq!(
            config.io_scheduling_algorithm,
            IoSchedulingAlgorithm::RoundRobin
        );
        assert_eq!(config.quantum, 3);
        assert_eq!(config.io_quantum, 2);
        assert_eq!(config.page_fault_latency, 2);
    }

    #[test]
    fn test_defaults_apply_for_missing_keys() {
        let config = parse_config_str("scheduling_algorithm = SJF\n").unwrap();
        assert_eq!(config.scheduling_algorithm, SchedulingAlgorithm::Sjf);
        assert_eq!(config.total_memory_frames, 16);
        assert_eq!(config.page_replacement_algorithm, ReplacementAlgorithm::Fifo);
    }

    #[test]
    fn test_unknown_algorithm_is_rejected() {
        let err = parse_config_str("scheduling_algorithm = Lottery\n").unwrap_err();
        assert!(err.to_string().contains("Lottery"));
    }

    #[test]
    fn test_non_numeric_value_is_rejected() {
        let err = parse_config_str("quantum = lots\n").unwrap_err();
        assert!(err.to_string().contains("non-numeric"));
    }

    #[test]
    fn test_zero_frames_rejected() {
        assert!(parse_config_str("total_memory_frames = 0\n").is_err());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config = parse_config_str("favourite_colour = green\n").unwrap();
        assert_eq!(config, SimConfig::default());
    }
}
