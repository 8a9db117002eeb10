//! Workload-file parsing
//!
//! Line-oriented UTF-8: blank lines and `#` comments are ignored, and
//! every other line describes one process as
//!
//! ```text
//! <name> <arrival> <burst-spec> [priority] [pages]
//! ```
//!
//! `burst-spec` is a comma-separated sequence of `CPU(<n>)` and
//! `E/S(<n>)` tokens; an I/O token may name its device as a second
//! argument (`E/S(<n>,net0)`) and otherwise targets `disk`.

use core_types::{Burst, Pid, Process, Tick};
use std::path::Path;
use thiserror::Error;

/// File-level workload failures
#[derive(Debug, Error)]
pub enum WorkloadError {
    #[error("cannot read workload file: {0}")]
    Io(#[from] std::io::Error),
}

/// One malformed line, reported and skipped
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineError {
    #[error("missing fields (need <name> <arrival> <burst-spec>)")]
    MissingFields,
    #[error("cannot derive a pid from name '{0}'")]
    BadPid(String),
    #[error("invalid arrival '{0}'")]
    BadArrival(String),
    #[error("invalid burst token '{0}'")]
    BadBurst(String),
    #[error("burst duration must be >= 1 in '{0}'")]
    ZeroBurst(String),
    #[error("empty burst sequence")]
    EmptyBursts,
    #[error("invalid priority '{0}'")]
    BadPriority(String),
    #[error("invalid page count '{0}'")]
    BadPages(String),
    #[error("duplicate pid {0}")]
    DuplicatePid(u32),
}

/// A skipped line with its 1-based line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub message: String,
}

/// Derives the PID from the name token: the numeric suffix after an
/// optional single leading letter, else the whole token as an integer
fn pid_from_name(name: &str) -> Option<u32> {
    if let Ok(pid) = name.parse::<u32>() {
        return Some(pid);
    }
    let mut chars = name.chars();
    let first = chars.next()?;
    let rest = chars.as_str();
    if first.is_ascii_alphabetic() && !rest.is_empty() {
        return rest.parse().ok();
    }
    None
}

/// Splits a burst-spec on commas that sit outside parentheses
fn split_burst_spec(spec: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (idx, ch) in spec.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                tokens.push(&spec[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    tokens.push(&spec[start..]);
    tokens
}

fn parse_burst_token(token: &str) -> Result<Burst, LineError> {
    let token = token.trim();
    let bad = || LineError::BadBurst(token.to_string());

    let (kind, args) = if let Some(rest) = token.strip_prefix("CPU(") {
        ("cpu", rest)
    } else if let Some(rest) = token.strip_prefix("E/S(") {
        ("io", rest)
    } else {
        return Err(bad());
    };
    let args = args.strip_suffix(')').ok_or_else(bad)?;

    let (duration_str, device) = match args.split_once(',') {
        Some((d, dev)) => (d.trim(), Some(dev.trim())),
        None => (args.trim(), None),
    };
    let duration: u64 = duration_str.parse().map_err(|_| bad())?;
    if duration == 0 {
        return Err(LineError::ZeroBurst(token.to_string()));
    }

    match (kind, device) {
        ("cpu", None) => Ok(Burst::cpu(duration)),
        ("cpu", Some(_)) => Err(bad()),
        ("io", None) => Ok(Burst::io(duration)),
        ("io", Some(dev)) if !dev.is_empty() => Ok(Burst::io_on(duration, dev)),
        ("io", Some(_)) => Err(bad()),
        _ => Err(bad()),
    }
}

/// Parses one workload line
///
/// Returns `Ok(None)` for blank lines and comments.
pub fn parse_process_line(line: &str) -> Result<Option<Process>, LineError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let mut fields = trimmed.split_whitespace();
    let name = fields.next().ok_or(LineError::MissingFields)?;
    let arrival_str = fields.next().ok_or(LineError::MissingFields)?;
    let spec = fields.next().ok_or(LineError::MissingFields)?;
    let priority_str = fields.next();
    let pages_str = fields.next();

    let pid = pid_from_name(name).ok_or_else(|| LineError::BadPid(name.to_string()))?;
    let arrival: Tick = arrival_str
        .parse()
        .map_err(|_| LineError::BadArrival(arrival_str.to_string()))?;

    let mut bursts = Vec::new();
    for token in split_burst_spec(spec) {
        if token.trim().is_empty() {
            continue;
        }
        bursts.push(parse_burst_token(token)?);
    }
    if bursts.is_empty() {
        return Err(LineError::EmptyBursts);
    }

    let priority: i32 = match priority_str {
        Some(s) => s
            .parse()
            .map_err(|_| LineError::BadPriority(s.to_string()))?,
        None => 0,
    };
    let pages: usize = match pages_str {
        Some(s) => s.parse().map_err(|_| LineError::BadPages(s.to_string()))?,
        None => 0,
    };

    Ok(Some(Process::new(
        Pid(pid),
        name,
        arrival,
        bursts,
        priority,
        pages,
    )))
}

/// Parses a whole workload text, skipping bad lines with diagnostics
pub fn parse_workload_str(text: &str) -> (Vec<Process>, Vec<Diagnostic>) {
    let mut processes: Vec<Process> = Vec::new();
    let mut diagnostics = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        match parse_process_line(line) {
            Ok(Some(process)) => {
                if processes.iter().any(|p| p.pid == process.pid) {
                    diagnostics.push(Diagnostic {
                        line: line_no,
                        message: LineError::DuplicatePid(process.pid.0).to_string(),
                    });
                } else {
                    processes.push(process);
                }
            }
            Ok(None) => {}
            Err(err) => diagnostics.push(Diagnostic {
                line: line_no,
                message: err.to_string(),
            }),
        }
    }
    (processes, diagnostics)
}

/// Reads and parses a workload file
pub fn load_workload_file(
    path: impl AsRef<Path>,
) -> Result<(Vec<Process>, Vec<Diagnostic>), WorkloadError> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_workload_str(&text))
}
