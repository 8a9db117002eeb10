//! Algorithm tags for the three pluggable policy families
//!
//! The string forms are the ones accepted by the configuration file
//! and echoed in summary records.

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// CPU ready-queue policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulingAlgorithm {
    Fcfs,
    Sjf,
    RoundRobin,
    Priority,
}

impl SchedulingAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchedulingAlgorithm::Fcfs => "FCFS",
            SchedulingAlgorithm::Sjf => "SJF",
            SchedulingAlgorithm::RoundRobin => "RoundRobin",
            SchedulingAlgorithm::Priority => "Priority",
        }
    }
}

impl fmt::Display for SchedulingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchedulingAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FCFS" => Ok(SchedulingAlgorithm::Fcfs),
            "SJF" => Ok(SchedulingAlgorithm::Sjf),
            "RoundRobin" => Ok(SchedulingAlgorithm::RoundRobin),
            "Priority" => Ok(SchedulingAlgorithm::Priority),
            other => Err(UnknownAlgorithm {
                family: "scheduling_algorithm",
                name: other.to_string(),
            }),
        }
    }
}

/// Page-replacement policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplacementAlgorithm {
    Fifo,
    Lru,
    Optimal,
    Nru,
}

impl ReplacementAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplacementAlgorithm::Fifo => "FIFO",
            ReplacementAlgorithm::Lru => "LRU",
            ReplacementAlgorithm::Optimal => "Optimal",
            ReplacementAlgorithm::Nru => "NRU",
        }
    }
}

impl fmt::Display for ReplacementAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReplacementAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FIFO" => Ok(ReplacementAlgorithm::Fifo),
            "LRU" => Ok(ReplacementAlgorithm::Lru),
            "Optimal" => Ok(ReplacementAlgorithm::Optimal),
            "NRU" => Ok(ReplacementAlgorithm::Nru),
            other => Err(UnknownAlgorithm {
                family: "page_replacement_algorithm",
                name: other.to_string(),
            }),
        }
    }
}

/// Per-device I/O scheduling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IoSchedulingAlgorithm {
    Fcfs,
    RoundRobin,
}

impl IoSchedulingAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            IoSchedulingAlgorithm::Fcfs => "FCFS",
            IoSchedulingAlgorithm::RoundRobin => "RoundRobin",
        }
    }
}

impl fmt::Display for IoSchedulingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IoSchedulingAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FCFS" => Ok(IoSchedulingAlgorithm::Fcfs),
            "RoundRobin" => Ok(IoSchedulingAlgorithm::RoundRobin),
            other => Err(UnknownAlgorithm {
                family: "io_scheduling_algorithm",
                name: other.to_string(),
            }),
        }
    }
}

/// An algorithm name that no policy family recognises
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAlgorithm {
    /// Configuration key the name was given for
    pub family: &'static str,
    /// The rejected name
    pub name: String,
}

impl fmt::Display for UnknownAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {}", self.family, self.name)
    }
}

impl std::error::Error for UnknownAlgorithm {}
