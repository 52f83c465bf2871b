//! Error taxonomy.
//!
//! `ConfigError` covers how a run was requested, `DataError` covers the
//! process facts themselves. `SimError` is what `simulate` and batch entries
//! return.

use std::fmt;

use crate::input::ParseError;

/// Invalid run configuration. Aborts the affected batch entry only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Policy identifier outside 1..=8.
    UnknownPolicy { id: i64 },
    /// RR and Aging need an explicit quantum.
    MissingQuantum { policy: &'static str },
    /// Quantum must be at least one time unit.
    NonPositiveQuantum { policy: &'static str, quantum: i64 },
    /// Stats output needs at least one process.
    EmptyWorkload,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPolicy { id } => write!(f, "unknown scheduling policy id {id}"),
            Self::MissingQuantum { policy } => write!(f, "{policy} requires a quantum"),
            Self::NonPositiveQuantum { policy, quantum } => {
                write!(f, "{policy} quantum must be positive, got {quantum}")
            }
            Self::EmptyWorkload => write!(f, "at least one process is required"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Invalid process facts, rejected when the workload is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    EmptyName { index: usize },
    DuplicateName { name: String },
    NegativeArrival { name: String, arrival_time: i64 },
    NonPositiveService { name: String, service_time: i64 },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName { index } => write!(f, "process #{index} has an empty name"),
            Self::DuplicateName { name } => write!(f, "duplicate process name {name:?}"),
            Self::NegativeArrival { name, arrival_time } => {
                write!(f, "process {name:?} has negative arrival time {arrival_time}")
            }
            Self::NonPositiveService { name, service_time } => {
                write!(f, "process {name:?} has non-positive service time {service_time}")
            }
        }
    }
}

impl std::error::Error for DataError {}

#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    Config(ConfigError),
    Data(DataError),
    Parse(ParseError),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "configuration error: {err}"),
            Self::Data(err) => write!(f, "data error: {err}"),
            Self::Parse(err) => write!(f, "input error: {err}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Data(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<DataError> for SimError {
    fn from(err: DataError) -> Self {
        Self::Data(err)
    }
}

impl From<ParseError> for SimError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}
