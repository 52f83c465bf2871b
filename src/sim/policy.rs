use std::fmt;

use serde::Serialize;

use crate::{core::Ticks, error::ConfigError, scheduler::SchedParams};

/// Scheduling policies with their identifiers from the input format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PolicyKind {
    Fcfs,
    RoundRobin,
    Spn,
    Srt,
    Hrrn,
    Feedback1,
    Feedback2i,
    Aging,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 8] = [
        Self::Fcfs,
        Self::RoundRobin,
        Self::Spn,
        Self::Srt,
        Self::Hrrn,
        Self::Feedback1,
        Self::Feedback2i,
        Self::Aging,
    ];

    pub fn from_id(id: i64) -> Result<Self, ConfigError> {
        match id {
            1 => Ok(Self::Fcfs),
            2 => Ok(Self::RoundRobin),
            3 => Ok(Self::Spn),
            4 => Ok(Self::Srt),
            5 => Ok(Self::Hrrn),
            6 => Ok(Self::Feedback1),
            7 => Ok(Self::Feedback2i),
            8 => Ok(Self::Aging),
            _ => Err(ConfigError::UnknownPolicy { id }),
        }
    }

    pub fn id(self) -> i64 {
        match self {
            Self::Fcfs => 1,
            Self::RoundRobin => 2,
            Self::Spn => 3,
            Self::Srt => 4,
            Self::Hrrn => 5,
            Self::Feedback1 => 6,
            Self::Feedback2i => 7,
            Self::Aging => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Fcfs => "FCFS",
            Self::RoundRobin => "RR",
            Self::Spn => "SPN",
            Self::Srt => "SRT",
            Self::Hrrn => "HRRN",
            Self::Feedback1 => "FB-1",
            Self::Feedback2i => "FB-2i",
            Self::Aging => "Aging",
        }
    }
}

/// One unvalidated batch entry: a policy id and an optional quantum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicySpec {
    pub id: i64,
    pub quantum: Option<i64>,
}

impl PolicySpec {
    pub fn new(id: i64, quantum: Option<i64>) -> Self {
        Self { id, quantum }
    }

    pub fn validate(&self) -> Result<Policy, ConfigError> {
        let kind = PolicyKind::from_id(self.id)?;
        let quantum = match self.quantum {
            Some(q) if q <= 0 => {
                return Err(ConfigError::NonPositiveQuantum {
                    policy: kind.name(),
                    quantum: q,
                });
            }
            Some(q) => Some(q as Ticks),
            None => None,
        };
        let required = || quantum.ok_or(ConfigError::MissingQuantum { policy: kind.name() });

        Ok(match kind {
            PolicyKind::Fcfs => Policy::Fcfs,
            PolicyKind::RoundRobin => Policy::RoundRobin { quantum: required()? },
            PolicyKind::Spn => Policy::Spn,
            PolicyKind::Srt => Policy::Srt,
            PolicyKind::Hrrn => Policy::Hrrn,
            PolicyKind::Feedback1 => Policy::Feedback1,
            PolicyKind::Feedback2i => Policy::Feedback2i {
                quantum: quantum.unwrap_or(1),
            },
            PolicyKind::Aging => Policy::Aging { quantum: required()? },
        })
    }
}

/// A fully specified policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Policy {
    Fcfs,
    RoundRobin { quantum: Ticks },
    Spn,
    Srt,
    Hrrn,
    Feedback1,
    /// Slice at level `i` is `quantum * 2^i`.
    Feedback2i { quantum: Ticks },
    Aging { quantum: Ticks },
}

impl Policy {
    pub fn kind(&self) -> PolicyKind {
        match self {
            Self::Fcfs => PolicyKind::Fcfs,
            Self::RoundRobin { .. } => PolicyKind::RoundRobin,
            Self::Spn => PolicyKind::Spn,
            Self::Srt => PolicyKind::Srt,
            Self::Hrrn => PolicyKind::Hrrn,
            Self::Feedback1 => PolicyKind::Feedback1,
            Self::Feedback2i { .. } => PolicyKind::Feedback2i,
            Self::Aging { .. } => PolicyKind::Aging,
        }
    }

    /// Scheduler parameters; rejects a zero quantum instead of coercing it.
    pub fn params(&self) -> Result<SchedParams, ConfigError> {
        let quantum = match self {
            Self::RoundRobin { quantum }
            | Self::Feedback2i { quantum }
            | Self::Aging { quantum } => *quantum,
            _ => return Ok(SchedParams::default()),
        };
        if quantum == 0 {
            return Err(ConfigError::NonPositiveQuantum {
                policy: self.kind().name(),
                quantum: 0,
            });
        }
        Ok(SchedParams { quantum })
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundRobin { quantum } => write!(f, "RR-{quantum}"),
            Self::Aging { quantum } => write!(f, "Aging-{quantum}"),
            Self::Feedback2i { quantum } if *quantum != 1 => write!(f, "FB-2i-{quantum}"),
            other => f.write_str(other.kind().name()),
        }
    }
}
