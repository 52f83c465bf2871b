use std::{panic, thread};

use log::info;

use super::{
    driver::{Outcome, simulate},
    policy::PolicySpec,
    workload::Workload,
};
use crate::{
    core::Ticks,
    error::{ConfigError, SimError},
};

/// What the caller wants to see for each run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Trace,
    Stats,
}

impl Mode {
    /// Stats are means over processes and need at least one of them.
    pub fn check(self, workload: &Workload) -> Result<(), ConfigError> {
        match self {
            Self::Stats if workload.is_empty() => Err(ConfigError::EmptyWorkload),
            _ => Ok(()),
        }
    }
}

/// Several policies compared over one canonical workload.
///
/// Every entry works on its own copies of the processes, so entries are
/// independent: an invalid entry fails alone and entries may run in any
/// order or concurrently.
pub struct Batch<'w> {
    workload: &'w Workload,
    entries: Vec<PolicySpec>,
    horizon: Ticks,
    mode: Mode,
}

impl<'w> Batch<'w> {
    pub fn new(
        workload: &'w Workload,
        entries: Vec<PolicySpec>,
        horizon: Ticks,
        mode: Mode,
    ) -> Self {
        Self {
            workload,
            entries,
            horizon,
            mode,
        }
    }

    pub fn entries(&self) -> &[PolicySpec] {
        &self.entries
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn run_entry(&self, spec: &PolicySpec) -> Result<Outcome, SimError> {
        self.mode.check(self.workload)?;
        let policy = spec.validate()?;
        simulate(self.workload, &policy, self.horizon)
    }

    pub fn run(&self) -> Vec<Result<Outcome, SimError>> {
        info!(
            "running {} policies over {} processes",
            self.entries.len(),
            self.workload.len()
        );
        self.entries.iter().map(|spec| self.run_entry(spec)).collect()
    }

    /// Same results as `run`, one scoped thread per entry.
    pub fn run_parallel(&self) -> Vec<Result<Outcome, SimError>> {
        info!(
            "running {} policies over {} processes in parallel",
            self.entries.len(),
            self.workload.len()
        );
        thread::scope(|scope| {
            let handles: Vec<_> = self
                .entries
                .iter()
                .map(|spec| scope.spawn(move || self.run_entry(spec)))
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
                .collect()
        })
    }
}
