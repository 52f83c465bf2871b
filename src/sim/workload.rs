use rand::prelude::*;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::{
    core::state::{Process, ProcessId, Ticks},
    error::DataError,
};

/// Raw process facts as they come from the input layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    pub name: String,
    pub arrival_time: i64,
    pub service_time: i64,
}

impl ProcessSpec {
    pub fn new(name: impl Into<String>, arrival_time: i64, service_time: i64) -> Self {
        Self {
            name: name.into(),
            arrival_time,
            service_time,
        }
    }
}

/// Validated, immutable facts for one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessFacts {
    pub name: String,
    pub arrival_time: Ticks,
    pub service_time: Ticks,
}

/// Canonical process set shared by every policy run.
///
/// `ProcessId`s are positions in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workload {
    processes: Vec<ProcessFacts>,
}

impl Workload {
    pub fn new(specs: impl IntoIterator<Item = ProcessSpec>) -> Result<Self, DataError> {
        let mut seen = FxHashSet::default();
        let mut processes = Vec::new();

        for (index, spec) in specs.into_iter().enumerate() {
            if spec.name.is_empty() {
                return Err(DataError::EmptyName { index });
            }
            let arrival_time =
                Ticks::try_from(spec.arrival_time).map_err(|_| DataError::NegativeArrival {
                    name: spec.name.clone(),
                    arrival_time: spec.arrival_time,
                })?;
            let service_time = match Ticks::try_from(spec.service_time) {
                Ok(service) if service > 0 => service,
                _ => {
                    return Err(DataError::NonPositiveService {
                        name: spec.name,
                        service_time: spec.service_time,
                    });
                }
            };
            if !seen.insert(spec.name.clone()) {
                return Err(DataError::DuplicateName { name: spec.name });
            }

            processes.push(ProcessFacts {
                name: spec.name,
                arrival_time,
                service_time,
            });
        }

        Ok(Self { processes })
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn get(&self, pid: ProcessId) -> Option<&ProcessFacts> {
        self.processes.get(pid)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcessFacts> {
        self.processes.iter()
    }

    /// Fresh working copies for one policy run.
    pub fn snapshot(&self) -> Vec<Process> {
        self.processes
            .iter()
            .enumerate()
            .map(|(id, facts)| {
                Process::fresh(id, &facts.name, facts.arrival_time, facts.service_time)
            })
            .collect()
    }

    /// Process ids sorted by arrival time; equal arrivals keep input order.
    pub fn arrival_order(&self) -> Vec<ProcessId> {
        let mut order: Vec<ProcessId> = (0..self.processes.len()).collect();
        order.sort_by_key(|&pid| self.processes[pid].arrival_time);
        order
    }

    /// A horizon long enough for every policy to finish all work.
    pub fn completion_bound(&self) -> Ticks {
        let total: Ticks = self.processes.iter().map(|p| p.service_time).sum();
        let last_arrival = self
            .processes
            .iter()
            .map(|p| p.arrival_time)
            .max()
            .unwrap_or(0);
        total + last_arrival
    }
}

/// Random workload: at every tick below `ticks` a process arrives with
/// probability `p_arrival`; it is short with probability `p_short`.
pub fn bernoulli(
    ticks: Ticks,
    p_arrival: f64,
    p_short: f64,
    short_ticks: Ticks,
    long_ticks: Ticks,
    seed: u64,
) -> Workload {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut processes = Vec::new();

    for t in 0..ticks {
        if rng.random::<f64>() < p_arrival {
            let service_time = if rng.random::<f64>() < p_short {
                short_ticks
            } else {
                long_ticks
            };

            processes.push(ProcessFacts {
                name: format!("P{}", processes.len()),
                arrival_time: t,
                service_time: service_time.max(1),
            });
        }
    }

    Workload { processes }
}
