use serde::Serialize;

use crate::core::state::{Process, ProcessId};

/// One entry per simulated time unit: the process that ran, or `None` when
/// the CPU was idle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Trace {
    slots: Vec<Option<ProcessId>>,
}

impl Trace {
    pub fn new(slots: Vec<Option<ProcessId>>) -> Self {
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Option<ProcessId>] {
        &self.slots
    }

    pub fn get(&self, t: usize) -> Option<ProcessId> {
        self.slots.get(t).copied().flatten()
    }

    pub fn occurrences(&self, pid: ProcessId) -> usize {
        self.slots.iter().filter(|slot| **slot == Some(pid)).count()
    }

    pub fn last_occurrence(&self, pid: ProcessId) -> Option<usize> {
        self.slots.iter().rposition(|slot| *slot == Some(pid))
    }

    /// Slot labels using process names and `idle` for idle slots.
    pub fn labels(&self, processes: &[Process], idle: &str) -> Vec<String> {
        self.labels_by(|pid| processes[pid].name.as_str(), idle)
    }

    pub fn labels_by<'a>(&self, name: impl Fn(ProcessId) -> &'a str, idle: &str) -> Vec<String> {
        self.slots
            .iter()
            .map(|slot| match slot {
                Some(pid) => name(*pid).to_owned(),
                None => idle.to_owned(),
            })
            .collect()
    }
}
