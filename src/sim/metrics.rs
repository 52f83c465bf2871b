use average::{Estimate, Mean};
use serde::Serialize;

use super::trace::Trace;
use crate::{
    core::state::{Process, Ticks},
    error::DataError,
};

/// Per-process statistics derived from a finished trace.
///
/// Fields after `service_time` are `None` for processes that did not
/// complete before the horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessMetrics {
    pub name: String,
    pub arrival_time: Ticks,
    pub service_time: Ticks,
    pub finish_time: Option<Ticks>,
    pub turnaround_time: Option<Ticks>,
    pub waiting_time: Option<Ticks>,
    pub norm_turnaround_time: Option<f64>,
}

impl ProcessMetrics {
    pub fn completed(&self) -> bool {
        self.finish_time.is_some()
    }
}

/// Means over the processes that completed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateMetrics {
    pub completed: usize,
    pub mean_turnaround_time: Option<f64>,
    pub mean_waiting_time: Option<f64>,
    pub mean_norm_turnaround_time: Option<f64>,
}

pub fn process_metrics(process: &Process, trace: &Trace) -> Result<ProcessMetrics, DataError> {
    if process.service_time == 0 {
        return Err(DataError::NonPositiveService {
            name: process.name.clone(),
            service_time: 0,
        });
    }

    let finish_time = if process.is_finished() {
        trace
            .last_occurrence(process.id)
            .map(|last| last as Ticks + 1)
    } else {
        None
    };
    debug_assert!(
        finish_time.is_none() || finish_time == process.finish_time,
        "Trace and engine disagree on finish time of {}",
        process.name
    );

    let turnaround_time = finish_time.map(|finish| finish - process.arrival_time);
    let waiting_time = turnaround_time.map(|turnaround| turnaround - process.service_time);
    let norm_turnaround_time =
        turnaround_time.map(|turnaround| turnaround as f64 / process.service_time as f64);

    Ok(ProcessMetrics {
        name: process.name.clone(),
        arrival_time: process.arrival_time,
        service_time: process.service_time,
        finish_time,
        turnaround_time,
        waiting_time,
        norm_turnaround_time,
    })
}

pub fn compute(processes: &[Process], trace: &Trace) -> Result<Vec<ProcessMetrics>, DataError> {
    processes
        .iter()
        .map(|process| process_metrics(process, trace))
        .collect()
}

pub fn aggregate(metrics: &[ProcessMetrics]) -> AggregateMetrics {
    AggregateMetrics {
        completed: metrics.iter().filter(|m| m.completed()).count(),
        mean_turnaround_time: mean(
            metrics
                .iter()
                .filter_map(|m| m.turnaround_time.map(|t| t as f64)),
        ),
        mean_waiting_time: mean(
            metrics
                .iter()
                .filter_map(|m| m.waiting_time.map(|t| t as f64)),
        ),
        mean_norm_turnaround_time: mean(metrics.iter().filter_map(|m| m.norm_turnaround_time)),
    }
}

fn mean(iter: impl Iterator<Item = f64>) -> Option<f64> {
    let mean: Mean = iter.collect();
    if mean.is_empty() {
        None
    } else {
        Some(mean.estimate())
    }
}
