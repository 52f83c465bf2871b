use log::{debug, trace, warn};
use serde::Serialize;

use super::{
    metrics::{self, AggregateMetrics, ProcessMetrics},
    policy::Policy,
    trace::Trace,
    workload::Workload,
};
use crate::{
    core::{
        driver::SchedCore,
        event::SchedCoreEvent,
        state::{Process, ProcessId, Ticks},
    },
    error::SimError,
    scheduler::{
        AgingScheduler, Fb1Scheduler, Fb2iScheduler, FcfsScheduler, HrrnScheduler,
        RoundRobinScheduler, SchedParams, Scheduler, SpnScheduler, SrtScheduler,
    },
};

/// One policy run over fresh working copies of a workload.
pub struct Sim<S: Scheduler> {
    pub core: SchedCore<S>,
    // Process ids sorted by arrival, then input order
    arrivals: Vec<ProcessId>,
    arrival_cursor: usize,
    horizon: Ticks,
}

/// Final state of a run: the trace and the working copies it produced.
#[derive(Debug, Clone)]
pub struct Run {
    pub trace: Trace,
    pub processes: Vec<Process>,
}

impl<S: Scheduler> Sim<S> {
    pub fn new(workload: &Workload, params: SchedParams, horizon: Ticks) -> Self {
        Self {
            core: SchedCore::<S>::new(workload.snapshot(), params),
            arrivals: workload.arrival_order(),
            arrival_cursor: 0,
            horizon,
        }
    }

    pub fn step(&mut self) -> Vec<SchedCoreEvent> {
        let mut events = self.handle_arrivals();
        events.extend(self.core.tick());
        events
    }

    fn handle_arrivals(&mut self) -> Vec<SchedCoreEvent> {
        let now = self.core.now();
        let mut events = Vec::new();

        // Contiguous, since arrivals are sorted
        while let Some(&pid) = self.arrivals.get(self.arrival_cursor) {
            if self.core.ctx.process(pid).arrival_time > now {
                break;
            }
            events.push(self.core.wake_process(pid));
            self.arrival_cursor += 1;
        }

        events
    }

    pub fn is_done(&self) -> bool {
        self.core.now() >= self.horizon
    }

    pub fn all_processes_completed(&self) -> bool {
        self.core.ctx.processes.iter().all(Process::is_finished)
    }

    /// Step until the horizon and hand back the trace.
    pub fn run(mut self) -> Run {
        while !self.is_done() {
            let now = self.core.now();
            for event in self.step() {
                trace!("t={now} {event:?}");
            }
        }

        let ctx = self.core.ctx;
        Run {
            trace: Trace::new(ctx.trace),
            processes: ctx.processes,
        }
    }
}

/// Everything the output layer needs from one policy run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub policy: Policy,
    pub horizon: Ticks,
    pub trace: Trace,
    pub processes: Vec<ProcessMetrics>,
    pub aggregate: AggregateMetrics,
}

impl Outcome {
    /// Slot labels, `idle` for idle slots.
    pub fn trace_labels(&self, idle: &str) -> Vec<String> {
        self.trace
            .labels_by(|pid| self.processes[pid].name.as_str(), idle)
    }
}

fn run_policy(workload: &Workload, policy: &Policy, horizon: Ticks) -> Result<Run, SimError> {
    let params = policy.params()?;
    let run = match policy {
        Policy::Fcfs => Sim::<FcfsScheduler>::new(workload, params, horizon).run(),
        Policy::RoundRobin { .. } => {
            Sim::<RoundRobinScheduler>::new(workload, params, horizon).run()
        }
        Policy::Spn => Sim::<SpnScheduler>::new(workload, params, horizon).run(),
        Policy::Srt => Sim::<SrtScheduler>::new(workload, params, horizon).run(),
        Policy::Hrrn => Sim::<HrrnScheduler>::new(workload, params, horizon).run(),
        Policy::Feedback1 => Sim::<Fb1Scheduler>::new(workload, params, horizon).run(),
        Policy::Feedback2i { .. } => Sim::<Fb2iScheduler>::new(workload, params, horizon).run(),
        Policy::Aging { .. } => Sim::<AgingScheduler>::new(workload, params, horizon).run(),
    };
    Ok(run)
}

/// Run `policy` over fresh copies of `workload` for `horizon` time units and
/// compute its statistics.
pub fn simulate(workload: &Workload, policy: &Policy, horizon: Ticks) -> Result<Outcome, SimError> {
    debug!(
        "simulating {policy} over {} processes, horizon {horizon}",
        workload.len()
    );

    let run = run_policy(workload, policy, horizon)?;
    let processes = metrics::compute(&run.processes, &run.trace)?;
    let aggregate = metrics::aggregate(&processes);

    for unfinished in processes.iter().filter(|m| !m.completed()) {
        warn!(
            "{policy}: process {} did not complete before t={horizon}",
            unfinished.name
        );
    }

    Ok(Outcome {
        policy: *policy,
        horizon,
        trace: run.trace,
        processes,
        aggregate,
    })
}
