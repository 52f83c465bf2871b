use std::cmp::Ordering;

use log::trace;

use super::{DispatchError, EnqueueFlags, ProcessId, SchedParams, Scheduler, SimCtx};
use crate::core::{DsqId, Process, SLICE_INF, Ticks};

/// `(waited + service) / service`, compared exactly.
#[derive(Debug, Clone, Copy)]
pub struct ResponseRatio {
    pub waited: Ticks,
    pub service: Ticks,
}

impl ResponseRatio {
    pub fn of(process: &Process, now: Ticks) -> Self {
        Self {
            waited: now.saturating_sub(process.arrival_time),
            service: process.service_time,
        }
    }

    pub fn as_f64(&self) -> f64 {
        (self.waited + self.service) as f64 / self.service as f64
    }
}

impl Ord for ResponseRatio {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = (self.waited as u128 + self.service as u128) * other.service as u128;
        let rhs = (other.waited as u128 + other.service as u128) * self.service as u128;
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for ResponseRatio {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ResponseRatio {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ResponseRatio {}

/// Highest response ratio among `candidates`; on an exact tie the first one
/// scanned keeps the CPU.
pub fn highest_ratio(ctx: &SimCtx, candidates: &[ProcessId]) -> Option<ProcessId> {
    let mut best: Option<(ProcessId, ResponseRatio)> = None;
    for &pid in candidates {
        let ratio = ResponseRatio::of(ctx.process(pid), ctx.now);
        trace!("t={} process {pid} response ratio {:.3}", ctx.now, ratio.as_f64());
        match best {
            Some((_, best_ratio)) if ratio <= best_ratio => {}
            _ => best = Some((pid, ratio)),
        }
    }
    best.map(|(pid, _)| pid)
}

/// Highest-response-ratio-next: non-preemptive, ratios evaluated at dispatch.
pub struct HrrnScheduler {
    ready: DsqId,
}

impl Scheduler for HrrnScheduler {
    fn init(ctx: &mut SimCtx, _params: SchedParams) -> Self {
        Self {
            ready: ctx.create_dsq_fifo(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, process: ProcessId, _flags: EnqueueFlags) {
        ctx.dsq_push_fifo(self.ready, process, SLICE_INF);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Result<(), DispatchError> {
        let waiting = ctx.dsq_tasks(self.ready);
        match highest_ratio(ctx, &waiting) {
            Some(pid) if ctx.dsq_move_task_to_local(self.ready, pid) => Ok(()),
            _ => Err(DispatchError::NoRunnableTask),
        }
    }
}
