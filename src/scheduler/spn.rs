use super::{DispatchError, EnqueueFlags, ProcessId, SchedParams, Scheduler, SimCtx};
use crate::core::{DsqId, Process, Rank, SLICE_INF};

/// Shortest total service time first, then earlier arrival, then input order.
pub fn spn_rank(process: &Process) -> Rank {
    Rank::lowest(process.service_time, process.arrival_time, process.id)
}

/// Shortest-process-next: non-preemptive, picks the smallest `service_time`.
pub struct SpnScheduler {
    ready: DsqId,
}

impl Scheduler for SpnScheduler {
    fn init(ctx: &mut SimCtx, _params: SchedParams) -> Self {
        Self {
            ready: ctx.create_dsq_priq(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, process: ProcessId, _flags: EnqueueFlags) {
        let rank = spn_rank(ctx.process(process));
        ctx.dsq_push_priq(self.ready, process, SLICE_INF, rank);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Result<(), DispatchError> {
        if ctx.dsq_move_to_local(self.ready) {
            Ok(())
        } else {
            Err(DispatchError::NoRunnableTask)
        }
    }
}
