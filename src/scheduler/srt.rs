use super::{DispatchError, EnqueueFlags, ProcessId, SchedParams, Scheduler, SimCtx};
use crate::core::{DsqId, Process, Rank};

/// Smallest remaining service time first, then earlier arrival, then input order.
pub fn srt_rank(process: &Process) -> Rank {
    debug_assert!(
        !process.is_finished(),
        "Finished process {} must not be ranked",
        process.id
    );
    Rank::lowest(
        process.remaining_service_time,
        process.arrival_time,
        process.id,
    )
}

/// Shortest-remaining-time: every running process is handed back after one
/// unit and the whole ready set is re-ranked.
pub struct SrtScheduler {
    ready: DsqId,
}

impl Scheduler for SrtScheduler {
    fn init(ctx: &mut SimCtx, _params: SchedParams) -> Self {
        Self {
            ready: ctx.create_dsq_priq(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, process: ProcessId, _flags: EnqueueFlags) {
        let rank = srt_rank(ctx.process(process));
        ctx.dsq_push_priq(self.ready, process, 1, rank);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Result<(), DispatchError> {
        if ctx.dsq_move_to_local(self.ready) {
            Ok(())
        } else {
            Err(DispatchError::NoRunnableTask)
        }
    }
}
