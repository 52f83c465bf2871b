use super::{DispatchError, EnqueueFlags, ProcessId, SchedParams, Scheduler, SimCtx};
use crate::core::SLICE_INF;

/// First-come-first-served: arrival order, no preemption.
pub struct FcfsScheduler;

impl Scheduler for FcfsScheduler {
    fn init(_ctx: &mut SimCtx, _params: SchedParams) -> Self {
        Self
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, process: ProcessId, _flags: EnqueueFlags) {
        let dsq = ctx.global_dsq();
        ctx.dsq_push_fifo(dsq, process, SLICE_INF);
    }

    // Everything lives on the global DSQ
    fn dispatch(&mut self, _ctx: &mut SimCtx) -> Result<(), DispatchError> {
        Err(DispatchError::NoRunnableTask)
    }
}
