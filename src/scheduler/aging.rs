use super::{
    DispatchError, ENQ_PREEMPT, EnqueueFlags, ProcessId, SchedParams, Scheduler, SimCtx,
};
use crate::core::{DsqId, Process, Rank, Ticks};

/// Highest current priority first, then earlier arrival, then input order.
pub fn aging_rank(process: &Process) -> Rank {
    Rank::highest(process.current_priority, process.arrival_time, process.id)
}

/// Priority aging.
///
/// Every process starts with its service time as priority. Each time unit a
/// process spends waiting in the ready set raises its priority by one; the
/// running process is not aged. When a quantum ends the process drops back to
/// its initial priority and re-enters the ready set.
pub struct AgingScheduler {
    ready: DsqId,
    quantum: Ticks,
}

impl Scheduler for AgingScheduler {
    fn init(ctx: &mut SimCtx, params: SchedParams) -> Self {
        debug_assert!(params.quantum > 0, "aging quantum must be positive");
        Self {
            ready: ctx.create_dsq_priq(),
            quantum: params.quantum,
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, process: ProcessId, flags: EnqueueFlags) {
        if flags & ENQ_PREEMPT != 0 {
            let p = ctx.process_mut(process);
            p.current_priority = p.initial_priority;
        }
        let rank = aging_rank(ctx.process(process));
        ctx.dsq_push_priq(self.ready, process, self.quantum, rank);
    }

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Result<(), DispatchError> {
        if ctx.dsq_move_to_local(self.ready) {
            Ok(())
        } else {
            Err(DispatchError::NoRunnableTask)
        }
    }

    fn tick(&mut self, ctx: &mut SimCtx, running: ProcessId) {
        for pid in ctx.dsq_tasks(self.ready) {
            debug_assert_ne!(pid, running);
            let p = ctx.process_mut(pid);
            p.current_priority = p.current_priority.saturating_add(1);
            let rank = aging_rank(p);
            ctx.dsq_set_rank(self.ready, pid, rank);
        }
    }
}
