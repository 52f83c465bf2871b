use super::{DispatchError, EnqueueFlags, ProcessId, SchedParams, Scheduler, SimCtx};
use crate::core::Ticks;

/// Round-robin over the global FIFO DSQ with a fixed quantum.
///
/// Arrivals of an instant are enqueued before the process whose quantum ran
/// out at that instant, so newcomers go ahead of it.
pub struct RoundRobinScheduler {
    quantum: Ticks,
}

impl Scheduler for RoundRobinScheduler {
    fn init(_ctx: &mut SimCtx, params: SchedParams) -> Self {
        debug_assert!(params.quantum > 0, "RR quantum must be positive");
        Self {
            quantum: params.quantum,
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, process: ProcessId, _flags: EnqueueFlags) {
        let dsq = ctx.global_dsq();
        ctx.dsq_push_fifo(dsq, process, self.quantum);
    }

    fn dispatch(&mut self, _ctx: &mut SimCtx) -> Result<(), DispatchError> {
        Err(DispatchError::NoRunnableTask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Sim, test_support::workload};

    fn run(specs: &[(&str, i64, i64)], quantum: Ticks, horizon: Ticks) -> String {
        let w = workload(specs);
        let run = Sim::<RoundRobinScheduler>::new(&w, SchedParams { quantum }, horizon).run();
        run.trace.labels(&run.processes, "-").concat()
    }

    #[test]
    fn alternates_every_quantum() {
        assert_eq!(run(&[("A", 0, 4), ("B", 0, 4)], 2, 8), "AABBAABB");
    }

    #[test]
    fn newcomer_goes_before_preempted_process() {
        // B arrives exactly when A's first quantum ends
        assert_eq!(run(&[("A", 0, 3), ("B", 1, 2)], 1, 5), "ABABA");
        assert_eq!(run(&[("A", 0, 4), ("B", 2, 2)], 2, 6), "AABBAA");
    }

    #[test]
    fn short_last_slice_does_not_waste_time() {
        assert_eq!(run(&[("A", 0, 3), ("B", 0, 2)], 2, 5), "AABBA");
    }

    #[test]
    fn quantum_one_matches_textbook_example() {
        let specs = [("A", 0, 3), ("B", 2, 6), ("C", 4, 4), ("D", 6, 5), ("E", 8, 2)];
        assert_eq!(run(&specs, 1, 20), "AABABCBDCBEDCBEDCBDD");
    }
}
