use std::marker::PhantomData;

use super::{
    DispatchError, ENQ_PREEMPT, EnqueueFlags, ProcessId, SchedParams, Scheduler, SimCtx,
};
use crate::core::{DsqId, Ticks};

/// Slice length granted at a given feedback level.
pub trait LevelQuantum {
    fn slice(level: usize, base: Ticks) -> Ticks;
}

/// FB-1: one time unit at every level.
#[derive(Debug)]
pub struct Unit;

/// FB-2i: `base * 2^level` time units.
#[derive(Debug)]
pub struct Doubling;

impl LevelQuantum for Unit {
    fn slice(_level: usize, _base: Ticks) -> Ticks {
        1
    }
}

impl LevelQuantum for Doubling {
    fn slice(level: usize, base: Ticks) -> Ticks {
        let factor = u32::try_from(level)
            .ok()
            .and_then(|shift| (1 as Ticks).checked_shl(shift))
            .unwrap_or(Ticks::MAX);
        base.saturating_mul(factor)
    }
}

pub type Fb1Scheduler = FeedbackScheduler<Unit>;
pub type Fb2iScheduler = FeedbackScheduler<Doubling>;

/// Multilevel feedback queues.
///
/// One FIFO DSQ per level, as many levels as there are processes. Arrivals
/// enter level 0; a process whose slice ran out moves one level down (staying
/// on the last one), unless it is the only active process, in which case it
/// keeps its level.
pub struct FeedbackScheduler<Q: LevelQuantum> {
    levels: Vec<DsqId>,
    level_of: Vec<usize>,
    base: Ticks,
    _quantum: PhantomData<Q>,
}

impl<Q: LevelQuantum> FeedbackScheduler<Q> {
    pub fn level(&self, process: ProcessId) -> usize {
        self.level_of[process]
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    fn next_level(&self, ctx: &SimCtx, process: ProcessId) -> usize {
        let level = self.level_of[process];
        if ctx.active_count() == 1 {
            level
        } else {
            (level + 1).min(self.levels.len() - 1)
        }
    }
}

impl<Q: LevelQuantum> Scheduler for FeedbackScheduler<Q> {
    fn init(ctx: &mut SimCtx, params: SchedParams) -> Self {
        debug_assert!(params.quantum > 0, "feedback base quantum must be positive");
        let count = ctx.processes.len();
        let levels = (0..count.max(1)).map(|_| ctx.create_dsq_fifo()).collect();
        Self {
            levels,
            level_of: vec![0; count],
            base: params.quantum,
            _quantum: PhantomData,
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, process: ProcessId, flags: EnqueueFlags) {
        let level = if flags & ENQ_PREEMPT != 0 {
            self.next_level(ctx, process)
        } else {
            0
        };
        self.level_of[process] = level;
        ctx.dsq_push_fifo(self.levels[level], process, Q::slice(level, self.base));
    }

    // Lowest non-empty level first
    fn dispatch(&mut self, ctx: &mut SimCtx) -> Result<(), DispatchError> {
        for &dsq in &self.levels {
            if ctx.dsq_move_to_local(dsq) {
                return Ok(());
            }
        }
        Err(DispatchError::NoRunnableTask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Sim, test_support::workload};

    #[test]
    fn doubling_slices() {
        assert_eq!(Doubling::slice(0, 1), 1);
        assert_eq!(Doubling::slice(3, 1), 8);
        assert_eq!(Doubling::slice(2, 3), 12);
        assert_eq!(Doubling::slice(200, 1), Ticks::MAX);
        assert_eq!(Unit::slice(7, 4), 1);
    }

    #[test]
    fn fb1_textbook_example() {
        let w = workload(&[("A", 0, 3), ("B", 2, 6), ("C", 4, 4), ("D", 6, 5), ("E", 8, 2)]);
        let run = Sim::<Fb1Scheduler>::new(&w, SchedParams::default(), 20).run();

        assert_eq!(
            run.trace.labels(&run.processes, "-").concat(),
            "AABACBDCEDEBCDBCDBDB"
        );
    }

    #[test]
    fn fb2i_textbook_example() {
        let w = workload(&[("A", 0, 3), ("B", 2, 6), ("C", 4, 4), ("D", 6, 5), ("E", 8, 2)]);
        let run = Sim::<Fb2iScheduler>::new(&w, SchedParams::default(), 20).run();

        assert_eq!(
            run.trace.labels(&run.processes, "-").concat(),
            "AABACBBDECCDDEBBBCDD"
        );
    }

    #[test]
    fn sole_process_keeps_level_zero() {
        let w = workload(&[("A", 0, 4), ("B", 6, 2)]);
        let mut sim = Sim::<Fb1Scheduler>::new(&w, SchedParams::default(), 8);
        for _ in 0..4 {
            sim.step();
            assert_eq!(sim.core.scheduler.level(0), 0);
        }
    }

    #[test]
    fn demoted_process_stays_on_last_level() {
        let w = workload(&[("A", 0, 6), ("B", 0, 6)]);
        let mut sim = Sim::<Fb1Scheduler>::new(&w, SchedParams::default(), 12);
        assert_eq!(sim.core.scheduler.num_levels(), 2);
        while !sim.is_done() {
            sim.step();
            assert!(sim.core.scheduler.level(0) <= 1);
            assert!(sim.core.scheduler.level(1) <= 1);
        }
        assert_eq!(sim.core.scheduler.level(0), 1);
    }
}
