pub mod aging;
pub mod fcfs;
pub mod feedback;
pub mod hrrn;
pub mod rr;
pub mod spn;
pub mod srt;

use crate::core::{
    Ticks,
    state::{ProcessId, SimCtx},
};
pub use aging::AgingScheduler;
pub use fcfs::FcfsScheduler;
pub use feedback::{Fb1Scheduler, Fb2iScheduler, FeedbackScheduler};
pub use hrrn::HrrnScheduler;
pub use rr::RoundRobinScheduler;
pub use spn::SpnScheduler;
pub use srt::SrtScheduler;

pub type EnqueueFlags = u64;

// Process just arrived
pub const ENQ_WAKEUP: EnqueueFlags = 1 << 0;
// Process used up its slice and goes back to the ready set
pub const ENQ_PREEMPT: EnqueueFlags = 1 << 1;

/// Validated policy parameters handed to `Scheduler::init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedParams {
    pub quantum: Ticks,
}

impl Default for SchedParams {
    fn default() -> Self {
        Self { quantum: 1 }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum DispatchError {
    NoRunnableTask,
}

pub trait Scheduler {
    fn init(ctx: &mut SimCtx, params: SchedParams) -> Self;

    /// Place a runnable process in one of the scheduler's DSQs.
    fn enqueue(&mut self, ctx: &mut SimCtx, process: ProcessId, flags: EnqueueFlags);

    /// Fill the local DSQ when both local and global DSQs are empty.
    fn dispatch(&mut self, ctx: &mut SimCtx) -> Result<(), DispatchError>;

    /// Called once per executed time unit, after `running` consumed it.
    fn tick(&mut self, _ctx: &mut SimCtx, _running: ProcessId) {}
}
