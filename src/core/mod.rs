pub mod driver;
pub mod event;
pub mod observer;
pub mod state;

pub use driver::SchedCore;
pub use event::SchedCoreEvent;
pub use state::{
    Dsq, DsqId, Prefer, Process, ProcessId, ProcessState, Rank, SLICE_INF, SimCtx, Ticks,
};
