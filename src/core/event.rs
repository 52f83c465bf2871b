use crate::core::{ProcessId, ProcessState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedCoreEvent {
    ProcessStateChange {
        process: ProcessId,
        from: ProcessState,
        to: ProcessState,
    },
    CpuCurrentChange {
        from: Option<ProcessId>,
        to: Option<ProcessId>,
    },
    // CPU idle even after dispatch()
    CpuIdle,
}
