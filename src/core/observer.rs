use super::state::{ProcessState, SimCtx};

#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &SimCtx) {
        self.step += 1;

        debug_assert_eq!(
            ctx.trace.len() as u64,
            ctx.now,
            "Trace must hold exactly one slot per elapsed tick"
        );

        if let Some(pid) = ctx.current {
            let process = ctx.process(pid);
            debug_assert_eq!(
                process.state,
                ProcessState::Running,
                "cpu.current process {pid} must be Running"
            );
            debug_assert!(
                !process.is_finished(),
                "Finished process {pid} still holds the CPU"
            );
            debug_assert_eq!(
                ctx.queued_in(pid),
                None,
                "Running process {pid} is still queued"
            );
        }

        for process in &ctx.processes {
            debug_assert!(
                process.remaining_service_time <= process.service_time,
                "Process {} remaining time exceeds its service time",
                process.id
            );
            debug_assert_eq!(
                process.state == ProcessState::Completed,
                process.is_finished(),
                "Process {} completion state disagrees with remaining time",
                process.id
            );
        }

        for (&pid, &dsq_id) in &ctx.task_to_dsq {
            let process = ctx.process(pid);
            debug_assert_eq!(
                process.state,
                ProcessState::Runnable,
                "Process {pid} in DSQ {dsq_id:?} must be Runnable"
            );
            if let Some(dsq) = ctx.dsqs.get(dsq_id) {
                debug_assert!(
                    dsq.contains(pid),
                    "task_to_dsq claims process {pid} in DSQ {dsq_id:?}, but the queue lacks it"
                );
            } else {
                debug_assert!(false, "task_to_dsq references unknown DSQ {dsq_id:?}");
            }
        }
    }
}
