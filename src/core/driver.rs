use super::{
    event::SchedCoreEvent,
    observer::Observer,
    state::{Process, ProcessId, ProcessState, SimCtx, Ticks},
};
use crate::scheduler::{
    DispatchError, ENQ_PREEMPT, ENQ_WAKEUP, EnqueueFlags, SchedParams, Scheduler,
};

/// Single-CPU tick loop shared by every policy.
pub struct SchedCore<S: Scheduler> {
    pub ctx: SimCtx,
    pub scheduler: S,
    observer: Observer,
}

impl<S: Scheduler> SchedCore<S> {
    pub fn new(processes: Vec<Process>, params: SchedParams) -> Self {
        let mut ctx = SimCtx::new(processes);
        let scheduler = S::init(&mut ctx, params);
        let observer = Observer::new();
        Self {
            ctx,
            scheduler,
            observer,
        }
    }

    /// Execute one time unit.
    ///
    /// Arrivals for the current instant must already have been woken, so they
    /// are queued ahead of a process whose slice ends now.
    pub fn tick(&mut self) -> Vec<SchedCoreEvent> {
        let mut events = Vec::new();

        self.preempt_expired(&mut events);

        if self.ctx.cpu_is_idle() {
            self.try_schedule(&mut events);
        }

        let current = match self.ctx.current {
            Some(pid) => pid,
            None => {
                self.ctx.trace.push(None);
                self.ctx.advance_time(1);
                events.push(SchedCoreEvent::CpuIdle);
                self.observer.observe(&self.ctx);
                return events;
            }
        };

        // Consume one unit of service and slice
        {
            let process = self.ctx.process_mut(current);
            debug_assert!(
                !process.is_finished(),
                "Finished process {current} selected to run"
            );
            process.remaining_service_time = process.remaining_service_time.saturating_sub(1);
            process.consumed_slice = process.consumed_slice.saturating_add(1);
        }
        self.ctx.trace.push(Some(current));

        self.scheduler.tick(&mut self.ctx, current);
        self.ctx.advance_time(1);

        if self.ctx.process(current).is_finished() {
            self.ctx.clear_cpu();
            self.ctx.mark_completed(current, self.ctx.now);
            events.push(SchedCoreEvent::CpuCurrentChange {
                from: Some(current),
                to: None,
            });
            events.push(SchedCoreEvent::ProcessStateChange {
                process: current,
                from: ProcessState::Running,
                to: ProcessState::Completed,
            });
        }

        self.observer.observe(&self.ctx);
        events
    }

    fn preempt_expired(&mut self, events: &mut Vec<SchedCoreEvent>) {
        let Some(current) = self.ctx.current else {
            return;
        };
        if !self.ctx.process(current).slice_expired() {
            return;
        }

        self.ctx.clear_cpu();
        self.ctx.mark_runnable(current);
        events.push(SchedCoreEvent::CpuCurrentChange {
            from: Some(current),
            to: None,
        });
        events.push(SchedCoreEvent::ProcessStateChange {
            process: current,
            from: ProcessState::Running,
            to: ProcessState::Runnable,
        });

        let flags: EnqueueFlags = ENQ_PREEMPT;
        self.scheduler.enqueue(&mut self.ctx, current, flags);
    }

    // 1. Pull from the local DSQ
    // 2. Pull from the global DSQ
    // 3. Call dispatch() to fill the local DSQ
    fn try_schedule(&mut self, events: &mut Vec<SchedCoreEvent>) {
        let next = if let Some(pid) = self.ctx.dsq_pop(self.ctx.local_dsq()) {
            Some(pid)
        } else if let Some(pid) = self.ctx.dsq_pop(self.ctx.global_dsq()) {
            Some(pid)
        } else if let Err(DispatchError::NoRunnableTask) = self.scheduler.dispatch(&mut self.ctx)
        {
            // Scheduler left the CPU idle
            None
        } else {
            self.ctx.dsq_pop(self.ctx.local_dsq())
        };

        if let Some(pid) = next {
            let from = self.ctx.set_running(pid);
            events.push(SchedCoreEvent::CpuCurrentChange {
                from: None,
                to: Some(pid),
            });
            events.push(SchedCoreEvent::ProcessStateChange {
                process: pid,
                from,
                to: ProcessState::Running,
            });
        }
    }

    /// Hand a newly arrived process to the scheduler.
    pub fn wake_process(&mut self, pid: ProcessId) -> SchedCoreEvent {
        let from = self.ctx.process(pid).state;
        debug_assert_eq!(from, ProcessState::Pending, "Process {pid} woken twice");
        self.ctx.mark_runnable(pid);
        self.scheduler.enqueue(&mut self.ctx, pid, ENQ_WAKEUP);
        SchedCoreEvent::ProcessStateChange {
            process: pid,
            from,
            to: ProcessState::Runnable,
        }
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}
