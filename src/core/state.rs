use keyed_priority_queue::KeyedPriorityQueue;
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use std::{cmp::Ordering, collections::VecDeque};

// Index into the canonical process list
pub type ProcessId = usize;
pub type Ticks = u64;
new_key_type! {
    pub struct DsqId;
}

/// Slice handed to processes that keep the CPU until they complete.
pub const SLICE_INF: Ticks = Ticks::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefer {
    Lowest,
    Highest,
}

/// Ranking of a process inside a priority DSQ.
///
/// `KeyedPriorityQueue` is a max-heap, so `Ord` places the process that should
/// run next on top: the better `key` (per `prefer`), then the earlier arrival,
/// then the earlier input position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rank {
    pub key: u64,
    pub arrival: Ticks,
    pub pid: ProcessId,
    pub prefer: Prefer,
}

impl Rank {
    pub fn lowest(key: u64, arrival: Ticks, pid: ProcessId) -> Self {
        Self {
            key,
            arrival,
            pid,
            prefer: Prefer::Lowest,
        }
    }

    pub fn highest(key: u64, arrival: Ticks, pid: ProcessId) -> Self {
        Self {
            key,
            arrival,
            pid,
            prefer: Prefer::Highest,
        }
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        debug_assert_eq!(
            self.prefer, other.prefer,
            "Ranks with different preferences are not comparable"
        );
        let key = match self.prefer {
            Prefer::Lowest => other.key.cmp(&self.key),
            Prefer::Highest => self.key.cmp(&other.key),
        };
        key.then_with(|| other.arrival.cmp(&self.arrival))
            .then_with(|| other.pid.cmp(&self.pid))
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    // Not arrived yet
    Pending,
    Runnable,
    Running,
    Completed,
}

/// Mutable working copy of one process for a single policy run.
#[derive(Debug, Clone)]
pub struct Process {
    pub id: ProcessId,
    pub name: String,
    pub arrival_time: Ticks,
    pub service_time: Ticks,
    pub remaining_service_time: Ticks,
    pub initial_priority: u64,
    pub current_priority: u64,
    pub state: ProcessState,
    pub allocated_slice: Option<Ticks>,
    pub consumed_slice: Ticks,
    pub finish_time: Option<Ticks>,
}

impl Process {
    pub fn fresh(id: ProcessId, name: &str, arrival_time: Ticks, service_time: Ticks) -> Self {
        Self {
            id,
            name: name.to_owned(),
            arrival_time,
            service_time,
            remaining_service_time: service_time,
            initial_priority: service_time,
            current_priority: service_time,
            state: ProcessState::Pending,
            allocated_slice: None,
            consumed_slice: 0,
            finish_time: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_service_time == 0
    }

    pub fn slice_expired(&self) -> bool {
        self.allocated_slice
            .is_some_and(|slice| self.consumed_slice >= slice)
    }
}

#[derive(Debug)]
pub enum Dsq {
    Fifo {
        tasks: VecDeque<ProcessId>,
    },
    Priq {
        tasks: KeyedPriorityQueue<ProcessId, Rank>,
    },
}

impl Dsq {
    pub fn new_fifo() -> Self {
        Self::Fifo {
            tasks: VecDeque::new(),
        }
    }

    pub fn new_priq() -> Self {
        Self::Priq {
            tasks: KeyedPriorityQueue::new(),
        }
    }

    pub fn contains(&self, pid: ProcessId) -> bool {
        match self {
            Self::Fifo { tasks } => tasks.contains(&pid),
            Self::Priq { tasks } => tasks.get_priority(&pid).is_some(),
        }
    }

    // FIFO order for Fifo, best rank first for Priq
    pub fn tasks(&self) -> Vec<ProcessId> {
        match self {
            Self::Fifo { tasks } => tasks.iter().copied().collect(),
            Self::Priq { tasks } => {
                let mut ranked: Vec<(ProcessId, Rank)> =
                    tasks.iter().map(|(pid, rank)| (*pid, *rank)).collect();
                ranked.sort_by(|a, b| b.1.cmp(&a.1));
                ranked.into_iter().map(|(pid, _)| pid).collect()
            }
        }
    }

    fn remove(&mut self, pid: ProcessId) -> bool {
        match self {
            Self::Fifo { tasks } => match tasks.iter().position(|&t| t == pid) {
                Some(pos) => tasks.remove(pos).is_some(),
                None => false,
            },
            Self::Priq { tasks } => tasks.remove(&pid).is_some(),
        }
    }
}

/// Everything a policy may look at or mutate during one simulation run.
#[derive(Debug)]
pub struct SimCtx {
    pub now: Ticks,
    pub current: Option<ProcessId>,
    pub processes: Vec<Process>,
    pub dsqs: SlotMap<DsqId, Dsq>,
    pub task_to_dsq: FxHashMap<ProcessId, DsqId>,
    pub global_dsq_id: DsqId,
    pub local_dsq_id: DsqId,
    pub trace: Vec<Option<ProcessId>>,
}

impl SimCtx {
    pub fn new(processes: Vec<Process>) -> Self {
        debug_assert!(
            processes.iter().enumerate().all(|(i, p)| p.id == i),
            "ProcessId must match Vec index"
        );

        let mut dsqs = SlotMap::with_key();
        let global_dsq_id = dsqs.insert(Dsq::new_fifo());
        let local_dsq_id = dsqs.insert(Dsq::new_fifo());

        Self {
            now: 0,
            current: None,
            processes,
            dsqs,
            task_to_dsq: FxHashMap::default(),
            global_dsq_id,
            local_dsq_id,
            trace: Vec::new(),
        }
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn create_dsq_fifo(&mut self) -> DsqId {
        self.dsqs.insert(Dsq::new_fifo())
    }

    pub fn create_dsq_priq(&mut self) -> DsqId {
        self.dsqs.insert(Dsq::new_priq())
    }

    fn dsq_push(&mut self, dsq_id: DsqId, pid: ProcessId, slice: Ticks, rank: Option<Rank>) {
        if let Some(queued) = self.queued_in(pid) {
            panic!("Process {pid} already queued in {queued:?}");
        }

        let process = self.process_mut(pid);
        debug_assert!(
            process.state == ProcessState::Runnable,
            "Process {pid} must be Runnable when enqueued, found {:?}",
            process.state
        );

        process.allocated_slice = Some(slice);
        process.consumed_slice = 0;
        let dsq = self.dsqs.get_mut(dsq_id).expect("Unknown DSQ");

        match dsq {
            Dsq::Fifo { tasks } => tasks.push_back(pid),
            Dsq::Priq { tasks } => {
                tasks.push(pid, rank.expect("Attempted to push to a priority DSQ with no rank"));
            }
        };

        self.task_to_dsq.insert(pid, dsq_id);
    }

    pub fn dsq_push_fifo(&mut self, dsq_id: DsqId, pid: ProcessId, slice: Ticks) {
        self.dsq_push(dsq_id, pid, slice, None);
    }

    pub fn dsq_push_priq(&mut self, dsq_id: DsqId, pid: ProcessId, slice: Ticks, rank: Rank) {
        self.dsq_push(dsq_id, pid, slice, Some(rank));
    }

    pub fn dsq_pop(&mut self, dsq_id: DsqId) -> Option<ProcessId> {
        let dsq = self.dsqs.get_mut(dsq_id)?;
        let pid = match dsq {
            Dsq::Fifo { tasks } => tasks.pop_front(),
            Dsq::Priq { tasks } => tasks.pop().map(|t| t.0),
        }?;

        let removed = self.task_to_dsq.remove(&pid);
        debug_assert!(removed.is_some(), "Process {pid} missing DSQ membership");

        Some(pid)
    }

    pub fn dsq_remove(&mut self, dsq_id: DsqId, pid: ProcessId) -> bool {
        let Some(dsq) = self.dsqs.get_mut(dsq_id) else {
            return false;
        };
        if !dsq.remove(pid) {
            return false;
        }
        let removed = self.task_to_dsq.remove(&pid);
        debug_assert_eq!(removed, Some(dsq_id), "Process {pid} DSQ membership mismatch");
        true
    }

    pub fn dsq_set_rank(&mut self, dsq_id: DsqId, pid: ProcessId, rank: Rank) {
        if let Some(Dsq::Priq { tasks }) = self.dsqs.get_mut(dsq_id) {
            let updated = tasks.set_priority(&pid, rank);
            debug_assert!(updated.is_ok(), "Process {pid} not queued in {dsq_id:?}");
        } else {
            debug_assert!(false, "DSQ {dsq_id:?} is not a priority DSQ");
        }
    }

    pub fn dsq_tasks(&self, dsq_id: DsqId) -> Vec<ProcessId> {
        self.dsqs.get(dsq_id).map_or_else(Vec::new, Dsq::tasks)
    }

    // Move the head of `dsq_id` onto the CPU-local DSQ, keeping its slice
    pub fn dsq_move_to_local(&mut self, dsq_id: DsqId) -> bool {
        match self.dsq_pop(dsq_id) {
            Some(pid) => {
                self.push_local(pid);
                true
            }
            None => false,
        }
    }

    pub fn dsq_move_task_to_local(&mut self, dsq_id: DsqId, pid: ProcessId) -> bool {
        if !self.dsq_remove(dsq_id, pid) {
            return false;
        }
        self.push_local(pid);
        true
    }

    fn push_local(&mut self, pid: ProcessId) {
        let slice = self
            .process(pid)
            .allocated_slice
            .expect("Process on DSQ must have slice");
        self.dsq_push_fifo(self.local_dsq(), pid, slice);
    }

    /// Queue currently holding `pid`, if any.
    pub fn queued_in(&self, pid: ProcessId) -> Option<DsqId> {
        self.task_to_dsq.get(&pid).copied()
    }

    pub fn process(&self, pid: ProcessId) -> &Process {
        &self.processes[pid]
    }

    pub fn process_mut(&mut self, pid: ProcessId) -> &mut Process {
        &mut self.processes[pid]
    }

    pub fn global_dsq(&self) -> DsqId {
        self.global_dsq_id
    }

    pub fn local_dsq(&self) -> DsqId {
        self.local_dsq_id
    }

    pub fn cpu_is_idle(&self) -> bool {
        self.current.is_none()
    }

    // Arrived and not yet completed, running process included
    pub fn active_count(&self) -> usize {
        self.processes
            .iter()
            .filter(|p| matches!(p.state, ProcessState::Runnable | ProcessState::Running))
            .count()
    }

    pub fn mark_runnable(&mut self, pid: ProcessId) {
        let process = self.process_mut(pid);
        debug_assert!(
            process.state != ProcessState::Completed,
            "Completed process {pid} cannot be runnable"
        );
        process.state = ProcessState::Runnable;
    }

    pub fn mark_completed(&mut self, pid: ProcessId, finish_time: Ticks) {
        debug_assert!(
            !self.task_to_dsq.contains_key(&pid),
            "Completing process {pid} that is still enqueued"
        );

        let process = &mut self.processes[pid];
        debug_assert!(
            process.state == ProcessState::Running,
            "Process {pid} must have been running before marked complete"
        );
        debug_assert_eq!(process.remaining_service_time, 0);

        process.state = ProcessState::Completed;
        process.finish_time = Some(finish_time);
    }

    // Return previous state
    pub fn set_running(&mut self, pid: ProcessId) -> ProcessState {
        debug_assert!(
            !self.task_to_dsq.contains_key(&pid),
            "Running process {pid} must not be enqueued"
        );
        debug_assert!(self.current.is_none(), "CPU already running a process");

        self.current = Some(pid);
        let process = self.process_mut(pid);
        let prev_state = process.state;
        process.state = ProcessState::Running;
        prev_state
    }

    pub fn clear_cpu(&mut self) {
        self.current = None;
    }
}
