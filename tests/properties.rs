//! Property tests shared by every policy.

use proptest::prelude::*;
use schedsim::{
    Policy, ProcessSpec, Sim, Workload,
    core::{Process, Ticks},
    scheduler::{
        Fb1Scheduler, Fb2iScheduler, FeedbackScheduler, SchedParams,
        feedback::{Doubling, LevelQuantum, Unit},
        hrrn::ResponseRatio,
    },
    simulate,
};

const PROPTEST_CASES: u32 = 64;

fn arb_workload() -> impl Strategy<Value = Workload> {
    prop::collection::vec((0i64..12, 1i64..7), 1..7).prop_map(|facts| {
        Workload::new(
            facts
                .into_iter()
                .enumerate()
                .map(|(i, (arrival, service))| ProcessSpec::new(format!("P{i}"), arrival, service)),
        )
        .unwrap()
    })
}

fn all_policies(quantum: Ticks) -> Vec<Policy> {
    vec![
        Policy::Fcfs,
        Policy::RoundRobin { quantum },
        Policy::Spn,
        Policy::Srt,
        Policy::Hrrn,
        Policy::Feedback1,
        Policy::Feedback2i { quantum },
        Policy::Aging { quantum },
    ]
}

// Remaining service of every process right before slot `t` executes
fn remaining_before(workload: &Workload, slots: &[Option<usize>], t: usize) -> Vec<Ticks> {
    workload
        .iter()
        .enumerate()
        .map(|(pid, facts)| {
            let ran = slots[..t].iter().filter(|s| **s == Some(pid)).count() as Ticks;
            facts.service_time - ran
        })
        .collect()
}

fn feedback_levels_never_drop<Q: LevelQuantum>(workload: &Workload, quantum: Ticks) {
    let horizon = workload.completion_bound();
    let mut sim = Sim::<FeedbackScheduler<Q>>::new(workload, SchedParams { quantum }, horizon);
    let mut last = vec![0usize; workload.len()];
    let mut demoted = vec![false; workload.len()];
    while !sim.is_done() {
        sim.step();
        for pid in 0..workload.len() {
            let level = sim.core.scheduler.level(pid);
            assert!(level >= last[pid], "level of {pid} dropped from {} to {level}", last[pid]);
            if demoted[pid] {
                assert_ne!(level, 0);
            }
            demoted[pid] |= level > 0;
            last[pid] = level;
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

    #[test]
    fn every_policy_completes_all_work(workload in arb_workload(), quantum in 1u64..5) {
        let horizon = workload.completion_bound();
        for policy in all_policies(quantum) {
            let outcome = simulate(&workload, &policy, horizon).unwrap();
            prop_assert_eq!(outcome.trace.len() as Ticks, horizon);
            for (pid, facts) in workload.iter().enumerate() {
                prop_assert_eq!(outcome.trace.occurrences(pid) as Ticks, facts.service_time);
                let metrics = &outcome.processes[pid];
                prop_assert!(
                    metrics.finish_time.is_some(),
                    "{} left {} unfinished",
                    policy,
                    facts.name
                );
                prop_assert!(metrics.waiting_time.is_some());
            }
            prop_assert_eq!(outcome.aggregate.completed, workload.len());
        }
    }

    #[test]
    fn runs_are_idempotent(workload in arb_workload(), quantum in 1u64..5) {
        let horizon = workload.completion_bound();
        for policy in all_policies(quantum) {
            let first = simulate(&workload, &policy, horizon).unwrap();
            let second = simulate(&workload, &policy, horizon).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn fcfs_follows_stable_arrival_order(workload in arb_workload()) {
        let horizon = workload.completion_bound();
        let outcome = simulate(&workload, &Policy::Fcfs, horizon).unwrap();

        let mut expected = Vec::new();
        for pid in workload.arrival_order() {
            let facts = workload.get(pid).unwrap();
            while (expected.len() as Ticks) < facts.arrival_time {
                expected.push(None);
            }
            expected.extend(std::iter::repeat_n(Some(pid), facts.service_time as usize));
        }
        expected.resize(horizon as usize, None);

        prop_assert_eq!(outcome.trace.slots(), expected.as_slice());
    }

    #[test]
    fn rr_gap_is_bounded(workload in arb_workload(), quantum in 1u64..5) {
        let horizon = workload.completion_bound();
        let outcome = simulate(&workload, &Policy::RoundRobin { quantum }, horizon).unwrap();
        let others = workload.len() as Ticks - 1;

        for pid in 0..workload.len() {
            let runs: Vec<usize> = outcome
                .trace
                .slots()
                .iter()
                .enumerate()
                .filter(|(_, slot)| **slot == Some(pid))
                .map(|(t, _)| t)
                .collect();
            for pair in runs.windows(2) {
                let gap = (pair[1] - pair[0] - 1) as Ticks;
                prop_assert!(gap <= quantum * others, "gap {} for {}", gap, pid);
            }
        }
    }

    #[test]
    fn srt_never_skips_a_shorter_ready_process(workload in arb_workload()) {
        let horizon = workload.completion_bound();
        let outcome = simulate(&workload, &Policy::Srt, horizon).unwrap();
        let slots = outcome.trace.slots();

        for (t, slot) in slots.iter().enumerate() {
            let Some(running) = *slot else { continue };
            let remaining = remaining_before(&workload, slots, t);
            for (pid, facts) in workload.iter().enumerate() {
                let ready = facts.arrival_time <= t as Ticks && remaining[pid] > 0;
                if ready {
                    prop_assert!(
                        remaining[pid] >= remaining[running],
                        "t={} ran {} with {} left while {} had {}",
                        t, running, remaining[running], pid, remaining[pid]
                    );
                }
            }
        }
    }

    #[test]
    fn idle_only_when_nothing_is_ready(workload in arb_workload(), quantum in 1u64..5) {
        let horizon = workload.completion_bound();
        for policy in all_policies(quantum) {
            let outcome = simulate(&workload, &policy, horizon).unwrap();
            let slots = outcome.trace.slots();
            for (t, slot) in slots.iter().enumerate() {
                if slot.is_some() {
                    continue;
                }
                let remaining = remaining_before(&workload, slots, t);
                let any_ready = workload
                    .iter()
                    .enumerate()
                    .any(|(pid, facts)| facts.arrival_time <= t as Ticks && remaining[pid] > 0);
                prop_assert!(!any_ready, "{} idled at t={} with work ready", policy, t);
            }
        }
    }

    #[test]
    fn response_ratio_grows_while_waiting(
        arrival in 0u64..50,
        service in 1u64..20,
        wait in 0u64..50,
    ) {
        let process = Process::fresh(0, "A", arrival, service);
        let now = arrival + wait;
        prop_assert!(ResponseRatio::of(&process, now + 1) >= ResponseRatio::of(&process, now));
    }

    #[test]
    fn feedback_levels_are_monotonic(workload in arb_workload(), quantum in 1u64..4) {
        feedback_levels_never_drop::<Unit>(&workload, 1);
        feedback_levels_never_drop::<Doubling>(&workload, quantum);
    }
}

#[test]
fn feedback_aliases_resolve() {
    let w = Workload::new([ProcessSpec::new("A", 0, 2)]).unwrap();
    let fb1 = Sim::<Fb1Scheduler>::new(&w, SchedParams::default(), 2).run();
    let fb2 = Sim::<Fb2iScheduler>::new(&w, SchedParams::default(), 2).run();
    assert_eq!(fb1.trace, fb2.trace);
}
