//! End-to-end runs: text input through parsing, batch simulation and
//! rendering.

use schedsim::{
    Batch, ConfigError, DataError, Mode, Policy, ProcessSpec, SimError, Workload, input, render,
    simulate,
};

fn workload(specs: &[(&str, i64, i64)]) -> Workload {
    Workload::new(
        specs
            .iter()
            .map(|&(name, arrival, service)| ProcessSpec::new(name, arrival, service)),
    )
    .unwrap()
}

fn labels(policy: Policy, specs: &[(&str, i64, i64)], horizon: u64) -> String {
    simulate(&workload(specs), &policy, horizon)
        .unwrap()
        .trace_labels("-")
        .concat()
}

#[test]
fn fcfs_worked_example() {
    let outcome = simulate(&workload(&[("A", 0, 3), ("B", 1, 9)]), &Policy::Fcfs, 12).unwrap();

    assert_eq!(outcome.trace_labels("-").concat(), "AAABBBBBBBBB");
    let a = &outcome.processes[0];
    let b = &outcome.processes[1];
    assert_eq!((a.finish_time, a.turnaround_time), (Some(3), Some(3)));
    assert_eq!((b.finish_time, b.turnaround_time), (Some(12), Some(11)));
}

#[test]
fn srt_worked_example() {
    let outcome = simulate(
        &workload(&[("A", 0, 1), ("B", 1, 9), ("C", 2, 1), ("D", 3, 9)]),
        &Policy::Srt,
        20,
    )
    .unwrap();

    assert!(outcome.trace_labels("-").concat().starts_with("ABCBBBBBBBBD"));
    assert_eq!(outcome.processes[0].finish_time, Some(1));
    assert_eq!(outcome.processes[2].finish_time, Some(3));
}

#[test]
fn rr_worked_example() {
    let outcome = simulate(
        &workload(&[("A", 0, 4), ("B", 0, 4)]),
        &Policy::RoundRobin { quantum: 2 },
        8,
    )
    .unwrap();

    assert_eq!(outcome.trace_labels("-").concat(), "AABBAABB");
    assert_eq!(outcome.processes[0].finish_time, Some(8));
    assert_eq!(outcome.processes[1].finish_time, Some(8));
}

#[test]
fn textbook_workload_under_every_policy() {
    let specs = [("A", 0, 3), ("B", 2, 6), ("C", 4, 4), ("D", 6, 5), ("E", 8, 2)];

    assert_eq!(labels(Policy::Fcfs, &specs, 20), "AAABBBBBBCCCCDDDDDEE");
    assert_eq!(
        labels(Policy::RoundRobin { quantum: 4 }, &specs, 20),
        "AAABBBBCCCCDDDDBBEED"
    );
    assert_eq!(labels(Policy::Spn, &specs, 20), "AAABBBBBBEECCCCDDDDD");
    assert_eq!(labels(Policy::Srt, &specs, 20), "AAABCCCCEEBBBBBDDDDD");
    assert_eq!(labels(Policy::Hrrn, &specs, 20), "AAABBBBBBCCCCEEDDDDD");
    assert_eq!(labels(Policy::Feedback1, &specs, 20), "AABACBDCEDEBCDBCDBDB");
    assert_eq!(
        labels(Policy::Feedback2i { quantum: 1 }, &specs, 20),
        "AABACBBDECCDDEBBBCDD"
    );
}

#[test]
fn stats_means_for_fcfs() {
    let specs = [("A", 0, 3), ("B", 2, 6), ("C", 4, 4), ("D", 6, 5), ("E", 8, 2)];
    let outcome = simulate(&workload(&specs), &Policy::Fcfs, 20).unwrap();

    let turnarounds: Vec<_> = outcome
        .processes
        .iter()
        .map(|p| p.turnaround_time.unwrap())
        .collect();
    assert_eq!(turnarounds, vec![3, 7, 9, 12, 12]);
    assert!((outcome.aggregate.mean_turnaround_time.unwrap() - 8.6).abs() < 1e-9);
    assert!((outcome.aggregate.mean_norm_turnaround_time.unwrap() - 2.5633).abs() < 1e-3);
}

#[test]
fn parsed_batch_renders_trace_and_stats() {
    let text = "trace\n1,2-1\n6\n2\nA,0,2\nB,1,3\n";
    let input = input::parse(text).unwrap();
    let w = Workload::new(input.processes.clone()).unwrap();
    let batch = Batch::new(&w, input.policies.clone(), input.last_instant, input.mode);
    let results = batch.run();

    let rr = results[1].as_ref().unwrap();
    assert_eq!(rr.trace_labels("-").concat(), "ABABB-");
    let timeline = render::outcome(rr, Mode::Trace);
    assert!(timeline.starts_with("RR-1  0 1 2 3 4 5 6 \n"));
    assert!(timeline.contains("B     | |*|.|*|*| | \n"));

    let table = render::outcome(rr, Mode::Stats);
    assert!(table.contains("Finish     |  3  |  5  |-----|\n"));
}

#[test]
fn invalid_facts_never_reach_a_policy() {
    let input = input::parse("stats\n1\n5\n2\nA,0,2\nA,1,3\n").unwrap();
    assert_eq!(
        Workload::new(input.processes).map_err(SimError::from),
        Err(SimError::Data(DataError::DuplicateName { name: "A".into() }))
    );
}

#[test]
fn unknown_policy_fails_only_its_entry() {
    let input = input::parse("stats\n9,1\n5\n1\nA,0,2\n").unwrap();
    let w = Workload::new(input.processes.clone()).unwrap();
    let results = Batch::new(&w, input.policies.clone(), input.last_instant, input.mode).run();

    assert_eq!(
        results[0],
        Err(SimError::Config(ConfigError::UnknownPolicy { id: 9 }))
    );
    assert!(results[1].is_ok());
}
