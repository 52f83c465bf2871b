//! Text rendering of outcomes: a Gantt-style timeline for trace mode and a
//! per-process table for stats mode.

use std::fmt::Write;

use crate::sim::{Mode, Outcome};

const NAME_WIDTH: usize = 6;

pub fn outcome(outcome: &Outcome, mode: Mode) -> String {
    match mode {
        Mode::Trace => trace(outcome),
        Mode::Stats => stats(outcome),
    }
}

/// `*` where the process ran, `.` while it was waiting, blank otherwise.
pub fn trace(outcome: &Outcome) -> String {
    let horizon = outcome.trace.len();
    let mut out = String::new();
    let rule = "-".repeat(NAME_WIDTH + 2 * horizon + 2);

    let _ = write!(out, "{:<width$}", outcome.policy.to_string(), width = NAME_WIDTH);
    for t in 0..=horizon {
        let _ = write!(out, "{} ", t % 10);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{rule}");

    for (pid, process) in outcome.processes.iter().enumerate() {
        let arrival = process.arrival_time as usize;
        let end = process.finish_time.map_or(horizon, |finish| finish as usize);

        let _ = write!(out, "{:<width$}|", process.name, width = NAME_WIDTH);
        for t in 0..horizon {
            let cell = if outcome.trace.get(t) == Some(pid) {
                '*'
            } else if t >= arrival && t < end {
                '.'
            } else {
                ' '
            };
            let _ = write!(out, "{cell}|");
        }
        let _ = writeln!(out, " ");
    }
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out);
    out
}

/// Arrival, service, finish, turnaround and normalized turnaround per
/// process, with means in the last column.
pub fn stats(outcome: &Outcome) -> String {
    let mut out = String::new();
    let dash = || "-".to_owned();
    let int = |value: Option<u64>| value.map_or_else(dash, |v| v.to_string());
    let float = |value: Option<f64>| value.map_or_else(dash, |v| format!("{v:.2}"));

    let _ = writeln!(out, "{}", outcome.policy);

    let row = |out: &mut String, label: &str, cells: Vec<String>, tail: Option<String>| {
        let _ = write!(out, "{label:<11}");
        for cell in cells {
            let _ = write!(out, "|{cell:^5}");
        }
        let _ = write!(out, "|");
        if let Some(tail) = tail {
            let _ = write!(out, "{tail:>5}|");
        }
        let _ = writeln!(out);
    };

    let ps = &outcome.processes;
    row(&mut out, "Process", ps.iter().map(|p| p.name.clone()).collect(), None);
    row(&mut out, "Arrival", ps.iter().map(|p| p.arrival_time.to_string()).collect(), None);
    row(
        &mut out,
        "Service",
        ps.iter().map(|p| p.service_time.to_string()).collect(),
        Some(" Mean".to_owned()),
    );
    row(
        &mut out,
        "Finish",
        ps.iter().map(|p| int(p.finish_time)).collect(),
        Some("-----".to_owned()),
    );
    row(
        &mut out,
        "Turnaround",
        ps.iter().map(|p| int(p.turnaround_time)).collect(),
        Some(float(outcome.aggregate.mean_turnaround_time)),
    );
    row(
        &mut out,
        "NormTurn",
        ps.iter().map(|p| float(p.norm_turnaround_time)).collect(),
        Some(float(outcome.aggregate.mean_norm_turnaround_time)),
    );
    let _ = writeln!(out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Policy, ProcessSpec, Workload, simulate};

    fn fcfs_outcome(horizon: u64) -> Outcome {
        let w = Workload::new([ProcessSpec::new("A", 0, 3), ProcessSpec::new("B", 1, 4)]).unwrap();
        simulate(&w, &Policy::Fcfs, horizon).unwrap()
    }

    #[test]
    fn trace_rows_mark_runs_and_waits() {
        let text = trace(&fcfs_outcome(8));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "FCFS  0 1 2 3 4 5 6 7 8 ");
        assert_eq!(lines[2], "A     |*|*|*| | | | | | ");
        assert_eq!(lines[3], "B     | |.|.|*|*|*|*| | ");
    }

    #[test]
    fn unfinished_process_waits_until_horizon() {
        let text = trace(&fcfs_outcome(5));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[3], "B     | |.|.|*|*| ");
    }

    #[test]
    fn stats_table_has_means() {
        let text = stats(&fcfs_outcome(8));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "FCFS");
        assert_eq!(lines[1], "Process    |  A  |  B  |");
        assert_eq!(lines[3], "Service    |  3  |  4  | Mean|");
        assert_eq!(lines[4], "Finish     |  3  |  7  |-----|");
        assert_eq!(lines[5], "Turnaround |  3  |  6  | 4.50|");
        assert_eq!(lines[6], "NormTurn   |1.00 |1.50 | 1.25|");
    }

    #[test]
    fn stats_table_dashes_unfinished() {
        let text = stats(&fcfs_outcome(5));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[4], "Finish     |  3  |  -  |-----|");
        assert_eq!(lines[5], "Turnaround |  3  |  -  | 3.00|");
    }
}
