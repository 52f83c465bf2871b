//! Parser for the line-oriented input format:
//!
//! ```text
//! trace              output mode: `trace` or `stats`
//! 1,2-4,8-1          policies: ID or ID-QUANTUM, comma separated
//! 20                 last instant
//! 2                  number of processes
//! A,0,3              name,arrival,service
//! B,2,6
//! ```
//!
//! Only syntax is checked here; process facts are validated by
//! [`Workload::new`](crate::sim::Workload::new).

use std::fmt;

use crate::{
    core::Ticks,
    sim::{Mode, PolicySpec, ProcessSpec},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub mode: Mode,
    pub policies: Vec<PolicySpec>,
    pub last_instant: Ticks,
    pub processes: Vec<ProcessSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    MissingSection(&'static str),
    UnknownMode(String),
    BadInteger(String),
    BadPolicy(String),
    BadProcess(String),
    ProcessCount { expected: usize, found: usize },
}

/// Syntax error with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: ", self.line)?;
        match &self.kind {
            ParseErrorKind::MissingSection(section) => write!(f, "missing {section}"),
            ParseErrorKind::UnknownMode(mode) => {
                write!(f, "unknown mode {mode:?}, expected \"trace\" or \"stats\"")
            }
            ParseErrorKind::BadInteger(text) => {
                write!(f, "expected a non-negative integer, got {text:?}")
            }
            ParseErrorKind::BadPolicy(text) => write!(f, "malformed policy entry {text:?}"),
            ParseErrorKind::BadProcess(text) => {
                write!(f, "malformed process line {text:?}, expected name,arrival,service")
            }
            ParseErrorKind::ProcessCount { expected, found } => {
                write!(f, "expected {expected} processes, found {found}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    last: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines().enumerate(),
            last: 0,
        }
    }

    // Next non-blank line with its 1-based number
    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        for (index, line) in self.inner.by_ref() {
            self.last = index + 1;
            let line = line.trim();
            if !line.is_empty() {
                return Some((index + 1, line));
            }
        }
        None
    }

    fn require(&mut self, section: &'static str) -> Result<(usize, &'a str), ParseError> {
        self.next_line().ok_or(ParseError {
            line: self.last + 1,
            kind: ParseErrorKind::MissingSection(section),
        })
    }
}

pub fn parse(text: &str) -> Result<Input, ParseError> {
    let mut lines = Lines::new(text);

    let (line, mode) = lines.require("output mode")?;
    let mode = parse_mode(mode).map_err(|kind| ParseError { line, kind })?;

    let (line, policies) = lines.require("policy list")?;
    let policies = parse_policies(policies).map_err(|kind| ParseError { line, kind })?;

    let (line, last_instant) = lines.require("last instant")?;
    let last_instant = parse_count(last_instant).map_err(|kind| ParseError { line, kind })?;

    let (line, count) = lines.require("process count")?;
    let count = parse_count(count).map_err(|kind| ParseError { line, kind })? as usize;

    let mut processes = Vec::new();
    while let Some((line, text)) = lines.next_line() {
        let process = parse_process(text).map_err(|kind| ParseError { line, kind })?;
        processes.push(process);
    }

    if processes.len() != count {
        return Err(ParseError {
            line: lines.last,
            kind: ParseErrorKind::ProcessCount {
                expected: count,
                found: processes.len(),
            },
        });
    }

    Ok(Input {
        mode,
        policies,
        last_instant,
        processes,
    })
}

pub fn parse_mode(text: &str) -> Result<Mode, ParseErrorKind> {
    match text {
        "trace" => Ok(Mode::Trace),
        "stats" => Ok(Mode::Stats),
        other => Err(ParseErrorKind::UnknownMode(other.to_owned())),
    }
}

/// `1,2-4,8-1` style policy list.
pub fn parse_policies(text: &str) -> Result<Vec<PolicySpec>, ParseErrorKind> {
    text.split(',').map(|entry| parse_policy(entry.trim())).collect()
}

fn parse_policy(entry: &str) -> Result<PolicySpec, ParseErrorKind> {
    let bad = || ParseErrorKind::BadPolicy(entry.to_owned());
    let (id, quantum) = match entry.split_once('-') {
        Some((id, quantum)) => (id, Some(quantum)),
        None => (entry, None),
    };
    let id = id.trim().parse::<i64>().map_err(|_| bad())?;
    let quantum = match quantum {
        Some(q) => Some(q.trim().parse::<i64>().map_err(|_| bad())?),
        None => None,
    };
    Ok(PolicySpec::new(id, quantum))
}

fn parse_count(text: &str) -> Result<Ticks, ParseErrorKind> {
    text.parse::<Ticks>()
        .map_err(|_| ParseErrorKind::BadInteger(text.to_owned()))
}

fn parse_process(text: &str) -> Result<ProcessSpec, ParseErrorKind> {
    let bad = || ParseErrorKind::BadProcess(text.to_owned());
    let mut fields = text.split(',').map(str::trim);
    let (Some(name), Some(arrival), Some(service), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(bad());
    };
    let arrival = arrival.parse::<i64>().map_err(|_| bad())?;
    let service = service.parse::<i64>().map_err(|_| bad())?;
    Ok(ProcessSpec::new(name, arrival, service))
}
