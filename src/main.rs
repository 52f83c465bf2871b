mod logger;

use std::{fs, io::Read, path::PathBuf, process::ExitCode};

use clap::{Parser, ValueEnum};
use log::error;
use schedsim::{
    Batch, Mode, SimError, Workload,
    input::{self, Input},
    render,
    sim::workload::bernoulli,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Timeline or table, like the classic course output
    Text,
    /// Outcomes serialized as JSON
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Trace,
    Stats,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Trace => Mode::Trace,
            ModeArg::Stats => Mode::Stats,
        }
    }
}

/// Simulate CPU scheduling policies over a fixed time horizon
#[derive(Parser, Debug)]
#[command(name = "schedsim", version)]
struct Args {
    /// Input file; stdin when omitted
    input: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Run the policies of the batch on separate threads
    #[arg(long)]
    parallel: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Generate a random workload with arrivals over this many ticks instead
    /// of reading input
    #[arg(long, requires = "policies", conflicts_with = "input")]
    random: Option<u64>,

    /// Seed for --random
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Policy list for --random, e.g. "1,2-4,6"
    #[arg(long)]
    policies: Option<String>,

    /// Last instant for --random; long enough to finish every process when
    /// omitted
    #[arg(long)]
    horizon: Option<u64>,

    /// Output mode for --random
    #[arg(long, value_enum, default_value_t = ModeArg::Stats)]
    mode: ModeArg,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(err) = logger::init(args.verbose) {
        eprintln!("failed to install logger: {err}");
    }

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            error!("{err}");
            ExitCode::from(2)
        }
    }
}

// Ok(false) when at least one batch entry failed
fn run(args: &Args) -> Result<bool, Box<dyn std::error::Error>> {
    let (input, workload) = load(args)?;
    let batch = Batch::new(&workload, input.policies, input.last_instant, input.mode);

    let results = if args.parallel {
        batch.run_parallel()
    } else {
        batch.run()
    };

    let mut all_ok = true;
    let mut outcomes = Vec::new();
    for (spec, result) in batch.entries().iter().zip(results) {
        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) => {
                all_ok = false;
                error!("policy entry {spec:?}: {err}");
            }
        }
    }

    match args.format {
        Format::Text => {
            for outcome in &outcomes {
                print!("{}", render::outcome(outcome, batch.mode()));
            }
        }
        Format::Json => println!("{}", serde_json::to_string_pretty(&outcomes)?),
    }

    Ok(all_ok)
}

fn load(args: &Args) -> Result<(Input, Workload), Box<dyn std::error::Error>> {
    if let Some(ticks) = args.random {
        let policies = input::parse_policies(args.policies.as_deref().unwrap_or_default())
            .map_err(|kind| SimError::Parse(input::ParseError { line: 1, kind }))?;
        let workload = bernoulli(ticks, 0.3, 0.3, 2, 6, args.seed);
        let input = Input {
            mode: args.mode.into(),
            policies,
            last_instant: args.horizon.unwrap_or_else(|| workload.completion_bound()),
            processes: Vec::new(),
        };
        return Ok((input, workload));
    }

    let text = read_input(args.input.as_ref())?;
    let input = input::parse(&text).map_err(SimError::from)?;
    let workload = Workload::new(input.processes.iter().cloned()).map_err(SimError::from)?;
    Ok((input, workload))
}

fn read_input(path: Option<&PathBuf>) -> std::io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
