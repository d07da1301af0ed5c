pub mod probes;
pub mod run;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "readahead",
    version,
    about = "Show fs automatic read-ahead usage",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Verbose debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub run: run::RunArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Trace read-ahead and print the unused/total summary (default)
    Run(run::RunArgs),

    /// Resolve which kernel functions would be instrumented
    Probes(probes::ProbesArgs),
}

impl Cli {
    pub fn json_output(&self) -> bool {
        match &self.command {
            Some(Command::Run(args)) => args.json,
            Some(Command::Probes(args)) => args.json,
            None => self.run.json,
        }
    }
}

pub fn dispatch(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Command::Run(args)) => run::run(args),
        Some(Command::Probes(args)) => probes::run(args),
        None => run::run(cli.run),
    }
}
