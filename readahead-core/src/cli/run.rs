use crate::config::{DEFAULT_PRODUCERS, RunConfig, TraceInput};
use crate::error::SetupError;
use crate::page_table::DEFAULT_MAX_ENTRIES;
use crate::report::{render_json, render_text};
use crate::session::{EndReason, ObservationSession};
use crate::source::{EventSource, TraceReplaySource};
use anyhow::{Context, Result};
use clap::Args;
use std::time::Duration;

const DETACH_GRACE: Duration = Duration::from_millis(200);

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Duration to trace, in seconds (default: until Ctrl-C or end of trace)
    #[arg(short, long, value_name = "DURATION", value_parser = clap::value_parser!(u64).range(1..))]
    pub duration: Option<u64>,

    /// Recorded event trace to replay, one JSON event per line ("-" for stdin)
    #[arg(long, value_name = "PATH", default_value = "-")]
    pub trace: String,

    /// Threads delivering page events concurrently
    #[arg(long, default_value_t = DEFAULT_PRODUCERS)]
    pub producers: usize,

    /// Maximum number of in-flight page records
    #[arg(long, default_value_t = DEFAULT_MAX_ENTRIES)]
    pub max_entries: usize,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    pub fn into_config(self) -> Result<RunConfig> {
        let config = RunConfig::new(
            self.duration,
            TraceInput::parse(&self.trace),
            self.producers,
            self.max_entries,
        )?;
        Ok(config.with_json(self.json))
    }
}

pub fn run(args: RunArgs) -> Result<()> {
    let config = args.into_config().context("invalid configuration")?;

    let session = ObservationSession::new(config.session);

    let stop = session.stop_handle();
    ctrlc::set_handler(move || stop.stop(EndReason::Interrupted))
        .map_err(SetupError::from)
        .context("failed to set up tracing")?;

    let source: Box<dyn EventSource> =
        Box::new(TraceReplaySource::new(config.trace.clone(), config.producers));
    let attached = source
        .attach(session.sink(), session.stop_handle())
        .context("failed to attach event source")?;

    if !config.json {
        println!("Tracing fs read-ahead ... Hit Ctrl-C to end.");
    }

    let report = session.run(config.limit);
    attached.detach(DETACH_GRACE);

    if config.json {
        println!("{}", render_json(&report)?);
    } else {
        println!();
        print!("{}", render_text(&report));
    }

    Ok(())
}
