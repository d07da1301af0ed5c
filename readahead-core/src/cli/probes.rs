use crate::probe::{DEFAULT_KALLSYMS, KernelSymbols, ProbeKind, ProbePlan};
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ProbesArgs {
    /// Kernel symbol table to resolve against
    #[arg(long, default_value = DEFAULT_KALLSYMS)]
    pub kallsyms: PathBuf,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ProbesArgs) -> Result<()> {
    let symbols = KernelSymbols::load(&args.kallsyms).context("failed to load kernel symbols")?;
    tracing::debug!(symbols = symbols.len(), path = %args.kallsyms.display(), "kallsyms loaded");

    let plan = ProbePlan::resolve(&symbols).context("failed to resolve attach points")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!("{}", render_plan(&plan));
    }

    Ok(())
}

pub fn render_plan(plan: &ProbePlan) -> String {
    let mut out = String::from("Read-ahead attach points:\n");
    for point in &plan.points {
        let kind = match point.kind {
            ProbeKind::Entry => "entry",
            ProbeKind::Return => "return",
        };
        out.push_str(&format!(
            "  {:<7} {:<28} -> {}\n",
            kind, point.symbol, point.event
        ));
    }
    out
}
