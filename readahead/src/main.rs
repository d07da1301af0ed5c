use clap::Parser;
use readahead_core::cli::{self, Cli};
use readahead_core::logging::{init_json_logging, init_logging};

fn main() {
    let cli = Cli::parse();

    if cli.json_output() {
        init_json_logging(cli.verbose);
    } else {
        init_logging(cli.verbose);
    }

    if let Err(e) = cli::dispatch(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
