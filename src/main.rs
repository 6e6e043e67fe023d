//! Suite runner - sequential test orchestrator
//!
//! Runs the Dreo HM311S plugin test scripts one at a time and reports a
//! summary, or runs a single test picked by name or file.

use std::path::PathBuf;

use clap::Parser;
use suite_runner::cli::{self, Options};
use suite_runner::common::logging;

#[derive(Parser)]
#[command(name = "run-tests", about = "Run the plugin test suite sequentially")]
#[command(version, long_about = None)]
struct Cli {
    /// Run only the test matching this file or name
    test: Option<String>,

    /// TOML file declaring the test catalog
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Directory containing the test artifacts
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Kill a test after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// List available tests and exit
    #[arg(long)]
    list: bool,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_cli(cli.verbose);

    let options = Options {
        test: cli.test,
        catalog: cli.catalog,
        base_dir: cli.base_dir,
        timeout_secs: cli.timeout,
        list: cli.list,
    };

    match cli::dispatch(options).await {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
