use webcache_core::logging;

mod cli;

use crate::cli::{Cli, RunStatus};

fn main() {
    // Initialize logging as early as possible.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    // Parse CLI and dispatch.
    match Cli::run_from_args() {
        Ok(RunStatus::Fetched) => {}
        Ok(RunStatus::NotFetched) => std::process::exit(2),
        Err(err) => {
            eprintln!("webcache error: {:#}", err);
            std::process::exit(1);
        }
    }
}
