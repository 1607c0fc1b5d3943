// src/main.rs

use taskweave::errors::TaskweaveError;
use taskweave::{cli, logging, run};

/// Conventional exit status for a run interrupted by Ctrl-C.
const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("taskweave error: {err:?}");
        std::process::exit(1);
    }

    let code = match run(args).await {
        Ok(code) => code,
        Err(TaskweaveError::Cancelled) => {
            eprintln!("taskweave: interrupted");
            EXIT_INTERRUPTED
        }
        Err(err) => {
            eprintln!("taskweave error: {err}");
            1
        }
    };

    std::process::exit(code);
}
