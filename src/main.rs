use std::process::ExitCode;
use std::sync::Arc;

use colored::Colorize;

use switchback::core::{run_backup, RunConfig};
use switchback::logger;
use switchback::platform::SshOpener;

/// No flags, arguments or environment variables: the range, subnet and
/// output location are compiled-in constants. Exit 0 after attempting all
/// devices regardless of per-device failures; exit 1 only on a fatal
/// pre-flight error.
#[tokio::main]
async fn main() -> ExitCode {
    logger::init();

    match run_backup(RunConfig::default(), Arc::new(SshOpener)).await {
        Ok(_summary) => ExitCode::SUCCESS,
        Err(err) => {
            logger::log_error(&format!("fatal: {err}"));
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
