//! Run orchestration
//!
//! Drives a whole backup run: capture the timestamp, prepare the workspace,
//! load credentials, enumerate targets, then fan the device backup worker
//! out over a bounded pool of blocking tasks. Devices are independent
//! (unique artifact names, read-only shared credentials), so the pool
//! preserves per-device failure isolation while overlapping the slow
//! network I/O.
//!
//! Only the two pre-flight errors (credentials, workspace) propagate out of
//! here; every per-device outcome is absorbed into the [`RunSummary`].

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use colored::Colorize;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;

use crate::config;
use crate::constants::{
    CONFIG_FILE_NAME, FIRST_HOST, LAST_HOST, MAX_CONCURRENT_BACKUPS, SUBNET_PREFIX,
    TIMESTAMP_FORMAT,
};
use crate::core::session::SessionOpener;
use crate::core::targets::{enumerate_targets, DeviceTarget};
use crate::core::worker::{backup_device, DeviceOutcome};
use crate::logger;
use crate::utils::{DeviceError, FatalError, SessionError};
use crate::workspace;

/// Explicit run configuration
///
/// The compiled-in defaults come from `constants.rs`; tests inject their own
/// bounds, paths and timestamps.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub subnet_prefix: String,
    pub first_host: u8,
    pub last_host: u8,
    /// Base directory the run's timestamped workspace is created under
    pub base_dir: PathBuf,
    /// Credential file location
    pub config_path: PathBuf,
    /// Upper bound on devices backed up concurrently
    pub concurrency: usize,
    /// Draw the progress bar and per-device failure lines on stdout
    pub show_progress: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            subnet_prefix: SUBNET_PREFIX.to_string(),
            first_host: FIRST_HOST,
            last_host: LAST_HOST,
            base_dir: workspace::default_base_dir(),
            config_path: PathBuf::from(CONFIG_FILE_NAME),
            concurrency: MAX_CONCURRENT_BACKUPS,
            show_progress: true,
        }
    }
}

/// End-of-run aggregate
#[derive(Debug)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// The run's workspace directory
    pub workspace: PathBuf,
}

impl RunSummary {
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Run a whole backup with the timestamp captured now
pub async fn run_backup(
    config: RunConfig,
    opener: Arc<dyn SessionOpener>,
) -> Result<RunSummary, FatalError> {
    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    run_backup_at(config, opener, &timestamp).await
}

/// Run a whole backup for an explicit run timestamp
///
/// Split out from [`run_backup`] so tests can pin the timestamp and assert
/// on deterministic artifact names.
pub async fn run_backup_at(
    config: RunConfig,
    opener: Arc<dyn SessionOpener>,
    timestamp: &str,
) -> Result<RunSummary, FatalError> {
    logger::log_info(&format!("backup run {timestamp} starting"));

    // Pre-flight: both must succeed before any device is contacted.
    let workspace_dir = workspace::prepare_workspace(&config.base_dir, timestamp)?;
    let credentials = Arc::new(config::load_credentials(&config.config_path)?);

    let targets = enumerate_targets(&config.subnet_prefix, config.first_host, config.last_host);
    let total = targets.len();

    let progress = if config.show_progress {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let semaphore = Arc::new(Semaphore::new(config.concurrency.max(1)));
    let mut tasks = Vec::with_capacity(total);

    for target in targets {
        let opener = Arc::clone(&opener);
        let credentials = Arc::clone(&credentials);
        let semaphore = Arc::clone(&semaphore);
        let progress = progress.clone();
        let workspace_dir = workspace_dir.clone();
        let timestamp = timestamp.to_string();

        tasks.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok();

            let address = target.address().to_string();
            let blocking = tokio::task::spawn_blocking(move || {
                backup_device(
                    opener.as_ref(),
                    &target,
                    &credentials,
                    &workspace_dir,
                    &timestamp,
                )
            });
            let outcome = match blocking.await {
                Ok(outcome) => outcome,
                Err(err) => DeviceOutcome::failure(
                    DeviceTarget::new(address),
                    DeviceError::Session(SessionError::CommandFailed(format!(
                        "backup task aborted: {err}"
                    ))),
                ),
            };

            progress.set_message(outcome.address().to_string());
            if let Err(err) = outcome.result() {
                let line = format!("{} {}: {}", "!".red(), outcome.address(), err);
                progress.suspend(|| println!("  {line}"));
            }
            progress.inc(1);
            outcome
        }));
    }

    let outcomes: Vec<DeviceOutcome> = join_all(tasks)
        .await
        .into_iter()
        .filter_map(Result::ok)
        .collect();
    progress.finish_and_clear();

    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    let failed = outcomes.len() - succeeded;
    let summary = RunSummary {
        succeeded,
        failed,
        workspace: workspace_dir,
    };

    logger::log_info(&format!(
        "backup run {timestamp} finished: {succeeded} succeeded, {failed} failed"
    ));

    if config.show_progress {
        if summary.failed == 0 {
            println!(
                "{} Backed up {} of {} devices to {}",
                "✓".green(),
                summary.succeeded,
                total,
                summary.workspace.display()
            );
        } else {
            println!(
                "{} Backed up {} of {} devices ({} failed) to {}",
                "!".yellow(),
                summary.succeeded,
                total,
                summary.failed,
                summary.workspace.display()
            );
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mock_session::{MockBehavior, MockOpener};
    use std::fs;

    const TIMESTAMP: &str = "07-04-2026-12-00-00";

    /// Temp base/config wired into a quiet RunConfig
    fn test_config(dir: &tempfile::TempDir) -> RunConfig {
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            "[switch]\nusername = \"admin\"\npassword = \"s3cret\"\ndevice_type = \"cisco_ios\"\n",
        )
        .unwrap();

        RunConfig {
            subnet_prefix: SUBNET_PREFIX.to_string(),
            first_host: FIRST_HOST,
            last_host: LAST_HOST,
            base_dir: dir.path().join("runs"),
            config_path,
            concurrency: MAX_CONCURRENT_BACKUPS,
            show_progress: false,
        }
    }

    #[tokio::test]
    async fn full_run_with_two_failures_completes() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let opener = Arc::new(
            MockOpener::healthy()
                .with_override("10.2.11.37", MockBehavior::Unreachable)
                .with_override("10.2.11.82", MockBehavior::CommandFailure),
        );

        let summary = run_backup_at(config, opener.clone(), TIMESTAMP)
            .await
            .unwrap();

        assert_eq!(summary.succeeded, 98);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.attempted(), 100);

        let artifacts = fs::read_dir(&summary.workspace).unwrap().count();
        assert_eq!(artifacts, 98);

        // every enumerated device was attempted, failures included
        assert_eq!(opener.open_attempts(), 100);
    }

    #[tokio::test]
    async fn artifact_contents_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(&dir);
        config.first_host = 5;
        config.last_host = 5;

        let summary = run_backup_at(config, Arc::new(MockOpener::healthy()), TIMESTAMP)
            .await
            .unwrap();

        assert_eq!(summary.succeeded, 1);
        let artifact = summary
            .workspace
            .join(format!("10.2.11.5-{TIMESTAMP}.txt"));
        let written = fs::read_to_string(artifact).unwrap();
        assert_eq!(written, MockOpener::canned_config("10.2.11.5"));
    }

    #[tokio::test]
    async fn missing_credentials_contact_no_devices() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(&dir);
        config.config_path = dir.path().join("missing.toml");

        let opener = Arc::new(MockOpener::healthy());
        let err = run_backup_at(config, opener.clone(), TIMESTAMP)
            .await
            .unwrap_err();

        assert!(matches!(err, FatalError::Config(_)));
        assert_eq!(opener.open_attempts(), 0);
    }

    #[tokio::test]
    async fn blocked_workspace_contacts_no_devices() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(&dir);
        // a file where the base directory should be
        config.base_dir = dir.path().join("blocked");
        fs::write(&config.base_dir, b"in the way").unwrap();

        let opener = Arc::new(MockOpener::healthy());
        let err = run_backup_at(config, opener.clone(), TIMESTAMP)
            .await
            .unwrap_err();

        assert!(matches!(err, FatalError::Workspace(_)));
        assert_eq!(opener.open_attempts(), 0);
    }

    #[tokio::test]
    async fn workspace_is_scoped_to_the_run_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(&dir);
        config.first_host = 1;
        config.last_host = 3;

        let summary = run_backup_at(config.clone(), Arc::new(MockOpener::healthy()), TIMESTAMP)
            .await
            .unwrap();

        assert_eq!(summary.workspace, config.base_dir.join(TIMESTAMP));
        for host in 1..=3 {
            assert!(summary
                .workspace
                .join(format!("10.2.11.{host}-{TIMESTAMP}.txt"))
                .is_file());
        }
    }
}
