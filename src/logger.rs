use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;

use chrono::Local;

const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;

struct Logger {
    path: PathBuf,
    verbose: bool,
    enabled: bool,
}

impl Logger {
    fn init() -> Self {
        let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        let dir = base.join("switchback").join("logs");
        let _ = fs::create_dir_all(&dir);

        // Use different log file names for debug vs release
        let filename = if cfg!(debug_assertions) {
            "switchback-dev.log"
        } else {
            "switchback.log"
        };
        let path = dir.join(filename);

        let verbose = std::env::var("SB_LOG_VERBOSE")
            .map(|v| v == "1")
            .unwrap_or(false);

        // In debug builds, always enable logging
        // In release builds, only enable if SB_ENABLE_LOGGING=1
        let enabled = if cfg!(debug_assertions) {
            true
        } else {
            std::env::var("SB_ENABLE_LOGGING")
                .map(|v| v == "1")
                .unwrap_or(false)
        };

        Self {
            path,
            verbose,
            enabled,
        }
    }

    fn rotate_if_needed(&self) {
        if let Ok(meta) = fs::metadata(&self.path) {
            if meta.len() > MAX_LOG_BYTES {
                let backup = self.path.with_extension("log.bak");
                let _ = fs::remove_file(&backup);
                let _ = fs::rename(&self.path, &backup);
            }
        }
    }

    fn log(&self, level: &str, message: &str) {
        if !self.enabled {
            return;
        }

        self.rotate_if_needed();
        if let Ok(mut file) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
        {
            let stamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let _ = writeln!(file, "{} [{}] {}", stamp, level, message);
        }
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

fn logger() -> &'static Logger {
    LOGGER.get_or_init(Logger::init)
}

/// Force logger initialization at process start so the log directory exists
/// before the first worker writes a line.
pub fn init() {
    let _ = logger();
}

/// Debug lines are only written when SB_LOG_VERBOSE=1
pub fn log_debug(message: &str) {
    if logger().verbose {
        emit("DEBUG", message);
    }
}

pub fn log_info(message: &str) {
    emit("INFO", message);
}

pub fn log_warn(message: &str) {
    emit("WARN", message);
}

pub fn log_error(message: &str) {
    emit("ERROR", message);
}

fn emit(level: &str, message: &str) {
    // Console echo in dev builds only; the progress bar owns stdout in
    // release runs.
    #[cfg(debug_assertions)]
    eprintln!("[{}] {}", level, message);

    logger().log(level, message);
}
