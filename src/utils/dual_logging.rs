use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use crate::utils::app_paths::AppPaths;

/// Global file logger instance
static DUAL_LOGGER: OnceLock<DualLogger> = OnceLock::new();

fn fallback_log_dir() -> PathBuf {
    std::env::temp_dir().join("statboard")
}

/// Persistent half of the logging pair: one timestamped file per session,
/// plus a `latest.log` pointer next to it.
pub struct DualLogger {
    log_file: Mutex<Option<File>>,
    log_path: PathBuf,
}

impl DualLogger {
    pub fn new() -> Self {
        let log_dir = AppPaths::log_dir().unwrap_or_else(|_| fallback_log_dir());
        Self::in_dir(&log_dir)
    }

    pub fn in_dir(log_dir: &Path) -> Self {
        let _ = std::fs::create_dir_all(log_dir);

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let log_path = log_dir.join(format!("statboard_{}.log", timestamp));
        let latest_path = log_dir.join("latest.log");

        #[cfg(unix)]
        {
            let _ = std::fs::remove_file(&latest_path);
            let _ = std::os::unix::fs::symlink(&log_path, &latest_path);
        }

        #[cfg(not(unix))]
        {
            let pointer_content = format!("Current log file: {}\n", log_path.display());
            let _ = std::fs::write(&latest_path, pointer_content);
        }

        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .ok();

        Self {
            log_file: Mutex::new(log_file),
            log_path,
        }
    }

    /// Append one line to the session file
    pub fn log(&self, level: &str, target: &str, message: &str) {
        let line = format!(
            "[{}] {} [{}] {}\n",
            Local::now().format("%H:%M:%S.%3f"),
            level,
            target,
            message
        );

        if let Ok(mut file_opt) = self.log_file.lock() {
            if let Some(ref mut file) = *file_opt {
                let _ = file.write_all(line.as_bytes());
                let _ = file.flush();
            }
        }

        if std::env::var("STATBOARD_DEBUG").is_ok() {
            eprint!("{}", line);
        }
    }

    pub fn log_path(&self) -> &PathBuf {
        &self.log_path
    }

    pub fn flush(&self) {
        if let Ok(mut file_opt) = self.log_file.lock() {
            if let Some(ref mut file) = *file_opt {
                let _ = file.flush();
            }
        }
    }
}

impl Default for DualLogger {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_dual_logger() -> &'static DualLogger {
    DUAL_LOGGER.get_or_init(DualLogger::new)
}

pub fn get_dual_logger() -> Option<&'static DualLogger> {
    DUAL_LOGGER.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_lines_reach_the_file() {
        let dir = TempDir::new().unwrap();
        let logger = DualLogger::in_dir(dir.path());

        logger.log("WARN", "loader", "AL_saber_full.csv has no usable rows");
        logger.flush();

        let contents = std::fs::read_to_string(logger.log_path()).unwrap();
        assert!(contents.contains("WARN [loader] AL_saber_full.csv has no usable rows"));
        assert!(dir.path().join("latest.log").exists());
    }
}
