//! Minimal `log` backend.
//!
//! The terminal UI owns stdout/stderr while it runs, so interactive sessions
//! log to a file under the user cache directory. Non-interactive runs log to
//! stderr.

use directories::ProjectDirs;
use log::{LevelFilter, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

pub const LOG_ENV: &str = "EVENTCALC_LOG";

pub enum LogTarget {
    Stderr,
    File,
}

struct Logger {
    file: Option<Mutex<File>>,
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match &self.file {
            Some(file) => {
                if let Ok(mut file) = file.lock() {
                    let _ = writeln!(
                        file,
                        "[{}] {}: {}",
                        record.level(),
                        record.target(),
                        record.args()
                    );
                }
            }
            None => eprintln!("[{}] {}", record.level(), record.args()),
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file
            && let Ok(mut file) = file.lock()
        {
            let _ = file.flush();
        }
    }
}

/// Install the logger. Returns the log file path when logging to a file.
pub fn init(target: LogTarget) -> Option<PathBuf> {
    let default = match target {
        LogTarget::Stderr => LevelFilter::Warn,
        LogTarget::File => LevelFilter::Info,
    };
    let mut level = level_from_env(std::env::var(LOG_ENV).ok().as_deref(), default);
    let (file, path) = match target {
        LogTarget::Stderr => (None, None),
        LogTarget::File => match open_log_file() {
            Some((file, path)) => (Some(Mutex::new(file)), Some(path)),
            // Nowhere to write without corrupting the screen.
            None => {
                level = LevelFilter::Off;
                (None, None)
            }
        },
    };
    if log::set_boxed_logger(Box::new(Logger { file })).is_ok() {
        log::set_max_level(level);
    }
    path
}

fn open_log_file() -> Option<(File, PathBuf)> {
    let proj = ProjectDirs::from("", "", "eventcalc")?;
    let dir = proj.cache_dir();
    std::fs::create_dir_all(dir).ok()?;
    let path = dir.join("eventcalc.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;
    Some((file, path))
}

pub(crate) fn level_from_env(value: Option<&str>, default: LevelFilter) -> LevelFilter {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("error") => LevelFilter::Error,
        Some("warn") => LevelFilter::Warn,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        Some("info") => LevelFilter::Info,
        Some("off") => LevelFilter::Off,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_env() {
        assert_eq!(level_from_env(None, LevelFilter::Info), LevelFilter::Info);
        assert_eq!(level_from_env(Some("DEBUG"), LevelFilter::Info), LevelFilter::Debug);
        assert_eq!(level_from_env(Some("off"), LevelFilter::Info), LevelFilter::Off);
        assert_eq!(level_from_env(Some("info"), LevelFilter::Warn), LevelFilter::Info);
        assert_eq!(level_from_env(Some("verbose"), LevelFilter::Warn), LevelFilter::Warn);
    }
}
