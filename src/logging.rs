//! Update history and error logs
//!
//! Two size-capped files are kept: every record lands in the history log and
//! records at ERROR also land in the error log. Records are mirrored to
//! `tracing` so they appear in console diagnostics as well.

use crate::config::LoggingConfig;
use crate::error::Result;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        })
    }
}

/// Format one log line: `<timestamp> - <LEVEL> - <message>`
pub fn format_record(level: Level, message: &str) -> String {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f");
    format!("{} - {} - {}\n", timestamp, level, message)
}

/// Append-only file that rolls over to `name.1` … `name.N` at a size cap
#[derive(Debug)]
pub struct RotatingFile {
    directory: PathBuf,
    file_name: String,
    max_bytes: u64,
    backups: usize,
    file: Option<File>,
    size: u64,
}

impl RotatingFile {
    pub fn new(directory: impl Into<PathBuf>, file_name: &str, max_bytes: u64, backups: usize) -> Self {
        Self {
            directory: directory.into(),
            file_name: file_name.to_string(),
            max_bytes,
            backups,
            file: None,
            size: 0,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        self.directory.join(format!("{}.{}", self.file_name, index))
    }

    /// Point at a new directory. The current handle is dropped, so the next
    /// write opens the file there; nothing already written is moved.
    pub fn relocate(&mut self, directory: impl Into<PathBuf>) {
        self.directory = directory.into();
        self.file = None;
        self.size = 0;
    }

    pub fn write_line(&mut self, line: &str) -> Result<()> {
        let len = line.len() as u64;
        if self.max_bytes > 0 {
            self.ensure_open()?;
            if self.size > 0 && self.size + len >= self.max_bytes {
                self.roll_over()?;
            }
        }

        let file = self.ensure_open()?;
        file.write_all(line.as_bytes())?;
        file.flush()?;
        self.size += len;
        Ok(())
    }

    fn ensure_open(&mut self) -> Result<&mut File> {
        let file = match self.file.take() {
            Some(file) => file,
            None => {
                fs::create_dir_all(&self.directory)?;
                let file = OpenOptions::new().create(true).append(true).open(self.path())?;
                self.size = file.metadata()?.len();
                file
            }
        };
        Ok(self.file.insert(file))
    }

    fn roll_over(&mut self) -> Result<()> {
        self.file = None;

        if self.backups == 0 {
            File::create(self.path())?;
        } else {
            remove_if_exists(&self.backup_path(self.backups))?;
            for index in (1..self.backups).rev() {
                let from = self.backup_path(index);
                if from.exists() {
                    fs::rename(&from, self.backup_path(index + 1))?;
                }
            }
            fs::rename(self.path(), self.backup_path(1))?;
        }

        tracing::debug!(file = %self.path().display(), "rotated log file");
        self.size = 0;
        Ok(())
    }
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err.into()),
        _ => Ok(()),
    }
}

/// The history and error logs written by every user action
#[derive(Debug)]
pub struct UpdateLog {
    history: Mutex<RotatingFile>,
    errors: Mutex<RotatingFile>,
}

impl UpdateLog {
    pub fn new(directory: impl Into<PathBuf>, config: &LoggingConfig) -> Self {
        let directory = directory.into();
        Self {
            history: Mutex::new(RotatingFile::new(
                directory.clone(),
                &config.history_file,
                config.max_bytes,
                config.backups,
            )),
            errors: Mutex::new(RotatingFile::new(
                directory,
                &config.error_file,
                config.max_bytes,
                config.backups,
            )),
        }
    }

    pub fn from_config(config: &LoggingConfig) -> Self {
        Self::new(config.resolved_directory(), config)
    }

    pub fn info(&self, message: &str) {
        tracing::info!("{}", message);
        self.write(Level::Info, message);
    }

    pub fn warning(&self, message: &str) {
        tracing::warn!("{}", message);
        self.write(Level::Warning, message);
    }

    pub fn error(&self, message: &str) {
        tracing::error!("{}", message);
        self.write(Level::Error, message);
    }

    /// Write a record, surfacing file errors to the caller
    pub fn record(&self, level: Level, message: &str) -> Result<()> {
        let line = format_record(level, message);
        lock(&self.history).write_line(&line)?;
        if level >= Level::Error {
            lock(&self.errors).write_line(&line)?;
        }
        Ok(())
    }

    fn write(&self, level: Level, message: &str) {
        if let Err(err) = self.record(level, message) {
            tracing::warn!(error = %err, "could not write log record");
        }
    }

    /// Send both files to a new directory from the next write on
    pub fn relocate(&self, directory: &Path) {
        lock(&self.history).relocate(directory);
        lock(&self.errors).relocate(directory);
    }

    pub fn history_path(&self) -> PathBuf {
        lock(&self.history).path()
    }

    pub fn error_path(&self) -> PathBuf {
        lock(&self.errors).path()
    }
}

fn lock(sink: &Mutex<RotatingFile>) -> MutexGuard<'_, RotatingFile> {
    // A panic mid-write leaves the sink usable; keep logging
    sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
