//! JSONL session log: one self-contained JSON object per line.
//!
//! Lines are assembled in memory and written with a single `write_all` so a
//! tailing process never sees half a record.
//!
//! Degradation chain, one step per failure:
//! 1. primary file
//! 2. fallback file
//! 3. stderr, prefixed `[ACU-JSONL]`, unless the stderr sink is disabled
//! 4. silent discard (the kiosk never stops for a logging failure)

#![allow(missing_docs)]

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::charts::ChartVariant;
use crate::core::config::LoggingConfig;
use crate::core::errors::{AcuityError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Session events worth keeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    SessionStart,
    SessionStop,
    CalibrationLoaded,
    CalibrationDefaulted,
    CalibrationSaved,
    CalibrationPersistFailed,
    ChartSelected,
    FullscreenEntered,
    FullscreenExited,
    FullscreenRejected,
    FocusSkipped,
}

/// A single log line. Only `ts`, `event` and `severity` are always present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// RFC 3339 UTC timestamp with milliseconds.
    pub ts: String,
    pub event: EventType,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartVariant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixels_per_mm: Option<f64>,
    /// Focus target involved, in its stable display form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// New entry stamped with the current UTC time.
    #[must_use]
    pub fn new(event: EventType, severity: Severity) -> Self {
        Self {
            ts: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            event,
            severity,
            chart: None,
            pixels_per_mm: None,
            target: None,
            error_code: None,
            details: None,
        }
    }

    #[must_use]
    pub fn info(event: EventType) -> Self {
        Self::new(event, Severity::Info)
    }

    #[must_use]
    pub const fn chart(mut self, chart: ChartVariant) -> Self {
        self.chart = Some(chart);
        self
    }

    #[must_use]
    pub const fn pixels_per_mm(mut self, value: f64) -> Self {
        self.pixels_per_mm = Some(value);
        self
    }

    #[must_use]
    pub fn target(mut self, target: impl ToString) -> Self {
        self.target = Some(target.to_string());
        self
    }

    #[must_use]
    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Attach an error's code and message.
    #[must_use]
    pub fn error(mut self, err: &AcuityError) -> Self {
        self.error_code = Some(err.code().to_string());
        self.details = Some(err.to_string());
        self
    }
}

/// Where lines currently go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkState {
    Primary,
    Fallback,
    Stderr,
    Discard,
}

impl SinkState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Fallback => "fallback",
            Self::Stderr => "stderr",
            Self::Discard => "discard",
        }
    }
}

/// Writer settings.
#[derive(Debug, Clone)]
pub struct JsonlConfig {
    pub path: PathBuf,
    pub fallback_path: Option<PathBuf>,
    /// Rotate once the current file would grow past this many bytes.
    pub max_size_bytes: u64,
    /// Rotated generations kept (`.1` newest).
    pub max_rotated_files: u32,
}

impl From<&LoggingConfig> for JsonlConfig {
    fn from(cfg: &LoggingConfig) -> Self {
        Self {
            path: cfg.path.clone(),
            fallback_path: Some(cfg.fallback_path.clone()),
            max_size_bytes: cfg.max_size_bytes,
            max_rotated_files: cfg.max_rotated_files,
        }
    }
}

/// Append-only JSONL writer with size rotation and fallback.
#[derive(Debug)]
pub struct JsonlWriter {
    config: JsonlConfig,
    file: Option<BufWriter<File>>,
    state: SinkState,
    bytes_written: u64,
    /// Diagnostics and the stderr sink are allowed.
    stderr: bool,
}

impl JsonlWriter {
    /// Open the primary file, walking down the chain if that fails.
    #[must_use]
    pub fn open(config: JsonlConfig) -> Self {
        let mut writer = Self {
            config,
            file: None,
            state: SinkState::Discard,
            bytes_written: 0,
            stderr: true,
        };
        match open_append(&writer.config.path) {
            Ok((file, size)) => writer.attach(file, size, SinkState::Primary),
            Err(_) => writer.open_fallback(),
        }
        writer
    }

    /// Writer that drops everything (logging disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            config: JsonlConfig {
                path: PathBuf::new(),
                fallback_path: None,
                max_size_bytes: u64::MAX,
                max_rotated_files: 0,
            },
            file: None,
            state: SinkState::Discard,
            bytes_written: 0,
            stderr: true,
        }
    }

    /// Build from the `[logging]` config section.
    #[must_use]
    pub fn from_config(cfg: &LoggingConfig) -> Self {
        if cfg.enabled {
            Self::open(JsonlConfig::from(cfg))
        } else {
            Self::disabled()
        }
    }

    /// Serialize and append one entry.
    pub fn write_entry(&mut self, entry: &LogEntry) {
        match serde_json::to_string(entry) {
            Ok(json) => self.write_line(&format!("{json}\n")),
            Err(e) => self.note(&format!("serialize error: {e}")),
        }
    }

    /// Allow or forbid writing to stderr. With stderr forbidden, a writer
    /// that would fall back to stderr discards instead. Used while the
    /// terminal shows the kiosk's alternate screen.
    pub fn set_stderr_sink(&mut self, enabled: bool) {
        self.stderr = enabled;
        if !enabled && self.state == SinkState::Stderr {
            self.state = SinkState::Discard;
        }
    }

    /// Flush and sync the current file.
    pub fn flush(&mut self) {
        if let Some(file) = self.file.as_mut() {
            let _ = file.flush();
            let _ = file.get_ref().sync_data();
        }
    }

    #[must_use]
    pub const fn state(&self) -> SinkState {
        self.state
    }

    #[must_use]
    pub const fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    // ──────────────────── internals ────────────────────

    fn note(&self, message: &str) {
        if self.stderr {
            let _ = writeln!(io::stderr(), "[ACU-JSONL] {message}");
        }
    }

    const fn last_resort(&self) -> SinkState {
        if self.stderr {
            SinkState::Stderr
        } else {
            SinkState::Discard
        }
    }

    fn attach(&mut self, file: File, size: u64, state: SinkState) {
        self.file = Some(BufWriter::new(file));
        self.bytes_written = size;
        self.state = state;
    }

    fn open_fallback(&mut self) {
        self.file = None;
        let opened = self
            .config
            .fallback_path
            .as_deref()
            .map(|path| (path.to_path_buf(), open_append(path)));
        match opened {
            Some((path, Ok((file, size)))) => {
                self.note(&format!(
                    "primary log unavailable, using fallback: {}",
                    path.display()
                ));
                self.attach(file, size, SinkState::Fallback);
            }
            _ => {
                self.note("no writable log file, using stderr");
                self.state = self.last_resort();
            }
        }
    }

    fn degrade(&mut self) {
        match self.state {
            SinkState::Primary => self.open_fallback(),
            SinkState::Fallback => {
                self.file = None;
                self.note("fallback write failed, using stderr");
                self.state = self.last_resort();
            }
            SinkState::Stderr | SinkState::Discard => {
                self.file = None;
                self.state = SinkState::Discard;
            }
        }
    }

    fn current_path(&self) -> Option<PathBuf> {
        match self.state {
            SinkState::Primary => Some(self.config.path.clone()),
            SinkState::Fallback => self.config.fallback_path.clone(),
            SinkState::Stderr | SinkState::Discard => None,
        }
    }

    fn write_line(&mut self, line: &str) {
        let len = line.len() as u64;
        if self.bytes_written > 0 && self.bytes_written.saturating_add(len) > self.config.max_size_bytes {
            self.rotate();
        }

        match self.state {
            SinkState::Primary | SinkState::Fallback => {
                let written = self
                    .file
                    .as_mut()
                    .is_some_and(|file| file.write_all(line.as_bytes()).is_ok());
                if written {
                    self.bytes_written += len;
                } else {
                    self.degrade();
                    self.write_line(line);
                }
            }
            SinkState::Stderr => {
                if write!(io::stderr(), "[ACU-JSONL] {line}").is_err() {
                    self.degrade();
                }
            }
            SinkState::Discard => {}
        }
    }

    /// `log.jsonl` → `log.jsonl.1` → … → `log.jsonl.N` (dropped).
    fn rotate(&mut self) {
        let Some(base) = self.current_path() else {
            return;
        };
        if let Some(file) = self.file.as_mut() {
            let _ = file.flush();
        }
        self.file = None;

        let keep = self.config.max_rotated_files;
        if keep == 0 {
            let _ = fs::remove_file(&base);
        } else {
            let _ = fs::remove_file(rotated_name(&base, keep));
            for index in (1..keep).rev() {
                let _ = fs::rename(rotated_name(&base, index), rotated_name(&base, index + 1));
            }
            let _ = fs::rename(&base, rotated_name(&base, 1));
        }

        match open_append(&base) {
            Ok((file, _)) => {
                let state = self.state;
                self.attach(file, 0, state);
            }
            Err(_) => self.degrade(),
        }
    }
}

/// Open or create `path` for appending; returns the file and its current size.
fn open_append(path: &Path) -> Result<(File, u64)> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| AcuityError::io(parent, e))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AcuityError::io(path, e))?;
    let size = file.metadata().map_or(0, |m| m.len());
    Ok((file, size))
}

fn rotated_name(base: &Path, index: u32) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}
