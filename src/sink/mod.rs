/*
 *
 *  *
 *  *      Copyright (c) 2018-2025, SnackCloud All rights reserved.
 *  *
 *  *   Redistribution and use in source and binary forms, with or without
 *  *   modification, are permitted provided that the following conditions are met:
 *  *
 *  *   Redistributions of source code must retain the above copyright notice,
 *  *   this list of conditions and the following disclaimer.
 *  *   Redistributions in binary form must reproduce the above copyright
 *  *   notice, this list of conditions and the following disclaimer in the
 *  *   documentation and/or other materials provided with the distribution.
 *  *   Neither the name of the www.snackcloud.cn developer nor the names of its
 *  *   contributors may be used to endorse or promote products derived from
 *  *   this software without specific prior written permission.
 *  *   Author: SnackCloud
 *  *
 *
 */

//!
//! Resilient output for literal SQL lines.
//!
//! File writes are serialized by a lock with a bounded wait, every line is
//! synced to disk before the call returns, and once consecutive failures pass
//! the error threshold the sink moves to the console for good.
//!
mod console;

use std::error::Error;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;

pub use console::*;

use crate::config::{AgentConfig, LogDestination};
use crate::errors::{MirrorError, Result};

pub const ERROR_PREFIX: &str = "[SqlMirror] ERROR:";

/// Lock wait of the error path. The error channel itself never waits.
const ERROR_LOCK_WAIT: Duration = Duration::from_millis(100);

static GLOBAL_SINK: OnceCell<Arc<SqlLogSink>> = OnceCell::new();

pub struct SqlLogSink {
    destination: LogDestination,
    console: Arc<dyn ConsoleTarget>,
    lock: Mutex<()>,
    lock_timeout: Duration,
    error_threshold: u64,
    degraded: AtomicBool,
    write_count: AtomicU64,
    error_count: AtomicU64,
    consecutive_errors: AtomicU64,
    /// Epoch millis of the last successful write, 0 before the first one.
    last_write: AtomicI64,
}

impl SqlLogSink {
    pub fn new(destination: LogDestination) -> Self {
        Self::with_console(destination, Arc::new(StdConsole))
    }

    pub fn with_console(destination: LogDestination, console: Arc<dyn ConsoleTarget>) -> Self {
        let defaults = AgentConfig::default();
        SqlLogSink {
            destination,
            console,
            lock: Mutex::new(()),
            lock_timeout: defaults.lock_timeout(),
            error_threshold: defaults.error_threshold(),
            degraded: AtomicBool::new(false),
            write_count: AtomicU64::new(0),
            error_count: AtomicU64::new(0),
            consecutive_errors: AtomicU64::new(0),
            last_write: AtomicI64::new(0),
        }
    }

    pub fn from_config(cfg: &AgentConfig) -> Self {
        Self::new(cfg.destination().clone())
            .with_lock_timeout(cfg.lock_timeout())
            .with_error_threshold(cfg.error_threshold())
    }

    pub fn with_lock_timeout(mut self, lock_timeout: Duration) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }

    /// Consecutive failures tolerated before the sink degrades.
    pub fn with_error_threshold(mut self, error_threshold: u64) -> Self {
        self.error_threshold = error_threshold;
        self
    }

    /// The process-wide sink, built from [`crate::config`] on first use.
    pub fn global() -> Arc<SqlLogSink> {
        GLOBAL_SINK
            .get_or_init(|| {
                let sink = SqlLogSink::from_config(crate::config());
                tracing::info!(target: "sqlmirror::sink", "SQL log sink initialized, destination: {}", sink.destination);
                Arc::new(sink)
            })
            .clone()
    }

    pub fn destination(&self) -> &LogDestination {
        &self.destination
    }

    pub fn console(&self) -> &Arc<dyn ConsoleTarget> {
        &self.console
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Acquire)
    }

    /// Write one line. Never fails and never blocks longer than the lock timeout.
    pub fn write_line(&self, line: &str) {
        let path = match self.destination.file_path() {
            Some(path) if !self.is_degraded() => path,
            _ => {
                self.write_console(line);
                return;
            }
        };
        match self.append(path, line, self.lock_timeout) {
            Ok(()) => {
                self.consecutive_errors.store(0, Ordering::Release);
                self.record_write();
            }
            Err(MirrorError::LockTimeout(waited)) => {
                tracing::warn!(target: "sqlmirror::sink", "log file busy for {} ms, writing line to console", waited.as_millis());
                self.write_console(line);
            }
            Err(err) => {
                self.record_error(&err);
                self.write_console(line);
            }
        }
    }

    /// Report a failure of the logging machinery itself.
    ///
    /// Goes to the error stream right away, then tries the file with a short lock wait.
    pub fn write_error(&self, message: &str, cause: Option<&(dyn Error + 'static)>) {
        let line = match cause {
            Some(cause) => format!("{} {} - {}", ERROR_PREFIX, message, cause),
            None => format!("{} {}", ERROR_PREFIX, message),
        };
        let _ = self.console.err(&line);
        let mut source = cause.and_then(|c| c.source());
        while let Some(err) = source {
            let _ = self.console.err(&format!("  Caused by: {}", err));
            source = err.source();
        }
        if let Some(path) = self.destination.file_path() {
            if !self.is_degraded() {
                let _ = self.append(path, &line, ERROR_LOCK_WAIT);
            }
        }
    }

    pub fn diagnostics(&self) -> SinkDiagnostics {
        let last_write = self.last_write.load(Ordering::Acquire);
        let last_write_ago_ms = if last_write > 0 {
            Some((now_millis() - last_write).max(0))
        } else {
            None
        };
        SinkDiagnostics {
            mode: if self.destination.is_file() { "file" } else { "console" }.to_string(),
            writes: self.write_count.load(Ordering::Acquire),
            errors: self.error_count.load(Ordering::Acquire),
            last_write_ago_ms,
            degraded: self.is_degraded(),
        }
    }

    fn append(&self, path: &Path, line: &str, wait: Duration) -> Result<()> {
        let _guard = self.lock.try_lock_for(wait).ok_or(MirrorError::LockTimeout(wait))?;
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        file.write_all(buf.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }

    fn write_console(&self, line: &str) {
        if self.console.out(line).is_ok() {
            self.record_write();
        }
    }

    fn record_write(&self) {
        self.write_count.fetch_add(1, Ordering::AcqRel);
        self.last_write.store(now_millis(), Ordering::Release);
    }

    fn record_error(&self, err: &MirrorError) {
        self.error_count.fetch_add(1, Ordering::AcqRel);
        let consecutive = self.consecutive_errors.fetch_add(1, Ordering::AcqRel) + 1;
        self.write_error("Failed to write SQL log", Some(err));
        if consecutive > self.error_threshold && !self.degraded.swap(true, Ordering::AcqRel) {
            tracing::error!(
                target: "sqlmirror::sink",
                "{} consecutive write errors, switching to console output permanently",
                consecutive
            );
            let _ = self.console.err(&format!(
                "{} Too many write errors ({}), SQL log falls back to console permanently",
                ERROR_PREFIX, consecutive
            ));
        }
    }
}

impl fmt::Debug for SqlLogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diagnostics())
    }
}

fn now_millis() -> i64 {
    chrono::Local::now().timestamp_millis()
}

/// Point-in-time counters of a [`SqlLogSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkDiagnostics {
    pub mode: String,
    pub writes: u64,
    pub errors: u64,
    pub last_write_ago_ms: Option<i64>,
    pub degraded: bool,
}

impl fmt::Display for SinkDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last_write = match self.last_write_ago_ms {
            Some(ms) => format!("{}ms ago", ms),
            None => "never".to_string(),
        };
        write!(
            f,
            "SqlLogSink[mode={}, writes={}, errors={}, lastWrite={}, degraded={}]",
            self.mode, self.writes, self.errors, last_write, self.degraded
        )
    }
}
