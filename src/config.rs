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

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use sqlmirror_core::DatabaseDialect;

pub const KEY_SLOW_THRESHOLD_MS: &str = "sqlmirror.slowThresholdMs";
pub const KEY_LOG_SQL_ALWAYS: &str = "sqlmirror.logSqlAlways";
pub const KEY_LOG_STACK: &str = "sqlmirror.logStack";
pub const KEY_MAX_STACK_DEPTH: &str = "sqlmirror.maxStackDepth";
pub const KEY_STACK_FILTERS: &str = "sqlmirror.stackFilters";
pub const KEY_COMPACT_STACK: &str = "sqlmirror.compactStack";
pub const KEY_STDOUT: &str = "sqlmirror.stdout";
pub const KEY_DIALECT: &str = "sqlmirror.dialect";
pub const KEY_LOCK_TIMEOUT_MS: &str = "sqlmirror.lockTimeoutMs";
pub const KEY_ERROR_THRESHOLD: &str = "sqlmirror.errorThreshold";

const CONSOLE_MODE: &str = "console";

/// Where `[SQL]` lines go.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogDestination {
    #[default]
    Console,
    /// Append-only file, opened for every line.
    File(PathBuf),
}

impl LogDestination {
    /// Empty or `console` (any case) selects the console; anything else is a file path.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(CONSOLE_MODE) {
            LogDestination::Console
        } else {
            LogDestination::File(PathBuf::from(value))
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, LogDestination::File(_))
    }

    pub fn file_path(&self) -> Option<&Path> {
        match self {
            LogDestination::File(path) => Some(path.as_path()),
            LogDestination::Console => None,
        }
    }
}

impl fmt::Display for LogDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogDestination::Console => write!(f, "{}", CONSOLE_MODE),
            LogDestination::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AgentConfig {
    slow_threshold_ms: u64,
    log_sql_always: bool,
    log_stack: bool,
    max_stack_depth: usize,
    stack_filters: Vec<String>,
    compact_stack: bool,
    destination: LogDestination,
    dialect: DatabaseDialect,
    lock_timeout: Duration,
    error_threshold: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            slow_threshold_ms: 5000,
            log_sql_always: true,
            log_stack: false,
            max_stack_depth: 10,
            stack_filters: Vec::new(),
            compact_stack: true,
            destination: LogDestination::Console,
            dialect: DatabaseDialect::Oracle,
            lock_timeout: Duration::from_millis(5000),
            error_threshold: 10,
        }
    }
}

impl AgentConfig {

    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a property lookup. Missing or unparsable values keep their defaults.
    pub fn from_properties<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AgentConfig::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string());

        let mut cfg = defaults.clone();
        cfg.slow_threshold_ms = parse_or(get(KEY_SLOW_THRESHOLD_MS), defaults.slow_threshold_ms);
        cfg.log_sql_always = parse_bool_or(get(KEY_LOG_SQL_ALWAYS), defaults.log_sql_always);
        cfg.log_stack = parse_bool_or(get(KEY_LOG_STACK), defaults.log_stack);
        cfg.max_stack_depth = parse_or(get(KEY_MAX_STACK_DEPTH), defaults.max_stack_depth);
        cfg.compact_stack = parse_bool_or(get(KEY_COMPACT_STACK), defaults.compact_stack);
        cfg.lock_timeout = Duration::from_millis(parse_or(
            get(KEY_LOCK_TIMEOUT_MS),
            defaults.lock_timeout.as_millis() as u64,
        ));
        cfg.error_threshold = parse_or(get(KEY_ERROR_THRESHOLD), defaults.error_threshold);
        if let Some(filters) = get(KEY_STACK_FILTERS) {
            cfg.stack_filters = split_filters(&filters);
        }
        if let Some(destination) = get(KEY_STDOUT) {
            cfg.destination = LogDestination::parse(&destination);
        }
        if let Some(dialect) = get(KEY_DIALECT) {
            match dialect.parse::<DatabaseDialect>() {
                Ok(dialect) => cfg.dialect = dialect,
                Err(e) => tracing::warn!("{}, keeping {}", e, cfg.dialect.as_str()),
            }
        }
        cfg
    }

    /// Read `SQLMIRROR_*` environment variables (`sqlmirror.slowThresholdMs` -> `SQLMIRROR_SLOW_THRESHOLD_MS`).
    pub fn from_env() -> Self {
        Self::from_properties(|key| std::env::var(env_key(key)).ok())
    }

    pub fn set_slow_threshold_ms(mut self, slow_threshold_ms: u64) -> Self {
        self.slow_threshold_ms = slow_threshold_ms;
        self
    }

    pub fn slow_threshold_ms(&self) -> u64 {
        self.slow_threshold_ms
    }

    pub fn set_log_sql_always(mut self, log_sql_always: bool) -> Self {
        self.log_sql_always = log_sql_always;
        self
    }

    pub fn log_sql_always(&self) -> bool {
        self.log_sql_always
    }

    pub fn set_log_stack(mut self, log_stack: bool) -> Self {
        self.log_stack = log_stack;
        self
    }

    pub fn log_stack(&self) -> bool {
        self.log_stack
    }

    pub fn set_max_stack_depth(mut self, max_stack_depth: usize) -> Self {
        self.max_stack_depth = max_stack_depth;
        self
    }

    pub fn max_stack_depth(&self) -> usize {
        self.max_stack_depth
    }

    pub fn set_stack_filters(mut self, stack_filters: Vec<String>) -> Self {
        self.stack_filters = stack_filters;
        self
    }

    pub fn stack_filters(&self) -> &[String] {
        &self.stack_filters
    }

    pub fn set_compact_stack(mut self, compact_stack: bool) -> Self {
        self.compact_stack = compact_stack;
        self
    }

    pub fn compact_stack(&self) -> bool {
        self.compact_stack
    }

    pub fn set_destination(mut self, destination: LogDestination) -> Self {
        self.destination = destination;
        self
    }

    pub fn destination(&self) -> &LogDestination {
        &self.destination
    }

    pub fn set_dialect(mut self, dialect: DatabaseDialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn dialect(&self) -> DatabaseDialect {
        self.dialect
    }

    pub fn set_lock_timeout(mut self, lock_timeout: Duration) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }

    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }

    pub fn set_error_threshold(mut self, error_threshold: u64) -> Self {
        self.error_threshold = error_threshold;
        self
    }

    pub fn error_threshold(&self) -> u64 {
        self.error_threshold
    }

    /// Startup configuration block.
    pub fn summary(&self) -> String {
        let filters = if self.stack_filters.is_empty() {
            "(none)".to_string()
        } else {
            self.stack_filters.join(",")
        };
        [
            "[SqlMirror] Configuration:".to_string(),
            format!("  slowThresholdMs = {}", self.slow_threshold_ms),
            format!("  logSqlAlways    = {}", self.log_sql_always),
            format!("  logStack        = {}", self.log_stack),
            format!("  maxStackDepth   = {}", self.max_stack_depth),
            format!("  stackFilters    = {}", filters),
            format!("  stdout          = {}", self.destination),
            format!("  dialect         = {}", self.dialect.as_str()),
        ]
        .join("\n")
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn parse_bool_or(value: Option<String>, default: bool) -> bool {
    match value {
        Some(v) => v.eq_ignore_ascii_case("true"),
        None => default,
    }
}

fn split_filters(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// `sqlmirror.slowThresholdMs` -> `SQLMIRROR_SLOW_THRESHOLD_MS`
fn env_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c == '.' {
            out.push('_');
        } else if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c);
        } else {
            out.push(c.to_ascii_uppercase());
        }
    }
    out
}
