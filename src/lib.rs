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

//! SqlMirror logs the literal SQL behind parameterized statements.
//!
//! A statement hook wraps every prepared, callable or plain statement handle.
//! Bindings are recorded as they happen, and each execution is written to the
//! log sink with every placeholder replaced by its bound value.
//!
//! ## Usage.
//!
//! Put the desired version of the crate into the `dependencies` section of your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! sqlmirror = "0.1.0"
//! ```
//!
//! ## Configuration.
//!
//! * ```SQLMIRROR_SLOW_THRESHOLD_MS``` - slow statement cutoff, default 5000
//! * ```SQLMIRROR_LOG_SQL_ALWAYS``` - log every statement, default true
//! * ```SQLMIRROR_LOG_STACK``` - add a `[STACK]` line, default false
//! * ```SQLMIRROR_MAX_STACK_DEPTH``` - frames in the `[STACK]` line, default 10
//! * ```SQLMIRROR_STACK_FILTERS``` - comma separated module prefixes kept in the stack
//! * ```SQLMIRROR_STDOUT``` - `console` or a file path
//! * ```SQLMIRROR_DIALECT``` - `oracle` or `ansi`
//!
//! ## Example
//!
//! ```ignore
//! use sqlmirror::prelude::*;
//!
//! sqlmirror::init(AgentConfig::from_env().set_log_stack(true));
//!
//! let sql = "SELECT * FROM orders WHERE id = ? AND status = ?";
//! let stmt = StatementInterceptor::global().wrap_prepared(conn.prepare(sql)?, sql);
//! stmt.set_long(1, 1001)?;
//! stmt.set_string(2, "PAID")?;
//! let rows = stmt.execute_query()?;
//! // [SQL] (took=4ms) SELECT * FROM orders WHERE id = 1001 AND status = 'PAID'
//! ```
//!
mod capture;
mod comm;
mod config;
mod errors;
mod interceptor;
mod policy;
mod sink;
mod stack;
mod statement;

pub mod prelude;

use once_cell::sync::OnceCell;

#[doc(inline)]
pub use capture::{BatchSnapshot, CaptureState};
#[doc(inline)]
pub use comm::{ExecuteContext, StatementOperation};
#[doc(inline)]
pub use config::*;
#[doc(inline)]
pub use errors::{MirrorError, Result};
#[doc(inline)]
pub use interceptor::{InterceptorBuilder, LoggingInterceptor, StatementInterceptor};
#[doc(inline)]
pub use policy::LogPolicy;
#[doc(inline)]
pub use sink::*;
#[doc(inline)]
pub use stack::{capture_frames, parse_backtrace, render as render_stack, render_current as render_current_stack, StackFrame};
#[doc(inline)]
pub use statement::*;

pub use sqlmirror_core as core;

pub use sqlmirror_core::*;

static GLOBAL_CONFIG: OnceCell<AgentConfig> = OnceCell::new();

/// Install the process-wide configuration.
///
/// Returns false when a configuration is already in place, either from an
/// earlier call or because a global sink or interceptor was used first.
pub fn init(config: AgentConfig) -> bool {
    let summary = config.summary();
    match GLOBAL_CONFIG.set(config) {
        Ok(()) => {
            tracing::info!(target: "sqlmirror", "{}", summary);
            true
        }
        Err(_) => {
            tracing::warn!(target: "sqlmirror", "configuration already initialized, ignoring init");
            false
        }
    }
}

/// The process-wide configuration, read from the environment if [`init`] was never called.
pub fn config() -> &'static AgentConfig {
    GLOBAL_CONFIG.get_or_init(AgentConfig::from_env)
}
