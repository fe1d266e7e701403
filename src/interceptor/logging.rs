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

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use sqlmirror_core::{DatabaseDialect, NamedParams, PositionalParams, SqlFormatter};

use crate::capture::CaptureState;
use crate::comm::ExecuteContext;
use crate::errors::MirrorError;
use crate::policy::LogPolicy;
use crate::sink::SqlLogSink;
use crate::stack;

/// Formats executed statements and hands the lines to the sink.
///
/// Every hook runs inside [`LoggingInterceptor::guard`], so a failure here
/// shows up on the sink's error channel and nowhere else.
pub struct LoggingInterceptor {
    sink: Arc<SqlLogSink>,
    policy: Arc<dyn LogPolicy>,
    formatter: SqlFormatter,
}

impl LoggingInterceptor {
    pub fn new(sink: Arc<SqlLogSink>, policy: Arc<dyn LogPolicy>) -> Self {
        Self {
            sink,
            policy,
            formatter: SqlFormatter::default(),
        }
    }

    pub fn with_dialect(mut self, dialect: DatabaseDialect) -> Self {
        self.formatter = SqlFormatter::new(dialect);
        self
    }

    pub fn sink(&self) -> &Arc<SqlLogSink> {
        &self.sink
    }

    pub fn policy(&self) -> &Arc<dyn LogPolicy> {
        &self.policy
    }

    pub fn formatter(&self) -> &SqlFormatter {
        &self.formatter
    }

    /// Single execution of a prepared or callable statement.
    pub fn after_execute(&self, ctx: &ExecuteContext, state: &CaptureState) {
        self.guard("log statement", || {
            let elapsed = ctx.elapsed_ms();
            if !self.policy.should_log(elapsed) {
                return;
            }
            let sql = self.formatter.format(ctx.sql(), &state.positional(), &state.named());
            self.emit(ctx, &format!("[SQL] (took={}ms) {}", elapsed, sql));
            self.emit_stack(ctx);
        })
    }

    /// Batch execution. The example line uses the first snapshot.
    pub fn after_execute_batch(&self, ctx: &ExecuteContext, state: &CaptureState) {
        self.guard("log batch", || {
            let elapsed = ctx.elapsed_ms();
            if !self.policy.should_log(elapsed) {
                return;
            }
            match state.first_batch() {
                None => {
                    let sql = self.formatter.format(ctx.sql(), &state.positional(), &state.named());
                    self.emit(ctx, &format!("[SQL] (took={}ms) {}", elapsed, sql));
                }
                Some(first) => {
                    self.emit(ctx, &format!("[SQL] (took={}ms, batch={} statements)", elapsed, state.batch_len()));
                    let sql = self.formatter.format(ctx.sql(), &first, &state.named());
                    self.emit(ctx, &format!("[SQL] First batch item: {}", sql));
                }
            }
            self.emit_stack(ctx);
        })
    }

    /// Plain statement execution; its SQL is logged as given.
    pub fn after_plain_execute(&self, ctx: &ExecuteContext) {
        self.guard("log plain statement", || {
            let elapsed = ctx.elapsed_ms();
            if !self.policy.should_log(elapsed) {
                return;
            }
            let sql = self.formatter.format(ctx.sql(), &PositionalParams::new(), &NamedParams::new());
            self.emit(ctx, &format!("[SQL] (took={}ms) {}", elapsed, sql));
            self.emit_stack(ctx);
        })
    }

    pub fn after_plain_batch(&self, ctx: &ExecuteContext) {
        self.guard("log plain batch", || {
            let elapsed = ctx.elapsed_ms();
            if !self.policy.should_log(elapsed) {
                return;
            }
            self.emit(ctx, &format!("[SQL] (took={}ms) [BATCH execution via plain Statement]", elapsed));
            self.emit_stack(ctx);
        })
    }

    /// Run observation work. A panic inside is reported and swallowed.
    pub fn guard<F: FnOnce()>(&self, context: &str, work: F) {
        if let Err(panic) = catch_unwind(AssertUnwindSafe(work)) {
            let err = MirrorError::observation_error(panic_message(&*panic));
            tracing::warn!(target: "sqlmirror::sql", "{} failed: {}", context, err);
            self.sink.write_error(&format!("{} failed", context), Some(&err));
        }
    }

    fn emit(&self, ctx: &ExecuteContext, line: &str) {
        tracing::debug!(
            target: "sqlmirror::sql",
            elapsed_ms = ctx.elapsed_ms(),
            operation = ctx.operation().as_str(),
            "{}",
            line
        );
        self.sink.write_line(line);
    }

    fn emit_stack(&self, ctx: &ExecuteContext) {
        if !self.policy.is_log_stack() {
            return;
        }
        let trace = stack::render_current(
            self.policy.max_stack_depth(),
            self.policy.stack_filters(),
            self.policy.compact_stack(),
        );
        if !trace.is_empty() {
            self.emit(ctx, &format!("[STACK] {}", trace));
        }
    }
}

impl std::fmt::Debug for LoggingInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingInterceptor")
            .field("sink", &self.sink)
            .field("formatter", &self.formatter)
            .finish()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
