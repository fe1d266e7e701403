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
//! Entry points for the statement hook.
//!
//! ```ignore
//! let interceptor = StatementInterceptor::global();
//! let stmt = interceptor.wrap_prepared(conn.prepare(sql)?, sql);
//! stmt.set_int(1, 42)?;
//! stmt.execute_query()?; // [SQL] (took=3ms) SELECT * FROM users WHERE id = 42
//! ```
//!
use std::sync::Arc;
use once_cell::sync::OnceCell;

mod builder;
mod logging;

pub use builder::InterceptorBuilder;
pub use logging::LoggingInterceptor;

use crate::config::AgentConfig;
use crate::errors::Result;
use crate::sink::SqlLogSink;
use crate::statement::{
    BoxedPlainStatement, BoxedStatement, LoggedPlainStatement, LoggedStatement, PreparedStatement, Statement,
};

static GLOBAL_INTERCEPTOR: OnceCell<StatementInterceptor> = OnceCell::new();

/// Wraps statement handles so their executions are logged as literal SQL.
#[derive(Debug, Clone)]
pub struct StatementInterceptor {
    logger: Arc<LoggingInterceptor>,
}

impl StatementInterceptor {
    pub fn new(logger: Arc<LoggingInterceptor>) -> Self {
        Self { logger }
    }

    pub fn builder() -> InterceptorBuilder {
        InterceptorBuilder::new()
    }

    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        InterceptorBuilder::new().with_config(config.clone()).build()
    }

    /// Process-wide interceptor over [`crate::config`] and [`SqlLogSink::global`].
    pub fn global() -> &'static StatementInterceptor {
        GLOBAL_INTERCEPTOR.get_or_init(|| {
            let config = crate::config();
            let logger = LoggingInterceptor::new(SqlLogSink::global(), Arc::new(config.clone()))
                .with_dialect(config.dialect());
            StatementInterceptor::new(Arc::new(logger))
        })
    }

    pub fn logger(&self) -> &Arc<LoggingInterceptor> {
        &self.logger
    }

    /// Wrap a concrete handle, keeping its type reachable through `Deref`.
    ///
    /// An already instrumented handle gets a forwarding wrapper, so every
    /// execution is still logged once.
    pub fn instrument<S: PreparedStatement>(&self, statement: S, sql: Option<&str>) -> LoggedStatement<S> {
        LoggedStatement::new(statement, sql, self.logger.clone())
    }

    pub fn instrument_plain<S: Statement>(&self, statement: S) -> LoggedPlainStatement<S> {
        LoggedPlainStatement::new(statement, self.logger.clone())
    }

    /// Hook for a freshly prepared statement. Already wrapped handles come back as they are.
    pub fn wrap_prepared<R: 'static, E: 'static>(&self, statement: BoxedStatement<R, E>, sql: &str) -> BoxedStatement<R, E> {
        if statement.is_instrumented() {
            return statement;
        }
        tracing::trace!(target: "sqlmirror::sql", "wrapping prepared statement: {}", sql);
        Box::new(self.instrument(statement, Some(sql)))
    }

    /// Hook for a callable statement. Named bindings arrive as [`sqlmirror_core::Slot::Name`].
    pub fn wrap_callable<R: 'static, E: 'static>(&self, statement: BoxedStatement<R, E>, sql: &str) -> BoxedStatement<R, E> {
        self.wrap_prepared(statement, sql)
    }

    pub fn wrap_plain<R: 'static, E: 'static>(&self, statement: BoxedPlainStatement<R, E>) -> BoxedPlainStatement<R, E> {
        if statement.is_instrumented() {
            return statement;
        }
        Box::new(self.instrument_plain(statement))
    }
}
