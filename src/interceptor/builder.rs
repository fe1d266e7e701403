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

use std::sync::Arc;

use crate::config::AgentConfig;
use crate::errors::{MirrorError, Result};
use crate::interceptor::{LoggingInterceptor, StatementInterceptor};
use crate::policy::LogPolicy;
use crate::sink::{ConsoleTarget, SqlLogSink};

/// Interceptor builder
pub struct InterceptorBuilder {
    config: AgentConfig,
    sink: Option<Arc<SqlLogSink>>,
    policy: Option<Arc<dyn LogPolicy>>,
    console: Option<Arc<dyn ConsoleTarget>>,
}

impl Default for InterceptorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InterceptorBuilder {
    pub fn new() -> Self {
        Self {
            config: AgentConfig::default(),
            sink: None,
            policy: None,
            console: None,
        }
    }

    pub fn with_config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    /// Share an existing sink instead of building one from the config.
    pub fn with_sink(mut self, sink: Arc<SqlLogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Replace the config-backed policy.
    pub fn with_policy(mut self, policy: Arc<dyn LogPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Console used by a sink built here. Ignored when a sink is supplied.
    pub fn with_console(mut self, console: Arc<dyn ConsoleTarget>) -> Self {
        self.console = Some(console);
        self
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn build(self) -> Result<StatementInterceptor> {
        if self.sink.is_none() && self.config.lock_timeout().is_zero() {
            return Err(MirrorError::config_error("lock timeout must be greater than zero"));
        }
        let config = self.config;
        let sink = match (self.sink, self.console) {
            (Some(sink), _) => sink,
            (None, Some(console)) => Arc::new(
                SqlLogSink::with_console(config.destination().clone(), console)
                    .with_lock_timeout(config.lock_timeout())
                    .with_error_threshold(config.error_threshold()),
            ),
            (None, None) => Arc::new(SqlLogSink::from_config(&config)),
        };
        let dialect = config.dialect();
        let policy = self.policy.unwrap_or_else(|| Arc::new(config) as Arc<dyn LogPolicy>);
        let logger = LoggingInterceptor::new(sink, policy).with_dialect(dialect);
        Ok(StatementInterceptor::new(Arc::new(logger)))
    }
}

impl InterceptorBuilder {
    /// Development environment configuration
    pub fn development() -> Self {
        Self::new().with_config(
            AgentConfig::default()
                .set_log_sql_always(true)
                .set_log_stack(true)
                .set_compact_stack(false),
        )
    }

    /// Production environment configuration: only slow statements are logged.
    pub fn production() -> Self {
        Self::new().with_config(
            AgentConfig::default()
                .set_log_sql_always(false)
                .set_log_stack(false),
        )
    }
}
