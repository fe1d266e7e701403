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
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Execute-family operations that get timed and logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementOperation {
    Execute,
    ExecuteQuery,
    ExecuteUpdate,
    ExecuteLargeUpdate,
    ExecuteBatch,
    ExecuteLargeBatch,
}

impl StatementOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementOperation::Execute => "execute",
            StatementOperation::ExecuteQuery => "executeQuery",
            StatementOperation::ExecuteUpdate => "executeUpdate",
            StatementOperation::ExecuteLargeUpdate => "executeLargeUpdate",
            StatementOperation::ExecuteBatch => "executeBatch",
            StatementOperation::ExecuteLargeBatch => "executeLargeBatch",
        }
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, StatementOperation::ExecuteBatch | StatementOperation::ExecuteLargeBatch)
    }
}

impl fmt::Display for StatementOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Execution context
pub struct ExecuteContext {
    /// Raw SQL of the handle, `None` for plain statements without one.
    sql: Option<Arc<str>>,

    operation: StatementOperation,

    start_time: Instant,

    /// Set by [`ExecuteContext::finish`].
    elapsed: Option<Duration>,
}

impl ExecuteContext {
    /// Start timing now.
    pub fn new(sql: Option<Arc<str>>, operation: StatementOperation) -> Self {
        ExecuteContext {
            sql,
            operation,
            start_time: Instant::now(),
            elapsed: None,
        }
    }

    pub fn finish(&mut self) {
        self.elapsed = Some(self.start_time.elapsed());
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed.unwrap_or_else(|| self.start_time.elapsed())
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    pub fn sql(&self) -> Option<&str> {
        self.sql.as_deref()
    }

    pub fn operation(&self) -> StatementOperation {
        self.operation
    }
}

impl fmt::Debug for ExecuteContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecuteContext")
            .field("sql", &self.sql)
            .field("operation", &self.operation)
            .field("elapsed_ms", &self.elapsed_ms())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_freezes_elapsed() {
        let mut ctx = ExecuteContext::new(Some(Arc::from("SELECT 1")), StatementOperation::ExecuteQuery);
        std::thread::sleep(Duration::from_millis(5));
        ctx.finish();
        let first = ctx.elapsed();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(ctx.elapsed(), first);
        assert!(ctx.elapsed_ms() >= 5);
        assert_eq!(ctx.sql(), Some("SELECT 1"));
    }

    #[test]
    fn test_batch_operations() {
        assert!(StatementOperation::ExecuteBatch.is_batch());
        assert!(StatementOperation::ExecuteLargeBatch.is_batch());
        assert!(!StatementOperation::ExecuteUpdate.is_batch());
        assert_eq!(StatementOperation::ExecuteLargeUpdate.to_string(), "executeLargeUpdate");
    }
}
