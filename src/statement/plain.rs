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

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::comm::{ExecuteContext, StatementOperation};
use crate::interceptor::LoggingInterceptor;

/// A plain, non-parameterized statement handle. SQL arrives with each call.
pub trait Statement {
    type Rows;
    type Error;

    fn execute(&self, sql: &str) -> Result<bool, Self::Error>;

    fn execute_query(&self, sql: &str) -> Result<Self::Rows, Self::Error>;

    fn execute_update(&self, sql: &str) -> Result<u64, Self::Error>;

    fn execute_large_update(&self, sql: &str) -> Result<u64, Self::Error> {
        self.execute_update(sql)
    }

    fn add_batch(&self, sql: &str) -> Result<(), Self::Error>;

    fn clear_batch(&self) -> Result<(), Self::Error>;

    fn execute_batch(&self) -> Result<Vec<u64>, Self::Error>;

    fn is_instrumented(&self) -> bool {
        false
    }
}

impl<T: Statement + ?Sized> Statement for Box<T> {
    type Rows = T::Rows;
    type Error = T::Error;

    fn execute(&self, sql: &str) -> Result<bool, Self::Error> {
        (**self).execute(sql)
    }

    fn execute_query(&self, sql: &str) -> Result<Self::Rows, Self::Error> {
        (**self).execute_query(sql)
    }

    fn execute_update(&self, sql: &str) -> Result<u64, Self::Error> {
        (**self).execute_update(sql)
    }

    fn execute_large_update(&self, sql: &str) -> Result<u64, Self::Error> {
        (**self).execute_large_update(sql)
    }

    fn add_batch(&self, sql: &str) -> Result<(), Self::Error> {
        (**self).add_batch(sql)
    }

    fn clear_batch(&self) -> Result<(), Self::Error> {
        (**self).clear_batch()
    }

    fn execute_batch(&self) -> Result<Vec<u64>, Self::Error> {
        (**self).execute_batch()
    }

    fn is_instrumented(&self) -> bool {
        (**self).is_instrumented()
    }
}

pub type BoxedPlainStatement<R, E> = Box<dyn Statement<Rows = R, Error = E> + Send + Sync>;

/// Plain statement with SQL logging. Its SQL is already literal.
pub struct LoggedPlainStatement<S> {
    inner: S,
    logger: Arc<LoggingInterceptor>,
    passthrough: bool,
}

impl<S: Statement> LoggedPlainStatement<S> {
    pub fn new(inner: S, logger: Arc<LoggingInterceptor>) -> Self {
        let passthrough = inner.is_instrumented();
        if passthrough {
            tracing::warn!(target: "sqlmirror::sql", "plain statement is already instrumented, forwarding without logging");
        }
        LoggedPlainStatement { inner, logger, passthrough }
    }

    pub fn is_logging(&self) -> bool {
        !self.passthrough
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn timed<T, F>(&self, sql: &str, operation: StatementOperation, call: F) -> Result<T, S::Error>
    where
        F: FnOnce(&S) -> Result<T, S::Error>,
    {
        if self.passthrough {
            return call(&self.inner);
        }
        let mut ctx = ExecuteContext::new(Some(Arc::from(sql)), operation);
        let result = call(&self.inner);
        ctx.finish();
        self.logger.after_plain_execute(&ctx);
        result
    }
}

impl<S: Statement> Statement for LoggedPlainStatement<S> {
    type Rows = S::Rows;
    type Error = S::Error;

    fn execute(&self, sql: &str) -> Result<bool, Self::Error> {
        self.timed(sql, StatementOperation::Execute, |s| s.execute(sql))
    }

    fn execute_query(&self, sql: &str) -> Result<Self::Rows, Self::Error> {
        self.timed(sql, StatementOperation::ExecuteQuery, |s| s.execute_query(sql))
    }

    fn execute_update(&self, sql: &str) -> Result<u64, Self::Error> {
        self.timed(sql, StatementOperation::ExecuteUpdate, |s| s.execute_update(sql))
    }

    fn execute_large_update(&self, sql: &str) -> Result<u64, Self::Error> {
        self.timed(sql, StatementOperation::ExecuteLargeUpdate, |s| s.execute_large_update(sql))
    }

    fn add_batch(&self, sql: &str) -> Result<(), Self::Error> {
        self.inner.add_batch(sql)
    }

    fn clear_batch(&self) -> Result<(), Self::Error> {
        self.inner.clear_batch()
    }

    fn execute_batch(&self) -> Result<Vec<u64>, Self::Error> {
        if self.passthrough {
            return self.inner.execute_batch();
        }
        let mut ctx = ExecuteContext::new(None, StatementOperation::ExecuteBatch);
        let result = self.inner.execute_batch();
        ctx.finish();
        self.logger.after_plain_batch(&ctx);
        result
    }

    fn is_instrumented(&self) -> bool {
        true
    }
}

impl<S> Deref for LoggedPlainStatement<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.inner
    }
}

impl<S> DerefMut for LoggedPlainStatement<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.inner
    }
}
