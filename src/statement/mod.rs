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
//! Statement handles and their logging wrappers.
//!
//! A driver exposes its handles through [`PreparedStatement`] (prepared and
//! callable) or [`Statement`] (plain SQL). The logged wrappers record every
//! binding, forward each call to the real handle and, around the execute
//! family, time the call and emit the literal SQL.
//!
mod plain;

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlmirror_core::{BigDecimal, IntoParamValue, ParamValue, Slot};

pub use plain::*;

use crate::capture::CaptureState;
use crate::comm::{ExecuteContext, StatementOperation};
use crate::interceptor::LoggingInterceptor;

/// A prepared or callable statement handle.
///
/// Methods take `&self`; handles shared across threads keep their own
/// interior locking.
pub trait PreparedStatement {
    type Rows;
    type Error;

    fn set_value(&self, slot: &Slot, value: &ParamValue) -> Result<(), Self::Error>;

    fn set_null(&self, slot: &Slot) -> Result<(), Self::Error>;

    fn clear_parameters(&self) -> Result<(), Self::Error>;

    fn add_batch(&self) -> Result<(), Self::Error>;

    fn execute(&self) -> Result<bool, Self::Error>;

    fn execute_query(&self) -> Result<Self::Rows, Self::Error>;

    fn execute_update(&self) -> Result<u64, Self::Error>;

    fn execute_large_update(&self) -> Result<u64, Self::Error> {
        self.execute_update()
    }

    fn execute_batch(&self) -> Result<Vec<u64>, Self::Error>;

    fn execute_large_batch(&self) -> Result<Vec<u64>, Self::Error> {
        self.execute_batch()
    }

    /// True for handles already wrapped by [`LoggedStatement`].
    fn is_instrumented(&self) -> bool {
        false
    }
}

impl<T: PreparedStatement + ?Sized> PreparedStatement for Box<T> {
    type Rows = T::Rows;
    type Error = T::Error;

    fn set_value(&self, slot: &Slot, value: &ParamValue) -> Result<(), Self::Error> {
        (**self).set_value(slot, value)
    }

    fn set_null(&self, slot: &Slot) -> Result<(), Self::Error> {
        (**self).set_null(slot)
    }

    fn clear_parameters(&self) -> Result<(), Self::Error> {
        (**self).clear_parameters()
    }

    fn add_batch(&self) -> Result<(), Self::Error> {
        (**self).add_batch()
    }

    fn execute(&self) -> Result<bool, Self::Error> {
        (**self).execute()
    }

    fn execute_query(&self) -> Result<Self::Rows, Self::Error> {
        (**self).execute_query()
    }

    fn execute_update(&self) -> Result<u64, Self::Error> {
        (**self).execute_update()
    }

    fn execute_large_update(&self) -> Result<u64, Self::Error> {
        (**self).execute_large_update()
    }

    fn execute_batch(&self) -> Result<Vec<u64>, Self::Error> {
        (**self).execute_batch()
    }

    fn execute_large_batch(&self) -> Result<Vec<u64>, Self::Error> {
        (**self).execute_large_batch()
    }

    fn is_instrumented(&self) -> bool {
        (**self).is_instrumented()
    }
}

/// Boxed handle as passed through the hook entry points.
pub type BoxedStatement<R, E> = Box<dyn PreparedStatement<Rows = R, Error = E> + Send + Sync>;

/// Typed setters on top of [`PreparedStatement::set_value`].
pub trait PreparedStatementExt: PreparedStatement {
    fn set_object<V>(&self, slot: impl Into<Slot>, value: &V) -> Result<(), Self::Error>
    where
        V: IntoParamValue + ?Sized,
    {
        self.set_value(&slot.into(), &value.into_param_value())
    }

    fn set_boolean(&self, slot: impl Into<Slot>, value: bool) -> Result<(), Self::Error> {
        self.set_value(&slot.into(), &ParamValue::Bool(value))
    }

    fn set_int(&self, slot: impl Into<Slot>, value: i32) -> Result<(), Self::Error> {
        self.set_value(&slot.into(), &ParamValue::Int(value))
    }

    fn set_long(&self, slot: impl Into<Slot>, value: i64) -> Result<(), Self::Error> {
        self.set_value(&slot.into(), &ParamValue::Bigint(value))
    }

    fn set_double(&self, slot: impl Into<Slot>, value: f64) -> Result<(), Self::Error> {
        self.set_value(&slot.into(), &ParamValue::Double(value))
    }

    fn set_decimal(&self, slot: impl Into<Slot>, value: BigDecimal) -> Result<(), Self::Error> {
        self.set_value(&slot.into(), &ParamValue::BigDecimal(value))
    }

    fn set_string(&self, slot: impl Into<Slot>, value: &str) -> Result<(), Self::Error> {
        self.set_value(&slot.into(), &ParamValue::Text(value.to_string()))
    }

    fn set_bytes(&self, slot: impl Into<Slot>, value: &[u8]) -> Result<(), Self::Error> {
        self.set_value(&slot.into(), &ParamValue::Blob(value.to_vec()))
    }

    fn set_date(&self, slot: impl Into<Slot>, value: NaiveDate) -> Result<(), Self::Error> {
        self.set_value(&slot.into(), &ParamValue::Date(value))
    }

    fn set_time(&self, slot: impl Into<Slot>, value: NaiveTime) -> Result<(), Self::Error> {
        self.set_value(&slot.into(), &ParamValue::Time(value))
    }

    fn set_timestamp(&self, slot: impl Into<Slot>, value: NaiveDateTime) -> Result<(), Self::Error> {
        self.set_value(&slot.into(), &ParamValue::DateTime(value))
    }

    fn set_timestamp_utc(&self, slot: impl Into<Slot>, value: DateTime<Utc>) -> Result<(), Self::Error> {
        self.set_value(&slot.into(), &ParamValue::Timestamp(value))
    }
}

impl<T: PreparedStatement + ?Sized> PreparedStatementExt for T {}

/// Prepared or callable statement with SQL logging.
///
/// Wrapping a handle that is already instrumented yields a pass-through
/// wrapper: calls are forwarded and nothing is captured or logged twice.
pub struct LoggedStatement<S> {
    inner: S,
    sql: Option<Arc<str>>,
    state: CaptureState,
    logger: Arc<LoggingInterceptor>,
    passthrough: bool,
}

impl<S: PreparedStatement> LoggedStatement<S> {
    pub fn new(inner: S, sql: Option<&str>, logger: Arc<LoggingInterceptor>) -> Self {
        let passthrough = inner.is_instrumented();
        if passthrough {
            tracing::warn!(target: "sqlmirror::sql", "statement is already instrumented, forwarding without logging");
        }
        LoggedStatement {
            inner,
            sql: sql.map(Arc::from),
            state: CaptureState::new(),
            logger,
            passthrough,
        }
    }

    /// False when this wrapper only forwards to an instrumented handle.
    pub fn is_logging(&self) -> bool {
        !self.passthrough
    }

    pub fn sql(&self) -> Option<&str> {
        self.sql.as_deref()
    }

    pub fn capture(&self) -> &CaptureState {
        &self.state
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn timed<T, F>(&self, operation: StatementOperation, call: F) -> Result<T, S::Error>
    where
        F: FnOnce(&S) -> Result<T, S::Error>,
    {
        if self.passthrough {
            return call(&self.inner);
        }
        let mut ctx = ExecuteContext::new(self.sql.clone(), operation);
        let result = call(&self.inner);
        ctx.finish();
        self.logger.after_execute(&ctx, &self.state);
        result
    }

    fn observe<F: FnOnce()>(&self, context: &str, work: F) {
        if !self.passthrough {
            self.logger.guard(context, work);
        }
    }

    fn timed_batch<F>(&self, operation: StatementOperation, call: F) -> Result<Vec<u64>, S::Error>
    where
        F: FnOnce(&S) -> Result<Vec<u64>, S::Error>,
    {
        if self.passthrough {
            return call(&self.inner);
        }
        let mut ctx = ExecuteContext::new(self.sql.clone(), operation);
        let result = call(&self.inner);
        ctx.finish();
        self.logger.after_execute_batch(&ctx, &self.state);
        // Snapshots are dropped even when the policy suppressed the log line.
        self.state.clear_batches();
        result
    }
}

impl<S: PreparedStatement> PreparedStatement for LoggedStatement<S> {
    type Rows = S::Rows;
    type Error = S::Error;

    fn set_value(&self, slot: &Slot, value: &ParamValue) -> Result<(), Self::Error> {
        self.observe("capture binding", || self.state.bind(slot, value.clone()));
        self.inner.set_value(slot, value)
    }

    fn set_null(&self, slot: &Slot) -> Result<(), Self::Error> {
        self.observe("capture null binding", || self.state.bind_null(slot));
        self.inner.set_null(slot)
    }

    fn clear_parameters(&self) -> Result<(), Self::Error> {
        self.observe("clear bindings", || self.state.clear());
        self.inner.clear_parameters()
    }

    fn add_batch(&self) -> Result<(), Self::Error> {
        self.observe("snapshot batch", || {
            self.state.add_batch();
        });
        self.inner.add_batch()
    }

    fn execute(&self) -> Result<bool, Self::Error> {
        self.timed(StatementOperation::Execute, |s| s.execute())
    }

    fn execute_query(&self) -> Result<Self::Rows, Self::Error> {
        self.timed(StatementOperation::ExecuteQuery, |s| s.execute_query())
    }

    fn execute_update(&self) -> Result<u64, Self::Error> {
        self.timed(StatementOperation::ExecuteUpdate, |s| s.execute_update())
    }

    fn execute_large_update(&self) -> Result<u64, Self::Error> {
        self.timed(StatementOperation::ExecuteLargeUpdate, |s| s.execute_large_update())
    }

    fn execute_batch(&self) -> Result<Vec<u64>, Self::Error> {
        self.timed_batch(StatementOperation::ExecuteBatch, |s| s.execute_batch())
    }

    fn execute_large_batch(&self) -> Result<Vec<u64>, Self::Error> {
        self.timed_batch(StatementOperation::ExecuteLargeBatch, |s| s.execute_large_batch())
    }

    fn is_instrumented(&self) -> bool {
        true
    }
}

impl<S> Deref for LoggedStatement<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.inner
    }
}

impl<S> DerefMut for LoggedStatement<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.inner
    }
}

impl<S> std::fmt::Debug for LoggedStatement<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggedStatement")
            .field("sql", &self.sql)
            .field("state", &self.state)
            .field("passthrough", &self.passthrough)
            .finish()
    }
}
