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
#![allow(dead_code)]

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;

use sqlmirror::prelude::*;
use sqlmirror::{BoxedPlainStatement, BoxedStatement, MemoryConsole};

static TOOK: Lazy<Regex> = Lazy::new(|| Regex::new(r"took=\d+ms").unwrap());

/// Calls seen by the mock driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetValue(Slot, ParamValue),
    SetNull(Slot),
    ClearParameters,
    AddBatch,
    Execute,
    ExecuteQuery,
    ExecuteUpdate,
    ExecuteBatch,
    Plain(String),
    PlainAddBatch(String),
    PlainClearBatch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MockError(pub String);

impl fmt::Display for MockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for MockError {}

#[derive(Debug, Default)]
pub struct MockStatement {
    calls: Mutex<Vec<Call>>,
    pending_batch: Mutex<usize>,
    fail_with: Option<String>,
    delay: Option<Duration>,
}

impl MockStatement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every execute call fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self { fail_with: Some(message.to_string()), ..Self::default() }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay: Some(delay), ..Self::default() }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    fn run(&self, call: Call) -> Result<(), MockError> {
        self.record(call);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        match &self.fail_with {
            Some(message) => Err(MockError(message.clone())),
            None => Ok(()),
        }
    }
}

impl PreparedStatement for MockStatement {
    type Rows = Vec<String>;
    type Error = MockError;

    fn set_value(&self, slot: &Slot, value: &ParamValue) -> Result<(), MockError> {
        self.record(Call::SetValue(slot.clone(), value.clone()));
        Ok(())
    }

    fn set_null(&self, slot: &Slot) -> Result<(), MockError> {
        self.record(Call::SetNull(slot.clone()));
        Ok(())
    }

    fn clear_parameters(&self) -> Result<(), MockError> {
        self.record(Call::ClearParameters);
        Ok(())
    }

    fn add_batch(&self) -> Result<(), MockError> {
        self.record(Call::AddBatch);
        *self.pending_batch.lock() += 1;
        Ok(())
    }

    fn execute(&self) -> Result<bool, MockError> {
        self.run(Call::Execute).map(|_| true)
    }

    fn execute_query(&self) -> Result<Vec<String>, MockError> {
        self.run(Call::ExecuteQuery).map(|_| vec!["row".to_string()])
    }

    fn execute_update(&self) -> Result<u64, MockError> {
        self.run(Call::ExecuteUpdate).map(|_| 1)
    }

    fn execute_batch(&self) -> Result<Vec<u64>, MockError> {
        let pending = std::mem::take(&mut *self.pending_batch.lock());
        self.run(Call::ExecuteBatch).map(|_| vec![1; pending])
    }
}

#[derive(Debug, Default)]
pub struct MockPlainStatement {
    calls: Mutex<Vec<Call>>,
    pending_batch: Mutex<usize>,
}

impl MockPlainStatement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }
}

impl Statement for MockPlainStatement {
    type Rows = Vec<String>;
    type Error = MockError;

    fn execute(&self, sql: &str) -> Result<bool, MockError> {
        self.calls.lock().push(Call::Plain(sql.to_string()));
        Ok(true)
    }

    fn execute_query(&self, sql: &str) -> Result<Vec<String>, MockError> {
        self.calls.lock().push(Call::Plain(sql.to_string()));
        Ok(Vec::new())
    }

    fn execute_update(&self, sql: &str) -> Result<u64, MockError> {
        self.calls.lock().push(Call::Plain(sql.to_string()));
        Ok(2)
    }

    fn add_batch(&self, sql: &str) -> Result<(), MockError> {
        self.calls.lock().push(Call::PlainAddBatch(sql.to_string()));
        *self.pending_batch.lock() += 1;
        Ok(())
    }

    fn clear_batch(&self) -> Result<(), MockError> {
        self.calls.lock().push(Call::PlainClearBatch);
        *self.pending_batch.lock() = 0;
        Ok(())
    }

    fn execute_batch(&self) -> Result<Vec<u64>, MockError> {
        let pending = std::mem::take(&mut *self.pending_batch.lock());
        Ok(vec![1; pending])
    }
}

pub fn boxed(statement: MockStatement) -> BoxedStatement<Vec<String>, MockError> {
    Box::new(statement)
}

pub fn boxed_plain(statement: MockPlainStatement) -> BoxedPlainStatement<Vec<String>, MockError> {
    Box::new(statement)
}

/// Interceptor logging to an in-memory console.
pub fn interceptor(config: AgentConfig) -> (StatementInterceptor, Arc<MemoryConsole>) {
    let console = Arc::new(MemoryConsole::new());
    let interceptor = InterceptorBuilder::new()
        .with_config(config.set_destination(LogDestination::Console))
        .with_console(console.clone())
        .build()
        .expect("interceptor");
    (interceptor, console)
}

/// Console lines with the elapsed time replaced by `X`.
pub fn sql_lines(console: &MemoryConsole) -> Vec<String> {
    console
        .out_lines()
        .iter()
        .map(|line| TOOK.replace_all(line, "took=Xms").into_owned())
        .collect()
}
