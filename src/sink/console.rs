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

use std::io::{self, Write};
use parking_lot::Mutex;

/// Console streams a sink falls back to. `out` carries SQL lines, `err` diagnostics.
pub trait ConsoleTarget: Send + Sync {
    fn out(&self, line: &str) -> io::Result<()>;

    fn err(&self, line: &str) -> io::Result<()>;
}

/// Process stdout / stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdConsole;

impl ConsoleTarget for StdConsole {
    fn out(&self, line: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        stdout.flush()
    }

    fn err(&self, line: &str) -> io::Result<()> {
        let mut stderr = io::stderr().lock();
        writeln!(stderr, "{}", line)?;
        stderr.flush()
    }
}

/// Collects console output in memory.
#[derive(Debug, Default)]
pub struct MemoryConsole {
    out: Mutex<Vec<String>>,
    err: Mutex<Vec<String>>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn out_lines(&self) -> Vec<String> {
        self.out.lock().clone()
    }

    pub fn err_lines(&self) -> Vec<String> {
        self.err.lock().clone()
    }

    pub fn clear(&self) {
        self.out.lock().clear();
        self.err.lock().clear();
    }
}

impl ConsoleTarget for MemoryConsole {
    fn out(&self, line: &str) -> io::Result<()> {
        self.out.lock().push(line.to_string());
        Ok(())
    }

    fn err(&self, line: &str) -> io::Result<()> {
        self.err.lock().push(line.to_string());
        Ok(())
    }
}
