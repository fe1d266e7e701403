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
//! Caller stack rendering for the `[STACK]` line.
//!

use std::backtrace::Backtrace;
use once_cell::sync::Lazy;
use regex::Regex;

static FRAME_SYMBOL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\d+:\s+(.+?)\s*$").expect("valid frame regex"));
static FRAME_LOCATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*at\s+(.+?)\s*$").expect("valid location regex"));
static SYMBOL_HASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"::h[0-9a-f]{16}$").expect("valid hash regex"));

/// Frames from these crates are never shown.
const SKIPPED_PREFIXES: [&str; 6] = ["sqlmirror::", "sqlmirror_core::", "std::", "core::", "alloc::", "backtrace"];

const RUNTIME_PREFIXES: [&str; 3] = ["std::", "core::", "alloc::"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    pub symbol: String,
    pub location: Option<String>,
}

impl StackFrame {
    pub fn new<S: Into<String>>(symbol: S, location: Option<String>) -> Self {
        StackFrame { symbol: symbol.into(), location }
    }

    fn path(&self) -> &str {
        self.symbol.trim_start_matches('<')
    }

    fn is_internal(&self) -> bool {
        let path = self.path();
        !path.contains("::") || SKIPPED_PREFIXES.iter().any(|p| path.starts_with(p)) || self.is_runtime_shim()
    }

    /// `<T as core::ops::FnOnce>::call_once` style frames whose self type is
    /// not an application path (fn pointers, closures, references, generics).
    fn is_runtime_shim(&self) -> bool {
        let qualified = match self.symbol.strip_prefix('<') {
            Some(rest) => rest,
            None => return false,
        };
        let (self_ty, tr) = match qualified.split_once(" as ") {
            Some(parts) => parts,
            None => return false,
        };
        if !RUNTIME_PREFIXES.iter().any(|p| tr.starts_with(p)) {
            return false;
        }
        let head = self_ty.split(|c: char| c == '<' || c == ' ').next().unwrap_or_default();
        !head.contains("::") || head.starts_with("fn(") || head.ends_with("{{closure}}")
    }

    fn matches(&self, filters: &[String]) -> bool {
        filters.is_empty() || filters.iter().any(|f| self.path().starts_with(f.as_str()))
    }

    fn text(&self) -> String {
        match &self.location {
            Some(location) => format!("{} ({})", self.symbol, location),
            None => self.symbol.clone(),
        }
    }
}

/// Parse the frames of the current thread's stack.
pub fn capture_frames() -> Vec<StackFrame> {
    parse_backtrace(&Backtrace::force_capture().to_string())
}

pub fn parse_backtrace(text: &str) -> Vec<StackFrame> {
    let mut frames: Vec<StackFrame> = Vec::new();
    for line in text.lines() {
        if let Some(caps) = FRAME_SYMBOL.captures(line) {
            let symbol = SYMBOL_HASH.replace(&caps[1], "").into_owned();
            frames.push(StackFrame::new(symbol, None));
        } else if let Some(caps) = FRAME_LOCATION.captures(line) {
            if let Some(last) = frames.last_mut() {
                if last.location.is_none() {
                    last.location = Some(caps[1].to_string());
                }
            }
        }
    }
    frames
}

/// Render application frames, at most `max_depth` of them.
///
/// Compact output joins frames with ` <- ` on one line; otherwise every frame
/// gets its own `    at ` line. Truncation is marked with `...`.
pub fn render(frames: &[StackFrame], max_depth: usize, filters: &[String], compact: bool) -> String {
    let mut shown: Vec<String> = Vec::new();
    let mut truncated = false;
    for frame in frames.iter().filter(|f| !f.is_internal() && f.matches(filters)) {
        if shown.len() >= max_depth {
            truncated = true;
            break;
        }
        shown.push(frame.text());
    }
    if shown.is_empty() {
        return String::new();
    }
    if compact {
        let mut out = shown.join(" <- ");
        if truncated {
            out.push_str(" ...");
        }
        out
    } else {
        let mut out = shown
            .iter()
            .map(|f| format!("    at {}", f))
            .collect::<Vec<_>>()
            .join("\n");
        if truncated {
            out.push_str("\n    ...");
        }
        out
    }
}

/// Capture and render in one step.
pub fn render_current(max_depth: usize, filters: &[String], compact: bool) -> String {
    render(&capture_frames(), max_depth, filters, compact)
}
