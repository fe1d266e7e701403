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
//! Common Errors.
//!
use std::fmt;
use std::time::Duration;

/// Failures raised by the observation side (capture, formatting, sink).
///
/// Errors of the wrapped statement never pass through this type: they are the
/// statement's own `Error` and reach the caller untouched.
#[derive(Debug)]
pub enum MirrorError {
    Io(std::io::Error),
    LockTimeout(Duration),
    Config(String),
    Observation(String),
}

impl MirrorError {
    pub fn config_error<T: Into<String>>(err: T) -> Self {
        Self::Config(err.into())
    }

    pub fn observation_error<T: Into<String>>(err: T) -> Self {
        Self::Observation(err.into())
    }
}

impl fmt::Display for MirrorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MirrorError::Io(err) => write!(f, "IO Error: {}", err),
            MirrorError::LockTimeout(d) => write!(f, "Lock timeout after {} ms", d.as_millis()),
            MirrorError::Config(err) => write!(f, "Config Error: {}", err),
            MirrorError::Observation(err) => write!(f, "Observation Error: {}", err),
        }
    }
}

impl std::error::Error for MirrorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MirrorError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MirrorError {
    fn from(err: std::io::Error) -> Self {
        MirrorError::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, MirrorError>;
