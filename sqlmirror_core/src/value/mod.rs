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

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

mod to_value;

pub use to_value::*;

/// A value bound to one parameter slot of a statement.
///
/// An unbound slot is represented by the absence of a `ParamValue`
/// (`Option::None` at lookup time); `ParamValue::Null` is an explicit null
/// bound by the caller. Both render as `NULL`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ParamValue {
    #[default]
    Null,
    Bool(bool),
    Tinyint(i8),
    Smallint(i16),
    Int(i32),
    Bigint(i64),
    Float(f32),
    Double(f64),
    BigDecimal(BigDecimal),
    Char(char),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    /// Date and time without zone, rendered from its own components.
    DateTime(NaiveDateTime),
    /// Zoned instant, rendered from its UTC components.
    Timestamp(DateTime<Utc>),
    Blob(Vec<u8>),
    Uuid(Uuid),
    Json(JsonValue),
    /// Anything without a dedicated literal form, kept as its display text.
    Other(String),
}

impl ParamValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }

    /// Wrap any displayable value that has no dedicated variant.
    pub fn other<T: fmt::Display>(value: T) -> Self {
        ParamValue::Other(value.to_string())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Null => "null",
            ParamValue::Bool(_) => "bool",
            ParamValue::Tinyint(_) => "tinyint",
            ParamValue::Smallint(_) => "smallint",
            ParamValue::Int(_) => "int",
            ParamValue::Bigint(_) => "bigint",
            ParamValue::Float(_) => "float",
            ParamValue::Double(_) => "double",
            ParamValue::BigDecimal(_) => "decimal",
            ParamValue::Char(_) => "char",
            ParamValue::Text(_) => "text",
            ParamValue::Date(_) => "date",
            ParamValue::Time(_) => "time",
            ParamValue::DateTime(_) => "datetime",
            ParamValue::Timestamp(_) => "timestamp",
            ParamValue::Blob(_) => "blob",
            ParamValue::Uuid(_) => "uuid",
            ParamValue::Json(_) => "json",
            ParamValue::Other(_) => "other",
        }
    }
}

/// Plain display text, without any SQL quoting.
impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Null => write!(f, "null"),
            ParamValue::Bool(v) => write!(f, "{}", v),
            ParamValue::Tinyint(v) => write!(f, "{}", v),
            ParamValue::Smallint(v) => write!(f, "{}", v),
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Bigint(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Double(v) => write!(f, "{}", v),
            ParamValue::BigDecimal(v) => write!(f, "{}", v),
            ParamValue::Char(v) => write!(f, "{}", v),
            ParamValue::Text(v) => write!(f, "{}", v),
            ParamValue::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            ParamValue::Time(v) => write!(f, "{}", v.format("%H:%M:%S")),
            ParamValue::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
            ParamValue::Timestamp(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
            ParamValue::Blob(v) => write!(f, "BLOB({} bytes)", v.len()),
            ParamValue::Uuid(v) => write!(f, "{}", v),
            ParamValue::Json(v) => write!(f, "{}", v),
            ParamValue::Other(v) => write!(f, "{}", v),
        }
    }
}
