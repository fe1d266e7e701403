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
//! Literal rendering strategies.
//!

use std::fmt::Write;
use std::str::FromStr;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use crate::{FormatError, ParamValue};

/// Renders a bound value as SQL literal text for one database family.
///
/// Only the date/time forms differ between dialects; quoting, numbers,
/// booleans and blobs share the default rendering.
pub trait LiteralDialect: Send + Sync {
    fn name(&self) -> &'static str;

    fn date(&self, date: &NaiveDate) -> String;

    fn time(&self, time: &NaiveTime) -> String;

    fn timestamp(&self, timestamp: &NaiveDateTime) -> String;

    fn null(&self) -> String {
        "NULL".to_string()
    }

    fn string(&self, s: &str) -> String {
        format!("'{}'", s.replace('\'', "''"))
    }

    fn boolean(&self, b: bool) -> String {
        b.to_string()
    }

    fn blob(&self, bytes: &[u8]) -> String {
        let mut out = String::with_capacity(bytes.len() * 2 + 3);
        out.push_str("X'");
        for b in bytes {
            // Writing into a String cannot fail.
            let _ = write!(out, "{:02X}", b);
        }
        out.push('\'');
        out
    }

    /// `None` is an unbound slot; it renders exactly like an explicit null.
    fn format_value(&self, value: Option<&ParamValue>) -> String {
        let value = match value {
            Some(value) => value,
            None => return self.null(),
        };
        match value {
            ParamValue::Null => self.null(),
            ParamValue::Text(s) => self.string(s),
            ParamValue::Char(c) => self.string(&c.to_string()),
            ParamValue::Bool(b) => self.boolean(*b),
            ParamValue::Tinyint(n) => n.to_string(),
            ParamValue::Smallint(n) => n.to_string(),
            ParamValue::Int(n) => n.to_string(),
            ParamValue::Bigint(n) => n.to_string(),
            ParamValue::Float(n) => n.to_string(),
            ParamValue::Double(n) => n.to_string(),
            ParamValue::BigDecimal(n) => n.to_string(),
            ParamValue::Date(d) => self.date(d),
            ParamValue::Time(t) => self.time(t),
            ParamValue::DateTime(dt) => self.timestamp(dt),
            ParamValue::Timestamp(ts) => self.timestamp(&ts.naive_utc()),
            ParamValue::Blob(bytes) => self.blob(bytes),
            ParamValue::Uuid(uuid) => self.string(&uuid.to_string()),
            ParamValue::Json(json) => self.string(&json.to_string()),
            ParamValue::Other(s) => self.string(s),
        }
    }
}

/// `TO_TIMESTAMP` / `TO_DATE` rendering. This is the default dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleDialect;

impl LiteralDialect for OracleDialect {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn date(&self, date: &NaiveDate) -> String {
        format!("TO_DATE('{}', 'YYYY-MM-DD')", date.format("%Y-%m-%d"))
    }

    // Time-only values are anchored to the epoch date.
    fn time(&self, time: &NaiveTime) -> String {
        format!(
            "TO_TIMESTAMP('1970-01-01 {}', 'YYYY-MM-DD HH24:MI:SS')",
            time.format("%H:%M:%S")
        )
    }

    fn timestamp(&self, timestamp: &NaiveDateTime) -> String {
        format!(
            "TO_TIMESTAMP('{}', 'YYYY-MM-DD HH24:MI:SS')",
            timestamp.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

/// ANSI typed literals: `DATE '…'`, `TIME '…'`, `TIMESTAMP '…'`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiDialect;

impl LiteralDialect for AnsiDialect {
    fn name(&self) -> &'static str {
        "ansi"
    }

    fn date(&self, date: &NaiveDate) -> String {
        format!("DATE '{}'", date.format("%Y-%m-%d"))
    }

    fn time(&self, time: &NaiveTime) -> String {
        format!("TIME '{}'", time.format("%H:%M:%S"))
    }

    fn timestamp(&self, timestamp: &NaiveDateTime) -> String {
        format!("TIMESTAMP '{}'", timestamp.format("%Y-%m-%d %H:%M:%S"))
    }
}

static ORACLE: OracleDialect = OracleDialect;
static ANSI: AnsiDialect = AnsiDialect;

/// Selector for the built-in dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DatabaseDialect {
    #[default]
    Oracle,
    Ansi,
}

impl DatabaseDialect {
    pub fn literal_dialect(&self) -> &'static dyn LiteralDialect {
        match self {
            DatabaseDialect::Oracle => &ORACLE,
            DatabaseDialect::Ansi => &ANSI,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.literal_dialect().name()
    }
}

impl FromStr for DatabaseDialect {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "oracle" => Ok(DatabaseDialect::Oracle),
            "ansi" | "standard" => Ok(DatabaseDialect::Ansi),
            other => Err(FormatError::unknown_dialect(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_date_forms() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let time = NaiveTime::from_hms_opt(10, 30, 0).unwrap();
        assert_eq!(OracleDialect.date(&date), "TO_DATE('2024-01-15', 'YYYY-MM-DD')");
        assert_eq!(
            OracleDialect.time(&time),
            "TO_TIMESTAMP('1970-01-01 10:30:00', 'YYYY-MM-DD HH24:MI:SS')"
        );
        assert_eq!(
            OracleDialect.timestamp(&date.and_time(time)),
            "TO_TIMESTAMP('2024-01-15 10:30:00', 'YYYY-MM-DD HH24:MI:SS')"
        );
    }

    #[test]
    fn test_ansi_date_forms() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let time = NaiveTime::from_hms_opt(8, 5, 9).unwrap();
        assert_eq!(AnsiDialect.date(&date), "DATE '2024-01-15'");
        assert_eq!(AnsiDialect.time(&time), "TIME '08:05:09'");
        assert_eq!(AnsiDialect.timestamp(&date.and_time(time)), "TIMESTAMP '2024-01-15 08:05:09'");
    }

    #[test]
    fn test_fractional_seconds_are_dropped() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_milli_opt(10, 30, 0, 750)
            .unwrap();
        assert_eq!(
            OracleDialect.format_value(Some(&ParamValue::DateTime(ts))),
            "TO_TIMESTAMP('2024-01-15 10:30:00', 'YYYY-MM-DD HH24:MI:SS')"
        );
    }

    #[test]
    fn test_floats_use_shortest_decimal_text() {
        assert_eq!(OracleDialect.format_value(Some(&ParamValue::Double(2.0))), "2");
        assert_eq!(OracleDialect.format_value(Some(&ParamValue::Double(0.1))), "0.1");
        assert_eq!(OracleDialect.format_value(Some(&ParamValue::Double(1e21))), "1000000000000000000000");
        assert_eq!(AnsiDialect.format_value(Some(&ParamValue::Float(-1.5))), "-1.5");
    }

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("Oracle".parse::<DatabaseDialect>(), Ok(DatabaseDialect::Oracle));
        assert_eq!(" ansi ".parse::<DatabaseDialect>(), Ok(DatabaseDialect::Ansi));
        assert_eq!(
            "db2".parse::<DatabaseDialect>(),
            Err(FormatError::UnknownDialect("db2".to_string()))
        );
        assert_eq!(DatabaseDialect::default().as_str(), "oracle");
    }
}
