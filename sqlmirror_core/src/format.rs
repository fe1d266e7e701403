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
//! Literal SQL reconstruction.
//!

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use crate::{DatabaseDialect, LiteralDialect, NamedParams, ParamValue, PositionalParams};

/// `:identifier` tokens. Matched over the whole text, literals included.
static NAMED_PARAM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r":([A-Za-z0-9_]+)").expect("named parameter pattern is valid")
});

/// Rewrites a parameterized statement into the literal text sent to the database.
#[derive(Clone, Copy)]
pub struct SqlFormatter {
    dialect: &'static dyn LiteralDialect,
}

impl Default for SqlFormatter {
    fn default() -> Self {
        Self::new(DatabaseDialect::default())
    }
}

impl std::fmt::Debug for SqlFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlFormatter")
            .field("dialect", &self.dialect.name())
            .finish()
    }
}

impl SqlFormatter {
    pub fn new(dialect: DatabaseDialect) -> Self {
        Self { dialect: dialect.literal_dialect() }
    }

    /// Use a custom dialect. It must outlive every formatter built from it.
    pub fn with_dialect(dialect: &'static dyn LiteralDialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> &'static dyn LiteralDialect {
        self.dialect
    }

    /// Replace `?` placeholders in order, then `:name` tokens found in `named`.
    ///
    /// A missing statement renders as `NULL`. Placeholders inside single-quoted
    /// literals are left alone; a doubled `''` inside a literal is an escaped
    /// quote and does not close it.
    pub fn format(&self, sql: Option<&str>, positional: &PositionalParams, named: &NamedParams) -> String {
        let sql = match sql {
            Some(sql) => sql,
            None => return self.dialect.null(),
        };

        let result = self.replace_positional(sql, positional);
        if named.is_empty() {
            result
        } else {
            self.replace_named(&result, named)
        }
    }

    pub fn format_value(&self, value: Option<&ParamValue>) -> String {
        self.dialect.format_value(value)
    }

    fn replace_positional(&self, sql: &str, params: &PositionalParams) -> String {
        if params.is_empty() {
            return sql.to_string();
        }

        let bytes = sql.as_bytes();
        let mut out = String::with_capacity(sql.len() + params.len() * 8);
        let mut index = 1;
        let mut copied = 0;
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'\'' => {
                    i = end_of_literal(bytes, i);
                }
                b'?' => {
                    out.push_str(&sql[copied..i]);
                    out.push_str(&self.dialect.format_value(params.get(&index)));
                    index += 1;
                    i += 1;
                    copied = i;
                }
                _ => i += 1,
            }
        }
        out.push_str(&sql[copied..]);
        out
    }

    fn replace_named(&self, sql: &str, params: &NamedParams) -> String {
        NAMED_PARAM
            .replace_all(sql, |caps: &Captures| match params.get(&caps[1]) {
                Some(value) => self.dialect.format_value(Some(value)),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

/// Index just past the literal opened at `start`, or the end of input if unterminated.
fn end_of_literal(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        if bytes[i] == b'\'' {
            if bytes.get(i + 1) == Some(&b'\'') {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}

/// Format with the default (Oracle) dialect.
pub fn format_sql(sql: Option<&str>, positional: &PositionalParams, named: &NamedParams) -> String {
    SqlFormatter::default().format(sql, positional, named)
}

/// Render one value with the default (Oracle) dialect.
pub fn format_value(value: Option<&ParamValue>) -> String {
    SqlFormatter::default().format_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn positional(values: Vec<(usize, ParamValue)>) -> PositionalParams {
        values.into_iter().collect()
    }

    fn named(values: Vec<(&str, ParamValue)>) -> NamedParams {
        values.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_simple_indexed_parameters() {
        let params = positional(vec![(1, 123.into()), (2, "alice".into())]);
        let result = format_sql(Some("SELECT * FROM users WHERE id = ? AND name = ?"), &params, &NamedParams::new());
        assert_eq!(result, "SELECT * FROM users WHERE id = 123 AND name = 'alice'");
    }

    #[test]
    fn test_null_and_absent_render_as_null() {
        let params = positional(vec![(1, "bob".into()), (2, ParamValue::Null)]);
        let result = format_sql(Some("INSERT INTO users (name, email, phone) VALUES (?, ?, ?)"), &params, &NamedParams::new());
        assert_eq!(result, "INSERT INTO users (name, email, phone) VALUES ('bob', NULL, NULL)");
    }

    #[test]
    fn test_string_with_single_quotes() {
        let params = positional(vec![(1, "O'Brien".into())]);
        let result = format_sql(Some("INSERT INTO users (name) VALUES (?)"), &params, &NamedParams::new());
        assert_eq!(result, "INSERT INTO users (name) VALUES ('O''Brien')");
    }

    #[test]
    fn test_timestamp_and_date() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(10, 30, 0).unwrap();
        let params = positional(vec![(1, ts.into()), (2, ts.date().into())]);
        let result = format_sql(Some("SELECT * FROM events WHERE created_at > ? AND event_date = ?"), &params, &NamedParams::new());
        assert_eq!(
            result,
            "SELECT * FROM events WHERE created_at > TO_TIMESTAMP('2024-01-15 10:30:00', 'YYYY-MM-DD HH24:MI:SS') \
             AND event_date = TO_DATE('2024-01-15', 'YYYY-MM-DD')"
        );
    }

    #[test]
    fn test_zoned_timestamp_uses_utc_components() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(10, 30, 0).unwrap().and_utc();
        assert_eq!(
            format_value(Some(&ParamValue::Timestamp(ts))),
            "TO_TIMESTAMP('2024-01-15 10:30:00', 'YYYY-MM-DD HH24:MI:SS')"
        );
    }

    #[test]
    fn test_time_is_anchored_to_epoch() {
        let time = NaiveTime::from_hms_opt(23, 59, 1).unwrap();
        assert_eq!(
            format_value(Some(&ParamValue::Time(time))),
            "TO_TIMESTAMP('1970-01-01 23:59:01', 'YYYY-MM-DD HH24:MI:SS')"
        );
    }

    #[test]
    fn test_byte_array_parameter() {
        let params = positional(vec![(1, vec![0xDEu8, 0xAD, 0xBE, 0xEF].into())]);
        let result = format_sql(Some("INSERT INTO files (data) VALUES (?)"), &params, &NamedParams::new());
        assert_eq!(result, "INSERT INTO files (data) VALUES (X'DEADBEEF')");
        assert_eq!(format_value(Some(&ParamValue::Blob(vec![0x00, 0x0f]))), "X'000F'");
    }

    #[test]
    fn test_named_parameters() {
        let names = named(vec![("userId", 42.into()), ("status", "active".into())]);
        let result = format_sql(
            Some("SELECT * FROM users WHERE id = :userId AND status = :status"),
            &PositionalParams::new(),
            &names,
        );
        assert_eq!(result, "SELECT * FROM users WHERE id = 42 AND status = 'active'");
    }

    #[test]
    fn test_named_parameter_missing_key_is_untouched() {
        let names = named(vec![("y", 1.into())]);
        let result = format_sql(Some("SELECT * FROM t WHERE id=:x AND k=:y"), &PositionalParams::new(), &names);
        assert_eq!(result, "SELECT * FROM t WHERE id=:x AND k=1");

        let result = format_sql(Some("SELECT * FROM t WHERE id=:x"), &PositionalParams::new(), &NamedParams::new());
        assert_eq!(result, "SELECT * FROM t WHERE id=:x");
    }

    #[test]
    fn test_named_explicit_null_is_replaced() {
        let names = named(vec![("x", ParamValue::Null)]);
        let result = format_sql(Some("UPDATE t SET a = :x"), &PositionalParams::new(), &names);
        assert_eq!(result, "UPDATE t SET a = NULL");
    }

    #[test]
    fn test_question_mark_inside_literal_is_kept() {
        let params = positional(vec![(1, 42.into())]);
        let result = format_sql(Some("SELECT * FROM users WHERE status = '?' AND id = ?"), &params, &NamedParams::new());
        assert_eq!(result, "SELECT * FROM users WHERE status = '?' AND id = 42");
    }

    #[test]
    fn test_escaped_quote_keeps_literal_open() {
        let params = positional(vec![(1, 7.into())]);
        let result = format_sql(Some("SELECT 'it''s ?' AS s, ? AS n"), &params, &NamedParams::new());
        assert_eq!(result, "SELECT 'it''s ?' AS s, 7 AS n");
    }

    #[test]
    fn test_unterminated_literal_swallows_rest() {
        let params = positional(vec![(1, 1.into())]);
        let result = format_sql(Some("SELECT ? FROM t WHERE a = 'open ?"), &params, &NamedParams::new());
        assert_eq!(result, "SELECT 1 FROM t WHERE a = 'open ?");
    }

    #[test]
    fn test_placeholders_consumed_in_order_not_by_key() {
        // Slot 2 is missing, so the second `?` renders NULL and slot 3 is still used for the third.
        let params = positional(vec![(1, 1.into()), (3, 3.into()), (4, 4.into())]);
        let result = format_sql(Some("VALUES (?, ?, ?)"), &params, &NamedParams::new());
        assert_eq!(result, "VALUES (1, NULL, 3)");
    }

    #[test]
    fn test_empty_params_leave_sql_untouched() {
        let result = format_sql(Some("SELECT * FROM users WHERE id = ?"), &PositionalParams::new(), &NamedParams::new());
        assert_eq!(result, "SELECT * FROM users WHERE id = ?");
    }

    #[test]
    fn test_missing_sql_renders_null() {
        assert_eq!(format_sql(None, &PositionalParams::new(), &NamedParams::new()), "NULL");
    }

    #[test]
    fn test_multibyte_text_survives() {
        let params = positional(vec![(1, "ĐÀ Nẵng".into())]);
        let result = format_sql(Some("SELECT 'ü?' , ? -- ✓"), &params, &NamedParams::new());
        assert_eq!(result, "SELECT 'ü?' , 'ĐÀ Nẵng' -- ✓");
    }

    #[test]
    fn test_format_value_directly() {
        assert_eq!(format_value(None), "NULL");
        assert_eq!(format_value(Some(&ParamValue::Null)), "NULL");
        assert_eq!(format_value(Some(&"hello".into())), "'hello'");
        assert_eq!(format_value(Some(&42.into())), "42");
        assert_eq!(format_value(Some(&2.5f64.into())), "2.5");
        assert_eq!(format_value(Some(&true.into())), "true");
        assert_eq!(format_value(Some(&'a'.into())), "'a'");
        assert_eq!(format_value(Some(&ParamValue::other("x'y"))), "'x''y'");
    }

    #[test]
    fn test_ansi_formatter() {
        let formatter = SqlFormatter::new(DatabaseDialect::Ansi);
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let params = positional(vec![(1, date.into())]);
        assert_eq!(
            formatter.format(Some("SELECT * FROM e WHERE d = ?"), &params, &NamedParams::new()),
            "SELECT * FROM e WHERE d = DATE '2024-01-15'"
        );
    }
}
