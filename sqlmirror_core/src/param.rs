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

use std::collections::HashMap;
use std::fmt;
use crate::ParamValue;

/// 1-based positional bindings.
pub type PositionalParams = HashMap<usize, ParamValue>;

/// Named bindings, keyed without the leading `:`.
pub type NamedParams = HashMap<String, ParamValue>;

/// Identity of one placeholder within a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Slot {
    /// 1-based `?` position.
    Index(usize),
    /// `:name` placeholder, stored without the colon.
    Name(String),
}

impl Slot {
    pub fn index(&self) -> Option<usize> {
        match self {
            Slot::Index(i) => Some(*i),
            Slot::Name(_) => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Slot::Index(_) => None,
            Slot::Name(n) => Some(n.as_str()),
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Slot::Name(_))
    }
}

impl From<usize> for Slot {
    fn from(index: usize) -> Self {
        Slot::Index(index)
    }
}

/// Negative indices clamp to 0, which never matches a `?`.
impl From<i32> for Slot {
    fn from(index: i32) -> Self {
        Slot::Index(index.max(0) as usize)
    }
}

impl From<&str> for Slot {
    fn from(name: &str) -> Self {
        Slot::Name(name.trim_start_matches(':').to_string())
    }
}

impl From<String> for Slot {
    fn from(name: String) -> Self {
        match name.strip_prefix(':') {
            Some(stripped) => Slot::Name(stripped.to_string()),
            None => Slot::Name(name),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Index(i) => write!(f, "#{}", i),
            Slot::Name(n) => write!(f, ":{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_from_name_strips_colon() {
        assert_eq!(Slot::from(":userId"), Slot::Name("userId".to_string()));
        assert_eq!(Slot::from("userId".to_string()), Slot::Name("userId".to_string()));
        assert_eq!(Slot::from(":x".to_string()).name(), Some("x"));
    }

    #[test]
    fn test_slot_accessors() {
        let slot = Slot::from(3usize);
        assert_eq!(slot.index(), Some(3));
        assert!(!slot.is_named());
        assert_eq!(slot.to_string(), "#3");
        assert_eq!(Slot::from("status").to_string(), ":status");
    }

    #[test]
    fn test_slot_from_int_literal() {
        assert_eq!(Slot::from(2), Slot::Index(2));
        assert_eq!(Slot::from(-1), Slot::Index(0));
    }
}
