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

use crate::ParamValue;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value as JsonValue;
use uuid::Uuid;

pub trait IntoParamValue {
    fn into_param_value(&self) -> ParamValue;
}

// Implement conversion for base types
macro_rules! impl_into_param_value {
    ($($ty:ty => $variant:ident),*) => {
        $(
            impl IntoParamValue for $ty {
                fn into_param_value(&self) -> ParamValue {
                    ParamValue::$variant(self.to_owned())
                }
            }

            impl From<$ty> for ParamValue {
                fn from(v: $ty) -> Self {
                    ParamValue::$variant(v)
                }
            }
        )*
    };
}

macro_rules! impl_unsigned_to_value {
    ($ty:ty, $variant:ident, $target:ident) => {
        impl IntoParamValue for $ty {
            fn into_param_value(&self) -> ParamValue {
                ParamValue::$variant(*self as $target)
            }
        }

        impl From<$ty> for ParamValue {
            fn from(v: $ty) -> Self {
                ParamValue::$variant(v as $target)
            }
        }
    };
}

impl_unsigned_to_value!(u8, Smallint, i16);
impl_unsigned_to_value!(u16, Int, i32);
impl_unsigned_to_value!(u32, Bigint, i64);

impl_into_param_value! {
    bool => Bool,
    i8 => Tinyint,
    i16 => Smallint,
    i32 => Int,
    i64 => Bigint,
    f32 => Float,
    f64 => Double,
    BigDecimal => BigDecimal,
    char => Char,
    String => Text,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => DateTime,
    DateTime<Utc> => Timestamp,
    Vec<u8> => Blob,
    Uuid => Uuid,
    JsonValue => Json
}

// Values that overflow i64 keep their exact decimal text.
impl IntoParamValue for u64 {
    fn into_param_value(&self) -> ParamValue {
        ParamValue::BigDecimal(BigDecimal::from(*self))
    }
}

impl From<u64> for ParamValue {
    fn from(v: u64) -> Self {
        ParamValue::BigDecimal(BigDecimal::from(v))
    }
}

impl IntoParamValue for str {
    fn into_param_value(&self) -> ParamValue {
        ParamValue::Text(self.to_string())
    }
}

impl IntoParamValue for &str {
    fn into_param_value(&self) -> ParamValue {
        ParamValue::Text(self.to_string())
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl IntoParamValue for [u8] {
    fn into_param_value(&self) -> ParamValue {
        ParamValue::Blob(self.to_vec())
    }
}

impl IntoParamValue for &[u8] {
    fn into_param_value(&self) -> ParamValue {
        ParamValue::Blob(self.to_vec())
    }
}

impl From<&[u8]> for ParamValue {
    fn from(v: &[u8]) -> Self {
        ParamValue::Blob(v.to_vec())
    }
}

impl IntoParamValue for () {
    fn into_param_value(&self) -> ParamValue {
        ParamValue::Null
    }
}

impl IntoParamValue for ParamValue {
    fn into_param_value(&self) -> ParamValue {
        self.clone()
    }
}

// Option Type support
impl<T: IntoParamValue> IntoParamValue for Option<T> {
    fn into_param_value(&self) -> ParamValue {
        match self {
            Some(val) => val.into_param_value(),
            None => ParamValue::Null,
        }
    }
}

impl<T: IntoParamValue + ?Sized> IntoParamValue for Box<T> {
    fn into_param_value(&self) -> ParamValue {
        (**self).into_param_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_conversions() {
        assert_eq!(42i32.into_param_value(), ParamValue::Int(42));
        assert_eq!(7u8.into_param_value(), ParamValue::Smallint(7));
        assert_eq!("alice".into_param_value(), ParamValue::Text("alice".to_string()));
        assert_eq!(ParamValue::from(true), ParamValue::Bool(true));
        assert_eq!(ParamValue::from(u64::MAX).to_string(), u64::MAX.to_string());
    }

    #[test]
    fn test_option_maps_none_to_null() {
        let missing: Option<i64> = None;
        assert_eq!(missing.into_param_value(), ParamValue::Null);
        assert_eq!(Some(5i64).into_param_value(), ParamValue::Bigint(5));
    }

    #[test]
    fn test_bytes_become_blob() {
        let bytes: &[u8] = &[0xDE, 0xAD];
        assert_eq!(bytes.into_param_value(), ParamValue::Blob(vec![0xDE, 0xAD]));
        assert_eq!(ParamValue::from(vec![1u8]), ParamValue::Blob(vec![1]));
    }
}
