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
//! Pure building blocks: parameter values, slots and the literal SQL formatter.
//!

#![deny(clippy::all)]

mod dialect;
mod error;
mod format;
mod param;
mod value;

#[doc(inline)]
pub use dialect::*;
#[doc(inline)]
pub use error::*;
#[doc(inline)]
pub use format::*;
#[doc(inline)]
pub use param::*;
#[doc(inline)]
pub use value::*;

pub use bigdecimal::BigDecimal;
pub use chrono;
pub use serde_json;
pub use uuid::Uuid;
