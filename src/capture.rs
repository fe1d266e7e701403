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
//! Per-statement record of bound parameters and batch snapshots.
//!

use std::sync::Arc;
use dashmap::DashMap;
use parking_lot::Mutex;
use sqlmirror_core::{NamedParams, ParamValue, PositionalParams, Slot};

/// Immutable copy of the positional bindings taken at one `add_batch`.
pub type BatchSnapshot = Arc<PositionalParams>;

/// Bindings of one statement handle. Last write per slot wins.
#[derive(Debug, Default)]
pub struct CaptureState {
    positional: DashMap<usize, ParamValue>,
    named: DashMap<String, ParamValue>,
    batches: Mutex<Vec<BatchSnapshot>>,
}

impl CaptureState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&self, slot: &Slot, value: ParamValue) {
        match slot {
            Slot::Index(index) => {
                self.positional.insert(*index, value);
            }
            Slot::Name(name) => {
                self.named.insert(name.clone(), value);
            }
        }
    }

    /// Record that the caller explicitly bound NULL.
    pub fn bind_null(&self, slot: &Slot) {
        self.bind(slot, ParamValue::Null);
    }

    /// `None` means the slot was never bound (or was cleared).
    pub fn get(&self, slot: &Slot) -> Option<ParamValue> {
        match slot {
            Slot::Index(index) => self.positional.get(index).map(|v| v.value().clone()),
            Slot::Name(name) => self.named.get(name).map(|v| v.value().clone()),
        }
    }

    pub fn is_bound(&self, slot: &Slot) -> bool {
        match slot {
            Slot::Index(index) => self.positional.contains_key(index),
            Slot::Name(name) => self.named.contains_key(name),
        }
    }

    /// Drop positional and named bindings. Batch snapshots are kept.
    pub fn clear(&self) {
        self.positional.clear();
        self.named.clear();
    }

    /// Snapshot the positional bindings as the next batch entry, returning the batch size.
    pub fn add_batch(&self) -> usize {
        let snapshot = Arc::new(self.positional());
        let mut batches = self.batches.lock();
        batches.push(snapshot);
        batches.len()
    }

    pub fn batch_len(&self) -> usize {
        self.batches.lock().len()
    }

    pub fn first_batch(&self) -> Option<BatchSnapshot> {
        self.batches.lock().first().cloned()
    }

    pub fn batches(&self) -> Vec<BatchSnapshot> {
        self.batches.lock().clone()
    }

    pub fn clear_batches(&self) {
        self.batches.lock().clear();
    }

    pub fn positional(&self) -> PositionalParams {
        self.positional
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect()
    }

    pub fn named(&self) -> NamedParams {
        self.named
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}
