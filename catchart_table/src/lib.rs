// Copyright 2025 the Catchart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data tables and stacking for categorical charts.
//!
//! This crate provides:
//! - a columnar [`DataTable`] keyed by string data keys, with typed cells, and
//! - borrowed [`TableWindow`] views over a contiguous, inclusive row range, and
//! - a full-recompute stacking transform ([`stack_columns`]) with the usual
//!   baseline offsets.
//!
//! Everything here is a pure computation over owned or borrowed data; chart
//! layout lives in `catchart`.

#![no_std]

extern crate alloc;

mod stack;
mod table;

pub use stack::{StackOffset, StackSpan, stack_columns};
pub use table::{DataTable, TableError, TableWindow, Value};
