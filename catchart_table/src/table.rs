// Copyright 2025 the Catchart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owned columnar table and borrowed row windows.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;

/// A single table cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// A numeric cell.
    Number(f64),
    /// A text cell (typically a category label).
    Text(Arc<str>),
    /// No value for this row.
    #[default]
    Missing,
}

impl Value {
    /// Returns the numeric value if this cell is a finite number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    /// Returns the text if this cell is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` for [`Value::Missing`].
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Equality used for category lookup: numbers compare by value, text by content.
    ///
    /// Unlike `PartialEq`, `NaN` never matches and `Missing` never matches anything.
    pub fn same_category(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::Missing => Ok(()),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Option<f64>> for Value {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Missing, Self::Number)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value.into())
    }
}

/// Errors returned when building a [`DataTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A column with the same data key already exists.
    DuplicateColumn(String),
    /// A column does not have the same number of rows as the table.
    LengthMismatch {
        /// The offending data key.
        key: String,
        /// Row count of the table.
        expected: usize,
        /// Row count of the rejected column.
        got: usize,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateColumn(key) => write!(f, "duplicate column `{key}`"),
            Self::LengthMismatch { key, expected, got } => write!(
                f,
                "column `{key}` has {got} rows but the table has {expected}"
            ),
        }
    }
}

impl core::error::Error for TableError {}

/// An owned columnar table.
///
/// Rows are addressed by index; columns by data key. All columns have the same
/// length, fixed by the first column added.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataTable {
    row_count: usize,
    keys: Vec<Arc<str>>,
    columns: Vec<Vec<Value>>,
    index: HashMap<Arc<str>, usize>,
}

impl DataTable {
    /// Creates an empty table with no columns and no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column and returns the table (builder form of [`DataTable::push_column`]).
    pub fn with_column<V: Into<Value>>(
        mut self,
        key: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self, TableError> {
        self.push_column(key, values)?;
        Ok(self)
    }

    /// Adds a numeric column.
    pub fn with_numbers(
        self,
        key: &str,
        values: impl IntoIterator<Item = f64>,
    ) -> Result<Self, TableError> {
        self.with_column(key, values)
    }

    /// Adds a column of values under `key`.
    pub fn push_column<V: Into<Value>>(
        &mut self,
        key: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Result<(), TableError> {
        if self.index.contains_key(key) {
            return Err(TableError::DuplicateColumn(key.into()));
        }
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if self.columns.is_empty() {
            self.row_count = values.len();
        } else if values.len() != self.row_count {
            return Err(TableError::LengthMismatch {
                key: key.into(),
                expected: self.row_count,
                got: values.len(),
            });
        }
        let key: Arc<str> = key.into();
        self.index.insert(key.clone(), self.columns.len());
        self.keys.push(key);
        self.columns.push(values);
        Ok(())
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Returns the data keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|k| &**k)
    }

    /// Returns a full column.
    pub fn column(&self, key: &str) -> Option<&[Value]> {
        let i = *self.index.get(key)?;
        self.columns.get(i).map(Vec::as_slice)
    }

    /// Returns a single cell.
    pub fn value(&self, row: usize, key: &str) -> Option<&Value> {
        self.column(key)?.get(row)
    }

    /// Returns a single finite numeric cell.
    pub fn f64(&self, row: usize, key: &str) -> Option<f64> {
        self.value(row, key)?.as_f64()
    }

    /// Returns a view of rows `start..=end`, or `None` if the range is not valid.
    pub fn window(&self, start: usize, end: usize) -> Option<TableWindow<'_>> {
        if start > end || end >= self.row_count {
            return None;
        }
        Some(TableWindow {
            table: self,
            start,
            len: end - start + 1,
        })
    }

    /// Returns a view of every row.
    pub fn full_window(&self) -> TableWindow<'_> {
        TableWindow {
            table: self,
            start: 0,
            len: self.row_count,
        }
    }
}

/// A borrowed, contiguous range of table rows.
///
/// Row indices passed to a window are relative to the window start.
#[derive(Clone, Copy, Debug)]
pub struct TableWindow<'a> {
    table: &'a DataTable,
    start: usize,
    len: usize,
}

impl<'a> TableWindow<'a> {
    /// Returns the underlying table.
    pub fn table(&self) -> &'a DataTable {
        self.table
    }

    /// Index of the first row of this window within the table.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Index of the last row of this window within the table (inclusive).
    ///
    /// Equal to `start` for an empty window.
    pub fn end(&self) -> usize {
        (self.start + self.len).saturating_sub(1).max(self.start)
    }

    /// Number of rows in the window.
    pub fn row_count(&self) -> usize {
        self.len
    }

    /// Returns `true` if the window has no rows.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the windowed slice of a column.
    pub fn column(&self, key: &str) -> Option<&'a [Value]> {
        self.table.column(key)?.get(self.start..self.start + self.len)
    }

    /// Returns a cell at a window-relative row.
    pub fn value(&self, row: usize, key: &str) -> Option<&'a Value> {
        self.column(key)?.get(row)
    }

    /// Returns a finite numeric cell at a window-relative row.
    pub fn f64(&self, row: usize, key: &str) -> Option<f64> {
        self.value(row, key)?.as_f64()
    }
}
