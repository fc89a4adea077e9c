// Copyright 2025 the Catchart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data window selection.

use core::fmt;

/// Which charts a window change applies to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AffectedCharts {
    /// The originating chart and every synchronized peer.
    #[default]
    All,
    /// Only the originating chart; nothing is published.
    SelfOnly,
    /// Only the synchronized peers; the originating chart keeps its window.
    Others,
}

/// Errors returned for an invalid data window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowError {
    /// The table has no rows, so no window exists.
    EmptyData,
    /// `start` is after `end`.
    StartAfterEnd {
        /// Requested start row.
        start: usize,
        /// Requested end row.
        end: usize,
    },
    /// An index is outside the table.
    OutOfBounds {
        /// Offending index.
        index: usize,
        /// Table row count.
        len: usize,
    },
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyData => f.write_str("no data rows to window"),
            Self::StartAfterEnd { start, end } => {
                write!(f, "window start {start} is after end {end}")
            }
            Self::OutOfBounds { index, len } => {
                write!(f, "window index {index} out of bounds for {len} rows")
            }
        }
    }
}

impl core::error::Error for WindowError {}

/// An inclusive range of table rows currently in view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BrushWindow {
    /// First visible row.
    pub start_index: usize,
    /// Last visible row (inclusive).
    pub end_index: usize,
}

impl BrushWindow {
    /// The window covering every row of a table with `len` rows.
    ///
    /// Returns `None` when `len == 0`.
    pub fn full(len: usize) -> Option<Self> {
        let end_index = len.checked_sub(1)?;
        Some(Self {
            start_index: 0,
            end_index,
        })
    }

    /// Builds a window after checking `0 <= start <= end < len`.
    pub fn validate(start: usize, end: usize, len: usize) -> Result<Self, WindowError> {
        if len == 0 {
            return Err(WindowError::EmptyData);
        }
        if start > end {
            return Err(WindowError::StartAfterEnd { start, end });
        }
        if end >= len {
            return Err(WindowError::OutOfBounds { index: end, len });
        }
        Ok(Self {
            start_index: start,
            end_index: end,
        })
    }

    /// Number of rows in the window.
    pub fn len(&self) -> usize {
        self.end_index - self.start_index + 1
    }

    /// Always `false`: a window holds at least one row.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns `true` if table row `row` is inside the window.
    pub fn contains(&self, row: usize) -> bool {
        (self.start_index..=self.end_index).contains(&row)
    }
}

/// A declared brush control.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrushDeclaration {
    /// Height of the brush strip in pixels.
    pub height: f64,
    /// Whether the brush overlays the plot instead of taking space below it.
    pub overlay: bool,
    /// Which charts a drag applies to.
    pub affected_charts: AffectedCharts,
    /// Initial first row; defaults to `0`.
    pub start_index: Option<usize>,
    /// Initial last row; defaults to the last table row.
    pub end_index: Option<usize>,
}

impl Default for BrushDeclaration {
    fn default() -> Self {
        Self {
            height: 40.0,
            overlay: false,
            affected_charts: AffectedCharts::All,
            start_index: None,
            end_index: None,
        }
    }
}

impl BrushDeclaration {
    /// Creates a brush with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the strip height.
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height.max(0.0);
        self
    }

    /// Draws the brush on top of the plot.
    pub fn with_overlay(mut self, overlay: bool) -> Self {
        self.overlay = overlay;
        self
    }

    /// Sets which charts a drag applies to.
    pub fn with_affected_charts(mut self, affected: AffectedCharts) -> Self {
        self.affected_charts = affected;
        self
    }

    /// Sets the initial window.
    pub fn with_initial_window(mut self, start: usize, end: usize) -> Self {
        self.start_index = Some(start);
        self.end_index = Some(end);
        self
    }

    /// Resolves the initial window against a table of `len` rows.
    ///
    /// Falls back to the full range when the declared indices are not valid.
    pub(crate) fn initial_window(&self, len: usize) -> Option<BrushWindow> {
        let full = BrushWindow::full(len)?;
        let start = self.start_index.unwrap_or(full.start_index);
        let end = self.end_index.unwrap_or(full.end_index);
        match BrushWindow::validate(start, end, len) {
            Ok(window) => Some(window),
            Err(err) => {
                log::warn!("ignoring initial brush window: {err}");
                Some(full)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn validate_checks_bounds() {
        assert_eq!(BrushWindow::validate(0, 0, 0), Err(WindowError::EmptyData));
        assert_eq!(
            BrushWindow::validate(3, 2, 5),
            Err(WindowError::StartAfterEnd { start: 3, end: 2 })
        );
        assert_eq!(
            BrushWindow::validate(1, 5, 5),
            Err(WindowError::OutOfBounds { index: 5, len: 5 })
        );
        let w = BrushWindow::validate(1, 3, 5).expect("valid window");
        assert_eq!(w.len(), 3);
        assert!(w.contains(3));
        assert!(!w.contains(4));
    }

    #[test]
    fn initial_window_falls_back_to_full_range() {
        let brush = BrushDeclaration::new().with_initial_window(2, 9);
        assert_eq!(brush.initial_window(4), BrushWindow::full(4));
        let brush = BrushDeclaration::new().with_initial_window(1, 2);
        assert_eq!(
            brush.initial_window(4),
            Some(BrushWindow {
                start_index: 1,
                end_index: 2
            })
        );
        assert_eq!(brush.initial_window(0), None);
    }
}
