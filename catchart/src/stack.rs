// Copyright 2025 the Catchart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stack groups: series sharing a value axis and a stack id.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use alloc::vec::Vec;

use catchart_table::{DataTable, StackOffset, StackSpan, stack_columns};

use crate::brush::BrushWindow;
use crate::declaration::{AxisId, AxisKind, SeriesDeclaration};

/// Series stacked together, with their accumulated spans.
#[derive(Clone, Debug, PartialEq)]
pub struct StackGroup {
    /// Shared stack id, `None` for an unstacked series.
    pub stack_id: Option<Arc<str>>,
    /// Whether the group is an actual stack (as opposed to one unstacked series).
    pub has_stack: bool,
    /// Member series, in declaration order.
    pub series: Vec<SeriesDeclaration>,
    /// Per series, per table row: the `(start, end)` span in data units.
    pub stacked: Vec<Vec<StackSpan>>,
}

impl StackGroup {
    /// Returns the spans of the series with data key `key`.
    pub fn spans_of(&self, key: &str) -> Option<&[StackSpan]> {
        let i = self.series.iter().position(|s| &*s.data_key == key)?;
        self.stacked.get(i).map(Vec::as_slice)
    }

    /// Min/max over the accumulated spans of the rows in `window`.
    pub fn extent(&self, window: BrushWindow) -> Option<(f64, f64)> {
        self.stacked
            .iter()
            .filter_map(|spans| spans.get(window.start_index..=window.end_index))
            .flatten()
            .flat_map(|&(a, b)| [a, b])
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((v.min(lo), v.max(hi))),
            })
    }
}

/// All stack groups plotted against one value axis.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AxisStackGroups {
    /// `true` if any group on this axis is an actual stack.
    pub has_stack: bool,
    /// Groups in first-seen order.
    pub groups: Vec<StackGroup>,
}

impl AxisStackGroups {
    /// Min/max of the accumulated values of every group within `window`.
    ///
    /// Unstacked series form singleton groups stacked from zero, so they widen the
    /// extent like any other group.
    pub fn extent(&self, window: BrushWindow) -> Option<(f64, f64)> {
        self.groups
            .iter()
            .filter_map(|g| g.extent(window))
            .reduce(|(lo0, hi0), (lo1, hi1)| (lo0.min(lo1), hi0.max(hi1)))
    }
}

/// Stack groups keyed by value-axis id.
pub type StackGroupMap = BTreeMap<AxisId, AxisStackGroups>;

/// Groups `series` by `(value axis id, stack id)` and stacks each group over every
/// table row.
///
/// Offsets such as wiggle depend on neighbouring rows, so stacking always runs over the
/// whole table; windowing only narrows [`AxisStackGroups::extent`].
pub(crate) fn build_stack_groups(
    table: &DataTable,
    series: &[SeriesDeclaration],
    value_kind: AxisKind,
    offset: StackOffset,
) -> StackGroupMap {
    let mut members: BTreeMap<AxisId, Vec<(Option<Arc<str>>, Vec<SeriesDeclaration>)>> =
        BTreeMap::new();
    for s in series {
        let groups = members.entry(s.axis_id(value_kind)).or_default();
        let existing = s
            .stack_id
            .as_ref()
            .and_then(|id| groups.iter().position(|(g, _)| g.as_ref() == Some(id)));
        match existing {
            Some(i) => groups[i].1.push(s.clone()),
            None => groups.push((s.stack_id.clone(), alloc::vec![s.clone()])),
        }
    }

    members
        .into_iter()
        .map(|(axis_id, groups)| {
            let groups: Vec<StackGroup> = groups
                .into_iter()
                .map(|(stack_id, series)| {
                    let has_stack = stack_id.is_some();
                    let keys: Vec<&str> = series.iter().map(|s| &*s.data_key).collect();
                    let stacked = stack_columns(&table.full_window(), &keys, offset);
                    StackGroup {
                        stack_id,
                        has_stack,
                        series,
                        stacked,
                    }
                })
                .collect();
            let has_stack = groups.iter().any(|g| g.has_stack);
            log::trace!(
                "axis {}: {} stack group(s), stacked = {has_stack}",
                axis_id.0,
                groups.len()
            );
            (axis_id, AxisStackGroups { has_stack, groups })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn table() -> DataTable {
        DataTable::new()
            .with_numbers("a", [1.0, -2.0, 3.0])
            .and_then(|t| t.with_numbers("b", [2.0, 4.0, -1.0]))
            .and_then(|t| t.with_numbers("c", [10.0, 20.0, 30.0]))
            .expect("valid table")
    }

    #[test]
    fn series_group_by_axis_and_stack_id() {
        let t = table();
        let series = [
            SeriesDeclaration::new("a").with_stack_id("s"),
            SeriesDeclaration::new("c"),
            SeriesDeclaration::new("b").with_stack_id("s"),
            SeriesDeclaration::new("c").with_axes(AxisId(0), AxisId(1)),
        ];
        let map = build_stack_groups(&t, &series, AxisKind::Vertical, StackOffset::None);
        let axis0 = &map[&AxisId(0)];
        assert!(axis0.has_stack);
        assert_eq!(axis0.groups.len(), 2);
        assert_eq!(axis0.groups[0].series.len(), 2);
        assert!(!axis0.groups[1].has_stack);
        assert!(!map[&AxisId(1)].has_stack);
    }

    #[test]
    fn extent_uses_accumulated_values_in_window() {
        let t = table();
        let series = [
            SeriesDeclaration::new("a").with_stack_id("s"),
            SeriesDeclaration::new("b").with_stack_id("s"),
        ];
        let map = build_stack_groups(&t, &series, AxisKind::Vertical, StackOffset::None);
        let full = BrushWindow::full(3).expect("rows");
        // Row 0: 0..3, row 1: -2..4, row 2: -1..3.
        assert_eq!(map[&AxisId(0)].extent(full), Some((-2.0, 4.0)));

        let last = BrushWindow::validate(2, 2, 3).expect("in range");
        assert_eq!(map[&AxisId(0)].extent(last), Some((-1.0, 3.0)));
        assert_eq!(
            map[&AxisId(0)].groups[0].spans_of("b").map(|s| s[2]),
            Some((0.0, -1.0))
        );
    }

    #[test]
    fn unstacked_series_widen_stacked_extent() {
        let t = table();
        let series = [
            SeriesDeclaration::new("a").with_stack_id("s"),
            SeriesDeclaration::new("b").with_stack_id("s"),
            SeriesDeclaration::new("c"),
        ];
        let map = build_stack_groups(&t, &series, AxisKind::Vertical, StackOffset::None);
        let full = BrushWindow::full(3).expect("rows");
        assert!(map[&AxisId(0)].has_stack);
        assert_eq!(map[&AxisId(0)].extent(full), Some((-2.0, 30.0)));

        let first = BrushWindow::validate(0, 0, 3).expect("in range");
        assert_eq!(map[&AxisId(0)].extent(first), Some((0.0, 10.0)));
    }
}
