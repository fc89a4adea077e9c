// Copyright 2025 the Catchart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout pipeline entry point.

extern crate alloc;

use alloc::vec::Vec;

use catchart_table::DataTable;
use kurbo::Rect;

use crate::axis::{ArrangeContext, AxisMap, DomainContext, arrange_axes, resolve_axes};
use crate::brush::BrushWindow;
use crate::chart_spec::ChartSpec;
use crate::declaration::AxisKind;
use crate::layout::{Offset, Size, brush_rect, solve_offset};
use crate::measure::{HeuristicTextMeasurer, TextMeasurer};
use crate::stack::{StackGroupMap, build_stack_groups};
use crate::tick::{Tick, TickMode, ticks_for};

/// Everything a drawing layer needs for one chart, computed for one data window.
///
/// Snapshots are immutable; any change of data, window, or configuration produces a
/// new one.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutSnapshot {
    /// Data window the snapshot was computed for.
    pub window: BrushWindow,
    /// Resolved horizontal axes.
    pub horizontal_axes: AxisMap,
    /// Resolved vertical axes.
    pub vertical_axes: AxisMap,
    /// Plot offset.
    pub offset: Offset,
    /// Stack groups keyed by value-axis id.
    pub stack_groups: StackGroupMap,
    /// Band-centered ticks of the row axis, used for pointer and tooltip lookup.
    pub tooltip_ticks: Vec<Tick>,
    /// Legend box, if a legend is declared.
    pub legend: Option<Rect>,
    /// Brush strip, if a brush is declared.
    pub brush: Option<Rect>,
}

impl LayoutSnapshot {
    /// Resolved axes of `kind`.
    pub fn axes(&self, kind: AxisKind) -> &AxisMap {
        match kind {
            AxisKind::Horizontal => &self.horizontal_axes,
            AxisKind::Vertical => &self.vertical_axes,
        }
    }
}

/// Computes the layout of `spec` over `table`, restricted to `window`.
///
/// Returns `None` when there is nothing to lay out: a non-positive canvas, an empty
/// table, or a window that does not fit the table.
pub fn recompute_layout(
    spec: &ChartSpec,
    table: &DataTable,
    window: BrushWindow,
) -> Option<LayoutSnapshot> {
    recompute_layout_with(spec, table, window, &HeuristicTextMeasurer)
}

/// [`recompute_layout`] with a caller-provided text measurer for legend sizing.
pub fn recompute_layout_with(
    spec: &ChartSpec,
    table: &DataTable,
    window: BrushWindow,
    measurer: &dyn TextMeasurer,
) -> Option<LayoutSnapshot> {
    if !spec.has_valid_size() {
        log::debug!("no layout: canvas {}x{}", spec.width, spec.height);
        return None;
    }
    if table.is_empty() {
        log::debug!("no layout: empty table");
        return None;
    }
    let rows = match BrushWindow::validate(window.start_index, window.end_index, table.row_count())
    {
        Ok(rows) => rows,
        Err(err) => {
            log::debug!("no layout: {err}");
            return None;
        }
    };
    let table_window = table.window(rows.start_index, rows.end_index)?;

    let stack_groups = build_stack_groups(
        table,
        &spec.series,
        spec.orientation.value_kind(),
        spec.stack_offset,
    );
    let domain_ctx = DomainContext {
        window: table_window,
        rows,
        series: &spec.series,
        references: &spec.references,
        stack_groups: &stack_groups,
        orientation: spec.orientation,
        stack_offset: spec.stack_offset,
    };
    let horizontal = resolve_axes(AxisKind::Horizontal, &spec.axes, &domain_ctx);
    let vertical = resolve_axes(AxisKind::Vertical, &spec.axes, &domain_ctx);

    let canvas = Size::new(spec.width, spec.height);
    let legend = spec.legend.as_ref().map(|legend| {
        let items = legend.items_for(&spec.series);
        let max_width = spec.width - spec.margin.left - spec.margin.right;
        (legend, legend.measure(&items, measurer, max_width))
    });
    let offset = solve_offset(
        canvas,
        &spec.margin,
        horizontal
            .values()
            .chain(vertical.values())
            .map(|config| &config.declaration),
        spec.brush.as_ref(),
        legend,
    );

    let arrange_ctx = ArrangeContext {
        canvas,
        offset,
        orientation: spec.orientation,
        geometry: spec.geometry,
    };
    let horizontal_axes = arrange_axes(horizontal, &arrange_ctx);
    let vertical_axes = arrange_axes(vertical, &arrange_ctx);

    let category_axes = match spec.orientation.category_kind() {
        AxisKind::Horizontal => &horizontal_axes,
        AxisKind::Vertical => &vertical_axes,
    };
    let tooltip_ticks = category_axes
        .values()
        .next()
        .map(|axis| {
            ticks_for(
                &axis.scale,
                axis.duplicate_domain.as_deref(),
                axis.declaration.tick_count,
                axis.declaration.allow_decimals,
                TickMode::Center,
            )
        })
        .unwrap_or_default();

    let legend = legend.map(|(spec_legend, size)| spec_legend.place(size, canvas, &spec.margin));
    let brush = spec
        .brush
        .as_ref()
        .map(|brush| brush_rect(&offset, brush, &spec.margin));

    log::trace!(
        "layout for rows {}..={}: plot {:?}",
        rows.start_index,
        rows.end_index,
        offset.plot_rect()
    );
    Some(LayoutSnapshot {
        window: rows,
        horizontal_axes,
        vertical_axes,
        offset,
        stack_groups,
        tooltip_ticks,
        legend,
        brush,
    })
}
