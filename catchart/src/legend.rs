// Copyright 2025 the Catchart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legend sizing and placement.
//!
//! The legend is not drawn here. This module only estimates its box so the layout
//! solver can reserve space for it, and reports where that box sits on the canvas.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use peniko::Color;

use crate::chart_spec::Margin;
use crate::declaration::SeriesDeclaration;
use crate::layout::Size;
use crate::measure::TextMeasurer;

/// Direction in which legend items flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LegendLayout {
    /// Items flow left to right, wrapping into rows.
    #[default]
    Horizontal,
    /// Items are stacked in one column.
    Vertical,
}

/// Horizontal alignment of the legend box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LegendAlign {
    /// Against the left margin.
    Left,
    /// Centered on the canvas.
    #[default]
    Center,
    /// Against the right margin.
    Right,
}

/// Vertical alignment of the legend box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LegendVerticalAlign {
    /// Against the top margin.
    Top,
    /// Centered on the canvas.
    Middle,
    /// Against the bottom margin.
    #[default]
    Bottom,
}

/// One legend entry.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendItem {
    /// The label string shown next to the icon.
    pub label: String,
    /// The icon color.
    pub color: Color,
}

impl LegendItem {
    /// Creates a legend item.
    pub fn new(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }
}

/// A declared legend.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendSpec {
    /// Item flow direction.
    pub layout: LegendLayout,
    /// Horizontal alignment.
    pub align: LegendAlign,
    /// Vertical alignment.
    pub vertical_align: LegendVerticalAlign,
    /// Icon square size.
    pub icon_size: f64,
    /// Gap between icon and label.
    pub icon_gap: f64,
    /// Gap between adjacent items (and between rows).
    pub item_gap: f64,
    /// Label font size.
    pub font_size: f64,
    /// Explicit items; when `None`, one item per series is generated.
    pub items: Option<Vec<LegendItem>>,
}

impl Default for LegendSpec {
    fn default() -> Self {
        Self {
            layout: LegendLayout::Horizontal,
            align: LegendAlign::Center,
            vertical_align: LegendVerticalAlign::Bottom,
            icon_size: 14.0,
            icon_gap: 4.0,
            item_gap: 10.0,
            font_size: 12.0,
            items: None,
        }
    }
}

impl LegendSpec {
    /// Creates a legend with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the item flow direction.
    pub fn with_layout(mut self, layout: LegendLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Sets both alignments.
    pub fn with_align(mut self, align: LegendAlign, vertical_align: LegendVerticalAlign) -> Self {
        self.align = align;
        self.vertical_align = vertical_align;
        self
    }

    /// Sets the label font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size.max(0.0);
        self
    }

    /// Uses explicit items instead of one per series.
    pub fn with_items(mut self, items: Vec<LegendItem>) -> Self {
        self.items = Some(items);
        self
    }

    /// Returns the items to show for `series`.
    pub fn items_for(&self, series: &[SeriesDeclaration]) -> Vec<LegendItem> {
        match &self.items {
            Some(items) => items.clone(),
            None => series
                .iter()
                .map(|s| LegendItem::new(s.display_name(), s.color))
                .collect(),
        }
    }

    /// Estimates the legend box.
    ///
    /// Horizontal legends span `max_width` and wrap items into rows; vertical legends
    /// are as wide as their widest item.
    pub fn measure(
        &self,
        items: &[LegendItem],
        measurer: &dyn TextMeasurer,
        max_width: f64,
    ) -> Size {
        if items.is_empty() {
            return Size::default();
        }
        let row_height = self.icon_size.max(self.font_size);
        let widths = items.iter().map(|item| {
            self.icon_size + self.icon_gap + measurer.measure(&item.label, self.font_size).width
        });
        match self.layout {
            LegendLayout::Vertical => {
                let width = widths.fold(0.0_f64, f64::max);
                let n = items.len() as f64;
                Size {
                    width,
                    height: n * row_height + (n - 1.0) * self.icon_gap,
                }
            }
            LegendLayout::Horizontal => {
                let max_width = max_width.max(0.0);
                let mut rows = 1_usize;
                let mut x = 0.0;
                for w in widths {
                    let next = if x > 0.0 { x + self.item_gap + w } else { w };
                    if x > 0.0 && next > max_width {
                        rows += 1;
                        x = w;
                    } else {
                        x = next;
                    }
                }
                let rows = rows as f64;
                Size {
                    width: max_width,
                    height: rows * row_height + (rows - 1.0) * self.icon_gap,
                }
            }
        }
    }

    /// Places a legend box of `size` on a canvas of `canvas` size.
    pub fn place(&self, size: Size, canvas: Size, margin: &Margin) -> Rect {
        let x = match (self.layout, self.align) {
            (LegendLayout::Vertical, LegendAlign::Center) => (canvas.width - size.width) / 2.0,
            (_, LegendAlign::Right) => canvas.width - margin.right - size.width,
            _ => margin.left,
        };
        let y = match self.vertical_align {
            LegendVerticalAlign::Middle => (canvas.height - size.height) / 2.0,
            LegendVerticalAlign::Bottom => canvas.height - margin.bottom - size.height,
            LegendVerticalAlign::Top => margin.top,
        };
        Rect::new(x, y, x + size.width, y + size.height)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::measure::HeuristicTextMeasurer;
    use peniko::color::palette::css;

    fn items(n: usize) -> Vec<LegendItem> {
        // "abcde" measures 5 * 0.6 * 10 = 30 at font size 10.
        (0..n).map(|_| LegendItem::new("abcde", css::RED)).collect()
    }

    #[test]
    fn horizontal_items_wrap_to_width() {
        let spec = LegendSpec::new().with_font_size(10.0);
        // Each item is 14 + 4 + 30 = 48 wide; gaps are 10.
        let one_row = spec.measure(&items(3), &HeuristicTextMeasurer, 164.0);
        assert_eq!(one_row.height, 14.0);
        let two_rows = spec.measure(&items(3), &HeuristicTextMeasurer, 163.0);
        assert_eq!(two_rows.height, 14.0 * 2.0 + 4.0);
        assert_eq!(two_rows.width, 163.0);
    }

    #[test]
    fn vertical_legend_is_one_column() {
        let spec = LegendSpec::new()
            .with_layout(LegendLayout::Vertical)
            .with_font_size(10.0);
        let size = spec.measure(&items(2), &HeuristicTextMeasurer, 10.0);
        assert_eq!(size.width, 48.0);
        assert_eq!(size.height, 32.0);
    }

    #[test]
    fn items_default_to_series_names() {
        let series = [
            SeriesDeclaration::new("uv").with_name("Visits"),
            SeriesDeclaration::new("pv"),
        ];
        let labels: Vec<String> = LegendSpec::new()
            .items_for(&series)
            .into_iter()
            .map(|i| i.label)
            .collect();
        assert_eq!(labels, ["Visits", "pv"]);
    }

    #[test]
    fn placement_follows_alignment() {
        let canvas = Size {
            width: 400.0,
            height: 300.0,
        };
        let margin = Margin::uniform(10.0);
        let size = Size {
            width: 100.0,
            height: 20.0,
        };
        let bottom = LegendSpec::new().place(size, canvas, &margin);
        assert_eq!(bottom, Rect::new(10.0, 270.0, 110.0, 290.0));
        let right = LegendSpec::new()
            .with_layout(LegendLayout::Vertical)
            .with_align(LegendAlign::Right, LegendVerticalAlign::Middle)
            .place(size, canvas, &margin);
        assert_eq!(right, Rect::new(290.0, 140.0, 390.0, 160.0));
    }
}
