// Copyright 2025 the Catchart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plot rectangle solving.
//!
//! The offset is accumulated in a fixed order:
//! - **Margins**: the declared margin on all four sides.
//! - **Axes**: every visible axis adds its thickness to the side it is oriented to.
//! - **Brush**: the bottom accumulation so far is recorded as `brush_bottom`, then a
//!   non-overlay brush adds its height below.
//! - **Legend**: a horizontal legend adds its height to the top or bottom, a vertical
//!   legend adds its width to the left or right, as chosen by its alignment. A
//!   centered or middle-aligned legend floats over the plot and adds nothing.
//!
//! The plot size is what remains of the canvas.

use kurbo::{Point, Rect};

use crate::brush::BrushDeclaration;
use crate::chart_spec::Margin;
use crate::declaration::{AxisDeclaration, AxisOrient};
use crate::legend::{LegendAlign, LegendLayout, LegendSpec, LegendVerticalAlign};

/// A width/height pair used by chart layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Size {
    /// Creates a size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Four-sided offset of the plot rectangle within the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Offset {
    /// Distance from the canvas top to the plot top.
    pub top: f64,
    /// Distance from the plot right to the canvas right.
    pub right: f64,
    /// Distance from the plot bottom to the canvas bottom.
    pub bottom: f64,
    /// Distance from the canvas left to the plot left.
    pub left: f64,
    /// Plot width.
    pub width: f64,
    /// Plot height.
    pub height: f64,
    /// Bottom offset before the brush was added.
    pub brush_bottom: f64,
}

impl Offset {
    /// The plot rectangle in canvas coordinates.
    pub fn plot_rect(&self) -> Rect {
        Rect::new(
            self.left,
            self.top,
            self.left + self.width,
            self.top + self.height,
        )
    }

    /// Returns `true` if `p` is inside the plot rectangle (edges included).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left
            && p.x <= self.left + self.width
            && p.y >= self.top
            && p.y <= self.top + self.height
    }
}

/// Solves the plot offset.
///
/// `axes` should yield every resolved axis; hidden ones are skipped here. `legend`
/// carries the legend declaration with its measured size.
pub(crate) fn solve_offset<'a>(
    canvas: Size,
    margin: &Margin,
    axes: impl IntoIterator<Item = &'a AxisDeclaration>,
    brush: Option<&BrushDeclaration>,
    legend: Option<(&LegendSpec, Size)>,
) -> Offset {
    let mut offset = Offset {
        top: margin.top,
        right: margin.right,
        bottom: margin.bottom,
        left: margin.left,
        ..Offset::default()
    };
    for axis in axes.into_iter().filter(|a| !a.hide) {
        *side_mut(&mut offset, axis.orient) += axis.thickness;
    }

    offset.brush_bottom = offset.bottom;
    if let Some(brush) = brush.filter(|b| !b.overlay) {
        offset.bottom += brush.height;
    }

    if let Some((spec, size)) = legend {
        let edge = match (spec.layout, spec.align, spec.vertical_align) {
            (LegendLayout::Horizontal, _, LegendVerticalAlign::Top) => Some(AxisOrient::Top),
            (LegendLayout::Horizontal, _, LegendVerticalAlign::Bottom) => {
                Some(AxisOrient::Bottom)
            }
            (LegendLayout::Vertical, LegendAlign::Left, _) => Some(AxisOrient::Left),
            (LegendLayout::Vertical, LegendAlign::Right, _) => Some(AxisOrient::Right),
            _ => None,
        };
        match edge {
            Some(edge @ (AxisOrient::Top | AxisOrient::Bottom)) => {
                *side_mut(&mut offset, edge) += size.height;
            }
            Some(edge) => *side_mut(&mut offset, edge) += size.width,
            None => {}
        }
    }

    offset.width = (canvas.width - offset.left - offset.right).max(0.0);
    offset.height = (canvas.height - offset.top - offset.bottom).max(0.0);
    log::trace!("solved offset {offset:?}");
    offset
}

fn side_mut(offset: &mut Offset, orient: AxisOrient) -> &mut f64 {
    match orient {
        AxisOrient::Top => &mut offset.top,
        AxisOrient::Bottom => &mut offset.bottom,
        AxisOrient::Left => &mut offset.left,
        AxisOrient::Right => &mut offset.right,
    }
}

/// Places the brush strip.
///
/// A regular brush sits below the bottom axes; an overlaying brush covers the plot.
pub(crate) fn brush_rect(offset: &Offset, brush: &BrushDeclaration, margin: &Margin) -> Rect {
    if brush.overlay {
        return offset.plot_rect();
    }
    let y = offset.top + offset.height + offset.brush_bottom - margin.bottom;
    Rect::new(
        offset.left,
        y,
        offset.left + offset.width,
        y + brush.height,
    )
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::declaration::AxisId;

    fn axes() -> [AxisDeclaration; 3] {
        [
            AxisDeclaration::horizontal(AxisId(0)),
            AxisDeclaration::vertical(AxisId(0)),
            AxisDeclaration::vertical(AxisId(1))
                .with_orient(AxisOrient::Right)
                .with_hide(true),
        ]
    }

    #[test]
    fn axes_then_brush() {
        let brush = BrushDeclaration::new();
        let offset = solve_offset(
            Size::new(500.0, 400.0),
            &Margin::uniform(5.0),
            &axes(),
            Some(&brush),
            None,
        );
        assert_eq!(offset.left, 65.0);
        assert_eq!(offset.right, 5.0);
        assert_eq!(offset.brush_bottom, 35.0);
        assert_eq!(offset.bottom, 75.0);
        assert_eq!(offset.width, 430.0);
        assert_eq!(offset.height, 320.0);

        let rect = brush_rect(&offset, &brush, &Margin::uniform(5.0));
        assert_eq!(rect, Rect::new(65.0, 355.0, 495.0, 395.0));
    }

    #[test]
    fn overlay_brush_takes_no_space() {
        let brush = BrushDeclaration::new().with_overlay(true);
        let offset = solve_offset(
            Size::new(500.0, 400.0),
            &Margin::uniform(5.0),
            &axes(),
            Some(&brush),
            None,
        );
        assert_eq!(offset.bottom, offset.brush_bottom);
        let rect = brush_rect(&offset, &brush, &Margin::uniform(5.0));
        assert_eq!(rect, offset.plot_rect());
    }

    #[test]
    fn legend_edges_follow_alignment() {
        let size = Size::new(80.0, 20.0);
        let bottom = LegendSpec::new();
        let offset = solve_offset(
            Size::new(500.0, 400.0),
            &Margin::uniform(0.0),
            &[],
            None,
            Some((&bottom, size)),
        );
        assert_eq!((offset.bottom, offset.left, offset.right), (20.0, 0.0, 0.0));

        let right = LegendSpec::new()
            .with_layout(LegendLayout::Vertical)
            .with_align(LegendAlign::Right, LegendVerticalAlign::Top);
        let offset = solve_offset(
            Size::new(500.0, 400.0),
            &Margin::uniform(0.0),
            &[],
            None,
            Some((&right, size)),
        );
        assert_eq!((offset.right, offset.top), (80.0, 0.0));

        let centered = LegendSpec::new()
            .with_layout(LegendLayout::Vertical)
            .with_align(LegendAlign::Center, LegendVerticalAlign::Middle);
        let offset = solve_offset(
            Size::new(500.0, 400.0),
            &Margin::uniform(0.0),
            &[],
            None,
            Some((&centered, size)),
        );
        assert_eq!(offset.width, 500.0);
        assert_eq!(offset.height, 400.0);
    }

    #[test]
    fn legend_only_grows_its_flow_edge() {
        let size = Size::new(490.0, 20.0);
        let middle_left = LegendSpec::new()
            .with_align(LegendAlign::Left, LegendVerticalAlign::Middle);
        let offset = solve_offset(
            Size::new(500.0, 300.0),
            &Margin::uniform(5.0),
            &axes(),
            None,
            Some((&middle_left, size)),
        );
        assert_eq!(offset.left, 65.0);
        assert_eq!(offset.width, 430.0);
        assert_eq!(offset.height, 260.0);

        let centered_top = LegendSpec::new()
            .with_layout(LegendLayout::Vertical)
            .with_align(LegendAlign::Center, LegendVerticalAlign::Top);
        let offset = solve_offset(
            Size::new(500.0, 300.0),
            &Margin::uniform(5.0),
            &axes(),
            None,
            Some((&centered_top, Size::new(80.0, 60.0))),
        );
        assert_eq!(offset.top, 5.0);
        assert_eq!(offset.height, 260.0);
        assert_eq!(offset.width, 430.0);
    }

    #[test]
    fn contains_includes_edges() {
        let offset = Offset {
            left: 10.0,
            top: 10.0,
            width: 100.0,
            height: 50.0,
            ..Offset::default()
        };
        assert!(offset.contains(Point::new(10.0, 60.0)));
        assert!(offset.contains(Point::new(110.0, 10.0)));
        assert!(!offset.contains(Point::new(110.1, 10.0)));
    }
}
