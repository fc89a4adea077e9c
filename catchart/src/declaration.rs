// Copyright 2025 the Catchart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis, series, and reference-element declarations.
//!
//! These are the typed inputs of the layout pipeline. They are plain data with
//! builder-style setters; nothing here is resolved against a table yet.

extern crate alloc;

use alloc::sync::Arc;

use peniko::Color;
use peniko::color::palette::css;
use smallvec::SmallVec;

/// Identifier of an axis, unique within its [`AxisKind`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AxisId(pub u32);

/// Which dimension an axis measures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisKind {
    /// An axis running along x (placed top or bottom).
    Horizontal,
    /// An axis running along y (placed left or right).
    Vertical,
}

impl AxisKind {
    /// Returns the default orientation slots for axes of this kind, in discovery order.
    pub fn orient_slots(self) -> [AxisOrient; 2] {
        match self {
            Self::Horizontal => [AxisOrient::Bottom, AxisOrient::Top],
            Self::Vertical => [AxisOrient::Left, AxisOrient::Right],
        }
    }
}

/// Value type of an axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisType {
    /// A continuous numeric axis.
    Number,
    /// A discrete axis over an ordered category list.
    Category,
}

/// Axis placement relative to the plot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisOrient {
    /// A horizontal axis placed above the plot area.
    Top,
    /// A horizontal axis placed below the plot area.
    Bottom,
    /// A vertical axis placed to the left of the plot area.
    Left,
    /// A vertical axis placed to the right of the plot area.
    Right,
}

impl AxisOrient {
    /// Returns the axis kind this orientation belongs to.
    pub fn kind(self) -> AxisKind {
        match self {
            Self::Top | Self::Bottom => AxisKind::Horizontal,
            Self::Left | Self::Right => AxisKind::Vertical,
        }
    }
}

/// One end of an explicitly specified numeric domain.
#[derive(Clone)]
pub enum DomainBound {
    /// Keep the bound computed from data.
    Auto,
    /// A literal bound.
    ///
    /// Unless the axis allows data overflow, a literal can only widen the data extent.
    Value(f64),
    /// The data bound shifted by a constant (e.g. `dataMin - 10` is `DataOffset(-10.0)`).
    DataOffset(f64),
    /// A function of the data bound.
    Custom(Arc<dyn Fn(f64) -> f64>),
}

impl DomainBound {
    /// Convenience constructor for [`DomainBound::Custom`].
    pub fn custom(f: impl Fn(f64) -> f64 + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Returns `true` for [`DomainBound::Auto`].
    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl core::fmt::Debug for DomainBound {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Auto => f.write_str("Auto"),
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::DataOffset(v) => f.debug_tuple("DataOffset").field(v).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PartialEq for DomainBound {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Auto, Self::Auto) => true,
            (Self::Value(a), Self::Value(b)) | (Self::DataOffset(a), Self::DataOffset(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Pixel insets applied to an axis range.
///
/// `start` is the left (horizontal axes) or top (vertical axes) end of the range; `end`
/// is the right or bottom end.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AxisPadding {
    /// Inset at the left/top end.
    pub start: f64,
    /// Inset at the right/bottom end.
    pub end: f64,
}

/// A declared axis.
///
/// Identity is `(kind, id)`; the first declaration for a given identity wins.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisDeclaration {
    /// Axis id, unique within `kind`.
    pub id: AxisId,
    /// Horizontal or vertical.
    pub kind: AxisKind,
    /// Number or category.
    pub axis_type: AxisType,
    /// Optional data key the axis reads its domain from.
    pub data_key: Option<Arc<str>>,
    /// Placement relative to the plot.
    pub orient: AxisOrient,
    /// Explicit domain bounds. Only applied to numeric axes.
    pub domain: Option<[DomainBound; 2]>,
    /// Range insets in pixels.
    pub padding: AxisPadding,
    /// Whether explicit bounds may clip data (and the scale is left unclamped).
    pub allow_data_overflow: bool,
    /// Whether numeric ticks may have fractional steps.
    pub allow_decimals: bool,
    /// Hidden axes contribute scales but take no space.
    pub hide: bool,
    /// Thickness in pixels: height for horizontal axes, width for vertical ones.
    pub thickness: f64,
    /// Approximate number of numeric ticks.
    pub tick_count: usize,
}

impl AxisDeclaration {
    /// A horizontal axis with defaults: category type, bottom, 30px tall, five ticks.
    pub fn horizontal(id: AxisId) -> Self {
        Self {
            id,
            kind: AxisKind::Horizontal,
            axis_type: AxisType::Category,
            data_key: None,
            orient: AxisOrient::Bottom,
            domain: Some([DomainBound::Value(0.0), DomainBound::Auto]),
            padding: AxisPadding::default(),
            allow_data_overflow: false,
            allow_decimals: true,
            hide: false,
            thickness: 30.0,
            tick_count: 5,
        }
    }

    /// A vertical axis with defaults: number type, left, 60px wide, five ticks.
    pub fn vertical(id: AxisId) -> Self {
        Self {
            kind: AxisKind::Vertical,
            axis_type: AxisType::Number,
            orient: AxisOrient::Left,
            thickness: 60.0,
            ..Self::horizontal(id)
        }
    }

    /// The default declaration for `kind`.
    pub fn default_for(kind: AxisKind, id: AxisId) -> Self {
        match kind {
            AxisKind::Horizontal => Self::horizontal(id),
            AxisKind::Vertical => Self::vertical(id),
        }
    }

    /// Sets the axis value type.
    pub fn with_type(mut self, axis_type: AxisType) -> Self {
        self.axis_type = axis_type;
        self
    }

    /// Binds the axis to a data key.
    pub fn with_data_key(mut self, key: &str) -> Self {
        self.data_key = Some(key.into());
        self
    }

    /// Sets the orientation.
    ///
    /// An orientation of the other kind is ignored.
    pub fn with_orient(mut self, orient: AxisOrient) -> Self {
        if orient.kind() == self.kind {
            self.orient = orient;
        }
        self
    }

    /// Sets explicit domain bounds.
    pub fn with_domain(mut self, lower: DomainBound, upper: DomainBound) -> Self {
        self.domain = Some([lower, upper]);
        self
    }

    /// Removes explicit domain bounds so the data extent is used as-is.
    pub fn without_domain(mut self) -> Self {
        self.domain = None;
        self
    }

    /// Sets range padding in pixels.
    pub fn with_padding(mut self, start: f64, end: f64) -> Self {
        self.padding = AxisPadding {
            start: start.max(0.0),
            end: end.max(0.0),
        };
        self
    }

    /// Allows explicit bounds to clip data.
    pub fn with_data_overflow(mut self, allow: bool) -> Self {
        self.allow_data_overflow = allow;
        self
    }

    /// Allows or forbids fractional tick steps.
    pub fn with_decimals(mut self, allow: bool) -> Self {
        self.allow_decimals = allow;
        self
    }

    /// Hides the axis.
    pub fn with_hide(mut self, hide: bool) -> Self {
        self.hide = hide;
        self
    }

    /// Sets the axis thickness in pixels.
    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = thickness.max(0.0);
        self
    }

    /// Sets the approximate tick count.
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }
}

/// A declared data series.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesDeclaration {
    /// Data key of the series values.
    pub data_key: Arc<str>,
    /// Display name; defaults to the data key.
    pub name: Option<Arc<str>>,
    /// Main color, used for legend and tooltip entries.
    pub color: Color,
    /// Id of the horizontal axis this series is plotted against.
    pub horizontal_axis_id: AxisId,
    /// Id of the vertical axis this series is plotted against.
    pub vertical_axis_id: AxisId,
    /// Series with the same stack id (on the same value axis) are stacked.
    pub stack_id: Option<Arc<str>>,
}

impl SeriesDeclaration {
    /// Creates a series bound to axis `0` on both dimensions.
    pub fn new(data_key: &str) -> Self {
        Self {
            data_key: data_key.into(),
            name: None,
            color: css::STEEL_BLUE,
            horizontal_axis_id: AxisId::default(),
            vertical_axis_id: AxisId::default(),
            stack_id: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the main color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Sets both axis ids.
    pub fn with_axes(mut self, horizontal: AxisId, vertical: AxisId) -> Self {
        self.horizontal_axis_id = horizontal;
        self.vertical_axis_id = vertical;
        self
    }

    /// Sets the stack id.
    pub fn with_stack_id(mut self, stack_id: &str) -> Self {
        self.stack_id = Some(stack_id.into());
        self
    }

    /// Returns the id of the axis of `kind` this series references.
    pub fn axis_id(&self, kind: AxisKind) -> AxisId {
        match kind {
            AxisKind::Horizontal => self.horizontal_axis_id,
            AxisKind::Vertical => self.vertical_axis_id,
        }
    }

    /// Returns the display name, falling back to the data key.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.data_key)
    }
}

/// Shape of a reference element, in data units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReferenceShape {
    /// A line at a horizontal-axis value (`x`) and/or a vertical-axis value (`y`).
    Line {
        /// Horizontal-axis value.
        x: Option<f64>,
        /// Vertical-axis value.
        y: Option<f64>,
    },
    /// A single point.
    Dot {
        /// Horizontal-axis value.
        x: f64,
        /// Vertical-axis value.
        y: f64,
    },
    /// A rectangle spanning optional ranges on each axis.
    Area {
        /// Horizontal-axis span.
        x: Option<(f64, f64)>,
        /// Vertical-axis span.
        y: Option<(f64, f64)>,
    },
}

/// A reference line, dot, or area attached to a pair of axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReferenceElement {
    /// Shape and position.
    pub shape: ReferenceShape,
    /// Horizontal axis id.
    pub horizontal_axis_id: AxisId,
    /// Vertical axis id.
    pub vertical_axis_id: AxisId,
    /// When set, numeric domains of the referenced axes are widened to include this element.
    pub always_show: bool,
}

impl ReferenceElement {
    /// Creates a reference element bound to axis `0` on both dimensions.
    pub fn new(shape: ReferenceShape) -> Self {
        Self {
            shape,
            horizontal_axis_id: AxisId::default(),
            vertical_axis_id: AxisId::default(),
            always_show: false,
        }
    }

    /// A line across the plot at vertical-axis value `y`.
    pub fn horizontal_line(y: f64) -> Self {
        Self::new(ReferenceShape::Line {
            x: None,
            y: Some(y),
        })
    }

    /// A line across the plot at horizontal-axis value `x`.
    pub fn vertical_line(x: f64) -> Self {
        Self::new(ReferenceShape::Line {
            x: Some(x),
            y: None,
        })
    }

    /// Sets both axis ids.
    pub fn with_axes(mut self, horizontal: AxisId, vertical: AxisId) -> Self {
        self.horizontal_axis_id = horizontal;
        self.vertical_axis_id = vertical;
        self
    }

    /// Sets the always-show flag.
    pub fn with_always_show(mut self, always_show: bool) -> Self {
        self.always_show = always_show;
        self
    }

    /// Returns the axis id of `kind` this element references.
    pub fn axis_id(&self, kind: AxisKind) -> AxisId {
        match kind {
            AxisKind::Horizontal => self.horizontal_axis_id,
            AxisKind::Vertical => self.vertical_axis_id,
        }
    }

    /// Returns the data values this element occupies along axes of `kind`.
    pub(crate) fn values_along(&self, kind: AxisKind) -> SmallVec<[f64; 2]> {
        let mut out = SmallVec::new();
        let horizontal = kind == AxisKind::Horizontal;
        match self.shape {
            ReferenceShape::Line { x, y } => {
                out.extend(if horizontal { x } else { y });
            }
            ReferenceShape::Dot { x, y } => {
                out.push(if horizontal { x } else { y });
            }
            ReferenceShape::Area { x, y } => {
                if let Some((a, b)) = if horizontal { x } else { y } {
                    out.push(a);
                    out.push(b);
                }
            }
        }
        out.retain(|v: &mut f64| v.is_finite());
        out
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn axis_defaults_follow_kind() {
        let x = AxisDeclaration::horizontal(AxisId(0));
        let y = AxisDeclaration::vertical(AxisId(0));
        assert_eq!(x.axis_type, AxisType::Category);
        assert_eq!(x.orient, AxisOrient::Bottom);
        assert_eq!(y.axis_type, AxisType::Number);
        assert_eq!(y.orient, AxisOrient::Left);
        assert_eq!(y.thickness, 60.0);
    }

    #[test]
    fn orient_of_other_kind_is_ignored() {
        let x = AxisDeclaration::horizontal(AxisId(0)).with_orient(AxisOrient::Left);
        assert_eq!(x.orient, AxisOrient::Bottom);
    }

    #[test]
    fn reference_values_follow_axis_kind() {
        let area = ReferenceElement::new(ReferenceShape::Area {
            x: None,
            y: Some((10.0, 20.0)),
        });
        assert!(area.values_along(AxisKind::Horizontal).is_empty());
        assert_eq!(area.values_along(AxisKind::Vertical).as_slice(), &[10.0, 20.0]);

        let dot = ReferenceElement::new(ReferenceShape::Dot { x: 1.0, y: 2.0 });
        assert_eq!(dot.values_along(AxisKind::Horizontal).as_slice(), &[1.0]);
    }
}
