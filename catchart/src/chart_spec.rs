// Copyright 2025 the Catchart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart-level configuration.
//!
//! A [`ChartSpec`] is the complete, flat description of one chart: canvas size,
//! margins, orientation, and the declarations discovered for it. It is the only
//! configuration input of the layout pipeline.

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

use catchart_table::StackOffset;

use crate::brush::BrushDeclaration;
use crate::declaration::{
    AxisDeclaration, AxisId, AxisKind, AxisType, ReferenceElement, SeriesDeclaration,
};
use crate::legend::LegendSpec;
use crate::sync::SyncId;

/// Space reserved around the plot before axes, brush, and legend are added.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margin {
    /// Top margin.
    pub top: f64,
    /// Right margin.
    pub right: f64,
    /// Bottom margin.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
}

impl Margin {
    /// Creates a margin from its four sides (CSS order).
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates the same margin on every side.
    pub fn uniform(v: f64) -> Self {
        Self::new(v, v, v, v)
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self::uniform(5.0)
    }
}

/// Which dimension walks over data rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChartOrientation {
    /// Rows run along the horizontal axis; values are read on the vertical axis.
    #[default]
    Horizontal,
    /// Rows run along the vertical axis; values are read on the horizontal axis.
    Vertical,
}

impl ChartOrientation {
    /// The axis kind that walks over row index.
    pub fn category_kind(self) -> AxisKind {
        match self {
            Self::Horizontal => AxisKind::Horizontal,
            Self::Vertical => AxisKind::Vertical,
        }
    }

    /// The axis kind that carries series values.
    pub fn value_kind(self) -> AxisKind {
        match self {
            Self::Horizontal => AxisKind::Vertical,
            Self::Vertical => AxisKind::Horizontal,
        }
    }
}

/// How series are drawn, which decides the discrete scale flavor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SeriesGeometry {
    /// Connected shapes (lines, areas): categories map to evenly spaced points.
    #[default]
    Connected,
    /// Discrete shapes (bars): categories map to bands with a width.
    Discrete,
}

/// A non-fatal configuration problem found by [`ChartSpec::validate_axes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisAdvisory {
    /// An axis on the row dimension is not a category axis.
    ExpectedCategoryAxis {
        /// Kind of the offending axis.
        kind: AxisKind,
        /// Id of the offending axis.
        id: AxisId,
    },
    /// A vertical layout has no declared axis of this kind, so a default one is synthesized.
    MissingAxis {
        /// Kind with no declaration.
        kind: AxisKind,
    },
}

impl fmt::Display for AxisAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExpectedCategoryAxis { kind, id } => write!(
                f,
                "{kind:?} axis {} should be a category axis for this layout",
                id.0
            ),
            Self::MissingAxis { kind } => write!(
                f,
                "vertical layout without a declared {kind:?} axis; a default axis is used"
            ),
        }
    }
}

/// A complete chart description.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSpec {
    /// Canvas width in pixels.
    pub width: f64,
    /// Canvas height in pixels.
    pub height: f64,
    /// Outer margin.
    pub margin: Margin,
    /// Row dimension.
    pub orientation: ChartOrientation,
    /// Stack offset mode applied to every stack group.
    pub stack_offset: StackOffset,
    /// Series geometry.
    pub geometry: SeriesGeometry,
    /// Axis declarations, in discovery order.
    pub axes: Vec<AxisDeclaration>,
    /// Series declarations, in discovery order.
    pub series: Vec<SeriesDeclaration>,
    /// Reference lines, dots, and areas.
    pub references: Vec<ReferenceElement>,
    /// Optional legend.
    pub legend: Option<LegendSpec>,
    /// Optional brush (data window control).
    pub brush: Option<BrushDeclaration>,
    /// Synchronization group shared with other chart instances.
    pub sync_id: Option<SyncId>,
}

impl ChartSpec {
    /// Creates an empty chart of the given canvas size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: Margin::default(),
            orientation: ChartOrientation::default(),
            stack_offset: StackOffset::default(),
            geometry: SeriesGeometry::default(),
            axes: Vec::new(),
            series: Vec::new(),
            references: Vec::new(),
            legend: None,
            brush: None,
            sync_id: None,
        }
    }

    /// Sets the margin.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the row dimension.
    pub fn with_orientation(mut self, orientation: ChartOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Sets the stack offset mode.
    pub fn with_stack_offset(mut self, offset: StackOffset) -> Self {
        self.stack_offset = offset;
        self
    }

    /// Sets the series geometry.
    pub fn with_geometry(mut self, geometry: SeriesGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Adds an axis declaration.
    pub fn with_axis(mut self, axis: AxisDeclaration) -> Self {
        self.axes.push(axis);
        self
    }

    /// Adds a series declaration.
    pub fn with_series(mut self, series: SeriesDeclaration) -> Self {
        self.series.push(series);
        self
    }

    /// Adds a reference element.
    pub fn with_reference(mut self, reference: ReferenceElement) -> Self {
        self.references.push(reference);
        self
    }

    /// Sets the legend.
    pub fn with_legend(mut self, legend: LegendSpec) -> Self {
        self.legend = Some(legend);
        self
    }

    /// Sets the brush.
    pub fn with_brush(mut self, brush: BrushDeclaration) -> Self {
        self.brush = Some(brush);
        self
    }

    /// Sets the synchronization group.
    pub fn with_sync_id(mut self, sync_id: SyncId) -> Self {
        self.sync_id = Some(sync_id);
        self
    }

    /// Returns the declared axes of `kind`, in discovery order.
    pub fn axes_of(&self, kind: AxisKind) -> impl Iterator<Item = &AxisDeclaration> {
        self.axes.iter().filter(move |a| a.kind == kind)
    }

    /// Returns `true` when the canvas has a positive, finite size.
    pub fn has_valid_size(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Checks declared axes against the chart orientation.
    ///
    /// Findings are advisory: layout proceeds with the declarations as given.
    pub fn validate_axes(&self) -> Vec<AxisAdvisory> {
        let mut out = Vec::new();
        let category_kind = self.orientation.category_kind();
        if self.orientation == ChartOrientation::Vertical {
            for kind in [AxisKind::Vertical, AxisKind::Horizontal] {
                if self.axes_of(kind).next().is_none() {
                    out.push(AxisAdvisory::MissingAxis { kind });
                }
            }
        }
        for axis in self.axes_of(category_kind) {
            if axis.axis_type != AxisType::Category {
                out.push(AxisAdvisory::ExpectedCategoryAxis {
                    kind: axis.kind,
                    id: axis.id,
                });
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn horizontal_layout_flags_numeric_x_axis() {
        let spec = ChartSpec::new(400.0, 300.0).with_axis(
            AxisDeclaration::horizontal(AxisId(3)).with_type(AxisType::Number),
        );
        assert_eq!(
            spec.validate_axes(),
            alloc::vec![AxisAdvisory::ExpectedCategoryAxis {
                kind: AxisKind::Horizontal,
                id: AxisId(3),
            }]
        );
    }

    #[test]
    fn vertical_layout_flags_missing_axes() {
        let spec = ChartSpec::new(400.0, 300.0)
            .with_orientation(ChartOrientation::Vertical)
            .with_axis(AxisDeclaration::horizontal(AxisId(0)).with_type(AxisType::Number));
        assert_eq!(
            spec.validate_axes(),
            alloc::vec![AxisAdvisory::MissingAxis {
                kind: AxisKind::Vertical
            }]
        );
    }

    #[test]
    fn non_positive_size_is_invalid() {
        assert!(!ChartSpec::new(0.0, 100.0).has_valid_size());
        assert!(!ChartSpec::new(100.0, f64::NAN).has_valid_size());
        assert!(ChartSpec::new(1.0, 1.0).has_valid_size());
    }
}
