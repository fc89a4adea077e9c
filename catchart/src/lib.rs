// Copyright 2025 the Catchart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout and synchronization engine for categorical charts.
//!
//! Callers describe a chart as a flat list of axis and series declarations plus a
//! [`DataTable`], and this crate computes everything a drawing layer needs except the
//! drawing itself:
//! - **Domains** for every axis, inferred from bound data keys, the series attached to
//!   the axis, or stacked accumulations, then widened by reference elements and
//!   explicit bounds.
//! - **Scales** (linear, band, point) mapping domains into the plot rectangle.
//! - **Ticks** for axis labels, grid lines, and tooltip indexing.
//! - **Offsets**: the plot rectangle after margins, axes, brush, and legend.
//! - **Interaction**: pointer-to-row mapping and a validated data window (brush).
//! - **Sync**: a [`SyncBus`] that mirrors window and pointer state between
//!   independently-owned [`ChartInstance`]s.
//!
//! The pipeline is a pure function, [`recompute_layout`], returning an immutable
//! [`LayoutSnapshot`]. [`ChartInstance`] owns the mutable state (window, pointer,
//! subscription) and reruns the pipeline whenever that state changes.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod axis;
mod brush;
mod chart_spec;
mod declaration;
mod domain;
#[cfg(not(feature = "std"))]
mod float;
mod instance;
mod interaction;
mod layout;
mod legend;
mod measure;
mod scale;
mod snapshot;
mod stack;
mod sync;
mod tick;

pub use axis::{AxisMap, ResolvedAxis};
pub use brush::{AffectedCharts, BrushDeclaration, BrushWindow, WindowError};
pub use chart_spec::{AxisAdvisory, ChartOrientation, ChartSpec, Margin, SeriesGeometry};
pub use declaration::{
    AxisDeclaration, AxisId, AxisKind, AxisOrient, AxisPadding, AxisType, DomainBound,
    ReferenceElement, ReferenceShape, SeriesDeclaration,
};
pub use domain::Domain;
pub use instance::{ChartInstance, TooltipEntry};
pub use interaction::{nearest_tick_index, pointer_index};
pub use layout::{Offset, Size};
pub use legend::{LegendAlign, LegendItem, LegendLayout, LegendSpec, LegendVerticalAlign};
pub use measure::{HeuristicTextMeasurer, TextMeasurer};
pub use scale::{AxisScale, ScaleBand, ScaleLinear, ScalePoint};
pub use snapshot::{LayoutSnapshot, recompute_layout, recompute_layout_with};
pub use stack::{AxisStackGroups, StackGroup, StackGroupMap};
pub use sync::{InstanceId, PointerState, SyncBus, SyncEvent, SyncId, SyncPayload};
pub use tick::{Tick, TickMode};

pub use catchart_table::{DataTable, StackOffset, StackSpan, TableError, TableWindow, Value};
