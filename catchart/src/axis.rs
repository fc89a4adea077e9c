// Copyright 2025 the Catchart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis resolution.
//!
//! Resolution runs in two passes:
//! - [`resolve_axes`] turns declarations (or series references, when nothing is
//!   declared) into one [`AxisConfig`] per axis id, with its data domain.
//! - [`arrange_axes`] runs once the plot offset is known: it assigns pixel ranges,
//!   niceifies numeric domains, builds scales and ticks, and stacks axis geometry
//!   outward from the plot edges.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use catchart_table::{StackOffset, TableWindow, Value};
use kurbo::Rect;

use crate::brush::BrushWindow;
use crate::chart_spec::{ChartOrientation, SeriesGeometry};
use crate::declaration::{
    AxisDeclaration, AxisId, AxisKind, AxisOrient, AxisType, ReferenceElement, SeriesDeclaration,
};
use crate::domain::{
    Domain, apply_declared_bounds, distinct, domain_of_key, domain_of_series, has_duplicate,
    index_domain, widen,
};
use crate::layout::{Offset, Size};
use crate::scale::{AxisScale, build_scale, nice_domain};
use crate::stack::StackGroupMap;
use crate::tick::{Tick, TickMode, ticks_for};

/// A fully resolved axis, ready for drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedAxis {
    /// The declaration this axis was resolved from (synthesized if none was given).
    pub declaration: AxisDeclaration,
    /// Whether the declaration was synthesized from series references.
    pub synthesized: bool,
    /// Final domain, after widening, explicit bounds, and nice extension.
    pub domain: Domain,
    /// Real category values when duplicates forced a serial index domain.
    pub duplicate_domain: Option<Vec<Value>>,
    /// Domain before nice extension.
    pub original_domain: Domain,
    /// Pixel range the domain maps onto.
    pub range: (f64, f64),
    /// Coordinate mapping.
    pub scale: AxisScale,
    /// Tick sequence (band edges for band scales).
    pub ticks: Vec<Tick>,
    /// Box the axis occupies on the canvas.
    pub geometry: Rect,
}

/// Resolved axes of one kind, keyed by id.
pub type AxisMap = BTreeMap<AxisId, ResolvedAxis>;

/// An axis with its data domain, before pixel layout.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct AxisConfig {
    pub(crate) declaration: AxisDeclaration,
    pub(crate) synthesized: bool,
    pub(crate) domain: Domain,
    pub(crate) duplicate_domain: Option<Vec<Value>>,
}

/// Inputs shared by every axis of a chart during domain resolution.
#[derive(Clone, Copy, Debug)]
pub(crate) struct DomainContext<'a> {
    pub(crate) window: TableWindow<'a>,
    pub(crate) rows: BrushWindow,
    pub(crate) series: &'a [SeriesDeclaration],
    pub(crate) references: &'a [ReferenceElement],
    pub(crate) stack_groups: &'a StackGroupMap,
    pub(crate) orientation: ChartOrientation,
    pub(crate) stack_offset: StackOffset,
}

/// Resolves every axis of `kind`.
///
/// Declared axes come first, in declaration order; the first declaration of an id wins.
/// Series referencing an id with no declaration get a synthesized, hidden axis whose
/// orientation alternates between the two slots of `kind`.
pub(crate) fn resolve_axes(
    kind: AxisKind,
    declarations: &[AxisDeclaration],
    ctx: &DomainContext<'_>,
) -> BTreeMap<AxisId, AxisConfig> {
    let mut out = BTreeMap::new();
    for decl in declarations.iter().filter(|a| a.kind == kind) {
        if out.contains_key(&decl.id) {
            log::debug!("ignoring duplicate {kind:?} axis declaration {}", decl.id.0);
            continue;
        }
        out.insert(decl.id, resolve_one(decl.clone(), false, ctx));
    }

    let category_kind = ctx.orientation.category_kind();
    let slots = kind.orient_slots();
    let mut synthesized = 0;
    for s in ctx.series {
        let id = s.axis_id(kind);
        if out.contains_key(&id) {
            continue;
        }
        let axis_type = if kind == category_kind {
            AxisType::Category
        } else {
            AxisType::Number
        };
        let decl = AxisDeclaration::default_for(kind, id)
            .with_type(axis_type)
            .with_orient(slots[synthesized % 2])
            .with_hide(true);
        synthesized += 1;
        log::trace!("synthesized {kind:?} axis {} ({axis_type:?})", id.0);
        out.insert(id, resolve_one(decl, true, ctx));
    }
    out
}

fn resolve_one(
    declaration: AxisDeclaration,
    synthesized: bool,
    ctx: &DomainContext<'_>,
) -> AxisConfig {
    let kind = declaration.kind;
    let id = declaration.id;
    let axis_type = declaration.axis_type;
    let categorical = kind == ctx.orientation.category_kind();
    let len = ctx.window.row_count();
    let mut duplicate_domain = None;

    let data_domain = if let Some(key) = &declaration.data_key {
        match domain_of_key(&ctx.window, key, axis_type) {
            Some(Domain::Categories(values)) if has_duplicate(&values) => {
                duplicate_domain = Some(values);
                Some(index_domain(len))
            }
            Some(Domain::Categories(values)) => {
                Some(Domain::Categories(distinct(values.iter())))
            }
            other => other,
        }
    } else if categorical {
        Some(match axis_type {
            AxisType::Category => index_domain(len),
            AxisType::Number => Domain::Continuous(0.0, len.saturating_sub(1) as f64),
        })
    } else if axis_type == AxisType::Number
        && ctx
            .stack_groups
            .get(&id)
            .is_some_and(|groups| groups.has_stack)
    {
        if ctx.stack_offset == StackOffset::Expand {
            Some(Domain::Continuous(0.0, 1.0))
        } else {
            ctx.stack_groups
                .get(&id)
                .and_then(|groups| groups.extent(ctx.rows))
                .map(|(lo, hi)| Domain::Continuous(lo, hi))
        }
    } else {
        domain_of_series(
            &ctx.window,
            ctx.series.iter().filter(|s| s.axis_id(kind) == id),
            axis_type,
        )
    };

    let domain = match (axis_type, data_domain) {
        (AxisType::Number, domain) => {
            let bounds = domain.and_then(|d| d.bounds()).unwrap_or((0.0, 0.0));
            let bounds = widen(
                bounds,
                ctx.references
                    .iter()
                    .filter(|r| r.always_show && r.axis_id(kind) == id)
                    .flat_map(|r| r.values_along(kind)),
            );
            let bounds = match &declaration.domain {
                Some(declared) => {
                    apply_declared_bounds(declared, bounds, declaration.allow_data_overflow)
                }
                None => bounds,
            };
            Domain::Continuous(bounds.0, bounds.1)
        }
        (AxisType::Category, Some(domain)) => domain,
        (AxisType::Category, None) => Domain::Categories(Vec::new()),
    };

    AxisConfig {
        declaration,
        synthesized,
        domain,
        duplicate_domain,
    }
}

/// Pixel layout inputs shared by every axis of a chart.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ArrangeContext {
    pub(crate) canvas: Size,
    pub(crate) offset: Offset,
    pub(crate) orientation: ChartOrientation,
    pub(crate) geometry: SeriesGeometry,
}

/// Assigns ranges, scales, ticks, and geometry to resolved axes of one kind.
pub(crate) fn arrange_axes(
    configs: BTreeMap<AxisId, AxisConfig>,
    ctx: &ArrangeContext,
) -> AxisMap {
    let offset = &ctx.offset;
    let mut steps = Steps {
        top: offset.top,
        bottom: ctx.canvas.height - offset.bottom,
        left: offset.left,
        right: ctx.canvas.width - offset.right,
    };

    configs
        .into_iter()
        .map(|(id, config)| {
            let AxisConfig {
                declaration: decl,
                synthesized,
                domain: original_domain,
                duplicate_domain,
            } = config;
            let pad = decl.padding;
            let range = match decl.kind {
                AxisKind::Horizontal => (
                    offset.left + pad.start,
                    offset.left + offset.width - pad.end,
                ),
                AxisKind::Vertical if ctx.orientation == ChartOrientation::Horizontal => (
                    offset.top + offset.height - pad.end,
                    offset.top + pad.start,
                ),
                AxisKind::Vertical => (
                    offset.top + pad.start,
                    offset.top + offset.height - pad.end,
                ),
            };

            let domain = match &original_domain {
                Domain::Continuous(lo, hi) if wants_nice(&decl) => {
                    let (lo, hi) = nice_domain((*lo, *hi), decl.tick_count, decl.allow_decimals);
                    Domain::Continuous(lo, hi)
                }
                other => other.clone(),
            };

            let scale = build_scale(
                &domain,
                decl.axis_type,
                ctx.geometry,
                range,
                !decl.allow_data_overflow,
            );
            let ticks = ticks_for(
                &scale,
                duplicate_domain.as_deref(),
                decl.tick_count,
                decl.allow_decimals,
                TickMode::Edge,
            );
            let geometry = steps.place(&decl, offset);

            (
                id,
                ResolvedAxis {
                    declaration: decl,
                    synthesized,
                    domain,
                    duplicate_domain,
                    original_domain,
                    range,
                    scale,
                    ticks,
                    geometry,
                },
            )
        })
        .collect()
}

/// A numeric axis with a tick count and an `Auto` bound gets its domain extended to
/// the outermost nice ticks.
fn wants_nice(decl: &AxisDeclaration) -> bool {
    decl.axis_type == AxisType::Number
        && decl.tick_count > 0
        && decl
            .domain
            .as_ref()
            .is_some_and(|[lo, hi]| lo.is_auto() || hi.is_auto())
}

/// Running outer edge of each side while axes are stacked outward.
struct Steps {
    top: f64,
    bottom: f64,
    left: f64,
    right: f64,
}

impl Steps {
    fn place(&mut self, decl: &AxisDeclaration, offset: &Offset) -> Rect {
        let t = decl.thickness;
        let advance = if decl.hide { 0.0 } else { t };
        match decl.orient {
            AxisOrient::Top => {
                let y = self.top - t;
                self.top -= advance;
                Rect::new(offset.left, y, offset.left + offset.width, y + t)
            }
            AxisOrient::Bottom => {
                let y = self.bottom;
                self.bottom += advance;
                Rect::new(offset.left, y, offset.left + offset.width, y + t)
            }
            AxisOrient::Left => {
                let x = self.left - t;
                self.left -= advance;
                Rect::new(x, offset.top, x + t, offset.top + offset.height)
            }
            AxisOrient::Right => {
                let x = self.right;
                self.right += advance;
                Rect::new(x, offset.top, x + t, offset.top + offset.height)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use catchart_table::DataTable;

    use super::*;
    use crate::declaration::{DomainBound, ReferenceShape};
    use crate::stack::build_stack_groups;

    fn table() -> DataTable {
        DataTable::new()
            .with_column("name", ["A", "B", "B", "C"])
            .and_then(|t| t.with_numbers("uv", [40.0, 30.0, 20.0, 27.0]))
            .and_then(|t| t.with_numbers("pv", [24.0, 13.0, 98.0, 39.0]))
            .expect("valid table")
    }

    fn resolve(
        table: &DataTable,
        kind: AxisKind,
        axes: &[AxisDeclaration],
        series: &[SeriesDeclaration],
        references: &[ReferenceElement],
    ) -> BTreeMap<AxisId, AxisConfig> {
        let rows = BrushWindow::full(table.row_count()).expect("rows");
        let stacks = build_stack_groups(table, series, AxisKind::Vertical, StackOffset::None);
        let ctx = DomainContext {
            window: table.full_window(),
            rows,
            series,
            references,
            stack_groups: &stacks,
            orientation: ChartOrientation::Horizontal,
            stack_offset: StackOffset::None,
        };
        resolve_axes(kind, axes, &ctx)
    }

    #[test]
    fn first_declaration_wins() {
        let t = table();
        let axes = [
            AxisDeclaration::vertical(AxisId(0)).with_thickness(10.0),
            AxisDeclaration::vertical(AxisId(0)).with_thickness(99.0),
        ];
        let series = [SeriesDeclaration::new("uv")];
        let map = resolve(&t, AxisKind::Vertical, &axes, &series, &[]);
        assert_eq!(map.len(), 1);
        assert_eq!(map[&AxisId(0)].declaration.thickness, 10.0);
        // Default `[0, auto]` bounds widen the lower end to zero.
        assert_eq!(map[&AxisId(0)].domain, Domain::Continuous(0.0, 40.0));
    }

    #[test]
    fn synthesized_axes_are_hidden_and_alternate() {
        let t = table();
        let series = [
            SeriesDeclaration::new("uv"),
            SeriesDeclaration::new("pv").with_axes(AxisId(0), AxisId(1)),
        ];
        let map = resolve(&t, AxisKind::Vertical, &[], &series, &[]);
        let a = &map[&AxisId(0)];
        let b = &map[&AxisId(1)];
        assert!(a.synthesized && a.declaration.hide);
        assert_eq!(a.declaration.orient, AxisOrient::Left);
        assert_eq!(b.declaration.orient, AxisOrient::Right);
        assert_eq!(b.domain, Domain::Continuous(0.0, 98.0));

        let x = resolve(&t, AxisKind::Horizontal, &[], &series, &[]);
        assert_eq!(x[&AxisId(0)].declaration.axis_type, AxisType::Category);
        assert_eq!(x[&AxisId(0)].domain.category_count(), 4);
    }

    #[test]
    fn duplicate_categories_fall_back_to_index_domain() {
        let t = table();
        let axes = [AxisDeclaration::horizontal(AxisId(0)).with_data_key("name")];
        let map = resolve(&t, AxisKind::Horizontal, &axes, &[], &[]);
        let x = &map[&AxisId(0)];
        assert_eq!(x.domain.categories().map(<[Value]>::len), Some(4));
        assert_eq!(x.domain.categories().map(|c| c[3].clone()), Some(Value::Number(3.0)));
        assert_eq!(
            x.duplicate_domain.as_ref().map(|d| d[2].clone()),
            Some(Value::from("B"))
        );
    }

    #[test]
    fn duplicate_categories_on_value_axis_keep_labels() {
        let t = table();
        let axes = [AxisDeclaration::vertical(AxisId(0))
            .with_type(AxisType::Category)
            .with_data_key("name")];
        let series = [SeriesDeclaration::new("uv")];
        let map = resolve(&t, AxisKind::Vertical, &axes, &series, &[]);
        let y = &map[&AxisId(0)];
        assert_eq!(y.domain.category_count(), 4);
        assert_eq!(y.domain.categories().map(|c| c[1].clone()), Some(Value::Number(1.0)));
        assert_eq!(
            y.duplicate_domain.as_ref().map(Vec::len),
            Some(4),
            "every row label is kept"
        );
    }

    #[test]
    fn references_and_bounds_adjust_numeric_domain() {
        let t = table();
        let axes = [AxisDeclaration::vertical(AxisId(0))
            .with_domain(DomainBound::DataOffset(-5.0), DomainBound::Auto)];
        let series = [SeriesDeclaration::new("uv")];
        let refs = [
            ReferenceElement::horizontal_line(55.0).with_always_show(true),
            ReferenceElement::horizontal_line(500.0),
            ReferenceElement::new(ReferenceShape::Dot { x: 1.0, y: 5.0 })
                .with_axes(AxisId(0), AxisId(7))
                .with_always_show(true),
        ];
        let map = resolve(&t, AxisKind::Vertical, &axes, &series, &refs);
        assert_eq!(map[&AxisId(0)].domain, Domain::Continuous(15.0, 55.0));
    }

    #[test]
    fn stacked_axis_uses_accumulated_extent() {
        let t = table();
        let series = [
            SeriesDeclaration::new("uv").with_stack_id("a"),
            SeriesDeclaration::new("pv").with_stack_id("a"),
        ];
        let axes = [AxisDeclaration::vertical(AxisId(0)).without_domain()];
        let map = resolve(&t, AxisKind::Vertical, &axes, &series, &[]);
        assert_eq!(map[&AxisId(0)].domain, Domain::Continuous(0.0, 118.0));
    }

    #[test]
    fn unstacked_series_widen_stacked_axis() {
        let t = table();
        let series = [
            SeriesDeclaration::new("uv").with_stack_id("a"),
            SeriesDeclaration::new("uv").with_stack_id("a"),
            SeriesDeclaration::new("pv"),
        ];
        let axes = [AxisDeclaration::vertical(AxisId(0)).without_domain()];
        let map = resolve(&t, AxisKind::Vertical, &axes, &series, &[]);
        assert_eq!(map[&AxisId(0)].domain, Domain::Continuous(0.0, 98.0));
    }

    #[test]
    fn arrange_inverts_value_axis_and_stacks_geometry() {
        let t = table();
        let axes = [
            AxisDeclaration::vertical(AxisId(0)),
            AxisDeclaration::vertical(AxisId(1)).with_thickness(40.0),
        ];
        let series = [
            SeriesDeclaration::new("uv"),
            SeriesDeclaration::new("pv").with_axes(AxisId(0), AxisId(1)),
        ];
        let configs = resolve(&t, AxisKind::Vertical, &axes, &series, &[]);
        let offset = Offset {
            top: 10.0,
            right: 10.0,
            bottom: 10.0,
            left: 110.0,
            width: 280.0,
            height: 200.0,
            brush_bottom: 10.0,
        };
        let ctx = ArrangeContext {
            canvas: Size::new(400.0, 220.0),
            offset,
            orientation: ChartOrientation::Horizontal,
            geometry: SeriesGeometry::Connected,
        };
        let map = arrange_axes(configs, &ctx);
        let y0 = &map[&AxisId(0)];
        assert_eq!(y0.range, (210.0, 10.0));
        assert_eq!(y0.geometry, Rect::new(50.0, 10.0, 110.0, 210.0));
        assert_eq!(map[&AxisId(1)].geometry, Rect::new(10.0, 10.0, 50.0, 210.0));
        // 0..98 is extended to the nice tick 100.
        assert_eq!(map[&AxisId(1)].domain, Domain::Continuous(0.0, 100.0));
        assert_eq!(map[&AxisId(1)].original_domain, Domain::Continuous(0.0, 98.0));
        let top = y0.scale.map(&Value::Number(40.0)).expect("numeric");
        assert!((top - 10.0).abs() < 1e-9, "max maps to plot top");
    }
}
