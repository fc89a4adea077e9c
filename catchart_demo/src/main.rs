// Copyright 2025 the Catchart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two synchronized charts driven through a brush drag and a pointer move.
//!
//! Writes `catchart_demo.html` with one section per step. Set `RUST_LOG=debug` to watch
//! windows and sync events flow between the instances.

mod svg;

use catchart::{
    AffectedCharts, AxisDeclaration, AxisId, BrushDeclaration, ChartInstance, ChartSpec,
    DataTable, LegendSpec, SeriesDeclaration, StackOffset, SyncBus, SyncId,
};
use peniko::color::palette::css;

fn page_views() -> DataTable {
    DataTable::new()
        .with_column(
            "name",
            ["Page A", "Page B", "Page C", "Page D", "Page E", "Page F", "Page G"],
        )
        .and_then(|t| t.with_numbers("uv", [4000., 3000., 2000., 2780., 1890., 2390., 3490.]))
        .and_then(|t| t.with_numbers("pv", [2400., 1398., 9800., 3908., 4800., 3800., 4300.]))
        .and_then(|t| t.with_numbers("amt", [2400., 2210., 2290., 2000., 2181., 2500., 2100.]))
        .expect("demo table is rectangular")
}

fn line_chart(sync_id: SyncId) -> ChartSpec {
    ChartSpec::new(600.0, 260.0)
        .with_axis(AxisDeclaration::horizontal(AxisId(0)).with_data_key("name"))
        .with_axis(AxisDeclaration::vertical(AxisId(0)))
        .with_series(
            SeriesDeclaration::new("uv")
                .with_name("Unique visitors")
                .with_color(css::STEEL_BLUE),
        )
        .with_legend(LegendSpec::new())
        .with_brush(BrushDeclaration::new().with_affected_charts(AffectedCharts::All))
        .with_sync_id(sync_id)
}

fn stacked_chart(sync_id: SyncId) -> ChartSpec {
    ChartSpec::new(600.0, 220.0)
        .with_stack_offset(StackOffset::None)
        .with_axis(AxisDeclaration::horizontal(AxisId(0)).with_data_key("name"))
        .with_axis(AxisDeclaration::vertical(AxisId(0)))
        .with_series(
            SeriesDeclaration::new("pv")
                .with_name("Page views")
                .with_color(css::DARK_ORANGE)
                .with_stack_id("views"),
        )
        .with_series(
            SeriesDeclaration::new("amt")
                .with_name("Amount")
                .with_color(css::SEA_GREEN)
                .with_stack_id("views"),
        )
        .with_sync_id(sync_id)
}

struct Pair {
    line: (ChartInstance, ChartSpec),
    stacked: (ChartInstance, ChartSpec),
    table: DataTable,
}

impl Pair {
    fn section(&self, title: &str) -> String {
        format!(
            "<section><h2>{title}</h2>\n{}\n{}</section>\n",
            svg::render(&self.line.0, &self.line.1, &self.table),
            svg::render(&self.stacked.0, &self.stacked.1, &self.table),
        )
    }
}

fn main() {
    env_logger::init();

    let bus = SyncBus::new();
    let sync_id = SyncId(1);
    let table = page_views();
    let line_spec = line_chart(sync_id);
    let stacked_spec = stacked_chart(sync_id);
    let mut pair = Pair {
        line: (
            ChartInstance::new(line_spec.clone(), table.clone(), &bus),
            line_spec,
        ),
        stacked: (
            ChartInstance::new(stacked_spec.clone(), table.clone(), &bus),
            stacked_spec,
        ),
        table,
    };

    let mut sections = vec![pair.section("Initial layout")];

    match pair.line.0.brush_change(1, 4) {
        Ok(changed) => log::info!("brush to rows 1..=4 (changed: {changed})"),
        Err(err) => log::error!("brush rejected: {err}"),
    }
    sections.push(pair.section("Brushed to Page B ..= Page E"));

    if let Some(snapshot) = pair.line.0.snapshot() {
        if let Some(tick) = snapshot.tooltip_ticks.get(2) {
            let y = snapshot.offset.top + snapshot.offset.height / 2.0;
            let index = pair.line.0.pointer_move(tick.coordinate, y);
            log::info!("pointer over row {index:?}");
        }
    }
    sections.push(pair.section("Pointer mirrored onto the stacked chart"));

    if let Err(err) = pair.stacked.0.request_window(7, 2, AffectedCharts::All) {
        log::warn!("{err}; windows unchanged");
    }

    let html = format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>catchart demo</title></head>\n<body>\n{}</body></html>\n",
        sections.concat()
    );
    std::fs::write("catchart_demo.html", html).expect("write catchart_demo.html");
    println!("wrote catchart_demo.html");
}
