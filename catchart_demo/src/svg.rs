// Copyright 2025 the Catchart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG dump of a [`LayoutSnapshot`].

use catchart::{
    AxisKind, AxisOrient, ChartInstance, ChartSpec, DataTable, LayoutSnapshot, LegendSpec,
    ResolvedAxis, Value,
};
use kurbo::Point;
use peniko::Color;

const FONT_SIZE: f64 = 11.0;

pub(crate) fn render(chart: &ChartInstance, spec: &ChartSpec, table: &DataTable) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = spec.width,
        h = spec.height
    ));
    out.push('\n');
    let Some(snapshot) = chart.snapshot() else {
        out.push_str("</svg>\n");
        return out;
    };

    let plot = snapshot.offset.plot_rect();
    out.push_str(&format!(
        r##"<rect x="{}" y="{}" width="{}" height="{}" fill="#f7f7f7"/>"##,
        plot.x0,
        plot.y0,
        plot.width(),
        plot.height()
    ));
    out.push('\n');
    for axis in snapshot
        .horizontal_axes
        .values()
        .chain(snapshot.vertical_axes.values())
        .filter(|a| !a.declaration.hide)
    {
        write_axis(&mut out, axis);
    }
    write_series(&mut out, &snapshot, spec, table);
    write_pointer(&mut out, chart, &snapshot);

    if let Some(brush) = snapshot.brush {
        out.push_str(&format!(
            r##"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="#999"/>"##,
            brush.x0,
            brush.y0,
            brush.width(),
            brush.height()
        ));
        out.push('\n');
    }
    if let (Some(rect), Some(legend)) = (snapshot.legend, &spec.legend) {
        write_legend(&mut out, legend, spec, rect.origin());
    }
    out.push_str("</svg>\n");
    out
}

fn write_axis(out: &mut String, axis: &ResolvedAxis) {
    let g = axis.geometry;
    let (line, anchor) = match axis.declaration.orient {
        AxisOrient::Bottom => ((g.x0, g.y0, g.x1, g.y0), "middle"),
        AxisOrient::Top => ((g.x0, g.y1, g.x1, g.y1), "middle"),
        AxisOrient::Left => ((g.x1, g.y0, g.x1, g.y1), "end"),
        AxisOrient::Right => ((g.x0, g.y0, g.x0, g.y1), "start"),
    };
    out.push_str(&format!(
        r##"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="#666"/>"##,
        line.0,
        line.1,
        line.2,
        line.3
    ));
    out.push('\n');
    let centered = axis.scale.bandwidth() / 2.0;
    for tick in &axis.ticks {
        let c = tick.coordinate + centered;
        let pos = match axis.declaration.orient {
            AxisOrient::Bottom => Point::new(c, g.y0 + FONT_SIZE + 4.0),
            AxisOrient::Top => Point::new(c, g.y1 - 4.0),
            AxisOrient::Left => Point::new(g.x1 - 4.0, c + FONT_SIZE / 3.0),
            AxisOrient::Right => Point::new(g.x0 + 4.0, c + FONT_SIZE / 3.0),
        };
        out.push_str(&format!(
            r#"<text x="{}" y="{}" font-size="{FONT_SIZE}" text-anchor="{anchor}">{}</text>"#,
            pos.x,
            pos.y,
            escape_xml(&tick.label)
        ));
        out.push('\n');
    }
}

fn write_series(out: &mut String, snapshot: &LayoutSnapshot, spec: &ChartSpec, table: &DataTable) {
    let category_kind = spec.orientation.category_kind();
    let value_kind = spec.orientation.value_kind();
    let window = snapshot.window;
    for series in &spec.series {
        let (Some(category), Some(value)) = (
            snapshot.axes(category_kind).get(&series.axis_id(category_kind)),
            snapshot.axes(value_kind).get(&series.axis_id(value_kind)),
        ) else {
            log::warn!("series {} has no resolved axes", series.data_key);
            continue;
        };
        let stacked = snapshot
            .stack_groups
            .get(&series.axis_id(value_kind))
            .and_then(|groups| {
                groups
                    .groups
                    .iter()
                    .filter(|g| g.has_stack)
                    .find_map(|g| g.spans_of(&series.data_key))
            });
        let centered = category.scale.bandwidth() / 2.0;
        let mut points = String::new();
        for (i, row) in (window.start_index..=window.end_index).enumerate() {
            let v = match stacked {
                Some(spans) => spans.get(row).map(|&(_, end)| end),
                None => table.f64(row, &series.data_key),
            };
            let (Some(c), Some(v)) = (category.scale.map_index(i), v) else {
                continue;
            };
            let Some(v) = value.scale.map(&Value::Number(v)) else {
                continue;
            };
            let p = match category_kind {
                AxisKind::Horizontal => Point::new(c + centered, v),
                AxisKind::Vertical => Point::new(v, c + centered),
            };
            points.push_str(&format!("{},{} ", p.x, p.y));
        }
        out.push_str(&format!(
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="2"/>"#,
            points.trim_end(),
            hex(series.color)
        ));
        out.push('\n');
    }
}

fn write_pointer(out: &mut String, chart: &ChartInstance, snapshot: &LayoutSnapshot) {
    let pointer = chart.pointer();
    let Some(tick) = pointer
        .index
        .filter(|_| pointer.active)
        .and_then(|i| snapshot.tooltip_ticks.get(i))
    else {
        return;
    };
    let plot = snapshot.offset.plot_rect();
    out.push_str(&format!(
        r##"<line x1="{c}" y1="{}" x2="{c}" y2="{}" stroke="#333" stroke-dasharray="3 3"/>"##,
        plot.y0,
        plot.y1,
        c = tick.coordinate
    ));
    out.push('\n');
    let mut label = format!("{}:", tick.label);
    for entry in chart.tooltip_payload() {
        label.push_str(&format!(" {}={}", entry.name, entry.value));
    }
    out.push_str(&format!(
        r#"<text x="{}" y="{}" font-size="{FONT_SIZE}">{}</text>"#,
        tick.coordinate + 4.0,
        plot.y0 + FONT_SIZE,
        escape_xml(&label)
    ));
    out.push('\n');
}

fn write_legend(out: &mut String, legend: &LegendSpec, spec: &ChartSpec, origin: Point) {
    let mut x = origin.x;
    for item in legend.items_for(&spec.series) {
        out.push_str(&format!(
            r#"<rect x="{x}" y="{}" width="{s}" height="{s}" fill="{}"/>"#,
            origin.y,
            hex(item.color),
            s = legend.icon_size
        ));
        out.push('\n');
        let text_x = x + legend.icon_size + legend.icon_gap;
        out.push_str(&format!(
            r#"<text x="{text_x}" y="{}" font-size="{}">{}</text>"#,
            origin.y + legend.icon_size - 2.0,
            legend.font_size,
            escape_xml(&item.label)
        ));
        out.push('\n');
        x = text_x + 0.6 * legend.font_size * item.label.chars().count() as f64 + legend.item_gap;
    }
}

fn hex(color: Color) -> String {
    let rgba = color.to_rgba8();
    format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
