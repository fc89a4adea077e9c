// Copyright 2025 the Catchart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick generation.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use catchart_table::Value;

use crate::scale::{AxisScale, tick_step};

/// Where ticks sit on band scales.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TickMode {
    /// Leading band edge, for tick marks and grid lines.
    #[default]
    Edge,
    /// Band center, for tooltip indexing and centered labels.
    Center,
}

/// One tick on an axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    /// Data value of the tick.
    pub value: Value,
    /// Pixel coordinate along the axis.
    pub coordinate: f64,
    /// Display label.
    pub label: String,
    /// Position of the tick in its sequence (the window-relative row for category axes).
    pub index: usize,
}

/// Produces the tick sequence of a scale.
///
/// Linear scales yield nice ticks over their domain; discrete scales yield one tick per
/// category. When `duplicate_domain` is set, discrete labels are read from it instead of
/// from the (serial index) categories.
pub(crate) fn ticks_for(
    scale: &AxisScale,
    duplicate_domain: Option<&[Value]>,
    tick_count: usize,
    allow_decimals: bool,
    mode: TickMode,
) -> Vec<Tick> {
    match scale {
        AxisScale::Linear(linear) => {
            let (lo, hi) = linear.domain();
            let step = tick_step(lo, hi, tick_count, allow_decimals);
            linear
                .ticks(tick_count, allow_decimals)
                .into_iter()
                .enumerate()
                .map(|(index, v)| Tick {
                    value: Value::Number(v),
                    coordinate: linear.map(v),
                    label: format_number(v, step),
                    index,
                })
                .collect()
        }
        AxisScale::Band { categories, .. } | AxisScale::Point { categories, .. } => {
            let shift = match mode {
                TickMode::Edge => 0.0,
                TickMode::Center => scale.bandwidth() / 2.0,
            };
            categories
                .iter()
                .enumerate()
                .filter_map(|(index, value)| {
                    let coordinate = scale.map_index(index)? + shift;
                    let label = duplicate_domain
                        .and_then(|d| d.get(index))
                        .unwrap_or(value)
                        .to_string();
                    Some(Tick {
                        value: value.clone(),
                        coordinate,
                        label,
                        index,
                    })
                })
                .collect()
        }
    }
}

/// Formats `v` with as many decimals as `step` needs.
fn format_number(v: f64, step: f64) -> String {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "steps below 1 have small negative exponents"
    )]
    let decimals = if step > 0.0 && step < 1.0 {
        (-step.log10().floor()).clamp(0.0, 20.0) as usize
    } else {
        0
    };
    // Avoid "-0" labels.
    let v = if v == 0.0 { 0.0 } else { v };
    format!("{v:.decimals$}")
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::scale::{ScaleBand, ScaleLinear};

    #[test]
    fn linear_ticks_carry_coordinates_and_labels() {
        let scale = AxisScale::Linear(ScaleLinear::new((0.0, 1.0), (100.0, 0.0)));
        let ticks = ticks_for(&scale, None, 5, true, TickMode::Edge);
        let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["0.0", "0.2", "0.4", "0.6", "0.8", "1.0"]);
        assert!((ticks[5].coordinate - 0.0).abs() < 1e-9, "top");
        assert!((ticks[0].coordinate - 100.0).abs() < 1e-9, "bottom");
    }

    #[test]
    fn center_mode_shifts_by_half_band() {
        let scale = AxisScale::Band {
            scale: ScaleBand::new((0.0, 60.0), 3),
            categories: alloc::vec![Value::from("a"), Value::from("b"), Value::from("c")],
        };
        let edge = ticks_for(&scale, None, 5, true, TickMode::Edge);
        let center = ticks_for(&scale, None, 5, true, TickMode::Center);
        assert_eq!(edge[1].coordinate, 20.0);
        assert_eq!(center[1].coordinate, 30.0);
        assert_eq!(center[2].label, "c");
    }

    #[test]
    fn duplicate_domain_supplies_labels() {
        let scale = AxisScale::Band {
            scale: ScaleBand::new((0.0, 20.0), 2),
            categories: alloc::vec![Value::Number(0.0), Value::Number(1.0)],
        };
        let labels = [Value::from("x"), Value::from("x")];
        let ticks = ticks_for(&scale, Some(&labels[..]), 5, true, TickMode::Edge);
        assert_eq!(ticks[1].label, "x");
        assert_eq!(ticks[1].value, Value::Number(1.0));
    }

    #[test]
    fn negative_zero_is_formatted_as_zero() {
        assert_eq!(format_number(-0.0, 1.0), "0");
        assert_eq!(format_number(-0.0, 0.5), "0.0");
    }
}
