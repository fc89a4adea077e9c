// Copyright 2025 the Catchart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer to row mapping.

use kurbo::Point;

use crate::chart_spec::ChartOrientation;
use crate::layout::Offset;
use crate::tick::Tick;

/// Returns the index of the tick closest to `pos`.
///
/// Equal distances resolve to the lower index. Returns `None` for an empty tick list.
pub fn nearest_tick_index(pos: f64, ticks: &[Tick]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for tick in ticks {
        let d = (tick.coordinate - pos).abs();
        let closer = match best {
            None => true,
            Some((index, dist)) => d < dist || (d == dist && tick.index < index),
        };
        if closer {
            best = Some((tick.index, d));
        }
    }
    best.map(|(index, _)| index)
}

/// Maps a pointer position (canvas pixels) to the window-relative row under it.
///
/// `ticks` are the ticks of the axis that walks over rows. Returns `None` when the
/// pointer is outside the plot rectangle.
pub fn pointer_index(
    offset: &Offset,
    orientation: ChartOrientation,
    ticks: &[Tick],
    pointer: Point,
) -> Option<usize> {
    if !offset.contains(pointer) {
        return None;
    }
    let pos = match orientation {
        ChartOrientation::Horizontal => pointer.x,
        ChartOrientation::Vertical => pointer.y,
    };
    nearest_tick_index(pos, ticks)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::String;
    use alloc::vec::Vec;

    use catchart_table::Value;

    use super::*;

    fn even_ticks(n: usize, lo: f64, hi: f64) -> Vec<Tick> {
        (0..n)
            .map(|i| Tick {
                value: Value::Number(i as f64),
                coordinate: lo + (hi - lo) * i as f64 / (n - 1) as f64,
                label: String::new(),
                index: i,
            })
            .collect()
    }

    #[test]
    fn exact_tick_positions_round_trip() {
        let ticks = even_ticks(7, 20.0, 380.0);
        for (k, tick) in ticks.iter().enumerate() {
            assert_eq!(nearest_tick_index(tick.coordinate, &ticks), Some(k));
        }
    }

    #[test]
    fn ties_resolve_to_lower_index() {
        let ticks = even_ticks(3, 0.0, 100.0);
        assert_eq!(nearest_tick_index(25.0, &ticks), Some(0));
        assert_eq!(nearest_tick_index(75.0, &ticks), Some(1));
        assert_eq!(nearest_tick_index(75.1, &ticks), Some(2));
        assert_eq!(nearest_tick_index(0.0, &[]), None);
    }

    #[test]
    fn outside_plot_is_not_found() {
        let offset = Offset {
            left: 10.0,
            top: 10.0,
            width: 100.0,
            height: 100.0,
            ..Offset::default()
        };
        let ticks = even_ticks(3, 10.0, 110.0);
        let horizontal = ChartOrientation::Horizontal;
        assert_eq!(
            pointer_index(&offset, horizontal, &ticks, Point::new(5.0, 50.0)),
            None
        );
        assert_eq!(
            pointer_index(&offset, horizontal, &ticks, Point::new(110.0, 50.0)),
            Some(2)
        );
        let vertical = ChartOrientation::Vertical;
        assert_eq!(
            pointer_index(&offset, vertical, &ticks, Point::new(50.0, 58.0)),
            Some(1)
        );
    }
}
