// Copyright 2025 the Catchart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stacking transform.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::table::TableWindow;

/// Stack baseline offset mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StackOffset {
    /// Cumulative sums with no normalization.
    ///
    /// Positive values stack upward from 0 and negative values stack downward from 0, so a
    /// row's extent is `[sum of negatives, sum of positives]`.
    #[default]
    None,
    /// Normalize each row so its stacked magnitudes sum to `1.0`.
    ///
    /// Segments are stacked upward from 0 using absolute values.
    Expand,
    /// Streamgraph "wiggle" baseline (D3's `stackOffsetWiggle`).
    ///
    /// The baseline of each row is shifted from the previous row's baseline so that the
    /// weighted change in slope across layers is minimized.
    Wiggle,
    /// Center each row around zero (D3's `stackOffsetSilhouette`).
    Silhouette,
}

/// A stacked segment: `(start, end)` in data units.
pub type StackSpan = (f64, f64);

/// Stacks `keys` (in order) over every row of `window`.
///
/// Returns one span list per key, each with one entry per window row. Missing or
/// non-finite cells stack as `0`.
pub fn stack_columns(
    window: &TableWindow<'_>,
    keys: &[&str],
    offset: StackOffset,
) -> Vec<Vec<StackSpan>> {
    let rows = window.row_count();
    let values: Vec<Vec<f64>> = keys
        .iter()
        .map(|key| (0..rows).map(|row| window.f64(row, key).unwrap_or(0.0)).collect())
        .collect();

    match offset {
        StackOffset::None => stack_diverging(&values, rows),
        StackOffset::Expand => stack_expand(&values, rows),
        StackOffset::Silhouette => {
            let baseline: Vec<f64> = (0..rows)
                .map(|row| -0.5 * values.iter().map(|s| s[row]).sum::<f64>())
                .collect();
            stack_from_baseline(&values, &baseline)
        }
        StackOffset::Wiggle => {
            let baseline = wiggle_baseline(&values, rows);
            stack_from_baseline(&values, &baseline)
        }
    }
}

fn stack_diverging(values: &[Vec<f64>], rows: usize) -> Vec<Vec<StackSpan>> {
    let mut out = vec![Vec::with_capacity(rows); values.len()];
    for row in 0..rows {
        let mut pos = 0.0;
        let mut neg = 0.0;
        for (series, spans) in values.iter().zip(out.iter_mut()) {
            let v = series[row];
            if v >= 0.0 {
                let start = pos;
                pos += v;
                spans.push((start, pos));
            } else {
                let start = neg;
                neg += v;
                spans.push((start, neg));
            }
        }
    }
    out
}

fn stack_expand(values: &[Vec<f64>], rows: usize) -> Vec<Vec<StackSpan>> {
    let mut out = vec![Vec::with_capacity(rows); values.len()];
    for row in 0..rows {
        let total: f64 = values.iter().map(|s| s[row].abs()).sum();
        let mut acc = 0.0;
        for (series, spans) in values.iter().zip(out.iter_mut()) {
            let h = if total > 0.0 {
                series[row].abs() / total
            } else {
                0.0
            };
            let start = acc;
            acc += h;
            spans.push((start, acc));
        }
    }
    out
}

fn stack_from_baseline(values: &[Vec<f64>], baseline: &[f64]) -> Vec<Vec<StackSpan>> {
    let mut out = vec![Vec::with_capacity(baseline.len()); values.len()];
    for (row, &base) in baseline.iter().enumerate() {
        let mut acc = base;
        for (series, spans) in values.iter().zip(out.iter_mut()) {
            let start = acc;
            acc += series[row];
            spans.push((start, acc));
        }
    }
    out
}

/// Per-row baseline for the wiggle offset.
///
/// Row 0 sits on zero. Each following baseline moves by the value-weighted mean of the
/// layers' center slopes between the two rows, in the opposite direction.
fn wiggle_baseline(values: &[Vec<f64>], rows: usize) -> Vec<f64> {
    let mut baseline = Vec::with_capacity(rows);
    if rows == 0 {
        return baseline;
    }
    let mut y = 0.0;
    baseline.push(y);
    for row in 1..rows {
        let mut weight = 0.0;
        let mut weighted_slope = 0.0;
        let mut below = 0.0;
        for series in values {
            let cur = series[row];
            let prev = series[row - 1];
            let slope = below + 0.5 * (cur - prev);
            weight += cur;
            weighted_slope += slope * cur;
            below += cur - prev;
        }
        if weight != 0.0 {
            y -= weighted_slope / weight;
        }
        baseline.push(y);
    }
    baseline
}
