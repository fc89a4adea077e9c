// Copyright 2025 the Catchart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scale utilities.
//!
//! These types provide the coordinate mapping from an axis domain into its pixel range.

extern crate alloc;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use catchart_table::Value;

use crate::chart_spec::SeriesGeometry;
use crate::declaration::AxisType;
use crate::domain::Domain;

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
    clamp: bool,
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            clamp: false,
        }
    }

    /// Clamps mapped values to the range.
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        let mut t = (x - d0) / denom;
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        r0 + t * (r1 - r0)
    }

    /// Maps a range position back into domain space.
    pub fn invert(&self, y: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = r1 - r0;
        if denom == 0.0 {
            return d0;
        }
        d0 + (y - r0) / denom * (d1 - d0)
    }

    /// Returns the configured domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Returns the configured range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns "nice-ish" tick values inside the domain.
    ///
    /// With `allow_decimals == false` the tick step is at least `1`.
    pub fn ticks(&self, count: usize, allow_decimals: bool) -> Vec<f64> {
        let (lo, hi) = ordered(self.domain);
        let eps = (hi - lo).abs() * 1e-9;
        let mut ticks = nice_ticks(lo, hi, count, allow_decimals);
        ticks.retain(|t| *t >= lo - eps && *t <= hi + eps);
        ticks
    }
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Extends `domain` outward to the first and last nice tick.
///
/// Returns the domain unchanged if fewer than two ticks exist.
pub(crate) fn nice_domain(domain: (f64, f64), count: usize, allow_decimals: bool) -> (f64, f64) {
    let ticks = nice_ticks(domain.0, domain.1, count, allow_decimals);
    match (ticks.first(), ticks.last()) {
        (Some(&first), Some(&last)) if ticks.len() >= 2 => (first, last),
        _ => domain,
    }
}

/// Step between consecutive nice ticks of `[min, max]`.
pub(crate) fn tick_step(min: f64, max: f64, count: usize, allow_decimals: bool) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let span = (max - min).abs();
    let step = nice_step(span / count as f64);
    if !allow_decimals && step > 0.0 && step < 1.0 {
        1.0
    } else {
        step
    }
}

fn nice_ticks(mut min: f64, mut max: f64, count: usize, allow_decimals: bool) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return alloc::vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }
    let step = tick_step(min, max, count, allow_decimals);
    if step == 0.0 {
        return alloc::vec![min, max];
    }

    let start = (min / step).floor() * step;
    let stop = (max / step).ceil() * step;

    let n_f = ((stop - start) / step).round();
    let n = if n_f.is_finite() && n_f >= 0.0 {
        let n_f = n_f.min(10_000.0);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "guarded by finite/non-negative checks and capped at 10k"
        )]
        {
            n_f as u64
        }
    } else {
        0
    };
    // Snap to the step grid so 0.1 + 0.2 style drift does not leak into labels.
    (0..=n)
        .map(|i| ((start / step).round() + i as f64) * step)
        .collect()
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

/// Shared positioning of band and point scales.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Ordinal {
    range: (f64, f64),
    count: usize,
    padding_inner: f64,
    padding_outer: f64,
}

impl Ordinal {
    fn reversed(&self) -> bool {
        self.range.1 < self.range.0
    }

    fn step_and_start(&self) -> (f64, f64) {
        let (lo, hi) = ordered(self.range);
        let n = self.count as f64;
        let step = (hi - lo) / (n - self.padding_inner + 2.0 * self.padding_outer).max(1.0);
        let start = lo + (hi - lo - step * (n - self.padding_inner)) * 0.5;
        (step, start)
    }

    fn step(&self) -> f64 {
        self.step_and_start().0
    }

    fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }

    fn position(&self, index: usize) -> Option<f64> {
        if index >= self.count {
            return None;
        }
        let (step, start) = self.step_and_start();
        let slot = if self.reversed() {
            self.count - 1 - index
        } else {
            index
        };
        Some(start + step * slot as f64)
    }
}

/// A discrete band scale for categorical charts.
///
/// Each index maps to the leading edge of a band of width [`ScaleBand::bandwidth`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleBand {
    inner: Ordinal,
}

impl ScaleBand {
    /// Creates a new band scale covering `count` bands over `range`, with no padding.
    pub fn new(range: (f64, f64), count: usize) -> Self {
        Self {
            inner: Ordinal {
                range,
                count,
                padding_inner: 0.0,
                padding_outer: 0.0,
            },
        }
    }

    /// Sets inner and outer padding in band units.
    ///
    /// Inner padding is clamped to `[0, 1]`.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.inner.padding_inner = inner.clamp(0.0, 1.0);
        self.inner.padding_outer = outer.max(0.0);
        self
    }

    /// Returns the computed band width.
    pub fn bandwidth(&self) -> f64 {
        self.inner.bandwidth()
    }

    /// Returns the distance between the starts of adjacent bands.
    pub fn step(&self) -> f64 {
        self.inner.step()
    }

    /// Returns the number of bands.
    pub fn count(&self) -> usize {
        self.inner.count
    }

    /// Returns the leading edge of the band at `index`.
    pub fn x(&self, index: usize) -> Option<f64> {
        self.inner.position(index)
    }
}

/// A discrete point scale (like band without width).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalePoint {
    inner: Ordinal,
}

impl ScalePoint {
    /// Creates a new point scale with no outer padding.
    pub fn new(range: (f64, f64), count: usize) -> Self {
        Self {
            inner: Ordinal {
                range,
                count,
                padding_inner: 1.0,
                padding_outer: 0.0,
            },
        }
    }

    /// Sets the outer padding in point steps.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.inner.padding_outer = padding.max(0.0);
        self
    }

    /// Returns the distance between adjacent points.
    pub fn step(&self) -> f64 {
        self.inner.step()
    }

    /// Returns the number of points.
    pub fn count(&self) -> usize {
        self.inner.count
    }

    /// Returns the position of the point at `index`.
    pub fn x(&self, index: usize) -> Option<f64> {
        self.inner.position(index)
    }
}

/// The scale assigned to a resolved axis.
#[derive(Clone, Debug, PartialEq)]
pub enum AxisScale {
    /// Numeric axis.
    Linear(ScaleLinear),
    /// Category axis under discrete geometry.
    Band {
        /// Position mapping.
        scale: ScaleBand,
        /// Categories in index order.
        categories: Vec<Value>,
    },
    /// Category axis under connected geometry.
    Point {
        /// Position mapping.
        scale: ScalePoint,
        /// Categories in index order.
        categories: Vec<Value>,
    },
}

impl AxisScale {
    /// Maps a data value to a pixel coordinate.
    ///
    /// Category scales look the value up in their category list; values that are not
    /// categories map to `None`.
    pub fn map(&self, value: &Value) -> Option<f64> {
        match self {
            Self::Linear(s) => value.as_f64().map(|v| s.map(v)),
            Self::Band { scale, categories } => {
                let i = categories.iter().position(|c| c.same_category(value))?;
                scale.x(i)
            }
            Self::Point { scale, categories } => {
                let i = categories.iter().position(|c| c.same_category(value))?;
                scale.x(i)
            }
        }
    }

    /// Maps a category index (or, for linear scales, the index as a number).
    pub fn map_index(&self, index: usize) -> Option<f64> {
        match self {
            Self::Linear(s) => Some(s.map(index as f64)),
            Self::Band { scale, .. } => scale.x(index),
            Self::Point { scale, .. } => scale.x(index),
        }
    }

    /// Band width; `0` for point and linear scales.
    pub fn bandwidth(&self) -> f64 {
        match self {
            Self::Band { scale, .. } => scale.bandwidth(),
            Self::Linear(_) | Self::Point { .. } => 0.0,
        }
    }

    /// Returns the pixel range.
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.range(),
            Self::Band { scale, .. } => scale.inner.range,
            Self::Point { scale, .. } => scale.inner.range,
        }
    }

    /// Returns `true` for band and point scales.
    pub fn is_discrete(&self) -> bool {
        !matches!(self, Self::Linear(_))
    }
}

/// Picks and builds the scale for an axis.
///
/// Numeric axes get a linear scale (clamped when `clamp` is set); category axes get a
/// point scale under connected geometry and a band scale otherwise.
pub(crate) fn build_scale(
    domain: &Domain,
    axis_type: AxisType,
    geometry: SeriesGeometry,
    range: (f64, f64),
    clamp: bool,
) -> AxisScale {
    match (axis_type, domain) {
        (_, Domain::Continuous(lo, hi)) => {
            AxisScale::Linear(ScaleLinear::new((*lo, *hi), range).with_clamp(clamp))
        }
        (AxisType::Number, Domain::Categories(categories)) => {
            let last = categories.len().saturating_sub(1) as f64;
            AxisScale::Linear(ScaleLinear::new((0.0, last), range).with_clamp(clamp))
        }
        (AxisType::Category, Domain::Categories(categories)) => match geometry {
            SeriesGeometry::Connected => AxisScale::Point {
                scale: ScalePoint::new(range, categories.len()),
                categories: categories.clone(),
            },
            SeriesGeometry::Discrete => AxisScale::Band {
                scale: ScaleBand::new(range, categories.len()),
                categories: categories.clone(),
            },
        },
    }
}
