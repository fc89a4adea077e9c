// Copyright 2025 the Catchart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis domain inference.
//!
//! Domains are computed from a [`TableWindow`], so every bound reflects only the rows
//! currently in view.

extern crate alloc;

use alloc::vec::Vec;

use catchart_table::{TableWindow, Value};
use hashbrown::HashSet;

use crate::declaration::{AxisType, DomainBound, SeriesDeclaration};

/// The data-space extent of an axis.
#[derive(Clone, Debug, PartialEq)]
pub enum Domain {
    /// A numeric interval `[min, max]`.
    Continuous(f64, f64),
    /// An ordered list of categories.
    Categories(Vec<Value>),
}

impl Domain {
    /// Returns the numeric bounds of a continuous domain.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self {
            Self::Continuous(lo, hi) => Some((*lo, *hi)),
            Self::Categories(_) => None,
        }
    }

    /// Returns the category list of a discrete domain.
    pub fn categories(&self) -> Option<&[Value]> {
        match self {
            Self::Continuous(..) => None,
            Self::Categories(c) => Some(c),
        }
    }

    /// Number of categories; `0` for continuous domains.
    pub fn category_count(&self) -> usize {
        self.categories().map_or(0, <[Value]>::len)
    }
}

/// The serial index domain `0..len`, used when rows themselves are the categories.
pub(crate) fn index_domain(len: usize) -> Domain {
    Domain::Categories((0..len).map(|i| Value::Number(i as f64)).collect())
}

/// Domain of a single column within the window.
///
/// Numeric domains ignore non-numeric cells and are `None` if no finite value exists.
/// Category domains keep every cell in row order, duplicates and missing cells
/// included, so callers can detect duplicates.
pub(crate) fn domain_of_key(
    window: &TableWindow<'_>,
    key: &str,
    axis_type: AxisType,
) -> Option<Domain> {
    let column = window.column(key)?;
    match axis_type {
        AxisType::Number => extent(column.iter().filter_map(Value::as_f64))
            .map(|(lo, hi)| Domain::Continuous(lo, hi)),
        AxisType::Category => Some(Domain::Categories(column.to_vec())),
    }
}

/// Domain covering every series attached to an axis.
///
/// Numeric domains span all finite values of all series. Category domains are the
/// distinct non-missing values in first-seen order.
pub(crate) fn domain_of_series<'s>(
    window: &TableWindow<'_>,
    series: impl IntoIterator<Item = &'s SeriesDeclaration>,
    axis_type: AxisType,
) -> Option<Domain> {
    let columns: Vec<&[Value]> = series
        .into_iter()
        .filter_map(|s| window.column(&s.data_key))
        .collect();
    match axis_type {
        AxisType::Number => extent(
            columns
                .iter()
                .flat_map(|c| c.iter())
                .filter_map(Value::as_f64),
        )
        .map(|(lo, hi)| Domain::Continuous(lo, hi)),
        AxisType::Category => {
            let values = columns
                .iter()
                .flat_map(|c| c.iter())
                .filter(|v| !v.is_missing());
            Some(Domain::Categories(distinct(values)))
        }
    }
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((v.min(lo), v.max(hi))),
    })
}

#[derive(PartialEq, Eq, Hash)]
enum CategoryKey<'a> {
    Number(u64),
    Text(&'a str),
    Missing,
}

impl<'a> CategoryKey<'a> {
    fn of(value: &'a Value) -> Self {
        match value {
            // Fold -0.0 onto 0.0 so they compare equal, as `==` does.
            Value::Number(v) => Self::Number((v + 0.0).to_bits()),
            Value::Text(s) => Self::Text(s),
            Value::Missing => Self::Missing,
        }
    }
}

/// Returns `true` if any category appears more than once.
pub(crate) fn has_duplicate(values: &[Value]) -> bool {
    let mut seen = HashSet::with_capacity(values.len());
    values.iter().any(|v| !seen.insert(CategoryKey::of(v)))
}

/// Distinct values in first-seen order.
pub(crate) fn distinct<'a>(values: impl Iterator<Item = &'a Value>) -> Vec<Value> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(CategoryKey::of(*v)))
        .cloned()
        .collect()
}

/// Widens `(lo, hi)` to include every value in `extra`.
pub(crate) fn widen(bounds: (f64, f64), extra: impl IntoIterator<Item = f64>) -> (f64, f64) {
    extra
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(bounds, |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// Applies explicitly declared bounds to a data-derived extent.
///
/// Without `allow_overflow` a literal bound may only widen the data extent; with it the
/// literal replaces the data bound, clipping data if needed.
pub(crate) fn apply_declared_bounds(
    declared: &[DomainBound; 2],
    data: (f64, f64),
    allow_overflow: bool,
) -> (f64, f64) {
    let lower = match &declared[0] {
        DomainBound::Value(v) if allow_overflow => *v,
        DomainBound::Value(v) => v.min(data.0),
        bound => resolve_relative(bound, data.0),
    };
    let upper = match &declared[1] {
        DomainBound::Value(v) if allow_overflow => *v,
        DomainBound::Value(v) => v.max(data.1),
        bound => resolve_relative(bound, data.1),
    };
    (lower, upper)
}

fn resolve_relative(bound: &DomainBound, data: f64) -> f64 {
    match bound {
        DomainBound::DataOffset(d) => data + d,
        DomainBound::Custom(f) => f(data),
        DomainBound::Auto | DomainBound::Value(_) => data,
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use catchart_table::DataTable;

    use super::*;

    fn table() -> DataTable {
        DataTable::new()
            .with_column("name", ["A", "B", "A", "C"])
            .and_then(|t| t.with_numbers("uv", [4.0, 9.0, -2.0, 1.0]))
            .and_then(|t| t.with_column("pv", [Some(3.0), None, Some(12.0), Some(0.5)]))
            .expect("valid table")
    }

    #[test]
    fn numeric_domain_spans_all_series_in_window() {
        let t = table();
        let series = [SeriesDeclaration::new("uv"), SeriesDeclaration::new("pv")];
        let full = domain_of_series(&t.full_window(), &series, AxisType::Number);
        assert_eq!(full, Some(Domain::Continuous(-2.0, 12.0)));

        let window = t.window(0, 1).expect("in range");
        let partial = domain_of_series(&window, &series, AxisType::Number);
        assert_eq!(partial, Some(Domain::Continuous(3.0, 9.0)));
    }

    #[test]
    fn category_domain_of_series_is_distinct() {
        let t = table();
        let series = [SeriesDeclaration::new("name")];
        let d = domain_of_series(&t.full_window(), &series, AxisType::Category)
            .expect("column exists");
        assert_eq!(
            d.categories(),
            Some(&[Value::from("A"), Value::from("B"), Value::from("C")][..])
        );
    }

    #[test]
    fn duplicate_detection() {
        let t = table();
        let d = domain_of_key(&t.full_window(), "name", AxisType::Category).expect("column");
        assert!(has_duplicate(d.categories().expect("categories")));
        assert!(!has_duplicate(&[Value::Number(0.0), Value::Number(-0.0)][..1]));
        assert!(has_duplicate(&[Value::Number(0.0), Value::Number(-0.0)]));
    }

    #[test]
    fn literal_bounds_only_widen_without_overflow() {
        let declared = [DomainBound::Value(0.0), DomainBound::Value(5.0)];
        assert_eq!(apply_declared_bounds(&declared, (2.0, 9.0), false), (0.0, 9.0));
        assert_eq!(apply_declared_bounds(&declared, (2.0, 9.0), true), (0.0, 5.0));
    }

    #[test]
    fn relative_bounds_follow_data() {
        let declared = [DomainBound::DataOffset(-1.0), DomainBound::custom(|v| v * 2.0)];
        assert_eq!(apply_declared_bounds(&declared, (2.0, 9.0), false), (1.0, 18.0));
        let auto = [DomainBound::Auto, DomainBound::Auto];
        assert_eq!(apply_declared_bounds(&auto, (2.0, 9.0), false), (2.0, 9.0));
    }

    #[test]
    fn widen_ignores_non_finite() {
        assert_eq!(widen((0.0, 1.0), [5.0, f64::NAN, -3.0]), (-3.0, 5.0));
    }
}
