//! Series data model and normalization.
//!
//! Charts consume a collection of named series, each holding ordered
//! (category, value) pairs. [`shape`] reduces that nested input into
//! the flat aggregates every chart needs: category/group dimensions,
//! totals, value extrema, and auto-derived classification thresholds.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of classification bins produced by auto-thresholding.
const THRESHOLD_BINS: usize = 4;

/// A single (category, magnitude) pair within a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Value {
    /// Category key (x-axis / angular position).
    pub key: String,
    /// Magnitude.
    pub value: f64,
}

impl Value {
    /// Create a new value.
    #[must_use]
    pub fn new(key: impl Into<String>, value: f64) -> Self {
        Self { key: key.into(), value }
    }
}

/// A named, ordered collection of values: one visual row or group.
///
/// Insertion order of a `Vec<Series>` is rendering order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Series key (group name).
    pub key: String,
    /// Ordered values within the series.
    pub values: Vec<Value>,
}

impl Series {
    /// Create a new series.
    #[must_use]
    pub fn new(key: impl Into<String>, values: Vec<Value>) -> Self {
        Self { key: key.into(), values }
    }
}

/// Flat aggregates derived from a series collection.
///
/// `category_totals` and `group_totals` are positionally aligned with
/// `category_names` and `group_names` respectively.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedData {
    /// Category keys, deduplicated in first-seen order.
    pub category_names: Vec<String>,
    /// Series keys in input order.
    pub group_names: Vec<String>,
    /// Per-category sum of values across all series.
    pub category_totals: Vec<f64>,
    /// Per-series sum of values.
    pub group_totals: Vec<f64>,
    /// Largest per-category total.
    pub max_category_total: f64,
    /// Largest per-series total (stacked column height upper bound).
    pub max_group_total: f64,
    /// Largest single value across all series.
    pub max_value: f64,
    /// Smallest single value across all series.
    pub min_value: f64,
    /// Ascending classification cut points over `[min_value, max_value]`.
    pub thresholds: Vec<f64>,
}

impl ParsedData {
    /// Look up the total for a category by name.
    #[must_use]
    pub fn category_total(&self, category: &str) -> Option<f64> {
        self.category_names
            .iter()
            .position(|c| c == category)
            .map(|i| self.category_totals[i])
    }
}

/// Normalize a series collection into [`ParsedData`].
///
/// Thresholds are derived as the three interior cut points splitting
/// `[min_value, max_value]` into four equal-width bins. A degenerate
/// domain (`max_value == min_value`) yields three equal cut points;
/// the resulting threshold scale still classifies into a single bin.
///
/// # Errors
///
/// Returns [`Error::EmptyInput`] if `series` is empty or every series
/// has zero values, and [`Error::InvalidValue`] for any non-finite
/// value, identifying the offending series and category.
pub fn shape(series: &[Series]) -> Result<ParsedData> {
    if series.iter().all(|s| s.values.is_empty()) {
        return Err(Error::EmptyInput);
    }

    let mut category_names: Vec<String> = Vec::new();
    let mut category_totals: Vec<f64> = Vec::new();
    let mut group_names: Vec<String> = Vec::with_capacity(series.len());
    let mut group_totals: Vec<f64> = Vec::with_capacity(series.len());
    let mut max_value = f64::NEG_INFINITY;
    let mut min_value = f64::INFINITY;

    for s in series {
        group_names.push(s.key.clone());
        let mut group_total = 0.0;

        for v in &s.values {
            if !v.value.is_finite() {
                return Err(Error::InvalidValue {
                    series: s.key.clone(),
                    category: v.key.clone(),
                    value: v.value,
                });
            }

            match category_names.iter().position(|c| *c == v.key) {
                Some(i) => category_totals[i] += v.value,
                None => {
                    category_names.push(v.key.clone());
                    category_totals.push(v.value);
                }
            }

            group_total += v.value;
            max_value = max_value.max(v.value);
            min_value = min_value.min(v.value);
        }

        group_totals.push(group_total);
    }

    let max_category_total =
        category_totals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let max_group_total =
        group_totals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let thresholds = derive_thresholds(min_value, max_value);

    Ok(ParsedData {
        category_names,
        group_names,
        category_totals,
        group_totals,
        max_category_total,
        max_group_total,
        max_value,
        min_value,
        thresholds,
    })
}

/// Interior equal-width cut points over `[min, max]`.
fn derive_thresholds(min: f64, max: f64) -> Vec<f64> {
    let span = max - min;
    (1..THRESHOLD_BINS)
        .map(|i| min + (i as f64) * span / (THRESHOLD_BINS as f64))
        .collect()
}
