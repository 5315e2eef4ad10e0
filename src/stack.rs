//! Stacked layout: cumulative offset intervals for layered rendering.
//!
//! Converts a per-category value sequence into `[start, end)` offsets
//! accumulated from zero, so bars or arcs can be drawn on top of one
//! another without overlap.

use crate::data::Value;

/// A value annotated with its cumulative stack interval.
///
/// `end - start == value` and each `start` equals the previous `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedValue {
    /// Category key.
    pub key: String,
    /// Magnitude.
    pub value: f64,
    /// Cumulative offset where this segment starts.
    pub start: f64,
    /// Cumulative offset where this segment ends.
    pub end: f64,
}

/// Stack a value sequence with a single left-to-right scan.
///
/// Input order is preserved; stack order is data order and is never
/// re-sorted. Empty input yields empty output.
#[must_use]
pub fn stack(values: &[Value]) -> Vec<StackedValue> {
    let mut offset = 0.0;
    values
        .iter()
        .map(|v| {
            let start = offset;
            let end = start + v.value;
            offset = end;
            StackedValue { key: v.key.clone(), value: v.value, start, end }
        })
        .collect()
}
