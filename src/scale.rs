//! Scale functions for data-to-visual mappings.
//!
//! Scales transform data values to visual properties (position or
//! color). Three kinds are used by the charts: band (discrete key to
//! padded interval), linear (affine numeric map), and threshold
//! (numeric to classification bin). [`ScaleState`] records whether a
//! chart's scale is unset, derived from the current data, or pinned by
//! the caller, so re-renders never clobber a caller-supplied scale.

use crate::error::{Error, Result};

/// Trait for scale functions that map domain values to range values.
///
/// Lookup is fallible: a band scale queried with an unknown key
/// reports [`Error::DomainLookup`] rather than guessing a position.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> Result<R>;
}

/// Band scale: discrete keys to equal-width, padded intervals.
///
/// The continuous range is divided into one slot per domain key; each
/// slot's usable band is `slot_width * (1 - padding)`, centered within
/// the slot.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    range: (f64, f64),
    padding: f64,
}

impl BandScale {
    /// Create a new band scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is empty or padding is outside
    /// `[0, 1)`.
    pub fn new(
        domain: impl IntoIterator<Item = impl Into<String>>,
        range: (f64, f64),
        padding: f64,
    ) -> Result<Self> {
        let domain: Vec<String> = domain.into_iter().map(Into::into).collect();
        if domain.is_empty() {
            return Err(Error::ScaleConstruction(
                "Band scale requires a non-empty domain".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&padding) {
            return Err(Error::ScaleConstruction(format!(
                "Band padding {padding} outside [0, 1)"
            )));
        }
        Ok(Self { domain, range, padding })
    }

    /// Get the domain keys.
    #[must_use]
    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    /// Get the range extent.
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Width of one slot, padding included.
    #[must_use]
    pub fn step(&self) -> f64 {
        (self.range.1 - self.range.0) / self.domain.len() as f64
    }

    /// Usable band width within a slot.
    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    /// The `[start, end)` usable interval for a key.
    pub fn band(&self, key: &str) -> Result<(f64, f64)> {
        let start = self.scale(key)?;
        Ok((start, start + self.bandwidth()))
    }
}

impl Scale<&str, f64> for BandScale {
    /// Start of the usable band for `key`.
    fn scale(&self, key: &str) -> Result<f64> {
        let index = self
            .domain
            .iter()
            .position(|k| k == key)
            .ok_or_else(|| Error::DomainLookup { key: key.to_string() })?;
        let step = self.step();
        Ok(self.range.0 + index as f64 * step + step * self.padding / 2.0)
    }
}

/// Linear scale: affine continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// A degenerate domain (`d0 == d1`) is accepted and maps every
    /// input to the low end of the range, keeping a render pass with
    /// constant data usable.
    #[must_use]
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Get the domain extent.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Get the range extent.
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Invert the scale (range to domain).
    #[must_use]
    pub fn invert(&self, value: f64) -> f64 {
        let span = self.range.1 - self.range.0;
        if span.abs() < f64::EPSILON {
            return self.domain.0;
        }
        let t = (value - self.range.0) / span;
        self.domain.0 + t * (self.domain.1 - self.domain.0)
    }
}

impl Scale<f64, f64> for LinearScale {
    fn scale(&self, value: f64) -> Result<f64> {
        let span = self.domain.1 - self.domain.0;
        if span.abs() < f64::EPSILON {
            return Ok(self.range.0);
        }
        let t = (value - self.domain.0) / span;
        Ok(self.range.0 + t * (self.range.1 - self.range.0))
    }
}

/// Threshold scale: numeric values to discrete classification bins.
///
/// `n` ascending cut points partition the number line into `n + 1`
/// bins; a value equal to a cut point falls into the upper bin.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdScale<T> {
    thresholds: Vec<f64>,
    outputs: Vec<T>,
}

impl<T: Clone> ThresholdScale<T> {
    /// Create a new threshold scale.
    ///
    /// # Errors
    ///
    /// Returns an error unless `outputs.len() == thresholds.len() + 1`
    /// and the thresholds are non-decreasing.
    pub fn new(thresholds: Vec<f64>, outputs: Vec<T>) -> Result<Self> {
        if outputs.len() != thresholds.len() + 1 {
            return Err(Error::ScaleConstruction(format!(
                "Threshold scale with {} cut points requires {} outputs, got {}",
                thresholds.len(),
                thresholds.len() + 1,
                outputs.len()
            )));
        }
        if thresholds.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::ScaleConstruction(
                "Threshold cut points must be non-decreasing".to_string(),
            ));
        }
        Ok(Self { thresholds, outputs })
    }

    /// Get the cut points.
    #[must_use]
    pub fn domain(&self) -> &[f64] {
        &self.thresholds
    }

    /// Get the bin outputs.
    #[must_use]
    pub fn range(&self) -> &[T] {
        &self.outputs
    }
}

impl<T: Clone> Scale<f64, T> for ThresholdScale<T> {
    fn scale(&self, value: f64) -> Result<T> {
        let bin = self.thresholds.iter().filter(|t| **t <= value).count();
        Ok(self.outputs[bin].clone())
    }
}

/// Per-chart scale slot: nothing yet, derived from data, or pinned.
///
/// Replaces "derive if undefined" value-presence checks with an
/// explicit tag. Derived scales are recomputed on every render pass;
/// overridden scales survive re-renders untouched, which keeps e.g. a
/// color legend stable across frames.
#[derive(Debug, Clone, PartialEq)]
pub enum ScaleState<S> {
    /// No scale yet; next derivation fills the slot.
    Unset,
    /// Derived from the latest data; re-derived each pass.
    Derived(S),
    /// Pinned by the caller; derivation leaves it untouched.
    Overridden(S),
}

impl<S> Default for ScaleState<S> {
    fn default() -> Self {
        ScaleState::Unset
    }
}

impl<S> ScaleState<S> {
    /// Pin a caller-supplied scale.
    pub fn set_override(&mut self, scale: S) {
        *self = ScaleState::Overridden(scale);
    }

    /// Fill the slot from `derive` unless it is pinned.
    ///
    /// # Errors
    ///
    /// Propagates any error from the derivation closure.
    pub fn derive_with(&mut self, derive: impl FnOnce() -> Result<S>) -> Result<&S> {
        if !matches!(self, ScaleState::Overridden(_)) {
            *self = ScaleState::Derived(derive()?);
        }
        match self {
            ScaleState::Derived(s) | ScaleState::Overridden(s) => Ok(s),
            // derive_with just stored a value in the non-overridden case
            ScaleState::Unset => unreachable!(),
        }
    }

    /// The current scale, if any.
    #[must_use]
    pub fn get(&self) -> Option<&S> {
        match self {
            ScaleState::Derived(s) | ScaleState::Overridden(s) => Some(s),
            ScaleState::Unset => None,
        }
    }

    /// Whether the slot is caller-pinned.
    #[must_use]
    pub fn is_overridden(&self) -> bool {
        matches!(self, ScaleState::Overridden(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_band_scale_positions() {
        let scale = BandScale::new(["x", "y"], (0.0, 100.0), 0.1).unwrap();
        // step 50, band 45, centered offset 2.5
        assert_relative_eq!(scale.scale("x").unwrap(), 2.5);
        assert_relative_eq!(scale.scale("y").unwrap(), 52.5);
        assert_relative_eq!(scale.bandwidth(), 45.0);
    }

    #[test]
    fn test_band_scale_band_interval() {
        let scale = BandScale::new(["x", "y"], (0.0, 100.0), 0.1).unwrap();
        let (start, end) = scale.band("y").unwrap();
        assert_relative_eq!(end - start, scale.bandwidth());
    }

    #[test]
    fn test_band_scale_zero_padding() {
        let scale = BandScale::new(["a", "b", "c", "d"], (0.0, 40.0), 0.0).unwrap();
        assert_relative_eq!(scale.scale("a").unwrap(), 0.0);
        assert_relative_eq!(scale.scale("d").unwrap(), 30.0);
        assert_relative_eq!(scale.bandwidth(), 10.0);
    }

    #[test]
    fn test_band_scale_unknown_key() {
        let scale = BandScale::new(["x"], (0.0, 10.0), 0.0).unwrap();
        assert_eq!(
            scale.scale("w"),
            Err(Error::DomainLookup { key: "w".to_string() })
        );
    }

    #[test]
    fn test_band_scale_descending_range() {
        // Radial charts map groups from outer radius inward.
        let scale = BandScale::new(["a", "b"], (100.0, 20.0), 0.0).unwrap();
        assert_relative_eq!(scale.scale("a").unwrap(), 100.0);
        assert_relative_eq!(scale.scale("b").unwrap(), 60.0);
        assert_relative_eq!(scale.bandwidth(), -40.0);
    }

    #[test]
    fn test_band_scale_invalid_construction() {
        assert!(BandScale::new(Vec::<String>::new(), (0.0, 1.0), 0.1).is_err());
        assert!(BandScale::new(["x"], (0.0, 1.0), 1.0).is_err());
        assert!(BandScale::new(["x"], (0.0, 1.0), -0.1).is_err());
    }

    #[test]
    fn test_band_scale_domain_range() {
        let scale = BandScale::new(["x", "y"], (0.0, 100.0), 0.1).unwrap();
        assert_eq!(scale.domain(), &["x".to_string(), "y".to_string()]);
        assert_eq!(scale.range(), (0.0, 100.0));
    }

    #[test]
    fn test_linear_scale() {
        let scale = LinearScale::new((0.0, 100.0), (0.0, 1.0));
        assert_relative_eq!(scale.scale(0.0).unwrap(), 0.0);
        assert_relative_eq!(scale.scale(50.0).unwrap(), 0.5);
        assert_relative_eq!(scale.scale(100.0).unwrap(), 1.0);
    }

    #[test]
    fn test_linear_scale_invert() {
        let scale = LinearScale::new((0.0, 100.0), (0.0, 1.0));
        assert_relative_eq!(scale.invert(0.5), 50.0);
    }

    #[test]
    fn test_linear_scale_degenerate_domain() {
        let scale = LinearScale::new((5.0, 5.0), (0.0, 300.0));
        assert_relative_eq!(scale.scale(5.0).unwrap(), 0.0);
        assert_relative_eq!(scale.scale(99.0).unwrap(), 0.0);
    }

    #[test]
    fn test_linear_scale_domain_range() {
        let scale = LinearScale::new((10.0, 20.0), (100.0, 200.0));
        assert_eq!(scale.domain(), (10.0, 20.0));
        assert_eq!(scale.range(), (100.0, 200.0));
    }

    #[test]
    fn test_threshold_scale_bins() {
        let scale =
            ThresholdScale::new(vec![10.0, 20.0, 30.0], vec!["a", "b", "c", "d"]).unwrap();
        assert_eq!(scale.scale(5.0).unwrap(), "a");
        assert_eq!(scale.scale(15.0).unwrap(), "b");
        assert_eq!(scale.scale(25.0).unwrap(), "c");
        assert_eq!(scale.scale(35.0).unwrap(), "d");
    }

    #[test]
    fn test_threshold_scale_boundary_is_upper_bin() {
        let scale =
            ThresholdScale::new(vec![10.0, 20.0, 30.0], vec![0, 1, 2, 3]).unwrap();
        // A value exactly at cut point i classifies as bin i + 1.
        assert_eq!(scale.scale(10.0).unwrap(), 1);
        assert_eq!(scale.scale(20.0).unwrap(), 2);
        assert_eq!(scale.scale(30.0).unwrap(), 3);
    }

    #[test]
    fn test_threshold_scale_equal_cut_points() {
        // Degenerate data domain: all cut points collapse to one value.
        let scale =
            ThresholdScale::new(vec![7.0, 7.0, 7.0], vec!["lo", "a", "b", "hi"]).unwrap();
        assert_eq!(scale.scale(6.9).unwrap(), "lo");
        assert_eq!(scale.scale(7.0).unwrap(), "hi");
    }

    #[test]
    fn test_threshold_scale_output_count_mismatch() {
        assert!(ThresholdScale::new(vec![1.0, 2.0], vec!["a", "b"]).is_err());
    }

    #[test]
    fn test_threshold_scale_descending_cut_points() {
        assert!(ThresholdScale::new(vec![2.0, 1.0], vec!["a", "b", "c"]).is_err());
    }

    #[test]
    fn test_threshold_scale_domain_range() {
        let scale = ThresholdScale::new(vec![1.0], vec!["a", "b"]).unwrap();
        assert_eq!(scale.domain(), &[1.0]);
        assert_eq!(scale.range(), &["a", "b"]);
    }

    #[test]
    fn test_scale_state_derives_when_unset() {
        let mut state: ScaleState<LinearScale> = ScaleState::Unset;
        let scale = state
            .derive_with(|| Ok(LinearScale::new((0.0, 1.0), (0.0, 10.0))))
            .unwrap();
        assert_eq!(scale.domain(), (0.0, 1.0));
        assert!(!state.is_overridden());
    }

    #[test]
    fn test_scale_state_rederives_derived() {
        let mut state = ScaleState::Derived(LinearScale::new((0.0, 1.0), (0.0, 10.0)));
        state
            .derive_with(|| Ok(LinearScale::new((0.0, 2.0), (0.0, 10.0))))
            .unwrap();
        assert_eq!(state.get().unwrap().domain(), (0.0, 2.0));
    }

    #[test]
    fn test_scale_state_override_survives_derivation() {
        let mut state = ScaleState::Unset;
        state.set_override(LinearScale::new((0.0, 5.0), (0.0, 10.0)));
        let scale = state
            .derive_with(|| Ok(LinearScale::new((0.0, 99.0), (0.0, 10.0))))
            .unwrap();
        assert_eq!(scale.domain(), (0.0, 5.0));
        assert!(state.is_overridden());
    }

    #[test]
    fn test_scale_state_derivation_error_propagates() {
        let mut state: ScaleState<LinearScale> = ScaleState::Unset;
        let result = state.derive_with(|| {
            Err(Error::ScaleConstruction("nope".to_string()))
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_scale_state_get_unset() {
        let state: ScaleState<LinearScale> = ScaleState::default();
        assert!(state.get().is_none());
    }
}
