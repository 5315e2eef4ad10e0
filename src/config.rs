//! Chart configuration values.
//!
//! Configuration is an immutable value handed to a chart at attach
//! time: the builder returns a fresh [`ChartConfig`] per `build` call,
//! so nothing is shared mutably across render passes. Scale overrides
//! are not part of the config value; they are pinned on the chart
//! handle through [`crate::scale::ScaleState`].

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::{Error, Result};

/// Whitespace around the plot area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    /// Top margin.
    pub top: f64,
    /// Right margin.
    pub right: f64,
    /// Bottom margin.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
}

impl Margin {
    /// Equal margin on all four sides.
    #[must_use]
    pub const fn uniform(px: f64) -> Self {
        Self { top: px, right: px, bottom: px, left: px }
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self::uniform(20.0)
    }
}

/// Easing curve applied by the backend while a transition runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// Constant-rate interpolation.
    Linear,
    /// Quadratic ease-in-out.
    QuadInOut,
    /// Cubic ease-in-out.
    CubicInOut,
    /// Bouncing settle at the end of the transition.
    #[default]
    BounceOut,
}

impl Easing {
    /// Evaluate the curve at normalized time `t` in `[0, 1]`.
    #[must_use]
    pub fn ease(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::BounceOut => bounce_out(t),
        }
    }
}

fn bounce_out(t: f64) -> f64 {
    const N: f64 = 7.5625;
    const D: f64 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984_375
    }
}

/// How element updates animate from start to end state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Easing curve.
    pub easing: Easing,
    /// Duration in milliseconds.
    pub duration_ms: u32,
}

impl Default for Transition {
    fn default() -> Self {
        Self { easing: Easing::BounceOut, duration_ms: 500 }
    }
}

/// Immutable per-chart configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Total width in pixels.
    pub width: f64,
    /// Total height in pixels.
    pub height: f64,
    /// Whitespace around the plot area.
    pub margin: Margin,
    /// Ordered classification palette.
    pub colors: Vec<Rgba>,
    /// Caller-supplied classification cut points; auto-derived from
    /// the data when absent.
    pub thresholds: Option<Vec<f64>>,
    /// Transition applied to element updates.
    pub transition: Transition,
    /// Style tag attached to the chart root.
    pub classed: String,
}

impl ChartConfig {
    /// Start building a configuration from the defaults.
    #[must_use]
    pub fn builder() -> ChartConfigBuilder {
        ChartConfigBuilder::default()
    }

    /// Plot-area width (total width minus horizontal margins).
    #[must_use]
    pub fn inner_width(&self) -> f64 {
        self.width - self.margin.left - self.margin.right
    }

    /// Plot-area height (total height minus vertical margins).
    #[must_use]
    pub fn inner_height(&self) -> f64 {
        self.height - self.margin.top - self.margin.bottom
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 300.0,
            margin: Margin::default(),
            colors: default_palette(),
            thresholds: None,
            transition: Transition::default(),
            classed: "chart".to_string(),
        }
    }
}

/// Four-step heat palette used when the caller supplies no colors.
fn default_palette() -> Vec<Rgba> {
    vec![
        Rgba::rgb(214, 245, 0),
        Rgba::rgb(255, 166, 0),
        Rgba::rgb(255, 97, 0),
        Rgba::rgb(200, 65, 65),
    ]
}

/// Builder for [`ChartConfig`]; every call consumes and returns a new
/// builder value, and `build` validates the result.
#[derive(Debug, Clone, Default)]
pub struct ChartConfigBuilder {
    config: ChartConfig,
}

impl ChartConfigBuilder {
    /// Set total width in pixels.
    #[must_use]
    pub fn width(mut self, width: f64) -> Self {
        self.config.width = width;
        self
    }

    /// Set total height in pixels.
    #[must_use]
    pub fn height(mut self, height: f64) -> Self {
        self.config.height = height;
        self
    }

    /// Set the margin.
    #[must_use]
    pub fn margin(mut self, margin: Margin) -> Self {
        self.config.margin = margin;
        self
    }

    /// Set the ordered classification palette.
    #[must_use]
    pub fn colors(mut self, colors: Vec<Rgba>) -> Self {
        self.config.colors = colors;
        self
    }

    /// Supply classification cut points instead of auto-derivation.
    #[must_use]
    pub fn thresholds(mut self, thresholds: Vec<f64>) -> Self {
        self.config.thresholds = Some(thresholds);
        self
    }

    /// Set the update transition.
    #[must_use]
    pub fn transition(mut self, transition: Transition) -> Self {
        self.config.transition = transition;
        self
    }

    /// Set the style tag.
    #[must_use]
    pub fn classed(mut self, classed: impl Into<String>) -> Self {
        self.config.classed = classed.into();
        self
    }

    /// Validate and produce the configuration value.
    ///
    /// # Errors
    ///
    /// Returns an error for non-positive dimensions, margins that
    /// leave no plot area, an empty palette, or caller thresholds that
    /// are not finite and non-decreasing.
    pub fn build(self) -> Result<ChartConfig> {
        let c = self.config;
        if c.width <= 0.0 || c.height <= 0.0 {
            return Err(Error::ScaleConstruction(format!(
                "Chart dimensions must be positive, got {}x{}",
                c.width, c.height
            )));
        }
        if c.inner_width() <= 0.0 || c.inner_height() <= 0.0 {
            return Err(Error::ScaleConstruction(
                "Margins leave no plot area".to_string(),
            ));
        }
        if c.colors.is_empty() {
            return Err(Error::ScaleConstruction(
                "Palette must contain at least one color".to_string(),
            ));
        }
        if let Some(thresholds) = &c.thresholds {
            if thresholds.iter().any(|t| !t.is_finite()) {
                return Err(Error::ScaleConstruction(
                    "Thresholds must be finite".to_string(),
                ));
            }
            if thresholds.windows(2).any(|w| w[0] > w[1]) {
                return Err(Error::ScaleConstruction(
                    "Thresholds must be non-decreasing".to_string(),
                ));
            }
        }
        Ok(c)
    }
}
