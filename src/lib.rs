//! # ezviz
//!
//! Data-shaping and incremental-reconciliation core for SVG
//! statistical charts (heat maps, radial heat maps, stacked bars,
//! multi-series lines).
//!
//! The crate is the chart-agnostic kernel shared by every chart
//! family: it normalizes nested series data into aggregates and
//! classification thresholds, derives the band/linear/threshold
//! scales those aggregates imply, lays out cumulative stack
//! intervals, and reconciles the result against a retained set of
//! visual elements with minimal mutation. Drawing itself (SVG
//! element creation, attribute application, transition execution)
//! belongs to a rendering backend consuming [`render::ElementOp`]s.
//!
//! ## Quick Start
//!
//! ```rust
//! use ezviz::prelude::*;
//!
//! let data = vec![
//!     Series::new("A", vec![Value::new("x", 10.0), Value::new("y", 20.0)]),
//!     Series::new("B", vec![Value::new("x", 5.0), Value::new("y", 30.0)]),
//! ];
//!
//! let config = ChartConfig::builder().width(640.0).height(480.0).build()?;
//! let mut chart = ezviz::render::attach("#heatmap", ChartKind::HeatGrid, config);
//!
//! let pass = chart.update(&data)?;
//! assert_eq!(pass.entered, 4);
//! # Ok::<(), ezviz::Error>(())
//! ```
//!
//! Every render pass is synchronous and all-or-nothing; transitions
//! are described, not executed, and a later pass supersedes anything
//! still animating.

#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types for chart palettes.
pub mod color;

/// Series data model and normalization.
pub mod data;

/// Scale functions for data-to-visual mappings.
pub mod scale;

/// Stacked layout offsets.
pub mod stack;

// ============================================================================
// Reconciliation & Rendering Boundary
// ============================================================================

/// Keyed enter/update/exit reconciliation.
pub mod reconcile;

/// Render-pass driver and backend boundary.
pub mod render;

/// Named interaction events.
pub mod event;

/// Chart configuration values.
pub mod config;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for ezviz operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust,ignore
/// use ezviz::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::Rgba;
    pub use crate::config::{ChartConfig, Easing, Margin, Transition};
    pub use crate::data::{shape, ParsedData, Series, Value};
    pub use crate::error::{Error, Result};
    pub use crate::event::{ChartEvent, EventBus, EventKind};
    pub use crate::reconcile::ReconciliationPlan;
    pub use crate::render::{ChartKind, ElementKey, ElementOp, Handle, RenderPass, VisualState};
    pub use crate::scale::{
        BandScale, LinearScale, Scale, ScaleState, ThresholdScale,
    };
    pub use crate::stack::{stack, StackedValue};
}
