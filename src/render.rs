//! Render-pass driver and rendering-backend boundary.
//!
//! The core never touches a drawing surface. A chart is attached once
//! to a backend-owned root, yielding a [`Handle`]; each call to
//! [`Handle::update`] runs one synchronous pass (shape the data,
//! derive scales, lay out geometry, reconcile against the retained
//! elements) and emits a list of [`ElementOp`]s for the backend to
//! apply. Element transitions are fire-and-forget: the backend reports
//! finished exits via [`Handle::complete_exit`], and a new pass or a
//! [`Handle::detach`] supersedes anything still in flight.

use std::fmt;

use crate::color::Rgba;
use crate::config::{ChartConfig, Transition};
use crate::data::{shape, ParsedData, Series};
use crate::error::Result;
use crate::event::EventBus;
use crate::reconcile;
use crate::scale::{BandScale, LinearScale, Scale, ScaleState, ThresholdScale};
use crate::stack::stack;

/// Inter-band padding fraction shared by the chart geometries.
const BAND_PADDING: f64 = 0.1;

/// Identifies one visual element: a (series, category) cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementKey {
    /// Series (group) key.
    pub series: String,
    /// Category key.
    pub category: String,
}

impl ElementKey {
    /// Create a new element key.
    #[must_use]
    pub fn new(series: impl Into<String>, category: impl Into<String>) -> Self {
        Self { series: series.into(), category: category.into() }
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.series, self.category)
    }
}

/// Target visual attributes for one element.
///
/// Coordinates are relative to the plot area, y growing downward.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualState {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// Fill color.
    pub fill: Rgba,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

/// One instruction to the rendering backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementOp {
    /// Create a fresh element at a start state, without animation.
    Create {
        /// Element identity.
        key: ElementKey,
        /// Initial visual state.
        state: VisualState,
    },
    /// Animate an element to an end state.
    Transition {
        /// Element identity.
        key: ElementKey,
        /// Target visual state.
        state: VisualState,
        /// Animation parameters.
        transition: Transition,
    },
    /// Animate an element to a removal state, then release it and
    /// report back through [`Handle::complete_exit`].
    Remove {
        /// Element identity.
        key: ElementKey,
        /// Removal visual state.
        state: VisualState,
        /// Animation parameters.
        transition: Transition,
    },
}

impl ElementOp {
    /// The element this op addresses.
    #[must_use]
    pub fn key(&self) -> &ElementKey {
        match self {
            ElementOp::Create { key, .. }
            | ElementOp::Transition { key, .. }
            | ElementOp::Remove { key, .. } => key,
        }
    }
}

/// Output of one render pass, in application order: creations at
/// their start states, then transitions in data order, then removals
/// in retained order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPass {
    /// Backend instructions.
    pub ops: Vec<ElementOp>,
    /// Aggregates the pass was derived from.
    pub parsed: ParsedData,
    /// Number of elements created this pass.
    pub entered: usize,
    /// Number of elements re-targeted this pass.
    pub updated: usize,
    /// Number of elements released this pass.
    pub exited: usize,
}

/// Which cell geometry a handle lays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Category columns by series rows, colored by threshold bin.
    HeatGrid,
    /// One column per series, segments stacked cumulatively and
    /// colored by category palette position.
    StackedColumns,
}

#[derive(Debug, Clone, PartialEq)]
struct Element {
    key: ElementKey,
    state: VisualState,
}

/// Retained chart state across render passes.
///
/// Owns the scale slots (including caller overrides), the keyed
/// element collection, and the set of exits whose transitions are
/// still in flight. One handle per chart root; handles share nothing.
#[derive(Debug)]
pub struct Handle {
    root: String,
    kind: ChartKind,
    config: ChartConfig,
    x_band: ScaleState<BandScale>,
    y_band: ScaleState<BandScale>,
    y_linear: ScaleState<LinearScale>,
    color: ScaleState<ThresholdScale<Rgba>>,
    retained: Vec<Element>,
    pending_exits: Vec<ElementKey>,
    events: EventBus,
}

/// Attach a chart to a backend-owned root, producing its [`Handle`].
///
/// The backend creates the root exactly once and tracks it; the core
/// only records the identifier for op routing. All scale slots start
/// unset and derive on the first [`Handle::update`].
#[must_use]
pub fn attach(root: impl Into<String>, kind: ChartKind, config: ChartConfig) -> Handle {
    Handle {
        root: root.into(),
        kind,
        config,
        x_band: ScaleState::Unset,
        y_band: ScaleState::Unset,
        y_linear: ScaleState::Unset,
        color: ScaleState::Unset,
        retained: Vec::new(),
        pending_exits: Vec::new(),
        events: EventBus::new(),
    }
}

impl Handle {
    /// The backend root identifier this handle renders into.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The configuration the handle was attached with.
    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// The chart's interaction event bus. The backend emits into it
    /// from pointer callbacks on data-bound elements; callers
    /// subscribe through it.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Read-only view of the event bus.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Pin the color scale; subsequent passes will not re-derive it.
    pub fn override_color_scale(&mut self, scale: ThresholdScale<Rgba>) {
        self.color.set_override(scale);
    }

    /// Pin the category (x) band scale.
    pub fn override_x_scale(&mut self, scale: BandScale) {
        self.x_band.set_override(scale);
    }

    /// Pin the group (y) band scale.
    pub fn override_y_scale(&mut self, scale: BandScale) {
        self.y_band.set_override(scale);
    }

    /// Run one render pass against the latest data.
    ///
    /// The pass is synchronous and all-or-nothing: on error nothing is
    /// emitted and the retained elements are untouched, so the prior
    /// visual state stays valid. A successful pass supersedes any exit
    /// transitions still in flight (last writer wins).
    ///
    /// # Errors
    ///
    /// Propagates [`crate::error::Error::EmptyInput`] and
    /// [`crate::error::Error::InvalidValue`] from shaping,
    /// scale-construction failures (e.g. a palette that does not fit
    /// the threshold count), [`crate::error::Error::DomainLookup`]
    /// when a pinned scale does not cover the data, and
    /// [`crate::error::Error::DuplicateKey`] when the data binds two
    /// values to the same (series, category) cell.
    pub fn update(&mut self, series: &[Series]) -> Result<RenderPass> {
        let parsed = shape(series)?;
        let targets = match self.kind {
            ChartKind::HeatGrid => self.heat_grid_targets(series, &parsed)?,
            ChartKind::StackedColumns => self.stacked_column_targets(series, &parsed)?,
        };

        let plan = reconcile::plan(
            self.retained.clone(),
            targets.clone(),
            |e: &Element| e.key.clone(),
            |t: &(ElementKey, VisualState)| t.0.clone(),
        )?;

        let transition = self.config.transition;
        let mut ops = Vec::with_capacity(plan.entering.len() + targets.len() + plan.exiting.len());

        for (key, end) in &plan.entering {
            ops.push(ElementOp::Create {
                key: key.clone(),
                state: start_state(self.kind, end),
            });
        }
        for (key, end) in &targets {
            ops.push(ElementOp::Transition {
                key: key.clone(),
                state: end.clone(),
                transition,
            });
        }

        // A new pass restarts from the latest data; exits still in
        // flight from the previous pass are no longer tracked.
        self.pending_exits.clear();
        for element in &plan.exiting {
            ops.push(ElementOp::Remove {
                key: element.key.clone(),
                state: removal_state(&element.state),
                transition,
            });
            self.pending_exits.push(element.key.clone());
        }

        self.retained = targets
            .iter()
            .map(|(key, state)| Element { key: key.clone(), state: state.clone() })
            .collect();

        Ok(RenderPass {
            ops,
            parsed,
            entered: plan.entering.len(),
            updated: plan.updating.len(),
            exited: plan.exiting.len(),
        })
    }

    /// The backend finished an exit transition; release the element.
    ///
    /// Returns false when the exit was already superseded by a later
    /// pass or a detach.
    pub fn complete_exit(&mut self, key: &ElementKey) -> bool {
        let before = self.pending_exits.len();
        self.pending_exits.retain(|k| k != key);
        self.pending_exits.len() != before
    }

    /// Exits whose transitions have not completed yet.
    #[must_use]
    pub fn pending_exits(&self) -> &[ElementKey] {
        &self.pending_exits
    }

    /// Keys of the currently retained elements, in rendering order.
    #[must_use]
    pub fn retained_keys(&self) -> Vec<ElementKey> {
        self.retained.iter().map(|e| e.key.clone()).collect()
    }

    /// Detach the chart: cancel every pending exit transition, then
    /// release all retained elements. The backend must not fire
    /// completion callbacks after this returns.
    pub fn detach(mut self) -> Vec<ElementKey> {
        self.pending_exits.clear();
        self.retained.drain(..).map(|e| e.key).collect()
    }

    /// Heat-map grid: one cell per (series, category), fill classified
    /// by the threshold scale.
    fn heat_grid_targets(
        &mut self,
        series: &[Series],
        parsed: &ParsedData,
    ) -> Result<Vec<(ElementKey, VisualState)>> {
        let inner_w = self.config.inner_width();
        let inner_h = self.config.inner_height();

        let x = self.x_band.derive_with(|| {
            BandScale::new(parsed.category_names.clone(), (0.0, inner_w), BAND_PADDING)
        })?;

        let thresholds = self
            .config
            .thresholds
            .clone()
            .unwrap_or_else(|| parsed.thresholds.clone());
        let colors = self.config.colors.clone();
        let color = self
            .color
            .derive_with(|| ThresholdScale::new(thresholds, colors))?;

        let x = x.clone();
        let color = color.clone();

        let y = self
            .y_band
            .derive_with(|| {
                BandScale::new(parsed.group_names.clone(), (0.0, inner_h), BAND_PADDING)
            })?
            .clone();

        let mut targets = Vec::new();
        for s in series {
            let row_y = y.scale(s.key.as_str())?;
            for v in &s.values {
                targets.push((
                    ElementKey::new(&s.key, &v.key),
                    VisualState {
                        x: x.scale(v.key.as_str())?,
                        y: row_y,
                        width: x.bandwidth(),
                        height: y.bandwidth(),
                        fill: color.scale(v.value)?,
                        opacity: 1.0,
                    },
                ));
            }
        }
        Ok(targets)
    }

    /// Stacked columns: one column per series, cumulative segments
    /// growing up from the plot-area floor.
    fn stacked_column_targets(
        &mut self,
        series: &[Series],
        parsed: &ParsedData,
    ) -> Result<Vec<(ElementKey, VisualState)>> {
        let inner_w = self.config.inner_width();
        let inner_h = self.config.inner_height();

        let x = self
            .x_band
            .derive_with(|| {
                BandScale::new(parsed.group_names.clone(), (0.0, inner_w), BAND_PADDING)
            })?
            .clone();
        let y = self
            .y_linear
            .derive_with(|| {
                Ok(LinearScale::new((0.0, parsed.max_group_total), (0.0, inner_h)))
            })?
            .clone();

        let palette = &self.config.colors;
        let mut targets = Vec::new();
        for s in series {
            let col_x = x.scale(s.key.as_str())?;
            for segment in stack(&s.values) {
                let cat_index = parsed
                    .category_names
                    .iter()
                    .position(|c| *c == segment.key)
                    .unwrap_or(0);
                let top = y.scale(segment.end)?;
                let bottom = y.scale(segment.start)?;
                targets.push((
                    ElementKey::new(&s.key, &segment.key),
                    VisualState {
                        x: col_x,
                        y: inner_h - top,
                        width: x.bandwidth(),
                        height: top - bottom,
                        fill: palette[cat_index % palette.len()],
                        opacity: 1.0,
                    },
                ));
            }
        }
        Ok(targets)
    }
}

/// Start state for an entering element, per chart geometry: heat cells
/// fade in, stacked segments grow up from the floor.
fn start_state(kind: ChartKind, end: &VisualState) -> VisualState {
    match kind {
        ChartKind::HeatGrid => VisualState { opacity: 0.0, ..end.clone() },
        ChartKind::StackedColumns => VisualState {
            y: end.y + end.height,
            height: 0.0,
            ..end.clone()
        },
    }
}

/// Removal state for an exiting element: fade out in place.
fn removal_state(current: &VisualState) -> VisualState {
    VisualState { opacity: 0.0, ..current.clone() }
}
