//! Named interaction events for data-bound elements.
//!
//! Charts expose a fixed six-event vocabulary: hover, un-hover, and
//! click at element level and at series level. Each event carries a
//! concrete payload rather than an ad-hoc argument list, and the bus
//! dispatches to every subscriber of that event in subscription order.

use crate::data::{Series, Value};

/// An interaction event with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    /// Pointer entered a data-bound element.
    ValueMouseOver {
        /// Key of the series owning the element.
        series: String,
        /// The bound value.
        value: Value,
    },
    /// Pointer left a data-bound element.
    ValueMouseOut {
        /// Key of the series owning the element.
        series: String,
        /// The bound value.
        value: Value,
    },
    /// A data-bound element was clicked.
    ValueClick {
        /// Key of the series owning the element.
        series: String,
        /// The bound value.
        value: Value,
    },
    /// Pointer entered a series group.
    SeriesMouseOver {
        /// The bound series.
        series: Series,
    },
    /// Pointer left a series group.
    SeriesMouseOut {
        /// The bound series.
        series: Series,
    },
    /// A series group was clicked.
    SeriesClick {
        /// The bound series.
        series: Series,
    },
}

impl ChartEvent {
    /// The event's vocabulary entry, for subscription matching.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            ChartEvent::ValueMouseOver { .. } => EventKind::ValueMouseOver,
            ChartEvent::ValueMouseOut { .. } => EventKind::ValueMouseOut,
            ChartEvent::ValueClick { .. } => EventKind::ValueClick,
            ChartEvent::SeriesMouseOver { .. } => EventKind::SeriesMouseOver,
            ChartEvent::SeriesMouseOut { .. } => EventKind::SeriesMouseOut,
            ChartEvent::SeriesClick { .. } => EventKind::SeriesClick,
        }
    }
}

/// The fixed event vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Element-level hover start.
    ValueMouseOver,
    /// Element-level hover end.
    ValueMouseOut,
    /// Element-level click.
    ValueClick,
    /// Series-level hover start.
    SeriesMouseOver,
    /// Series-level hover end.
    SeriesMouseOut,
    /// Series-level click.
    SeriesClick,
}

/// Identifies one subscription for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&ChartEvent)>;

/// Publish/subscribe dispatch over the fixed event vocabulary.
///
/// Emitting an event with no subscribers is a no-op; multiple
/// subscriptions to one event all fire, in subscription order.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(SubscriptionId, EventKind, Handler)>,
    next_id: u64,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl EventBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a handler to one event kind.
    pub fn on(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(&ChartEvent) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, kind, Box::new(handler)));
        id
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Dispatch an event to its subscribers in subscription order.
    pub fn emit(&mut self, event: &ChartEvent) {
        let kind = event.kind();
        for (_, k, handler) in &mut self.subscribers {
            if *k == kind {
                handler(event);
            }
        }
    }

    /// Number of handlers registered for an event kind.
    #[must_use]
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.subscribers.iter().filter(|(_, k, _)| *k == kind).count()
    }
}
