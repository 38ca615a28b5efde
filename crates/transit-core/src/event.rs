//! Typed simulation events and the listener bus.
//!
//! Events are emitted while a step runs (train movement, cargo countdown,
//! spawning) and through topology edits made between steps. They are queued
//! on the [`EventBus`] and delivered in one batch at the end of the next
//! step, oldest first. Delivered events are also handed back to the caller
//! of `Network::step` so the orchestrator can consume them as plain values.
//!
//! Listeners are the integration seam for the excluded layers: the loss
//! hook is a listener on [`EventKind::GameLost`], the score hook a listener
//! on [`EventKind::CargoDelivered`].
//!
//! # Suppression
//!
//! Event kinds can be suppressed via [`EventBus::suppress`]. Suppressed
//! events are dropped at emission and never reach listeners. Suppression
//! does not affect simulation state (score and money are booked directly).

use crate::fixed::Ticks;
use crate::id::*;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// A simulation event. All events carry the tick at which they occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // -- Stations and cargo --
    StationAdded {
        station: StationId,
        tick: Ticks,
    },
    CargoSpawned {
        cargo: CargoId,
        station: StationId,
        cargo_type: CargoTypeId,
        tick: Ticks,
    },
    CargoBoarded {
        cargo: CargoId,
        train: TrainId,
        station: StationId,
        tick: Ticks,
    },
    CargoDelivered {
        cargo: CargoId,
        cargo_type: CargoTypeId,
        train: TrainId,
        station: StationId,
        tick: Ticks,
    },
    CargoExpired {
        cargo: CargoId,
        tick: Ticks,
    },
    GameLost {
        tick: Ticks,
    },

    // -- Trains --
    TrainPurchased {
        train: TrainId,
        line: LineId,
        station: StationId,
        tick: Ticks,
    },
    TrainArrived {
        train: TrainId,
        line: LineId,
        station: StationId,
        tick: Ticks,
    },
    TrainDetached {
        train: TrainId,
        line: LineId,
        tick: Ticks,
    },

    // -- Topology --
    TrackDemolished {
        line: LineId,
        from: StationId,
        to: StationId,
        tick: Ticks,
    },
}

/// Discriminant tag for event types, used for suppression and subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    StationAdded,
    CargoSpawned,
    CargoBoarded,
    CargoDelivered,
    CargoExpired,
    GameLost,
    TrainPurchased,
    TrainArrived,
    TrainDetached,
    TrackDemolished,
}

const EVENT_KIND_COUNT: usize = 10;

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::StationAdded { .. } => EventKind::StationAdded,
            Event::CargoSpawned { .. } => EventKind::CargoSpawned,
            Event::CargoBoarded { .. } => EventKind::CargoBoarded,
            Event::CargoDelivered { .. } => EventKind::CargoDelivered,
            Event::CargoExpired { .. } => EventKind::CargoExpired,
            Event::GameLost { .. } => EventKind::GameLost,
            Event::TrainPurchased { .. } => EventKind::TrainPurchased,
            Event::TrainArrived { .. } => EventKind::TrainArrived,
            Event::TrainDetached { .. } => EventKind::TrainDetached,
            Event::TrackDemolished { .. } => EventKind::TrackDemolished,
        }
    }

    /// The tick the event occurred at.
    pub fn tick(&self) -> Ticks {
        match *self {
            Event::StationAdded { tick, .. }
            | Event::CargoSpawned { tick, .. }
            | Event::CargoBoarded { tick, .. }
            | Event::CargoDelivered { tick, .. }
            | Event::CargoExpired { tick, .. }
            | Event::GameLost { tick }
            | Event::TrainPurchased { tick, .. }
            | Event::TrainArrived { tick, .. }
            | Event::TrainDetached { tick, .. }
            | Event::TrackDemolished { tick, .. } => tick,
        }
    }
}

impl EventKind {
    fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// Listeners
// ---------------------------------------------------------------------------

/// A listener receives events read-only.
pub type Listener = Box<dyn FnMut(&Event)>;

/// Priority level for listeners. Lower priorities run first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ListenerPriority {
    Pre = 0,
    Normal = 1,
    Post = 2,
}

struct ListenerEntry {
    listener: Listener,
    priority: ListenerPriority,
    insertion_order: u64,
}

impl std::fmt::Debug for ListenerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("priority", &self.priority)
            .field("insertion_order", &self.insertion_order)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Queues events between deliveries and fans them out to listeners.
#[derive(Debug)]
pub struct EventBus {
    pending: Vec<Event>,
    suppressed: [bool; EVENT_KIND_COUNT],
    listeners: [Vec<ListenerEntry>; EVENT_KIND_COUNT],
    /// Events ever emitted per kind (suppressed ones excluded).
    emitted: [u64; EVENT_KIND_COUNT],
    next_insertion_order: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            suppressed: [false; EVENT_KIND_COUNT],
            listeners: std::array::from_fn(|_| Vec::new()),
            emitted: [0; EVENT_KIND_COUNT],
            next_insertion_order: 0,
        }
    }

    /// Suppress an event kind. Already queued events of that kind are dropped.
    pub fn suppress(&mut self, kind: EventKind) {
        self.suppressed[kind.index()] = true;
        self.pending.retain(|e| e.kind() != kind);
    }

    pub fn is_suppressed(&self, kind: EventKind) -> bool {
        self.suppressed[kind.index()]
    }

    /// Queue an event for the next delivery. No-op if the kind is suppressed.
    pub fn emit(&mut self, event: Event) {
        let idx = event.kind().index();
        if self.suppressed[idx] {
            return;
        }
        self.emitted[idx] += 1;
        self.pending.push(event);
    }

    /// Register a listener with normal priority.
    pub fn on(&mut self, kind: EventKind, listener: Listener) {
        self.on_with_priority(kind, ListenerPriority::Normal, listener);
    }

    pub fn on_with_priority(
        &mut self,
        kind: EventKind,
        priority: ListenerPriority,
        listener: Listener,
    ) {
        let order = self.next_insertion_order;
        self.next_insertion_order += 1;
        let entries = &mut self.listeners[kind.index()];
        entries.push(ListenerEntry {
            listener,
            priority,
            insertion_order: order,
        });
        entries.sort_by_key(|entry| (entry.priority, entry.insertion_order));
    }

    /// Deliver every queued event to its listeners, oldest first, and return
    /// the delivered events.
    pub fn deliver(&mut self) -> Vec<Event> {
        let events = std::mem::take(&mut self.pending);
        for event in &events {
            for entry in &mut self.listeners[event.kind().index()] {
                (entry.listener)(event);
            }
        }
        events
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn total_emitted(&self, kind: EventKind) -> u64 {
        self.emitted[kind.index()]
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn station_id() -> StationId {
        SlotMap::<StationId, ()>::with_key().insert(())
    }

    #[test]
    fn kind_and_tick_accessors() {
        let event = Event::StationAdded {
            station: station_id(),
            tick: 7,
        };
        assert_eq!(event.kind(), EventKind::StationAdded);
        assert_eq!(event.tick(), 7);
        assert_eq!(Event::GameLost { tick: 3 }.tick(), 3);
    }

    #[test]
    fn deliver_returns_events_in_emission_order() {
        let mut bus = EventBus::new();
        bus.emit(Event::GameLost { tick: 1 });
        bus.emit(Event::StationAdded {
            station: station_id(),
            tick: 1,
        });
        assert_eq!(bus.pending_count(), 2);

        let delivered = bus.deliver();
        assert_eq!(delivered.len(), 2);
        assert_eq!(delivered[0].kind(), EventKind::GameLost);
        assert_eq!(delivered[1].kind(), EventKind::StationAdded);
        assert_eq!(bus.pending_count(), 0);
        assert!(bus.deliver().is_empty());
    }

    #[test]
    fn listeners_only_see_their_kind() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(0u32));
        let seen_clone = seen.clone();
        bus.on(
            EventKind::GameLost,
            Box::new(move |_| *seen_clone.borrow_mut() += 1),
        );

        bus.emit(Event::StationAdded {
            station: station_id(),
            tick: 0,
        });
        bus.emit(Event::GameLost { tick: 0 });
        bus.deliver();

        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn suppressed_events_are_dropped() {
        let mut bus = EventBus::new();
        bus.emit(Event::GameLost { tick: 0 });
        bus.suppress(EventKind::GameLost);
        bus.emit(Event::GameLost { tick: 1 });

        assert!(bus.is_suppressed(EventKind::GameLost));
        assert!(bus.deliver().is_empty());
        assert_eq!(bus.total_emitted(EventKind::GameLost), 1);
    }

    #[test]
    fn priority_orders_listeners() {
        let mut bus = EventBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let o = order.clone();
        bus.on_with_priority(
            EventKind::GameLost,
            ListenerPriority::Post,
            Box::new(move |_| o.borrow_mut().push("post")),
        );
        let o = order.clone();
        bus.on(EventKind::GameLost, Box::new(move |_| o.borrow_mut().push("normal")));
        let o = order.clone();
        bus.on_with_priority(
            EventKind::GameLost,
            ListenerPriority::Pre,
            Box::new(move |_| o.borrow_mut().push("pre")),
        );

        bus.emit(Event::GameLost { tick: 0 });
        bus.deliver();

        assert_eq!(*order.borrow(), vec!["pre", "normal", "post"]);
    }
}
