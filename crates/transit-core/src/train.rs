//! Trains: movement along a line and the load/unload state machine.
//!
//! A train is either **dwelling** at a station (`wait_timer > 0`,
//! `progress == 0`) or **traveling** toward the next station
//! (`wait_timer == 0`, `0 <= progress < 1`). Progress is the fraction of the
//! current track segment already covered; each tick adds
//! `train_speed / segment_length`, so trains move at a constant real speed
//! regardless of segment length.
//!
//! On loop lines the station at index 0 and the one at the last index are the
//! same physical station. A train arriving at the last index forward is
//! renumbered to index 0, and a train leaving index 0 backward is renumbered
//! to the last index, so traversal wraps instead of reversing.

use crate::cargo::Cargo;
use crate::config::SimConfig;
use crate::event::{Event, EventBus};
use crate::fixed::{Fixed64, Ticks, Vec2, checked_div_64};
use crate::id::{CargoId, CargoTypeId, LineId, StationId, TrainId};
use crate::sim::Ledger;
use crate::station::Station;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Travel direction along a line's station sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward higher station indices.
    Forward,
    /// Toward lower station indices.
    Backward,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    /// +1 or -1.
    pub fn sign(self) -> i8 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

// ---------------------------------------------------------------------------
// Route view
// ---------------------------------------------------------------------------

/// Read-only view of the line a train runs on.
#[derive(Debug, Clone, Copy)]
pub struct Route<'a> {
    pub line: LineId,
    pub stations: &'a [StationId],
    pub is_loop: bool,
}

impl Route<'_> {
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<StationId> {
        self.stations.get(index).copied()
    }

    /// The adjacent index in `direction`, or `None` past either end.
    pub fn next_index(&self, index: usize, direction: Direction) -> Option<usize> {
        let next = match direction {
            Direction::Forward => index.checked_add(1)?,
            Direction::Backward => index.checked_sub(1)?,
        };
        (next < self.stations.len()).then_some(next)
    }
}

// ---------------------------------------------------------------------------
// Tick context
// ---------------------------------------------------------------------------

/// Everything a train touches during one tick besides its own line.
pub struct TickContext<'a> {
    pub tick: Ticks,
    pub config: &'a SimConfig,
    pub stations: &'a mut SlotMap<StationId, Station>,
    pub cargo: &'a mut SlotMap<CargoId, Cargo>,
    pub events: &'a mut EventBus,
    pub ledger: &'a mut Ledger,
}

// ---------------------------------------------------------------------------
// Train
// ---------------------------------------------------------------------------

/// Observable movement state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainState {
    Dwelling { remaining: Ticks },
    Traveling { progress: Fixed64 },
}

/// One occupied slot of a train's hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldCargo {
    pub cargo: CargoId,
    pub cargo_type: CargoTypeId,
}

/// Which cargo kinds are worth picking up.
enum Reachable {
    All,
    Only(Vec<CargoTypeId>),
}

impl Reachable {
    fn contains(&self, cargo_type: CargoTypeId) -> bool {
        match self {
            Reachable::All => true,
            Reachable::Only(types) => types.contains(&cargo_type),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Train {
    pub id: TrainId,
    pub line: LineId,
    pub(crate) index: usize,
    pub(crate) direction: Direction,
    pub(crate) progress: Fixed64,
    pub(crate) wait_timer: Ticks,
    pub(crate) hold: Vec<HeldCargo>,
    capacity: usize,
}

impl Train {
    /// Place a new train at `station` on `route`. `None` if the station is not
    /// on the route.
    pub fn new(
        id: TrainId,
        route: Route<'_>,
        station: StationId,
        capacity: usize,
    ) -> Option<Self> {
        let index = route.stations.iter().position(|&s| s == station)?;
        let direction = if !route.is_loop && route.len() > 1 && index == route.len() - 1 {
            Direction::Backward
        } else {
            Direction::Forward
        };
        Some(Self {
            id,
            line: route.line,
            index,
            direction,
            progress: Fixed64::ZERO,
            wait_timer: 0,
            hold: Vec::with_capacity(capacity),
            capacity,
        })
    }

    /// Create a train and immediately board useful cargo waiting at its
    /// spawn station.
    pub fn spawn(
        id: TrainId,
        route: Route<'_>,
        station: StationId,
        ctx: &mut TickContext<'_>,
    ) -> Option<Self> {
        let mut train = Self::new(id, route, station, ctx.config.train_capacity)?;
        while train.board_one(route, ctx) {}
        Some(train)
    }

    // -- Accessors --

    pub fn state(&self) -> TrainState {
        if self.wait_timer > 0 {
            TrainState::Dwelling {
                remaining: self.wait_timer,
            }
        } else {
            TrainState::Traveling {
                progress: self.progress,
            }
        }
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn progress(&self) -> Fixed64 {
        self.progress
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn hold(&self) -> &[HeldCargo] {
        &self.hold
    }

    pub fn is_full(&self) -> bool {
        self.hold.len() >= self.capacity
    }

    pub fn current_station(&self, route: Route<'_>) -> Option<StationId> {
        route.get(self.index)
    }

    /// The track index this train is currently traveling on, if any.
    pub fn occupied_track(&self) -> Option<usize> {
        if self.progress <= Fixed64::ZERO {
            return None;
        }
        match self.direction {
            Direction::Forward => Some(self.index),
            Direction::Backward => self.index.checked_sub(1),
        }
    }

    // -- Hold --

    /// Put a cargo into the hold. Returns `false` and leaves the hold
    /// untouched when it is full.
    pub fn add_cargo(&mut self, cargo: CargoId, cargo_type: CargoTypeId) -> bool {
        if self.is_full() {
            return false;
        }
        self.hold.push(HeldCargo { cargo, cargo_type });
        true
    }

    /// Take out the last-loaded cargo of `cargo_type`.
    pub fn deploy_cargo(&mut self, cargo_type: CargoTypeId) -> Option<CargoId> {
        let pos = self.hold.iter().rposition(|h| h.cargo_type == cargo_type)?;
        Some(self.hold.remove(pos).cargo)
    }

    /// Empty the hold, e.g. when the train is taken off its line.
    pub(crate) fn take_hold(&mut self) -> Vec<HeldCargo> {
        std::mem::take(&mut self.hold)
    }

    // -- Routing --

    /// Direction the train will leave its current station in, after any
    /// end-of-line reversal.
    pub fn departure_direction(&self, route: Route<'_>) -> Direction {
        if !route.is_loop && route.len() > 1 && route.next_index(self.index, self.direction).is_none()
        {
            self.direction.reversed()
        } else {
            self.direction
        }
    }

    /// Whether a station accepting `cargo_type` lies ahead of the train.
    pub fn moving_towards(
        &self,
        route: Route<'_>,
        stations: &SlotMap<StationId, Station>,
        cargo_type: CargoTypeId,
    ) -> bool {
        self.reachable(route, stations).contains(cargo_type)
    }

    fn reachable(&self, route: Route<'_>, stations: &SlotMap<StationId, Station>) -> Reachable {
        if route.is_loop {
            return Reachable::All;
        }
        let ahead = match self.departure_direction(route) {
            Direction::Forward => route.stations.get(self.index + 1..).unwrap_or(&[]),
            Direction::Backward => route.stations.get(..self.index).unwrap_or(&[]),
        };
        Reachable::Only(
            ahead
                .iter()
                .filter_map(|&s| stations.get(s).map(|st| st.accepts))
                .collect(),
        )
    }

    /// Current position on the field. At progress 0 this is exactly the
    /// current station; otherwise it is interpolated toward the next station.
    /// `None` only if the current index is not on the route.
    pub fn position(
        &self,
        route: Route<'_>,
        stations: &SlotMap<StationId, Station>,
    ) -> Option<Vec2> {
        let here = stations.get(route.get(self.index)?)?.position;
        if self.progress <= Fixed64::ZERO {
            return Some(here);
        }
        let there = route
            .next_index(self.index, self.direction)
            .and_then(|i| route.get(i))
            .and_then(|s| stations.get(s))
            .map_or(here, |st| st.position);
        Some(here.lerp(there, self.progress))
    }

    // -- Tick --

    /// Advance exactly one tick.
    pub fn update(&mut self, route: Route<'_>, ctx: &mut TickContext<'_>) {
        if self.wait_timer > 0 {
            self.dwell(route, ctx);
        } else {
            self.travel(route, ctx);
        }
    }

    fn dwell(&mut self, route: Route<'_>, ctx: &mut TickContext<'_>) {
        self.wait_timer -= 1;

        let deploy_time = ctx.config.cargo_deploy_time.max(1);
        if ctx.tick % deploy_time == 0 && !self.unload_one(route, ctx) {
            self.board_one(route, ctx);
        }

        if self.wait_timer == 0 {
            self.prepare_departure(route);
        }
    }

    /// Reset progress and settle the direction and index for leaving the
    /// current station. Idempotent.
    fn prepare_departure(&mut self, route: Route<'_>) {
        self.progress = Fixed64::ZERO;
        if route.len() < 2 {
            return;
        }
        if route.is_loop {
            let last = route.len() - 1;
            match self.direction {
                Direction::Forward if self.index >= last => self.index = 0,
                Direction::Backward if self.index == 0 => self.index = last,
                _ => {}
            }
        } else {
            self.direction = self.departure_direction(route);
        }
    }

    fn travel(&mut self, route: Route<'_>, ctx: &mut TickContext<'_>) {
        if self.progress <= Fixed64::ZERO {
            self.prepare_departure(route);
        }
        let Some(next) = route.next_index(self.index, self.direction) else {
            self.progress = Fixed64::ZERO;
            return;
        };
        let from = route.get(self.index).and_then(|s| ctx.stations.get(s));
        let to = route.get(next).and_then(|s| ctx.stations.get(s));
        let (Some(from), Some(to)) = (from, to) else {
            self.progress = Fixed64::ZERO;
            return;
        };

        let distance = from.distance_to(to);
        // Coincident stations (or a speed step too large to represent)
        // complete the segment at once.
        self.progress = match checked_div_64(ctx.config.train_speed, distance) {
            Some(step) => self.progress.saturating_add(step),
            None => Fixed64::ONE,
        };

        if self.progress >= Fixed64::ONE {
            self.arrive(next, route, ctx);
        }
    }

    fn arrive(&mut self, next: usize, route: Route<'_>, ctx: &mut TickContext<'_>) {
        self.index = next;
        self.progress = Fixed64::ZERO;
        if route.is_loop && self.direction == Direction::Forward && self.index + 1 >= route.len() {
            self.index = 0;
        }
        self.wait_timer = ctx.config.dwell_ticks();

        if let Some(station) = route.get(self.index) {
            tracing::trace!(train = ?self.id, ?station, tick = ctx.tick, "train arrived");
            ctx.events.emit(Event::TrainArrived {
                train: self.id,
                line: self.line,
                station,
                tick: ctx.tick,
            });
        }
    }

    /// Deliver one held cargo accepted by the current station.
    fn unload_one(&mut self, route: Route<'_>, ctx: &mut TickContext<'_>) -> bool {
        let Some(station) = route.get(self.index) else {
            return false;
        };
        let Some(accepts) = ctx.stations.get(station).map(|s| s.accepts) else {
            return false;
        };
        let Some(cargo) = self.deploy_cargo(accepts) else {
            return false;
        };

        ctx.cargo.remove(cargo);
        ctx.ledger.record_delivery(ctx.config.cargo_value(accepts));
        ctx.events.emit(Event::CargoDelivered {
            cargo,
            cargo_type: accepts,
            train: self.id,
            station,
            tick: ctx.tick,
        });
        true
    }

    /// Board the oldest waiting cargo that can be delivered further along.
    fn board_one(&mut self, route: Route<'_>, ctx: &mut TickContext<'_>) -> bool {
        if self.is_full() {
            return false;
        }
        let Some(station_id) = route.get(self.index) else {
            return false;
        };
        let reachable = self.reachable(route, ctx.stations);
        let cargo_arena = &*ctx.cargo;
        let Some(station) = ctx.stations.get_mut(station_id) else {
            return false;
        };
        let local = station.accepts;
        let taken = station.take_first_matching(|id| {
            cargo_arena
                .get(id)
                .is_some_and(|c| c.cargo_type != local && reachable.contains(c.cargo_type))
        });
        let Some(cargo_id) = taken else {
            return false;
        };
        let Some(cargo) = ctx.cargo.get_mut(cargo_id) else {
            return false;
        };

        cargo.hop_on_train(self.id);
        self.hold.push(HeldCargo {
            cargo: cargo_id,
            cargo_type: cargo.cargo_type,
        });
        ctx.events.emit(Event::CargoBoarded {
            cargo: cargo_id,
            train: self.id,
            station: station_id,
            tick: ctx.tick,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cargo::CargoOwner;

    struct World {
        config: SimConfig,
        stations: SlotMap<StationId, Station>,
        cargo: SlotMap<CargoId, Cargo>,
        events: EventBus,
        ledger: Ledger,
        line: LineId,
        train_id: TrainId,
    }

    impl World {
        fn new() -> Self {
            let mut lines = SlotMap::<LineId, ()>::with_key();
            let mut trains = SlotMap::<TrainId, ()>::with_key();
            Self {
                config: SimConfig::default(),
                stations: SlotMap::with_key(),
                cargo: SlotMap::with_key(),
                events: EventBus::new(),
                ledger: Ledger::default(),
                line: lines.insert(()),
                train_id: trains.insert(()),
            }
        }

        fn station(&mut self, x: i32, y: i32, accepts: u32) -> StationId {
            self.stations
                .insert(Station::new(Vec2::from_ints(x, y), CargoTypeId(accepts)))
        }

        fn cargo_at(&mut self, station: StationId, cargo_type: u32) -> CargoId {
            let id = self.cargo.insert(Cargo::new(CargoTypeId(cargo_type), station, 1000));
            self.stations[station].enqueue(id);
            id
        }

        fn route<'a>(&self, stations: &'a [StationId], is_loop: bool) -> Route<'a> {
            Route {
                line: self.line,
                stations,
                is_loop,
            }
        }

        fn ctx(&mut self, tick: Ticks) -> TickContext<'_> {
            TickContext {
                tick,
                config: &self.config,
                stations: &mut self.stations,
                cargo: &mut self.cargo,
                events: &mut self.events,
                ledger: &mut self.ledger,
            }
        }
    }

    fn cargo_keys(n: usize) -> Vec<CargoId> {
        let mut arena = SlotMap::<CargoId, ()>::with_key();
        (0..n).map(|_| arena.insert(())).collect()
    }

    #[test]
    fn spawn_direction_depends_on_end() {
        let mut w = World::new();
        let a = w.station(0, 0, 0);
        let b = w.station(100, 0, 1);
        let c = w.station(200, 0, 2);
        let seq = [a, b, c];

        let at_first = Train::new(w.train_id, w.route(&seq, false), a, 6).unwrap();
        assert_eq!(at_first.direction(), Direction::Forward);
        let at_last = Train::new(w.train_id, w.route(&seq, false), c, 6).unwrap();
        assert_eq!(at_last.direction(), Direction::Backward);
        assert_eq!(at_last.current_index(), 2);

        let ring = [a, b, c, a];
        let on_loop = Train::new(w.train_id, w.route(&ring, true), a, 6).unwrap();
        assert_eq!(on_loop.direction(), Direction::Forward);
        assert_eq!(on_loop.current_index(), 0);
    }

    #[test]
    fn spawn_off_route_is_rejected() {
        let mut w = World::new();
        let a = w.station(0, 0, 0);
        let b = w.station(100, 0, 1);
        let seq = [a];
        assert!(Train::new(w.train_id, w.route(&seq, false), b, 6).is_none());
    }

    #[test]
    fn full_hold_rejects_more_cargo() {
        let mut w = World::new();
        let a = w.station(0, 0, 0);
        let seq = [a];
        let mut train = Train::new(w.train_id, w.route(&seq, false), a, 2).unwrap();
        let ids = cargo_keys(3);

        assert!(train.add_cargo(ids[0], CargoTypeId(1)));
        assert!(train.add_cargo(ids[1], CargoTypeId(2)));
        let before = train.hold().to_vec();
        assert!(!train.add_cargo(ids[2], CargoTypeId(1)));
        assert_eq!(train.hold(), before.as_slice());
        assert!(train.is_full());
    }

    #[test]
    fn deploy_scans_from_the_end() {
        let mut w = World::new();
        let a = w.station(0, 0, 0);
        let seq = [a];
        let mut train = Train::new(w.train_id, w.route(&seq, false), a, 6).unwrap();
        let ids = cargo_keys(3);
        train.add_cargo(ids[0], CargoTypeId(1));
        train.add_cargo(ids[1], CargoTypeId(2));
        train.add_cargo(ids[2], CargoTypeId(1));

        assert_eq!(train.deploy_cargo(CargoTypeId(1)), Some(ids[2]));
        assert_eq!(train.deploy_cargo(CargoTypeId(1)), Some(ids[0]));
        assert_eq!(train.deploy_cargo(CargoTypeId(1)), None);
        assert_eq!(train.hold().len(), 1);
    }

    #[test]
    fn moving_towards_only_looks_ahead() {
        let mut w = World::new();
        let a = w.station(0, 0, 0);
        let b = w.station(100, 0, 1);
        let c = w.station(200, 0, 2);
        let seq = [a, b, c];
        let route = w.route(&seq, false);

        let mut train = Train::new(w.train_id, route, b, 6).unwrap();
        assert!(train.moving_towards(route, &w.stations, CargoTypeId(2)));
        assert!(!train.moving_towards(route, &w.stations, CargoTypeId(0)));
        // The current station does not count as ahead.
        assert!(!train.moving_towards(route, &w.stations, CargoTypeId(1)));

        train.direction = Direction::Backward;
        assert!(train.moving_towards(route, &w.stations, CargoTypeId(0)));
        assert!(!train.moving_towards(route, &w.stations, CargoTypeId(2)));
    }

    #[test]
    fn moving_towards_accounts_for_pending_reversal() {
        let mut w = World::new();
        let a = w.station(0, 0, 0);
        let b = w.station(100, 0, 1);
        let seq = [a, b];
        let route = w.route(&seq, false);
        let mut train = Train::new(w.train_id, route, a, 6).unwrap();
        // Parked at the far end still heading forward: it will turn around.
        train.index = 1;
        assert!(train.moving_towards(route, &w.stations, CargoTypeId(0)));
    }

    #[test]
    fn moving_towards_always_true_on_loop() {
        let mut w = World::new();
        let a = w.station(0, 0, 0);
        let b = w.station(100, 0, 1);
        let c = w.station(100, 100, 2);
        let ring = [a, b, c, a];
        let route = w.route(&ring, true);
        let train = Train::new(w.train_id, route, a, 6).unwrap();
        assert!(train.moving_towards(route, &w.stations, CargoTypeId(3)));
    }

    #[test]
    fn spawn_boards_cargo_headed_forward() {
        let mut w = World::new();
        let a = w.station(0, 0, 0);
        let b = w.station(100, 0, 1);
        let useful = w.cargo_at(a, 1);
        let useless = w.cargo_at(a, 3);
        let seq = [a, b];
        let id = w.train_id;
        let route = Route {
            line: w.line,
            stations: &seq,
            is_loop: false,
        };

        let mut ctx = w.ctx(0);
        let train = Train::spawn(id, route, a, &mut ctx).unwrap();

        assert_eq!(train.hold().len(), 1);
        assert_eq!(train.hold()[0].cargo, useful);
        assert_eq!(w.cargo[useful].owner(), CargoOwner::Train(id));
        assert_eq!(w.cargo[useless].owner(), CargoOwner::Station(a));
        assert_eq!(w.stations[a].waiting().collect::<Vec<_>>(), vec![useless]);
    }

    #[test]
    fn travel_progress_scales_with_distance() {
        let mut w = World::new();
        let a = w.station(0, 0, 0);
        let b = w.station(50, 0, 1);
        let seq = [a, b];
        let id = w.train_id;
        let route = Route {
            line: w.line,
            stations: &seq,
            is_loop: false,
        };
        let mut train = Train::new(id, route, a, 6).unwrap();

        // Speed 5 over 50 units: one tenth per tick.
        let mut ctx = w.ctx(0);
        train.update(route, &mut ctx);
        assert_eq!(train.progress(), Fixed64::from_num(5) / Fixed64::from_num(50));
        assert_eq!(train.occupied_track(), Some(0));

        let pos = train.position(route, &w.stations).unwrap();
        assert_eq!(pos.y, Fixed64::ZERO);
        assert!(pos.x > Fixed64::ZERO && pos.x < Fixed64::from_num(50));
    }

    #[test]
    fn arrival_snaps_to_station_and_dwells() {
        let mut w = World::new();
        let a = w.station(0, 0, 0);
        let b = w.station(10, 0, 1);
        let seq = [a, b];
        let id = w.train_id;
        let route = Route {
            line: w.line,
            stations: &seq,
            is_loop: false,
        };
        let mut train = Train::new(id, route, a, 6).unwrap();

        for tick in 0..2 {
            let mut ctx = w.ctx(tick);
            train.update(route, &mut ctx);
        }
        assert_eq!(train.current_index(), 1);
        assert_eq!(train.progress(), Fixed64::ZERO);
        assert_eq!(
            train.state(),
            TrainState::Dwelling {
                remaining: w.config.dwell_ticks()
            }
        );
        assert_eq!(train.position(route, &w.stations), Some(Vec2::from_ints(10, 0)));
        assert_eq!(train.occupied_track(), None);
    }

    #[test]
    fn coincident_stations_complete_in_one_tick() {
        let mut w = World::new();
        let a = w.station(40, 40, 0);
        let b = w.station(40, 40, 1);
        let seq = [a, b];
        let id = w.train_id;
        let route = Route {
            line: w.line,
            stations: &seq,
            is_loop: false,
        };
        let mut train = Train::new(id, route, a, 6).unwrap();
        let mut ctx = w.ctx(0);
        train.update(route, &mut ctx);
        assert_eq!(train.current_index(), 1);
    }

    #[test]
    fn dwelling_unloads_before_loading() {
        let mut w = World::new();
        let a = w.station(0, 0, 0);
        let b = w.station(10, 0, 1);
        let waiting = w.cargo_at(a, 1);
        let seq = [a, b];
        let id = w.train_id;
        let route = Route {
            line: w.line,
            stations: &seq,
            is_loop: false,
        };
        let mut train = Train::new(id, route, a, 6).unwrap();
        let delivered = w.cargo.insert(Cargo::new(CargoTypeId(0), b, 1000));
        w.cargo[delivered].hop_on_train(id);
        train.add_cargo(delivered, CargoTypeId(0));
        train.wait_timer = 10;

        // Tick 5 is a deploy tick: the held coal is delivered, nobody boards.
        let mut ctx = w.ctx(5);
        train.update(route, &mut ctx);
        assert!(!w.cargo.contains_key(delivered));
        assert_eq!(w.ledger.score, 1);
        assert_eq!(w.ledger.money, 10);
        assert!(train.hold().is_empty());
        assert_eq!(w.stations[a].waiting_count(), 1);

        // Off-cadence tick: nothing happens.
        let mut ctx = w.ctx(6);
        train.update(route, &mut ctx);
        assert!(train.hold().is_empty());

        // Next deploy tick: nothing to unload, so the waiting cargo boards.
        let mut ctx = w.ctx(10);
        train.update(route, &mut ctx);
        assert_eq!(train.hold()[0].cargo, waiting);
        assert_eq!(w.cargo[waiting].owner(), CargoOwner::Train(id));
    }

    #[test]
    fn dwell_end_reverses_at_line_end() {
        let mut w = World::new();
        let a = w.station(0, 0, 0);
        let b = w.station(10, 0, 1);
        let seq = [a, b];
        let id = w.train_id;
        let route = Route {
            line: w.line,
            stations: &seq,
            is_loop: false,
        };
        let mut train = Train::new(id, route, a, 6).unwrap();
        train.index = 1;
        train.wait_timer = 1;

        let mut ctx = w.ctx(1);
        train.update(route, &mut ctx);
        assert_eq!(train.direction(), Direction::Backward);
        assert!(matches!(train.state(), TrainState::Traveling { .. }));
    }

    #[test]
    fn single_station_route_stays_put() {
        let mut w = World::new();
        let a = w.station(0, 0, 0);
        let seq = [a];
        let id = w.train_id;
        let route = Route {
            line: w.line,
            stations: &seq,
            is_loop: false,
        };
        let mut train = Train::new(id, route, a, 6).unwrap();
        for tick in 0..5 {
            let mut ctx = w.ctx(tick);
            train.update(route, &mut ctx);
        }
        assert_eq!(train.current_index(), 0);
        assert_eq!(train.progress(), Fixed64::ZERO);
        assert_eq!(train.direction(), Direction::Forward);
    }

    #[test]
    fn position_clamps_out_of_range_neighbor() {
        let mut w = World::new();
        let a = w.station(0, 0, 0);
        let b = w.station(10, 0, 1);
        let seq = [a, b];
        let route = w.route(&seq, false);
        let mut train = Train::new(w.train_id, route, a, 6).unwrap();
        train.index = 1;
        train.direction = Direction::Forward;
        train.progress = Fixed64::from_num(0.5);
        assert_eq!(train.position(route, &w.stations), Some(Vec2::from_ints(10, 0)));

        train.index = 7;
        assert_eq!(train.position(route, &w.stations), None);
    }
}
