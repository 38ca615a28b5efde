//! The network: single owner of every station, line, train and cargo, and the
//! per-tick orchestrator.
//!
//! # Step order
//!
//! Each call to [`Network::step`] (or each fixed step inside
//! [`Network::advance`]) runs:
//!
//! 1. **Trains** -- every line advances its trains (movement, unloading,
//!    boarding). Deliveries book score and money directly.
//! 2. **Cargo** -- every tracked cargo counts down. The first expiry ends the
//!    session: status becomes [`GameStatus::Lost`] and `GameLost` is emitted.
//! 3. **Spawn** -- the optional [`Spawner`] adds stations and cargo.
//! 4. **Deliver** -- queued events go to listeners and into the result.
//! 5. **Bookkeeping** -- the tick counter increments.
//!
//! Once lost, the network never steps again.
//!
//! Topology edits (`connect_stations`, `remove_station`, `demolish_track`,
//! `buy_train`) are plain `&mut self` calls made between steps. Station
//! line back-references are re-synced after every edit.

use crate::cargo::{Cargo, CargoOwner, CargoStatus};
use crate::config::SimConfig;
use crate::event::{Event, EventBus, EventKind, Listener, ListenerPriority};
use crate::fixed::{Fixed64, Ticks, Vec2};
use crate::id::{CargoId, CargoTypeId, LineId, StationId, TrainId};
use crate::line::{Line, Track};
use crate::sim::{AdvanceResult, GameStatus, Ledger, SimState, SimulationStrategy, StateHash};
use crate::spawner::{Spawn, Spawner};
use crate::station::Station;
use crate::train::{Direction, TickContext, Train, TrainState};
use slotmap::{Key, SlotMap};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from the network's mutation surface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    #[error("station not found: {0:?}")]
    StationNotFound(StationId),
    #[error("line not found: {0:?}")]
    LineNotFound(LineId),
    #[error("unknown cargo type: {0:?}")]
    UnknownCargoType(CargoTypeId),
    #[error("line limit of {max} reached")]
    TooManyLines { max: usize },
    #[error("line {line:?} already runs {max} trains")]
    TooManyTrains { line: LineId, max: usize },
    #[error("station {station:?} is not on line {line:?}")]
    StationNotOnLine { line: LineId, station: StationId },
    #[error("line {line:?} cannot be extended from station {station:?}")]
    InvalidDragPoint { line: LineId, station: StationId },
    #[error("cannot connect {from:?} to {to:?} on line {line:?}")]
    InvalidConnection {
        line: LineId,
        from: StationId,
        to: StationId,
    },
    #[error("track {index} on line {line:?} cannot be demolished")]
    TrackNotDeletable { line: LineId, index: usize },
    #[error("insufficient funds: need {cost}, have {available}")]
    InsufficientFunds { cost: i64, available: i64 },
}

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

pub struct Network {
    pub(crate) config: SimConfig,
    pub(crate) stations: SlotMap<StationId, Station>,
    pub(crate) lines: SlotMap<LineId, Line>,
    /// Which line owns each live train.
    pub(crate) train_registry: SlotMap<TrainId, LineId>,
    /// Every tracked (undelivered) cargo.
    pub(crate) cargo: SlotMap<CargoId, Cargo>,
    pub(crate) sim_state: SimState,
    pub(crate) strategy: SimulationStrategy,
    pub(crate) paused: bool,
    pub(crate) status: GameStatus,
    pub(crate) ledger: Ledger,
    pub(crate) event_bus: EventBus,
    pub(crate) spawner: Option<Spawner>,
}

impl Network {
    pub fn new(config: SimConfig, strategy: SimulationStrategy) -> Self {
        let ledger = Ledger::with_capital(config.starting_capital);
        Self {
            config,
            stations: SlotMap::with_key(),
            lines: SlotMap::with_key(),
            train_registry: SlotMap::with_key(),
            cargo: SlotMap::with_key(),
            sim_state: SimState::new(),
            strategy,
            paused: false,
            status: GameStatus::Running,
            ledger,
            event_bus: EventBus::default(),
            spawner: None,
        }
    }

    /// Turn on periodic station and cargo spawning.
    pub fn enable_spawner(&mut self, seed: u64) {
        self.spawner = Some(Spawner::new(seed, &self.config));
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn tick(&self) -> Ticks {
        self.sim_state.tick
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_lost(&self) -> bool {
        self.status.is_lost()
    }

    pub fn score(&self) -> u64 {
        self.ledger.score
    }

    pub fn money(&self) -> i64 {
        self.ledger.money
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(id)
    }

    pub fn stations(&self) -> impl Iterator<Item = (StationId, &Station)> {
        self.stations.iter()
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.get(id)
    }

    pub fn lines(&self) -> impl Iterator<Item = (LineId, &Line)> {
        self.lines.iter()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn train(&self, id: TrainId) -> Option<&Train> {
        let line = self.train_registry.get(id)?;
        self.lines.get(*line)?.train(id)
    }

    pub fn train_count(&self) -> usize {
        self.train_registry.len()
    }

    pub fn cargo(&self, id: CargoId) -> Option<&Cargo> {
        self.cargo.get(id)
    }

    /// Number of tracked (undelivered) cargo.
    pub fn cargo_count(&self) -> usize {
        self.cargo.len()
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    pub fn on_event(&mut self, kind: EventKind, listener: Listener) {
        self.event_bus.on(kind, listener);
    }

    pub fn on_event_with_priority(
        &mut self,
        kind: EventKind,
        priority: ListenerPriority,
        listener: Listener,
    ) {
        self.event_bus.on_with_priority(kind, priority, listener);
    }

    pub fn suppress_event(&mut self, kind: EventKind) {
        self.event_bus.suppress(kind);
    }

    // -----------------------------------------------------------------------
    // Pause / resume
    // -----------------------------------------------------------------------

    /// While paused, `advance()` and `step()` are no-ops. Edits still work.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // -----------------------------------------------------------------------
    // Stations and cargo
    // -----------------------------------------------------------------------

    pub fn add_station(
        &mut self,
        position: Vec2,
        accepts: CargoTypeId,
    ) -> Result<StationId, NetworkError> {
        self.check_cargo_type(accepts)?;
        let id = self.stations.insert(Station::new(position, accepts));
        self.event_bus.emit(Event::StationAdded {
            station: id,
            tick: self.sim_state.tick,
        });
        tracing::debug!(station = ?id, ?accepts, "station added");
        Ok(id)
    }

    /// Put a new cargo into `station`'s queue with a full elimination timer.
    pub fn spawn_cargo(
        &mut self,
        station: StationId,
        cargo_type: CargoTypeId,
    ) -> Result<CargoId, NetworkError> {
        self.check_cargo_type(cargo_type)?;
        let target = self
            .stations
            .get_mut(station)
            .ok_or(NetworkError::StationNotFound(station))?;
        let id = self.cargo.insert(Cargo::new(
            cargo_type,
            station,
            self.config.elimination_timer,
        ));
        target.enqueue(id);
        self.event_bus.emit(Event::CargoSpawned {
            cargo: id,
            station,
            cargo_type,
            tick: self.sim_state.tick,
        });
        tracing::trace!(cargo = ?id, ?station, ?cargo_type, "cargo spawned");
        Ok(id)
    }

    fn check_cargo_type(&self, cargo_type: CargoTypeId) -> Result<(), NetworkError> {
        if cargo_type.index() < self.config.cargo_kinds.len() {
            Ok(())
        } else {
            Err(NetworkError::UnknownCargoType(cargo_type))
        }
    }

    // -----------------------------------------------------------------------
    // Lines
    // -----------------------------------------------------------------------

    /// Open a new, empty line. Its color comes from the palette in creation
    /// order.
    pub fn add_line(&mut self) -> Result<LineId, NetworkError> {
        let max = self.config.max_lines;
        if self.lines.len() >= max {
            return Err(NetworkError::TooManyLines { max });
        }
        self.spend(self.config.cost_per_line)?;
        let number = self.lines.len();
        let color = self.config.line_color(number);
        let id = self
            .lines
            .insert_with_key(|id| Line::new(id, number, color));
        tracing::debug!(line = ?id, number, "line opened");
        Ok(id)
    }

    /// Extend `line` from its end `from` to `to`, or close it into a loop when
    /// `to` is its other end. An empty line is started with both stations.
    /// Charges `cost_per_meter` times the track length.
    pub fn connect_stations(
        &mut self,
        line_id: LineId,
        from: StationId,
        to: StationId,
    ) -> Result<(), NetworkError> {
        let from_pos = self.station_position(from)?;
        let to_pos = self.station_position(to)?;
        let line = self
            .lines
            .get(line_id)
            .ok_or(NetworkError::LineNotFound(line_id))?;

        let invalid = NetworkError::InvalidConnection {
            line: line_id,
            from,
            to,
        };
        if line.stations().is_empty() {
            if from == to {
                return Err(invalid);
            }
        } else {
            if line.is_loop() || !line.is_valid_drag_point(from) {
                return Err(NetworkError::InvalidDragPoint {
                    line: line_id,
                    station: from,
                });
            }
            if !line.can_close_loop(from, to) && !line.can_connect_to(from, to) {
                return Err(invalid);
            }
        }
        let at_beginning = line.first() == Some(from) && line.last() != Some(from);

        let cost = self
            .config
            .cost_per_meter
            .saturating_mul(from_pos.distance(to_pos))
            .round()
            .to_num::<i64>();
        self.spend(cost)?;

        let before = self.line_stations(line_id);
        if let Some(line) = self.lines.get_mut(line_id) {
            if line.stations().is_empty() {
                line.add_station(from, false);
            }
            line.add_station(to, at_beginning);
        }
        self.sync_membership(line_id, &before);
        tracing::debug!(line = ?line_id, ?from, ?to, cost, "stations connected");
        Ok(())
    }

    /// Take `station` off `line`. Trains standing at it are detached.
    pub fn remove_station(
        &mut self,
        line_id: LineId,
        station: StationId,
    ) -> Result<Vec<TrainId>, NetworkError> {
        let line = self
            .lines
            .get_mut(line_id)
            .ok_or(NetworkError::LineNotFound(line_id))?;
        let before = line.stations().to_vec();
        let detached = line
            .remove_station(station)
            .ok_or(NetworkError::StationNotOnLine {
                line: line_id,
                station,
            })?;

        self.sync_membership(line_id, &before);
        let ids = detached.iter().map(|t| t.id).collect();
        self.retire_trains(line_id, detached, &before);
        Ok(ids)
    }

    /// Demolish the track at `index` on `line`.
    pub fn demolish_track(&mut self, line_id: LineId, index: usize) -> Result<Track, NetworkError> {
        let line = self
            .lines
            .get_mut(line_id)
            .ok_or(NetworkError::LineNotFound(line_id))?;
        let before = line.stations().to_vec();
        let demolition = line
            .demolish_track(index)
            .ok_or(NetworkError::TrackNotDeletable {
                line: line_id,
                index,
            })?;

        self.sync_membership(line_id, &before);
        self.retire_trains(line_id, demolition.detached, &before);
        self.event_bus.emit(Event::TrackDemolished {
            line: line_id,
            from: demolition.track.from,
            to: demolition.track.to,
            tick: self.sim_state.tick,
        });
        Ok(demolition.track)
    }

    // -----------------------------------------------------------------------
    // Trains
    // -----------------------------------------------------------------------

    /// Buy a train and place it at `station` on `line`. The train boards
    /// waiting cargo right away.
    pub fn buy_train(&mut self, line_id: LineId, station: StationId) -> Result<TrainId, NetworkError> {
        let line = self
            .lines
            .get(line_id)
            .ok_or(NetworkError::LineNotFound(line_id))?;
        if !line.contains(station) {
            return Err(NetworkError::StationNotOnLine {
                line: line_id,
                station,
            });
        }
        let max = self.config.max_trains_per_line;
        if line.trains().len() >= max {
            return Err(NetworkError::TooManyTrains { line: line_id, max });
        }
        self.spend(self.config.cost_per_train)?;

        let tick = self.sim_state.tick;
        let id = self.train_registry.insert(line_id);
        self.event_bus.emit(Event::TrainPurchased {
            train: id,
            line: line_id,
            station,
            tick,
        });

        let Self {
            config,
            stations,
            lines,
            cargo,
            event_bus,
            ledger,
            ..
        } = self;
        let line = lines
            .get_mut(line_id)
            .ok_or(NetworkError::LineNotFound(line_id))?;
        let mut ctx = TickContext {
            tick,
            config,
            stations,
            cargo,
            events: event_bus,
            ledger,
        };
        let train = Train::spawn(id, line.route(), station, &mut ctx).ok_or(
            NetworkError::StationNotOnLine {
                line: line_id,
                station,
            },
        )?;
        line.add_train(train);
        tracing::debug!(train = ?id, line = ?line_id, ?station, "train purchased");
        Ok(id)
    }

    /// Grant money without a delivery. Score is unaffected.
    pub fn credit(&mut self, amount: i64) {
        self.ledger.credit(amount);
    }

    fn spend(&mut self, cost: i64) -> Result<(), NetworkError> {
        let available = self.ledger.money;
        if self.ledger.try_spend(cost) {
            Ok(())
        } else {
            Err(NetworkError::InsufficientFunds { cost, available })
        }
    }

    /// Remove detached trains from the registry and put their cargo back at
    /// the station each last stood at (`old_stations` is the line's sequence
    /// before the edit). Cargo that is already at its destination counts as
    /// delivered.
    fn retire_trains(&mut self, line_id: LineId, trains: Vec<Train>, old_stations: &[StationId]) {
        let tick = self.sim_state.tick;
        for mut train in trains {
            self.train_registry.remove(train.id);
            let last = old_stations.get(train.current_index()).copied();
            for held in train.take_hold() {
                self.return_cargo(held.cargo, train.id, last, tick);
            }
            self.event_bus.emit(Event::TrainDetached {
                train: train.id,
                line: line_id,
                tick,
            });
            tracing::debug!(train = ?train.id, line = ?line_id, "train detached");
        }
    }

    fn return_cargo(&mut self, id: CargoId, train: TrainId, at: Option<StationId>, tick: Ticks) {
        let Some(cargo) = self.cargo.get_mut(id) else {
            return;
        };
        let Some((station_id, station)) = at.and_then(|s| Some((s, self.stations.get_mut(s)?)))
        else {
            tracing::warn!(cargo = ?id, "no station to return cargo to; dropping it");
            self.cargo.remove(id);
            return;
        };

        if station.accepts == cargo.cargo_type {
            let cargo_type = cargo.cargo_type;
            self.cargo.remove(id);
            self.ledger
                .record_delivery(self.config.cargo_value(cargo_type));
            self.event_bus.emit(Event::CargoDelivered {
                cargo: id,
                cargo_type,
                train,
                station: station_id,
                tick,
            });
        } else {
            cargo.return_to_station(station_id);
            station.enqueue(id);
        }
    }

    // -----------------------------------------------------------------------
    // Membership sync
    // -----------------------------------------------------------------------

    fn line_stations(&self, line_id: LineId) -> Vec<StationId> {
        self.lines
            .get(line_id)
            .map(|l| l.stations().to_vec())
            .unwrap_or_default()
    }

    /// Bring station back-references in line with `line_id`'s current
    /// sequence, given its sequence before the edit.
    fn sync_membership(&mut self, line_id: LineId, before: &[StationId]) {
        let after = self.line_stations(line_id);
        for &s in before {
            if !after.contains(&s) {
                if let Some(station) = self.stations.get_mut(s) {
                    station.detach_line(line_id);
                }
            }
        }
        for &s in &after {
            if let Some(station) = self.stations.get_mut(s) {
                station.attach_line(line_id);
            }
        }
    }

    fn station_position(&self, id: StationId) -> Result<Vec2, NetworkError> {
        self.stations
            .get(id)
            .map(|s| s.position)
            .ok_or(NetworkError::StationNotFound(id))
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The station under `point`, nearest first.
    pub fn station_at(&self, point: Vec2) -> Option<StationId> {
        let radius = self.config.station_radius;
        self.stations
            .iter()
            .filter(|(_, s)| s.is_clicked(point, radius))
            .min_by_key(|(_, s)| s.distance_to(&point))
            .map(|(id, _)| id)
    }

    /// The track under `point` as `(line, track index)`, nearest first.
    pub fn track_at(&self, point: Vec2) -> Option<(LineId, usize)> {
        let radius = self.config.track_click_radius;
        let mut best: Option<(Fixed64, LineId, usize)> = None;
        for (line_id, line) in &self.lines {
            for (index, track) in line.tracks().iter().enumerate() {
                let (Some(a), Some(b)) = (self.stations.get(track.from), self.stations.get(track.to))
                else {
                    continue;
                };
                let d = point.distance_to_segment(a.position, b.position);
                if d <= radius && best.is_none_or(|(bd, _, _)| d < bd) {
                    best = Some((d, line_id, index));
                }
            }
        }
        best.map(|(_, line, index)| (line, index))
    }

    pub fn is_valid_drag_point(&self, line: LineId, station: StationId) -> bool {
        self.lines
            .get(line)
            .is_some_and(|l| l.is_valid_drag_point(station))
    }

    pub fn can_delete_track(&self, line: LineId, index: usize) -> bool {
        self.lines
            .get(line)
            .is_some_and(|l| l.can_delete_track(index))
    }

    /// Lines that could be extended by dragging from `station`: open lines
    /// ending there, and empty lines.
    pub fn available_lines(&self, station: StationId) -> Vec<LineId> {
        if !self.stations.contains_key(station) {
            return Vec::new();
        }
        self.lines
            .iter()
            .filter(|(_, l)| !l.is_loop() && l.is_valid_drag_point(station))
            .map(|(id, _)| id)
            .collect()
    }

    /// Whether any line through `station` reaches a station accepting
    /// `cargo_type`.
    pub fn station_serves(&self, station: StationId, cargo_type: CargoTypeId) -> bool {
        let Some(s) = self.stations.get(station) else {
            return false;
        };
        s.lines()
            .iter()
            .filter_map(|&l| self.lines.get(l))
            .any(|l| l.can_deploy_type(cargo_type, &self.stations))
    }

    /// Next stop and direction of `train`. `None` when stranded.
    pub fn next_stop(&self, train: TrainId) -> Option<(StationId, Direction)> {
        let line = self.lines.get(*self.train_registry.get(train)?)?;
        let t = line.train(train)?;
        let here = t.current_station(line.route())?;
        line.get_next_stop(here, t.departure_direction(line.route()))
    }

    /// Who holds `cargo`, if it is still tracked.
    pub fn cargo_owner(&self, cargo: CargoId) -> Option<CargoOwner> {
        self.cargo.get(cargo).map(Cargo::owner)
    }

    // -----------------------------------------------------------------------
    // Stepping
    // -----------------------------------------------------------------------

    /// Advance the simulation. Tick mode runs exactly one step; delta mode
    /// accumulates `dt` and runs as many fixed steps as fit.
    pub fn advance(&mut self, dt: Ticks) -> AdvanceResult {
        let mut result = AdvanceResult::default();
        if self.paused {
            return result;
        }
        match self.strategy.clone() {
            SimulationStrategy::Tick => {
                self.step_internal(&mut result);
            }
            SimulationStrategy::Delta { fixed_timestep } => {
                self.sim_state.accumulator += dt;
                let step_size = fixed_timestep.max(1);
                while self.sim_state.accumulator >= step_size {
                    self.sim_state.accumulator -= step_size;
                    self.step_internal(&mut result);
                }
            }
        }
        result
    }

    /// Run a single simulation step (convenience for tick mode).
    pub fn step(&mut self) -> AdvanceResult {
        self.advance(0)
    }

    fn step_internal(&mut self, result: &mut AdvanceResult) {
        if self.status.is_lost() {
            return;
        }
        let tick = self.sim_state.tick;

        self.phase_trains(tick);
        self.phase_cargo(tick);
        self.phase_spawn(tick);
        result.events.extend(self.event_bus.deliver());

        self.sim_state.tick += 1;
        result.steps_run += 1;
    }

    fn phase_trains(&mut self, tick: Ticks) {
        let Self {
            config,
            stations,
            lines,
            cargo,
            event_bus,
            ledger,
            ..
        } = self;
        let mut ctx = TickContext {
            tick,
            config,
            stations,
            cargo,
            events: event_bus,
            ledger,
        };
        for line in lines.values_mut() {
            line.tick(&mut ctx);
        }
    }

    fn phase_cargo(&mut self, tick: Ticks) {
        let mut expired = None;
        for (id, cargo) in &mut self.cargo {
            if cargo.tick() == CargoStatus::Expired && expired.is_none() {
                expired = Some(id);
            }
        }
        if let Some(cargo) = expired {
            self.status = GameStatus::Lost { tick };
            self.event_bus.emit(Event::CargoExpired { cargo, tick });
            self.event_bus.emit(Event::GameLost { tick });
            tracing::info!(tick, score = self.ledger.score, "cargo expired, game lost");
        }
    }

    fn phase_spawn(&mut self, tick: Ticks) {
        if self.status.is_lost() {
            return;
        }
        let Some(spawner) = self.spawner.as_mut() else {
            return;
        };
        for spawn in spawner.plan(tick, &self.config, &self.stations) {
            let outcome = match spawn {
                Spawn::Station { position, accepts } => {
                    self.add_station(position, accepts).map(|_| ())
                }
                Spawn::Cargo { station, cargo_type } => {
                    self.spawn_cargo(station, cargo_type).map(|_| ())
                }
            };
            if let Err(err) = outcome {
                tracing::warn!(%err, "spawn rejected");
            }
        }
    }

    // -----------------------------------------------------------------------
    // State hash
    // -----------------------------------------------------------------------

    /// Deterministic hash of the whole simulation state.
    pub fn state_hash(&self) -> u64 {
        let mut h = StateHash::new();
        h.write_u64(self.sim_state.tick);
        h.write_u64(match self.status {
            GameStatus::Running => u64::MAX,
            GameStatus::Lost { tick } => tick,
        });
        h.write_u64(self.ledger.score);
        h.write_i64(self.ledger.money);

        for (id, station) in &self.stations {
            h.write_u64(id.data().as_ffi());
            h.write_fixed64(station.position.x);
            h.write_fixed64(station.position.y);
            h.write_u32(station.accepts.0);
            for cargo in station.waiting() {
                h.write_u64(cargo.data().as_ffi());
            }
        }

        for (id, line) in &self.lines {
            h.write_u64(id.data().as_ffi());
            for station in line.stations() {
                h.write_u64(station.data().as_ffi());
            }
            for train in line.trains() {
                h.write_u64(train.id.data().as_ffi());
                h.write_u64(train.current_index() as u64);
                h.write(&[train.direction().sign() as u8]);
                match train.state() {
                    TrainState::Dwelling { remaining } => h.write_u64(remaining),
                    TrainState::Traveling { progress } => h.write_fixed64(progress),
                }
                for held in train.hold() {
                    h.write_u64(held.cargo.data().as_ffi());
                }
            }
        }

        for (id, cargo) in &self.cargo {
            h.write_u64(id.data().as_ffi());
            h.write_u32(cargo.cargo_type.0);
            h.write_u64(cargo.remaining());
        }

        if let Some(spawner) = &self.spawner {
            h.write_u64(spawner.rng_state());
        }
        h.finish()
    }
}

impl std::fmt::Debug for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Network")
            .field("tick", &self.sim_state.tick)
            .field("status", &self.status)
            .field("ledger", &self.ledger)
            .field("stations", &self.stations.len())
            .field("lines", &self.lines.len())
            .field("trains", &self.train_registry.len())
            .field("cargo", &self.cargo.len())
            .finish_non_exhaustive()
    }
}
