//! Periodic station and cargo spawning.
//!
//! The spawner only decides *what* should appear; the network applies the
//! resulting [`Spawn`] requests through its regular mutation surface, so
//! spawned stations and cargo go through the same checks and events as
//! player-driven ones.

use crate::config::SimConfig;
use crate::fixed::{Fixed64, Ticks, Vec2};
use crate::id::{CargoTypeId, StationId};
use crate::rng::SimRng;
use crate::station::Station;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

/// Attempts at finding a free spot before a station spawn is skipped.
const PLACEMENT_ATTEMPTS: usize = 10;

/// Something the spawner wants to add this tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Spawn {
    Station { position: Vec2, accepts: CargoTypeId },
    Cargo { station: StationId, cargo_type: CargoTypeId },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    rng: SimRng,
    /// Cargo kinds currently in play.
    kinds: Vec<CargoTypeId>,
}

impl Spawner {
    /// A spawner drawing from the config's initial kinds.
    pub fn new(seed: u64, config: &SimConfig) -> Self {
        Self {
            rng: SimRng::new(seed),
            kinds: config.initial_kinds(),
        }
    }

    pub fn kinds(&self) -> &[CargoTypeId] {
        &self.kinds
    }

    pub fn rng_state(&self) -> u64 {
        self.rng.state()
    }

    /// Decide what appears at `tick`. Nothing spawns at tick 0; a delay of 0
    /// disables that kind of spawn.
    pub fn plan(
        &mut self,
        tick: Ticks,
        config: &SimConfig,
        stations: &SlotMap<StationId, Station>,
    ) -> Vec<Spawn> {
        let mut out = Vec::new();
        if tick == 0 {
            return out;
        }
        if is_due(tick, config.station_spawn_tick_delay) {
            out.extend(self.plan_station(config, stations));
        }
        if is_due(tick, config.cargo_spawn_tick_delay) {
            out.extend(self.plan_cargo(stations));
        }
        out
    }

    fn plan_station(
        &mut self,
        config: &SimConfig,
        stations: &SlotMap<StationId, Station>,
    ) -> Option<Spawn> {
        let accepts = self.kinds[self.rng.index(self.kinds.len())?];
        let min_gap = config.station_radius.saturating_mul(Fixed64::from_num(2));

        for _ in 0..PLACEMENT_ATTEMPTS {
            let position = Vec2::new(
                self.rng.fixed_in_range(
                    config.edge_margin,
                    config.field_width - config.edge_margin,
                ),
                self.rng.fixed_in_range(
                    config.edge_margin,
                    config.field_height - config.edge_margin,
                ),
            );
            let crowded = stations
                .values()
                .any(|s| s.position.distance(position) < min_gap);
            if !crowded {
                return Some(Spawn::Station { position, accepts });
            }
        }
        tracing::debug!("no free spot for a new station");
        None
    }

    fn plan_cargo(&mut self, stations: &SlotMap<StationId, Station>) -> Option<Spawn> {
        let ids: Vec<StationId> = stations.keys().collect();
        let station = ids[self.rng.index(ids.len())?];
        let accepts = stations[station].accepts;

        let options: Vec<CargoTypeId> = self
            .kinds
            .iter()
            .copied()
            .filter(|&k| k != accepts)
            .collect();
        let cargo_type = options[self.rng.index(options.len())?];
        Some(Spawn::Cargo { station, cargo_type })
    }
}

fn is_due(tick: Ticks, delay: Ticks) -> bool {
    delay > 0 && tick % delay == 0
}
