//! Tunable simulation constants.
//!
//! [`SimConfig::default`] reproduces the stock game balance. Data files
//! loaded through `transit-data` override individual fields.

use crate::fixed::{Fixed64, Ticks};
use crate::id::CargoTypeId;
use serde::{Deserialize, Serialize};

/// A cargo kind definition: display name and money earned per delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CargoKind {
    pub name: String,
    pub value: i64,
}

/// Simulation configuration. Immutable once a network is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Maximum number of lines the player may open.
    pub max_lines: usize,
    /// Display colors assigned to lines in creation order (cycled).
    pub line_colors: Vec<String>,
    /// Known cargo kinds, indexed by [`CargoTypeId`].
    pub cargo_kinds: Vec<CargoKind>,
    /// How many of the leading cargo kinds are in play from the start.
    pub initial_cargo_kinds: usize,

    /// Ticks a cargo may wait before the game is lost.
    pub elimination_timer: Ticks,
    /// Cargo slots per train.
    pub train_capacity: usize,
    /// Distance units a train covers per tick.
    pub train_speed: Fixed64,
    /// Maximum trains on a single line.
    pub max_trains_per_line: usize,
    /// Ticks between load/unload attempts while dwelling.
    pub cargo_deploy_time: Ticks,
    /// Dwell length is `train_capacity * cargo_deploy_time * dwell_multiplier`.
    pub dwell_multiplier: Ticks,

    /// Ticks between cargo spawns (spawner only).
    pub cargo_spawn_tick_delay: Ticks,
    /// Ticks between station spawns (spawner only).
    pub station_spawn_tick_delay: Ticks,

    pub starting_capital: i64,
    pub cost_per_train: i64,
    pub cost_per_line: i64,
    pub cost_per_meter: Fixed64,

    pub field_width: Fixed64,
    pub field_height: Fixed64,
    /// Spawned stations keep this distance from the field border.
    pub edge_margin: Fixed64,
    /// Click radius around a station.
    pub station_radius: Fixed64,
    /// Click tolerance around a track segment.
    pub track_click_radius: Fixed64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_lines: 3,
            line_colors: ["red", "blue", "yellow", "green"]
                .into_iter()
                .map(String::from)
                .collect(),
            cargo_kinds: vec![
                CargoKind { name: "coal".into(), value: 10 },
                CargoKind { name: "wood".into(), value: 20 },
                CargoKind { name: "gold".into(), value: 50 },
                CargoKind { name: "crystal".into(), value: 100 },
            ],
            initial_cargo_kinds: 3,
            elimination_timer: 2000,
            train_capacity: 6,
            train_speed: Fixed64::from_num(5),
            max_trains_per_line: 2,
            cargo_deploy_time: 5,
            dwell_multiplier: 2,
            cargo_spawn_tick_delay: 200,
            station_spawn_tick_delay: 1500,
            starting_capital: 1000,
            cost_per_train: 500,
            cost_per_line: 0,
            cost_per_meter: Fixed64::from_num(0.5),
            field_width: Fixed64::from_num(1100),
            field_height: Fixed64::from_num(900),
            edge_margin: Fixed64::from_num(100),
            station_radius: Fixed64::from_num(30),
            track_click_radius: Fixed64::from_num(10),
        }
    }
}

impl SimConfig {
    /// Ticks a train stays at a station after arriving.
    pub fn dwell_ticks(&self) -> Ticks {
        (self.train_capacity as Ticks)
            .saturating_mul(self.cargo_deploy_time)
            .saturating_mul(self.dwell_multiplier)
    }

    /// Money earned for delivering one cargo of `cargo_type`. Unknown kinds
    /// are worth nothing.
    pub fn cargo_value(&self, cargo_type: CargoTypeId) -> i64 {
        self.cargo_kinds
            .get(cargo_type.index())
            .map_or(0, |kind| kind.value)
    }

    /// Display color for the line created `ordinal`-th.
    pub fn line_color(&self, ordinal: usize) -> String {
        if self.line_colors.is_empty() {
            return String::from("gray");
        }
        self.line_colors[ordinal % self.line_colors.len()].clone()
    }

    /// Cargo kinds available at session start.
    pub fn initial_kinds(&self) -> Vec<CargoTypeId> {
        let count = self.initial_cargo_kinds.min(self.cargo_kinds.len());
        (0..count as u32).map(CargoTypeId).collect()
    }
}
