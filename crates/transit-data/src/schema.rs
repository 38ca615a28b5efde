//! Serde data file structs for simulation settings and fixed scenarios.
//!
//! These structs define the on-disk format. They are deserialized from RON,
//! JSON, or TOML data files and then resolved into core types by the loader.
//! Every config field is optional; absent fields keep the stock value.

use serde::Deserialize;

// ===========================================================================
// Config
// ===========================================================================

/// A cargo kind definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct CargoKindData {
    pub name: String,
    #[serde(default)]
    pub value: i64,
}

/// Overrides for the simulation config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigData {
    pub max_lines: Option<usize>,
    pub line_colors: Option<Vec<String>>,
    pub cargo_kinds: Option<Vec<CargoKindData>>,
    pub initial_cargo_kinds: Option<usize>,

    pub elimination_timer: Option<u64>,
    pub train_capacity: Option<usize>,
    pub train_speed: Option<f64>,
    pub max_trains_per_line: Option<usize>,
    pub cargo_deploy_time: Option<u64>,
    pub dwell_multiplier: Option<u64>,

    pub cargo_spawn_tick_delay: Option<u64>,
    pub station_spawn_tick_delay: Option<u64>,

    pub starting_capital: Option<i64>,
    pub cost_per_train: Option<i64>,
    pub cost_per_line: Option<i64>,
    pub cost_per_meter: Option<f64>,

    pub field_width: Option<f64>,
    pub field_height: Option<f64>,
    pub edge_margin: Option<f64>,
    pub station_radius: Option<f64>,
    pub track_click_radius: Option<f64>,
}

// ===========================================================================
// Scenario
// ===========================================================================

/// A station placed by the scenario. `accepts` names a cargo kind.
#[derive(Debug, Clone, Deserialize)]
pub struct StationData {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub accepts: String,
}

/// A line through named stations, in order. Repeating the first station at
/// the end closes a loop.
#[derive(Debug, Clone, Deserialize)]
pub struct LineData {
    pub stations: Vec<String>,
    /// Stations at which a train starts.
    #[serde(default)]
    pub trains: Vec<String>,
}

/// A cargo waiting at a named station when the scenario starts.
#[derive(Debug, Clone, Deserialize)]
pub struct CargoData {
    pub station: String,
    pub kind: String,
}

/// A fixed starting layout.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioData {
    /// Seed for periodic spawning. Without a seed nothing spawns.
    #[serde(default)]
    pub seed: Option<u64>,
    pub stations: Vec<StationData>,
    #[serde(default)]
    pub lines: Vec<LineData>,
    #[serde(default)]
    pub cargo: Vec<CargoData>,
}

// ===========================================================================
// Tests
// ===========================================================================
