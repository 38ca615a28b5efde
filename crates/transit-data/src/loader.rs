//! Resolution pipeline: reads data files, resolves names, builds the network.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and
//! deserialization helpers, plus the two resolution steps: config overrides
//! onto [`SimConfig`] and scenario layouts into a ready [`Network`].
//!
//! A data directory may contain:
//!
//! - `config.{ron,toml,json}` (optional) -- [`ConfigData`] overrides.
//! - `scenario.{ron,toml,json}` (optional) -- a [`ScenarioData`] layout.

use crate::schema::{ConfigData, ScenarioData};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use transit_core::config::{CargoKind, SimConfig};
use transit_core::fixed::{Fixed64, Vec2};
use transit_core::id::{CargoTypeId, LineId, StationId};
use transit_core::network::{Network, NetworkError};
use transit_core::sim::SimulationStrategy;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A name reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    /// A duplicate name was found.
    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// A value is out of range or not a finite number.
    #[error("invalid value for '{field}' in {file}: {detail}")]
    InvalidValue {
        file: PathBuf,
        field: &'static str,
        detail: String,
    },

    /// The scenario describes something the network refuses to build.
    #[error("scenario rejected in {file}: {source}")]
    Scenario {
        file: PathBuf,
        #[source]
        source: NetworkError,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without extension).
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    let parse_err = |detail: String| DataLoadError::Parse {
        file: path.to_path_buf(),
        detail,
    };

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_err(e.to_string())),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_err(e.to_string())),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_err(e.to_string())),
    }
}

// ===========================================================================
// Name resolution helpers
// ===========================================================================

/// Look up a name in a map, returning an `UnresolvedRef` error if not found.
pub fn resolve_name<'a, V>(
    map: &'a HashMap<String, V>,
    name: &str,
    file: &Path,
    expected_kind: &'static str,
) -> Result<&'a V, DataLoadError> {
    map.get(name).ok_or_else(|| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: name.to_string(),
        expected_kind,
    })
}

/// Check whether a name already exists in a map, returning a `DuplicateName`
/// error if so.
pub fn check_duplicate<V>(
    map: &HashMap<String, V>,
    name: &str,
    file: &Path,
) -> Result<(), DataLoadError> {
    if map.contains_key(name) {
        Err(DataLoadError::DuplicateName {
            file: file.to_path_buf(),
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}

/// Convert a data-file number into `Fixed64`, rejecting NaN, infinities and
/// values out of Q32.32 range.
pub fn to_fixed(value: f64, field: &'static str, file: &Path) -> Result<Fixed64, DataLoadError> {
    if !value.is_finite() {
        return Err(DataLoadError::InvalidValue {
            file: file.to_path_buf(),
            field,
            detail: format!("{value} is not finite"),
        });
    }
    Fixed64::checked_from_num(value).ok_or_else(|| DataLoadError::InvalidValue {
        file: file.to_path_buf(),
        field,
        detail: format!("{value} is out of range"),
    })
}

// ===========================================================================
// Config resolution
// ===========================================================================

/// Apply `data` over `base`. Absent fields keep their base value.
pub fn resolve_config(
    data: ConfigData,
    base: SimConfig,
    file: &Path,
) -> Result<SimConfig, DataLoadError> {
    let mut config = base;

    macro_rules! take {
        ($($field:ident),* $(,)?) => {
            $(if let Some(v) = data.$field { config.$field = v; })*
        };
    }
    macro_rules! take_fixed {
        ($($field:ident),* $(,)?) => {
            $(if let Some(v) = data.$field {
                config.$field = to_fixed(v, stringify!($field), file)?;
            })*
        };
    }

    take!(
        max_lines,
        line_colors,
        initial_cargo_kinds,
        elimination_timer,
        train_capacity,
        max_trains_per_line,
        cargo_deploy_time,
        dwell_multiplier,
        cargo_spawn_tick_delay,
        station_spawn_tick_delay,
        starting_capital,
        cost_per_train,
        cost_per_line,
    );
    take_fixed!(
        train_speed,
        cost_per_meter,
        field_width,
        field_height,
        edge_margin,
        station_radius,
        track_click_radius,
    );

    if let Some(kinds) = data.cargo_kinds {
        let mut seen = HashMap::new();
        let mut resolved = Vec::with_capacity(kinds.len());
        for kind in kinds {
            check_duplicate(&seen, &kind.name, file)?;
            seen.insert(kind.name.clone(), ());
            resolved.push(CargoKind {
                name: kind.name,
                value: kind.value,
            });
        }
        config.cargo_kinds = resolved;
    }

    if config.cargo_kinds.is_empty() {
        return Err(DataLoadError::InvalidValue {
            file: file.to_path_buf(),
            field: "cargo_kinds",
            detail: "at least one cargo kind is required".to_string(),
        });
    }
    if config.train_speed <= Fixed64::ZERO {
        return Err(DataLoadError::InvalidValue {
            file: file.to_path_buf(),
            field: "train_speed",
            detail: "must be positive".to_string(),
        });
    }
    Ok(config)
}

/// Load `config.*` from `dir`, or the stock config if there is none.
pub fn load_config(dir: &Path) -> Result<SimConfig, DataLoadError> {
    let Some(path) = find_data_file(dir, "config")? else {
        tracing::debug!(dir = %dir.display(), "no config file, using defaults");
        return Ok(SimConfig::default());
    };
    let data: ConfigData = deserialize_file(&path)?;
    let config = resolve_config(data, SimConfig::default(), &path)?;
    tracing::info!(file = %path.display(), "config loaded");
    Ok(config)
}

// ===========================================================================
// Scenario building
// ===========================================================================

/// Temporary funds while a scenario is placed, so layouts are never limited
/// by the starting capital.
const SCENARIO_BUDGET: i64 = i64::MAX / 4;

/// Build a network from a scenario. Infrastructure placed by the scenario is
/// free: whatever it cost is credited back, so the player starts with the
/// configured capital.
pub fn build_network(
    config: SimConfig,
    scenario: &ScenarioData,
    strategy: SimulationStrategy,
    file: &Path,
) -> Result<Network, DataLoadError> {
    let kinds: HashMap<String, CargoTypeId> = config
        .cargo_kinds
        .iter()
        .enumerate()
        .map(|(i, k)| (k.name.clone(), CargoTypeId(i as u32)))
        .collect();

    let mut net = Network::new(config, strategy);
    let capital = net.money();
    net.credit(SCENARIO_BUDGET);
    let rejected = |source| DataLoadError::Scenario {
        file: file.to_path_buf(),
        source,
    };

    let mut stations: HashMap<String, StationId> = HashMap::new();
    for s in &scenario.stations {
        check_duplicate(&stations, &s.name, file)?;
        let accepts = *resolve_name(&kinds, &s.accepts, file, "cargo kind")?;
        let position = Vec2::new(to_fixed(s.x, "x", file)?, to_fixed(s.y, "y", file)?);
        let id = net.add_station(position, accepts).map_err(rejected)?;
        stations.insert(s.name.clone(), id);
    }

    for line_data in &scenario.lines {
        let route = line_data
            .stations
            .iter()
            .map(|name| resolve_name(&stations, name, file, "station").copied())
            .collect::<Result<Vec<_>, _>>()?;
        let line: LineId = net.add_line().map_err(rejected)?;
        for pair in route.windows(2) {
            net.connect_stations(line, pair[0], pair[1])
                .map_err(rejected)?;
        }
        for name in &line_data.trains {
            let at = *resolve_name(&stations, name, file, "station")?;
            net.buy_train(line, at).map_err(rejected)?;
        }
    }

    for cargo in &scenario.cargo {
        let at = *resolve_name(&stations, &cargo.station, file, "station")?;
        let kind = *resolve_name(&kinds, &cargo.kind, file, "cargo kind")?;
        net.spawn_cargo(at, kind).map_err(rejected)?;
    }

    net.credit(capital - net.money());
    if let Some(seed) = scenario.seed {
        net.enable_spawner(seed);
    }
    tracing::info!(
        file = %file.display(),
        stations = net.station_count(),
        lines = net.line_count(),
        trains = net.train_count(),
        "scenario built"
    );
    Ok(net)
}

// ===========================================================================
// Game data
// ===========================================================================

/// Everything loaded from a data directory.
#[derive(Debug)]
pub struct GameData {
    pub config: SimConfig,
    /// Ready to step. Empty unless a scenario file was present.
    pub network: Network,
}

/// Load config and (optional) scenario from `dir` and build the network.
pub fn load_game_data(dir: &Path, strategy: SimulationStrategy) -> Result<GameData, DataLoadError> {
    let config = load_config(dir)?;
    let network = match find_data_file(dir, "scenario")? {
        Some(path) => {
            let scenario: ScenarioData = deserialize_file(&path)?;
            build_network(config.clone(), &scenario, strategy, &path)?
        }
        None => Network::new(config.clone(), strategy),
    };
    Ok(GameData { config, network })
}

// ===========================================================================
// Tests
// ===========================================================================
