//! Data-driven setup for the transit simulation.
//!
//! Reads an optional `config` file (simulation constants) and an optional
//! `scenario` file (a fixed starting layout) in RON, TOML or JSON, and
//! resolves them into a [`transit_core::network::Network`].

pub mod loader;
pub mod schema;

pub use loader::{load_config, load_game_data, DataLoadError, GameData};
