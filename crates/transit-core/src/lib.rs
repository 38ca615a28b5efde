//! Transit Core -- the simulation engine for a tick-driven transit game.
//!
//! Stations emit cargo of typed kinds, lines connect stations, and trains
//! shuttle along lines picking up and delivering cargo before each cargo's
//! elimination timer runs out. A single expired cargo ends the session.
//!
//! # Tick Pipeline
//!
//! Each call to [`network::Network::step`] advances the simulation by one
//! tick:
//!
//! 1. **Trains** -- every line moves its trains, unloads and boards cargo.
//! 2. **Cargo** -- elimination timers count down; the first expiry loses.
//! 3. **Spawn** -- the optional spawner adds stations and cargo.
//! 4. **Deliver** -- buffered events go to listeners and to the caller.
//! 5. **Bookkeeping** -- the tick counter increments.
//!
//! # Topology edits
//!
//! Edits are direct `&mut` calls between steps:
//!
//! ```rust,ignore
//! let line = net.add_line()?;
//! net.connect_stations(line, a, b)?;
//! let train = net.buy_train(line, a)?;
//! net.step();
//! ```
//!
//! # Key Types
//!
//! - [`network::Network`] -- Owner of every entity and step orchestrator.
//! - [`line::Line`] -- Station sequence, derived tracks, and owned trains.
//! - [`train::Train`] -- Movement and load/unload state machine.
//! - [`cargo::Cargo`] -- Cargo owner tag and elimination countdown.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for deterministic math.
//! - [`event::EventBus`] -- Subscription-based event bus with buffered
//!   delivery.
//! - [`validation`] -- Invariant checks and determinism comparison.

pub mod cargo;
pub mod config;
pub mod event;
pub mod fixed;
pub mod id;
pub mod line;
pub mod network;
pub mod query;
pub mod rng;
pub mod sim;
pub mod spawner;
pub mod station;
pub mod train;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
