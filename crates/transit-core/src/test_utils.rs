//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::config::SimConfig;
use crate::fixed::Vec2;
use crate::id::{CargoTypeId, LineId, StationId};
use crate::network::Network;
use crate::sim::SimulationStrategy;

// ===========================================================================
// Cargo kinds (stock table)
// ===========================================================================

pub fn coal() -> CargoTypeId {
    CargoTypeId(0)
}
pub fn wood() -> CargoTypeId {
    CargoTypeId(1)
}
pub fn gold() -> CargoTypeId {
    CargoTypeId(2)
}
pub fn crystal() -> CargoTypeId {
    CargoTypeId(3)
}

// ===========================================================================
// Configs and networks
// ===========================================================================

/// Stock balance with enough money that purchases never fail.
pub fn rich() -> SimConfig {
    SimConfig {
        starting_capital: 1_000_000,
        ..SimConfig::default()
    }
}

/// A tick-mode network.
pub fn network(config: SimConfig) -> Network {
    Network::new(config, SimulationStrategy::Tick)
}

/// Add a station at integer coordinates accepting kind `accepts`.
pub fn station(net: &mut Network, x: i32, y: i32, accepts: u32) -> StationId {
    net.add_station(Vec2::from_ints(x, y), CargoTypeId(accepts))
        .expect("test station")
}

/// `N` stations 100 apart on the x axis. Station `i` accepts kind
/// `i % kinds`.
pub fn row<const N: usize>(net: &mut Network) -> [StationId; N] {
    let kinds = net.config().cargo_kinds.len().max(1) as u32;
    std::array::from_fn(|i| station(net, i as i32 * 100, 0, i as u32 % kinds))
}

/// A fresh line connecting `stations` in order.
pub fn line_through(net: &mut Network, stations: &[StationId]) -> LineId {
    let line = net.add_line().expect("test line");
    for pair in stations.windows(2) {
        net.connect_stations(line, pair[0], pair[1])
            .expect("test connection");
    }
    line
}

/// Step until `done` holds, at most `max_steps` times. Returns whether it
/// did.
pub fn run_until(net: &mut Network, max_steps: u64, mut done: impl FnMut(&Network) -> bool) -> bool {
    for _ in 0..max_steps {
        net.step();
        if done(net) {
            return true;
        }
    }
    false
}

/// Step `n` times and return the final state hash.
pub fn run_and_hash(net: &mut Network, n: u64) -> u64 {
    for _ in 0..n {
        net.step();
    }
    net.state_hash()
}
