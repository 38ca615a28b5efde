//! Simulation strategy and state types.
//!
//! The network is parameterized by a [`SimulationStrategy`] that determines
//! how time advances. Both strategies run the same step; they differ only in
//! how many steps are run per `advance()` call.

use crate::event::Event;
use crate::fixed::{Fixed64, Ticks};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Simulation strategy
// ---------------------------------------------------------------------------

/// How the network advances time. Chosen at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SimulationStrategy {
    /// Single step per call. The scheduler calls `step()` at a fixed rate.
    Tick,

    /// The scheduler calls `advance(dt)` with elapsed time. Time accumulates
    /// and as many fixed steps run as fit, carrying the remainder forward.
    Delta {
        /// Duration of one simulation step, in the caller's time units.
        fixed_timestep: Ticks,
    },
}

// ---------------------------------------------------------------------------
// Simulation state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimState {
    /// Current tick counter. Incremented by 1 for each simulation step.
    pub tick: Ticks,

    /// Accumulated time remainder for delta mode. Unused in tick mode.
    pub accumulator: Ticks,
}

impl SimState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Whether the session is still being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Running,
    /// A cargo timed out at the given tick. Terminal.
    Lost { tick: Ticks },
}

impl GameStatus {
    pub fn is_lost(self) -> bool {
        matches!(self, GameStatus::Lost { .. })
    }
}

/// Score and money of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ledger {
    /// Successful deliveries.
    pub score: u64,
    pub money: i64,
}

impl Ledger {
    pub fn with_capital(money: i64) -> Self {
        Self { score: 0, money }
    }

    /// Book one delivery worth `value`.
    pub fn record_delivery(&mut self, value: i64) {
        self.score += 1;
        self.money = self.money.saturating_add(value);
    }

    /// Add money outside of deliveries (grants, refunds).
    pub fn credit(&mut self, amount: i64) {
        self.money = self.money.saturating_add(amount);
    }

    /// Deduct `cost` if affordable.
    pub fn try_spend(&mut self, cost: i64) -> bool {
        if self.money < cost {
            return false;
        }
        self.money -= cost;
        true
    }
}

// ---------------------------------------------------------------------------
// Advance result
// ---------------------------------------------------------------------------

/// Result of a `Network::advance()` / `step()` call.
#[derive(Debug, Default)]
pub struct AdvanceResult {
    /// Number of simulation steps actually executed.
    pub steps_run: u64,

    /// Events delivered during those steps, oldest first.
    pub events: Vec<Event>,
}

impl AdvanceResult {
    /// Whether the loss event was delivered in this call.
    pub fn game_lost(&self) -> bool {
        self.events.iter().any(|e| matches!(e, Event::GameLost { .. }))
    }
}

// ---------------------------------------------------------------------------
// State hash
// ---------------------------------------------------------------------------

/// A simple deterministic hash of simulation state for replay checks.
///
/// Uses FNV-1a (64-bit). Not cryptographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash(pub u64);

impl StateHash {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self(Self::FNV_OFFSET)
    }

    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(Self::FNV_PRIME);
        }
    }

    pub fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_i64(&mut self, v: i64) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_fixed64(&mut self, v: Fixed64) {
        self.write(&v.to_bits().to_le_bytes());
    }

    pub fn finish(self) -> u64 {
        self.0
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_state_starts_at_zero() {
        let state = SimState::new();
        assert_eq!(state.tick, 0);
        assert_eq!(state.accumulator, 0);
    }

    #[test]
    fn ledger_spend_and_earn() {
        let mut ledger = Ledger::with_capital(100);
        assert!(!ledger.try_spend(150));
        assert_eq!(ledger.money, 100);
        assert!(ledger.try_spend(100));
        assert_eq!(ledger.money, 0);
        ledger.record_delivery(20);
        assert_eq!(ledger, Ledger { score: 1, money: 20 });
        ledger.credit(5);
        assert_eq!(ledger, Ledger { score: 1, money: 25 });
    }

    #[test]
    fn game_status_default_running() {
        assert_eq!(GameStatus::default(), GameStatus::Running);
        assert!(GameStatus::Lost { tick: 4 }.is_lost());
    }

    #[test]
    fn state_hash_deterministic() {
        let mut h1 = StateHash::new();
        h1.write_u64(42);
        h1.write_fixed64(Fixed64::from_num(1.25));

        let mut h2 = StateHash::new();
        h2.write_u64(42);
        h2.write_fixed64(Fixed64::from_num(1.25));

        assert_eq!(h1.finish(), h2.finish());
    }

    #[test]
    fn state_hash_order_matters() {
        let mut h1 = StateHash::new();
        h1.write_u32(1);
        h1.write_u32(2);

        let mut h2 = StateHash::new();
        h2.write_u32(2);
        h2.write_u32(1);

        assert_ne!(h1.finish(), h2.finish());
    }
}
