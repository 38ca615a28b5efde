//! Cargo units and their elimination countdown.
//!
//! A cargo is owned by exactly one container at a time: the queue of the
//! station it waits at, or the hold of the train carrying it. The owner is a
//! tagged key, never a reference. Delivery removes the cargo from the
//! network's cargo arena, so a delivered cargo is never ticked again.

use crate::fixed::Ticks;
use crate::id::{CargoTypeId, StationId, TrainId};
use serde::{Deserialize, Serialize};

/// Who currently holds a cargo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CargoOwner {
    Station(StationId),
    Train(TrainId),
}

/// Outcome of a single countdown step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CargoStatus {
    Waiting,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cargo {
    pub cargo_type: CargoTypeId,
    owner: CargoOwner,
    elimination_timer: Ticks,
}

impl Cargo {
    /// New cargo waiting at `station`.
    pub fn new(cargo_type: CargoTypeId, station: StationId, elimination_timer: Ticks) -> Self {
        Self {
            cargo_type,
            owner: CargoOwner::Station(station),
            elimination_timer,
        }
    }

    pub fn owner(&self) -> CargoOwner {
        self.owner
    }

    /// Ticks left before this cargo causes a loss.
    pub fn remaining(&self) -> Ticks {
        self.elimination_timer
    }

    /// Count down one tick. Reports `Expired` once the timer is at zero and
    /// keeps reporting it on later calls; the caller stops ticking after a loss.
    pub fn tick(&mut self) -> CargoStatus {
        self.elimination_timer = self.elimination_timer.saturating_sub(1);
        if self.elimination_timer == 0 {
            CargoStatus::Expired
        } else {
            CargoStatus::Waiting
        }
    }

    pub fn hop_on_train(&mut self, train: TrainId) {
        self.owner = CargoOwner::Train(train);
    }

    pub fn return_to_station(&mut self, station: StationId) {
        self.owner = CargoOwner::Station(station);
    }
}
