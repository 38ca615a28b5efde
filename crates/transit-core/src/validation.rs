//! Structural invariant checks over a whole network.
//!
//! [`validate`] walks every arena and reports each broken invariant it finds.
//! It is meant for tests and debug assertions; a healthy network always
//! yields an empty list.
//!
//! [`compare`] is the determinism helper: two networks fed the same inputs
//! must agree on every state hash.

use crate::cargo::CargoOwner;
use crate::id::{CargoId, LineId, StationId, TrainId};
use crate::network::Network;
use std::collections::HashMap;

/// One broken invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// `tracks` does not match the station sequence.
    TracksOutOfSync { line: LineId },
    /// A line references a station that does not exist.
    DanglingStation { line: LineId, station: StationId },
    /// A train's station index is outside its line.
    TrainOffLine { train: TrainId, line: LineId },
    /// The registry and the lines disagree about who owns a train.
    RegistryMismatch { train: TrainId },
    /// A cargo sits in no container, or in more than one.
    CargoContainers { cargo: CargoId, found: usize },
    /// A container holds a cargo whose owner tag points elsewhere.
    CargoOwnerMismatch { cargo: CargoId, owner: CargoOwner },
    /// A container holds a cargo the arena does not track.
    UntrackedCargo { cargo: CargoId },
    /// A train carries more than its capacity.
    HoldOverflow { train: TrainId },
    /// A station's line back-references disagree with the lines.
    BackRefMismatch { station: StationId },
}

/// Check every structural invariant of `net`.
pub fn validate(net: &Network) -> Vec<InvariantViolation> {
    let mut out = Vec::new();
    let mut found: HashMap<CargoId, usize> = HashMap::new();

    for (line_id, line) in &net.lines {
        if !line.tracks_consistent() {
            out.push(InvariantViolation::TracksOutOfSync { line: line_id });
        }
        for &s in line.stations() {
            if !net.stations.contains_key(s) {
                out.push(InvariantViolation::DanglingStation {
                    line: line_id,
                    station: s,
                });
            }
        }
        for train in line.trains() {
            if train.current_index() >= line.stations().len() {
                out.push(InvariantViolation::TrainOffLine {
                    train: train.id,
                    line: line_id,
                });
            }
            if net.train_registry.get(train.id) != Some(&line_id) || train.line != line_id {
                out.push(InvariantViolation::RegistryMismatch { train: train.id });
            }
            if train.hold().len() > train.capacity() {
                out.push(InvariantViolation::HoldOverflow { train: train.id });
            }
            for held in train.hold() {
                *found.entry(held.cargo).or_default() += 1;
                check_owner(net, held.cargo, CargoOwner::Train(train.id), &mut out);
            }
        }
    }

    for (train, &line) in &net.train_registry {
        let owned = net.lines.get(line).is_some_and(|l| l.train(train).is_some());
        if !owned {
            out.push(InvariantViolation::RegistryMismatch { train });
        }
    }

    for (station_id, station) in &net.stations {
        for cargo in station.waiting() {
            *found.entry(cargo).or_default() += 1;
            check_owner(net, cargo, CargoOwner::Station(station_id), &mut out);
        }

        let mut expected: Vec<LineId> = net
            .lines
            .iter()
            .filter(|(_, l)| l.contains(station_id))
            .map(|(id, _)| id)
            .collect();
        let mut actual = station.lines().to_vec();
        expected.sort();
        actual.sort();
        if expected != actual {
            out.push(InvariantViolation::BackRefMismatch {
                station: station_id,
            });
        }
    }

    for cargo in net.cargo.keys() {
        let count = found.get(&cargo).copied().unwrap_or(0);
        if count != 1 {
            out.push(InvariantViolation::CargoContainers {
                cargo,
                found: count,
            });
        }
    }

    out
}

fn check_owner(
    net: &Network,
    cargo: CargoId,
    container: CargoOwner,
    out: &mut Vec<InvariantViolation>,
) {
    match net.cargo.get(cargo) {
        None => out.push(InvariantViolation::UntrackedCargo { cargo }),
        Some(c) if c.owner() != container => out.push(InvariantViolation::CargoOwnerMismatch {
            cargo,
            owner: c.owner(),
        }),
        Some(_) => {}
    }
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

/// Result of comparing two networks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashComparison {
    pub tick_a: u64,
    pub tick_b: u64,
    pub hash_a: u64,
    pub hash_b: u64,
}

impl HashComparison {
    pub fn is_identical(&self) -> bool {
        self.tick_a == self.tick_b && self.hash_a == self.hash_b
    }
}

pub fn compare(a: &Network, b: &Network) -> HashComparison {
    HashComparison {
        tick_a: a.tick(),
        tick_b: b.tick(),
        hash_a: a.state_hash(),
        hash_b: b.state_hash(),
    }
}

/// Step both networks `ticks` times and return the first tick at which their
/// hashes diverge, if any.
pub fn first_divergence(a: &mut Network, b: &mut Network, ticks: u64) -> Option<u64> {
    for _ in 0..ticks {
        a.step();
        b.step();
        if !compare(a, b).is_identical() {
            return Some(a.tick());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn healthy_network_has_no_violations() {
        let mut net = network(rich());
        let [a, b, c] = row(&mut net);
        let line = line_through(&mut net, &[a, b, c]);
        net.spawn_cargo(a, gold()).unwrap();
        net.spawn_cargo(b, coal()).unwrap();
        net.buy_train(line, a).unwrap();

        for _ in 0..300 {
            net.step();
            assert_eq!(validate(&net), vec![]);
        }
    }

    #[test]
    fn detects_orphaned_cargo() {
        let mut net = network(rich());
        let [a] = row(&mut net);
        let cargo = net.spawn_cargo(a, wood()).unwrap();
        net.stations[a].queue.clear();

        assert_eq!(
            validate(&net),
            vec![InvariantViolation::CargoContainers { cargo, found: 0 }]
        );
    }

    #[test]
    fn detects_stale_back_reference() {
        let mut net = network(rich());
        let [a, b] = row(&mut net);
        let line = line_through(&mut net, &[a, b]);
        net.stations[a].detach_line(line);

        assert_eq!(
            validate(&net),
            vec![InvariantViolation::BackRefMismatch { station: a }]
        );
    }

    #[test]
    fn identical_networks_do_not_diverge() {
        let build = || {
            let mut net = network(rich());
            net.enable_spawner(21);
            let [a, b] = row(&mut net);
            line_through(&mut net, &[a, b]);
            net
        };
        let mut x = build();
        let mut y = build();
        assert_eq!(first_divergence(&mut x, &mut y, 500), None);
        assert!(compare(&x, &y).is_identical());
    }

    #[test]
    fn different_seeds_diverge() {
        let mut x = network(rich());
        let mut y = network(rich());
        x.enable_spawner(1);
        y.enable_spawner(2);
        assert!(first_divergence(&mut x, &mut y, 500).is_some());
    }
}
