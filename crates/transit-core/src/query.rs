//! Read-only query API for inspecting simulation state.
//!
//! Provides snapshot types that aggregate network state into convenient views
//! for rendering and UI. All types are owned copies -- no references into
//! internal network storage.

use crate::fixed::{Ticks, Vec2};
use crate::id::{CargoId, CargoTypeId, LineId, StationId, TrainId};
use crate::line::Track;
use crate::network::Network;
use crate::sim::GameStatus;
use crate::train::{Direction, HeldCargo, TrainState};

// ---------------------------------------------------------------------------
// Station snapshot
// ---------------------------------------------------------------------------

/// A cargo waiting at a station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitingCargo {
    pub id: CargoId,
    pub cargo_type: CargoTypeId,
    /// Ticks left before this cargo expires.
    pub remaining: Ticks,
}

#[derive(Debug, Clone)]
pub struct StationSnapshot {
    pub id: StationId,
    pub position: Vec2,
    pub accepts: CargoTypeId,
    /// Lines touching this station.
    pub lines: Vec<LineId>,
    /// Waiting cargo, oldest first.
    pub waiting: Vec<WaitingCargo>,
}

// ---------------------------------------------------------------------------
// Train snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TrainSnapshot {
    pub id: TrainId,
    pub line: LineId,
    /// Interpolated position on the field.
    pub position: Option<Vec2>,
    pub station_index: usize,
    pub direction: Direction,
    pub state: TrainState,
    pub cargo: Vec<HeldCargo>,
    pub capacity: usize,
    /// Where the train heads next. `None` when stranded.
    pub next_stop: Option<(StationId, Direction)>,
}

// ---------------------------------------------------------------------------
// Line snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LineSnapshot {
    pub id: LineId,
    pub number: usize,
    pub color: String,
    pub stations: Vec<StationId>,
    pub tracks: Vec<Track>,
    pub is_loop: bool,
    pub trains: Vec<TrainId>,
}

// ---------------------------------------------------------------------------
// Session summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub tick: Ticks,
    pub status: GameStatus,
    pub score: u64,
    pub money: i64,
    pub stations: usize,
    pub lines: usize,
    pub trains: usize,
    pub cargo: usize,
}

impl Network {
    pub fn station_snapshot(&self, id: StationId) -> Option<StationSnapshot> {
        let station = self.stations.get(id)?;
        let waiting = station
            .waiting()
            .filter_map(|c| {
                let cargo = self.cargo.get(c)?;
                Some(WaitingCargo {
                    id: c,
                    cargo_type: cargo.cargo_type,
                    remaining: cargo.remaining(),
                })
            })
            .collect();
        Some(StationSnapshot {
            id,
            position: station.position,
            accepts: station.accepts,
            lines: station.lines().to_vec(),
            waiting,
        })
    }

    pub fn train_snapshot(&self, id: TrainId) -> Option<TrainSnapshot> {
        let line = self.lines.get(*self.train_registry.get(id)?)?;
        let train = line.train(id)?;
        let route = line.route();
        Some(TrainSnapshot {
            id,
            line: line.id,
            position: train.position(route, &self.stations),
            station_index: train.current_index(),
            direction: train.direction(),
            state: train.state(),
            cargo: train.hold().to_vec(),
            capacity: train.capacity(),
            next_stop: self.next_stop(id),
        })
    }

    pub fn line_snapshot(&self, id: LineId) -> Option<LineSnapshot> {
        let line = self.lines.get(id)?;
        Some(LineSnapshot {
            id,
            number: line.number,
            color: line.color.clone(),
            stations: line.stations().to_vec(),
            tracks: line.tracks().to_vec(),
            is_loop: line.is_loop(),
            trains: line.trains().iter().map(|t| t.id).collect(),
        })
    }

    /// Snapshots of every train, line by line.
    pub fn train_snapshots(&self) -> Vec<TrainSnapshot> {
        self.lines
            .values()
            .flat_map(|l| l.trains().iter().map(|t| t.id))
            .filter_map(|id| self.train_snapshot(id))
            .collect()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            tick: self.sim_state.tick,
            status: self.status,
            score: self.ledger.score,
            money: self.ledger.money,
            stations: self.stations.len(),
            lines: self.lines.len(),
            trains: self.train_registry.len(),
            cargo: self.cargo.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::*;
    use crate::train::{Direction, TrainState};

    #[test]
    fn station_snapshot_lists_waiting_cargo() {
        let mut net = network(rich());
        let [a] = row(&mut net);
        let c1 = net.spawn_cargo(a, wood()).unwrap();
        let c2 = net.spawn_cargo(a, gold()).unwrap();

        let snap = net.station_snapshot(a).unwrap();
        assert_eq!(snap.accepts, coal());
        let ids: Vec<_> = snap.waiting.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![c1, c2]);
        assert_eq!(snap.waiting[0].remaining, net.config().elimination_timer);
    }

    #[test]
    fn train_snapshot_reports_next_stop() {
        let mut net = network(rich());
        let [a, b, c] = row(&mut net);
        let line = line_through(&mut net, &[a, b, c]);
        let train = net.buy_train(line, c).unwrap();

        let snap = net.train_snapshot(train).unwrap();
        assert_eq!(snap.line, line);
        assert_eq!(snap.station_index, 2);
        assert_eq!(snap.direction, Direction::Backward);
        assert_eq!(snap.position, Some(net.station(c).unwrap().position));
        assert_eq!(snap.next_stop, Some((b, Direction::Backward)));
        assert!(matches!(snap.state, TrainState::Traveling { .. }));
        assert_eq!(net.train_snapshots().len(), 1);
    }

    #[test]
    fn line_snapshot_and_summary() {
        let mut net = network(rich());
        let [a, b, c] = row(&mut net);
        let line = line_through(&mut net, &[a, b, c, a]);

        let snap = net.line_snapshot(line).unwrap();
        assert!(snap.is_loop);
        assert_eq!(snap.tracks.len(), 3);
        assert_eq!(snap.color, "red");

        let summary = net.summary();
        assert_eq!(summary.stations, 3);
        assert_eq!(summary.lines, 1);
        assert_eq!(summary.trains, 0);
    }
}
