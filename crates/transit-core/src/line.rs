//! Lines: ordered station sequences, their derived tracks, and their trains.
//!
//! The track list is always derived from the station sequence:
//! `tracks.len() == max(0, stations.len() - 1)` and
//! `tracks[i] == (stations[i], stations[i + 1])`. Every mutating operation
//! re-establishes this before returning. Destructive edits (station removal,
//! track demolition) rebuild the whole list from the new sequence and then
//! remap each owned train onto the new indices.

use crate::id::{CargoTypeId, LineId, StationId, TrainId};
use crate::station::Station;
use crate::train::{Direction, Route, TickContext, Train};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

/// The connection between two consecutive stations of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    pub from: StationId,
    pub to: StationId,
}

/// A closed loop has more than two stations and starts where it ends.
fn is_loop_sequence(stations: &[StationId]) -> bool {
    stations.len() > 2 && stations.first() == stations.last()
}

/// Outcome of a successful [`Line::demolish_track`].
#[derive(Debug)]
pub struct TrackDemolition {
    /// The demolished track.
    pub track: Track,
    /// Stations no longer on the line.
    pub removed_stations: Vec<StationId>,
    /// Trains taken off the line. Their holds still contain cargo.
    pub detached: Vec<Train>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    /// Display ordinal (0-based creation order).
    pub number: usize,
    pub color: String,
    stations: Vec<StationId>,
    tracks: Vec<Track>,
    trains: Vec<Train>,
}

impl Line {
    pub fn new(id: LineId, number: usize, color: impl Into<String>) -> Self {
        Self {
            id,
            number,
            color: color.into(),
            stations: Vec::new(),
            tracks: Vec::new(),
            trains: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn stations(&self) -> &[StationId] {
        &self.stations
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    pub fn train(&self, id: TrainId) -> Option<&Train> {
        self.trains.iter().find(|t| t.id == id)
    }

    #[cfg(test)]
    pub(crate) fn train_mut(&mut self, id: TrainId) -> Option<&mut Train> {
        self.trains.iter_mut().find(|t| t.id == id)
    }

    pub fn contains(&self, station: StationId) -> bool {
        self.stations.contains(&station)
    }

    pub fn first(&self) -> Option<StationId> {
        self.stations.first().copied()
    }

    pub fn last(&self) -> Option<StationId> {
        self.stations.last().copied()
    }

    pub fn is_loop(&self) -> bool {
        is_loop_sequence(&self.stations)
    }

    pub fn route(&self) -> Route<'_> {
        Route {
            line: self.id,
            stations: &self.stations,
            is_loop: self.is_loop(),
        }
    }

    /// Whether the track list matches the station sequence.
    pub fn tracks_consistent(&self) -> bool {
        self.tracks.len() == self.stations.len().saturating_sub(1)
            && self
                .stations
                .windows(2)
                .zip(&self.tracks)
                .all(|(pair, track)| track.from == pair[0] && track.to == pair[1])
    }

    // -----------------------------------------------------------------------
    // Topology queries
    // -----------------------------------------------------------------------

    /// A line may be extended from either of its ends, or from anywhere when
    /// it has no stations yet.
    pub fn is_valid_drag_point(&self, station: StationId) -> bool {
        if self.stations.is_empty() {
            return true;
        }
        self.first() == Some(station) || self.last() == Some(station)
    }

    pub fn can_connect_to(&self, from: StationId, to: StationId) -> bool {
        from != to && !self.contains(to)
    }

    /// Whether connecting `from` to `to` would close this line into a loop.
    pub fn can_close_loop(&self, from: StationId, to: StationId) -> bool {
        if self.is_loop() || self.stations.len() < 3 || from == to {
            return false;
        }
        let ends = (self.first(), self.last());
        ends == (Some(from), Some(to)) || ends == (Some(to), Some(from))
    }

    /// Whether any station on the line accepts `cargo_type`.
    pub fn can_deploy_type(
        &self,
        cargo_type: CargoTypeId,
        stations: &SlotMap<StationId, Station>,
    ) -> bool {
        self.stations
            .iter()
            .filter_map(|&s| stations.get(s))
            .any(|s| s.accepts == cargo_type)
    }

    /// The stop after `current` when traveling in `direction`, and the
    /// direction the train will have there. Open lines reverse at their ends;
    /// loops wrap around.
    ///
    /// `None` means stranded: the station is not on the line, or the line
    /// has nowhere to go.
    pub fn get_next_stop(
        &self,
        current: StationId,
        direction: Direction,
    ) -> Option<(StationId, Direction)> {
        let index = self.stations.iter().position(|&s| s == current)?;
        let len = self.stations.len();
        if len < 2 {
            return None;
        }

        if self.is_loop() {
            let last = len - 1;
            let next = match direction {
                Direction::Forward => index + 1,
                Direction::Backward if index == 0 => last - 1,
                Direction::Backward => index - 1,
            };
            return Some((self.stations[next], direction));
        }

        let stop = match direction {
            Direction::Forward if index + 1 < len => (self.stations[index + 1], direction),
            Direction::Forward => (self.stations[len - 2], Direction::Backward),
            Direction::Backward if index > 0 => (self.stations[index - 1], direction),
            Direction::Backward => (self.stations[1], Direction::Forward),
        };
        Some(stop)
    }

    /// A track can go if it is on a loop or at either end of an open line,
    /// and no train is currently traveling on it.
    pub fn can_delete_track(&self, track_index: usize) -> bool {
        if track_index >= self.tracks.len() {
            return false;
        }
        let at_end = track_index == 0 || track_index + 1 == self.tracks.len();
        if !(self.is_loop() || at_end) {
            return false;
        }
        !self
            .trains
            .iter()
            .any(|t| t.occupied_track() == Some(track_index))
    }

    // -----------------------------------------------------------------------
    // Topology edits
    // -----------------------------------------------------------------------

    /// Append (or prepend) a station. Returns `false` without changes when the
    /// station already is the end on that side.
    pub fn add_station(&mut self, station: StationId, at_beginning: bool) -> bool {
        let Some(&end) = (if at_beginning {
            self.stations.first()
        } else {
            self.stations.last()
        }) else {
            self.stations.push(station);
            return true;
        };
        if end == station {
            return false;
        }

        if at_beginning {
            self.stations.insert(0, station);
            self.tracks.insert(0, Track { from: station, to: end });
            for train in &mut self.trains {
                train.index += 1;
            }
        } else {
            self.stations.push(station);
            self.tracks.push(Track { from: end, to: station });
        }
        tracing::debug!(line = ?self.id, ?station, at_beginning, "station added to line");
        true
    }

    /// Take a station off the line. The tracks that met there are replaced by
    /// one track joining its former neighbours; on a loop this holds for the
    /// closing station too, so the loop stays closed while it has two or
    /// more stations left. Returns the trains that lost their station, or
    /// `None` if the station is not on the line.
    pub fn remove_station(&mut self, station: StationId) -> Option<Vec<Train>> {
        if !self.contains(station) {
            return None;
        }
        let old = self.stations.clone();
        let old_loop = self.is_loop();
        if old_loop {
            let mut ring: Vec<StationId> = old[..old.len() - 1]
                .iter()
                .copied()
                .filter(|&s| s != station)
                .collect();
            if ring.len() >= 2 {
                ring.push(ring[0]);
            }
            self.stations = ring;
        } else {
            self.stations.retain(|&s| s != station);
        }

        self.rebuild_tracks();
        tracing::debug!(line = ?self.id, ?station, "station removed from line");
        Some(self.remap_trains(&old, old_loop))
    }

    /// Demolish the track at `track_index` if [`Self::can_delete_track`]
    /// allows it. A loop opens at that track; an open line loses the end
    /// station the track leads to. A line left with fewer than two stations
    /// is cleared entirely.
    pub fn demolish_track(&mut self, track_index: usize) -> Option<TrackDemolition> {
        if !self.can_delete_track(track_index) {
            return None;
        }
        let track = self.tracks[track_index];
        let old = self.stations.clone();
        let old_loop = self.is_loop();

        if old_loop {
            // Unique ring without the closing duplicate, rotated so the
            // track's endpoints become the new ends.
            let ring = &old[..old.len() - 1];
            let start = (track_index + 1) % ring.len();
            self.stations = ring[start..].iter().chain(&ring[..start]).copied().collect();
        } else if track_index == 0 {
            self.stations.remove(0);
        } else {
            self.stations.pop();
        }

        let mut detached = Vec::new();
        if self.stations.len() <= 1 {
            detached = self.clear();
        }

        self.rebuild_tracks();
        detached.extend(self.remap_trains(&old, old_loop));

        let removed_stations = old
            .iter()
            .copied()
            .filter(|s| !self.stations.contains(s))
            .fold(Vec::new(), |mut acc, s| {
                if !acc.contains(&s) {
                    acc.push(s);
                }
                acc
            });

        tracing::debug!(
            line = ?self.id,
            track_index,
            stations = self.stations.len(),
            detached = detached.len(),
            "track demolished"
        );
        Some(TrackDemolition {
            track,
            removed_stations,
            detached,
        })
    }

    /// Remove every station and train. Returns the detached trains.
    pub fn clear(&mut self) -> Vec<Train> {
        self.stations.clear();
        self.tracks.clear();
        std::mem::take(&mut self.trains)
    }

    fn rebuild_tracks(&mut self) {
        self.tracks = self
            .stations
            .windows(2)
            .map(|pair| Track {
                from: pair[0],
                to: pair[1],
            })
            .collect();
    }

    /// Move every train onto the new station sequence. A train keeps the
    /// station it stood at; if that station is gone the train is detached.
    fn remap_trains(&mut self, old: &[StationId], old_loop: bool) -> Vec<Train> {
        let new_loop = self.is_loop();
        let old_route = Route {
            line: self.id,
            stations: old,
            is_loop: old_loop,
        };
        let new_route = Route {
            line: self.id,
            stations: &self.stations,
            is_loop: new_loop,
        };

        let mut detached = Vec::new();
        let mut kept = Vec::with_capacity(self.trains.len());
        for mut train in self.trains.drain(..) {
            let Some(here) = old_route.get(train.index) else {
                detached.push(train);
                continue;
            };
            let Some(mut index) = new_route.stations.iter().position(|&s| s == here) else {
                detached.push(train);
                continue;
            };
            let old_next = old_route
                .next_index(train.index, train.direction)
                .and_then(|i| old_route.get(i));

            if new_loop && index == 0 && train.direction == Direction::Backward {
                index = new_route.len() - 1;
            }
            train.index = index;
            if !new_loop && new_route.len() > 1 {
                if index == 0 {
                    train.direction = Direction::Forward;
                } else if index + 1 == new_route.len() {
                    train.direction = Direction::Backward;
                }
            }

            let new_next = new_route
                .next_index(train.index, train.direction)
                .and_then(|i| new_route.get(i));
            if new_next != old_next {
                train.progress = crate::fixed::Fixed64::ZERO;
            }
            kept.push(train);
        }
        self.trains = kept;
        detached
    }

    // -----------------------------------------------------------------------
    // Trains
    // -----------------------------------------------------------------------

    pub(crate) fn add_train(&mut self, train: Train) {
        self.trains.push(train);
    }

    /// Advance every train on the line by one tick.
    pub fn tick(&mut self, ctx: &mut TickContext<'_>) {
        let route = Route {
            line: self.id,
            stations: &self.stations,
            is_loop: is_loop_sequence(&self.stations),
        };
        for train in &mut self.trains {
            train.update(route, ctx);
        }
    }
}
