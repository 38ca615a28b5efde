//! Stations: fixed points that accept one cargo kind and queue waiting cargo.

use crate::fixed::{Fixed64, Vec2};
use crate::id::{CargoId, CargoTypeId, LineId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Anything with a position on the field.
pub trait Positioned {
    fn position(&self) -> Vec2;
}

impl Positioned for Vec2 {
    fn position(&self) -> Vec2 {
        *self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub position: Vec2,
    /// The cargo kind delivered (consumed) here.
    pub accepts: CargoTypeId,
    /// Lines touching this station. Maintained by the network.
    pub(crate) lines: Vec<LineId>,
    /// Waiting cargo, oldest first.
    pub(crate) queue: VecDeque<CargoId>,
}

impl Positioned for Station {
    fn position(&self) -> Vec2 {
        self.position
    }
}

impl Station {
    pub fn new(position: Vec2, accepts: CargoTypeId) -> Self {
        Self {
            position,
            accepts,
            lines: Vec::new(),
            queue: VecDeque::new(),
        }
    }

    /// Whether a click at `point` lands within `radius` of the station.
    pub fn is_clicked(&self, point: Vec2, radius: Fixed64) -> bool {
        self.position.distance(point) <= radius
    }

    pub fn distance_to<P: Positioned + ?Sized>(&self, other: &P) -> Fixed64 {
        self.position.distance(other.position())
    }

    pub fn lines(&self) -> &[LineId] {
        &self.lines
    }

    /// Cargo waiting here, oldest first.
    pub fn waiting(&self) -> impl ExactSizeIterator<Item = CargoId> + '_ {
        self.queue.iter().copied()
    }

    pub fn waiting_count(&self) -> usize {
        self.queue.len()
    }

    pub fn enqueue(&mut self, cargo: CargoId) {
        self.queue.push_back(cargo);
    }

    /// Remove and return the oldest waiting cargo matching `pred`.
    pub fn take_first_matching(&mut self, mut pred: impl FnMut(CargoId) -> bool) -> Option<CargoId> {
        let pos = self.queue.iter().position(|&c| pred(c))?;
        self.queue.remove(pos)
    }

    pub(crate) fn attach_line(&mut self, line: LineId) {
        if !self.lines.contains(&line) {
            self.lines.push(line);
        }
    }

    pub(crate) fn detach_line(&mut self, line: LineId) {
        self.lines.retain(|&l| l != line);
    }
}
