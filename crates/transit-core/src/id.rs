use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a station in the network.
    pub struct StationId;

    /// Identifies a line (an ordered route through stations).
    pub struct LineId;

    /// Identifies a train. Trains are owned by their line; the network keeps
    /// a registry from `TrainId` to the owning `LineId`.
    pub struct TrainId;

    /// Identifies a tracked cargo unit.
    pub struct CargoId;
}

/// Identifies a cargo kind (coal, wood, ...). Index into the configured
/// cargo-kind table. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CargoTypeId(pub u32);

impl CargoTypeId {
    /// Index into per-kind tables.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
