//! Per-tick results handed back to the host.

use crate::dispatch::{Dispatch, DispatchError};
use crate::id::{StationId, UnitId};

/// A match that could not be dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDispatch {
    pub unit: UnitId,
    pub supply_station: StationId,
    pub demand_station: StationId,
    pub reason: DispatchError,
}

/// What one control tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub dispatched: Vec<Dispatch>,
    pub skipped: Vec<SkippedDispatch>,
    /// Demand entries new this tick.
    pub demand_added: usize,
    /// Demand entries carried over from the previous tick.
    pub demand_remained: usize,
    /// Previous demand entries no longer present.
    pub demand_removed: usize,
    /// Supply offers new this tick, against the previous residual.
    pub supply_added: usize,
    /// Previous residual supply offers no longer present.
    pub supply_removed: usize,
    /// Demand entries left unserved and carried to the next tick.
    pub pending: usize,
    /// Supply entries left after allocation.
    pub residual_supply: usize,
    /// Idle units found before allocation.
    pub idle_units: usize,
}

impl TickReport {
    /// Total quantity committed to routes this tick.
    pub fn committed(&self) -> i64 {
        self.dispatched.iter().map(|d| d.quantity).sum()
    }
}
