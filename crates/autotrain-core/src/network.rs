//! Interfaces to the world the controller runs against.
//!
//! The controller never reads sensors or moves trains itself. A host
//! implements these traits over its own entities; every read returns an
//! explicit `Option` so "no network", "no signal" and "gone" are all
//! representable without panicking.

use crate::catalog::ItemCatalog;
use crate::id::{StationId, UnitId};
use crate::route::RouteSpec;
use crate::signal::{Contents, SignalCount, WireColor};

/// Physical configuration of a unit. Fixed for the unit's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    BulkCarrier,
    FluidCarrier,
}

/// Errors returned by actuator writes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActuatorError {
    #[error("transport unit {0:?} is no longer valid")]
    InvalidUnit(UnitId),
    #[error("station {0:?} is no longer valid")]
    InvalidStation(StationId),
}

/// Per-station wire network readout.
pub trait SignalSource {
    /// Signals on the station's `wire` network, in network order. `None`
    /// when no network of that color is attached.
    fn read_network_signals(&self, station: StationId, wire: WireColor)
    -> Option<Vec<SignalCount>>;
}

/// The flat registry of stations.
pub trait StationRegistry {
    /// All stations, in registry order.
    fn stations(&self) -> Vec<StationId>;

    fn station_name(&self, station: StationId) -> Option<String>;

    fn is_station_valid(&self, station: StationId) -> bool {
        self.station_name(station).is_some()
    }
}

/// Reads and writes transport unit state.
pub trait TransportUnitActuator {
    /// All units, in registry order.
    fn units(&self) -> Vec<UnitId>;

    fn is_unit_valid(&self, unit: UnitId) -> bool;

    fn kind(&self, unit: UnitId) -> Option<UnitKind>;

    fn route(&self, unit: UnitId) -> Option<RouteSpec>;

    fn set_route(&mut self, unit: UnitId, route: RouteSpec) -> Result<(), ActuatorError>;

    fn carried_contents(&self, unit: UnitId) -> Contents;

    /// Current slot limit, `None` when unrestricted.
    fn capacity_limiter(&self, unit: UnitId) -> Option<u32>;

    fn set_capacity_limiter(&mut self, unit: UnitId, slots: Option<u32>)
    -> Result<(), ActuatorError>;

    /// The station the unit is stopped at, `None` while en route.
    fn current_station(&self, unit: UnitId) -> Option<StationId>;
}

/// Everything the controller needs from the host, as one bound.
pub trait Network: SignalSource + StationRegistry + TransportUnitActuator + ItemCatalog {}

impl<T> Network for T where T: SignalSource + StationRegistry + TransportUnitActuator + ItemCatalog {}
