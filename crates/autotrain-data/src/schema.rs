//! Serde data file structs for scenario definitions.
//!
//! These describe the on-disk shape of a network: the item table, the
//! stations with their wire readouts, and the unit fleet. They are
//! deserialized from RON, JSON, or TOML and then resolved into a live
//! network by the loader.

use serde::Deserialize;

use autotrain_core::config::MarkerSignals;
use autotrain_core::network::UnitKind;
use autotrain_core::route::{WaitCondition, Waypoint};
use autotrain_core::signal::{ResourceSignal, SignalCount, SignalKind, WireColor};

fn default_true() -> bool {
    true
}

fn default_stack_size() -> u32 {
    1
}

fn default_kind() -> SignalKind {
    SignalKind::Item
}

// ===========================================================================
// Items
// ===========================================================================

/// An item type definition.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemData {
    pub name: String,
    #[serde(default = "default_stack_size")]
    pub stack_size: u32,
    #[serde(default = "default_true")]
    pub stackable: bool,
}

// ===========================================================================
// Signals
// ===========================================================================

/// One signal on a wire or in a unit's cargo. `kind` defaults to `item`.
#[derive(Debug, Clone, Deserialize)]
pub struct SignalData {
    #[serde(default = "default_kind")]
    pub kind: SignalKind,
    pub name: String,
    pub count: i64,
}

impl SignalData {
    pub fn to_signal(&self) -> ResourceSignal {
        ResourceSignal::new(self.kind, self.name.as_str())
    }

    pub fn to_count(&self) -> SignalCount {
        SignalCount::new(self.to_signal(), self.count)
    }
}

// ===========================================================================
// Stations
// ===========================================================================

/// Shorthand for the marker a station carries on its red wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleData {
    Demand,
    Supply,
    Depot,
    #[default]
    Unclassified,
}

impl RoleData {
    /// The marker signal for this role under `markers`.
    pub fn marker(self, markers: &MarkerSignals) -> Option<ResourceSignal> {
        match self {
            RoleData::Demand => Some(markers.demand_signal()),
            RoleData::Supply => Some(markers.supply_signal()),
            RoleData::Depot => Some(markers.depot_signal()),
            RoleData::Unclassified => None,
        }
    }
}

/// A station and its wire readouts.
///
/// The role marker is prepended to `red`. Both wires are attached unless
/// listed in `detached`.
#[derive(Debug, Clone, Deserialize)]
pub struct StationData {
    pub name: String,
    #[serde(default)]
    pub role: RoleData,
    #[serde(default)]
    pub red: Vec<SignalData>,
    #[serde(default)]
    pub green: Vec<SignalData>,
    #[serde(default)]
    pub detached: Vec<WireColor>,
}

// ===========================================================================
// Units
// ===========================================================================

/// A route stop.
#[derive(Debug, Clone, Deserialize)]
pub struct WaypointData {
    pub station: String,
    pub wait: WaitCondition,
}

impl WaypointData {
    pub fn to_waypoint(&self) -> Waypoint {
        Waypoint::new(self.station.as_str(), self.wait)
    }
}

/// A transport unit, optionally mid-route.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitData {
    pub name: String,
    pub kind: UnitKind,
    /// Station the unit is stopped at; absent while travelling.
    #[serde(default)]
    pub at: Option<String>,
    #[serde(default)]
    pub route: Vec<WaypointData>,
    /// Index of the active waypoint in `route`.
    #[serde(default)]
    pub current: usize,
    #[serde(default)]
    pub contents: Vec<SignalData>,
    #[serde(default)]
    pub limiter: Option<u32>,
}

// ===========================================================================
// Network file
// ===========================================================================

/// Top-level contents of `network.{ron,toml,json}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkData {
    #[serde(default)]
    pub items: Vec<ItemData>,
    #[serde(default)]
    pub stations: Vec<StationData>,
    #[serde(default)]
    pub units: Vec<UnitData>,
}
