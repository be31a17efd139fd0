//! Per-tick readouts of transport units.

use std::collections::BTreeSet;
use std::fmt;

use crate::id::{StationId, UnitId};
use crate::network::{TransportUnitActuator, UnitKind};
use crate::route::RouteSpec;
use crate::signal::{Contents, ResourceSignal};

/// One unit as seen during a single tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitView {
    pub id: UnitId,
    pub kind: UnitKind,
    /// Empty when the unit has no route.
    pub route: RouteSpec,
    pub contents: Contents,
    pub limiter: Option<u32>,
    /// Station the unit is stopped at.
    pub station: Option<StationId>,
}

/// Coarse unit state, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    /// Parked at a depot with nothing left to do.
    Idle,
    /// Stopped at its pending pickup station.
    Loading,
    /// Stopped somewhere with an active route.
    Waiting,
    /// Travelling between stations.
    EnRoute,
    /// Stopped outside a depot with no route.
    Stranded,
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnitState::Idle => "idle",
            UnitState::Loading => "loading",
            UnitState::Waiting => "waiting",
            UnitState::EnRoute => "en route",
            UnitState::Stranded => "stranded",
        };
        f.write_str(s)
    }
}

impl UnitView {
    /// Read a unit. Returns `None` if it is gone or reports no kind.
    pub fn read<N>(network: &N, id: UnitId) -> Option<Self>
    where
        N: TransportUnitActuator + ?Sized,
    {
        if !network.is_unit_valid(id) {
            return None;
        }
        Some(Self {
            id,
            kind: network.kind(id)?,
            route: network.route(id).unwrap_or_default(),
            contents: network.carried_contents(id),
            limiter: network.capacity_limiter(id),
            station: network.current_station(id),
        })
    }

    /// Quantity of `signal` on board.
    pub fn carried(&self, signal: &ResourceSignal) -> i64 {
        self.contents
            .iter()
            .filter(|(s, _)| s.matches(signal))
            .map(|(_, count)| *count)
            .sum()
    }

    /// True if the unit is stopped at a depot and has no outstanding
    /// waypoint other than that depot.
    ///
    /// A unit that was just dispatched is still physically at the depot,
    /// but its cursor points at the pickup, so it is not idle.
    pub fn is_idle(&self, depots: &BTreeSet<StationId>, depot_name: Option<&str>) -> bool {
        let Some(station) = self.station else {
            return false;
        };
        if !depots.contains(&station) {
            return false;
        }
        match self.route.current_waypoint() {
            None => true,
            Some(w) => depot_name == Some(w.station.as_str()),
        }
    }

    /// True if the unit is stopped at the station named by its pending
    /// pickup waypoint.
    pub fn is_loading_at(&self, station: StationId, station_name: &str) -> bool {
        self.station == Some(station) && self.route.pending_pickup() == Some(station_name)
    }

    pub fn state(&self, idle: bool, at_pickup: bool) -> UnitState {
        if idle {
            UnitState::Idle
        } else if self.station.is_none() {
            UnitState::EnRoute
        } else if at_pickup {
            UnitState::Loading
        } else if self.route.is_empty() {
            UnitState::Stranded
        } else {
            UnitState::Waiting
        }
    }
}
