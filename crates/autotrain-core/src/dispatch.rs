//! Turning a match into a route and writing it to the unit.

use crate::allocator::Match;
use crate::capacity::CapacityModel;
use crate::id::{StationId, UnitId};
use crate::network::{ActuatorError, Network};
use crate::route::{RouteSpec, WaitCondition, Waypoint};
use crate::signal::ResourceSignal;

/// Why a dispatch was skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Actuator(#[from] ActuatorError),
    #[error("transport unit {0:?} left its depot before dispatch")]
    NotIdle(UnitId),
}

/// A route that was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub unit: UnitId,
    pub supply_station: StationId,
    pub demand_station: StationId,
    pub signal: ResourceSignal,
    pub quantity: i64,
    /// Slot limit written to the unit; `None` for unrestricted loading.
    pub limiter: Option<u32>,
    pub route: RouteSpec,
}

/// Pickup until full, deliver until empty, then park at `home` waiting
/// for a full load that never comes.
pub fn build_route(supply: &str, demand: &str, home: &str) -> RouteSpec {
    RouteSpec::new(vec![
        Waypoint::new(supply, WaitCondition::Full),
        Waypoint::new(demand, WaitCondition::Empty),
        Waypoint::new(home, WaitCondition::Full),
    ])
}

/// Issue the route for `matched`.
///
/// Overwrites the unit's route, so the unit is re-checked first: it must
/// still exist and still be stopped at the depot it was found idle at.
pub fn dispatch<N>(
    network: &mut N,
    model: &CapacityModel,
    matched: &Match,
) -> Result<Dispatch, DispatchError>
where
    N: Network + ?Sized,
{
    let unit = matched.unit.id;
    if !network.is_unit_valid(unit) {
        return Err(ActuatorError::InvalidUnit(unit).into());
    }
    for station in [matched.supply_station, matched.demand.station] {
        if !network.is_station_valid(station) {
            return Err(ActuatorError::InvalidStation(station).into());
        }
    }
    if network.current_station(unit) != Some(matched.unit.home) {
        return Err(DispatchError::NotIdle(unit));
    }

    let signal = matched.demand.signal.clone();
    let limiter = model.limiter_for(&*network, &signal, matched.demand.quantity);
    let route = build_route(
        &matched.supply_station_name,
        &matched.demand.station_name,
        &matched.unit.home_name,
    );

    network.set_capacity_limiter(unit, limiter)?;
    network.set_route(unit, route.clone())?;

    Ok(Dispatch {
        unit,
        supply_station: matched.supply_station,
        demand_station: matched.demand.station,
        quantity: matched.demand.quantity,
        signal,
        limiter,
        route,
    })
}
