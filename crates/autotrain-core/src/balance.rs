//! Net demand and supply per station, after in-flight commitments.
//!
//! Balances are raw signed numbers: a negative demand balance means the
//! station is already over-served. Turning balances into [`Demand`] and
//! [`Supply`] entries is where non-positive balances become "nothing to do".

use crate::capacity::CapacityModel;
use crate::catalog::ItemCatalog;
use crate::config::MarkerSignals;
use crate::state::{Demand, Supply};
use crate::station::StationView;
use crate::signal::ResourceSignal;
use crate::unit::UnitView;

/// Breakdown of a demand station's balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemandBalance {
    pub signal: ResourceSignal,
    /// Advertised demand level.
    pub requested: i64,
    pub on_hand: i64,
    /// Carried by units whose active waypoint is a delivery here.
    pub delivering: i64,
    /// Full loads reserved by units still heading to pick up for here.
    pub reserved: i64,
    pub balance: i64,
}

/// Breakdown of a supply station's balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplyBalance {
    pub signal: ResourceSignal,
    pub on_hand: i64,
    /// Already loaded onto units stopped here for their pickup.
    pub loaded: i64,
    /// Full loads reserved by every unit assigned to pick up here.
    pub reserved: i64,
    pub balance: i64,
    /// Units assigned to pick up here.
    pub assigned: u32,
    /// `None` when the station sets no concurrency cap.
    pub remaining_unit_slots: Option<u32>,
}

/// Compute a demand station's balance. `None` if the station requests
/// nothing.
pub fn demand_balance<C: ItemCatalog + ?Sized>(
    station: &StationView,
    units: &[UnitView],
    catalog: &C,
    model: &CapacityModel,
) -> Option<DemandBalance> {
    let requested = station.requested()?;
    let signal = requested.signal.clone();
    let on_hand = station.stock_of(&signal);

    let mut delivering = 0;
    let mut reserved = 0;
    for unit in units {
        if unit.route.pending_delivery() == Some(station.name.as_str()) {
            delivering += unit.carried(&signal);
        } else if unit.route.delivery_for_pending_pickup() == Some(station.name.as_str()) {
            reserved += model.unit_capacity(catalog, unit.limiter, &signal);
        }
    }

    Some(DemandBalance {
        balance: requested.count - on_hand - delivering - reserved,
        signal,
        requested: requested.count,
        on_hand,
        delivering,
        reserved,
    })
}

/// Compute a supply station's balance. `None` if the station holds no
/// transportable stock signal.
pub fn supply_balance<C: ItemCatalog + ?Sized>(
    station: &StationView,
    units: &[UnitView],
    catalog: &C,
    model: &CapacityModel,
    markers: &MarkerSignals,
) -> Option<SupplyBalance> {
    let offered = station.offered()?;
    let signal = offered.signal.clone();

    let mut loaded = 0;
    let mut reserved = 0;
    let mut assigned = 0u32;
    for unit in units {
        if unit.route.pending_pickup() != Some(station.name.as_str()) {
            continue;
        }
        assigned += 1;
        reserved += model.unit_capacity(catalog, unit.limiter, &signal);
        if unit.is_loading_at(station.id, &station.name) {
            loaded += unit.carried(&signal);
        }
    }

    Some(SupplyBalance {
        balance: offered.count + loaded - reserved,
        signal,
        on_hand: offered.count,
        loaded,
        reserved,
        assigned,
        remaining_unit_slots: station
            .max_units(markers)
            .map(|max| max.saturating_sub(assigned)),
    })
}

/// Split a demand balance into one entry per full wagon load, sized by
/// the station's slot override.
pub fn expand_demand<C: ItemCatalog + ?Sized>(
    station: &StationView,
    balance: &DemandBalance,
    catalog: &C,
    model: &CapacityModel,
    markers: &MarkerSignals,
) -> Vec<Demand> {
    let per_entry =
        model.wagon_capacity(catalog, &balance.signal, station.slot_override(markers));
    let count = load_count(balance.balance, per_entry);
    (0..count)
        .map(|_| Demand {
            station: station.id,
            station_name: station.name.clone(),
            signal: balance.signal.clone(),
            quantity: per_entry,
        })
        .collect()
}

/// The station's whole loads as a single offer. Loads are sized by the
/// station's slot override; the allocator splits the offer per demand.
/// `None` when no full load is left or no unit slot remains.
pub fn supply_entry<C: ItemCatalog + ?Sized>(
    station: &StationView,
    balance: &SupplyBalance,
    catalog: &C,
    model: &CapacityModel,
    markers: &MarkerSignals,
) -> Option<Supply> {
    let per_load =
        model.wagon_capacity(catalog, &balance.signal, station.slot_override(markers));
    let loads = i64::try_from(load_count(balance.balance, per_load)).ok()?;
    if loads == 0 || balance.remaining_unit_slots == Some(0) {
        return None;
    }
    Some(Supply {
        station: station.id,
        station_name: station.name.clone(),
        signal: balance.signal.clone(),
        available: loads * per_load,
        remaining_unit_slots: balance.remaining_unit_slots,
    })
}

/// Whole loads in `balance`. Zero for non-positive balances or sizes.
fn load_count(balance: i64, per_entry: i64) -> u64 {
    if balance <= 0 || per_entry <= 0 {
        return 0;
    }
    u64::try_from(balance / per_entry).unwrap_or(0)
}
