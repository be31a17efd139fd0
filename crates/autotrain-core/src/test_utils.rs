//! Shared test helpers for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

pub use crate::network::UnitKind;

use crate::catalog::ItemTable;
use crate::config::MarkerSignals;
use crate::id::{StationId, UnitId};
use crate::memory::MemoryNetwork;
use crate::signal::{ResourceSignal, SignalCount, WireColor};

// ===========================================================================
// Signals
// ===========================================================================

pub fn iron_plate() -> ResourceSignal {
    ResourceSignal::item("iron-plate")
}
pub fn copper_plate() -> ResourceSignal {
    ResourceSignal::item("copper-plate")
}
pub fn coal() -> ResourceSignal {
    ResourceSignal::item("coal")
}
pub fn crude_oil() -> ResourceSignal {
    ResourceSignal::fluid("crude-oil")
}
pub fn water() -> ResourceSignal {
    ResourceSignal::fluid("water")
}

pub fn marker(name: &str, count: i64) -> SignalCount {
    SignalCount::new(ResourceSignal::virtual_signal(name), count)
}

// ===========================================================================
// Networks
// ===========================================================================

/// Item table used throughout the tests: plates stack to 100, coal to 50.
pub fn test_catalog() -> ItemTable {
    ItemTable::builder()
        .item("iron-plate", 100)
        .item("copper-plate", 100)
        .item("coal", 50)
        .unstackable("locomotive")
        .build()
        .unwrap()
}

/// An empty network over [`test_catalog`].
pub fn plate_network() -> MemoryNetwork {
    MemoryNetwork::new(test_catalog())
}

pub fn depot_station(net: &mut MemoryNetwork, name: &str) -> StationId {
    let markers = MarkerSignals::default();
    let id = net.add_station(name);
    net.set_wire(id, WireColor::Red, vec![marker(&markers.depot, 1)]);
    id
}

/// A supply station holding `stock` of `signal` on its green wire.
pub fn supply_station(
    net: &mut MemoryNetwork,
    name: &str,
    signal: &ResourceSignal,
    stock: i64,
) -> StationId {
    let markers = MarkerSignals::default();
    let id = net.add_station(name);
    net.set_wire(id, WireColor::Red, vec![marker(&markers.supply, 1)]);
    net.set_wire(
        id,
        WireColor::Green,
        vec![SignalCount::new(signal.clone(), stock)],
    );
    id
}

/// A demand station requesting `requested` of `signal` with no stock.
pub fn demand_station(
    net: &mut MemoryNetwork,
    name: &str,
    signal: &ResourceSignal,
    requested: i64,
) -> StationId {
    let markers = MarkerSignals::default();
    let id = net.add_station(name);
    net.set_wire(
        id,
        WireColor::Red,
        vec![
            marker(&markers.demand, 1),
            SignalCount::new(signal.clone(), requested),
        ],
    );
    net.set_wire(id, WireColor::Green, Vec::new());
    id
}

/// A bulk carrier parked at `depot`.
pub fn bulk_unit(net: &mut MemoryNetwork, name: &str, depot: StationId) -> UnitId {
    net.add_unit(name, UnitKind::BulkCarrier, Some(depot))
}

/// A fluid carrier parked at `depot`.
pub fn fluid_unit(net: &mut MemoryNetwork, name: &str, depot: StationId) -> UnitId {
    net.add_unit(name, UnitKind::FluidCarrier, Some(depot))
}

// ===========================================================================
// Scenario builders
// ===========================================================================

/// Handles into [`shuttle_network`].
#[derive(Debug, Clone, Copy)]
pub struct ShuttleIds {
    pub depot: StationId,
    pub mine: StationId,
    pub smelter: StationId,
    pub unit: UnitId,
}

/// One depot with one idle bulk unit, a mine holding 5000 plates and a
/// smelter requesting 5000 plates.
pub fn shuttle_network() -> (MemoryNetwork, ShuttleIds) {
    let mut net = plate_network();
    let depot = depot_station(&mut net, "Depot");
    let mine = supply_station(&mut net, "Mine", &iron_plate(), 5000);
    let smelter = demand_station(&mut net, "Smelter", &iron_plate(), 5000);
    let unit = bulk_unit(&mut net, "T1", depot);
    (
        net,
        ShuttleIds {
            depot,
            mine,
            smelter,
            unit,
        },
    )
}

/// A network with `pairs` mine/smelter pairs over mixed signals and
/// `units` idle bulk units, for stress tests and benchmarks.
pub fn build_large_network(pairs: usize, units: usize) -> MemoryNetwork {
    let mut net = plate_network();
    let depot = depot_station(&mut net, "Depot");
    let signals = [iron_plate(), copper_plate(), coal()];
    for i in 0..pairs {
        let signal = &signals[i % signals.len()];
        supply_station(&mut net, &format!("Mine {i}"), signal, 12_000 + (i as i64 % 5) * 1000);
        demand_station(&mut net, &format!("Drop {i}"), signal, 8_000);
    }
    for i in 0..units {
        bulk_unit(&mut net, &format!("T{i}"), depot);
    }
    net
}
