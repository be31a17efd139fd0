//! Malformed and hostile network readouts.
//!
//! Each case must either produce no work or a well-formed dispatch, never
//! a panic.

use autotrain_core::config::{ControllerConfig, MarkerSignals};
use autotrain_core::controller::{run_tick, Controller};
use autotrain_core::network::TransportUnitActuator;
use autotrain_core::signal::{SignalCount, WireColor};
use autotrain_core::state::{State, StateDecodeError};
use autotrain_core::test_utils::*;

fn config() -> ControllerConfig {
    ControllerConfig::default()
}

/// A station with no wires attached reads as unclassified.
#[test]
fn station_without_wires() {
    let mut net = plate_network();
    net.add_station("Bare");
    let (state, report) = run_tick(&mut net, &config(), State::default(), 0);
    assert!(state.is_empty());
    assert!(report.dispatched.is_empty());
}

/// A supply station whose green wire is cut offers nothing.
#[test]
fn supply_with_detached_stock_wire() {
    let mut net = plate_network();
    let mine = supply_station(&mut net, "Mine", &iron_plate(), 10_000);
    net.detach_wire(mine, WireColor::Green);
    let (state, _) = run_tick(&mut net, &config(), State::default(), 0);
    assert!(state.supplies.is_empty());
}

/// Negative demand is treated as satisfied.
#[test]
fn negative_request_yields_nothing() {
    let mut net = plate_network();
    demand_station(&mut net, "Smelter", &iron_plate(), -8000);
    let (state, _) = run_tick(&mut net, &config(), State::default(), 0);
    assert!(state.demands.is_empty());
}

/// Stock already above the request is over-served, not negative demand.
#[test]
fn overstocked_demand_station() {
    let mut net = plate_network();
    let smelter = demand_station(&mut net, "Smelter", &iron_plate(), 4000);
    net.set_signal(smelter, WireColor::Green, iron_plate(), 9000);
    let (state, _) = run_tick(&mut net, &config(), State::default(), 0);
    assert!(state.demands.is_empty());
}

/// A station carrying every marker is a demand station.
#[test]
fn conflicting_markers_prefer_demand() {
    let markers = MarkerSignals::default();
    let mut net = plate_network();
    let s = net.add_station("Confused");
    net.set_wire(
        s,
        WireColor::Red,
        vec![
            marker(&markers.depot, 1),
            marker(&markers.supply, 1),
            marker(&markers.demand, 1),
            SignalCount::new(iron_plate(), 4000),
        ],
    );
    let (state, _) = run_tick(&mut net, &config(), State::default(), 0);
    assert_eq!(state.demands.len(), 1);
    assert!(state.supplies.is_empty());
}

/// Items missing from the catalog load one per slot.
#[test]
fn unknown_item_uses_unit_stack() {
    let mut net = plate_network();
    let depot = depot_station(&mut net, "Depot");
    let gizmo = autotrain_core::signal::ResourceSignal::item("gizmo");
    supply_station(&mut net, "Workshop", &gizmo, 100);
    demand_station(&mut net, "Lab", &gizmo, 40);
    let unit = bulk_unit(&mut net, "T1", depot);

    let (_, report) = run_tick(&mut net, &config(), State::default(), 0);
    assert_eq!(report.dispatched.len(), 1);
    assert_eq!(report.dispatched[0].quantity, 40);
    assert_eq!(net.capacity_limiter(unit), Some(41));
}

/// A slot override shrinks each demand entry.
#[test]
fn slot_override_sizes_entries() {
    let markers = MarkerSignals::default();
    let mut net = plate_network();
    let smelter = demand_station(&mut net, "Smelter", &iron_plate(), 3000);
    net.set_signal(smelter, WireColor::Red, markers.slots_signal(), 10);
    let (state, _) = run_tick(&mut net, &config(), State::default(), 0);
    assert_eq!(state.demands.len(), 3);
    assert!(state.demands.iter().all(|d| d.quantity == 1000));
}

/// A mine loading short wagons still serves a smelter sized for full ones.
#[test]
fn supply_slot_override_does_not_block_larger_demand() {
    let markers = MarkerSignals::default();
    let mut net = plate_network();
    let depot = depot_station(&mut net, "Depot");
    let mine = supply_station(&mut net, "Mine", &iron_plate(), 40_000);
    net.set_signal(mine, WireColor::Red, markers.slots_signal(), 10);
    let smelter = demand_station(&mut net, "Smelter", &iron_plate(), 4000);
    let unit = bulk_unit(&mut net, "T1", depot);

    let (state, report) = run_tick(&mut net, &config(), State::default(), 0);
    assert_eq!(report.dispatched.len(), 1);
    let issued = &report.dispatched[0];
    assert_eq!(issued.supply_station, mine);
    assert_eq!(issued.demand_station, smelter);
    assert_eq!(issued.quantity, 4000);
    assert_eq!(net.capacity_limiter(unit), Some(41));
    assert_eq!(state.supplies.len(), 1);
    assert_eq!(state.supplies[0].available, 36_000);
}

/// A smelter asking for short loads draws on a mine sized for full ones.
#[test]
fn demand_slot_override_draws_on_full_size_supply() {
    let markers = MarkerSignals::default();
    let mut net = plate_network();
    let depot = depot_station(&mut net, "Depot");
    let mine = supply_station(&mut net, "Mine", &iron_plate(), 9000);
    let smelter = demand_station(&mut net, "Smelter", &iron_plate(), 3000);
    net.set_signal(smelter, WireColor::Red, markers.slots_signal(), 10);
    bulk_unit(&mut net, "T1", depot);
    bulk_unit(&mut net, "T2", depot);

    let (state, report) = run_tick(&mut net, &config(), State::default(), 0);
    assert_eq!(report.dispatched.len(), 2);
    assert!(report.dispatched.iter().all(|d| d.supply_station == mine));
    assert!(report.dispatched.iter().all(|d| d.quantity == 1000));
    assert!(report.dispatched.iter().all(|d| d.limiter == Some(11)));
    assert_eq!(state.demands.len(), 1);
    assert_eq!(state.supplies[0].available, 6000);
}

/// A max-units cap limits concurrent pickups from one station.
#[test]
fn max_units_caps_concurrent_pickups() {
    let markers = MarkerSignals::default();
    let mut net = plate_network();
    let depot = depot_station(&mut net, "Depot");
    let mine = supply_station(&mut net, "Mine", &iron_plate(), 20_000);
    net.set_signal(mine, WireColor::Red, markers.max_units_signal(), 1);
    demand_station(&mut net, "A", &iron_plate(), 4000);
    demand_station(&mut net, "B", &iron_plate(), 4000);
    bulk_unit(&mut net, "T1", depot);
    bulk_unit(&mut net, "T2", depot);

    let config = config();
    let (state, report) = run_tick(&mut net, &config, State::default(), 0);
    assert_eq!(report.dispatched.len(), 1);
    assert_eq!(state.demands.len(), 1);

    // The assigned unit now fills the only slot.
    let (_, report) = run_tick(&mut net, &config, state, 60);
    assert!(report.dispatched.is_empty());
    assert_eq!(report.pending, 1);
}

/// Stale state naming a deleted station is dropped as removed demand.
#[test]
fn stale_state_for_removed_station() {
    let mut net = plate_network();
    let smelter = demand_station(&mut net, "Smelter", &iron_plate(), 4000);
    let (state, _) = run_tick(&mut net, &config(), State::default(), 0);
    net.remove_station(smelter);
    let (state, report) = run_tick(&mut net, &config(), state, 60);
    assert_eq!(report.demand_removed, 1);
    assert!(state.is_empty());
}

/// Units parked somewhere other than a depot are never dispatched.
#[test]
fn stranded_unit_is_not_idle() {
    let mut net = plate_network();
    let mine = supply_station(&mut net, "Mine", &iron_plate(), 4000);
    demand_station(&mut net, "Smelter", &iron_plate(), 4000);
    bulk_unit(&mut net, "T1", mine);
    net.add_unit("T2", UnitKind::BulkCarrier, None);
    let (_, report) = run_tick(&mut net, &config(), State::default(), 0);
    assert!(report.dispatched.is_empty());
    assert_eq!(report.idle_units, 0);
}

/// A bulk carrier is never sent for a fluid.
#[test]
fn fluid_demand_without_tanker_waits() {
    let mut net = plate_network();
    let depot = depot_station(&mut net, "Depot");
    supply_station(&mut net, "Pump", &water(), 50_000);
    demand_station(&mut net, "Boiler", &water(), 25_000);
    bulk_unit(&mut net, "T1", depot);
    let (state, report) = run_tick(&mut net, &config(), State::default(), 0);
    assert!(report.dispatched.is_empty());
    assert_eq!(state.demands.len(), 1);
}

/// Truncated and foreign bytes are rejected, not panicked on.
#[test]
fn corrupt_state_bytes() {
    assert!(State::decode(&[]).is_err());
    assert!(State::decode(&[0xFF; 7]).is_err());
    assert!(matches!(
        Controller::restore(config(), b"not a state"),
        Err(StateDecodeError::Decode(_) | StateDecodeError::InvalidMagic { .. })
    ));
}

/// Zero interval runs every tick.
#[test]
fn zero_interval_runs_every_tick() {
    let (mut net, _) = shuttle_network();
    let mut controller = Controller::new(ControllerConfig {
        interval: 0,
        ..ControllerConfig::default()
    });
    assert!(controller.on_tick(&mut net, 1).is_some());
    assert!(controller.on_tick(&mut net, 2).is_some());
}
