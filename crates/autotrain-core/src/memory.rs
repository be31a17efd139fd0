//! An in-memory network implementing every host interface.
//!
//! Used by the scenario loader, tests and benchmarks. It also carries a
//! coarse movement model ([`MemoryNetwork::step_units`]) so scenarios can
//! watch demand converge over several control ticks: each step a unit
//! either arrives at its active waypoint or works it (load, unload, leave).

use slotmap::SlotMap;

use crate::capacity::CapacityModel;
use crate::catalog::{ItemCatalog, ItemTable};
use crate::id::{StationId, UnitId};
use crate::network::{ActuatorError, SignalSource, StationRegistry, TransportUnitActuator, UnitKind};
use crate::route::{RouteSpec, WaitCondition};
use crate::signal::{Contents, ResourceSignal, SignalCount, WireColor};

#[derive(Debug, Clone)]
struct MemoryStation {
    name: String,
    red: Option<Vec<SignalCount>>,
    green: Option<Vec<SignalCount>>,
}

impl MemoryStation {
    fn wire_mut(&mut self, wire: WireColor) -> &mut Option<Vec<SignalCount>> {
        match wire {
            WireColor::Red => &mut self.red,
            WireColor::Green => &mut self.green,
        }
    }
}

#[derive(Debug, Clone)]
struct MemoryUnit {
    name: String,
    kind: UnitKind,
    station: Option<StationId>,
    route: Option<RouteSpec>,
    contents: Contents,
    limiter: Option<u32>,
}

/// Stations, units and items held in plain maps.
#[derive(Debug, Clone, Default)]
pub struct MemoryNetwork {
    stations: SlotMap<StationId, MemoryStation>,
    station_order: Vec<StationId>,
    units: SlotMap<UnitId, MemoryUnit>,
    unit_order: Vec<UnitId>,
    catalog: ItemTable,
    capacity: CapacityModel,
    route_writes: u64,
}

impl MemoryNetwork {
    pub fn new(catalog: ItemTable) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    /// Capacity rules used by [`step_units`](Self::step_units) when loading.
    pub fn with_capacity_model(mut self, capacity: CapacityModel) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn catalog(&self) -> &ItemTable {
        &self.catalog
    }

    // --- Stations ---

    /// Add a station with no wires attached.
    pub fn add_station(&mut self, name: &str) -> StationId {
        let id = self.stations.insert(MemoryStation {
            name: name.to_string(),
            red: None,
            green: None,
        });
        self.station_order.push(id);
        id
    }

    pub fn remove_station(&mut self, id: StationId) {
        self.stations.remove(id);
        self.station_order.retain(|s| *s != id);
    }

    /// First station with this name, in registry order.
    pub fn station_by_name(&self, name: &str) -> Option<StationId> {
        self.station_order
            .iter()
            .copied()
            .find(|id| self.stations.get(*id).is_some_and(|s| s.name == name))
    }

    /// Replace a wire's readout, attaching the wire if needed.
    pub fn set_wire(&mut self, id: StationId, wire: WireColor, signals: Vec<SignalCount>) {
        if let Some(station) = self.stations.get_mut(id) {
            *station.wire_mut(wire) = Some(signals);
        }
    }

    pub fn detach_wire(&mut self, id: StationId, wire: WireColor) {
        if let Some(station) = self.stations.get_mut(id) {
            *station.wire_mut(wire) = None;
        }
    }

    /// Set one signal's count on a wire, appending it if absent.
    pub fn set_signal(&mut self, id: StationId, wire: WireColor, signal: ResourceSignal, count: i64) {
        let Some(station) = self.stations.get_mut(id) else {
            return;
        };
        let signals = station.wire_mut(wire).get_or_insert_with(Vec::new);
        match signals.iter_mut().find(|s| s.signal.matches(&signal)) {
            Some(existing) => existing.count = count,
            None => signals.push(SignalCount::new(signal, count)),
        }
    }

    /// Count of `signal` on a wire, zero when absent.
    pub fn signal(&self, id: StationId, wire: WireColor, signal: &ResourceSignal) -> i64 {
        self.read_network_signals(id, wire)
            .map(|signals| crate::signal::count_of(&signals, signal))
            .unwrap_or(0)
    }

    // --- Units ---

    pub fn add_unit(&mut self, name: &str, kind: UnitKind, at: Option<StationId>) -> UnitId {
        let id = self.units.insert(MemoryUnit {
            name: name.to_string(),
            kind,
            station: at,
            route: None,
            contents: Contents::new(),
            limiter: None,
        });
        self.unit_order.push(id);
        id
    }

    pub fn remove_unit(&mut self, id: UnitId) {
        self.units.remove(id);
        self.unit_order.retain(|u| *u != id);
    }

    pub fn unit_name(&self, id: UnitId) -> Option<&str> {
        self.units.get(id).map(|u| u.name.as_str())
    }

    pub fn unit_by_name(&self, name: &str) -> Option<UnitId> {
        self.unit_order
            .iter()
            .copied()
            .find(|id| self.units.get(*id).is_some_and(|u| u.name == name))
    }

    pub fn set_unit_station(&mut self, id: UnitId, station: Option<StationId>) {
        if let Some(unit) = self.units.get_mut(id) {
            unit.station = station;
        }
    }

    pub fn set_contents(&mut self, id: UnitId, signal: ResourceSignal, quantity: i64) {
        if let Some(unit) = self.units.get_mut(id) {
            if quantity > 0 {
                unit.contents.insert(signal, quantity);
            } else {
                unit.contents.remove(&signal);
            }
        }
    }

    /// Number of successful `set_route` calls so far.
    pub fn route_writes(&self) -> u64 {
        self.route_writes
    }

    // --- Movement ---

    /// Advance every routed unit by one step.
    pub fn step_units(&mut self) {
        for id in self.unit_order.clone() {
            self.step_unit(id);
        }
    }

    fn step_unit(&mut self, id: UnitId) {
        let Some(unit) = self.units.get(id) else {
            return;
        };
        let Some(route) = unit.route.as_ref() else {
            return;
        };
        let Some(waypoint) = route.current_waypoint() else {
            return;
        };
        let target = self.station_by_name(&waypoint.station);
        let wait = waypoint.wait;
        let is_pickup = route.is_pickup(route.current);

        if unit.station != target {
            self.set_unit_station(id, target);
            return;
        }
        let Some(station) = target else {
            return;
        };

        let leave = match wait {
            WaitCondition::None => true,
            WaitCondition::Full => is_pickup && self.load(id, station),
            WaitCondition::Empty => {
                self.unload(id, station);
                true
            }
        };
        if leave {
            if let Some(unit) = self.units.get_mut(id) {
                let advanced = unit.route.as_mut().is_some_and(RouteSpec::advance);
                if advanced {
                    unit.station = None;
                }
            }
        }
    }

    /// Move stock into the unit. Returns `true` once the unit is full.
    fn load(&mut self, id: UnitId, station: StationId) -> bool {
        let Some(offered) = self
            .stations
            .get(station)
            .and_then(|s| s.green.as_ref())
            .and_then(|g| g.iter().find(|s| s.signal.is_transportable()))
            .cloned()
        else {
            return false;
        };
        let Some(unit) = self.units.get(id) else {
            return false;
        };
        let capacity = self
            .capacity
            .unit_capacity(&self.catalog, unit.limiter, &offered.signal);
        let carried = unit.contents.get(&offered.signal).copied().unwrap_or(0);
        let take = offered.count.min(capacity - carried).max(0);

        self.set_signal(station, WireColor::Green, offered.signal.clone(), offered.count - take);
        self.set_contents(id, offered.signal, carried + take);
        carried + take >= capacity
    }

    /// Move everything on board into the station's stock.
    fn unload(&mut self, id: UnitId, station: StationId) {
        let Some(unit) = self.units.get_mut(id) else {
            return;
        };
        let contents = std::mem::take(&mut unit.contents);
        for (signal, quantity) in contents {
            let current = self.signal(station, WireColor::Green, &signal);
            self.set_signal(station, WireColor::Green, signal, current + quantity);
        }
    }
}

impl SignalSource for MemoryNetwork {
    fn read_network_signals(
        &self,
        station: StationId,
        wire: WireColor,
    ) -> Option<Vec<SignalCount>> {
        let station = self.stations.get(station)?;
        match wire {
            WireColor::Red => station.red.clone(),
            WireColor::Green => station.green.clone(),
        }
    }
}

impl StationRegistry for MemoryNetwork {
    fn stations(&self) -> Vec<StationId> {
        self.station_order.clone()
    }

    fn station_name(&self, station: StationId) -> Option<String> {
        self.stations.get(station).map(|s| s.name.clone())
    }
}

impl TransportUnitActuator for MemoryNetwork {
    fn units(&self) -> Vec<UnitId> {
        self.unit_order.clone()
    }

    fn is_unit_valid(&self, unit: UnitId) -> bool {
        self.units.contains_key(unit)
    }

    fn kind(&self, unit: UnitId) -> Option<UnitKind> {
        self.units.get(unit).map(|u| u.kind)
    }

    fn route(&self, unit: UnitId) -> Option<RouteSpec> {
        self.units.get(unit).and_then(|u| u.route.clone())
    }

    fn set_route(&mut self, unit: UnitId, route: RouteSpec) -> Result<(), ActuatorError> {
        let entry = self
            .units
            .get_mut(unit)
            .ok_or(ActuatorError::InvalidUnit(unit))?;
        entry.route = Some(route);
        self.route_writes += 1;
        Ok(())
    }

    fn carried_contents(&self, unit: UnitId) -> Contents {
        self.units
            .get(unit)
            .map(|u| u.contents.clone())
            .unwrap_or_default()
    }

    fn capacity_limiter(&self, unit: UnitId) -> Option<u32> {
        self.units.get(unit).and_then(|u| u.limiter)
    }

    fn set_capacity_limiter(
        &mut self,
        unit: UnitId,
        slots: Option<u32>,
    ) -> Result<(), ActuatorError> {
        let entry = self
            .units
            .get_mut(unit)
            .ok_or(ActuatorError::InvalidUnit(unit))?;
        entry.limiter = slots;
        Ok(())
    }

    fn current_station(&self, unit: UnitId) -> Option<StationId> {
        self.units.get(unit).and_then(|u| u.station)
    }
}

impl ItemCatalog for MemoryNetwork {
    fn stack_size(&self, item: &str) -> u32 {
        self.catalog.stack_size(item)
    }
}
