//! Station classification and per-tick station readouts.
//!
//! A station's role is never stored: it is recomputed from the virtual
//! markers on its red wire every time the network is scanned.

use crate::config::MarkerSignals;
use crate::id::StationId;
use crate::network::{SignalSource, StationRegistry};
use crate::signal::{count_of, has_positive, ResourceSignal, SignalCount, WireColor};

/// What a station does this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Role {
    Demand,
    Supply,
    Depot,
    Unclassified,
}

/// Classify a station from its red-wire readout.
///
/// Markers are checked demand, then supply, then depot; the first one
/// present with a positive count wins.
pub fn classify(red: &[SignalCount], markers: &MarkerSignals) -> Role {
    if has_positive(red, &markers.demand_signal()) {
        Role::Demand
    } else if has_positive(red, &markers.supply_signal()) {
        Role::Supply
    } else if has_positive(red, &markers.depot_signal()) {
        Role::Depot
    } else {
        Role::Unclassified
    }
}

/// One station as seen during a single tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationView {
    pub id: StationId,
    pub name: String,
    pub role: Role,
    /// Markers and requested levels.
    pub red: Vec<SignalCount>,
    /// On-hand stock.
    pub green: Vec<SignalCount>,
}

impl StationView {
    /// Read a station's wires. Returns `None` if the station is gone.
    /// A missing wire network reads as an empty signal list.
    pub fn read<N>(network: &N, id: StationId, markers: &MarkerSignals) -> Option<Self>
    where
        N: SignalSource + StationRegistry + ?Sized,
    {
        let name = network.station_name(id)?;
        let red = network
            .read_network_signals(id, WireColor::Red)
            .unwrap_or_default();
        let green = network
            .read_network_signals(id, WireColor::Green)
            .unwrap_or_default();
        let role = classify(&red, markers);
        Some(Self {
            id,
            name,
            role,
            red,
            green,
        })
    }

    /// The resource a demand station requests, with its raw level: the
    /// first item or fluid on the red wire.
    pub fn requested(&self) -> Option<&SignalCount> {
        self.red.iter().find(|s| s.signal.is_transportable())
    }

    /// The resource a supply station offers, with its on-hand level: the
    /// first item or fluid on the green wire.
    pub fn offered(&self) -> Option<&SignalCount> {
        self.green.iter().find(|s| s.signal.is_transportable())
    }

    /// On-hand stock of `signal`.
    pub fn stock_of(&self, signal: &ResourceSignal) -> i64 {
        count_of(&self.green, signal)
    }

    /// Wagon slot override, if set to a positive value.
    pub fn slot_override(&self, markers: &MarkerSignals) -> Option<u32> {
        positive_u32(count_of(&self.red, &markers.slots_signal()))
    }

    /// Cap on concurrently assigned pickups, if set to a positive value.
    pub fn max_units(&self, markers: &MarkerSignals) -> Option<u32> {
        positive_u32(count_of(&self.red, &markers.max_units_signal()))
    }
}

fn positive_u32(count: i64) -> Option<u32> {
    if count > 0 {
        Some(u32::try_from(count).unwrap_or(u32::MAX))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(name: &str, count: i64) -> SignalCount {
        SignalCount::new(ResourceSignal::virtual_signal(name), count)
    }

    #[test]
    fn classify_each_role() {
        let markers = MarkerSignals::default();
        assert_eq!(classify(&[marker("signal-D", 1)], &markers), Role::Demand);
        assert_eq!(classify(&[marker("signal-S", 1)], &markers), Role::Supply);
        assert_eq!(classify(&[marker("signal-0", 1)], &markers), Role::Depot);
        assert_eq!(classify(&[], &markers), Role::Unclassified);
    }

    #[test]
    fn zero_count_marker_does_not_classify() {
        let markers = MarkerSignals::default();
        assert_eq!(
            classify(&[marker("signal-D", 0)], &markers),
            Role::Unclassified
        );
    }

    #[test]
    fn multiple_markers_take_highest_priority() {
        let markers = MarkerSignals::default();
        let red = vec![marker("signal-0", 1), marker("signal-S", 1), marker("signal-D", 1)];
        assert_eq!(classify(&red, &markers), Role::Demand);
        let red = vec![marker("signal-0", 1), marker("signal-S", 1)];
        assert_eq!(classify(&red, &markers), Role::Supply);
    }

    #[test]
    fn item_named_like_marker_is_not_a_marker() {
        let markers = MarkerSignals::default();
        let red = vec![SignalCount::new(ResourceSignal::item("signal-D"), 5)];
        assert_eq!(classify(&red, &markers), Role::Unclassified);
    }

    fn view(red: Vec<SignalCount>, green: Vec<SignalCount>) -> StationView {
        let mut sm: slotmap::SlotMap<StationId, ()> = slotmap::SlotMap::with_key();
        let markers = MarkerSignals::default();
        StationView {
            id: sm.insert(()),
            name: "Test".to_string(),
            role: classify(&red, &markers),
            red,
            green,
        }
    }

    #[test]
    fn requested_skips_markers() {
        let plate = ResourceSignal::item("iron-plate");
        let station = view(
            vec![
                marker("signal-D", 1),
                marker("signal-W", 10),
                SignalCount::new(plate.clone(), 5000),
            ],
            vec![],
        );
        let requested = station.requested().unwrap();
        assert_eq!(requested.signal, plate);
        assert_eq!(requested.count, 5000);
    }

    #[test]
    fn overrides_read_from_red_wire() {
        let markers = MarkerSignals::default();
        let station = view(vec![marker("signal-W", 10), marker("signal-T", 2)], vec![]);
        assert_eq!(station.slot_override(&markers), Some(10));
        assert_eq!(station.max_units(&markers), Some(2));
    }

    #[test]
    fn missing_overrides_are_absent() {
        let markers = MarkerSignals::default();
        let station = view(vec![marker("signal-W", -3)], vec![]);
        assert_eq!(station.slot_override(&markers), None);
        assert_eq!(station.max_units(&markers), None);
    }

    #[test]
    fn offered_is_first_green_resource() {
        let coal = ResourceSignal::item("coal");
        let station = view(
            vec![marker("signal-S", 1)],
            vec![SignalCount::new(coal.clone(), 800)],
        );
        assert_eq!(station.offered().map(|s| s.count), Some(800));
        assert_eq!(station.stock_of(&coal), 800);
        assert_eq!(station.stock_of(&ResourceSignal::item("stone")), 0);
    }
}
