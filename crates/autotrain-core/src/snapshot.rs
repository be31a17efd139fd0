//! One scan of the network per tick.
//!
//! Reads every station and unit once, classifies stations, computes
//! balances, and expands them into the tick's fresh demand and supply
//! lists. Nothing here writes to the network.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::allocator::{IdlePool, IdleUnit};
use crate::balance::{
    demand_balance, expand_demand, supply_balance, supply_entry, DemandBalance, SupplyBalance,
};
use crate::capacity::CapacityModel;
use crate::config::ControllerConfig;
use crate::id::StationId;
use crate::network::Network;
use crate::state::State;
use crate::station::{Role, StationView};
use crate::unit::UnitView;

/// Everything read from the network during one tick.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub stations: Vec<StationView>,
    pub units: Vec<UnitView>,
    pub demand_balances: Vec<(StationId, DemandBalance)>,
    pub supply_balances: Vec<(StationId, SupplyBalance)>,
    /// Fresh, undiffed demand and supply entries in station order.
    pub state: State,
    pub idle: IdlePool,
}

impl Snapshot {
    pub fn station(&self, id: StationId) -> Option<&StationView> {
        self.stations.iter().find(|s| s.id == id)
    }

    pub fn stations_with_role(&self, role: Role) -> impl Iterator<Item = &StationView> {
        self.stations.iter().filter(move |s| s.role == role)
    }
}

/// Scan `network` and build this tick's snapshot.
pub fn build_snapshot<N>(network: &N, config: &ControllerConfig) -> Snapshot
where
    N: Network + ?Sized,
{
    let markers = &config.markers;
    let model = CapacityModel::from_config(config);

    let stations: Vec<StationView> = network
        .stations()
        .into_iter()
        .filter_map(|id| StationView::read(network, id, markers))
        .collect();
    let units: Vec<UnitView> = network
        .units()
        .into_iter()
        .filter_map(|id| UnitView::read(network, id))
        .collect();

    let mut snapshot = Snapshot::default();

    for station in &stations {
        match station.role {
            Role::Demand => {
                let Some(balance) = demand_balance(station, &units, network, &model) else {
                    debug!(station = %station.name, "demand station requests nothing");
                    continue;
                };
                snapshot.state.demands.extend(expand_demand(
                    station, &balance, network, &model, markers,
                ));
                snapshot.demand_balances.push((station.id, balance));
            }
            Role::Supply => {
                let Some(balance) = supply_balance(station, &units, network, &model, markers)
                else {
                    debug!(station = %station.name, "supply station holds no stock");
                    continue;
                };
                snapshot.state.supplies.extend(supply_entry(
                    station, &balance, network, &model, markers,
                ));
                snapshot.supply_balances.push((station.id, balance));
            }
            Role::Depot | Role::Unclassified => {}
        }
    }

    let depots: BTreeMap<StationId, &str> = stations
        .iter()
        .filter(|s| s.role == Role::Depot)
        .map(|s| (s.id, s.name.as_str()))
        .collect();
    let depot_ids: BTreeSet<StationId> = depots.keys().copied().collect();

    snapshot.idle = units
        .iter()
        .filter_map(|unit| {
            let home = unit.station?;
            let home_name = *depots.get(&home)?;
            unit.is_idle(&depot_ids, Some(home_name)).then(|| IdleUnit {
                id: unit.id,
                kind: unit.kind,
                home,
                home_name: home_name.to_string(),
            })
        })
        .collect();

    snapshot.stations = stations;
    snapshot.units = units;
    snapshot
}
