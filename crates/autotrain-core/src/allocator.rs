//! Greedy first-fit matching of demand against supply and idle units.
//!
//! One pass over the worklist in order. Earliest demand, earliest supply
//! and earliest idle unit win every tie. A unit leaves the idle pool the
//! moment it is matched, so it can never be claimed twice in one tick.

use crate::id::{StationId, UnitId};
use crate::network::UnitKind;
use crate::signal::ResourceSignal;
use crate::state::{Demand, Supply};

/// An idle unit available for assignment this tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdleUnit {
    pub id: UnitId,
    pub kind: UnitKind,
    /// The depot the unit is parked at; its return waypoint.
    pub home: StationId,
    pub home_name: String,
}

/// The kind of unit that can carry `signal`.
pub fn kind_for(signal: &ResourceSignal) -> UnitKind {
    if signal.is_fluid() {
        UnitKind::FluidCarrier
    } else {
        UnitKind::BulkCarrier
    }
}

/// Idle units partitioned by kind, each partition in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdlePool {
    bulk: Vec<IdleUnit>,
    fluid: Vec<IdleUnit>,
}

impl IdlePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, unit: IdleUnit) {
        match unit.kind {
            UnitKind::BulkCarrier => self.bulk.push(unit),
            UnitKind::FluidCarrier => self.fluid.push(unit),
        }
    }

    /// Remove and return the first idle unit able to carry `signal`.
    pub fn take_for(&mut self, signal: &ResourceSignal) -> Option<IdleUnit> {
        let partition = match kind_for(signal) {
            UnitKind::BulkCarrier => &mut self.bulk,
            UnitKind::FluidCarrier => &mut self.fluid,
        };
        if partition.is_empty() {
            None
        } else {
            Some(partition.remove(0))
        }
    }

    pub fn available(&self, kind: UnitKind) -> usize {
        match kind {
            UnitKind::BulkCarrier => self.bulk.len(),
            UnitKind::FluidCarrier => self.fluid.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.bulk.len() + self.fluid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &IdleUnit> {
        self.bulk.iter().chain(self.fluid.iter())
    }
}

impl FromIterator<IdleUnit> for IdlePool {
    fn from_iter<I: IntoIterator<Item = IdleUnit>>(iter: I) -> Self {
        let mut pool = IdlePool::new();
        for unit in iter {
            pool.push(unit);
        }
        pool
    }
}

/// A (demand, supply, unit) triple ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub demand: Demand,
    pub supply_station: StationId,
    pub supply_station_name: String,
    pub unit: IdleUnit,
}

/// Outcome of one allocation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allocation {
    /// Matches that were dispatched, in match order.
    pub matched: Vec<Match>,
    /// Demand left unserved, in worklist order. Carried to the next tick.
    pub pending: Vec<Demand>,
    /// Supply left after consumption.
    pub supplies: Vec<Supply>,
    /// Units left idle.
    pub idle: IdlePool,
}

/// Match `worklist` against `supplies` and `pool`.
///
/// `dispatch` is called synchronously for each match before the pass
/// continues. When it returns `false` the demand stays pending and the
/// supply is left untouched; the unit is still withdrawn for this tick.
pub fn allocate<F>(
    worklist: Vec<Demand>,
    mut supplies: Vec<Supply>,
    mut pool: IdlePool,
    mut dispatch: F,
) -> Allocation
where
    F: FnMut(&Match) -> bool,
{
    let mut matched = Vec::new();
    let mut pending = Vec::new();

    for demand in worklist {
        let Some(index) = supplies
            .iter()
            .position(|s| s.signal.matches(&demand.signal) && s.can_serve(demand.quantity))
        else {
            pending.push(demand);
            continue;
        };

        // The supply is only consumed once a unit is found.
        let Some(unit) = pool.take_for(&demand.signal) else {
            pending.push(demand);
            continue;
        };

        let candidate = Match {
            supply_station: supplies[index].station,
            supply_station_name: supplies[index].station_name.clone(),
            demand,
            unit,
        };

        if !dispatch(&candidate) {
            pending.push(candidate.demand);
            continue;
        }

        if supplies[index].consume(candidate.demand.quantity) {
            supplies.remove(index);
        }
        matched.push(candidate);
    }

    Allocation {
        matched,
        pending,
        supplies,
        idle: pool,
    }
}
