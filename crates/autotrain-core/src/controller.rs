//! The per-tick control loop.
//!
//! [`run_tick`] is the pure form: previous state in, next state and a
//! report out. [`Controller`] owns the state between ticks and applies the
//! configured cadence to a monotonic world tick.
//!
//! # Tick pipeline
//!
//! 1. **Snapshot** -- read every station and unit, classify, balance.
//! 2. **Diff** -- compare fresh demand against the previous residual.
//! 3. **Allocate** -- first-fit match the worklist, dispatching each match
//!    as it is made.
//! 4. **Store** -- unmatched demand and leftover supply become the state.

use tracing::{debug, info, warn};

use crate::allocator::allocate;
use crate::capacity::CapacityModel;
use crate::config::ControllerConfig;
use crate::diff::diff;
use crate::dispatch::dispatch;
use crate::network::Network;
use crate::report::{SkippedDispatch, TickReport};
use crate::signal::content_signal;
use crate::snapshot::{build_snapshot, Snapshot};
use crate::state::{same_demand, same_supply, State, StateDecodeError, StateEncodeError};

/// Run one control tick.
pub fn run_tick<N>(
    network: &mut N,
    config: &ControllerConfig,
    previous: State,
    tick: u64,
) -> (State, TickReport)
where
    N: Network + ?Sized,
{
    let model = CapacityModel::from_config(config);
    let snapshot = build_snapshot(&*network, config);
    log_snapshot(&snapshot);

    let mut report = TickReport {
        tick,
        idle_units: snapshot.idle.len(),
        ..TickReport::default()
    };

    let Snapshot {
        state: fresh, idle, ..
    } = snapshot;

    let supply_changes = diff(previous.supplies, fresh.supplies.clone(), same_supply);
    report.supply_added = supply_changes.added.len();
    report.supply_removed = supply_changes.removed.len();

    let changes = diff(previous.demands, fresh.demands, same_demand);
    for demand in &changes.added {
        info!(
            station = %demand.station_name,
            signal = %demand.signal,
            quantity = demand.quantity,
            "demand added"
        );
    }
    for demand in &changes.removed {
        info!(
            station = %demand.station_name,
            signal = %demand.signal,
            quantity = demand.quantity,
            "demand removed"
        );
    }
    report.demand_added = changes.added.len();
    report.demand_remained = changes.remained.len();
    report.demand_removed = changes.removed.len();

    let mut dispatched = Vec::new();
    let mut skipped = Vec::new();
    let allocation = allocate(changes.into_worklist(), fresh.supplies, idle, |matched| {
        match dispatch(&mut *network, &model, matched) {
            Ok(issued) => {
                info!(
                    unit = ?issued.unit,
                    from = %matched.supply_station_name,
                    to = %matched.demand.station_name,
                    home = %matched.unit.home_name,
                    signal = %issued.signal,
                    quantity = issued.quantity,
                    limiter = ?issued.limiter,
                    "dispatched"
                );
                dispatched.push(issued);
                true
            }
            Err(reason) => {
                warn!(
                    unit = ?matched.unit.id,
                    to = %matched.demand.station_name,
                    %reason,
                    "dispatch skipped"
                );
                skipped.push(SkippedDispatch {
                    unit: matched.unit.id,
                    supply_station: matched.supply_station,
                    demand_station: matched.demand.station,
                    reason,
                });
                false
            }
        }
    });

    for demand in &allocation.pending {
        debug!(
            station = %demand.station_name,
            signal = %demand.signal,
            quantity = demand.quantity,
            "no match; carried forward"
        );
    }

    report.dispatched = dispatched;
    report.skipped = skipped;
    report.pending = allocation.pending.len();
    report.residual_supply = allocation.supplies.len();

    (State::new(allocation.pending, allocation.supplies), report)
}

/// Dump unit states and station balances at debug level.
fn log_snapshot(snapshot: &Snapshot) {
    let station_name = |id| {
        snapshot
            .station(id)
            .map(|s| s.name.as_str())
            .unwrap_or("?")
    };

    for unit in &snapshot.units {
        let idle = snapshot.idle.iter().any(|u| u.id == unit.id);
        let at_pickup = unit
            .station
            .is_some_and(|s| unit.is_loading_at(s, station_name(s)));
        debug!(
            unit = ?unit.id,
            state = %unit.state(idle, at_pickup),
            carrying = ?content_signal(&unit.contents).map(ToString::to_string),
            "unit"
        );
    }
    for (id, balance) in &snapshot.supply_balances {
        debug!(
            station = station_name(*id),
            signal = %balance.signal,
            balance = balance.balance,
            assigned = balance.assigned,
            "supply balance"
        );
    }
    for (id, balance) in &snapshot.demand_balances {
        debug!(
            station = station_name(*id),
            signal = %balance.signal,
            balance = balance.balance,
            "demand balance"
        );
    }
}

/// Owns the carried state and applies the tick cadence.
#[derive(Debug, Clone, Default)]
pub struct Controller {
    config: ControllerConfig,
    state: State,
    last_tick: Option<u64>,
}

impl Controller {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            state: State::default(),
            last_tick: None,
        }
    }

    /// Resume from a previously computed state.
    pub fn with_state(config: ControllerConfig, state: State) -> Self {
        Self {
            config,
            state,
            last_tick: None,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn into_state(self) -> State {
        self.state
    }

    /// World tick of the most recent control run.
    pub fn last_tick(&self) -> Option<u64> {
        self.last_tick
    }

    /// Called on every world tick; runs the loop on cadence ticks only.
    pub fn on_tick<N>(&mut self, network: &mut N, tick: u64) -> Option<TickReport>
    where
        N: Network + ?Sized,
    {
        if !self.config.is_control_tick(tick) {
            return None;
        }
        Some(self.run(network, tick))
    }

    /// Run the loop now, regardless of cadence.
    pub fn run<N>(&mut self, network: &mut N, tick: u64) -> TickReport
    where
        N: Network + ?Sized,
    {
        let previous = std::mem::take(&mut self.state);
        let (state, report) = run_tick(network, &self.config, previous, tick);
        self.state = state;
        self.last_tick = Some(tick);
        report
    }

    /// Persist the current state.
    pub fn save(&self) -> Result<Vec<u8>, StateEncodeError> {
        self.state.encode(self.last_tick.unwrap_or(0))
    }

    /// Rebuild a controller from [`save`](Self::save) output.
    pub fn restore(config: ControllerConfig, data: &[u8]) -> Result<Self, StateDecodeError> {
        let (header, state) = State::decode(data)?;
        Ok(Self {
            config,
            state,
            last_tick: Some(header.tick),
        })
    }
}
