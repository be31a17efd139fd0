//! Offline driver: runs the controller against a loaded scenario and moves
//! units between control ticks.

use autotrain_core::controller::Controller;
use autotrain_core::memory::MemoryNetwork;
use autotrain_core::report::TickReport;
use autotrain_core::state::State;
use tracing::trace;

use crate::loader::Scenario;

/// Drives world ticks over a [`Scenario`].
///
/// The controller runs on its configured cadence. After each control run
/// every unit advances one step along its route, so a dispatched unit
/// reaches its pickup on the next control tick.
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    scenario: Scenario,
    controller: Controller,
    tick: u64,
}

impl ScenarioRunner {
    pub fn new(scenario: Scenario) -> Self {
        let controller = Controller::new(scenario.config.clone());
        Self {
            scenario,
            controller,
            tick: 0,
        }
    }

    /// Start from a carried-over state instead of an empty one.
    pub fn with_state(scenario: Scenario, state: State) -> Self {
        let controller = Controller::with_state(scenario.config.clone(), state);
        Self {
            scenario,
            controller,
            tick: 0,
        }
    }

    /// The next world tick to run.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn network(&self) -> &MemoryNetwork {
        &self.scenario.network
    }

    pub fn network_mut(&mut self) -> &mut MemoryNetwork {
        &mut self.scenario.network
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Advance one world tick. Returns the report if the controller ran.
    pub fn step(&mut self) -> Option<TickReport> {
        let report = self.controller.on_tick(&mut self.scenario.network, self.tick);
        if report.is_some() {
            self.scenario.network.step_units();
            trace!(tick = self.tick, "units stepped");
        }
        self.tick += 1;
        report
    }

    /// Advance `ticks` world ticks, collecting every control report.
    pub fn run(&mut self, ticks: u64) -> Vec<TickReport> {
        (0..ticks).filter_map(|_| self.step()).collect()
    }

    /// Advance until the controller has run `count` more times.
    pub fn run_control_ticks(&mut self, count: usize) -> Vec<TickReport> {
        let mut reports = Vec::with_capacity(count);
        while reports.len() < count {
            if let Some(report) = self.step() {
                reports.push(report);
            }
        }
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::build_scenario;
    use crate::schema::NetworkData;
    use autotrain_core::config::ControllerConfig;
    use autotrain_core::network::TransportUnitActuator;
    use autotrain_core::signal::{ResourceSignal, WireColor};
    use std::path::Path;

    fn shuttle() -> Scenario {
        let data: NetworkData = ron::from_str(
            r#"#![enable(implicit_some)]
(
    items: [(name: "iron-plate", stack_size: 100)],
    stations: [
        (name: "Depot", role: depot),
        (name: "Mine", role: supply, green: [(name: "iron-plate", count: 5000)]),
        (name: "Smelter", role: demand, red: [(name: "iron-plate", count: 5000)]),
    ],
    units: [(name: "T1", kind: bulk_carrier, at: "Depot")],
)"#,
        )
        .unwrap();
        let config = ControllerConfig {
            interval: 10,
            ..ControllerConfig::default()
        };
        build_scenario(&data, config, Path::new("inline.ron")).unwrap()
    }

    #[test]
    fn controller_runs_on_cadence() {
        let mut runner = ScenarioRunner::new(shuttle());
        let reports = runner.run(25);
        let ticks: Vec<_> = reports.iter().map(|r| r.tick).collect();
        assert_eq!(ticks, vec![0, 10, 20]);
        assert_eq!(runner.tick(), 25);
    }

    #[test]
    fn shuttle_delivers_one_load_and_parks() {
        let mut runner = ScenarioRunner::new(shuttle());
        let reports = runner.run_control_ticks(6);
        assert_eq!(reports[0].dispatched.len(), 1);
        assert!(reports[1..].iter().all(|r| r.dispatched.is_empty()));

        let scenario = runner.scenario();
        let plate = ResourceSignal::item("iron-plate");
        let smelter = scenario.station("Smelter").unwrap();
        let mine = scenario.station("Mine").unwrap();
        assert_eq!(runner.network().signal(smelter, WireColor::Green, &plate), 4100);
        assert_eq!(runner.network().signal(mine, WireColor::Green, &plate), 900);

        let unit = scenario.unit("T1").unwrap();
        assert_eq!(runner.network().current_station(unit), scenario.station("Depot"));
        assert!(runner.network().carried_contents(unit).is_empty());
    }
}
