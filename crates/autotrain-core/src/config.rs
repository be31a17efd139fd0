//! Controller configuration.
//!
//! Every field has a default, so hosts can deserialize a partial file (or
//! nothing at all) and get the stock behavior.

use serde::{Deserialize, Serialize};

use crate::signal::ResourceSignal;

/// Default control-loop cadence, in world ticks.
pub const DEFAULT_INTERVAL: u64 = 60;
/// Default wagon slot count when neither the station nor the unit overrides it.
pub const DEFAULT_WAGON_SLOTS: u32 = 40;
/// Fixed fluid wagon volume, independent of slots.
pub const DEFAULT_FLUID_WAGON_CAPACITY: i64 = 25_000;

/// Names of the virtual marker signals read from a station's red wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSignals {
    pub demand: String,
    pub supply: String,
    pub depot: String,
    /// Per-station wagon slot override.
    pub slots: String,
    /// Per-station cap on units concurrently assigned to pick up there.
    pub max_units: String,
}

impl Default for MarkerSignals {
    fn default() -> Self {
        Self {
            demand: "signal-D".to_string(),
            supply: "signal-S".to_string(),
            depot: "signal-0".to_string(),
            slots: "signal-W".to_string(),
            max_units: "signal-T".to_string(),
        }
    }
}

impl MarkerSignals {
    pub fn demand_signal(&self) -> ResourceSignal {
        ResourceSignal::virtual_signal(self.demand.as_str())
    }

    pub fn supply_signal(&self) -> ResourceSignal {
        ResourceSignal::virtual_signal(self.supply.as_str())
    }

    pub fn depot_signal(&self) -> ResourceSignal {
        ResourceSignal::virtual_signal(self.depot.as_str())
    }

    pub fn slots_signal(&self) -> ResourceSignal {
        ResourceSignal::virtual_signal(self.slots.as_str())
    }

    pub fn max_units_signal(&self) -> ResourceSignal {
        ResourceSignal::virtual_signal(self.max_units.as_str())
    }
}

/// Tunables for the control loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// The loop runs on world ticks where `tick % interval == 0`.
    pub interval: u64,
    pub default_wagon_slots: u32,
    pub fluid_wagon_capacity: i64,
    /// Extra slots granted on top of the exact load when limiting a unit.
    pub limiter_margin_slots: u32,
    pub markers: MarkerSignals,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            default_wagon_slots: DEFAULT_WAGON_SLOTS,
            fluid_wagon_capacity: DEFAULT_FLUID_WAGON_CAPACITY,
            limiter_margin_slots: 1,
            markers: MarkerSignals::default(),
        }
    }
}

impl ControllerConfig {
    /// True if the loop should run on this world tick. A zero interval is
    /// treated as "every tick".
    pub fn is_control_tick(&self, tick: u64) -> bool {
        self.interval == 0 || tick % self.interval == 0
    }
}
