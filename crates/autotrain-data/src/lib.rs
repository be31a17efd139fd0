//! Scenario files for the autotrain controller.
//!
//! A scenario directory holds a required `network.{ron,toml,json}` and an
//! optional `controller.{ron,toml,json}`. [`load_scenario`] resolves them
//! into an in-memory network; [`ScenarioRunner`] drives it offline.

pub mod loader;
pub mod runner;
pub mod schema;

pub use loader::{load_config, load_scenario, DataLoadError, Scenario};
pub use runner::ScenarioRunner;
