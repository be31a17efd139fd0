//! Autotrain Core -- a periodic logistics controller for rail networks.
//!
//! Stations advertise a role through marker signals on their red wire:
//! demand stations request a resource, supply stations offer stock on
//! their green wire, and depots park idle transport units. Every control
//! tick the controller reads the whole network, works out how much each
//! station still needs or can give after the units already moving for it,
//! and sends idle units on pickup / delivery / return routes.
//!
//! # Tick Pipeline
//!
//! Each call to [`controller::run_tick`] runs:
//!
//! 1. **Snapshot** -- Classify stations, read units, compute balances.
//! 2. **Expand** -- Split balances into one entry per wagon load.
//! 3. **Diff** -- Compare fresh demand against last tick's residual.
//! 4. **Allocate** -- First-fit match demand to supply and an idle unit.
//! 5. **Dispatch** -- Write the capacity limiter and route to each unit.
//!
//! # Key Types
//!
//! - [`network::Network`] -- The host-facing read/write interface.
//! - [`memory::MemoryNetwork`] -- In-memory network for tests and offline
//!   scenario runs.
//! - [`controller::Controller`] -- Carries state between ticks and applies
//!   the tick cadence.
//! - [`state::State`] -- Residual demand and supply, persisted via bitcode.
//! - [`catalog::ItemTable`] -- Item stack sizes, frozen at startup.

pub mod allocator;
pub mod balance;
pub mod capacity;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod diff;
pub mod dispatch;
pub mod id;
pub mod memory;
pub mod network;
pub mod report;
pub mod route;
pub mod signal;
pub mod snapshot;
pub mod state;
pub mod station;
pub mod unit;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
