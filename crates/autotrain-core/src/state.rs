//! The controller's carried state and its persisted form.
//!
//! [`State`] is produced once per tick and handed to the next tick as its
//! previous state. It can be written out with a versioned `bitcode` header
//! so the most recent state survives a host restart.

use serde::{Deserialize, Serialize};

use crate::id::StationId;
use crate::signal::ResourceSignal;

// ---------------------------------------------------------------------------
// Demand / supply entries
// ---------------------------------------------------------------------------

/// One unit-load of outstanding demand at a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demand {
    pub station: StationId,
    pub station_name: String,
    pub signal: ResourceSignal,
    pub quantity: i64,
}

/// Whole loads a supply station can still hand out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supply {
    pub station: StationId,
    pub station_name: String,
    pub signal: ResourceSignal,
    pub available: i64,
    /// Units that may still be sent here. `None` when uncapped.
    pub remaining_unit_slots: Option<u32>,
}

impl Supply {
    /// Whether another unit may be sent here for `quantity`.
    pub fn can_serve(&self, quantity: i64) -> bool {
        self.available >= quantity && self.remaining_unit_slots != Some(0)
    }

    /// Book one unit carrying `quantity`. Returns `true` once the entry is
    /// exhausted.
    pub fn consume(&mut self, quantity: i64) -> bool {
        self.available -= quantity;
        if let Some(slots) = &mut self.remaining_unit_slots {
            *slots = slots.saturating_sub(1);
        }
        self.available <= 0 || self.remaining_unit_slots == Some(0)
    }
}

/// Demand entries are the same job if station, signal and quantity all
/// agree. A changed quantity is a different job.
pub fn same_demand(a: &Demand, b: &Demand) -> bool {
    a.station == b.station && a.signal.matches(&b.signal) && a.quantity == b.quantity
}

/// Supply entries are the same offer if station and signal agree.
pub fn same_supply(a: &Supply, b: &Supply) -> bool {
    a.station == b.station && a.signal.matches(&b.signal)
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Residual demand and supply after a tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub demands: Vec<Demand>,
    pub supplies: Vec<Supply>,
}

impl State {
    pub fn new(demands: Vec<Demand>, supplies: Vec<Supply>) -> Self {
        Self { demands, supplies }
    }

    pub fn is_empty(&self) -> bool {
        self.demands.is_empty() && self.supplies.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// Magic number identifying a persisted controller state.
pub const STATE_MAGIC: u32 = 0xA7_7A_0001;

/// Current format version. Increment when breaking the wire format.
pub const STATE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum StateEncodeError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StateDecodeError {
    #[error("invalid magic number: expected 0x{:08X}, got 0x{:08X}", STATE_MAGIC, .0)]
    InvalidMagic(u32),
    #[error("unsupported format version: expected {}, got {}", STATE_FORMAT_VERSION, .0)]
    UnsupportedVersion(u32),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
}

/// Header stored in front of every persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateHeader {
    pub magic: u32,
    pub version: u32,
    /// World tick the state was computed on.
    pub tick: u64,
}

impl StateHeader {
    pub fn new(tick: u64) -> Self {
        Self {
            magic: STATE_MAGIC,
            version: STATE_FORMAT_VERSION,
            tick,
        }
    }

    pub fn validate(&self) -> Result<(), StateDecodeError> {
        if self.magic != STATE_MAGIC {
            return Err(StateDecodeError::InvalidMagic(self.magic));
        }
        if self.version != STATE_FORMAT_VERSION {
            return Err(StateDecodeError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct PersistedState {
    header: StateHeader,
    state: State,
}

impl State {
    /// Serialize with a versioned header.
    pub fn encode(&self, tick: u64) -> Result<Vec<u8>, StateEncodeError> {
        let persisted = PersistedState {
            header: StateHeader::new(tick),
            state: self.clone(),
        };
        bitcode::serialize(&persisted).map_err(|e| StateEncodeError::Encode(e.to_string()))
    }

    /// Deserialize and validate the header.
    pub fn decode(data: &[u8]) -> Result<(StateHeader, State), StateDecodeError> {
        let persisted: PersistedState =
            bitcode::deserialize(data).map_err(|e| StateDecodeError::Decode(e.to_string()))?;
        persisted.header.validate()?;
        Ok((persisted.header, persisted.state))
    }
}
