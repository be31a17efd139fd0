//! Route specifications: the wire format between the dispatcher and a
//! unit actuator.
//!
//! A route is an ordered list of waypoints plus the index of the waypoint
//! the unit is currently heading to (or waiting at). Waypoint order is
//! preserved exactly as built.

use serde::{Deserialize, Serialize};

/// What a unit waits for before leaving a waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitCondition {
    None,
    Full,
    Empty,
}

/// How a waypoint's condition combines with others. Only conjunction is
/// emitted by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareType {
    And,
    Or,
}

/// A single stop on a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Display name of the station.
    pub station: String,
    pub wait: WaitCondition,
    pub compare: CompareType,
}

impl Waypoint {
    pub fn new(station: impl Into<String>, wait: WaitCondition) -> Self {
        Self {
            station: station.into(),
            wait,
            compare: CompareType::And,
        }
    }
}

/// An ordered route with a cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSpec {
    /// Index into `waypoints` of the active stop.
    pub current: usize,
    pub waypoints: Vec<Waypoint>,
}

impl RouteSpec {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self {
            current: 0,
            waypoints,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn current_waypoint(&self) -> Option<&Waypoint> {
        self.waypoints.get(self.current)
    }

    /// A waypoint is a pickup if it waits for `Full` and a delivery
    /// (`Empty`) follows it. The trailing re-arm stop at a depot waits for
    /// `Full` too, but nothing follows it.
    pub fn is_pickup(&self, index: usize) -> bool {
        matches!(
            self.waypoints.get(index),
            Some(w) if w.wait == WaitCondition::Full
        ) && self.delivery_after(index).is_some()
    }

    /// The first delivery waypoint strictly after `index`.
    pub fn delivery_after(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints
            .iter()
            .skip(index + 1)
            .find(|w| w.wait == WaitCondition::Empty)
    }

    /// Station the unit is currently heading to for a pickup, if any.
    pub fn pending_pickup(&self) -> Option<&str> {
        if self.is_pickup(self.current) {
            self.current_waypoint().map(|w| w.station.as_str())
        } else {
            None
        }
    }

    /// Station the unit will deliver to after its pending pickup.
    pub fn delivery_for_pending_pickup(&self) -> Option<&str> {
        if self.is_pickup(self.current) {
            self.delivery_after(self.current).map(|w| w.station.as_str())
        } else {
            None
        }
    }

    /// Station the unit is currently heading to for a delivery, if any.
    pub fn pending_delivery(&self) -> Option<&str> {
        self.current_waypoint()
            .filter(|w| w.wait == WaitCondition::Empty)
            .map(|w| w.station.as_str())
    }

    /// Advance the cursor. Returns `false` once the last waypoint is
    /// reached, leaving the cursor there.
    pub fn advance(&mut self) -> bool {
        if self.current + 1 < self.waypoints.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }
}
