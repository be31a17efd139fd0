//! Typed signals read from station wire networks.
//!
//! A signal is either a transportable resource (an item or a fluid) or a
//! virtual control marker. Equality is always kind-and-name: an item and a
//! fluid that happen to share a name never match.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Signal identity
// ---------------------------------------------------------------------------

/// Discriminant of a [`ResourceSignal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Item,
    Fluid,
    Virtual,
}

/// A named, typed signal.
///
/// Variant order matters: carried contents are keyed by this type in a
/// `BTreeMap`, so items sort before fluids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceSignal {
    Item(String),
    Fluid(String),
    Virtual(String),
}

impl ResourceSignal {
    pub fn item(name: impl Into<String>) -> Self {
        Self::Item(name.into())
    }

    pub fn fluid(name: impl Into<String>) -> Self {
        Self::Fluid(name.into())
    }

    pub fn virtual_signal(name: impl Into<String>) -> Self {
        Self::Virtual(name.into())
    }

    pub fn new(kind: SignalKind, name: impl Into<String>) -> Self {
        match kind {
            SignalKind::Item => Self::Item(name.into()),
            SignalKind::Fluid => Self::Fluid(name.into()),
            SignalKind::Virtual => Self::Virtual(name.into()),
        }
    }

    pub fn kind(&self) -> SignalKind {
        match self {
            Self::Item(_) => SignalKind::Item,
            Self::Fluid(_) => SignalKind::Fluid,
            Self::Virtual(_) => SignalKind::Virtual,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Item(name) | Self::Fluid(name) | Self::Virtual(name) => name,
        }
    }

    /// Items and fluids can be carried; virtual markers cannot.
    pub fn is_transportable(&self) -> bool {
        !matches!(self, Self::Virtual(_))
    }

    pub fn is_fluid(&self) -> bool {
        matches!(self, Self::Fluid(_))
    }

    /// Kind-and-name equality.
    pub fn matches(&self, other: &ResourceSignal) -> bool {
        self.kind() == other.kind() && self.name() == other.name()
    }
}

impl fmt::Display for ResourceSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind() {
            SignalKind::Item => "item",
            SignalKind::Fluid => "fluid",
            SignalKind::Virtual => "virtual",
        };
        write!(f, "{kind}/{}", self.name())
    }
}

/// Compare two possibly-absent signals.
///
/// Two absent signals match each other; an absent signal never matches a
/// concrete one.
pub fn signals_match(a: Option<&ResourceSignal>, b: Option<&ResourceSignal>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.matches(b),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Signal readouts
// ---------------------------------------------------------------------------

/// One entry of a wire network readout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalCount {
    pub signal: ResourceSignal,
    pub count: i64,
}

impl SignalCount {
    pub fn new(signal: ResourceSignal, count: i64) -> Self {
        Self { signal, count }
    }
}

/// Wire color. Red carries markers and demand levels, green carries stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireColor {
    Red,
    Green,
}

/// Contents carried by a unit. Sorted so the first key is the first item,
/// falling back to the first fluid.
pub type Contents = BTreeMap<ResourceSignal, i64>;

/// Count of `signal` in a readout, treating "absent" as zero.
pub fn count_of(signals: &[SignalCount], signal: &ResourceSignal) -> i64 {
    signals
        .iter()
        .filter(|s| s.signal.matches(signal))
        .map(|s| s.count)
        .sum()
}

/// True if `signal` is present with a positive count.
pub fn has_positive(signals: &[SignalCount], signal: &ResourceSignal) -> bool {
    signals.iter().any(|s| s.signal.matches(signal) && s.count > 0)
}

/// The signal a unit is carrying: its first item, else its first fluid.
pub fn content_signal(contents: &Contents) -> Option<&ResourceSignal> {
    contents
        .iter()
        .find(|(signal, count)| signal.is_transportable() && **count > 0)
        .map(|(signal, _)| signal)
}
