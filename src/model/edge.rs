//! Inferred adjacency (edge) in the transit multigraph.

use serde::{Deserialize, Serialize};
use super::{LineName, StationId};

/// Opaque edge identifier: the edge's position in its graph's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub u64);

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether trains run both ways along an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionClass {
    /// Ordinary two-way track (symmetric offset).
    Bidirectional,
    /// One-way loop or spur (asymmetric offset), running `src` → `dst`.
    Directional,
}

impl DirectionClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectionClass::Bidirectional => "bidirectional",
            DirectionClass::Directional => "directional",
        }
    }
}

/// Traversal direction for neighbourhood queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Outgoing,
    Incoming,
    Both,
}

/// An adjacency between two stations on one line.
///
/// For [`DirectionClass::Directional`] edges `src` is the lower-scored
/// station and `score_diff` is `score(dst) - score(src)`, always positive.
/// For bidirectional edges `score_diff` is the absolute difference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub src: StationId,
    pub dst: StationId,
    pub line: LineName,
    pub direction: DirectionClass,
    pub score_diff: f64,
    /// The catalogue value that justified this edge.
    pub offset: f64,
}

impl Edge {
    pub fn is_directional(&self) -> bool {
        self.direction == DirectionClass::Directional
    }

    /// The "other" end of the edge from the given station.
    pub fn other_end(&self, from: StationId) -> Option<StationId> {
        if from == self.src { Some(self.dst) }
        else if from == self.dst { Some(self.src) }
        else { None }
    }

    /// True if a train can run from `a` to `b` along this edge.
    pub fn connects(&self, a: StationId, b: StationId) -> bool {
        match self.direction {
            DirectionClass::Directional => self.src == a && self.dst == b,
            DirectionClass::Bidirectional => {
                (self.src == a && self.dst == b) || (self.src == b && self.dst == a)
            }
        }
    }

    /// True if the edge can be entered from `station`.
    pub fn leaves(&self, station: StationId) -> bool {
        match self.direction {
            DirectionClass::Directional => self.src == station,
            DirectionClass::Bidirectional => self.src == station || self.dst == station,
        }
    }

    /// True if the edge can be left at `station`.
    pub fn arrives(&self, station: StationId) -> bool {
        match self.direction {
            DirectionClass::Directional => self.dst == station,
            DirectionClass::Bidirectional => self.src == station || self.dst == station,
        }
    }
}
