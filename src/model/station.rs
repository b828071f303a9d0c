//! Station in the transit network.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use super::LineName;

/// Stable station identifier (the table's `OBJECTID`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub u64);

impl std::fmt::Display for StationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Planar position. Opaque to the inference engine; only renderers read it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// `(y, x)` — the (latitude, longitude) order map renderers expect when
    /// `x` holds longitude.
    pub fn lat_lon(&self) -> (f64, f64) {
        (self.y, self.x)
    }
}

/// Per-line position scores. A missing key means the line does not serve
/// the station.
pub type ScoreMap = HashMap<LineName, f64>;

/// A station with its per-line position scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub coordinate: Coordinate,
    scores: ScoreMap,
}

impl Station {
    pub fn new(id: StationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            coordinate: Coordinate::default(),
            scores: ScoreMap::new(),
        }
    }

    pub fn with_coordinate(mut self, x: f64, y: f64) -> Self {
        self.coordinate = Coordinate::new(x, y);
        self
    }

    pub fn with_score(mut self, line: impl Into<LineName>, score: f64) -> Self {
        self.set_score(line, score);
        self
    }

    /// Set the score on `line`. Non-finite values mark the line as absent,
    /// so a NaN never takes part in a comparison.
    pub fn set_score(&mut self, line: impl Into<LineName>, score: f64) {
        let line = line.into();
        if score.is_finite() {
            self.scores.insert(line, score);
        } else {
            self.scores.remove(&line);
        }
    }

    /// Score on `line`, or `None` when the line does not serve this station.
    pub fn score(&self, line: &str) -> Option<f64> {
        self.scores.get(line).copied()
    }

    pub fn serves(&self, line: &str) -> bool {
        self.scores.contains_key(line)
    }

    pub fn scores(&self) -> &ScoreMap {
        &self.scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_score_is_absent() {
        let s = Station::new(StationId(1), "Bank")
            .with_score("Central", 12.0)
            .with_score("Northern", f64::NAN)
            .with_score("Waterloo", f64::INFINITY);

        assert_eq!(s.score("Central"), Some(12.0));
        assert_eq!(s.score("Northern"), None);
        assert!(!s.serves("Waterloo"));
    }

    #[test]
    fn test_nan_clears_existing_score() {
        let mut s = Station::new(StationId(1), "Bank").with_score("Central", 12.0);
        s.set_score("Central", f64::NAN);
        assert!(s.scores().is_empty());
    }

    #[test]
    fn test_lat_lon_swaps_axes() {
        let c = Coordinate::new(-0.1248, 51.5081);
        assert_eq!(c.lat_lon(), (51.5081, -0.1248));
    }
}
