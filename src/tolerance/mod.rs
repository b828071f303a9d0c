//! # Tolerance Catalogue
//!
//! The fixed sets of score differences that count as an adjacency.
//!
//! Scores pack branch depth into decimal scale: neighbours on the main stem
//! differ by `1`, on a first sub-branch by `0.01`, on a second by `0.0001`
//! and so on. One-way loops and spurs are encoded with large offsets that
//! can never collide with the branch scale.
//!
//! ```text
//! symmetric  (two-way):  1, 0.01, 0.0001, 0.000001
//! asymmetric (one-way):  100, 700, 1000, 5000, 10000, 10001
//! ```
//!
//! Some asymmetric values (700, 10001) patch single real-world station
//! pairs rather than follow the scheme. Keep them as literal data.

use serde::{Deserialize, Serialize};

use crate::model::DirectionClass;
use crate::{Error, Result};

/// Symmetric offsets of the London table.
pub const LONDON_SYMMETRIC: [f64; 4] = [1.0, 0.01, 0.0001, 0.000001];

/// Asymmetric offsets of the London table (Heathrow T4 loop, Croydon tram loop).
pub const LONDON_ASYMMETRIC: [f64; 6] = [100.0, 700.0, 1000.0, 5000.0, 10000.0, 10001.0];

/// Absolute matching tolerance of the London table.
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Which half of the catalogue an offset belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetClass {
    Symmetric,
    Asymmetric,
}

impl OffsetClass {
    pub fn direction(&self) -> DirectionClass {
        match self {
            OffsetClass::Symmetric => DirectionClass::Bidirectional,
            OffsetClass::Asymmetric => DirectionClass::Directional,
        }
    }
}

/// One catalogue entry matched by a score difference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetMatch {
    pub class: OffsetClass,
    pub offset: f64,
}

/// Ordered symmetric and asymmetric offsets plus the matching epsilon.
///
/// Callers must keep the two lists disjoint (no value within `epsilon` of
/// another). [`ToleranceCatalogue::validate`] checks this; the inference
/// engine never does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToleranceCatalogue {
    /// Free-form label (e.g. a version tag) shown in logs.
    pub name: Option<String>,
    pub symmetric: Vec<f64>,
    pub asymmetric: Vec<f64>,
    pub epsilon: f64,
}

impl Default for ToleranceCatalogue {
    fn default() -> Self {
        Self::london()
    }
}

impl ToleranceCatalogue {
    pub fn new(symmetric: Vec<f64>, asymmetric: Vec<f64>, epsilon: f64) -> Self {
        Self { name: None, symmetric, asymmetric, epsilon }
    }

    /// The catalogue used for the London Underground / Overground / DLR /
    /// tram table.
    pub fn london() -> Self {
        Self {
            name: Some("london".into()),
            symmetric: LONDON_SYMMETRIC.to_vec(),
            asymmetric: LONDON_ASYMMETRIC.to_vec(),
            epsilon: DEFAULT_EPSILON,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.symmetric.len() + self.asymmetric.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symmetric.is_empty() && self.asymmetric.is_empty()
    }

    /// Every catalogue entry within `epsilon` of `diff`, symmetric entries
    /// first, each list in its declared order.
    ///
    /// `diff` is an absolute score difference. The comparison is strict:
    /// `|diff - t| < epsilon`.
    pub fn matches(&self, diff: f64) -> impl Iterator<Item = OffsetMatch> + '_ {
        let eps = self.epsilon;
        let sym = self
            .symmetric
            .iter()
            .filter(move |&&t| (diff - t).abs() < eps)
            .map(|&offset| OffsetMatch { class: OffsetClass::Symmetric, offset });
        let asym = self
            .asymmetric
            .iter()
            .filter(move |&&t| (diff - t).abs() < eps)
            .map(|&offset| OffsetMatch { class: OffsetClass::Asymmetric, offset });
        sym.chain(asym)
    }

    /// Classify a difference by its first matching entry, if any.
    pub fn classify(&self, diff: f64) -> Option<OffsetMatch> {
        self.matches(diff).next()
    }

    /// Check the catalogue is well-formed.
    ///
    /// - `epsilon` is finite and positive
    /// - every offset is finite and larger than `epsilon`
    /// - no two entries, in the same list or across lists, lie within
    ///   `epsilon` of each other
    pub fn validate(&self) -> Result<()> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(Error::Catalogue(format!(
                "epsilon must be finite and positive, got {}",
                self.epsilon
            )));
        }

        let entries: Vec<(OffsetClass, f64)> = self
            .symmetric
            .iter()
            .map(|&t| (OffsetClass::Symmetric, t))
            .chain(self.asymmetric.iter().map(|&t| (OffsetClass::Asymmetric, t)))
            .collect();

        for &(class, t) in &entries {
            if !t.is_finite() || t <= self.epsilon {
                return Err(Error::Catalogue(format!(
                    "{class:?} offset {t} must be finite and greater than epsilon {}",
                    self.epsilon
                )));
            }
        }

        for (i, &(class_a, a)) in entries.iter().enumerate() {
            for &(class_b, b) in &entries[i + 1..] {
                if (a - b).abs() < self.epsilon {
                    return Err(Error::Catalogue(format!(
                        "{class_a:?} offset {a} and {class_b:?} offset {b} overlap within epsilon {}",
                        self.epsilon
                    )));
                }
            }
        }

        Ok(())
    }
}
