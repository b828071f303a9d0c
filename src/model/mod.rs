//! # Transit Network Model
//!
//! Plain DTOs shared by the loader, the inference engine, the multigraph
//! and the exporters.
//!
//! Design rule: NO CSV types, NO serde_json values, NO rendering types here.
//! This module is pure data — no I/O, no state.

pub mod station;
pub mod line;
pub mod edge;

pub use station::{Station, StationId, Coordinate, ScoreMap};
pub use line::LineName;
pub use edge::{Edge, EdgeId, DirectionClass, Direction};
