//! # transit-topology — Transit Network Reconstruction
//!
//! Rebuilds a transit network multigraph from a per-station table of
//! position scores, one score column per line. Adjacency is never stated in
//! the table; it is inferred from score differences that match a fixed
//! [`ToleranceCatalogue`].
//!
//! ## Design Principles
//!
//! 1. **Pure core**: [`infer`] is a total function of stations, lines and
//!    catalogue — no I/O, no shared state
//! 2. **Injected catalogue**: offsets are configuration, not constants baked
//!    into the algorithm
//! 3. **Clean DTOs**: `Station`, `Edge`, `LineName` cross all boundaries
//! 4. **Rendering is downstream**: this crate stops at the graph and its
//!    export documents
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use transit_topology::{Config, Network};
//!
//! # fn example() -> transit_topology::Result<()> {
//! let config = Config::default();
//! let network = Network::load_csv_path("Stations2018_Updated.csv", &config)?;
//!
//! for edge in network.graph().edges_on_line("Victoria") {
//!     println!("{} -> {} ({:?})", edge.src, edge.dst, edge.direction);
//! }
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod tolerance;
pub mod inference;
pub mod graph;
pub mod palette;
pub mod loader;
pub mod config;
pub mod export;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Station, StationId, Coordinate, LineName,
    Edge, EdgeId, DirectionClass, Direction,
};

// ============================================================================
// Re-exports: Engine
// ============================================================================

pub use tolerance::{ToleranceCatalogue, OffsetClass, OffsetMatch};
pub use inference::{infer, infer_with_stats, infer_parallel, InferenceStats};
pub use graph::{NetworkGraph, NodeInfo, EdgeKey};

// ============================================================================
// Re-exports: Collaborators
// ============================================================================

pub use palette::{LinePalette, DisplayCategory};
pub use loader::{StationTable, TableLayout, LineColumns};
pub use config::Config;

use std::io::Write;
use std::path::Path;

// ============================================================================
// Top-level Network handle
// ============================================================================

/// The primary entry point: a station table, its inferred multigraph and
/// the palette renderers should use.
#[derive(Debug, Clone)]
pub struct Network {
    table: StationTable,
    graph: NetworkGraph,
    palette: LinePalette,
}

impl Network {
    /// Infer the network for an already-loaded table.
    ///
    /// `config.lines` restricts which table lines take part;
    /// `config.threads > 1` runs the per-line scans in parallel.
    pub fn from_table(table: StationTable, config: &Config) -> Self {
        let lines = config.select_lines(&table.lines);
        let graph = if config.threads > 1 {
            infer_parallel(&table.stations, &lines, &config.catalogue, config.threads)
        } else {
            infer(&table.stations, &lines, &config.catalogue)
        };
        tracing::info!(
            stations = graph.node_count(),
            edges = graph.edge_count(),
            lines = lines.len(),
            memory_bytes = graph.memory_usage(),
            "network inferred"
        );
        Self { table, graph, palette: config.effective_palette() }
    }

    /// Load a CSV station table and infer its network.
    pub fn load_csv<R: std::io::Read>(reader: R, config: &Config) -> Result<Self> {
        let table = loader::load_csv(reader, &config.table)?;
        Ok(Self::from_table(table, config))
    }

    pub fn load_csv_path(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let table = loader::load_csv_path(path, &config.table)?;
        Ok(Self::from_table(table, config))
    }

    pub fn table(&self) -> &StationTable {
        &self.table
    }

    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    pub fn palette(&self) -> &LinePalette {
        &self.palette
    }

    /// Write the JSON document for the rendering collaborator.
    pub fn export_json(&self, writer: &mut dyn Write) -> Result<()> {
        export::export_json(&self.graph, &self.palette, writer)
    }

    /// Write a Cypher script; edge colours come from the network's palette.
    pub fn export_cypher_dump(&self, writer: &mut dyn Write) -> Result<()> {
        export::export_cypher_dump(&self.graph, &self.palette, writer)
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid value {value:?} in column {column} at row {row}")]
    InvalidValue { row: usize, column: String, value: String },

    #[error("Duplicate station id {id} at row {row}")]
    DuplicateStation { id: StationId, row: usize },

    #[error("Tolerance catalogue error: {0}")]
    Catalogue(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
