//! # Station Table Loader
//!
//! Reads the station table (one row per station) from CSV into
//! [`Station`]s. Which columns hold identity, coordinates and line scores
//! is a [`TableLayout`] concern; the inference engine never sees columns.
//!
//! ```text
//! OBJECTID,NAME,x,y,...,Bakerloo,Central,...,Elizabeth
//! 17,Bank,-0.0886,51.5133,...,,12,...,
//! ```
//!
//! Missing columns are fatal and reported once, at load time.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::model::*;
use crate::{Error, Result};

/// Which header columns hold line scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineColumns {
    /// Contiguous slice from `first` through `last` (inclusive), by header name.
    Between { first: String, last: String },
    /// Half-open positional slice `start..end` of the header.
    Range { start: usize, end: usize },
    /// Explicit column names, in the given order.
    Named(Vec<String>),
}

/// `Bakerloo` through `Elizabeth` by name.
///
/// Assumes the London table keeps those two as its first and last line
/// columns. A line column added after `Elizabeth` is not picked up; use
/// [`LineColumns::london_positional`] or `Named` for such tables.
impl Default for LineColumns {
    fn default() -> Self {
        LineColumns::Between { first: "Bakerloo".into(), last: "Elizabeth".into() }
    }
}

impl LineColumns {
    /// The London table's line block by position: header columns 9 to 32.
    pub fn london_positional() -> Self {
        LineColumns::Range { start: 9, end: 33 }
    }

    /// Resolve to `(header position, line name)` pairs.
    fn resolve(&self, headers: &csv::StringRecord) -> Result<Vec<(usize, LineName)>> {
        let position = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| Error::MissingColumn(name.to_string()))
        };

        let positions: Vec<usize> = match self {
            LineColumns::Between { first, last } => {
                let (start, end) = (position(first)?, position(last)?);
                if start > end {
                    return Err(Error::Config(format!(
                        "line columns: {first:?} (position {start}) comes after {last:?} (position {end})"
                    )));
                }
                (start..=end).collect()
            }
            LineColumns::Range { start, end } => {
                if start >= end || *end > headers.len() {
                    return Err(Error::Config(format!(
                        "line columns: range {start}..{end} does not fit a header of {} columns",
                        headers.len()
                    )));
                }
                (*start..*end).collect()
            }
            LineColumns::Named(names) => names.iter().map(|n| position(n)).collect::<Result<_>>()?,
        };

        Ok(positions
            .into_iter()
            .map(|p| (p, LineName::from(&headers[p])))
            .collect())
    }
}

/// Column layout of the station table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableLayout {
    pub id_column: String,
    pub name_column: String,
    pub x_column: String,
    pub y_column: String,
    pub line_columns: LineColumns,
    /// Cell values read as "line does not serve this station".
    pub absent_markers: Vec<String>,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            id_column: "OBJECTID".into(),
            name_column: "NAME".into(),
            x_column: "x".into(),
            y_column: "y".into(),
            line_columns: LineColumns::default(),
            absent_markers: ["", "NaN", "nan", "NA", "N/A"].map(String::from).to_vec(),
        }
    }
}

/// Loaded stations plus the line columns they were scored on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationTable {
    pub lines: Vec<LineName>,
    pub stations: Vec<Station>,
}

impl StationTable {
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }

    pub fn station_by_name(&self, name: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.name == name)
    }
}

struct Columns {
    id: usize,
    name: usize,
    x: usize,
    y: usize,
    lines: Vec<(usize, LineName)>,
}

impl Columns {
    fn resolve(layout: &TableLayout, headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| Error::MissingColumn(name.to_string()))
        };
        Ok(Self {
            id: find(&layout.id_column)?,
            name: find(&layout.name_column)?,
            x: find(&layout.x_column)?,
            y: find(&layout.y_column)?,
            lines: layout.line_columns.resolve(headers)?,
        })
    }
}

/// Load a station table from CSV with a header row.
pub fn load_csv<R: Read>(reader: R, layout: &TableLayout) -> Result<StationTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let cols = Columns::resolve(layout, &headers)?;
    debug!(lines = cols.lines.len(), "resolved station table columns");

    let is_absent = |cell: &str| layout.absent_markers.iter().any(|m| m == cell);
    let mut seen = hashbrown::HashSet::new();
    let mut stations = Vec::new();

    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        // header is line 1
        let row = i + 2;
        let cell = |pos: usize| record.get(pos).unwrap_or("");
        let number = |pos: usize| -> Result<f64> {
            let raw = cell(pos);
            raw.parse::<f64>().map_err(|_| Error::InvalidValue {
                row,
                column: headers[pos].to_string(),
                value: raw.to_string(),
            })
        };

        let raw_id = cell(cols.id);
        let id = raw_id.parse::<u64>().map(StationId).map_err(|_| Error::InvalidValue {
            row,
            column: layout.id_column.clone(),
            value: raw_id.to_string(),
        })?;
        if !seen.insert(id) {
            return Err(Error::DuplicateStation { id, row });
        }

        let mut station = Station::new(id, cell(cols.name)).with_coordinate(number(cols.x)?, number(cols.y)?);
        for (pos, line) in &cols.lines {
            if is_absent(cell(*pos)) {
                continue;
            }
            station.set_score(line, number(*pos)?);
        }
        stations.push(station);
    }

    info!(stations = stations.len(), lines = cols.lines.len(), "loaded station table");
    Ok(StationTable {
        lines: cols.lines.into_iter().map(|(_, l)| l).collect(),
        stations,
    })
}

/// [`load_csv`] from a file.
pub fn load_csv_path(path: impl AsRef<Path>, layout: &TableLayout) -> Result<StationTable> {
    let path = path.as_ref();
    debug!(path = %path.display(), "opening station table");
    let file = std::fs::File::open(path)?;
    load_csv(std::io::BufReader::new(file), layout)
}
