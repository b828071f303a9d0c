//! Run configuration.
//!
//! Every field has a default matching the London table, so an empty JSON
//! object (or no file at all) is a valid configuration.
//!
//! ```json
//! {
//!   "table": { "line_columns": { "between": { "first": "Bakerloo", "last": "Elizabeth" } } },
//!   "catalogue": { "name": "london-2018", "epsilon": 1e-9 },
//!   "palette": { "Central": "#dc241f" },
//!   "lines": ["Central", "Northern"],
//!   "threads": 4
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::loader::TableLayout;
use crate::model::LineName;
use crate::palette::LinePalette;
use crate::tolerance::ToleranceCatalogue;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub table: TableLayout,
    pub catalogue: ToleranceCatalogue,
    /// Overrides layered on top of the London palette.
    pub palette: LinePalette,
    /// Restrict inference to these lines. `None` means every table line.
    pub lines: Option<Vec<LineName>>,
    /// Worker threads for inference; 1 runs inline.
    pub threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table: TableLayout::default(),
            catalogue: ToleranceCatalogue::default(),
            palette: LinePalette::new(),
            lines: None,
            threads: 1,
        }
    }
}

impl Config {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        self.catalogue.validate()
    }

    /// The London palette with this config's overrides applied.
    pub fn effective_palette(&self) -> LinePalette {
        let mut palette = LinePalette::london();
        palette.merge(self.palette.clone());
        palette
    }

    /// Lines to infer over, given the lines the table provides.
    ///
    /// Keeps table order; restriction entries the table lacks are dropped.
    pub fn select_lines(&self, table_lines: &[LineName]) -> Vec<LineName> {
        match &self.lines {
            None => table_lines.to_vec(),
            Some(only) => table_lines.iter().filter(|l| only.contains(l)).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LineColumns;
    use crate::Error;

    #[test]
    fn test_empty_object_is_default() {
        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.catalogue, ToleranceCatalogue::london());
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_json_str(
            r##"{
                "table": { "id_column": "FID", "line_columns": { "range": { "start": 4, "end": 9 } } },
                "catalogue": { "name": "test", "symmetric": [1.0], "asymmetric": [100.0] },
                "palette": { "Central": "#FF0000" },
                "lines": ["Central"],
                "threads": 4
            }"##,
        )
        .unwrap();
        assert_eq!(config.table.id_column, "FID");
        assert_eq!(config.table.name_column, "NAME");
        assert_eq!(config.table.line_columns, LineColumns::Range { start: 4, end: 9 });
        assert_eq!(config.catalogue.asymmetric, vec![100.0]);
        assert_eq!(config.threads, 4);
        assert_eq!(config.effective_palette().color("Central"), Some("#ff0000"));
        assert_eq!(config.effective_palette().color("Victoria"), Some("#0098d8"));
    }

    #[test]
    fn test_overlapping_catalogue_rejected() {
        let err = Config::from_json_str(r#"{"catalogue": {"symmetric": [1.0], "asymmetric": [1.0]}}"#).unwrap_err();
        assert!(matches!(err, Error::Catalogue(_)));
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        assert!(matches!(Config::from_json_str("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_select_lines_keeps_table_order() {
        let table: Vec<LineName> = ["A", "B", "C"].into_iter().map(LineName::from).collect();
        let config = Config { lines: Some(vec!["C".into(), "A".into(), "Z".into()]), ..Default::default() };
        assert_eq!(config.select_lines(&table), vec![LineName::from("A"), "C".into()]);
        assert_eq!(Config::default().select_lines(&table), table);
    }
}
