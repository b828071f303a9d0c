//! Line → display category lookup for renderers.
//!
//! A missing entry is not an error anywhere in this crate; renderers decide
//! how to degrade (see [`LinePalette::color_or`], which the Cypher export
//! uses with its fallback colour).

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::model::LineName;
use crate::{Error, Result};

/// How a line is drawn. Currently just its colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayCategory {
    /// `#rrggbb`
    pub color: String,
}

/// Colours of the London map, in table column order.
const LONDON: [(&str, &str); 23] = [
    ("Bakerloo", "#b26300"),
    ("Central", "#dc241f"),
    ("Circle", "#ffd329"),
    ("District", "#007d32"),
    ("Hammersmith", "#f4a9be"),
    ("Jubilee", "#a1a5a7"),
    ("Metropolitan", "#9b0058"),
    ("Northern", "#000000"),
    ("Piccadilly", "#0019a8"),
    ("Victoria", "#0098d8"),
    ("Waterloo", "#93ceba"),
    ("Liberty", "#676767"),
    ("Lioness", "#f1b41c"),
    ("Mildmay", "#437ec1"),
    ("Suffragette", "#39b97a"),
    ("Weaver", "#972861"),
    ("Windrush", "#ef4d5e"),
    ("Beckton", "#53bfb4"),
    ("Woolwich", "#a9dddd"),
    ("Lewisham", "#255c4e"),
    ("Wimbeck", "#94ca4e"),
    ("Loop", "#204c24"),
    ("Elizabeth", "#6f4b9f"),
];

/// Static line → [`DisplayCategory`] map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HashMap<String, String>", into = "HashMap<String, String>")]
pub struct LinePalette {
    entries: HashMap<LineName, DisplayCategory>,
}

impl LinePalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn london() -> Self {
        let entries = LONDON
            .iter()
            .map(|&(line, color)| (LineName::from(line), DisplayCategory { color: color.to_string() }))
            .collect();
        Self { entries }
    }

    /// Add or replace a line's colour. Rejects anything but `#rrggbb`.
    pub fn insert(&mut self, line: impl Into<LineName>, color: impl Into<String>) -> Result<()> {
        let line = line.into();
        let color = color.into();
        if !is_hex_color(&color) {
            return Err(Error::Config(format!("line {line}: colour {color:?} is not #rrggbb")));
        }
        self.entries.insert(line, DisplayCategory { color: color.to_ascii_lowercase() });
        Ok(())
    }

    pub fn get(&self, line: &str) -> Option<&DisplayCategory> {
        self.entries.get(line)
    }

    pub fn color(&self, line: &str) -> Option<&str> {
        self.get(line).map(|c| c.color.as_str())
    }

    pub fn color_or<'a>(&'a self, line: &str, default: &'a str) -> &'a str {
        self.color(line).unwrap_or(default)
    }

    /// Entries of `other` override entries of `self`.
    pub fn merge(&mut self, other: LinePalette) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

impl TryFrom<HashMap<String, String>> for LinePalette {
    type Error = Error;

    fn try_from(map: HashMap<String, String>) -> Result<Self> {
        let mut palette = LinePalette::new();
        for (line, color) in map {
            palette.insert(line, color)?;
        }
        Ok(palette)
    }
}

impl From<LinePalette> for HashMap<String, String> {
    fn from(p: LinePalette) -> Self {
        p.entries
            .into_iter()
            .map(|(line, cat)| (line.as_str().to_string(), cat.color))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_london_lookup() {
        let p = LinePalette::london();
        assert_eq!(p.len(), 23);
        assert_eq!(p.color("Central"), Some("#dc241f"));
        assert_eq!(p.color("Elizabeth"), Some("#6f4b9f"));
    }

    #[test]
    fn test_missing_line_is_absent_not_error() {
        let p = LinePalette::london();
        assert!(p.get("Monorail").is_none());
        assert_eq!(p.color_or("Monorail", "#808080"), "#808080");
    }

    #[test]
    fn test_insert_validates_colour() {
        let mut p = LinePalette::new();
        assert!(p.insert("X", "red").is_err());
        assert!(p.insert("X", "#12345").is_err());
        p.insert("X", "#ABCDEF").unwrap();
        assert_eq!(p.color("X"), Some("#abcdef"));
    }

    #[test]
    fn test_deserialize_and_merge() {
        let overrides: LinePalette = serde_json::from_str(r##"{"Central": "#ff0000"}"##).unwrap();
        let mut p = LinePalette::london();
        p.merge(overrides);
        assert_eq!(p.color("Central"), Some("#ff0000"));
        assert_eq!(p.len(), 23);

        let bad: std::result::Result<LinePalette, _> = serde_json::from_str(r#"{"Central": "blue"}"#);
        assert!(bad.is_err());
    }
}
