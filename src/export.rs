//! Export the inferred network for the rendering collaborator.
//!
//! Two formats:
//!
//! ```text
//! NetworkGraph → export_json()         → { nodes: [...], edges: [...] }
//! NetworkGraph → export_cypher_dump()  → CREATE/MATCH statements
//! ```
//!
//! Drawing (markers, polylines, dash styles, HTML) happens downstream.

use std::io::Write;

use serde::Serialize;

use crate::graph::NetworkGraph;
use crate::model::*;
use crate::palette::LinePalette;
use crate::Result;

/// Colour written to the Cypher dump for lines missing from the palette.
pub const FALLBACK_COLOR: &str = "#808080";

#[derive(Debug, Serialize)]
struct NodeDoc<'a> {
    id: StationId,
    name: &'a str,
    x: f64,
    y: f64,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Serialize)]
struct EdgeDoc<'a> {
    src: StationId,
    dst: StationId,
    line: &'a LineName,
    direction: DirectionClass,
    score_diff: f64,
    offset: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct GraphDoc<'a> {
    nodes: Vec<NodeDoc<'a>>,
    edges: Vec<EdgeDoc<'a>>,
}

/// Write the graph as one JSON document.
///
/// Edges whose line has no palette entry are written without `color`.
pub fn export_json(graph: &NetworkGraph, palette: &LinePalette, writer: &mut dyn Write) -> Result<()> {
    let doc = GraphDoc {
        nodes: graph
            .nodes()
            .iter()
            .map(|n| {
                let (lat, lon) = n.coordinate.lat_lon();
                NodeDoc { id: n.id, name: &n.name, x: n.coordinate.x, y: n.coordinate.y, lat, lon }
            })
            .collect(),
        edges: graph
            .edges()
            .iter()
            .map(|e| EdgeDoc {
                src: e.src,
                dst: e.dst,
                line: &e.line,
                direction: e.direction,
                score_diff: e.score_diff,
                offset: e.offset,
                color: palette.color(e.line.as_str()),
            })
            .collect(),
    };
    serde_json::to_writer_pretty(&mut *writer, &doc)?;
    writeln!(writer)?;
    Ok(())
}

/// Export the graph as a Cypher script.
///
/// Stations become `:Station` nodes; every edge becomes one `:ADJACENT`
/// relationship from `src` to `dst` carrying its line, direction class,
/// score difference and colour. Unknown lines get [`FALLBACK_COLOR`].
pub fn export_cypher_dump(graph: &NetworkGraph, palette: &LinePalette, writer: &mut dyn Write) -> Result<()> {
    // Header
    writeln!(writer, "// transit-topology Cypher DUMP")?;
    writeln!(writer, "// Stations: {}", graph.node_count())?;
    writeln!(writer, "// Edges: {}", graph.edge_count())?;
    writeln!(writer)?;

    for node in graph.nodes() {
        writeln!(
            writer,
            "CREATE (:Station {{_id: {}, name: {}, x: {}, y: {}}});",
            node.id,
            quote(&node.name),
            node.coordinate.x,
            node.coordinate.y,
        )?;
    }

    writeln!(writer)?;
    writeln!(writer, "// Adjacencies")?;

    for edge in graph.edges() {
        writeln!(
            writer,
            "MATCH (a:Station {{_id: {}}}), (b:Station {{_id: {}}}) CREATE (a)-[:ADJACENT {{line: {}, direction: {}, score_diff: {}, color: {}}}]->(b);",
            edge.src,
            edge.dst,
            quote(edge.line.as_str()),
            quote(edge.direction.as_str()),
            edge.score_diff,
            quote(palette.color_or(edge.line.as_str(), FALLBACK_COLOR)),
        )?;
    }

    Ok(())
}

/// Format a string as a Cypher literal.
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeInfo;

    fn graph() -> NetworkGraph {
        let mut g = NetworkGraph::new();
        g.add_station(NodeInfo { id: StationId(1), name: "King's Cross".into(), coordinate: Coordinate::new(-0.12, 51.53) });
        g.add_station(NodeInfo { id: StationId(2), name: "Angel".into(), coordinate: Coordinate::new(-0.10, 51.53) });
        g.add_edge(StationId(1), StationId(2), "Northern".into(), DirectionClass::Bidirectional, 1.0, 1.0);
        g.add_edge(StationId(1), StationId(2), "Monorail".into(), DirectionClass::Directional, 100.0, 100.0);
        g
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("Bank"), "'Bank'");
        assert_eq!(quote("King's Cross"), "'King\\'s Cross'");
    }

    #[test]
    fn test_json_document_shape() {
        let mut out = Vec::new();
        export_json(&graph(), &LinePalette::london(), &mut out).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(v["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(v["nodes"][0]["name"], "King's Cross");
        assert_eq!(v["nodes"][0]["lat"], 51.53);
        assert_eq!(v["nodes"][0]["lon"], -0.12);
        assert_eq!(v["edges"][0]["line"], "Northern");
        assert_eq!(v["edges"][0]["direction"], "bidirectional");
        assert_eq!(v["edges"][0]["color"], "#000000");
        assert_eq!(v["edges"][1]["direction"], "directional");
        assert!(v["edges"][1].get("color").is_none());
    }

    #[test]
    fn test_cypher_dump() {
        let mut out = Vec::new();
        export_cypher_dump(&graph(), &LinePalette::london(), &mut out).unwrap();
        let dump = String::from_utf8(out).unwrap();

        assert!(dump.contains("// Stations: 2"));
        assert!(dump.contains("CREATE (:Station {_id: 1, name: 'King\\'s Cross', x: -0.12, y: 51.53});"));
        assert!(dump.contains("[:ADJACENT {line: 'Northern', direction: 'bidirectional', score_diff: 1, color: '#000000'}]"));
        assert!(dump.contains("[:ADJACENT {line: 'Monorail', direction: 'directional', score_diff: 100, color: '#808080'}]"));
        assert_eq!(dump.matches("MATCH").count(), 2);
    }
}
