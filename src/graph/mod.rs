//! # Network Multigraph
//!
//! Arena-backed multigraph produced by the inference engine: one node per
//! station, any number of edges per station pair (one per line and matching
//! offset).
//!
//! Nodes and edges live in `Vec`s; a station-id index and per-station
//! incidence lists make lookups O(1) amortised.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::model::*;

/// Node payload: what the rendering collaborator needs about a station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub id: StationId,
    pub name: String,
    pub coordinate: Coordinate,
}

impl From<&Station> for NodeInfo {
    fn from(s: &Station) -> Self {
        Self { id: s.id, name: s.name.clone(), coordinate: s.coordinate }
    }
}

/// Canonical, orderable view of an edge for multiset comparison.
///
/// Bidirectional edges are stored with the smaller station id first so the
/// same adjacency compares equal regardless of which end was `src`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
    pub line: LineName,
    pub direction: DirectionClass,
    pub a: StationId,
    pub b: StationId,
    /// `f64::to_bits` of the score difference (absolute for bidirectional).
    pub score_diff_bits: u64,
}

impl From<&Edge> for EdgeKey {
    fn from(e: &Edge) -> Self {
        let (a, b) = match e.direction {
            DirectionClass::Bidirectional => (e.src.min(e.dst), e.src.max(e.dst)),
            DirectionClass::Directional => (e.src, e.dst),
        };
        Self {
            line: e.line.clone(),
            direction: e.direction,
            a,
            b,
            score_diff_bits: e.score_diff.abs().to_bits(),
        }
    }
}

type Incidence = SmallVec<[EdgeId; 8]>;

/// Transit multigraph: station nodes plus inferred edges.
#[derive(Debug, Clone, Default)]
pub struct NetworkGraph {
    nodes: Vec<NodeInfo>,
    edges: Vec<Edge>,
    /// station id → position in `nodes`
    index: HashMap<StationId, usize>,
    /// station id → incident edge ids (both ends)
    incidence: HashMap<StationId, Incidence>,
}

impl NetworkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for a known network size.
    pub fn with_capacity(node_count: usize, edge_count: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(node_count),
            edges: Vec::with_capacity(edge_count),
            index: HashMap::with_capacity(node_count),
            incidence: HashMap::with_capacity(node_count),
        }
    }

    /// Register a station. Returns false (and keeps the first) if the id is
    /// already present.
    pub fn add_station(&mut self, node: NodeInfo) -> bool {
        if self.index.contains_key(&node.id) {
            return false;
        }
        self.index.insert(node.id, self.nodes.len());
        self.incidence.entry(node.id).or_default();
        self.nodes.push(node);
        true
    }

    /// Append an edge. Endpoints need not be registered beforehand.
    pub fn add_edge(
        &mut self,
        src: StationId,
        dst: StationId,
        line: LineName,
        direction: DirectionClass,
        score_diff: f64,
        offset: f64,
    ) -> EdgeId {
        let id = EdgeId(self.edges.len() as u64);
        self.edges.push(Edge { id, src, dst, line, direction, score_diff, offset });
        self.incidence.entry(src).or_default().push(id);
        if dst != src {
            self.incidence.entry(dst).or_default().push(id);
        }
        id
    }

    pub fn node(&self, id: StationId) -> Option<&NodeInfo> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: StationId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn nodes(&self) -> &[NodeInfo] {
        &self.nodes
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        let index = usize::try_from(id.0).ok()?;
        self.edges.get(index)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// All edges touching `id`, whatever their orientation.
    pub fn edges_of(&self, id: StationId) -> impl Iterator<Item = &Edge> {
        self.incidence
            .get(&id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |e| &self.edges[e.0 as usize])
    }

    /// Edges joining `a` and `b` in either orientation, on any line.
    pub fn edges_between(&self, a: StationId, b: StationId) -> impl Iterator<Item = &Edge> {
        self.edges_of(a).filter(move |e| e.other_end(a) == Some(b))
    }

    pub fn edges_on_line<'a>(&'a self, line: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.line == line)
    }

    /// Stations reachable in one hop in `direction`, one entry per edge.
    ///
    /// A bidirectional edge counts as both outgoing and incoming.
    pub fn neighbors(
        &self,
        id: StationId,
        direction: Direction,
    ) -> impl Iterator<Item = (StationId, &Edge)> {
        self.edges_of(id).filter_map(move |e| {
            let keep = match direction {
                Direction::Outgoing => e.leaves(id),
                Direction::Incoming => e.arrives(id),
                Direction::Both => true,
            };
            if keep { e.other_end(id).map(|other| (other, e)) } else { None }
        })
    }

    pub fn degree(&self, id: StationId) -> usize {
        self.incidence.get(&id).map_or(0, |v| v.len())
    }

    /// Distinct line names carried by edges, in first-seen order.
    pub fn lines(&self) -> Vec<&LineName> {
        let mut seen: Vec<&LineName> = Vec::new();
        for e in &self.edges {
            if !seen.contains(&&e.line) {
                seen.push(&e.line);
            }
        }
        seen
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Sorted canonical edge multiset, for order-independent comparison.
    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        let mut keys: Vec<EdgeKey> = self.edges.iter().map(EdgeKey::from).collect();
        keys.sort();
        keys
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        let nodes_mem: usize = self
            .nodes
            .iter()
            .map(|n| size_of::<NodeInfo>() + n.name.capacity())
            .sum();
        let edges_mem: usize = self
            .edges
            .iter()
            .map(|e| size_of::<Edge>() + e.line.as_str().len())
            .sum();
        let index_mem = self.index.len() * (size_of::<StationId>() + size_of::<usize>());
        let incidence_mem = self.incidence.len() * (size_of::<StationId>() + size_of::<Incidence>());

        nodes_mem + edges_mem + index_mem + incidence_mem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: u64) -> NodeInfo {
        NodeInfo { id: StationId(id), name: format!("S{id}"), coordinate: Coordinate::default() }
    }

    fn sample() -> NetworkGraph {
        let mut g = NetworkGraph::new();
        for id in 1..=3 {
            g.add_station(node(id));
        }
        g.add_edge(StationId(1), StationId(2), "Central".into(), DirectionClass::Bidirectional, 1.0, 1.0);
        g.add_edge(StationId(1), StationId(2), "District".into(), DirectionClass::Bidirectional, 1.0, 1.0);
        g.add_edge(StationId(2), StationId(3), "Tram".into(), DirectionClass::Directional, 100.0, 100.0);
        g
    }

    #[test]
    fn test_duplicate_station_keeps_first() {
        let mut g = NetworkGraph::new();
        assert!(g.add_station(node(1)));
        let mut dup = node(1);
        dup.name = "Other".into();
        assert!(!g.add_station(dup));
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.node(StationId(1)).unwrap().name, "S1");
    }

    #[test]
    fn test_multigraph_keeps_parallel_edges() {
        let g = sample();
        assert_eq!(g.edges_between(StationId(2), StationId(1)).count(), 2);
        assert_eq!(g.degree(StationId(2)), 3);
        assert_eq!(g.lines().len(), 3);
    }

    #[test]
    fn test_neighbors_respect_direction() {
        let g = sample();
        let out: Vec<StationId> = g.neighbors(StationId(3), Direction::Outgoing).map(|(s, _)| s).collect();
        assert!(out.is_empty());
        let inc: Vec<StationId> = g.neighbors(StationId(3), Direction::Incoming).map(|(s, _)| s).collect();
        assert_eq!(inc, vec![StationId(2)]);
        assert_eq!(g.neighbors(StationId(2), Direction::Outgoing).count(), 3);
        assert_eq!(g.neighbors(StationId(1), Direction::Both).count(), 2);
    }

    #[test]
    fn test_edge_key_is_orientation_free_for_bidirectional() {
        let mut g = NetworkGraph::new();
        let a = g.add_edge(StationId(5), StationId(2), "X".into(), DirectionClass::Bidirectional, 1.0, 1.0);
        let b = g.add_edge(StationId(2), StationId(5), "X".into(), DirectionClass::Bidirectional, 1.0, 1.0);
        assert_eq!(EdgeKey::from(g.edge(a).unwrap()), EdgeKey::from(g.edge(b).unwrap()));
    }

    #[test]
    fn test_unknown_station_has_no_edges() {
        let g = sample();
        assert_eq!(g.edges_of(StationId(42)).count(), 0);
        assert!(g.node(StationId(42)).is_none());
        assert!(g.memory_usage() > 0);
    }

    #[test]
    fn test_edge_ids_follow_insertion_order() {
        let g = sample();
        let ids: Vec<EdgeId> = g.edges().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![EdgeId(0), EdgeId(1), EdgeId(2)]);
        assert_eq!(g.edge(EdgeId(2)).unwrap().line, "Tram");
        assert!(g.edge(EdgeId(3)).is_none());
        assert!(g.edge(EdgeId(u64::MAX)).is_none());
    }

    #[test]
    fn test_memory_usage_grows_with_edges() {
        let mut g = sample();
        let before = g.memory_usage();
        g.add_edge(StationId(3), StationId(1), "Circle".into(), DirectionClass::Bidirectional, 1.0, 1.0);
        assert!(g.memory_usage() > before);
    }
}
