//! # Adjacency Inference Engine
//!
//! Turns per-line position scores into a [`NetworkGraph`].
//!
//! For every unordered pair of distinct stations `(i, j)` and every line `L`
//! on which both are scored:
//!
//! ```text
//! diff = |score(i, L) - score(j, L)|
//! for t in symmetric:   |diff - t| < eps  =>  i <-> j         (score_diff = diff)
//! for t in asymmetric:  |diff - t| < eps  =>  low -> high     (score_diff = high - low)
//! ```
//!
//! There is no early exit: each (pair, line, matching offset) yields its own
//! edge.
//!
//! ## Layout
//!
//! Scores are copied once into a dense `stations × lines` arena, and each
//! line gets a bucket of the station indices it serves. The pair scan is an
//! explicit double loop over a bucket, so stations that do not share a line
//! are never compared. Cost is `Σ_L |bucket_L|² × |catalogue|`.
//!
//! The engine is a pure function of its inputs: no I/O, no shared state, and
//! the input slice is never mutated.

use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::graph::{NetworkGraph, NodeInfo};
use crate::model::*;
use crate::tolerance::{OffsetClass, ToleranceCatalogue};

/// Counters from one inference run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InferenceStats {
    pub stations: usize,
    pub lines: usize,
    /// (pair, line) combinations where both stations were scored.
    pub pairs_compared: u64,
    pub bidirectional_edges: usize,
    pub directional_edges: usize,
}

impl InferenceStats {
    pub fn edges(&self) -> usize {
        self.bidirectional_edges + self.directional_edges
    }
}

/// Dense score arena: `scores[station * width + line]`, NaN when absent.
struct ScoreArena {
    scores: Vec<f64>,
    width: usize,
}

impl ScoreArena {
    fn build(stations: &[Station], lines: &[LineName]) -> Self {
        let width = lines.len();
        let mut scores = Vec::with_capacity(stations.len() * width);
        for station in stations {
            for line in lines {
                scores.push(station.score(line.as_str()).unwrap_or(f64::NAN));
            }
        }
        Self { scores, width }
    }

    #[inline]
    fn get(&self, station: usize, line: usize) -> f64 {
        self.scores[station * self.width + line]
    }

    /// Station indices scored on `line`, ascending.
    fn bucket(&self, stations: usize, line: usize) -> Vec<usize> {
        (0..stations).filter(|&s| !self.get(s, line).is_nan()).collect()
    }
}

/// One edge before it is placed in a graph.
#[derive(Debug, Clone, Copy)]
struct PendingEdge {
    src: usize,
    dst: usize,
    line: usize,
    direction: DirectionClass,
    score_diff: f64,
    offset: f64,
}

#[derive(Debug, Default)]
struct LineScan {
    edges: Vec<PendingEdge>,
    pairs_compared: u64,
}

/// Pair scan over one line's bucket.
fn scan_line(
    stations: &[Station],
    arena: &ScoreArena,
    line: usize,
    bucket: &[usize],
    catalogue: &ToleranceCatalogue,
) -> LineScan {
    let mut out = LineScan::default();

    for (k, &i) in bucket.iter().enumerate() {
        let a = arena.get(i, line);
        for &j in &bucket[k + 1..] {
            if stations[i].id == stations[j].id {
                continue;
            }
            let b = arena.get(j, line);
            out.pairs_compared += 1;

            let diff = (a - b).abs();
            for m in catalogue.matches(diff) {
                let edge = match m.class {
                    OffsetClass::Symmetric => PendingEdge {
                        src: i,
                        dst: j,
                        line,
                        direction: DirectionClass::Bidirectional,
                        score_diff: diff,
                        offset: m.offset,
                    },
                    OffsetClass::Asymmetric => {
                        // lower score -> higher score
                        let (src, dst, signed) = if a <= b { (i, j, b - a) } else { (j, i, a - b) };
                        PendingEdge {
                            src,
                            dst,
                            line,
                            direction: DirectionClass::Directional,
                            score_diff: signed,
                            offset: m.offset,
                        }
                    }
                };
                out.edges.push(edge);
            }
        }
    }

    out
}

fn line_buckets(
    stations: &[Station],
    lines: &[LineName],
    arena: &ScoreArena,
) -> Vec<Vec<usize>> {
    (0..lines.len())
        .map(|l| {
            let bucket = arena.bucket(stations.len(), l);
            if bucket.len() < 2 {
                trace!(line = %lines[l], served = bucket.len(), "line has no station pairs");
            }
            bucket
        })
        .collect()
}

fn warn_duplicate_ids(stations: &[Station]) {
    let mut seen = hashbrown::HashSet::with_capacity(stations.len());
    let mut dups: SmallVec<[StationId; 4]> = SmallVec::new();
    for s in stations {
        if !seen.insert(s.id) && !dups.contains(&s.id) {
            dups.push(s.id);
        }
    }
    if !dups.is_empty() {
        warn!(?dups, "duplicate station ids: pairs sharing an id are skipped, first entry becomes the node");
    }
}

fn assemble(
    stations: &[Station],
    lines: &[LineName],
    catalogue: &ToleranceCatalogue,
    scans: Vec<LineScan>,
) -> (NetworkGraph, InferenceStats) {
    let edge_count = scans.iter().map(|s| s.edges.len()).sum();
    let mut graph = NetworkGraph::with_capacity(stations.len(), edge_count);
    for s in stations {
        graph.add_station(NodeInfo::from(s));
    }

    let mut stats = InferenceStats {
        stations: stations.len(),
        lines: lines.len(),
        ..Default::default()
    };

    for scan in scans {
        stats.pairs_compared += scan.pairs_compared;
        for e in scan.edges {
            match e.direction {
                DirectionClass::Bidirectional => stats.bidirectional_edges += 1,
                DirectionClass::Directional => stats.directional_edges += 1,
            }
            graph.add_edge(
                stations[e.src].id,
                stations[e.dst].id,
                lines[e.line].clone(),
                e.direction,
                e.score_diff,
                e.offset,
            );
        }
    }

    debug!(
        stations = stats.stations,
        lines = stats.lines,
        pairs_compared = stats.pairs_compared,
        edges = stats.edges(),
        bidirectional = stats.bidirectional_edges,
        directional = stats.directional_edges,
        catalogue = catalogue_label(catalogue),
        "adjacency inference complete"
    );

    (graph, stats)
}

fn catalogue_label(catalogue: &ToleranceCatalogue) -> &str {
    catalogue.name.as_deref().unwrap_or("-")
}

/// Infer the transit multigraph from station scores.
///
/// Only `lines` are considered; scores on other lines are ignored. Every
/// station becomes a node, even if it gains no edges. Edge order is by line
/// (as given), then by station input order, then catalogue order.
///
/// The catalogue is trusted as-is; see [`ToleranceCatalogue::validate`].
pub fn infer(
    stations: &[Station],
    lines: &[LineName],
    catalogue: &ToleranceCatalogue,
) -> NetworkGraph {
    infer_with_stats(stations, lines, catalogue).0
}

/// [`infer`], also returning run counters.
pub fn infer_with_stats(
    stations: &[Station],
    lines: &[LineName],
    catalogue: &ToleranceCatalogue,
) -> (NetworkGraph, InferenceStats) {
    trace!(catalogue = catalogue_label(catalogue), offsets = catalogue.len(), "inferring adjacency");
    warn_duplicate_ids(stations);

    let arena = ScoreArena::build(stations, lines);
    let buckets = line_buckets(stations, lines, &arena);
    let scans = buckets
        .iter()
        .enumerate()
        .map(|(l, bucket)| scan_line(stations, &arena, l, bucket, catalogue))
        .collect();

    assemble(stations, lines, catalogue, scans)
}

/// [`infer`] with the per-line scans spread over `threads` scoped threads.
///
/// Lines are dealt round-robin to workers and merged back in line order, so
/// the result is identical to [`infer`], edge ids included.
pub fn infer_parallel(
    stations: &[Station],
    lines: &[LineName],
    catalogue: &ToleranceCatalogue,
    threads: usize,
) -> NetworkGraph {
    let threads = threads.min(lines.len());
    if threads <= 1 {
        return infer(stations, lines, catalogue);
    }
    warn_duplicate_ids(stations);

    let arena = ScoreArena::build(stations, lines);
    let buckets = line_buckets(stations, lines, &arena);

    let mut scans: Vec<Option<LineScan>> = (0..lines.len()).map(|_| None).collect();
    std::thread::scope(|scope| {
        let workers: Vec<_> = (0..threads)
            .map(|w| {
                let arena = &arena;
                let buckets = &buckets;
                scope.spawn(move || {
                    (w..buckets.len())
                        .step_by(threads)
                        .map(|l| (l, scan_line(stations, arena, l, &buckets[l], catalogue)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for worker in workers {
            match worker.join() {
                Ok(results) => {
                    for (l, scan) in results {
                        scans[l] = Some(scan);
                    }
                }
                Err(payload) => std::panic::resume_unwind(payload),
            }
        }
    });

    let scans = scans.into_iter().map(Option::unwrap_or_default).collect();
    assemble(stations, lines, catalogue, scans).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn station(id: u64, line: &str, score: f64) -> Station {
        Station::new(StationId(id), format!("S{id}")).with_score(line, score)
    }

    fn lines(names: &[&str]) -> Vec<LineName> {
        names.iter().map(|&n| LineName::from(n)).collect()
    }

    #[test]
    fn test_arena_marks_absent_as_nan() {
        let stations = vec![station(1, "X", 1.0), station(2, "Y", 2.0)];
        let arena = ScoreArena::build(&stations, &lines(&["X", "Y"]));
        assert_eq!(arena.get(0, 0), 1.0);
        assert!(arena.get(0, 1).is_nan());
        assert_eq!(arena.bucket(2, 1), vec![1]);
    }

    #[test]
    fn test_pairs_only_within_bucket() {
        let stations = vec![
            station(1, "X", 1.0),
            station(2, "X", 2.0),
            station(3, "Y", 3.0),
            station(4, "Y", 4.0),
            station(5, "Y", 9.0),
        ];
        let (_, stats) = infer_with_stats(&stations, &lines(&["X", "Y"]), &ToleranceCatalogue::london());
        assert_eq!(stats.pairs_compared, 1 + 3);
        assert_eq!(stats.bidirectional_edges, 2);
        assert_eq!(stats.directional_edges, 0);
    }

    #[test]
    fn test_directional_orients_low_to_high_regardless_of_order() {
        let stations = vec![station(1, "X", 300.0), station(2, "X", 200.0)];
        let g = infer(&stations, &lines(&["X"]), &ToleranceCatalogue::london());
        assert_eq!(g.edge_count(), 1);
        let e = &g.edges()[0];
        assert_eq!((e.src, e.dst), (StationId(2), StationId(1)));
        assert_eq!(e.score_diff, 100.0);
        assert_eq!(e.offset, 100.0);
    }

    #[test]
    fn test_duplicate_ids_never_pair() {
        let stations = vec![station(1, "X", 1.0), station(1, "X", 2.0)];
        let g = infer(&stations, &lines(&["X"]), &ToleranceCatalogue::london());
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn test_parallel_single_thread_falls_back() {
        let stations = vec![station(1, "X", 1.0), station(2, "X", 2.0)];
        let g = infer_parallel(&stations, &lines(&["X"]), &ToleranceCatalogue::london(), 8);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let mut stations = Vec::new();
        for i in 0..20u64 {
            let mut s = Station::new(StationId(i), format!("S{i}"));
            s.set_score("A", i as f64);
            s.set_score("B", (i % 5) as f64 * 0.01);
            if i % 3 == 0 {
                s.set_score("C", i as f64 * 100.0);
            }
            stations.push(s);
        }
        let ls = lines(&["A", "B", "C"]);
        let cat = ToleranceCatalogue::london();
        let serial = infer(&stations, &ls, &cat);
        let parallel = infer_parallel(&stations, &ls, &cat, 3);
        assert_eq!(serial.edges(), parallel.edges());
    }
}
