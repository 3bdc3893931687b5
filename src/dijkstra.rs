use std::cmp::Reverse;
use std::collections::BinaryHeap;

use hashbrown::{HashMap, HashSet};
use ordered_float::OrderedFloat;
use thiserror::Error;

use crate::graph::{Graph, VertexId};

#[derive(Debug, Error, PartialEq)]
#[error("source vertex {0} is not in the graph")]
pub struct InvalidSource(pub VertexId);

/// Single-source result: best known distance and predecessor per vertex, plus
/// the order in which vertices were finalized. Vertices unreachable from the
/// source keep `f64::INFINITY` and `None`. Allocated fresh per query.
#[derive(Debug, PartialEq)]
pub struct ShortestPaths {
    pub dist: HashMap<VertexId, f64>,
    pub pred: HashMap<VertexId, Option<VertexId>>,
    pub visited_order: Vec<VertexId>,
}

/// Dijkstra from `source` to all vertices, lazy-deletion variant: improved
/// entries are re-pushed and stale pops discarded against the finalized set,
/// instead of a decrease-key heap. O((V + E) log V).
///
/// The heap orders by (distance, vertex id), so the visited order and, where
/// shortest paths are unique, the predecessor map are deterministic.
pub fn shortest_paths(graph: &Graph, source: VertexId) -> Result<ShortestPaths, InvalidSource> {
    if !graph.contains_vertex(source) {
        return Err(InvalidSource(source));
    }

    // Every vertex gets an explicit entry up front; lookups during relaxation
    // must never fall back to a default.
    let mut dist: HashMap<VertexId, f64> = HashMap::with_capacity(graph.vertex_count());
    let mut pred: HashMap<VertexId, Option<VertexId>> =
        HashMap::with_capacity(graph.vertex_count());
    for v in graph.vertices() {
        dist.insert(v, f64::INFINITY);
        pred.insert(v, None);
    }

    let mut visited: HashSet<VertexId> = HashSet::with_capacity(graph.vertex_count());
    let mut visited_order: Vec<VertexId> = Vec::new();
    let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, VertexId)>> = BinaryHeap::new();

    dist.insert(source, 0.0);
    heap.push(Reverse((OrderedFloat(0.0), source)));

    while let Some(Reverse((OrderedFloat(d), v))) = heap.pop() {
        if d == f64::INFINITY {
            // Nothing reachable remains behind an infinite key.
            break;
        }
        if !visited.insert(v) {
            // Stale entry from a later re-push; the vertex is finalized.
            continue;
        }
        visited_order.push(v);

        let dv = dist[&v];
        for (n, w) in graph.edges_from(v) {
            let candidate = dv + w;
            if candidate < dist[&n] {
                dist.insert(n, candidate);
                pred.insert(n, Some(v));
                heap.push(Reverse((OrderedFloat(candidate), n)));
            }
        }
    }

    Ok(ShortestPaths { dist, pred, visited_order })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> Graph {
        // A(1) -1-> B(2) -2-> C(3)
        let mut g = Graph::new();
        for id in [1, 2, 3] {
            g.add_vertex(id).unwrap();
        }
        g.add_edge(1, 2, 1.0).unwrap();
        g.add_edge(2, 3, 2.0).unwrap();
        g
    }

    #[test]
    fn three_node_chain() {
        let sp = shortest_paths(&chain(), 1).unwrap();

        assert_eq!(sp.dist[&1], 0.0);
        assert_eq!(sp.dist[&2], 1.0);
        assert_eq!(sp.dist[&3], 3.0);
        assert_eq!(sp.pred[&1], None);
        assert_eq!(sp.pred[&2], Some(1));
        assert_eq!(sp.pred[&3], Some(2));
        assert_eq!(sp.visited_order, vec![1, 2, 3]);
    }

    #[test]
    fn source_is_zero_and_no_distance_is_negative() {
        let sp = shortest_paths(&chain(), 2).unwrap();
        assert_eq!(sp.dist[&2], 0.0);
        assert!(sp.dist.values().all(|&d| d >= 0.0));
    }

    #[test]
    fn unreachable_vertex_keeps_sentinel_and_no_predecessor() {
        let mut g = chain();
        g.add_vertex(99).unwrap();

        let sp = shortest_paths(&g, 1).unwrap();
        assert_eq!(sp.dist[&99], f64::INFINITY);
        assert_eq!(sp.pred[&99], None);
        assert!(!sp.visited_order.contains(&99));
    }

    #[test]
    fn absent_source_is_rejected() {
        assert_eq!(shortest_paths(&chain(), 42), Err(InvalidSource(42)));
    }

    #[test]
    fn rerun_on_unmodified_graph_is_identical() {
        let g = chain();
        let a = shortest_paths(&g, 1).unwrap();
        let b = shortest_paths(&g, 1).unwrap();
        assert_eq!(a.dist, b.dist);
        assert_eq!(a.pred, b.pred);
        assert_eq!(a.visited_order, b.visited_order);
    }

    #[test]
    fn equal_distances_finalize_in_id_order() {
        // 1 reaches 2 and 3 at the same cost; the (distance, id) heap order
        // must settle 2 before 3.
        let mut g = Graph::new();
        for id in [1, 2, 3] {
            g.add_vertex(id).unwrap();
        }
        g.add_edge(1, 3, 5.0).unwrap();
        g.add_edge(1, 2, 5.0).unwrap();

        let sp = shortest_paths(&g, 1).unwrap();
        assert_eq!(sp.visited_order, vec![1, 2, 3]);
    }

    #[test]
    fn relaxation_reroutes_through_a_cheaper_path() {
        // Direct 1->3 (10) loses to 1->2->3 (3); the stale heap entry for 3
        // must be discarded after the reroute.
        let mut g = Graph::new();
        for id in [1, 2, 3] {
            g.add_vertex(id).unwrap();
        }
        g.add_edge(1, 3, 10.0).unwrap();
        g.add_edge(1, 2, 1.0).unwrap();
        g.add_edge(2, 3, 2.0).unwrap();

        let sp = shortest_paths(&g, 1).unwrap();
        assert_eq!(sp.dist[&3], 3.0);
        assert_eq!(sp.pred[&3], Some(2));
        assert_eq!(sp.visited_order, vec![1, 2, 3]);
    }
}
