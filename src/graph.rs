use fnv::FnvHashMap;
use thiserror::Error;

/// Opaque identifier of one geographic node. Only used as a map key and as a
/// tie-break key in the shortest-path engine; no other ordering semantics.
pub type VertexId = i64;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("vertex {0} is already in the graph")]
    DuplicateVertex(VertexId),
    #[error("edge endpoint {0} is not in the graph")]
    EdgeEndpointMissing(VertexId),
    #[error("no edge from {from} to {to}")]
    NoSuchEdge { from: VertexId, to: VertexId },
}

/// Weighted directed graph over vertex ids. Mutable while the map is loaded,
/// read-only afterwards. Undirected structure is the caller's job: it inserts
/// both directions explicitly, the graph itself makes no symmetry guarantee.
#[derive(Debug, Default)]
pub struct Graph {
    adjacency: FnvHashMap<VertexId, FnvHashMap<VertexId, f64>>,
    edge_count: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a vertex with no edges. Fails on a duplicate id without
    /// touching existing adjacency.
    pub fn add_vertex(&mut self, id: VertexId) -> Result<(), GraphError> {
        if self.adjacency.contains_key(&id) {
            return Err(GraphError::DuplicateVertex(id));
        }
        self.adjacency.insert(id, FnvHashMap::default());
        Ok(())
    }

    /// Inserts or overwrites the directed edge `from -> to`. Fails without
    /// mutation if either endpoint is unknown.
    ///
    /// Precondition: `weight` is finite and non-negative. Not validated here;
    /// all weights come from the haversine metric, which guarantees both.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId, weight: f64) -> Result<(), GraphError> {
        if !self.adjacency.contains_key(&to) {
            return Err(GraphError::EdgeEndpointMissing(to));
        }
        let Some(out) = self.adjacency.get_mut(&from) else {
            return Err(GraphError::EdgeEndpointMissing(from));
        };
        if out.insert(to, weight).is_none() {
            self.edge_count += 1;
        }
        Ok(())
    }

    /// Ids reachable via one outgoing edge from `id`. Empty when `id` has no
    /// outgoing edges or is not a vertex.
    pub fn neighbors(&self, id: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.adjacency
            .get(&id)
            .into_iter()
            .flat_map(|out| out.keys().copied())
    }

    /// Outgoing `(neighbor, weight)` pairs of `id`; same domain as
    /// [`Self::neighbors`].
    pub fn edges_from(&self, id: VertexId) -> impl Iterator<Item = (VertexId, f64)> + '_ {
        self.adjacency
            .get(&id)
            .into_iter()
            .flat_map(|out| out.iter().map(|(&n, &w)| (n, w)))
    }

    /// Stored weight of `from -> to`. A missing edge is an error, never a
    /// default weight.
    pub fn get_weight(&self, from: VertexId, to: VertexId) -> Result<f64, GraphError> {
        self.adjacency
            .get(&from)
            .and_then(|out| out.get(&to))
            .copied()
            .ok_or(GraphError::NoSuchEdge { from, to })
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.adjacency.contains_key(&id)
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.adjacency.keys().copied()
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}
