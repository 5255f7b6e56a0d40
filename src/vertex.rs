use std::cmp::Ordering;
use std::fmt;

/// Vertex identifiers are handed out from 0 upward and never reused.
pub type VertexId = u32;

/// A member of the social network.
///
/// `energy` is the vertex's propensity to interact; it is sampled once when the
/// vertex is created and never changes. `active_edges` counts the incident edges
/// that carried at least one interaction in the current window.
#[derive(Debug, Clone)]
pub struct Vertex {
    id: VertexId,
    energy: f64,
    active_edges: u32,
}

impl Vertex {
    pub fn new(id: VertexId) -> Self {
        Self::with_energy(id, 0.0)
    }

    pub fn with_energy(id: VertexId, energy: f64) -> Self {
        Vertex {
            id,
            energy,
            active_edges: 0,
        }
    }

    pub fn id(&self) -> VertexId {
        self.id
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn reset_edge_count(&mut self) {
        self.active_edges = 0;
    }

    pub fn increment_edge_count(&mut self) {
        self.active_edges += 1;
    }

    pub fn edge_count(&self) -> u32 {
        self.active_edges
    }
}

// Identity is the id alone; energy and edge counts never take part in comparisons.
impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Vertex {}

impl PartialOrd for Vertex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Vertex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
