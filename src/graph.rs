use petgraph::algo::connected_components;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{EdgeReference, NodeIndex, UnGraph};
use rand::Rng;
use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;
use crate::network::Network;
use crate::output::{EdgeRecord, write_text};
use crate::vertex::VertexId;

/// Shape of one window's active interaction graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotSummary {
    pub nodes: usize,
    pub edges: usize,
    pub total_weight: u64,
    pub components: usize,
    pub max_degree: usize,
}

/// Weighted undirected view of a snapshot, labelled with each vertex's
/// representative community when one is known.
pub struct SnapshotGraph {
    pub graph: UnGraph<VertexId, u32>,
    pub communities: HashMap<VertexId, usize>,
    nodes: HashMap<VertexId, NodeIndex>,
}

impl SnapshotGraph {
    fn empty() -> Self {
        SnapshotGraph {
            graph: UnGraph::new_undirected(),
            communities: HashMap::new(),
            nodes: HashMap::new(),
        }
    }

    fn node(&mut self, v: VertexId) -> NodeIndex {
        let graph = &mut self.graph;
        *self.nodes.entry(v).or_insert_with(|| graph.add_node(v))
    }

    /// Every vertex of the network plus its active edges.
    pub fn from_network<R: Rng>(network: &Network<R>) -> Self {
        let mut snapshot = Self::empty();
        for v in network.vertices() {
            snapshot.node(v.id());
        }
        for edge in network.active_edges() {
            for (a, b) in edge.pairs() {
                let (na, nb) = (snapshot.node(a), snapshot.node(b));
                snapshot.graph.add_edge(na, nb, edge.weight());
            }
        }
        snapshot.communities = network
            .membership()
            .iter()
            .map(|(&v, &index)| (v, index))
            .collect();
        snapshot
    }

    /// Graph of a snapshot read back from disk; repeated pairs add up.
    pub fn from_records(records: &[EdgeRecord]) -> Self {
        let mut snapshot = Self::empty();
        for record in records {
            let na = snapshot.node(record.a);
            let nb = snapshot.node(record.b);
            if let Some(edge) = snapshot.graph.find_edge(na, nb) {
                snapshot.graph[edge] += record.weight;
            } else {
                snapshot.graph.add_edge(na, nb, record.weight);
            }
        }
        snapshot
    }

    pub fn summary(&self) -> SnapshotSummary {
        SnapshotSummary {
            nodes: self.graph.node_count(),
            edges: self.graph.edge_count(),
            total_weight: self.graph.edge_weights().map(|&w| u64::from(w)).sum(),
            components: connected_components(&self.graph),
            max_degree: self
                .graph
                .node_indices()
                .map(|n| self.graph.edges(n).count())
                .max()
                .unwrap_or(0),
        }
    }

    /// Graphviz rendering with weights as edge labels and nodes filled by
    /// community.
    pub fn to_dot(&self) -> String {
        let edge_attrs = |_: &UnGraph<VertexId, u32>, edge: EdgeReference<'_, u32>| {
            format!("label=\"{}\"", edge.weight())
        };
        let node_attrs = |_: &UnGraph<VertexId, u32>, (_, &v): (NodeIndex, &VertexId)| {
            match self.communities.get(&v) {
                Some(index) => {
                    let hue = (index * 60) % 360;
                    format!(
                        "label=\"{}\", style=filled, fillcolor=\"{:.3} 0.5 0.7\"",
                        v,
                        hue as f32 / 360.0
                    )
                }
                None => format!("label=\"{}\"", v),
            }
        };
        let dot = Dot::with_attr_getters(
            &self.graph,
            &[Config::EdgeNoLabel, Config::NodeNoLabel],
            &edge_attrs,
            &node_attrs,
        );
        format!("{:?}", dot)
    }

    pub fn save_dot(&self, path: &Path) -> Result<()> {
        write_text(path, &self.to_dot())
    }
}
