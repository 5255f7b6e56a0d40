//! Synthetic temporal social networks with ground-truth overlapping communities.
//!
//! A [`Network`] is built once with [`Network::random_network`] and then evolved
//! window by window with [`Network::gen_next_time_window`]. Each window yields
//! a weighted edge list whose weights come from a bursty interaction process
//! driven by vertex energy.

pub mod driver;
pub mod edge;
pub mod error;
pub mod graph;
pub mod group;
pub mod network;
pub mod output;
pub mod params;
pub mod power_law;
pub mod vertex;

pub use driver::{WindowReport, run};
pub use edge::{Edge, EdgeKey};
pub use error::{GeneratorError, Result};
pub use graph::{SnapshotGraph, SnapshotSummary};
pub use group::{Community, Group};
pub use network::{Network, Transition};
pub use output::{EdgeRecord, read_snapshot};
pub use params::Params;
pub use power_law::PowerLaw;
pub use vertex::{Vertex, VertexId};
