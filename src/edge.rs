use rand::Rng;
use std::fmt;
use std::ops::Deref;

use crate::group::Group;
use crate::params::Params;
use crate::power_law::PowerLaw;
use crate::vertex::{Vertex, VertexId};

/// Exponent of the inter-event gap distribution.
pub const GAP_EXPONENT: f64 = -1.75;
/// Longest possible gap between two interactions, in windows.
pub const GAP_MAX: f64 = 3.0;

/// Unordered member pair identifying an edge, smaller id first.
pub type EdgeKey = (VertexId, VertexId);

pub fn edge_key(a: VertexId, b: VertexId) -> EdgeKey {
    if a <= b { (a, b) } else { (b, a) }
}

/// An interaction between vertices, normally a pair.
///
/// Interactions follow a renewal process with power-law gaps. `wait_time` is
/// the offset of the next interaction relative to the start of the current
/// window and survives from one window to the next, so a reused edge continues
/// its process instead of starting over.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    members: Group,
    wait_time: f64,
    weight: u32,
}

impl Edge {
    pub fn new(members: Group) -> Self {
        Edge {
            members,
            wait_time: 0.0,
            weight: 0,
        }
    }

    pub fn between(a: VertexId, b: VertexId) -> Self {
        Self::new([a, b].into_iter().collect())
    }

    /// Key of a pairwise edge. Panics when the edge does not hold exactly two members.
    pub fn key(&self) -> EdgeKey {
        let mut it = self.members.members().iter();
        match (it.next(), it.next(), it.next()) {
            (Some(&a), Some(&b), None) => (a, b),
            _ => panic!("edge {} is not a pair", self.members),
        }
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn wait_time(&self) -> f64 {
        self.wait_time
    }

    #[cfg(test)]
    pub(crate) fn set_wait_time(&mut self, wait_time: f64) {
        self.wait_time = wait_time;
    }

    pub fn is_active(&self) -> bool {
        self.weight > 0
    }

    /// Lag of the edge as a whole.
    ///
    /// Each member's lag is `max_energy - energy + minlag`. Starting from the
    /// largest lag, every other member pulls the result toward its own lag by
    /// `gravity`; only the first member holding the maximum is skipped.
    pub fn total_energy(
        &self,
        vertices: &[Vertex],
        gravity: f64,
        minlag: f64,
        max_energy: f64,
    ) -> f64 {
        assert!(!self.members.is_empty(), "edge without members");
        let lag = |v: VertexId| (max_energy - vertices[v as usize].energy()) + minlag;

        let max_lag = self
            .members
            .members()
            .iter()
            .map(|&v| lag(v))
            .fold(f64::NEG_INFINITY, f64::max);

        let mut res = max_lag;
        let mut considered = false;
        for &v in self.members.members() {
            let v_lag = lag(v);
            if v_lag == max_lag && !considered {
                considered = true;
                continue;
            }
            res -= gravity * (res - v_lag);
        }
        res
    }

    /// Runs the interaction process over one window and records the number of
    /// interactions as the weight. Members of an active edge get their active
    /// edge count bumped. Returns whether the edge is active.
    pub fn generate_weight<R: Rng + ?Sized>(
        &mut self,
        vertices: &mut [Vertex],
        params: &Params,
        rng: &mut R,
    ) -> bool {
        let lag = self.total_energy(vertices, params.grav, params.minlag, params.vmax);
        let gaps = PowerLaw::new(GAP_EXPONENT, lag, GAP_MAX);
        self.advance_window(|| gaps.sample(rng));

        if self.weight > 0 {
            for &v in self.members.members() {
                vertices[v as usize].increment_edge_count();
            }
        }
        self.weight > 0
    }

    /// Counts arrivals before the window boundary and carries the overshoot
    /// into the next window.
    ///
    /// `gap` must return strictly positive values for the loop to terminate;
    /// gaps drawn from [`PowerLaw`] are bounded below by the edge lag, which is
    /// at least `minlag`.
    pub fn advance_window(&mut self, mut gap: impl FnMut() -> f64) -> u32 {
        self.weight = 0;
        while self.wait_time < 1.0 {
            self.wait_time += gap();
            self.weight += 1;
        }
        self.wait_time -= 1.0;
        self.weight
    }
}

impl Deref for Edge {
    type Target = Group;

    fn deref(&self) -> &Group {
        &self.members
    }
}

/// `a|b|weight` for each member pair; inactive edges render as nothing.
impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.weight == 0 {
            return Ok(());
        }
        for (a, b) in self.members.pairs() {
            writeln!(f, "{}|{}|{}", a, b, self.weight)?;
        }
        Ok(())
    }
}
