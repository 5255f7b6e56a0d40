use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, trace};

use crate::edge::{Edge, EdgeKey, edge_key};
use crate::error::{GeneratorError, Result};
use crate::group::Community;
use crate::params::{MIN_SPLITTABLE, Params};
use crate::power_law::PowerLaw;
use crate::vertex::{Vertex, VertexId};

/// A structural change recorded by the merge/split pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Community `index` split off a new community; `communities` is the
    /// community count at the time, i.e. the index of the new community.
    Split { index: usize, communities: usize },
    /// Community `from` was merged into `into` and emptied.
    Merge { from: usize, into: usize },
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Transition::Split { index, communities } => {
                write!(f, "{} {} {}", index, index, communities)
            }
            Transition::Merge { from, into } => write!(f, "{} {}", from, into),
        }
    }
}

/// One evolving snapshot of a temporal social network.
///
/// The network is mutated in place from window to window. Vertices live in an
/// arena indexed by id; communities and edges refer to them by id only.
/// Communities are never removed, so an index stays valid for the lifetime
/// of the network.
#[derive(Debug, Clone)]
pub struct Network<R = StdRng> {
    vertices: Vec<Vertex>,
    communities: Vec<Community>,
    edges: BTreeMap<EdgeKey, Edge>,
    membership: BTreeMap<VertexId, usize>,
    total_energy: f64,
    window: usize,
    energy_law: PowerLaw,
    size_law: PowerLaw,
    rng: R,
}

impl Network<StdRng> {
    /// An empty network whose random stream is seeded from the clock.
    pub fn new(params: &Params) -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::seeded(params, seed)
    }

    pub fn seeded(params: &Params, seed: u64) -> Self {
        Self::with_rng(params, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Network<R> {
    pub fn with_rng(params: &Params, rng: R) -> Self {
        Network {
            vertices: Vec::new(),
            communities: Vec::new(),
            edges: BTreeMap::new(),
            membership: BTreeMap::new(),
            total_energy: 0.0,
            window: 0,
            energy_law: params.energy_law(),
            size_law: params.size_law(),
            rng,
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn communities(&self) -> &[Community] {
        &self.communities
    }

    pub fn edges(&self) -> &BTreeMap<EdgeKey, Edge> {
        &self.edges
    }

    pub fn active_edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.values().filter(|e| e.is_active())
    }

    /// Representative community of each vertex, as of the last coverage pass.
    pub fn membership(&self) -> &BTreeMap<VertexId, usize> {
        &self.membership
    }

    pub fn total_energy(&self) -> f64 {
        self.total_energy
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Builds window 0: vertices, communities, coverage and edges.
    pub fn random_network(&mut self, params: &Params) {
        assert!(
            self.vertices.is_empty() && self.communities.is_empty(),
            "random_network called on a network that is already built"
        );
        self.add_vertices(params.v);

        match params.cnum {
            Some(target) => {
                for _ in 0..target {
                    let size = self.sample_community_size();
                    let community = self.random_community(size);
                    self.add_community(community);
                }
            }
            None => {
                let goal = params.vmem * self.vertices.len() as f64;
                let mut total_size = 0usize;
                while (total_size as f64) < goal {
                    let size = self.sample_community_size();
                    total_size += size;
                    let community = self.random_community(size);
                    self.add_community(community);
                }
            }
        }

        let filler = self.fill_communities();
        self.populate_edges(params);
        info!(
            vertices = self.vertices.len(),
            communities = self.communities.len(),
            filler,
            edges = self.edges.len(),
            "built initial window"
        );
    }

    /// Appends `n` vertices with freshly sampled energies.
    pub fn add_vertices(&mut self, n: usize) {
        self.vertices.reserve(n);
        for _ in 0..n {
            let id = self.vertices.len() as VertexId;
            let energy = self.energy_law.sample(&mut self.rng);
            self.total_energy += energy;
            self.vertices.push(Vertex::with_energy(id, energy));
        }
    }

    /// Returns the index of the new community.
    pub fn add_community(&mut self, community: Community) -> usize {
        self.communities.push(community);
        self.communities.len() - 1
    }

    /// Draws a vertex with probability proportional to its energy.
    pub fn random_vertex(&mut self) -> VertexId {
        assert!(!self.vertices.is_empty(), "random vertex of an empty network");
        let target = self.rng.gen_range(0.0..1.0) * self.total_energy;
        let mut accumulated = 0.0;
        for v in &self.vertices {
            accumulated += v.energy();
            if accumulated > target {
                return v.id();
            }
        }
        self.vertices[0].id()
    }

    /// Fills a community to exactly `size` distinct members by energy-biased
    /// draws, capped at the number of vertices.
    pub fn random_community(&mut self, size: usize) -> Community {
        let size = size.min(self.vertices.len());
        let mut community = Community::new();
        while community.size() < size {
            let v = self.random_vertex();
            community.add_member(v);
        }
        community
    }

    fn sample_community_size(&mut self) -> usize {
        let size = self.size_law.sample(&mut self.rng) as usize;
        size.clamp(1, self.vertices.len().max(1))
    }

    /// Rebuilds the membership map and adds communities until every vertex
    /// belongs to at least one. Returns the number of communities added.
    ///
    /// New communities take uncovered vertices in id order; when the vertex
    /// list runs out first they are padded with energy-biased picks.
    pub fn fill_communities(&mut self) -> usize {
        self.membership.clear();
        for (index, community) in self.communities.iter().enumerate() {
            for &v in community.members() {
                self.membership.entry(v).or_insert(index);
            }
        }

        let mut added = 0;
        let mut cursor = 0;
        while self.membership.len() < self.vertices.len() {
            let target = self.sample_community_size();
            let index = self.communities.len();
            let mut community = Community::new();

            while community.size() < target && cursor < self.vertices.len() {
                let id = self.vertices[cursor].id();
                cursor += 1;
                if !self.membership.contains_key(&id) {
                    community.add_member(id);
                    self.membership.insert(id, index);
                }
            }
            while community.size() < target {
                let v = self.random_vertex();
                if community.add_member(v) {
                    self.membership.entry(v).or_insert(index);
                }
            }

            self.communities.push(community);
            added += 1;
        }
        added
    }

    /// Regenerates the edge set for the current community structure.
    ///
    /// Every member pair of every community becomes an edge, reusing the
    /// previous window's edge for that pair so its interaction process
    /// continues. Noise edges between energy-biased random pairs are added in
    /// proportion `(1 - mp) / mp` to the internal edges. Pairs that no longer
    /// occur are dropped, and each surviving edge draws its weight once more.
    ///
    /// Noise pairs are drawn before the internal edges take their first
    /// weight draw, so the resulting pair set depends only on the community
    /// structure and the random stream, never on carried `wait_time`s.
    pub fn populate_edges(&mut self, params: &Params) {
        let mut previous = std::mem::take(&mut self.edges);
        let mut next: BTreeMap<EdgeKey, Edge> = BTreeMap::new();
        let mut internal_order = Vec::new();

        for community in &self.communities {
            for (a, b) in community.pairs() {
                if let Entry::Vacant(slot) = next.entry((a, b)) {
                    let edge = previous
                        .remove(&(a, b))
                        .unwrap_or_else(|| Edge::between(a, b));
                    slot.insert(edge);
                    internal_order.push((a, b));
                }
            }
        }

        let internal = next.len();
        let to_generate = ((1.0 - params.mp) / params.mp * internal as f64) as usize;
        let mut skipped = 0usize;
        for _ in 0..to_generate {
            let a = self.random_vertex();
            let b = self.random_vertex();
            if a == b {
                skipped += 1;
                continue;
            }
            let key = edge_key(a, b);
            match next.entry(key) {
                Entry::Occupied(_) => {
                    trace!(a, b, "noise pair already present");
                    skipped += 1;
                }
                Entry::Vacant(slot) => {
                    let edge = previous
                        .remove(&key)
                        .unwrap_or_else(|| Edge::between(key.0, key.1));
                    slot.insert(edge);
                }
            }
        }
        for key in &internal_order {
            if let Some(edge) = next.get_mut(key) {
                edge.generate_weight(&mut self.vertices, params, &mut self.rng);
            }
        }
        debug!(
            internal,
            noise = next.len() - internal,
            skipped,
            dropped = previous.len(),
            "populated edges"
        );

        self.edges = next;
        for v in &mut self.vertices {
            v.reset_edge_count();
        }
        for edge in self.edges.values_mut() {
            edge.generate_weight(&mut self.vertices, params, &mut self.rng);
        }
    }

    /// Advances the network by one window and returns the merge/split
    /// transitions that took place.
    pub fn gen_next_time_window(&mut self, params: &Params) -> Vec<Transition> {
        let grown = self.grow_vertices(params);
        let died = self.kill_communities(params);
        self.grow_and_shrink(params);
        let transitions = self.merge_and_split(params);
        let born = self.give_birth(params);
        let filler = self.fill_communities();
        self.populate_edges(params);
        self.window += 1;

        debug!(
            window = self.window,
            grown,
            died,
            born,
            filler,
            transitions = transitions.len(),
            "evolved community structure"
        );
        transitions
    }

    fn grow_vertices(&mut self, params: &Params) -> usize {
        let fraction = self.rng.gen_range(params.vnewmin..=params.vnewmax);
        let n = (self.vertices.len() as f64 * fraction) as usize;
        self.add_vertices(n);
        n
    }

    fn kill_communities(&mut self, params: &Params) -> usize {
        let mut died = 0;
        for community in &mut self.communities {
            if self.rng.gen_bool(params.cdie) {
                community.clear_members();
                died += 1;
            }
        }
        died
    }

    fn grow_and_shrink(&mut self, params: &Params) {
        for index in 0..self.communities.len() {
            let size = self.communities[index].size();
            if size == 0 {
                continue;
            }
            let grow = self.rng.gen_bool(params.pgrow);
            let change = self.rng.gen_range(0.0..=params.maxgrow);
            let factor = if grow { 1.0 + change } else { 1.0 - change };
            let target = ((size as f64 * factor) as usize).min(self.vertices.len());

            while self.communities[index].size() > target {
                self.communities[index].remove_random_member(&mut self.rng);
            }
            while self.communities[index].size() < target {
                let v = self.random_vertex();
                self.communities[index].add_member(v);
            }
        }
    }

    /// Marks communities for merging or splits them, then merges the marked
    /// ones in shuffled consecutive pairs.
    ///
    /// Every slot draws a fate, empty ones included; with `pmerge > 0` an
    /// empty slot always falls under the merge threshold. The split threshold
    /// includes the merge term: with `pmerge == 0` every community of at
    /// least `minsplit` members splits.
    fn merge_and_split(&mut self, params: &Params) -> Vec<Transition> {
        let mut transitions = Vec::new();
        let mut to_merge = Vec::new();

        let scanned = self.communities.len();
        for index in 0..scanned {
            let size = self.communities[index].size();
            let fate: f64 = self.rng.gen_range(0.0..1.0);
            let merge_threshold = 1.0 / (size as f64).powf(params.pmerge);
            if params.pmerge > 0.0 && fate < merge_threshold {
                to_merge.push(index);
            } else if size >= params.minsplit
                && fate < merge_threshold + (size as f64 * params.psplit).min(1.0)
            {
                transitions.push(self.split_community(index, params.dup));
            }
        }

        to_merge.shuffle(&mut self.rng);
        for pair in to_merge.chunks_exact(2) {
            transitions.push(self.merge_communities(pair[0], pair[1]));
        }
        transitions
    }

    /// Moves between 3 and `size - 3` random members of a community into a new
    /// community. Each moved member stays behind as well with probability `dup`.
    pub fn split_community(&mut self, index: usize, dup: f64) -> Transition {
        let size = self.communities[index].size();
        assert!(
            size >= MIN_SPLITTABLE,
            "community {index} of size {size} is too small to split"
        );
        let split_size = self.rng.gen_range(3..=size - 3);

        let mut candidates: Vec<VertexId> =
            self.communities[index].members().iter().copied().collect();
        let mut split = Community::new();
        for _ in 0..split_size {
            let choice = self.rng.gen_range(0..candidates.len());
            let v = candidates.remove(choice);
            split.add_member(v);
            if !self.rng.gen_bool(dup) {
                self.communities[index].remove_member(v);
            }
        }

        let record = Transition::Split {
            index,
            communities: self.communities.len(),
        };
        self.communities.push(split);
        record
    }

    /// Moves every member of `from` into `into` and empties `from`.
    pub fn merge_communities(&mut self, into: usize, from: usize) -> Transition {
        let moved: Vec<VertexId> = self.communities[from].members().iter().copied().collect();
        self.communities[from].clear_members();
        for v in moved {
            self.communities[into].add_member(v);
        }
        Transition::Merge { from, into }
    }

    fn give_birth(&mut self, params: &Params) -> usize {
        let born = (params.cnew * self.communities.len() as f64) as usize;
        for _ in 0..born {
            let size = self.sample_community_size();
            let community = self.random_community(size);
            self.add_community(community);
        }
        born
    }

    /// Edge list of the current window, `a|b|weight` per line, active edges only.
    pub fn render_edges(&self) -> String {
        let edges: Vec<&Edge> = self.edges.values().collect();
        edges.par_iter().map(|e| e.to_string()).collect()
    }

    /// One line per community index, members separated by spaces; dead
    /// communities produce empty lines.
    pub fn render_communities(&self) -> String {
        let mut out = String::new();
        for community in &self.communities {
            let line: Vec<String> = community.members().iter().map(|v| v.to_string()).collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }

    pub fn print_network(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render_edges()).map_err(|source| GeneratorError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn small_params() -> Params {
        Params {
            v: 60,
            cmin: 5.0,
            cmax: 12.0,
            ..Params::default()
        }
    }

    fn built(params: &Params, seed: u64) -> Network {
        let mut net = Network::seeded(params, seed);
        net.random_network(params);
        net
    }

    /// Four vertices in one community covering all of them, no noise.
    fn square_params() -> Params {
        Params {
            v: 4,
            cnum: Some(1),
            cmin: 4.0,
            cmax: 4.0,
            mp: 1.0,
            ..Params::default()
        }
    }

    #[test]
    fn vertices_get_sequential_ids_and_energy_total() {
        let params = small_params();
        let net = built(&params, 1);
        assert_eq!(net.num_vertices(), 60);
        for (i, v) in net.vertices().iter().enumerate() {
            assert_eq!(v.id() as usize, i);
            assert!(v.energy() >= params.vmin && v.energy() <= params.vmax);
        }
        let sum: f64 = net.vertices().iter().map(Vertex::energy).sum();
        assert!((sum - net.total_energy()).abs() < 1e-9);
    }

    #[test]
    fn random_community_has_exact_distinct_size() {
        let params = small_params();
        let mut net = Network::seeded(&params, 2);
        net.add_vertices(20);
        let c = net.random_community(5);
        assert_eq!(c.size(), 5);
        let distinct: BTreeSet<_> = c.members().iter().collect();
        assert_eq!(distinct.len(), 5);
    }

    #[test]
    fn random_vertex_favours_energy() {
        let params = small_params();
        let mut net = Network::seeded(&params, 3);
        net.vertices = vec![Vertex::with_energy(0, 0.1), Vertex::with_energy(1, 0.9)];
        net.total_energy = 1.0;
        let heavy = (0..1000).filter(|_| net.random_vertex() == 1).count();
        assert!(heavy > 800, "{heavy}");
    }

    #[test]
    fn fill_covers_every_vertex() {
        let params = Params {
            cnum: Some(1),
            ..small_params()
        };
        let mut net = built(&params, 4);
        for v in net.vertices() {
            assert!(net.membership().contains_key(&v.id()));
        }

        net.add_vertices(17);
        net.fill_communities();
        assert_eq!(net.membership().len(), net.num_vertices());
        for (&v, &index) in net.membership() {
            assert!(net.communities()[index].has_member(v));
        }
    }

    #[test]
    fn membership_records_first_community() {
        let params = small_params();
        let mut net = Network::seeded(&params, 5);
        net.add_vertices(3);
        net.add_community([1, 2].into_iter().collect());
        net.add_community([0, 1].into_iter().collect());
        assert_eq!(net.fill_communities(), 0);
        assert_eq!(net.membership()[&0], 1);
        assert_eq!(net.membership()[&1], 0);
        assert_eq!(net.membership()[&2], 0);
    }

    #[test]
    fn single_community_yields_all_pairs() {
        let params = square_params();
        let net = built(&params, 6);
        assert_eq!(net.communities().len(), 1);
        assert_eq!(net.communities()[0].size(), 4);
        let keys: Vec<_> = net.edges().keys().copied().collect();
        assert_eq!(keys, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);

        let printed = net.render_edges();
        let active = net.active_edges().count();
        assert_eq!(printed.lines().count(), active);
        for line in printed.lines() {
            let fields: Vec<&str> = line.split('|').collect();
            assert_eq!(fields.len(), 3);
            assert!(fields[2].parse::<u32>().unwrap() > 0);
        }
    }

    #[test]
    fn edge_counts_match_active_edges() {
        let params = small_params();
        let net = built(&params, 7);
        let mut expected = vec![0u32; net.num_vertices()];
        for e in net.active_edges() {
            let (a, b) = e.key();
            expected[a as usize] += 1;
            expected[b as usize] += 1;
        }
        let counts: Vec<u32> = net.vertices().iter().map(Vertex::edge_count).collect();
        assert_eq!(counts, expected);
    }

    #[test]
    fn populate_edges_is_repeatable_with_the_same_stream() {
        let params = small_params();
        let mut net = built(&params, 8);

        net.rng = StdRng::seed_from_u64(99);
        net.populate_edges(&params);
        let first: Vec<EdgeKey> = net.edges().keys().copied().collect();

        net.rng = StdRng::seed_from_u64(99);
        net.populate_edges(&params);
        let second: Vec<EdgeKey> = net.edges().keys().copied().collect();

        assert_eq!(first, second);
    }

    #[test]
    fn edge_pairs_do_not_depend_on_carried_wait_times() {
        let params = Params {
            mp: 0.5,
            ..small_params()
        };
        let mut net = built(&params, 18);

        net.rng = StdRng::seed_from_u64(5);
        net.populate_edges(&params);
        let first: Vec<EdgeKey> = net.edges().keys().copied().collect();

        for edge in net.edges.values_mut() {
            edge.set_wait_time(0.0);
        }
        net.rng = StdRng::seed_from_u64(5);
        net.populate_edges(&params);
        let second: Vec<EdgeKey> = net.edges().keys().copied().collect();

        assert_eq!(first, second);
    }

    #[test]
    fn noise_edges_are_added_when_mixing_below_one() {
        let params = Params {
            mp: 0.5,
            ..small_params()
        };
        let net = built(&params, 9);
        let internal: BTreeSet<EdgeKey> = net
            .communities()
            .iter()
            .flat_map(|c| c.pairs().collect::<Vec<_>>())
            .collect();
        assert!(net.edges().len() > internal.len());
        for key in &internal {
            assert!(net.edges().contains_key(key));
        }
    }

    #[test]
    fn recurring_pairs_keep_their_edge() {
        let params = Params {
            cdie: 0.0,
            maxgrow: 0.0,
            pmerge: 0.0,
            cnew: 0.0,
            vnewmin: 0.0,
            vnewmax: 0.0,
            ..square_params()
        };
        let mut net = built(&params, 10);
        net.edges.get_mut(&(0, 1)).unwrap().set_wait_time(50.0);

        let transitions = net.gen_next_time_window(&params);
        assert!(transitions.is_empty());
        assert_eq!(net.window(), 1);
        assert_eq!(net.edges().len(), 6);
        // one pre-seed draw plus the authoritative draw
        let edge = &net.edges()[&(0, 1)];
        assert_eq!(edge.wait_time(), 48.0);
        assert_eq!(edge.weight(), 0);
        assert!(!net.render_edges().contains("0|1|"));
    }

    #[test]
    fn vertex_growth_follows_fraction() {
        let params = Params {
            vnewmin: 0.5,
            vnewmax: 0.5,
            ..small_params()
        };
        let mut net = built(&params, 11);
        net.gen_next_time_window(&params);
        assert_eq!(net.num_vertices(), 90);
        assert_eq!(net.vertices().last().unwrap().id(), 89);
        assert_eq!(net.membership().len(), 90);
    }

    #[test]
    fn dead_communities_keep_their_slot() {
        let params = Params {
            cdie: 1.0,
            cnew: 0.0,
            vnewmin: 0.0,
            vnewmax: 0.0,
            ..small_params()
        };
        let mut net = built(&params, 12);
        let before = net.communities().len();
        net.gen_next_time_window(&params);

        assert!(net.communities().len() > before);
        assert!(net.communities()[..before].iter().all(|c| c.is_empty()));
        assert!(net.membership().values().all(|&index| index >= before));
        assert_eq!(net.membership().len(), net.num_vertices());
    }

    #[test]
    fn merge_pass_conserves_memberships() {
        let params = Params {
            pmerge: 1e-9,
            ..small_params()
        };
        let mut net = Network::seeded(&params, 13);
        net.add_vertices(30);
        for start in (0..30).step_by(5) {
            net.add_community((start..start + 5).collect());
        }
        let total = |net: &Network| net.communities().iter().map(|c| c.size()).sum::<usize>();
        assert_eq!(total(&net), 30);

        let transitions = net.merge_and_split(&params);
        assert_eq!(transitions.len(), 3);
        assert!(transitions
            .iter()
            .all(|t| matches!(t, Transition::Merge { .. })));
        assert_eq!(total(&net), 30);
        assert_eq!(net.communities().len(), 6);
        assert_eq!(net.communities().iter().filter(|c| c.is_empty()).count(), 3);
    }

    #[test]
    fn split_conserves_members_plus_copies() {
        let params = small_params();
        let mut net = Network::seeded(&params, 14);
        net.add_vertices(20);
        let original: Community = (0..20).collect();
        net.add_community(original.clone());

        let record = net.split_community(0, 0.5);
        assert_eq!(record, Transition::Split { index: 0, communities: 1 });
        assert_eq!(record.to_string(), "0 0 1");

        let old = &net.communities()[0];
        let new = &net.communities()[1];
        let copies = old.members().intersection(new.members()).count();
        assert!((3..=17).contains(&new.size()));
        assert_eq!(old.size() + new.size(), 20 + copies);
        let union: BTreeSet<_> = old.members().union(new.members()).copied().collect();
        assert_eq!(&union, original.members());
    }

    #[test]
    fn disabled_merging_splits_every_large_community() {
        let params = Params {
            pmerge: 0.0,
            psplit: 0.0,
            ..small_params()
        };
        let mut net = Network::seeded(&params, 15);
        net.add_vertices(20);
        net.add_community((0..10).collect());
        net.add_community((10..14).collect());

        let transitions = net.merge_and_split(&params);
        assert_eq!(transitions, vec![Transition::Split { index: 0, communities: 2 }]);
        assert_eq!(net.communities().len(), 3);
    }

    #[test]
    #[should_panic]
    fn splitting_a_small_community_panics() {
        let params = small_params();
        let mut net = Network::seeded(&params, 16);
        net.add_vertices(5);
        net.add_community((0..5).collect());
        net.split_community(0, 0.0);
    }

    #[test]
    fn empty_slots_are_always_marked_for_merging() {
        let params = Params {
            pmerge: 1.0,
            psplit: 0.0,
            ..small_params()
        };
        let mut net = Network::seeded(&params, 19);
        net.add_vertices(3);
        net.add_community(Community::new());
        net.add_community((0..3).collect());
        net.add_community(Community::new());

        let transitions = net.merge_and_split(&params);
        assert!(!transitions.is_empty());
        assert!(transitions
            .iter()
            .all(|t| matches!(t, Transition::Merge { .. })));
        let total: usize = net.communities().iter().map(|c| c.size()).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn growing_community_reaches_its_target() {
        let params = Params {
            pgrow: 1.0,
            maxgrow: 0.5,
            ..small_params()
        };
        let mut net = Network::seeded(&params, 20);
        net.add_vertices(40);
        let original: Community = (0..10).collect();
        net.add_community(original.clone());

        let mut replay = net.rng.clone();
        assert!(replay.gen_bool(params.pgrow));
        let change = replay.gen_range(0.0..=params.maxgrow);
        let target = (10.0 * (1.0 + change)) as usize;

        net.grow_and_shrink(&params);
        let grown = &net.communities()[0];
        assert_eq!(grown.size(), target);
        assert!((10..=15).contains(&grown.size()));
        assert!(original.members().is_subset(grown.members()));
    }

    #[test]
    fn shrinking_community_only_loses_members() {
        let params = Params {
            pgrow: 0.0,
            maxgrow: 0.5,
            ..small_params()
        };
        let mut net = Network::seeded(&params, 21);
        net.add_vertices(40);
        let original: Community = (0..10).collect();
        net.add_community(original.clone());

        let mut replay = net.rng.clone();
        assert!(!replay.gen_bool(params.pgrow));
        let change = replay.gen_range(0.0..=params.maxgrow);
        let target = (10.0 * (1.0 - change)) as usize;

        net.grow_and_shrink(&params);
        let shrunk = &net.communities()[0];
        assert_eq!(shrunk.size(), target);
        assert!((5..=10).contains(&shrunk.size()));
        assert!(shrunk.members().is_subset(original.members()));
    }

    #[test]
    fn growth_is_capped_at_the_vertex_count() {
        let params = Params {
            pgrow: 1.0,
            maxgrow: 1.0,
            ..small_params()
        };
        let mut net = Network::seeded(&params, 22);
        net.add_vertices(12);
        net.add_community((0..10).collect());
        net.add_community(Community::new());

        net.grow_and_shrink(&params);
        assert!(net.communities()[0].size() <= 12);
        assert!(net.communities()[0].size() >= 10);
        assert!(net.communities()[1].is_empty());
    }

    #[test]
    fn birth_adds_exact_size_communities() {
        let params = Params {
            cnew: 0.5,
            cmin: 6.0,
            cmax: 6.0,
            ..small_params()
        };
        let mut net = Network::with_rng(&params, StdRng::seed_from_u64(23));
        net.add_vertices(30);
        for start in (0..20).step_by(5) {
            net.add_community((start..start + 5).collect());
        }

        assert_eq!(net.give_birth(&params), 2);
        assert_eq!(net.communities().len(), 6);
        for born in &net.communities()[4..] {
            assert_eq!(born.size(), 6);
            assert!(born.members().iter().all(|&v| v < 30));
        }
    }

    #[test]
    fn merge_transition_prints_second_then_first() {
        assert_eq!(Transition::Merge { from: 4, into: 2 }.to_string(), "4 2");
    }

    #[test]
    fn communities_render_one_line_per_index() {
        let params = small_params();
        let mut net = Network::seeded(&params, 17);
        net.add_vertices(4);
        net.add_community([0, 2].into_iter().collect());
        net.add_community(Community::new());
        net.add_community([3, 1].into_iter().collect());
        assert_eq!(net.render_communities(), "0 2\n\n1 3\n");
    }
}
