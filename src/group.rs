use rand::Rng;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::vertex::VertexId;

/// An unordered, duplicate-free set of vertices, iterated in ascending id order.
///
/// Groups compare lexicographically over their sorted ids; when one group is a
/// prefix of the other, the shorter one sorts first.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Group {
    members: BTreeSet<VertexId>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the vertex was already a member.
    pub fn add_member(&mut self, v: VertexId) -> bool {
        self.members.insert(v)
    }

    pub fn has_member(&self, v: VertexId) -> bool {
        self.members.contains(&v)
    }

    /// Picks a member uniformly by position. Panics on an empty group.
    pub fn random_member<R: Rng + ?Sized>(&self, rng: &mut R) -> VertexId {
        assert!(!self.members.is_empty(), "random member of an empty group");
        let choice = rng.gen_range(0..self.members.len());
        *self
            .members
            .iter()
            .nth(choice)
            .expect("choice is within bounds")
    }

    pub fn remove_random_member<R: Rng + ?Sized>(&mut self, rng: &mut R) -> VertexId {
        let v = self.random_member(rng);
        self.members.remove(&v);
        v
    }

    pub fn remove_member(&mut self, v: VertexId) -> bool {
        self.members.remove(&v)
    }

    pub fn clear_members(&mut self) {
        self.members.clear();
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &BTreeSet<VertexId> {
        &self.members
    }

    /// Every unordered pair of distinct members, in group order.
    pub fn pairs(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.members.iter().enumerate().flat_map(move |(i, &a)| {
            self.members.iter().skip(i + 1).map(move |&b| (a, b))
        })
    }
}

impl FromIterator<VertexId> for Group {
    fn from_iter<I: IntoIterator<Item = VertexId>>(iter: I) -> Self {
        Group {
            members: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "( ")?;
        for v in &self.members {
            write!(f, "{} ", v)?;
        }
        write!(f, ")")
    }
}

/// A group of vertices sharing some context.
///
/// A community is never removed from its network; "death" empties it so the
/// indices of later communities stay put.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Community(Group);

impl Community {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Deref for Community {
    type Target = Group;

    fn deref(&self) -> &Group {
        &self.0
    }
}

impl DerefMut for Community {
    fn deref_mut(&mut self) -> &mut Group {
        &mut self.0
    }
}

impl FromIterator<VertexId> for Community {
    fn from_iter<I: IntoIterator<Item = VertexId>>(iter: I) -> Self {
        Community(iter.into_iter().collect())
    }
}

impl fmt::Display for Community {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
