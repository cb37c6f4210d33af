//! Contraction path representation.

use smallvec::SmallVec;

/// One group of operand positions combined in a single step. Groups are
/// nearly always pairs; larger groups appear only in fallback paths.
pub type ContractionGroup = SmallVec<[usize; 2]>;

/// An ordered sequence of contraction groups. Applying every group in
/// order, replacing its members with one synthesized operand appended at
/// the end of the list, reduces the operand list to a single entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractionPath {
    groups: Vec<ContractionGroup>,
}

impl ContractionPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            groups: Vec::with_capacity(capacity),
        }
    }

    /// A path made of explicit position groups, e.g. `[[1, 2], [0, 1]]`.
    pub fn from_groups(groups: impl IntoIterator<Item = Vec<usize>>) -> Self {
        Self {
            groups: groups.into_iter().map(ContractionGroup::from_vec).collect(),
        }
    }

    /// The single-group path combining all `n` operands at once.
    pub fn full_group(n: usize) -> Self {
        let mut path = Self::with_capacity(1);
        path.push((0..n).collect());
        path
    }

    pub fn push(&mut self, group: ContractionGroup) {
        self.groups.push(group);
    }

    pub fn groups(&self) -> &[ContractionGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Position pairs for display and tests; groups larger than two are
    /// returned as-is in their vectors.
    pub fn as_vecs(&self) -> Vec<Vec<usize>> {
        self.groups.iter().map(|g| g.to_vec()).collect()
    }
}

impl FromIterator<ContractionGroup> for ContractionPath {
    fn from_iter<T: IntoIterator<Item = ContractionGroup>>(iter: T) -> Self {
        Self {
            groups: iter.into_iter().collect(),
        }
    }
}
