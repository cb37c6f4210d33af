//! Subscript representation for einsum notation.

use core::fmt;

/// A single entry in an einsum subscript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Index {
    /// A named index (a-z, A-Z).
    Named(char),
    /// Ellipsis standing for zero or more leading dimensions.
    Ellipsis,
}

impl Index {
    #[inline]
    pub fn is_ellipsis(&self) -> bool {
        matches!(self, Index::Ellipsis)
    }

    #[inline]
    pub fn as_char(&self) -> Option<char> {
        match self {
            Index::Named(c) => Some(*c),
            Index::Ellipsis => None,
        }
    }
}

/// The index sequence of a single operand.
///
/// In `ij,jk->ik` the subscripts are `ij`, `jk` and `ik`. A label may repeat
/// within one subscript to denote a diagonal (`ii`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Subscript {
    indices: Vec<Index>,
    ellipsis_pos: Option<usize>,
}

impl Subscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_chars(chars: impl IntoIterator<Item = char>) -> Self {
        let indices: Vec<Index> = chars.into_iter().map(Index::Named).collect();
        Self {
            indices,
            ellipsis_pos: None,
        }
    }

    pub fn push_named(&mut self, c: char) {
        self.indices.push(Index::Named(c));
    }

    /// Adds an ellipsis. At most one per subscript; later calls are ignored
    /// by construction (the parser rejects a second one before calling this).
    pub fn push_ellipsis(&mut self) {
        if self.ellipsis_pos.is_none() {
            self.ellipsis_pos = Some(self.indices.len());
            self.indices.push(Index::Ellipsis);
        }
    }

    #[inline]
    pub fn has_ellipsis(&self) -> bool {
        self.ellipsis_pos.is_some()
    }

    /// Number of explicit (non-ellipsis) indices.
    pub fn explicit_count(&self) -> usize {
        self.indices.iter().filter(|i| !i.is_ellipsis()).count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterator over named indices, skipping the ellipsis.
    pub fn named_indices(&self) -> impl Iterator<Item = char> + '_ {
        self.indices.iter().filter_map(|i| i.as_char())
    }

    /// Occurrences of a named index within this subscript.
    pub fn count(&self, c: char) -> usize {
        self.named_indices().filter(|&x| x == c).count()
    }

    /// Replaces the ellipsis with the given labels, producing a plain term
    /// string. `labels` is the full widest broadcast label list; a narrower
    /// operand takes the trailing portion (right alignment).
    pub fn expand_ellipsis(&self, labels: &[char], width: usize) -> String {
        let mut term = String::with_capacity(self.explicit_count() + width);
        for idx in &self.indices {
            match idx {
                Index::Ellipsis => {
                    for &c in &labels[labels.len() - width..] {
                        term.push(c);
                    }
                }
                Index::Named(c) => term.push(*c),
            }
        }
        term
    }
}

impl fmt::Display for Subscript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for idx in &self.indices {
            match idx {
                Index::Named(c) => write!(f, "{}", c)?,
                Index::Ellipsis => write!(f, "...")?,
            }
        }
        Ok(())
    }
}
