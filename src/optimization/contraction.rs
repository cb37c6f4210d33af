//! Contraction finder: what happens when a group of operands is combined.

use std::collections::BTreeSet;

/// Outcome of contracting one group of operand positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contraction {
    /// Labels of the synthesized operand.
    pub result: BTreeSet<char>,
    /// Labels that do not survive this step: absent from the final output
    /// and from every other remaining operand.
    pub eliminated: BTreeSet<char>,
    /// Eliminated labels shared by two or more grouped operands — the true
    /// summations. Eliminated labels outside this set are trivial
    /// single-operand reductions.
    pub contracted: BTreeSet<char>,
    /// Operand sets left after the step, with the result appended last.
    pub remaining: Vec<BTreeSet<char>>,
}

impl Contraction {
    /// Every label involved in the step; its size product drives the cost
    /// estimate and its cardinality is the step's scaling.
    pub fn touched(&self) -> BTreeSet<char> {
        self.result.union(&self.eliminated).copied().collect()
    }
}

/// Resolves the effect of combining the operands at `positions`.
///
/// A label is eliminated iff it appears in no other remaining operand and
/// not in the output; the synthesized operand keeps everything else from
/// the union of the grouped label sets.
pub fn find_contraction(
    positions: &[usize],
    input_sets: &[BTreeSet<char>],
    output_set: &BTreeSet<char>,
) -> Contraction {
    let mut union: BTreeSet<char> = BTreeSet::new();
    let mut remaining: Vec<BTreeSet<char>> = Vec::with_capacity(input_sets.len());
    let mut kept_elsewhere: BTreeSet<char> = output_set.clone();

    for (pos, set) in input_sets.iter().enumerate() {
        if positions.contains(&pos) {
            union.extend(set.iter().copied());
        } else {
            kept_elsewhere.extend(set.iter().copied());
            remaining.push(set.clone());
        }
    }

    let eliminated: BTreeSet<char> = union.difference(&kept_elsewhere).copied().collect();
    let result: BTreeSet<char> = union.difference(&eliminated).copied().collect();

    let contracted: BTreeSet<char> = eliminated
        .iter()
        .filter(|c| {
            positions
                .iter()
                .filter(|&&pos| input_sets[pos].contains(c))
                .count()
                > 1
        })
        .copied()
        .collect();

    remaining.push(result.clone());

    Contraction {
        result,
        eliminated,
        contracted,
        remaining,
    }
}

/// Live state of a path search: the evolving operand sets plus the fixed
/// output set. Passed by value so each search branch works on its own
/// snapshot.
#[derive(Debug, Clone)]
pub struct SearchState {
    pub operand_sets: Vec<BTreeSet<char>>,
    pub output_set: BTreeSet<char>,
}

impl SearchState {
    pub fn new(operand_sets: Vec<BTreeSet<char>>, output_set: BTreeSet<char>) -> Self {
        Self {
            operand_sets,
            output_set,
        }
    }

    /// Number of operands still live.
    pub fn len(&self) -> usize {
        self.operand_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operand_sets.is_empty()
    }

    /// Resolves a candidate group against the current state.
    pub fn resolve(&self, positions: &[usize]) -> Contraction {
        find_contraction(positions, &self.operand_sets, &self.output_set)
    }

    /// Applies a group, producing the successor state.
    pub fn apply(&self, contraction: &Contraction) -> SearchState {
        SearchState {
            operand_sets: contraction.remaining.clone(),
            output_set: self.output_set.clone(),
        }
    }
}
