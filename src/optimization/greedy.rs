//! Greedy contraction path search.
//!
//! Cubic heuristic: at every step combine the pair of operands with the
//! best score, preferring pairs that eliminate large index sets.

use std::collections::BTreeSet;

use smallvec::smallvec;

use super::contraction::{Contraction, SearchState};
use super::cost::{DimensionTable, compute_size, flop_count};
use super::path::{ContractionGroup, ContractionPath};

struct Candidate {
    /// Score plus tie-breaks: flop estimate minus the size of what the pair
    /// eliminates, then the synthesized operand size, then the position
    /// pair. Lower wins; the ordering is deterministic by construction.
    key: (i128, u64, usize, usize),
    group: ContractionGroup,
    contraction: Contraction,
}

/// Finds a contraction path with the greedy heuristic.
///
/// Only pairs sharing at least one label are considered; pure outer
/// products are deferred and folded in as merges of the two smallest
/// operands once nothing shares a label. Candidates whose synthesized
/// operand exceeds `memory_limit` are rejected unless nothing fits, in
/// which case the least-bad one is taken so the search always progresses.
pub fn greedy_path(
    input_sets: &[BTreeSet<char>],
    output_set: &BTreeSet<char>,
    dims: &DimensionTable,
    memory_limit: u64,
) -> ContractionPath {
    let n = input_sets.len();
    if n <= 2 {
        return ContractionPath::full_group(n);
    }

    let mut state = SearchState::new(input_sets.to_vec(), output_set.clone());
    let mut path = ContractionPath::with_capacity(n - 1);

    while state.len() > 1 {
        let chosen = match best_pair(&state, dims, memory_limit) {
            Some(candidate) => candidate,
            None => outer_product_fallback(&state, dims),
        };

        state = state.apply(&chosen.contraction);
        path.push(chosen.group);
    }

    path
}

fn best_pair(state: &SearchState, dims: &DimensionTable, memory_limit: u64) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    let mut least_bad: Option<Candidate> = None;

    let n = state.len();
    for i in 0..n {
        for j in (i + 1)..n {
            if state.operand_sets[i].is_disjoint(&state.operand_sets[j]) {
                continue;
            }

            let contraction = state.resolve(&[i, j]);
            let result_size = compute_size(&contraction.result, dims);
            let cost = flop_count(
                &contraction.touched(),
                !contraction.eliminated.is_empty(),
                2,
                dims,
            );
            let eliminated_size = compute_size(&contraction.eliminated, dims);

            let candidate = Candidate {
                key: (
                    cost as i128 - eliminated_size as i128,
                    result_size,
                    i,
                    j,
                ),
                group: smallvec![i, j],
                contraction,
            };

            let slot = if result_size <= memory_limit {
                &mut best
            } else {
                &mut least_bad
            };
            if slot.as_ref().is_none_or(|held| candidate.key < held.key) {
                *slot = Some(candidate);
            }
        }
    }

    best.or(least_bad)
}

/// No remaining pair shares a label: merge the two smallest operands.
fn outer_product_fallback(state: &SearchState, dims: &DimensionTable) -> Candidate {
    let mut sizes: Vec<(u64, usize)> = state
        .operand_sets
        .iter()
        .enumerate()
        .map(|(pos, set)| (compute_size(set, dims), pos))
        .collect();
    sizes.sort_unstable();

    let (mut i, mut j) = (sizes[0].1, sizes[1].1);
    if i > j {
        core::mem::swap(&mut i, &mut j);
    }

    let contraction = state.resolve(&[i, j]);
    Candidate {
        key: (0, 0, i, j),
        group: smallvec![i, j],
        contraction,
    }
}
