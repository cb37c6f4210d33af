//! Exhaustive optimal path search with branch-and-bound pruning.
//!
//! Explores every way of reducing the operand list to one entry through
//! pairwise contractions. Combinatorial in the number of operands; callers
//! cap arity before choosing this strategy.

use std::collections::BTreeSet;

use smallvec::smallvec;

use super::contraction::{Contraction, SearchState};
use super::cost::{DimensionTable, compute_size, flop_count};
use super::path::{ContractionGroup, ContractionPath};
use super::greedy::greedy_path;

/// Branch-and-bound search state: the best complete path found so far
/// bounds every partial sequence still being explored.
struct OptimalSearch<'a> {
    dims: &'a DimensionTable,
    memory_limit: u64,
    best_cost: u64,
    best_path: Option<ContractionPath>,
}

/// Finds the minimum-cost contraction path over all pairwise reduction
/// orders whose intermediates fit in `memory_limit`.
///
/// The bound is seeded with the greedy solution when that solution itself
/// respects the memory limit, so the result is never worse than greedy.
/// If the limit prunes every complete sequence, the single full-group path
/// is returned and the one-shot contraction left to the general primitive.
pub fn optimal_path(
    input_sets: &[BTreeSet<char>],
    output_set: &BTreeSet<char>,
    dims: &DimensionTable,
    memory_limit: u64,
) -> ContractionPath {
    let n = input_sets.len();
    if n <= 2 {
        return ContractionPath::full_group(n);
    }

    let state = SearchState::new(input_sets.to_vec(), output_set.clone());

    let mut search = OptimalSearch {
        dims,
        memory_limit,
        best_cost: u64::MAX,
        best_path: None,
    };

    let greedy = greedy_path(input_sets, output_set, dims, memory_limit);
    if let Some(cost) = path_cost_within_limit(&state, &greedy, dims, memory_limit) {
        search.best_cost = cost;
        search.best_path = Some(greedy);
    }

    let mut prefix: Vec<ContractionGroup> = Vec::with_capacity(n - 1);
    search.explore(&state, &mut prefix, 0);

    search
        .best_path
        .unwrap_or_else(|| ContractionPath::full_group(n))
}

impl OptimalSearch<'_> {
    fn explore(&mut self, state: &SearchState, prefix: &mut Vec<ContractionGroup>, cost: u64) {
        if state.len() <= 1 {
            if cost < self.best_cost {
                self.best_cost = cost;
                self.best_path = Some(prefix.iter().cloned().collect());
            }
            return;
        }

        // Cheapest steps first so the bound tightens early; once one
        // candidate busts the bound the sorted remainder must too.
        let mut candidates = self.candidates(state);
        candidates.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        for (step_cost, group, contraction) in candidates {
            let total = cost.saturating_add(step_cost);
            if total >= self.best_cost {
                break;
            }

            let next = state.apply(&contraction);
            prefix.push(group);
            self.explore(&next, prefix, total);
            prefix.pop();
        }
    }

    fn candidates(&self, state: &SearchState) -> Vec<(u64, ContractionGroup, Contraction)> {
        let n = state.len();
        let mut out = Vec::with_capacity(n * (n - 1) / 2);

        for i in 0..n {
            for j in (i + 1)..n {
                let contraction = state.resolve(&[i, j]);
                if compute_size(&contraction.result, self.dims) > self.memory_limit {
                    continue;
                }
                let step_cost = flop_count(
                    &contraction.touched(),
                    !contraction.eliminated.is_empty(),
                    2,
                    self.dims,
                );
                out.push((step_cost, smallvec![i, j], contraction));
            }
        }

        out
    }
}

/// Total cost of a path, or `None` when any synthesized operand exceeds
/// the memory limit.
fn path_cost_within_limit(
    initial: &SearchState,
    path: &ContractionPath,
    dims: &DimensionTable,
    memory_limit: u64,
) -> Option<u64> {
    let mut state = initial.clone();
    let mut total: u64 = 0;

    for group in path.groups() {
        let mut positions: Vec<usize> = group.to_vec();
        positions.sort_unstable();
        let contraction = state.resolve(&positions);

        if compute_size(&contraction.result, dims) > memory_limit {
            return None;
        }
        total = total.saturating_add(flop_count(
            &contraction.touched(),
            !contraction.eliminated.is_empty(),
            positions.len(),
            dims,
        ));
        state = state.apply(&contraction);
    }

    Some(total)
}
