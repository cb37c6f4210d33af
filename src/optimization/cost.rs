//! Cost model over labeled index sets.
//!
//! Two pure functions used by both path search strategies and the plan
//! builder. Arithmetic saturates; costs are rankings, not measurements.

use hashbrown::HashMap;

/// Mapping from index label to dimension size, shared by every operand.
pub type DimensionTable = HashMap<char, usize>;

/// Product of the sizes of the given labels. An empty set is a scalar (1).
pub fn compute_size<'a>(labels: impl IntoIterator<Item = &'a char>, dims: &DimensionTable) -> u64 {
    labels
        .into_iter()
        .map(|c| dims.get(c).copied().unwrap_or(1) as u64)
        .fold(1u64, u64::saturating_mul)
}

/// Estimated flop count for one contraction step.
///
/// `touched` is every label involved in the step (surviving or eliminated).
/// The product of their sizes is doubled when anything is summed away
/// (multiply then add) and scaled by `num_terms - 1` for combining more
/// than two operands at once.
pub fn flop_count<'a>(
    touched: impl IntoIterator<Item = &'a char>,
    has_reduction: bool,
    num_terms: usize,
    dims: &DimensionTable,
) -> u64 {
    let overall = compute_size(touched, dims);
    let mut factor = num_terms.saturating_sub(1).max(1) as u64;
    if has_reduction {
        factor *= 2;
    }
    overall.saturating_mul(factor)
}
