//! Tensor primitives the executor dispatches to.
//!
//! Two kernels cover every step: `tensordot` lowers an axis-aligned
//! pairwise contraction to a single matrix multiply, and `multiply_reduce`
//! evaluates an arbitrary sub-expression (diagonals, batch labels, n-ary
//! groups) by direct summation.

use hashbrown::HashMap;
use ndarray::{ArrayD, ArrayViewD, IxDyn, LinalgScalar};

use crate::error::{EinsumError, EinsumResult};

/// Contracts `lhs_axes` of `lhs` against `rhs_axes` of `rhs` through one
/// gemm call.
///
/// Both operands are permuted so the contracted axes are adjacent, brought
/// to standard layout (a copy only when the permutation is not already
/// contiguous), flattened to matrices and multiplied. The output axes are
/// the kept axes of `lhs` followed by the kept axes of `rhs`, each in
/// original order.
pub fn tensordot<A: LinalgScalar>(
    lhs: ArrayViewD<'_, A>,
    rhs: ArrayViewD<'_, A>,
    lhs_axes: &[usize],
    rhs_axes: &[usize],
) -> EinsumResult<ArrayD<A>> {
    if lhs_axes.len() != rhs_axes.len() {
        return Err(EinsumError::internal("mismatched contraction axis counts"));
    }
    for (&la, &ra) in lhs_axes.iter().zip(rhs_axes) {
        if la >= lhs.ndim() || ra >= rhs.ndim() {
            return Err(EinsumError::internal("contraction axis out of range"));
        }
        if lhs.shape()[la] != rhs.shape()[ra] {
            return Err(EinsumError::shape(format!(
                "contracted axes disagree: {} vs {}",
                lhs.shape()[la],
                rhs.shape()[ra]
            )));
        }
    }

    let lhs_kept: Vec<usize> = (0..lhs.ndim()).filter(|a| !lhs_axes.contains(a)).collect();
    let rhs_kept: Vec<usize> = (0..rhs.ndim()).filter(|a| !rhs_axes.contains(a)).collect();

    let m: usize = lhs_kept.iter().map(|&a| lhs.shape()[a]).product();
    let k: usize = lhs_axes.iter().map(|&a| lhs.shape()[a]).product();
    let n: usize = rhs_kept.iter().map(|&a| rhs.shape()[a]).product();

    let out_shape: Vec<usize> = lhs_kept
        .iter()
        .map(|&a| lhs.shape()[a])
        .chain(rhs_kept.iter().map(|&a| rhs.shape()[a]))
        .collect();

    // Kept axes first on the left, contracted axes first on the right, so
    // both flatten straight into gemm operands.
    let lhs_perm: Vec<usize> = lhs_kept.iter().chain(lhs_axes).copied().collect();
    let rhs_perm: Vec<usize> = rhs_axes.iter().chain(&rhs_kept).copied().collect();

    let lhs_view = lhs.permuted_axes(lhs_perm);
    let rhs_view = rhs.permuted_axes(rhs_perm);

    // Borrows in place when the permutation is already contiguous, copies
    // otherwise.
    let lhs_std = lhs_view.as_standard_layout();
    let rhs_std = rhs_view.as_standard_layout();

    let lhs_mat = lhs_std
        .view()
        .into_shape_with_order((m, k))
        .map_err(|e| EinsumError::internal(e.to_string()))?;
    let rhs_mat = rhs_std
        .view()
        .into_shape_with_order((k, n))
        .map_err(|e| EinsumError::internal(e.to_string()))?;

    lhs_mat
        .dot(&rhs_mat)
        .into_shape_with_order(IxDyn(&out_shape))
        .map_err(|e| EinsumError::internal(e.to_string()))
}

/// Evaluates `terms -> result_term` over `operands` by looping the full
/// joint index space and accumulating products.
///
/// Handles everything `tensordot` cannot: repeated labels within a term
/// (diagonals), labels shared with the output (batch axes), single-operand
/// reductions and groups of any arity. Cost is the size of the joint
/// space, so the planner only routes small or irregular steps here.
pub fn multiply_reduce<A: LinalgScalar>(
    operands: &[ArrayViewD<'_, A>],
    terms: &[&str],
    result_term: &str,
) -> EinsumResult<ArrayD<A>> {
    if operands.len() != terms.len() {
        return Err(EinsumError::internal("operand and term counts differ"));
    }

    let mut sizes: HashMap<char, usize> = HashMap::new();
    for (operand, term) in operands.iter().zip(terms) {
        if operand.ndim() != term.len() {
            return Err(EinsumError::shape(format!(
                "operand rank {} does not match term \"{}\"",
                operand.ndim(),
                term
            )));
        }
        for (axis, label) in term.chars().enumerate() {
            let dim = operand.shape()[axis];
            match sizes.get(&label) {
                Some(&seen) if seen != dim => {
                    return Err(EinsumError::shape(format!(
                        "label '{}' bound to both {} and {}",
                        label, seen, dim
                    )));
                }
                Some(_) => {}
                None => {
                    sizes.insert(label, dim);
                }
            }
        }
    }

    // Output labels first so the leading counters are the output index.
    let mut labels: Vec<char> = result_term.chars().collect();
    let mut summed: Vec<char> = sizes
        .keys()
        .copied()
        .filter(|c| !result_term.contains(*c))
        .collect();
    summed.sort_unstable();
    labels.extend(summed);

    for label in result_term.chars() {
        if !sizes.contains_key(&label) {
            return Err(EinsumError::internal(format!(
                "output label '{}' absent from every operand",
                label
            )));
        }
    }

    let extents: Vec<usize> = labels.iter().map(|c| sizes[c]).collect();
    let out_rank = result_term.len();
    let out_shape: Vec<usize> = extents[..out_rank].to_vec();

    // Per operand, the counter slot feeding each of its axes.
    let slots: Vec<Vec<usize>> = terms
        .iter()
        .map(|term| {
            term.chars()
                .map(|c| labels.iter().position(|&l| l == c).unwrap_or(0))
                .collect()
        })
        .collect();

    let mut out = ArrayD::<A>::zeros(IxDyn(&out_shape));
    if extents.iter().any(|&e| e == 0) {
        return Ok(out);
    }

    let mut counters = vec![0usize; labels.len()];
    let mut operand_idx: Vec<Vec<usize>> = terms.iter().map(|t| vec![0usize; t.len()]).collect();

    loop {
        let mut product = A::one();
        for (pos, operand) in operands.iter().enumerate() {
            let idx = &mut operand_idx[pos];
            for (axis, &slot) in slots[pos].iter().enumerate() {
                idx[axis] = counters[slot];
            }
            product = product * operand[&idx[..]];
        }

        let cell = &mut out[&counters[..out_rank]];
        *cell = *cell + product;

        // Odometer over the joint index space, innermost label fastest.
        let mut axis = labels.len();
        loop {
            if axis == 0 {
                return Ok(out);
            }
            axis -= 1;
            counters[axis] += 1;
            if counters[axis] < extents[axis] {
                break;
            }
            counters[axis] = 0;
        }
    }
}

/// Permutes `array` so its axes follow `to` instead of `from`, returning a
/// standard-layout copy.
pub fn relabel<A: LinalgScalar>(
    array: ArrayD<A>,
    from: &str,
    to: &str,
) -> EinsumResult<ArrayD<A>> {
    if from == to {
        return Ok(array);
    }
    if from.len() != to.len() || from.len() != array.ndim() {
        return Err(EinsumError::internal(format!(
            "cannot relabel \"{}\" as \"{}\"",
            from, to
        )));
    }

    let mut perm = Vec::with_capacity(to.len());
    for label in to.chars() {
        match from.chars().position(|c| c == label) {
            Some(axis) => perm.push(axis),
            None => {
                return Err(EinsumError::internal(format!(
                    "label '{}' missing from \"{}\"",
                    label, from
                )));
            }
        }
    }

    Ok(array.permuted_axes(perm).as_standard_layout().into_owned())
}
