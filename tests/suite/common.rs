use einsum_opt::execute::multiply_reduce;
use einsum_opt::notation::canonicalize;
use ndarray::{ArrayD, ArrayViewD, IxDyn};

/// Deterministic pseudo-random tensor in roughly [-2, 2].
pub fn tensor(shape: &[usize], seed: u64) -> ArrayD<f64> {
    let size: usize = shape.iter().product();
    let data: Vec<f64> = (0..size as u64)
        .map(|i| {
            let x = i
                .wrapping_add(seed)
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((x >> 33) % 1000) as f64 / 250.0 - 2.0
        })
        .collect();
    ArrayD::from_shape_vec(IxDyn(shape), data).unwrap()
}

/// Ground-truth evaluation: canonicalize the expression and sum the whole
/// joint index space in one shot, bypassing path search and the
/// matrix-multiply kernel entirely.
pub fn naive(expression: &str, operands: &[ArrayD<f64>]) -> ArrayD<f64> {
    let ranks: Vec<usize> = operands.iter().map(|a| a.ndim()).collect();
    let (terms, output) = canonicalize(expression, &ranks).unwrap();

    let views: Vec<ArrayViewD<'_, f64>> = operands.iter().map(|a| a.view()).collect();
    let term_refs: Vec<&str> = terms.iter().map(String::as_str).collect();
    multiply_reduce(&views, &term_refs, &output).unwrap()
}
