//! Top-level contraction API: options, path selection and the `contract`
//! family of entry points.

use std::collections::BTreeSet;

use ndarray::{ArrayD, LinalgScalar};

use crate::error::{EinsumError, EinsumResult};
use crate::execute::{ContractExpression, execute_plan};
use crate::notation::canonicalize;
use crate::optimization::{
    ContractionPath, ContractionPlan, DimensionTable, build_plan, compute_size, flop_count,
    greedy_path, optimal_path,
};
use crate::report::PathInfo;

/// How the contraction order is chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PathStrategy {
    /// Cubic-time heuristic, good for large operand counts.
    #[default]
    Greedy,
    /// Exhaustive branch-and-bound search, exponential in operand count.
    Optimal,
    /// A caller-supplied path, validated before use.
    Custom(Vec<Vec<usize>>),
}

impl core::str::FromStr for PathStrategy {
    type Err = EinsumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greedy" | "opportunistic" => Ok(Self::Greedy),
            "optimal" => Ok(Self::Optimal),
            other => Err(EinsumError::UnknownStrategy {
                name: other.to_string(),
            }),
        }
    }
}

/// Cap on the element count of any synthesized intermediate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MemoryLimit {
    /// The largest input or output operand, whichever is bigger. Keeps the
    /// search from trading modest flop savings for huge intermediates.
    #[default]
    Automatic,
    Unbounded,
    Elements(u64),
}

impl MemoryLimit {
    /// Interprets the conventional raw encoding: `-1` means unbounded,
    /// positive values are element counts, anything else is rejected.
    pub fn from_raw(limit: i64) -> EinsumResult<Self> {
        match limit {
            -1 => Ok(Self::Unbounded),
            n if n > 0 => Ok(Self::Elements(n as u64)),
            other => Err(EinsumError::InvalidMemoryLimit { limit: other }),
        }
    }

    fn resolve(self, input_sizes: &[u64], output_size: u64) -> u64 {
        match self {
            Self::Automatic => input_sizes
                .iter()
                .copied()
                .chain(core::iter::once(output_size))
                .max()
                .unwrap_or(1),
            Self::Unbounded => u64::MAX,
            Self::Elements(n) => n,
        }
    }
}

/// Tunables for path search and execution.
#[derive(Debug, Clone, Default)]
pub struct ContractOptions {
    strategy: PathStrategy,
    memory_limit: MemoryLimit,
    /// Route eligible pairwise steps through the matrix-multiply kernel.
    disable_tensordot: bool,
}

impl ContractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strategy(mut self, strategy: PathStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn memory_limit(mut self, limit: MemoryLimit) -> Self {
        self.memory_limit = limit;
        self
    }

    pub fn use_tensordot(mut self, enabled: bool) -> Self {
        self.disable_tensordot = !enabled;
        self
    }
}

/// Chooses a contraction path for `expression` over operands with the given
/// shapes and fixes it into an executable plan, plus a cost report.
pub fn contract_path(
    expression: &str,
    shapes: &[&[usize]],
    options: &ContractOptions,
) -> EinsumResult<(ContractionPlan, PathInfo)> {
    let ranks: Vec<usize> = shapes.iter().map(|s| s.len()).collect();
    let (terms, output_term) = canonicalize(expression, &ranks)?;

    let dims = dimension_table(&terms, shapes)?;

    let input_sets: Vec<BTreeSet<char>> = terms.iter().map(|t| t.chars().collect()).collect();
    let output_set: BTreeSet<char> = output_term.chars().collect();

    let input_sizes: Vec<u64> = input_sets.iter().map(|s| compute_size(s, &dims)).collect();
    let output_size = compute_size(&output_set, &dims);
    let memory_limit = options.memory_limit.resolve(&input_sizes, output_size);

    let all_indices: BTreeSet<char> = input_sets.iter().flatten().copied().collect();
    // Any label shared between operand sets means the naive evaluation
    // carries an inner sum.
    let occurrences: usize = input_sets.iter().map(BTreeSet::len).sum();
    let has_inner = occurrences > all_indices.len();
    let naive_flops = flop_count(&all_indices, has_inner, terms.len(), &dims);
    let naive_scaling = all_indices.len();

    let path = choose_path(
        &options.strategy,
        &input_sets,
        &output_set,
        &all_indices,
        &dims,
        memory_limit,
    )?;

    let plan = build_plan(
        &terms,
        &output_term,
        &dims,
        &path,
        !options.disable_tensordot,
    )?;
    let info = PathInfo::from_plan(&plan, naive_scaling, naive_flops);

    Ok((plan, info))
}

/// Contracts `operands` per `expression` with default options.
pub fn contract<A: LinalgScalar>(
    expression: &str,
    operands: &[ArrayD<A>],
) -> EinsumResult<ArrayD<A>> {
    contract_with_options(expression, operands, &ContractOptions::default())
}

/// Contracts `operands` per `expression` with explicit options.
pub fn contract_with_options<A: LinalgScalar>(
    expression: &str,
    operands: &[ArrayD<A>],
    options: &ContractOptions,
) -> EinsumResult<ArrayD<A>> {
    let shapes: Vec<&[usize]> = operands.iter().map(|a| a.shape()).collect();
    let (plan, _) = contract_path(expression, &shapes, options)?;
    execute_plan(&plan, operands, None)
}

/// Contracts into a caller-provided buffer, engaged on the final step only.
pub fn contract_into<A: LinalgScalar>(
    expression: &str,
    operands: &[ArrayD<A>],
    out: &mut ArrayD<A>,
    options: &ContractOptions,
) -> EinsumResult<()> {
    let shapes: Vec<&[usize]> = operands.iter().map(|a| a.shape()).collect();
    let (plan, _) = contract_path(expression, &shapes, options)?;
    execute_plan(&plan, operands, Some(out))?;
    Ok(())
}

/// Builds a reusable [`ContractExpression`] for the given operand shapes.
/// Parsing, validation and path search happen once, here.
pub fn contract_expression(
    expression: &str,
    shapes: &[&[usize]],
    options: &ContractOptions,
) -> EinsumResult<ContractExpression> {
    let (plan, _) = contract_path(expression, shapes, options)?;
    // The expression is kept as the caller wrote it (ellipses, implicit
    // output); the plan holds the canonical terms.
    Ok(ContractExpression::new(expression.to_string(), plan))
}

/// Binds every label to a size, validating rank and cross-operand
/// agreement.
fn dimension_table(terms: &[String], shapes: &[&[usize]]) -> EinsumResult<DimensionTable> {
    let mut dims = DimensionTable::new();

    for (num, (term, shape)) in terms.iter().zip(shapes).enumerate() {
        if term.len() != shape.len() {
            return Err(EinsumError::DimensionMismatch {
                term: term.clone(),
                operand: num,
                expected: term.len(),
                got: shape.len(),
            });
        }
        for (label, &dim) in term.chars().zip(shape.iter()) {
            match dims.get(&label) {
                Some(&seen) if seen != dim => {
                    return Err(EinsumError::ShapeMismatch {
                        index: label,
                        operand: num,
                        expected: seen,
                        got: dim,
                    });
                }
                Some(_) => {}
                None => {
                    dims.insert(label, dim);
                }
            }
        }
    }

    Ok(dims)
}

fn choose_path(
    strategy: &PathStrategy,
    input_sets: &[BTreeSet<char>],
    output_set: &BTreeSet<char>,
    all_indices: &BTreeSet<char>,
    dims: &DimensionTable,
    memory_limit: u64,
) -> EinsumResult<ContractionPath> {
    let n = input_sets.len();
    match strategy {
        PathStrategy::Custom(groups) => {
            if groups.is_empty() {
                return Err(EinsumError::invalid_path("custom path has no steps"));
            }
            Ok(ContractionPath::from_groups(groups.clone()))
        }
        // Degenerate inputs have exactly one sensible path: everything in
        // one group. Covers single operands, pairs and pure products with
        // nothing to sum away.
        _ if n <= 2 || all_indices == output_set => Ok(ContractionPath::full_group(n)),
        PathStrategy::Greedy => Ok(greedy_path(input_sets, output_set, dims, memory_limit)),
        PathStrategy::Optimal => Ok(optimal_path(input_sets, output_set, dims, memory_limit)),
    }
}
