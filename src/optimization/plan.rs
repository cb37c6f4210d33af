//! Plan builder: turns a contraction path into an ordered list of concrete
//! steps, each tagged with the primitive that will execute it.

use std::collections::BTreeSet;

use smallvec::SmallVec;

use super::contraction::find_contraction;
use super::cost::{DimensionTable, compute_size, flop_count};
use super::path::{ContractionGroup, ContractionPath};
use crate::error::{EinsumError, EinsumResult};

/// The primitive a step is executed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepKind {
    /// Fast pairwise axis-aligned contraction: the listed axes of the two
    /// popped operands are summed against each other.
    Tensordot {
        lhs_axes: SmallVec<[usize; 2]>,
        rhs_axes: SmallVec<[usize; 2]>,
    },
    /// General elementwise multiply-and-reduce over the operand terms.
    General,
}

/// One resolved step of a contraction plan.
#[derive(Debug, Clone)]
pub struct ContractionStep {
    /// Operand positions, highest first — the removal order.
    positions: ContractionGroup,
    /// Labels fully eliminated by this step.
    eliminated: BTreeSet<char>,
    /// Terms of the popped operands, in removal order.
    operand_terms: Vec<String>,
    /// Term of the synthesized operand.
    result_term: String,
    /// Terms still live after this step, result last.
    remaining_terms: Vec<String>,
    kind: StepKind,
    scale: usize,
    flops: u64,
    result_size: u64,
}

impl ContractionStep {
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn eliminated(&self) -> &BTreeSet<char> {
        &self.eliminated
    }

    pub fn operand_terms(&self) -> &[String] {
        &self.operand_terms
    }

    pub fn result_term(&self) -> &str {
        &self.result_term
    }

    pub fn remaining_terms(&self) -> &[String] {
        &self.remaining_terms
    }

    pub fn kind(&self) -> &StepKind {
        &self.kind
    }

    pub fn uses_tensordot(&self) -> bool {
        matches!(self.kind, StepKind::Tensordot { .. })
    }

    /// Number of distinct labels the step touches.
    pub fn scale(&self) -> usize {
        self.scale
    }

    pub fn flops(&self) -> u64 {
        self.flops
    }

    /// Element count of the synthesized operand.
    pub fn result_size(&self) -> u64 {
        self.result_size
    }

    /// The step's sub-expression, e.g. `"kl,jk->jl"`.
    pub fn expression(&self) -> String {
        format!("{}->{}", self.operand_terms.join(","), self.result_term)
    }
}

/// An ordered, immutable contraction plan. Encodes structure only: any
/// operand list with matching ranks and label sizes can be executed
/// against it.
#[derive(Debug, Clone)]
pub struct ContractionPlan {
    steps: Vec<ContractionStep>,
    path: ContractionPath,
    input_terms: Vec<String>,
    output_term: String,
    total_flops: u64,
    largest_intermediate: u64,
    max_scale: usize,
}

impl ContractionPlan {
    pub fn steps(&self) -> &[ContractionStep] {
        &self.steps
    }

    pub fn path(&self) -> &ContractionPath {
        &self.path
    }

    pub fn num_operands(&self) -> usize {
        self.input_terms.len()
    }

    pub fn input_terms(&self) -> &[String] {
        &self.input_terms
    }

    pub fn output_term(&self) -> &str {
        &self.output_term
    }

    /// Sum of the per-step flop estimates.
    pub fn total_flops(&self) -> u64 {
        self.total_flops
    }

    /// Largest synthesized operand across all steps, in elements.
    pub fn largest_intermediate(&self) -> u64 {
        self.largest_intermediate
    }

    /// Largest per-step scaling encountered.
    pub fn max_scale(&self) -> usize {
        self.max_scale
    }
}

/// Walks `path` over the canonical terms and emits the concrete plan.
///
/// Positions inside a group are removed from highest to lowest so the
/// positions of operands not yet removed stay valid. Intermediate result
/// terms are ordered ascending by dimension size (then label); the final
/// step's term is forced to the declared output ordering.
pub fn build_plan(
    terms: &[String],
    output_term: &str,
    dims: &DimensionTable,
    path: &ContractionPath,
    use_tensordot: bool,
) -> EinsumResult<ContractionPlan> {
    let output_set: BTreeSet<char> = output_term.chars().collect();
    let mut term_list: Vec<String> = terms.to_vec();
    let mut input_sets: Vec<BTreeSet<char>> = terms.iter().map(|t| t.chars().collect()).collect();

    let mut steps = Vec::with_capacity(path.len());
    let mut total_flops: u64 = 0;
    let mut largest_intermediate: u64 = 0;
    let mut max_scale = 0;

    for (num, group) in path.groups().iter().enumerate() {
        let is_last = num + 1 == path.len();

        let mut positions: Vec<usize> = group.to_vec();
        positions.sort_unstable();
        positions.dedup();
        if positions.is_empty() {
            return Err(EinsumError::invalid_path("empty contraction group"));
        }
        if positions.last().copied().unwrap_or(0) >= term_list.len() {
            return Err(EinsumError::invalid_path(format!(
                "group {:?} is out of range for {} remaining operands",
                positions,
                term_list.len()
            )));
        }

        let contraction = find_contraction(&positions, &input_sets, &output_set);
        if is_last && contraction.result != output_set {
            return Err(EinsumError::invalid_path(
                "final step does not produce the declared output",
            ));
        }

        let touched = contraction.touched();
        let scale = touched.len();
        let flops = flop_count(
            &touched,
            !contraction.eliminated.is_empty(),
            positions.len(),
            dims,
        );
        let result_size = compute_size(&contraction.result, dims);

        // Highest position first keeps the rest of the list stable.
        let operand_terms: Vec<String> = positions
            .iter()
            .rev()
            .map(|&pos| term_list.remove(pos))
            .collect();

        let result_term = if is_last {
            output_term.to_string()
        } else {
            sorted_by_dimension(&contraction.result, dims)
        };

        let kind = if use_tensordot {
            tensordot_kind(&operand_terms, &contraction.result, &contraction.eliminated)
        } else {
            StepKind::General
        };

        term_list.push(result_term.clone());
        input_sets = contraction.remaining.clone();

        total_flops = total_flops.saturating_add(flops);
        largest_intermediate = largest_intermediate.max(result_size);
        max_scale = max_scale.max(scale);

        steps.push(ContractionStep {
            positions: positions.iter().rev().copied().collect(),
            eliminated: contraction.eliminated,
            operand_terms,
            result_term,
            remaining_terms: term_list.clone(),
            kind,
            scale,
            flops,
            result_size,
        });
    }

    if term_list.len() != 1 {
        return Err(EinsumError::invalid_path(format!(
            "path reduces {} operands to {}, not 1",
            terms.len(),
            term_list.len()
        )));
    }

    Ok(ContractionPlan {
        steps,
        path: path.clone(),
        input_terms: terms.to_vec(),
        output_term: output_term.to_string(),
        total_flops,
        largest_intermediate,
        max_scale,
    })
}

/// Cache- and gemm-friendly ordering for intermediate terms: ascending by
/// dimension size, ties by label.
fn sorted_by_dimension(labels: &BTreeSet<char>, dims: &DimensionTable) -> String {
    let mut keyed: Vec<(usize, char)> = labels
        .iter()
        .map(|&c| (dims.get(&c).copied().unwrap_or(1), c))
        .collect();
    keyed.sort_unstable();
    keyed.into_iter().map(|(_, c)| c).collect()
}

/// Decides whether the fast pairwise primitive applies and derives its
/// aligned axis lists.
///
/// Eligible iff the group is exactly two operands, no label repeats within
/// an operand, every eliminated label appears once in each operand, every
/// surviving label appears in exactly one operand, and something is
/// actually eliminated. Anything else (diagonals, batch labels, one-sided
/// reductions) goes through the general primitive.
fn tensordot_kind(
    operand_terms: &[String],
    result: &BTreeSet<char>,
    eliminated: &BTreeSet<char>,
) -> StepKind {
    if operand_terms.len() != 2 || eliminated.is_empty() {
        return StepKind::General;
    }
    let (lhs, rhs) = (&operand_terms[0], &operand_terms[1]);

    for &c in eliminated {
        if lhs.chars().filter(|&x| x == c).count() != 1
            || rhs.chars().filter(|&x| x == c).count() != 1
        {
            return StepKind::General;
        }
    }
    for &c in result {
        let in_lhs = lhs.chars().filter(|&x| x == c).count();
        let in_rhs = rhs.chars().filter(|&x| x == c).count();
        if in_lhs + in_rhs != 1 {
            return StepKind::General;
        }
    }

    let lhs_axes = eliminated
        .iter()
        .map(|&c| lhs.chars().position(|x| x == c).unwrap_or(0))
        .collect();
    let rhs_axes = eliminated
        .iter()
        .map(|&c| rhs.chars().position(|x| x == c).unwrap_or(0))
        .collect();

    StepKind::Tensordot { lhs_axes, rhs_axes }
}
