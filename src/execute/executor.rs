//! Plan executor: walks the steps of a [`ContractionPlan`] over concrete
//! tensors.

use ndarray::{ArrayD, ArrayViewD, LinalgScalar};

use super::runtime::{multiply_reduce, relabel, tensordot};
use crate::error::{EinsumError, EinsumResult};
use crate::optimization::{ContractionPlan, StepKind};

/// A live operand: either a caller tensor borrowed for the duration of the
/// evaluation or an intermediate owned by the executor. Inputs are never
/// copied unless a kernel needs a layout change.
enum Operand<'a, A> {
    Borrowed(ArrayViewD<'a, A>),
    Owned(ArrayD<A>),
}

impl<A> Operand<'_, A> {
    fn view(&self) -> ArrayViewD<'_, A> {
        match self {
            Operand::Borrowed(view) => view.view(),
            Operand::Owned(array) => array.view(),
        }
    }
}

/// Executes `plan` over `operands`, writing into `out` on the final step
/// when a buffer is supplied.
///
/// Operands are popped in each step's recorded order, consumed by the
/// step's kernel and replaced by the synthesized tensor, so intermediates
/// are dropped as soon as their last use completes.
pub fn execute_plan<A: LinalgScalar>(
    plan: &ContractionPlan,
    operands: &[ArrayD<A>],
    out: Option<&mut ArrayD<A>>,
) -> EinsumResult<ArrayD<A>> {
    if operands.len() != plan.num_operands() {
        return Err(EinsumError::internal(format!(
            "plan expects {} operands, got {}",
            plan.num_operands(),
            operands.len()
        )));
    }

    let mut working: Vec<Operand<'_, A>> = operands
        .iter()
        .map(|array| Operand::Borrowed(array.view()))
        .collect();

    for step in plan.steps() {
        // Positions are stored highest first, keeping lower ones stable.
        let mut popped: Vec<Operand<'_, A>> = Vec::with_capacity(step.positions().len());
        for &pos in step.positions() {
            if pos >= working.len() {
                return Err(EinsumError::internal("step position out of range"));
            }
            popped.push(working.remove(pos));
        }

        let result = match step.kind() {
            StepKind::Tensordot { lhs_axes, rhs_axes } => {
                let raw = tensordot(popped[0].view(), popped[1].view(), lhs_axes, rhs_axes)?;
                let raw_term = tensordot_term(&step.operand_terms()[0], lhs_axes)
                    + &tensordot_term(&step.operand_terms()[1], rhs_axes);
                relabel(raw, &raw_term, step.result_term())?
            }
            StepKind::General => {
                let views: Vec<ArrayViewD<'_, A>> = popped.iter().map(Operand::view).collect();
                let terms: Vec<&str> = step.operand_terms().iter().map(String::as_str).collect();
                multiply_reduce(&views, &terms, step.result_term())?
            }
        };

        drop(popped);
        working.push(Operand::Owned(result));
    }

    let final_operand = match (working.pop(), working.is_empty()) {
        (Some(operand), true) => operand,
        _ => return Err(EinsumError::internal("plan did not reduce to one tensor")),
    };
    let result = match final_operand {
        Operand::Owned(array) => array,
        // Empty paths only occur for zero-step plans, which the planner
        // never emits; materialize defensively.
        Operand::Borrowed(view) => view.to_owned(),
    };

    if let Some(buffer) = out {
        if buffer.shape() != result.shape() {
            return Err(EinsumError::shape(format!(
                "output buffer shape {:?} does not match result shape {:?}",
                buffer.shape(),
                result.shape()
            )));
        }
        buffer.assign(&result);
    }

    Ok(result)
}

/// Labels surviving a tensordot operand, in axis order.
fn tensordot_term(term: &str, contracted_axes: &[usize]) -> String {
    term.chars()
        .enumerate()
        .filter(|(axis, _)| !contracted_axes.contains(axis))
        .map(|(_, c)| c)
        .collect()
}
