//! Reusable contraction expressions.
//!
//! A [`ContractExpression`] freezes a parsed expression and its optimized
//! plan so repeated evaluations skip string parsing, path search and
//! upfront validation entirely.

use ndarray::{ArrayD, LinalgScalar};

use super::executor::execute_plan;
use crate::error::{EinsumError, EinsumResult};
use crate::optimization::ContractionPlan;

/// A pre-optimized contraction bound to a fixed expression and operand
/// count, reusable across any operands with compatible shapes.
#[derive(Debug, Clone)]
pub struct ContractExpression {
    expression: String,
    plan: ContractionPlan,
}

impl ContractExpression {
    pub(crate) fn new(expression: String, plan: ContractionPlan) -> Self {
        Self { expression, plan }
    }

    /// The expression as supplied when the plan was built.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn num_operands(&self) -> usize {
        self.plan.num_operands()
    }

    pub fn plan(&self) -> &ContractionPlan {
        &self.plan
    }

    /// Evaluates the expression over `operands`.
    ///
    /// Only the argument count is checked before execution; shape
    /// validation was performed when the expression was built, so runtime
    /// failures from incompatible operands surface as internal errors.
    pub fn eval<A: LinalgScalar>(&self, operands: &[ArrayD<A>]) -> EinsumResult<ArrayD<A>> {
        self.check_arity(operands.len())?;
        execute_plan(&self.plan, operands, None).map_err(wrap_runtime)
    }

    /// Evaluates the expression, writing the result into `out` on the
    /// final step.
    pub fn eval_into<A: LinalgScalar>(
        &self,
        operands: &[ArrayD<A>],
        out: &mut ArrayD<A>,
    ) -> EinsumResult<ArrayD<A>> {
        self.check_arity(operands.len())?;
        execute_plan(&self.plan, operands, Some(out)).map_err(wrap_runtime)
    }

    fn check_arity(&self, got: usize) -> EinsumResult<()> {
        let expected = self.plan.num_operands();
        if got != expected {
            return Err(EinsumError::ArgumentCount { expected, got });
        }
        Ok(())
    }
}

impl core::fmt::Display for ContractExpression {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "ContractExpression(\"{}\", {} operands)",
            self.expression,
            self.plan.num_operands()
        )
    }
}

fn wrap_runtime(err: EinsumError) -> EinsumError {
    match err {
        already @ EinsumError::Internal { .. } => already,
        other => EinsumError::internal(format!(
            "{other}; prebuilt expressions skip argument shape validation",
        )),
    }
}
