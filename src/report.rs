//! Human-readable summaries of a chosen contraction path.

use crate::optimization::ContractionPlan;

/// One row of a [`PathInfo`] table.
#[derive(Debug, Clone)]
pub struct StepReport {
    /// Number of distinct labels touched by the step.
    pub scale: usize,
    /// Whether the step lowers to the matrix-multiply kernel.
    pub uses_tensordot: bool,
    /// The step's sub-expression, e.g. `"kl,jk->jl"`.
    pub expression: String,
    /// The expression still left after this step.
    pub remaining: String,
}

/// Cost summary for a contraction: naive versus optimized flop counts,
/// scaling, largest intermediate and the per-step breakdown.
#[derive(Debug, Clone)]
pub struct PathInfo {
    pub expression: String,
    pub path: Vec<Vec<usize>>,
    pub naive_scaling: usize,
    pub optimized_scaling: usize,
    pub naive_flops: u64,
    pub optimized_flops: u64,
    pub largest_intermediate: u64,
    pub steps: Vec<StepReport>,
}

impl PathInfo {
    pub(crate) fn from_plan(
        plan: &ContractionPlan,
        naive_scaling: usize,
        naive_flops: u64,
    ) -> Self {
        let expression = format!(
            "{}->{}",
            plan.input_terms().join(","),
            plan.output_term()
        );

        let steps = plan
            .steps()
            .iter()
            .map(|step| StepReport {
                scale: step.scale(),
                uses_tensordot: step.uses_tensordot(),
                expression: step.expression(),
                remaining: format!(
                    "{}->{}",
                    step.remaining_terms().join(","),
                    plan.output_term()
                ),
            })
            .collect();

        Self {
            expression,
            path: plan.path().as_vecs(),
            naive_scaling,
            optimized_scaling: plan.max_scale(),
            naive_flops,
            optimized_flops: plan.total_flops(),
            largest_intermediate: plan.largest_intermediate(),
            steps,
        }
    }

    /// Naive cost over optimized cost. At least 1 for identity plans.
    pub fn speedup(&self) -> f64 {
        if self.optimized_flops == 0 {
            return 1.0;
        }
        self.naive_flops as f64 / self.optimized_flops as f64
    }
}

impl core::fmt::Display for PathInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "  Complete contraction:  {}", self.expression)?;
        writeln!(f, "         Naive scaling:  {}", self.naive_scaling)?;
        writeln!(f, "     Optimized scaling:  {}", self.optimized_scaling)?;
        writeln!(f, "      Naive FLOP count:  {:.3e}", self.naive_flops as f64)?;
        writeln!(
            f,
            "  Optimized FLOP count:  {:.3e}",
            self.optimized_flops as f64
        )?;
        writeln!(f, "   Theoretical speedup:  {:.3e}", self.speedup())?;
        writeln!(
            f,
            "  Largest intermediate:  {:.3e} elements",
            self.largest_intermediate as f64
        )?;
        writeln!(f, "{}", "-".repeat(80))?;
        writeln!(
            f,
            "{:>7} {:>8} {:>30} {:>32}",
            "scaling", "kernel", "current", "remaining"
        )?;
        writeln!(f, "{}", "-".repeat(80))?;
        for step in &self.steps {
            writeln!(
                f,
                "{:>7} {:>8} {:>30} {:>32}",
                step.scale,
                if step.uses_tensordot { "TDOT" } else { "SUM" },
                step.expression,
                step.remaining
            )?;
        }
        Ok(())
    }
}
