//! Contraction path optimization: cost model, pairwise search strategies
//! and the plan builder that fixes a path into executable steps.

pub mod contraction;
pub mod cost;
pub mod greedy;
pub mod optimal;
pub mod path;
pub mod plan;

pub use contraction::{Contraction, SearchState, find_contraction};
pub use cost::{DimensionTable, compute_size, flop_count};
pub use greedy::greedy_path;
pub use optimal::optimal_path;
pub use path::{ContractionGroup, ContractionPath};
pub use plan::{ContractionPlan, ContractionStep, StepKind, build_plan};
