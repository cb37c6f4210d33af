//! Plan execution over `ndarray` tensors.

pub mod executor;
pub mod expression;
pub mod runtime;

pub use executor::execute_plan;
pub use expression::ContractExpression;
pub use runtime::{multiply_reduce, relabel, tensordot};
