//! Optimized einsum contraction for `ndarray`.
//!
//! Evaluating a multi-operand einsum expression in one shot scales with
//! the product of every index involved. Decomposing it into a sequence of
//! pairwise contractions routinely reduces the cost by orders of
//! magnitude. This crate finds such a sequence, fixes it into a reusable
//! plan and executes it, lowering eligible steps to matrix multiplies.
//!
//! ```no_run
//! use einsum_opt::contract;
//! use ndarray::{ArrayD, IxDyn};
//!
//! let a = ArrayD::<f64>::zeros(IxDyn(&[2, 2]));
//! let b = ArrayD::<f64>::zeros(IxDyn(&[2, 5]));
//! let c = ArrayD::<f64>::zeros(IxDyn(&[5, 2]));
//!
//! let result = contract("ij,jk,kl->il", &[a, b, c])?;
//! # Ok::<(), einsum_opt::EinsumError>(())
//! ```
//!
//! For repeated evaluation over same-shaped operands, build a
//! [`ContractExpression`] once with [`contract_expression`] and call
//! [`ContractExpression::eval`]; parsing, validation and path search are
//! skipped on every call. [`contract_path`] exposes the chosen path and a
//! cost report without executing anything.

pub mod contract;
pub mod error;
pub mod execute;
pub mod notation;
pub mod optimization;
pub mod report;

pub use contract::{
    ContractOptions, MemoryLimit, PathStrategy, contract, contract_expression, contract_into,
    contract_path, contract_with_options,
};
pub use error::{EinsumError, EinsumResult};
pub use execute::{ContractExpression, execute_plan};
pub use optimization::{ContractionPath, ContractionPlan, ContractionStep, StepKind};
pub use report::{PathInfo, StepReport};
