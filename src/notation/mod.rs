//! Subscript notation parsing and canonicalization.

pub mod parser;
pub mod subscript;

pub use parser::{canonicalize, parse_expression};
pub use subscript::{Index, Subscript};
