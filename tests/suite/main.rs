mod common;
mod equivalence_tests;
mod expression_tests;
mod path_tests;
