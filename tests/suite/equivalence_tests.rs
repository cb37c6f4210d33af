//! Every strategy and kernel choice must produce the same values.

use approx::assert_abs_diff_eq;
use einsum_opt::{ContractOptions, PathStrategy, contract_with_options};
use ndarray::ArrayD;

use crate::common::{naive, tensor};

fn cases() -> Vec<(&'static str, Vec<ArrayD<f64>>)> {
    vec![
        (
            "ij,jk,kl->il",
            vec![tensor(&[2, 6], 1), tensor(&[6, 3], 2), tensor(&[3, 4], 3)],
        ),
        (
            "ab,bc,cd,de->ae",
            vec![
                tensor(&[3, 2], 4),
                tensor(&[2, 5], 5),
                tensor(&[5, 3], 6),
                tensor(&[3, 2], 7),
            ],
        ),
        (
            "bij,bjk->bik",
            vec![tensor(&[4, 2, 3], 8), tensor(&[4, 3, 2], 9)],
        ),
        (
            "abd,ac,bdf,fc->",
            vec![
                tensor(&[3, 2, 4], 10),
                tensor(&[3, 5], 11),
                tensor(&[2, 4, 2], 12),
                tensor(&[2, 5], 13),
            ],
        ),
        ("ii,ij->j", vec![tensor(&[3, 3], 14), tensor(&[3, 4], 15)]),
    ]
}

#[test]
fn greedy_matches_naive() {
    for (expression, operands) in cases() {
        let options = ContractOptions::new().strategy(PathStrategy::Greedy);
        let result = contract_with_options(expression, &operands, &options).unwrap();
        assert_abs_diff_eq!(result, naive(expression, &operands), epsilon = 1e-8);
    }
}

#[test]
fn optimal_matches_naive() {
    for (expression, operands) in cases() {
        let options = ContractOptions::new().strategy(PathStrategy::Optimal);
        let result = contract_with_options(expression, &operands, &options).unwrap();
        assert_abs_diff_eq!(result, naive(expression, &operands), epsilon = 1e-8);
    }
}

#[test]
fn general_kernel_matches_tensordot() {
    for (expression, operands) in cases() {
        let fast = contract_with_options(
            expression,
            &operands,
            &ContractOptions::new().use_tensordot(true),
        )
        .unwrap();
        let slow = contract_with_options(
            expression,
            &operands,
            &ContractOptions::new().use_tensordot(false),
        )
        .unwrap();
        assert_abs_diff_eq!(fast, slow, epsilon = 1e-9);
    }
}
