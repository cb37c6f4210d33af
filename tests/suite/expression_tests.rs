use approx::assert_abs_diff_eq;
use einsum_opt::{ContractOptions, EinsumError, contract_expression};
use ndarray::{ArrayD, IxDyn};

use crate::common::{naive, tensor};

#[test]
fn prebuilt_expression_evaluates_repeatedly() {
    let shapes: Vec<&[usize]> = vec![&[2, 6], &[6, 3], &[3, 4]];
    let expr =
        contract_expression("ij,jk,kl->il", &shapes, &ContractOptions::default()).unwrap();

    assert_eq!(expr.num_operands(), 3);
    assert_eq!(expr.expression(), "ij,jk,kl->il");

    for seed in 0..3 {
        let operands = vec![
            tensor(&[2, 6], seed),
            tensor(&[6, 3], seed + 100),
            tensor(&[3, 4], seed + 200),
        ];
        let result = expr.eval(&operands).unwrap();
        assert_abs_diff_eq!(result, naive("ij,jk,kl->il", &operands), epsilon = 1e-9);
    }
}

#[test]
fn wrong_argument_count_is_a_dedicated_error() {
    let shapes: Vec<&[usize]> = vec![&[2, 2], &[2, 2]];
    let expr = contract_expression("ij,jk->ik", &shapes, &ContractOptions::default()).unwrap();

    let operands = vec![tensor(&[2, 2], 1)];
    let err = expr.eval(&operands).unwrap_err();

    match err {
        EinsumError::ArgumentCount { expected, got } => {
            assert_eq!(expected, 2);
            assert_eq!(got, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(
        err.to_string()
            .contains("takes exactly 2 tensor arguments but received 1")
    );
}

#[test]
fn incompatible_operands_surface_as_internal_errors() {
    // Validation happened at build time against the declared shapes;
    // evaluation trusts the plan and reports anything else as internal.
    let shapes: Vec<&[usize]> = vec![&[2, 3], &[3, 2]];
    let expr = contract_expression("ij,jk->ik", &shapes, &ContractOptions::default()).unwrap();

    let operands = vec![tensor(&[2, 3], 1), tensor(&[5, 2], 2)];
    let err = expr.eval(&operands).unwrap_err();

    assert!(matches!(err, EinsumError::Internal { .. }));
    assert!(err.to_string().starts_with("internal error during evaluation"));
}

#[test]
fn eval_into_writes_the_buffer_on_the_final_step() {
    let shapes: Vec<&[usize]> = vec![&[3, 4], &[4, 5]];
    let expr = contract_expression("ij,jk->ik", &shapes, &ContractOptions::default()).unwrap();

    let operands = vec![tensor(&[3, 4], 1), tensor(&[4, 5], 2)];
    let mut out = ArrayD::<f64>::zeros(IxDyn(&[3, 5]));

    let result = expr.eval_into(&operands, &mut out).unwrap();
    assert_abs_diff_eq!(out, result, epsilon = 0.0);
    assert_abs_diff_eq!(out, naive("ij,jk->ik", &operands), epsilon = 1e-9);
}

#[test]
fn expression_text_is_kept_as_written() {
    // Display keeps the caller's form; the plan carries the canonical,
    // ellipsis-free terms and the inferred output.
    let shapes: Vec<&[usize]> = vec![&[2, 3], &[3, 4]];
    let expr = contract_expression("ij,jk", &shapes, &ContractOptions::default()).unwrap();
    assert_eq!(expr.expression(), "ij,jk");
    assert_eq!(expr.plan().output_term(), "ik");

    let batch_shapes: Vec<&[usize]> = vec![&[3, 2, 4], &[3, 4, 5]];
    let batch = contract_expression(
        "...ij,...jk->...ik",
        &batch_shapes,
        &ContractOptions::default(),
    )
    .unwrap();
    assert_eq!(batch.expression(), "...ij,...jk->...ik");
    assert_eq!(batch.plan().input_terms(), &["Aij".to_string(), "Ajk".to_string()]);
}

#[test]
fn expression_is_generic_over_element_type() {
    let shapes: Vec<&[usize]> = vec![&[2, 2], &[2, 2]];
    let expr = contract_expression("ij,jk->ik", &shapes, &ContractOptions::default()).unwrap();

    let a = ArrayD::from_shape_vec(IxDyn(&[2, 2]), vec![1i64, 2, 3, 4]).unwrap();
    let b = ArrayD::from_shape_vec(IxDyn(&[2, 2]), vec![5i64, 6, 7, 8]).unwrap();

    let result = expr.eval(&[a, b]).unwrap();
    assert_eq!(
        result,
        ArrayD::from_shape_vec(IxDyn(&[2, 2]), vec![19i64, 22, 43, 50]).unwrap()
    );
}
