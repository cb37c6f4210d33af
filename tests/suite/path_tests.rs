use einsum_opt::{ContractOptions, EinsumError, MemoryLimit, PathStrategy, contract_path};

#[test]
fn matrix_chain_prefers_the_cheap_end() {
    let shapes: Vec<&[usize]> = vec![&[2, 2], &[2, 5], &[5, 2]];
    let (plan, info) =
        contract_path("ij,jk,kl->il", &shapes, &ContractOptions::default()).unwrap();

    assert_eq!(info.path, vec![vec![1, 2], vec![0, 1]]);
    assert_eq!(info.naive_flops, 160);
    assert_eq!(info.optimized_flops, 56);
    assert_eq!(info.naive_scaling, 4);
    assert_eq!(info.optimized_scaling, 3);
    assert_eq!(info.largest_intermediate, 4);
    assert_eq!(plan.steps().len(), 2);
    assert_eq!(plan.steps()[0].expression(), "kl,jk->jl");
    assert_eq!(plan.steps()[1].expression(), "jl,ij->il");
}

#[test]
fn tensor_network_drops_three_orders_of_magnitude() {
    let big: &[usize] = &[10, 10, 10, 10];
    let small: &[usize] = &[10, 10];
    let shapes = vec![small, small, big, small, small];
    let (_, info) = contract_path(
        "ea,fb,abcd,gc,hd->efgh",
        &shapes,
        &ContractOptions::default(),
    )
    .unwrap();

    assert_eq!(info.path, vec![vec![0, 2], vec![0, 3], vec![0, 2], vec![0, 1]]);
    assert_eq!(info.naive_flops, 800_000_000);
    assert_eq!(info.optimized_flops, 800_000);
    assert_eq!(info.naive_scaling, 8);
    assert_eq!(info.optimized_scaling, 5);
    assert!(info.speedup() > 999.0);
}

#[test]
fn optimal_never_costs_more_than_greedy() {
    let cases: Vec<(&str, Vec<&[usize]>)> = vec![
        ("ij,jk,kl->il", vec![&[8, 3], &[3, 900], &[900, 4]]),
        ("ab,bc,cd,de->ae", vec![&[5, 2], &[2, 9], &[9, 3], &[3, 7]]),
        ("abd,ac,bdf,fc->", vec![&[9, 2, 3], &[9, 7], &[2, 3, 5], &[5, 7]]),
    ];

    for (expression, shapes) in cases {
        let (_, greedy) = contract_path(
            expression,
            &shapes,
            &ContractOptions::new().strategy(PathStrategy::Greedy),
        )
        .unwrap();
        let (_, optimal) = contract_path(
            expression,
            &shapes,
            &ContractOptions::new().strategy(PathStrategy::Optimal),
        )
        .unwrap();

        assert!(
            optimal.optimized_flops <= greedy.optimized_flops,
            "{expression}: optimal {} > greedy {}",
            optimal.optimized_flops,
            greedy.optimized_flops
        );
    }
}

#[test]
fn single_operand_has_a_single_step() {
    let shapes: Vec<&[usize]> = vec![&[4, 4]];
    let (_, info) = contract_path("ii->i", &shapes, &ContractOptions::default()).unwrap();
    assert_eq!(info.path, vec![vec![0]]);
}

#[test]
fn pure_outer_product_network_is_one_group() {
    let shapes: Vec<&[usize]> = vec![&[2], &[3], &[4]];
    let (_, info) = contract_path("a,b,c->abc", &shapes, &ContractOptions::default()).unwrap();
    assert_eq!(info.path, vec![vec![0, 1, 2]]);
    assert_eq!(info.naive_flops, info.optimized_flops);
}

#[test]
fn unbounded_memory_admits_large_intermediates() {
    // A tight explicit cap must still produce a complete path; it can only
    // steer the search toward smaller intermediates.
    let shapes: Vec<&[usize]> = vec![&[8, 3], &[3, 900], &[900, 4]];

    let (_, capped) = contract_path(
        "ij,jk,kl->il",
        &shapes,
        &ContractOptions::new().memory_limit(MemoryLimit::Elements(40)),
    )
    .unwrap();
    let (_, unbounded) = contract_path(
        "ij,jk,kl->il",
        &shapes,
        &ContractOptions::new().memory_limit(MemoryLimit::Unbounded),
    )
    .unwrap();

    assert_eq!(capped.path.len(), 2);
    assert_eq!(unbounded.path.len(), 2);
    assert!(capped.largest_intermediate <= unbounded.largest_intermediate);
}

#[test]
fn custom_path_overrides_search() {
    let shapes: Vec<&[usize]> = vec![&[2, 2], &[2, 5], &[5, 2]];
    let options =
        ContractOptions::new().strategy(PathStrategy::Custom(vec![vec![0, 1], vec![0, 1]]));
    let (_, info) = contract_path("ij,jk,kl->il", &shapes, &options).unwrap();

    assert_eq!(info.path, vec![vec![0, 1], vec![0, 1]]);
    // The deliberately bad order costs more than the searched one.
    assert!(info.optimized_flops > 56);
}

#[test]
fn custom_path_must_reduce_to_one_operand() {
    let shapes: Vec<&[usize]> = vec![&[2, 2], &[2, 2], &[2, 2]];
    let options = ContractOptions::new().strategy(PathStrategy::Custom(vec![vec![1, 2]]));
    let err = contract_path("ij,jk,kl->il", &shapes, &options).unwrap_err();
    assert!(matches!(err, EinsumError::InvalidPath { .. }));
}

#[test]
fn implicit_output_follows_alphabetical_convention() {
    let shapes: Vec<&[usize]> = vec![&[2, 3], &[3, 4]];
    let (plan, _) = contract_path("ij,jk", &shapes, &ContractOptions::default()).unwrap();
    assert_eq!(plan.output_term(), "ik");
}

#[test]
fn report_renders_a_step_table() {
    let shapes: Vec<&[usize]> = vec![&[2, 2], &[2, 5], &[5, 2]];
    let (_, info) = contract_path("ij,jk,kl->il", &shapes, &ContractOptions::default()).unwrap();

    let rendered = info.to_string();
    assert!(rendered.contains("Complete contraction:  ij,jk,kl->il"));
    assert!(rendered.contains("Naive scaling:  4"));
    assert!(rendered.contains("kl,jk->jl"));
}
