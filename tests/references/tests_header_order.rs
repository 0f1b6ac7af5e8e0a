//! Topological ordering of header reference graphs.

use rstest::rstest;
use uht::HeaderId;
use uht::references::topological_sort;

fn graph(edges: &[&[u32]]) -> Vec<Vec<HeaderId>> {
    edges
        .iter()
        .map(|targets| targets.iter().map(|&t| HeaderId::new(t)).collect())
        .collect()
}

#[rstest]
#[case::chain(&[&[1][..], &[2], &[]])]
#[case::diamond(&[&[1, 2][..], &[3], &[3], &[]])]
#[case::forest(&[&[][..], &[0], &[], &[2], &[]])]
#[case::self_edges(&[&[0, 1][..], &[1]])]
#[case::wide(&[&[1, 2, 3, 4][..], &[], &[1], &[2], &[3]])]
fn test_references_precede_referrers(#[case] edges: &[&[u32]]) {
    let edges = graph(edges);
    let order = topological_sort(&edges).unwrap();
    assert_eq!(order.len(), edges.len());

    let position = |h: HeaderId| order.iter().position(|x| *x == h).unwrap();
    for (from, targets) in edges.iter().enumerate() {
        let from = HeaderId::new(from as u32);
        for &target in targets {
            if target != from {
                assert!(position(target) < position(from), "{target:?} should precede {from:?}");
            }
        }
    }
}

#[rstest]
#[case::pair(&[&[1][..], &[0]], &[(0, 1), (1, 0)])]
#[case::tail(&[&[1][..], &[2], &[1], &[]], &[(1, 2), (2, 1)])]
#[case::triangle(&[&[][..], &[2], &[3], &[1]], &[(1, 2), (2, 3), (3, 1)])]
fn test_cycle_reports_each_edge(#[case] edges: &[&[u32]], #[case] expected: &[(u32, u32)]) {
    let cycle = topological_sort(&graph(edges)).unwrap_err();
    let expected: Vec<_> = expected
        .iter()
        .map(|&(a, b)| (HeaderId::new(a), HeaderId::new(b)))
        .collect();
    assert_eq!(cycle.chain, expected);
}

#[test]
fn test_order_is_stable() {
    let edges = graph(&[&[2], &[2], &[], &[0, 1]]);
    let first = topological_sort(&edges).unwrap();
    for _ in 0..8 {
        assert_eq!(topological_sort(&edges).unwrap(), first);
    }
    assert_eq!(
        first,
        vec![HeaderId::new(2), HeaderId::new(0), HeaderId::new(1), HeaderId::new(3)]
    );
}
