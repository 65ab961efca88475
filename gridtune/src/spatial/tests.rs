//! Tests for the spatial module (k-d tree).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::error::ErrorKind;

/// Helper: radius query indices, sorted.
fn sorted_radius_indices(tree: &KdTree, query: DVec2, radius: f64) -> Vec<usize> {
    let mut indices = tree.radius_indices(query, radius);
    indices.sort_unstable();
    indices
}

fn brute_force_indices(points: &[DVec2], query: DVec2, radius: f64) -> Vec<usize> {
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| query.distance_squared(**p) <= radius * radius)
        .map(|(i, _)| i)
        .collect()
}

#[test]
fn test_kdtree_build_empty() {
    let tree = KdTree::build(&[]).unwrap();
    assert!(tree.is_empty());
    assert_eq!(tree.len(), 0);
    assert!(tree.radius_indices(DVec2::ZERO, 100.0).is_empty());
}

#[test]
fn test_kdtree_build_single_point() {
    let tree = KdTree::build(&[DVec2::new(1.0, 2.0)]).unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.point(0), DVec2::new(1.0, 2.0));
}

#[test]
fn test_kdtree_build_rejects_nan() {
    let points = vec![DVec2::new(0.0, 0.0), DVec2::new(f64::NAN, 1.0)];
    let err = KdTree::build(&points).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SpatialIndexBuild);
    assert!(matches!(err, Error::SpatialIndexBuild { index: 1, .. }));
}

#[test]
fn test_kdtree_build_rejects_infinity() {
    let points = vec![DVec2::new(0.0, f64::NEG_INFINITY)];
    let err = KdTree::build(&points).unwrap_err();
    assert!(matches!(err, Error::SpatialIndexBuild { index: 0, .. }));
}

#[test]
fn test_kdtree_radius_basic() {
    let points = vec![
        DVec2::new(0.0, 0.0),
        DVec2::new(1.0, 0.0),
        DVec2::new(0.0, 1.0),
        DVec2::new(5.0, 5.0),
        DVec2::new(10.0, 10.0),
    ];
    let tree = KdTree::build(&points).unwrap();

    let indices = sorted_radius_indices(&tree, DVec2::new(0.0, 0.0), 2.0);
    assert_eq!(indices, vec![0, 1, 2]);
}

#[test]
fn test_kdtree_radius_empty_result() {
    let points = vec![DVec2::new(0.0, 0.0), DVec2::new(10.0, 10.0)];
    let tree = KdTree::build(&points).unwrap();

    assert!(tree.radius_indices(DVec2::new(5.0, 5.0), 1.0).is_empty());
}

#[test]
fn test_kdtree_radius_boundary_is_inclusive() {
    let points = vec![DVec2::new(1.0, 0.0), DVec2::new(0.0, 2.0)];
    let tree = KdTree::build(&points).unwrap();

    assert_eq!(sorted_radius_indices(&tree, DVec2::ZERO, 1.0), vec![0]);
    assert_eq!(sorted_radius_indices(&tree, DVec2::ZERO, 2.0), vec![0, 1]);
}

#[test]
fn test_kdtree_radius_zero_finds_coincident_point() {
    let points = vec![DVec2::new(3.0, 4.0), DVec2::new(3.0, 4.5)];
    let tree = KdTree::build(&points).unwrap();

    assert_eq!(sorted_radius_indices(&tree, DVec2::new(3.0, 4.0), 0.0), vec![0]);
}

#[test]
fn test_kdtree_negative_radius_finds_nothing() {
    let tree = KdTree::build(&[DVec2::ZERO]).unwrap();
    assert!(tree.radius_indices(DVec2::ZERO, -1.0).is_empty());
    assert!(tree.radius_indices(DVec2::ZERO, f64::NAN).is_empty());
}

#[test]
fn test_kdtree_reports_squared_distances() {
    let points = vec![DVec2::new(3.0, 4.0), DVec2::new(-1.0, 0.0)];
    let tree = KdTree::build(&points).unwrap();

    let mut buf = Vec::new();
    tree.radius_neighbors_into(DVec2::ZERO, 10.0, &mut buf);
    buf.sort_by_key(|n| n.index);

    assert_eq!(buf.len(), 2);
    assert!((buf[0].dist_sq - 25.0).abs() < 1e-12);
    assert!((buf[1].dist_sq - 1.0).abs() < 1e-12);
}

#[test]
fn test_kdtree_buffer_is_cleared_between_queries() {
    let points = vec![DVec2::new(0.0, 0.0), DVec2::new(100.0, 100.0)];
    let tree = KdTree::build(&points).unwrap();

    let mut buf = Vec::new();
    tree.radius_neighbors_into(DVec2::ZERO, 1.0, &mut buf);
    assert_eq!(buf.len(), 1);

    tree.radius_neighbors_into(DVec2::new(50.0, 50.0), 1.0, &mut buf);
    assert!(buf.is_empty());
}

#[test]
fn test_kdtree_duplicate_points() {
    let points = vec![DVec2::new(2.0, 2.0); 5];
    let tree = KdTree::build(&points).unwrap();

    assert_eq!(
        sorted_radius_indices(&tree, DVec2::new(2.0, 2.0), 0.1),
        vec![0, 1, 2, 3, 4]
    );
}

#[test]
fn test_kdtree_collinear_points() {
    let horizontal: Vec<DVec2> = (0..10).map(|i| DVec2::new(i as f64, 0.0)).collect();
    let tree = KdTree::build(&horizontal).unwrap();
    assert_eq!(
        sorted_radius_indices(&tree, DVec2::new(4.5, 0.0), 1.0),
        vec![4, 5]
    );

    let vertical: Vec<DVec2> = (0..10).map(|i| DVec2::new(0.0, i as f64)).collect();
    let tree = KdTree::build(&vertical).unwrap();
    assert_eq!(
        sorted_radius_indices(&tree, DVec2::new(0.0, 7.0), 1.0),
        vec![6, 7, 8]
    );
}

#[test]
fn test_kdtree_negative_and_large_coordinates() {
    let points = vec![
        DVec2::new(-1e6, -1e6),
        DVec2::new(-1e6 + 0.5, -1e6),
        DVec2::new(1e6, 1e6),
    ];
    let tree = KdTree::build(&points).unwrap();
    assert_eq!(
        sorted_radius_indices(&tree, DVec2::new(-1e6, -1e6), 1.0),
        vec![0, 1]
    );
}

#[test]
fn test_kdtree_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let points: Vec<DVec2> = (0..500)
        .map(|_| DVec2::new(rng.random_range(-50.0..50.0), rng.random_range(-50.0..50.0)))
        .collect();
    let tree = KdTree::build(&points).unwrap();

    for _ in 0..200 {
        let query = DVec2::new(rng.random_range(-60.0..60.0), rng.random_range(-60.0..60.0));
        let radius = rng.random_range(0.0..15.0);
        assert_eq!(
            sorted_radius_indices(&tree, query, radius),
            brute_force_indices(&points, query, radius),
            "mismatch at query {query} radius {radius}"
        );
    }
}

#[test]
fn test_kdtree_query_order_is_repeatable() {
    let points: Vec<DVec2> = (0..64)
        .map(|i| DVec2::new((i % 8) as f64, (i / 8) as f64))
        .collect();
    let tree = KdTree::build(&points).unwrap();

    let first = tree.radius_indices(DVec2::new(3.5, 3.5), 2.5);
    for _ in 0..10 {
        assert_eq!(tree.radius_indices(DVec2::new(3.5, 3.5), 2.5), first);
    }
}
