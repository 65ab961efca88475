//! Spatial index over measurement coordinates.
//!
//! A 2D k-d tree built once per correction call and queried once per grid cell.

use glam::DVec2;

use crate::error::{Error, Result};

#[cfg(test)]
mod tests;

/// A point returned by a radius query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Index into the points the tree was built from.
    pub index: usize,
    /// Squared Euclidean distance to the query point.
    pub dist_sq: f64,
}

/// A 2D k-d tree supporting radius-bounded queries.
///
/// Built with median splits alternating between x and y, so construction is
/// O(n log n) and the tree is balanced. An empty point set is valid and
/// answers every query with no neighbors.
#[derive(Debug, Default)]
pub struct KdTree {
    nodes: Vec<KdNode>,
    points: Vec<DVec2>,
}

#[derive(Debug, Clone)]
struct KdNode {
    /// Index into the points array
    point_idx: usize,
    left: Option<usize>,
    right: Option<usize>,
    /// 0 = x, 1 = y
    split_dim: usize,
}

impl KdTree {
    /// Build a tree from a list of points.
    ///
    /// Fails with [`Error::SpatialIndexBuild`] on the first point with a NaN or
    /// infinite coordinate.
    pub fn build(points: &[DVec2]) -> Result<Self> {
        if let Some((index, p)) = points.iter().enumerate().find(|(_, p)| !p.is_finite()) {
            return Err(Error::SpatialIndexBuild {
                index,
                x: p.x,
                y: p.y,
            });
        }

        let mut indices: Vec<usize> = (0..points.len()).collect();
        let mut nodes = Vec::with_capacity(points.len());
        Self::build_recursive(points, &mut indices, 0, &mut nodes);

        Ok(Self {
            nodes,
            points: points.to_vec(),
        })
    }

    fn build_recursive(
        points: &[DVec2],
        indices: &mut [usize],
        depth: usize,
        nodes: &mut Vec<KdNode>,
    ) -> Option<usize> {
        if indices.is_empty() {
            return None;
        }

        let split_dim = depth % 2;
        let median = indices.len() / 2;
        // coordinates are finite, total_cmp matches the numeric order
        indices.select_nth_unstable_by(median, |&a, &b| {
            points[a][split_dim].total_cmp(&points[b][split_dim])
        });

        let node_idx = nodes.len();
        nodes.push(KdNode {
            point_idx: indices[median],
            left: None,
            right: None,
            split_dim,
        });

        let (left_indices, right_part) = indices.split_at_mut(median);
        let right_indices = &mut right_part[1..];

        let left = Self::build_recursive(points, left_indices, depth + 1, nodes);
        let right = Self::build_recursive(points, right_indices, depth + 1, nodes);

        nodes[node_idx].left = left;
        nodes[node_idx].right = right;

        Some(node_idx)
    }

    /// Collects every point with distance to `query` at most `radius` into `out`.
    ///
    /// `out` is cleared first. Result order follows the tree traversal: it is
    /// deterministic for a given tree and query but otherwise unspecified.
    pub fn radius_neighbors_into(&self, query: DVec2, radius: f64, out: &mut Vec<Neighbor>) {
        out.clear();
        if self.nodes.is_empty() || radius.is_nan() || radius < 0.0 {
            return;
        }
        self.radius_recursive(0, query, radius * radius, out);
    }

    /// Indices of every point within `radius` of `query`.
    pub fn radius_indices(&self, query: DVec2, radius: f64) -> Vec<usize> {
        let mut buf = Vec::new();
        self.radius_neighbors_into(query, radius, &mut buf);
        buf.into_iter().map(|n| n.index).collect()
    }

    fn radius_recursive(
        &self,
        node_idx: usize,
        query: DVec2,
        radius_sq: f64,
        out: &mut Vec<Neighbor>,
    ) {
        let node = &self.nodes[node_idx];
        let point = self.points[node.point_idx];

        let dist_sq = query.distance_squared(point);
        if dist_sq <= radius_sq {
            out.push(Neighbor {
                index: node.point_idx,
                dist_sq,
            });
        }

        let diff = query[node.split_dim] - point[node.split_dim];
        let diff_sq = diff * diff;

        if let Some(left_idx) = node.left
            && (diff <= 0.0 || diff_sq <= radius_sq)
        {
            self.radius_recursive(left_idx, query, radius_sq, out);
        }

        if let Some(right_idx) = node.right
            && (diff >= 0.0 || diff_sq <= radius_sq)
        {
            self.radius_recursive(right_idx, query, radius_sq, out);
        }
    }

    /// Number of points in the tree.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point by the index it was built with.
    pub fn point(&self, idx: usize) -> DVec2 {
        self.points[idx]
    }
}
