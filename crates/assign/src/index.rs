//! 2D spatial index over sample points
//!
//! A k-d tree answering k-nearest-neighbour queries by Euclidean distance.
//! Ties are broken by the smallest insertion index, so repeated builds over
//! the same data give identical query results.
//!
//! Reference:
//! Bentley, J.L. (1975). Multidimensional binary search trees used
//! for associative searching. CACM, 18(9).

use hydroset_core::{Error, Result, SamplePoint};

/// One neighbour returned by a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbour {
    /// Insertion index of the sample point
    pub index: usize,
    /// Euclidean distance to the query point
    pub distance: f64,
    /// The sample point's value
    pub value: f64,
}

/// Read-only spatial index over a set of sample points.
#[derive(Debug)]
pub struct SpatialIndex {
    nodes: Vec<Node>,
    points: Vec<SamplePoint>,
}

#[derive(Debug)]
struct Node {
    /// Index into `points` (insertion order)
    point_idx: usize,
    /// 0 = x, 1 = y
    split_dim: u8,
    left: Option<usize>,
    right: Option<usize>,
}

impl SpatialIndex {
    /// Build an index from sample points.
    ///
    /// Fails with `InvalidInput` when `points` is empty. Construction is
    /// O(n log n) by median splitting; the index is read-only afterwards.
    pub fn build(points: Vec<SamplePoint>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::InvalidInput(
                "spatial index needs at least one sample point".into(),
            ));
        }

        let mut indices: Vec<usize> = (0..points.len()).collect();
        let mut nodes = Vec::with_capacity(points.len());
        build_recursive(&points, &mut indices, 0, &mut nodes);

        Ok(Self { nodes, points })
    }

    /// Number of indexed points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The indexed sample points, in insertion order
    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    /// The k nearest neighbours of `(qx, qy)`, distances ascending, ties
    /// broken by smallest insertion index. Returns fewer than `k` results
    /// only when the index holds fewer points.
    pub fn k_nearest(&self, qx: f64, qy: f64, k: usize) -> Vec<Neighbour> {
        if k == 0 {
            return Vec::new();
        }

        // Worst-first sorted vec standing in for a max-heap of size k,
        // ordered by (distance, insertion index)
        let mut heap: Vec<(f64, usize)> = Vec::with_capacity(k + 1);
        self.knn_recursive(0, qx, qy, k, &mut heap);

        heap.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });

        heap.into_iter()
            .map(|(dist_sq, idx)| Neighbour {
                index: idx,
                distance: dist_sq.sqrt(),
                value: self.points[idx].value,
            })
            .collect()
    }

    /// Batched k-nearest-neighbour query.
    ///
    /// Fails with `InvalidInput` when `k < 1`.
    pub fn query(&self, points: &[(f64, f64)], k: usize) -> Result<Vec<Vec<Neighbour>>> {
        if k < 1 {
            return Err(Error::InvalidInput("k must be at least 1".into()));
        }
        Ok(points
            .iter()
            .map(|&(x, y)| self.k_nearest(x, y, k))
            .collect())
    }

    fn knn_recursive(
        &self,
        node_idx: usize,
        qx: f64,
        qy: f64,
        k: usize,
        heap: &mut Vec<(f64, usize)>,
    ) {
        let node = &self.nodes[node_idx];
        let p = &self.points[node.point_idx];

        let dx = qx - p.x;
        let dy = qy - p.y;
        let dist_sq = dx * dx + dy * dy;

        let candidate = (dist_sq, node.point_idx);
        if heap.len() < k {
            insert_sorted(heap, candidate);
        } else if worse(*heap.first().unwrap(), candidate) {
            heap.remove(0);
            insert_sorted(heap, candidate);
        }

        let diff = if node.split_dim == 0 { dx } else { dy };
        let (first, second) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(child) = first {
            self.knn_recursive(child, qx, qy, k, heap);
        }

        // The far side can still hold an equal-distance, lower-index point,
        // so prune with <= rather than <
        let threshold = if heap.len() >= k {
            heap[0].0
        } else {
            f64::MAX
        };
        if diff * diff <= threshold {
            if let Some(child) = second {
                self.knn_recursive(child, qx, qy, k, heap);
            }
        }
    }
}

/// `true` when `a` is a worse neighbour than `b`: farther away, or equally
/// far with a larger insertion index.
#[inline]
fn worse(a: (f64, usize), b: (f64, usize)) -> bool {
    a.0 > b.0 || (a.0 == b.0 && a.1 > b.1)
}

/// Insert keeping the vec sorted worst-first
fn insert_sorted(heap: &mut Vec<(f64, usize)>, candidate: (f64, usize)) {
    let pos = heap.partition_point(|&entry| worse(entry, candidate));
    heap.insert(pos, candidate);
}

fn build_recursive(
    points: &[SamplePoint],
    indices: &mut [usize],
    depth: usize,
    nodes: &mut Vec<Node>,
) -> usize {
    let n = indices.len();
    let split_dim = (depth % 2) as u8;

    indices.sort_by(|&a, &b| {
        let (va, vb) = if split_dim == 0 {
            (points[a].x, points[b].x)
        } else {
            (points[a].y, points[b].y)
        };
        va.partial_cmp(&vb).unwrap_or(std::cmp::Ordering::Equal)
    });

    let median = n / 2;
    let node_idx = nodes.len();
    nodes.push(Node {
        point_idx: indices[median],
        split_dim,
        left: None,
        right: None,
    });

    if median > 0 {
        let mut left = indices[..median].to_vec();
        let child = build_recursive(points, &mut left, depth + 1, nodes);
        nodes[node_idx].left = Some(child);
    }
    if median + 1 < n {
        let mut right = indices[median + 1..].to_vec();
        let child = build_recursive(points, &mut right, depth + 1, nodes);
        nodes[node_idx].right = Some(child);
    }

    node_idx
}
