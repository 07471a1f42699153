//! Solid/hole classification of simplified rings.
//!
//! Rings are ordered by absolute area, largest first. Each ring takes as
//! parent the first larger ring that contains its first vertex, which is
//! not necessarily the tightest enclosing one. A ring's hole flag is the
//! negation of its parent's.

use crate::geom::{point_in_ring, signed_area};
use crate::trace::Ring;

/// A ring and the rings nested directly inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct RingNode {
    pub ring: Ring,
    pub signed_area: f64,
    pub is_hole: bool,
    pub children: Vec<RingNode>,
}

impl RingNode {
    /// Number of nodes in this subtree, including itself.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(RingNode::subtree_len).sum::<usize>()
    }
}

/// Arrange rings into a containment forest. Returns the roots.
pub fn classify(rings: Vec<Ring>) -> Vec<RingNode> {
    let mut sized: Vec<(Ring, f64)> = rings
        .into_iter()
        .map(|ring| {
            let area = signed_area(&ring.points);
            (ring, area)
        })
        .collect();
    // Stable: equal areas keep trace order.
    sized.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));

    let n = sized.len();
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut is_hole = vec![false; n];

    for i in 0..n {
        let Some(&(x, y)) = sized[i].0.points.first() else {
            continue;
        };
        let probe = (x as f64, y as f64);
        if let Some(j) = (0..i).find(|&j| point_in_ring(probe, &sized[j].0.points)) {
            parent[i] = Some(j);
            is_hole[i] = !is_hole[j];
        }
    }

    // Parents always precede their children, so folding from the back
    // moves every subtree into its parent before the parent is moved.
    let mut slots: Vec<Option<RingNode>> = sized
        .into_iter()
        .zip(&is_hole)
        .map(|((ring, signed_area), &is_hole)| {
            Some(RingNode { ring, signed_area, is_hole, children: Vec::new() })
        })
        .collect();

    let mut roots = Vec::new();
    for i in (0..n).rev() {
        let Some(mut node) = slots[i].take() else {
            continue;
        };
        node.children.reverse();
        match parent[i].and_then(|j| slots[j].as_mut()) {
            Some(p) => p.children.push(node),
            None => roots.push(node),
        }
    }
    roots.reverse();

    log::debug!(
        "hierarchy: {} rings → {} islands, {} holes",
        n,
        roots.len(),
        is_hole.iter().filter(|&&h| h).count()
    );
    roots
}
