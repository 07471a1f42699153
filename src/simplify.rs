//! Ramer–Douglas–Peucker reduction of lattice rings.
//!
//! Uses an explicit work stack instead of recursion, so ring length is
//! bounded only by memory.

/// Below this chord length the start and end points are treated as one.
const DEGENERATE_CHORD: f64 = 1e-9;

/// Keep the vertices of `points` that deviate more than `epsilon` from
/// the chord of their enclosing range.
///
/// First and last points are always kept and order is preserved. Inputs
/// of two points or fewer are returned as they are.
pub fn simplify_ring(points: &[(i32, i32)], epsilon: f64) -> Vec<(i32, i32)> {
    simplify_indices(points, epsilon)
        .into_iter()
        .map(|i| points[i])
        .collect()
}

/// Indices of the points [`simplify_ring`] keeps, ascending.
pub fn simplify_indices(points: &[(i32, i32)], epsilon: f64) -> Vec<usize> {
    let n = points.len();
    if n <= 2 {
        return (0..n).collect();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0usize, n - 1)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }

        let (a, b) = (points[start], points[end]);
        let mut max_dist = 0.0;
        let mut index = start;
        for (i, &p) in points.iter().enumerate().take(end).skip(start + 1) {
            let d = perpendicular_distance(p, a, b);
            if d > max_dist {
                max_dist = d;
                index = i;
            }
        }

        if max_dist > epsilon {
            keep[index] = true;
            stack.push((start, index));
            stack.push((index, end));
        }
    }

    (0..n).filter(|&i| keep[i]).collect()
}

/// Distance from `p` to the line through `a` and `b`.
///
/// Line form `A·x + B·y + C = 0`. Falls back to the distance to `a` when
/// the chord is degenerate.
pub fn perpendicular_distance(p: (i32, i32), a: (i32, i32), b: (i32, i32)) -> f64 {
    let (px, py) = (p.0 as f64, p.1 as f64);
    let (ax, ay) = (a.0 as f64, a.1 as f64);
    let (bx, by) = (b.0 as f64, b.1 as f64);

    let la = by - ay;
    let lb = ax - bx;
    let lc = bx * ay - by * ax;
    let norm = (la * la + lb * lb).sqrt();

    if norm < DEGENERATE_CHORD {
        return ((px - ax).powi(2) + (py - ay).powi(2)).sqrt();
    }
    (la * px + lb * py + lc).abs() / norm
}
