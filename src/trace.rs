//! Outer-boundary extraction by 8-connected Moore-neighbor tracing.
//!
//! Seeds come from ink cells in raster order, so only the outer boundary
//! of each connected ink region is traced. Background enclosed by ink
//! (a counter) never seeds a trace and is not returned as a ring.

use crate::bitmap::InkGrid;

/// Neighbor offsets in clockwise order on a y-down grid, starting east.
const NEIGHBORS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Direction of arrival assumed for the seed cell (east).
const INITIAL_DIRECTION: usize = 0;

/// A closed loop of lattice points, in pixel coordinates (y down).
///
/// The loop is implicit: the last point is 8-adjacent to the first and
/// the first point is not repeated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    pub points: Vec<(i32, i32)>,
}

impl Ring {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Trace the outer boundary of every connected ink region.
///
/// Rings with fewer than `min_points` points are dropped, as are walks
/// that fail to close.
pub fn trace_rings(grid: &InkGrid, min_points: usize) -> Vec<Ring> {
    let (w, h) = (grid.width() as i32, grid.height() as i32);
    let max_steps = 4 * w as usize * h as usize + 8;
    let mut visited = vec![false; w as usize * h as usize];
    let mut rings = Vec::new();
    let mut dropped = 0usize;

    for y in 0..h {
        for x in 0..w {
            let idx = (y * w + x) as usize;
            if visited[idx] || !grid.get(x as i64, y as i64) {
                continue;
            }

            // The whole component, boundary included, is claimed before
            // the next seed is considered.
            mark_region(grid, &mut visited, (x, y));

            let Some(points) = follow_boundary(grid, (x, y), max_steps) else {
                dropped += 1;
                continue;
            };
            if points.len() < min_points {
                dropped += 1;
                continue;
            }
            rings.push(Ring { points });
        }
    }

    if dropped > 0 {
        log::debug!("trace: dropped {} open or under-{}-point rings", dropped, min_points);
    }
    rings
}

/// Walk the boundary clockwise from `start` until it returns to `start`.
///
/// Each step searches the 8 neighbors clockwise, starting two positions
/// counter-clockwise of the arrival direction. An isolated pixel yields
/// a single-point loop. `None` if the walk is still open after
/// `max_steps` points.
fn follow_boundary(
    grid: &InkGrid,
    start: (i32, i32),
    max_steps: usize,
) -> Option<Vec<(i32, i32)>> {
    let mut points = vec![start];
    let mut current = start;
    let mut direction = INITIAL_DIRECTION;

    loop {
        let first = (direction + 6) % 8;
        let next = (0..8).map(|i| (first + i) % 8).find(|&d| {
            let (dx, dy) = NEIGHBORS[d];
            grid.get((current.0 + dx) as i64, (current.1 + dy) as i64)
        });

        let Some(d) = next else {
            break;
        };
        let (dx, dy) = NEIGHBORS[d];
        current = (current.0 + dx, current.1 + dy);
        direction = d;

        if current == start {
            break;
        }
        points.push(current);

        if points.len() > max_steps {
            log::warn!(
                "trace: boundary from ({}, {}) did not close after {} steps",
                start.0,
                start.1,
                max_steps
            );
            return None;
        }
    }

    Some(points)
}

/// Mark every cell of the 8-connected ink region containing `seed`.
fn mark_region(grid: &InkGrid, visited: &mut [bool], seed: (i32, i32)) {
    let w = grid.width() as i32;
    let mut stack = vec![seed];
    visited[(seed.1 * w + seed.0) as usize] = true;

    while let Some((x, y)) = stack.pop() {
        for &(dx, dy) in &NEIGHBORS {
            let (nx, ny) = (x + dx, y + dy);
            if !grid.get(nx as i64, ny as i64) {
                continue;
            }
            let idx = (ny * w + nx) as usize;
            if !visited[idx] {
                visited[idx] = true;
                stack.push((nx, ny));
            }
        }
    }
}
