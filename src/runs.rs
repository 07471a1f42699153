//! Scanline run-length extraction.

use serde::Serialize;

use crate::bitmap::InkGrid;

/// An axis-aligned block of ink cells, in pixel coordinates (y down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Run {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Run {
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Whether cell (x, y) lies inside this block.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// One run per maximal horizontal ink span per row. Height is always 1.
pub fn extract_runs(grid: &InkGrid) -> Vec<Run> {
    let mut runs = Vec::new();
    for y in 0..grid.height() {
        let mut start: Option<u32> = None;
        for x in 0..grid.width() {
            let ink = grid.get(x as i64, y as i64);
            match (ink, start) {
                (true, None) => start = Some(x),
                (false, Some(x0)) => {
                    runs.push(Run { x: x0, y, width: x - x0, height: 1 });
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(x0) = start {
            runs.push(Run { x: x0, y, width: grid.width() - x0, height: 1 });
        }
    }
    runs
}
