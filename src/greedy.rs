//! Greedy rectangular meshing.
//!
//! Covers the ink set with axis-aligned rectangles: width is grown
//! first, then height over the full width. The cover is exact and the
//! rectangles never overlap, but the count is not minimal.

use crate::bitmap::InkGrid;
use crate::runs::Run;

/// Cover every ink cell with non-overlapping rectangles, in raster order.
pub fn greedy_rectangles(grid: &InkGrid) -> Vec<Run> {
    // Consumed cells are cleared from this copy.
    let mut work = grid.clone();
    let (w, h) = (grid.width(), grid.height());
    let mut rects = Vec::new();

    for y in 0..h {
        for x in 0..w {
            if !work.get(x as i64, y as i64) {
                continue;
            }

            let mut width = 1;
            while x + width < w && work.get((x + width) as i64, y as i64) {
                width += 1;
            }

            let mut height = 1;
            while y + height < h && row_is_ink(&work, x, y + height, width) {
                height += 1;
            }

            for cy in y..y + height {
                for cx in x..x + width {
                    work.set(cx, cy, false);
                }
            }

            rects.push(Run { x, y, width, height });
        }
    }

    rects
}

/// Whether cells `x..x+width` of row `y` are all unconsumed ink.
fn row_is_ink(grid: &InkGrid, x: u32, y: u32, width: u32) -> bool {
    (x..x + width).all(|cx| grid.get(cx as i64, y as i64))
}
