//! Binarization: RGBA canvas → boolean ink grid.

use image::{GrayImage, Luma, RgbaImage};

/// Boolean ink field with the dimensions of the source canvas.
///
/// Stored row-major with y=0 at the top of the image (same orientation
/// as the RGBA buffer it was derived from).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InkGrid {
    data: Vec<bool>,
    width: u32,
    height: u32,
}

impl InkGrid {
    /// An all-background grid.
    pub fn new(width: u32, height: u32) -> Self {
        InkGrid {
            data: vec![false; width as usize * height as usize],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Ink at (x, y). Out-of-bounds = background.
    pub fn get(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, ink: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.data[idx] = ink;
    }

    /// Number of ink cells.
    pub fn ink_count(&self) -> usize {
        self.data.iter().filter(|&&ink| ink).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.data.iter().any(|&ink| ink)
    }

    /// Build from ASCII rows, `#` = ink.
    #[cfg(test)]
    pub(crate) fn from_rows(rows: &[&str]) -> Self {
        let mut grid = InkGrid::new(rows[0].len() as u32, rows.len() as u32);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                grid.set(x as u32, y as u32, c == '#');
            }
        }
        grid
    }

    /// Render as black ink on white, for debugging.
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            if self.get(x as i64, y as i64) {
                Luma([0])
            } else {
                Luma([255])
            }
        })
    }
}

/// Classify every pixel as ink or background.
///
/// A pixel is ink when its mean RGB luminance is strictly below
/// `threshold`. Alpha is not consulted. `(r+g+b)/3 < t` is evaluated as
/// `r+g+b < 3t`, which is the same predicate without rounding.
pub fn binarize(pixels: &RgbaImage, threshold: u8) -> InkGrid {
    let (width, height) = pixels.dimensions();
    let limit = 3 * threshold as u16;
    let data = pixels
        .pixels()
        .map(|p| {
            let [r, g, b, _] = p.0;
            (r as u16 + g as u16 + b as u16) < limit
        })
        .collect();

    InkGrid { data, width, height }
}
