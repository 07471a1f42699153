//! Glyph rasterization: character → RGBA canvas.
//!
//! Outlines are read with ttf-parser into a kurbo `BezPath`, placed on
//! the canvas with an affine transform, and filled via tiny-skia.

use std::path::Path;

use image::RgbaImage;
use kurbo::{Affine, BezPath, PathEl, Vec2};
use ttf_parser::{Face, OutlineBuilder};

use crate::error::ReconstructError;

/// Renders one character onto a square canvas.
pub trait Rasterizer {
    /// Returns a `canvas_size`×`canvas_size` buffer with dark ink on a
    /// light, opaque background. The em square spans
    /// `canvas_size · font_size_fraction` pixels.
    fn render(
        &self,
        character: char,
        canvas_size: u32,
        font_size_fraction: f32,
    ) -> Result<RgbaImage, ReconstructError>;
}

/// Rasterizer backed by a TrueType/OpenType font file.
pub struct GlyphRasterizer {
    data: Vec<u8>,
}

impl GlyphRasterizer {
    pub fn from_file(path: &Path) -> Result<Self, ReconstructError> {
        let data = std::fs::read(path)
            .map_err(|e| ReconstructError::FontLoad(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(data)
    }

    /// Fails if `data` is not a parseable font face.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, ReconstructError> {
        let face = Face::parse(&data, 0).map_err(|e| ReconstructError::FontParse(e.to_string()))?;
        log::debug!(
            "font: {} glyphs, {} units/em",
            face.number_of_glyphs(),
            face.units_per_em()
        );
        Ok(GlyphRasterizer { data })
    }

    fn face(&self) -> Result<Face<'_>, ReconstructError> {
        Face::parse(&self.data, 0).map_err(|e| ReconstructError::FontParse(e.to_string()))
    }
}

impl Rasterizer for GlyphRasterizer {
    fn render(
        &self,
        character: char,
        canvas_size: u32,
        font_size_fraction: f32,
    ) -> Result<RgbaImage, ReconstructError> {
        let face = self.face()?;
        let glyph = face
            .glyph_index(character)
            .ok_or(ReconstructError::MissingGlyph(character))?;

        let mut outline = BezPathBuilder(BezPath::new());
        let placed = face.outline_glyph(glyph, &mut outline).map(|bbox| {
            let scale =
                canvas_size as f64 * font_size_fraction as f64 / face.units_per_em() as f64;
            let cx = (bbox.x_min as f64 + bbox.x_max as f64) / 2.0;
            let cy = (bbox.y_min as f64 + bbox.y_max as f64) / 2.0;
            let half = canvas_size as f64 / 2.0;
            // Centre the bounding box and flip y (font y-up → image y-down).
            let transform = Affine::translate(Vec2::new(half, half))
                * Affine::scale_non_uniform(scale, -scale)
                * Affine::translate(Vec2::new(-cx, -cy));
            let mut path = outline.0;
            path.apply_affine(transform);
            path
        });
        if placed.is_none() {
            log::debug!("render: {:?} has no outline, blank canvas", character);
        }

        fill_canvas(placed.as_ref(), canvas_size)
    }
}

/// Fill `path` in black on an opaque white canvas.
fn fill_canvas(path: Option<&BezPath>, canvas_size: u32) -> Result<RgbaImage, ReconstructError> {
    let mut pixmap = tiny_skia::Pixmap::new(canvas_size, canvas_size)
        .ok_or(ReconstructError::Canvas(canvas_size))?;
    pixmap.fill(tiny_skia::Color::WHITE);

    if let Some(path) = path.and_then(kurbo_to_tinyskia) {
        let mut paint = tiny_skia::Paint::default();
        paint.set_color(tiny_skia::Color::BLACK);
        paint.anti_alias = true;
        pixmap.fill_path(
            &path,
            &paint,
            tiny_skia::FillRule::Winding,
            tiny_skia::Transform::identity(),
            None,
        );
    }

    // Every pixel is opaque, so premultiplied and straight RGBA agree.
    RgbaImage::from_raw(canvas_size, canvas_size, pixmap.take())
        .ok_or(ReconstructError::Canvas(canvas_size))
}

/// Convert a kurbo `BezPath` to a `tiny_skia::Path`. `None` if empty.
fn kurbo_to_tinyskia(bezpath: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = tiny_skia::PathBuilder::new();
    for el in bezpath.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => pb.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => pb.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

/// Collects ttf-parser outline callbacks into a `BezPath` (font units).
struct BezPathBuilder(BezPath);

impl OutlineBuilder for BezPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to((x as f64, y as f64));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to((x as f64, y as f64));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.0.quad_to((x1 as f64, y1 as f64), (x as f64, y as f64));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.0.curve_to(
            (x1 as f64, y1 as f64),
            (x2 as f64, y2 as f64),
            (x as f64, y as f64),
        );
    }

    fn close(&mut self) {
        self.0.close_path();
    }
}
