//! Request handling: clamp parameters, rasterize, reconstruct, respond.
//!
//! These are the payloads a transport layer exchanges; the binary writes
//! them as JSON.

use serde::{Deserialize, Serialize};

use crate::bitmap::{binarize, InkGrid};
use crate::config::PipelineConfig;
use crate::error::ReconstructError;
use crate::render::Rasterizer;
use crate::triangulate::Triangulator;
use crate::{reconstruct, Reconstruction, Strategy};

/// One glyph to reconstruct. Out-of-range numbers are clamped, not rejected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GlyphRequest {
    pub character: char,
    #[serde(default)]
    pub resolution: Option<i64>,
    #[serde(default)]
    pub threshold: Option<i64>,
    #[serde(default)]
    pub strategy: Strategy,
}

impl GlyphRequest {
    pub fn new(character: char, strategy: Strategy) -> Self {
        GlyphRequest { character, resolution: None, threshold: None, strategy }
    }
}

/// Successful reconstruction, with the parameters actually used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlyphResponse {
    pub character: char,
    pub resolution: u32,
    pub threshold: u8,
    pub strategy: Strategy,
    #[serde(flatten)]
    pub geometry: Reconstruction,
}

/// Request-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub error: String,
    /// RFC 3339, UTC.
    pub timestamp: String,
}

impl ErrorPayload {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorPayload {
            error: message.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl From<&ReconstructError> for ErrorPayload {
    fn from(err: &ReconstructError) -> Self {
        ErrorPayload::new(err.to_string())
    }
}

/// Owns the external collaborators and the base configuration.
///
/// Holds no per-request state, so one service can serve requests from
/// several threads at once.
pub struct GlyphService<R, T> {
    rasterizer: R,
    triangulator: T,
    config: PipelineConfig,
}

impl<R: Rasterizer, T: Triangulator> GlyphService<R, T> {
    pub fn new(rasterizer: R, triangulator: T, config: PipelineConfig) -> Self {
        GlyphService { rasterizer, triangulator, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Resolution and threshold after clamping and defaults.
    fn resolve(&self, request: &GlyphRequest) -> (u32, u8) {
        let resolution = self
            .config
            .clamp_resolution(request.resolution.unwrap_or(self.config.resolution as i64));
        let threshold = request
            .threshold
            .map(PipelineConfig::clamp_threshold)
            .unwrap_or(self.config.threshold);
        (resolution, threshold)
    }

    /// The binarized canvas `handle` would reconstruct from.
    pub fn ink_grid(&self, request: &GlyphRequest) -> Result<InkGrid, ReconstructError> {
        let (resolution, threshold) = self.resolve(request);
        let pixels =
            self.rasterizer
                .render(request.character, resolution, self.config.font_size_fraction)?;
        Ok(binarize(&pixels, threshold))
    }

    pub fn handle(&self, request: &GlyphRequest) -> Result<GlyphResponse, ReconstructError> {
        let (resolution, threshold) = self.resolve(request);
        log::debug!(
            "request {:?}: {}px, threshold {}, {}",
            request.character,
            resolution,
            threshold,
            request.strategy
        );

        let pixels =
            self.rasterizer
                .render(request.character, resolution, self.config.font_size_fraction)?;

        let config = PipelineConfig { threshold, ..self.config.clone() };
        let geometry = reconstruct(&pixels, request.strategy, &config, &self.triangulator)?;

        Ok(GlyphResponse {
            character: request.character,
            resolution,
            threshold,
            strategy: request.strategy,
            geometry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulate::EarcutTriangulator;
    use image::{Rgba, RgbaImage};

    /// Paints a centred square half the canvas wide, whatever the character.
    struct SquareRasterizer;

    impl Rasterizer for SquareRasterizer {
        fn render(&self, _: char, size: u32, _: f32) -> Result<RgbaImage, ReconstructError> {
            let (lo, hi) = (size / 4, size / 4 * 3);
            Ok(RgbaImage::from_fn(size, size, |x, y| {
                if x >= lo && x < hi && y >= lo && y < hi {
                    Rgba([0, 0, 0, 255])
                } else {
                    Rgba([255, 255, 255, 255])
                }
            }))
        }
    }

    struct NoFont;

    impl Rasterizer for NoFont {
        fn render(&self, c: char, _: u32, _: f32) -> Result<RgbaImage, ReconstructError> {
            Err(ReconstructError::MissingGlyph(c))
        }
    }

    fn service() -> GlyphService<SquareRasterizer, EarcutTriangulator> {
        GlyphService::new(SquareRasterizer, EarcutTriangulator, PipelineConfig::default())
    }

    #[test]
    fn parameters_are_clamped() {
        let request = GlyphRequest {
            character: 'x',
            resolution: Some(4),
            threshold: Some(-50),
            strategy: Strategy::Runs,
        };
        let response = service().handle(&request).unwrap();
        assert_eq!(response.resolution, 32);
        assert_eq!(response.threshold, 0);
        assert!(response.geometry.is_empty());
    }

    #[test]
    fn greedy_square_is_one_rectangle() {
        let request = GlyphRequest { resolution: Some(64), ..GlyphRequest::new('x', Strategy::Greedy) };
        let response = service().handle(&request).unwrap();
        match response.geometry {
            Reconstruction::Rectangles { runs } => {
                assert_eq!(runs, vec![crate::Run { x: 16, y: 16, width: 32, height: 32 }]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn contour_square_is_one_island() {
        let request = GlyphRequest { resolution: Some(64), ..GlyphRequest::new('x', Strategy::Contours) };
        let response = service().handle(&request).unwrap();
        match response.geometry {
            Reconstruction::Contours(mesh) => {
                assert_eq!(mesh.meshes.len(), 1);
                assert_eq!(mesh.outlines.len(), 1);
                assert!(!mesh.outlines[0].is_hole);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn ink_grid_uses_clamped_parameters() {
        let request = GlyphRequest {
            resolution: Some(4000),
            threshold: Some(900),
            ..GlyphRequest::new('x', Strategy::Runs)
        };
        let grid = service().ink_grid(&request).unwrap();
        assert_eq!((grid.width(), grid.height()), (1024, 1024));
        assert_eq!(grid.ink_count(), 512 * 512);
    }

    #[test]
    fn rasterizer_failure_propagates() {
        let svc = GlyphService::new(NoFont, EarcutTriangulator, PipelineConfig::default());
        let err = svc.handle(&GlyphRequest::new('?', Strategy::Runs)).unwrap_err();
        assert!(matches!(err, ReconstructError::MissingGlyph('?')));

        let payload = ErrorPayload::from(&err);
        assert!(payload.error.contains("'?'"));
        assert!(chrono::DateTime::parse_from_rfc3339(&payload.timestamp).is_ok());
    }

    #[test]
    fn request_json_defaults() {
        let request: GlyphRequest = serde_json::from_str(r#"{ "character": "A" }"#).unwrap();
        assert_eq!(request, GlyphRequest::new('A', Strategy::Contours));

        let request: GlyphRequest =
            serde_json::from_str(r#"{ "character": "B", "resolution": 9000, "strategy": "greedy" }"#)
                .unwrap();
        assert_eq!(request.resolution, Some(9000));
        assert_eq!(request.strategy, Strategy::Greedy);
    }

    #[test]
    fn response_json_shape() {
        let request = GlyphRequest { resolution: Some(32), ..GlyphRequest::new('x', Strategy::Runs) };
        let json = serde_json::to_value(service().handle(&request).unwrap()).unwrap();
        assert_eq!(json["character"], "x");
        assert_eq!(json["strategy"], "runs");
        assert_eq!(json["runs"].as_array().unwrap().len(), 16);
    }
}
