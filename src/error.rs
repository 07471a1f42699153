use thiserror::Error;

/// Errors that can abort a glyph reconstruction request.
///
/// Degenerate geometry and empty glyphs are not errors; they produce
/// smaller (possibly empty) results instead.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReconstructError {
    #[error("failed to load font: {0}")]
    FontLoad(String),

    #[error("failed to parse font: {0}")]
    FontParse(String),

    #[error("font has no glyph for {0:?}")]
    MissingGlyph(char),

    #[error("cannot allocate a {0}x{0} canvas")]
    Canvas(u32),

    #[error("triangulation failed: {0}")]
    Triangulation(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
