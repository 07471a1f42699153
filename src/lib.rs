//! glyph2mesh: rendered glyph → extrudable geometry.
//!
//! Binarizes an RGBA rendering of a single character and rebuilds it as
//! 3D-buildable primitives with one of three strategies:
//!
//! - **runs**: per-scanline ink spans (1×N bars)
//! - **greedy**: maximal axis-aligned rectangles
//! - **contours**: traced, simplified, hole-classified and triangulated
//!   outlines, plus the rings needed for side walls
//!
//! # Example
//!
//! ```no_run
//! use glyph2mesh::{reconstruct, EarcutTriangulator, PipelineConfig, Strategy};
//!
//! let pixels = image::open("glyph.png")?.into_rgba8();
//! let config = PipelineConfig::default();
//! let result = reconstruct(&pixels, Strategy::Contours, &config, &EarcutTriangulator)?;
//! println!("{} primitives", result.primitive_count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

mod assemble;
mod bitmap;
mod config;
mod geom;
mod greedy;
mod hierarchy;
mod runs;
mod simplify;
mod trace;
mod triangulate;

pub mod error;
pub mod render;
pub mod service;

pub use assemble::{assemble, ContourMesh, MeshRecord, OutlineRing};
pub use bitmap::{binarize, InkGrid};
pub use config::PipelineConfig;
pub use error::ReconstructError;
pub use geom::{point_in_ring, signed_area};
pub use greedy::greedy_rectangles;
pub use hierarchy::{classify, RingNode};
pub use runs::{extract_runs, Run};
pub use simplify::{perpendicular_distance, simplify_indices, simplify_ring};
pub use trace::{trace_rings, Ring};
pub use triangulate::{flatten, EarcutTriangulator, FlatPolygon, Triangulator};

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Which reconstruction to run over the ink grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Scanline runs, height 1.
    Runs,
    /// Greedy maximal rectangles.
    Greedy,
    /// Contours → meshes + outlines.
    #[default]
    Contours,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Runs => "runs",
            Strategy::Greedy => "greedy",
            Strategy::Contours => "contours",
        })
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "runs" => Ok(Strategy::Runs),
            "greedy" | "rectangles" => Ok(Strategy::Greedy),
            "contours" | "mesh" => Ok(Strategy::Contours),
            other => Err(format!(
                "unknown strategy {:?} (expected runs, greedy or contours)",
                other
            )),
        }
    }
}

/// Output of one reconstruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reconstruction {
    Runs { runs: Vec<Run> },
    Rectangles { runs: Vec<Run> },
    Contours(ContourMesh),
}

impl Reconstruction {
    pub fn is_empty(&self) -> bool {
        match self {
            Reconstruction::Runs { runs } | Reconstruction::Rectangles { runs } => runs.is_empty(),
            Reconstruction::Contours(mesh) => mesh.is_empty(),
        }
    }

    /// Runs, rectangles, or meshes, depending on the strategy.
    pub fn primitive_count(&self) -> usize {
        match self {
            Reconstruction::Runs { runs } | Reconstruction::Rectangles { runs } => runs.len(),
            Reconstruction::Contours(mesh) => mesh.meshes.len(),
        }
    }
}

/// Full pipeline: RGBA canvas → geometry for the chosen strategy.
///
/// Uses `config.threshold` for binarization; `rdp_epsilon` and
/// `min_ring_points` apply to the contour strategy only.
pub fn reconstruct(
    pixels: &RgbaImage,
    strategy: Strategy,
    config: &PipelineConfig,
    triangulator: &dyn Triangulator,
) -> Result<Reconstruction, ReconstructError> {
    let t_start = Instant::now();

    // ── Binarize ──────────────────────────────────────────
    let grid = binarize(pixels, config.threshold);
    log::debug!(
        "binarize {}x{} px, {} ink cells below {}",
        grid.width(),
        grid.height(),
        grid.ink_count(),
        config.threshold,
    );

    // ── Reconstruct ───────────────────────────────────────
    let result = match strategy {
        Strategy::Runs => Reconstruction::Runs { runs: extract_runs(&grid) },
        Strategy::Greedy => Reconstruction::Rectangles { runs: greedy_rectangles(&grid) },
        Strategy::Contours => Reconstruction::Contours(contour_mesh(&grid, config, triangulator)?),
    };

    log::info!(
        "{} {} primitives from {}x{} px ({}ms)",
        strategy,
        result.primitive_count(),
        grid.width(),
        grid.height(),
        t_start.elapsed().as_millis(),
    );
    Ok(result)
}

/// Trace → simplify → classify → triangulate.
fn contour_mesh(
    grid: &InkGrid,
    config: &PipelineConfig,
    triangulator: &dyn Triangulator,
) -> Result<ContourMesh, ReconstructError> {
    let rings = trace_rings(grid, config.min_ring_points);
    let raw_points: usize = rings.iter().map(Ring::len).sum();

    let simplified: Vec<Ring> = rings
        .into_iter()
        .map(|ring| Ring { points: simplify_ring(&ring.points, config.rdp_epsilon) })
        .collect();
    let kept_points: usize = simplified.iter().map(Ring::len).sum();
    log::debug!(
        "trace {} rings, {} → {} points (ε {})",
        simplified.len(),
        raw_points,
        kept_points,
        config.rdp_epsilon,
    );

    let roots = classify(simplified);
    let mesh = assemble(&roots, triangulator)?;
    log::debug!(
        "assemble {} meshes, {} triangles, {} outlines",
        mesh.meshes.len(),
        mesh.meshes.iter().map(MeshRecord::triangle_count).sum::<usize>(),
        mesh.outlines.len(),
    );
    Ok(mesh)
}
