//! End-to-end scenarios on synthetic canvases.

use geo::{Area, LineString, Polygon};
use glyph2mesh::{
    binarize, classify, reconstruct, simplify_ring, trace_rings, EarcutTriangulator,
    PipelineConfig, Reconstruction, Run, Strategy,
};
use image::{Rgba, RgbaImage};

const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// White canvas with black filled rectangles `(x0, y0, x1, y1)`, exclusive ends.
fn canvas(size: u32, blocks: &[(u32, u32, u32, u32)]) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        if blocks.iter().any(|&(x0, y0, x1, y1)| x >= x0 && x < x1 && y >= y0 && y < y1) {
            INK
        } else {
            PAPER
        }
    })
}

fn config_with_threshold(threshold: u8) -> PipelineConfig {
    PipelineConfig { threshold, ..PipelineConfig::default() }
}

fn run_all(pixels: &RgbaImage, config: &PipelineConfig) -> Vec<Reconstruction> {
    [Strategy::Runs, Strategy::Greedy, Strategy::Contours]
        .into_iter()
        .map(|s| reconstruct(pixels, s, config, &EarcutTriangulator).unwrap())
        .collect()
}

#[test_log::test]
fn threshold_zero_yields_nothing() {
    let pixels = canvas(64, &[(10, 10, 40, 40)]);
    for result in run_all(&pixels, &config_with_threshold(0)) {
        assert!(result.is_empty(), "{:?}", result);
    }
}

#[test_log::test]
fn blank_canvas_yields_nothing() {
    let pixels = canvas(64, &[]);
    for result in run_all(&pixels, &PipelineConfig::default()) {
        assert!(result.is_empty());
        assert_eq!(result.primitive_count(), 0);
    }
}

#[test_log::test]
fn ten_by_ten_block() {
    let pixels = canvas(32, &[(10, 10, 20, 20)]);
    let config = PipelineConfig::default();

    let greedy = reconstruct(&pixels, Strategy::Greedy, &config, &EarcutTriangulator).unwrap();
    assert_eq!(
        greedy,
        Reconstruction::Rectangles { runs: vec![Run { x: 10, y: 10, width: 10, height: 10 }] }
    );

    let runs = reconstruct(&pixels, Strategy::Runs, &config, &EarcutTriangulator).unwrap();
    let Reconstruction::Runs { runs } = runs else {
        panic!("expected runs");
    };
    assert_eq!(runs.len(), 10);
    for (i, run) in runs.iter().enumerate() {
        assert_eq!(*run, Run { x: 10, y: 10 + i as u32, width: 10, height: 1 });
    }
}

#[test_log::test]
fn two_blobs_are_two_islands() {
    let pixels = canvas(64, &[(4, 4, 20, 20), (30, 30, 60, 50)]);
    let config = PipelineConfig::default();

    let grid = binarize(&pixels, config.threshold);
    let rings: Vec<_> = trace_rings(&grid, config.min_ring_points)
        .into_iter()
        .map(|r| glyph2mesh::Ring { points: simplify_ring(&r.points, config.rdp_epsilon) })
        .collect();
    let roots = classify(rings);
    assert_eq!(roots.len(), 2);
    assert!(roots.iter().all(|r| !r.is_hole && r.children.is_empty()));

    let result = reconstruct(&pixels, Strategy::Contours, &config, &EarcutTriangulator).unwrap();
    let Reconstruction::Contours(mesh) = result else {
        panic!("expected contours");
    };
    assert_eq!(mesh.meshes.len(), 2);
    assert_eq!(mesh.outlines.len(), 2);
    assert!(mesh.outlines.iter().all(|o| !o.is_hole));
    for record in &mesh.meshes {
        assert!(record.triangle_count() >= 2);
        assert!(record.indices.iter().flatten().all(|&i| (i as usize) < record.vertex_count()));
    }
}

#[test_log::test]
fn closed_loop_glyph_has_no_traced_counter() {
    // A square "O": the enclosed background is never traced, so the
    // result is a single solid island.
    let pixels = canvas(64, &[(10, 10, 50, 16), (10, 44, 50, 50), (10, 10, 16, 50), (44, 10, 50, 50)]);
    let result =
        reconstruct(&pixels, Strategy::Contours, &PipelineConfig::default(), &EarcutTriangulator)
            .unwrap();
    let Reconstruction::Contours(mesh) = result else {
        panic!("expected contours");
    };
    assert_eq!(mesh.outlines.len(), 1);
    assert!(!mesh.outlines[0].is_hole);
    assert_eq!(mesh.meshes.len(), 1);
}

#[test_log::test]
fn specks_are_filtered() {
    let pixels = canvas(32, &[(3, 3, 4, 4), (10, 10, 12, 11)]);
    let result =
        reconstruct(&pixels, Strategy::Contours, &PipelineConfig::default(), &EarcutTriangulator)
            .unwrap();
    assert!(result.is_empty());
}

#[test]
fn traced_area_matches_geo() {
    let pixels = canvas(48, &[(5, 5, 30, 12), (5, 12, 12, 40)]);
    let grid = binarize(&pixels, 128);
    let rings = trace_rings(&grid, 6);
    assert_eq!(rings.len(), 1);

    let pts = &rings[0].points;
    let polygon = Polygon::new(
        LineString::from(pts.iter().map(|&(x, y)| (x as f64, y as f64)).collect::<Vec<_>>()),
        vec![],
    );
    approx::assert_relative_eq!(
        glyph2mesh::signed_area(pts).abs(),
        polygon.unsigned_area(),
        epsilon = 1e-9
    );
}
