//! Polygon-with-holes triangulation.
//!
//! An island and its direct holes are flattened into one coordinate
//! buffer with hole start markers, the input format of ear-clipping
//! triangulators.

use crate::error::ReconstructError;
use crate::hierarchy::RingNode;

/// Rings with fewer points than this cannot bound any area.
pub const MIN_POLYGON_POINTS: usize = 3;

/// Triangulates a flat `[x0, y0, x1, y1, …]` polygon with holes.
///
/// `hole_starts` holds the vertex index (not the coordinate index) at
/// which each hole ring begins. Returned triples index vertices. Triangle
/// winding is unspecified.
pub trait Triangulator {
    fn triangulate(
        &self,
        vertices: &[f64],
        hole_starts: &[usize],
    ) -> Result<Vec<[u32; 3]>, ReconstructError>;
}

/// Ear-clipping triangulation via `earcutr`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EarcutTriangulator;

impl Triangulator for EarcutTriangulator {
    fn triangulate(
        &self,
        vertices: &[f64],
        hole_starts: &[usize],
    ) -> Result<Vec<[u32; 3]>, ReconstructError> {
        let indices = earcutr::earcut(vertices, hole_starts, 2)
            .map_err(|e| ReconstructError::Triangulation(format!("{:?}", e)))?;
        if indices.len() % 3 != 0 {
            return Err(ReconstructError::Triangulation(format!(
                "{} indices do not form whole triangles",
                indices.len()
            )));
        }
        Ok(indices
            .chunks_exact(3)
            .map(|t| [t[0] as u32, t[1] as u32, t[2] as u32])
            .collect())
    }
}

/// Flattened island outline followed by its hole outlines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatPolygon {
    pub vertices: Vec<f64>,
    pub hole_starts: Vec<usize>,
}

impl FlatPolygon {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 2
    }
}

/// Flatten `root` and its direct children.
///
/// Children too short to bound an area are left out. Grandchildren are
/// never part of the polygon.
pub fn flatten(root: &RingNode) -> FlatPolygon {
    let mut flat = FlatPolygon::default();
    push_ring(&mut flat.vertices, &root.ring.points);

    for child in &root.children {
        if child.ring.len() < MIN_POLYGON_POINTS {
            log::debug!("triangulate: skipping {}-point hole", child.ring.len());
            continue;
        }
        flat.hole_starts.push(flat.vertex_count());
        push_ring(&mut flat.vertices, &child.ring.points);
    }
    flat
}

fn push_ring(vertices: &mut Vec<f64>, points: &[(i32, i32)]) {
    vertices.reserve(points.len() * 2);
    for &(x, y) in points {
        vertices.push(x as f64);
        vertices.push(y as f64);
    }
}
