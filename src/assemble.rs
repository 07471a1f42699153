//! Mesh and outline assembly over the ring forest.

use serde::Serialize;

use crate::error::ReconstructError;
use crate::hierarchy::RingNode;
use crate::triangulate::{flatten, Triangulator, MIN_POLYGON_POINTS};

/// Triangulated island: flat `[x0, y0, x1, y1, …]` vertices and index triples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshRecord {
    pub vertices: Vec<f64>,
    pub indices: Vec<[u32; 3]>,
}

impl MeshRecord {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 2
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }
}

/// One ring of the forest, for side-wall extrusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineRing {
    pub points: Vec<(i32, i32)>,
    pub is_hole: bool,
}

/// Contour-strategy output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContourMesh {
    pub meshes: Vec<MeshRecord>,
    pub outlines: Vec<OutlineRing>,
}

impl ContourMesh {
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty() && self.outlines.is_empty()
    }
}

/// Triangulate every island and collect every ring as an outline.
///
/// Each root is triangulated together with its direct children. Per
/// island, outlines start with the root followed by the holes in the
/// order they appear in the mesh, so `outlines[k + 1]` of an island is
/// the hole starting at `hole_starts[k]`. Holes too short to triangulate
/// come next, then every deeper descendant, depth-first. Islands that
/// cannot form a triangle are skipped; a triangulator error aborts the
/// whole call.
pub fn assemble(
    roots: &[RingNode],
    triangulator: &dyn Triangulator,
) -> Result<ContourMesh, ReconstructError> {
    let mut out = ContourMesh::default();

    for root in roots {
        push_island_outlines(&mut out.outlines, root);

        let flat = flatten(root);
        if root.ring.len() < MIN_POLYGON_POINTS || flat.vertex_count() < MIN_POLYGON_POINTS {
            log::debug!("assemble: skipping degenerate island ({} points)", root.ring.len());
            continue;
        }

        let indices = triangulator.triangulate(&flat.vertices, &flat.hole_starts)?;
        if indices.is_empty() {
            log::debug!("assemble: island produced no triangles");
            continue;
        }
        out.meshes.push(MeshRecord { vertices: flat.vertices, indices });
    }

    Ok(out)
}

fn push_island_outlines(outlines: &mut Vec<OutlineRing>, root: &RingNode) {
    outlines.push(outline(root));

    let (holes, short): (Vec<&RingNode>, Vec<&RingNode>) = root
        .children
        .iter()
        .partition(|child| child.ring.len() >= MIN_POLYGON_POINTS);
    outlines.extend(holes.into_iter().chain(short).map(outline));

    for child in &root.children {
        for descendant in &child.children {
            push_outlines(outlines, descendant);
        }
    }
}

/// Depth-first, parent before children.
fn push_outlines(outlines: &mut Vec<OutlineRing>, node: &RingNode) {
    outlines.push(outline(node));
    for child in &node.children {
        push_outlines(outlines, child);
    }
}

fn outline(node: &RingNode) -> OutlineRing {
    OutlineRing {
        points: node.ring.points.clone(),
        is_hole: node.is_hole,
    }
}
