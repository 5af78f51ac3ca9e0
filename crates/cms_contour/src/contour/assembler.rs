//! Final mesh assembly.
//!
//! Only vertices of edges that a finished polygon marked `used` survive;
//! collinear edges a merged polygon passed over stay unmarked and are dropped
//! from both the vertex list and the polygon. Surviving vertices keep their
//! edge-arena order.

use crate::error::ContourError;
use crate::types::{MeshOutput, MinMaxAABB};

use super::segment_graph::SegmentGraph;
use super::walker::{triangulate, PolygonLoop};

#[cfg_attr(
  feature = "tracing",
  tracing::instrument(skip_all, name = "contour::assembly")
)]
pub fn assemble(graph: &SegmentGraph, polygons: &[PolygonLoop]) -> Result<MeshOutput, ContourError> {
  let grid = graph.grid();
  let raw = grid.vertices();

  let mut remap = vec![u32::MAX; raw.len()];
  let mut vertices: Vec<[f32; 3]> = Vec::with_capacity(raw.len());
  for edge in grid.edges().iter().filter(|e| e.used) {
    if let Some(v) = edge.vertex {
      remap[v as usize] = vertices.len() as u32;
      vertices.push(raw[v as usize].to_array());
    }
  }

  let mut indices = Vec::with_capacity(polygons.len() * 6);
  let mut ring: Vec<u32> = Vec::with_capacity(16);
  for (polygon, outline) in polygons.iter().enumerate() {
    ring.clear();
    ring.extend(outline.iter().filter_map(|&id| {
      let edge = graph.edge(id);
      edge.vertex.filter(|_| edge.used).map(|v| remap[v as usize])
    }));

    if ring.len() < 3 {
      return Err(ContourError::DegeneratePolygon {
        polygon,
        vertices: ring.len(),
      });
    }
    triangulate(&ring, &mut vertices, &mut indices);
  }

  let mut bounds = MinMaxAABB::empty();
  for &vertex in &vertices {
    bounds.encapsulate(vertex);
  }

  Ok(MeshOutput {
    vertices,
    indices,
    polygon_count: polygons.len(),
    bounds,
  })
}

#[cfg(test)]
#[path = "assembler_test.rs"]
mod assembler_test;
