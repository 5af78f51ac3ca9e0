//! Unit loop walking and polygon triangulation.
//!
//! Starting from any unconsumed (segment, direction), the walk turns from
//! face to face around one cube until it arrives back at the starting edge.
//! The corners visited form one closed polygon loop.

use glam::Vec3;
use smallvec::SmallVec;

use crate::constants::FAN_CORNERS;
use crate::error::{ContourError, Stage};

use super::edge_grid::EdgeId;
use super::segment_graph::{SegmentGraph, SegmentId};
use super::side::Side;

/// Closed polygon as a ring of edges, in winding order.
pub type PolygonLoop = SmallVec<[EdgeId; 8]>;

/// Result of tracing one cube loop without consuming it.
#[derive(Clone, Debug)]
pub struct UnitLoop {
  pub corners: PolygonLoop,
  /// Side that arrived back at the first corner.
  pub closing: Side,
}

fn non_manifold(graph: &SegmentGraph, stage: Stage, start: EdgeId, corners: usize) -> ContourError {
  ContourError::NonManifold {
    stage,
    cell: graph.edge(start).cell,
    corners,
  }
}

/// Trace the loop through `side` read-only. `visit` sees the side standing
/// on each corner after the first.
pub fn trace_loop(
  graph: &SegmentGraph,
  side: Side,
  max_corners: usize,
  stage: Stage,
  mut visit: impl FnMut(&Side),
) -> Result<UnitLoop, ContourError> {
  let start = side
    .next_edge()
    .ok_or_else(|| non_manifold(graph, stage, graph.segment(side.seg).start.edge, 0))?;

  let mut corners: PolygonLoop = SmallVec::new();
  corners.push(start);
  let mut side = side.advance(graph);

  while let Some(edge) = side.next_edge() {
    if edge == start {
      break;
    }
    if corners.len() >= max_corners {
      return Err(non_manifold(graph, stage, start, corners.len()));
    }
    corners.push(edge);
    visit(&side);
    side = side.advance(graph);
  }

  if side.next_edge() != Some(start) || corners.len() < 3 {
    return Err(non_manifold(graph, stage, start, corners.len()));
  }

  Ok(UnitLoop {
    corners,
    closing: side,
  })
}

/// Consume every segment direction on the loop through `side`. A loop whose
/// first direction is already consumed is left alone.
pub fn claim_loop(
  graph: &mut SegmentGraph,
  side: Side,
  max_corners: usize,
  stage: Stage,
) -> Result<(), ContourError> {
  if graph.is_used(side.seg, side.dir) {
    return Ok(());
  }
  let Some(start) = side.next_edge() else {
    return Err(non_manifold(graph, stage, graph.segment(side.seg).start.edge, 0));
  };

  let mut count = 0;
  let mut side = side.claim_advance(graph);
  while let Some(edge) = side.next_edge() {
    if edge == start {
      break;
    }
    count += 1;
    if count > max_corners {
      return Err(non_manifold(graph, stage, start, count));
    }
    side = side.claim_advance(graph);
  }

  if side.next_edge() != Some(start) || count < 2 {
    return Err(non_manifold(graph, stage, start, count + 1));
  }

  Ok(())
}

/// Emit the plain cube loop through `side`.
pub fn unit_polygon(
  graph: &mut SegmentGraph,
  side: Side,
  max_corners: usize,
  polygons: &mut Vec<PolygonLoop>,
) -> Result<(), ContourError> {
  let unit = trace_loop(graph, side, max_corners, Stage::SurfaceWalk, |_| {})?;
  for &edge in &unit.corners {
    graph.mark_edge(edge);
  }
  claim_loop(graph, unit.closing, max_corners, Stage::SurfaceWalk)?;
  polygons.push(unit.corners);
  Ok(())
}

/// Walk every segment direction still unconsumed into its own unit polygon.
#[cfg_attr(
  feature = "tracing",
  tracing::instrument(skip_all, name = "contour::surface_walk")
)]
pub fn close_remaining(
  graph: &mut SegmentGraph,
  max_corners: usize,
  polygons: &mut Vec<PolygonLoop>,
) -> Result<(), ContourError> {
  for index in 0..graph.segment_count() {
    for side in Side::seeds(graph, SegmentId(index as u32)) {
      if !graph.is_used(side.seg, side.dir) {
        unit_polygon(graph, side, max_corners, polygons)?;
      }
    }
  }
  Ok(())
}

/// Triangulate one loop of output indices.
///
/// Up to four corners fan from the first; larger loops get a centroid vertex
/// appended to `vertices` and fan around it.
pub fn triangulate(indices: &[u32], vertices: &mut Vec<[f32; 3]>, triangles: &mut Vec<u32>) {
  let n = indices.len();
  if n < 3 {
    return;
  }

  if n <= FAN_CORNERS {
    for k in 1..n - 1 {
      triangles.extend_from_slice(&[indices[0], indices[k], indices[k + 1]]);
    }
    return;
  }

  let sum: Vec3 = indices
    .iter()
    .map(|&i| Vec3::from_array(vertices[i as usize]))
    .sum();
  let center = vertices.len() as u32;
  vertices.push((sum / n as f32).to_array());

  for k in 0..n {
    triangles.extend_from_slice(&[center, indices[k], indices[(k + 1) % n]]);
  }
}

#[cfg(test)]
#[path = "walker_test.rs"]
mod walker_test;
