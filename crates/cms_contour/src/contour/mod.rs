//! Cubical marching squares contouring.
//!
//! # Processing Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        INPUT                                    │
//! │  VolumeGrid: padded columns of octants, ascending by range      │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    STAGE 1: Edge Grid                           │
//! │  Merge-walk neighbouring columns along X and Y, walk runs in Z  │
//! │  Emit one Edge per sign change, vertex offset by half a cell    │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    STAGE 2: Segment Graph                       │
//! │  Contour every unit face: 4-bit config, 1 or 2 segments         │
//! │  Register segments in their endpoint edges' direction slots     │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    STAGE 3: Polygons                            │
//! │  reduce: grow merged polygons across coplanar faces (greedy)    │
//! │  always: walk every remaining direction into a unit loop        │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    STAGE 4: Assembly                            │
//! │  Compact used vertices, fan loops into triangles                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every build owns its edge and segment arenas, so concurrent builds on
//! different volumes share nothing.

pub mod assembler;
pub mod edge_grid;
pub mod greedy;
pub mod segment_graph;
pub mod side;
pub mod walker;

pub use edge_grid::{Crossing, Edge, EdgeGrid, EdgeId};
pub use segment_graph::{DirEdge, Segment, SegmentGraph, SegmentId, SegmentUse};
pub use side::{Frontiers, Side};
pub use walker::PolygonLoop;

use crate::error::ContourError;
use crate::types::{ContourConfig, MeshOutput};
use crate::volume::VolumeGrid;

/// Contour a volume into a closed triangle mesh.
///
/// Empty volumes produce an empty mesh. Any structural inconsistency aborts
/// with the stage and grid location involved.
#[cfg_attr(
  feature = "tracing",
  tracing::instrument(skip_all, name = "contour::generate")
)]
pub fn generate(volume: &VolumeGrid, config: &ContourConfig) -> Result<MeshOutput, ContourError> {
  let grid = EdgeGrid::build(volume);
  let mut graph = SegmentGraph::build(grid)?;
  let mut polygons = Vec::new();

  if config.reduce {
    greedy::reduce(&mut graph, config, &mut polygons)?;
  }
  walker::close_remaining(&mut graph, config.max_loop_corners, &mut polygons)?;

  assembler::assemble(&graph, &polygons)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
