//! Contouring faults.
//!
//! Every structural failure aborts the whole build; there are no partial
//! meshes. Faults name the pipeline stage and the grid location involved.

use std::fmt;

use thiserror::Error;

use crate::types::CellCoord;

/// Pipeline stage a fault was raised in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
  EdgeGrid,
  SegmentGraph,
  SurfaceWalk,
  GreedyReduction,
  Assembly,
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Stage::EdgeGrid => "edge grid",
      Stage::SegmentGraph => "segment graph",
      Stage::SurfaceWalk => "surface walk",
      Stage::GreedyReduction => "greedy reduction",
      Stage::Assembly => "assembly",
    };
    f.write_str(name)
  }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContourError {
  /// A face's vertex-bearing edge count disagrees with its configuration.
  /// Indicates inconsistent octant data.
  #[error(
    "malformed topology at face {cell}: config {config} expects {expected} crossings, found {found}"
  )]
  MalformedTopology {
    /// Face location, `axis` is the face normal
    cell: CellCoord,
    /// 4-bit face configuration
    config: u8,
    /// Crossings the configuration requires
    expected: usize,
    /// Vertex-bearing edges present
    found: usize,
  },

  /// A loop walk hit a missing segment, exceeded its hop bound or closed
  /// with fewer than three corners.
  #[error("non-manifold surface during {stage} at {cell} after {corners} corners")]
  NonManifold {
    stage: Stage,
    /// Edge the walk started from
    cell: CellCoord,
    /// Corners visited before the walk failed
    corners: usize,
  },

  /// Greedy frontier expansion accepted a step but produced no rung.
  #[error("greedy frontier at {cell} produced no connecting rung")]
  FrontierInvariant { cell: CellCoord },

  /// A finished polygon references fewer than three emitted vertices.
  #[error("polygon {polygon} has {vertices} emitted vertices, need at least 3")]
  DegeneratePolygon { polygon: usize, vertices: usize },

  /// Column count does not match the grid dimensions.
  #[error("volume is {length}x{width} but {columns} columns were supplied")]
  GridShape {
    length: usize,
    width: usize,
    columns: usize,
  },

  /// Column ranges are not strictly ascending.
  #[error("column ({x}, {y}) has range {range} after {previous}; ranges must ascend")]
  UnsortedColumn {
    x: usize,
    y: usize,
    previous: i32,
    range: i32,
  },

  /// Sample bucket too close to the ends of `i32` to contour.
  #[error("column ({x}, {y}) has range {range} outside {min}..={max}")]
  RangeOutOfBounds {
    x: usize,
    y: usize,
    range: i32,
    min: i32,
    max: i32,
  },

  /// Column coordinates outside the grid.
  #[error("column ({x}, {y}) is outside the {length}x{width} volume")]
  ColumnOutOfBounds {
    x: usize,
    y: usize,
    length: usize,
    width: usize,
  },
}

impl ContourError {
  /// Stage this fault belongs to.
  pub fn stage(&self) -> Stage {
    match self {
      ContourError::MalformedTopology { .. } => Stage::SegmentGraph,
      ContourError::NonManifold { stage, .. } => *stage,
      ContourError::FrontierInvariant { .. } => Stage::GreedyReduction,
      ContourError::DegeneratePolygon { .. } => Stage::Assembly,
      ContourError::GridShape { .. }
      | ContourError::UnsortedColumn { .. }
      | ContourError::RangeOutOfBounds { .. }
      | ContourError::ColumnOutOfBounds { .. } => Stage::EdgeGrid,
    }
  }
}
