//! Boundary edge extraction.
//!
//! Scans neighbouring columns for sign changes and emits one [`Edge`] per
//! change, grouped into three axis grids of per-column edge lists:
//!
//! ```text
//! X grid: merge column (x, y) with (x + 1, y)     range only below -> Enter
//! Y grid: merge column (x, y) with (x, y + 1)     range only above -> Exit
//!                                                  range in both    -> PassThrough
//! Z grid: walk column (x, y) bottom to top, opening an Exit edge under each
//!         run of consecutive ranges and closing it with an Enter edge
//! ```
//!
//! Inputs are already sorted, so each grid is built with a linear merge walk.
//! Every list is ascending by `z`.

use std::cmp::Ordering;

use glam::Vec3;

use crate::constants::FACE_SLOTS;
use crate::types::{Axis, CellCoord, Octant};
use crate::volume::VolumeGrid;

use super::segment_graph::SegmentId;

/// Index into the edge arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub u32);

impl EdgeId {
  #[inline]
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

/// Which side of a grid line is occupied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Crossing {
  /// Lower/near sample occupied, far side empty.
  Enter = 1,
  /// Far sample occupied, lower/near side empty.
  Exit = 2,
  /// Both sides occupied. Structural only, no vertex.
  PassThrough = 3,
}

impl Crossing {
  #[inline]
  pub const fn bits(self) -> u8 {
    self as u8
  }

  #[inline]
  pub const fn has_vertex(self) -> bool {
    matches!(self, Crossing::Enter | Crossing::Exit)
  }
}

/// A boundary vertex (or structural marker) on one grid line.
#[derive(Clone, Debug)]
pub struct Edge {
  /// Cell coordinate along Z.
  pub z: i32,
  /// Index into the raw vertex list. `Some` exactly when the crossing has a
  /// vertex.
  pub vertex: Option<u32>,
  pub crossing: Crossing,
  /// Grid line this edge sits on.
  pub cell: CellCoord,
  /// Segments touching this edge, one per face direction slot.
  pub segments: [Option<SegmentId>; FACE_SLOTS],
  /// Set once a finished polygon emits this vertex.
  pub used: bool,
}

/// Edge arena plus the three axis grids.
#[derive(Clone, Debug)]
pub struct EdgeGrid {
  /// Padded (length, width).
  dims: (usize, usize),
  pub(crate) edges: Vec<Edge>,
  vertices: Vec<Vec3>,
  /// Per-axis edge lists, index `px * width + py`.
  pub(crate) columns: [Vec<Vec<EdgeId>>; 3],
}

impl EdgeGrid {
  /// Scan a volume into edges. Infallible: any sorted column layout yields
  /// consistent edges.
  #[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip_all, name = "contour::edge_grid")
  )]
  pub fn build(volume: &VolumeGrid) -> Self {
    let (length, width) = volume.padded_dims();
    let delta = volume.delta();
    let cells = length * width;

    let mut grid = Self {
      dims: (length, width),
      edges: Vec::with_capacity(volume.sample_count() * 4),
      vertices: Vec::with_capacity(volume.sample_count() * 4),
      columns: [vec![Vec::new(); cells], vec![Vec::new(); cells], vec![Vec::new(); cells]],
    };

    for px in 0..length - 1 {
      for py in 0..width - 1 {
        let here = volume.padded_column(px, py);
        let slot = px * width + py;

        let xs = grid.merge_columns(
          Axis::X,
          (px, py),
          here,
          volume.padded_column(px + 1, py),
          Vec3::new(delta.x, 0.0, 0.0),
        );
        let ys = grid.merge_columns(
          Axis::Y,
          (px, py),
          here,
          volume.padded_column(px, py + 1),
          Vec3::new(0.0, delta.y, 0.0),
        );
        let zs = grid.walk_column((px, py), here, delta.z);

        grid.columns[Axis::X.index()][slot] = xs;
        grid.columns[Axis::Y.index()][slot] = ys;
        grid.columns[Axis::Z.index()][slot] = zs;
      }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(
      edges = grid.edges.len(),
      vertices = grid.vertices.len(),
      "edge grid built"
    );

    grid
  }

  /// Symmetric-difference walk over two ascending columns.
  fn merge_columns(
    &mut self,
    axis: Axis,
    column: (usize, usize),
    lower: &[Octant],
    upper: &[Octant],
    offset: Vec3,
  ) -> Vec<EdgeId> {
    let mut ids = Vec::with_capacity(lower.len().max(upper.len()));
    let (mut i, mut j) = (0, 0);

    loop {
      let (near, far) = (lower.get(i), upper.get(j));
      let order = match (near, far) {
        (None, None) => break,
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (Some(a), Some(b)) => a.range.cmp(&b.range),
      };

      let id = match (order, near, far) {
        (Ordering::Less, Some(a), _) => {
          i += 1;
          self.push_edge(axis, column, a.range, Crossing::Enter, Some(a.position + offset))
        }
        (Ordering::Greater, _, Some(b)) => {
          j += 1;
          self.push_edge(axis, column, b.range, Crossing::Exit, Some(b.position - offset))
        }
        (_, Some(a), _) => {
          i += 1;
          j += 1;
          self.push_edge(axis, column, a.range, Crossing::PassThrough, None)
        }
        (_, None, _) => break,
      };
      ids.push(id);
    }

    ids
  }

  /// Open/close edges along one column's runs of consecutive ranges.
  fn walk_column(&mut self, column: (usize, usize), octants: &[Octant], delta_z: f32) -> Vec<EdgeId> {
    let offset = Vec3::new(0.0, 0.0, delta_z);
    let mut ids = Vec::with_capacity(octants.len() + 1);

    for (n, octant) in octants.iter().enumerate() {
      let range = octant.range;

      let opens = n == 0 || octants[n - 1].range != range - 1;
      if opens {
        let position = octant.position - offset;
        ids.push(self.push_edge(Axis::Z, column, range - 1, Crossing::Exit, Some(position)));
      }

      let closes = octants.get(n + 1).map_or(true, |next| next.range != range + 1);
      let id = if closes {
        let position = octant.position + offset;
        self.push_edge(Axis::Z, column, range, Crossing::Enter, Some(position))
      } else {
        self.push_edge(Axis::Z, column, range, Crossing::PassThrough, None)
      };
      ids.push(id);
    }

    ids
  }

  fn push_edge(
    &mut self,
    axis: Axis,
    (px, py): (usize, usize),
    z: i32,
    crossing: Crossing,
    position: Option<Vec3>,
  ) -> EdgeId {
    let vertex = position.map(|p| {
      self.vertices.push(p);
      (self.vertices.len() - 1) as u32
    });

    let id = EdgeId(self.edges.len() as u32);
    self.edges.push(Edge {
      z,
      vertex,
      crossing,
      cell: CellCoord::new(axis, px as i32 - 1, py as i32 - 1, z),
      segments: [None; FACE_SLOTS],
      used: false,
    });
    id
  }

  /// Padded (length, width).
  pub fn dims(&self) -> (usize, usize) {
    self.dims
  }

  /// Edge list for one axis grid in padded coordinates.
  #[inline]
  pub fn column(&self, axis: Axis, px: usize, py: usize) -> &[EdgeId] {
    &self.columns[axis.index()][px * self.dims.1 + py]
  }

  #[inline]
  pub fn edge(&self, id: EdgeId) -> &Edge {
    &self.edges[id.index()]
  }

  pub fn edges(&self) -> &[Edge] {
    &self.edges
  }

  /// Raw vertex list in edge-creation order.
  pub fn vertices(&self) -> &[Vec3] {
    &self.vertices
  }

  /// Position of an edge's vertex, if it has one.
  pub fn position(&self, id: EdgeId) -> Option<Vec3> {
    self.edge(id).vertex.map(|v| self.vertices[v as usize])
  }
}

#[cfg(test)]
#[path = "edge_grid_test.rs"]
mod edge_grid_test;
