//! Per-face segment construction.
//!
//! Every unit face between grid lines is contoured on its own. The face's four
//! sides are looked up by a monotone cursor over each column's edge list, the
//! two opposite sides' crossings form a 4-bit configuration, and the
//! vertex-bearing sides are paired into one segment (or two for saddles).
//! Each segment registers itself in both endpoint edges' direction slots, so
//! a walk can hop from edge to edge without any spatial lookup.
//!
//! ```text
//!   X faces (plane x = const)   Y faces (plane y = const)   Z faces (plane z = const)
//!   slot 0: y edge at z + 1     slot 0: z edge, far column  slot 0: x edge, far column
//!   slot 1: z edge, far column  slot 1: x edge at z + 1     slot 1: y edge, far column
//!   slot 2: y edge at z         slot 2: z edge, near column slot 2: x edge, near column
//!   slot 3: z edge, near column slot 3: x edge at z         slot 3: y edge, near column
//! ```

use smallvec::SmallVec;

use crate::constants::{expected_crossings, EMPTY_FACE, FULL_FACE, SADDLE_SWAP_FACE};
use crate::error::ContourError;
use crate::types::{Axis, CellCoord};

use super::edge_grid::{Edge, EdgeGrid, EdgeId};

/// Index into the segment arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(pub u32);

impl SegmentId {
  #[inline]
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

/// An edge seen from one face, tagged with the side slot it occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DirEdge {
  pub edge: EdgeId,
  pub slot: u8,
}

impl DirEdge {
  #[inline]
  pub fn new(edge: EdgeId, slot: u8) -> Self {
    Self { edge, slot }
  }
}

/// Which walk directions have consumed a segment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SegmentUse {
  #[default]
  Unused,
  UsedDir0,
  UsedDir1,
  UsedBoth,
}

impl SegmentUse {
  #[inline]
  pub fn is_used(self, dir: u8) -> bool {
    match self {
      SegmentUse::Unused => false,
      SegmentUse::UsedDir0 => dir == 0,
      SegmentUse::UsedDir1 => dir == 1,
      SegmentUse::UsedBoth => true,
    }
  }

  /// State after consuming `dir`.
  #[inline]
  pub fn with(self, dir: u8) -> SegmentUse {
    match (self, dir) {
      (SegmentUse::Unused, 0) => SegmentUse::UsedDir0,
      (SegmentUse::Unused, _) => SegmentUse::UsedDir1,
      (SegmentUse::UsedDir0, 0) | (SegmentUse::UsedDir1, 1) => self,
      _ => SegmentUse::UsedBoth,
    }
  }
}

/// Contour of one quad face between two of its sides.
#[derive(Clone, Debug)]
pub struct Segment {
  pub start: DirEdge,
  pub end: DirEdge,
  /// Endpoints sit on adjacent sides, cutting a face corner.
  pub diagonal: bool,
  /// Sum of both endpoint crossing codes.
  pub comp: u8,
  pub usage: SegmentUse,
}

impl Segment {
  /// Endpoint across the segment from `edge`.
  #[inline]
  pub fn opposite(&self, edge: EdgeId) -> Option<DirEdge> {
    if self.start.edge == edge {
      Some(self.end)
    } else if self.end.edge == edge {
      Some(self.start)
    } else {
      None
    }
  }

  /// Same face shape: both flags that gate greedy merging agree.
  #[inline]
  pub fn matches(&self, other: &Segment) -> bool {
    self.diagonal == other.diagonal && self.comp == other.comp
  }
}

/// Edges and segments of one build, referencing each other by index.
#[derive(Clone, Debug)]
pub struct SegmentGraph {
  grid: EdgeGrid,
  segments: Vec<Segment>,
}

impl SegmentGraph {
  /// Contour every face of the grid.
  #[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip_all, name = "contour::segment_graph")
  )]
  pub fn build(mut grid: EdgeGrid) -> Result<Self, ContourError> {
    let (length, width) = grid.dims();
    let mut segments = Vec::with_capacity(grid.edges.len());

    let EdgeGrid { edges, columns, .. } = &mut grid;
    let [xs, ys, zs] = &*columns;
    let mut faces = FaceBuilder {
      edges: edges.as_mut_slice(),
      segments: &mut segments,
    };

    for px in 0..length - 1 {
      for py in 0..width - 1 {
        let here = px * width + py;
        let along_y = here + 1;
        let along_x = here + width;

        faces.x_faces(px, py, &ys[here], &zs[here], &zs[along_y])?;
        faces.y_faces(px, py, &xs[here], &zs[here], &zs[along_x])?;
        faces.z_faces(px, py, &xs[here], &xs[along_y], &ys[here], &ys[along_x])?;
      }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(segments = segments.len(), "segment graph built");

    Ok(Self { grid, segments })
  }

  pub fn grid(&self) -> &EdgeGrid {
    &self.grid
  }

  #[inline]
  pub fn edge(&self, id: EdgeId) -> &Edge {
    self.grid.edge(id)
  }

  #[inline]
  pub fn segment(&self, id: SegmentId) -> &Segment {
    &self.segments[id.index()]
  }

  pub fn segments(&self) -> &[Segment] {
    &self.segments
  }

  pub fn segment_count(&self) -> usize {
    self.segments.len()
  }

  /// Segment registered in `slot` of `edge`.
  #[inline]
  pub fn slot(&self, edge: EdgeId, slot: u8) -> Option<SegmentId> {
    self.edge(edge).segments[slot as usize]
  }

  #[inline]
  pub fn is_used(&self, id: SegmentId, dir: u8) -> bool {
    self.segment(id).usage.is_used(dir)
  }

  /// Flag an edge's vertex as emitted by a finished polygon.
  #[inline]
  pub fn mark_edge(&mut self, id: EdgeId) {
    self.grid.edges[id.index()].used = true;
  }

  /// Consume `dir` on a segment entered from `from`, returning the endpoint
  /// to continue from. Returns `None` without marking when the direction is
  /// already consumed or `from` is not an endpoint.
  pub fn claim(&mut self, id: SegmentId, dir: u8, from: EdgeId) -> Option<DirEdge> {
    let segment = &mut self.segments[id.index()];
    if segment.usage.is_used(dir) {
      return None;
    }
    let next = segment.opposite(from)?;
    segment.usage = segment.usage.with(dir);
    Some(next)
  }
}

/// Forward-only lookup over one ascending edge list.
struct ColumnCursor<'a> {
  ids: &'a [EdgeId],
  pos: usize,
}

impl<'a> ColumnCursor<'a> {
  fn new(ids: &'a [EdgeId]) -> Self {
    Self { ids, pos: 0 }
  }

  /// Edge at `z`, skipping everything below it. Queries must not decrease.
  fn seek(&mut self, edges: &[Edge], z: i32) -> Option<EdgeId> {
    while let Some(&id) = self.ids.get(self.pos) {
      let at = edges[id.index()].z;
      if at == z {
        return Some(id);
      }
      if at > z {
        return None;
      }
      self.pos += 1;
    }
    None
  }
}

struct FaceBuilder<'a> {
  edges: &'a mut [Edge],
  segments: &'a mut Vec<Segment>,
}

impl FaceBuilder<'_> {
  #[inline]
  fn z_of(&self, id: EdgeId) -> i32 {
    self.edges[id.index()].z
  }

  /// Edge `ids[at]` when it sits exactly at `z`.
  #[inline]
  fn next_at(&self, ids: &[EdgeId], at: usize, z: i32) -> Option<EdgeId> {
    ids.get(at).copied().filter(|&id| self.z_of(id) == z)
  }

  /// Faces in the plane x = px spanned by the y edges of one column.
  fn x_faces(
    &mut self,
    px: usize,
    py: usize,
    ys: &[EdgeId],
    near: &[EdgeId],
    far: &[EdgeId],
  ) -> Result<(), ContourError> {
    let mut far_z = ColumnCursor::new(far);
    let mut near_z = ColumnCursor::new(near);
    let mut last = None;

    for (k, &edge) in ys.iter().enumerate() {
      let z = self.z_of(edge);
      if last != Some(z - 1) {
        let sides = [
          Some(edge),
          far_z.seek(&self.edges, z - 1),
          None,
          near_z.seek(&self.edges, z - 1),
        ];
        self.add_face(face_cell(Axis::X, px, py, z - 1), sides)?;
      }

      let sides = [
        self.next_at(ys, k + 1, z + 1),
        far_z.seek(&self.edges, z),
        Some(edge),
        near_z.seek(&self.edges, z),
      ];
      self.add_face(face_cell(Axis::X, px, py, z), sides)?;
      last = Some(z);
    }

    Ok(())
  }

  /// Faces in the plane y = py spanned by the x edges of one column.
  fn y_faces(
    &mut self,
    px: usize,
    py: usize,
    xs: &[EdgeId],
    near: &[EdgeId],
    far: &[EdgeId],
  ) -> Result<(), ContourError> {
    let mut far_z = ColumnCursor::new(far);
    let mut near_z = ColumnCursor::new(near);
    let mut last = None;

    for (k, &edge) in xs.iter().enumerate() {
      let z = self.z_of(edge);
      if last != Some(z - 1) {
        let sides = [
          far_z.seek(&self.edges, z - 1),
          Some(edge),
          near_z.seek(&self.edges, z - 1),
          None,
        ];
        self.add_face(face_cell(Axis::Y, px, py, z - 1), sides)?;
      }

      let sides = [
        far_z.seek(&self.edges, z),
        self.next_at(xs, k + 1, z + 1),
        near_z.seek(&self.edges, z),
        Some(edge),
      ];
      self.add_face(face_cell(Axis::Y, px, py, z), sides)?;
      last = Some(z);
    }

    Ok(())
  }

  /// Horizontal faces, one per z where either x edge list has an entry.
  fn z_faces(
    &mut self,
    px: usize,
    py: usize,
    near_x: &[EdgeId],
    far_x: &[EdgeId],
    near_y: &[EdgeId],
    far_y: &[EdgeId],
  ) -> Result<(), ContourError> {
    let mut far_y = ColumnCursor::new(far_y);
    let mut near_y = ColumnCursor::new(near_y);
    let (mut i, mut j) = (0, 0);

    loop {
      let mut near = near_x.get(i).copied();
      let mut far = far_x.get(j).copied();
      let near_z = near.map_or(i32::MAX, |id| self.z_of(id));
      let far_z = far.map_or(i32::MAX, |id| self.z_of(id));
      if near.is_none() && far.is_none() {
        break;
      }

      let z = if near_z < far_z {
        i += 1;
        far = None;
        near_z
      } else if near_z > far_z {
        j += 1;
        near = None;
        far_z
      } else {
        i += 1;
        j += 1;
        near_z
      };

      let sides = [far, far_y.seek(&self.edges, z), near, near_y.seek(&self.edges, z)];
      self.add_face(face_cell(Axis::Z, px, py, z), sides)?;
    }

    Ok(())
  }

  /// Pair a face's crossings into segments.
  fn add_face(
    &mut self,
    cell: CellCoord,
    sides: [Option<EdgeId>; 4],
  ) -> Result<(), ContourError> {
    let bits = |side: Option<EdgeId>| side.map_or(0, |id| self.edges[id.index()].crossing.bits());
    let lead = bits(sides[0]);
    let config = lead + 4 * bits(sides[2]);
    if config == EMPTY_FACE || config == FULL_FACE {
      return Ok(());
    }

    let mut crossings: SmallVec<[DirEdge; 4]> = sides
      .iter()
      .enumerate()
      .filter_map(|(slot, side)| {
        let id = (*side)?;
        self.edges[id.index()].vertex.map(|_| DirEdge::new(id, slot as u8))
      })
      .collect();

    let expected = expected_crossings(config);
    if crossings.len() != expected {
      return Err(ContourError::MalformedTopology {
        cell,
        config,
        expected,
        found: crossings.len(),
      });
    }

    if config == SADDLE_SWAP_FACE {
      crossings.swap(0, 2);
    }

    // Winding follows the leading side's occupancy.
    let reversed = matches!(lead, 0 | 2);
    for pair in crossings.chunks_exact(2) {
      let (start, end) = if reversed { (pair[1], pair[0]) } else { (pair[0], pair[1]) };
      self.push_segment(start, end);
    }

    Ok(())
  }

  fn push_segment(&mut self, start: DirEdge, end: DirEdge) {
    let comp = self.edges[start.edge.index()].crossing.bits()
      + self.edges[end.edge.index()].crossing.bits();
    let id = SegmentId(self.segments.len() as u32);

    self.segments.push(Segment {
      start,
      end,
      diagonal: (start.slot + end.slot) % 2 == 1,
      comp,
      usage: SegmentUse::Unused,
    });
    self.edges[start.edge.index()].segments[start.slot as usize] = Some(id);
    self.edges[end.edge.index()].segments[end.slot as usize] = Some(id);
  }
}

fn face_cell(axis: Axis, px: usize, py: usize, z: i32) -> CellCoord {
  CellCoord::new(axis, px as i32 - 1, py as i32 - 1, z)
}

#[cfg(test)]
#[path = "segment_graph_test.rs"]
mod segment_graph_test;
