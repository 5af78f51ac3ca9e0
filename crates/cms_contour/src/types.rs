//! Core data types for column-volume contouring.

use std::fmt;

use glam::Vec3;

/// A quantized field sample in one grid column.
///
/// `range` is the bucket index along the sweep (Z) axis. Within a column,
/// octants are strictly ascending and unique by `range`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Octant {
  /// Sample position in world units.
  pub position: Vec3,

  /// Quantized bucket index along Z.
  pub range: i32,
}

impl Octant {
  pub fn new(position: Vec3, range: i32) -> Self {
    Self { position, range }
  }
}

/// Grid axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
  X,
  Y,
  Z,
}

impl Axis {
  pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

  #[inline]
  pub fn index(self) -> usize {
    self as usize
  }
}

/// Grid location a fault or edge is reported at.
///
/// `x`/`y` are volume column coordinates (the padding ring sits at -1 and
/// `length`/`width`), `z` is the bucket index. `axis` names the grid line for
/// edges and the face normal for faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellCoord {
  pub axis: Axis,
  pub x: i32,
  pub y: i32,
  pub z: i32,
}

impl CellCoord {
  pub fn new(axis: Axis, x: i32, y: i32, z: i32) -> Self {
    Self { axis, x, y, z }
  }
}

impl fmt::Display for CellCoord {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {}, {}) along {:?}", self.x, self.y, self.z, self.axis)
  }
}

/// Axis-aligned bounding box.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMaxAABB {
  pub min: [f32; 3],
  pub max: [f32; 3],
}

impl MinMaxAABB {
  /// Create AABB with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: [f32::INFINITY; 3],
      max: [f32::NEG_INFINITY; 3],
    }
  }

  pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
    Self { min, max }
  }

  /// Expand AABB to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: [f32; 3]) {
    for i in 0..3 {
      self.min[i] = self.min[i].min(point[i]);
      self.max[i] = self.max[i].max(point[i]);
    }
  }

  /// Check if AABB is valid (min <= max on all axes).
  pub fn is_valid(&self) -> bool {
    (0..3).all(|i| self.min[i] <= self.max[i])
  }
}

impl Default for MinMaxAABB {
  fn default() -> Self {
    Self::empty()
  }
}

/// Contouring result: flat positions plus triangle index triples, both in
/// construction order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshOutput {
  /// Vertex positions. Greedy centroids are appended after edge vertices.
  pub vertices: Vec<[f32; 3]>,

  /// Triangle indices (3 indices per triangle).
  pub indices: Vec<u32>,

  /// Number of polygon loops that were triangulated.
  pub polygon_count: usize,

  /// Bounding box encompassing all vertices.
  pub bounds: MinMaxAABB,
}

impl MeshOutput {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns true if no geometry was generated.
  pub fn is_empty(&self) -> bool {
    self.vertices.is_empty()
  }

  /// Number of triangles in the mesh.
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }
}

/// Direction-change bounds used when the greedy reducer connects its two
/// frontiers with a rung.
///
/// Defaults are validated against every 2x2x2 corner configuration and
/// plateau, staircase and block fixtures. Other values keep the mesh closed
/// (merges that cannot be connected are rejected) but are otherwise untested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RungLimits {
  /// Turns allowed when both frontier faces share the same `comp` code.
  pub coplanar_turns: u32,

  /// Turns allowed when the frontier faces differ in `comp`.
  pub mixed_turns: u32,

  /// Straight steps a rung takes before its first turn when both frontiers
  /// agree on `diagonal`.
  pub straight_run: usize,
}

impl Default for RungLimits {
  fn default() -> Self {
    Self {
      coplanar_turns: 2,
      mixed_turns: 1,
      straight_run: 2,
    }
  }
}

impl RungLimits {
  #[inline]
  pub fn turns(&self, same_comp: bool) -> u32 {
    if same_comp {
      self.coplanar_turns
    } else {
      self.mixed_turns
    }
  }
}

/// Configuration for contouring.
#[derive(Clone, Debug, PartialEq)]
pub struct ContourConfig {
  /// Merge coplanar faces into larger polygons before triangulating.
  pub reduce: bool,

  /// Frontier rung bounds for greedy reduction.
  pub rung_limits: RungLimits,

  /// Maximum corners a unit loop walk may visit before it is declared
  /// non-manifold.
  pub max_loop_corners: usize,
}

impl Default for ContourConfig {
  fn default() -> Self {
    Self {
      reduce: true,
      rung_limits: RungLimits::default(),
      max_loop_corners: crate::constants::MAX_LOOP_CORNERS,
    }
  }
}

impl ContourConfig {
  pub fn new() -> Self {
    Self::default()
  }

  /// Per-cell walking only, one polygon per unit loop.
  pub fn unit() -> Self {
    Self::default().with_reduce(false)
  }

  pub fn with_reduce(mut self, reduce: bool) -> Self {
    self.reduce = reduce;
    self
  }

  pub fn with_rung_limits(mut self, limits: RungLimits) -> Self {
    self.rung_limits = limits;
    self
  }

  pub fn with_max_loop_corners(mut self, corners: usize) -> Self {
    self.max_loop_corners = corners;
    self
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
