//! cms_contour - Cubical marching squares contouring with greedy face merging
//!
//! This crate turns a sparse column volume (per-(x, y) stacks of quantized
//! samples) into a closed triangle mesh. Every unit cell's quad faces are
//! contoured independently, stitched into closed polygon loops and, when
//! enabled, merged across coplanar neighbouring cells before triangulation.
//!
//! # Features
//!
//! - **Cubical marching squares**: per-face contouring with no marching cubes
//!   lookup tables, so every face crossing is resolved locally
//! - **Greedy reduction**: flat runs of identically configured faces collapse
//!   into a few large polygons
//! - **Watertight output**: every segment direction is consumed by exactly one
//!   polygon; structural inconsistencies abort with a [`ContourError`]
//! - **Batch stage**: [`ContourStage`] contours many volumes in parallel with
//!   cooperative cancellation
//!
//! # Example
//!
//! ```ignore
//! use cms_contour::{contour, ContourConfig, VolumeGrid};
//! use glam::Vec3;
//!
//! // 8x8 flat plateau at height 2
//! let heights = vec![2.0; 64];
//! let volume = VolumeGrid::from_heights(8, 8, Vec3::ONE, &heights)?;
//!
//! let output = contour::generate(&volume, &ContourConfig::default())?;
//! println!("Generated {} vertices, {} triangles",
//!     output.vertices.len(), output.triangle_count());
//! ```

pub mod constants;
pub mod error;
pub mod types;
pub mod volume;

// Re-export commonly used items
pub use constants::{
  COPLANAR_SLOT, MAX_LOOP_CORNERS, MAX_RANGE, MIN_RANGE, TURN_DIRECTION, TURN_SLOT,
};
pub use error::{ContourError, Stage};
pub use types::{
  Axis, CellCoord, ContourConfig, MeshOutput, MinMaxAABB, Octant, RungLimits,
};
pub use volume::VolumeGrid;

// Contouring pipeline
pub mod contour;

// Task queue for batch contouring
pub mod task_queue;
pub use task_queue::{
  CancelToken, ContourCompletion, ContourOutcome, ContourRequest, ContourStage,
};

#[cfg(test)]
pub(crate) mod test_utils;
