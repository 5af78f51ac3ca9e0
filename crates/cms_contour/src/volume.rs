//! Column volume input.
//!
//! A volume is a `length x width` array of columns. Each column holds the
//! occupied octants at that (x, y), ascending by `range`. Storage keeps a
//! one-column ring of empty padding around the input so the contouring scan
//! never branches on the grid perimeter:
//!
//! ```text
//!   padded y ─►
//!   ┌───┬───┬───┬───┐
//!   │ ∅ │ ∅ │ ∅ │ ∅ │   ∅ = empty padding column
//!   ├───┼───┼───┼───┤
//!   │ ∅ │0,0│0,1│ ∅ │   input (x, y) lives at padded (x + 1, y + 1)
//!   ├───┼───┼───┼───┤
//!   │ ∅ │1,0│1,1│ ∅ │
//!   ├───┼───┼───┼───┤
//!   │ ∅ │ ∅ │ ∅ │ ∅ │
//!   └───┴───┴───┴───┘
//! ```

use glam::Vec3;

use crate::constants::{MAX_RANGE, MIN_RANGE};
use crate::error::ContourError;
use crate::types::Octant;

/// Immutable-during-contouring column grid.
#[derive(Clone, Debug, PartialEq)]
pub struct VolumeGrid {
  length: usize,
  width: usize,
  scale: Vec3,
  /// Padded columns, index `px * (width + 2) + py`.
  columns: Vec<Vec<Octant>>,
}

impl VolumeGrid {
  /// Empty volume. Non-positive or non-finite scale components fall back
  /// to 1.
  pub fn new(length: usize, width: usize, scale: Vec3) -> Self {
    Self {
      length,
      width,
      scale: sanitize_scale(scale),
      columns: vec![Vec::new(); (length + 2) * (width + 2)],
    }
  }

  /// Build from `length * width` columns indexed `x * width + y`.
  ///
  /// Ranges must not descend within a column and must lie in
  /// `MIN_RANGE..=MAX_RANGE`. Runs of equal ranges collapse into one octant
  /// at their mean position.
  pub fn from_columns(
    length: usize,
    width: usize,
    scale: Vec3,
    columns: Vec<Vec<Octant>>,
  ) -> Result<Self, ContourError> {
    if columns.len() != length * width {
      return Err(ContourError::GridShape {
        length,
        width,
        columns: columns.len(),
      });
    }

    let mut volume = Self::new(length, width, scale);
    for (index, column) in columns.into_iter().enumerate() {
      let (x, y) = (index / width, index % width);
      let merged = merge_duplicates(x, y, column)?;
      let slot = volume.padded_index(x + 1, y + 1);
      volume.columns[slot] = merged;
    }

    Ok(volume)
  }

  /// Height map volume: one sample per column at `(x * sx, y * sy, h)` with
  /// range `quantize(h)`. Heights are indexed `x * width + y`; non-finite
  /// heights leave the column empty.
  pub fn from_heights(
    length: usize,
    width: usize,
    scale: Vec3,
    heights: &[f32],
  ) -> Result<Self, ContourError> {
    if heights.len() != length * width {
      return Err(ContourError::GridShape {
        length,
        width,
        columns: heights.len(),
      });
    }

    let mut volume = Self::new(length, width, scale);
    for (index, &height) in heights.iter().enumerate() {
      if !height.is_finite() {
        continue;
      }
      let (x, y) = (index / width, index % width);
      let position = Vec3::new(
        x as f32 * volume.scale.x,
        y as f32 * volume.scale.y,
        height,
      );
      let octant = Octant::new(position, volume.quantize(height));
      let slot = volume.padded_index(x + 1, y + 1);
      volume.columns[slot].push(octant);
    }

    Ok(volume)
  }

  /// Insert a grid-aligned octant at `(x * sx, y * sy, range * sz)`. A range
  /// already present in the column is left untouched.
  pub fn fill(&mut self, x: usize, y: usize, range: i32) -> Result<(), ContourError> {
    if x >= self.length || y >= self.width {
      return Err(ContourError::ColumnOutOfBounds {
        x,
        y,
        length: self.length,
        width: self.width,
      });
    }

    check_range(x, y, range)?;

    let position = Vec3::new(x as f32, y as f32, range as f32) * self.scale;
    let slot = self.padded_index(x + 1, y + 1);
    let column = &mut self.columns[slot];
    if let Err(at) = column.binary_search_by_key(&range, |o| o.range) {
      column.insert(at, Octant::new(position, range));
    }

    Ok(())
  }

  /// Bucket index for a world-space height, clamped to
  /// `MIN_RANGE..=MAX_RANGE`.
  #[inline]
  pub fn quantize(&self, z: f32) -> i32 {
    ((z / self.scale.z).floor() as i32).clamp(MIN_RANGE, MAX_RANGE)
  }

  pub fn length(&self) -> usize {
    self.length
  }

  pub fn width(&self) -> usize {
    self.width
  }

  /// World size of one cell along each axis.
  pub fn scale(&self) -> Vec3 {
    self.scale
  }

  /// Offset from a sample to the boundary vertex it emits (half a cell).
  pub fn delta(&self) -> Vec3 {
    self.scale * 0.5
  }

  /// Padded dimensions (`length + 2`, `width + 2`).
  pub fn padded_dims(&self) -> (usize, usize) {
    (self.length + 2, self.width + 2)
  }

  /// Column in padded coordinates. Out-of-range coordinates read as empty.
  #[inline]
  pub fn padded_column(&self, px: usize, py: usize) -> &[Octant] {
    if px >= self.length + 2 || py >= self.width + 2 {
      return &[];
    }
    &self.columns[self.padded_index(px, py)]
  }

  /// Column in input coordinates.
  pub fn column(&self, x: usize, y: usize) -> Option<&[Octant]> {
    (x < self.length && y < self.width).then(|| self.padded_column(x + 1, y + 1))
  }

  /// Total octants across all columns.
  pub fn sample_count(&self) -> usize {
    self.columns.iter().map(Vec::len).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.columns.iter().all(Vec::is_empty)
  }

  #[inline]
  fn padded_index(&self, px: usize, py: usize) -> usize {
    px * (self.width + 2) + py
  }
}

fn sanitize_scale(scale: Vec3) -> Vec3 {
  let fix = |c: f32| if c.is_finite() && c > 0.0 { c } else { 1.0 };
  Vec3::new(fix(scale.x), fix(scale.y), fix(scale.z))
}

fn check_range(x: usize, y: usize, range: i32) -> Result<(), ContourError> {
  if (MIN_RANGE..=MAX_RANGE).contains(&range) {
    Ok(())
  } else {
    Err(ContourError::RangeOutOfBounds {
      x,
      y,
      range,
      min: MIN_RANGE,
      max: MAX_RANGE,
    })
  }
}

/// Collapse equal-range runs into their mean position.
fn merge_duplicates(
  x: usize,
  y: usize,
  column: Vec<Octant>,
) -> Result<Vec<Octant>, ContourError> {
  let mut merged: Vec<Octant> = Vec::with_capacity(column.len());
  let mut run = 0u32;
  let mut sum = Vec3::ZERO;

  for octant in column {
    check_range(x, y, octant.range)?;
    match merged.last_mut() {
      Some(last) if last.range == octant.range => {
        run += 1;
        sum += octant.position;
        last.position = sum / run as f32;
      }
      Some(last) if last.range > octant.range => {
        return Err(ContourError::UnsortedColumn {
          x,
          y,
          previous: last.range,
          range: octant.range,
        });
      }
      _ => {
        run = 1;
        sum = octant.position;
        merged.push(octant);
      }
    }
  }

  Ok(merged)
}

#[cfg(test)]
#[path = "volume_test.rs"]
mod volume_test;
