//! Shared test fixtures for contouring tests.

use std::collections::HashMap;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{MeshOutput, VolumeGrid};

/// Grid-aligned volume with the ranges `f(x, y)` in each column.
pub fn stacked(length: usize, width: usize, f: impl Fn(usize, usize) -> Vec<i32>) -> VolumeGrid {
  let mut volume = VolumeGrid::new(length, width, Vec3::ONE);
  for x in 0..length {
    for y in 0..width {
      for range in f(x, y) {
        volume.fill(x, y, range).unwrap();
      }
    }
  }
  volume
}

/// One isolated sample.
pub fn single_sample() -> VolumeGrid {
  stacked(1, 1, |_, _| vec![0])
}

/// Flat one-sample-thick N×N slab.
pub fn plateau(n: usize) -> VolumeGrid {
  stacked(n, n, |_, _| vec![0])
}

/// N×N slab `depth` samples thick.
pub fn block(n: usize, depth: i32) -> VolumeGrid {
  stacked(n, n, |_, _| (0..depth).collect())
}

/// Thin steps rising along X.
pub fn staircase(n: usize) -> VolumeGrid {
  stacked(n, n, |x, _| vec![x as i32])
}

/// Thin steps rising along the XY diagonal.
pub fn diagonal_staircase(n: usize) -> VolumeGrid {
  stacked(n, n, |x, y| vec![(x + y) as i32])
}

/// Solid columns rising along the XY diagonal.
pub fn solid_staircase(n: usize) -> VolumeGrid {
  stacked(n, n, |x, y| (0..=(x + y) as i32).collect())
}

/// 2x2 columns, two buckets tall. Bit `c` of `mask` occupies corner
/// `(c & 1, (c >> 1) & 1, (c >> 2) & 1)`.
pub fn corner_grid(mask: u8) -> VolumeGrid {
  stacked(2, 2, |x, y| {
    (0..2)
      .filter(|z| mask >> (x | (y << 1) | ((*z as usize) << 2)) & 1 == 1)
      .collect()
  })
}

/// Smooth height map terrain.
pub fn sine_terrain(n: usize, scale: Vec3) -> VolumeGrid {
  let heights: Vec<f32> = (0..n * n)
    .map(|i| {
      let (x, y) = ((i / n) as f32, (i % n) as f32);
      2.0 + 1.5 * (x * 0.4).sin() * (y * 0.3).cos()
    })
    .collect();
  VolumeGrid::from_heights(n, n, scale, &heights).unwrap()
}

/// Random grid-aligned volume up to 6×6 columns and 5 buckets tall.
pub fn random_volume(seed: u64) -> VolumeGrid {
  let mut rng = StdRng::seed_from_u64(seed);
  let length = rng.random_range(1..=6);
  let width = rng.random_range(1..=6);
  let height = rng.random_range(2..=5);

  let mut volume = VolumeGrid::new(length, width, Vec3::ONE);
  for x in 0..length {
    for y in 0..width {
      for range in 0..height {
        if rng.random_bool(0.5) {
          volume.fill(x, y, range).unwrap();
        }
      }
    }
  }
  volume
}

/// Directed triangle edges that are not matched by exactly one reverse edge.
pub fn open_edge_count(output: &MeshOutput) -> usize {
  let mut directed: HashMap<(u32, u32), usize> = HashMap::new();
  for tri in output.indices.chunks_exact(3) {
    for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
      *directed.entry((a, b)).or_default() += 1;
    }
  }

  directed
    .iter()
    .filter(|&(&(a, b), &count)| count != 1 || directed.get(&(b, a)) != Some(&1))
    .count()
}

/// Index buffer sanity: whole triangles, every index in range.
pub fn assert_valid_indices(output: &MeshOutput) {
  assert_eq!(output.indices.len() % 3, 0);
  let count = output.vertices.len() as u32;
  assert!(
    output.indices.iter().all(|&i| i < count),
    "index out of range for {} vertices",
    count
  );
}

/// Valid indices and a closed 2-manifold surface.
pub fn assert_closed(output: &MeshOutput, label: &str) {
  assert_valid_indices(output);
  assert_eq!(open_edge_count(output), 0, "{}: mesh has open edges", label);
}
