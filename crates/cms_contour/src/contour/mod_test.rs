use super::*;
use crate::test_utils::{
  assert_closed, block, corner_grid, diagonal_staircase, plateau, random_volume, single_sample,
  sine_terrain, solid_staircase, stacked, staircase,
};
use crate::types::MinMaxAABB;
use glam::Vec3;

fn both_modes(volume: &VolumeGrid) -> (MeshOutput, MeshOutput) {
  let unit = generate(volume, &ContourConfig::unit()).unwrap();
  let greedy = generate(volume, &ContourConfig::default()).unwrap();
  (unit, greedy)
}

fn counts(output: &MeshOutput) -> (usize, usize, usize) {
  (output.vertices.len(), output.triangle_count(), output.polygon_count)
}

#[test]
fn test_empty_volume_yields_empty_mesh() {
  for (length, width) in [(0, 0), (1, 1), (5, 3)] {
    let volume = VolumeGrid::new(length, width, Vec3::ONE);
    let (unit, greedy) = both_modes(&volume);
    assert!(unit.is_empty() && greedy.is_empty());
    assert!(unit.indices.is_empty() && greedy.indices.is_empty());
  }
}

#[test]
fn test_single_sample_is_octahedron() {
  let (unit, greedy) = both_modes(&single_sample());
  assert_eq!(counts(&unit), (6, 8, 8));
  assert_eq!(counts(&greedy), (6, 8, 8));
  assert_closed(&unit, "unit");
  assert_closed(&greedy, "greedy");
}

#[test]
fn test_extreme_heights_stay_octahedra() {
  for height in [1e12, -1e12, f32::MAX, f32::MIN] {
    let volume = VolumeGrid::from_heights(1, 1, Vec3::ONE, &[height]).unwrap();
    let (unit, greedy) = both_modes(&volume);
    assert_eq!(counts(&unit), (6, 8, 8), "height {}", height);
    assert_eq!(counts(&greedy), (6, 8, 8), "height {}", height);
    assert_closed(&unit, "unit");
  }

  for range in [crate::MAX_RANGE, crate::MIN_RANGE] {
    let mut volume = VolumeGrid::new(2, 1, Vec3::ONE);
    volume.fill(0, 0, range).unwrap();
    volume.fill(1, 0, range).unwrap();
    let (unit, _) = both_modes(&volume);
    assert_eq!(counts(&unit), counts(&both_modes(&plateau_row()).0), "range {}", range);
    assert_closed(&unit, "unit");
  }
}

fn plateau_row() -> VolumeGrid {
  stacked(2, 1, |_, _| vec![0])
}

#[test]
fn test_all_corner_configurations() {
  for mask in 0..=255u8 {
    let volume = corner_grid(mask);
    for config in [ContourConfig::unit(), ContourConfig::default()] {
      let output = generate(&volume, &config)
        .unwrap_or_else(|err| panic!("mask {:#010b} reduce={}: {}", mask, config.reduce, err));

      let label = format!("mask {:#010b} reduce={}", mask, config.reduce);
      assert_closed(&output, &label);
      if mask == 0 {
        assert!(output.is_empty());
      } else {
        assert!(output.polygon_count > 0, "{}: no polygons", label);
        assert!(output.triangle_count() > 0, "{}: no triangles", label);
      }
    }
  }
}

#[test]
fn test_plateau_counts() {
  let expected = [
    // n, unit (v, t, p), greedy (v, t, p)
    (2, (16, 28, 18), (16, 28, 18)),
    (3, (30, 56, 32), (16, 28, 18)),
    (4, (48, 92, 50), (16, 28, 18)),
    (8, (160, 316, 162), (44, 84, 28)),
    (16, (576, 1148, 578), (74, 144, 46)),
  ];

  for (n, unit_counts, greedy_counts) in expected {
    let (unit, greedy) = both_modes(&plateau(n));
    assert_eq!(counts(&unit), unit_counts, "unit plateau {}", n);
    assert_eq!(counts(&greedy), greedy_counts, "greedy plateau {}", n);
    assert_closed(&greedy, "greedy plateau");
  }
}

#[test]
fn test_plateau_reduction_does_not_scale_with_area() {
  let (unit, greedy) = both_modes(&plateau(32));
  assert_eq!(unit.triangle_count(), 4348);
  assert!(greedy.triangle_count() * 10 < unit.triangle_count());
  assert!(greedy.polygon_count * 10 < unit.polygon_count);
  assert_closed(&greedy, "greedy plateau 32");
}

#[test]
fn test_fixture_counts() {
  let cases = [
    ("column", stacked(1, 1, |_, _| vec![0, 1, 2]), (14, 24, 16), (10, 16, 12)),
    ("block", block(8, 3), (224, 444, 226), (52, 100, 36)),
    ("staircase", staircase(8), (286, 568, 274), (163, 322, 96)),
    ("diagonal", diagonal_staircase(8), (510, 1016, 386), (510, 1016, 386)),
    ("solid stairs", solid_staircase(6), (321, 638, 278), (239, 474, 159)),
    (
      "islands",
      stacked(3, 1, |x, _| if x == 1 { vec![] } else { vec![0] }),
      (12, 16, 16),
      (12, 16, 16),
    ),
  ];

  for (label, volume, unit_counts, greedy_counts) in cases {
    let (unit, greedy) = both_modes(&volume);
    assert_eq!(counts(&unit), unit_counts, "unit {}", label);
    assert_eq!(counts(&greedy), greedy_counts, "greedy {}", label);
    assert_closed(&unit, label);
    assert_closed(&greedy, label);
  }
}

#[test]
fn test_greedy_never_adds_triangles_on_structured_terrain() {
  let volumes = [
    plateau(12),
    block(10, 4),
    staircase(10),
    diagonal_staircase(10),
    solid_staircase(8),
    sine_terrain(16, Vec3::ONE),
    sine_terrain(16, Vec3::new(2.0, 2.0, 0.5)),
  ];

  for volume in &volumes {
    let (unit, greedy) = both_modes(volume);
    assert!(greedy.triangle_count() <= unit.triangle_count());
    assert!(greedy.polygon_count <= unit.polygon_count);
    assert_closed(&greedy, "greedy terrain");
  }
}

#[test]
fn test_bounds_match_on_grid_aligned_volumes() {
  let mut volumes = vec![plateau(5), block(4, 3), staircase(6), solid_staircase(5)];
  volumes.extend((0..40).map(random_volume));

  for volume in &volumes {
    let (unit, greedy) = both_modes(volume);
    assert_eq!(unit.bounds, greedy.bounds);
  }
}

#[test]
fn test_height_map_bounds_stay_inside_unit_bounds() {
  let scale = Vec3::new(2.0, 2.0, 0.5);
  let (unit, greedy) = both_modes(&sine_terrain(16, scale));

  for axis in 0..2 {
    assert_eq!(unit.bounds.min[axis], greedy.bounds.min[axis]);
    assert_eq!(unit.bounds.max[axis], greedy.bounds.max[axis]);
  }
  assert!(greedy.bounds.min[2] >= unit.bounds.min[2]);
  assert!(greedy.bounds.max[2] <= unit.bounds.max[2]);
  assert!(greedy.bounds.max[2] - greedy.bounds.min[2] > unit.bounds.max[2] - unit.bounds.min[2] - scale.z);
}

#[test]
fn test_scaled_height_map() {
  let volume = VolumeGrid::from_heights(8, 8, Vec3::splat(0.5), &[2.0; 64]).unwrap();
  let (unit, greedy) = both_modes(&volume);

  let expected = MinMaxAABB::new([-0.25, -0.25, 1.75], [3.75, 3.75, 2.25]);
  assert_eq!(unit.bounds, expected);
  assert_eq!(greedy.bounds, expected);
  assert_eq!(counts(&greedy), (44, 84, 28));
}

#[test]
fn test_random_volumes_are_closed() {
  for seed in 0..200 {
    let volume = random_volume(seed);
    let (unit, greedy) = both_modes(&volume);
    assert_closed(&unit, &format!("unit seed {}", seed));
    assert_closed(&greedy, &format!("greedy seed {}", seed));
  }
}

#[test]
fn test_unit_walk_uses_every_vertex() {
  for seed in 0..20 {
    let volume = random_volume(seed);
    let unit = generate(&volume, &ContourConfig::unit()).unwrap();

    let mut referenced = vec![false; unit.vertices.len()];
    for &i in &unit.indices {
      referenced[i as usize] = true;
    }
    assert!(referenced.iter().all(|&r| r), "seed {} left a vertex unreferenced", seed);
  }
}

#[test]
fn test_generate_is_deterministic() {
  let volume = sine_terrain(12, Vec3::ONE);
  let config = ContourConfig::default();
  let first = generate(&volume, &config).unwrap();
  let second = generate(&volume, &config).unwrap();
  assert_eq!(first, second);
}

#[test]
fn test_loop_bound_faults_with_location() {
  let config = ContourConfig::unit().with_max_loop_corners(2);
  let err = generate(&single_sample(), &config).unwrap_err();

  match err {
    ContourError::NonManifold { stage, cell, .. } => {
      assert_eq!(stage, crate::Stage::SurfaceWalk);
      assert!(cell.x >= -1 && cell.x <= 1 && cell.y >= -1 && cell.y <= 1);
    }
    other => panic!("unexpected error: {}", other),
  }

  let err = generate(&single_sample(), &ContourConfig::default().with_max_loop_corners(2)).unwrap_err();
  assert_eq!(err.stage(), crate::Stage::GreedyReduction);
}
