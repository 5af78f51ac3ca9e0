use super::*;
use crate::contour::edge_grid::EdgeGrid;
use crate::test_utils::{plateau, single_sample};
use crate::volume::VolumeGrid;

fn graph_of(volume: &VolumeGrid) -> SegmentGraph {
  SegmentGraph::build(EdgeGrid::build(volume)).unwrap()
}

fn all_seeds(graph: &SegmentGraph) -> Vec<Side> {
  (0..graph.segment_count() as u32)
    .flat_map(|i| Side::seeds(graph, SegmentId(i)))
    .collect()
}

#[test]
fn test_seeds_start_at_both_endpoints() {
  let graph = graph_of(&single_sample());
  let [forward, backward] = Side::seeds(&graph, SegmentId(3));
  let segment = graph.segment(SegmentId(3));

  assert_eq!(forward.next, Some(segment.start));
  assert_eq!(forward.dir, 0);
  assert_eq!(backward.next, Some(segment.end));
  assert_eq!(backward.dir, 1);
  assert_eq!(forward.far_edge(&graph), Some(segment.end));
}

#[test]
fn test_advance_closes_octahedron_triangle() {
  let graph = graph_of(&single_sample());

  for side in all_seeds(&graph) {
    let start = side.next_edge();
    let mut walk = side;
    for _ in 0..3 {
      walk = walk.advance(&graph);
      assert!(walk.next.is_some());
    }
    assert_eq!(walk.next_edge(), start);
  }
}

#[test]
fn test_advance_is_read_only() {
  let graph = graph_of(&single_sample());
  let side = Side::seeds(&graph, SegmentId(0))[0];
  let _ = side.advance(&graph).advance(&graph);
  assert!(graph
    .segments()
    .iter()
    .all(|s| s.usage == crate::contour::SegmentUse::Unused));
}

#[test]
fn test_claim_advance_consumes_and_blocks_reuse() {
  let mut graph = graph_of(&single_sample());
  let side = Side::seeds(&graph, SegmentId(0))[0];

  let first = side.claim_advance(&mut graph);
  assert!(first.next.is_some());
  assert!(graph.is_used(first.seg, first.dir));

  // Entering the same face in the same direction again finds it consumed.
  let again = side.claim_advance(&mut graph);
  assert_eq!(again.seg, first.seg);
  assert_eq!(again.next, None);
}

#[test]
fn test_isolated_sample_cannot_extend_or_seed() {
  let graph = graph_of(&single_sample());
  for side in all_seeds(&graph) {
    assert!(!side.can_extend(&graph));
    assert_eq!(side.seed_frontiers(&graph), None);

    let (stopped, moved) = side.extend(&graph);
    assert!(!moved);
    assert!(stopped.end_found);
    assert_eq!(stopped.seg, side.seg);
  }
}

#[test]
fn test_extend_moves_onto_matching_coplanar_face() {
  let graph = graph_of(&plateau(3));
  let seeds = all_seeds(&graph);
  let extendable: Vec<Side> = seeds.iter().copied().filter(|s| s.can_extend(&graph)).collect();
  assert_eq!(extendable.len(), 32);

  for side in extendable {
    let (moved, did_move) = side.extend(&graph);
    assert!(did_move);
    assert_eq!(Some(moved.seg), side.coplanar_neighbor(&graph));
    assert_eq!(moved.dir, side.dir);
    assert!(!moved.end_found);
    assert!(graph.segment(moved.seg).matches(graph.segment(side.seg)));

    // A finished frontier stays put.
    let finished = Side {
      end_found: true,
      ..side
    };
    assert_eq!(finished.extend(&graph), (finished, false));
  }
}

#[test]
fn test_seed_frontiers_on_plateau() {
  let graph = graph_of(&plateau(3));
  let found: Vec<Frontiers> = all_seeds(&graph)
    .iter()
    .filter_map(|s| s.seed_frontiers(&graph))
    .collect();

  assert_eq!(found.iter().filter(|f| f.both).count(), 16);
  for frontiers in found {
    assert!(frontiers.left.can_extend(&graph) || frontiers.right.can_extend(&graph));
    assert!(!frontiers.left.end_found && !frontiers.right.end_found);
  }
}
