//! Greedy coplanar face merging.
//!
//! Each unconsumed seed walks its unit loop as usual while probing its
//! corners for two divergent frontiers that can still grow in their plane.
//! The frontiers then grow in lockstep, one face per step, and every step is
//! closed off by a rung: a short walk from the shorter frontier's tip to the
//! longer one's, bounded by [`RungLimits`].
//!
//! ```text
//!   anchor ── left frontier ──►
//!     │   ┌───┬───┬───┬───┐
//!     │   │   │   │   │   │    rung
//!     │   ├───┼───┼───┼───┤     │
//!     │   │   │   │   │   │ ◄───┘
//!     ▼   └───┴───┴───┴───┘
//!   right frontier ──►
//! ```
//!
//! The merged outline is the anchor, the left frontier, the final rung and
//! the right frontier reversed. Before anything is consumed, every unit loop
//! the merge would swallow is traced; a merge that would absorb a non-planar
//! cell (more than four corners) is rejected and its seed falls back to unit
//! loops.

use smallvec::SmallVec;

use crate::constants::MAX_MERGE_CORNERS;
use crate::error::{ContourError, Stage};
use crate::types::{ContourConfig, RungLimits};

use super::edge_grid::EdgeId;
use super::segment_graph::{SegmentGraph, SegmentId};
use super::side::{Frontiers, Side};
use super::walker::{claim_loop, trace_loop, PolygonLoop};

/// Edges along one rung between the frontiers.
#[derive(Debug, Default)]
struct Rung {
  /// Every edge crossed between the two frontier tips.
  path: SmallVec<[EdgeId; 8]>,
  /// Tips plus the edges where the rung turned.
  corners: SmallVec<[EdgeId; 8]>,
}

/// Frontier state parked for the alternating saddle rungs.
#[derive(Clone, Copy)]
struct Parked {
  left: Side,
  right: Side,
  left_count: usize,
  right_count: usize,
}

/// First pass: emit merged polygons for every seed that can grow.
#[cfg_attr(
  feature = "tracing",
  tracing::instrument(skip_all, name = "contour::greedy_reduction")
)]
pub fn reduce(
  graph: &mut SegmentGraph,
  config: &ContourConfig,
  polygons: &mut Vec<PolygonLoop>,
) -> Result<usize, ContourError> {
  let mut merged = 0;

  for index in 0..graph.segment_count() {
    for side in Side::seeds(graph, SegmentId(index as u32)) {
      if !graph.is_used(side.seg, side.dir) && reduced_polygon(graph, side, config, polygons)? {
        merged += 1;
      }
    }
  }

  #[cfg(feature = "tracing")]
  tracing::debug!(merged, "greedy reduction finished");

  Ok(merged)
}

/// Try to grow one merged polygon from `side`. Returns whether one was
/// emitted.
fn reduced_polygon(
  graph: &mut SegmentGraph,
  side: Side,
  config: &ContourConfig,
  polygons: &mut Vec<PolygonLoop>,
) -> Result<bool, ContourError> {
  let mut found: Option<Frontiers> = None;
  let view: &SegmentGraph = graph;
  let seed = trace_loop(
    view,
    side,
    config.max_loop_corners,
    Stage::GreedyReduction,
    |probe| {
      if !found.is_some_and(|f| f.both) {
        found = probe.seed_frontiers(view);
      }
    },
  )?;

  let Some(frontiers) = found else {
    return Ok(false);
  };
  if seed.corners.len() > MAX_MERGE_CORNERS {
    return Ok(false);
  }
  let Some(anchor) = frontiers.left.far_edge(graph) else {
    return Ok(false);
  };

  match expand(graph, frontiers, anchor.edge, config)? {
    Some(outline) => {
      graph.mark_edge(anchor.edge);
      polygons.push(outline);
      Ok(true)
    }
    None => Ok(false),
  }
}

/// Grow both frontiers and build the merged outline. `None` means the merge
/// was rejected and nothing was consumed.
fn expand(
  graph: &mut SegmentGraph,
  frontiers: Frontiers,
  anchor: EdgeId,
  config: &ContourConfig,
) -> Result<Option<PolygonLoop>, ContourError> {
  let limits = &config.rung_limits;
  let Frontiers {
    mut left,
    mut right,
    ..
  } = frontiers;

  // Saddle regions only close a rung every second step.
  let diagonal = graph.segment(left.seg).diagonal && graph.segment(right.seg).diagonal;
  let mut skip = true;
  let mut parked: Option<Parked> = None;
  let mut rung: Option<Rung> = None;
  let mut absorbed: Vec<Side> = Vec::new();
  let mut left_edges: SmallVec<[EdgeId; 16]> = SmallVec::new();
  let mut right_edges: SmallVec<[EdgeId; 16]> = SmallVec::new();
  let mut steps = 0usize;

  while can_expand(graph, left, right, left_edges.len(), right_edges.len(), limits) {
    skip = !skip;
    steps += 1;

    if !left.end_found {
      left_edges.push(tip(graph, left, anchor)?);
    }
    if !right.end_found {
      right_edges.push(tip(graph, right, anchor)?);
    }

    if diagonal && skip {
      if let Some(p) = parked {
        trace_rung(graph, p.left, p.right, p.left_count, p.right_count, anchor, config, &mut absorbed)?;
      }
      parked = Some(Parked {
        left,
        right,
        left_count: left_edges.len(),
        right_count: right_edges.len(),
      });
    } else {
      rung = Some(trace_rung(
        graph,
        left,
        right,
        left_edges.len(),
        right_edges.len(),
        anchor,
        config,
        &mut absorbed,
      )?);
    }

    left = left.extend(graph).0;
    right = right.extend(graph).0;
  }

  if steps == 0 {
    return Ok(None);
  }

  if diagonal && skip {
    if let Some(p) = parked {
      rung = Some(trace_rung(
        graph,
        p.left,
        p.right,
        p.left_count,
        p.right_count,
        anchor,
        config,
        &mut absorbed,
      )?);
    }
  }

  let Some(rung) = rung else {
    return Err(ContourError::FrontierInvariant {
      cell: graph.edge(anchor).cell,
    });
  };

  for side in &absorbed {
    if graph.is_used(side.seg, side.dir) {
      continue;
    }
    let unit = trace_loop(graph, *side, config.max_loop_corners, Stage::GreedyReduction, |_| {})?;
    if unit.corners.len() > MAX_MERGE_CORNERS {
      #[cfg(feature = "tracing")]
      tracing::trace!(
        cell = %graph.edge(anchor).cell,
        corners = unit.corners.len(),
        "merge rejected: absorbs a non-planar cell"
      );
      return Ok(None);
    }
  }

  for side in absorbed.iter().rev() {
    claim_loop(graph, *side, config.max_loop_corners, Stage::GreedyReduction)?;
  }
  for &edge in rung.corners.iter().rev() {
    graph.mark_edge(edge);
  }

  let mut outline: PolygonLoop = SmallVec::new();
  outline.push(anchor);
  outline.extend(left_edges.iter().copied());
  if left_edges.len() < right_edges.len() {
    outline.extend(rung.path.iter().rev().copied());
  } else {
    outline.extend(rung.path.iter().copied());
  }
  outline.extend(right_edges.iter().rev().copied());

  Ok(Some(outline))
}

/// Edge a frontier currently points at.
fn tip(graph: &SegmentGraph, side: Side, anchor: EdgeId) -> Result<EdgeId, ContourError> {
  side.next_edge().ok_or_else(|| ContourError::FrontierInvariant {
    cell: graph.edge(anchor).cell,
  })
}

/// Order frontiers longest first. Returns `(start, end, length, width)` with
/// `length` the shorter count and `width` the longer.
fn longer_first(left: Side, right: Side, left_count: usize, right_count: usize) -> (Side, Side, usize, usize) {
  if left_count < right_count {
    (right, left, left_count, right_count)
  } else {
    (left, right, right_count, left_count)
  }
}

/// Straight steps a rung may take before it must turn.
fn rung_length(graph: &SegmentGraph, start: Side, end: Side, length: usize, limits: &RungLimits) -> usize {
  let same_shape = graph.segment(start.seg).diagonal == graph.segment(end.seg).diagonal;
  if same_shape && length > limits.straight_run {
    limits.straight_run
  } else {
    length.saturating_sub(1)
  }
}

/// Whether growing both frontiers one more step still leaves their tips
/// connected by a rung within the turn budget. Read-only.
fn can_expand(
  graph: &SegmentGraph,
  start: Side,
  end: Side,
  mut length: usize,
  mut width: usize,
  limits: &RungLimits,
) -> bool {
  if start.end_found && end.end_found {
    return false;
  }
  if !start.end_found {
    length += 1;
  }
  if !end.end_found {
    width += 1;
  }

  let (start, end, length, width) = longer_first(start, end, length, width);
  let Some(target) = end.next_edge() else {
    return false;
  };

  let mut start = start.advance(graph);
  let length = rung_length(graph, start, end, length, limits);
  let max_turns = limits.turns(graph.segment(start.seg).comp == graph.segment(end.seg).comp);
  let mut max = length;
  let mut count = 0;
  let mut turns = 0;

  while let Some(edge) = start.next_edge() {
    if edge == target || count > max || turns >= max_turns {
      break;
    }

    let moved = if count != max {
      let (next, moved) = start.extend(graph);
      start = next;
      moved
    } else {
      false
    };

    if moved {
      count += 1;
    } else {
      if count == max && max < length + width {
        max += width;
      }
      start = start.advance(graph);
      turns += 1;
    }
  }

  start.next_edge() == Some(target)
}

/// Walk the rung between the two frontier tips, recording every face it
/// absorbs into `absorbed`.
#[allow(clippy::too_many_arguments)]
fn trace_rung(
  graph: &SegmentGraph,
  start: Side,
  end: Side,
  length: usize,
  width: usize,
  anchor: EdgeId,
  config: &ContourConfig,
  absorbed: &mut Vec<Side>,
) -> Result<Rung, ContourError> {
  let (start, end, length, width) = longer_first(start, end, length, width);
  let target = tip(graph, end, anchor)?;

  let mut rung = Rung::default();
  rung.corners.push(tip(graph, start, anchor)?);

  let mut start = start.advance(graph);
  let length = rung_length(graph, start, end, length, &config.rung_limits);
  let mut max = length;
  let mut count = 0;
  absorbed.push(start);

  let step_limit = 2 * (length + width) + config.max_loop_corners;
  let mut steps = 0;

  loop {
    let edge = tip(graph, start, anchor)?;
    if edge == target || count > max {
      break;
    }
    steps += 1;
    if steps > step_limit {
      return Err(ContourError::FrontierInvariant {
        cell: graph.edge(anchor).cell,
      });
    }

    rung.path.push(edge);
    let moved = if count != max {
      let (next, moved) = start.extend(graph);
      start = next;
      moved
    } else {
      false
    };

    if moved {
      absorbed.push(start);
      count += 1;
    } else {
      if count == max && max < length + width {
        max += width;
      }
      rung.corners.push(edge);
      start = start.advance(graph);
    }
  }

  rung.corners.push(tip(graph, start, anchor)?);
  Ok(rung)
}

#[cfg(test)]
#[path = "greedy_test.rs"]
mod greedy_test;
