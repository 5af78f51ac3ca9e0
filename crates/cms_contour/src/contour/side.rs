//! Walk cursor over the segment graph.
//!
//! A [`Side`] stands on one segment and points at the edge it will cross
//! next. Every transition is a pure `Side -> Side` function over a shared
//! graph borrow; only [`Side::claim_advance`] writes, and only segment usage.
//!
//! ```text
//!          advance                     extend
//!   ┌─────────┬─────────┐      ┌─────────┬─────────┐
//!   │  seg ──►│ turned  │      │  seg ──►│ coplanar│
//!   │         │  face   │      │         │  face   │
//!   └─────────┴─────────┘      └─────────┴─────────┘
//!   next face around the       same plane, same shape,
//!   cube (TURN_SLOT)           direction still unused
//! ```

use crate::constants::{COPLANAR_SLOT, TURN_DIRECTION, TURN_SLOT};

use super::edge_grid::EdgeId;
use super::segment_graph::{DirEdge, SegmentGraph, SegmentId};

/// Traversal cursor. Never persisted between walks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Side {
  pub seg: SegmentId,
  /// Edge about to be crossed. `None` once the walk fell off the graph.
  pub next: Option<DirEdge>,
  /// Walk direction (0 or 1).
  pub dir: u8,
  /// Frontier can no longer be extended in its plane.
  pub end_found: bool,
}

/// Two divergent seed faces for a greedy merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frontiers {
  pub left: Side,
  pub right: Side,
  /// Both frontiers can extend, not just one.
  pub both: bool,
}

impl Side {
  pub fn new(seg: SegmentId, next: DirEdge, dir: u8) -> Self {
    Self {
      seg,
      next: Some(next),
      dir,
      end_found: false,
    }
  }

  /// The two walks a segment seeds: from its start in direction 0 and from
  /// its end in direction 1.
  pub fn seeds(graph: &SegmentGraph, seg: SegmentId) -> [Side; 2] {
    let segment = graph.segment(seg);
    [Side::new(seg, segment.start, 0), Side::new(seg, segment.end, 1)]
  }

  #[inline]
  pub fn next_edge(&self) -> Option<EdgeId> {
    self.next.map(|n| n.edge)
  }

  /// Endpoint of the current segment behind the cursor.
  #[inline]
  pub fn far_edge(&self, graph: &SegmentGraph) -> Option<DirEdge> {
    graph.segment(self.seg).opposite(self.next?.edge)
  }

  /// Step onto the perpendicular face across `across`.
  fn turn(self, graph: &SegmentGraph, across: DirEdge) -> Side {
    let dir = TURN_DIRECTION[across.slot as usize];
    let slot = TURN_SLOT[self.dir as usize][across.slot as usize];
    match graph.slot(across.edge, slot) {
      Some(seg) => Side {
        seg,
        next: graph.segment(seg).opposite(across.edge),
        dir,
        end_found: false,
      },
      None => Side {
        seg: self.seg,
        next: None,
        dir,
        end_found: false,
      },
    }
  }

  /// Next face around the cube. Does not consume anything.
  pub fn advance(self, graph: &SegmentGraph) -> Side {
    match self.next {
      Some(across) => self.turn(graph, across),
      None => self,
    }
  }

  /// Like [`advance`](Self::advance) but consumes the entered segment's
  /// direction. Lands with `next = None` if it was already consumed.
  pub fn claim_advance(self, graph: &mut SegmentGraph) -> Side {
    let Some(across) = self.next else {
      return self;
    };
    let dir = TURN_DIRECTION[across.slot as usize];
    let slot = TURN_SLOT[self.dir as usize][across.slot as usize];
    match graph.slot(across.edge, slot) {
      Some(seg) => Side {
        seg,
        next: graph.claim(seg, dir, across.edge),
        dir,
        end_found: false,
      },
      None => Side {
        seg: self.seg,
        next: None,
        dir,
        end_found: false,
      },
    }
  }

  /// Segment on the coplanar face across the next edge.
  #[inline]
  pub fn coplanar_neighbor(&self, graph: &SegmentGraph) -> Option<SegmentId> {
    let next = self.next?;
    graph.slot(next.edge, COPLANAR_SLOT[next.slot as usize])
  }

  /// The coplanar neighbour exists, has the same shape and is still free in
  /// this direction.
  pub fn can_extend(&self, graph: &SegmentGraph) -> bool {
    self.coplanar_neighbor(graph).is_some_and(|neighbor| {
      !graph.is_used(neighbor, self.dir) && graph.segment(self.seg).matches(graph.segment(neighbor))
    })
  }

  /// Move one face along the plane. Returns the new side and whether it
  /// moved; a frontier that cannot move is flagged `end_found`.
  pub fn extend(self, graph: &SegmentGraph) -> (Side, bool) {
    if !self.end_found && self.can_extend(graph) {
      if let (Some(neighbor), Some(next)) = (self.coplanar_neighbor(graph), self.next) {
        let moved = Side {
          seg: neighbor,
          next: graph.segment(neighbor).opposite(next.edge),
          dir: self.dir,
          end_found: false,
        };
        return (moved, true);
      }
    }

    (
      Side {
        end_found: true,
        ..self
      },
      false,
    )
  }

  /// Probe this corner for a pair of frontiers that can seed a merge.
  ///
  /// Tries the plane across the next edge first, then the plane behind the
  /// segment. The second frontier is the face around the cube from the
  /// first.
  pub fn seed_frontiers(&self, graph: &SegmentGraph) -> Option<Frontiers> {
    let ahead = self.next?;
    let behind = self.far_edge(graph)?;

    if self.can_extend(graph) {
      let left = Side {
        end_found: false,
        ..*self
      };
      let right = self.turn(graph, behind);
      return Some(Frontiers {
        left,
        right,
        both: right.can_extend(graph),
      });
    }

    let center = Side {
      next: Some(behind),
      end_found: false,
      ..*self
    };
    if center.can_extend(graph) {
      let left = self.turn(graph, ahead);
      return Some(Frontiers {
        left,
        right: center,
        both: left.can_extend(graph),
      });
    }

    None
  }
}

#[cfg(test)]
#[path = "side_test.rs"]
mod side_test;
