//! Fixed face-adjacency tables for the cubical walk.
//!
//! Every quad face has four direction slots, one per side. Slots 0/2 and 1/3
//! sit on opposite sides of the face:
//!
//! ```text
//!            slot 2
//!        ┌───────────┐
//!        │           │
//! slot 3 │   face    │ slot 1
//!        │           │
//!        └───────────┘
//!            slot 0
//! ```
//!
//! A boundary edge is shared by four faces: the two coplanar faces that meet
//! on it and the two perpendicular faces of the cubes on either side. A walk
//! arriving at an edge through slot `s` while travelling in direction `d`
//! finds the perpendicular face in slot `TURN_SLOT[d][s]` and continues in
//! direction `TURN_DIRECTION[s]`. The coplanar neighbour sits in
//! `COPLANAR_SLOT[s]`.
//!
//! The tables are total and self-inverse: turning twice across the same edge
//! returns to the slot and direction the walk started from.

/// Number of direction slots on a quad face.
pub const FACE_SLOTS: usize = 4;

/// Walk direction after turning across an edge, indexed by the crossed slot.
pub const TURN_DIRECTION: [u8; FACE_SLOTS] = [1, 1, 0, 0];

/// Slot holding the coplanar neighbour face, indexed by the crossed slot.
pub const COPLANAR_SLOT: [u8; FACE_SLOTS] = [2, 3, 0, 1];

/// Slot holding the perpendicular face, indexed by walk direction then the
/// crossed slot.
pub const TURN_SLOT: [[u8; FACE_SLOTS]; 2] = [[3, 2, 3, 2], [1, 0, 1, 0]];

/// Lowest bucket index a sample may occupy. The boundary walk reaches one
/// bucket below every run.
pub const MIN_RANGE: i32 = i32::MIN + 1;

/// Highest bucket index a sample may occupy. The boundary walk reaches one
/// bucket above every run.
pub const MAX_RANGE: i32 = i32::MAX - 1;

/// Face configuration with no occupied corner.
pub const EMPTY_FACE: u8 = 0;

/// Face configuration with every corner occupied.
pub const FULL_FACE: u8 = 15;

/// Saddle configuration whose crossings pair up in swapped diagonal order.
pub const SADDLE_SWAP_FACE: u8 = 6;

/// Upper bound on corners of any unit loop (a cube has 12 edges).
pub const MAX_LOOP_CORNERS: usize = 12;

/// Largest seed loop the greedy reducer expands, and the largest unit loop it
/// may absorb.
pub const MAX_MERGE_CORNERS: usize = 4;

/// Loops with more corners than this are fanned around a centroid.
pub const FAN_CORNERS: usize = 4;

/// Number of vertex-bearing edges a face configuration must have.
#[inline]
pub const fn expected_crossings(config: u8) -> usize {
  match config {
    6 | 9 => 4,
    _ => 2,
  }
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
