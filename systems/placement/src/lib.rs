#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid sampling helpers used while populating worlds.
//!
//! Every routine is a pure function of the grid and the supplied random
//! source. Searches have a bounded budget and report `None` instead of
//! failing, so callers can omit a feature when a grid is too crowded.

use gate_explorer_core::{Direction, Position, TileGrid, WorldSize};
use rand::Rng;

/// Number of random cells inspected before a search gives up.
pub const PLACEMENT_ATTEMPTS: usize = 100;

/// Half-width of the box sampled around a preferred position.
pub const PREFERRED_SPREAD: i32 = 3;

/// Neighbour offsets in search order: orthogonal first, then diagonal.
const NEIGHBOUR_OFFSETS: [(i32, i32); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];

/// Finds an empty interior cell, optionally biased toward `preferred`.
///
/// Without a preference each attempt samples uniformly from the interior
/// (the grid minus its outer ring). With a preference each attempt samples a
/// cell within [`PREFERRED_SPREAD`] columns and rows of it, clamped to the
/// interior. Returns the first sampled cell holding open ground.
pub fn find_empty_position<R>(
    grid: &TileGrid,
    preferred: Option<Position>,
    rng: &mut R,
) -> Option<Position>
where
    R: Rng + ?Sized,
{
    let interior = Interior::of(grid.size())?;

    for _ in 0..PLACEMENT_ATTEMPTS {
        let candidate = match preferred {
            Some(anchor) => interior.clamp(anchor.offset(
                rng.gen_range(-PREFERRED_SPREAD..=PREFERRED_SPREAD),
                rng.gen_range(-PREFERRED_SPREAD..=PREFERRED_SPREAD),
            )),
            None => interior.sample(rng),
        };
        if grid.is_empty_at(candidate) {
            return Some(candidate);
        }
    }

    None
}

/// Returns the first empty neighbour of `center` in a fixed search order.
#[must_use]
pub fn find_adjacent_empty(grid: &TileGrid, center: Position) -> Option<Position> {
    NEIGHBOUR_OFFSETS
        .iter()
        .map(|&(dx, dy)| center.offset(dx, dy))
        .find(|candidate| grid.is_empty_at(*candidate))
}

/// Picks one of the four orthogonal directions uniformly.
pub fn random_orthogonal_direction<R>(rng: &mut R) -> Direction
where
    R: Rng + ?Sized,
{
    Direction::ALL[rng.gen_range(0..Direction::ALL.len())]
}

/// Inclusive bounds of the cells that are not on the outer ring.
#[derive(Clone, Copy, Debug)]
struct Interior {
    max_x: i32,
    max_y: i32,
}

impl Interior {
    const MIN: i32 = 1;

    fn of(size: WorldSize) -> Option<Self> {
        let max_x = i32::try_from(size.width()).ok()?.checked_sub(2)?;
        let max_y = i32::try_from(size.height()).ok()?.checked_sub(2)?;
        if max_x < Self::MIN || max_y < Self::MIN {
            return None;
        }
        Some(Self { max_x, max_y })
    }

    fn sample<R>(&self, rng: &mut R) -> Position
    where
        R: Rng + ?Sized,
    {
        Position::new(
            rng.gen_range(Self::MIN..=self.max_x),
            rng.gen_range(Self::MIN..=self.max_y),
        )
    }

    fn clamp(&self, position: Position) -> Position {
        Position::new(
            position.x().clamp(Self::MIN, self.max_x),
            position.y().clamp(Self::MIN, self.max_y),
        )
    }
}
