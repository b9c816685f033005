//! Fixed-size tiles of cells and their scan-line generation algorithm.

use std::fmt;

use super::neighbourhood::Neighbourhood;
use super::ruleset::Ruleset;
use super::side::Side;
use crate::error::{AutomatonError, Result};

/// Side length of a chunk, in cells.
pub const CHUNK_SIZE: usize = 20;

/// Number of cells in a chunk.
pub const CHUNK_AREA: usize = CHUNK_SIZE * CHUNK_SIZE;

const SIZE: i32 = CHUNK_SIZE as i32;

/// Row-major index of a local cell coordinate.
#[inline]
pub(crate) fn index_of(x: i32, y: i32) -> usize {
    y as usize * CHUNK_SIZE + x as usize
}

/// Check if local coordinates lie inside a chunk.
#[inline]
pub fn in_bounds(x: i32, y: i32) -> bool {
    (0..SIZE).contains(&x) && (0..SIZE).contains(&y)
}

fn check_in_bounds(x: i32, y: i32) -> Result<()> {
    if !in_bounds(x, y) {
        return Err(AutomatonError::InvalidArgument(
            "cell coordinates must lie in [0, CHUNK_SIZE)",
        ));
    }
    Ok(())
}

/// A chunk's next generation while it is being computed.
///
/// Cells may be evaluated more than once (edge bands overlap at corners), so
/// the live count tracks transitions instead of counting writes.
#[derive(Clone)]
pub struct NextGeneration {
    cells: [bool; CHUNK_AREA],
    live_count: u32,
}

impl NextGeneration {
    pub const fn new() -> Self {
        NextGeneration {
            cells: [false; CHUNK_AREA],
            live_count: 0,
        }
    }

    #[inline]
    fn set(&mut self, x: i32, y: i32, alive: bool) {
        let cell = &mut self.cells[index_of(x, y)];
        match (*cell, alive) {
            (false, true) => self.live_count += 1,
            (true, false) => self.live_count -= 1,
            _ => {}
        }
        *cell = alive;
    }

    pub fn cell(&self, x: i32, y: i32) -> Result<bool> {
        check_in_bounds(x, y)?;
        Ok(self.cells[index_of(x, y)])
    }

    pub fn live_count(&self) -> u32 {
        self.live_count
    }

    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }
}

impl Default for NextGeneration {
    fn default() -> Self {
        NextGeneration::new()
    }
}

impl fmt::Debug for NextGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NextGeneration")
            .field("live_count", &self.live_count)
            .finish_non_exhaustive()
    }
}

/// A `CHUNK_SIZE`×`CHUNK_SIZE` tile of cells at a fixed chunk coordinate.
///
/// To advance a chunk, compute its next generation with [`Chunk::generate`]
/// (or one or more [`Chunk::generate_side`] calls), hand the result to
/// [`Chunk::stage`], then commit it with [`Chunk::update`]. Generation reads
/// the whole chunk array through a shared borrow, which is why the result
/// lands in a caller-owned buffer first.
#[derive(Clone)]
pub struct Chunk {
    x: i32,
    y: i32,
    cells: [bool; CHUNK_AREA],
    live_count: u32,
    next: NextGeneration,
    // Set only on the stand-in for chunks outside the topology.
    frozen: bool,
}

impl Chunk {
    /// A dead chunk at chunk coordinate `(x, y)`.
    pub const fn new(x: i32, y: i32) -> Self {
        Chunk {
            x,
            y,
            cells: [false; CHUNK_AREA],
            live_count: 0,
            next: NextGeneration::new(),
            frozen: false,
        }
    }

    /// The permanently empty chunk that silently ignores mutation.
    pub(crate) const fn frozen() -> Self {
        let mut chunk = Chunk::new(0, 0);
        chunk.frozen = true;
        chunk
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn coords(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Get the value of the cell at local `(x, y)`.
    pub fn cell(&self, x: i32, y: i32) -> Result<bool> {
        check_in_bounds(x, y)?;
        Ok(self.alive_at(x, y))
    }

    #[inline]
    pub(crate) fn alive_at(&self, x: i32, y: i32) -> bool {
        self.cells[index_of(x, y)]
    }

    /// Set the cell at local `(x, y)`. Returns whether anything changed.
    pub fn set_cell(&mut self, x: i32, y: i32, alive: bool) -> Result<bool> {
        check_in_bounds(x, y)?;
        if self.frozen {
            return Ok(false);
        }
        let cell = &mut self.cells[index_of(x, y)];
        if *cell == alive {
            return Ok(false);
        }
        *cell = alive;
        if alive {
            self.live_count += 1;
        } else {
            self.live_count -= 1;
        }
        Ok(true)
    }

    /// All cells, row-major (`y * CHUNK_SIZE + x`).
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub fn live_count(&self) -> u32 {
        self.live_count
    }

    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    pub fn next_live_count(&self) -> u32 {
        self.next.live_count
    }

    pub fn is_next_gen_empty(&self) -> bool {
        self.next.is_empty()
    }

    /// Evaluate every cell of the chunk into `next`.
    pub fn generate(
        &self,
        ruleset: &Ruleset,
        neighbourhood: &mut Neighbourhood<'_>,
        next: &mut NextGeneration,
    ) -> Result<()> {
        self.scan(ruleset, neighbourhood, Side::Bottom, SIZE, next)
    }

    /// Evaluate only the band of cells within `affecting_distance` of `side`.
    pub fn generate_side(
        &self,
        ruleset: &Ruleset,
        neighbourhood: &mut Neighbourhood<'_>,
        side: Side,
        affecting_distance: u32,
        next: &mut NextGeneration,
    ) -> Result<()> {
        let band = affecting_distance.clamp(1, CHUNK_SIZE as u32) as i32;
        self.scan(ruleset, neighbourhood, side, band, next)
    }

    /// Boustrophedon scan over the `band` rows nearest `side`.
    ///
    /// Coordinates are tracked as if `side` were `Bottom` and mapped through
    /// `Side::transform`; the neighbourhood only ever moves one cell at a time.
    fn scan(
        &self,
        ruleset: &Ruleset,
        neighbourhood: &mut Neighbourhood<'_>,
        side: Side,
        band: i32,
        next: &mut NextGeneration,
    ) -> Result<()> {
        if self.frozen {
            return Ok(());
        }

        let mut x = 0;
        let mut y = SIZE - band;
        let (start_x, start_y) = side.transform(x, y, SIZE, SIZE);
        neighbourhood.move_to(self.x, self.y, start_x, start_y)?;
        self.evaluate(ruleset, neighbourhood, side, x, y, next)?;

        loop {
            if x == 0 {
                while x < SIZE - 1 {
                    neighbourhood.move_to_side(side.right())?;
                    x += 1;
                    self.evaluate(ruleset, neighbourhood, side, x, y, next)?;
                }
            } else {
                while x > 0 {
                    neighbourhood.move_to_side(side.left())?;
                    x -= 1;
                    self.evaluate(ruleset, neighbourhood, side, x, y, next)?;
                }
            }

            if y == SIZE - 1 {
                return Ok(());
            }
            neighbourhood.move_to_side(side)?;
            y += 1;
            self.evaluate(ruleset, neighbourhood, side, x, y, next)?;
        }
    }

    #[inline]
    fn evaluate(
        &self,
        ruleset: &Ruleset,
        neighbourhood: &Neighbourhood<'_>,
        side: Side,
        x: i32,
        y: i32,
        next: &mut NextGeneration,
    ) -> Result<()> {
        let (x, y) = side.transform(x, y, SIZE, SIZE);
        debug_assert_eq!(neighbourhood.position().ok(), Some((x, y)));
        let alive = ruleset.next_state(self.alive_at(x, y), neighbourhood.live_count()?)?;
        next.set(x, y, alive);
        Ok(())
    }

    /// Adopt a computed next generation, replacing any previously staged one.
    pub fn stage(&mut self, next: NextGeneration) {
        if !self.frozen {
            self.next = next;
        }
    }

    /// Commit the staged generation. Returns whether the chunk was touched.
    ///
    /// A chunk that is empty now and empty next generation is left alone.
    pub fn update(&mut self) -> bool {
        if self.frozen || (self.is_empty() && self.is_next_gen_empty()) {
            return false;
        }
        self.cells = self.next.cells;
        self.live_count = self.next.live_count;
        self.next = NextGeneration::new();
        true
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("live_count", &self.live_count)
            .field("next_live_count", &self.next.live_count)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::chunk_array::ChunkArray;
    use crate::automaton::neighbourhood::NeighbourhoodType;
    use crate::automaton::topology::Topology;

    fn single_chunk(cells: &[(i32, i32)]) -> ChunkArray {
        let mut array = ChunkArray::new(Topology::unbounded());
        let chunk = array.get(0, 0);
        for &(x, y) in cells {
            chunk.set_cell(x, y, true).unwrap();
        }
        array
    }

    #[test]
    fn test_new_chunk_is_dead() {
        let chunk = Chunk::new(3, -4);
        assert_eq!(chunk.coords(), (3, -4));
        assert!(chunk.is_empty());
        assert!(chunk.is_next_gen_empty());
        assert!(chunk.cells().iter().all(|&c| !c));
        assert_eq!(chunk.cells().len(), CHUNK_AREA);
    }

    #[test]
    fn test_cell_bounds() {
        let mut chunk = Chunk::new(0, 0);
        assert!(chunk.cell(0, 0).is_ok());
        assert!(chunk.cell(19, 19).is_ok());
        assert!(matches!(
            chunk.cell(20, 0),
            Err(AutomatonError::InvalidArgument(_))
        ));
        assert!(chunk.cell(0, -1).is_err());
        assert!(chunk.set_cell(-1, 0, true).is_err());
        assert!(chunk.set_cell(0, 20, true).is_err());
        assert!(chunk.is_empty());
    }

    #[test]
    fn test_set_cell_tracks_live_count() {
        let mut chunk = Chunk::new(0, 0);
        assert!(chunk.set_cell(4, 5, true).unwrap());
        assert!(!chunk.set_cell(4, 5, true).unwrap());
        assert!(chunk.set_cell(6, 5, true).unwrap());
        assert_eq!(chunk.live_count(), 2);
        assert!(chunk.cell(4, 5).unwrap());

        chunk.set_cell(4, 5, false).unwrap();
        chunk.set_cell(6, 5, false).unwrap();
        assert!(chunk.is_empty());
    }

    #[test]
    fn test_frozen_chunk_ignores_mutation() {
        let mut chunk = Chunk::frozen();
        assert!(!chunk.set_cell(1, 1, true).unwrap());
        let mut next = NextGeneration::new();
        next.set(2, 2, true);
        chunk.stage(next);
        assert!(!chunk.update());
        assert!(chunk.is_empty());
        assert!(!chunk.cell(1, 1).unwrap());
    }

    #[test]
    fn test_next_generation_counts_transitions() {
        let mut next = NextGeneration::new();
        next.set(1, 1, true);
        next.set(1, 1, true);
        assert_eq!(next.live_count(), 1);
        next.set(1, 1, false);
        assert!(next.is_empty());
        assert!(!next.cell(1, 1).unwrap());
    }

    #[test]
    fn test_generate_blinker_in_chunk() {
        let array = single_chunk(&[(9, 10), (10, 10), (11, 10)]);
        let ruleset = Ruleset::conway();
        let mut neighbourhood = Neighbourhood::new(&array, NeighbourhoodType::MOORE);
        let chunk = array.chunk_at(0, 0).unwrap();

        let mut next = NextGeneration::new();
        chunk.generate(&ruleset, &mut neighbourhood, &mut next).unwrap();

        assert_eq!(next.live_count(), 3);
        assert!(next.cell(10, 9).unwrap());
        assert!(next.cell(10, 10).unwrap());
        assert!(next.cell(10, 11).unwrap());
        assert!(!next.cell(9, 10).unwrap());
    }

    #[test]
    fn test_generate_queues_missing_neighbours() {
        let array = single_chunk(&[(0, 0)]);
        let ruleset = Ruleset::conway();
        let mut neighbourhood = Neighbourhood::new(&array, NeighbourhoodType::MOORE);
        let mut next = NextGeneration::new();
        array
            .chunk_at(0, 0)
            .unwrap()
            .generate(&ruleset, &mut neighbourhood, &mut next)
            .unwrap();

        let missing = neighbourhood.take_missing();
        assert_eq!(missing.len(), 8);
        assert!(missing.contains(&(-1, -1)));
        assert!(missing.contains(&(1, 1)));
        assert!(!missing.contains(&(0, 0)));
    }

    #[test]
    fn test_generate_side_touches_only_the_band() {
        // Every cell survives with 0 neighbours, so the band shows up in `next`.
        let mut ruleset = Ruleset::new(NeighbourhoodType::MOORE);
        ruleset.set_born_with(0, true).unwrap();
        let array = single_chunk(&[]);
        let chunk = array.chunk_at(0, 0).unwrap();

        for side in Side::ALL {
            let mut neighbourhood = Neighbourhood::new(&array, NeighbourhoodType::MOORE);
            let mut next = NextGeneration::new();
            chunk
                .generate_side(&ruleset, &mut neighbourhood, side, 2, &mut next)
                .unwrap();
            assert_eq!(next.live_count(), 2 * CHUNK_SIZE as u32, "{:?}", side);

            for y in 0..SIZE {
                for x in 0..SIZE {
                    let expected = match side {
                        Side::Bottom => y >= SIZE - 2,
                        Side::Top => y < 2,
                        Side::Left => x < 2,
                        Side::Right => x >= SIZE - 2,
                    };
                    assert_eq!(next.cell(x, y).unwrap(), expected, "{:?} ({}, {})", side, x, y);
                }
            }
        }
    }

    #[test]
    fn test_overlapping_bands_count_each_cell_once() {
        let mut ruleset = Ruleset::new(NeighbourhoodType::MOORE);
        ruleset.set_born_with(0, true).unwrap();
        let array = single_chunk(&[]);
        let chunk = array.chunk_at(0, 0).unwrap();
        let mut neighbourhood = Neighbourhood::new(&array, NeighbourhoodType::MOORE);

        let mut next = NextGeneration::new();
        for side in Side::ALL {
            chunk
                .generate_side(&ruleset, &mut neighbourhood, side, 1, &mut next)
                .unwrap();
        }
        // The outer ring of a 20x20 tile.
        assert_eq!(next.live_count(), 4 * (CHUNK_SIZE as u32 - 1));
    }

    #[test]
    fn test_update_commits_and_clears() {
        let mut array = single_chunk(&[(9, 10), (10, 10), (11, 10)]);
        let ruleset = Ruleset::conway();
        let next = {
            let mut neighbourhood = Neighbourhood::new(&array, NeighbourhoodType::MOORE);
            let mut next = NextGeneration::new();
            array
                .chunk_at(0, 0)
                .unwrap()
                .generate(&ruleset, &mut neighbourhood, &mut next)
                .unwrap();
            next
        };

        let chunk = array.get(0, 0);
        chunk.stage(next);
        assert_eq!(chunk.next_live_count(), 3);
        assert!(chunk.update());
        assert_eq!(chunk.live_count(), 3);
        assert!(chunk.cell(10, 9).unwrap());
        assert!(!chunk.cell(9, 10).unwrap());
        assert!(chunk.is_next_gen_empty());
    }

    #[test]
    fn test_update_fast_path_on_empty_chunk() {
        let mut chunk = Chunk::new(0, 0);
        assert!(!chunk.update());
        assert!(chunk.is_empty());
    }

    #[test]
    fn test_update_kills_chunk_with_empty_next_generation() {
        let mut chunk = Chunk::new(0, 0);
        chunk.set_cell(3, 3, true).unwrap();
        assert!(chunk.update());
        assert!(chunk.is_empty());
        assert!(!chunk.cell(3, 3).unwrap());
    }
}
