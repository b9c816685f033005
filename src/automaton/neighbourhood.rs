//! Neighbourhood shapes and the incremental live-neighbour counter.
//!
//! Generating a chunk evaluates every cell once, so recounting a whole
//! neighbourhood per cell would cost `O(num_cells)` each time. Instead the
//! neighbourhood is placed once with `move_to` and then slid one cell at a
//! time, adjusting the count with only the cells entering and leaving it.

use std::collections::BTreeSet;
use std::mem;

use super::chunk::{in_bounds, Chunk, CHUNK_SIZE};
use super::chunk_array::{offset, ChunkArray, Slot};
use super::side::Side;
use crate::error::{AutomatonError, Result};

const SIZE: i32 = CHUNK_SIZE as i32;

/// Largest accepted radius; keeps `num_cells` well inside `u32`.
pub const MAX_RADIUS: u32 = 1 << 12;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Every cell within Chebyshev distance `radius`.
    Moore,
    /// Every cell within Manhattan distance `radius`.
    VonNeumann,
}

/// A neighbourhood shape together with its radius.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NeighbourhoodType {
    shape: Shape,
    radius: u32,
}

impl NeighbourhoodType {
    /// The classic eight-cell Moore neighbourhood.
    pub const MOORE: NeighbourhoodType = NeighbourhoodType {
        shape: Shape::Moore,
        radius: 1,
    };

    pub fn new(shape: Shape, radius: i32) -> Result<Self> {
        if radius <= 0 {
            return Err(AutomatonError::InvalidArgument(
                "neighbourhood radius must be positive",
            ));
        }
        if radius as u32 > MAX_RADIUS {
            return Err(AutomatonError::InvalidArgument(
                "neighbourhood radius is too large",
            ));
        }
        Ok(NeighbourhoodType {
            shape,
            radius: radius as u32,
        })
    }

    pub fn moore(radius: i32) -> Result<Self> {
        NeighbourhoodType::new(Shape::Moore, radius)
    }

    pub fn von_neumann(radius: i32) -> Result<Self> {
        NeighbourhoodType::new(Shape::VonNeumann, radius)
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Number of cells in the neighbourhood, excluding the centre.
    pub fn num_cells(&self) -> u32 {
        let r = self.radius;
        match self.shape {
            Shape::Moore => (2 * r + 1) * (2 * r + 1) - 1,
            Shape::VonNeumann => 2 * r * (r + 1),
        }
    }

    /// How far, in cells, a live cell can influence another in one generation.
    pub fn affecting_distance(&self) -> u32 {
        self.radius
    }

    /// How far, in chunks, a live cell can influence another in one generation.
    pub fn chunk_reach(&self) -> i32 {
        self.radius.div_ceil(CHUNK_SIZE as u32) as i32
    }

    /// Half the width of the neighbourhood's row at vertical offset `dy`
    /// (or column at horizontal offset `dx`; both shapes are symmetric).
    #[inline]
    fn half_extent(&self, offset: i32) -> i32 {
        let r = self.radius as i32;
        match self.shape {
            Shape::Moore => r,
            Shape::VonNeumann => r - offset.abs(),
        }
    }

    /// Every offset in the neighbourhood, centre excluded.
    pub fn offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let r = self.radius as i32;
        (-r..=r).flat_map(move |dy| {
            let e = self.half_extent(dy);
            (-e..=e)
                .filter(move |&dx| (dx, dy) != (0, 0))
                .map(move |dx| (dx, dy))
        })
    }

    pub fn make_neighbourhood<'a>(&self, chunk_array: &'a ChunkArray) -> Neighbourhood<'a> {
        Neighbourhood::new(chunk_array, *self)
    }
}

impl Default for NeighbourhoodType {
    fn default() -> Self {
        NeighbourhoodType::MOORE
    }
}

#[derive(Clone, Copy, Debug)]
struct Cursor {
    chunk_x: i32,
    chunk_y: i32,
    x: i32,
    y: i32,
}

/// A live-neighbour counter positioned on one cell of a chunk array.
///
/// Reads that land in a chunk the topology allows but the array does not
/// store count as dead, and the chunk's coordinate is remembered; the caller
/// drains those with [`Neighbourhood::take_missing`] and queues them for
/// insertion once it is allowed to mutate the array.
pub struct Neighbourhood<'a> {
    chunk_array: &'a ChunkArray,
    kind: NeighbourhoodType,
    cursor: Option<Cursor>,
    current: Option<&'a Chunk>,
    live_count: u32,
    missing: BTreeSet<(i32, i32)>,
}

impl<'a> Neighbourhood<'a> {
    /// An unpositioned neighbourhood. Call `move_to` before anything else.
    pub fn new(chunk_array: &'a ChunkArray, kind: NeighbourhoodType) -> Self {
        Neighbourhood {
            chunk_array,
            kind,
            cursor: None,
            current: None,
            live_count: 0,
            missing: BTreeSet::new(),
        }
    }

    pub fn neighbourhood_type(&self) -> NeighbourhoodType {
        self.kind
    }

    pub fn is_ready(&self) -> bool {
        self.cursor.is_some()
    }

    fn ready_cursor(&self) -> Result<Cursor> {
        self.cursor
            .ok_or(AutomatonError::Logic("neighbourhood used before move_to"))
    }

    /// Live cells in the neighbourhood of the current cell, centre excluded.
    pub fn live_count(&self) -> Result<u32> {
        self.ready_cursor()?;
        Ok(self.live_count)
    }

    /// Current chunk coordinate.
    pub fn chunk(&self) -> Result<(i32, i32)> {
        let c = self.ready_cursor()?;
        Ok((c.chunk_x, c.chunk_y))
    }

    /// Current local cell coordinate within the chunk.
    pub fn position(&self) -> Result<(i32, i32)> {
        let c = self.ready_cursor()?;
        Ok((c.x, c.y))
    }

    /// Chunks referenced since the last call that the array does not store.
    pub fn take_missing(&mut self) -> BTreeSet<(i32, i32)> {
        mem::take(&mut self.missing)
    }

    /// Read the cell at offset `(dx, dy)` from the current position.
    pub fn get_cell(&mut self, dx: i32, dy: i32) -> Result<bool> {
        let c = self.ready_cursor()?;
        Ok(self.lookup(c, dx, dy))
    }

    fn lookup(&mut self, c: Cursor, dx: i32, dy: i32) -> bool {
        let nx = c.x + dx;
        let ny = c.y + dy;
        if in_bounds(nx, ny) {
            if let Some(chunk) = self.current {
                return chunk.alive_at(nx, ny);
            }
        }

        let Some((chunk_x, chunk_y)) =
            offset(c.chunk_x, c.chunk_y, nx.div_euclid(SIZE), ny.div_euclid(SIZE))
        else {
            return false;
        };
        match self.chunk_array.slot(chunk_x, chunk_y) {
            Slot::Stored(chunk) => chunk.alive_at(nx.rem_euclid(SIZE), ny.rem_euclid(SIZE)),
            Slot::Vacant(x, y) => {
                self.missing.insert((x, y));
                false
            }
            Slot::Void => false,
        }
    }

    /// Place the neighbourhood on local cell `(x, y)` of chunk
    /// `(chunk_x, chunk_y)` and count it from scratch.
    pub fn move_to(&mut self, chunk_x: i32, chunk_y: i32, x: i32, y: i32) -> Result<()> {
        if !in_bounds(x, y) {
            return Err(AutomatonError::InvalidArgument(
                "cell coordinates must lie in [0, CHUNK_SIZE)",
            ));
        }
        let chunk = self
            .chunk_array
            .chunk_at(chunk_x, chunk_y)
            .ok_or(AutomatonError::InvalidArgument(
                "neighbourhood must be placed in an existing chunk",
            ))?;

        let cursor = Cursor {
            chunk_x,
            chunk_y,
            x,
            y,
        };
        self.cursor = Some(cursor);
        self.current = Some(chunk);

        let kind = self.kind;
        let mut count = 0;
        for (dx, dy) in kind.offsets() {
            if self.lookup(cursor, dx, dy) {
                count += 1;
            }
        }
        self.live_count = count;
        Ok(())
    }

    pub fn move_left(&mut self) -> Result<i32> {
        let c = self.ready_cursor()?;
        if c.x == 0 {
            return Err(AutomatonError::Range("cannot move left past the chunk edge"));
        }
        self.translate(c, -1, 0);
        self.cursor = Some(Cursor { x: c.x - 1, ..c });
        Ok(c.x - 1)
    }

    pub fn move_right(&mut self) -> Result<i32> {
        let c = self.ready_cursor()?;
        if c.x == SIZE - 1 {
            return Err(AutomatonError::Range("cannot move right past the chunk edge"));
        }
        self.translate(c, 1, 0);
        self.cursor = Some(Cursor { x: c.x + 1, ..c });
        Ok(c.x + 1)
    }

    pub fn move_up(&mut self) -> Result<i32> {
        let c = self.ready_cursor()?;
        if c.y == 0 {
            return Err(AutomatonError::Range("cannot move up past the chunk edge"));
        }
        self.translate(c, 0, -1);
        self.cursor = Some(Cursor { y: c.y - 1, ..c });
        Ok(c.y - 1)
    }

    pub fn move_down(&mut self) -> Result<i32> {
        let c = self.ready_cursor()?;
        if c.y == SIZE - 1 {
            return Err(AutomatonError::Range("cannot move down past the chunk edge"));
        }
        self.translate(c, 0, 1);
        self.cursor = Some(Cursor { y: c.y + 1, ..c });
        Ok(c.y + 1)
    }

    /// Move one cell towards `side`. `Top` is towards smaller `y`.
    pub fn move_to_side(&mut self, side: Side) -> Result<i32> {
        match side {
            Side::Bottom => self.move_down(),
            Side::Top => self.move_up(),
            Side::Left => self.move_left(),
            Side::Right => self.move_right(),
        }
    }

    /// Adjust the count for a one-cell step `(step_x, step_y)` from `c`.
    ///
    /// For each row (or column) across the direction of travel, the cell at
    /// the trailing end leaves and the one past the leading end enters. The
    /// old centre joins the neighbourhood and the new centre leaves it.
    fn translate(&mut self, c: Cursor, step_x: i32, step_y: i32) {
        let r = self.kind.radius as i32;
        let mut delta: i64 = 0;
        for across in -r..=r {
            let e = self.kind.half_extent(across);
            let (trailing, leading) = if step_x != 0 {
                ((-e * step_x, across), ((e + 1) * step_x, across))
            } else {
                ((across, -e * step_y), (across, (e + 1) * step_y))
            };
            if self.lookup(c, trailing.0, trailing.1) {
                delta -= 1;
            }
            if self.lookup(c, leading.0, leading.1) {
                delta += 1;
            }
        }
        if self.lookup(c, 0, 0) {
            delta += 1;
        }
        if self.lookup(c, step_x, step_y) {
            delta -= 1;
        }
        self.live_count = (i64::from(self.live_count) + delta) as u32;
    }
}
