//! Copying rectangles of world cells to and from flat byte buffers.

use super::chunk::CHUNK_SIZE;
use super::stepping::Automaton;
use crate::error::Result;

/// A half-open rectangle of world cells, `[min_x, max_x) x [min_y, max_y)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Region {
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Region {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Number of cells covered; 0 for an inverted region.
    pub(crate) fn area(&self) -> usize {
        let width = (i64::from(self.max_x) - i64::from(self.min_x)).max(0) as usize;
        let height = (i64::from(self.max_y) - i64::from(self.min_y)).max(0) as usize;
        width.saturating_mul(height)
    }

    fn cells(self) -> impl Iterator<Item = (i32, i32)> {
        (self.min_y..self.max_y).flat_map(move |y| (self.min_x..self.max_x).map(move |x| (x, y)))
    }
}

/// Does the world of `automaton` hold cell `(x, y)`? Bounded worlds span
/// `[0, width * CHUNK_SIZE) x [0, height * CHUNK_SIZE)`; off-world cells
/// are not aliased through wrapping.
fn in_world(automaton: &Automaton, x: i32, y: i32) -> bool {
    match automaton.topology().bounds() {
        Some(bounds) => {
            let width = bounds.width().saturating_mul(CHUNK_SIZE as i32);
            let height = bounds.height().saturating_mul(CHUNK_SIZE as i32);
            (0..width).contains(&x) && (0..height).contains(&y)
        }
        None => true,
    }
}

/// Copy a rectangle of world cells into `out_buf`.
///
/// # Layout
/// Row-major over the requested rectangle: `y` changes slowest, `x` fastest,
/// with a row stride of `max_x - min_x`. One byte per cell, 0 dead and 1
/// alive. Cells outside a bounded world are written as 0. This matches the
/// layout `import_region` reads.
///
/// # Returns
/// Number of bytes written, or 0 if the region is empty or the buffer is too
/// small.
pub fn extract_region(automaton: &Automaton, out_buf: &mut [u8], region: Region) -> u64 {
    let total_size = region.area();
    if total_size == 0 || out_buf.len() < total_size {
        return 0;
    }

    for ((x, y), byte) in region.cells().zip(out_buf.iter_mut()) {
        *byte = u8::from(in_world(automaton, x, y) && automaton.cell(x, y));
    }
    total_size as u64
}

/// Overwrite a rectangle of world cells from `in_buf`.
///
/// Uses the layout written by `extract_region`. Any non-zero byte is alive.
/// Bytes for cells outside a bounded world are skipped, and dead cells in
/// chunks that are not stored do not create chunks.
///
/// # Returns
/// Number of bytes read, or 0 if the region is empty or the buffer is too
/// small.
pub fn import_region(automaton: &mut Automaton, in_buf: &[u8], region: Region) -> Result<u64> {
    let total_size = region.area();
    if total_size == 0 || in_buf.len() < total_size {
        return Ok(0);
    }

    for ((x, y), &byte) in region.cells().zip(in_buf) {
        if in_world(automaton, x, y) {
            automaton.set_cell(x, y, byte != 0)?;
        }
    }
    Ok(total_size as u64)
}
