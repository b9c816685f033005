//! Region extraction and import FFI functions.

use crate::automaton::{self, Automaton, Region};

/// Extracts a rectangle of world cells into a flat output buffer.
///
/// # Layout
/// Row-major: y changes slowest, x fastest, with a row stride of
/// `max_x - min_x` even on bounded worlds. Cells outside the world read as 0.
/// This matches the layout expected by `gol_import_region`.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Automaton, or null
/// - `out_buf` must point to a buffer with at least
///   `(max_x - min_x) * (max_y - min_y)` bytes
///
/// # Returns
/// Number of bytes written (the full rectangle), or 0 on error.
#[no_mangle]
pub unsafe extern "C" fn gol_extract_region(
    ptr: *const Automaton,
    out_buf: *mut u8,
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
) -> u64 {
    if ptr.is_null() || out_buf.is_null() {
        return 0;
    }

    let region = Region::new(min_x, min_y, max_x, max_y);
    let len = region.area();
    if len == 0 {
        return 0;
    }

    let buf_slice = std::slice::from_raw_parts_mut(out_buf, len);
    automaton::extract_region(&*ptr, buf_slice, region)
}

/// Imports a rectangle of world cells from a flat buffer.
///
/// # Layout
/// The buffer is expected in the layout written by `gol_extract_region`.
/// Input values are normalized: 0 = dead, non-zero = alive. Bytes for cells
/// outside a bounded world are skipped.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Automaton, or null
/// - `in_buf` must point to a buffer with at least
///   `(max_x - min_x) * (max_y - min_y)` bytes
///
/// # Returns
/// Number of bytes read (the full rectangle), or 0 on error.
#[no_mangle]
pub unsafe extern "C" fn gol_import_region(
    ptr: *mut Automaton,
    in_buf: *const u8,
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
) -> u64 {
    if ptr.is_null() || in_buf.is_null() {
        return 0;
    }

    let region = Region::new(min_x, min_y, max_x, max_y);
    let len = region.area();
    if len == 0 {
        return 0;
    }

    let buf_slice = std::slice::from_raw_parts(in_buf, len);
    automaton::import_region(&mut *ptr, buf_slice, region).unwrap_or(0)
}
