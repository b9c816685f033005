//! Automaton creation, destruction, and whole-world queries.

use crate::automaton::{Automaton, AutomatonConfig, NeighbourhoodType, Ruleset, Shape, Topology};

pub const GOL_TOPOLOGY_UNBOUNDED: u8 = 0;
pub const GOL_TOPOLOGY_FIXED: u8 = 1;
pub const GOL_TOPOLOGY_WRAPPING: u8 = 2;

pub const GOL_SHAPE_MOORE: u8 = 0;
pub const GOL_SHAPE_VON_NEUMANN: u8 = 1;

pub(crate) fn topology_from_raw(kind: u8, width: i32, height: i32) -> Option<Topology> {
    match kind {
        GOL_TOPOLOGY_UNBOUNDED => Some(Topology::unbounded()),
        GOL_TOPOLOGY_FIXED => Topology::fixed(width, height).ok(),
        GOL_TOPOLOGY_WRAPPING => Topology::wrapping(width, height).ok(),
        _ => None,
    }
}

pub(crate) fn neighbourhood_from_raw(shape: u8, radius: i32) -> Option<NeighbourhoodType> {
    let shape = match shape {
        GOL_SHAPE_MOORE => Shape::Moore,
        GOL_SHAPE_VON_NEUMANN => Shape::VonNeumann,
        _ => return None,
    };
    NeighbourhoodType::new(shape, radius).ok()
}

/// Creates a new automaton and returns an opaque pointer.
///
/// `width` and `height` are in chunks and ignored for the unbounded
/// topology. The rule tables start all-false. `threads == 0` generates on
/// the calling thread.
///
/// # Returns
/// A pointer to a new Automaton, or null if the topology or neighbourhood
/// is invalid.
///
/// # Safety
/// The returned pointer must eventually be freed with `gol_destroy()`.
#[no_mangle]
pub extern "C" fn gol_create(
    topology: u8,
    width: i32,
    height: i32,
    shape: u8,
    radius: i32,
    threads: u8,
) -> *mut Automaton {
    let Some(topology) = topology_from_raw(topology, width, height) else {
        return std::ptr::null_mut();
    };
    let Some(neighbourhood_type) = neighbourhood_from_raw(shape, radius) else {
        return std::ptr::null_mut();
    };
    let config = AutomatonConfig::with_threads(threads as usize);
    match Automaton::with_config(topology, Ruleset::new(neighbourhood_type), config) {
        Ok(automaton) => Box::into_raw(Box::new(automaton)),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Destroys an automaton and frees its memory.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `gol_create()`, or null
/// - `ptr` must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn gol_destroy(ptr: *mut Automaton) {
    if !ptr.is_null() {
        drop(Box::from_raw(ptr));
    }
}

/// Gets the current generation counter.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Automaton, or null
///
/// # Returns
/// The generation counter, or 0 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn gol_get_generation(ptr: *const Automaton) -> u64 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).generation()
}

/// Removes every live cell and zeroes the generation counter.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Automaton, or null
#[no_mangle]
pub unsafe extern "C" fn gol_reset(ptr: *mut Automaton) {
    if ptr.is_null() {
        return;
    }
    (*ptr).reset();
}

/// Counts live cells.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Automaton, or null
///
/// # Returns
/// The population, or 0 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn gol_population(ptr: *const Automaton) -> u64 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).population()
}

/// Counts stored chunks, empty frontier chunks included.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Automaton, or null
#[no_mangle]
pub unsafe extern "C" fn gol_chunk_count(ptr: *const Automaton) -> u64 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).chunk_array().len() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    fn create_default() -> *mut Automaton {
        gol_create(GOL_TOPOLOGY_UNBOUNDED, 0, 0, GOL_SHAPE_MOORE, 1, 0)
    }

    #[test]
    fn test_create_and_destroy() {
        unsafe {
            let automaton = create_default();
            assert!(!automaton.is_null());

            // Should not crash
            gol_destroy(automaton);
        }
    }

    #[test]
    fn test_create_rejects_bad_arguments() {
        assert!(gol_create(GOL_TOPOLOGY_FIXED, 0, 4, GOL_SHAPE_MOORE, 1, 0).is_null());
        assert!(gol_create(GOL_TOPOLOGY_WRAPPING, 4, -1, GOL_SHAPE_MOORE, 1, 0).is_null());
        assert!(gol_create(9, 4, 4, GOL_SHAPE_MOORE, 1, 0).is_null());
        assert!(gol_create(GOL_TOPOLOGY_UNBOUNDED, 0, 0, 7, 1, 0).is_null());
        assert!(gol_create(GOL_TOPOLOGY_UNBOUNDED, 0, 0, GOL_SHAPE_VON_NEUMANN, 0, 0).is_null());
    }

    #[test]
    fn test_create_bounded_and_threaded() {
        unsafe {
            let automaton = gol_create(GOL_TOPOLOGY_WRAPPING, 3, 2, GOL_SHAPE_VON_NEUMANN, 2, 2);
            assert!(!automaton.is_null());
            assert_eq!(
                (*automaton).topology(),
                &Topology::wrapping(3, 2).unwrap()
            );
            assert_eq!(
                (*automaton).neighbourhood_type(),
                NeighbourhoodType::von_neumann(2).unwrap()
            );
            gol_destroy(automaton);
        }
    }

    #[test]
    fn test_initial_state() {
        unsafe {
            let automaton = create_default();
            assert_eq!(gol_get_generation(automaton), 0);
            assert_eq!(gol_population(automaton), 0);
            assert_eq!(gol_chunk_count(automaton), 0);
            gol_destroy(automaton);
        }
    }

    #[test]
    fn test_reset() {
        unsafe {
            let automaton = create_default();
            (*automaton).set_cell(4, 4, true).unwrap();
            (*automaton).tick().unwrap();
            gol_reset(automaton);
            assert_eq!(gol_get_generation(automaton), 0);
            assert_eq!(gol_chunk_count(automaton), 0);
            gol_destroy(automaton);
        }
    }

    #[test]
    fn test_null_pointer_handling() {
        unsafe {
            gol_destroy(ptr::null_mut());
            gol_reset(ptr::null_mut());
            assert_eq!(gol_get_generation(ptr::null()), 0);
            assert_eq!(gol_population(ptr::null()), 0);
            assert_eq!(gol_chunk_count(ptr::null()), 0);
        }
    }
}
