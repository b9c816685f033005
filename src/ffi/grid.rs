//! World cell access and stepping.

use crate::automaton::Automaton;

/// Sets the cell at world coordinate `(x, y)` to alive (non-zero) or dead (0).
///
/// # Safety
/// - `ptr` must be a valid pointer to an Automaton, or null
///
/// Cells outside a fixed topology are silently ignored.
///
/// # Returns
/// 0 on success, 1 on failure (null pointer)
#[no_mangle]
pub unsafe extern "C" fn gol_set_cell(ptr: *mut Automaton, x: i32, y: i32, alive: u8) -> i32 {
    if ptr.is_null() {
        return 1;
    }

    let automaton = &mut *ptr;
    match automaton.set_cell(x, y, alive != 0) {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

/// Gets the state of the cell at world coordinate `(x, y)`.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Automaton, or null
///
/// # Returns
/// 1 if alive; 0 if dead, never stored, or ptr is null.
#[no_mangle]
pub unsafe extern "C" fn gol_get_cell(ptr: *const Automaton, x: i32, y: i32) -> u8 {
    if ptr.is_null() {
        return 0;
    }
    u8::from((*ptr).cell(x, y))
}

/// Advances the automaton by one generation.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Automaton, or null
///
/// # Returns
/// 0 on success, 1 on failure (null pointer or internal error)
#[no_mangle]
pub unsafe extern "C" fn gol_tick(ptr: *mut Automaton) -> i32 {
    if ptr.is_null() {
        return 1;
    }

    let automaton = &mut *ptr;
    match automaton.tick() {
        Ok(()) => 0,
        Err(err) => {
            tracing::error!(%err, "tick failed");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::lifecycle;
    use crate::ffi::rules;
    use std::ptr;

    unsafe fn create_conway() -> *mut Automaton {
        let automaton = lifecycle::gol_create(
            lifecycle::GOL_TOPOLOGY_UNBOUNDED,
            0,
            0,
            lifecycle::GOL_SHAPE_MOORE,
            1,
            0,
        );
        rules::gol_set_born(automaton, 3, 1);
        rules::gol_set_survives(automaton, 2, 1);
        rules::gol_set_survives(automaton, 3, 1);
        automaton
    }

    #[test]
    fn test_set_and_get_cell() {
        unsafe {
            let automaton = create_conway();

            assert_eq!(gol_get_cell(automaton, -7, 31), 0);
            assert_eq!(gol_set_cell(automaton, -7, 31, 1), 0);
            assert_eq!(gol_get_cell(automaton, -7, 31), 1);
            assert_eq!(gol_set_cell(automaton, -7, 31, 0), 0);
            assert_eq!(gol_get_cell(automaton, -7, 31), 0);

            lifecycle::gol_destroy(automaton);
        }
    }

    #[test]
    fn test_fixed_world_ignores_outside_cells() {
        unsafe {
            let automaton = lifecycle::gol_create(
                lifecycle::GOL_TOPOLOGY_FIXED,
                1,
                1,
                lifecycle::GOL_SHAPE_MOORE,
                1,
                0,
            );
            assert_eq!(gol_set_cell(automaton, 20, 0, 1), 0);
            assert_eq!(gol_get_cell(automaton, 20, 0), 0);
            assert_eq!(lifecycle::gol_population(automaton), 0);
            lifecycle::gol_destroy(automaton);
        }
    }

    #[test]
    fn test_tick_blinker() {
        unsafe {
            let automaton = create_conway();
            for x in 9..=11 {
                gol_set_cell(automaton, x, 10, 1);
            }

            assert_eq!(gol_tick(automaton), 0);
            assert_eq!(lifecycle::gol_get_generation(automaton), 1);
            for y in 9..=11 {
                assert_eq!(gol_get_cell(automaton, 10, y), 1);
            }
            assert_eq!(gol_get_cell(automaton, 9, 10), 0);

            assert_eq!(gol_tick(automaton), 0);
            for x in 9..=11 {
                assert_eq!(gol_get_cell(automaton, x, 10), 1);
            }

            lifecycle::gol_destroy(automaton);
        }
    }

    #[test]
    fn test_null_pointer_handling() {
        unsafe {
            assert_eq!(gol_set_cell(ptr::null_mut(), 0, 0, 1), 1);
            assert_eq!(gol_get_cell(ptr::null(), 0, 0), 0);
            assert_eq!(gol_tick(ptr::null_mut()), 1);
        }
    }
}
