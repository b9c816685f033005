//! Rule table and neighbourhood configuration.

use std::ffi::{c_char, CStr};

use super::lifecycle::neighbourhood_from_raw;
use crate::automaton::{Automaton, Ruleset};

/// Sets whether a dead cell with `num_neighbours` live neighbours is born.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Automaton, or null
///
/// # Returns
/// 0 on success, 1 on failure (null pointer or count above the
/// neighbourhood size)
#[no_mangle]
pub unsafe extern "C" fn gol_set_born(ptr: *mut Automaton, num_neighbours: u32, value: u8) -> i32 {
    if ptr.is_null() {
        return 1;
    }
    match (*ptr).set_born_with(num_neighbours, value != 0) {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

/// Sets whether a live cell with `num_neighbours` live neighbours survives.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Automaton, or null
///
/// # Returns
/// 0 on success, 1 on failure (null pointer or count above the
/// neighbourhood size)
#[no_mangle]
pub unsafe extern "C" fn gol_set_survives(ptr: *mut Automaton, num_neighbours: u32, value: u8) -> i32 {
    if ptr.is_null() {
        return 1;
    }
    match (*ptr).set_survives_with(num_neighbours, value != 0) {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

/// Switches the neighbourhood. Resets both rule tables to all-false.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Automaton, or null
///
/// # Returns
/// 0 on success, 1 on failure (null pointer, unknown shape, or radius < 1)
#[no_mangle]
pub unsafe extern "C" fn gol_set_neighbourhood(ptr: *mut Automaton, shape: u8, radius: i32) -> i32 {
    if ptr.is_null() {
        return 1;
    }
    let Some(neighbourhood_type) = neighbourhood_from_raw(shape, radius) else {
        return 1;
    };
    (*ptr).set_neighbourhood_type(neighbourhood_type);
    0
}

/// Replaces the rule tables from a rulestring such as `B3/S23`, keeping the
/// current neighbourhood.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Automaton, or null
/// - `rule` must be a NUL-terminated string, or null
///
/// # Returns
/// 0 on success, 1 on failure (null pointer, not UTF-8, or unparsable)
#[no_mangle]
pub unsafe extern "C" fn gol_set_rulestring(ptr: *mut Automaton, rule: *const c_char) -> i32 {
    if ptr.is_null() || rule.is_null() {
        return 1;
    }
    let Ok(rule) = CStr::from_ptr(rule).to_str() else {
        return 1;
    };
    let automaton = &mut *ptr;
    match Ruleset::from_rulestring(automaton.neighbourhood_type(), rule) {
        Ok(ruleset) => {
            automaton.set_ruleset(ruleset);
            0
        }
        Err(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::NeighbourhoodType;
    use crate::ffi::lifecycle;
    use std::ptr;

    unsafe fn create() -> *mut Automaton {
        lifecycle::gol_create(
            lifecycle::GOL_TOPOLOGY_UNBOUNDED,
            0,
            0,
            lifecycle::GOL_SHAPE_MOORE,
            1,
            0,
        )
    }

    #[test]
    fn test_set_born_and_survives() {
        unsafe {
            let automaton = create();
            assert_eq!(gol_set_born(automaton, 3, 1), 0);
            assert_eq!(gol_set_survives(automaton, 2, 1), 0);
            assert_eq!(gol_set_survives(automaton, 3, 1), 0);
            assert_eq!((*automaton).ruleset(), &Ruleset::conway());

            assert_eq!(gol_set_born(automaton, 9, 1), 1);
            assert_eq!(gol_set_survives(automaton, 9, 1), 1);
            lifecycle::gol_destroy(automaton);
        }
    }

    #[test]
    fn test_set_neighbourhood_resets_rules() {
        unsafe {
            let automaton = create();
            gol_set_born(automaton, 3, 1);
            assert_eq!(gol_set_neighbourhood(automaton, lifecycle::GOL_SHAPE_MOORE, 2), 0);
            assert_eq!(
                (*automaton).ruleset(),
                &Ruleset::new(NeighbourhoodType::moore(2).unwrap())
            );
            assert_eq!(gol_set_born(automaton, 24, 1), 0);

            assert_eq!(gol_set_neighbourhood(automaton, 5, 2), 1);
            assert_eq!(gol_set_neighbourhood(automaton, lifecycle::GOL_SHAPE_MOORE, 0), 1);
            lifecycle::gol_destroy(automaton);
        }
    }

    #[test]
    fn test_set_rulestring() {
        unsafe {
            let automaton = create();
            assert_eq!(gol_set_rulestring(automaton, c"B3/S23".as_ptr()), 0);
            assert_eq!((*automaton).ruleset(), &Ruleset::conway());
            assert_eq!(gol_set_rulestring(automaton, c"B9/S23".as_ptr()), 1);
            assert_eq!(gol_set_rulestring(automaton, c"nonsense".as_ptr()), 1);
            assert_eq!((*automaton).ruleset(), &Ruleset::conway());
            lifecycle::gol_destroy(automaton);
        }
    }

    #[test]
    fn test_null_pointer_handling() {
        unsafe {
            assert_eq!(gol_set_born(ptr::null_mut(), 3, 1), 1);
            assert_eq!(gol_set_survives(ptr::null_mut(), 3, 1), 1);
            assert_eq!(gol_set_neighbourhood(ptr::null_mut(), 0, 1), 1);
            assert_eq!(gol_set_rulestring(ptr::null_mut(), c"B3/S23".as_ptr()), 1);
            let automaton = create();
            assert_eq!(gol_set_rulestring(automaton, ptr::null()), 1);
            lifecycle::gol_destroy(automaton);
        }
    }
}
