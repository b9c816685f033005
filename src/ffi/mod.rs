//! C FFI layer for host front-ends.
//!
//! All functions are marked with `#[no_mangle]` and use `extern "C"`.
//! The automaton is handed out as an opaque pointer from `gol_create`.
//!
//! The actual logic is in the `automaton` module. These functions are thin wrappers
//! that handle null checks, pointer safety, and C-to-Rust conversions.

pub mod grid;
pub mod lifecycle;
pub mod region;
pub mod rules;

pub use grid::{gol_get_cell, gol_set_cell, gol_tick};
pub use lifecycle::{
    gol_chunk_count, gol_create, gol_destroy, gol_get_generation, gol_population, gol_reset,
    GOL_SHAPE_MOORE, GOL_SHAPE_VON_NEUMANN, GOL_TOPOLOGY_FIXED, GOL_TOPOLOGY_UNBOUNDED,
    GOL_TOPOLOGY_WRAPPING,
};
pub use region::{gol_extract_region, gol_import_region};
pub use rules::{gol_set_born, gol_set_neighbourhood, gol_set_rulestring, gol_set_survives};
