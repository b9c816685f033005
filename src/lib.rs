//! Chunked Life - an infinite, generalised Game of Life.
//!
//! The plane is cut into square chunks, and only chunks near live cells are
//! stored and evaluated. Rules are any birth/survival table over a Moore or
//! von Neumann neighbourhood of arbitrary radius, and the plane may be
//! unbounded, a fixed rectangle, or a torus.
//!
//! This library also provides a C ABI so a host front-end can drive it.
//!
//! # Module Organization
//! - `automaton`: Core logic (chunks, neighbourhoods, rules, the tick)
//! - `ffi`: C ABI exports (thin wrappers around automaton logic)
//! - `error`: The error type shared by both

pub mod automaton;
pub mod error;
pub mod ffi;

pub use automaton::{
    Automaton, AutomatonConfig, ChunkArray, ChunkEvent, NeighbourhoodType, Ruleset, Topology,
    CHUNK_SIZE,
};
pub use error::{AutomatonError, Result};
