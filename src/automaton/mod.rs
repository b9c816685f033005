//! Core automaton logic.
//!
//! The world is an unbounded (or wrapped, or fixed) plane of cells cut into
//! square chunks. Only chunks near live cells are stored, and only those are
//! evaluated each tick. The FFI layer in `ffi/` calls into this module.

pub mod chunk;
pub mod chunk_array;
pub mod config;
pub mod neighbourhood;
pub mod region;
pub mod ruleset;
pub mod side;
pub mod stepping;
pub mod topology;

pub use chunk::{Chunk, NextGeneration, CHUNK_AREA, CHUNK_SIZE};
pub use chunk_array::{ChunkArray, ChunkEvent, ChunkId};
pub use config::AutomatonConfig;
pub use neighbourhood::{Neighbourhood, NeighbourhoodType, Shape};
pub use region::{extract_region, import_region, Region};
pub use ruleset::Ruleset;
pub use side::Side;
pub use stepping::Automaton;
pub use topology::{Bounds, Topology};
