//! Error taxonomy shared by the automaton core.

use thiserror::Error;

/// Errors raised by the automaton core.
///
/// Every variant is a broken caller contract rather than a recoverable runtime
/// condition, so nothing inside the crate catches and retries them.
#[derive(Debug, Error)]
pub enum AutomatonError {
    /// A constructor or setter received a structurally impossible value.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// An incremental neighbourhood move would leave the current chunk.
    #[error("range error: {0}")]
    Range(&'static str),

    /// An operation ran on a neighbourhood before `move_to` initialised it.
    #[error("logic error: {0}")]
    Logic(&'static str),

    /// A definite chunk reference was requested where no chunk is stored.
    #[error("no chunk stored at ({x}, {y})")]
    ChunkNotFound {
        /// Chunk x coordinate.
        x: i32,
        /// Chunk y coordinate.
        y: i32,
    },

    /// A bounded topology was given a non-positive width or height.
    #[error("topology dimensions out of range: {width}x{height}")]
    InvalidDimensions {
        /// Requested width in chunks.
        width: i32,
        /// Requested height in chunks.
        height: i32,
    },

    /// The worker pool for parallel generation could not be built.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AutomatonError>;
