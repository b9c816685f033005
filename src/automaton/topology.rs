//! Chunk-space topologies.
//!
//! All coordinates here are chunk coordinates, not cell coordinates.

use crate::error::{AutomatonError, Result};

/// Width and height of a bounded topology, in chunks. Always positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    width: i32,
    height: i32,
}

impl Bounds {
    pub fn new(width: i32, height: i32) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(AutomatonError::InvalidDimensions { width, height });
        }
        Ok(Bounds { width, height })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }
}

/// How chunks relate to each other in space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topology {
    /// A fixed rectangle of chunks; everything outside is permanently dead.
    Fixed(Bounds),
    /// A torus: coordinates wrap around both axes.
    Wrapping(Bounds),
    /// The infinite plane.
    Unbounded,
}

impl Topology {
    pub fn fixed(width: i32, height: i32) -> Result<Self> {
        Ok(Topology::Fixed(Bounds::new(width, height)?))
    }

    pub fn wrapping(width: i32, height: i32) -> Result<Self> {
        Ok(Topology::Wrapping(Bounds::new(width, height)?))
    }

    pub fn unbounded() -> Self {
        Topology::Unbounded
    }

    /// Is `(x, y)` the coordinate of a real chunk?
    pub fn valid(&self, x: i32, y: i32) -> bool {
        match self {
            Topology::Fixed(bounds) | Topology::Wrapping(bounds) => bounds.contains(x, y),
            Topology::Unbounded => true,
        }
    }

    /// Map a possibly out-of-range coordinate onto the chunk it behaves as.
    ///
    /// `None` means the chunk must be treated as permanently empty and never
    /// stored.
    #[inline]
    pub fn transform(&self, x: i32, y: i32) -> Option<(i32, i32)> {
        match self {
            Topology::Fixed(bounds) => bounds.contains(x, y).then_some((x, y)),
            Topology::Wrapping(bounds) => {
                Some((x.rem_euclid(bounds.width), y.rem_euclid(bounds.height)))
            }
            Topology::Unbounded => Some((x, y)),
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Topology::Fixed(bounds) | Topology::Wrapping(bounds) => Some(*bounds),
            Topology::Unbounded => None,
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.bounds().is_some()
    }
}
