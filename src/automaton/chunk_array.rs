//! Sparse storage of chunks keyed by chunk coordinate.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use slotmap::{new_key_type, SlotMap};
use tracing::trace;

use super::chunk::{in_bounds, Chunk, NextGeneration};
use super::topology::Topology;
use crate::error::{AutomatonError, Result};

new_key_type! {
    /// Stable handle to a chunk stored in a [`ChunkArray`].
    pub struct ChunkId;
}

/// The shared stand-in for every chunk outside the topology.
pub static EMPTY: Chunk = Chunk::frozen();

/// Something a host might want to mirror about the array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChunkEvent {
    Added { x: i32, y: i32 },
    Removed { x: i32, y: i32 },
    /// The chunk's cells changed; `cells` is row-major.
    Changed { x: i32, y: i32, cells: Box<[bool]> },
}

type Observer = Box<dyn FnMut(&ChunkEvent) + Send + Sync>;

/// Result of resolving a chunk coordinate through the topology.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Slot<'a> {
    Stored(&'a Chunk),
    /// Valid but not stored; carries the transformed coordinate.
    Vacant(i32, i32),
    /// Outside the topology.
    Void,
}

/// All stored chunks of an automaton, plus the queue of chunks waiting to be
/// inserted.
///
/// Every coordinate passed in goes through the topology first: wrapped
/// coordinates alias the chunk they wrap onto, and coordinates the topology
/// rejects behave as a permanently empty chunk that is never stored.
pub struct ChunkArray {
    topology: Topology,
    chunks: SlotMap<ChunkId, Chunk>,
    index: HashMap<(i32, i32), ChunkId>,
    queue: BTreeSet<(i32, i32)>,
    ignoring_queue_insertions: bool,
    // Handed out by `get` for invalid coordinates so writes go nowhere.
    placeholder: Chunk,
    observers: Vec<Observer>,
}

impl ChunkArray {
    pub fn new(topology: Topology) -> Self {
        ChunkArray {
            topology,
            chunks: SlotMap::with_key(),
            index: HashMap::new(),
            queue: BTreeSet::new(),
            ignoring_queue_insertions: false,
            placeholder: Chunk::frozen(),
            observers: Vec::new(),
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Number of stored chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Register a callback for chunk additions, removals and changes.
    ///
    /// `Changed` fires from `update_all` and from [`ChunkArray::set_cell`].
    /// Writing through a `&mut Chunk` from `get` or `at_mut` bypasses the
    /// observers; use `set_cell` for edits they should see.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&ChunkEvent) + Send + Sync + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    fn emit(&mut self, event: ChunkEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    fn emit_changed(&mut self, id: ChunkId) {
        if self.observers.is_empty() {
            return;
        }
        if let Some(chunk) = self.chunks.get(id) {
            let event = ChunkEvent::Changed {
                x: chunk.x(),
                y: chunk.y(),
                cells: chunk.cells().into(),
            };
            self.emit(event);
        }
    }

    pub(crate) fn slot(&self, x: i32, y: i32) -> Slot<'_> {
        match self.topology.transform(x, y) {
            None => Slot::Void,
            Some((x, y)) => match self.index.get(&(x, y)) {
                Some(&id) => Slot::Stored(&self.chunks[id]),
                None => Slot::Vacant(x, y),
            },
        }
    }

    /// Handle of the chunk stored at `(x, y)`, if any.
    pub fn id_at(&self, x: i32, y: i32) -> Option<ChunkId> {
        let (x, y) = self.topology.transform(x, y)?;
        self.index.get(&(x, y)).copied()
    }

    fn insert_new(&mut self, x: i32, y: i32) -> ChunkId {
        let id = self.chunks.insert(Chunk::new(x, y));
        self.index.insert((x, y), id);
        trace!(x, y, "chunk inserted");
        if !self.observers.is_empty() {
            self.emit(ChunkEvent::Added { x, y });
        }
        id
    }

    /// The chunk at `(x, y)`, created if the topology allows it.
    ///
    /// Outside the topology this returns a frozen empty chunk that discards
    /// every write.
    pub fn get(&mut self, x: i32, y: i32) -> &mut Chunk {
        let Some((x, y)) = self.topology.transform(x, y) else {
            return &mut self.placeholder;
        };
        let id = match self.index.get(&(x, y)) {
            Some(&id) => id,
            None => self.insert_new(x, y),
        };
        &mut self.chunks[id]
    }

    /// The chunk at `(x, y)`, which must already be stored unless the
    /// coordinate is outside the topology.
    pub fn at(&self, x: i32, y: i32) -> Result<&Chunk> {
        match self.slot(x, y) {
            Slot::Stored(chunk) => Ok(chunk),
            Slot::Vacant(x, y) => Err(AutomatonError::ChunkNotFound { x, y }),
            Slot::Void => Ok(&EMPTY),
        }
    }

    pub fn at_mut(&mut self, x: i32, y: i32) -> Result<&mut Chunk> {
        let Some((x, y)) = self.topology.transform(x, y) else {
            return Ok(&mut self.placeholder);
        };
        match self.index.get(&(x, y)) {
            Some(&id) => Ok(&mut self.chunks[id]),
            None => Err(AutomatonError::ChunkNotFound { x, y }),
        }
    }

    /// The stored chunk at `(x, y)`, if any.
    pub fn chunk_at(&self, x: i32, y: i32) -> Option<&Chunk> {
        match self.slot(x, y) {
            Slot::Stored(chunk) => Some(chunk),
            _ => None,
        }
    }

    pub fn chunk(&self, id: ChunkId) -> Option<&Chunk> {
        self.chunks.get(id)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.id_at(x, y).is_some()
    }

    pub fn has_non_empty(&self, x: i32, y: i32) -> bool {
        self.chunk_at(x, y).is_some_and(|chunk| !chunk.is_empty())
    }

    /// Does any chunk within `reach` chunks of `(x, y)`, other than itself,
    /// hold a live cell?
    pub fn any_non_empty_within(&self, x: i32, y: i32, reach: i32) -> bool {
        ring(reach)
            .filter_map(|(dx, dy)| offset(x, y, dx, dy))
            .any(|(x, y)| self.has_non_empty(x, y))
    }

    /// Insert an empty chunk at `(x, y)` unless one is stored or the topology
    /// rejects the coordinate. Returns whether a chunk was inserted.
    pub fn insert_or_noop(&mut self, x: i32, y: i32) -> bool {
        let Some((x, y)) = self.topology.transform(x, y) else {
            return false;
        };
        if self.index.contains_key(&(x, y)) {
            return false;
        }
        self.insert_new(x, y);
        true
    }

    /// Remove the chunk at `(x, y)`. Returns whether one was stored.
    pub fn erase(&mut self, x: i32, y: i32) -> bool {
        let Some((x, y)) = self.topology.transform(x, y) else {
            return false;
        };
        let Some(id) = self.index.remove(&(x, y)) else {
            return false;
        };
        self.chunks.remove(id);
        trace!(x, y, "chunk erased");
        if !self.observers.is_empty() {
            self.emit(ChunkEvent::Removed { x, y });
        }
        true
    }

    /// Remember `(x, y)` for a later [`ChunkArray::insert_all_in_queue`].
    ///
    /// Does nothing while queue insertions are ignored, or if the chunk is
    /// already stored or outside the topology.
    pub fn queue_for_insertion(&mut self, x: i32, y: i32) {
        if self.ignoring_queue_insertions {
            return;
        }
        if let Some((x, y)) = self.topology.transform(x, y) {
            if !self.index.contains_key(&(x, y)) {
                self.queue.insert((x, y));
            }
        }
    }

    /// Insert every queued chunk that is not stored yet, in coordinate order.
    ///
    /// The queue itself is kept so the caller can still walk it; empty it
    /// with [`ChunkArray::clear_queue`]. Returns the coordinates inserted.
    pub fn insert_all_in_queue(&mut self) -> Vec<(i32, i32)> {
        let queued: Vec<(i32, i32)> = self.queue.iter().copied().collect();
        queued
            .into_iter()
            .filter(|&(x, y)| self.insert_or_noop(x, y))
            .collect()
    }

    /// Coordinates currently queued for insertion.
    pub fn queued(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.queue.iter().copied()
    }

    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }

    /// While set, `queue_for_insertion` drops its input. The tick raises it
    /// while evaluating chunks it has just materialised: they are empty, so
    /// the chunks they reference cannot hold a live cell next generation.
    pub fn set_ignoring_queue_insertions(&mut self, ignoring: bool) {
        self.ignoring_queue_insertions = ignoring;
    }

    pub fn is_ignoring_queue_insertions(&self) -> bool {
        self.ignoring_queue_insertions
    }

    /// Remove every chunk and forget the queue.
    pub fn clear(&mut self) {
        if !self.observers.is_empty() {
            let removed: Vec<(i32, i32)> = self.chunks.values().map(Chunk::coords).collect();
            for (x, y) in removed {
                self.emit(ChunkEvent::Removed { x, y });
            }
        }
        self.chunks.clear();
        self.index.clear();
        self.queue.clear();
        self.ignoring_queue_insertions = false;
    }

    /// Handles of every stored chunk, in storage order.
    pub fn ids(&self) -> Vec<ChunkId> {
        self.chunks.keys().collect()
    }

    /// Coordinates of every stored chunk, in storage order.
    pub fn coordinates(&self) -> Vec<(i32, i32)> {
        self.chunks.values().map(Chunk::coords).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChunkId, &Chunk)> {
        self.chunks.iter()
    }

    /// Cell `(x, y)` of chunk `(chunk_x, chunk_y)`. `None` if no chunk is
    /// stored there; outside the topology every cell reads dead.
    pub fn cell_at(&self, chunk_x: i32, chunk_y: i32, x: i32, y: i32) -> Result<Option<bool>> {
        if !in_bounds(x, y) {
            return Err(AutomatonError::InvalidArgument(
                "cell coordinates must lie in [0, CHUNK_SIZE)",
            ));
        }
        Ok(match self.slot(chunk_x, chunk_y) {
            Slot::Stored(chunk) => Some(chunk.alive_at(x, y)),
            Slot::Vacant(..) => None,
            Slot::Void => Some(false),
        })
    }

    /// Set cell `(x, y)` of chunk `(chunk_x, chunk_y)`, creating the chunk if
    /// needed. Writes outside the topology are dropped.
    pub fn set_cell(&mut self, chunk_x: i32, chunk_y: i32, x: i32, y: i32, alive: bool) -> Result<()> {
        if !in_bounds(x, y) {
            return Err(AutomatonError::InvalidArgument(
                "cell coordinates must lie in [0, CHUNK_SIZE)",
            ));
        }
        if !alive && !self.contains(chunk_x, chunk_y) {
            return Ok(());
        }
        if self.get(chunk_x, chunk_y).set_cell(x, y, alive)? {
            if let Some(id) = self.id_at(chunk_x, chunk_y) {
                self.emit_changed(id);
            }
        }
        Ok(())
    }

    pub(crate) fn stage(&mut self, id: ChunkId, next: NextGeneration) {
        if let Some(chunk) = self.chunks.get_mut(id) {
            chunk.stage(next);
        }
    }

    /// Commit every chunk's staged generation. Returns how many changed.
    pub fn update_all(&mut self) -> usize {
        let mut changed = Vec::new();
        for (id, chunk) in self.chunks.iter_mut() {
            if chunk.update() {
                changed.push(id);
            }
        }
        if !self.observers.is_empty() {
            for &id in &changed {
                self.emit_changed(id);
            }
        }
        changed.len()
    }

    /// Total live cells across every stored chunk.
    pub fn population(&self) -> u64 {
        self.chunks
            .values()
            .map(|chunk| u64::from(chunk.live_count()))
            .sum()
    }

    /// Restore the frontier: drop empty chunks with no live chunk within
    /// `reach`, and make sure every chunk within `reach` of a live one is
    /// stored. Returns `(inserted, erased)`.
    pub fn refresh_frontier(&mut self, reach: i32) -> (usize, usize) {
        let mut inserted = 0;
        let mut erased = 0;
        for (x, y) in self.coordinates() {
            let Some(chunk) = self.chunk_at(x, y) else {
                continue;
            };
            if chunk.is_empty() {
                if !self.any_non_empty_within(x, y, reach) && self.erase(x, y) {
                    erased += 1;
                }
            } else {
                for (nx, ny) in ring(reach).filter_map(|(dx, dy)| offset(x, y, dx, dy)) {
                    if self.insert_or_noop(nx, ny) {
                        inserted += 1;
                    }
                }
            }
        }
        (inserted, erased)
    }
}

/// `(x + dx, y + dy)`, or `None` past the edge of `i32` chunk space. Such
/// chunks read as permanently empty and are never stored.
#[inline]
pub(crate) fn offset(x: i32, y: i32, dx: i32, dy: i32) -> Option<(i32, i32)> {
    Some((x.checked_add(dx)?, y.checked_add(dy)?))
}

/// Offsets of every chunk within `reach`, excluding `(0, 0)`.
fn ring(reach: i32) -> impl Iterator<Item = (i32, i32)> {
    (-reach..=reach)
        .flat_map(move |dy| (-reach..=reach).map(move |dx| (dx, dy)))
        .filter(|&offset| offset != (0, 0))
}

impl fmt::Debug for ChunkArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkArray")
            .field("topology", &self.topology)
            .field("chunks", &self.chunks.len())
            .field("queued", &self.queue.len())
            .field("ignoring_queue_insertions", &self.ignoring_queue_insertions)
            .field("observers", &self.observers.len())
            .finish()
    }
}
