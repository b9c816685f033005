//! The automaton: a chunk array, a ruleset and the tick that advances them.
//!
//! A tick reads every chunk's current generation and writes each chunk's
//! next generation into a separate buffer, so the generate pass only ever
//! needs a shared borrow of the chunk array. That also lets it fan out across
//! a rayon pool: each worker owns one `Neighbourhood`, and the per-chunk
//! results are committed afterwards in storage order.

use std::collections::BTreeSet;

use rayon::prelude::*;
use tracing::{debug, debug_span, info};

use super::chunk::{NextGeneration, CHUNK_SIZE};
use super::chunk_array::{offset, ChunkArray, ChunkEvent, ChunkId};
use super::config::AutomatonConfig;
use super::neighbourhood::{Neighbourhood, NeighbourhoodType};
use super::ruleset::Ruleset;
use super::side::Side;
use super::topology::Topology;
use crate::error::Result;

const SIZE: i32 = CHUNK_SIZE as i32;

/// Staged next generations plus the chunks the pass wanted but did not find.
type Generated = (Vec<(ChunkId, NextGeneration)>, BTreeSet<(i32, i32)>);

pub struct Automaton {
    chunk_array: ChunkArray,
    ruleset: Ruleset,
    generation: u64,
    thread_pool: Option<rayon::ThreadPool>,
}

impl Automaton {
    /// An empty automaton whose rules never birth or keep anything.
    pub fn new(topology: Topology, neighbourhood_type: NeighbourhoodType) -> Self {
        Automaton::from_parts(topology, Ruleset::new(neighbourhood_type), None)
    }

    pub fn with_ruleset(topology: Topology, ruleset: Ruleset) -> Self {
        Automaton::from_parts(topology, ruleset, None)
    }

    /// Like [`Automaton::with_ruleset`], generating on a worker pool when
    /// `config.threads > 0`.
    pub fn with_config(topology: Topology, ruleset: Ruleset, config: AutomatonConfig) -> Result<Self> {
        let thread_pool = config.build_thread_pool()?;
        Ok(Automaton::from_parts(topology, ruleset, thread_pool))
    }

    fn from_parts(topology: Topology, ruleset: Ruleset, thread_pool: Option<rayon::ThreadPool>) -> Self {
        info!(
            ?topology,
            rules = %ruleset,
            threads = thread_pool.as_ref().map_or(0, |pool| pool.current_num_threads()),
            "automaton created"
        );
        Automaton {
            chunk_array: ChunkArray::new(topology),
            ruleset,
            generation: 0,
            thread_pool,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    pub fn topology(&self) -> &Topology {
        self.chunk_array.topology()
    }

    pub fn chunk_array(&self) -> &ChunkArray {
        &self.chunk_array
    }

    pub fn chunk_array_mut(&mut self) -> &mut ChunkArray {
        &mut self.chunk_array
    }

    pub fn neighbourhood_type(&self) -> NeighbourhoodType {
        *self.ruleset.neighbourhood_type()
    }

    /// Switch neighbourhood type. The rule tables are reset to all-false.
    pub fn set_neighbourhood_type(&mut self, neighbourhood_type: NeighbourhoodType) {
        self.ruleset.set_neighbourhood_type(neighbourhood_type);
        self.chunk_array.refresh_frontier(neighbourhood_type.chunk_reach());
    }

    /// Replace the whole ruleset, neighbourhood type included.
    pub fn set_ruleset(&mut self, ruleset: Ruleset) {
        let reach = ruleset.neighbourhood_type().chunk_reach();
        self.ruleset = ruleset;
        self.chunk_array.refresh_frontier(reach);
    }

    pub fn set_born_with(&mut self, num_neighbours: u32, value: bool) -> Result<()> {
        self.ruleset.set_born_with(num_neighbours, value)
    }

    pub fn set_survives_with(&mut self, num_neighbours: u32, value: bool) -> Result<()> {
        self.ruleset.set_survives_with(num_neighbours, value)
    }

    /// Forget every chunk and restart the generation count.
    pub fn reset(&mut self) {
        info!(generation = self.generation, chunks = self.chunk_array.len(), "automaton reset");
        self.chunk_array.clear();
        self.generation = 0;
    }

    /// See [`ChunkArray::subscribe`]; edits through [`Automaton::set_cell`]
    /// are observed.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&ChunkEvent) + Send + Sync + 'static,
    {
        self.chunk_array.subscribe(observer);
    }

    /// Set the cell at world coordinate `(x, y)`. Writes outside a fixed
    /// topology are dropped.
    pub fn set_cell(&mut self, x: i32, y: i32, alive: bool) -> Result<()> {
        let (chunk_x, chunk_y, local_x, local_y) = split_world(x, y);
        self.chunk_array.set_cell(chunk_x, chunk_y, local_x, local_y, alive)
    }

    /// The cell at world coordinate `(x, y)`; dead wherever nothing is stored.
    pub fn cell(&self, x: i32, y: i32) -> bool {
        let (chunk_x, chunk_y, local_x, local_y) = split_world(x, y);
        self.chunk_array
            .chunk_at(chunk_x, chunk_y)
            .is_some_and(|chunk| chunk.alive_at(local_x, local_y))
    }

    pub fn population(&self) -> u64 {
        self.chunk_array.population()
    }

    /// Advance every chunk by one generation.
    pub fn tick(&mut self) -> Result<()> {
        let span = debug_span!("tick", generation = self.generation);
        let _enter = span.enter();

        let ids = self.chunk_array.ids();
        let (staged, missing) = self.generate_chunks(&ids)?;
        for (id, next) in staged {
            self.chunk_array.stage(id, next);
        }
        for (x, y) in missing {
            self.chunk_array.queue_for_insertion(x, y);
        }

        // Chunks referenced across the frontier. What they reference in turn
        // is not queued.
        let inserted = self.chunk_array.insert_all_in_queue();
        let queued: Vec<ChunkId> = self
            .chunk_array
            .queued()
            .filter_map(|(x, y)| self.chunk_array.id_at(x, y))
            .collect();
        self.chunk_array.set_ignoring_queue_insertions(true);
        let generated = self.generate_chunks(&queued).map(|(staged, _)| staged);
        self.chunk_array.set_ignoring_queue_insertions(false);
        self.chunk_array.clear_queue();
        for (id, next) in generated? {
            self.chunk_array.stage(id, next);
        }

        let changed = self.chunk_array.update_all();
        let (grown, pruned) = self
            .chunk_array
            .refresh_frontier(self.neighbourhood_type().chunk_reach());

        self.generation += 1;
        debug!(
            chunks = self.chunk_array.len(),
            inserted = inserted.len(),
            changed,
            grown,
            pruned,
            population = self.chunk_array.population(),
            "tick complete"
        );
        Ok(())
    }

    /// Compute next generations for `ids` against the current state.
    fn generate_chunks(&self, ids: &[ChunkId]) -> Result<Generated> {
        let chunk_array = &self.chunk_array;
        let ruleset = &self.ruleset;
        let neighbourhood_type = *ruleset.neighbourhood_type();

        match &self.thread_pool {
            None => {
                let mut neighbourhood = Neighbourhood::new(chunk_array, neighbourhood_type);
                let mut staged = Vec::new();
                for &id in ids {
                    if let Some(next) = evaluate_chunk(chunk_array, ruleset, &mut neighbourhood, id)? {
                        staged.push((id, next));
                    }
                }
                Ok((staged, neighbourhood.take_missing()))
            }
            Some(pool) => pool.install(|| -> Result<Generated> {
                let results = ids
                    .par_iter()
                    .map_init(
                        || Neighbourhood::new(chunk_array, neighbourhood_type),
                        |neighbourhood, &id| {
                            let next = evaluate_chunk(chunk_array, ruleset, neighbourhood, id)?;
                            Ok((id, next, neighbourhood.take_missing()))
                        },
                    )
                    .collect::<Result<Vec<_>>>()?;

                let mut staged = Vec::with_capacity(results.len());
                let mut missing = BTreeSet::new();
                for (id, next, wanted) in results {
                    if let Some(next) = next {
                        staged.push((id, next));
                    }
                    missing.extend(wanted);
                }
                Ok((staged, missing))
            }),
        }
    }
}

/// Evaluate one chunk, or return `None` if it cannot change this generation.
fn evaluate_chunk(
    chunk_array: &ChunkArray,
    ruleset: &Ruleset,
    neighbourhood: &mut Neighbourhood<'_>,
    id: ChunkId,
) -> Result<Option<NextGeneration>> {
    let Some(chunk) = chunk_array.chunk(id) else {
        return Ok(None);
    };
    let neighbourhood_type = ruleset.neighbourhood_type();
    let mut next = NextGeneration::new();

    if !chunk.is_empty() {
        chunk.generate(ruleset, neighbourhood, &mut next)?;
        return Ok(Some(next));
    }

    let (x, y) = chunk.coords();
    let reach = neighbourhood_type.chunk_reach();
    if reach > 1 {
        if !chunk_array.any_non_empty_within(x, y, reach) {
            return Ok(None);
        }
        chunk.generate(ruleset, neighbourhood, &mut next)?;
        return Ok(Some(next));
    }

    let sides = facing_sides(chunk_array, x, y);
    if sides.is_empty() {
        return Ok(None);
    }
    for side in sides {
        chunk.generate_side(
            ruleset,
            neighbourhood,
            side,
            neighbourhood_type.affecting_distance(),
            &mut next,
        )?;
    }
    Ok(Some(next))
}

/// Sides of chunk `(x, y)` that face a non-empty neighbour, corners included.
fn facing_sides(chunk_array: &ChunkArray, x: i32, y: i32) -> Vec<Side> {
    let non_empty = |dx: i32, dy: i32| {
        offset(x, y, dx, dy).is_some_and(|(x, y)| chunk_array.has_non_empty(x, y))
    };
    let mut sides = Vec::with_capacity(4);
    if non_empty(-1, -1) || non_empty(-1, 0) || non_empty(-1, 1) {
        sides.push(Side::Left);
    }
    if non_empty(1, -1) || non_empty(1, 0) || non_empty(1, 1) {
        sides.push(Side::Right);
    }
    if non_empty(-1, -1) || non_empty(0, -1) || non_empty(1, -1) {
        sides.push(Side::Top);
    }
    if non_empty(-1, 1) || non_empty(0, 1) || non_empty(1, 1) {
        sides.push(Side::Bottom);
    }
    sides
}

/// Split a world cell coordinate into chunk and local coordinates.
#[inline]
pub(crate) fn split_world(x: i32, y: i32) -> (i32, i32, i32, i32) {
    (
        x.div_euclid(SIZE),
        y.div_euclid(SIZE),
        x.rem_euclid(SIZE),
        y.rem_euclid(SIZE),
    )
}
