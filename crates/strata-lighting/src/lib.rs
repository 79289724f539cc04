//! Incremental two-channel light propagation over the active chunk map.
//!
//! Every block carries an indoor (emitter) and an outdoor (sky) light level.
//! A block's level is a pure function of its own type, its sky flag, and its
//! six neighbors; the queue re-evaluates dirty blocks and spreads changes
//! until nothing moves.
#![forbid(unsafe_code)]

mod seed;

use std::collections::VecDeque;

use strata_blocks::{Block, BlockRegistry};
use strata_chunk::{BlockIter, ChunkMap};
use strata_world::{ChunkCoord, Face};

pub use seed::seed_chunk_light;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightStats {
    pub processed: usize,
    pub changed: usize,
}

/// FIFO of blocks awaiting recomputation, deduplicated through
/// [`Block::IS_LIGHT_DIRTY`].
#[derive(Default, Debug)]
pub struct LightQueue {
    queue: VecDeque<BlockIter>,
}

impl LightQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn contains(&self, it: BlockIter) -> bool {
        self.queue.contains(&it)
    }

    /// Flags the block and enqueues it, unless it is already queued or its
    /// chunk is not active. Returns whether it was enqueued.
    pub fn mark_dirty(&mut self, map: &mut ChunkMap, it: BlockIter) -> bool {
        let Some(block) = map.block_mut(it) else {
            return false;
        };
        if block.is_light_dirty() {
            return false;
        }
        block.set_light_dirty(true);
        self.queue.push_back(it);
        true
    }

    pub fn mark_dirty_if_not_opaque(
        &mut self,
        map: &mut ChunkMap,
        reg: &BlockRegistry,
        it: BlockIter,
    ) -> bool {
        match map.block(it) {
            Some(b) if !reg.is_opaque(b.id) => self.mark_dirty(map, it),
            _ => false,
        }
    }

    /// Drains the queue completely.
    pub fn process(&mut self, map: &mut ChunkMap, reg: &BlockRegistry) -> LightStats {
        self.process_limit(map, reg, usize::MAX)
    }

    /// Processes at most `max` entries; used for step-by-step debugging.
    pub fn process_limit(&mut self, map: &mut ChunkMap, reg: &BlockRegistry, max: usize) -> LightStats {
        let mut stats = LightStats::default();
        while stats.processed < max {
            let Some(it) = self.queue.pop_front() else {
                break;
            };
            let Some(block) = map.block_mut(it) else {
                continue;
            };
            block.set_light_dirty(false);
            stats.processed += 1;
            if !update_block(map, reg, it) {
                continue;
            }
            stats.changed += 1;
            for face in Face::ALL {
                let Some(n) = map.step(it, face) else {
                    continue;
                };
                map.mark_mesh_dirty(n.coord);
                self.mark_dirty_if_not_opaque(map, reg, n);
            }
        }
        if stats.processed > 0 {
            log::trace!(
                target: "lighting",
                "processed {} light updates ({} changed, {} queued)",
                stats.processed,
                stats.changed,
                self.queue.len()
            );
        }
        stats
    }

    /// Drops queued entries that belong to `coord`, clearing their dirty
    /// flags if the chunk is still present.
    pub fn purge_chunk(&mut self, map: &mut ChunkMap, coord: ChunkCoord) {
        self.queue.retain(|it| it.coord != coord);
        if let Some(chunk) = map.get_mut(coord) {
            for b in chunk.blocks_mut() {
                b.set_light_dirty(false);
            }
        }
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

fn neighbor_max(map: &ChunkMap, it: BlockIter, channel: fn(Block) -> u8) -> u8 {
    Face::ALL
        .iter()
        .filter_map(|&f| map.step(it, f))
        .filter_map(|n| map.block(n))
        .map(channel)
        .max()
        .unwrap_or(0)
}

/// `max(emission, non-opaque ? brightest neighbor - 1 : 0)`.
pub fn compute_indoor(map: &ChunkMap, reg: &BlockRegistry, it: BlockIter) -> u8 {
    let Some(b) = map.block(it) else {
        return 0;
    };
    let emission = reg.emission(b.id);
    if reg.is_opaque(b.id) {
        return emission;
    }
    emission.max(neighbor_max(map, it, Block::indoor_light).saturating_sub(1))
}

/// `max(sky ? 15 : 0, non-opaque ? brightest neighbor - 1 : 0)`.
pub fn compute_outdoor(map: &ChunkMap, reg: &BlockRegistry, it: BlockIter) -> u8 {
    let Some(b) = map.block(it) else {
        return 0;
    };
    let sky = if b.is_sky() { Block::MAX_LIGHT } else { 0 };
    if reg.is_opaque(b.id) {
        return sky;
    }
    sky.max(neighbor_max(map, it, Block::outdoor_light).saturating_sub(1))
}

/// Recomputes both channels; on change writes them and marks the chunk mesh-dirty.
fn update_block(map: &mut ChunkMap, reg: &BlockRegistry, it: BlockIter) -> bool {
    let indoor = compute_indoor(map, reg, it);
    let outdoor = compute_outdoor(map, reg, it);
    let Some(chunk) = map.get_mut(it.coord) else {
        return false;
    };
    let block = chunk.block_mut(it.index);
    if block.indoor_light() == indoor && block.outdoor_light() == outdoor {
        return false;
    }
    block.set_indoor_light(indoor);
    block.set_outdoor_light(outdoor);
    chunk.mark_mesh_dirty();
    true
}
