use strata_blocks::{Block, BlockRegistry};
use strata_chunk::{BlockIter, ChunkMap};
use strata_world::{
    BLOCKS_PER_CHUNK, CHUNK_MAX_X, CHUNK_MAX_Y, CHUNK_MAX_Z, CHUNK_SIZE_X, CHUNK_SIZE_Y,
    CHUNK_SIZE_Z, ChunkCoord, Face, pack_local, unpack_local,
};

use crate::LightQueue;

/// Initial lighting pass for a freshly activated chunk.
///
/// Queues the non-opaque shell of the chunk (so light flows in from and out to
/// neighbors), flags sky columns from the top down to the first opaque block,
/// gives sky blocks full outdoor light while queueing their shaded lateral
/// neighbors, and queues every emitter.
pub fn seed_chunk_light(queue: &mut LightQueue, map: &mut ChunkMap, reg: &BlockRegistry, coord: ChunkCoord) {
    if !map.contains(coord) {
        return;
    }

    for index in 0..BLOCKS_PER_CHUNK {
        let (x, y, z) = unpack_local(index);
        let on_shell = x == 0
            || y == 0
            || z == 0
            || x == CHUNK_MAX_X
            || y == CHUNK_MAX_Y
            || z == CHUNK_MAX_Z;
        if on_shell {
            queue.mark_dirty_if_not_opaque(map, reg, BlockIter::new(coord, index));
        }
    }

    let mut sky_blocks = Vec::new();
    if let Some(chunk) = map.get_mut(coord) {
        for y in 0..CHUNK_SIZE_Y {
            for x in 0..CHUNK_SIZE_X {
                for z in (0..CHUNK_SIZE_Z).rev() {
                    let index = pack_local(x, y, z);
                    let block = chunk.block_mut(index);
                    if reg.is_opaque(block.id) {
                        break;
                    }
                    block.set_sky(true);
                    block.set_outdoor_light(Block::MAX_LIGHT);
                    sky_blocks.push(index);
                }
            }
        }
    }

    for index in sky_blocks {
        let it = BlockIter::new(coord, index);
        for face in Face::LATERAL {
            let Some(n) = map.step(it, face) else {
                continue;
            };
            match map.block(n) {
                Some(b) if !b.is_sky() && !reg.is_opaque(b.id) => {
                    queue.mark_dirty(map, n);
                }
                _ => {}
            }
        }
    }

    for index in 0..BLOCKS_PER_CHUNK {
        let it = BlockIter::new(coord, index);
        if map.block(it).is_some_and(|b| reg.emission(b.id) > 0) {
            queue.mark_dirty(map, it);
        }
    }
}
