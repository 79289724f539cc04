//! Block edits (dig and place) with sky, lighting and mesh invalidation.
#![forbid(unsafe_code)]

use strata_blocks::{AIR_ID, BlockId, BlockRegistry};
use strata_chunk::{BlockIter, ChunkMap};
use strata_lighting::LightQueue;
use strata_world::Face;

/// Marks the edited block's chunk dirty and unsaved, along with the chunks
/// owning its four lateral neighbors.
fn invalidate_around(map: &mut ChunkMap, it: BlockIter) {
    if let Some(chunk) = map.get_mut(it.coord) {
        chunk.mark_mesh_dirty();
        chunk.mark_needs_saving();
    }
    for face in Face::LATERAL {
        if let Some(n) = map.step(it, face) {
            map.mark_mesh_dirty(n.coord);
        }
    }
}

/// Turns a block into air. Returns the id that was removed, or `None` when the
/// chunk is inactive or the block already is air.
///
/// If the block above is sky (or this is the top layer) the opened column
/// becomes sky down to the next opaque block.
pub fn dig_block(
    map: &mut ChunkMap,
    light: &mut LightQueue,
    reg: &BlockRegistry,
    it: BlockIter,
) -> Option<BlockId> {
    let block = map.block_mut(it)?;
    let removed = block.id;
    if removed == AIR_ID {
        return None;
    }
    block.id = AIR_ID;
    invalidate_around(map, it);
    light.mark_dirty(map, it);

    let opened_to_sky = match map.step(it, Face::Up) {
        Some(up) => map.block(up).is_some_and(|b| b.is_sky()),
        None => true,
    };
    if opened_to_sky {
        let mut cursor = Some(it);
        while let Some(cur) = cursor {
            let Some(b) = map.block_mut(cur) else { break };
            if reg.is_opaque(b.id) {
                break;
            }
            b.set_sky(true);
            light.mark_dirty(map, cur);
            cursor = map.step(cur, Face::Down);
        }
    }
    log::debug!(target: "edit", "dug {:?} at {:?}", removed, it.world_pos());
    Some(removed)
}

/// Places `id` into a non-opaque block. Returns `false` when the chunk is
/// inactive, the id is unknown, or the target is opaque.
///
/// An opaque block placed into a sky column shades everything below it down
/// to the next opaque block.
pub fn place_block(
    map: &mut ChunkMap,
    light: &mut LightQueue,
    reg: &BlockRegistry,
    it: BlockIter,
    id: BlockId,
) -> bool {
    if reg.get(id).is_none() {
        return false;
    }
    let Some(block) = map.block_mut(it) else {
        return false;
    };
    if reg.is_opaque(block.id) {
        return false;
    }
    let was_sky = block.is_sky();
    block.id = id;
    invalidate_around(map, it);
    light.mark_dirty(map, it);

    if was_sky && reg.is_opaque(id) {
        if let Some(b) = map.block_mut(it) {
            b.set_sky(false);
        }
        let mut cursor = map.step(it, Face::Down);
        while let Some(cur) = cursor {
            let Some(b) = map.block_mut(cur) else { break };
            if reg.is_opaque(b.id) {
                break;
            }
            b.set_sky(false);
            light.mark_dirty(map, cur);
            cursor = map.step(cur, Face::Down);
        }
    }
    log::debug!(target: "edit", "placed {} at {:?}", id, it.world_pos());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_blocks::Block;
    use strata_chunk::{Chunk, ChunkMesh};
    use strata_lighting::seed_chunk_light;
    use strata_world::{CHUNK_MAX_Z, ChunkCoord, pack_local};

    fn registry() -> BlockRegistry {
        BlockRegistry::builtin().unwrap()
    }

    fn at(coord: ChunkCoord, x: usize, y: usize, z: usize) -> BlockIter {
        BlockIter::new(coord, pack_local(x, y, z))
    }

    fn settle(map: &mut ChunkMap, reg: &BlockRegistry) -> LightQueue {
        let mut queue = LightQueue::new();
        for coord in map.coords() {
            seed_chunk_light(&mut queue, map, reg, coord);
        }
        queue.process(map, reg);
        for coord in map.coords() {
            map.get_mut(coord).unwrap().set_mesh(ChunkMesh::default());
        }
        queue
    }

    /// Stone up to `top` inclusive, air above.
    fn ground(coord: ChunkCoord, stone: BlockId, top: usize) -> Chunk {
        let mut chunk = Chunk::filled(coord, Block::AIR);
        for (i, b) in chunk.blocks_mut().iter_mut().enumerate() {
            if (i >> 8) <= top {
                *b = Block::new(stone);
            }
        }
        chunk
    }

    #[test]
    fn digging_a_border_block_dirties_both_chunks() {
        let reg = registry();
        let stone = reg.id_by_name("stone").unwrap();
        let a = ChunkCoord::new(0, 0);
        let b = ChunkCoord::new(1, 0);
        let mut map = ChunkMap::new();
        map.insert_linked(Chunk::filled(a, Block::new(stone)));
        map.insert_linked(Chunk::filled(b, Block::new(stone)));
        let mut queue = settle(&mut map, &reg);
        assert!(!map.get(a).unwrap().is_mesh_dirty());
        assert!(!map.get(b).unwrap().is_mesh_dirty());

        let wall = at(a, 15, 8, 60);
        assert_eq!(dig_block(&mut map, &mut queue, &reg, wall), Some(stone));
        assert_eq!(map.block(wall).unwrap().id, AIR_ID);
        assert!(map.get(a).unwrap().is_mesh_dirty());
        assert!(map.get(b).unwrap().is_mesh_dirty());
        assert!(map.get(a).unwrap().needs_saving());
        assert!(!map.get(b).unwrap().needs_saving());
        assert!(queue.contains(wall));
        // Buried, so the opening stays out of the sky.
        assert!(!map.block(wall).unwrap().is_sky());

        assert_eq!(dig_block(&mut map, &mut queue, &reg, wall), None);
    }

    #[test]
    fn digging_under_the_sky_opens_the_column() {
        let reg = registry();
        let stone = reg.id_by_name("stone").unwrap();
        let coord = ChunkCoord::new(0, 0);
        let mut map = ChunkMap::new();
        map.insert_linked(ground(coord, stone, 70));
        let mut queue = settle(&mut map, &reg);

        let top = at(coord, 5, 5, 70);
        dig_block(&mut map, &mut queue, &reg, top);
        assert!(map.block(top).unwrap().is_sky());
        queue.process(&mut map, &reg);
        assert_eq!(map.block(top).unwrap().outdoor_light(), 15);

        let next = at(coord, 5, 5, 69);
        dig_block(&mut map, &mut queue, &reg, next);
        queue.process(&mut map, &reg);
        let b = map.block(next).unwrap();
        assert!(b.is_sky());
        assert_eq!(b.outdoor_light(), 15);
    }

    #[test]
    fn digging_the_top_layer_counts_as_open_sky() {
        let reg = registry();
        let stone = reg.id_by_name("stone").unwrap();
        let coord = ChunkCoord::new(0, 0);
        let mut map = ChunkMap::new();
        map.insert_linked(Chunk::filled(coord, Block::new(stone)));
        let mut queue = settle(&mut map, &reg);
        let top = at(coord, 3, 3, CHUNK_MAX_Z);
        dig_block(&mut map, &mut queue, &reg, top);
        assert!(map.block(top).unwrap().is_sky());
    }

    #[test]
    fn placing_an_opaque_block_shades_the_column_below() {
        let reg = registry();
        let stone = reg.id_by_name("stone").unwrap();
        let coord = ChunkCoord::new(0, 0);
        let mut map = ChunkMap::new();
        map.insert_linked(ground(coord, stone, 20));
        let mut queue = settle(&mut map, &reg);

        let roof = at(coord, 5, 5, 100);
        assert!(place_block(&mut map, &mut queue, &reg, roof, stone));
        assert!(!map.block(roof).unwrap().is_sky());
        for z in 21..100 {
            assert!(!map.block(at(coord, 5, 5, z)).unwrap().is_sky(), "z={z}");
        }
        assert!(map.block(at(coord, 5, 5, 101)).unwrap().is_sky());
        queue.process(&mut map, &reg);
        assert_eq!(map.block(at(coord, 5, 5, 99)).unwrap().outdoor_light(), 14);
        assert!(map.get(coord).unwrap().needs_saving());
    }

    #[test]
    fn placing_requires_a_non_opaque_target_and_a_known_id() {
        let reg = registry();
        let stone = reg.id_by_name("stone").unwrap();
        let glow = reg.id_by_name("glowstone").unwrap();
        let coord = ChunkCoord::new(0, 0);
        let mut map = ChunkMap::new();
        map.insert_linked(ground(coord, stone, 20));
        let mut queue = settle(&mut map, &reg);

        assert!(!place_block(&mut map, &mut queue, &reg, at(coord, 1, 1, 20), glow));
        assert!(!place_block(&mut map, &mut queue, &reg, at(coord, 1, 1, 21), 250));
        assert!(!place_block(&mut map, &mut queue, &reg, at(ChunkCoord::new(4, 4), 0, 0, 0), glow));
        assert!(!map.get(coord).unwrap().needs_saving());

        let lamp = at(coord, 1, 1, 21);
        assert!(place_block(&mut map, &mut queue, &reg, lamp, glow));
        queue.process(&mut map, &reg);
        assert_eq!(map.block(lamp).unwrap().indoor_light(), 15);
        assert_eq!(map.block(at(coord, 1, 1, 22)).unwrap().indoor_light(), 14);
    }
}
