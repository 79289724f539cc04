use proptest::prelude::*;
use strata_blocks::Block;
use strata_io::{CodecError, SaveStore, decode_chunk, encode_chunk};
use strata_world::{BLOCKS_PER_CHUNK, ChunkCoord};

/// Chunks built from a handful of runs of random ids and lengths, so long runs
/// (past 255) and single-block runs both show up.
fn run_structured_chunk() -> impl Strategy<Value = Vec<Block>> {
    prop::collection::vec((any::<u8>(), 1usize..2000), 1..60).prop_map(|runs| {
        let mut out = Vec::with_capacity(BLOCKS_PER_CHUNK);
        'fill: loop {
            for (id, len) in &runs {
                for _ in 0..*len {
                    if out.len() == BLOCKS_PER_CHUNK {
                        break 'fill;
                    }
                    out.push(Block::new(*id));
                }
            }
        }
        out
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Decoding what was encoded gives back the same block types
    #[test]
    fn encode_decode_preserves_types(blocks in run_structured_chunk(), seed in any::<u32>()) {
        let bytes = encode_chunk(&blocks, seed);
        let decoded = decode_chunk(&bytes, seed).unwrap();
        prop_assert_eq!(decoded.len(), BLOCKS_PER_CHUNK);
        prop_assert!(decoded.iter().zip(&blocks).all(|(a, b)| a.id == b.id));
        // Every run respects the count bounds.
        prop_assert!(bytes[12..].chunks_exact(2).all(|r| r[1] >= 1));
    }

    // A file written under one seed is refused under any other
    #[test]
    fn foreign_seed_is_rejected(blocks in run_structured_chunk(), seed in any::<u32>(), other in any::<u32>()) {
        prop_assume!(seed != other);
        let bytes = encode_chunk(&blocks, seed);
        prop_assert_eq!(
            decode_chunk(&bytes, other).unwrap_err(),
            CodecError::SeedMismatch { found: seed, expected: other }
        );
    }
}

#[test]
fn store_round_trips_through_the_file_system() {
    let root = std::env::temp_dir().join(format!("strata-io-store-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&root);
    let store = SaveStore::new(&root, 77);
    let coord = ChunkCoord::new(-3, 12);
    assert!(store.chunk_path(coord).ends_with("World_77/Chunk(-3,12).chunk"));
    assert!(!store.has_chunk(coord));

    let blocks: Vec<Block> = (0..BLOCKS_PER_CHUNK).map(|i| Block::new((i % 7) as u8)).collect();
    store.save(coord, &blocks).unwrap();
    assert!(store.has_chunk(coord));
    let loaded = store.load(coord).unwrap();
    assert!(loaded.iter().zip(&blocks).all(|(a, b)| a.id == b.id));

    let other_seed = SaveStore::new(&root, 78);
    std::fs::create_dir_all(other_seed.dir()).unwrap();
    std::fs::copy(store.chunk_path(coord), other_seed.chunk_path(coord)).unwrap();
    assert!(matches!(
        other_seed.load(coord),
        Err(strata_io::SaveError::Corrupt { .. })
    ));
    let _ = std::fs::remove_dir_all(&root);
}
