//! Chunk file layout:
//!
//! ```text
//! 0..4   "GCHK"
//! 4      version (1)
//! 5..8   bits x, y, z (4, 4, 7)
//! 8..12  world seed, u32 little-endian
//! 12..   (type, count) pairs in index order, 1 <= count <= 255
//! ```
//!
//! Only block types are stored. Light and flags are rebuilt on activation.

use strata_blocks::Block;
use strata_world::{BLOCKS_PER_CHUNK, CHUNK_BITS_X, CHUNK_BITS_Y, CHUNK_BITS_Z};
use thiserror::Error;

pub const CHUNK_MAGIC: [u8; 4] = *b"GCHK";
pub const CHUNK_FILE_VERSION: u8 = 1;
pub const HEADER_LEN: usize = 12;

const BITS: [u8; 3] = [CHUNK_BITS_X as u8, CHUNK_BITS_Y as u8, CHUNK_BITS_Z as u8];

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("chunk file is {0} bytes, shorter than its header")]
    TooShort(usize),
    #[error("bad signature {0:?}")]
    BadMagic([u8; 4]),
    #[error("unsupported chunk file version {0}")]
    UnsupportedVersion(u8),
    #[error("chunk dimensions {found:?} do not match {expected:?}")]
    DimensionMismatch { found: [u8; 3], expected: [u8; 3] },
    #[error("chunk was saved with seed {found}, world seed is {expected}")]
    SeedMismatch { found: u32, expected: u32 },
    #[error("run payload has odd length {0}")]
    OddPayload(usize),
    #[error("zero-length run at byte {0}")]
    ZeroRun(usize),
    #[error("runs cover {0} blocks, more than a chunk")]
    Overflow(usize),
    #[error("runs cover {0} blocks, fewer than a chunk")]
    Underflow(usize),
}

pub fn encode_chunk(blocks: &[Block], seed: u32) -> Vec<u8> {
    debug_assert_eq!(blocks.len(), BLOCKS_PER_CHUNK);
    let mut out = Vec::with_capacity(HEADER_LEN + 256);
    out.extend_from_slice(&CHUNK_MAGIC);
    out.push(CHUNK_FILE_VERSION);
    out.extend_from_slice(&BITS);
    out.extend_from_slice(&seed.to_le_bytes());

    let mut iter = blocks.iter().map(|b| b.id);
    let Some(mut current) = iter.next() else {
        return out;
    };
    let mut count: u8 = 1;
    for id in iter {
        if id == current && count < u8::MAX {
            count += 1;
        } else {
            out.push(current);
            out.push(count);
            current = id;
            count = 1;
        }
    }
    out.push(current);
    out.push(count);
    out
}

/// Decodes a chunk file written for `expected_seed`. Any header mismatch or a
/// run table that does not cover the chunk exactly is an error.
pub fn decode_chunk(bytes: &[u8], expected_seed: u32) -> Result<Box<[Block]>, CodecError> {
    if bytes.len() < HEADER_LEN {
        return Err(CodecError::TooShort(bytes.len()));
    }
    let magic = [bytes[0], bytes[1], bytes[2], bytes[3]];
    if magic != CHUNK_MAGIC {
        return Err(CodecError::BadMagic(magic));
    }
    if bytes[4] != CHUNK_FILE_VERSION {
        return Err(CodecError::UnsupportedVersion(bytes[4]));
    }
    let dims = [bytes[5], bytes[6], bytes[7]];
    if dims != BITS {
        return Err(CodecError::DimensionMismatch {
            found: dims,
            expected: BITS,
        });
    }
    let seed = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
    if seed != expected_seed {
        return Err(CodecError::SeedMismatch {
            found: seed,
            expected: expected_seed,
        });
    }

    let payload = &bytes[HEADER_LEN..];
    if payload.len() % 2 != 0 {
        return Err(CodecError::OddPayload(payload.len()));
    }
    let mut blocks = Vec::with_capacity(BLOCKS_PER_CHUNK);
    for (i, run) in payload.chunks_exact(2).enumerate() {
        let (id, count) = (run[0], run[1] as usize);
        if count == 0 {
            return Err(CodecError::ZeroRun(HEADER_LEN + i * 2 + 1));
        }
        if blocks.len() + count > BLOCKS_PER_CHUNK {
            return Err(CodecError::Overflow(blocks.len() + count));
        }
        blocks.extend(std::iter::repeat_n(Block::new(id), count));
    }
    if blocks.len() != BLOCKS_PER_CHUNK {
        return Err(CodecError::Underflow(blocks.len()));
    }
    Ok(blocks.into_boxed_slice())
}
