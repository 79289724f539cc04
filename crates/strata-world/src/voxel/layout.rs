//! Bit layout of a chunk column. Indices pack as `x | y << 4 | z << 8`.

pub const CHUNK_BITS_X: u32 = 4;
pub const CHUNK_BITS_Y: u32 = 4;
pub const CHUNK_BITS_Z: u32 = 7;

pub const CHUNK_SIZE_X: usize = 1 << CHUNK_BITS_X;
pub const CHUNK_SIZE_Y: usize = 1 << CHUNK_BITS_Y;
pub const CHUNK_SIZE_Z: usize = 1 << CHUNK_BITS_Z;

pub const CHUNK_MASK_X: usize = CHUNK_SIZE_X - 1;
pub const CHUNK_MASK_Y: usize = CHUNK_SIZE_Y - 1;
pub const CHUNK_MASK_Z: usize = CHUNK_SIZE_Z - 1;

pub const CHUNK_MAX_X: usize = CHUNK_SIZE_X - 1;
pub const CHUNK_MAX_Y: usize = CHUNK_SIZE_Y - 1;
pub const CHUNK_MAX_Z: usize = CHUNK_SIZE_Z - 1;

pub const BLOCKS_PER_LAYER: usize = CHUNK_SIZE_X * CHUNK_SIZE_Y;
pub const BLOCKS_PER_CHUNK: usize = BLOCKS_PER_LAYER * CHUNK_SIZE_Z;

pub const SEA_LEVEL: i32 = (CHUNK_SIZE_Z / 2) as i32;

#[inline]
pub const fn pack_local(x: usize, y: usize, z: usize) -> usize {
    x | (y << CHUNK_BITS_X) | (z << (CHUNK_BITS_X + CHUNK_BITS_Y))
}

#[inline]
pub const fn unpack_local(index: usize) -> (usize, usize, usize) {
    (
        index & CHUNK_MASK_X,
        (index >> CHUNK_BITS_X) & CHUNK_MASK_Y,
        (index >> (CHUNK_BITS_X + CHUNK_BITS_Y)) & CHUNK_MASK_Z,
    )
}

/// Packs signed local coordinates, or `None` when any axis is outside the column.
#[inline]
pub fn try_pack_local(x: i32, y: i32, z: i32) -> Option<usize> {
    let in_range = |v: i32, size: usize| v >= 0 && (v as usize) < size;
    if in_range(x, CHUNK_SIZE_X) && in_range(y, CHUNK_SIZE_Y) && in_range(z, CHUNK_SIZE_Z) {
        Some(pack_local(x as usize, y as usize, z as usize))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_pack_to_extremes() {
        assert_eq!(pack_local(0, 0, 0), 0);
        assert_eq!(
            pack_local(CHUNK_MAX_X, CHUNK_MAX_Y, CHUNK_MAX_Z),
            BLOCKS_PER_CHUNK - 1
        );
        assert_eq!(pack_local(1, 0, 0), 1);
        assert_eq!(pack_local(0, 1, 0), CHUNK_SIZE_X);
        assert_eq!(pack_local(0, 0, 1), BLOCKS_PER_LAYER);
    }

    #[test]
    fn dimensions_match_column_shape() {
        assert_eq!((CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z), (16, 16, 128));
        assert_eq!(BLOCKS_PER_CHUNK, 32768);
        assert_eq!(SEA_LEVEL, 64);
    }

    #[test]
    fn try_pack_rejects_out_of_range() {
        assert_eq!(try_pack_local(-1, 0, 0), None);
        assert_eq!(try_pack_local(0, 16, 0), None);
        assert_eq!(try_pack_local(0, 0, 128), None);
        assert_eq!(try_pack_local(15, 15, 127), Some(BLOCKS_PER_CHUNK - 1));
    }
}
