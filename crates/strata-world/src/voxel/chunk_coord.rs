use serde::{Deserialize, Serialize};
use strata_geom::{Aabb, Vec3};

use super::face::Direction;
use super::layout::{CHUNK_BITS_X, CHUNK_BITS_Y, CHUNK_MASK_X, CHUNK_MASK_Y, CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z};

/// Horizontal position of a chunk column, in chunk units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32) -> Self {
        Self { cx, cy }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
        }
    }

    #[inline]
    pub fn neighbor(self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        self.offset(dx, dy)
    }

    /// World-space block coordinates of the column's minimum corner.
    #[inline]
    pub fn origin(self) -> (i32, i32) {
        (self.cx << CHUNK_BITS_X, self.cy << CHUNK_BITS_Y)
    }

    /// Horizontal center of the column, `(cx * 16 + 8, cy * 16 + 8)`.
    #[inline]
    pub fn center_xy(self) -> (f32, f32) {
        let (x0, y0) = self.origin();
        (
            x0 as f32 + CHUNK_SIZE_X as f32 * 0.5,
            y0 as f32 + CHUNK_SIZE_Y as f32 * 0.5,
        )
    }

    pub fn bounds(self) -> Aabb {
        let (x0, y0) = self.origin();
        let min = Vec3::new(x0 as f32, y0 as f32, 0.0);
        let max = Vec3::new(
            (x0 + CHUNK_SIZE_X as i32) as f32,
            (y0 + CHUNK_SIZE_Y as i32) as f32,
            CHUNK_SIZE_Z as f32,
        );
        Aabb::new(min, max)
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cy)
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.cx, self.cy)
    }
}

#[inline]
pub fn chunk_coord_for_block(gx: i32, gy: i32) -> ChunkCoord {
    ChunkCoord::new(gx >> CHUNK_BITS_X, gy >> CHUNK_BITS_Y)
}

#[inline]
pub fn chunk_coord_for_world(x: f32, y: f32) -> ChunkCoord {
    chunk_coord_for_block(x.floor() as i32, y.floor() as i32)
}

#[inline]
pub fn local_xy_for_block(gx: i32, gy: i32) -> (usize, usize) {
    (gx as usize & CHUNK_MASK_X, gy as usize & CHUNK_MASK_Y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_blocks_floor_toward_negative_chunks() {
        assert_eq!(chunk_coord_for_block(-1, -16), ChunkCoord::new(-1, -1));
        assert_eq!(chunk_coord_for_block(-17, 15), ChunkCoord::new(-2, 0));
        assert_eq!(chunk_coord_for_world(-0.5, 16.0), ChunkCoord::new(-1, 1));
        assert_eq!(local_xy_for_block(-1, -16), (15, 0));
    }

    #[test]
    fn center_and_bounds() {
        let c = ChunkCoord::new(1, -1);
        assert_eq!(c.center_xy(), (24.0, -8.0));
        let b = c.bounds();
        assert_eq!(b.min, Vec3::new(16.0, -16.0, 0.0));
        assert_eq!(b.max, Vec3::new(32.0, 0.0, 128.0));
    }
}
