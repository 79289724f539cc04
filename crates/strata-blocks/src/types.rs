pub type BlockId = u8;

pub const AIR_ID: BlockId = 0;

/// A single voxel: type id, packed light byte, and flag bits.
///
/// The light byte stores indoor light in the low nibble and outdoor light in
/// the high nibble. Setters mask to four bits so the values stay in `0..=15`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Block {
    pub id: BlockId,
    pub light: u8,
    pub flags: u8,
}

impl Block {
    pub const AIR: Block = Block {
        id: AIR_ID,
        light: 0,
        flags: 0,
    };

    pub const IS_SKY: u8 = 0b01;
    pub const IS_LIGHT_DIRTY: u8 = 0b10;

    pub const MAX_LIGHT: u8 = 15;

    #[inline]
    pub const fn new(id: BlockId) -> Self {
        Self {
            id,
            light: 0,
            flags: 0,
        }
    }

    #[inline]
    pub fn indoor_light(self) -> u8 {
        self.light & 0x0f
    }

    #[inline]
    pub fn outdoor_light(self) -> u8 {
        self.light >> 4
    }

    #[inline]
    pub fn set_indoor_light(&mut self, v: u8) {
        self.light = (self.light & 0xf0) | (v & 0x0f);
    }

    #[inline]
    pub fn set_outdoor_light(&mut self, v: u8) {
        self.light = (self.light & 0x0f) | ((v & 0x0f) << 4);
    }

    #[inline]
    pub fn is_sky(self) -> bool {
        self.flags & Self::IS_SKY != 0
    }

    #[inline]
    pub fn set_sky(&mut self, on: bool) {
        if on {
            self.flags |= Self::IS_SKY;
        } else {
            self.flags &= !Self::IS_SKY;
        }
    }

    #[inline]
    pub fn is_light_dirty(self) -> bool {
        self.flags & Self::IS_LIGHT_DIRTY != 0
    }

    #[inline]
    pub fn set_light_dirty(&mut self, on: bool) {
        if on {
            self.flags |= Self::IS_LIGHT_DIRTY;
        } else {
            self.flags &= !Self::IS_LIGHT_DIRTY;
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FaceRole {
    Top,
    Bottom,
    Side,
}

/// Cell coordinates on the 64x64 sprite sheet.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SpriteCoords {
    pub x: u8,
    pub y: u8,
}

impl SpriteCoords {
    pub const SHEET_CELLS: u32 = 64;

    /// Plain white cell used by the debug white-blocks view.
    pub const WHITE: SpriteCoords = SpriteCoords { x: 0, y: 4 };

    #[inline]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Normalized `(u0, v0, u1, v1)` for this cell.
    pub fn uv_rect(self) -> [f32; 4] {
        let cell = 1.0 / Self::SHEET_CELLS as f32;
        let u0 = f32::from(self.x) * cell;
        let v0 = f32::from(self.y) * cell;
        [u0, v0, u0 + cell, v0 + cell]
    }
}

impl From<[u8; 2]> for SpriteCoords {
    fn from(value: [u8; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}
