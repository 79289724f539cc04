/// Cardinal direction between chunk columns. North is +y, east is +x.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North = 0,
    South = 1,
    East = 2,
    West = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    #[inline]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }
}

/// One of the six faces of a block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    East = 0,
    West = 1,
    North = 2,
    South = 3,
    Up = 4,
    Down = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::East,
        Face::West,
        Face::North,
        Face::South,
        Face::Up,
        Face::Down,
    ];

    pub const LATERAL: [Face; 4] = [Face::East, Face::West, Face::North, Face::South];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn opposite(self) -> Face {
        match self {
            Face::East => Face::West,
            Face::West => Face::East,
            Face::North => Face::South,
            Face::South => Face::North,
            Face::Up => Face::Down,
            Face::Down => Face::Up,
        }
    }

    #[inline]
    pub fn offset(self) -> (i32, i32, i32) {
        match self {
            Face::East => (1, 0, 0),
            Face::West => (-1, 0, 0),
            Face::North => (0, 1, 0),
            Face::South => (0, -1, 0),
            Face::Up => (0, 0, 1),
            Face::Down => (0, 0, -1),
        }
    }

    /// Chunk direction crossed when stepping out through this face, if lateral.
    #[inline]
    pub fn direction(self) -> Option<Direction> {
        match self {
            Face::East => Some(Direction::East),
            Face::West => Some(Direction::West),
            Face::North => Some(Direction::North),
            Face::South => Some(Direction::South),
            Face::Up | Face::Down => None,
        }
    }

    /// The face whose outward normal points along `axis` (0, 1, 2) with the given sign.
    #[inline]
    pub fn from_axis(axis: usize, positive: bool) -> Face {
        match (axis, positive) {
            (0, true) => Face::East,
            (0, false) => Face::West,
            (1, true) => Face::North,
            (1, false) => Face::South,
            (_, true) => Face::Up,
            (_, false) => Face::Down,
        }
    }
}
