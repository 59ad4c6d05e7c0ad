//! Integer grid positions and facings for structure crates.
#![forbid(unsafe_code)]

use core::fmt;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A cell address on the block grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const ORIGIN: BlockPos = BlockPos { x: 0, y: 0, z: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Rotate around the Y axis by `turns` clockwise quarter turns (seen from above).
    /// North (-Z) goes to East (+X); Y is preserved.
    #[inline]
    pub fn rotate_y_cw(self, turns: u8) -> BlockPos {
        match turns & 3 {
            0 => self,
            1 => BlockPos::new(-self.z, self.y, self.x),
            2 => BlockPos::new(-self.x, self.y, -self.z),
            _ => BlockPos::new(self.z, self.y, -self.x),
        }
    }
}

impl Add for BlockPos {
    type Output = BlockPos;
    #[inline]
    fn add(self, rhs: BlockPos) -> BlockPos {
        BlockPos::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for BlockPos {
    #[inline]
    fn add_assign(&mut self, rhs: BlockPos) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for BlockPos {
    type Output = BlockPos;
    #[inline]
    fn sub(self, rhs: BlockPos) -> BlockPos {
        BlockPos::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for BlockPos {
    #[inline]
    fn sub_assign(&mut self, rhs: BlockPos) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Neg for BlockPos {
    type Output = BlockPos;
    #[inline]
    fn neg(self) -> BlockPos {
        BlockPos::new(-self.x, -self.y, -self.z)
    }
}

impl From<[i32; 3]> for BlockPos {
    #[inline]
    fn from(v: [i32; 3]) -> Self {
        BlockPos::new(v[0], v[1], v[2])
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Cardinal facing. North is -Z, East is +X, Up is +Y.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum Facing {
    North,
    South,
    East,
    West,
    Up,
    Down,
}

impl Facing {
    pub const ALL: [Facing; 6] = [
        Facing::North,
        Facing::South,
        Facing::East,
        Facing::West,
        Facing::Up,
        Facing::Down,
    ];

    /// Horizontal facings in clockwise order starting at north.
    pub const HORIZONTAL: [Facing; 4] = [Facing::North, Facing::East, Facing::South, Facing::West];

    #[inline]
    pub fn vector(self) -> BlockPos {
        match self {
            Facing::North => BlockPos::new(0, 0, -1),
            Facing::South => BlockPos::new(0, 0, 1),
            Facing::East => BlockPos::new(1, 0, 0),
            Facing::West => BlockPos::new(-1, 0, 0),
            Facing::Up => BlockPos::new(0, 1, 0),
            Facing::Down => BlockPos::new(0, -1, 0),
        }
    }

    #[inline]
    pub fn opposite(self) -> Facing {
        match self {
            Facing::North => Facing::South,
            Facing::South => Facing::North,
            Facing::East => Facing::West,
            Facing::West => Facing::East,
            Facing::Up => Facing::Down,
            Facing::Down => Facing::Up,
        }
    }

    #[inline]
    pub fn is_horizontal(self) -> bool {
        !matches!(self, Facing::Up | Facing::Down)
    }

    /// Clockwise quarter turns from north, or `None` for vertical facings.
    #[inline]
    pub fn quarter_turns(self) -> Option<u8> {
        match self {
            Facing::North => Some(0),
            Facing::East => Some(1),
            Facing::South => Some(2),
            Facing::West => Some(3),
            Facing::Up | Facing::Down => None,
        }
    }

    /// Clockwise quarter turns needed to go from `self` to `to`.
    #[inline]
    pub fn turns_to(self, to: Facing) -> Option<u8> {
        let a = self.quarter_turns()?;
        let b = to.quarter_turns()?;
        Some((b + 4 - a) & 3)
    }

    /// Rotate a horizontal facing clockwise; vertical facings are unchanged.
    #[inline]
    pub fn rotate_cw(self) -> Facing {
        match self {
            Facing::North => Facing::East,
            Facing::East => Facing::South,
            Facing::South => Facing::West,
            Facing::West => Facing::North,
            v => v,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Facing::North => "north",
            Facing::South => "south",
            Facing::East => "east",
            Facing::West => "west",
            Facing::Up => "up",
            Facing::Down => "down",
        }
    }

    pub fn from_name(s: &str) -> Option<Facing> {
        match s {
            "north" => Some(Facing::North),
            "south" => Some(Facing::South),
            "east" => Some(Facing::East),
            "west" => Some(Facing::West),
            "up" => Some(Facing::Up),
            "down" => Some(Facing::Down),
            _ => None,
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn opposite_is_involution(f in any::<Facing>()) {
            prop_assert_eq!(f.opposite().opposite(), f);
            prop_assert_eq!(f.vector() + f.opposite().vector(), BlockPos::ORIGIN);
        }

        #[test]
        fn name_roundtrips(f in any::<Facing>()) {
            prop_assert_eq!(Facing::from_name(f.name()), Some(f));
        }

        #[test]
        fn rotating_the_vector_matches_rotating_the_facing(f in any::<Facing>()) {
            prop_assume!(f.is_horizontal());
            prop_assert_eq!(f.vector().rotate_y_cw(1), f.rotate_cw().vector());
        }
    }

    #[test]
    fn turns_to_is_none_for_vertical() {
        assert_eq!(Facing::North.turns_to(Facing::Up), None);
        assert_eq!(Facing::Down.turns_to(Facing::East), None);
        assert_eq!(Facing::West.turns_to(Facing::North), Some(1));
        assert_eq!(Facing::South.turns_to(Facing::North), Some(2));
    }
}
