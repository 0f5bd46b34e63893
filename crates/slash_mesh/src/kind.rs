//! Kinds of thrown objects

use std::fmt;

/// What a body looks like
///
/// Kinds differ only cosmetically, except that a hazard crossing the player
/// plane while still whole ends the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Banana,
    Apple,
    Pineapple,
    Strawberry,
    Orange,
    /// The hazard
    Bomb,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 6] = [
        Self::Banana,
        Self::Apple,
        Self::Pineapple,
        Self::Strawberry,
        Self::Orange,
        Self::Bomb,
    ];

    /// Every non-hazard kind
    pub const FRUITS: [ObjectKind; 5] = [
        Self::Banana,
        Self::Apple,
        Self::Pineapple,
        Self::Strawberry,
        Self::Orange,
    ];

    #[inline]
    pub fn is_hazard(self) -> bool {
        matches!(self, Self::Bomb)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Banana => "banana",
            Self::Apple => "apple",
            Self::Pineapple => "pineapple",
            Self::Strawberry => "strawberry",
            Self::Orange => "orange",
            Self::Bomb => "bomb",
        }
    }

    /// RGBA of the uncut surface
    pub fn skin_color(self) -> [f32; 4] {
        match self {
            Self::Banana => [1.0, 0.9, 0.0, 1.0],
            Self::Apple => [0.4, 0.8, 0.2, 1.0],
            Self::Pineapple => [0.9, 0.7, 0.1, 1.0],
            Self::Strawberry => [0.85, 0.1, 0.15, 1.0],
            Self::Orange => [1.0, 0.55, 0.05, 1.0],
            Self::Bomb => [0.12, 0.12, 0.14, 1.0],
        }
    }

    /// RGBA used for fragments, which show the inside
    pub fn flesh_color(self) -> [f32; 4] {
        match self {
            Self::Banana => [1.0, 0.98, 0.8, 1.0],
            Self::Apple => [0.98, 0.98, 0.95, 1.0],
            Self::Pineapple => [0.98, 0.93, 0.7, 1.0],
            Self::Strawberry => [1.0, 0.6, 0.6, 1.0],
            Self::Orange => [1.0, 0.75, 0.3, 1.0],
            Self::Bomb => [0.3, 0.3, 0.32, 1.0],
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
