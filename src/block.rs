use serde::Deserialize;
use std::fmt;

/// Integer board coordinate. `x` grows to the right, `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    /// Creates a point from its coordinates.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// The fixed colour palette of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Colour {
    PacificPoint,
    RealRed,
    OldOlive,
    DaffodilDelight,
}

impl Colour {
    /// Every colour, in palette order.
    pub const ALL: [Colour; 4] = [
        Colour::PacificPoint,
        Colour::RealRed,
        Colour::OldOlive,
        Colour::DaffodilDelight,
    ];

    /// Human-readable name of the colour.
    pub fn name(self) -> &'static str {
        match self {
            Colour::PacificPoint => "Pacific Point",
            Colour::RealRed => "Real Red",
            Colour::OldOlive => "Old Olive",
            Colour::DaffodilDelight => "Daffodil Delight",
        }
    }

    /// Red, green and blue components.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Colour::PacificPoint => (1, 128, 181),
            Colour::RealRed => (199, 44, 58),
            Colour::OldOlive => (138, 151, 71),
            Colour::DaffodilDelight => (255, 211, 92),
        }
    }

    /// Single letter used by the text renderer.
    pub fn letter(self) -> char {
        match self {
            Colour::PacificPoint => 'P',
            Colour::RealRed => 'R',
            Colour::OldOlive => 'O',
            Colour::DaffodilDelight => 'D',
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Position of a child inside its parent.
///
/// `Quadrant::ALL` is the order children are stored in: it walks the quadrants
/// counter-clockwise starting at the upper right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    NE,
    NW,
    SW,
    SE,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Quadrant::NE, Quadrant::NW, Quadrant::SW, Quadrant::SE];

    /// Whether the quadrant lies in the left half.
    pub fn is_west(self) -> bool {
        matches!(self, Quadrant::NW | Quadrant::SW)
    }

    /// Whether the quadrant lies in the top half.
    pub fn is_north(self) -> bool {
        matches!(self, Quadrant::NE | Quadrant::NW)
    }

    /// Top-left corner of this quadrant for a parent at `origin` with children of side `half`.
    pub fn origin(self, origin: Point, half: u32) -> Point {
        Point {
            x: if self.is_west() { origin.x } else { origin.x + half },
            y: if self.is_north() { origin.y } else { origin.y + half },
        }
    }

    /// Quadrant of a parent at `origin` containing `point`.
    pub fn containing(origin: Point, half: u32, point: Point) -> Self {
        let west = point.x < origin.x + half;
        let north = point.y < origin.y + half;
        match (north, west) {
            (true, false) => Quadrant::NE,
            (true, true) => Quadrant::NW,
            (false, true) => Quadrant::SW,
            (false, false) => Quadrant::SE,
        }
    }

    /// Position of the quadrant in `Quadrant::ALL`, which is also its child index.
    pub fn index(self) -> usize {
        match self {
            Quadrant::NE => 0,
            Quadrant::NW => 1,
            Quadrant::SW => 2,
            Quadrant::SE => 3,
        }
    }
}

/// Value stored in every node of the block tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Top-left corner of the square this block covers.
    pub position: Point,
    /// Side length of the square.
    pub size: u32,
    /// Depth from the root, which is level 0.
    pub level: u8,
    /// Only leaves carry a colour.
    pub colour: Option<Colour>,
    /// Set by the human player's selection, ignored by scoring.
    pub highlighted: bool,
}

impl Block {
    /// Creates a coloured leaf.
    pub fn new_leaf(position: Point, size: u32, level: u8, colour: Colour) -> Self {
        Self {
            position,
            size,
            level,
            colour: Some(colour),
            highlighted: false,
        }
    }

    /// Creates a colourless block that will receive four children.
    pub fn new_inner(position: Point, size: u32, level: u8) -> Self {
        Self {
            position,
            size,
            level,
            colour: None,
            highlighted: false,
        }
    }

    /// Whether `point` lies inside the block. The right and bottom edges are excluded.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.position.x
            && point.y >= self.position.y
            && point.x < self.position.x + self.size
            && point.y < self.position.y + self.size
    }
}
