use serde::{Deserialize, Serialize};

/// Number of lines on each axis of the standard board
pub const BOARD_SIZE: u8 = 19;

/// Highest axis offset (`'s'` on a 19-line board)
pub const MAX_OFFSET: u8 = BOARD_SIZE - 1;

/// Unique identifier for a record in the database
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub String);

impl EntryId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stone color of the player making a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// Color that plays at `index` when turns strictly alternate starting with Black
    #[must_use]
    pub fn for_turn(index: usize) -> Self {
        if index % 2 == 0 {
            Self::Black
        } else {
            Self::White
        }
    }

    /// SGF property letter (`B` or `W`)
    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Self::Black => 'B',
            Self::White => 'W',
        }
    }

    /// Parse an SGF property letter
    #[must_use]
    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'B' => Some(Self::Black),
            'W' => Some(Self::White),
            _ => None,
        }
    }
}

/// An intersection on the 19x19 board, stored as axis offsets from `'a'`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: u8,
    pub y: u8,
}

impl Point {
    /// Create a point from offsets, rejecting anything off the board
    #[must_use]
    pub fn new(x: u8, y: u8) -> Option<Self> {
        (x <= MAX_OFFSET && y <= MAX_OFFSET).then_some(Self { x, y })
    }

    /// Create a point from a pair of lowercase coordinate letters (`'a'..='s'`)
    #[must_use]
    pub fn from_letters(x: char, y: char) -> Option<Self> {
        Self::new(letter_offset(x)?, letter_offset(y)?)
    }

    /// Mirror the x axis: offset `i` maps to `18 - i`
    #[must_use]
    pub fn reflect_x(self) -> Self {
        Self {
            x: MAX_OFFSET - self.x,
            y: self.y,
        }
    }

    /// Mirror the y axis: offset `i` maps to `18 - i`
    #[must_use]
    pub fn reflect_y(self) -> Self {
        Self {
            x: self.x,
            y: MAX_OFFSET - self.y,
        }
    }

    /// Swap the roles of the two axes
    #[must_use]
    pub fn transpose(self) -> Self {
        Self {
            x: self.y,
            y: self.x,
        }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", offset_letter(self.x), offset_letter(self.y))
    }
}

fn letter_offset(c: char) -> Option<u8> {
    if c.is_ascii_lowercase() {
        let offset = c as u8 - b'a';
        (offset <= MAX_OFFSET).then_some(offset)
    } else {
        None
    }
}

fn offset_letter(offset: u8) -> char {
    char::from(b'a' + offset)
}

/// A single move: a stone placed at a point, or a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Move {
    Stone { color: Color, point: Point },
    Pass { color: Color },
}

impl Move {
    /// Build a move from a color and an optional point (`None` is a pass)
    #[must_use]
    pub fn new(color: Color, point: Option<Point>) -> Self {
        match point {
            Some(point) => Self::Stone { color, point },
            None => Self::Pass { color },
        }
    }

    #[must_use]
    pub fn color(&self) -> Color {
        match self {
            Self::Stone { color, .. } | Self::Pass { color } => *color,
        }
    }

    /// Board point, or `None` for a pass
    #[must_use]
    pub fn point(&self) -> Option<Point> {
        match self {
            Self::Stone { point, .. } => Some(*point),
            Self::Pass { .. } => None,
        }
    }

    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass { .. })
    }
}

/// Renders the move as its SGF node text, e.g. `;B[pd]` or `;W[]`
impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stone { color, point } => write!(f, ";{}[{point}]", color.letter()),
            Self::Pass { color } => write!(f, ";{}[]", color.letter()),
        }
    }
}
