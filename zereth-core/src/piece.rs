//! Piece catalog: colors, kinds, strength order and per-player quotas.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Side identifier. Gold sets up on rows 1-2 and moves first.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Color {
    Gold = 0,
    Silver = 1,
}

impl Color {
    /// Get the opposing color.
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::Gold => Color::Silver,
            Color::Silver => Color::Gold,
        }
    }

    /// The two rows (x values) this color fills during positioning.
    #[inline]
    pub fn home_rows(self) -> [u8; 2] {
        match self {
            Color::Gold => [1, 2],
            Color::Silver => [7, 8],
        }
    }

    /// The row a rabbit of this color must reach to win.
    #[inline]
    pub fn goal_row(self) -> u8 {
        match self {
            Color::Gold => 8,
            Color::Silver => 1,
        }
    }

    /// Both colors, Gold first.
    pub fn all() -> impl Iterator<Item = Color> {
        [Color::Gold, Color::Silver].into_iter()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Gold => f.write_str("gold"),
            Color::Silver => f.write_str("silver"),
        }
    }
}

/// Piece kind, ordered weakest to strongest so the derived `Ord` matches
/// the strength order.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum PieceKind {
    Rabbit = 1,
    Cat = 2,
    Dog = 3,
    Horse = 4,
    Camel = 5,
    Elephant = 6,
}

impl PieceKind {
    /// Strength value: Elephant = 6 down to Rabbit = 1.
    #[inline]
    pub fn strength(self) -> u8 {
        self as u8
    }

    /// How many pieces of this kind each player owns.
    #[inline]
    pub fn quota(self) -> u8 {
        match self {
            PieceKind::Elephant | PieceKind::Camel => 1,
            PieceKind::Horse | PieceKind::Dog | PieceKind::Cat => 2,
            PieceKind::Rabbit => 8,
        }
    }

    /// Check if this kind is strictly stronger than another.
    #[inline]
    pub fn is_stronger_than(self, other: PieceKind) -> bool {
        self.strength() > other.strength()
    }

    /// Single-letter notation (M is the camel).
    pub fn letter(self) -> char {
        match self {
            PieceKind::Elephant => 'E',
            PieceKind::Camel => 'M',
            PieceKind::Horse => 'H',
            PieceKind::Dog => 'D',
            PieceKind::Cat => 'C',
            PieceKind::Rabbit => 'R',
        }
    }

    /// Parse a notation letter, case-insensitive.
    pub fn from_letter(letter: char) -> Option<PieceKind> {
        match letter.to_ascii_uppercase() {
            'E' => Some(PieceKind::Elephant),
            'M' => Some(PieceKind::Camel),
            'H' => Some(PieceKind::Horse),
            'D' => Some(PieceKind::Dog),
            'C' => Some(PieceKind::Cat),
            'R' => Some(PieceKind::Rabbit),
            _ => None,
        }
    }

    /// All kinds in catalog order, strongest first.
    pub fn all() -> impl Iterator<Item = PieceKind> {
        [
            PieceKind::Elephant,
            PieceKind::Camel,
            PieceKind::Horse,
            PieceKind::Dog,
            PieceKind::Cat,
            PieceKind::Rabbit,
        ]
        .into_iter()
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::Elephant => "elephant",
            PieceKind::Camel => "camel",
            PieceKind::Horse => "horse",
            PieceKind::Dog => "dog",
            PieceKind::Cat => "cat",
            PieceKind::Rabbit => "rabbit",
        };
        f.write_str(name)
    }
}

/// A game piece.
///
/// `id` tells apart pieces of the same kind and color (the two horses are
/// ids 1 and 2). Equality is structural over all three fields; there is no
/// separate identity.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub id: u8,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, color: Color, id: u8) -> Piece {
        Piece { kind, color, id }
    }

    /// Check if this piece is strictly stronger than another by kind.
    #[inline]
    pub fn is_stronger_than(&self, other: &Piece) -> bool {
        self.kind.is_stronger_than(other.kind)
    }

    #[inline]
    pub fn is_ally_of(&self, other: &Piece) -> bool {
        self.color == other.color
    }

    #[inline]
    pub fn is_rabbit(&self) -> bool {
        self.kind == PieceKind::Rabbit
    }

    /// Check that `id` falls within the quota for this kind.
    #[inline]
    pub fn in_catalog(&self) -> bool {
        self.id >= 1 && self.id <= self.kind.quota()
    }

    /// Notation token: kind letter (uppercase for Gold) followed by id.
    pub fn notation(&self) -> String {
        let letter = match self.color {
            Color::Gold => self.kind.letter(),
            Color::Silver => self.kind.letter().to_ascii_lowercase(),
        };
        format!("{}{}", letter, self.id)
    }

    /// Parse a notation token such as `R3` or `h1`.
    pub fn from_notation(token: &str) -> Option<Piece> {
        let mut chars = token.chars();
        let letter = chars.next()?;
        let kind = PieceKind::from_letter(letter)?;
        let color = if letter.is_ascii_uppercase() { Color::Gold } else { Color::Silver };
        let id: u8 = chars.as_str().parse().ok()?;
        let piece = Piece::new(kind, color, id);
        piece.in_catalog().then_some(piece)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} #{}", self.color, self.kind, self.id)
    }
}

/// Total pieces per player (1 + 1 + 2 + 2 + 2 + 8).
pub const PIECES_PER_PLAYER: usize = 16;

/// Every piece a color owns, in catalog order.
pub fn catalog(color: Color) -> impl Iterator<Item = Piece> {
    PieceKind::all()
        .flat_map(move |kind| (1..=kind.quota()).map(move |id| Piece::new(kind, color, id)))
}
