use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// State of a single board position.
///
/// The cell never holds a reference to its board, neighbors are looked up by position through
/// [`Board::neighbors_of`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    row: Coord,
    col: Coord,
    mine: bool,
    revealed: bool,
    flagged: bool,
    adjacent_mines: u8,
}

impl Cell {
    pub(crate) const fn new((row, col): Coord2) -> Self {
        Self {
            row,
            col,
            mine: false,
            revealed: false,
            flagged: false,
            adjacent_mines: 0,
        }
    }

    pub const fn row(&self) -> Coord {
        self.row
    }

    pub const fn col(&self) -> Coord {
        self.col
    }

    pub const fn pos(&self) -> Coord2 {
        (self.row, self.col)
    }

    pub const fn is_mine(&self) -> bool {
        self.mine
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    /// Number of mines in the Moore neighborhood, 0 to 8.
    pub const fn adjacent_mine_count(&self) -> u8 {
        self.adjacent_mines
    }

    pub const fn status(&self) -> CellStatus {
        use CellStatus::*;
        match (self.revealed, self.flagged, self.mine) {
            (false, false, _) => Hidden,
            (false, true, _) => Flagged,
            (true, _, true) => Exploded,
            (true, _, false) if self.adjacent_mines == 0 => Blank,
            (true, _, false) => Numbered(self.adjacent_mines),
        }
    }

    pub const fn appearance(&self) -> Appearance {
        self.status().appearance()
    }

    /// Flips the flag, returns whether anything changed. Revealed cells keep no flag.
    pub(crate) fn toggle_flag(&mut self) -> bool {
        if self.revealed {
            return false;
        }
        self.flagged = !self.flagged;
        true
    }

    /// Reveals regardless of the flag, the flag is dropped. Returns whether anything changed.
    pub(crate) fn force_reveal(&mut self) -> bool {
        if self.revealed {
            return false;
        }
        self.revealed = true;
        self.flagged = false;
        true
    }

    pub(crate) fn set_mine(&mut self, mine: bool) {
        self.mine = mine;
    }

    pub(crate) fn set_adjacent_mines(&mut self, count: u8) {
        self.adjacent_mines = count;
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::new(self.pos());
    }
}

/// Player-visible state of a cell, a pure function of the cell fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellStatus {
    Hidden,
    Flagged,
    Blank,
    Numbered(u8),
    Exploded,
}

impl CellStatus {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Blank | Self::Numbered(_) | Self::Exploded)
    }

    pub const fn appearance(self) -> Appearance {
        use CellStatus::*;
        match self {
            Hidden => Appearance::new(Glyph::Empty, Color::Grey),
            Flagged => Appearance::new(Glyph::Flag, Color::Yellow),
            Blank => Appearance::new(Glyph::Empty, Color::White),
            Numbered(count) => Appearance::new(Glyph::Count(count), Color::White),
            Exploded => Appearance::new(Glyph::Explosion, Color::Red),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    pub glyph: Glyph,
    pub color: Color,
}

impl Appearance {
    pub const fn new(glyph: Glyph, color: Color) -> Self {
        Self { glyph, color }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Glyph {
    Empty,
    Flag,
    Count(u8),
    Explosion,
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str(" "),
            Self::Flag => f.write_str("\u{1F6A9}"),
            Self::Count(count) => write!(f, "{count}"),
            Self::Explosion => f.write_str("\u{1F4A5}"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Grey,
    Yellow,
    White,
    Red,
}

impl Color {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Grey => "grey",
            Self::Yellow => "yellow",
            Self::White => "white",
            Self::Red => "red",
        }
    }
}
