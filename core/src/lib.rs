#![cfg_attr(not(test), no_std)]

extern crate alloc;

use core::ops::BitOr;

pub use board::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use session::*;
pub use settings::*;
pub use timer::*;
pub use types::*;
pub use view::*;

mod board;
mod cell;
mod error;
mod generator;
mod session;
mod settings;
mod timer;
mod types;
mod view;

/// What a single player command did to the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    NoChange,
    Marked,
    Revealed,
    HitMine,
    Won,
}

impl MoveOutcome {
    /// Whether the UI has anything to redraw.
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::HitMine | Self::Won)
    }
}

/// Used to merge outcomes of a compound command such as right-click
impl BitOr for MoveOutcome {
    type Output = MoveOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use MoveOutcome::*;
        match (self, rhs) {
            (HitMine, _) | (_, HitMine) => HitMine,
            (Won, _) | (_, Won) => Won,
            (Revealed, _) | (_, Revealed) => Revealed,
            (Marked, _) | (_, Marked) => Marked,
            (NoChange, NoChange) => NoChange,
        }
    }
}
