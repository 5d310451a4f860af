use serde::{Deserialize, Serialize};

/// Player-visible state of a single grid cell.
///
/// `Exploded`, `Mine` and `MisFlagged` only appear once the game is lost,
/// when every mine is forcibly revealed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Hidden,
    Flagged,
    /// Revealed safe cell carrying its adjacency count (0-8).
    Revealed(u8),
    /// The mine that ended the game.
    Exploded,
    /// Any other mine, shown after a loss.
    Mine,
    /// A flag that sat on a safe cell, shown after a loss.
    MisFlagged,
}

impl Cell {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }

    /// Whether this cell holds a flag for the budget identity
    /// `flags_remaining + flagged cells == mine count`.
    pub const fn is_flag(self) -> bool {
        matches!(self, Self::Flagged | Self::MisFlagged)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Hidden
    }
}
