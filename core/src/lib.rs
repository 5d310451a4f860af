//! Minesweeper board core: grid model, lazy mine placement, reveal/flag/chord
//! operations with flood-fill, and win/loss detection. Frontends drive a
//! [`Board`] with [`InputEvent`]s and render from [`Board::cells`]; windowing,
//! audio playback and storage live outside this crate.

use core::ops::BitOr;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use events::*;
pub use generator::*;
pub use minefield::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod events;
mod generator;
mod minefield;
mod types;

/// Board dimensions and mine count.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub size: Pos,
    pub mines: Area,
}

impl BoardConfig {
    pub const fn new_unchecked(size: Pos, mines: Area) -> Self {
        Self { size, mines }
    }

    pub fn new((w, h): Pos, mines: Area) -> Self {
        let w = w.clamp(1, Coord::MAX);
        let h = h.clamp(1, Coord::MAX);
        let mines = mines.clamp(1, area(w, h));
        Self::new_unchecked((w, h), mines)
    }

    pub fn square(side: Coord, mines: Area) -> Self {
        Self::new((side, side), mines)
    }

    pub const fn total_cells(&self) -> Area {
        area(self.size.0, self.size.1)
    }

    pub const fn contains(&self, pos: Pos) -> bool {
        pos.0 < self.size.0 && pos.1 < self.size.1
    }
}

impl Default for BoardConfig {
    /// The original desktop game's board: 20x20 with a 20% mine density.
    fn default() -> Self {
        Self::new_unchecked((20, 20), 80)
    }
}

/// Outcome of a flag toggle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Toggled,
}

impl FlagOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Toggled => true,
        }
    }
}

/// Outcome of revealing one or more cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// Used to merge per-cell outcomes when chording
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            // hitting a mine has priority
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            // then winning
            (Won, _) => Won,
            (_, Won) => Won,
            // then any reveal
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            // and no-change only with both
            (NoChange, NoChange) => NoChange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_clamps_degenerate_values() {
        let config = BoardConfig::new((0, 5), 0);

        assert_eq!(config.size, (1, 5));
        assert_eq!(config.mines, 1);

        let packed = BoardConfig::new((3, 3), 100);
        assert_eq!(packed.mines, 9);
    }

    #[test]
    fn default_config_matches_the_original_board() {
        let config = BoardConfig::default();

        assert_eq!(config.size, (20, 20));
        assert_eq!(config.mines, 80);
        assert_eq!(config.total_cells(), 400);
    }

    #[test]
    fn outcome_merge_prefers_the_decisive_result() {
        use RevealOutcome::*;

        assert_eq!(HitMine | Won, HitMine);
        assert_eq!(NoChange | Revealed, Revealed);
        assert_eq!(Won | Revealed, Won);
        assert_eq!(NoChange | NoChange, NoChange);
    }
}
