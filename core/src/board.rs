use std::collections::{HashSet, VecDeque};

use chrono::prelude::*;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::types::ToIndex;
use crate::{
    Area, BoardConfig, BoardError, Cell, Coord, FirstClickPolicy, FlagOutcome, MineField,
    MineGenerator, Pos, RandomGenerator, Result, RevealOutcome, neighbors,
};

/// Valid transitions:
/// - Ready -> Active
/// - Ready -> Won | Lost (first reveal can end the game outright)
/// - Active -> Won | Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardState {
    Ready,
    Active,
    Won,
    Lost,
}

impl BoardState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::Ready
    }
}

/// Owned state of one game from first click to win or loss.
///
/// Mines are placed lazily: the board starts without a [`MineField`] and
/// populates it on the first effective reveal, honoring its
/// [`FirstClickPolicy`]. Every operation validates coordinates and refuses
/// to run once the game has ended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: BoardConfig,
    seed: u64,
    policy: FirstClickPolicy,
    field: Option<MineField>,
    grid: Array2<Cell>,
    revealed_count: Area,
    flags_remaining: Area,
    state: BoardState,
    triggered_mine: Option<Pos>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl Board {
    pub fn new(config: BoardConfig, seed: u64) -> Self {
        Self::with_policy(config, seed, FirstClickPolicy::OpenStart)
    }

    pub fn with_policy(config: BoardConfig, seed: u64, policy: FirstClickPolicy) -> Self {
        let (w, h) = config.size;
        Self {
            config,
            seed,
            policy,
            field: None,
            grid: Array2::default([w as usize, h as usize]),
            revealed_count: 0,
            flags_remaining: config.mines,
            state: BoardState::default(),
            triggered_mine: None,
            started_at: None,
            ended_at: None,
        }
    }

    /// Starts from a fixed placement, skipping lazy population.
    pub fn from_minefield(field: MineField) -> Self {
        let config = BoardConfig::new_unchecked(field.size(), field.mine_count());
        let mut board = Self::with_policy(config, 0, FirstClickPolicy::Anywhere);
        board.field = Some(field);
        board
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn size(&self) -> Pos {
        self.config.size
    }

    pub fn total_mines(&self) -> Area {
        self.config.mines
    }

    pub fn state(&self) -> BoardState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Whether mines have been placed yet. False until the first effective
    /// reveal.
    pub fn is_populated(&self) -> bool {
        self.field.is_some()
    }

    pub fn flags_remaining(&self) -> Area {
        self.flags_remaining
    }

    pub fn revealed_count(&self) -> Area {
        self.revealed_count
    }

    pub fn triggered_mine(&self) -> Option<Pos> {
        self.triggered_mine
    }

    pub fn cell_at(&self, pos: Pos) -> Result<Cell> {
        let pos = self.validate(pos)?;
        Ok(self.grid[pos.to_index()])
    }

    /// All cells with their positions, for renderers.
    pub fn cells(&self) -> impl Iterator<Item = (Pos, Cell)> + '_ {
        self.grid
            .indexed_iter()
            .map(|((x, y), &cell)| ((x as Coord, y as Coord), cell))
    }

    /// Seconds since the first reveal, frozen once the game ends. Zero
    /// before the game starts.
    pub fn elapsed_secs(&self) -> u32 {
        match self.started_at {
            Some(started_at) => (self.ended_at.unwrap_or_else(Utc::now) - started_at)
                .num_seconds()
                .max(0) as u32,
            None => 0,
        }
    }

    /// Reveals a hidden cell.
    ///
    /// Flagged and already-revealed cells are left untouched. Revealing a
    /// mine loses the game and forcibly reveals every mine; revealing a
    /// zero-adjacency cell flood-fills its whole zero region plus the
    /// numbered border.
    pub fn reveal(&mut self, pos: Pos) -> Result<RevealOutcome> {
        let pos = self.validate(pos)?;
        self.check_not_finished()?;

        if self.grid[pos.to_index()] != Cell::Hidden {
            return Ok(RevealOutcome::NoChange);
        }

        self.populate(pos);
        let outcome = self.reveal_cell(pos);
        Ok(self.after_reveal(outcome))
    }

    /// Toggles a flag on a hidden cell, within the flag budget.
    ///
    /// Placing a flag requires `flags_remaining > 0`; removing one always
    /// succeeds. Placing the final flag after every safe cell is revealed
    /// completes the game.
    pub fn flag(&mut self, pos: Pos) -> Result<FlagOutcome> {
        let pos = self.validate(pos)?;
        self.check_not_finished()?;

        let outcome = match self.grid[pos.to_index()] {
            Cell::Hidden if self.flags_remaining == 0 => {
                log::debug!("flag budget spent, ignoring flag at {pos:?}");
                FlagOutcome::NoChange
            }
            Cell::Hidden => {
                self.grid[pos.to_index()] = Cell::Flagged;
                self.flags_remaining -= 1;
                FlagOutcome::Toggled
            }
            Cell::Flagged => {
                self.grid[pos.to_index()] = Cell::Hidden;
                self.flags_remaining += 1;
                FlagOutcome::Toggled
            }
            _ => FlagOutcome::NoChange,
        };

        self.check_win();
        Ok(outcome)
    }

    /// Reveals all hidden neighbors of a revealed numbered cell whose
    /// flagged-neighbor count matches its adjacency count exactly.
    /// Anything else is a no-op.
    pub fn chord(&mut self, pos: Pos) -> Result<RevealOutcome> {
        let pos = self.validate(pos)?;
        self.check_not_finished()?;

        let Cell::Revealed(count) = self.grid[pos.to_index()] else {
            return Ok(RevealOutcome::NoChange);
        };
        if count == 0 || self.flagged_neighbors(pos) != count {
            return Ok(RevealOutcome::NoChange);
        }

        let outcome = neighbors(pos, self.config.size)
            .map(|neighbor| self.reveal_cell(neighbor))
            .reduce(core::ops::BitOr::bitor)
            .unwrap_or(RevealOutcome::NoChange);
        Ok(self.after_reveal(outcome))
    }

    fn validate(&self, pos: Pos) -> Result<Pos> {
        if self.config.contains(pos) {
            Ok(pos)
        } else {
            Err(BoardError::OutOfBounds)
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(BoardError::GameOver)
        } else {
            Ok(())
        }
    }

    fn populate(&mut self, start: Pos) {
        if self.field.is_some() {
            return;
        }
        log::debug!(
            "placing {} mines, first reveal at {start:?}",
            self.config.mines
        );
        let generator = RandomGenerator::new(self.seed, start, self.policy);
        self.field = Some(generator.generate(self.config.size, self.config.mines));
    }

    fn field(&self) -> &MineField {
        self.field.as_ref().expect("populated before any reveal")
    }

    /// Reveals one cell, flood-filling from zero-adjacency cells. No-op on
    /// anything but a hidden cell or once the game is over, so chording can
    /// sweep a whole neighborhood through it.
    fn reveal_cell(&mut self, pos: Pos) -> RevealOutcome {
        if self.state.is_finished() || self.grid[pos.to_index()] != Cell::Hidden {
            return RevealOutcome::NoChange;
        }

        if self.field().contains_mine(pos) {
            self.grid[pos.to_index()] = Cell::Exploded;
            self.triggered_mine = Some(pos);
            self.end_game(false);
            return RevealOutcome::HitMine;
        }

        let count = self.field().adjacent_mines(pos);
        self.grid[pos.to_index()] = Cell::Revealed(count);
        self.revealed_count += 1;
        log::debug!("revealed {pos:?}, adjacency {count}");

        if count == 0 {
            self.flood_from(pos);
        }

        self.mark_started();
        RevealOutcome::Revealed
    }

    /// Iterative breadth-first reveal of the zero region around `origin`
    /// and its numbered border. Each cell is enqueued at most once and
    /// flagged cells are skipped, so the fill never crosses a mine.
    fn flood_from(&mut self, origin: Pos) {
        let bounds = self.config.size;
        let mut visited = HashSet::from([origin]);
        let mut frontier: VecDeque<Pos> = neighbors(origin, bounds)
            .filter(|&pos| self.grid[pos.to_index()] == Cell::Hidden)
            .collect();
        log::trace!(
            "flood-fill from {origin:?}, {} initial neighbors",
            frontier.len()
        );

        while let Some(pos) = frontier.pop_front() {
            if !visited.insert(pos) {
                continue;
            }

            // skip flagged and already revealed cells
            if self.grid[pos.to_index()] != Cell::Hidden {
                continue;
            }

            let count = self.field().adjacent_mines(pos);
            self.grid[pos.to_index()] = Cell::Revealed(count);
            self.revealed_count += 1;
            log::trace!("flood revealed {pos:?}, adjacency {count}");

            if count == 0 {
                frontier.extend(
                    neighbors(pos, bounds)
                        .filter(|&next| self.grid[next.to_index()] == Cell::Hidden)
                        .filter(|next| !visited.contains(next)),
                );
            }
        }
    }

    fn after_reveal(&mut self, outcome: RevealOutcome) -> RevealOutcome {
        self.check_win();
        if self.state == BoardState::Won {
            RevealOutcome::Won
        } else {
            outcome
        }
    }

    /// Win requires the flag budget to be spent: revealing every safe cell
    /// leaves the game active until the last flag is placed.
    fn check_win(&mut self) {
        if self.state.is_finished() {
            return;
        }
        let Some(field) = &self.field else {
            return;
        };
        if self.flags_remaining == 0 && self.revealed_count == field.safe_cells() {
            self.end_game(true);
        }
    }

    fn flagged_neighbors(&self, pos: Pos) -> u8 {
        neighbors(pos, self.config.size)
            .filter(|&n| self.grid[n.to_index()] == Cell::Flagged)
            .count() as u8
    }

    fn mark_started(&mut self) {
        if self.state == BoardState::Ready {
            let now = Utc::now();
            log::debug!("started at {now}");
            self.started_at = Some(now);
            self.state = BoardState::Active;
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        let now = Utc::now();
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
        self.ended_at = Some(now);
        self.state = if won { BoardState::Won } else { BoardState::Lost };
        log::debug!("ended at {now}, won: {won}");

        if !won {
            self.expose_mines();
        }
    }

    /// Forced reveal after a loss: every mine is shown and wrong flags are
    /// marked. The budget of flags sitting on mines is returned so the flag
    /// identity survives the terminal transition.
    fn expose_mines(&mut self) {
        let (w, h) = self.config.size;
        for x in 0..w {
            for y in 0..h {
                let pos = (x, y);
                let mine = self.field().contains_mine(pos);
                match (self.grid[pos.to_index()], mine) {
                    (Cell::Hidden, true) => self.grid[pos.to_index()] = Cell::Mine,
                    (Cell::Flagged, true) => {
                        self.grid[pos.to_index()] = Cell::Mine;
                        self.flags_remaining += 1;
                    }
                    (Cell::Flagged, false) => self.grid[pos.to_index()] = Cell::MisFlagged,
                    _ => {}
                }
            }
        }
    }
}
