use serde::{Deserialize, Serialize};

use crate::{Board, BoardState, Cell, Pos, Result, RevealOutcome};

impl Board {
    /// Routes a pointer event to the matching board operation and reports
    /// the notifications it produced, in order. Input arriving after the
    /// game ends is dropped, matching the source's gated event loop;
    /// out-of-bounds input still errors.
    pub fn apply(&mut self, input: InputEvent) -> Result<Vec<GameEvent>> {
        use InputEvent::*;

        if self.is_finished() {
            log::debug!("game over, dropping {input:?}");
            return Ok(Vec::new());
        }

        let mut events = Vec::new();
        match input {
            PrimaryClick(pos) => {
                // a primary click on a revealed numbered cell chords,
                // anywhere else it reveals
                let outcome = match self.cell_at(pos)? {
                    Cell::Revealed(count) if count > 0 => self.chord(pos)?,
                    _ => self.reveal(pos)?,
                };
                match outcome {
                    RevealOutcome::HitMine => {
                        events.push(GameEvent::MineRevealed);
                        events.push(GameEvent::GameLost);
                    }
                    RevealOutcome::Won => events.push(GameEvent::GameWon),
                    RevealOutcome::Revealed | RevealOutcome::NoChange => {}
                }
            }
            SecondaryClick(pos) => {
                if self.flag(pos)?.has_update() {
                    events.push(GameEvent::FlagToggled);
                    if self.state() == BoardState::Won {
                        events.push(GameEvent::GameWon);
                    }
                }
            }
        }
        Ok(events)
    }
}

/// Discrete pointer input, already mapped to grid coordinates by the
/// frontend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    PrimaryClick(Pos),
    SecondaryClick(Pos),
}

/// Fire-and-forget notifications for audio or UI frontends. No
/// acknowledgment, no retry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    MineRevealed,
    FlagToggled,
    GameWon,
    GameLost,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoardError, MineField};

    fn board(size: Pos, mines: &[Pos]) -> Board {
        Board::from_minefield(MineField::from_coords(size, mines).unwrap())
    }

    #[test]
    fn secondary_click_toggles_a_flag() {
        let mut board = board((3, 3), &[(2, 2)]);

        let events = board.apply(InputEvent::SecondaryClick((0, 0))).unwrap();

        assert_eq!(events, vec![GameEvent::FlagToggled]);
        assert_eq!(board.cell_at((0, 0)).unwrap(), Cell::Flagged);
    }

    #[test]
    fn primary_click_on_a_mine_reports_loss_events_in_order() {
        let mut board = board((2, 2), &[(0, 0)]);

        let events = board.apply(InputEvent::PrimaryClick((0, 0))).unwrap();

        assert_eq!(events, vec![GameEvent::MineRevealed, GameEvent::GameLost]);
        assert_eq!(board.state(), BoardState::Lost);
    }

    #[test]
    fn primary_click_on_a_numbered_cell_chords() {
        let mut board = board((3, 3), &[(0, 1), (2, 1)]);
        board.apply(InputEvent::PrimaryClick((1, 1))).unwrap();
        board.apply(InputEvent::SecondaryClick((0, 1))).unwrap();
        board.apply(InputEvent::SecondaryClick((2, 1))).unwrap();

        let events = board.apply(InputEvent::PrimaryClick((1, 1))).unwrap();

        assert_eq!(events, vec![GameEvent::GameWon]);
        assert_eq!(board.cell_at((1, 0)).unwrap(), Cell::Revealed(2));
    }

    #[test]
    fn final_flag_reports_the_win_after_the_toggle() {
        let mut board = board((2, 1), &[(0, 0)]);
        board.apply(InputEvent::PrimaryClick((1, 0))).unwrap();

        let events = board.apply(InputEvent::SecondaryClick((0, 0))).unwrap();

        assert_eq!(events, vec![GameEvent::FlagToggled, GameEvent::GameWon]);
    }

    #[test]
    fn input_after_the_game_ends_is_swallowed() {
        let mut board = board((2, 2), &[(0, 0)]);
        board.apply(InputEvent::PrimaryClick((0, 0))).unwrap();

        assert_eq!(board.apply(InputEvent::PrimaryClick((1, 1))).unwrap(), vec![]);
        assert_eq!(board.apply(InputEvent::SecondaryClick((1, 1))).unwrap(), vec![]);
    }

    #[test]
    fn out_of_bounds_input_is_rejected() {
        let mut board = board((2, 2), &[(0, 0)]);

        assert_eq!(
            board.apply(InputEvent::PrimaryClick((5, 5))),
            Err(BoardError::OutOfBounds)
        );
    }

    #[test]
    fn flag_with_spent_budget_emits_nothing() {
        let mut board = board((3, 3), &[(2, 2)]);
        board.apply(InputEvent::SecondaryClick((0, 0))).unwrap();

        let events = board.apply(InputEvent::SecondaryClick((0, 1))).unwrap();

        assert_eq!(events, vec![]);
    }
}
