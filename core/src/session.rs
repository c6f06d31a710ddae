use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - InProgress -> Defeat
/// - InProgress -> Victory
///
/// A new round always starts over from InProgress.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    InProgress,
    Defeat,
    Victory,
}

impl Outcome {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Defeat | Self::Victory)
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Self::InProgress
    }
}

/// One game from configuration to outcome, the only thing a UI talks to.
///
/// Derived state (outcome, remaining mines) is recomputed right after every command that changes
/// the board.
#[derive(Clone, Debug)]
pub struct GameSession<G = RandomMineGenerator> {
    board: Board,
    generator: G,
    timer: GameTimer,
    outcome: Outcome,
    round: u32,
}

impl<G: MineGenerator> GameSession<G> {
    /// Builds the board for `config` and starts the first round.
    pub fn new(config: GameConfig, mut generator: G) -> Result<Self> {
        let board = Self::fresh_board(config, &mut generator)?;
        let mut session = Self {
            board,
            generator,
            timer: GameTimer::new(),
            outcome: Outcome::InProgress,
            round: 0,
        };
        session.start_round();
        Ok(session)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &GameConfig {
        self.board.config()
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.timer.elapsed_secs()
    }

    pub fn total_mines(&self) -> CellCount {
        self.board.total_mines()
    }

    /// Mines minus flags, negative when the player flags more cells than there are mines.
    pub fn remaining_mines(&self) -> i32 {
        i32::from(self.board.total_mines()) - i32::from(self.board.flagged_count())
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<&Cell> {
        self.board.cell(coords)
    }

    /// Replaces the board with one for `config` and starts a new round.
    ///
    /// The new board is complete before it replaces the old one, on error nothing changes.
    pub fn rebuild(&mut self, config: GameConfig) -> Result<()> {
        self.board = Self::fresh_board(config, &mut self.generator)?;
        log::debug!(
            "Rebuilt board {}x{} at {}%",
            config.rows(),
            config.cols(),
            config.mine_ratio()
        );
        self.start_round();
        Ok(())
    }

    /// Same configuration, new mines. On error the current round carries on as it was.
    pub fn new_round(&mut self) -> Result<()> {
        self.board.reset(&mut self.generator)?;
        self.start_round();
        Ok(())
    }

    /// Validates the settings form and rebuilds; a rejected form leaves the current round alone.
    pub fn update_config(&mut self, form: &SettingsForm) -> Result<()> {
        let config = form.validate().inspect_err(|err| {
            log::warn!("Rejected configuration: {}", err);
        })?;
        self.rebuild(config)
    }

    /// Pure reveal. Revealed cells are not chorded from here, see [`Self::right_click`].
    pub fn left_click(&mut self, coords: Coord2) -> Result<MoveOutcome> {
        let coords = self.board.validate_coords(coords)?;
        if self.outcome.is_terminal() {
            return Ok(MoveOutcome::NoChange);
        }

        let revealed = self.board.reveal(coords)?;
        Ok(self.after_reveal(revealed))
    }

    /// Toggles the flag on an unrevealed cell, or chords a revealed numbered cell whose flagged
    /// neighbors match its count.
    pub fn right_click(&mut self, coords: Coord2) -> Result<MoveOutcome> {
        let coords = self.board.validate_coords(coords)?;
        if self.outcome.is_terminal() {
            return Ok(MoveOutcome::NoChange);
        }

        let marked = if self.board.toggle_flag(coords)? {
            MoveOutcome::Marked
        } else {
            MoveOutcome::NoChange
        };

        let chorded = if self.board[coords].is_revealed() {
            let revealed = self.board.chord_reveal(coords)?;
            self.after_reveal(revealed)
        } else {
            MoveOutcome::NoChange
        };

        Ok(marked | chorded)
    }

    /// Tick the collaborator should schedule one second from now, `None` once the round ended.
    pub fn next_tick(&self) -> Option<TickHandle> {
        self.timer.next_tick()
    }

    /// Counts a second if `handle` is still the pending tick.
    pub fn tick(&mut self, handle: TickHandle) -> bool {
        !self.outcome.is_terminal() && self.timer.tick(handle)
    }

    pub fn snapshot(&self) -> SessionView {
        SessionView::new(self)
    }

    fn fresh_board(config: GameConfig, generator: &mut G) -> Result<Board> {
        let mut board = Board::build(config);
        board.reset(generator)?;
        Ok(board)
    }

    fn start_round(&mut self) {
        self.outcome = Outcome::InProgress;
        self.round += 1;
        self.timer.restart();
        log::debug!(
            "Round {} started with {} mines",
            self.round,
            self.board.total_mines()
        );
    }

    fn after_reveal(&mut self, revealed: CellCount) -> MoveOutcome {
        if revealed == 0 {
            return MoveOutcome::NoChange;
        }

        match self.evaluate() {
            Outcome::InProgress => MoveOutcome::Revealed,
            Outcome::Defeat => MoveOutcome::HitMine,
            Outcome::Victory => MoveOutcome::Won,
        }
    }

    /// Recomputes the outcome from the cells, stopping the timer on the first terminal state.
    fn evaluate(&mut self) -> Outcome {
        if self.outcome.is_terminal() {
            return self.outcome;
        }

        // an exploded mine wins over a fully revealed board
        let outcome = if self.board.has_exploded() {
            Outcome::Defeat
        } else if self.board.all_safe_revealed() {
            Outcome::Victory
        } else {
            Outcome::InProgress
        };

        if outcome.is_terminal() {
            self.outcome = outcome;
            self.timer.stop();
            log::info!(
                "Round {} ended in {:?} after {}s",
                self.round,
                outcome,
                self.timer.elapsed_secs()
            );
        }
        outcome
    }
}
