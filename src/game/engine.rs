//! The turn engine: owns the round's state and applies player actions
//!
//! Every action validates against the current state first and then swaps
//! in a freshly built state. A rejected action leaves the state untouched.
//!
//! Turn flow:
//! - Spin: Zero and Bankrupt pass the turn; Points, Double and Plus wait
//!   for the player's next action
//! - Letter guess (Points/Double): a hit scores and the player spins again,
//!   a miss passes the turn
//! - Bonus pick (Plus): opens a letter for free, the player spins again
//! - Word guess (any pending outcome): a match ends the game, a miss passes
//!   the turn
//! - Opening the last letter or matching the word awards the completion
//!   bonus and ends the game

use super::reveal::{opened_count, reveal};
use super::scoring;
use super::{
    normalize_letter, GameState, Outcome, Phase, Player, Word, COMPLETION_BONUS, TABLE_SIZE,
};
use thiserror::Error;
use tracing::{debug, info};

/// Why an action was refused. The state is unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("no game in progress")]
    NoActiveGame,
    #[error("the game is already over")]
    GameAlreadyOver,
    #[error("not now: {phase}")]
    WrongPhase { phase: Phase },
    #[error("letter {0} was already named")]
    LetterAlreadyUsed(char),
    #[error("nothing was entered")]
    EmptyInput,
    #[error("'{0}' is not a single letter")]
    NotALetter(String),
    #[error("it is not your turn")]
    NotYourTurn,
}

/// Result of an accepted spin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinReport {
    pub outcome: Outcome,
    /// True unless the spin passed the turn
    pub continues: bool,
    pub message: String,
}

/// Result of an accepted letter guess, word guess or bonus pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessReport {
    /// The letter was in the word, or the word matched
    pub success: bool,
    /// Positions opened by this action
    pub opened: usize,
    /// Points added to the acting player
    pub points: u32,
    /// The turn passed to the next player
    pub turn_over: bool,
    pub game_over: bool,
    pub message: String,
}

/// Parse a single-letter input, trimming surrounding whitespace.
pub fn parse_letter(input: &str) -> Result<char, ActionError> {
    let trimmed = input.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Err(ActionError::EmptyInput),
        (Some(c), None) if c.is_alphabetic() => Ok(normalize_letter(c)),
        _ => Err(ActionError::NotALetter(trimmed.to_string())),
    }
}

/// Single writer of the round's state.
#[derive(Debug, Default)]
pub struct TurnEngine {
    state: Option<GameState>,
    /// Value of the most recent Points sector spun this game
    last_points: Option<u32>,
}

impl TurnEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a round. Replaces any round in progress.
    ///
    /// Panics if the word is empty or the table doesn't seat 2 to 3
    /// players; callers are expected to check these beforehand.
    pub fn start_game(&mut self, word: Word, players: Vec<Player>) -> &GameState {
        assert!(!word.is_empty(), "secret word must not be empty");
        assert!(
            (2..=TABLE_SIZE).contains(&players.len()),
            "a round needs 2 to {} players, got {}",
            TABLE_SIZE,
            players.len()
        );

        info!(
            letters = word.len(),
            players = players.len(),
            "starting game"
        );
        self.last_points = None;
        self.state.insert(GameState::new(word, players))
    }

    /// Discard the round. Later actions fail with `NoActiveGame`.
    pub fn reset(&mut self) {
        if self.state.take().is_some() {
            info!("game reset");
        }
        self.last_points = None;
    }

    /// The latest state, if a round was started.
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Value of the last Points sector spun this game.
    #[cfg(test)]
    pub fn last_points(&self) -> Option<u32> {
        self.last_points
    }

    /// Apply the outcome of a spin. Only allowed while nothing is pending.
    pub fn apply_spin(&mut self, outcome: Outcome) -> Result<SpinReport, ActionError> {
        let mut next = self.active()?.clone();
        if next.pending_outcome.is_some() {
            return Err(ActionError::WrongPhase {
                phase: next.phase(),
            });
        }

        let index = next.current_player_index;
        let name = next.players[index].name.clone();
        let message = match outcome {
            Outcome::Bankrupt => {
                next.players[index].score = 0;
                pass_turn(&mut next);
                format!("Bankrupt! {} loses every point. Turn passes.", name)
            }
            Outcome::Zero => {
                pass_turn(&mut next);
                format!("Zero. {} skips the turn.", name)
            }
            Outcome::Points(value) => {
                self.last_points = Some(value);
                next.pending_outcome = Some(outcome);
                format!("{} points. Name a letter or the whole word.", value)
            }
            Outcome::Double => {
                next.pending_outcome = Some(outcome);
                "Double! Points will be doubled. Name a letter or the whole word.".to_string()
            }
            Outcome::Bonus => {
                next.pending_outcome = Some(outcome);
                "Plus! Pick any letter to open for free.".to_string()
            }
        };
        next.move_count += 1;

        debug!(player = %name, %outcome, "spin applied");
        self.state = Some(next);

        Ok(SpinReport {
            outcome,
            continues: outcome.continues_turn(),
            message,
        })
    }

    /// Guess a single letter against a pending Points or Double outcome.
    pub fn apply_letter_guess(&mut self, letter: char) -> Result<GuessReport, ActionError> {
        let mut next = self.active()?.clone();
        let outcome = match next.pending_outcome {
            Some(outcome) if outcome.accepts_letter_guess() => outcome,
            _ => {
                return Err(ActionError::WrongPhase {
                    phase: next.phase(),
                })
            }
        };
        let letter = check_letter(&next, letter)?;

        next.used_letters.insert(letter);
        next.move_count += 1;
        let mask = reveal(&next.word.text, &next.revealed_mask, letter);
        let opened = opened_count(&next.revealed_mask, &mask);
        let name = next.current_player().name.clone();

        let report = if opened == 0 {
            pass_turn(&mut next);
            GuessReport {
                success: false,
                opened,
                points: 0,
                turn_over: true,
                game_over: false,
                message: format!("No letter {}. Turn passes.", letter),
            }
        } else {
            next.revealed_mask = mask;
            if next.is_fully_revealed() {
                finish(&mut next);
                GuessReport {
                    success: true,
                    opened,
                    points: COMPLETION_BONUS,
                    turn_over: true,
                    game_over: true,
                    message: format!(
                        "Letter {} completes the word! {} wins {} points.",
                        letter, name, COMPLETION_BONUS
                    ),
                }
            } else {
                let points = scoring::score(outcome, self.last_points, opened);
                award(&mut next, points);
                next.pending_outcome = None;
                GuessReport {
                    success: true,
                    opened,
                    points,
                    turn_over: false,
                    game_over: false,
                    message: format!(
                        "Letter {} opens {}! +{} points. Spin again.",
                        letter, opened, points
                    ),
                }
            }
        };

        debug!(player = %name, %letter, opened, points = report.points, "letter guess applied");
        self.commit(next);
        Ok(report)
    }

    /// Guess the whole word. Allowed whenever an outcome is pending.
    pub fn apply_word_guess(&mut self, candidate: &str) -> Result<GuessReport, ActionError> {
        let mut next = self.active()?.clone();
        if next.pending_outcome.is_none() {
            return Err(ActionError::WrongPhase {
                phase: next.phase(),
            });
        }
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return Err(ActionError::EmptyInput);
        }

        let matches = candidate
            .chars()
            .map(normalize_letter)
            .eq(next.word.text.chars().map(normalize_letter));
        next.move_count += 1;
        let name = next.current_player().name.clone();

        let report = if matches {
            let opened = opened_count(&next.revealed_mask, &next.word.text);
            finish(&mut next);
            GuessReport {
                success: true,
                opened,
                points: COMPLETION_BONUS,
                turn_over: true,
                game_over: true,
                message: format!(
                    "{} is right! {} wins {} points.",
                    next.word.text, name, COMPLETION_BONUS
                ),
            }
        } else {
            pass_turn(&mut next);
            GuessReport {
                success: false,
                opened: 0,
                points: 0,
                turn_over: true,
                game_over: false,
                message: format!("{} is wrong. Turn passes.", candidate.to_uppercase()),
            }
        };

        debug!(player = %name, matched = matches, "word guess applied");
        self.commit(next);
        Ok(report)
    }

    /// Open a chosen letter for free under a pending Plus outcome.
    pub fn apply_bonus_pick(&mut self, letter: char) -> Result<GuessReport, ActionError> {
        let mut next = self.active()?.clone();
        if next.pending_outcome != Some(Outcome::Bonus) {
            return Err(ActionError::WrongPhase {
                phase: next.phase(),
            });
        }
        let letter = check_letter(&next, letter)?;

        next.used_letters.insert(letter);
        next.move_count += 1;
        let mask = reveal(&next.word.text, &next.revealed_mask, letter);
        let opened = opened_count(&next.revealed_mask, &mask);
        next.revealed_mask = mask;
        let name = next.current_player().name.clone();

        let report = if next.is_fully_revealed() {
            finish(&mut next);
            GuessReport {
                success: true,
                opened,
                points: COMPLETION_BONUS,
                turn_over: true,
                game_over: true,
                message: format!(
                    "Letter {} completes the word! {} wins {} points.",
                    letter, name, COMPLETION_BONUS
                ),
            }
        } else {
            next.pending_outcome = None;
            let message = if opened > 0 {
                format!("Letter {} opens {}. Spin again.", letter, opened)
            } else {
                format!("No letter {}, but the turn stays. Spin again.", letter)
            };
            GuessReport {
                success: opened > 0,
                opened,
                points: 0,
                turn_over: false,
                game_over: false,
                message,
            }
        };

        debug!(player = %name, %letter, opened, "bonus pick applied");
        self.commit(next);
        Ok(report)
    }

    /// State of a round that still accepts actions.
    fn active(&self) -> Result<&GameState, ActionError> {
        let state = self.state.as_ref().ok_or(ActionError::NoActiveGame)?;
        if state.is_game_over {
            return Err(ActionError::GameAlreadyOver);
        }
        Ok(state)
    }

    fn commit(&mut self, next: GameState) {
        if next.is_game_over {
            info!(
                winner = %next.current_player().name,
                moves = next.move_count,
                "game over"
            );
        }
        self.state = Some(next);
    }
}

/// Validate a letter for guessing or picking and return it normalized.
fn check_letter(state: &GameState, letter: char) -> Result<char, ActionError> {
    if !letter.is_alphabetic() {
        return Err(ActionError::NotALetter(letter.to_string()));
    }
    let letter = normalize_letter(letter);
    if state.is_letter_used(letter) {
        return Err(ActionError::LetterAlreadyUsed(letter));
    }
    Ok(letter)
}

/// Hand the turn to the next seat.
fn pass_turn(state: &mut GameState) {
    state.current_player_index = (state.current_player_index + 1) % state.players.len();
    state.pending_outcome = None;
    debug!(next = state.current_player_index, "turn passes");
}

/// Add points to the current player. Scores never go below zero.
fn award(state: &mut GameState, points: u32) {
    let index = state.current_player_index;
    let player = &mut state.players[index];
    player.score = player.score.saturating_add(points);
}

/// End the round in favour of the current player.
fn finish(state: &mut GameState) {
    state.revealed_mask = state.word.text.clone();
    state.pending_outcome = None;
    state.is_game_over = true;
    award(state, COMPLETION_BONUS);
}
