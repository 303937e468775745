//! Game logic: wheel outcomes, letter reveals, scoring, the turn engine and bots

pub mod bot;
pub mod engine;
pub mod reveal;
pub mod roster;
pub mod scoring;
pub mod wheel;

use std::collections::BTreeSet;
use std::fmt;

pub use bot::{BotAction, BotConfig, BotGuess, BotPolicy};
pub use engine::{parse_letter, ActionError, GuessReport, SpinReport, TurnEngine};
pub use wheel::Wheel;

/// Placeholder shown for a hidden letter in the reveal mask.
pub const PLACEHOLDER: char = '*';

/// Letters of the active locale, in keyboard order.
pub const RUSSIAN_ALPHABET: &str = "АБВГДЕЁЖЗИЙКЛМНОПРСТУФХЦЧШЩЪЫЬЭЮЯ";

/// Flat award for completing the word, by letter or by full guess.
pub const COMPLETION_BONUS: u32 = 1000;

/// Points value used for Double when no Points sector has been spun yet.
pub const DOUBLE_FALLBACK_POINTS: u32 = 500;

/// Number of seats at the table; humans are padded with bots up to this.
pub const TABLE_SIZE: usize = 3;

/// Normalize a letter for case-insensitive comparison.
pub fn normalize_letter(c: char) -> char {
    c.to_uppercase().next().unwrap_or(c)
}

/// A secret word with its hint. Immutable once chosen for a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    pub hint: String,
}

impl Word {
    pub fn new(text: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            hint: hint.into(),
        }
    }

    /// Number of letters (not bytes) in the word.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A seat at the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: usize,
    pub name: String,
    pub is_bot: bool,
    pub score: u32,
}

impl Player {
    pub fn human(id: usize, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_bot: false,
            score: 0,
        }
    }

    pub fn bot(id: usize, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_bot: true,
            score: 0,
        }
    }
}

/// The face of the wheel that came up on a spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Stake per revealed letter
    Points(u32),
    /// Doubles the last Points value seen this game
    Double,
    /// Turn passes, score unchanged
    Zero,
    /// Reveal one chosen letter for free, then spin again
    Bonus,
    /// Score reset to zero, turn passes
    Bankrupt,
}

impl Outcome {
    /// Whether the player keeps acting after spinning this outcome.
    pub fn continues_turn(&self) -> bool {
        !matches!(self, Outcome::Zero | Outcome::Bankrupt)
    }

    /// Whether a letter guess may be scored against this outcome.
    pub fn accepts_letter_guess(&self) -> bool {
        matches!(self, Outcome::Points(_) | Outcome::Double)
    }

    /// Short label for the drum face.
    pub fn label(&self) -> String {
        match self {
            Outcome::Points(value) => value.to_string(),
            Outcome::Double => "Double".to_string(),
            Outcome::Zero => "Zero".to_string(),
            Outcome::Bonus => "Plus".to_string(),
            Outcome::Bankrupt => "Bankrupt".to_string(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// What the current player may do next, derived from the state fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No outcome pending; the player must spin
    AwaitingSpin,
    /// Points or Double pending; guess a letter or the word
    AwaitingGuess,
    /// Plus pending; pick a free letter or guess the word
    AwaitingBonusPick,
    GameOver,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Phase::AwaitingSpin => "spin the wheel first",
            Phase::AwaitingGuess => "a guess is expected",
            Phase::AwaitingBonusPick => "pick a letter to open",
            Phase::GameOver => "the game is over",
        };
        f.write_str(text)
    }
}

/// Authoritative state of one round.
///
/// The turn engine replaces the whole value after each accepted action;
/// nothing else writes to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub word: Word,
    /// Turn order is insertion order
    pub players: Vec<Player>,
    pub current_player_index: usize,
    /// Same length as the word; each position is the letter or `PLACEHOLDER`
    pub revealed_mask: String,
    /// Upper-cased letters named by a letter guess or bonus pick
    pub used_letters: BTreeSet<char>,
    /// `None` means the current player must spin
    pub pending_outcome: Option<Outcome>,
    pub move_count: u32,
    pub is_game_over: bool,
}

impl GameState {
    /// Fresh state with every letter hidden and the first player to spin.
    pub fn new(word: Word, players: Vec<Player>) -> Self {
        let revealed_mask = std::iter::repeat_n(PLACEHOLDER, word.len()).collect();
        Self {
            word,
            players,
            current_player_index: 0,
            revealed_mask,
            used_letters: BTreeSet::new(),
            pending_outcome: None,
            move_count: 0,
            is_game_over: false,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.is_game_over {
            return Phase::GameOver;
        }
        match self.pending_outcome {
            None => Phase::AwaitingSpin,
            Some(Outcome::Bonus) => Phase::AwaitingBonusPick,
            Some(_) => Phase::AwaitingGuess,
        }
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player_index]
    }

    /// Number of positions already showing their letter.
    pub fn revealed_count(&self) -> usize {
        self.revealed_mask
            .chars()
            .filter(|&c| c != PLACEHOLDER)
            .count()
    }

    pub fn is_fully_revealed(&self) -> bool {
        !self.revealed_mask.contains(PLACEHOLDER)
    }

    pub fn is_letter_used(&self, letter: char) -> bool {
        self.used_letters.contains(&normalize_letter(letter))
    }

    /// Players sorted by score, highest first. Ties keep turn order.
    pub fn leaderboard(&self) -> Vec<&Player> {
        let mut players: Vec<&Player> = self.players.iter().collect();
        players.sort_by(|a, b| b.score.cmp(&a.score));
        players
    }

    /// The player who finished the word, once the game is over.
    pub fn winner(&self) -> Option<&Player> {
        self.is_game_over.then(|| self.current_player())
    }
}
