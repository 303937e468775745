//! Decision heuristics for computer-controlled players
//!
//! A bot never touches the engine. It looks at a snapshot of the state and
//! says what it wants to do; the session driver applies it.

use super::{normalize_letter, GameState, Outcome, RUSSIAN_ALPHABET};
use rand::prelude::*;
use std::collections::BTreeSet;
use tracing::debug;

/// When a word-guess probability applies, in terms of the reveal progress.
#[derive(Debug, Clone, PartialEq)]
pub enum RevealThreshold {
    /// At most `missing` letters hidden, for words of at least `min_len`
    MissingAtMost { missing: usize, min_len: usize },
    /// Strictly more than `fraction` of the word shown, with at least
    /// `min_revealed` letters open
    FractionAbove { fraction: f64, min_revealed: usize },
}

impl RevealThreshold {
    fn matches(&self, revealed: usize, len: usize) -> bool {
        match *self {
            RevealThreshold::MissingAtMost { missing, min_len } => {
                len >= min_len && revealed >= len.saturating_sub(missing)
            }
            RevealThreshold::FractionAbove {
                fraction,
                min_revealed,
            } => {
                len > 0
                    && revealed >= min_revealed
                    && revealed as f64 / len as f64 > fraction
            }
        }
    }
}

/// One step of the word-guess probability table.
#[derive(Debug, Clone, PartialEq)]
pub struct WordGuessRule {
    pub threshold: RevealThreshold,
    pub probability: f64,
}

/// Tuning knobs for bot behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    /// Bots only try the whole word once this many moves were made
    pub word_guess_min_moves: u32,
    /// Checked in order; the first matching rule gives the probability
    pub word_guess_rules: Vec<WordGuessRule>,
    /// Picked when every letter of the alphabet is used up
    pub fallback_letter: char,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            word_guess_min_moves: 4,
            word_guess_rules: vec![
                WordGuessRule {
                    threshold: RevealThreshold::MissingAtMost {
                        missing: 1,
                        min_len: 0,
                    },
                    probability: 0.5,
                },
                WordGuessRule {
                    threshold: RevealThreshold::MissingAtMost {
                        missing: 2,
                        min_len: 6,
                    },
                    probability: 0.2,
                },
                WordGuessRule {
                    threshold: RevealThreshold::FractionAbove {
                        fraction: 0.6,
                        min_revealed: 0,
                    },
                    probability: 0.1,
                },
                WordGuessRule {
                    threshold: RevealThreshold::FractionAbove {
                        fraction: 0.4,
                        min_revealed: 3,
                    },
                    probability: 0.05,
                },
            ],
            fallback_letter: 'А',
        }
    }
}

/// What a bot decided to guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotGuess {
    Letter(char),
    Word(String),
}

/// The bot's next action for the current phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotAction {
    Spin,
    Guess(BotGuess),
    PickBonus(char),
}

/// Stateless decision maker over game snapshots.
#[derive(Debug, Clone)]
pub struct BotPolicy {
    config: BotConfig,
    alphabet: Vec<char>,
}

impl Default for BotPolicy {
    fn default() -> Self {
        Self::new(RUSSIAN_ALPHABET, BotConfig::default())
    }
}

impl BotPolicy {
    pub fn new(alphabet: &str, config: BotConfig) -> Self {
        Self {
            config,
            alphabet: alphabet.chars().map(normalize_letter).collect(),
        }
    }

    /// Choose the action for whatever the state is waiting on.
    pub fn decide<R: Rng>(&self, state: &GameState, rng: &mut R) -> BotAction {
        match state.pending_outcome {
            None => BotAction::Spin,
            Some(Outcome::Bonus) => BotAction::PickBonus(self.decide_bonus_letter(state, rng)),
            Some(_) => BotAction::Guess(self.decide_letter_or_word(state, rng)),
        }
    }

    /// Probability of going for the whole word given the reveal progress.
    pub fn word_guess_probability(&self, revealed: usize, len: usize) -> f64 {
        self.config
            .word_guess_rules
            .iter()
            .find(|rule| rule.threshold.matches(revealed, len))
            .map_or(0.0, |rule| rule.probability)
    }

    /// Guess a letter, or occasionally the whole word.
    ///
    /// A word guess returns the secret itself: bots are given the answer
    /// and only the dice decide when they use it.
    pub fn decide_letter_or_word<R: Rng>(&self, state: &GameState, rng: &mut R) -> BotGuess {
        if state.move_count >= self.config.word_guess_min_moves {
            let probability =
                self.word_guess_probability(state.revealed_count(), state.word.len());
            let roll: f64 = rng.random();
            debug!(probability, roll, "bot weighs a word guess");
            if roll < probability {
                return BotGuess::Word(state.word.text.clone());
            }
        }

        let available = self.unused_letters(state);
        match available.choose(rng) {
            Some(&letter) => BotGuess::Letter(letter),
            None => BotGuess::Word(state.word.text.clone()),
        }
    }

    /// Pick the letter to open under Plus, preferring letters of the word.
    pub fn decide_bonus_letter<R: Rng>(&self, state: &GameState, rng: &mut R) -> char {
        let in_word: Vec<char> = state
            .word
            .text
            .chars()
            .map(normalize_letter)
            .filter(|c| !state.used_letters.contains(c))
            .collect::<BTreeSet<char>>()
            .into_iter()
            .collect();
        if let Some(&letter) = in_word.choose(rng) {
            return letter;
        }

        self.unused_letters(state)
            .choose(rng)
            .copied()
            .unwrap_or(self.config.fallback_letter)
    }

    fn unused_letters(&self, state: &GameState) -> Vec<char> {
        self.alphabet
            .iter()
            .copied()
            .filter(|c| !state.used_letters.contains(c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Player, Word};
    use rand::rngs::StdRng;

    fn state_for(word: &str) -> GameState {
        GameState::new(
            Word::new(word, "hint"),
            vec![Player::bot(0, "Reader Bot"), Player::bot(1, "Lucky Bot")],
        )
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(99)
    }

    #[test]
    fn test_spin_when_nothing_pending() {
        let state = state_for("КОТ");
        assert_eq!(BotPolicy::default().decide(&state, &mut rng()), BotAction::Spin);
    }

    #[test]
    fn test_pick_under_bonus() {
        let mut state = state_for("КОТ");
        state.pending_outcome = Some(Outcome::Bonus);
        match BotPolicy::default().decide(&state, &mut rng()) {
            BotAction::PickBonus(letter) => assert!("КОТ".contains(letter)),
            other => panic!("expected a bonus pick, got {:?}", other),
        }
    }

    #[test]
    fn test_guess_under_points() {
        let mut state = state_for("КОТ");
        state.pending_outcome = Some(Outcome::Points(500));
        assert!(matches!(
            BotPolicy::default().decide(&state, &mut rng()),
            BotAction::Guess(_)
        ));
    }

    #[test]
    fn test_no_word_guess_before_min_moves() {
        let policy = BotPolicy::default();
        let mut state = state_for("КОТ");
        state.revealed_mask = "КО*".to_string();
        state.move_count = 3;
        let mut rng = rng();
        for _ in 0..200 {
            assert!(matches!(
                policy.decide_letter_or_word(&state, &mut rng),
                BotGuess::Letter(_)
            ));
        }
    }

    #[test]
    fn test_probability_table() {
        let policy = BotPolicy::default();
        // one letter missing
        assert_eq!(policy.word_guess_probability(2, 3), 0.5);
        assert_eq!(policy.word_guess_probability(7, 8), 0.5);
        // two missing in a long word
        assert_eq!(policy.word_guess_probability(6, 8), 0.2);
        // two missing in a short word falls through to the fraction rules
        assert_eq!(policy.word_guess_probability(3, 5), 0.05);
        // more than 60% shown
        assert_eq!(policy.word_guess_probability(7, 10), 0.1);
        // more than 40% shown and more than two letters
        assert_eq!(policy.word_guess_probability(5, 10), 0.05);
        assert_eq!(policy.word_guess_probability(2, 4), 0.0);
        assert_eq!(policy.word_guess_probability(0, 8), 0.0);
    }

    #[test]
    fn test_probability_is_monotonic() {
        let policy = BotPolicy::default();
        for len in 1..15 {
            let mut last = 0.0;
            for revealed in 0..=len {
                let p = policy.word_guess_probability(revealed, len);
                assert!(p >= last, "len {} revealed {}: {} < {}", len, revealed, p, last);
                last = p;
            }
        }
    }

    #[test]
    fn test_word_guess_happens_when_nearly_solved() {
        let policy = BotPolicy::default();
        let mut state = state_for("КОТ");
        state.revealed_mask = "КО*".to_string();
        state.used_letters = ['К', 'О'].into_iter().collect();
        state.move_count = 10;
        let mut rng = rng();
        let words = (0..400)
            .filter(|_| {
                matches!(
                    policy.decide_letter_or_word(&state, &mut rng),
                    BotGuess::Word(ref w) if w == "КОТ"
                )
            })
            .count();
        // 50% chance per decision
        assert!(words > 150 && words < 250, "got {}", words);
    }

    #[test]
    fn test_letter_guess_skips_used_letters() {
        let policy = BotPolicy::new("АБВ", BotConfig::default());
        let mut state = state_for("КОТ");
        state.used_letters = ['А', 'Б'].into_iter().collect();
        let mut rng = rng();
        for _ in 0..50 {
            assert_eq!(
                policy.decide_letter_or_word(&state, &mut rng),
                BotGuess::Letter('В')
            );
        }
    }

    #[test]
    fn test_exhausted_alphabet_falls_back_to_word() {
        let policy = BotPolicy::new("АБ", BotConfig::default());
        let mut state = state_for("КОТ");
        state.used_letters = ['А', 'Б'].into_iter().collect();
        assert_eq!(
            policy.decide_letter_or_word(&state, &mut rng()),
            BotGuess::Word("КОТ".to_string())
        );
    }

    #[test]
    fn test_bonus_letter_prefers_word_letters() {
        let policy = BotPolicy::default();
        let mut state = state_for("МОЛОКО");
        state.used_letters = ['М', 'О'].into_iter().collect();
        let mut rng = rng();
        for _ in 0..50 {
            let letter = policy.decide_bonus_letter(&state, &mut rng);
            assert!(letter == 'Л' || letter == 'К', "picked {}", letter);
        }
    }

    #[test]
    fn test_bonus_letter_falls_back_to_alphabet() {
        let policy = BotPolicy::new("АБКОТ", BotConfig::default());
        let mut state = state_for("КОТ");
        state.used_letters = ['К', 'О', 'Т', 'А'].into_iter().collect();
        assert_eq!(policy.decide_bonus_letter(&state, &mut rng()), 'Б');
    }

    #[test]
    fn test_bonus_letter_default_when_exhausted() {
        let policy = BotPolicy::new("КОТ", BotConfig::default());
        let mut state = state_for("КОТ");
        state.used_letters = ['К', 'О', 'Т'].into_iter().collect();
        assert_eq!(policy.decide_bonus_letter(&state, &mut rng()), 'А');
    }
}
