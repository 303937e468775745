//! Session state: drives one game for the UI and paces bot turns

use crate::config::{GameConfig, Settings};
use crate::game::{
    parse_letter, roster, ActionError, BotAction, BotGuess, BotPolicy, GameState, GuessReport,
    Outcome, Player, SpinReport, TurnEngine, Wheel, Word,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;
use tracing::{debug, warn};

/// Sound to play after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Success,
    Failure,
}

/// One game session as seen by the UI.
pub struct Session {
    engine: TurnEngine,
    wheel: Wheel,
    policy: BotPolicy,
    rng: StdRng,
    settings: Settings,
    /// A bot turn is under way; humans are locked out
    bot_acting: bool,
    /// When the bot may perform its next action
    bot_deadline: Option<Instant>,
    /// Text typed by the human player
    pub input: String,
    /// Message from the last action
    pub feedback: String,
    last_outcome: Option<Outcome>,
    sound: Option<SoundCue>,
}

impl Session {
    pub fn new(config: &GameConfig, settings: Settings) -> Self {
        Self::with_parts(config, settings, Wheel::new(), StdRng::from_os_rng())
    }

    /// Build with an explicit wheel and random source.
    pub fn with_parts(config: &GameConfig, settings: Settings, wheel: Wheel, rng: StdRng) -> Self {
        Self {
            engine: TurnEngine::new(),
            wheel,
            policy: BotPolicy::new(&config.alphabet, config.bot.clone()),
            rng,
            settings,
            bot_acting: false,
            bot_deadline: None,
            input: String::new(),
            feedback: String::new(),
            last_outcome: None,
            sound: None,
        }
    }

    /// Seat the players and start a round with `word`.
    pub fn start_game(&mut self, names: &[String], word: Word) -> &GameState {
        let players = roster::build(names, &mut self.rng);
        self.clear_turn_state();
        self.feedback = "Spin the drum!".to_string();
        self.engine.start_game(word, players)
    }

    /// Drop the current round.
    pub fn reset_game(&mut self) {
        self.engine.reset();
        self.clear_turn_state();
        self.feedback.clear();
    }

    pub fn state(&self) -> Option<&GameState> {
        self.engine.state()
    }

    pub fn wheel(&self) -> &Wheel {
        &self.wheel
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }

    pub fn is_bot_acting(&self) -> bool {
        self.bot_acting
    }

    #[cfg(test)]
    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Players by score, best first.
    pub fn leaderboard(&self) -> Vec<&Player> {
        self.state().map(GameState::leaderboard).unwrap_or_default()
    }

    /// Sound produced by the last action, if any. Cleared on read.
    pub fn take_sound(&mut self) -> Option<SoundCue> {
        self.sound.take()
    }

    /// Spin the drum for the human player.
    pub fn request_spin(&mut self) -> Result<SpinReport, ActionError> {
        self.ensure_human_turn()?;
        let result = self.spin();
        self.note(result)
    }

    pub fn submit_letter_guess(&mut self, letter: char) -> Result<GuessReport, ActionError> {
        self.ensure_human_turn()?;
        let result = self.engine.apply_letter_guess(letter);
        self.note_guess(result)
    }

    pub fn submit_word_guess(&mut self, word: &str) -> Result<GuessReport, ActionError> {
        self.ensure_human_turn()?;
        let result = self.engine.apply_word_guess(word);
        self.note_guess(result)
    }

    pub fn submit_bonus_pick(&mut self, letter: char) -> Result<GuessReport, ActionError> {
        self.ensure_human_turn()?;
        let result = self.engine.apply_bonus_pick(letter);
        self.note_guess(result)
    }

    /// Route typed text: one symbol is a letter guess or, under Plus, a
    /// bonus pick; anything longer is a word guess.
    pub fn submit_guess(&mut self, input: &str) -> Result<GuessReport, ActionError> {
        let trimmed = input.trim();
        if trimmed.chars().count() > 1 {
            return self.submit_word_guess(trimmed);
        }

        let letter = match parse_letter(trimmed) {
            Ok(letter) => letter,
            Err(e) => return self.note(Err(e)),
        };
        let bonus_pending = self
            .state()
            .is_some_and(|state| state.pending_outcome == Some(Outcome::Bonus));
        if bonus_pending {
            self.submit_bonus_pick(letter)
        } else {
            self.submit_letter_guess(letter)
        }
    }

    /// Submit whatever is in the input line and clear it.
    pub fn submit_input(&mut self) -> Result<GuessReport, ActionError> {
        let input = std::mem::take(&mut self.input);
        self.submit_guess(&input)
    }

    /// Advance bot play. Performs at most one bot action, and only once its
    /// delay has passed. Returns true if the state changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let bot_turn = self
            .state()
            .is_some_and(|state| !state.is_game_over && state.current_player().is_bot);
        if !bot_turn {
            self.bot_acting = false;
            self.bot_deadline = None;
            return false;
        }

        match self.bot_deadline {
            None => {
                self.bot_acting = true;
                self.bot_deadline = Some(now + self.settings.bot_pace.turn_delay());
                false
            }
            Some(deadline) if now < deadline => false,
            Some(_) => {
                self.bot_step(now);
                true
            }
        }
    }

    /// One bot action, then schedule the next or end the bot's turn.
    fn bot_step(&mut self, now: Instant) {
        let Some(state) = self.engine.state() else {
            return;
        };
        let acting = state.current_player_index;
        let action = self.policy.decide(state, &mut self.rng);
        debug!(player = acting, ?action, "bot acts");

        let applied = match action {
            BotAction::Spin => self.spin().map(|_| ()),
            BotAction::Guess(BotGuess::Letter(letter)) => {
                let result = self.engine.apply_letter_guess(letter);
                self.note_guess(result).map(|_| ())
            }
            BotAction::Guess(BotGuess::Word(word)) => {
                let result = self.engine.apply_word_guess(&word);
                self.note_guess(result).map(|_| ())
            }
            BotAction::PickBonus(letter) => {
                let result = self.engine.apply_bonus_pick(letter);
                self.note_guess(result).map(|_| ())
            }
        };
        if let Err(e) = applied {
            warn!(error = %e, "bot action rejected");
        }

        let pace = self.settings.bot_pace;
        self.bot_deadline = match self.engine.state() {
            Some(state) if !state.is_game_over && state.current_player_index == acting => {
                let delay = if state.pending_outcome.is_none() {
                    pace.spin_delay()
                } else {
                    pace.guess_delay()
                };
                Some(now + delay)
            }
            _ => {
                self.bot_acting = false;
                None
            }
        };
    }

    fn spin(&mut self) -> Result<SpinReport, ActionError> {
        let outcome = self.wheel.spin_with_rng(&mut self.rng);
        let report = self.engine.apply_spin(outcome)?;
        self.last_outcome = Some(report.outcome);
        self.feedback = report.message.clone();
        if !report.continues {
            self.sound = Some(SoundCue::Failure);
        }
        Ok(report)
    }

    fn ensure_human_turn(&mut self) -> Result<(), ActionError> {
        let locked = self.bot_acting
            || self
                .state()
                .is_some_and(|state| !state.is_game_over && state.current_player().is_bot);
        if locked {
            return self.note(Err(ActionError::NotYourTurn));
        }
        Ok(())
    }

    fn note_guess(
        &mut self,
        result: Result<GuessReport, ActionError>,
    ) -> Result<GuessReport, ActionError> {
        if let Ok(report) = &result {
            self.feedback = report.message.clone();
            self.sound = Some(if report.success {
                SoundCue::Success
            } else {
                SoundCue::Failure
            });
        }
        self.note(result)
    }

    /// Show a rejection to the player.
    fn note<T>(&mut self, result: Result<T, ActionError>) -> Result<T, ActionError> {
        if let Err(e) = &result {
            debug!(error = %e, "action rejected");
            self.feedback = e.to_string();
        }
        result
    }

    fn clear_turn_state(&mut self) {
        self.bot_acting = false;
        self.bot_deadline = None;
        self.input.clear();
        self.last_outcome = None;
        self.sound = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BotPace;
    use std::time::Duration;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn session_with(sectors: Vec<Outcome>) -> Session {
        Session::with_parts(
            &GameConfig::default(),
            Settings::default(),
            Wheel::with_sectors(sectors),
            StdRng::seed_from_u64(21),
        )
    }

    /// Ann plus two humans so nobody is a bot.
    fn humans_only(session: &mut Session, word: &str) {
        session.start_game(&names(&["Ann", "Bob", "Cid"]), Word::new(word, "hint"));
    }

    #[test]
    fn test_human_spin_and_letter() {
        let mut session = session_with(vec![Outcome::Points(500)]);
        humans_only(&mut session, "КОТ");

        let spin = session.request_spin().unwrap();
        assert_eq!(spin.outcome, Outcome::Points(500));
        assert_eq!(session.last_outcome(), Some(Outcome::Points(500)));

        let guess = session.submit_guess(" к ").unwrap();
        assert!(guess.success);
        assert_eq!(guess.points, 500);
        assert_eq!(session.state().unwrap().revealed_mask, "К**");
        assert_eq!(session.take_sound(), Some(SoundCue::Success));
        assert_eq!(session.take_sound(), None);
    }

    #[test]
    fn test_submit_guess_routes_words() {
        let mut session = session_with(vec![Outcome::Points(500)]);
        humans_only(&mut session, "КОТ");
        session.request_spin().unwrap();

        let report = session.submit_guess("кот").unwrap();
        assert!(report.game_over);
        assert_eq!(session.leaderboard()[0].name, "Ann");
        assert_eq!(session.leaderboard()[0].score, 1000);
    }

    #[test]
    fn test_submit_guess_routes_bonus_pick() {
        let mut session = session_with(vec![Outcome::Bonus]);
        humans_only(&mut session, "КОТ");
        session.request_spin().unwrap();

        let report = session.submit_guess("Т").unwrap();
        assert!(report.success);
        assert_eq!(report.points, 0);
        let state = session.state().unwrap();
        assert_eq!(state.revealed_mask, "**Т");
        assert_eq!(state.pending_outcome, None);
        assert_eq!(state.current_player_index, 0);
    }

    #[test]
    fn test_submit_guess_rejects_blank_and_symbols() {
        let mut session = session_with(vec![Outcome::Points(500)]);
        humans_only(&mut session, "КОТ");
        session.request_spin().unwrap();

        assert_eq!(session.submit_guess("   "), Err(ActionError::EmptyInput));
        assert!(matches!(
            session.submit_guess("7"),
            Err(ActionError::NotALetter(_))
        ));
        assert!(!session.feedback.is_empty());
    }

    #[test]
    fn test_submit_input_clears_line() {
        let mut session = session_with(vec![Outcome::Points(500)]);
        humans_only(&mut session, "КОТ");
        session.request_spin().unwrap();
        session.input = "О".to_string();

        session.submit_input().unwrap();
        assert!(session.input.is_empty());
        assert_eq!(session.state().unwrap().revealed_mask, "*О*");
    }

    #[test]
    fn test_zero_passes_turn_with_failure_sound() {
        let mut session = session_with(vec![Outcome::Zero]);
        humans_only(&mut session, "КОТ");

        let report = session.request_spin().unwrap();
        assert!(!report.continues);
        assert_eq!(session.state().unwrap().current_player_index, 1);
        assert_eq!(session.take_sound(), Some(SoundCue::Failure));
    }

    #[test]
    fn test_humans_locked_out_on_bot_turn() {
        let mut session = session_with(vec![Outcome::Points(500)]);
        session.start_game(&[], Word::new("КОТ", "hint"));

        assert_eq!(session.request_spin(), Err(ActionError::NotYourTurn));
        assert_eq!(session.submit_guess("К"), Err(ActionError::NotYourTurn));
        assert_eq!(session.state().unwrap().move_count, 0);
    }

    #[test]
    fn test_no_game_rejections() {
        let mut session = session_with(vec![Outcome::Points(500)]);
        assert_eq!(session.request_spin(), Err(ActionError::NoActiveGame));
        assert_eq!(
            session.submit_letter_guess('К'),
            Err(ActionError::NoActiveGame)
        );
        assert!(session.leaderboard().is_empty());
    }

    #[test]
    fn test_bot_waits_for_turn_delay() {
        let mut session = session_with(vec![Outcome::Points(500)]);
        session.start_game(&[], Word::new("КОТ", "hint"));
        let start = Instant::now();

        assert!(!session.tick(start));
        assert!(session.is_bot_acting());
        assert!(!session.tick(start + Duration::from_millis(100)));
        assert_eq!(session.state().unwrap().move_count, 0);

        assert!(session.tick(start + Duration::from_millis(1500)));
        assert_eq!(session.state().unwrap().move_count, 1);
        assert_eq!(
            session.state().unwrap().pending_outcome,
            Some(Outcome::Points(500))
        );
    }

    #[test]
    fn test_bots_play_to_the_end() {
        let mut session = session_with(vec![Outcome::Points(500), Outcome::Bonus]);
        session.set_settings(Settings {
            sound_effects: false,
            bot_pace: BotPace::Fast,
        });
        session.start_game(&[], Word::new("МОЛОКО", "hint"));

        let mut now = Instant::now();
        for _ in 0..2000 {
            if session.state().unwrap().is_game_over {
                break;
            }
            session.tick(now);
            now += Duration::from_secs(5);
        }

        let state = session.state().unwrap();
        assert!(state.is_game_over);
        assert_eq!(state.revealed_mask, "МОЛОКО");
        assert!(state.winner().unwrap().score >= 1000);
        assert!(!session.tick(now));
        assert!(!session.is_bot_acting());
    }

    #[test]
    fn test_bot_hands_turn_back_to_human() {
        let mut session = session_with(vec![Outcome::Zero]);
        session.start_game(&names(&["Ann"]), Word::new("КОТ", "hint"));
        let start = Instant::now();

        // Ann spins Zero, the first bot takes over
        session.request_spin().unwrap();
        assert!(session.state().unwrap().current_player().is_bot);

        let mut now = start;
        for _ in 0..10 {
            session.tick(now);
            now += Duration::from_secs(5);
        }
        let state = session.state().unwrap();
        assert_eq!(state.current_player_index, 0);
        assert!(!session.is_bot_acting());
        assert!(session.request_spin().is_ok());
    }

    #[test]
    fn test_reset_clears_session() {
        let mut session = session_with(vec![Outcome::Points(500)]);
        humans_only(&mut session, "КОТ");
        session.request_spin().unwrap();
        session.input = "К".to_string();

        session.reset_game();
        assert!(session.state().is_none());
        assert!(session.input.is_empty());
        assert_eq!(session.last_outcome(), None);
        assert_eq!(session.request_spin(), Err(ActionError::NoActiveGame));
    }
}
