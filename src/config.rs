//! Runtime configuration and persisted user settings

use crate::game::{BotConfig, RUSSIAN_ALPHABET};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming a word-list file to import.
pub const WORDS_ENV: &str = "WONDERS_WORDS";

/// Static configuration of a game session.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Letters bots choose from, in the active locale
    pub alphabet: String,
    pub bot: BotConfig,
    /// Word list offered for import into the cache, if any
    pub words_import: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            alphabet: RUSSIAN_ALPHABET.to_string(),
            bot: BotConfig::default(),
            words_import: None,
        }
    }
}

impl GameConfig {
    /// Defaults, overridden by the process environment.
    pub fn from_env() -> Self {
        Self {
            words_import: std::env::var_os(WORDS_ENV)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from),
            ..Self::default()
        }
    }
}

/// How quickly bots act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BotPace {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl BotPace {
    pub fn all() -> &'static [BotPace] {
        &[BotPace::Slow, BotPace::Normal, BotPace::Fast]
    }

    pub fn label(&self) -> &'static str {
        match self {
            BotPace::Slow => "Slow",
            BotPace::Normal => "Normal",
            BotPace::Fast => "Fast",
        }
    }

    /// Stable key used in the settings table.
    pub fn key(&self) -> &'static str {
        match self {
            BotPace::Slow => "slow",
            BotPace::Normal => "normal",
            BotPace::Fast => "fast",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        BotPace::all().iter().copied().find(|pace| pace.key() == key)
    }

    /// The next pace in the cycle Slow -> Normal -> Fast -> Slow.
    pub fn next(&self) -> Self {
        match self {
            BotPace::Slow => BotPace::Normal,
            BotPace::Normal => BotPace::Fast,
            BotPace::Fast => BotPace::Slow,
        }
    }

    fn scale(&self, millis: u64) -> Duration {
        let scaled = match self {
            BotPace::Slow => millis * 2,
            BotPace::Normal => millis,
            BotPace::Fast => millis / 4,
        };
        Duration::from_millis(scaled)
    }

    /// Pause before a bot starts its turn.
    pub fn turn_delay(&self) -> Duration {
        self.scale(1500)
    }

    /// Pause before a bot spins.
    pub fn spin_delay(&self) -> Duration {
        self.scale(1000)
    }

    /// Pause before a bot guesses or picks.
    pub fn guess_delay(&self) -> Duration {
        self.scale(1500)
    }
}

/// User preferences kept between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub sound_effects: bool,
    pub bot_pace: BotPace,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_effects: true,
            bot_pace: BotPace::Normal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.alphabet.chars().count(), 33);
        assert_eq!(config.bot.word_guess_min_moves, 4);
        assert!(config.words_import.is_none());
    }

    #[test]
    fn test_pace_keys_roundtrip() {
        for pace in BotPace::all() {
            assert_eq!(BotPace::from_key(pace.key()), Some(*pace));
        }
        assert_eq!(BotPace::from_key("warp"), None);
    }

    #[test]
    fn test_pace_cycle() {
        assert_eq!(BotPace::Slow.next(), BotPace::Normal);
        assert_eq!(BotPace::Normal.next(), BotPace::Fast);
        assert_eq!(BotPace::Fast.next(), BotPace::Slow);
    }

    #[test]
    fn test_pace_scales_delays() {
        assert_eq!(BotPace::Normal.turn_delay(), Duration::from_millis(1500));
        assert_eq!(BotPace::Normal.spin_delay(), Duration::from_millis(1000));
        assert!(BotPace::Slow.guess_delay() > BotPace::Normal.guess_delay());
        assert!(BotPace::Fast.guess_delay() < BotPace::Normal.guess_delay());
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.sound_effects);
        assert_eq!(settings.bot_pace, BotPace::Normal);
    }
}
