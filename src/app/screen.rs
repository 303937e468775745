//! Application screen state management
//!
//! Handles transitions between different application screens:
//! - Main menu
//! - Player setup
//! - Playing
//! - Game over with the final standings
//! - Rules and settings

use crate::config::{GameConfig, Settings};
use crate::storage::Storage;
use crate::words::{self, WordPool, WordSource};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;
use tracing::{info, warn};

use super::state::{Session, SoundCue};

/// Longest name accepted on the setup screen
pub const MAX_NAME_LEN: usize = 12;

/// Menu option on the main screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Play,
    Rules,
    Settings,
    Quit,
}

impl MenuOption {
    /// Get all menu options in order
    pub fn all() -> &'static [MenuOption] {
        &[
            MenuOption::Play,
            MenuOption::Rules,
            MenuOption::Settings,
            MenuOption::Quit,
        ]
    }

    /// Get the display label for this option
    pub fn label(&self) -> &'static str {
        match self {
            MenuOption::Play => "Play",
            MenuOption::Rules => "Rules",
            MenuOption::Settings => "Settings",
            MenuOption::Quit => "Quit",
        }
    }
}

/// Row on the settings screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsOption {
    SoundEffects,
    BotPace,
    Back,
}

impl SettingsOption {
    pub fn all() -> &'static [SettingsOption] {
        &[
            SettingsOption::SoundEffects,
            SettingsOption::BotPace,
            SettingsOption::Back,
        ]
    }

    /// Label including the current value
    pub fn label(&self, settings: &Settings) -> String {
        match self {
            SettingsOption::SoundEffects => format!(
                "Sound effects: {}",
                if settings.sound_effects { "On" } else { "Off" }
            ),
            SettingsOption::BotPace => format!("Bot pace: {}", settings.bot_pace.label()),
            SettingsOption::Back => "Back".to_string(),
        }
    }
}

/// The current application screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Menu { selected: usize },
    /// Up to three human names; blank seats go to bots
    PlayerSetup { names: Vec<String>, focused: usize },
    Playing,
    GameOver,
    Rules,
    Settings { selected: usize },
    Error { message: String },
}

/// Main application coordinator
pub struct AppCoordinator {
    /// Current screen
    pub screen: Screen,
    /// Whether the application should quit
    pub should_quit: bool,
    pub session: Session,
    words: WordPool,
    storage: Option<Storage>,
    settings: Settings,
    /// Names from the last setup, offered again on the next game
    last_names: Vec<String>,
}

impl AppCoordinator {
    /// Load settings and words and start at the menu.
    ///
    /// Without storage, settings are defaults and word rotation is not kept.
    pub fn new(config: &GameConfig, storage: Option<Storage>) -> Self {
        let settings = match storage.as_ref().map(Storage::load_settings) {
            Some(Ok(settings)) => settings,
            Some(Err(e)) => {
                warn!(error = %e, "failed to load settings, using defaults");
                Settings::default()
            }
            None => Settings::default(),
        };

        let cache = match Storage::word_cache_path() {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, "no word cache location");
                None
            }
        };
        let list = words::load(cache.as_deref(), config.words_import.as_deref());

        let saved = storage
            .as_ref()
            .and_then(|storage| match storage.load_pool_state(list.version) {
                Ok(saved) => saved,
                Err(e) => {
                    warn!(error = %e, "failed to load word rotation");
                    None
                }
            });
        let words = WordPool::restore(list, saved, StdRng::from_os_rng());

        Self::from_parts(Session::new(config, settings), words, storage, settings)
    }

    pub fn from_parts(
        session: Session,
        words: WordPool,
        storage: Option<Storage>,
        settings: Settings,
    ) -> Self {
        Self {
            screen: Screen::Menu { selected: 0 },
            should_quit: false,
            session,
            words,
            storage,
            settings,
            last_names: Vec::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Go back to the main menu, abandoning any game
    pub fn go_to_menu(&mut self) {
        self.session.reset_game();
        self.screen = Screen::Menu { selected: 0 };
    }

    /// Sound to play now, if sound effects are on.
    pub fn take_sound(&mut self) -> Option<SoundCue> {
        let cue = self.session.take_sound();
        cue.filter(|_| self.settings.sound_effects)
    }

    /// Drive bot turns (call regularly)
    pub fn tick(&mut self, now: Instant) {
        if self.screen == Screen::Playing && self.session.tick(now) {
            self.check_game_over();
        }
    }

    pub fn on_up(&mut self) {
        match &mut self.screen {
            Screen::Menu { selected } | Screen::Settings { selected } => {
                *selected = selected.saturating_sub(1);
            }
            Screen::PlayerSetup { focused, .. } => {
                *focused = focused.saturating_sub(1);
            }
            _ => {}
        }
    }

    pub fn on_down(&mut self) {
        match &mut self.screen {
            Screen::Menu { selected } => {
                if *selected < MenuOption::all().len() - 1 {
                    *selected += 1;
                }
            }
            Screen::Settings { selected } => {
                if *selected < SettingsOption::all().len() - 1 {
                    *selected += 1;
                }
            }
            Screen::PlayerSetup { names, focused } => {
                if *focused < names.len() - 1 {
                    *focused += 1;
                }
            }
            _ => {}
        }
    }

    /// Tab cycles through the name fields
    pub fn on_tab(&mut self) {
        if let Screen::PlayerSetup { names, focused } = &mut self.screen {
            *focused = (*focused + 1) % names.len();
        }
    }

    pub fn on_char(&mut self, c: char) {
        match &mut self.screen {
            Screen::PlayerSetup { names, focused } => {
                let name = &mut names[*focused];
                if name.chars().count() < MAX_NAME_LEN {
                    name.push(c);
                }
            }
            Screen::Playing => {
                if !c.is_control() {
                    self.session.input.push(c);
                }
            }
            _ => {}
        }
    }

    pub fn on_backspace(&mut self) {
        match &mut self.screen {
            Screen::PlayerSetup { names, focused } => {
                names[*focused].pop();
            }
            Screen::Playing => {
                self.session.input.pop();
            }
            _ => {}
        }
    }

    pub fn on_escape(&mut self) {
        match self.screen {
            Screen::Menu { .. } => self.quit(),
            _ => self.go_to_menu(),
        }
    }

    /// Enter: select, confirm, spin or submit depending on the screen
    pub fn on_enter(&mut self) {
        match self.screen.clone() {
            Screen::Menu { selected } => self.menu_select(selected),
            Screen::PlayerSetup { names, .. } => self.start_game(names),
            Screen::Playing => {
                // Errors are already shown as feedback
                let _ = if self.session.input.trim().is_empty() {
                    self.session.request_spin().map(|_| ())
                } else {
                    self.session.submit_input().map(|_| ())
                };
                self.check_game_over();
            }
            Screen::GameOver => self.open_setup(),
            Screen::Settings { selected } => self.settings_select(selected),
            Screen::Rules | Screen::Error { .. } => self.go_to_menu(),
        }
    }

    fn menu_select(&mut self, selected: usize) {
        match MenuOption::all()[selected] {
            MenuOption::Play => self.open_setup(),
            MenuOption::Rules => self.screen = Screen::Rules,
            MenuOption::Settings => self.screen = Screen::Settings { selected: 0 },
            MenuOption::Quit => self.quit(),
        }
    }

    fn open_setup(&mut self) {
        let mut names = self.last_names.clone();
        names.resize(3, String::new());
        self.screen = Screen::PlayerSetup { names, focused: 0 };
    }

    /// Draw a word and start the round.
    pub fn start_game(&mut self, names: Vec<String>) {
        let word = match self.words.next_word() {
            Ok(word) => word,
            Err(e) => {
                warn!(error = %e, "no word available");
                self.screen = Screen::Error {
                    message: format!("Cannot start a game: {}", e),
                };
                return;
            }
        };
        self.save_word_rotation();

        info!(remaining = self.words.remaining(), "new word drawn");
        self.session.start_game(&names, word);
        self.last_names = names;
        self.screen = Screen::Playing;
    }

    fn settings_select(&mut self, selected: usize) {
        match SettingsOption::all()[selected] {
            SettingsOption::SoundEffects => {
                self.settings.sound_effects = !self.settings.sound_effects;
            }
            SettingsOption::BotPace => {
                self.settings.bot_pace = self.settings.bot_pace.next();
            }
            SettingsOption::Back => {
                self.screen = Screen::Menu { selected: 0 };
                return;
            }
        }
        self.session.set_settings(self.settings);
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.save_settings(&self.settings) {
                warn!(error = %e, "failed to save settings");
            }
        }
    }

    fn save_word_rotation(&self) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.save_pool_state(&self.words.snapshot()) {
                warn!(error = %e, "failed to save word rotation");
            }
        }
    }

    fn check_game_over(&mut self) {
        if self.session.state().is_some_and(|state| state.is_game_over) {
            self.screen = Screen::GameOver;
        }
    }
}
