//! Session driver and screen flow

pub mod screen;
pub mod state;

pub use screen::{AppCoordinator, MenuOption, Screen, SettingsOption};
pub use state::Session;
