//! Persistent storage using SQLite (rusqlite)
//!
//! This module provides:
//! - OS-standard data directory location (via `directories` crate)
//! - SQLite database with schema versioning
//! - User settings as key/value rows
//! - Word rotation progress per word-list version

use crate::config::{BotPace, Settings};
use crate::words::PoolState;
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Current schema version. Bump this when making schema changes.
/// Version history:
/// - v1: meta and settings tables
/// - v2: word_pool table
const SCHEMA_VERSION: u32 = 2;

const DB_FILE: &str = "wonders.db";
const WORDS_FILE: &str = "words.csv";

const KEY_SOUND_EFFECTS: &str = "sound_effects";
const KEY_BOT_PACE: &str = "bot_pace";

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("could not determine data directory")]
    NoDataDirectory,
    #[error("database schema version {found} is newer than supported version {supported}")]
    FutureSchemaVersion { found: u32, supported: u32 },
    #[error("failed to create data directory: {0}")]
    CreateDirFailed(std::io::Error),
    #[error("migration from v{from} to v{to} failed: {reason}")]
    MigrationFailed { from: u32, to: u32, reason: String },
}

/// The main storage handle.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open or create the storage database.
    ///
    /// Uses OS-standard directories:
    /// - Linux: `$XDG_DATA_HOME/wonders/` or `~/.local/share/wonders/`
    /// - macOS: `~/Library/Application Support/wonders/`
    pub fn open() -> Result<Self, StorageError> {
        let data_dir = Self::data_dir()?;
        std::fs::create_dir_all(&data_dir).map_err(StorageError::CreateDirFailed)?;

        let conn = Connection::open(data_dir.join(DB_FILE))?;
        let storage = Storage { conn };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Open an in-memory database (for testing).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let storage = Storage {
            conn: Connection::open_in_memory()?,
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Get the OS-standard data directory.
    pub fn data_dir() -> Result<PathBuf, StorageError> {
        ProjectDirs::from("", "", "wonders")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDirectory)
    }

    /// Where the downloaded or imported word list is cached.
    pub fn word_cache_path() -> Result<PathBuf, StorageError> {
        Ok(Self::data_dir()?.join(WORDS_FILE))
    }

    /// Load settings, falling back to defaults for missing or unknown values.
    pub fn load_settings(&self) -> Result<Settings, StorageError> {
        let defaults = Settings::default();
        let sound_effects = match self.setting(KEY_SOUND_EFFECTS)?.as_deref() {
            Some("1") => true,
            Some("0") => false,
            _ => defaults.sound_effects,
        };
        let bot_pace = self
            .setting(KEY_BOT_PACE)?
            .and_then(|key| BotPace::from_key(&key))
            .unwrap_or(defaults.bot_pace);

        Ok(Settings {
            sound_effects,
            bot_pace,
        })
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), StorageError> {
        let sound = if settings.sound_effects { "1" } else { "0" };
        self.set_setting(KEY_SOUND_EFFECTS, sound)?;
        self.set_setting(KEY_BOT_PACE, settings.bot_pace.key())?;
        debug!(?settings, "saved settings");
        Ok(())
    }

    /// Saved rotation for a word-list version, if any.
    pub fn load_pool_state(&self, version: u32) -> Result<Option<PoolState>, StorageError> {
        let row = self
            .conn
            .query_row(
                "SELECT shuffled_order, used_indices FROM word_pool WHERE version = ?1",
                params![version],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        Ok(row.and_then(|(order, used)| {
            Some(PoolState {
                version,
                order: decode_indices(&order)?,
                used: decode_indices(&used)?,
            })
        }))
    }

    /// Store rotation progress. Rows for other versions are dropped.
    pub fn save_pool_state(&self, state: &PoolState) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM word_pool WHERE version <> ?1", params![state.version])?;
        self.conn.execute(
            "INSERT OR REPLACE INTO word_pool (version, shuffled_order, used_indices) VALUES (?1, ?2, ?3)",
            params![
                state.version,
                encode_indices(&state.order),
                encode_indices(&state.used)
            ],
        )?;
        Ok(())
    }

    // Private helper methods

    fn setting(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn initialize_schema(&self) -> Result<(), StorageError> {
        let current_version = self.get_schema_version()?;

        if current_version == 0 {
            self.create_schema()?;
        } else if current_version < SCHEMA_VERSION {
            self.migrate_schema(current_version)?;
        } else if current_version > SCHEMA_VERSION {
            return Err(StorageError::FutureSchemaVersion {
                found: current_version,
                supported: SCHEMA_VERSION,
            });
        }

        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StorageError> {
        let table_exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='meta'",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version = self
            .conn
            .query_row("SELECT schema_version FROM meta LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?
            .unwrap_or(0);

        Ok(version)
    }

    fn create_schema(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE meta (
                schema_version INTEGER NOT NULL
            );

            CREATE TABLE settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
        self.create_word_pool_table()?;

        self.conn.execute(
            "INSERT INTO meta (schema_version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;

        Ok(())
    }

    fn migrate_schema(&self, from_version: u32) -> Result<(), StorageError> {
        let mut current_version = from_version;

        while current_version < SCHEMA_VERSION {
            match current_version {
                1 => {
                    self.create_word_pool_table()?;
                    current_version = 2;
                }
                _ => {
                    return Err(StorageError::MigrationFailed {
                        from: current_version,
                        to: SCHEMA_VERSION,
                        reason: format!("no migration path from version {}", current_version),
                    });
                }
            }
        }

        self.conn.execute(
            "UPDATE meta SET schema_version = ?1",
            params![SCHEMA_VERSION],
        )?;

        Ok(())
    }

    fn create_word_pool_table(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            -- Index lists are comma-separated positions into the word list
            CREATE TABLE IF NOT EXISTS word_pool (
                version INTEGER PRIMARY KEY,
                shuffled_order TEXT NOT NULL,
                used_indices TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }
}

fn encode_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// `None` if any entry is not a number.
fn decode_indices(text: &str) -> Option<Vec<usize>> {
    if text.is_empty() {
        return Some(Vec::new());
    }
    text.split(',').map(|part| part.trim().parse().ok()).collect()
}
