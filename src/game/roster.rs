//! Seating players: human names first, bots fill the empty chairs

use super::{Player, TABLE_SIZE};
use rand::prelude::*;

/// Names bots are given when they join the table.
pub const BOT_NAMES: [&str; 3] = ["Reader Bot", "Lucky Bot", "Scholar Bot"];

/// Build the table from human-supplied names.
///
/// Blank names are dropped and the rest trimmed; humans get ids from 0 in
/// the given order, and bots with distinct names from `BOT_NAMES` take the
/// remaining seats. Extra names beyond the table size are ignored.
pub fn build<R: Rng>(names: &[String], rng: &mut R) -> Vec<Player> {
    let mut players: Vec<Player> = names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .take(TABLE_SIZE)
        .enumerate()
        .map(|(id, name)| Player::human(id, name))
        .collect();

    let missing = TABLE_SIZE - players.len();
    let bot_names: Vec<&str> = BOT_NAMES.choose_multiple(rng, missing).copied().collect();
    for name in bot_names {
        let id = players.len();
        players.push(Player::bot(id, name));
    }

    players
}
