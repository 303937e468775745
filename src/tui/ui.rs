//! UI rendering using ratatui
//!
//! Supports multiple screens:
//! - Menu: Main menu with options
//! - PlayerSetup: Names for up to three human players
//! - Playing: The board, the drum and the players
//! - GameOver: Final standings and the secret word
//! - Rules, Settings
//! - Error: Error message display

use crate::app::{AppCoordinator, MenuOption, Screen, Session, SettingsOption};
use crate::config::Settings;
use crate::game::{GameState, Outcome, Phase, Player, PLACEHOLDER};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

const RULES: &str = "\
Players take turns spinning the drum.

A number sector: name a letter. Every copy of it opens and you score
the sector value for each one, then spin again. A wrong letter passes
the turn.

Double: as a number sector, but the points are doubled.
Plus: open any letter for free and spin again.
Zero: the turn passes.
Bankrupt: you lose every point and the turn passes.

After any scoring sector you may name the whole word instead.
Opening the last letter or naming the word wins 1000 points.";

/// Render the appropriate screen based on app state
pub fn render(frame: &mut Frame, coordinator: &AppCoordinator) {
    match &coordinator.screen {
        Screen::Menu { selected } => render_menu(frame, *selected),
        Screen::PlayerSetup { names, focused } => render_setup(frame, names, *focused),
        Screen::Playing => render_game(frame, &coordinator.session),
        Screen::GameOver => render_game_over(frame, &coordinator.session),
        Screen::Rules => render_rules(frame),
        Screen::Settings { selected } => render_settings(frame, coordinator.settings(), *selected),
        Screen::Error { message } => render_error(frame, message),
    }
}

/// Render the main menu
fn render_menu(frame: &mut Frame, selected: usize) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Logo
            Constraint::Length(1), // Spacer
            Constraint::Min(6),    // Menu options
            Constraint::Length(2), // Footer
        ])
        .margin(2)
        .split(area);

    let logo = r#"
__        __              _
\ \      / /__  _ __   __| | ___ _ __ ___
 \ \ /\ / / _ \| '_ \ / _` |/ _ \ '__/ __|
  \ V  V / (_) | | | | (_| |  __/ |  \__ \
   \_/\_/ \___/|_| |_|\__,_|\___|_|  |___/
"#;
    let logo_widget = Paragraph::new(logo)
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center);
    frame.render_widget(logo_widget, layout[0]);

    let items: Vec<ListItem> = MenuOption::all()
        .iter()
        .enumerate()
        .map(|(i, opt)| selectable(opt.label(), i == selected))
        .collect();
    frame.render_widget(List::new(items).block(Block::default()), layout[2]);

    render_footer(frame, layout[3], "↑↓ Navigate  Enter Select  Esc Quit");
}

/// Render the player setup form
fn render_setup(frame: &mut Frame, names: &[String], focused: usize) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(2), // Hint
            Constraint::Min(6),    // Name fields
            Constraint::Length(2), // Footer
        ])
        .margin(1)
        .split(area);

    render_title(frame, layout[0], "Who is playing?");

    let hint = Paragraph::new("Leave a seat blank and a bot takes it")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(hint, layout[1]);

    let items: Vec<ListItem> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let cursor = if i == focused { "_" } else { "" };
            let label = format!("Player {}: {}{}", i + 1, name, cursor);
            selectable(&label, i == focused)
        })
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Players"));
    frame.render_widget(list, layout[2]);

    render_footer(frame, layout[3], "Tab/↑↓ Field  Enter Start  Esc Back");
}

/// Render the in-game screen
fn render_game(frame: &mut Frame, session: &Session) {
    let Some(state) = session.state() else {
        render_error(frame, "no game in progress");
        return;
    };
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Board
            Constraint::Length(2), // Hint
            Constraint::Length(4), // Drum
            Constraint::Min(6),    // Players and input
            Constraint::Length(2), // Footer
        ])
        .margin(1)
        .split(area);

    let board = Paragraph::new(format_board(&state.revealed_mask))
        .style(Style::default().fg(Color::Cyan).bold())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(board, layout[0]);

    let hint = Paragraph::new(state.word.hint.as_str())
        .style(Style::default().fg(Color::Gray).italic())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(hint, layout[1]);

    render_drum(frame, layout[2], session);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(30),    // Input area
            Constraint::Length(28), // Players
        ])
        .split(layout[3]);

    render_input_area(frame, columns[0], session, state);
    render_players(frame, columns[1], state);

    let footer = match state.phase() {
        Phase::AwaitingSpin => "Enter Spin  Esc Menu",
        Phase::AwaitingGuess => "Type a letter or the word, Enter Submit  Esc Menu",
        Phase::AwaitingBonusPick => "Type any letter, Enter Open  Esc Menu",
        Phase::GameOver => "Enter Continue",
    };
    render_footer(frame, layout[4], footer);
}

/// Render the distinct drum sectors, highlighting the last one spun
fn render_drum(frame: &mut Frame, area: Rect, session: &Session) {
    let last = session.last_outcome();
    let mut sectors: Vec<Outcome> = Vec::new();
    for sector in session.wheel().sectors() {
        if !sectors.contains(sector) {
            sectors.push(*sector);
        }
    }

    let spans: Vec<Span> = sectors
        .iter()
        .flat_map(|sector| {
            let style = if Some(*sector) == last {
                Style::default().fg(Color::Black).bg(outcome_color(*sector)).bold()
            } else {
                Style::default().fg(outcome_color(*sector))
            };
            [Span::styled(format!(" {} ", sector.label()), style), Span::raw(" ")]
        })
        .collect();

    let drum = Paragraph::new(Line::from(spans))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title("Drum"),
        );
    frame.render_widget(drum, area);
}

/// Render the input line, feedback and used letters
fn render_input_area(frame: &mut Frame, area: Rect, session: &Session, state: &GameState) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Turn
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Input line
            Constraint::Length(1), // Spacer
            Constraint::Length(2), // Feedback
            Constraint::Length(1), // Spacer
            Constraint::Min(1),    // Used letters
        ])
        .split(area);

    let player = state.current_player();
    let turn_text = if session.is_bot_acting() || player.is_bot {
        format!("{} is thinking...", player.name)
    } else {
        format!("{}, your move", player.name)
    };
    let turn = Paragraph::new(turn_text).style(Style::default().fg(Color::Yellow).bold());
    frame.render_widget(turn, main_layout[0]);

    let input = Paragraph::new(format!("> {}_", session.input))
        .style(Style::default().fg(Color::White));
    frame.render_widget(input, main_layout[2]);

    let feedback = Paragraph::new(session.feedback.as_str())
        .style(Style::default().fg(Color::Green))
        .wrap(Wrap { trim: true });
    frame.render_widget(feedback, main_layout[4]);

    let used = Paragraph::new(format!("Used: {}", format_used_letters(state)))
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true });
    frame.render_widget(used, main_layout[6]);
}

/// Render the players panel with the current player marked
fn render_players(frame: &mut Frame, area: Rect, state: &GameState) {
    let items: Vec<ListItem> = state
        .players
        .iter()
        .enumerate()
        .map(|(i, player)| {
            let current = i == state.current_player_index;
            let marker = if current { "▶" } else { " " };
            let style = if current {
                Style::default().fg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!("{} {}", marker, player_line(player))).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("Players"),
    );
    frame.render_widget(list, area);
}

/// Render the final standings
fn render_game_over(frame: &mut Frame, session: &Session) {
    let Some(state) = session.state() else {
        render_error(frame, "no game in progress");
        return;
    };
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Word
            Constraint::Min(5),    // Standings
            Constraint::Length(2), // Footer
        ])
        .margin(1)
        .split(area);

    let winner = state
        .winner()
        .map(|player| format!("{} wins!", player.name))
        .unwrap_or_else(|| "Game over".to_string());
    render_title(frame, layout[0], &winner);

    let word = Paragraph::new(format!("The word was {}", state.word.text))
        .style(Style::default().fg(Color::Cyan).bold())
        .alignment(Alignment::Center);
    frame.render_widget(word, layout[1]);

    let items: Vec<ListItem> = session
        .leaderboard()
        .iter()
        .enumerate()
        .map(|(i, player)| {
            let prefix = match i {
                0 => "🥇",
                1 => "🥈",
                2 => "🥉",
                _ => "  ",
            };
            let style = if i == 0 {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!("{} {}", prefix, player_line(player))).style(style)
        })
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Standings"));
    frame.render_widget(list, layout[2]);

    render_footer(frame, layout[3], "Enter Play again  Esc Menu");
}

fn render_rules(frame: &mut Frame) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Text
            Constraint::Length(2), // Footer
        ])
        .margin(1)
        .split(area);

    render_title(frame, layout[0], "Rules");
    let rules = Paragraph::new(RULES)
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false });
    frame.render_widget(rules, layout[1]);
    render_footer(frame, layout[2], "Enter/Esc Back");
}

fn render_settings(frame: &mut Frame, settings: &Settings, selected: usize) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(4),    // Options
            Constraint::Length(2), // Footer
        ])
        .margin(1)
        .split(area);

    render_title(frame, layout[0], "Settings");
    let items: Vec<ListItem> = SettingsOption::all()
        .iter()
        .enumerate()
        .map(|(i, opt)| selectable(&opt.label(settings), i == selected))
        .collect();
    frame.render_widget(List::new(items), layout[1]);
    render_footer(frame, layout[2], "↑↓ Navigate  Enter Change  Esc Back");
}

/// Render error screen
fn render_error(frame: &mut Frame, message: &str) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Percentage(40),
        ])
        .margin(2)
        .split(area);

    let error = Paragraph::new(format!("Error: {}", message))
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center);
    frame.render_widget(error, layout[1]);

    render_footer(frame, layout[2], "Press Esc to go back");
}

fn render_title(frame: &mut Frame, area: Rect, title: &str) {
    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut Frame, area: Rect, text: &str) {
    let footer = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

/// A list row with the menu cursor
fn selectable(label: &str, selected: bool) -> ListItem<'static> {
    let style = if selected {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::White)
    };
    let prefix = if selected { "> " } else { "  " };
    ListItem::new(format!("{}{}", prefix, label)).style(style)
}

fn outcome_color(outcome: Outcome) -> Color {
    match outcome {
        Outcome::Points(_) => Color::White,
        Outcome::Double => Color::Magenta,
        Outcome::Zero => Color::DarkGray,
        Outcome::Bonus => Color::Green,
        Outcome::Bankrupt => Color::Red,
    }
}

fn player_line(player: &Player) -> String {
    let tag = if player.is_bot { " (bot)" } else { "" };
    format!("{}{} - {}", player.name, tag, player.score)
}

/// Format the masked word as cells: `[К] [ ] [Т]`
fn format_board(mask: &str) -> String {
    mask.chars()
        .map(|c| {
            if c == PLACEHOLDER {
                "[ ]".to_string()
            } else {
                format!("[{}]", c)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_used_letters(state: &GameState) -> String {
    state
        .used_letters
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
