use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::User;
use crate::ui::{Route, NAV_HELP};

pub struct SettingsState {
    pub user: User,
    pub store_endpoint: String,
    pub webhook_endpoint: Option<String>,
}

impl SettingsState {
    pub fn new(user: User, store_endpoint: String, webhook_endpoint: Option<String>) -> Self {
        Self {
            user,
            store_endpoint,
            webhook_endpoint,
        }
    }
}

pub enum SettingsAction {
    SignOut,
    Navigate(Route),
    Exit,
}

pub fn render_settings<B: Backend>(f: &mut Frame<B>, state: &mut SettingsState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(7),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.size());

    let label = Style::default().fg(Color::Gray);
    let active = if state.user.is_active {
        Span::styled("active", Style::default().fg(Color::Green))
    } else {
        Span::styled("inactive", Style::default().fg(Color::Red))
    };
    let account = Paragraph::new(vec![
        Spans::from(vec![
            Span::styled("Username: ", label),
            Span::raw(state.user.username.clone()),
        ]),
        Spans::from(vec![
            Span::styled("Email: ", label),
            Span::raw(state.user.email.clone()),
        ]),
        Spans::from(vec![
            Span::styled("Plan: ", label),
            Span::raw(state.user.subscription_plan.clone()),
        ]),
        Spans::from(vec![Span::styled("Status: ", label), active]),
    ])
    .block(Block::default().borders(Borders::ALL).title("Account"));
    f.render_widget(account, chunks[0]);

    let webhook = state
        .webhook_endpoint
        .clone()
        .unwrap_or_else(|| "not configured (searches are logged only)".to_string());
    let endpoints = Paragraph::new(vec![
        Spans::from(vec![
            Span::styled("Record store: ", label),
            Span::raw(state.store_endpoint.clone()),
        ]),
        Spans::from(vec![Span::styled("Automation webhook: ", label), Span::raw(webhook)]),
    ])
    .block(Block::default().borders(Borders::ALL).title("Endpoints"));
    f.render_widget(endpoints, chunks[1]);

    let help = Paragraph::new(format!("O - Sign out | Q - Quit | {NAV_HELP}"))
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

pub fn handle_input(_state: &mut SettingsState) -> Result<Option<SettingsAction>> {
    if let Event::Key(key) = event::read()? {
        if let Some(route) = crate::ui::private_route_for_key(key.code) {
            return Ok(Some(SettingsAction::Navigate(route)));
        }
        match key.code {
            KeyCode::Char('o') => return Ok(Some(SettingsAction::SignOut)),
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Some(SettingsAction::Exit)),
            _ => {}
        }
    }
    Ok(None)
}
