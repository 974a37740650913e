use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

// Represents the state of the public landing screen
pub struct LandingState;

impl LandingState {
    pub fn new() -> Self {
        Self
    }
}

pub enum LandingAction {
    GoLogin,
    GoRegister,
    Exit,
}

pub fn render_landing<B: Backend>(f: &mut Frame<B>, _state: &mut LandingState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(f.size());

    let title = Paragraph::new(vec![
        Spans::from(Span::styled(
            "Lead Manager",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Spans::from(Span::raw(
            "Find and qualify prospects from community discussions",
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let pitch = Paragraph::new(vec![
        Spans::from(Span::raw(
            "Describe your business, pick the forums that matter, and let the",
        )),
        Spans::from(Span::raw(
            "automation surface scored leads for you to review and triage.",
        )),
        Spans::from(Span::raw("")),
        Spans::from(Span::raw("Searches run in the background; results land")),
        Spans::from(Span::raw("in your workspace ready for approval.")),
    ])
    .alignment(Alignment::Center);
    f.render_widget(pitch, chunks[1]);

    let help = Paragraph::new("<L> Sign In | <R> Create Account | <Q> Quit")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(help, chunks[2]);
}

pub fn handle_input(_state: &mut LandingState) -> Result<Option<LandingAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Some(LandingAction::Exit)),
            KeyCode::Char('l') | KeyCode::Enter => return Ok(Some(LandingAction::GoLogin)),
            KeyCode::Char('r') => return Ok(Some(LandingAction::GoRegister)),
            _ => {}
        }
    }
    Ok(None)
}
