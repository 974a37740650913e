use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::ui::components::{render_text_field, TextFieldState};

/// The reset flow itself lives in the external platform; this screen only
/// collects the address and confirms the request.
pub struct ForgotPasswordState {
    pub email: TextFieldState,
    pub editing: bool,
    pub message: Option<String>,
}

impl ForgotPasswordState {
    pub fn new() -> Self {
        Self {
            email: TextFieldState::new(),
            editing: false,
            message: None,
        }
    }

    pub fn submit(&mut self) {
        if self.email.is_empty() {
            return;
        }
        let email = self.email.value.trim().to_string();
        log::info!("password reset requested for {email}");
        self.message = Some(format!(
            "If an account exists for {email}, a reset link is on its way."
        ));
    }
}

pub enum ForgotPasswordAction {
    GoLogin,
}

pub fn render_forgot_password<B: Backend>(f: &mut Frame<B>, state: &mut ForgotPasswordState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(f.size());

    let title = Paragraph::new("Reset your password")
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_text_field(f, chunks[1], "Email", &state.email, true, state.editing);

    if let Some(message) = &state.message {
        let confirmation = Paragraph::new(message.as_str())
            .style(Style::default().fg(Color::Green))
            .wrap(Wrap { trim: true });
        f.render_widget(confirmation, chunks[2]);
    }

    let help_text = if state.editing {
        "Enter - Save field | Esc - Cancel editing"
    } else {
        "Enter - Edit field | S - Send reset link | Esc - Back to sign in"
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[4]);
}

pub fn handle_input(state: &mut ForgotPasswordState) -> Result<Option<ForgotPasswordAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Esc => {
                if state.editing {
                    state.editing = false;
                } else {
                    return Ok(Some(ForgotPasswordAction::GoLogin));
                }
            }
            KeyCode::Enter => state.editing = !state.editing,
            KeyCode::Char('s') if !state.editing => state.submit(),
            _ if state.editing => state.email.handle_key(key.code),
            _ => {}
        }
    }
    Ok(None)
}
