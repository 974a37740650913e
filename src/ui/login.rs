use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::components::{render_text_field, TextFieldState};

#[derive(Clone, Copy, PartialEq)]
pub enum LoginField {
    Email,
    Password,
}

pub struct LoginState {
    pub email: TextFieldState,
    pub password: TextFieldState,
    pub current_field: LoginField,
    pub editing: bool,
    pub error: Option<String>,
    pub busy: bool,
}

impl LoginState {
    pub fn new() -> Self {
        Self {
            email: TextFieldState::new(),
            password: TextFieldState::masked(),
            current_field: LoginField::Email,
            editing: false,
            error: None,
            busy: false,
        }
    }

    /// Shown when an expired session bounced the user here.
    pub fn with_notice(notice: &str) -> Self {
        let mut state = Self::new();
        state.error = Some(notice.to_string());
        state
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        match self.current_field {
            LoginField::Email => self.email.handle_key(key),
            LoginField::Password => self.password.handle_key(key),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

pub enum LoginAction {
    Submit { email: String, password: String },
    GoRegister,
    GoForgotPassword,
    Back,
}

pub fn render_login<B: Backend>(f: &mut Frame<B>, state: &mut LoginState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(f.size());

    let title = Paragraph::new("Sign in to your workspace")
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_text_field(
        f,
        chunks[1],
        "Email",
        &state.email,
        state.current_field == LoginField::Email,
        state.editing,
    );
    render_text_field(
        f,
        chunks[2],
        "Password",
        &state.password,
        state.current_field == LoginField::Password,
        state.editing,
    );

    if let Some(error) = &state.error {
        let message = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
        f.render_widget(message, chunks[3]);
    } else if state.busy {
        let message = Paragraph::new("Signing in...").style(Style::default().fg(Color::Gray));
        f.render_widget(message, chunks[3]);
    }

    let help_text = if state.editing {
        "Enter - Save field | Esc - Cancel editing"
    } else {
        "Enter - Edit field | Up/Down - Navigate | S - Sign in | R - Register | F - Forgot password | Esc - Back"
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[5]);
}

pub fn handle_input(state: &mut LoginState) -> Result<Option<LoginAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Esc => {
                if state.editing {
                    state.editing = false;
                } else {
                    return Ok(Some(LoginAction::Back));
                }
            }
            KeyCode::Enter => {
                state.editing = !state.editing;
            }
            KeyCode::Up if !state.editing => state.next_field(),
            KeyCode::Down if !state.editing => state.next_field(),
            KeyCode::Tab => state.next_field(),
            KeyCode::Char('s') if !state.editing => {
                if state.is_valid() && !state.busy {
                    return Ok(Some(LoginAction::Submit {
                        email: state.email.value.trim().to_string(),
                        password: state.password.value.clone(),
                    }));
                }
            }
            KeyCode::Char('r') if !state.editing => return Ok(Some(LoginAction::GoRegister)),
            KeyCode::Char('f') if !state.editing => {
                return Ok(Some(LoginAction::GoForgotPassword))
            }
            _ if state.editing => state.edit_current_field(key.code),
            _ => {}
        }
    }
    Ok(None)
}
