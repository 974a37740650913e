use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::NewUser;
use crate::ui::components::{render_text_field, TextFieldState};

#[derive(Clone, Copy, PartialEq)]
pub enum RegisterField {
    Username,
    Email,
    Password,
}

pub struct RegisterState {
    pub username: TextFieldState,
    pub email: TextFieldState,
    pub password: TextFieldState,
    pub current_field: RegisterField,
    pub editing: bool,
    pub error: Option<String>,
    pub busy: bool,
}

impl RegisterState {
    pub fn new() -> Self {
        Self {
            username: TextFieldState::new(),
            email: TextFieldState::new(),
            password: TextFieldState::masked(),
            current_field: RegisterField::Username,
            editing: false,
            error: None,
            busy: false,
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            RegisterField::Username => RegisterField::Email,
            RegisterField::Email => RegisterField::Password,
            RegisterField::Password => RegisterField::Username,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            RegisterField::Username => RegisterField::Password,
            RegisterField::Email => RegisterField::Username,
            RegisterField::Password => RegisterField::Email,
        };
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        match self.current_field {
            RegisterField::Username => self.username.handle_key(key),
            RegisterField::Email => self.email.handle_key(key),
            RegisterField::Password => self.password.handle_key(key),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.username.is_empty() && !self.email.is_empty() && !self.password.is_empty()
    }

    pub fn new_user(&self) -> NewUser {
        NewUser {
            username: self.username.value.trim().to_string(),
            email: self.email.value.trim().to_string(),
            password: self.password.value.clone(),
        }
    }
}

pub enum RegisterAction {
    Submit(NewUser),
    GoLogin,
    Back,
}

pub fn render_register<B: Backend>(f: &mut Frame<B>, state: &mut RegisterState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(f.size());

    let title = Paragraph::new("Create your account")
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_text_field(
        f,
        chunks[1],
        "Username",
        &state.username,
        state.current_field == RegisterField::Username,
        state.editing,
    );
    render_text_field(
        f,
        chunks[2],
        "Email",
        &state.email,
        state.current_field == RegisterField::Email,
        state.editing,
    );
    render_text_field(
        f,
        chunks[3],
        "Password",
        &state.password,
        state.current_field == RegisterField::Password,
        state.editing,
    );

    if let Some(error) = &state.error {
        let message = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
        f.render_widget(message, chunks[4]);
    } else if state.busy {
        let message =
            Paragraph::new("Creating your account...").style(Style::default().fg(Color::Gray));
        f.render_widget(message, chunks[4]);
    }

    let help_text = if state.editing {
        "Enter - Save field | Esc - Cancel editing"
    } else {
        "Enter - Edit field | Up/Down - Navigate | S - Create account | L - Sign in | Esc - Back"
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[6]);
}

pub fn handle_input(state: &mut RegisterState) -> Result<Option<RegisterAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Esc => {
                if state.editing {
                    state.editing = false;
                } else {
                    return Ok(Some(RegisterAction::Back));
                }
            }
            KeyCode::Enter => {
                state.editing = !state.editing;
            }
            KeyCode::Up if !state.editing => state.previous_field(),
            KeyCode::Down if !state.editing => state.next_field(),
            KeyCode::Tab => state.next_field(),
            KeyCode::Char('s') if !state.editing => {
                if state.is_valid() && !state.busy {
                    return Ok(Some(RegisterAction::Submit(state.new_user())));
                }
            }
            KeyCode::Char('l') if !state.editing => return Ok(Some(RegisterAction::GoLogin)),
            _ if state.editing => state.edit_current_field(key.code),
            _ => {}
        }
    }
    Ok(None)
}
