use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::{CompanyProfile, User};
use crate::ui::components::{render_text_field, TextFieldState};
use crate::ui::{Route, NAV_HELP};

#[derive(Clone, Copy, PartialEq)]
pub enum ProfileField {
    CompanyName,
    Activity,
    Description,
    B2b2c,
}

pub struct ProfileState {
    pub user: User,
    pub company_name: TextFieldState,
    pub activity: TextFieldState,
    pub description: TextFieldState,
    pub b2b2c: TextFieldState,
    pub current_field: ProfileField,
    pub form_open: bool,
    pub editing: bool,
    pub error: Option<String>,
    pub busy: bool,
}

impl ProfileState {
    pub fn new(user: User) -> Self {
        let company_name = TextFieldState::with_value(user.company_name.clone());
        let activity = TextFieldState::with_value(user.activity.clone());
        let description = TextFieldState::with_value(user.description.clone());
        let b2b2c = TextFieldState::with_value(user.b2b2c.clone());
        Self {
            user,
            company_name,
            activity,
            description,
            b2b2c,
            current_field: ProfileField::CompanyName,
            form_open: false,
            editing: false,
            error: None,
            busy: false,
        }
    }

    /// Re-seeds the form after a successful save or a cancelled edit.
    pub fn reset_form(&mut self) {
        self.company_name = TextFieldState::with_value(self.user.company_name.clone());
        self.activity = TextFieldState::with_value(self.user.activity.clone());
        self.description = TextFieldState::with_value(self.user.description.clone());
        self.b2b2c = TextFieldState::with_value(self.user.b2b2c.clone());
        self.form_open = false;
        self.editing = false;
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            ProfileField::CompanyName => ProfileField::Activity,
            ProfileField::Activity => ProfileField::Description,
            ProfileField::Description => ProfileField::B2b2c,
            ProfileField::B2b2c => ProfileField::CompanyName,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            ProfileField::CompanyName => ProfileField::B2b2c,
            ProfileField::Activity => ProfileField::CompanyName,
            ProfileField::Description => ProfileField::Activity,
            ProfileField::B2b2c => ProfileField::Description,
        };
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        match self.current_field {
            ProfileField::CompanyName => self.company_name.handle_key(key),
            ProfileField::Activity => self.activity.handle_key(key),
            ProfileField::Description => self.description.handle_key(key),
            ProfileField::B2b2c => self.b2b2c.handle_key(key),
        }
    }

    pub fn profile(&self) -> CompanyProfile {
        CompanyProfile {
            company_name: self.company_name.value.trim().to_string(),
            activity: self.activity.value.trim().to_string(),
            description: self.description.value.trim().to_string(),
            b2b2c: self.b2b2c.value.trim().to_string(),
        }
    }
}

pub enum ProfileAction {
    Save(CompanyProfile),
    SignOut,
    Navigate(Route),
    Exit,
}

pub fn render_profile<B: Backend>(f: &mut Frame<B>, state: &mut ProfileState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(f.size());

    let header = Paragraph::new(vec![
        Spans::from(Span::styled(
            state.user.username.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Spans::from(vec![
            Span::raw(state.user.email.clone()),
            Span::styled(
                format!("  [{}]", state.user.subscription_plan),
                Style::default().fg(Color::Magenta),
            ),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL).title("Profile"));
    f.render_widget(header, chunks[0]);

    render_text_field(
        f,
        chunks[1],
        "Company name",
        &state.company_name,
        state.form_open && state.current_field == ProfileField::CompanyName,
        state.editing,
    );
    render_text_field(
        f,
        chunks[2],
        "Activity",
        &state.activity,
        state.form_open && state.current_field == ProfileField::Activity,
        state.editing,
    );
    render_text_field(
        f,
        chunks[3],
        "Description",
        &state.description,
        state.form_open && state.current_field == ProfileField::Description,
        state.editing,
    );
    render_text_field(
        f,
        chunks[4],
        "B2B / B2C",
        &state.b2b2c,
        state.form_open && state.current_field == ProfileField::B2b2c,
        state.editing,
    );

    if let Some(error) = &state.error {
        let message = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
        f.render_widget(message, chunks[5]);
    } else if state.busy {
        let message = Paragraph::new("Saving...").style(Style::default().fg(Color::Gray));
        f.render_widget(message, chunks[5]);
    }

    let help_text = if state.editing {
        "Enter - Save field | Esc - Cancel editing".to_string()
    } else if state.form_open {
        "Enter - Edit field | Up/Down - Navigate | S - Save | Esc - Discard changes".to_string()
    } else {
        format!("E - Edit profile | O - Sign out | Q - Quit | {NAV_HELP}")
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[7]);
}

pub fn handle_input(state: &mut ProfileState) -> Result<Option<ProfileAction>> {
    if let Event::Key(key) = event::read()? {
        if let Some(route) = crate::ui::private_route_for_key(key.code) {
            if !state.editing {
                return Ok(Some(ProfileAction::Navigate(route)));
            }
        }

        match key.code {
            KeyCode::Esc => {
                if state.editing {
                    state.editing = false;
                } else if state.form_open {
                    state.reset_form();
                }
            }
            KeyCode::Enter if state.form_open => {
                state.editing = !state.editing;
            }
            KeyCode::Up if state.form_open && !state.editing => state.previous_field(),
            KeyCode::Down if state.form_open && !state.editing => state.next_field(),
            KeyCode::Char('e') if !state.form_open => {
                state.form_open = true;
                state.error = None;
            }
            KeyCode::Char('s') if state.form_open && !state.editing => {
                if !state.busy {
                    return Ok(Some(ProfileAction::Save(state.profile())));
                }
            }
            KeyCode::Char('o') if !state.form_open => return Ok(Some(ProfileAction::SignOut)),
            KeyCode::Char('q') if !state.form_open => return Ok(Some(ProfileAction::Exit)),
            _ if state.editing => state.edit_current_field(key.code),
            _ => {}
        }
    }
    Ok(None)
}
