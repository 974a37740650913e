use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// A single-line text input shared by the form screens. Focus and editing
/// are owned by the parent screen; this only holds the value.
pub struct TextFieldState {
    pub value: String,
    pub masked: bool,
}

impl TextFieldState {
    pub fn new() -> Self {
        Self {
            value: String::new(),
            masked: false,
        }
    }

    pub fn masked() -> Self {
        Self {
            value: String::new(),
            masked: true,
        }
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            masked: false,
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) => {
                self.value.push(c);
            }
            KeyCode::Backspace => {
                self.value.pop();
            }
            _ => {}
        }
    }

    /// What gets drawn: masked fields render one dot per character.
    pub fn display(&self) -> String {
        if self.masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }
}

pub fn render_text_field<B: Backend>(
    f: &mut Frame<B>,
    area: Rect,
    label: &str,
    state: &TextFieldState,
    focused: bool,
    editing: bool,
) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let content = if focused && editing {
        Spans::from(vec![Span::styled(
            format!("{}|", state.display()),
            Style::default().add_modifier(Modifier::BOLD),
        )])
    } else {
        Spans::from(Span::raw(state.display()))
    };

    let field = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(label.to_string()),
    );
    f.render_widget(field, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masked_fields_hide_their_value() {
        let mut field = TextFieldState::masked();
        field.handle_key(KeyCode::Char('a'));
        field.handle_key(KeyCode::Char('b'));
        assert_eq!(field.display(), "**");
        assert_eq!(field.value, "ab");
    }

    #[test]
    fn backspace_pops_characters() {
        let mut field = TextFieldState::with_value("abc");
        field.handle_key(KeyCode::Backspace);
        assert_eq!(field.value, "ab");
    }
}
