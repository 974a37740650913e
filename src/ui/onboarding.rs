use std::collections::BTreeSet;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::models::CompanyProfile;
use crate::ui::components::{render_text_field, TextFieldState};

pub struct Sector {
    pub name: &'static str,
    pub focus_areas: &'static [&'static str],
}

pub static SECTORS: [Sector; 4] = [
    Sector {
        name: "Technology",
        focus_areas: &["Software Development", "AI/ML", "Cloud Services", "Cybersecurity"],
    },
    Sector {
        name: "Services",
        focus_areas: &["Consulting", "Financial Services", "Marketing", "Healthcare"],
    },
    Sector {
        name: "Commerce",
        focus_areas: &["E-commerce", "Retail", "Wholesale", "Import/Export"],
    },
    Sector {
        name: "Industry",
        focus_areas: &["Manufacturing", "Construction", "Energy", "Logistics"],
    },
];

pub const AUDIENCES: [&str; 3] = ["B2B", "B2C", "Both"];

const LAST_STEP: usize = 4;

/// Four-step setup wizard: company name, sector, focus areas, description
/// and audience. The result lands in the user's company fields.
pub struct OnboardingState {
    pub step: usize,
    pub company_name: TextFieldState,
    pub sector: Option<usize>,
    sector_list: ListState,
    pub focus_areas: BTreeSet<usize>,
    focus_list: ListState,
    pub description: TextFieldState,
    pub audience: usize,
    pub editing: bool,
    pub error: Option<String>,
    pub busy: bool,
}

impl OnboardingState {
    pub fn new() -> Self {
        let mut sector_list = ListState::default();
        sector_list.select(Some(0));
        let mut focus_list = ListState::default();
        focus_list.select(Some(0));

        Self {
            step: 1,
            company_name: TextFieldState::new(),
            sector: None,
            sector_list,
            focus_areas: BTreeSet::new(),
            focus_list,
            description: TextFieldState::new(),
            audience: 0,
            editing: false,
            error: None,
            busy: false,
        }
    }

    pub fn next_step(&mut self) {
        if self.step < LAST_STEP {
            self.step += 1;
        }
    }

    pub fn previous_step(&mut self) {
        if self.step > 1 {
            self.step -= 1;
        }
    }

    fn list_len(&self) -> usize {
        match self.step {
            2 => SECTORS.len(),
            3 => self.current_sector().map_or(0, |s| s.focus_areas.len()),
            _ => 0,
        }
    }

    fn list_state(&mut self) -> Option<&mut ListState> {
        match self.step {
            2 => Some(&mut self.sector_list),
            3 => Some(&mut self.focus_list),
            _ => None,
        }
    }

    pub fn list_next(&mut self) {
        let len = self.list_len();
        if len == 0 {
            return;
        }
        if let Some(list) = self.list_state() {
            let i = match list.selected() {
                Some(i) if i >= len - 1 => 0,
                Some(i) => i + 1,
                None => 0,
            };
            list.select(Some(i));
        }
    }

    pub fn list_previous(&mut self) {
        let len = self.list_len();
        if len == 0 {
            return;
        }
        if let Some(list) = self.list_state() {
            let i = match list.selected() {
                Some(0) | None => len - 1,
                Some(i) => i - 1,
            };
            list.select(Some(i));
        }
    }

    /// Picking a sector advances to the focus-area step and resets any
    /// areas chosen under a different sector.
    pub fn pick_sector(&mut self) {
        let Some(i) = self.sector_list.selected() else {
            return;
        };
        if self.sector != Some(i) {
            self.focus_areas.clear();
            self.focus_list.select(Some(0));
        }
        self.sector = Some(i);
        self.next_step();
    }

    pub fn toggle_focus_area(&mut self) {
        let Some(i) = self.focus_list.selected() else {
            return;
        };
        if !self.focus_areas.remove(&i) {
            self.focus_areas.insert(i);
        }
    }

    pub fn cycle_audience(&mut self) {
        self.audience = (self.audience + 1) % AUDIENCES.len();
    }

    pub fn current_sector(&self) -> Option<&'static Sector> {
        self.sector.and_then(|i| SECTORS.get(i))
    }

    /// The joined focus areas become the account's activity string.
    pub fn profile(&self) -> CompanyProfile {
        let activity = self
            .current_sector()
            .map(|sector| {
                self.focus_areas
                    .iter()
                    .filter_map(|&i| sector.focus_areas.get(i).copied())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();

        CompanyProfile {
            company_name: self.company_name.value.trim().to_string(),
            activity,
            description: self.description.value.trim().to_string(),
            b2b2c: AUDIENCES[self.audience].to_string(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.company_name.is_empty() && self.sector.is_some()
    }
}

pub enum OnboardingAction {
    Complete(CompanyProfile),
}

pub fn render_onboarding<B: Backend>(f: &mut Frame<B>, state: &mut OnboardingState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(2),
            Constraint::Length(3),
        ])
        .split(f.size());

    let progress: String = (1..=LAST_STEP)
        .map(|i| if i == state.step { "●" } else { "○" })
        .collect::<Vec<_>>()
        .join(" ");
    let title = Paragraph::new(format!("Set up your workspace   {progress}"))
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    match state.step {
        1 => {
            render_text_field(
                f,
                chunks[1],
                "Company name",
                &state.company_name,
                true,
                state.editing,
            );
        }
        2 => {
            let items: Vec<ListItem> = SECTORS
                .iter()
                .enumerate()
                .map(|(i, sector)| {
                    let marker = if state.sector == Some(i) { "● " } else { "  " };
                    ListItem::new(format!("{marker}{}", sector.name))
                })
                .collect();
            let list = List::new(items)
                .block(Block::default().borders(Borders::ALL).title("Sector"))
                .highlight_style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                );
            f.render_stateful_widget(list, chunks[1], &mut state.sector_list);
        }
        3 => {
            let areas: &[&str] = state.current_sector().map_or(&[], |s| s.focus_areas);
            let items: Vec<ListItem> = areas
                .iter()
                .enumerate()
                .map(|(i, area)| {
                    let marker = if state.focus_areas.contains(&i) {
                        "[x] "
                    } else {
                        "[ ] "
                    };
                    ListItem::new(format!("{marker}{area}"))
                })
                .collect();
            let list = List::new(items)
                .block(Block::default().borders(Borders::ALL).title("Focus areas"))
                .highlight_style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                );
            f.render_stateful_widget(list, chunks[1], &mut state.focus_list);
        }
        _ => {
            let halves = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(2)])
                .split(chunks[1]);
            render_text_field(
                f,
                halves[0],
                "What does your business do?",
                &state.description,
                true,
                state.editing,
            );
            let audience = Paragraph::new(Spans::from(vec![
                Span::styled("Audience: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    AUDIENCES[state.audience],
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("  (Space to change)", Style::default().fg(Color::DarkGray)),
            ]))
            .wrap(Wrap { trim: true });
            f.render_widget(audience, halves[1]);
        }
    }

    if let Some(error) = &state.error {
        let message = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
        f.render_widget(message, chunks[2]);
    } else if state.busy {
        let message = Paragraph::new("Saving...").style(Style::default().fg(Color::Gray));
        f.render_widget(message, chunks[2]);
    }

    let help_text = match (state.step, state.editing) {
        (_, true) => "Enter - Save field | Esc - Cancel editing",
        (1, _) => "Enter - Edit name | N - Next",
        (2, _) => "Up/Down - Navigate | Enter - Pick sector | P - Previous",
        (3, _) => "Up/Down - Navigate | Space - Toggle | N - Next | P - Previous",
        _ => "Enter - Edit description | Space - Audience | S - Finish | P - Previous",
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);
}

pub fn handle_input(state: &mut OnboardingState) -> Result<Option<OnboardingAction>> {
    if let Event::Key(key) = event::read()? {
        if state.editing {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => state.editing = false,
                code => match state.step {
                    1 => state.company_name.handle_key(code),
                    _ => state.description.handle_key(code),
                },
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Enter if state.step == 1 || state.step == LAST_STEP => {
                state.editing = true;
            }
            KeyCode::Enter if state.step == 2 => state.pick_sector(),
            KeyCode::Up => state.list_previous(),
            KeyCode::Down => state.list_next(),
            KeyCode::Char(' ') if state.step == 3 => state.toggle_focus_area(),
            KeyCode::Char(' ') if state.step == LAST_STEP => state.cycle_audience(),
            KeyCode::Char('n') => state.next_step(),
            KeyCode::Char('p') => state.previous_step(),
            KeyCode::Char('s') if state.step == LAST_STEP => {
                if state.is_complete() && !state.busy {
                    return Ok(Some(OnboardingAction::Complete(state.profile())));
                }
                state.error = Some("Pick a company name and sector first".to_string());
            }
            _ => {}
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_joins_selected_focus_areas() {
        let mut state = OnboardingState::new();
        state.company_name.value = "Acme".into();
        state.sector = Some(0);
        state.focus_areas.insert(0);
        state.focus_areas.insert(2);
        state.description.value = "Dev tooling".into();

        let profile = state.profile();
        assert_eq!(profile.company_name, "Acme");
        assert_eq!(profile.activity, "Software Development, Cloud Services");
        assert_eq!(profile.b2b2c, "B2B");
    }

    #[test]
    fn changing_sector_resets_focus_areas() {
        let mut state = OnboardingState::new();
        state.step = 2;
        state.pick_sector();
        state.focus_areas.insert(1);

        state.step = 2;
        state.sector_list.select(Some(2));
        state.pick_sector();
        assert!(state.focus_areas.is_empty());
        assert_eq!(state.sector, Some(2));
        assert_eq!(state.step, 3);
    }

    #[test]
    fn completion_requires_name_and_sector() {
        let mut state = OnboardingState::new();
        assert!(!state.is_complete());
        state.company_name.value = "Acme".into();
        assert!(!state.is_complete());
        state.sector = Some(1);
        assert!(state.is_complete());
    }
}
