use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::Lead;
use crate::ui::leads_table::{self, LeadsTableAction, LeadsTableState};
use crate::ui::{Route, NAV_HELP};

/// Full-width review table over every fetched lead.
pub struct LeadsManagerState {
    pub table: LeadsTableState,
    pub busy: bool,
}

impl LeadsManagerState {
    pub fn new(leads: Vec<Lead>) -> Self {
        Self {
            table: LeadsTableState::new(leads),
            busy: false,
        }
    }
}

pub enum LeadsManagerAction {
    Lead(LeadsTableAction),
    Refresh,
    Navigate(Route),
    Exit,
}

pub fn render_leads_manager<B: Backend>(f: &mut Frame<B>, state: &mut LeadsManagerState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(6), Constraint::Length(3)])
        .split(f.size());

    leads_table::render_leads_table(f, chunks[0], &mut state.table);

    let help_text = if state.table.search_editing {
        "Type to search | Enter/Esc - Done".to_string()
    } else if state.busy {
        "Working...".to_string()
    } else {
        format!(
            "Space - Select | A - All | Y/X - Approve/Reject | Shift+Y/X - Bulk | / - Search | F - Filters | M - More | R - Refresh | Q - Quit | {NAV_HELP}"
        )
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[1]);
}

pub fn handle_input(state: &mut LeadsManagerState) -> Result<Option<LeadsManagerAction>> {
    if let Event::Key(key) = event::read()? {
        if let Some(route) = crate::ui::private_route_for_key(key.code) {
            return Ok(Some(LeadsManagerAction::Navigate(route)));
        }

        if !state.table.search_editing {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    return Ok(Some(LeadsManagerAction::Exit));
                }
                KeyCode::Char('r') => return Ok(Some(LeadsManagerAction::Refresh)),
                _ => {}
            }
        }

        if state.busy {
            return Ok(None);
        }
        if let Some(action) = leads_table::handle_key(&mut state.table, key.code) {
            return Ok(Some(LeadsManagerAction::Lead(action)));
        }
    }
    Ok(None)
}
