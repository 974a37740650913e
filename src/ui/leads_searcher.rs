use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::{Lead, SearchCriteria, SearchTemplate};
use crate::ui::leads_table::{self, LeadsTableAction, LeadsTableState};
use crate::ui::search_composer::{self, ComposerAction, ComposerState};
use crate::ui::{Route, NAV_HELP};

#[derive(Clone, Copy, PartialEq)]
pub enum SearcherPane {
    Templates,
    Composer,
    Leads,
}

/// The main working view: recent templates, the search composer, and the
/// review table, with cycling pane focus.
pub struct LeadsSearcherState {
    pub templates: Vec<SearchTemplate>,
    pub active_template: Option<String>,
    pub template_cursor: usize,
    pub composer: ComposerState,
    pub table: LeadsTableState,
    pub pane: SearcherPane,
    pub busy: bool,
}

impl LeadsSearcherState {
    pub fn new(templates: Vec<SearchTemplate>, leads: Vec<Lead>) -> Self {
        Self {
            templates,
            active_template: None,
            template_cursor: 0,
            composer: ComposerState::new(),
            table: LeadsTableState::new(leads),
            pane: SearcherPane::Composer,
            busy: false,
        }
    }

    pub fn next_pane(&mut self) {
        self.pane = match self.pane {
            SearcherPane::Templates => SearcherPane::Composer,
            SearcherPane::Composer => SearcherPane::Leads,
            SearcherPane::Leads => SearcherPane::Templates,
        };
    }

    pub fn set_templates(&mut self, templates: Vec<SearchTemplate>) {
        self.templates = templates;
        if self.template_cursor >= self.templates.len() {
            self.template_cursor = 0;
        }
    }

    pub fn template_next(&mut self) {
        if self.templates.is_empty() {
            return;
        }
        self.template_cursor = (self.template_cursor + 1) % self.templates.len();
    }

    pub fn template_previous(&mut self) {
        if self.templates.is_empty() {
            return;
        }
        self.template_cursor = if self.template_cursor == 0 {
            self.templates.len() - 1
        } else {
            self.template_cursor - 1
        };
    }

    /// Re-populates the composer from the template under the cursor so it
    /// can be edited and resubmitted.
    pub fn apply_selected_template(&mut self) {
        let Some(template) = self.templates.get(self.template_cursor) else {
            return;
        };
        self.active_template = Some(template.id.clone());
        let template = template.clone();
        self.composer.apply_template(&template);
    }

    fn keys_captured(&self) -> bool {
        self.table.search_editing || self.composer.editing
    }
}

pub enum LeadsSearcherAction {
    SubmitSearch(SearchCriteria),
    Lead(LeadsTableAction),
    Refresh,
    Navigate(Route),
    Exit,
}

pub fn render_leads_searcher<B: Backend>(f: &mut Frame<B>, state: &mut LeadsSearcherState) {
    let has_templates = !state.templates.is_empty();
    let mut constraints = Vec::new();
    if has_templates {
        constraints.push(Constraint::Length(4));
    }
    constraints.push(Constraint::Length(7));
    constraints.push(Constraint::Min(6));
    constraints.push(Constraint::Length(3));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(f.size());

    let mut next = 0;
    if has_templates {
        render_templates(f, chunks[next], state);
        next += 1;
    }
    search_composer::render_composer(
        f,
        chunks[next],
        &state.composer,
        state.pane == SearcherPane::Composer,
    );
    next += 1;
    leads_table::render_leads_table(f, chunks[next], &mut state.table);
    next += 1;

    let help_text = if state.keys_captured() {
        "Type to edit | Enter/Esc - Done".to_string()
    } else if state.busy {
        "Working...".to_string()
    } else {
        match state.pane {
            SearcherPane::Templates => {
                "Left/Right - Pick template | Enter - Load into form | Tab - Next pane | Q - Quit"
                    .to_string()
            }
            SearcherPane::Composer => format!(
                "Up/Down - Field | Enter - Edit | S - Search leads | Tab - Next pane | {NAV_HELP}"
            ),
            SearcherPane::Leads => {
                "Space/A - Select | Y/X - Approve/Reject | / - Search | M - More | Tab - Next pane | Q - Quit"
                    .to_string()
            }
        }
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[next]);
}

fn render_templates<B: Backend>(f: &mut Frame<B>, area: Rect, state: &LeadsSearcherState) {
    let focused = state.pane == SearcherPane::Templates;
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title("Recent Templates");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let count = state.templates.len().max(1) as u32;
    let constraints: Vec<Constraint> = state
        .templates
        .iter()
        .map(|_| Constraint::Ratio(1, count))
        .collect();
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(inner);

    for (i, template) in state.templates.iter().enumerate() {
        let under_cursor = focused && i == state.template_cursor;
        let is_active = state.active_template.as_deref() == Some(template.id.as_str());
        let style = if under_cursor {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else if is_active {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };

        let mut lines = vec![Spans::from(Span::styled(template.keywords.clone(), style))];
        let mut meta = Vec::new();
        if !template.subreddit.is_empty() {
            meta.push(Span::styled(
                format!("r/{} ", template.subreddit),
                Style::default().fg(Color::Gray),
            ));
        }
        if template.nb_leads > 0 {
            meta.push(Span::styled(
                format!("{} leads", template.nb_leads),
                Style::default().fg(Color::Magenta),
            ));
        }
        if !meta.is_empty() {
            lines.push(Spans::from(meta));
        }
        f.render_widget(Paragraph::new(lines), cards[i]);
    }
}

pub fn handle_input(state: &mut LeadsSearcherState) -> Result<Option<LeadsSearcherAction>> {
    if let Event::Key(key) = event::read()? {
        if let Some(route) = crate::ui::private_route_for_key(key.code) {
            return Ok(Some(LeadsSearcherAction::Navigate(route)));
        }

        if !state.keys_captured() {
            match key.code {
                KeyCode::Tab => {
                    state.next_pane();
                    return Ok(None);
                }
                KeyCode::Char('q') => return Ok(Some(LeadsSearcherAction::Exit)),
                KeyCode::Char('r') if state.pane != SearcherPane::Composer => {
                    return Ok(Some(LeadsSearcherAction::Refresh))
                }
                _ => {}
            }
        }

        if state.busy {
            return Ok(None);
        }

        match state.pane {
            SearcherPane::Templates => match key.code {
                KeyCode::Left => state.template_previous(),
                KeyCode::Right => state.template_next(),
                KeyCode::Enter => state.apply_selected_template(),
                _ => {}
            },
            SearcherPane::Composer => {
                if let Some(ComposerAction::Submit(criteria)) =
                    search_composer::handle_key(&mut state.composer, key.code)
                {
                    return Ok(Some(LeadsSearcherAction::SubmitSearch(criteria)));
                }
            }
            SearcherPane::Leads => {
                if let Some(action) = leads_table::handle_key(&mut state.table, key.code) {
                    return Ok(Some(LeadsSearcherAction::Lead(action)));
                }
            }
        }
    }
    Ok(None)
}
