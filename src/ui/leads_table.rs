use std::collections::HashSet;

use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::models::{Lead, LeadStatus, ScoreBand};
use crate::store::LEAD_PAGE;

/// State of the lead review table: client-side filtering, a visible-count
/// pagination watermark, and a selection set for bulk triage.
///
/// Filtering is the intersection of the username search, the minimum score
/// threshold, and the status set (empty set means no status filter). The
/// watermark applies AFTER filtering, so the match count always reflects the
/// full filtered set while only a prefix is rendered.
pub struct LeadsTableState {
    leads: Vec<Lead>,
    pub search_term: String,
    pub search_editing: bool,
    pub min_score: u8,
    pub status_filter: HashSet<LeadStatus>,
    pub show_filters: bool,
    selected: HashSet<String>,
    visible_count: usize,
    expanded: Option<String>,
    table_state: TableState,
}

pub enum LeadsTableAction {
    SetStatus { id: String, status: LeadStatus },
    BulkSetStatus(LeadStatus),
    FetchMore { offset: usize },
}

impl LeadsTableState {
    pub fn new(leads: Vec<Lead>) -> Self {
        let mut table_state = TableState::default();
        if !leads.is_empty() {
            table_state.select(Some(0));
        }

        Self {
            leads,
            search_term: String::new(),
            search_editing: false,
            min_score: 0,
            status_filter: HashSet::new(),
            show_filters: false,
            selected: HashSet::new(),
            visible_count: LEAD_PAGE,
            expanded: None,
            table_state,
        }
    }

    /// Installs a freshly fetched lead list, keeping filters and the
    /// watermark but dropping selections that no longer resolve to a row.
    pub fn set_leads(&mut self, leads: Vec<Lead>) {
        let ids: HashSet<&str> = leads.iter().map(|lead| lead.id.as_str()).collect();
        self.selected.retain(|id| ids.contains(id.as_str()));
        if let Some(expanded) = &self.expanded {
            if !ids.contains(expanded.as_str()) {
                self.expanded = None;
            }
        }
        self.leads = leads;
        self.clamp_cursor();
    }

    /// Appends a server page fetched through the offset variant, skipping
    /// rows already present.
    pub fn append(&mut self, more: Vec<Lead>) {
        let known: HashSet<String> = self.leads.iter().map(|lead| lead.id.clone()).collect();
        self.leads
            .extend(more.into_iter().filter(|lead| !known.contains(&lead.id)));
        self.clamp_cursor();
    }

    fn matches(&self, lead: &Lead) -> bool {
        let term = self.search_term.to_lowercase();
        lead.username.to_lowercase().contains(&term)
            && lead.score() >= self.min_score
            && (self.status_filter.is_empty() || self.status_filter.contains(&lead.status))
    }

    /// The full filtered set, before the pagination watermark.
    pub fn filtered(&self) -> Vec<&Lead> {
        self.leads.iter().filter(|lead| self.matches(lead)).collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered().len()
    }

    /// The rendered prefix of the filtered set.
    pub fn visible(&self) -> Vec<&Lead> {
        let mut rows = self.filtered();
        rows.truncate(self.visible_count);
        rows
    }

    pub fn has_hidden_rows(&self) -> bool {
        self.filtered_count() > self.visible_count
    }

    /// Raises the watermark by one page. When it moves past the rows fetched
    /// so far, the caller should request the next server page at the
    /// returned offset.
    pub fn load_more(&mut self) -> Option<LeadsTableAction> {
        self.visible_count += LEAD_PAGE;
        if self.visible_count > self.leads.len() {
            Some(LeadsTableAction::FetchMore {
                offset: self.leads.len(),
            })
        } else {
            None
        }
    }

    // Selection

    pub fn toggle_selected(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    /// Toggles between "every currently filtered and visible row" and none.
    pub fn toggle_select_all(&mut self) {
        let visible: HashSet<String> = self
            .visible()
            .iter()
            .map(|lead| lead.id.clone())
            .collect();
        if !visible.is_empty() && self.selected == visible {
            self.selected.clear();
        } else {
            self.selected = visible;
        }
    }

    pub fn selection_count(&self) -> usize {
        self.selected.len()
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    // Cursor

    pub fn cursor_lead(&self) -> Option<&Lead> {
        let rows = self.visible();
        self.table_state
            .selected()
            .and_then(|i| rows.get(i).copied())
    }

    pub fn next(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    fn clamp_cursor(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            self.table_state.select(None);
        } else {
            match self.table_state.selected() {
                Some(i) if i < len => {}
                _ => self.table_state.select(Some(0)),
            }
        }
    }

    // Filters

    pub fn adjust_min_score(&mut self, delta: i16) {
        let next = i16::from(self.min_score) + delta;
        self.min_score = next.clamp(0, 100) as u8;
        self.clamp_cursor();
    }

    pub fn toggle_status_filter(&mut self, status: LeadStatus) {
        if !self.status_filter.remove(&status) {
            self.status_filter.insert(status);
        }
        self.clamp_cursor();
    }

    /// Per-status counts over the whole fetched list, shown next to the
    /// status filter toggles.
    pub fn status_count(&self, status: LeadStatus) -> usize {
        self.leads.iter().filter(|lead| lead.status == status).count()
    }

    pub fn toggle_expanded(&mut self) {
        let Some(id) = self.cursor_lead().map(|lead| lead.id.clone()) else {
            return;
        };
        self.expanded = match &self.expanded {
            Some(current) if *current == id => None,
            _ => Some(id),
        };
    }

    pub fn expanded_lead(&self) -> Option<&Lead> {
        let id = self.expanded.as_ref()?;
        self.leads.iter().find(|lead| lead.id == *id)
    }
}

/// Key handling for the table. The owning screen reads the terminal event
/// and delegates here; anything that needs store I/O comes back as an
/// action.
pub fn handle_key(state: &mut LeadsTableState, key: KeyCode) -> Option<LeadsTableAction> {
    if state.search_editing {
        match key {
            KeyCode::Esc | KeyCode::Enter => state.search_editing = false,
            KeyCode::Char(c) => {
                state.search_term.push(c);
                state.clamp_cursor();
            }
            KeyCode::Backspace => {
                state.search_term.pop();
                state.clamp_cursor();
            }
            _ => {}
        }
        return None;
    }

    match key {
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        KeyCode::Char(' ') => {
            if let Some(id) = state.cursor_lead().map(|lead| lead.id.clone()) {
                state.toggle_selected(&id);
            }
        }
        KeyCode::Char('a') => state.toggle_select_all(),
        KeyCode::Enter => state.toggle_expanded(),
        KeyCode::Char('/') => state.search_editing = true,
        KeyCode::Char('f') => state.show_filters = !state.show_filters,
        KeyCode::Char('+') | KeyCode::Char('=') => state.adjust_min_score(5),
        KeyCode::Char('-') => state.adjust_min_score(-5),
        KeyCode::Char('1') => state.toggle_status_filter(LeadStatus::Pending),
        KeyCode::Char('2') => state.toggle_status_filter(LeadStatus::Approved),
        KeyCode::Char('3') => state.toggle_status_filter(LeadStatus::Rejected),
        KeyCode::Char('m') => return state.load_more(),
        KeyCode::Char('y') => {
            if let Some(id) = state.cursor_lead().map(|lead| lead.id.clone()) {
                return Some(LeadsTableAction::SetStatus {
                    id,
                    status: LeadStatus::Approved,
                });
            }
        }
        KeyCode::Char('x') => {
            if let Some(id) = state.cursor_lead().map(|lead| lead.id.clone()) {
                return Some(LeadsTableAction::SetStatus {
                    id,
                    status: LeadStatus::Rejected,
                });
            }
        }
        KeyCode::Char('Y') => {
            if state.selection_count() > 0 {
                return Some(LeadsTableAction::BulkSetStatus(LeadStatus::Approved));
            }
        }
        KeyCode::Char('X') => {
            if state.selection_count() > 0 {
                return Some(LeadsTableAction::BulkSetStatus(LeadStatus::Rejected));
            }
        }
        _ => {}
    }
    None
}

fn band_color(band: ScoreBand) -> Color {
    match band {
        ScoreBand::High => Color::Green,
        ScoreBand::Medium => Color::Yellow,
        ScoreBand::Low => Color::Red,
    }
}

fn status_color(status: LeadStatus) -> Color {
    match status {
        LeadStatus::Approved => Color::Green,
        LeadStatus::Pending => Color::Yellow,
        LeadStatus::Rejected => Color::Red,
    }
}

pub fn render_leads_table<B: Backend>(f: &mut Frame<B>, area: Rect, state: &mut LeadsTableState) {
    let expanded = state.expanded_lead().cloned();

    let mut constraints = vec![Constraint::Length(2)];
    if state.show_filters {
        constraints.push(Constraint::Length(2));
    }
    constraints.push(Constraint::Min(4));
    if expanded.is_some() {
        constraints.push(Constraint::Length(5));
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut next = 0;
    render_summary(f, chunks[next], state);
    next += 1;
    if state.show_filters {
        render_filter_panel(f, chunks[next], state);
        next += 1;
    }
    render_rows(f, chunks[next], state);
    next += 1;
    if let Some(lead) = expanded {
        render_detail(f, chunks[next], &lead);
    }
}

fn render_summary<B: Backend>(f: &mut Frame<B>, area: Rect, state: &LeadsTableState) {
    let search = if state.search_editing {
        format!("{}|", state.search_term)
    } else if state.search_term.is_empty() {
        "-".to_string()
    } else {
        state.search_term.clone()
    };

    let summary = Spans::from(vec![
        Span::styled(
            format!("{} match", state.filtered_count()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " · showing {} · {} selected · search: {}",
            state.visible().len(),
            state.selection_count(),
            search
        )),
    ]);
    f.render_widget(Paragraph::new(summary), area);
}

fn render_filter_panel<B: Backend>(f: &mut Frame<B>, area: Rect, state: &LeadsTableState) {
    let mut spans = vec![Span::raw(format!("min score {:>3} ", state.min_score))];
    for (key, status) in [
        ("1", LeadStatus::Pending),
        ("2", LeadStatus::Approved),
        ("3", LeadStatus::Rejected),
    ] {
        let active = state.status_filter.contains(&status);
        let style = if active {
            Style::default()
                .fg(status_color(status))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(
            format!(
                " [{key}] {} ({})",
                status.label(),
                state.status_count(status)
            ),
            style,
        ));
    }
    f.render_widget(Paragraph::new(Spans::from(spans)), area);
}

fn render_rows<B: Backend>(f: &mut Frame<B>, area: Rect, state: &mut LeadsTableState) {
    let header_cells = ["Sel", "Username", "Score", "Decision Maker", "Status"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let rows: Vec<Row> = state
        .visible()
        .iter()
        .map(|lead| {
            let marker = if state.is_selected(&lead.id) { "[x]" } else { "[ ]" };
            let score_style = Style::default().fg(band_color(lead.band()));
            let cells = vec![
                Cell::from(marker),
                Cell::from(lead.username.clone()),
                Cell::from(format!("{:>3}", lead.score())).style(score_style),
                Cell::from(lead.decision_maker_signals.clone()),
                Cell::from(lead.status.label())
                    .style(Style::default().fg(status_color(lead.status))),
            ];
            Row::new(cells).height(1)
        })
        .collect();

    let more = if state.has_hidden_rows() {
        " · <M> more"
    } else {
        ""
    };
    let title = format!("Found Leads{more}");
    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .widths(&[
            Constraint::Length(4),
            Constraint::Percentage(30),
            Constraint::Length(6),
            Constraint::Percentage(40),
            Constraint::Percentage(15),
        ]);

    f.render_stateful_widget(table, area, &mut state.table_state);
}

fn render_detail<B: Backend>(f: &mut Frame<B>, area: Rect, lead: &Lead) {
    let hint = match lead.band() {
        ScoreBand::High => "High potential — strong interest and authority signals.",
        ScoreBand::Medium => "",
        ScoreBand::Low => "Needs more context before outreach.",
    };

    let mut lines = vec![
        Spans::from(vec![
            Span::styled("Account created: ", Style::default().fg(Color::Gray)),
            Span::raw(lead.account_created.clone()),
            Span::styled("   Temperature: ", Style::default().fg(Color::Gray)),
            Span::raw(lead.temperature.clone()),
        ]),
        Spans::from(vec![
            Span::styled("Pain points: ", Style::default().fg(Color::Gray)),
            Span::raw(lead.pain_points.clone()),
        ]),
    ];
    if !hint.is_empty() {
        lines.push(Spans::from(Span::styled(
            hint,
            Style::default().fg(band_color(lead.band())),
        )));
    }

    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(lead.username.clone()),
        );
    f.render_widget(detail, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(id: &str, username: &str, score: &str, status: LeadStatus) -> Lead {
        Lead {
            id: id.into(),
            username: username.into(),
            qualification_score: score.into(),
            status,
            temperature: String::new(),
            account_created: String::new(),
            decision_maker_signals: String::new(),
            pain_points: String::new(),
        }
    }

    fn sample() -> Vec<Lead> {
        vec![
            lead("r1", "alpha_dev", "85", LeadStatus::Pending),
            lead("r2", "beta_founder", "45", LeadStatus::Pending),
            lead("r3", "Gamma_CTO", "72", LeadStatus::Approved),
            lead("r4", "delta_ops", "60", LeadStatus::Rejected),
            lead("r5", "alphabetical", "90", LeadStatus::Approved),
            lead("r6", "epsilon", "10", LeadStatus::Pending),
        ]
    }

    #[test]
    fn no_filters_is_the_identity() {
        let state = LeadsTableState::new(sample());
        assert_eq!(state.filtered_count(), 6);
    }

    #[test]
    fn threshold_excludes_lower_scores_regardless_of_status() {
        let mut state = LeadsTableState::new(vec![
            lead("r1", "high", "85", LeadStatus::Pending),
            lead("r2", "low", "45", LeadStatus::Approved),
        ]);
        state.min_score = 50;
        let ids: Vec<&str> = state.filtered().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["r1"]);
    }

    #[test]
    fn filters_intersect() {
        let mut state = LeadsTableState::new(sample());
        state.search_term = "ALPHA".into();
        state.min_score = 86;
        state.status_filter.insert(LeadStatus::Approved);
        let ids: Vec<&str> = state.filtered().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["r5"]);
    }

    #[test]
    fn empty_status_set_means_no_status_filter() {
        let mut state = LeadsTableState::new(sample());
        assert_eq!(state.filtered_count(), 6);
        state.toggle_status_filter(LeadStatus::Pending);
        assert_eq!(state.filtered_count(), 3);
        state.toggle_status_filter(LeadStatus::Pending);
        assert_eq!(state.filtered_count(), 6);
    }

    #[test]
    fn watermark_applies_after_filtering() {
        let state = LeadsTableState::new(sample());
        assert_eq!(state.filtered_count(), 6);
        assert_eq!(state.visible().len(), LEAD_PAGE);
    }

    #[test]
    fn load_more_raises_the_watermark_and_requests_a_server_page() {
        let mut state = LeadsTableState::new(sample());
        let action = state.load_more();
        assert_eq!(state.visible().len(), 6);
        match action {
            Some(LeadsTableAction::FetchMore { offset }) => assert_eq!(offset, 6),
            _ => panic!("expected a server-page request"),
        }
    }

    #[test]
    fn load_more_within_fetched_rows_stays_local() {
        let mut leads = sample();
        leads.extend(sample().into_iter().map(|mut l| {
            l.id.push('b');
            l
        }));
        let mut state = LeadsTableState::new(leads);
        assert!(state.load_more().is_none());
        assert_eq!(state.visible().len(), 10);
    }

    #[test]
    fn select_all_toggles_between_visible_rows_and_none() {
        let mut state = LeadsTableState::new(sample());
        state.toggle_select_all();
        assert_eq!(state.selection_count(), LEAD_PAGE);
        state.toggle_select_all();
        assert_eq!(state.selection_count(), 0);
    }

    #[test]
    fn selection_survives_filtering() {
        let mut state = LeadsTableState::new(sample());
        state.toggle_selected("r2");
        state.min_score = 80;
        assert!(state.is_selected("r2"));
        assert_eq!(state.filtered_count(), 2);
    }

    #[test]
    fn set_leads_prunes_stale_selection_but_keeps_filters() {
        let mut state = LeadsTableState::new(sample());
        state.min_score = 50;
        state.toggle_selected("r1");
        state.toggle_selected("r6");

        state.set_leads(vec![lead("r1", "alpha_dev", "85", LeadStatus::Approved)]);
        assert!(state.is_selected("r1"));
        assert!(!state.is_selected("r6"));
        assert_eq!(state.min_score, 50);
    }

    #[test]
    fn append_skips_duplicates() {
        let mut state = LeadsTableState::new(sample());
        state.append(vec![
            lead("r1", "alpha_dev", "85", LeadStatus::Pending),
            lead("r7", "new_row", "50", LeadStatus::Pending),
        ]);
        // No filters active, so the filtered count is the full list.
        assert_eq!(state.filtered_count(), 7);
    }

    #[test]
    fn bulk_action_requires_a_selection() {
        let mut state = LeadsTableState::new(sample());
        assert!(handle_key(&mut state, KeyCode::Char('Y')).is_none());
        state.toggle_selected("r1");
        assert!(matches!(
            handle_key(&mut state, KeyCode::Char('Y')),
            Some(LeadsTableAction::BulkSetStatus(LeadStatus::Approved))
        ));
    }

    #[test]
    fn approving_the_cursor_row_emits_a_status_update() {
        let mut state = LeadsTableState::new(sample());
        match handle_key(&mut state, KeyCode::Char('y')) {
            Some(LeadsTableAction::SetStatus { id, status }) => {
                assert_eq!(id, "r1");
                assert_eq!(status, LeadStatus::Approved);
            }
            _ => panic!("expected a status update"),
        }
    }

    #[test]
    fn re_approving_an_approved_lead_is_an_ordinary_update() {
        // Terminal statuses are idempotent: the action carries the same
        // value again instead of erroring.
        let mut state = LeadsTableState::new(vec![lead(
            "r1",
            "already_in",
            "70",
            LeadStatus::Approved,
        )]);
        match handle_key(&mut state, KeyCode::Char('y')) {
            Some(LeadsTableAction::SetStatus { id, status }) => {
                assert_eq!(id, "r1");
                assert_eq!(status, LeadStatus::Approved);
            }
            _ => panic!("expected a status update"),
        }
    }

    #[test]
    fn search_editing_captures_keys() {
        let mut state = LeadsTableState::new(sample());
        handle_key(&mut state, KeyCode::Char('/'));
        assert!(state.search_editing);
        handle_key(&mut state, KeyCode::Char('a'));
        handle_key(&mut state, KeyCode::Char('l'));
        assert_eq!(state.search_term, "al");
        handle_key(&mut state, KeyCode::Enter);
        assert!(!state.search_editing);
        assert_eq!(state.filtered_count(), 2);
    }
}
