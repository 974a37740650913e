use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::models::{SearchCriteria, SearchTemplate};

/// Forums offered by the autocomplete on the target-forum field.
pub const SUBREDDIT_SUGGESTIONS: &[&str] = &[
    "startups",
    "smallbusiness",
    "Entrepreneur",
    "SaaS",
    "marketing",
    "webdev",
    "ecommerce",
    "freelance",
];

/// A committed keyword. Tags are distinguished by id only; two tags may
/// carry the same text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTag {
    pub id: u64,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerField {
    Keywords,
    Subreddit,
    Description,
}

/// State of the search form: keyword tags plus the uncommitted keyword
/// input, the target forum with autocomplete, and the business description.
pub struct ComposerState {
    pub tags: Vec<KeywordTag>,
    next_tag_id: u64,
    pub keyword_input: String,
    pub subreddit: String,
    pub description: String,
    pub field: ComposerField,
    pub editing: bool,
    pub busy: bool,
}

impl ComposerState {
    pub fn new() -> Self {
        Self {
            tags: Vec::new(),
            next_tag_id: 0,
            keyword_input: String::new(),
            subreddit: String::new(),
            description: String::new(),
            field: ComposerField::Keywords,
            editing: false,
            busy: false,
        }
    }

    fn push_tag(&mut self, text: String) {
        let id = self.next_tag_id;
        self.next_tag_id += 1;
        self.tags.push(KeywordTag { id, text });
    }

    /// Commits the pending keyword input as a tag.
    pub fn commit_keyword(&mut self) {
        let text = self.keyword_input.trim().to_string();
        if text.is_empty() {
            return;
        }
        self.keyword_input.clear();
        self.push_tag(text);
    }

    pub fn remove_last_tag(&mut self) {
        self.tags.pop();
    }

    /// Case-insensitive substring matches from the static suggestion list.
    /// An empty field offers nothing.
    pub fn suggestions(&self) -> Vec<&'static str> {
        if self.subreddit.is_empty() {
            return Vec::new();
        }
        let needle = self.subreddit.to_lowercase();
        SUBREDDIT_SUGGESTIONS
            .iter()
            .copied()
            .filter(|candidate| candidate.to_lowercase().contains(&needle))
            .collect()
    }

    /// Accepts the first matching suggestion, replacing the typed text.
    pub fn accept_suggestion(&mut self) {
        if let Some(first) = self.suggestions().first() {
            self.subreddit = (*first).to_string();
        }
    }

    /// All tag texts plus any uncommitted keyword input, joined the way the
    /// template stores them.
    pub fn joined_keywords(&self) -> String {
        let mut parts: Vec<&str> = self.tags.iter().map(|tag| tag.text.as_str()).collect();
        let pending = self.keyword_input.trim();
        if !pending.is_empty() {
            parts.push(pending);
        }
        parts.join(", ")
    }

    pub fn is_submittable(&self) -> bool {
        !self.busy && !(self.tags.is_empty() && self.keyword_input.trim().is_empty())
    }

    pub fn criteria(&self) -> SearchCriteria {
        SearchCriteria {
            keywords: self.joined_keywords(),
            subreddit: self.subreddit.clone(),
            business_description: self.description.clone(),
        }
    }

    /// Post-submission reset: the keyword inputs clear, the forum and
    /// description stay put for the next refinement.
    pub fn clear_after_submit(&mut self) {
        self.tags.clear();
        self.keyword_input.clear();
    }

    /// Re-populates the form from a stored template so it can be edited and
    /// resubmitted. The keyword string splits back into one tag per entry.
    pub fn apply_template(&mut self, template: &SearchTemplate) {
        self.tags.clear();
        self.keyword_input.clear();
        for text in template.keyword_tags() {
            self.push_tag(text);
        }
        self.subreddit = template.subreddit.clone();
        self.description = template.biz_description.clone();
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            ComposerField::Keywords => ComposerField::Subreddit,
            ComposerField::Subreddit => ComposerField::Description,
            ComposerField::Description => ComposerField::Keywords,
        };
    }

    pub fn previous_field(&mut self) {
        self.field = match self.field {
            ComposerField::Keywords => ComposerField::Description,
            ComposerField::Subreddit => ComposerField::Keywords,
            ComposerField::Description => ComposerField::Subreddit,
        };
    }

    fn current_input(&mut self) -> &mut String {
        match self.field {
            ComposerField::Keywords => &mut self.keyword_input,
            ComposerField::Subreddit => &mut self.subreddit,
            ComposerField::Description => &mut self.description,
        }
    }
}

pub enum ComposerAction {
    Submit(SearchCriteria),
}

/// Key handling while the composer pane has focus.
pub fn handle_key(state: &mut ComposerState, key: KeyCode) -> Option<ComposerAction> {
    if state.editing {
        match key {
            KeyCode::Esc => state.editing = false,
            KeyCode::Enter => {
                if state.field == ComposerField::Keywords {
                    state.commit_keyword();
                } else {
                    state.editing = false;
                }
            }
            KeyCode::Tab if state.field == ComposerField::Subreddit => {
                state.accept_suggestion();
                state.editing = false;
            }
            KeyCode::Backspace => {
                if state.field == ComposerField::Keywords && state.keyword_input.is_empty() {
                    state.remove_last_tag();
                } else {
                    state.current_input().pop();
                }
            }
            KeyCode::Char(c) => {
                state.current_input().push(c);
            }
            _ => {}
        }
        return None;
    }

    match key {
        KeyCode::Up => state.previous_field(),
        KeyCode::Down => state.next_field(),
        KeyCode::Enter => state.editing = true,
        KeyCode::Char('s') => {
            if state.is_submittable() {
                return Some(ComposerAction::Submit(state.criteria()));
            }
        }
        _ => {}
    }
    None
}

pub fn render_composer<B: Backend>(
    f: &mut Frame<B>,
    area: Rect,
    state: &ComposerState,
    focused: bool,
) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title("New Search");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(2),
        ])
        .split(inner);

    render_line(
        f,
        chunks[0],
        "Keywords",
        keyword_line(state),
        state.field == ComposerField::Keywords && focused,
    );
    render_line(
        f,
        chunks[1],
        "Subreddit",
        subreddit_line(state),
        state.field == ComposerField::Subreddit && focused,
    );
    render_line(
        f,
        chunks[2],
        "Description",
        description_line(state),
        state.field == ComposerField::Description && focused,
    );
}

fn keyword_line(state: &ComposerState) -> Spans<'_> {
    let mut spans = Vec::new();
    for tag in &state.tags {
        spans.push(Span::styled(
            format!("[{}] ", tag.text),
            Style::default().fg(Color::Cyan),
        ));
    }
    let input = if state.editing && state.field == ComposerField::Keywords {
        format!("{}|", state.keyword_input)
    } else {
        state.keyword_input.clone()
    };
    spans.push(Span::raw(input));
    Spans::from(spans)
}

fn subreddit_line(state: &ComposerState) -> Spans<'_> {
    let value = if state.editing && state.field == ComposerField::Subreddit {
        format!("{}|", state.subreddit)
    } else {
        state.subreddit.clone()
    };
    let mut spans = vec![Span::raw(value)];

    if state.editing && state.field == ComposerField::Subreddit {
        let suggestions = state.suggestions();
        if !suggestions.is_empty() {
            spans.push(Span::styled(
                format!("   r/{} <Tab>", suggestions.join(" r/")),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }
    Spans::from(spans)
}

fn description_line(state: &ComposerState) -> Spans<'_> {
    let value = if state.editing && state.field == ComposerField::Description {
        format!("{}|", state.description)
    } else {
        state.description.clone()
    };
    Spans::from(vec![Span::raw(value)])
}

fn render_line<B: Backend>(
    f: &mut Frame<B>,
    area: Rect,
    label: &'static str,
    value: Spans,
    active: bool,
) {
    let label_style = if active {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let mut spans = vec![Span::styled(format!("{label}: "), label_style)];
    spans.extend(value.0);
    let line = Paragraph::new(Spans::from(spans)).wrap(Wrap { trim: true });
    f.render_widget(line, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Record;
    use serde_json::json;

    #[test]
    fn committing_keywords_creates_tags_with_distinct_ids() {
        let mut state = ComposerState::new();
        state.keyword_input = "pricing".into();
        state.commit_keyword();
        state.keyword_input = "pricing".into();
        state.commit_keyword();

        // Same text twice is allowed; only the ids differ.
        assert_eq!(state.tags.len(), 2);
        assert_ne!(state.tags[0].id, state.tags[1].id);
        assert_eq!(state.tags[0].text, state.tags[1].text);
    }

    #[test]
    fn blank_input_does_not_commit() {
        let mut state = ComposerState::new();
        state.keyword_input = "   ".into();
        state.commit_keyword();
        assert!(state.tags.is_empty());
        assert!(!state.is_submittable());
    }

    #[test]
    fn joined_keywords_include_the_pending_input() {
        let mut state = ComposerState::new();
        state.keyword_input = "a".into();
        state.commit_keyword();
        state.keyword_input = "b".into();
        state.commit_keyword();
        state.keyword_input = " c ".into();
        assert_eq!(state.joined_keywords(), "a, b, c");
    }

    #[test]
    fn suggestions_match_case_insensitive_substrings() {
        let mut state = ComposerState::new();
        state.subreddit = "sa".into();
        assert_eq!(state.suggestions(), vec!["SaaS"]);

        state.subreddit = String::new();
        assert!(state.suggestions().is_empty());

        state.subreddit = "zzz".into();
        assert!(state.suggestions().is_empty());
    }

    #[test]
    fn accepting_a_suggestion_replaces_the_field() {
        let mut state = ComposerState::new();
        state.subreddit = "web".into();
        state.accept_suggestion();
        assert_eq!(state.subreddit, "webdev");
    }

    #[test]
    fn template_round_trip_rebuilds_tags() {
        let record: Record = serde_json::from_value(json!({
            "id": "recTpl1",
            "fields": {
                "keywords": "a, b, c",
                "subreddit": "startups",
                "biz_description": "B2B analytics"
            }
        }))
        .unwrap();
        let template = SearchTemplate::from_record(&record);

        let mut state = ComposerState::new();
        state.apply_template(&template);
        let texts: Vec<&str> = state.tags.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        assert_eq!(state.subreddit, "startups");
        assert_eq!(state.description, "B2B analytics");
        assert_eq!(state.joined_keywords(), "a, b, c");
    }

    #[test]
    fn submit_clears_keywords_but_keeps_the_rest() {
        let mut state = ComposerState::new();
        state.keyword_input = "churn".into();
        state.commit_keyword();
        state.subreddit = "SaaS".into();
        state.description = "retention tooling".into();

        state.clear_after_submit();
        assert!(state.tags.is_empty());
        assert!(state.keyword_input.is_empty());
        assert_eq!(state.subreddit, "SaaS");
        assert_eq!(state.description, "retention tooling");
    }

    #[test]
    fn backspace_on_empty_input_pops_the_last_tag() {
        let mut state = ComposerState::new();
        state.keyword_input = "a".into();
        state.commit_keyword();
        state.keyword_input = "b".into();
        state.commit_keyword();
        state.editing = true;

        handle_key(&mut state, KeyCode::Backspace);
        let texts: Vec<&str> = state.tags.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a"]);
    }
}
