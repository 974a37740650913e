use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::{Lead, LeadStatus, ScoreBand};
use crate::ui::{Route, NAV_HELP};

/// Aggregates derived client-side from the fetched leads; no extra store
/// traffic.
#[derive(Debug, Default, PartialEq)]
pub struct LeadStats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub average_score: f64,
    pub approval_rate: f64,
}

impl LeadStats {
    pub fn from_leads(leads: &[Lead]) -> Self {
        let mut stats = Self {
            total: leads.len(),
            ..Self::default()
        };
        let mut score_sum: u64 = 0;

        for lead in leads {
            match lead.status {
                LeadStatus::Pending => stats.pending += 1,
                LeadStatus::Approved => stats.approved += 1,
                LeadStatus::Rejected => stats.rejected += 1,
            }
            match lead.band() {
                ScoreBand::High => stats.high += 1,
                ScoreBand::Medium => stats.medium += 1,
                ScoreBand::Low => stats.low += 1,
            }
            score_sum += u64::from(lead.score());
        }

        if stats.total > 0 {
            stats.average_score = score_sum as f64 / stats.total as f64;
            stats.approval_rate = stats.approved as f64 / stats.total as f64 * 100.0;
        }
        stats
    }
}

pub struct AnalyticsState {
    pub stats: LeadStats,
}

impl AnalyticsState {
    pub fn new(leads: &[Lead]) -> Self {
        Self {
            stats: LeadStats::from_leads(leads),
        }
    }
}

pub enum AnalyticsAction {
    Refresh,
    Navigate(Route),
    Exit,
}

pub fn render_analytics<B: Backend>(f: &mut Frame<B>, state: &mut AnalyticsState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(f.size());

    let stats = &state.stats;
    let label = Style::default().fg(Color::Gray);

    let triage = Paragraph::new(vec![
        Spans::from(vec![
            Span::styled("Total leads: ", label),
            Span::raw(stats.total.to_string()),
        ]),
        Spans::from(vec![
            Span::styled("New: ", label),
            Span::styled(stats.pending.to_string(), Style::default().fg(Color::Yellow)),
            Span::styled("   Approved: ", label),
            Span::styled(stats.approved.to_string(), Style::default().fg(Color::Green)),
            Span::styled("   Rejected: ", label),
            Span::styled(stats.rejected.to_string(), Style::default().fg(Color::Red)),
        ]),
        Spans::from(vec![
            Span::styled("Approval rate: ", label),
            Span::raw(format!("{:.0}%", stats.approval_rate)),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL).title("Triage"));
    f.render_widget(triage, chunks[0]);

    let quality = Paragraph::new(vec![
        Spans::from(vec![
            Span::styled("Average score: ", label),
            Span::raw(format!("{:.1}", stats.average_score)),
        ]),
        Spans::from(vec![
            Span::styled("High (80+): ", label),
            Span::styled(stats.high.to_string(), Style::default().fg(Color::Green)),
            Span::styled("   Medium (60-79): ", label),
            Span::styled(stats.medium.to_string(), Style::default().fg(Color::Yellow)),
            Span::styled("   Low (<60): ", label),
            Span::styled(stats.low.to_string(), Style::default().fg(Color::Red)),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL).title("Quality"));
    f.render_widget(quality, chunks[1]);

    let help = Paragraph::new(format!("R - Refresh | Q - Quit | {NAV_HELP}"))
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);
}

pub fn handle_input(_state: &mut AnalyticsState) -> Result<Option<AnalyticsAction>> {
    if let Event::Key(key) = event::read()? {
        if let Some(route) = crate::ui::private_route_for_key(key.code) {
            return Ok(Some(AnalyticsAction::Navigate(route)));
        }
        match key.code {
            KeyCode::Char('r') => return Ok(Some(AnalyticsAction::Refresh)),
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Some(AnalyticsAction::Exit)),
            _ => {}
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(score: &str, status: LeadStatus) -> Lead {
        Lead {
            id: format!("rec-{score}-{}", status.as_str()),
            username: "prospect".into(),
            qualification_score: score.into(),
            status,
            temperature: String::new(),
            account_created: String::new(),
            decision_maker_signals: String::new(),
            pain_points: String::new(),
        }
    }

    #[test]
    fn empty_list_produces_zeroed_stats() {
        let stats = LeadStats::from_leads(&[]);
        assert_eq!(stats, LeadStats::default());
    }

    #[test]
    fn stats_count_statuses_and_bands() {
        let leads = vec![
            lead("85", LeadStatus::Approved),
            lead("60", LeadStatus::Pending),
            lead("45", LeadStatus::Rejected),
            lead("oops", LeadStatus::Pending),
        ];
        let stats = LeadStats::from_leads(&leads);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.approved, 1);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.high, 1);
        assert_eq!(stats.medium, 1);
        assert_eq!(stats.low, 2);
        assert_eq!(stats.average_score, (85.0 + 60.0 + 45.0) / 4.0);
        assert_eq!(stats.approval_rate, 25.0);
    }
}
