use crate::store::Record;

/// Triage outcome of a lead. `Pending` is the state leads arrive in;
/// approving or rejecting is terminal from the client's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeadStatus {
    /// The value stored in the hosted `status` field.
    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::Pending => "pending",
            LeadStatus::Approved => "lead",
            LeadStatus::Rejected => "refus",
        }
    }

    /// Unknown values degrade to `Pending` for display; the client never
    /// writes anything but the three known values back.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "lead" => LeadStatus::Approved,
            "refus" => LeadStatus::Rejected,
            _ => LeadStatus::Pending,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LeadStatus::Pending => "New",
            LeadStatus::Approved => "Approved",
            LeadStatus::Rejected => "Rejected",
        }
    }
}

/// Qualification-score bands used for color coding. Boundary values belong
/// to the higher band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    pub fn for_score(score: u8) -> Self {
        if score >= 80 {
            ScoreBand::High
        } else if score >= 60 {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }
}

/// A prospective contact produced by the external automation. The client
/// only ever mutates `status`.
#[derive(Debug, Clone)]
pub struct Lead {
    pub id: String,
    pub username: String,
    pub qualification_score: String,
    pub status: LeadStatus,
    pub temperature: String,
    pub account_created: String,
    pub decision_maker_signals: String,
    pub pain_points: String,
}

impl Lead {
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            username: record.text("username"),
            qualification_score: record.text("qualification_score"),
            status: LeadStatus::parse(&record.text("status")),
            temperature: record.text("lead_temperature"),
            account_created: record.text("account_created"),
            decision_maker_signals: record.text("decision_maker_signals"),
            pain_points: record.text("pain_points_mentioned"),
        }
    }

    /// The score as an integer in [0, 100]. Non-numeric or out-of-range
    /// values count as 0 so filtering never fails on dirty data.
    pub fn score(&self) -> u8 {
        match self.qualification_score.trim().parse::<i64>() {
            Ok(value) if (0..=100).contains(&value) => value as u8,
            _ => 0,
        }
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::for_score(self.score())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead_with_score(score: &str) -> Lead {
        Lead {
            id: "recLead1".into(),
            username: "prospect".into(),
            qualification_score: score.into(),
            status: LeadStatus::Pending,
            temperature: String::new(),
            account_created: String::new(),
            decision_maker_signals: String::new(),
            pain_points: String::new(),
        }
    }

    #[test]
    fn band_boundaries_belong_to_the_higher_band() {
        assert_eq!(ScoreBand::for_score(80), ScoreBand::High);
        assert_eq!(ScoreBand::for_score(79), ScoreBand::Medium);
        assert_eq!(ScoreBand::for_score(60), ScoreBand::Medium);
        assert_eq!(ScoreBand::for_score(59), ScoreBand::Low);
        assert_eq!(ScoreBand::for_score(0), ScoreBand::Low);
        assert_eq!(ScoreBand::for_score(100), ScoreBand::High);
    }

    #[test]
    fn dirty_scores_count_as_zero() {
        assert_eq!(lead_with_score("85").score(), 85);
        assert_eq!(lead_with_score(" 42 ").score(), 42);
        assert_eq!(lead_with_score("not-a-number").score(), 0);
        assert_eq!(lead_with_score("150").score(), 0);
        assert_eq!(lead_with_score("-3").score(), 0);
        assert_eq!(lead_with_score("").score(), 0);
    }

    #[test]
    fn status_parsing_defaults_to_pending() {
        assert_eq!(LeadStatus::parse("lead"), LeadStatus::Approved);
        assert_eq!(LeadStatus::parse("refus"), LeadStatus::Rejected);
        assert_eq!(LeadStatus::parse("pending"), LeadStatus::Pending);
        assert_eq!(LeadStatus::parse("mystery"), LeadStatus::Pending);
    }

    #[test]
    fn status_wire_values_round_trip() {
        for status in [
            LeadStatus::Pending,
            LeadStatus::Approved,
            LeadStatus::Rejected,
        ] {
            assert_eq!(LeadStatus::parse(status.as_str()), status);
        }
    }
}
