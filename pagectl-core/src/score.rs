//! Scoring for the check suite

use serde::Serialize;

/// Points available across the whole suite
pub const MAX_SCORE: f64 = 10.0;

/// Score at or above which the verdict is [`Verdict::Good`]
pub const GOOD_THRESHOLD: f64 = 7.0;

/// One line of check output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    Pass { points: f64, message: String },
    Fail { message: String },
    Warn { message: String },
    Info { message: String },
    /// Request never reached the server
    ConnectionError { message: String },
}

/// Outcome of a single check
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub title: String,
    pub available: f64,
    pub awarded: f64,
    pub events: Vec<Event>,
}

impl CheckReport {
    pub fn new(title: impl Into<String>, available: f64) -> Self {
        Self {
            title: title.into(),
            available,
            awarded: 0.0,
            events: Vec::new(),
        }
    }

    pub fn award(&mut self, points: f64, message: impl Into<String>) {
        self.awarded += points;
        self.events.push(Event::Pass {
            points,
            message: message.into(),
        });
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.events.push(Event::Fail {
            message: message.into(),
        });
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.events.push(Event::Warn {
            message: message.into(),
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.events.push(Event::Info {
            message: message.into(),
        });
    }

    pub fn connection_error(&mut self, message: impl Into<String>) {
        self.events.push(Event::ConnectionError {
            message: message.into(),
        });
    }

    pub fn has_failures(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, Event::Fail { .. } | Event::ConnectionError { .. }))
    }
}

/// Final grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Excellent,
    Good,
    NeedsImprovement,
}

impl Verdict {
    pub fn from_score(score: f64, max: f64) -> Self {
        if score >= max {
            Verdict::Excellent
        } else if score >= GOOD_THRESHOLD {
            Verdict::Good
        } else {
            Verdict::NeedsImprovement
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Verdict::Excellent => "🏆 EXCELLENT! Every technical requirement is covered.",
            Verdict::Good => "👍 VERY GOOD. Review the individual failures.",
            Verdict::NeedsImprovement => "⚠️ NEEDS IMPROVEMENT. Review the implementation.",
        }
    }
}

/// Running score plus the reports that produced it
#[derive(Debug, Default)]
pub struct Scoreboard {
    score: f64,
    reports: Vec<CheckReport>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, report: CheckReport) -> &CheckReport {
        self.score += report.awarded;
        self.reports.push(report);
        &self.reports[self.reports.len() - 1]
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn into_reports(self) -> Vec<CheckReport> {
        self.reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_thresholds() {
        assert_eq!(Verdict::from_score(10.0, MAX_SCORE), Verdict::Excellent);
        assert_eq!(Verdict::from_score(9.5, MAX_SCORE), Verdict::Good);
        assert_eq!(Verdict::from_score(7.0, MAX_SCORE), Verdict::Good);
        assert_eq!(Verdict::from_score(6.5, MAX_SCORE), Verdict::NeedsImprovement);
        assert_eq!(Verdict::from_score(0.0, MAX_SCORE), Verdict::NeedsImprovement);
    }

    #[test]
    fn scoreboard_accumulates_partial_credit() {
        let mut board = Scoreboard::new();

        let mut gate = CheckReport::new("gate", 1.0);
        gate.award(1.0, "dataset found");
        board.record(gate);

        let mut security = CheckReport::new("security", 1.0);
        security.award(0.5, "unexpected response: 404");
        let recorded = board.record(security);
        assert!(!recorded.has_failures());

        assert_eq!(board.score(), 1.5);
        assert_eq!(board.into_reports().len(), 2);
    }

    #[test]
    fn failures_are_detected() {
        let mut report = CheckReport::new("page", 2.0);
        report.award(1.0, "metadata present");
        report.fail("expected 5 items, got 3");
        assert!(report.has_failures());
        assert_eq!(report.awarded, 1.0);
    }

    #[test]
    fn events_serialize_with_kind_tag() {
        let event = Event::Pass {
            points: 2.0,
            message: "sorted".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "pass");
        assert_eq!(json["points"], 2.0);
    }
}
