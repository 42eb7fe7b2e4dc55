use chrono::{DateTime, Utc};

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub is_complete: bool,
}

/// End-of-exam report for a candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamSummary {
    pub candidate: String,
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub unanswered: usize,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ExamSummary {
    /// Share of correct answers over all questions, in percent.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn score_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 * 100.0 / self.total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(total: usize, correct: usize) -> ExamSummary {
        ExamSummary {
            candidate: "Ada".into(),
            total,
            correct,
            incorrect: total - correct,
            unanswered: 0,
            started_at: None,
            completed_at: None,
        }
    }

    #[test]
    fn score_percent_over_total() {
        assert!((summary(4, 3).score_percent() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_exam_scores_zero() {
        assert!(summary(0, 0).score_percent().abs() < f64::EPSILON);
    }
}
