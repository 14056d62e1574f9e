//! Estimated answering time against the declared duration.

use serde::{Deserialize, Serialize};

use super::config::TimeConfig;
use crate::dsl::{Difficulty, Question};
use crate::issue::{IssueCode, ValidationIssue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionTime {
    pub question: u32,
    pub minutes: u32,
}

/// Whole minutes needed for one top-level question, sub-question text
/// included. Monotonic in marks and in text length.
pub fn estimate(question: &Question, level: Difficulty, config: &TimeConfig) -> u32 {
    let minutes = question.marks as f64 * config.minutes_per_mark * config.factor(level)
        + question.word_count() as f64 * config.minutes_per_word;
    minutes.ceil().min(u32::MAX as f64) as u32
}

/// Warn when the estimate overruns the declared duration by more than the
/// tolerance. No duration declared means nothing to compare against.
pub fn check(estimated: u32, declared: u32, config: &TimeConfig) -> Option<ValidationIssue> {
    if declared == 0 {
        return None;
    }
    let limit = declared.saturating_add(config.tolerance_minutes);
    (estimated > limit).then(|| {
        ValidationIssue::warning(
            IssueCode::TimeBudget,
            format!(
                "estimated time {estimated} min exceeds declared duration {declared} min (tolerance {} min)",
                config.tolerance_minutes
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::question;

    #[test]
    fn estimate_rounds_up() {
        let config = TimeConfig::default();
        let mut q = question(1, 10);
        q.text = "Explain the phases of a compiler.".to_string();
        // 10 * 1.5 * 1.0 + 6 * 0.05 = 15.3
        assert_eq!(estimate(&q, Difficulty::Medium, &config), 16);
    }

    #[test]
    fn harder_questions_take_longer() {
        let config = TimeConfig::default();
        let q = question(1, 10);
        let easy = estimate(&q, Difficulty::Easy, &config);
        let hard = estimate(&q, Difficulty::Hard, &config);
        assert!(hard > easy);
    }

    #[test]
    fn estimate_is_monotonic_in_marks_and_length() {
        let config = TimeConfig::default();
        let short = question(1, 5);
        let mut more_marks = question(1, 6);
        more_marks.text = short.text.clone();
        let mut longer = question(1, 5);
        longer.text = format!("{} {}", short.text, "word ".repeat(40));
        let base = estimate(&short, Difficulty::Unknown, &config);
        assert!(estimate(&more_marks, Difficulty::Unknown, &config) >= base);
        assert!(estimate(&longer, Difficulty::Unknown, &config) >= base);
    }

    #[test]
    fn overrun_beyond_tolerance_warns() {
        let config = TimeConfig::default();
        assert!(check(75, 60, &config).is_none());
        let issue = check(76, 60, &config).unwrap();
        assert_eq!(issue.code, IssueCode::TimeBudget);
        assert!(issue.message.contains("76 min"));
    }

    #[test]
    fn no_declared_duration_skips_check() {
        assert!(check(500, 0, &TimeConfig::default()).is_none());
    }
}
