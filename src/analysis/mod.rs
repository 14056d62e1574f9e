//! Semantic analysis: academic rules over a parsed `Paper`.
//!
//! Every rule is independent and reads the paper through a shared
//! reference. Violations are returned as [`ValidationIssue`] values; the
//! analyzer itself never fails.
//!
//! Issue order is stable: paper-wide issues first, then issues attached to a
//! question in document order, each group sorted by rule priority.

pub mod config;
pub mod coverage;
pub mod difficulty;
pub mod duplicates;
pub mod marks;
pub mod mcq;
pub mod timing;

pub use config::{AnalyzerConfig, ConfigError};
pub use coverage::SyllabusCoverage;
pub use difficulty::{DifficultyHistogram, DifficultyPercentages};
pub use timing::QuestionTime;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dsl::Paper;
use crate::issue::{IssueCode, ValidationIssue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub question_count: usize,
    pub total_marks_computed: u32,
    pub total_marks_declared: u32,
    pub difficulty_histogram: DifficultyHistogram,
    /// `None` when no question has a known difficulty.
    pub difficulty_percentages: Option<DifficultyPercentages>,
    pub estimated_total_time: u32,
    pub declared_duration: u32,
    pub question_times: Vec<QuestionTime>,
    pub syllabus_coverage: SyllabusCoverage,
    pub mcq_total: usize,
    pub mcq_valid: usize,
    /// Question pairs compared by duplicate detection.
    pub comparisons: usize,
    pub quality_score: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub issues: Vec<ValidationIssue>,
    pub statistics: Statistics,
}

pub fn analyze(paper: &Paper, config: &AnalyzerConfig) -> Analysis {
    let mut issues = Vec::new();

    issues.extend(marks::check(paper));

    let syllabus_coverage = coverage::coverage(paper);
    issues.extend(coverage::uncovered_issues(&syllabus_coverage));

    let histogram = difficulty::histogram(paper, &config.difficulty);
    issues.extend(difficulty::check(&histogram, &config.difficulty));

    let question_times: Vec<QuestionTime> = paper
        .questions
        .iter()
        .map(|q| QuestionTime {
            question: q.number,
            minutes: timing::estimate(
                q,
                difficulty::effective_level(q, &config.difficulty),
                &config.time,
            ),
        })
        .collect();
    let estimated_total_time = question_times
        .iter()
        .fold(0u32, |acc, t| acc.saturating_add(t.minutes));
    issues.extend(timing::check(
        estimated_total_time,
        paper.declared_duration_minutes,
        &config.time,
    ));

    let dup_scan = duplicates::scan(paper, &config.duplicates);
    issues.extend(duplicates::limit_issue(&dup_scan));

    let mut mcq_total = 0;
    let mut mcq_valid = 0;
    for q in paper.questions.iter().filter(|q| q.is_mcq()) {
        mcq_total += 1;
        let found = mcq::check(q);
        if found.is_empty() {
            mcq_valid += 1;
        }
        issues.extend(found);
    }

    issues.extend(dup_scan.issues);
    issues.extend(coverage::unknown_topics(paper));

    order_issues(paper, &mut issues);
    let quality_score = quality_score(&issues, config);

    debug!(
        issues = issues.len(),
        estimated_total_time, quality_score, "analyzed paper"
    );

    Analysis {
        issues,
        statistics: Statistics {
            question_count: paper.questions.len(),
            total_marks_computed: paper.computed_total_marks(),
            total_marks_declared: paper.declared_total_marks,
            difficulty_histogram: histogram,
            difficulty_percentages: histogram.percentages(),
            estimated_total_time,
            declared_duration: paper.declared_duration_minutes,
            question_times,
            syllabus_coverage,
            mcq_total,
            mcq_valid,
            comparisons: dup_scan.comparisons,
            quality_score,
        },
    }
}

/// Paper-wide issues first, then by question position, then by rule
/// priority. The sort is stable so equal keys keep their emission order.
fn order_issues(paper: &Paper, issues: &mut [ValidationIssue]) {
    let position: HashMap<u32, usize> = paper
        .questions
        .iter()
        .enumerate()
        .map(|(i, q)| (q.number, i + 1))
        .collect();

    issues.sort_by_key(|issue| {
        let scope = issue
            .question
            .map_or(0, |n| position.get(&n).copied().unwrap_or(usize::MAX));
        (scope, issue.code.priority())
    });
}

/// 100 minus a penalty for each failed paper-level check.
fn quality_score(issues: &[ValidationIssue], config: &AnalyzerConfig) -> u32 {
    let has = |code: IssueCode| issues.iter().any(|i| i.code == code);
    let score = &config.score;

    let mut penalty = 0u32;
    if has(IssueCode::MarksMismatch) {
        penalty = penalty.saturating_add(score.marks_penalty);
    }
    if has(IssueCode::TimeBudget) {
        penalty = penalty.saturating_add(score.time_penalty);
    }
    if has(IssueCode::DifficultyImbalance) {
        penalty = penalty.saturating_add(score.difficulty_penalty);
    }
    100u32.saturating_sub(penalty)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::dsl::{AnswerOption, Difficulty, Paper, Question, QuestionKind};

    pub fn question(number: u32, marks: u32) -> Question {
        Question {
            number,
            kind: QuestionKind::Short,
            text: format!("Question {number} about compilers"),
            marks,
            topic: None,
            difficulty: Difficulty::Unknown,
            options: Vec::new(),
            correct_answer: Some("see notes".to_string()),
            subquestions: Vec::new(),
        }
    }

    pub fn mcq(number: u32, letters: &[char], answer: Option<&str>) -> Question {
        Question {
            kind: QuestionKind::Mcq,
            options: letters
                .iter()
                .map(|&letter| AnswerOption {
                    letter,
                    text: format!("Choice {letter}"),
                })
                .collect(),
            correct_answer: answer.map(str::to_string),
            ..question(number, 2)
        }
    }

    pub fn paper(declared_total_marks: u32, questions: Vec<Question>) -> Paper {
        Paper {
            title: "Compiler Design".to_string(),
            declared_total_marks,
            declared_duration_minutes: 0,
            syllabus_topics: Vec::new(),
            questions,
        }
    }
}
