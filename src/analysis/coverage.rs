//! Syllabus coverage and stray question topics.

use serde::{Deserialize, Serialize};

use crate::dsl::Paper;
use crate::issue::{IssueCode, ValidationIssue};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SyllabusCoverage {
    pub covered: Vec<String>,
    pub uncovered: Vec<String>,
    /// Share of syllabus topics covered, 0-100, one decimal.
    pub percentage: f64,
}

/// Case-insensitive, whitespace-collapsed form used for topic matching.
fn topic_key(topic: &str) -> String {
    topic
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn question_topic_keys(paper: &Paper) -> Vec<String> {
    paper
        .questions
        .iter()
        .flat_map(|q| q.topics())
        .map(topic_key)
        .collect()
}

pub fn coverage(paper: &Paper) -> SyllabusCoverage {
    let used = question_topic_keys(paper);
    let (covered, uncovered): (Vec<String>, Vec<String>) = paper
        .syllabus_topics
        .iter()
        .cloned()
        .partition(|topic| used.contains(&topic_key(topic)));

    let percentage = if paper.syllabus_topics.is_empty() {
        100.0
    } else {
        round1(covered.len() as f64 / paper.syllabus_topics.len() as f64 * 100.0)
    };

    SyllabusCoverage {
        covered,
        uncovered,
        percentage,
    }
}

/// One warning per syllabus topic no question addresses.
pub fn uncovered_issues(coverage: &SyllabusCoverage) -> Vec<ValidationIssue> {
    coverage
        .uncovered
        .iter()
        .map(|topic| {
            ValidationIssue::warning(
                IssueCode::UncoveredTopic,
                format!("syllabus topic not covered: {topic}"),
            )
        })
        .collect()
}

/// Question topics that are not in the syllabus. Skipped when the paper
/// declares no syllabus.
pub fn unknown_topics(paper: &Paper) -> Vec<ValidationIssue> {
    if paper.syllabus_topics.is_empty() {
        return Vec::new();
    }
    let syllabus: Vec<String> = paper.syllabus_topics.iter().map(|t| topic_key(t)).collect();

    let mut issues = Vec::new();
    for q in &paper.questions {
        let mut reported: Vec<String> = Vec::new();
        for topic in q.topics() {
            let key = topic_key(topic);
            if syllabus.contains(&key) || reported.contains(&key) {
                continue;
            }
            issues.push(
                ValidationIssue::warning(
                    IssueCode::UnknownTopic,
                    format!("topic '{topic}' of Q{} is not in the syllabus", q.number),
                )
                .for_question(q.number),
            );
            reported.push(key);
        }
    }
    issues
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
