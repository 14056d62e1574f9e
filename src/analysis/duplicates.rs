//! Exact and near-duplicate question text.

use std::collections::HashSet;

use super::config::DuplicateConfig;
use crate::dsl::Paper;
use crate::issue::{IssueCode, ValidationIssue};

#[derive(Debug, Clone, Default)]
pub struct DuplicateScan {
    pub issues: Vec<ValidationIssue>,
    pub comparisons: usize,
    pub truncated: bool,
}

/// Case-folded text with runs of whitespace collapsed to one space.
/// Punctuation is kept, so `x < y` and `x > y` stay distinct.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn word_set(text: &str) -> HashSet<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Jaccard similarity of the word sets of two normalized texts, ignoring
/// punctuation.
pub fn jaccard(a: &str, b: &str) -> f64 {
    let a = word_set(a);
    let b = word_set(b);
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}

/// Compare top-level questions pairwise, in document order, up to the
/// configured number of comparisons. A question's text includes its
/// sub-questions. Each pair is reported once, against the lower-numbered
/// question.
pub fn scan(paper: &Paper, config: &DuplicateConfig) -> DuplicateScan {
    let texts: Vec<(u32, String)> = paper
        .questions
        .iter()
        .map(|q| (q.number, normalize(&q.full_text())))
        .filter(|(_, text)| !text.is_empty())
        .collect();

    let mut result = DuplicateScan::default();

    'outer: for (i, (a_number, a)) in texts.iter().enumerate() {
        for (b_number, b) in &texts[i + 1..] {
            if result.comparisons >= config.max_comparisons {
                result.truncated = true;
                break 'outer;
            }
            result.comparisons += 1;

            let (low, high) = if a_number < b_number {
                (a_number, b_number)
            } else {
                (b_number, a_number)
            };
            let message = if a == b {
                format!("Q{low} and Q{high} have identical text")
            } else {
                let similarity = jaccard(a, b);
                if similarity < config.threshold {
                    continue;
                }
                format!(
                    "Q{low} and Q{high} are near-duplicates (similarity {:.2})",
                    similarity
                )
            };
            result.issues.push(
                ValidationIssue::warning(IssueCode::DuplicateQuestion, message).for_question(*low),
            );
        }
    }

    result
}

pub fn limit_issue(scan: &DuplicateScan) -> Option<ValidationIssue> {
    scan.truncated.then(|| {
        ValidationIssue::warning(
            IssueCode::ComparisonLimit,
            format!(
                "duplicate detection stopped after {} comparisons; some pairs were not checked",
                scan.comparisons
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::{paper, question};
    use assert_approx_eq::assert_approx_eq;

    fn texts(list: &[&str]) -> Paper {
        let questions = list
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let mut q = question(i as u32 + 1, 5);
                q.text = text.to_string();
                q
            })
            .collect();
        paper(5 * list.len() as u32, questions)
    }

    #[test]
    fn normalize_folds_case_and_whitespace_only() {
        assert_eq!(normalize("  Define   a\nToken!  "), "define a token!");
        assert_eq!(normalize("LR(1)-parsing"), "lr(1)-parsing");
    }

    #[test]
    fn jaccard_of_word_sets() {
        assert_approx_eq!(jaccard("a b c", "a b d"), 0.5, 1e-9);
        assert_approx_eq!(jaccard("a b", "b a"), 1.0, 1e-9);
        assert_approx_eq!(jaccard("lr(1)-parsing", "lr 1 parsing"), 1.0, 1e-9);
        assert_eq!(jaccard("", ""), 0.0);
    }

    #[test]
    fn exact_duplicate_is_flagged_on_lower_number() {
        let p = texts(&["Define a token.", "Explain parsing.", "define   a TOKEN."]);
        let found = scan(&p, &DuplicateConfig::default());
        assert_eq!(found.issues.len(), 1);
        assert_eq!(found.issues[0].question, Some(1));
        assert!(found.issues[0].message.contains("Q1 and Q3 have identical text"));
        assert_eq!(found.comparisons, 3);
    }

    #[test]
    fn pair_is_reported_on_lowest_number_not_document_order() {
        let mut p = texts(&["Define a token.", "Define a token."]);
        p.questions[0].number = 5;
        p.questions[1].number = 2;
        let found = scan(&p, &DuplicateConfig::default());
        assert_eq!(found.issues.len(), 1);
        assert_eq!(found.issues[0].question, Some(2));
        assert_eq!(found.issues[0].message, "Q2 and Q5 have identical text");
    }

    #[test]
    fn punctuation_separates_exact_duplicates() {
        let p = texts(&["Is x < y?", "Is x > y?"]);
        let found = scan(&p, &DuplicateConfig::default());
        assert_eq!(found.issues.len(), 1);
        assert!(found.issues[0].message.contains("near-duplicates"));
        assert!(!found.issues[0].message.contains("identical"));
    }

    #[test]
    fn subquestion_text_is_compared() {
        let mut p = texts(&["Answer both parts.", "Answer both parts."]);
        let mut first = question(1, 2);
        first.text = "Construct an SLR parsing table for the grammar.".to_string();
        let mut second = question(1, 2);
        second.text = "Explain register allocation by graph colouring.".to_string();
        p.questions[0].subquestions.push(first);
        p.questions[1].subquestions.push(second);

        let found = scan(&p, &DuplicateConfig::default());
        assert!(found.issues.is_empty(), "{:?}", found.issues);
    }

    #[test]
    fn near_duplicate_above_threshold() {
        let p = texts(&[
            "Explain the phases of a compiler in detail",
            "Explain in detail the phases of the compiler",
        ]);
        let found = scan(&p, &DuplicateConfig::default());
        assert_eq!(found.issues.len(), 1);
        assert!(found.issues[0].message.contains("near-duplicates"));
    }

    #[test]
    fn distinct_questions_pass() {
        let p = texts(&["Define a token.", "Construct an LR(1) parsing table."]);
        assert!(scan(&p, &DuplicateConfig::default()).issues.is_empty());
    }

    #[test]
    fn empty_texts_are_skipped() {
        let p = texts(&["", "  ", "Define a token."]);
        let found = scan(&p, &DuplicateConfig::default());
        assert!(found.issues.is_empty());
        assert_eq!(found.comparisons, 0);
    }

    #[test]
    fn comparison_limit_truncates() {
        let p = texts(&["one", "two", "three", "four"]);
        let config = DuplicateConfig {
            max_comparisons: 2,
            ..DuplicateConfig::default()
        };
        let found = scan(&p, &config);
        assert!(found.truncated);
        assert_eq!(found.comparisons, 2);
        assert_eq!(limit_issue(&found).unwrap().code, IssueCode::ComparisonLimit);
    }

    #[test]
    fn exact_limit_is_not_truncated() {
        let p = texts(&["one", "two", "three"]);
        let config = DuplicateConfig {
            max_comparisons: 3,
            ..DuplicateConfig::default()
        };
        let found = scan(&p, &config);
        assert!(!found.truncated);
        assert!(limit_issue(&found).is_none());
    }
}
