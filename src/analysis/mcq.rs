//! Multiple-choice answer keys.

use crate::dsl::Question;
use crate::issue::{IssueCode, ValidationIssue};

/// Letters designated by a `Correct:` answer.
///
/// `b`, `B`, `a, c`, `a/c`, `a & c` and `a and c` name letters directly.
/// Anything else is matched against the option texts, case-insensitively.
pub fn resolve_letters(answer: &str, question: &Question) -> Vec<char> {
    let pieces: Vec<&str> = answer
        .split(|c: char| c == ',' || c == '/' || c == '&' || c.is_whitespace())
        .map(|p| p.trim_matches(['(', ')', '.']))
        .filter(|p| !p.is_empty() && !p.eq_ignore_ascii_case("and"))
        .collect();

    let as_letters: Option<Vec<char>> = pieces
        .iter()
        .map(|p| {
            let mut chars = p.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_lowercase()),
                _ => None,
            }
        })
        .collect();

    match as_letters {
        Some(letters) if !letters.is_empty() => {
            let mut distinct: Vec<char> = Vec::new();
            for l in letters {
                if !distinct.contains(&l) {
                    distinct.push(l);
                }
            }
            distinct
        }
        _ => {
            let wanted = normalize(answer);
            if wanted.is_empty() {
                return Vec::new();
            }
            question
                .options
                .iter()
                .filter(|o| normalize(&o.text) == wanted)
                .map(|o| o.letter)
                .collect()
        }
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Problems with one MCQ question's answer key. Empty means the question
/// has exactly one valid correct option.
pub fn check(question: &Question) -> Vec<ValidationIssue> {
    let n = question.number;
    let mut issues = Vec::new();

    let mut seen: Vec<char> = Vec::new();
    let mut duplicated: Vec<char> = Vec::new();
    for o in &question.options {
        if seen.contains(&o.letter) {
            if !duplicated.contains(&o.letter) {
                duplicated.push(o.letter);
            }
        } else {
            seen.push(o.letter);
        }
    }
    for letter in &duplicated {
        issues.push(
            ValidationIssue::error(
                IssueCode::McqDuplicateOption,
                format!("option '{letter}' appears more than once"),
            )
            .for_question(n),
        );
    }

    let answer = question.correct_answer.as_deref().unwrap_or("");
    let letters = resolve_letters(answer, question);

    match letters.as_slice() {
        [] => issues.push(
            ValidationIssue::error(
                IssueCode::McqNoAnswer,
                if answer.trim().is_empty() {
                    "MCQ has no correct answer".to_string()
                } else {
                    format!("correct answer '{answer}' does not name an option")
                },
            )
            .for_question(n),
        ),
        [letter] => {
            if question.option(*letter).is_none() {
                issues.push(
                    ValidationIssue::error(
                        IssueCode::McqAnswerNotInOptions,
                        format!("correct answer '{letter}' is not among the options"),
                    )
                    .for_question(n),
                );
            }
        }
        many => {
            let list: Vec<String> = many.iter().map(char::to_string).collect();
            issues.push(
                ValidationIssue::error(
                    IssueCode::McqMultipleAnswers,
                    format!("MCQ designates {} correct answers: {}", many.len(), list.join(", ")),
                )
                .for_question(n),
            );
            for letter in many.iter().filter(|l| question.option(**l).is_none()) {
                issues.push(
                    ValidationIssue::error(
                        IssueCode::McqAnswerNotInOptions,
                        format!("correct answer '{letter}' is not among the options"),
                    )
                    .for_question(n),
                );
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::mcq;

    #[test]
    fn single_letter_answer_is_valid() {
        let q = mcq(1, &['a', 'b', 'c', 'd'], Some("b"));
        assert!(check(&q).is_empty());
    }

    #[test]
    fn uppercase_and_decorated_letters() {
        let q = mcq(1, &['a', 'b', 'c', 'd'], Some("(B)"));
        assert_eq!(resolve_letters("B", &q), vec!['b']);
        assert_eq!(resolve_letters("c.", &q), vec!['c']);
    }

    #[test]
    fn answer_outside_options() {
        let q = mcq(1, &['a', 'b', 'c', 'd'], Some("e"));
        let issues = check(&q);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::McqAnswerNotInOptions);
        assert_eq!(issues[0].question, Some(1));
    }

    #[test]
    fn missing_answer() {
        let q = mcq(2, &['a', 'b'], None);
        let issues = check(&q);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::McqNoAnswer);
        assert_eq!(issues[0].message, "MCQ has no correct answer");
    }

    #[test]
    fn multiple_answers() {
        for answer in ["a, c", "a/c", "a & c", "a and c"] {
            let q = mcq(3, &['a', 'b', 'c'], Some(answer));
            let issues = check(&q);
            assert_eq!(issues.len(), 1, "{answer}");
            assert_eq!(issues[0].code, IssueCode::McqMultipleAnswers);
        }
    }

    #[test]
    fn repeated_letter_counts_once() {
        let q = mcq(3, &['a', 'b'], Some("b, b"));
        assert!(check(&q).is_empty());
    }

    #[test]
    fn answer_by_option_text() {
        let mut q = mcq(4, &['a', 'b'], Some("option   B"));
        q.options[1].text = "Option b".to_string();
        assert_eq!(resolve_letters("option   B", &q), vec!['b']);
        assert!(check(&q).is_empty());
    }

    #[test]
    fn unmatched_text_answer_is_no_answer() {
        let q = mcq(4, &['a', 'b'], Some("none of these"));
        let issues = check(&q);
        assert_eq!(issues[0].code, IssueCode::McqNoAnswer);
        assert!(issues[0].message.contains("none of these"));
    }

    #[test]
    fn duplicated_option_letter() {
        let q = mcq(5, &['a', 'b', 'b', 'c'], Some("a"));
        let issues = check(&q);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::McqDuplicateOption);
    }

    #[test]
    fn answer_on_duplicated_letter_reports_duplicate() {
        let q = mcq(5, &['a', 'b', 'b'], Some("b"));
        let codes: Vec<_> = check(&q).into_iter().map(|i| i.code).collect();
        assert_eq!(codes, vec![IssueCode::McqDuplicateOption]);
    }
}
