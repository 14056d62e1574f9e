//! Marks totality: the questions must add up to the declared total.

use crate::dsl::Paper;
use crate::issue::{IssueCode, ValidationIssue};

pub fn check(paper: &Paper) -> Option<ValidationIssue> {
    let computed = paper.computed_total_marks();
    let declared = paper.declared_total_marks;
    (computed != declared).then(|| {
        ValidationIssue::error(
            IssueCode::MarksMismatch,
            format!("marks mismatch: computed={computed}, declared={declared}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::{paper, question};

    #[test]
    fn matching_total_passes() {
        let p = paper(20, vec![question(1, 12), question(2, 8)]);
        assert!(check(&p).is_none());
    }

    #[test]
    fn mismatch_reports_both_totals() {
        let p = paper(50, vec![question(1, 30), question(2, 10)]);
        let issue = check(&p).unwrap();
        assert!(issue.is_error());
        assert_eq!(issue.message, "marks mismatch: computed=40, declared=50");
        assert_eq!(issue.question, None);
    }

    #[test]
    fn subquestion_marks_are_not_added() {
        let mut q = question(1, 10);
        q.subquestions = vec![question(1, 7), question(2, 7)];
        assert!(check(&paper(10, vec![q])).is_none());
    }
}
