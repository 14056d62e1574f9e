//! Canonical DSL source for a `Paper`.
//!
//! Parsing the output of [`render`] gives back an identical paper for any
//! paper the parser produced. Difficulty is written before the topic
//! because a topic runs to the end of its line.

use std::fmt::Write;

use crate::dsl::{Difficulty, Paper, Question};

pub fn render(paper: &Paper) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Exam: {}", paper.title);
    let _ = writeln!(out, "TotalMarks: {}", paper.declared_total_marks);
    let _ = writeln!(out, "Duration: {} min", paper.declared_duration_minutes);
    if !paper.syllabus_topics.is_empty() {
        let _ = writeln!(out, "Syllabus: {}", paper.syllabus_topics.join(", "));
    }

    for q in &paper.questions {
        out.push('\n');
        question_block(&mut out, &format!("Q{}", q.number), q);

        for sub in &q.subquestions {
            question_block(&mut out, &format!("Q{}.{}", q.number, sub.number), sub);
        }

        if !q.options.is_empty() {
            out.push_str("Options:\n");
            for o in &q.options {
                let line = format!("{}. {}", o.letter, o.text);
                let _ = writeln!(out, "{}", line.trim_end());
            }
        }

        match &q.correct_answer {
            Some(answer) => {
                let _ = writeln!(out, "Correct: {answer}");
            }
            None => out.push_str("Correct:\n"),
        }
        out.push_str("---\n");
    }

    out
}

/// Header line and body text of a question or sub-question.
fn question_block(out: &mut String, marker: &str, q: &Question) {
    let _ = write!(out, "{marker} [{}] ({} marks)", q.kind.tag(), q.marks);
    if q.difficulty != Difficulty::Unknown {
        let _ = write!(out, " Difficulty: {}", q.difficulty);
    }
    if let Some(topic) = &q.topic {
        let _ = write!(out, " Topic: {topic}");
    }
    out.push('\n');
    for line in q.text.lines() {
        let _ = writeln!(out, "{line}");
    }
}
