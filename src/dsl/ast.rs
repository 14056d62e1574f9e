//! Abstract Syntax Tree for the question paper DSL.
//!
//! A [`Paper`] exclusively owns its questions, and each [`Question`] owns its
//! options and sub-questions. Order everywhere is document order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A complete question paper.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Paper {
    pub title: String,
    pub declared_total_marks: u32,
    pub declared_duration_minutes: u32,
    pub syllabus_topics: Vec<String>,
    pub questions: Vec<Question>,
}

/// A question, or a sub-question nested inside one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub number: u32,
    pub kind: QuestionKind,
    pub text: String,
    pub marks: u32,
    pub topic: Option<String>,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub subquestions: Vec<Question>,
}

/// One lettered choice of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub letter: char,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Mcq,
    Short,
    Long,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Unknown,
}

impl Paper {
    /// Sum of the marks of the top-level questions.
    pub fn computed_total_marks(&self) -> u32 {
        self.questions.iter().map(|q| q.marks).sum()
    }

    /// Find a top-level question by its number.
    pub fn question(&self, number: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.number == number)
    }
}

impl Question {
    pub fn is_mcq(&self) -> bool {
        self.kind == QuestionKind::Mcq
    }

    /// Topics referenced by this question and all of its sub-questions.
    pub fn topics(&self) -> Vec<&str> {
        let mut out = Vec::new();
        if let Some(topic) = &self.topic {
            out.push(topic.as_str());
        }
        for sub in &self.subquestions {
            out.extend(sub.topics());
        }
        out
    }

    /// Question text followed by the text of each sub-question, one per line.
    pub fn full_text(&self) -> String {
        let mut text = self.text.clone();
        for sub in &self.subquestions {
            let sub_text = sub.full_text();
            if sub_text.is_empty() {
                continue;
            }
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&sub_text);
        }
        text
    }

    /// Word count of the question text including sub-question text.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
            + self
                .subquestions
                .iter()
                .map(Question::word_count)
                .sum::<usize>()
    }

    pub fn option(&self, letter: char) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.letter == letter)
    }
}

impl QuestionKind {
    /// Map a kind tag (without brackets) to a kind, case-insensitively.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "mcq" => Some(Self::Mcq),
            "short" => Some(Self::Short),
            "long" => Some(Self::Long),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// The tag as written in the DSL.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Mcq => "MCQ",
            Self::Short => "Short",
            Self::Long => "Long",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Difficulty {
    pub fn from_word(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(number: u32, marks: u32) -> Question {
        Question {
            number,
            kind: QuestionKind::Short,
            text: "Define a token.".to_string(),
            marks,
            topic: None,
            difficulty: Difficulty::Unknown,
            options: Vec::new(),
            correct_answer: None,
            subquestions: Vec::new(),
        }
    }

    #[test]
    fn computed_total_ignores_subquestion_marks() {
        let mut q1 = question(1, 10);
        q1.subquestions.push(question(1, 4));
        q1.subquestions.push(question(2, 8));
        let paper = Paper {
            questions: vec![q1, question(2, 5)],
            ..Paper::default()
        };
        assert_eq!(paper.computed_total_marks(), 15);
    }

    #[test]
    fn topics_include_subquestions() {
        let mut q = question(1, 10);
        q.topic = Some("Parsing".to_string());
        let mut sub = question(1, 5);
        sub.topic = Some("Lexing".to_string());
        q.subquestions.push(sub);
        assert_eq!(q.topics(), vec!["Parsing", "Lexing"]);
    }

    #[test]
    fn word_count_includes_subquestions() {
        let mut q = question(1, 10);
        q.subquestions.push(question(1, 5));
        assert_eq!(q.word_count(), 6);
    }

    #[test]
    fn full_text_appends_subquestions() {
        let mut q = question(1, 10);
        q.text = "Answer both parts.".to_string();
        let mut sub = question(1, 5);
        sub.text = "Define a token.".to_string();
        q.subquestions.push(sub);
        q.subquestions.push(Question {
            text: String::new(),
            ..question(2, 5)
        });
        assert_eq!(q.full_text(), "Answer both parts.\nDefine a token.");
    }

    #[test]
    fn kind_tags_are_case_insensitive() {
        assert_eq!(QuestionKind::from_tag("mcq"), Some(QuestionKind::Mcq));
        assert_eq!(QuestionKind::from_tag("LONG"), Some(QuestionKind::Long));
        assert_eq!(QuestionKind::from_tag("essay"), None);
    }

    #[test]
    fn difficulty_serializes_lowercase() {
        let json = serde_json::to_string(&Difficulty::Hard).unwrap();
        assert_eq!(json, "\"hard\"");
    }
}
