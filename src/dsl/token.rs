//! Token types for the question paper lexer.

use serde::Serialize;

use super::ast::Difficulty;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub col: usize,
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Field names, always written with a trailing ':'
    Field(FieldName),

    // Question structure
    QuestionMarker(u32),         // Q3
    SubQuestionMarker(u32, u32), // Q3.2
    Tag(String),                 // [MCQ]
    Marks,                       // marks
    Level(Difficulty),           // Easy | Medium | Hard
    OptionMarker(char),          // a.
    Separator,                   // ---

    // Literals
    Word(String),
    Integer(u64),
    Number(f64),
    Punct(char),

    // Special
    Newline,
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    Exam,
    TotalMarks,
    Duration,
    Syllabus,
    Topic,
    Difficulty,
    Options,
    Correct,
}

impl FieldName {
    pub fn from_word(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "exam" | "title" => Some(Self::Exam),
            "totalmarks" => Some(Self::TotalMarks),
            "duration" => Some(Self::Duration),
            "syllabus" => Some(Self::Syllabus),
            "topic" => Some(Self::Topic),
            "difficulty" => Some(Self::Difficulty),
            "options" => Some(Self::Options),
            "correct" => Some(Self::Correct),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Exam => "Exam",
            Self::TotalMarks => "TotalMarks",
            Self::Duration => "Duration",
            Self::Syllabus => "Syllabus",
            Self::Topic => "Topic",
            Self::Difficulty => "Difficulty",
            Self::Options => "Options",
            Self::Correct => "Correct",
        }
    }
}

impl TokenKind {
    /// Stable name used in token dumps.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Field(_) => "FIELD",
            Self::QuestionMarker(_) => "QUESTION_MARKER",
            Self::SubQuestionMarker(..) => "SUBQUESTION_MARKER",
            Self::Tag(_) => "KIND_TAG",
            Self::Marks => "MARKS",
            Self::Level(_) => "DIFFICULTY",
            Self::OptionMarker(_) => "OPTION_MARKER",
            Self::Separator => "SEPARATOR",
            Self::Word(_) => "WORD",
            Self::Integer(_) | Self::Number(_) => "NUMBER",
            Self::Punct(_) => "PUNCT",
            Self::Newline => "NEWLINE",
            Self::Eof => "EOF",
        }
    }
}

impl Token {
    /// Column just past the last character of the lexeme.
    pub fn end_col(&self) -> usize {
        self.col + self.lexeme.chars().count()
    }

    pub fn is_line_end(&self) -> bool {
        matches!(self.kind, TokenKind::Newline | TokenKind::Eof)
    }
}

/// One entry of the token dump artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenRecord {
    pub kind: &'static str,
    pub lexeme: String,
    pub line: usize,
}

impl From<&Token> for TokenRecord {
    fn from(token: &Token) -> Self {
        Self {
            kind: token.kind.name(),
            lexeme: token.lexeme.clone(),
            line: token.line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_accept_aliases() {
        assert_eq!(FieldName::from_word("Title"), Some(FieldName::Exam));
        assert_eq!(FieldName::from_word("TOTALMARKS"), Some(FieldName::TotalMarks));
        assert_eq!(FieldName::from_word("Subject"), None);
    }

    #[test]
    fn record_uses_stable_kind_name() {
        let token = Token {
            kind: TokenKind::QuestionMarker(4),
            lexeme: "Q4".to_string(),
            line: 12,
            col: 1,
        };
        let record = TokenRecord::from(&token);
        assert_eq!(record.kind, "QUESTION_MARKER");
        assert_eq!(record.line, 12);
        assert_eq!(token.end_col(), 3);
    }
}
