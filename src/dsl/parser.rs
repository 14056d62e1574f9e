//! Parser for the question paper DSL.
//!
//! A single top-down pass over the token stream with one token of
//! lookahead. Every grammar rule is a method on [`Parser`], which is the only
//! state of a compilation and is dropped with it.
//!
//! Recoverable problems (duplicate header fields, malformed numbers, unknown
//! kind tags) are collected as diagnostics. Grammar violations that make the
//! question structure unreliable abort the whole paper with a
//! [`CompileError`].

use std::collections::HashMap;

use tracing::debug;

use super::ast::*;
use super::error::CompileError;
use super::token::{FieldName, Token, TokenKind};
use crate::issue::{IssueCode, ValidationIssue};

static EOF: Token = Token {
    kind: TokenKind::Eof,
    lexeme: String::new(),
    line: 0,
    col: 0,
};

pub struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    diagnostics: Vec<ValidationIssue>,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Diagnostics collected so far, in source order.
    pub fn diagnostics(&self) -> &[ValidationIssue] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<ValidationIssue> {
        self.diagnostics
    }

    pub fn parse(&mut self) -> Result<Paper, CompileError> {
        let mut paper = Paper::default();
        self.parse_header(&mut paper);

        let mut seen: HashMap<u32, usize> = HashMap::new();

        loop {
            self.skip_newlines();
            let t = self.peek();
            match t.kind {
                TokenKind::Eof => break,
                TokenKind::QuestionMarker(number) => {
                    if number == 0 {
                        return Err(CompileError::parse(
                            "question numbers start at Q1, found Q0",
                            t.line,
                            t.col,
                        ));
                    }
                    if let Some(first) = seen.get(&number) {
                        return Err(CompileError::parse(
                            format!("duplicate question number Q{number} (first defined on line {first})"),
                            t.line,
                            t.col,
                        ));
                    }
                    seen.insert(number, t.line);
                    let question = self.parse_question()?;
                    debug!(number, marks = question.marks, "parsed question");
                    paper.questions.push(question);
                }
                _ => self.skip_unrecognized_line(),
            }
        }

        if paper.questions.is_empty() {
            let t = self.peek();
            return Err(CompileError::parse(
                "expected at least one question block starting with 'Q<number>'",
                t.line,
                t.col,
            ));
        }

        Ok(paper)
    }

    // --- Header ---

    fn parse_header(&mut self, paper: &mut Paper) {
        let mut seen: HashMap<FieldName, usize> = HashMap::new();

        loop {
            self.skip_newlines();
            let t = self.peek();
            let field = match t.kind {
                TokenKind::QuestionMarker(_) | TokenKind::Eof => break,
                TokenKind::Field(
                    f @ (FieldName::Exam
                    | FieldName::TotalMarks
                    | FieldName::Duration
                    | FieldName::Syllabus),
                ) => f,
                _ => {
                    self.skip_unrecognized_line();
                    continue;
                }
            };

            self.advance();
            let line = t.line;
            if let Some(first) = seen.insert(field, line) {
                self.diagnostics.push(
                    ValidationIssue::warning(
                        IssueCode::DuplicateHeader,
                        format!(
                            "header field '{}' given again (first on line {first}); the later value wins",
                            field.name()
                        ),
                    )
                    .at_line(line),
                );
            }

            let rest = self.take_line();
            match field {
                FieldName::Exam => paper.title = join_lexemes(rest),
                FieldName::TotalMarks => {
                    paper.declared_total_marks = self.header_marks(rest, line);
                }
                FieldName::Duration => {
                    paper.declared_duration_minutes = self.header_duration(rest, line);
                }
                FieldName::Syllabus => paper.syllabus_topics = split_topics(rest),
                _ => {}
            }
        }

        for field in [FieldName::Exam, FieldName::TotalMarks, FieldName::Duration] {
            if !seen.contains_key(&field) {
                self.diagnostics.push(ValidationIssue::warning(
                    IssueCode::MissingHeader,
                    format!("missing header field '{}'", field.name()),
                ));
            }
        }
    }

    /// First number on the line; 0 with a warning when there is none.
    fn header_marks(&mut self, rest: &[Token], line: usize) -> u32 {
        let value = rest.iter().find_map(|t| match t.kind {
            TokenKind::Integer(v) => Some(v as f64),
            TokenKind::Number(v) => Some(v),
            _ => None,
        });

        match value {
            Some(v) if v.fract() == 0.0 && v <= u32::MAX as f64 => v as u32,
            Some(v) => {
                self.warn_number(format!("'TotalMarks' is not a whole number: {v}"), line);
                v.round().min(u32::MAX as f64) as u32
            }
            None => {
                self.warn_number(
                    format!("no number in 'TotalMarks: {}'; using 0", join_lexemes(rest)),
                    line,
                );
                0
            }
        }
    }

    /// Sum of `<number> [unit]` pairs, normalized to minutes.
    fn header_duration(&mut self, rest: &[Token], line: usize) -> u32 {
        let mut minutes = 0.0;
        let mut found = false;
        let mut i = 0;

        while i < rest.len() {
            let value = match rest[i].kind {
                TokenKind::Integer(v) => v as f64,
                TokenKind::Number(v) => v,
                _ => {
                    i += 1;
                    continue;
                }
            };
            found = true;

            let unit = match rest.get(i + 1).map(|t| &t.kind) {
                Some(TokenKind::Word(w)) => Some(w.to_ascii_lowercase()),
                _ => None,
            };
            match unit.as_deref() {
                Some("h" | "hr" | "hrs" | "hour" | "hours") => {
                    minutes += value * 60.0;
                    i += 2;
                }
                Some("m" | "min" | "mins" | "minute" | "minutes") => {
                    minutes += value;
                    i += 2;
                }
                Some(other) => {
                    self.warn_number(
                        format!("unknown duration unit '{other}'; assuming minutes"),
                        line,
                    );
                    minutes += value;
                    i += 2;
                }
                None => {
                    minutes += value;
                    i += 1;
                }
            }
        }

        if !found {
            self.warn_number(
                format!("no number in 'Duration: {}'; using 0", join_lexemes(rest)),
                line,
            );
            return 0;
        }

        minutes.round().min(u32::MAX as f64) as u32
    }

    fn warn_number(&mut self, message: String, line: usize) {
        self.diagnostics
            .push(ValidationIssue::warning(IssueCode::MalformedNumber, message).at_line(line));
    }

    // --- Questions ---

    fn parse_question(&mut self) -> Result<Question, CompileError> {
        let marker = self.advance();
        let number = match marker.kind {
            TokenKind::QuestionMarker(n) => n,
            _ => return Err(self.expected("question marker 'Q<number>'")),
        };

        let mut question = self.parse_question_header(number)?;
        let mut lines = Vec::new();
        if !question.text.is_empty() {
            lines.push(std::mem::take(&mut question.text));
        }
        self.parse_body(&mut lines);

        let mut seen_subs: HashMap<u32, usize> = HashMap::new();
        while let TokenKind::SubQuestionMarker(parent, sub) = self.peek().kind {
            let sub_marker = self.advance();
            if let Some(first) = seen_subs.get(&sub) {
                return Err(CompileError::parse(
                    format!("duplicate sub-question Q{number}.{sub} (first defined on line {first})"),
                    sub_marker.line,
                    sub_marker.col,
                ));
            }
            let expected = question.subquestions.len() as u32 + 1;
            if sub != expected {
                self.diagnostics.push(
                    ValidationIssue::warning(
                        IssueCode::SubQuestionNumbering,
                        format!("sub-question Q{parent}.{sub} should be numbered Q{number}.{expected}"),
                    )
                    .for_question(number)
                    .at_line(sub_marker.line),
                );
            }
            seen_subs.insert(sub, sub_marker.line);
            if parent != number {
                self.diagnostics.push(
                    ValidationIssue::warning(
                        IssueCode::SubQuestionNumbering,
                        format!("sub-question Q{parent}.{sub} appears inside Q{number}"),
                    )
                    .for_question(number)
                    .at_line(sub_marker.line),
                );
            }

            let mut subquestion = self.parse_question_header(sub)?;
            if subquestion.is_mcq() {
                return Err(CompileError::parse(
                    format!("sub-question Q{parent}.{sub} cannot be a multiple-choice question"),
                    sub_marker.line,
                    sub_marker.col,
                ));
            }
            let mut sub_lines = Vec::new();
            if !subquestion.text.is_empty() {
                sub_lines.push(std::mem::take(&mut subquestion.text));
            }
            self.parse_body(&mut sub_lines);
            subquestion.text = sub_lines.join("\n");
            question.subquestions.push(subquestion);
        }
        question.text = lines.join("\n");

        if self.check_field(FieldName::Options) {
            let options_token = self.advance();
            let trailing = self.take_line();
            if !trailing.is_empty() {
                self.diagnostics.push(
                    ValidationIssue::warning(
                        IssueCode::UnrecognizedLine,
                        format!("ignored text after 'Options:': {}", join_lexemes(trailing)),
                    )
                    .for_question(number)
                    .at_line(options_token.line),
                );
            }
            question.options = self.parse_options();

            if !question.is_mcq() {
                self.diagnostics.push(
                    ValidationIssue::warning(
                        IssueCode::IgnoredOptions,
                        format!("options ignored on non-MCQ question Q{number}"),
                    )
                    .for_question(number)
                    .at_line(options_token.line),
                );
                question.options.clear();
            }
        }

        self.skip_newlines();
        if self.peek().kind == TokenKind::Eof {
            return Err(self.unterminated(marker));
        }
        if question.is_mcq() && question.options.is_empty() {
            return Err(CompileError::parse(
                format!("MCQ question Q{number} requires an 'Options:' list with at least one option"),
                marker.line,
                marker.col,
            ));
        }

        if !self.check_field(FieldName::Correct) {
            return Err(self.expected("'Correct:'"));
        }
        self.advance();
        let answer = self.take_line();
        question.correct_answer = if answer.is_empty() {
            None
        } else {
            Some(join_lexemes(answer))
        };

        self.skip_newlines();
        match self.peek().kind {
            TokenKind::Separator => {
                self.advance();
                self.take_line();
            }
            TokenKind::Eof => return Err(self.unterminated(marker)),
            _ => return Err(self.expected("'---' closing the question block")),
        }

        Ok(question)
    }

    /// `[Kind] (<n> marks)` followed by optional attributes; leftover words
    /// on the line become the first line of the question text.
    fn parse_question_header(&mut self, number: u32) -> Result<Question, CompileError> {
        let t = self.peek();
        let kind = match &t.kind {
            TokenKind::Tag(tag) => {
                self.advance();
                QuestionKind::from_tag(tag).unwrap_or_else(|| {
                    self.diagnostics.push(
                        ValidationIssue::warning(
                            IssueCode::UnknownKind,
                            format!("unknown question kind '{}'; treating as Other", t.lexeme),
                        )
                        .for_question(number)
                        .at_line(t.line),
                    );
                    QuestionKind::Other
                })
            }
            _ => return Err(self.expected("question kind tag [MCQ], [Short] or [Long]")),
        };

        self.expect_punct('(', "'(<n> marks)'")?;
        let marks = self.expect_marks_value()?;
        if self.peek().kind != TokenKind::Marks {
            return Err(self.expected("'marks'"));
        }
        self.advance();
        self.expect_punct(')', "')'")?;

        let mut topic = None;
        let mut difficulty = Difficulty::Unknown;
        let mut inline: Vec<Token> = Vec::new();

        loop {
            let t = self.peek();
            match &t.kind {
                TokenKind::Newline | TokenKind::Eof => break,
                TokenKind::Field(FieldName::Topic) => {
                    self.advance();
                    let start = self.pos;
                    while !self.peek().is_line_end()
                        && self.peek().kind != TokenKind::Field(FieldName::Difficulty)
                    {
                        self.pos += 1;
                    }
                    let value = join_lexemes(&self.tokens[start..self.pos]);
                    topic = (!value.is_empty()).then_some(value);
                }
                TokenKind::Field(FieldName::Difficulty) => {
                    self.advance();
                    let v = self.peek();
                    match &v.kind {
                        TokenKind::Level(level) => {
                            self.advance();
                            difficulty = *level;
                        }
                        TokenKind::Newline | TokenKind::Eof | TokenKind::Field(_) => {
                            self.warn_difficulty("missing difficulty value".to_string(), number, t.line);
                        }
                        _ => {
                            self.advance();
                            self.warn_difficulty(
                                format!("unknown difficulty '{}'; expected Easy, Medium or Hard", v.lexeme),
                                number,
                                v.line,
                            );
                        }
                    }
                }
                TokenKind::Field(FieldName::Options | FieldName::Correct)
                | TokenKind::SubQuestionMarker(..)
                | TokenKind::Separator
                    if inline.is_empty() =>
                {
                    return Err(CompileError::parse(
                        format!("'{}' must start its own line, not follow the question header", t.lexeme),
                        t.line,
                        t.col,
                    ));
                }
                _ => {
                    inline.push(t.clone());
                    self.advance();
                }
            }
        }
        self.take_line();

        Ok(Question {
            number,
            kind,
            text: join_lexemes(&inline),
            marks,
            topic,
            difficulty,
            options: Vec::new(),
            correct_answer: None,
            subquestions: Vec::new(),
        })
    }

    fn warn_difficulty(&mut self, message: String, number: u32, line: usize) {
        self.diagnostics.push(
            ValidationIssue::warning(IssueCode::UnknownDifficulty, message)
                .for_question(number)
                .at_line(line),
        );
    }

    /// Free-text lines up to the next structural line.
    fn parse_body(&mut self, lines: &mut Vec<String>) {
        loop {
            self.skip_newlines();
            match self.peek().kind {
                TokenKind::Field(FieldName::Options | FieldName::Correct)
                | TokenKind::SubQuestionMarker(..)
                | TokenKind::Separator
                | TokenKind::Eof => break,
                _ => {
                    let line = self.take_line();
                    lines.push(join_lexemes(line));
                }
            }
        }
    }

    fn parse_options(&mut self) -> Vec<AnswerOption> {
        let mut options = Vec::new();
        loop {
            self.skip_newlines();
            let TokenKind::OptionMarker(letter) = self.peek().kind else {
                break;
            };
            self.advance();
            let text = join_lexemes(self.take_line());
            options.push(AnswerOption { letter, text });
        }
        options
    }

    fn skip_unrecognized_line(&mut self) {
        let line = self.take_line();
        if let Some(first) = line.first() {
            self.diagnostics.push(
                ValidationIssue::warning(
                    IssueCode::UnrecognizedLine,
                    format!("ignored unrecognized line: {}", join_lexemes(line)),
                )
                .at_line(first.line),
            );
        }
    }

    // --- Utility methods ---

    fn peek(&self) -> &'t Token {
        self.tokens.get(self.pos).unwrap_or(&EOF)
    }

    fn advance(&mut self) -> &'t Token {
        let t = self.peek();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn check_field(&self, field: FieldName) -> bool {
        self.peek().kind == TokenKind::Field(field)
    }

    fn skip_newlines(&mut self) {
        while self.peek().kind == TokenKind::Newline {
            self.pos += 1;
        }
    }

    /// Tokens up to the end of the current line; consumes the newline.
    fn take_line(&mut self) -> &'t [Token] {
        let start = self.pos.min(self.tokens.len());
        while !self.peek().is_line_end() {
            self.pos += 1;
        }
        let line = &self.tokens[start..self.pos.min(self.tokens.len())];
        if self.peek().kind == TokenKind::Newline {
            self.pos += 1;
        }
        line
    }

    fn expect_punct(&mut self, ch: char, what: &str) -> Result<(), CompileError> {
        if self.peek().kind == TokenKind::Punct(ch) {
            self.advance();
            Ok(())
        } else {
            Err(self.expected(what))
        }
    }

    fn expect_marks_value(&mut self) -> Result<u32, CompileError> {
        let t = self.peek();
        match t.kind {
            TokenKind::Integer(v) => {
                let marks = u32::try_from(v).map_err(|_| {
                    CompileError::parse(format!("marks value too large: {v}"), t.line, t.col)
                })?;
                self.advance();
                Ok(marks)
            }
            TokenKind::Number(v) => Err(CompileError::parse(
                format!("marks must be a whole number, got {v}"),
                t.line,
                t.col,
            )),
            _ => Err(self.expected("number of marks")),
        }
    }

    fn expected(&self, what: &str) -> CompileError {
        let t = self.peek();
        CompileError::parse(
            format!("expected {what}, found {}", describe(t)),
            t.line,
            t.col,
        )
    }

    fn unterminated(&self, marker: &Token) -> CompileError {
        let t = self.peek();
        CompileError::parse(
            format!(
                "unterminated question block: {} (line {}) reached end of input before '---'",
                marker.lexeme, marker.line
            ),
            t.line,
            t.col,
        )
    }
}

fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => "end of input".to_string(),
        TokenKind::Newline => "end of line".to_string(),
        _ => format!("'{}'", token.lexeme),
    }
}

/// Rebuild the text of tokens from one line, collapsing any run of
/// whitespace between them to a single space.
pub fn join_lexemes(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut prev_end: Option<usize> = None;
    for t in tokens {
        if prev_end.is_some_and(|end| t.col > end) {
            out.push(' ');
        }
        out.push_str(&t.lexeme);
        prev_end = Some(t.end_col());
    }
    out
}

/// Comma separated topics, trimmed, without empties or case-insensitive repeats.
fn split_topics(tokens: &[Token]) -> Vec<String> {
    let mut topics: Vec<String> = Vec::new();
    for part in join_lexemes(tokens).split(',') {
        let topic = part.trim();
        if topic.is_empty() || topics.iter().any(|t| t.eq_ignore_ascii_case(topic)) {
            continue;
        }
        topics.push(topic.to_string());
    }
    topics
}
