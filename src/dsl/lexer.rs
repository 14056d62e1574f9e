//! Lexer for the question paper DSL.
//!
//! Converts source text into a stream of [`Token`]s. The lexer is lazy: it
//! implements [`Iterator`] and produces one token per call, stopping after
//! `Eof` or after the first error. Lexing again means building a new lexer
//! over the same text.

use super::ast::Difficulty;
use super::error::CompileError;
use super::token::{FieldName, Token, TokenKind};

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
    at_line_start: bool,
    finished: bool,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
            at_line_start: true,
            finished: false,
        }
    }

    /// Lex the whole input, failing on the first malformed character.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, CompileError> {
        self.by_ref().collect()
    }

    fn next_token(&mut self) -> Result<Token, CompileError> {
        self.skip_whitespace();

        let line = self.line;
        let col = self.col;

        if self.is_at_end() {
            return Ok(Token {
                kind: TokenKind::Eof,
                lexeme: String::new(),
                line,
                col,
            });
        }

        let ch = self.peek();

        if ch == '\n' {
            self.advance();
            self.line += 1;
            self.col = 1;
            self.at_line_start = true;
            return Ok(Token {
                kind: TokenKind::Newline,
                lexeme: "\n".to_string(),
                line,
                col,
            });
        }

        if std::mem::replace(&mut self.at_line_start, false) {
            if let Some(token) = self.lex_separator() {
                return Ok(token);
            }
            if let Some(token) = self.lex_option_marker() {
                return Ok(token);
            }
        }

        let token = match ch {
            '[' => self.lex_tag(),
            '0'..='9' => self.lex_number()?,
            c if c.is_alphanumeric() => self.lex_word(),
            c if is_punct(c) => self.single_char(TokenKind::Punct(c)),
            _ => {
                return Err(CompileError::lex(
                    format!("unexpected character '{}'", ch.escape_debug()),
                    line,
                    col,
                ));
            }
        };

        Ok(token)
    }

    fn peek(&self) -> char {
        self.chars[self.pos]
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.pos];
        self.pos += 1;
        if ch != '\n' {
            self.col += 1;
        }
        ch
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() {
            let ch = self.peek();
            if ch.is_whitespace() && ch != '\n' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn single_char(&mut self, kind: TokenKind) -> Token {
        let line = self.line;
        let col = self.col;
        let ch = self.advance();
        Token {
            kind,
            lexeme: ch.to_string(),
            line,
            col,
        }
    }

    /// `---` alone on its line.
    fn lex_separator(&mut self) -> Option<Token> {
        if (0..3).any(|i| self.peek_at(i) != Some('-')) {
            return None;
        }
        let mut i = 3;
        while let Some(c) = self.peek_at(i) {
            if c == '\n' {
                break;
            }
            if !c.is_whitespace() {
                return None;
            }
            i += 1;
        }

        let line = self.line;
        let col = self.col;
        for _ in 0..3 {
            self.advance();
        }
        Some(Token {
            kind: TokenKind::Separator,
            lexeme: "---".to_string(),
            line,
            col,
        })
    }

    /// `a.` through `z.` at the start of a line, followed by a blank.
    fn lex_option_marker(&mut self) -> Option<Token> {
        let letter = self.peek();
        if !letter.is_ascii_lowercase() || self.peek_at(1) != Some('.') {
            return None;
        }
        if self.peek_at(2).is_some_and(|c| !c.is_whitespace()) {
            return None;
        }

        let line = self.line;
        let col = self.col;
        self.advance();
        self.advance();
        Some(Token {
            kind: TokenKind::OptionMarker(letter),
            lexeme: format!("{letter}."),
            line,
            col,
        })
    }

    /// `[Word]` becomes a kind tag; any other `[` is plain punctuation.
    fn lex_tag(&mut self) -> Token {
        let mut i = 1;
        let mut word = String::new();
        while let Some(c) = self.peek_at(i) {
            if !c.is_alphabetic() {
                break;
            }
            word.push(c);
            i += 1;
        }

        if word.is_empty() || self.peek_at(i) != Some(']') {
            return self.single_char(TokenKind::Punct('['));
        }

        let line = self.line;
        let col = self.col;
        for _ in 0..=i {
            self.advance();
        }
        Token {
            lexeme: format!("[{word}]"),
            kind: TokenKind::Tag(word),
            line,
            col,
        }
    }

    fn lex_number(&mut self) -> Result<Token, CompileError> {
        let line = self.line;
        let col = self.col;
        let mut s = String::new();

        while !self.is_at_end() && self.peek().is_ascii_digit() {
            s.push(self.advance());
        }

        let is_float =
            !self.is_at_end() && self.peek() == '.' && self.peek_at(1).is_some_and(|c| c.is_ascii_digit());
        if is_float {
            s.push(self.advance()); // consume '.'
            while !self.is_at_end() && self.peek().is_ascii_digit() {
                s.push(self.advance());
            }
            let val: f64 = s
                .parse()
                .map_err(|_| CompileError::lex(format!("invalid number: {s}"), line, col))?;
            return Ok(Token {
                kind: TokenKind::Number(val),
                lexeme: s,
                line,
                col,
            });
        }

        // Digit runs past u64 are still valid text, just not a usable number.
        let kind = match s.parse::<u64>() {
            Ok(val) => TokenKind::Integer(val),
            Err(_) => TokenKind::Word(s.clone()),
        };
        Ok(Token {
            kind,
            lexeme: s,
            line,
            col,
        })
    }

    fn lex_word(&mut self) -> Token {
        let line = self.line;
        let col = self.col;
        let mut s = String::new();

        while !self.is_at_end() && (self.peek().is_alphanumeric() || self.peek() == '_') {
            s.push(self.advance());
        }

        if !self.is_at_end() && self.peek() == ':' {
            if let Some(field) = FieldName::from_word(&s) {
                s.push(self.advance());
                return Token {
                    kind: TokenKind::Field(field),
                    lexeme: s,
                    line,
                    col,
                };
            }
        }

        if let Some(number) = question_number(&s) {
            let sub_follows = !self.is_at_end()
                && self.peek() == '.'
                && self.peek_at(1).is_some_and(|c| c.is_ascii_digit());
            if sub_follows {
                s.push(self.advance()); // consume '.'
                let mut digits = String::new();
                while !self.is_at_end() && self.peek().is_ascii_digit() {
                    digits.push(self.advance());
                }
                s.push_str(&digits);
                if let Ok(sub) = digits.parse::<u32>() {
                    return Token {
                        kind: TokenKind::SubQuestionMarker(number, sub),
                        lexeme: s,
                        line,
                        col,
                    };
                }
                return Token {
                    kind: TokenKind::Word(s.clone()),
                    lexeme: s,
                    line,
                    col,
                };
            }
            return Token {
                kind: TokenKind::QuestionMarker(number),
                lexeme: s,
                line,
                col,
            };
        }

        let kind = match s.to_ascii_lowercase().as_str() {
            "mark" | "marks" => TokenKind::Marks,
            other => match Difficulty::from_word(other) {
                Some(level) => TokenKind::Level(level),
                None => TokenKind::Word(s.clone()),
            },
        };

        Token {
            kind,
            lexeme: s,
            line,
            col,
        }
    }
}

impl Iterator for Lexer {
    type Item = Result<Token, CompileError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        match &result {
            Ok(token) if token.kind == TokenKind::Eof => self.finished = true,
            Err(_) => self.finished = true,
            _ => {}
        }
        Some(result)
    }
}

/// `Q` followed only by digits.
fn question_number(word: &str) -> Option<u32> {
    let digits = word.strip_prefix('Q')?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn is_punct(c: char) -> bool {
    matches!(
        c,
        '.' | ','
            | ':'
            | ';'
            | '?'
            | '!'
            | '\''
            | '"'
            | '('
            | ')'
            | '['
            | ']'
            | '{'
            | '}'
            | '-'
            | '+'
            | '*'
            | '/'
            | '='
            | '<'
            | '>'
            | '|'
            | '&'
            | '%'
            | '^'
            | '_'
            | '~'
            | '#'
            | '$'
            | '\\'
            | '\u{2018}'
            | '\u{2019}'
            | '\u{201C}'
            | '\u{201D}'
            | '\u{2013}'
            | '\u{2014}'
            | '\u{2026}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::error::ErrorKind;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lex_header_fields() {
        let tokens = kinds("Exam: Compilers\nTotalMarks: 50");
        assert_eq!(tokens[0], TokenKind::Field(FieldName::Exam));
        assert_eq!(tokens[1], TokenKind::Word("Compilers".to_string()));
        assert_eq!(tokens[2], TokenKind::Newline);
        assert_eq!(tokens[3], TokenKind::Field(FieldName::TotalMarks));
        assert_eq!(tokens[4], TokenKind::Integer(50));
        assert_eq!(tokens[5], TokenKind::Eof);
    }

    #[test]
    fn field_name_requires_colon() {
        let tokens = kinds("Syllabus coverage");
        assert_eq!(tokens[0], TokenKind::Word("Syllabus".to_string()));
    }

    #[test]
    fn lex_question_header() {
        let tokens = kinds("Q3 [MCQ] (5 marks) Difficulty: Hard");
        assert_eq!(tokens[0], TokenKind::QuestionMarker(3));
        assert_eq!(tokens[1], TokenKind::Tag("MCQ".to_string()));
        assert_eq!(tokens[2], TokenKind::Punct('('));
        assert_eq!(tokens[3], TokenKind::Integer(5));
        assert_eq!(tokens[4], TokenKind::Marks);
        assert_eq!(tokens[5], TokenKind::Punct(')'));
        assert_eq!(tokens[6], TokenKind::Field(FieldName::Difficulty));
        assert_eq!(tokens[7], TokenKind::Level(Difficulty::Hard));
    }

    #[test]
    fn lex_subquestion_marker() {
        let tokens = kinds("Q2.1 [Short]");
        assert_eq!(tokens[0], TokenKind::SubQuestionMarker(2, 1));
        assert_eq!(tokens[1], TokenKind::Tag("Short".to_string()));
    }

    #[test]
    fn option_marker_only_at_line_start() {
        let tokens = kinds("a. Lexer\nin a. b");
        assert_eq!(tokens[0], TokenKind::OptionMarker('a'));
        assert_eq!(tokens[1], TokenKind::Word("Lexer".to_string()));
        assert_eq!(tokens[3], TokenKind::Word("in".to_string()));
        assert_eq!(tokens[4], TokenKind::Word("a".to_string()));
        assert_eq!(tokens[5], TokenKind::Punct('.'));
    }

    #[test]
    fn abbreviation_is_not_an_option() {
        let tokens = kinds("e.g. this");
        assert_eq!(tokens[0], TokenKind::Word("e".to_string()));
    }

    #[test]
    fn separator_must_stand_alone() {
        assert_eq!(kinds("---\n")[0], TokenKind::Separator);
        assert_eq!(kinds("  ---  ")[0], TokenKind::Separator);
        assert_eq!(kinds("--- x")[0], TokenKind::Punct('-'));
        assert_eq!(kinds("----")[0], TokenKind::Punct('-'));
    }

    #[test]
    fn bracket_without_word_is_punct() {
        let tokens = kinds("[a|b]");
        assert_eq!(tokens[0], TokenKind::Punct('['));
    }

    #[test]
    fn lex_decimal_number() {
        let tokens = kinds("1.5 hr");
        assert_eq!(tokens[0], TokenKind::Number(1.5));
        assert_eq!(tokens[1], TokenKind::Word("hr".to_string()));
    }

    #[test]
    fn sentence_final_period_stays_punct() {
        let tokens = kinds("in 1990.");
        assert_eq!(tokens[1], TokenKind::Integer(1990));
        assert_eq!(tokens[2], TokenKind::Punct('.'));
    }

    #[test]
    fn lex_line_and_column_tracking() {
        let tokens = Lexer::new("Exam: X\n  Q1 [Long]").tokenize().unwrap();
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[2].line, 1); // Newline
        assert_eq!(tokens[3].line, 2);
        assert_eq!(tokens[3].col, 3);
        assert_eq!(tokens[3].lexeme, "Q1");
    }

    #[test]
    fn lex_error_on_unexpected_char() {
        let err = Lexer::new("Exam: X\nQ1 @@@").tokenize().unwrap_err();
        assert_eq!(err.kind, ErrorKind::LexError);
        assert_eq!(err.line, 2);
        assert_eq!(err.col, 4);
        assert!(err.message.contains('@'));
    }

    #[test]
    fn iterator_stops_after_error() {
        let items: Vec<_> = Lexer::new("Exam: X @ more").collect();
        assert_eq!(items.len(), 3);
        assert!(items[0].is_ok());
        assert!(items[2].is_err());
    }

    #[test]
    fn lexing_restarts_from_scratch() {
        let src = "Q1 [Short] (2 marks)";
        let first = Lexer::new(src).tokenize().unwrap();
        let second = Lexer::new(src).tokenize().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn oversized_digit_run_is_a_word() {
        let tokens = kinds("Is 123456789012345678901234 divisible by 3?");
        assert_eq!(tokens[1], TokenKind::Word("123456789012345678901234".to_string()));
        assert_eq!(tokens[4], TokenKind::Integer(3));
    }

    #[test]
    fn lex_empty_input() {
        let tokens = kinds("");
        assert_eq!(tokens, vec![TokenKind::Eof]);
    }

    #[test]
    fn carriage_returns_are_insignificant() {
        let tokens = kinds("Exam: X\r\nQ1");
        assert_eq!(tokens[2], TokenKind::Newline);
        assert_eq!(tokens[3], TokenKind::QuestionMarker(1));
    }

    #[test]
    fn unicode_words_and_quotes() {
        let tokens = kinds("Résumé \u{201C}quoted\u{201D}");
        assert_eq!(tokens[0], TokenKind::Word("Résumé".to_string()));
        assert_eq!(tokens[1], TokenKind::Punct('\u{201C}'));
    }
}
