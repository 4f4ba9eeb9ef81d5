//! Small hand-written scanner for bookmarklet JavaScript.
//!
//! It does not parse. It only needs to know where literals and comments
//! begin and end, so that comment stripping and line joining never touch the
//! inside of a string, template or regular expression.
//
//  Lexical items:
//
//      Word      ::= [A-Za-z0-9_$]+        (identifiers, keywords, numbers)
//      Str       ::= '…' | "…"             (raw line breaks are dropped)
//      Template  ::= `…${ expr }…`         (kept verbatim, line breaks too)
//      Regex     ::= /…/flags              (only where an operand may start)
//      Comment   ::= //… | /*…*/
//      Punct     ::= any other single character

use std::iter::Peekable;
use std::str::Chars;

use crate::error::NormalizeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(String),
    Punct(char),
    Str(String),
    Template(String),
    Regex(String),
    Comment { multiline: bool },
    Space,
    Newline,
}

impl Token {
    /// Source text of a significant token; empty for trivia.
    pub fn text(&self) -> String {
        match self {
            Token::Word(s) | Token::Str(s) | Token::Template(s) | Token::Regex(s) => s.clone(),
            Token::Punct(c) => c.to_string(),
            Token::Comment { .. } | Token::Space | Token::Newline => String::new(),
        }
    }

    pub fn is_trivia(&self) -> bool {
        matches!(self, Token::Comment { .. } | Token::Space | Token::Newline)
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Token::Str(_) | Token::Template(_) | Token::Regex(_))
    }
}

/// Keywords after which a `/` starts a regular expression, not a division.
const REGEX_AFTER: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case", "do",
    "else", "yield", "await",
];

#[derive(Clone)]
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    /// Whether the last significant token can end an operand.
    after_operand: bool,
    /// A `+` or `-` directly before the current token, and whether an
    /// operand preceded it. Two in a row after an operand are a postfix
    /// increment or decrement.
    sign: Option<(char, bool)>,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            chars: src.chars().peekable(),
            line: 1,
            after_operand: false,
            sign: None,
        }
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn consume_while<F: Fn(char) -> bool>(&mut self, pred: F, buf: &mut String) {
        while let Some(c) = self.peek_char() {
            if pred(c) {
                buf.push(c);
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn read_word(&mut self, first: char) -> String {
        let mut word = String::new();
        word.push(first);
        self.consume_while(is_word_char, &mut word);
        word
    }

    /// Reads a quoted string whose opening quote is already consumed.
    ///
    /// A raw line break inside the quotes is dropped, as is an escaped one
    /// (a line continuation), so the literal always fits on one line.
    fn read_string(&mut self, quote: char, buf: &mut String) -> Result<(), NormalizeError> {
        let start = self.line;
        buf.push(quote);
        while let Some(c) = self.next_char() {
            match c {
                '\\' => match self.next_char() {
                    Some('\n') => {}
                    Some('\r') => {
                        if self.peek_char() == Some('\n') {
                            self.next_char();
                        }
                    }
                    Some(escaped) => {
                        buf.push('\\');
                        buf.push(escaped);
                    }
                    None => break,
                },
                '\n' | '\r' => {}
                c if c == quote => {
                    buf.push(c);
                    return Ok(());
                }
                c => buf.push(c),
            }
        }
        Err(NormalizeError::Unterminated {
            what: "string literal",
            line: start,
        })
    }

    /// Reads a template literal whose opening backtick is already consumed.
    fn read_template(&mut self, buf: &mut String) -> Result<(), NormalizeError> {
        let start = self.line;
        buf.push('`');
        while let Some(c) = self.next_char() {
            buf.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = self.next_char() {
                        buf.push(escaped);
                    }
                }
                '`' => return Ok(()),
                '$' if self.peek_char() == Some('{') => {
                    self.next_char();
                    buf.push('{');
                    self.read_interpolation(buf)?;
                }
                _ => {}
            }
        }
        Err(NormalizeError::Unterminated {
            what: "template literal",
            line: start,
        })
    }

    /// Copies a `${ … }` expression up to and including its closing brace.
    fn read_interpolation(&mut self, buf: &mut String) -> Result<(), NormalizeError> {
        let start = self.line;
        let mut depth = 0usize;
        while let Some(c) = self.next_char() {
            match c {
                '\'' | '"' => self.read_string(c, buf)?,
                '`' => self.read_template(buf)?,
                '{' => {
                    depth += 1;
                    buf.push(c);
                }
                '}' => {
                    buf.push(c);
                    if depth == 0 {
                        return Ok(());
                    }
                    depth -= 1;
                }
                c => buf.push(c),
            }
        }
        Err(NormalizeError::Unterminated {
            what: "template expression",
            line: start,
        })
    }

    /// Reads a regular expression whose opening slash is already consumed.
    fn read_regex(&mut self) -> Result<String, NormalizeError> {
        let start = self.line;
        let mut buf = String::from("/");
        let mut in_class = false;
        while let Some(c) = self.next_char() {
            match c {
                '\n' | '\r' => break,
                '\\' => {
                    buf.push(c);
                    match self.next_char() {
                        Some('\n') | None => break,
                        Some(escaped) => buf.push(escaped),
                    }
                }
                '[' => {
                    in_class = true;
                    buf.push(c);
                }
                ']' => {
                    in_class = false;
                    buf.push(c);
                }
                '/' if !in_class => {
                    buf.push(c);
                    self.consume_while(is_word_char, &mut buf);
                    return Ok(buf);
                }
                c => buf.push(c),
            }
        }
        Err(NormalizeError::Unterminated {
            what: "regular expression",
            line: start,
        })
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            self.next_char();
        }
    }

    fn skip_block_comment(&mut self) -> Result<bool, NormalizeError> {
        let start = self.line;
        let mut multiline = false;
        while let Some(c) = self.next_char() {
            match c {
                '\n' => multiline = true,
                '*' if self.peek_char() == Some('/') => {
                    self.next_char();
                    return Ok(multiline);
                }
                _ => {}
            }
        }
        Err(NormalizeError::Unterminated {
            what: "block comment",
            line: start,
        })
    }

    fn slash(&mut self) -> Result<Token, NormalizeError> {
        match self.peek_char() {
            Some('/') => {
                self.skip_line_comment();
                Ok(Token::Comment { multiline: false })
            }
            Some('*') => {
                self.next_char();
                let multiline = self.skip_block_comment()?;
                Ok(Token::Comment { multiline })
            }
            _ if !self.after_operand => self.read_regex().map(Token::Regex),
            _ => Ok(Token::Punct('/')),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, NormalizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let ch = self.next_char()?;

        let tok_res = match ch {
            '\n' => Ok(Token::Newline),
            c if c.is_whitespace() => {
                while self.peek_char().is_some_and(|c| c != '\n' && c.is_whitespace()) {
                    self.next_char();
                }
                Ok(Token::Space)
            }
            '\'' | '"' => {
                let mut buf = String::new();
                self.read_string(ch, &mut buf).map(|_| Token::Str(buf))
            }
            '`' => {
                let mut buf = String::new();
                self.read_template(&mut buf).map(|_| Token::Template(buf))
            }
            '/' => self.slash(),
            c if is_word_char(c) => Ok(Token::Word(self.read_word(c))),
            c => Ok(Token::Punct(c)),
        };

        if let Ok(tok) = &tok_res {
            if !tok.is_trivia() {
                let sign = self.sign.take();
                self.after_operand = match tok {
                    Token::Word(w) => !REGEX_AFTER.contains(&w.as_str()),
                    Token::Punct(c @ ('+' | '-')) => match sign {
                        Some((prev, true)) if prev == *c => true,
                        _ => {
                            self.sign = Some((*c, self.after_operand));
                            false
                        }
                    },
                    Token::Punct(c) => matches!(c, ')' | ']' | '}'),
                    _ => true,
                };
            } else {
                self.sign = None;
            }
        }

        Some(tok_res)
    }
}
