//! Script normalizer: body text in, one-line `javascript:` URI out.
//!
//! The JavaScript path scans the body with [`Lexer`], drops comments and
//! joins lines, inserting `;` wherever a line break would have ended the
//! statement. Other languages are stripped of their own comments and
//! translated to JavaScript first.

use std::fmt;

use super::coffee::{self, Translator};
use super::lexer::{Lexer, Token};
use crate::error::NormalizeError;

/// Prefix that turns a bookmark into an executable action.
pub const SCHEME: &str = "javascript:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    JavaScript,
    CoffeeScript,
}

impl Language {
    /// Look up a `LANG` tag (case-insensitive).
    pub fn lookup(tag: &str) -> Result<Self, NormalizeError> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "javascript" | "js" => Ok(Language::JavaScript),
            "coffeescript" | "coffee" => Ok(Language::CoffeeScript),
            _ => Err(NormalizeError::UnknownLanguage(tag.trim().to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::JavaScript => write!(f, "JavaScript"),
            Language::CoffeeScript => write!(f, "CoffeeScript"),
        }
    }
}

pub struct Normalizer<'a> {
    coffee: &'a dyn Translator,
}

impl<'a> Normalizer<'a> {
    pub fn new(coffee: &'a dyn Translator) -> Self {
        Self { coffee }
    }

    /// Single-line JavaScript for `body`, before URI encoding.
    pub fn script(&self, body: &str, language: Language) -> Result<String, NormalizeError> {
        match language {
            Language::JavaScript => minify(body),
            Language::CoffeeScript => {
                let stripped = coffee::strip_comments(body)?;
                let js = self.coffee.translate(&stripped)?;
                minify(&js)
            }
        }
    }

    /// Full bookmark URI for `body`.
    pub fn normalize(&self, body: &str, language: Language) -> Result<String, NormalizeError> {
        self.script(body, language).map(|script| encode(&script))
    }
}

/// Percent-encode `script` and prepend [`SCHEME`].
pub fn encode(script: &str) -> String {
    format!("{SCHEME}{}", urlencoding::encode(script))
}

/// Inverse of [`encode`]; `None` if `uri` is not a bookmarklet URI.
pub fn decode(uri: &str) -> Option<String> {
    let encoded = uri.strip_prefix(SCHEME)?;
    urlencoding::decode(encoded).ok().map(|s| s.into_owned())
}

/// Keywords that never end a statement at a line break.
const CONTINUES: &[&str] = &[
    "else", "do", "try", "finally", "typeof", "new", "void", "delete", "in", "of", "instanceof",
    "case", "var", "let", "const", "function", "class", "extends", "async", "await", "yield",
];

/// Keywords that never start a new statement after a line break.
const ATTACHES: &[&str] = &["catch", "finally", "in", "of", "instanceof"];

/// Keywords whose parenthesised head is followed by a statement or block, not `;`.
const HEADS: &[&str] = &["if", "for", "while", "with", "switch", "catch", "function"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Gap {
    None,
    Space,
    Newline,
}

/// Strip comments and collapse JavaScript onto one line.
pub fn minify(src: &str) -> Result<String, NormalizeError> {
    let tokens: Vec<Token> = Lexer::new(src).collect::<Result<_, _>>()?;

    let mut out = String::with_capacity(src.len());
    let mut gap = Gap::None;
    let mut last: Option<Token> = None;
    let mut before_last: Option<Token> = None;
    let mut parens: Vec<bool> = Vec::new();
    let mut closed_head = false;
    // Between `class` and the `{` of its body.
    let mut class_head = false;

    let mut tokens = tokens.into_iter().peekable();
    while let Some(tok) = tokens.next() {
        match tok {
            Token::Space | Token::Comment { multiline: false } => gap = gap.max(Gap::Space),
            Token::Newline | Token::Comment { multiline: true } => gap = Gap::Newline,
            tok => {
                if let Some(prev) = &last {
                    match gap {
                        Gap::Newline
                            if !class_head
                                && ends_statement(prev, closed_head, &out)
                                && starts_statement(prev, &tok, tokens.peek()) =>
                        {
                            out.push(';');
                        }
                        Gap::Newline if !hugs(prev, &tok) => out.push(' '),
                        Gap::Space => out.push(' '),
                        _ => {}
                    }
                }

                closed_head = false;
                match &tok {
                    Token::Punct('(') => {
                        let head = is_head(&last, &before_last)
                            || is_named_function(&last, &before_last);
                        parens.push(head);
                    }
                    Token::Punct(')') => closed_head = parens.pop().unwrap_or(false),
                    Token::Punct('{') => class_head = false,
                    Token::Word(w) if w == "class" && !matches!(last, Some(Token::Punct('.'))) => {
                        class_head = true
                    }
                    _ => {}
                }

                out.push_str(&tok.text());
                before_last = last.replace(tok);
                gap = Gap::None;
            }
        }
    }

    Ok(out)
}

/// `last` is a control keyword, not a property such as `promise.catch`.
fn is_head(last: &Option<Token>, before_last: &Option<Token>) -> bool {
    matches!(last, Some(Token::Word(w)) if HEADS.contains(&w.as_str()))
        && !matches!(before_last, Some(Token::Punct('.')))
}

fn is_named_function(last: &Option<Token>, before_last: &Option<Token>) -> bool {
    matches!(last, Some(Token::Word(_)))
        && matches!(before_last, Some(Token::Word(w)) if w == "function")
}

/// Could the token before a line break be the end of a statement?
fn ends_statement(prev: &Token, closed_head: bool, out: &str) -> bool {
    match prev {
        Token::Word(w) => !CONTINUES.contains(&w.as_str()),
        Token::Punct(')') => !closed_head,
        Token::Punct(']' | '}') => true,
        Token::Punct('+' | '-') => out.ends_with("++") || out.ends_with("--"),
        t => t.is_literal(),
    }
}

/// Would the token after a line break start a new statement?
///
/// `following` is the token right after `next`, used to tell a prefix
/// `++`/`--` from a binary operator.
fn starts_statement(prev: &Token, next: &Token, following: Option<&Token>) -> bool {
    match next {
        Token::Word(w) if w == "while" || w == "else" => !matches!(prev, Token::Punct('}')),
        Token::Word(w) => !ATTACHES.contains(&w.as_str()),
        Token::Str(_) => true,
        Token::Punct('!' | '~' | '{') => true,
        Token::Punct(c @ ('+' | '-')) => following == Some(&Token::Punct(*c)),
        _ => false,
    }
}

/// Tokens that can be joined across a line break without a space.
fn hugs(prev: &Token, next: &Token) -> bool {
    matches!(prev, Token::Punct('(' | '[' | '{' | '.' | ',' | ';'))
        || matches!(next, Token::Punct(')' | ']' | '}' | '.' | ',' | ';'))
}
