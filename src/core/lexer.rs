//! Tokenizer for the appliance configuration dialect
//!
//! The dialect is line oriented: every statement is one line whose first
//! token is a keyword (`config`, `edit`, `set`, `unset`, `append`, `next`,
//! `end`). Values are bare words or double-quoted strings, which may span
//! lines and un-escape `\"` and `\\`. A `#` at the start of a line begins a
//! comment running to the end of the line. A bare `#` word after a keyword is
//! an error rather than a silently dropped trailing comment.

use crate::core::error::{Error, Result};
use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq, Eq)]
enum Token<'s> {
    #[regex(r"[ \t\r\f]+")]
    Whitespace,

    #[token("\n")]
    Newline,

    #[regex(r"#[^\n]*", |lex| lex.slice(), allow_greedy = true)]
    Comment(&'s str),

    #[regex(r#""([^"\\]|\\[^\n]|\\\n)*""#, |lex| lex.slice())]
    Quoted(&'s str),

    #[regex(r##"[^ \t\r\f\n"#][^ \t\r\f\n"]*"##, |lex| lex.slice())]
    Word(&'s str),
}

/// Statement keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum Keyword {
    Config,
    Edit,
    Set,
    Unset,
    Append,
    Next,
    End,
}

/// One statement line after tokenization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Line {
    /// 1-based line where the statement starts
    pub number: usize,
    pub keyword: Keyword,
    pub args: Vec<String>,
}

/// Lexer output: statements and the comment lines between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Item {
    Line(Line),
    Comment { number: usize, text: String },
}

/// Removes the surrounding quotes and resolves `\"` and `\\`.
/// Any other backslash pair is kept as written.
pub(crate) fn unquote(raw: &str) -> String {
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(escaped @ ('"' | '\\')) => out.push(escaped),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }

    out
}

struct Pending {
    number: usize,
    first_quoted: bool,
    words: Vec<String>,
}

impl Pending {
    fn finish(self) -> Result<Line> {
        let mut words = self.words.into_iter();
        let Some(first) = words.next() else {
            return Err(Error::malformed(self.number, "empty statement"));
        };

        if self.first_quoted {
            return Err(Error::malformed(
                self.number,
                format!("statement must start with a keyword, found quoted \"{first}\""),
            ));
        }

        let keyword = first.parse::<Keyword>().map_err(|_| {
            Error::malformed(self.number, format!("unknown keyword `{first}`"))
        })?;

        Ok(Line {
            number: self.number,
            keyword,
            args: words.collect(),
        })
    }
}

/// Splits configuration text into statement lines.
///
/// # Errors
///
/// Returns [`Error::MalformedBlock`] for unterminated quotes, stray quote
/// characters, or lines that do not start with a known keyword.
pub(crate) fn tokenize(text: &str) -> Result<Vec<Item>> {
    let mut items = Vec::new();
    let mut lexer = Token::lexer(text);
    let mut line = 1usize;
    let mut pending: Option<Pending> = None;

    while let Some(token) = lexer.next() {
        let Ok(token) = token else {
            let near: String = lexer.slice().chars().take(24).collect();
            return Err(Error::malformed(
                line,
                format!("unterminated or stray quote near `{near}`"),
            ));
        };

        match token {
            Token::Whitespace => {}
            Token::Newline => {
                if let Some(p) = pending.take() {
                    items.push(Item::Line(p.finish()?));
                }
                line += 1;
            }
            Token::Comment(text) => {
                if pending.is_some() {
                    return Err(Error::malformed(
                        line,
                        format!("`{text}` inside a statement; quote values that start with `#`"),
                    ));
                }
                items.push(Item::Comment {
                    number: line,
                    text: text.to_string(),
                });
            }
            Token::Quoted(raw) => {
                let p = pending.get_or_insert_with(|| Pending {
                    number: line,
                    first_quoted: true,
                    words: Vec::new(),
                });
                p.words.push(unquote(raw));
                line += raw.matches('\n').count();
            }
            Token::Word(word) => {
                pending
                    .get_or_insert_with(|| Pending {
                        number: line,
                        first_quoted: false,
                        words: Vec::new(),
                    })
                    .words
                    .push(word.to_string());
            }
        }
    }

    if let Some(p) = pending.take() {
        items.push(Item::Line(p.finish()?));
    }

    Ok(items)
}
