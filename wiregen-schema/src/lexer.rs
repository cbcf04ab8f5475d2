//! Character-level tokenizer for the schema grammar.
//!
//! Produces flat [`Token`]s with line, column, and byte offset; the list
//! always ends with an end-of-input marker (a token with empty text).

use miette::SourceSpan;

use crate::error::{Result, SchemaSource};

/// One lexed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Token {
    /// Whether this is the end-of-input marker.
    pub fn is_eof(&self) -> bool {
        self.text.is_empty()
    }

    /// Span of this token in the source, for diagnostics.
    pub fn span(&self) -> SourceSpan {
        if self.is_eof() {
            (self.offset.saturating_sub(1), 1).into()
        } else {
            (self.offset, self.text.len()).into()
        }
    }
}

// ':' appears only inside aggregate option values, which the parser skips.
const SYMBOLS: &[char] = &['=', ';', '{', '}', '(', ')', '[', ']', '<', '>', ',', '.', ':'];

/// Tokenize schema source text.
pub fn tokenize(src: &str, source: &SchemaSource) -> Result<Vec<Token>> {
    Lexer {
        source,
        chars: src.char_indices().collect(),
        index: 0,
        line: 1,
        column: 1,
    }
    .run(src.len())
}

struct Lexer<'a> {
    source: &'a SchemaSource,
    chars: Vec<(usize, char)>,
    index: usize,
    line: usize,
    column: usize,
}

impl Lexer<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).map(|&(_, c)| c)
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.index + 1).map(|&(_, c)| c)
    }

    fn bump(&mut self) -> Option<char> {
        let &(_, c) = self.chars.get(self.index)?;
        self.index += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn run(mut self, src_len: usize) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
                continue;
            }
            if c == '/' {
                self.comment()?;
                continue;
            }

            let (line, column) = (self.line, self.column);
            let offset = self.chars[self.index].0;
            let text = if is_ident_start(c) {
                self.ident()
            } else if c.is_ascii_digit()
                || (c == '-' && self.peek_next().is_some_and(|next| next.is_ascii_digit()))
            {
                self.number()
            } else if c == '"' {
                self.string(offset)?
            } else if SYMBOLS.contains(&c) {
                self.bump();
                c.to_string()
            } else {
                return Err(self.source.syntax_error(
                    format!("unexpected character '{c}'"),
                    Some((offset, c.len_utf8()).into()),
                ));
            };
            tokens.push(Token {
                text,
                line,
                column,
                offset,
            });
        }

        // End-of-input marker
        tokens.push(Token {
            text: String::new(),
            line: self.line,
            column: self.column,
            offset: src_len,
        });
        Ok(tokens)
    }

    fn ident(&mut self) -> String {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        text
    }

    /// Numeric lexemes are collected permissively (hex digits, a decimal
    /// point); the parser validates the ones it actually interprets.
    fn number(&mut self) -> String {
        let mut text = String::new();
        if self.peek() == Some('-') {
            text.push('-');
            self.bump();
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '.' {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        text
    }

    /// String literal, returned with its surrounding quotes.
    fn string(&mut self, start: usize) -> Result<String> {
        let mut text = String::from('"');
        self.bump();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(self
                        .source
                        .syntax_error("unterminated string literal", Some((start, 1).into())));
                }
                Some('\\') => {
                    text.push('\\');
                    self.bump();
                    match self.peek() {
                        Some(escaped) => {
                            text.push(escaped);
                            self.bump();
                        }
                        None => {
                            return Err(self.source.syntax_error(
                                "unterminated string literal",
                                Some((start, 1).into()),
                            ));
                        }
                    }
                }
                Some('"') => {
                    text.push('"');
                    self.bump();
                    return Ok(text);
                }
                Some(c) => {
                    text.push(c);
                    self.bump();
                }
            }
        }
    }

    fn comment(&mut self) -> Result<()> {
        let offset = self.chars[self.index].0;
        match self.peek_next() {
            Some('/') => {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
                Ok(())
            }
            Some('*') => {
                self.bump();
                self.bump();
                loop {
                    match self.peek() {
                        None => {
                            return Err(self.source.syntax_error(
                                "unterminated block comment",
                                Some((offset, 2).into()),
                            ));
                        }
                        Some('*') if self.peek_next() == Some('/') => {
                            self.bump();
                            self.bump();
                            return Ok(());
                        }
                        Some(_) => {
                            self.bump();
                        }
                    }
                }
            }
            _ => Err(self
                .source
                .syntax_error("unexpected character '/'", Some((offset, 1).into()))),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}
