//! Profile-driven lexical scanner.
//!
//! A single linear pass classifies every character of a source file as code,
//! comment, string, or whitespace, guided by the language profile's comment
//! and string delimiters. No grammar is involved; this is the accuracy/recall
//! trade-off that lets one scanner cover twenty-plus languages.
//!
//! Scanning is a pure function of (content, profile): re-scanning the same
//! input always yields the identical token sequence.

use crate::languages::LanguageProfile;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Code,
    Comment,
    Str,
    Whitespace,
}

/// One classified span of source text. Multi-line comments and strings are
/// split at newlines so every token carries a single line number (1-based).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub line: usize,
    pub kind: TokenKind,
}

#[derive(Clone, Copy)]
enum State {
    Code,
    LineComment,
    /// Inside a block construct that ends at `close`: a block comment or a
    /// multi-line string, distinguished by `kind`.
    Block {
        close: &'static str,
        kind: TokenKind,
    },
    /// Inside a single-line string literal opened by `delim`.
    Str {
        delim: char,
    },
}

/// What the in-progress code buffer currently holds, so word runs are kept
/// together while punctuation is emitted one token at a time.
#[derive(Clone, Copy, PartialEq)]
enum CodeRun {
    None,
    Word,
    Whitespace,
}

pub struct Scanner<'a> {
    profile: &'a LanguageProfile,
}

impl<'a> Scanner<'a> {
    pub fn new(profile: &'a LanguageProfile) -> Self {
        Self { profile }
    }

    pub fn scan(&self, content: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut state = State::Code;
        let mut buffer = String::new();
        let mut run = CodeRun::None;
        let mut line = 1usize;

        let bytes = content.as_bytes();
        let mut i = 0usize;

        while i < bytes.len() {
            let rest = &content[i..];
            let c = rest.chars().next().unwrap_or('\0');

            if c == '\n' {
                self.flush(&mut tokens, &mut buffer, line, state, run);
                run = CodeRun::None;
                match state {
                    // Line comments and single-line strings never cross a
                    // newline; block constructs continue on the next line.
                    State::LineComment | State::Str { .. } => state = State::Code,
                    State::Code | State::Block { .. } => {}
                }
                line += 1;
                i += 1;
                continue;
            }

            match state {
                State::Code => {
                    if let Some((open, close, kind)) = self.block_opener(rest) {
                        self.flush(&mut tokens, &mut buffer, line, state, run);
                        run = CodeRun::None;
                        buffer.push_str(open);
                        state = State::Block { close, kind };
                        i += open.len();
                        continue;
                    }
                    if let Some(open) = self.line_comment_opener(rest) {
                        self.flush(&mut tokens, &mut buffer, line, state, run);
                        run = CodeRun::None;
                        buffer.push_str(open);
                        state = State::LineComment;
                        i += open.len();
                        continue;
                    }
                    if self.profile.string_delimiters.contains(&c) {
                        self.flush(&mut tokens, &mut buffer, line, state, run);
                        run = CodeRun::None;
                        buffer.push(c);
                        state = State::Str { delim: c };
                        i += c.len_utf8();
                        continue;
                    }
                    if c.is_whitespace() {
                        if run != CodeRun::Whitespace {
                            self.flush(&mut tokens, &mut buffer, line, state, run);
                            run = CodeRun::Whitespace;
                        }
                        buffer.push(c);
                        i += c.len_utf8();
                        continue;
                    }
                    if c.is_alphanumeric() || c == '_' {
                        if run != CodeRun::Word {
                            self.flush(&mut tokens, &mut buffer, line, state, run);
                            run = CodeRun::Word;
                        }
                        buffer.push(c);
                        i += c.len_utf8();
                        continue;
                    }
                    // Punctuation: keep && and || whole, everything else is
                    // a single-character token.
                    self.flush(&mut tokens, &mut buffer, line, state, run);
                    run = CodeRun::None;
                    if rest.starts_with("&&") || rest.starts_with("||") {
                        tokens.push(Token {
                            text: rest[..2].to_string(),
                            line,
                            kind: TokenKind::Code,
                        });
                        i += 2;
                    } else {
                        tokens.push(Token {
                            text: c.to_string(),
                            line,
                            kind: TokenKind::Code,
                        });
                        i += c.len_utf8();
                    }
                }
                State::LineComment => {
                    buffer.push(c);
                    i += c.len_utf8();
                }
                State::Block { close, kind } => {
                    // Multi-line strings honor the escape character the same
                    // way single-line strings do; block comments do not.
                    if kind == TokenKind::Str && Some(c) == self.profile.escape_char {
                        buffer.push(c);
                        i += c.len_utf8();
                        if let Some(next) = content[i..].chars().next() {
                            if next != '\n' {
                                buffer.push(next);
                                i += next.len_utf8();
                            }
                        }
                    } else if rest.starts_with(close) {
                        buffer.push_str(close);
                        push_token(&mut tokens, &mut buffer, line, kind);
                        state = State::Code;
                        i += close.len();
                    } else {
                        buffer.push(c);
                        i += c.len_utf8();
                    }
                }
                State::Str { delim } => {
                    if Some(c) == self.profile.escape_char {
                        buffer.push(c);
                        i += c.len_utf8();
                        // The escaped character loses any delimiter effect.
                        if let Some(next) = content[i..].chars().next() {
                            if next != '\n' {
                                buffer.push(next);
                                i += next.len_utf8();
                            }
                        }
                    } else if c == delim {
                        buffer.push(c);
                        push_token(&mut tokens, &mut buffer, line, TokenKind::Str);
                        state = State::Code;
                        i += c.len_utf8();
                    } else {
                        buffer.push(c);
                        i += c.len_utf8();
                    }
                }
            }
        }

        self.flush(&mut tokens, &mut buffer, line, state, run);
        tokens
    }

    fn flush(
        &self,
        tokens: &mut Vec<Token>,
        buffer: &mut String,
        line: usize,
        state: State,
        run: CodeRun,
    ) {
        if buffer.is_empty() {
            return;
        }
        let kind = match state {
            State::Code => match run {
                CodeRun::Whitespace => TokenKind::Whitespace,
                _ => TokenKind::Code,
            },
            State::LineComment => TokenKind::Comment,
            State::Block { kind, .. } => kind,
            State::Str { .. } => TokenKind::Str,
        };
        push_token(tokens, buffer, line, kind);
    }

    fn block_opener(&self, rest: &str) -> Option<(&'static str, &'static str, TokenKind)> {
        for (open, close) in self.profile.multiline_strings {
            if rest.starts_with(open) {
                return Some((open, close, TokenKind::Str));
            }
        }
        // Block comments are checked before line comments by the caller's
        // dispatch order so that Lua's `--[[` wins over `--`.
        for (open, close) in self.profile.block_comments {
            if rest.starts_with(open) {
                return Some((open, close, TokenKind::Comment));
            }
        }
        None
    }

    fn line_comment_opener(&self, rest: &str) -> Option<&'static str> {
        self.profile
            .line_comments
            .iter()
            .find(|open| rest.starts_with(**open))
            .copied()
    }
}

fn push_token(tokens: &mut Vec<Token>, buffer: &mut String, line: usize, kind: TokenKind) {
    if !buffer.is_empty() {
        tokens.push(Token {
            text: std::mem::take(buffer),
            line,
            kind,
        });
    }
}

/// Convenience wrapper for the common one-shot case.
pub fn scan(content: &str, profile: &LanguageProfile) -> Vec<Token> {
    Scanner::new(profile).scan(content)
}
