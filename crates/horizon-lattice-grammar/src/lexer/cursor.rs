//! The token cursor.

use std::fmt::Write as _;
use std::sync::Arc;

use super::symbols::SymbolTrie;
use super::token::{classify, is_identifier_continue, CharClass, TokenKind};
use crate::error::{Error, Result};

/// Position and classification of the current token.
///
/// `line` and `column` are 0-based; errors report them 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Token classification.
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub offset: usize,
    /// Length in bytes. Zero at end of input.
    pub len: usize,
    /// Line of the first character.
    pub line: u32,
    /// Column of the first character, in characters.
    pub column: u32,
}

/// Behaviour switches for a [`Lexer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerFlags {
    /// Skip whitespace and newline tokens.
    pub ignore_whitespace: bool,
    /// Treat quote characters as symbols instead of starting strings.
    pub strings_as_symbols: bool,
    /// Emit at most one character per token.
    pub single_character: bool,
    /// Skip `/* ... */` comments between tokens.
    pub skip_comments: bool,
}

impl Default for LexerFlags {
    fn default() -> Self {
        Self {
            ignore_whitespace: true,
            strings_as_symbols: false,
            single_character: false,
            skip_comments: false,
        }
    }
}

/// A cursor over classified tokens of a borrowed source string.
///
/// Cloning is cheap and produces an independent snapshot, which is how
/// parsers backtrack: clone, try, then [`sync`](Lexer::sync) on success or
/// drop the clone on failure.
///
/// # Example
///
/// ```
/// use horizon_lattice_grammar::lexer::{Lexer, TokenKind};
///
/// let mut lexer = Lexer::new("12px solid");
/// assert_eq!(lexer.kind(), TokenKind::Number);
/// assert_eq!(lexer.next().text(), "px");
/// assert_eq!(lexer.next().text(), "solid");
/// assert!(lexer.next().is_end());
/// ```
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    token: Token,
    end: usize,
    flags: LexerFlags,
    symbols: Option<Arc<SymbolTrie>>,
}

/// Create a lexer positioned at the first token of `source`.
pub fn tokenize(source: &str, include_whitespace: bool) -> Lexer<'_> {
    Lexer::with_flags(
        source,
        LexerFlags {
            ignore_whitespace: !include_whitespace,
            ..LexerFlags::default()
        },
    )
}

impl<'a> Lexer<'a> {
    /// Create a lexer with default flags, positioned at the first token.
    pub fn new(source: &'a str) -> Self {
        Self::with_flags(source, LexerFlags::default())
    }

    /// Create a lexer with explicit flags, positioned at the first token.
    pub fn with_flags(source: &'a str, flags: LexerFlags) -> Self {
        let mut lexer = Self {
            source,
            token: Self::start_token(),
            end: source.len(),
            flags,
            symbols: None,
        };
        lexer.next();
        lexer
    }

    fn start_token() -> Token {
        Token {
            kind: TokenKind::Symbol,
            offset: 0,
            len: 0,
            line: 0,
            column: 0,
        }
    }

    /// Rewind to the first token, keeping flags, symbols and fence.
    pub fn reset(&mut self) -> &mut Self {
        self.token = Self::start_token();
        self.next()
    }

    /// Advance to the next token.
    pub fn next(&mut self) -> &mut Self {
        let source = self.source;
        let bytes = source.as_bytes();
        let mut offset = self.token.offset + self.token.len;
        let (mut line, mut column) = if self.token.kind == TokenKind::NewLine {
            (self.token.line + 1, 0)
        } else {
            (
                self.token.line,
                self.token.column + self.text().chars().count() as u32,
            )
        };

        loop {
            if offset >= self.end {
                self.token = Token {
                    kind: TokenKind::End,
                    offset: self.end,
                    len: 0,
                    line,
                    column,
                };
                return self;
            }

            if let Some(symbols) = &self.symbols {
                let mut start = offset;
                if self.flags.ignore_whitespace {
                    while start < self.end && bytes[start] == b' ' {
                        start += 1;
                    }
                }
                if let Some(len) = symbols.longest_match(&self.source[start..self.end]) {
                    self.token = Token {
                        kind: TokenKind::Symbol,
                        offset: start,
                        len,
                        line,
                        column: column + (start - offset) as u32,
                    };
                    return self;
                }
            }

            let byte = bytes[offset];

            if self.flags.skip_comments && byte == b'/' && bytes.get(offset + 1) == Some(&b'*') {
                let body = &self.source[offset + 2..self.end];
                match body.find("*/") {
                    Some(close) => {
                        let skipped = &self.source[offset..offset + 2 + close + 2];
                        advance_position(skipped, &mut line, &mut column);
                        offset += skipped.len();
                        continue;
                    }
                    None => {
                        self.token = Token {
                            kind: TokenKind::Unterminated,
                            offset,
                            len: self.end - offset,
                            line,
                            column,
                        };
                        return self;
                    }
                }
            }

            let (kind, mut len) = match classify(byte) {
                CharClass::Number => (TokenKind::Number, self.scan_number(offset)),
                CharClass::Identifier => (TokenKind::Identifier, self.scan_identifier(offset)),
                CharClass::Quote if self.flags.strings_as_symbols => (TokenKind::Symbol, 1),
                CharClass::Quote => self.scan_string(offset),
                CharClass::Space => (TokenKind::Whitespace, self.scan_run(offset, b' ')),
                CharClass::Tab => (TokenKind::Whitespace, self.scan_run(offset, b'\t')),
                CharClass::CarriageReturn => {
                    if offset + 1 < self.end && bytes[offset + 1] == b'\n' {
                        (TokenKind::NewLine, 2)
                    } else {
                        (TokenKind::NewLine, 1)
                    }
                }
                CharClass::LineFeed => (TokenKind::NewLine, 1),
                CharClass::Operator => (TokenKind::Operator, 1),
                CharClass::OpenBracket => (TokenKind::OpenBracket, 1),
                CharClass::CloseBracket => (TokenKind::CloseBracket, 1),
                CharClass::Escape => (TokenKind::Escape, 1),
                CharClass::Symbol => {
                    if byte == b'.' && offset + 1 < self.end && bytes[offset + 1].is_ascii_digit() {
                        (TokenKind::Number, self.scan_number(offset))
                    } else {
                        let width = self.source[offset..]
                            .chars()
                            .next()
                            .map_or(1, char::len_utf8);
                        (TokenKind::Symbol, width)
                    }
                }
            };

            if self.flags.single_character {
                let width = self.source[offset..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                if kind != TokenKind::NewLine {
                    len = len.min(width);
                }
            }

            if self.flags.ignore_whitespace {
                match kind {
                    TokenKind::Whitespace | TokenKind::NewLine => {
                        if offset + len >= self.end {
                            // trailing whitespace shortens the input
                            let floor = self.token.offset + self.token.len;
                            self.end = self.source[..offset].trim_end().len().max(floor);
                            continue;
                        }
                        if kind == TokenKind::NewLine {
                            line += 1;
                            column = 0;
                        } else {
                            column += len as u32;
                        }
                        offset += len;
                        continue;
                    }
                    _ => {}
                }
            }

            self.token = Token {
                kind,
                offset,
                len,
                line,
                column,
            };
            return self;
        }
    }

    fn scan_run(&self, offset: usize, byte: u8) -> usize {
        self.source.as_bytes()[offset..self.end]
            .iter()
            .take_while(|b| **b == byte)
            .count()
    }

    fn scan_identifier(&self, offset: usize) -> usize {
        self.source.as_bytes()[offset..self.end]
            .iter()
            .take_while(|b| is_identifier_continue(**b))
            .count()
    }

    fn scan_number(&self, offset: usize) -> usize {
        let bytes = &self.source.as_bytes()[..self.end];
        let mut i = offset;
        let mut seen_dot = false;
        while i < bytes.len() {
            match bytes[i] {
                b'0'..=b'9' => i += 1,
                b'.' if !seen_dot && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) => {
                    seen_dot = true;
                    i += 1;
                }
                _ => break,
            }
        }
        if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
            let mut j = i + 1;
            if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
                j += 1;
            }
            if bytes.get(j).is_some_and(u8::is_ascii_digit) {
                i = j + self.scan_number(j);
            }
        }
        i - offset
    }

    fn scan_string(&self, offset: usize) -> (TokenKind, usize) {
        let bytes = &self.source.as_bytes()[..self.end];
        let quote = bytes[offset];
        let mut i = offset + 1;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 2,
                b if b == quote => return (TokenKind::String, i + 1 - offset),
                _ => i += 1,
            }
        }
        (TokenKind::Unterminated, self.end - offset)
    }

    /// Jump to `target` (a byte offset at or after the current token) and
    /// scan the token found there.
    pub(crate) fn seek(&mut self, target: usize) -> &mut Self {
        let target = target.min(self.end).max(self.token.offset);
        let mut line = self.token.line;
        let mut column = self.token.column;
        if self.token.kind == TokenKind::NewLine && target > self.token.offset {
            line += 1;
            column = 0;
            advance_position(
                &self.source[self.token.offset + self.token.len..target],
                &mut line,
                &mut column,
            );
        } else {
            advance_position(&self.source[self.token.offset..target], &mut line, &mut column);
        }
        self.token = Token {
            kind: TokenKind::Symbol,
            offset: target,
            len: 0,
            line,
            column,
        };
        self.next()
    }

    /// Register a custom multi-character symbol.
    pub fn add_symbol(&mut self, symbol: &str) -> &mut Self {
        let trie = self.symbols.get_or_insert_with(Default::default);
        Arc::make_mut(trie).insert(symbol);
        self
    }

    /// A copy advanced one token past this one.
    pub fn peek(&self) -> Lexer<'a> {
        let mut peek = self.clone();
        peek.next();
        peek
    }

    /// Independent snapshot of this lexer.
    pub fn copy(&self) -> Lexer<'a> {
        self.clone()
    }

    /// Whether `other` reads the same source text.
    pub fn same_source(&self, other: &Lexer<'_>) -> bool {
        std::ptr::eq(self.source, other.source) || self.source == other.source
    }

    /// Adopt the position and flags of `other`, which must read the same source.
    pub fn sync(&mut self, other: &Lexer<'a>) -> &mut Self {
        debug_assert!(self.same_source(other), "sync across different sources");
        self.token = other.token;
        self.flags = other.flags;
        self
    }

    /// Restrict the end of input to the current offset of `marker`.
    pub fn fence(&mut self, marker: &Lexer<'a>) -> &mut Self {
        if self.same_source(marker) {
            self.end = marker.token.offset.min(self.source.len());
            if self.token.offset >= self.end {
                self.token.kind = TokenKind::End;
                self.token.offset = self.end;
                self.token.len = 0;
            }
        }
        self
    }

    /// Copy of this lexer with surrounding whitespace excluded.
    pub fn trim(&self) -> Lexer<'a> {
        let mut trimmed = self.clone();
        let tail = self.source[..self.end].trim_end().len();
        trimmed.end = tail.max(self.token.offset);
        if trimmed.token.kind == TokenKind::Whitespace || trimmed.token.kind == TokenKind::NewLine {
            let flags = trimmed.flags;
            trimmed.flags.ignore_whitespace = true;
            trimmed.token.len = 0;
            trimmed.token.kind = TokenKind::Symbol;
            trimmed.next();
            trimmed.flags = flags;
        }
        trimmed
    }

    /// Consume the current token if its text is `text`.
    pub fn assert(&mut self, text: &str) -> Result<&mut Self> {
        if !self.is_end() && self.text() == text {
            Ok(self.next())
        } else {
            Err(self.error(format!("Expected `{}`, found {}", text, self.describe())))
        }
    }

    /// Consume the current token if it starts with `ch`.
    pub fn assert_character(&mut self, ch: char) -> Result<&mut Self> {
        if self.ch() == Some(ch) {
            Ok(self.next())
        } else {
            Err(self.error(format!("Expected `{}`, found {}", ch, self.describe())))
        }
    }

    /// Skip a `/* */` or `//` comment at the current position.
    ///
    /// Returns `false` when the current token does not start a comment.
    pub fn comment(&mut self) -> Result<bool> {
        if self.ch() != Some('/') {
            return Ok(false);
        }
        let start = self.token.offset;
        let rest = &self.source[start..self.end];
        if rest.starts_with("/*") {
            match rest[2..].find("*/") {
                Some(close) => {
                    self.seek(start + 2 + close + 2);
                    Ok(true)
                }
                None => Err(self.lex_error("Unterminated comment")),
            }
        } else if rest.starts_with("//") {
            let stop = rest.find('\n').map_or(self.end, |n| start + n);
            self.seek(stop);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Fail with a lexical error if the current token is unterminated.
    pub fn ensure_valid(&self) -> Result<()> {
        if self.token.kind != TokenKind::Unterminated {
            return Ok(());
        }
        if self.text().starts_with("/*") {
            Err(self.lex_error("Unterminated comment"))
        } else {
            Err(self.lex_error("Unterminated string"))
        }
    }

    /// Source text between `start` and this lexer's current offset.
    pub fn slice(&self, start: &Lexer<'a>) -> &'a str {
        let from = start.token.offset;
        let to = self.token.offset.min(self.source.len());
        if to <= from {
            return "";
        }
        self.source.get(from..to).unwrap_or("")
    }

    /// Text from the current token to the end of input.
    pub fn remaining(&self) -> &'a str {
        self.source.get(self.token.offset..self.end).unwrap_or("")
    }

    /// Text of the current token.
    pub fn text(&self) -> &'a str {
        self.source
            .get(self.token.offset..self.token.offset + self.token.len)
            .unwrap_or("")
    }

    /// First character of the current token.
    pub fn ch(&self) -> Option<char> {
        self.text().chars().next()
    }

    /// Classification of the current token.
    pub fn kind(&self) -> TokenKind {
        self.token.kind
    }

    /// The current token.
    pub fn token(&self) -> Token {
        self.token
    }

    /// Byte offset of the current token.
    pub fn offset(&self) -> usize {
        self.token.offset
    }

    /// Byte offset just past the current token.
    pub fn token_end(&self) -> usize {
        self.token.offset + self.token.len
    }

    /// 0-based line of the current token.
    pub fn line(&self) -> u32 {
        self.token.line
    }

    /// 0-based column of the current token.
    pub fn column(&self) -> u32 {
        self.token.column
    }

    /// Whether the cursor is past the last token.
    pub fn is_end(&self) -> bool {
        self.token.kind == TokenKind::End || self.token.offset >= self.end
    }

    /// Effective end of input in bytes.
    pub fn end(&self) -> usize {
        self.end
    }

    /// The whole source string.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Current flags.
    pub fn flags(&self) -> LexerFlags {
        self.flags
    }

    /// Replace the flags. Takes effect from the next scanned token.
    pub fn set_flags(&mut self, flags: LexerFlags) -> &mut Self {
        self.flags = flags;
        self
    }

    /// Whether the current token begins right where `previous` ended.
    pub fn is_adjacent_to(&self, previous: &Lexer<'a>) -> bool {
        self.token.offset == previous.token_end()
    }

    fn describe(&self) -> String {
        if self.is_end() {
            "end of input".to_string()
        } else {
            format!("`{}`", self.text())
        }
    }

    /// A positioned syntax error at the current token.
    pub fn error(&self, message: impl Into<String>) -> Error {
        Error::syntax(
            message,
            self.token.line + 1,
            self.token.column + 1,
            self.excerpt(),
        )
    }

    fn lex_error(&self, message: &str) -> Error {
        Error::lex(message, self.token.line + 1, self.token.column + 1)
    }

    /// The current source line with a caret under the current column.
    pub fn excerpt(&self) -> String {
        let offset = self.token.offset.min(self.source.len());
        let line_start = self.source[..offset].rfind('\n').map_or(0, |n| n + 1);
        let line_end = self.source[offset..]
            .find('\n')
            .map_or(self.source.len(), |n| offset + n);
        let line_text = self.source[line_start..line_end].trim_end_matches('\r');
        let gutter = format!("{:>5}: ", self.token.line + 1);
        let mut excerpt = String::new();
        let _ = writeln!(excerpt, "{gutter}{line_text}");
        let caret = gutter.len() + self.token.column as usize;
        let _ = write!(excerpt, "{}^", " ".repeat(caret));
        excerpt
    }
}

fn advance_position(skipped: &str, line: &mut u32, column: &mut u32) {
    match skipped.rfind('\n') {
        Some(last) => {
            *line += skipped.matches('\n').count() as u32;
            *column = skipped[last + 1..].chars().count() as u32;
        }
        None => *column += skipped.chars().count() as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<(TokenKind, String)> {
        let mut lexer = Lexer::new(source);
        let mut out = Vec::new();
        while !lexer.is_end() {
            out.push((lexer.kind(), lexer.text().to_string()));
            lexer.next();
        }
        out
    }

    #[test]
    fn splits_numbers_and_units() {
        assert_eq!(
            kinds("12px 1.5em"),
            vec![
                (TokenKind::Number, "12".into()),
                (TokenKind::Identifier, "px".into()),
                (TokenKind::Number, "1.5".into()),
                (TokenKind::Identifier, "em".into()),
            ]
        );
    }

    #[test]
    fn exponent_is_part_of_number() {
        assert_eq!(kinds("1e3")[0], (TokenKind::Number, "1e3".into()));
        assert_eq!(kinds("2e-4")[0], (TokenKind::Number, "2e-4".into()));
        assert_eq!(kinds("2em")[0], (TokenKind::Number, "2".into()));
    }

    #[test]
    fn leading_dot_number() {
        assert_eq!(kinds(".5")[0], (TokenKind::Number, ".5".into()));
        assert_eq!(kinds(".cls")[0], (TokenKind::Symbol, ".".into()));
    }

    #[test]
    fn identifiers_keep_hyphens() {
        assert_eq!(kinds("sans-serif")[0], (TokenKind::Identifier, "sans-serif".into()));
        assert_eq!(
            kinds("-webkit")[..2],
            [
                (TokenKind::Symbol, "-".to_string()),
                (TokenKind::Identifier, "webkit".to_string())
            ]
        );
    }

    #[test]
    fn strings_include_quotes() {
        assert_eq!(kinds(r#""a b" 'c'"#)[0], (TokenKind::String, r#""a b""#.into()));
        assert_eq!(kinds(r#""a\"b""#)[0], (TokenKind::String, r#""a\"b""#.into()));
    }

    #[test]
    fn unterminated_string() {
        let lexer = Lexer::new("\"abc");
        assert_eq!(lexer.kind(), TokenKind::Unterminated);
        assert!(matches!(lexer.ensure_valid(), Err(Error::Lex { .. })));
    }

    #[test]
    fn strings_as_symbols() {
        let lexer = Lexer::with_flags(
            "\"a\"",
            LexerFlags {
                strings_as_symbols: true,
                ..LexerFlags::default()
            },
        );
        assert_eq!(lexer.kind(), TokenKind::Symbol);
        assert_eq!(lexer.text(), "\"");
    }

    #[test]
    fn whitespace_tokens_when_requested() {
        let mut lexer = tokenize("a \tb\r\nc", true);
        assert_eq!(lexer.text(), "a");
        assert_eq!(lexer.next().kind(), TokenKind::Whitespace);
        assert_eq!(lexer.text(), " ");
        assert_eq!(lexer.next().kind(), TokenKind::Whitespace);
        assert_eq!(lexer.next().text(), "b");
        assert_eq!(lexer.next().kind(), TokenKind::NewLine);
        assert_eq!(lexer.text(), "\r\n");
        let c = lexer.next();
        assert_eq!(c.text(), "c");
        assert_eq!((c.line(), c.column()), (1, 0));
    }

    #[test]
    fn line_and_column_tracking() {
        let mut lexer = Lexer::new("a\n  bb cc");
        assert_eq!((lexer.line(), lexer.column()), (0, 0));
        lexer.next();
        assert_eq!((lexer.line(), lexer.column()), (1, 2));
        lexer.next();
        assert_eq!((lexer.line(), lexer.column()), (1, 5));
    }

    #[test]
    fn trailing_whitespace_is_trimmed() {
        let mut lexer = Lexer::new("a   ");
        let start = lexer.copy();
        lexer.next();
        assert!(lexer.is_end());
        assert_eq!(lexer.slice(&start), "a");
    }

    #[test]
    fn peek_does_not_move() {
        let lexer = Lexer::new("a b");
        assert_eq!(lexer.peek().text(), "b");
        assert_eq!(lexer.text(), "a");
    }

    #[test]
    fn copy_and_sync_backtrack() {
        let mut lexer = Lexer::new("a b c");
        let mut probe = lexer.copy();
        probe.next().next();
        assert_eq!(lexer.text(), "a");
        lexer.sync(&probe);
        assert_eq!(lexer.text(), "c");
    }

    #[test]
    fn fence_bounds_input() {
        let lexer = Lexer::new("a b ; c");
        let mut stop = lexer.copy();
        while stop.text() != ";" {
            stop.next();
        }
        let mut inner = lexer.copy();
        inner.fence(&stop);
        assert_eq!(inner.text(), "a");
        assert_eq!(inner.next().text(), "b");
        assert!(inner.next().is_end());
    }

    #[test]
    fn assert_reports_position() {
        let mut lexer = Lexer::new("a\nb c");
        lexer.next();
        let err = lexer.assert("x").unwrap_err();
        match &err {
            Error::Syntax { line, column, excerpt, .. } => {
                assert_eq!((*line, *column), (2, 1));
                assert!(excerpt.contains("b c"));
                assert!(excerpt.ends_with('^'));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.to_string().contains("at 2:1"));
        assert!(lexer.assert("b").is_ok());
        assert_eq!(lexer.text(), "c");
    }

    #[test]
    fn block_and_line_comments() {
        let mut lexer = Lexer::new("/* x\n y */ a // rest\n b");
        assert!(lexer.comment().unwrap());
        assert_eq!(lexer.text(), "a");
        assert_eq!(lexer.line(), 1);
        lexer.next();
        assert!(lexer.comment().unwrap());
        assert_eq!(lexer.text(), "b");
        assert!(!lexer.comment().unwrap());
    }

    #[test]
    fn unterminated_comment_is_lex_error() {
        let mut lexer = Lexer::new("/* never closed");
        assert!(matches!(lexer.comment(), Err(Error::Lex { .. })));
    }

    #[test]
    fn skip_comments_flag() {
        let flags = LexerFlags {
            skip_comments: true,
            ..LexerFlags::default()
        };
        let mut lexer = Lexer::with_flags("a /* b */ c", flags);
        assert_eq!(lexer.text(), "a");
        assert_eq!(lexer.next().text(), "c");
        let lexer = Lexer::with_flags("a /* b", flags);
        assert_eq!(lexer.peek().kind(), TokenKind::Unterminated);
    }

    #[test]
    fn custom_symbols() {
        let mut lexer = Lexer::new("a <=> b");
        lexer.add_symbol("<=>");
        assert_eq!(lexer.next().text(), "<=>");
        assert_eq!(lexer.kind(), TokenKind::Symbol);
        assert_eq!(lexer.next().text(), "b");
    }

    #[test]
    fn single_character_mode() {
        let lexer = Lexer::with_flags(
            "abc",
            LexerFlags {
                single_character: true,
                ..LexerFlags::default()
            },
        );
        assert_eq!(lexer.text(), "a");
        assert_eq!(lexer.peek().text(), "b");
    }

    #[test]
    fn non_ascii_symbol_is_whole_char() {
        let lexer = Lexer::new("é1");
        assert_eq!(lexer.text(), "é");
        assert_eq!(lexer.peek().text(), "1");
    }

    #[test]
    fn trim_excludes_outer_whitespace() {
        let lexer = tokenize("  a b  ", true);
        let trimmed = lexer.trim();
        assert_eq!(trimmed.text(), "a");
        assert_eq!(trimmed.remaining(), "a b");
    }

    #[test]
    fn reset_rewinds() {
        let mut lexer = Lexer::new("a b");
        lexer.next();
        assert_eq!(lexer.reset().text(), "a");
    }
}
