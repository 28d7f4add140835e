//! Token classification tables.

/// Classification of a single lexer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A run of digits, optionally with a fraction and exponent.
    Number,
    /// A word starting with a letter (`sans-serif`, `px`, `list-item`).
    Identifier,
    /// A quoted string, quotes included.
    String,
    /// A run of spaces or tabs.
    Whitespace,
    /// A line feed, carriage return, or CR+LF pair.
    NewLine,
    /// Punctuation that is not an operator or bracket.
    Symbol,
    /// One of `! % & * + : < = >`.
    Operator,
    /// One of `( [ {`.
    OpenBracket,
    /// One of `) ] }`.
    CloseBracket,
    /// The reserved escape control character.
    Escape,
    /// A string with no closing quote, or a comment with no closing `*/`.
    Unterminated,
    /// End of the (possibly fenced) input.
    End,
}

impl TokenKind {
    /// Whether the token is punctuation of any kind.
    pub fn is_punctuation(self) -> bool {
        matches!(
            self,
            TokenKind::Symbol | TokenKind::Operator | TokenKind::OpenBracket | TokenKind::CloseBracket
        )
    }
}

/// Character class driving the scanner's jump table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CharClass {
    Number,
    Identifier,
    Quote,
    Space,
    Tab,
    CarriageReturn,
    LineFeed,
    Symbol,
    Operator,
    OpenBracket,
    CloseBracket,
    Escape,
}

const fn build_classes() -> [CharClass; 128] {
    let mut table = [CharClass::Symbol; 128];
    let mut i = 0;
    while i < 128 {
        table[i] = match i as u8 {
            b'\t' => CharClass::Tab,
            b'\n' => CharClass::LineFeed,
            b'\r' => CharClass::CarriageReturn,
            0x0f => CharClass::Escape,
            b' ' => CharClass::Space,
            b'!' | b'%' | b'&' | b'*' | b'+' | b':' | b'<' | b'=' | b'>' => CharClass::Operator,
            b'"' | b'\'' | b'`' => CharClass::Quote,
            b'(' | b'[' | b'{' => CharClass::OpenBracket,
            b')' | b']' | b'}' => CharClass::CloseBracket,
            b'0'..=b'9' => CharClass::Number,
            b'A'..=b'Z' | b'a'..=b'z' => CharClass::Identifier,
            _ => CharClass::Symbol,
        };
        i += 1;
    }
    table
}

static CHAR_CLASSES: [CharClass; 128] = build_classes();

/// Class of the byte starting a token. Non-ASCII bytes are symbols.
pub(crate) fn classify(byte: u8) -> CharClass {
    CHAR_CLASSES
        .get(byte as usize)
        .copied()
        .unwrap_or(CharClass::Symbol)
}

pub(crate) fn is_identifier_continue(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'$')
}
