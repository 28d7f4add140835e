//! Textual leaf values: strings, identifiers, URLs and font family names.

use std::fmt;

use cssparser::{serialize_identifier, serialize_string, ToCss};

use crate::lexer::{Lexer, TokenKind};

/// A quoted string with its quotes removed and escapes resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CssString(pub String);

impl CssString {
    /// Parse a string token.
    pub fn parse(lexer: &mut Lexer<'_>) -> Option<Self> {
        if lexer.kind() != TokenKind::String {
            return None;
        }
        let value = unquote(lexer.text());
        lexer.next();
        Some(Self(value))
    }

    /// The string contents.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ToCss for CssString {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        serialize_string(&self.0, dest)
    }
}

impl fmt::Display for CssString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}

/// A bare identifier such as an animation or counter name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(pub String);

impl Identifier {
    /// Parse an identifier token.
    pub fn parse(lexer: &mut Lexer<'_>) -> Option<Self> {
        if lexer.kind() != TokenKind::Identifier {
            return None;
        }
        let value = lexer.text().to_string();
        lexer.next();
        Some(Self(value))
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ToCss for Identifier {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        serialize_identifier(&self.0, dest)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}

/// A resource location from `url(...)`, `uri(...)` or a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CssUrl(pub String);

impl CssUrl {
    /// Parse a URL.
    pub fn parse(lexer: &mut Lexer<'_>) -> Option<Self> {
        match lexer.kind() {
            TokenKind::String => CssString::parse(lexer).map(|s| Self(s.0)),
            TokenKind::Identifier
                if lexer.text().eq_ignore_ascii_case("url")
                    || lexer.text().eq_ignore_ascii_case("uri") =>
            {
                let name = lexer.copy();
                let mut probe = lexer.peek();
                if probe.text() != "(" || !probe.is_adjacent_to(&name) {
                    return None;
                }
                let open = probe.copy();
                probe.next();
                let url = if probe.kind() == TokenKind::String {
                    let quoted = CssString::parse(&mut probe)?;
                    quoted.0
                } else {
                    let body = &probe.source()[open.token_end()..probe.end()];
                    let close = body.find(')')?;
                    let raw = body[..close].trim().to_string();
                    probe.seek(open.token_end() + close);
                    raw
                };
                if probe.text() != ")" {
                    return None;
                }
                probe.next();
                lexer.sync(&probe);
                Some(Self(url))
            }
            _ => None,
        }
    }

    /// The URL text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ToCss for CssUrl {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str("url(")?;
        serialize_string(&self.0, dest)?;
        dest.write_char(')')
    }
}

impl fmt::Display for CssUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}

/// A font family name: a quoted string or a run of identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontName(pub String);

impl FontName {
    /// Parse a family name.
    pub fn parse(lexer: &mut Lexer<'_>) -> Option<Self> {
        if lexer.kind() == TokenKind::String {
            return CssString::parse(lexer).map(|s| Self(s.0));
        }
        let mut words = Vec::new();
        while lexer.kind() == TokenKind::Identifier {
            words.push(lexer.text());
            lexer.next();
        }
        if words.is_empty() {
            None
        } else {
            Some(Self(words.join(" ")))
        }
    }
}

impl ToCss for FontName {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        serialize_string(&self.0, dest)
    }
}

impl fmt::Display for FontName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}

/// Strip the quotes of a string token and resolve backslash escapes.
pub(crate) fn unquote(token: &str) -> String {
    let inner = if token.len() >= 2 {
        &token[1..token.len() - 1]
    } else {
        token
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            None => {}
            Some('\n') => {
                chars.next();
            }
            Some(h) if h.is_ascii_hexdigit() => {
                let mut code = 0u32;
                let mut digits = 0;
                while digits < 6 {
                    match chars.peek().and_then(|d| d.to_digit(16)) {
                        Some(d) => {
                            code = code * 16 + d;
                            digits += 1;
                            chars.next();
                        }
                        None => break,
                    }
                }
                if chars.peek() == Some(&' ') {
                    chars.next();
                }
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            Some(other) => {
                out.push(other);
                chars.next();
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_are_unquoted() {
        let mut lexer = Lexer::new(r#""hello world" 'it\'s' "\26 b""#);
        assert_eq!(CssString::parse(&mut lexer).unwrap().as_str(), "hello world");
        assert_eq!(CssString::parse(&mut lexer).unwrap().as_str(), "it's");
        assert_eq!(CssString::parse(&mut lexer).unwrap().as_str(), "&b");
    }

    #[test]
    fn url_forms() {
        let mut lexer = Lexer::new(r#"url("a.png") url( b/c.png ) uri('d') "e.css""#);
        assert_eq!(CssUrl::parse(&mut lexer).unwrap().as_str(), "a.png");
        assert_eq!(CssUrl::parse(&mut lexer).unwrap().as_str(), "b/c.png");
        assert_eq!(CssUrl::parse(&mut lexer).unwrap().as_str(), "d");
        assert_eq!(CssUrl::parse(&mut lexer).unwrap().as_str(), "e.css");
        assert!(lexer.is_end());
    }

    #[test]
    fn raw_url_with_scheme() {
        let mut lexer = Lexer::new("url(http://example.com/x.css);");
        let url = CssUrl::parse(&mut lexer).unwrap();
        assert_eq!(url.as_str(), "http://example.com/x.css");
        assert_eq!(lexer.text(), ";");
    }

    #[test]
    fn url_needs_parenthesis() {
        let mut lexer = Lexer::new("url x");
        assert_eq!(CssUrl::parse(&mut lexer), None);
        assert_eq!(lexer.text(), "url");
    }

    #[test]
    fn font_names() {
        let mut lexer = Lexer::new("Times New Roman, \"Helvetica Neue\"");
        assert_eq!(FontName::parse(&mut lexer).unwrap().0, "Times New Roman");
        assert_eq!(lexer.text(), ",");
        lexer.next();
        assert_eq!(FontName::parse(&mut lexer).unwrap().0, "Helvetica Neue");
    }

    #[test]
    fn serialization() {
        assert_eq!(CssString("a\"b".into()).to_css_string(), r#""a\"b""#);
        assert_eq!(CssUrl("x.png".into()).to_css_string(), r#"url("x.png")"#);
        assert_eq!(Identifier("slide-in".into()).to_css_string(), "slide-in");
        assert_eq!(FontName("Times New Roman".into()).to_css_string(), "\"Times New Roman\"");
    }

    #[test]
    fn round_trips() {
        let s = CssString("tab\there".into());
        assert_eq!(CssString::parse(&mut Lexer::new(&s.to_css_string())), Some(s));
        let u = CssUrl("img/a b.png".into());
        assert_eq!(CssUrl::parse(&mut Lexer::new(&u.to_css_string())), Some(u));
    }
}
