//! Basic shapes such as `circle(50% at 0 0)`.

use std::fmt;

use cssparser::ToCss;

use crate::lexer::{Lexer, TokenKind};

/// The shape function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Inset,
    Circle,
    Ellipse,
    Polygon,
    Rect,
}

impl ShapeKind {
    /// Look up a shape function by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "inset" => Some(Self::Inset),
            "circle" => Some(Self::Circle),
            "ellipse" => Some(Self::Ellipse),
            "polygon" => Some(Self::Polygon),
            "rect" => Some(Self::Rect),
            _ => None,
        }
    }

    /// The function name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inset => "inset",
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
            Self::Polygon => "polygon",
            Self::Rect => "rect",
        }
    }
}

/// A basic shape. Arguments are kept as raw text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    /// Shape function.
    pub kind: ShapeKind,
    /// Raw argument text between the parentheses.
    pub arguments: String,
}

impl Shape {
    /// Parse a shape function.
    pub fn parse(lexer: &mut Lexer<'_>) -> Option<Self> {
        if lexer.kind() != TokenKind::Identifier {
            return None;
        }
        let kind = ShapeKind::from_name(lexer.text())?;
        let name = lexer.copy();
        let mut probe = lexer.peek();
        if probe.text() != "(" || !probe.is_adjacent_to(&name) {
            return None;
        }
        let open = probe.copy();
        probe.next();

        let arguments = if probe.kind() == TokenKind::String && probe.peek().text() == ")" {
            let text = probe.text();
            probe.next();
            text[1..text.len() - 1].to_string()
        } else {
            let mut depth = 0usize;
            while !probe.is_end() {
                match probe.text() {
                    "(" => depth += 1,
                    ")" if depth == 0 => break,
                    ")" => depth -= 1,
                    _ => {}
                }
                probe.next();
            }
            probe.slice(&open)[1..].trim().to_string()
        };
        if probe.text() != ")" {
            return None;
        }
        probe.next();
        lexer.sync(&probe);
        Some(Self { kind, arguments })
    }
}

impl ToCss for Shape {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        write!(dest, "{}({})", self.kind.as_str(), self.arguments)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_raw_arguments() {
        let mut lexer = Lexer::new("circle(50% at calc(1px) 0) auto");
        let shape = Shape::parse(&mut lexer).unwrap();
        assert_eq!(shape.kind, ShapeKind::Circle);
        assert_eq!(shape.arguments, "50% at calc(1px) 0");
        assert_eq!(lexer.text(), "auto");
    }

    #[test]
    fn quoted_arguments() {
        let shape = Shape::parse(&mut Lexer::new("rect('1px, 2px')")).unwrap();
        assert_eq!(shape.arguments, "1px, 2px");
    }

    #[test]
    fn rejects_other_functions() {
        assert_eq!(Shape::parse(&mut Lexer::new("square(1px)")), None);
        assert_eq!(Shape::parse(&mut Lexer::new("circle")), None);
    }

    #[test]
    fn round_trip() {
        let shape = Shape::parse(&mut Lexer::new("inset(5px 10px)")).unwrap();
        assert_eq!(shape.to_css_string(), "inset(5px 10px)");
        assert_eq!(Shape::parse(&mut Lexer::new(&shape.to_css_string())), Some(shape));
    }
}
