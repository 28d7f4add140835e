//! SVG path data wrapped in `path("...")`.

use std::fmt;

use cssparser::ToCss;

use super::length::write_number;
use super::text::unquote;
use super::Interpolate;
use crate::lexer::{Lexer, TokenKind};

/// One drawing command with its numeric arguments.
///
/// Upper-case commands are absolute, lower-case relative.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    pub command: char,
    pub args: Vec<f32>,
}

/// A parsed path.
///
/// # Example
///
/// ```
/// use horizon_lattice_grammar::types::Path;
///
/// let path = Path::from_data("M0 0 10 10z").unwrap();
/// assert_eq!(path.segments.len(), 3);
/// assert_eq!(path.segments[1].command, 'L');
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    pub segments: Vec<PathSegment>,
}

fn arity(command: char) -> Option<usize> {
    match command.to_ascii_uppercase() {
        'M' | 'L' | 'T' => Some(2),
        'H' | 'V' => Some(1),
        'C' => Some(6),
        'S' | 'Q' => Some(4),
        'A' => Some(7),
        'Z' => Some(0),
        _ => None,
    }
}

impl Path {
    /// Parse `path("<data>")`.
    pub fn parse(lexer: &mut Lexer<'_>) -> Option<Self> {
        if lexer.kind() != TokenKind::Identifier || !lexer.text().eq_ignore_ascii_case("path") {
            return None;
        }
        let name = lexer.copy();
        let mut probe = lexer.peek();
        if probe.text() != "(" || !probe.is_adjacent_to(&name) {
            return None;
        }
        probe.next();
        if probe.kind() != TokenKind::String {
            return None;
        }
        let path = Self::from_data(&unquote(probe.text()))?;
        probe.next();
        if probe.text() != ")" {
            return None;
        }
        probe.next();
        lexer.sync(&probe);
        Some(path)
    }

    /// Parse raw path data such as `M 0 0 L 10 10 Z`.
    pub fn from_data(data: &str) -> Option<Self> {
        let mut scanner = Scanner {
            bytes: data.as_bytes(),
            pos: 0,
        };
        let mut segments = Vec::new();
        scanner.skip_separators();
        while let Some(byte) = scanner.peek() {
            let command = byte as char;
            let count = arity(command)?;
            scanner.pos += 1;

            let mut repeat = command;
            loop {
                let mut args = Vec::with_capacity(count);
                for _ in 0..count {
                    scanner.skip_separators();
                    args.push(scanner.number()?);
                }
                segments.push(PathSegment {
                    command: repeat,
                    args,
                });
                scanner.skip_separators();
                if count == 0 || !scanner.at_number() {
                    break;
                }
                // extra coordinate pairs after a move are line segments
                repeat = match repeat {
                    'M' => 'L',
                    'm' => 'l',
                    other => other,
                };
            }
        }
        Some(Self { segments })
    }

    /// The path data without the `path()` wrapper.
    pub fn data(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push(segment.command);
            for arg in &segment.args {
                out.push(' ');
                let _ = write_number(*arg, &mut out);
            }
        }
        out
    }
}

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Scanner<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_separators(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n' | b',')) {
            self.pos += 1;
        }
    }

    fn at_number(&self) -> bool {
        matches!(self.peek(), Some(b'0'..=b'9' | b'-' | b'+' | b'.'))
    }

    fn number(&mut self) -> Option<f32> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'-' | b'+')) {
            self.pos += 1;
        }
        let mut seen_dot = false;
        while let Some(byte) = self.peek() {
            match byte {
                b'0'..=b'9' => self.pos += 1,
                b'.' if !seen_dot => {
                    seen_dot = true;
                    self.pos += 1;
                }
                _ => break,
            }
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some(b'-' | b'+')) {
                self.pos += 1;
            }
            if matches!(self.peek(), Some(b'0'..=b'9')) {
                while matches!(self.peek(), Some(b'0'..=b'9')) {
                    self.pos += 1;
                }
            } else {
                self.pos = mark;
            }
        }
        std::str::from_utf8(&self.bytes[start..self.pos])
            .ok()?
            .parse()
            .ok()
    }
}

impl ToCss for Path {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str("path(")?;
        cssparser::serialize_string(&self.data(), dest)?;
        dest.write_char(')')
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}

impl Interpolate for Path {
    /// Blends matching segments argument by argument. Paths with different
    /// command sequences switch halfway.
    fn lerp(&self, to: &Self, t: f32) -> Self {
        let compatible = self.segments.len() == to.segments.len()
            && self
                .segments
                .iter()
                .zip(&to.segments)
                .all(|(a, b)| a.command == b.command);
        if !compatible {
            return if t < 0.5 { self.clone() } else { to.clone() };
        }
        let segments = self
            .segments
            .iter()
            .zip(&to.segments)
            .map(|(a, b)| PathSegment {
                command: a.command,
                args: a
                    .args
                    .iter()
                    .zip(&b.args)
                    .map(|(x, y)| x + (y - x) * t)
                    .collect(),
            })
            .collect();
        Self { segments }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_and_arguments() {
        let path = Path::from_data("M10,20 L30 40 h5 v-5 C1 2 3 4 5 6 Q1 2 3 4 A1 1 0 0 1 9 9 Z").unwrap();
        let commands: String = path.segments.iter().map(|s| s.command).collect();
        assert_eq!(commands, "MLhvCQAZ");
        assert_eq!(path.segments[0].args, vec![10.0, 20.0]);
        assert_eq!(path.segments[3].args, vec![-5.0]);
        assert_eq!(path.segments[6].args.len(), 7);
    }

    #[test]
    fn implicit_repeats() {
        let path = Path::from_data("m0 0 1 1 2 2 l3 3 4 4").unwrap();
        let commands: String = path.segments.iter().map(|s| s.command).collect();
        assert_eq!(commands, "mllll");
    }

    #[test]
    fn compact_numbers() {
        let path = Path::from_data("M-1.5-2e1").unwrap();
        assert_eq!(path.segments[0].args, vec![-1.5, -20.0]);
    }

    #[test]
    fn rejects_bad_data() {
        assert_eq!(Path::from_data("M 1"), None);
        assert_eq!(Path::from_data("X 1 2"), None);
    }

    #[test]
    fn parses_function() {
        let mut lexer = Lexer::new("path('M 0 0 L 1 1') none");
        let path = Path::parse(&mut lexer).unwrap();
        assert_eq!(path.segments.len(), 2);
        assert_eq!(lexer.text(), "none");
    }

    #[test]
    fn serialization_round_trip() {
        let path = Path::from_data("M0,0 10,10 z").unwrap();
        let css = path.to_css_string();
        assert_eq!(css, "path(\"M 0 0 L 10 10 z\")");
        assert_eq!(Path::parse(&mut Lexer::new(&css)), Some(path));
    }

    #[test]
    fn lerp_matching_paths() {
        let a = Path::from_data("M0 0 L10 10").unwrap();
        let b = Path::from_data("M10 10 L20 20").unwrap();
        assert_eq!(a.lerp(&b, 0.5), Path::from_data("M5 5 L15 15").unwrap());
    }
}
