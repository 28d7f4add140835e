//! Cubic Bézier timing functions.

use std::fmt;

use cssparser::ToCss;

use super::length::{scan_number, write_number};
use crate::lexer::{Lexer, TokenKind};

/// A cubic Bézier easing curve from (0, 0) to (1, 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicBezier {
    pub const EASE: Self = Self::new(0.25, 0.1, 0.25, 1.0);
    pub const EASE_IN: Self = Self::new(0.42, 0.0, 1.0, 1.0);
    pub const EASE_OUT: Self = Self::new(0.0, 0.0, 0.58, 1.0);
    pub const EASE_IN_OUT: Self = Self::new(0.42, 0.0, 0.58, 1.0);

    /// Create a curve from its two control points.
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Parse `cubic-bezier(x1, y1, x2, y2)` or one of the `ease` keywords.
    pub fn parse(lexer: &mut Lexer<'_>) -> Option<Self> {
        if lexer.kind() != TokenKind::Identifier {
            return None;
        }
        let keyword = match lexer.text().to_ascii_lowercase().as_str() {
            "ease" => Some(Self::EASE),
            "ease-in" => Some(Self::EASE_IN),
            "ease-out" => Some(Self::EASE_OUT),
            "ease-in-out" => Some(Self::EASE_IN_OUT),
            "cubic-bezier" => None,
            _ => return None,
        };
        if let Some(curve) = keyword {
            lexer.next();
            return Some(curve);
        }

        let name = lexer.copy();
        let mut probe = lexer.peek();
        if probe.text() != "(" || !probe.is_adjacent_to(&name) {
            return None;
        }
        probe.next();
        let mut values = [0.0f32; 4];
        for (i, value) in values.iter_mut().enumerate() {
            if i > 0 {
                if probe.text() != "," {
                    return None;
                }
                probe.next();
            }
            *value = scan_number(&mut probe)?.value;
        }
        if probe.text() != ")" {
            return None;
        }
        probe.next();
        lexer.sync(&probe);
        let [x1, y1, x2, y2] = values;
        Some(Self::new(x1, y1, x2, y2))
    }

    /// Point on the curve at parameter `t`.
    pub fn point(&self, t: f32) -> (f32, f32) {
        let u = 1.0 - t;
        let a = 3.0 * u * u * t;
        let b = 3.0 * u * t * t;
        let c = t * t * t;
        (a * self.x1 + b * self.x2 + c, a * self.y1 + b * self.y2 + c)
    }

    /// Eased progress for a linear progress `x` in `0..=1`.
    pub fn y_at_x(&self, x: f32) -> f32 {
        let x = x.clamp(0.0, 1.0);
        let (mut low, mut high) = (0.0f32, 1.0f32);
        let mut t = x;
        for _ in 0..32 {
            let (px, _) = self.point(t);
            if (px - x).abs() < 1e-6 {
                break;
            }
            if px < x {
                low = t;
            } else {
                high = t;
            }
            t = (low + high) / 2.0;
        }
        self.point(t).1
    }
}

impl ToCss for CubicBezier {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str("cubic-bezier(")?;
        for (i, v) in [self.x1, self.y1, self.x2, self.y2].into_iter().enumerate() {
            if i > 0 {
                dest.write_str(", ")?;
            }
            write_number(v, dest)?;
        }
        dest.write_char(')')
    }
}

impl fmt::Display for CubicBezier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}
