//! Linear gradients.

use std::fmt;

use cssparser::ToCss;

use super::color::Color;
use super::length::{Length, Percentage, UnitCategory};
use crate::lexer::{Lexer, TokenKind};

/// Where a gradient line points.
#[derive(Debug, Clone, PartialEq)]
pub enum GradientDirection {
    /// An explicit angle such as `45deg`.
    Angle(Length),
    /// `to` followed by one or two side keywords, e.g. `to top right`.
    Sides(Vec<String>),
}

impl Default for GradientDirection {
    fn default() -> Self {
        Self::Sides(vec!["bottom".to_string()])
    }
}

/// Position of a color stop along the gradient line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopPosition {
    Length(Length),
    Percentage(Percentage),
}

/// A color with an optional position.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorStop {
    pub color: Color,
    pub position: Option<StopPosition>,
}

/// A `linear-gradient(...)` image.
///
/// # Example
///
/// ```
/// use horizon_lattice_grammar::lexer::Lexer;
/// use horizon_lattice_grammar::types::Gradient;
///
/// let mut lexer = Lexer::new("linear-gradient(90deg, red, blue 50%)");
/// let gradient = Gradient::parse(&mut lexer).unwrap();
/// assert_eq!(gradient.stops.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    /// Direction. `None` when the source gave none.
    pub direction: Option<GradientDirection>,
    /// Color stops in order.
    pub stops: Vec<ColorStop>,
}

const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];

impl Gradient {
    /// Parse a `linear-gradient(...)` function.
    pub fn parse(lexer: &mut Lexer<'_>) -> Option<Self> {
        if lexer.kind() != TokenKind::Identifier
            || !lexer.text().eq_ignore_ascii_case("linear-gradient")
        {
            return None;
        }
        let name = lexer.copy();
        let mut probe = lexer.peek();
        if probe.text() != "(" || !probe.is_adjacent_to(&name) {
            return None;
        }
        probe.next();

        let direction = if let Some(angle) = Length::parse_category(&mut probe, UnitCategory::Angle)
        {
            Some(GradientDirection::Angle(angle))
        } else if probe.text().eq_ignore_ascii_case("to") {
            probe.next();
            let mut sides = Vec::new();
            while sides.len() < 2 && probe.kind() == TokenKind::Identifier {
                let side = probe.text().to_ascii_lowercase();
                if !SIDES.contains(&side.as_str()) {
                    break;
                }
                sides.push(side);
                probe.next();
            }
            if sides.is_empty() {
                return None;
            }
            Some(GradientDirection::Sides(sides))
        } else {
            None
        };
        if direction.is_some() {
            if probe.text() != "," {
                return None;
            }
            probe.next();
        }

        let mut stops = Vec::new();
        loop {
            let color = Color::parse(&mut probe)?;
            let position = if let Some(length) = Length::parse(&mut probe) {
                Some(StopPosition::Length(length))
            } else {
                Percentage::parse(&mut probe).map(StopPosition::Percentage)
            };
            stops.push(ColorStop { color, position });
            match probe.text() {
                "," => {
                    probe.next();
                }
                ")" => break,
                _ => return None,
            }
        }
        probe.next();
        lexer.sync(&probe);
        Some(Self { direction, stops })
    }
}

impl ToCss for Gradient {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str("linear-gradient(")?;
        match &self.direction {
            Some(GradientDirection::Angle(angle)) => {
                angle.to_css(dest)?;
                dest.write_str(", ")?;
            }
            Some(GradientDirection::Sides(sides)) => {
                write!(dest, "to {}, ", sides.join(" "))?;
            }
            None => {}
        }
        for (i, stop) in self.stops.iter().enumerate() {
            if i > 0 {
                dest.write_str(", ")?;
            }
            stop.color.to_css(dest)?;
            match stop.position {
                Some(StopPosition::Length(length)) => {
                    dest.write_char(' ')?;
                    length.to_css(dest)?;
                }
                Some(StopPosition::Percentage(percentage)) => {
                    dest.write_char(' ')?;
                    percentage.to_css(dest)?;
                }
                None => {}
            }
        }
        dest.write_char(')')
    }
}

impl fmt::Display for Gradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}
