//! Typed values produced by leaf parsers.
//!
//! Every leaf type has a `parse(&mut Lexer) -> Option<Self>` constructor that
//! consumes nothing when it fails, serializes through [`cssparser::ToCss`],
//! and, where blending makes sense, implements [`Interpolate`].
//!
//! # Example
//!
//! ```
//! use horizon_lattice_grammar::lexer::Lexer;
//! use horizon_lattice_grammar::types::{Interpolate, Length};
//!
//! let from = Length::parse(&mut Lexer::new("10px")).unwrap();
//! let to = Length::parse(&mut Lexer::new("20px")).unwrap();
//! assert_eq!(from.lerp(&to, 0.5), Length::px(15.0));
//! ```

mod bezier;
mod color;
mod gradient;
mod leaf;
mod length;
mod media;
mod path;
mod shape;
mod text;
mod transform;

use std::fmt;

use cssparser::ToCss;

pub use bezier::CubicBezier;
pub use color::Color;
pub use gradient::{ColorStop, Gradient, GradientDirection, StopPosition};
pub use leaf::{LeafKind, LeafParser, LeafRegistry};
pub use length::{Length, LengthUnit, Number, Percentage, UnitCategory};
pub use media::{MediaAxis, MediaComparison, MediaEnvironment, MediaFeature, Viewport};
pub use path::{Path, PathSegment};
pub use shape::{Shape, ShapeKind};
pub use text::{CssString, CssUrl, FontName, Identifier};
pub use transform::Transform2D;

/// Blending between two values of the same type.
///
/// `t` runs from `0.0` (`self`) to `1.0` (`to`). Copying is [`Clone`].
pub trait Interpolate {
    fn lerp(&self, to: &Self, t: f32) -> Self;
}

/// A single parsed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A keyword or punctuation matched literally.
    Keyword(String),
    Color(Color),
    /// Any dimension: length, angle, time, frequency, resolution or flex.
    Length(Length),
    Percentage(Percentage),
    Number(Number),
    Url(CssUrl),
    String(CssString),
    Identifier(Identifier),
    FontName(FontName),
    Shape(Shape),
    Gradient(Gradient),
    CubicBezier(CubicBezier),
    Transform(Transform2D),
    Path(Path),
    MediaFeature(MediaFeature),
}

impl Value {
    /// Create a keyword value.
    pub fn keyword(text: impl Into<String>) -> Self {
        Self::Keyword(text.into())
    }

    /// The keyword text, if this is a keyword.
    pub fn as_keyword(&self) -> Option<&str> {
        match self {
            Self::Keyword(text) => Some(text),
            _ => None,
        }
    }

    fn is_punctuation(&self, text: &str) -> bool {
        self.as_keyword() == Some(text)
    }
}

impl ToCss for Value {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        match self {
            Self::Keyword(text) => dest.write_str(text),
            Self::Color(v) => v.to_css(dest),
            Self::Length(v) => v.to_css(dest),
            Self::Percentage(v) => v.to_css(dest),
            Self::Number(v) => v.to_css(dest),
            Self::Url(v) => v.to_css(dest),
            Self::String(v) => v.to_css(dest),
            Self::Identifier(v) => v.to_css(dest),
            Self::FontName(v) => v.to_css(dest),
            Self::Shape(v) => v.to_css(dest),
            Self::Gradient(v) => v.to_css(dest),
            Self::CubicBezier(v) => v.to_css(dest),
            Self::Transform(v) => v.to_css(dest),
            Self::Path(v) => v.to_css(dest),
            Self::MediaFeature(v) => v.to_css(dest),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}

impl Interpolate for Value {
    /// Blends values of the same kind; anything else switches halfway.
    fn lerp(&self, to: &Self, t: f32) -> Self {
        match (self, to) {
            (Self::Color(a), Self::Color(b)) => Self::Color(a.lerp(b, t)),
            (Self::Length(a), Self::Length(b)) => Self::Length(a.lerp(b, t)),
            (Self::Percentage(a), Self::Percentage(b)) => Self::Percentage(a.lerp(b, t)),
            (Self::Number(a), Self::Number(b)) => Self::Number(a.lerp(b, t)),
            (Self::Transform(a), Self::Transform(b)) => Self::Transform(a.lerp(b, t)),
            (Self::Path(a), Self::Path(b)) => Self::Path(a.lerp(b, t)),
            _ if t < 0.5 => self.clone(),
            _ => to.clone(),
        }
    }
}

/// The value stored for one property: a scalar, or a list once a term
/// matched more than once.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Single(Value),
    List(Vec<Value>),
}

impl PropertyValue {
    /// Add `value`, promoting a scalar to a list.
    pub fn push(&mut self, value: Value) {
        match self {
            Self::List(values) => values.push(value),
            Self::Single(first) => {
                let first = std::mem::replace(first, Value::Keyword(String::new()));
                *self = Self::List(vec![first, value]);
            }
        }
    }

    /// Append every value of `other`, flattening lists.
    pub fn extend(&mut self, other: PropertyValue) {
        match other {
            Self::Single(value) => self.push(value),
            Self::List(values) => {
                for value in values {
                    self.push(value);
                }
            }
        }
    }

    /// Merge a new match into an optional slot: the first write stores the
    /// value as is, later writes append.
    pub fn merge_into(slot: &mut Option<PropertyValue>, value: PropertyValue) {
        match slot {
            Some(existing) => existing.extend(value),
            None => *slot = Some(value),
        }
    }

    /// All values in order.
    pub fn values(&self) -> &[Value] {
        match self {
            Self::Single(value) => std::slice::from_ref(value),
            Self::List(values) => values,
        }
    }

    /// The value when exactly one was matched.
    pub fn as_single(&self) -> Option<&Value> {
        match self {
            Self::Single(value) => Some(value),
            Self::List(_) => None,
        }
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        Self::Single(value)
    }
}

impl ToCss for PropertyValue {
    /// Values are joined with spaces. No space goes before `,` or `)`,
    /// after `(`, or between a keyword and the `(` that opens its arguments.
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        let mut previous: Option<&Value> = None;
        for value in self.values() {
            if let Some(prev) = previous {
                let tight = value.is_punctuation(",")
                    || value.is_punctuation(")")
                    || prev.is_punctuation("(")
                    || (value.is_punctuation("(") && prev.as_keyword().is_some());
                if !tight {
                    dest.write_char(' ')?;
                }
            }
            value.to_css(dest)?;
            previous = Some(value);
        }
        Ok(())
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}

impl Interpolate for PropertyValue {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        match (self, to) {
            (Self::Single(a), Self::Single(b)) => Self::Single(a.lerp(b, t)),
            (Self::List(a), Self::List(b)) if a.len() == b.len() => {
                Self::List(a.iter().zip(b).map(|(x, y)| x.lerp(y, t)).collect())
            }
            _ if t < 0.5 => self.clone(),
            _ => to.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_write_is_scalar_then_list() {
        let mut slot = None;
        PropertyValue::merge_into(&mut slot, Value::keyword("a").into());
        assert_eq!(slot, Some(PropertyValue::Single(Value::keyword("a"))));
        PropertyValue::merge_into(&mut slot, Value::keyword("b").into());
        PropertyValue::merge_into(
            &mut slot,
            PropertyValue::List(vec![Value::keyword("c"), Value::keyword("d")]),
        );
        let slot = slot.unwrap();
        assert_eq!(slot.len(), 4);
        assert_eq!(slot.to_css_string(), "a b c d");
    }

    #[test]
    fn punctuation_spacing() {
        let value = PropertyValue::List(vec![
            Value::keyword("steps"),
            Value::keyword("("),
            Value::Number(Number(4.0)),
            Value::keyword(","),
            Value::keyword("end"),
            Value::keyword(")"),
            Value::keyword(","),
            Value::Length(Length::new(2.0, LengthUnit::S)),
        ]);
        assert_eq!(value.to_css_string(), "steps(4, end), 2s");
    }

    #[test]
    fn mixed_kinds_step() {
        let a = Value::Length(Length::px(1.0));
        let b = Value::Percentage(Percentage(50.0));
        assert_eq!(a.lerp(&b, 0.2), a);
        assert_eq!(a.lerp(&b, 0.8), b);
    }

    #[test]
    fn list_lerp() {
        let a = PropertyValue::List(vec![Value::Number(Number(0.0)), Value::keyword("x")]);
        let b = PropertyValue::List(vec![Value::Number(Number(10.0)), Value::keyword("x")]);
        assert_eq!(
            a.lerp(&b, 0.5).values()[0],
            Value::Number(Number(5.0))
        );
    }
}
