//! Named terminal parsers that grammars refer to as `<name>`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{
    Color, CssString, CssUrl, CubicBezier, FontName, Gradient, Identifier, Length, MediaAxis,
    MediaComparison, MediaFeature, Number, Path, Percentage, Shape, Transform2D, UnitCategory,
    Value,
};
use crate::lexer::Lexer;

/// A terminal grammar that consumes tokens directly.
///
/// Implementations must leave the lexer untouched when they return `None`.
pub trait LeafParser: fmt::Debug + Send + Sync {
    /// Name used in notations, without angle brackets.
    fn name(&self) -> &str;

    /// Parse a value at the lexer's position.
    fn parse(&self, lexer: &mut Lexer<'_>) -> Option<Value>;

    /// Whether `candidate` is exactly one value of this kind.
    fn verify(&self, candidate: &str) -> bool {
        let mut lexer = Lexer::new(candidate);
        self.parse(&mut lexer).is_some() && lexer.is_end()
    }
}

/// The value kinds the crate parses natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    Color,
    Dimension(UnitCategory),
    Percentage,
    Number,
    Integer,
    Url,
    String,
    Identifier,
    Shape,
    CubicBezier,
    Gradient,
    Transform,
    Path,
    FontName,
    Media(MediaAxis, MediaComparison),
}

impl LeafKind {
    /// Parse a value of this kind.
    pub fn parse(self, lexer: &mut Lexer<'_>) -> Option<Value> {
        match self {
            Self::Color => Color::parse(lexer).map(Value::Color),
            Self::Dimension(category) => Length::parse_category(lexer, category).map(Value::Length),
            Self::Percentage => Percentage::parse(lexer).map(Value::Percentage),
            Self::Number => Number::parse(lexer).map(Value::Number),
            Self::Integer => Number::parse_integer(lexer).map(Value::Number),
            Self::Url => CssUrl::parse(lexer).map(Value::Url),
            Self::String => CssString::parse(lexer).map(Value::String),
            Self::Identifier => Identifier::parse(lexer).map(Value::Identifier),
            Self::Shape => Shape::parse(lexer).map(Value::Shape),
            Self::CubicBezier => CubicBezier::parse(lexer).map(Value::CubicBezier),
            Self::Gradient => Gradient::parse(lexer).map(Value::Gradient),
            Self::Transform => Transform2D::parse(lexer).map(Value::Transform),
            Self::Path => Path::parse(lexer).map(Value::Path),
            Self::FontName => FontName::parse(lexer).map(Value::FontName),
            Self::Media(axis, comparison) => {
                MediaFeature::parse(lexer, axis, comparison).map(Value::MediaFeature)
            }
        }
    }
}

#[derive(Debug)]
struct Builtin {
    name: &'static str,
    kind: LeafKind,
}

impl LeafParser for Builtin {
    fn name(&self) -> &str {
        self.name
    }

    fn parse(&self, lexer: &mut Lexer<'_>) -> Option<Value> {
        self.kind.parse(lexer)
    }
}

const BUILTINS: &[(&str, LeafKind)] = {
    use MediaAxis::*;
    use MediaComparison::*;
    &[
        ("color", LeafKind::Color),
        ("length", LeafKind::Dimension(UnitCategory::Length)),
        ("time", LeafKind::Dimension(UnitCategory::Time)),
        ("flex", LeafKind::Dimension(UnitCategory::Flex)),
        ("angle", LeafKind::Dimension(UnitCategory::Angle)),
        ("frequency", LeafKind::Dimension(UnitCategory::Frequency)),
        ("resolution", LeafKind::Dimension(UnitCategory::Resolution)),
        ("percentage", LeafKind::Percentage),
        ("number", LeafKind::Number),
        ("integer", LeafKind::Integer),
        ("url", LeafKind::Url),
        ("uri", LeafKind::Url),
        ("string", LeafKind::String),
        ("id", LeafKind::Identifier),
        ("identifier", LeafKind::Identifier),
        ("custom_ident", LeafKind::Identifier),
        ("shape", LeafKind::Shape),
        ("cubic_bezier", LeafKind::CubicBezier),
        ("gradient", LeafKind::Gradient),
        ("transform2D", LeafKind::Transform),
        ("path", LeafKind::Path),
        ("fontname", LeafKind::FontName),
        ("m_width", LeafKind::Media(Width, Exact)),
        ("m_min_width", LeafKind::Media(Width, Min)),
        ("m_max_width", LeafKind::Media(Width, Max)),
        ("m_height", LeafKind::Media(Height, Exact)),
        ("m_min_height", LeafKind::Media(Height, Min)),
        ("m_max_height", LeafKind::Media(Height, Max)),
        ("m_device_width", LeafKind::Media(DeviceWidth, Exact)),
        ("m_min_device_width", LeafKind::Media(DeviceWidth, Min)),
        ("m_max_device_width", LeafKind::Media(DeviceWidth, Max)),
        ("m_device_height", LeafKind::Media(DeviceHeight, Exact)),
        ("m_min_device_height", LeafKind::Media(DeviceHeight, Min)),
        ("m_max_device_height", LeafKind::Media(DeviceHeight, Max)),
    ]
};

/// Leaf parsers by name.
#[derive(Debug, Clone, Default)]
pub struct LeafRegistry {
    parsers: HashMap<String, Arc<dyn LeafParser>>,
}

impl LeafRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every builtin leaf.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for &(name, kind) in BUILTINS {
            registry.register(Arc::new(Builtin { name, kind }));
        }
        registry
    }

    /// Add or replace a parser under its own name.
    pub fn register(&mut self, parser: Arc<dyn LeafParser>) {
        self.parsers.insert(parser.name().to_string(), parser);
    }

    /// Look up a parser.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn LeafParser>> {
        self.parsers.get(name)
    }

    /// Whether a parser is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.parsers.contains_key(name)
    }

    /// Registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parsers.keys().map(String::as_str)
    }
}
