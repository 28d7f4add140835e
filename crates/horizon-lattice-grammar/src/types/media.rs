//! Media feature values and the environment they are tested against.

use std::fmt;

use cssparser::ToCss;

use super::length::Length;
use crate::lexer::Lexer;

/// The dimension a media feature measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaAxis {
    Width,
    Height,
    DeviceWidth,
    DeviceHeight,
}

impl MediaAxis {
    /// The feature name without a `min-`/`max-` prefix.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Height => "height",
            Self::DeviceWidth => "device-width",
            Self::DeviceHeight => "device-height",
        }
    }
}

/// How a media feature compares the environment with its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaComparison {
    /// The dimension equals the length.
    Exact,
    /// `min-*`: the dimension is at least the length.
    Min,
    /// `max-*`: the dimension is at most the length.
    Max,
}

/// The host state media queries are evaluated against.
pub trait MediaEnvironment {
    /// Viewport width in pixels.
    fn viewport_width(&self) -> f32;
    /// Viewport height in pixels.
    fn viewport_height(&self) -> f32;

    /// Screen width in pixels.
    fn device_width(&self) -> f32 {
        self.viewport_width()
    }

    /// Screen height in pixels.
    fn device_height(&self) -> f32 {
        self.viewport_height()
    }

    /// Font size used to resolve relative units.
    fn font_size(&self) -> f32 {
        16.0
    }

    /// Media type such as `screen` or `print`.
    fn media_type(&self) -> &str {
        "screen"
    }
}

/// A fixed-size [`MediaEnvironment`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl MediaEnvironment for Viewport {
    fn viewport_width(&self) -> f32 {
        self.width
    }

    fn viewport_height(&self) -> f32 {
        self.height
    }
}

/// A sized media feature such as `min-width: 600px`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaFeature {
    pub axis: MediaAxis,
    pub comparison: MediaComparison,
    pub length: Length,
}

impl MediaFeature {
    /// Parse the length operand of a feature.
    pub fn parse(
        lexer: &mut Lexer<'_>,
        axis: MediaAxis,
        comparison: MediaComparison,
    ) -> Option<Self> {
        let length = Length::parse(lexer)?;
        Some(Self {
            axis,
            comparison,
            length,
        })
    }

    /// Whether `env` satisfies this feature.
    pub fn matches(&self, env: &dyn MediaEnvironment) -> bool {
        let actual = match self.axis {
            MediaAxis::Width => env.viewport_width(),
            MediaAxis::Height => env.viewport_height(),
            MediaAxis::DeviceWidth => env.device_width(),
            MediaAxis::DeviceHeight => env.device_height(),
        };
        let font_size = env.font_size();
        let target = self.length.to_px(font_size, font_size);
        match self.comparison {
            MediaComparison::Exact => (actual - target).abs() < f32::EPSILON,
            MediaComparison::Min => actual >= target,
            MediaComparison::Max => actual <= target,
        }
    }
}

impl ToCss for MediaFeature {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        self.length.to_css(dest)
    }
}

impl fmt::Display for MediaFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(comparison: MediaComparison, px: f32) -> MediaFeature {
        MediaFeature {
            axis: MediaAxis::Width,
            comparison,
            length: Length::px(px),
        }
    }

    #[test]
    fn min_and_max_are_inclusive_bounds() {
        let env = Viewport::new(800.0, 600.0);
        assert!(feature(MediaComparison::Min, 600.0).matches(&env));
        assert!(!feature(MediaComparison::Min, 900.0).matches(&env));
        assert!(feature(MediaComparison::Max, 800.0).matches(&env));
        assert!(!feature(MediaComparison::Max, 700.0).matches(&env));
        assert!(feature(MediaComparison::Exact, 800.0).matches(&env));
    }

    #[test]
    fn relative_lengths_use_font_size() {
        let env = Viewport::new(320.0, 480.0);
        let em = MediaFeature {
            axis: MediaAxis::Width,
            comparison: MediaComparison::Min,
            length: Length::new(20.0, crate::types::LengthUnit::Em),
        };
        assert!(em.matches(&env));
    }

    #[test]
    fn parses_length_operand() {
        let mut lexer = Lexer::new("600px");
        let parsed = MediaFeature::parse(&mut lexer, MediaAxis::Height, MediaComparison::Max).unwrap();
        assert_eq!(parsed.length, Length::px(600.0));
        assert!(lexer.is_end());
        assert_eq!(parsed.to_css_string(), "600px");
    }
}
