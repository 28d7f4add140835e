//! Numeric leaf values: lengths and other dimensions, percentages, numbers.

use std::fmt;

use cssparser::ToCss;

use super::Interpolate;
use crate::lexer::{Lexer, TokenKind};

/// The family a [`LengthUnit`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitCategory {
    /// Distances (`px`, `em`, `vw`, ...).
    Length,
    /// Rotations (`deg`, `rad`, `grad`, `turn`).
    Angle,
    /// Durations (`s`, `ms`).
    Time,
    /// Frequencies (`hz`, `khz`).
    Frequency,
    /// Output resolutions (`dpi`, `dpcm`, `dppx`).
    Resolution,
    /// Grid fractions (`fr`).
    Flex,
}

macro_rules! units {
    ($($variant:ident => $text:literal, $category:ident;)*) => {
        /// A dimension unit.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum LengthUnit {
            $(
                #[doc = concat!("`", $text, "`")]
                $variant,
            )*
        }

        impl LengthUnit {
            /// Look up a unit by its (case-insensitive) CSS spelling.
            pub fn from_ident(ident: &str) -> Option<Self> {
                $(
                    if ident.eq_ignore_ascii_case($text) {
                        return Some(Self::$variant);
                    }
                )*
                None
            }

            /// The canonical CSS spelling.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)*
                }
            }

            /// The family this unit measures.
            pub fn category(self) -> UnitCategory {
                match self {
                    $(Self::$variant => UnitCategory::$category,)*
                }
            }
        }
    };
}

units! {
    Px => "px", Length;
    Mm => "mm", Length;
    Cm => "cm", Length;
    In => "in", Length;
    Pt => "pt", Length;
    Pc => "pc", Length;
    Q => "q", Length;
    Em => "em", Length;
    Ex => "ex", Length;
    Ch => "ch", Length;
    Rem => "rem", Length;
    Vw => "vw", Length;
    Vh => "vh", Length;
    Vmin => "vmin", Length;
    Vmax => "vmax", Length;
    Deg => "deg", Angle;
    Rad => "rad", Angle;
    Grad => "grad", Angle;
    Turn => "turn", Angle;
    S => "s", Time;
    Ms => "ms", Time;
    Hz => "hz", Frequency;
    Khz => "khz", Frequency;
    Dpi => "dpi", Resolution;
    Dpcm => "dpcm", Resolution;
    Dppx => "dppx", Resolution;
    Fr => "fr", Flex;
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A number with a unit, e.g. `12px`, `90deg` or `0.3s`.
///
/// # Example
///
/// ```
/// use horizon_lattice_grammar::lexer::Lexer;
/// use horizon_lattice_grammar::types::{Length, LengthUnit};
///
/// let length = Length::parse(&mut Lexer::new("1.5em")).unwrap();
/// assert_eq!(length, Length::new(1.5, LengthUnit::Em));
/// assert_eq!(length.to_px(16.0, 16.0), 24.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    /// Magnitude.
    pub value: f32,
    /// Unit.
    pub unit: LengthUnit,
}

impl Length {
    /// Create a length.
    pub fn new(value: f32, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    /// Create a pixel length.
    pub fn px(value: f32) -> Self {
        Self::new(value, LengthUnit::Px)
    }

    /// Parse a dimension of the distance family.
    pub fn parse(lexer: &mut Lexer<'_>) -> Option<Self> {
        Self::parse_category(lexer, UnitCategory::Length)
    }

    /// Parse a dimension whose unit belongs to `category`.
    pub fn parse_category(lexer: &mut Lexer<'_>, category: UnitCategory) -> Option<Self> {
        let mut probe = lexer.copy();
        let value = scan_number(&mut probe)?;
        if probe.kind() != TokenKind::Identifier {
            return None;
        }
        let unit = LengthUnit::from_ident(probe.text()).filter(|u| u.category() == category)?;
        if probe.offset() != value.end {
            return None;
        }
        probe.next();
        lexer.sync(&probe);
        Some(Self::new(value.value, unit))
    }

    /// Resolve absolute and font-relative units to pixels.
    ///
    /// Viewport units and non-distance units resolve to their bare value.
    pub fn to_px(&self, font_size: f32, root_font_size: f32) -> f32 {
        let v = self.value;
        match self.unit {
            LengthUnit::Px => v,
            LengthUnit::In => v * 96.0,
            LengthUnit::Cm => v * 96.0 / 2.54,
            LengthUnit::Mm => v * 96.0 / 25.4,
            LengthUnit::Q => v * 96.0 / 101.6,
            LengthUnit::Pt => v * 96.0 / 72.0,
            LengthUnit::Pc => v * 16.0,
            LengthUnit::Em => v * font_size,
            LengthUnit::Ex | LengthUnit::Ch => v * font_size * 0.5,
            LengthUnit::Rem => v * root_font_size,
            _ => v,
        }
    }

    /// Angle in radians, for angle units.
    pub fn to_radians(&self) -> Option<f32> {
        let v = self.value;
        match self.unit {
            LengthUnit::Deg => Some(v.to_radians()),
            LengthUnit::Rad => Some(v),
            LengthUnit::Grad => Some(v * std::f32::consts::PI / 200.0),
            LengthUnit::Turn => Some(v * std::f32::consts::TAU),
            _ => None,
        }
    }
}

impl ToCss for Length {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        write_number(self.value, dest)?;
        dest.write_str(self.unit.as_str())
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}

impl Interpolate for Length {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        if self.unit != to.unit {
            return if t < 0.5 { *self } else { *to };
        }
        Self::new(self.value + (to.value - self.value) * t, self.unit)
    }
}

/// A percentage such as `50%`. The payload is the number before the sign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percentage(pub f32);

impl Percentage {
    /// Parse a number immediately followed by `%`.
    pub fn parse(lexer: &mut Lexer<'_>) -> Option<Self> {
        let mut probe = lexer.copy();
        let value = scan_number(&mut probe)?;
        if probe.text() != "%" || probe.offset() != value.end {
            return None;
        }
        probe.next();
        lexer.sync(&probe);
        Some(Self(value.value))
    }

    /// The percentage as a fraction (`50%` is `0.5`).
    pub fn fraction(&self) -> f32 {
        self.0 / 100.0
    }
}

impl ToCss for Percentage {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        write_number(self.0, dest)?;
        dest.write_char('%')
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}

impl Interpolate for Percentage {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        Self(self.0 + (to.0 - self.0) * t)
    }
}

/// A unitless number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Number(pub f32);

impl Number {
    /// Parse a plain number. A number followed directly by a unit or `%` is
    /// a dimension and is rejected.
    pub fn parse(lexer: &mut Lexer<'_>) -> Option<Self> {
        let mut probe = lexer.copy();
        let value = scan_number(&mut probe)?;
        if probe.offset() == value.end
            && (probe.kind() == TokenKind::Identifier || probe.text() == "%")
        {
            return None;
        }
        lexer.sync(&probe);
        Some(Self(value.value))
    }

    /// Parse a number without a fraction or exponent.
    pub fn parse_integer(lexer: &mut Lexer<'_>) -> Option<Self> {
        let mut probe = lexer.copy();
        let digits = if matches!(probe.text(), "-" | "+") {
            probe.peek()
        } else {
            probe.copy()
        };
        if digits.text().contains(['.', 'e', 'E']) {
            return None;
        }
        let value = Self::parse(&mut probe)?;
        lexer.sync(&probe);
        Some(value)
    }
}

impl ToCss for Number {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        write_number(self.0, dest)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}

impl Interpolate for Number {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        Self(self.0 + (to.0 - self.0) * t)
    }
}

pub(crate) struct ScannedNumber {
    pub value: f32,
    /// Byte offset just past the digits.
    pub end: usize,
}

/// Read an optionally signed number token and leave `lexer` on the token
/// after it. The sign must touch the digits.
pub(crate) fn scan_number(lexer: &mut Lexer<'_>) -> Option<ScannedNumber> {
    let negative = match lexer.text() {
        "-" => true,
        "+" => false,
        _ => {
            if lexer.kind() != TokenKind::Number {
                return None;
            }
            let value = lexer.text().parse::<f32>().ok()?;
            let end = lexer.token_end();
            lexer.next();
            return Some(ScannedNumber { value, end });
        }
    };
    let sign = lexer.copy();
    lexer.next();
    if lexer.kind() != TokenKind::Number || !lexer.is_adjacent_to(&sign) {
        return None;
    }
    let value = lexer.text().parse::<f32>().ok()?;
    let end = lexer.token_end();
    lexer.next();
    Some(ScannedNumber {
        value: if negative { -value } else { value },
        end,
    })
}

/// Serialize a number without a trailing `.0` and without negative zero.
pub(crate) fn write_number<W: fmt::Write>(value: f32, dest: &mut W) -> fmt::Result {
    if value == 0.0 {
        dest.write_char('0')
    } else {
        write!(dest, "{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_units() {
        let mut lexer = Lexer::new("12px 90deg -2.5rem");
        assert_eq!(Length::parse(&mut lexer), Some(Length::px(12.0)));
        assert_eq!(Length::parse(&mut lexer), None);
        assert_eq!(
            Length::parse_category(&mut lexer, UnitCategory::Angle),
            Some(Length::new(90.0, LengthUnit::Deg))
        );
        assert_eq!(Length::parse(&mut lexer), Some(Length::new(-2.5, LengthUnit::Rem)));
        assert!(lexer.is_end());
    }

    #[test]
    fn unit_must_touch_number() {
        let mut lexer = Lexer::new("12 px");
        assert_eq!(Length::parse(&mut lexer), None);
        assert_eq!(lexer.text(), "12");
    }

    #[test]
    fn unknown_unit_is_rejected() {
        assert_eq!(Length::parse(&mut Lexer::new("12furlongs")), None);
    }

    #[test]
    fn percentage_and_number() {
        let mut lexer = Lexer::new("50% 3 -4 7px");
        assert_eq!(Percentage::parse(&mut lexer), Some(Percentage(50.0)));
        assert_eq!(Number::parse(&mut lexer), Some(Number(3.0)));
        assert_eq!(Number::parse(&mut lexer), Some(Number(-4.0)));
        assert_eq!(Number::parse(&mut lexer), None);
        assert_eq!(lexer.text(), "7");
    }

    #[test]
    fn integers_reject_fractions() {
        assert_eq!(Number::parse_integer(&mut Lexer::new("4")), Some(Number(4.0)));
        assert_eq!(Number::parse_integer(&mut Lexer::new("-4")), Some(Number(-4.0)));
        assert_eq!(Number::parse_integer(&mut Lexer::new("4.5")), None);
    }

    #[test]
    fn detached_sign_is_not_a_number() {
        let mut lexer = Lexer::new("- 4");
        assert_eq!(Number::parse(&mut lexer), None);
        assert_eq!(lexer.text(), "-");
    }

    #[test]
    fn serialization() {
        assert_eq!(Length::px(12.0).to_css_string(), "12px");
        assert_eq!(Length::new(0.5, LengthUnit::S).to_css_string(), "0.5s");
        assert_eq!(Percentage(-0.0).to_css_string(), "0%");
        assert_eq!(Number(1.25).to_string(), "1.25");
    }

    #[test]
    fn round_trips() {
        for text in ["12px", "-3.5em", "90deg", "250ms", "1fr", "2dppx"] {
            let mut lexer = Lexer::new(text);
            let category = LengthUnit::from_ident(text.trim_start_matches(|c: char| {
                c.is_ascii_digit() || c == '.' || c == '-'
            }))
            .unwrap()
            .category();
            let parsed = Length::parse_category(&mut lexer, category).unwrap();
            let again = Length::parse_category(&mut Lexer::new(&parsed.to_css_string()), category);
            assert_eq!(again, Some(parsed));
        }
    }

    #[test]
    fn lerp_keeps_unit() {
        let a = Length::px(0.0);
        let b = Length::px(10.0);
        assert_eq!(a.lerp(&b, 0.5), Length::px(5.0));
        let em = Length::new(2.0, LengthUnit::Em);
        assert_eq!(a.lerp(&em, 0.25), a);
    }

    #[test]
    fn absolute_units_to_px() {
        assert_eq!(Length::new(1.0, LengthUnit::In).to_px(16.0, 16.0), 96.0);
        assert_eq!(Length::new(2.0, LengthUnit::Rem).to_px(10.0, 16.0), 32.0);
    }
}
