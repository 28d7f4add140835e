//! Colors: hex notation, `rgb()`/`rgba()` and named colors.

use std::fmt;

use cssparser::ToCss;

use super::length::{scan_number, write_number};
use super::Interpolate;
use crate::lexer::{Lexer, TokenKind};

/// An sRGB color. Channels are in `0..=255`, alpha in `0..=1`.
///
/// # Example
///
/// ```
/// use horizon_lattice_grammar::lexer::Lexer;
/// use horizon_lattice_grammar::types::Color;
///
/// assert_eq!(Color::parse(&mut Lexer::new("red")), Some(Color::rgb(255, 0, 0)));
/// assert_eq!(Color::parse(&mut Lexer::new("#00f")), Some(Color::rgb(0, 0, 255)));
/// assert_eq!(Color::rgb(255, 0, 0).to_string(), "#ff0000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::rgba(0, 0, 0, 0.0)
    }
}

impl Color {
    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// A color with alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r: r as f32,
            g: g as f32,
            b: b as f32,
            a,
        }
    }

    /// Look up a CSS named color (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower == "transparent" {
            return Some(Self::rgba(0, 0, 0, 0.0));
        }
        named_color(&lower).map(|(r, g, b)| Self::rgb(r, g, b))
    }

    /// Parse hex digits (without the `#`).
    pub fn from_hex(digits: &str) -> Option<Self> {
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).ok();
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        match digits.len() {
            3 | 4 => {
                let r = nibble(0)? * 17;
                let g = nibble(1)? * 17;
                let b = nibble(2)? * 17;
                let a = if digits.len() == 4 { nibble(3)? * 17 } else { 255 };
                Some(Self::rgba(r, g, b, f32::from(a) / 255.0))
            }
            6 | 8 => {
                let r = byte(0)?;
                let g = byte(2)?;
                let b = byte(4)?;
                let a = if digits.len() == 8 { byte(6)? } else { 255 };
                Some(Self::rgba(r, g, b, f32::from(a) / 255.0))
            }
            _ => None,
        }
    }

    /// Parse a color from the lexer.
    pub fn parse(lexer: &mut Lexer<'_>) -> Option<Self> {
        match lexer.kind() {
            TokenKind::Symbol if lexer.text() == "#" => Self::parse_hex(lexer),
            TokenKind::Identifier => {
                let name = lexer.text();
                if name.eq_ignore_ascii_case("rgb") || name.eq_ignore_ascii_case("rgba") {
                    return Self::parse_function(lexer);
                }
                let color = Self::from_name(name)?;
                lexer.next();
                Some(color)
            }
            TokenKind::String => {
                let text = lexer.text();
                let color = Self::from_name(&text[1..text.len() - 1])?;
                lexer.next();
                Some(color)
            }
            _ => None,
        }
    }

    fn parse_hex(lexer: &mut Lexer<'_>) -> Option<Self> {
        let start = lexer.token_end();
        let digits: usize = lexer.source()[start..lexer.end()]
            .bytes()
            .take_while(u8::is_ascii_hexdigit)
            .count();
        let color = Self::from_hex(&lexer.source()[start..start + digits])?;
        lexer.seek(start + digits);
        Some(color)
    }

    fn parse_function(lexer: &mut Lexer<'_>) -> Option<Self> {
        let mut probe = lexer.copy();
        let name = probe.copy();
        probe.next();
        if probe.text() != "(" || !probe.is_adjacent_to(&name) {
            return None;
        }
        probe.next();

        let mut channels = [0u8; 3];
        for (i, channel) in channels.iter_mut().enumerate() {
            if i > 0 && probe.text() == "," {
                probe.next();
            }
            let value = scan_number(&mut probe)?;
            let scaled = if probe.text() == "%" && probe.offset() == value.end {
                probe.next();
                value.value * 255.0 / 100.0
            } else {
                value.value
            };
            *channel = scaled.round().clamp(0.0, 255.0) as u8;
        }

        let mut alpha = 1.0;
        if probe.text() == "," || probe.text() == "/" {
            probe.next();
            let value = scan_number(&mut probe)?;
            alpha = if probe.text() == "%" && probe.offset() == value.end {
                probe.next();
                value.value / 100.0
            } else {
                value.value
            };
        }
        if probe.text() != ")" {
            return None;
        }
        probe.next();
        lexer.sync(&probe);
        let [r, g, b] = channels;
        Some(Self::rgba(r, g, b, alpha.clamp(0.0, 1.0)))
    }

    /// Whether the color is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// `#rrggbb` form, ignoring alpha.
    pub fn to_hex_string(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }

    /// `rgba(r, g, b, a)` form.
    pub fn to_rgba_string(&self) -> String {
        let mut out = String::new();
        let _ = self.write_rgba(&mut out);
        out
    }

    fn write_rgba<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        write!(
            dest,
            "rgba({}, {}, {}, ",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )?;
        write_number(self.a, dest)?;
        dest.write_char(')')
    }
}

fn channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

impl ToCss for Color {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        if self.is_opaque() {
            dest.write_str(&self.to_hex_string())
        } else {
            self.write_rgba(dest)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}

impl Interpolate for Color {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        Self {
            r: self.r + (to.r - self.r) * t,
            g: self.g + (to.g - self.g) * t,
            b: self.b + (to.b - self.b) * t,
            a: self.a + (to.a - self.a) * t,
        }
    }
}

fn named_color(name: &str) -> Option<(u8, u8, u8)> {
    Some(match name {
        "aliceblue" => (240, 248, 255),
        "antiquewhite" => (250, 235, 215),
        "aqua" => (0, 255, 255),
        "aquamarine" => (127, 255, 212),
        "azure" => (240, 255, 255),
        "beige" => (245, 245, 220),
        "bisque" => (255, 228, 196),
        "black" => (0, 0, 0),
        "blanchedalmond" => (255, 235, 205),
        "blue" => (0, 0, 255),
        "blueviolet" => (138, 43, 226),
        "brown" => (165, 42, 42),
        "burlywood" => (222, 184, 135),
        "cadetblue" => (95, 158, 160),
        "chartreuse" => (127, 255, 0),
        "chocolate" => (210, 105, 30),
        "coral" => (255, 127, 80),
        "cornflowerblue" => (100, 149, 237),
        "cornsilk" => (255, 248, 220),
        "crimson" => (220, 20, 60),
        "cyan" => (0, 255, 255),
        "darkblue" => (0, 0, 139),
        "darkcyan" => (0, 139, 139),
        "darkgoldenrod" => (184, 134, 11),
        "darkgray" | "darkgrey" => (169, 169, 169),
        "darkgreen" => (0, 100, 0),
        "darkkhaki" => (189, 183, 107),
        "darkmagenta" => (139, 0, 139),
        "darkolivegreen" => (85, 107, 47),
        "darkorange" => (255, 140, 0),
        "darkorchid" => (153, 50, 204),
        "darkred" => (139, 0, 0),
        "darksalmon" => (233, 150, 122),
        "darkseagreen" => (143, 188, 143),
        "darkslateblue" => (72, 61, 139),
        "darkslategray" | "darkslategrey" => (47, 79, 79),
        "darkturquoise" => (0, 206, 209),
        "darkviolet" => (148, 0, 211),
        "deeppink" => (255, 20, 147),
        "deepskyblue" => (0, 191, 255),
        "dimgray" | "dimgrey" => (105, 105, 105),
        "dodgerblue" => (30, 144, 255),
        "firebrick" => (178, 34, 34),
        "floralwhite" => (255, 250, 240),
        "forestgreen" => (34, 139, 34),
        "fuchsia" => (255, 0, 255),
        "gainsboro" => (220, 220, 220),
        "ghostwhite" => (248, 248, 255),
        "gold" => (255, 215, 0),
        "goldenrod" => (218, 165, 32),
        "gray" | "grey" => (128, 128, 128),
        "green" => (0, 128, 0),
        "greenyellow" => (173, 255, 47),
        "honeydew" => (240, 255, 240),
        "hotpink" => (255, 105, 180),
        "indianred" => (205, 92, 92),
        "indigo" => (75, 0, 130),
        "ivory" => (255, 255, 240),
        "khaki" => (240, 230, 140),
        "lavender" => (230, 230, 250),
        "lavenderblush" => (255, 240, 245),
        "lawngreen" => (124, 252, 0),
        "lemonchiffon" => (255, 250, 205),
        "lightblue" => (173, 216, 230),
        "lightcoral" => (240, 128, 128),
        "lightcyan" => (224, 255, 255),
        "lightgoldenrodyellow" => (250, 250, 210),
        "lightgray" | "lightgrey" => (211, 211, 211),
        "lightgreen" => (144, 238, 144),
        "lightpink" => (255, 182, 193),
        "lightsalmon" => (255, 160, 122),
        "lightseagreen" => (32, 178, 170),
        "lightskyblue" => (135, 206, 250),
        "lightslategray" | "lightslategrey" => (119, 136, 153),
        "lightsteelblue" => (176, 196, 222),
        "lightyellow" => (255, 255, 224),
        "lime" => (0, 255, 0),
        "limegreen" => (50, 205, 50),
        "linen" => (250, 240, 230),
        "magenta" => (255, 0, 255),
        "maroon" => (128, 0, 0),
        "mediumaquamarine" => (102, 205, 170),
        "mediumblue" => (0, 0, 205),
        "mediumorchid" => (186, 85, 211),
        "mediumpurple" => (147, 112, 219),
        "mediumseagreen" => (60, 179, 113),
        "mediumslateblue" => (123, 104, 238),
        "mediumspringgreen" => (0, 250, 154),
        "mediumturquoise" => (72, 209, 204),
        "mediumvioletred" => (199, 21, 133),
        "midnightblue" => (25, 25, 112),
        "mintcream" => (245, 255, 250),
        "mistyrose" => (255, 228, 225),
        "moccasin" => (255, 228, 181),
        "navajowhite" => (255, 222, 173),
        "navy" => (0, 0, 128),
        "oldlace" => (253, 245, 230),
        "olive" => (128, 128, 0),
        "olivedrab" => (107, 142, 35),
        "orange" => (255, 165, 0),
        "orangered" => (255, 69, 0),
        "orchid" => (218, 112, 214),
        "palegoldenrod" => (238, 232, 170),
        "palegreen" => (152, 251, 152),
        "paleturquoise" => (175, 238, 238),
        "palevioletred" => (219, 112, 147),
        "papayawhip" => (255, 239, 213),
        "peachpuff" => (255, 218, 185),
        "peru" => (205, 133, 63),
        "pink" => (255, 192, 203),
        "plum" => (221, 160, 221),
        "powderblue" => (176, 224, 230),
        "purple" => (128, 0, 128),
        "rebeccapurple" => (102, 51, 153),
        "red" => (255, 0, 0),
        "rosybrown" => (188, 143, 143),
        "royalblue" => (65, 105, 225),
        "saddlebrown" => (139, 69, 19),
        "salmon" => (250, 128, 114),
        "sandybrown" => (244, 164, 96),
        "seagreen" => (46, 139, 87),
        "seashell" => (255, 245, 238),
        "sienna" => (160, 82, 45),
        "silver" => (192, 192, 192),
        "skyblue" => (135, 206, 235),
        "slateblue" => (106, 90, 205),
        "slategray" | "slategrey" => (112, 128, 144),
        "snow" => (255, 250, 250),
        "springgreen" => (0, 255, 127),
        "steelblue" => (70, 130, 180),
        "tan" => (210, 180, 140),
        "teal" => (0, 128, 128),
        "thistle" => (216, 191, 216),
        "tomato" => (255, 99, 71),
        "turquoise" => (64, 224, 208),
        "violet" => (238, 130, 238),
        "wheat" => (245, 222, 179),
        "white" => (255, 255, 255),
        "whitesmoke" => (245, 245, 245),
        "yellow" => (255, 255, 0),
        "yellowgreen" => (154, 205, 50),
        _ => return None,
    })
}
