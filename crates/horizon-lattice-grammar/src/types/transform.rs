//! 2D transforms reduced to translation, scale and rotation.

use std::fmt;

use cssparser::ToCss;

use super::length::{scan_number, write_number, Length, UnitCategory};
use super::Interpolate;
use crate::lexer::{Lexer, TokenKind};

/// A 2D transform, kept as the affine matrix `matrix(a, b, c, d, e, f)`.
///
/// Any run of `matrix`, `translate*`, `scale*` and `rotate` functions is
/// folded into a translation, a scale and a rotation; later functions
/// overwrite the components they name. The components are read back by
/// decomposing the matrix.
///
/// # Example
///
/// ```
/// use horizon_lattice_grammar::lexer::Lexer;
/// use horizon_lattice_grammar::types::Transform2D;
///
/// let t = Transform2D::parse(&mut Lexer::new("translate(10px, 20px) scale(2)")).unwrap();
/// assert_eq!((t.px(), t.py(), t.sx(), t.sy()), (10.0, 20.0, 2.0, 2.0));
/// assert_eq!(t.to_string(), "matrix(2, 0, 0, 2, 10, 20)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    matrix: [f32; 6],
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Translation, scale and rotation (radians).
#[derive(Debug, Clone, Copy, PartialEq)]
struct Parts {
    px: f32,
    py: f32,
    sx: f32,
    sy: f32,
    r: f32,
}

impl Parts {
    const IDENTITY: Self = Self {
        px: 0.0,
        py: 0.0,
        sx: 1.0,
        sy: 1.0,
        r: 0.0,
    };

    fn of([a, b, c, d, e, f]: [f32; 6]) -> Self {
        Self {
            px: e,
            py: f,
            sx: a.hypot(b),
            sy: c.hypot(d),
            r: (-b).atan2(a),
        }
    }

    fn matrix(&self) -> [f32; 6] {
        let (sin, cos) = self.r.sin_cos();
        [
            cos * self.sx,
            -sin * self.sx,
            self.sy * sin,
            self.sy * cos,
            self.px,
            self.py,
        ]
    }
}

impl Transform2D {
    pub const IDENTITY: Self = Self {
        matrix: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    };

    /// A transform from a translation, a scale and a rotation in radians.
    pub fn new(px: f32, py: f32, sx: f32, sy: f32, r: f32) -> Self {
        Self::from_parts(Parts { px, py, sx, sy, r })
    }

    fn from_parts(parts: Parts) -> Self {
        Self {
            matrix: parts.matrix(),
        }
    }

    /// The transform with the affine matrix `[a, b, c, d, e, f]`.
    pub fn from_matrix(matrix: [f32; 6]) -> Self {
        Self { matrix }
    }

    /// The affine matrix `[a, b, c, d, e, f]`.
    pub fn to_matrix(&self) -> [f32; 6] {
        self.matrix
    }

    /// Horizontal translation.
    pub fn px(&self) -> f32 {
        self.matrix[4]
    }

    /// Vertical translation.
    pub fn py(&self) -> f32 {
        self.matrix[5]
    }

    /// Horizontal scale.
    pub fn sx(&self) -> f32 {
        Parts::of(self.matrix).sx
    }

    /// Vertical scale.
    pub fn sy(&self) -> f32 {
        Parts::of(self.matrix).sy
    }

    /// Rotation in radians, in `(-pi, pi]`.
    pub fn r(&self) -> f32 {
        Parts::of(self.matrix).r
    }

    /// Parse one or more transform functions.
    pub fn parse(lexer: &mut Lexer<'_>) -> Option<Self> {
        let mut parts = Parts::IDENTITY;
        // a trailing `matrix()` is kept verbatim
        let mut exact = None;
        let mut cursor = lexer.copy();
        let mut matched = false;
        while cursor.kind() == TokenKind::Identifier {
            let mut step = cursor.copy();
            let Some(matrix) = apply_function(&mut parts, &mut step) else {
                break;
            };
            exact = matrix;
            cursor.sync(&step);
            matched = true;
        }
        if !matched {
            return None;
        }
        lexer.sync(&cursor);
        Some(exact.map_or_else(|| Self::from_parts(parts), Self::from_matrix))
    }

    /// Map a point in world space into this transform's local space.
    pub fn to_local(&self, x: f32, y: f32) -> (f32, f32) {
        let parts = Parts::of(self.matrix);
        ((x - parts.px) / parts.sx, (y - parts.py) / parts.sy)
    }
}

/// Apply one function to `parts`. `Some(Some(m))` when it was `matrix(...)`.
fn apply_function(parts: &mut Parts, lexer: &mut Lexer<'_>) -> Option<Option<[f32; 6]>> {
    let name = lexer.text().to_ascii_lowercase();
    let start = lexer.copy();
    lexer.next();
    if lexer.text() != "(" || !lexer.is_adjacent_to(&start) {
        return None;
    }
    lexer.next();
    let args = arguments(lexer)?;
    match (name.as_str(), args.as_slice()) {
        ("matrix", [a, b, c, d, e, f]) => {
            let matrix = [*a, *b, *c, *d, *e, *f];
            *parts = Parts::of(matrix);
            return Some(Some(matrix));
        }
        ("translate", [x]) => parts.px = *x,
        ("translate", [x, y]) => (parts.px, parts.py) = (*x, *y),
        ("translatex", [x]) => parts.px = *x,
        ("translatey", [y]) => parts.py = *y,
        ("scale", [s]) => (parts.sx, parts.sy) = (*s, *s),
        ("scale", [x, y]) => (parts.sx, parts.sy) = (*x, *y),
        ("scalex", [x]) => parts.sx = *x,
        ("scaley", [y]) => parts.sy = *y,
        ("rotate", [r]) => parts.r = *r,
        _ => return None,
    }
    Some(None)
}

/// Comma separated numbers, lengths or angles up to the closing `)`.
fn arguments(lexer: &mut Lexer<'_>) -> Option<Vec<f32>> {
    let mut values = Vec::new();
    loop {
        if let Some(angle) = Length::parse_category(lexer, UnitCategory::Angle) {
            values.push(angle.to_radians()?);
        } else if let Some(length) = Length::parse(lexer) {
            values.push(length.value);
        } else {
            values.push(scan_number(lexer)?.value);
        }
        match lexer.text() {
            "," => {
                lexer.next();
            }
            ")" => {
                lexer.next();
                return Some(values);
            }
            _ => return None,
        }
    }
}

impl ToCss for Transform2D {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str("matrix(")?;
        for (i, v) in self.matrix.into_iter().enumerate() {
            if i > 0 {
                dest.write_str(", ")?;
            }
            write_number(v, dest)?;
        }
        dest.write_char(')')
    }
}

impl fmt::Display for Transform2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}

impl Interpolate for Transform2D {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        let (from, to) = (Parts::of(self.matrix), Parts::of(to.matrix));
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self::from_parts(Parts {
            px: mix(from.px, to.px),
            py: mix(from.py, to.py),
            sx: mix(from.sx, to.sx),
            sy: mix(from.sy, to.sy),
            r: mix(from.r, to.r),
        })
    }
}
