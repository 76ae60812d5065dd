use std::fmt;
use std::str::FromStr;

use crate::document::DocumentRoot;
use crate::error::EditError;

/// An opaque RGB color parsed from `RRGGBB` or `#RRGGBB`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The color as a glTF `baseColorFactor`, with alpha fixed at 1.
    pub fn to_factor(self) -> [f64; 4] {
        [
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
            1.0,
        ]
    }
}

impl FromStr for Color {
    type Err = EditError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| EditError::InvalidColor {
            input: input.to_owned(),
            reason,
        };

        let digits = input.strip_prefix('#').unwrap_or(input);
        if digits.len() != 6 {
            return Err(invalid("expected 6 hex digits"));
        }
        // from_str_radix alone would let a leading '+' through.
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid("non-hex character"));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid("non-hex character"))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Sets the base color of every material that has a metallic-roughness
/// block. Materials without one are left alone. Returns how many materials
/// were changed.
pub fn apply_color(root: &mut DocumentRoot, color: Color) -> usize {
    let factor = color.to_factor();
    let mut changed = 0;
    for material in root.materials_mut() {
        if let Some(pbr) = material.pbr_metallic_roughness.as_mut() {
            pbr.base_color_factor = Some(factor);
            changed += 1;
        }
    }
    changed
}
