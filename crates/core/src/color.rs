use std::fmt;

use serde::{Serialize, Serializer};

use crate::model::SalesNode;

/// d3 `schemeCategory10`.
pub const CATEGORY10: [Color; 10] = [
    Color::rgb(0x1f, 0x77, 0xb4),
    Color::rgb(0xff, 0x7f, 0x0e),
    Color::rgb(0x2c, 0xa0, 0x2c),
    Color::rgb(0xd6, 0x27, 0x28),
    Color::rgb(0x94, 0x67, 0xbd),
    Color::rgb(0x8c, 0x56, 0x4b),
    Color::rgb(0xe3, 0x77, 0xc2),
    Color::rgb(0x7f, 0x7f, 0x7f),
    Color::rgb(0xbc, 0xbd, 0x22),
    Color::rgb(0x17, 0xbe, 0xcf),
];

/// Opacity given to palette colors once the palette has been used up.
pub const REPEAT_OPACITY: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub opacity: f32,
}

impl Color {
    /// Fill used for tiles whose category is missing from the scale.
    pub const NEUTRAL: Color = Color::rgb(0xcc, 0xcc, 0xcc);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, opacity: 1.0 }
    }

    pub fn with_opacity(self, opacity: f32) -> Self {
        Self { opacity, ..self }
    }

    pub fn is_opaque(&self) -> bool {
        self.opacity >= 1.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.opacity)
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Ordinal mapping from top-level category name to fill color.
///
/// The domain is the root's children in dataset order; the range is parallel
/// to it. Categories beyond the palette reuse `CATEGORY10[i % 10]` at
/// [`REPEAT_OPACITY`].
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    domain: Vec<String>,
    range: Vec<Color>,
}

impl ColorScale {
    pub fn from_root(root: &SalesNode) -> Self {
        Self::from_categories(root.children().iter().map(|c| c.name.as_str()))
    }

    pub fn from_categories<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut domain: Vec<String> = Vec::new();
        for name in names {
            if !domain.iter().any(|d| d == name) {
                domain.push(name.to_string());
            }
        }
        let range = (0..domain.len()).map(palette_color).collect();
        Self { domain, range }
    }

    pub fn color_of(&self, category: &str) -> Option<Color> {
        self.domain
            .iter()
            .position(|d| d == category)
            .map(|i| self.range[i])
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn range(&self) -> &[Color] {
        &self.range
    }

    pub fn len(&self) -> usize {
        self.domain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Color)> + '_ {
        self.domain
            .iter()
            .map(String::as_str)
            .zip(self.range.iter().copied())
    }
}

fn palette_color(index: usize) -> Color {
    let base = CATEGORY10[index % CATEGORY10.len()];
    if index < CATEGORY10.len() {
        base
    } else {
        base.with_opacity(REPEAT_OPACITY)
    }
}
