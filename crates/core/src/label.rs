//! Tile label geometry: orientation, anchor, and fit-to-width truncation.

/// Suffix appended to truncated labels.
pub const ELLIPSIS: &str = "...";

/// Space kept free between a label and the far edge of its tile.
const LABEL_MARGIN: f64 = 10.0;

/// Measures rendered text on some surface.
pub trait TextMetrics {
    fn text_width(&self, text: &str, font_size: f64) -> f64;
}

impl<T: TextMetrics + ?Sized> TextMetrics for &T {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        (**self).text_width(text, font_size)
    }
}

/// Fixed advance per character, expressed as a fraction of the font size.
///
/// Good enough for headless output where no font is loaded.
#[derive(Clone, Copy, Debug)]
pub struct AverageCharWidth {
    pub em_ratio: f64,
}

impl Default for AverageCharWidth {
    fn default() -> Self {
        Self { em_ratio: 0.6 }
    }
}

impl TextMetrics for AverageCharWidth {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size * self.em_ratio
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    /// Narrow, tall tile; the label runs top to bottom.
    Vertical,
}

impl Orientation {
    pub fn of(width: f64, height: f64) -> Self {
        if width * 1.7 < height {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }

    /// Room available along the reading direction.
    pub fn available(self, width: f64, height: f64) -> f64 {
        match self {
            Orientation::Vertical => height - LABEL_MARGIN,
            Orientation::Horizontal => width - LABEL_MARGIN,
        }
    }

    pub fn rotation(self) -> f64 {
        match self {
            Orientation::Vertical => 90.0,
            Orientation::Horizontal => 0.0,
        }
    }
}

/// Text origin for a tile whose top-left corner is `(x0, y0)`.
pub fn label_anchor(x0: f64, y0: f64, orientation: Orientation) -> (f64, f64) {
    match orientation {
        Orientation::Vertical => (x0 + 10.0, y0 + 10.0),
        Orientation::Horizontal => (x0 + 10.0, y0 + 20.0),
    }
}

/// Shortens `name` one character at a time, suffixing [`ELLIPSIS`], until
/// it fits inside a `width` x `height` tile.
///
/// A name that already fits is returned unchanged. When every character has
/// been dropped the result is the bare ellipsis, even if that still overflows.
/// The result is never wider than `name` itself: very short names that would
/// only grow by ellipsizing are kept as they are.
pub fn truncate_label(
    name: &str,
    width: f64,
    height: f64,
    font_size: f64,
    metrics: &impl TextMetrics,
) -> String {
    let limit = Orientation::of(width, height).available(width, height);
    let mut kept: Vec<char> = name.chars().collect();
    let mut shown = name.to_string();

    while metrics.text_width(&shown, font_size) > limit && !kept.is_empty() {
        kept.pop();
        shown = kept.iter().collect::<String>() + ELLIPSIS;
    }
    if metrics.text_width(&shown, font_size) > metrics.text_width(name, font_size) {
        return name.to_string();
    }
    shown
}
