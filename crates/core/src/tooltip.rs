use std::fmt::Write;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// What a tile reports when hovered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipContent {
    pub name: String,
    pub category: String,
    pub value: f64,
}

impl TooltipContent {
    pub fn lines(&self) -> [String; 3] {
        [
            format!("name: {}", self.name),
            format!("category: {}", self.category),
            format!("value: {}", self.value),
        ]
    }

    pub fn html(&self) -> String {
        let mut out = String::new();
        for line in self.lines() {
            let _ = write!(out, "<div>{}</div>", escape_html(&line));
        }
        out
    }
}

/// Floating info box driven by pointer events.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Tooltip {
    #[default]
    Hidden,
    Shown {
        content: TooltipContent,
        position: Point,
    },
}

impl Tooltip {
    /// Pointer moved over a tile: replace content and follow the pointer.
    pub fn on_move(&mut self, pointer: Point, content: TooltipContent, offset: f64) {
        *self = Tooltip::Shown {
            content,
            position: Point::new(pointer.x + offset, pointer.y + offset),
        };
    }

    pub fn on_out(&mut self) {
        *self = Tooltip::Hidden;
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, Tooltip::Shown { .. })
    }

    pub fn content(&self) -> Option<&TooltipContent> {
        match self {
            Tooltip::Shown { content, .. } => Some(content),
            Tooltip::Hidden => None,
        }
    }

    pub fn position(&self) -> Option<Point> {
        match self {
            Tooltip::Shown { position, .. } => Some(*position),
            Tooltip::Hidden => None,
        }
    }
}

pub(crate) fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(name: &str) -> TooltipContent {
        TooltipContent {
            name: name.into(),
            category: "Wii".into(),
            value: 82.53,
        }
    }

    #[test]
    fn starts_hidden() {
        let tip = Tooltip::default();
        assert!(!tip.is_visible());
        assert!(tip.content().is_none());
    }

    #[test]
    fn move_shows_with_offset() {
        let mut tip = Tooltip::default();
        tip.on_move(Point::new(100.0, 50.0), content("Wii Sports"), 10.0);
        assert!(tip.is_visible());
        assert_eq!(tip.position(), Some(Point::new(110.0, 60.0)));
    }

    #[test]
    fn last_write_wins() {
        let mut tip = Tooltip::default();
        tip.on_move(Point::new(1.0, 1.0), content("Wii Sports"), 10.0);
        tip.on_move(Point::new(5.0, 7.0), content("Wii Fit"), 10.0);
        assert_eq!(tip.content().map(|c| c.name.as_str()), Some("Wii Fit"));
        assert_eq!(tip.position(), Some(Point::new(15.0, 17.0)));
    }

    #[test]
    fn out_hides() {
        let mut tip = Tooltip::default();
        tip.on_move(Point::new(1.0, 1.0), content("Wii Sports"), 10.0);
        tip.on_out();
        assert_eq!(tip, Tooltip::Hidden);
    }

    #[test]
    fn html_lists_three_fields() {
        assert_eq!(
            content("Mario & Sonic").html(),
            "<div>name: Mario &amp; Sonic</div><div>category: Wii</div><div>value: 82.53</div>"
        );
    }
}
