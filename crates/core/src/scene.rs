//! Retained-mode drawing surface: groups of rects and texts with attributes,
//! plus pointer dispatch for tiles that registered hover content.

use crate::color::Color;
use crate::tooltip::{Point, Tooltip, TooltipContent};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub translate: (f64, f64),
    /// Degrees, clockwise, applied after the translation.
    pub rotate: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RectShape {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Option<Color>,
    pub class: Option<String>,
    /// `data-*` attributes, keys without the prefix.
    pub data: Vec<(String, String)>,
    /// Content shown while the pointer moves over this rect.
    pub hover: Option<TooltipContent>,
}

impl RectShape {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            ..Default::default()
        }
    }

    pub fn fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn data(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.data.push((key.into(), value.to_string()));
        self
    }

    /// Registers the pointer-move / pointer-out handlers for this rect.
    pub fn on_hover(mut self, content: TooltipContent) -> Self {
        self.hover = Some(content);
        self
    }

    pub fn data_attr(&self, key: &str) -> Option<&str> {
        self.data
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextShape {
    pub x: f64,
    pub y: f64,
    pub transform: Option<Transform>,
    pub content: String,
    pub font_size: Option<f64>,
    pub class: Option<String>,
}

impl TextShape {
    pub fn at(x: f64, y: f64, content: impl Into<String>) -> Self {
        Self {
            x,
            y,
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn transformed(transform: Transform, content: impl Into<String>) -> Self {
        Self {
            transform: Some(transform),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Where the text origin lands in view-box coordinates.
    pub fn origin(&self) -> (f64, f64) {
        match self.transform {
            Some(t) => (t.translate.0 + self.x, t.translate.1 + self.y),
            None => (self.x, self.y),
        }
    }

    pub fn rotation(&self) -> f64 {
        self.transform.map(|t| t.rotate).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Group(Group),
    Rect(RectShape),
    Text(TextShape),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    pub id: Option<String>,
    pub class: Option<String>,
    pub children: Vec<Element>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn append_group(&mut self, group: Group) -> &mut Group {
        self.children.push(Element::Group(group));
        match self.children.last_mut() {
            Some(Element::Group(g)) => g,
            _ => unreachable!("just pushed a group"),
        }
    }

    pub fn append_rect(&mut self, rect: RectShape) {
        self.children.push(Element::Rect(rect));
    }

    pub fn append_text(&mut self, text: TextShape) {
        self.children.push(Element::Text(text));
    }

    fn walk<'a>(&'a self, out: &mut Vec<&'a Element>) {
        for child in &self.children {
            out.push(child);
            if let Element::Group(g) = child {
                g.walk(out);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move(Point),
    /// Pointer left the drawing surface.
    Leave,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub view_box: (f64, f64),
    pub root: Group,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            view_box: (width, height),
            root: Group::new().with_id("plot"),
        }
    }

    /// Every element in document order.
    pub fn elements(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.root.walk(&mut out);
        out
    }

    pub fn rects(&self) -> impl Iterator<Item = &RectShape> {
        self.elements().into_iter().filter_map(|e| match e {
            Element::Rect(r) => Some(r),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextShape> {
        self.elements().into_iter().filter_map(|e| match e {
            Element::Text(t) => Some(t),
            _ => None,
        })
    }

    pub fn count_rects(&self) -> usize {
        self.rects().count()
    }

    pub fn tiles(&self) -> Vec<&RectShape> {
        self.rects()
            .filter(|r| r.class.as_deref() == Some("tile"))
            .collect()
    }

    pub fn legend_items(&self) -> Vec<&RectShape> {
        self.rects()
            .filter(|r| r.class.as_deref() == Some("legend-item"))
            .collect()
    }

    /// Topmost rect with hover content under `p`.
    pub fn hit_test(&self, p: Point) -> Option<&RectShape> {
        self.rects()
            .filter(|r| r.hover.is_some() && r.contains(p))
            .last()
    }

    /// Routes a pointer event to the tooltip the way a browser would fire
    /// `mousemove` / `mouseout` on the tiles.
    pub fn dispatch(&self, event: PointerEvent, tooltip: &mut Tooltip, offset: f64) {
        match event {
            PointerEvent::Move(p) => match self.hit_test(p).and_then(|r| r.hover.clone()) {
                Some(content) => tooltip.on_move(p, content, offset),
                None => tooltip.on_out(),
            },
            PointerEvent::Leave => tooltip.on_out(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hover(name: &str) -> TooltipContent {
        TooltipContent {
            name: name.into(),
            category: "A".into(),
            value: 1.0,
        }
    }

    fn scene() -> Scene {
        let mut scene = Scene::new(100.0, 100.0);
        let map = scene.root.append_group(Group::new());
        map.append_rect(
            RectShape::new(0.0, 0.0, 50.0, 50.0)
                .class("tile")
                .on_hover(hover("left")),
        );
        map.append_rect(
            RectShape::new(50.0, 0.0, 50.0, 50.0)
                .class("tile")
                .on_hover(hover("right")),
        );
        scene
            .root
            .append_group(Group::new().with_id("legend"))
            .append_rect(RectShape::new(0.0, 80.0, 10.0, 10.0).class("legend-item"));
        scene
    }

    #[test]
    fn introspection() {
        let s = scene();
        assert_eq!(s.count_rects(), 3);
        assert_eq!(s.tiles().len(), 2);
        assert_eq!(s.legend_items().len(), 1);
    }

    #[test]
    fn moving_across_tiles_updates_tooltip() {
        let s = scene();
        let mut tip = Tooltip::default();
        s.dispatch(PointerEvent::Move(Point::new(10.0, 10.0)), &mut tip, 10.0);
        assert_eq!(tip.content().map(|c| c.name.as_str()), Some("left"));
        s.dispatch(PointerEvent::Move(Point::new(70.0, 10.0)), &mut tip, 10.0);
        assert_eq!(tip.content().map(|c| c.name.as_str()), Some("right"));
        assert_eq!(tip.position(), Some(Point::new(80.0, 20.0)));
    }

    #[test]
    fn moving_off_tiles_hides() {
        let s = scene();
        let mut tip = Tooltip::default();
        s.dispatch(PointerEvent::Move(Point::new(10.0, 10.0)), &mut tip, 10.0);
        // Legend swatches have no hover handlers.
        s.dispatch(PointerEvent::Move(Point::new(5.0, 85.0)), &mut tip, 10.0);
        assert!(!tip.is_visible());
        s.dispatch(PointerEvent::Move(Point::new(10.0, 10.0)), &mut tip, 10.0);
        s.dispatch(PointerEvent::Leave, &mut tip, 10.0);
        assert!(!tip.is_visible());
    }
}
