use tracing::warn;

use crate::color::{Color, ColorScale};
use crate::config::PlotConfig;
use crate::label::{label_anchor, truncate_label, Orientation, TextMetrics};
use crate::legend::legend_layout;
use crate::model::SalesNode;
use crate::scene::{Group, RectShape, Scene, TextShape, Transform};
use crate::tooltip::TooltipContent;
use crate::treemap::{LayoutRect, Treemap};

/// Lays out `sales` and draws one tile and one label per leaf.
///
/// Returns the leaf rectangles so callers can export them.
pub fn render_map(
    scene: &mut Scene,
    sales: &SalesNode,
    scale: &ColorScale,
    cfg: &PlotConfig,
    metrics: &impl TextMetrics,
) -> Vec<LayoutRect> {
    let leaves = Treemap::new(cfg.width, cfg.map_height())
        .padding(cfg.padding)
        .layout(sales);

    let map = scene.root.append_group(Group::new().with_class("map"));
    for leaf in &leaves {
        let category = leaf.category.clone().unwrap_or_default();
        let fill = scale.color_of(&category).unwrap_or_else(|| {
            warn!(name = %leaf.name, %category, "leaf category not in color scale");
            Color::NEUTRAL
        });

        let cell = map.append_group(Group::new());
        cell.append_rect(
            RectShape::new(leaf.x0, leaf.y0, leaf.width(), leaf.height())
                .class("tile")
                .data("name", &leaf.name)
                .data("category", &category)
                .data("value", leaf.value)
                .fill(fill)
                .on_hover(TooltipContent {
                    name: leaf.name.clone(),
                    category,
                    value: leaf.value,
                }),
        );
        cell.append_text(tile_label(leaf, cfg.label_font_size, metrics));
    }
    leaves
}

fn tile_label(leaf: &LayoutRect, font_size: f64, metrics: &impl TextMetrics) -> TextShape {
    let (w, h) = (leaf.width(), leaf.height());
    let orientation = Orientation::of(w, h);
    let transform = Transform {
        translate: label_anchor(leaf.x0, leaf.y0, orientation),
        rotate: orientation.rotation(),
    };
    let text = truncate_label(&leaf.name, w, h, font_size, metrics);
    TextShape::transformed(transform, text).font_size(font_size)
}

/// Draws the staggered legend below the map.
pub fn render_legend(scene: &mut Scene, scale: &ColorScale, cfg: &PlotConfig) {
    let legend = scene
        .root
        .append_group(Group::new().with_id("legend").with_class("legend"));
    let items = legend_layout(scale, cfg);
    for item in &items {
        legend.append_rect(
            RectShape::new(item.swatch_x, item.swatch_y, item.size, item.size)
                .class("legend-item")
                .fill(item.color),
        );
    }
    for item in items {
        legend.append_text(
            TextShape::at(item.label_x, item.label_y, item.category)
                .font_size(cfg.legend_font_size),
        );
    }
}
