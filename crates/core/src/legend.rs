use crate::color::{Color, ColorScale};
use crate::config::PlotConfig;

/// A swatch plus its caption, already positioned.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    pub category: String,
    pub color: Color,
    pub swatch_x: f64,
    pub swatch_y: f64,
    pub size: f64,
    pub label_x: f64,
    /// Text baseline.
    pub label_y: f64,
}

/// Two staggered rows: even entries on the first row, odd entries tucked
/// underneath the preceding even column.
pub fn legend_layout(scale: &ColorScale, cfg: &PlotConfig) -> Vec<LegendItem> {
    let s = cfg.legend_cell_size;
    let step = s + cfg.legend_cell_padding;
    let top = cfg.legend_top();

    scale
        .iter()
        .enumerate()
        .map(|(i, (category, color))| {
            let odd = i % 2 != 0;
            let x = i as f64 * step - if odd { step } else { 0.0 };
            let y = top + if odd { step } else { 0.0 };
            LegendItem {
                category: category.to_string(),
                color,
                swatch_x: x,
                swatch_y: y,
                size: s,
                label_x: x + s + 5.0,
                label_y: y + cfg.legend_font_size,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staggers_by_parity() {
        let scale = ColorScale::from_categories(["Wii", "DS", "X360", "GB", "NES"]);
        let items = legend_layout(&scale, &PlotConfig::default());
        let pos: Vec<_> = items.iter().map(|i| (i.swatch_x, i.swatch_y)).collect();
        assert_eq!(
            pos,
            [(0.0, 900.0), (0.0, 945.0), (90.0, 900.0), (90.0, 945.0), (180.0, 900.0)]
        );
        assert_eq!((items[1].label_x, items[1].label_y), (30.0, 962.0));
        assert_eq!(items[3].category, "GB");
    }

    #[test]
    fn colors_follow_scale() {
        let scale = ColorScale::from_categories(["a", "b"]);
        let items = legend_layout(&scale, &PlotConfig::default());
        assert_eq!(items[0].color, scale.range()[0]);
        assert_eq!(items[1].color, scale.range()[1]);
    }
}
