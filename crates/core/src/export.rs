use std::fmt::Write;

use thiserror::Error;

use crate::color::ColorScale;
use crate::scene::{Element, Group, RectShape, Scene, TextShape};
use crate::tooltip::escape_html;
use crate::treemap::LayoutRect;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn to_csv(leaves: &[LayoutRect], mut w: impl std::io::Write) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(&mut w);
    writer.write_record(["name", "category", "value", "x0", "y0", "x1", "y1"])?;
    for leaf in leaves {
        writer.write_record([
            leaf.name.clone(),
            leaf.category.clone().unwrap_or_default(),
            leaf.value.to_string(),
            leaf.x0.to_string(),
            leaf.y0.to_string(),
            leaf.x1.to_string(),
            leaf.y1.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_json(leaves: &[LayoutRect], scale: &ColorScale) -> serde_json::Value {
    serde_json::json!({
        "categories": scale.iter().map(|(name, color)| serde_json::json!({
            "name": name,
            "color": color,
        })).collect::<Vec<_>>(),
        "tiles": leaves.iter().map(|l| serde_json::json!({
            "name": l.name,
            "category": l.category,
            "value": l.value,
            "x0": l.x0,
            "y0": l.y0,
            "x1": l.x1,
            "y1": l.y1,
            "color": l.category.as_deref().and_then(|c| scale.color_of(c)),
        })).collect::<Vec<_>>()
    })
}

/// Standalone SVG. Tiles get a `<title>` so viewers show a native tooltip.
pub fn to_svg(scene: &Scene) -> String {
    let (w, h) = scene.view_box;
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" id="plot" viewBox="0 0 {w} {h}" {}>"#,
        r#"font-family="sans-serif""#
    );
    for child in &scene.root.children {
        write_element(&mut out, child, 1);
    }
    out.push_str("</svg>\n");
    out
}

const HTML_STYLE: &str = r#"
#plot { width: 100%; aspect-ratio: 16 / 10; }
.tile { stroke: none; }
.tile:hover { opacity: 0.8; }
.tooltip { position: fixed; padding: 6px 8px; background: rgba(255, 255, 255, 0.95);
  border: 1px solid #999; border-radius: 4px; font: 13px sans-serif; pointer-events: none; }
.hidden { display: none; }
"#;

const HTML_SCRIPT: &str = r#"
const tooltip = document.querySelector('.tooltip');
const esc = (s) => s.replace(/[&<>"']/g, (c) => `&#${c.charCodeAt(0)};`);
document.querySelectorAll('.tile').forEach((tile) => {
  tile.addEventListener('mousemove', (event) => {
    const { name, category, value } = tile.dataset;
    tooltip.innerHTML = [`name: ${esc(name)}`, `category: ${esc(category)}`, `value: ${esc(value)}`]
      .map((line) => `<div>${line}</div>`)
      .join('');
    tooltip.style.top = `${event.clientY + OFFSET}px`;
    tooltip.style.left = `${event.clientX + OFFSET}px`;
    tooltip.dataset.value = value;
    tooltip.classList.remove('hidden');
  });
  tile.addEventListener('mouseout', () => tooltip.classList.add('hidden'));
});
"#;

/// Page with the SVG inline and a hover tooltip wired in script.
pub fn to_html(scene: &Scene, title: &str, tooltip_offset: f64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">");
    let _ = writeln!(out, "<title>{}</title>", escape_html(title));
    let _ = writeln!(out, "<style>{HTML_STYLE}</style>\n</head>\n<body>");
    let _ = writeln!(out, "<h1 id=\"title\">{}</h1>", escape_html(title));
    out.push_str(&to_svg(scene));
    let _ = writeln!(out, "<div id=\"tooltip\" class=\"tooltip hidden\"></div>");
    let _ = writeln!(
        out,
        "<script>\nconst OFFSET = {tooltip_offset};{HTML_SCRIPT}</script>\n</body>\n</html>"
    );
    out
}

fn write_element(out: &mut String, el: &Element, depth: usize) {
    let pad = "  ".repeat(depth);
    match el {
        Element::Group(g) => write_group(out, g, depth),
        Element::Rect(r) => write_rect(out, r, &pad),
        Element::Text(t) => write_text(out, t, &pad),
    }
}

fn write_group(out: &mut String, g: &Group, depth: usize) {
    let pad = "  ".repeat(depth);
    let _ = write!(out, "{pad}<g");
    if let Some(id) = &g.id {
        let _ = write!(out, r#" id="{}""#, escape_html(id));
    }
    if let Some(class) = &g.class {
        let _ = write!(out, r#" class="{}""#, escape_html(class));
    }
    out.push_str(">\n");
    for child in &g.children {
        write_element(out, child, depth + 1);
    }
    let _ = writeln!(out, "{pad}</g>");
}

fn write_rect(out: &mut String, r: &RectShape, pad: &str) {
    let _ = write!(
        out,
        r#"{pad}<rect x="{}" y="{}" width="{}" height="{}""#,
        r.x, r.y, r.width, r.height
    );
    if let Some(class) = &r.class {
        let _ = write!(out, r#" class="{}""#, escape_html(class));
    }
    for (k, v) in &r.data {
        let _ = write!(out, r#" data-{}="{}""#, k, escape_html(v));
    }
    if let Some(fill) = r.fill {
        let _ = write!(out, r#" fill="{fill}""#);
    }
    match &r.hover {
        Some(content) => {
            let _ = writeln!(
                out,
                "><title>{}</title></rect>",
                escape_html(&content.lines().join("\n"))
            );
        }
        None => out.push_str("/>\n"),
    }
}

fn write_text(out: &mut String, t: &TextShape, pad: &str) {
    let _ = write!(out, "{pad}<text");
    match t.transform {
        Some(tr) => {
            let _ = write!(out, r#" transform="translate({} {})"#, tr.translate.0, tr.translate.1);
            if tr.rotate != 0.0 {
                let _ = write!(out, " rotate({})", tr.rotate);
            }
            out.push('"');
        }
        None => {
            let _ = write!(out, r#" x="{}" y="{}""#, t.x, t.y);
        }
    }
    if let Some(size) = t.font_size {
        let _ = write!(out, r#" font-size="{size}""#);
    }
    if let Some(class) = &t.class {
        let _ = write!(out, r#" class="{}""#, escape_html(class));
    }
    let _ = writeln!(out, ">{}</text>", escape_html(&t.content));
}
