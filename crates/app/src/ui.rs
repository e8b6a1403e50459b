use eframe::egui::{self, epaint::TextShape, Color32, FontId, Rect, Sense, Ui, Vec2};
use salesmap_core::scene::{Element, PointerEvent};
use salesmap_core::tooltip::{Point, Tooltip};
use salesmap_core::Color;

use crate::state::{AppState, PlotView};

pub fn draw(app: &mut AppState, ctx: &egui::Context) {
    poll_fetch(app, ctx);

    // Keep repainting until the fetch resolves
    if app.fetch_rx.is_some() {
        ctx.request_repaint();
    }

    egui::TopBottomPanel::top("top").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("Video Game Sales");
            if app.fetch_rx.is_some() {
                ui.spinner();
            }
        });
        ui.label("Top 100 Most Sold Video Games Grouped by Platform");
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        plot(ui, app);
    });

    show_tooltip(ctx, app);
}

fn poll_fetch(app: &mut AppState, ctx: &egui::Context) {
    let Some(rx) = app.fetch_rx.take() else { return; };
    match rx.try_recv() {
        Ok(result) => {
            app.finish_fetch(result, ctx);
            ctx.request_repaint();
        }
        // Still in flight; keep polling next frame.
        Err(crossbeam_channel::TryRecvError::Empty) => app.fetch_rx = Some(rx),
        Err(crossbeam_channel::TryRecvError::Disconnected) => {
            tracing::error!("fetch worker exited without a result");
        }
    }
}

fn plot(ui: &mut Ui, app: &mut AppState) {
    let scene = app.orchestrator.scene();
    let (vw, vh) = scene.view_box;
    let avail = ui.available_size();
    let scale = (avail.x / vw as f32).min(avail.y / vh as f32).max(0.01);
    let size = Vec2::new(vw as f32 * scale, vh as f32 * scale);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let view = PlotView {
        origin: response.rect.min,
        scale,
    };
    app.view = Some(view);

    for element in scene.elements() {
        match element {
            Element::Rect(r) => {
                let rect = Rect::from_min_max(
                    view.to_screen(r.x, r.y),
                    view.to_screen(r.x + r.width, r.y + r.height),
                );
                let fill = r.fill.map(color32).unwrap_or(Color32::TRANSPARENT);
                painter.rect_filled(rect, 0.0, fill);
            }
            Element::Text(t) => {
                let size = t.font_size.unwrap_or(14.0) as f32 * scale;
                let galley = painter.layout_no_wrap(
                    t.content.clone(),
                    FontId::proportional(size),
                    Color32::BLACK,
                );
                // Scene text is anchored at its baseline; egui wants the top-left corner.
                let angle = (t.rotation() as f32).to_radians();
                let ascent = size * 0.8;
                let (x, y) = t.origin();
                let pos =
                    view.to_screen(x, y) + Vec2::new(ascent * angle.sin(), -ascent * angle.cos());
                painter.add(TextShape::new(pos, galley, Color32::BLACK).with_angle(angle));
            }
            Element::Group(_) => {}
        }
    }

    let offset = app.orchestrator.config().tooltip_offset / scale as f64;
    let event = match response.hover_pos() {
        Some(pos) => {
            let (x, y) = view.to_plot(pos);
            PointerEvent::Move(Point::new(x, y))
        }
        None => PointerEvent::Leave,
    };
    scene.dispatch(event, &mut app.tooltip, offset);
}

fn show_tooltip(ctx: &egui::Context, app: &AppState) {
    let (Tooltip::Shown { content, position }, Some(view)) = (&app.tooltip, app.view) else {
        return;
    };
    egui::Area::new(egui::Id::new("tooltip"))
        .order(egui::Order::Tooltip)
        .fixed_pos(view.to_screen(position.x, position.y))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                for line in content.lines() {
                    ui.label(line);
                }
            });
        });
}

fn color32(c: Color) -> Color32 {
    let alpha = (c.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, alpha)
}
