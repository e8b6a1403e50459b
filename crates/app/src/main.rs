mod state;
mod ui;

use eframe::egui;
use salesmap_core::PlotConfig;
use state::AppState;
use tracing_subscriber::EnvFilter;

struct SalesApp {
    state: AppState,
}

impl SalesApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut state = AppState::new(PlotConfig::default());
        state.start_fetch();
        Self { state }
    }
}

impl eframe::App for SalesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::draw(&mut self.state, ctx);
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Video Game Sales",
        options,
        Box::new(|cc| Ok(Box::new(SalesApp::new(cc)))),
    )
}
