use crossbeam_channel::{unbounded, Receiver, Sender};
use eframe::egui::{Color32, Context, FontId, Pos2};
use salesmap_core::label::TextMetrics;
use salesmap_core::tooltip::Tooltip;
use salesmap_core::{FetchError, HttpSource, Orchestrator, PlotConfig, SalesNode, SalesSource};

type FetchResult = Result<SalesNode, FetchError>;

/// Maps view-box units onto the screen rect the plot was painted into.
#[derive(Clone, Copy, Debug)]
pub struct PlotView {
    pub origin: Pos2,
    pub scale: f32,
}

impl PlotView {
    pub fn to_screen(&self, x: f64, y: f64) -> Pos2 {
        Pos2::new(
            self.origin.x + x as f32 * self.scale,
            self.origin.y + y as f32 * self.scale,
        )
    }

    pub fn to_plot(&self, p: Pos2) -> (f64, f64) {
        (
            ((p.x - self.origin.x) / self.scale) as f64,
            ((p.y - self.origin.y) / self.scale) as f64,
        )
    }
}

pub struct AppState {
    pub orchestrator: Orchestrator,
    pub fetch_rx: Option<Receiver<FetchResult>>,
    pub tooltip: Tooltip,
    pub view: Option<PlotView>,
}

impl AppState {
    pub fn new(config: PlotConfig) -> Self {
        Self {
            orchestrator: Orchestrator::new(config),
            fetch_rx: None,
            tooltip: Tooltip::default(),
            view: None,
        }
    }

    /// Runs the single fetch on a worker thread; the result comes back
    /// through `fetch_rx`.
    pub fn start_fetch(&mut self) {
        let (tx, rx): (Sender<FetchResult>, Receiver<FetchResult>) = unbounded();
        self.fetch_rx = Some(rx);
        let url = self.orchestrator.config().data_url.clone();

        std::thread::spawn(move || {
            let result = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(FetchError::from)
                .and_then(|rt| rt.block_on(HttpSource::new(url).load()));
            let _ = tx.send(result);
        });
    }

    /// Hands a finished fetch to the orchestrator, which logs failures and
    /// leaves the plot empty.
    pub fn finish_fetch(&mut self, result: FetchResult, ctx: &Context) {
        let origin = self.orchestrator.config().data_url.clone();
        let metrics = EguiMetrics { ctx };
        let _ = self.orchestrator.complete(result, &origin, &metrics);
    }
}

/// Measures text with the fonts egui will paint it with.
pub struct EguiMetrics<'a> {
    pub ctx: &'a Context,
}

impl TextMetrics for EguiMetrics<'_> {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        self.ctx.fonts(|fonts| {
            fonts
                .layout_no_wrap(
                    text.to_owned(),
                    FontId::proportional(font_size as f32),
                    Color32::BLACK,
                )
                .size()
                .x as f64
        })
    }
}
