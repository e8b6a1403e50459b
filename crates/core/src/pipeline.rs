use tracing::{error, info};

use crate::color::ColorScale;
use crate::config::PlotConfig;
use crate::fetch::{FetchError, SalesSource};
use crate::label::TextMetrics;
use crate::model::SalesNode;
use crate::render::{render_legend, render_map};
use crate::scene::Scene;
use crate::treemap::LayoutRect;

/// Drives one render pass: fetch, color, map, legend.
pub struct Orchestrator {
    config: PlotConfig,
    scene: Scene,
    scale: Option<ColorScale>,
    leaves: Vec<LayoutRect>,
}

impl Orchestrator {
    /// Sizes the drawing surface; nothing is drawn until data arrives.
    pub fn new(config: PlotConfig) -> Self {
        let scene = Scene::new(config.width, config.height);
        Self {
            config,
            scene,
            scale: None,
            leaves: Vec::new(),
        }
    }

    /// Loads from `source` and renders. A failed load is logged once and
    /// leaves the surface empty.
    pub async fn run(
        &mut self,
        source: &dyn SalesSource,
        metrics: &impl TextMetrics,
    ) -> Result<(), FetchError> {
        let loaded = source.load().await;
        self.complete(loaded, &source.describe(), metrics)
    }

    /// Second half of [`Orchestrator::run`] for callers that performed the
    /// load elsewhere (e.g. on a worker thread).
    pub fn complete(
        &mut self,
        loaded: Result<SalesNode, FetchError>,
        origin: &str,
        metrics: &impl TextMetrics,
    ) -> Result<(), FetchError> {
        match loaded {
            Ok(sales) => {
                self.render(&sales, metrics);
                Ok(())
            }
            Err(e) => {
                error!(source = %origin, error = %e, "rendering failed");
                Err(e)
            }
        }
    }

    /// Synchronous part of the pass, once the data is in memory.
    pub fn render(&mut self, sales: &SalesNode, metrics: &impl TextMetrics) {
        let scale = ColorScale::from_root(sales);
        self.leaves = render_map(&mut self.scene, sales, &scale, &self.config, metrics);
        render_legend(&mut self.scene, &scale, &self.config);
        info!(
            tiles = self.leaves.len(),
            categories = scale.len(),
            "treemap rendered"
        );
        self.scale = Some(scale);
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn color_scale(&self) -> Option<&ColorScale> {
        self.scale.as_ref()
    }

    pub fn leaves(&self) -> &[LayoutRect] {
        &self.leaves
    }
}
