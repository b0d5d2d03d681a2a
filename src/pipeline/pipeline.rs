use std::time::Instant;

use log::debug;
use serde::Serialize;

use crate::error::{HpiError, HpiWarning};
use crate::hpi::classify::{classify, HealthCategory};
use crate::hpi::grayscale::{decode, to_grayscale};
use crate::hpi::normalize::{normalize, NormalizedIndex};
use crate::math::matrix::Matrix;
use crate::pipeline::classifier::{AcceptAll, PlantClassifier};
use crate::pipeline::config::PipelineConfig;
use crate::render::heatmap::render;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Successful result of `Pipeline::run`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// Mean HPI percentage, in [0, 100].
    pub score: f64,
    pub category: HealthCategory,
    /// PNG-encoded heat-map.
    #[serde(skip)]
    pub artifact: Vec<u8>,
    /// Per-pixel HPI percentages the heat-map was drawn from.
    #[serde(skip)]
    pub percentage: Matrix,
    pub width: u32,
    pub height: u32,
    pub warning: Option<HpiWarning>,
}

/// Score plus the intermediate index grids, without a rendered artifact.
#[derive(Debug, Clone)]
pub struct HpiAnalysis {
    pub score: f64,
    pub category: HealthCategory,
    pub index: NormalizedIndex,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Decode → Grayscale → Normalize → {Classify, Render}.
///
/// A `Pipeline` holds only read-only configuration, so one instance can be
/// shared across threads; every call owns its own matrices and canvas.
pub struct Pipeline {
    config: PipelineConfig,
    classifier: Box<dyn PlantClassifier>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Pipeline {
        Pipeline { config, classifier: Box::new(AcceptAll) }
    }

    /// Replaces the plant gate.  Images it rejects fail with
    /// `HpiError::NotAPlant` before any scoring happens.
    pub fn with_classifier<C: PlantClassifier + 'static>(mut self, classifier: C) -> Pipeline {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Scores the image without rendering.
    pub fn analyze(&self, bytes: &[u8]) -> Result<HpiAnalysis, HpiError> {
        let t_start = Instant::now();

        let image = decode(bytes)?;
        if !self.classifier.is_plant(&image) {
            return Err(HpiError::NotAPlant);
        }

        let intensities = to_grayscale(&image)?;
        let index = normalize(&intensities, self.config.zero_divisor);
        let (score, category) = classify(&index.percentage);

        debug!(
            "scored {}x{} image: {:.3} ({}) in {} ms",
            intensities.cols(), intensities.rows(), score, category,
            t_start.elapsed().as_millis()
        );
        Ok(HpiAnalysis { score, category, index })
    }

    /// Runs the whole pipeline.  The first failing stage aborts; no partial
    /// report is ever returned.
    pub fn run(&self, bytes: &[u8]) -> Result<HealthReport, HpiError> {
        let analysis = self.analyze(bytes)?;

        let t_render = Instant::now();
        let artifact = render(&analysis.index.percentage, &self.config.render)?;
        debug!("rendered heat-map ({} bytes) in {} ms", artifact.len(), t_render.elapsed().as_millis());

        let NormalizedIndex { percentage, warning, .. } = analysis.index;
        Ok(HealthReport {
            score:    analysis.score,
            category: analysis.category,
            artifact,
            width:    percentage.cols as u32,
            height:   percentage.rows as u32,
            percentage,
            warning,
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Pipeline::new(PipelineConfig::default())
    }
}

/// Runs the default pipeline over encoded image bytes.
pub fn compute_health_index(bytes: &[u8]) -> Result<HealthReport, HpiError> {
    Pipeline::default().run(bytes)
}
