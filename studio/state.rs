use std::path::PathBuf;
use std::sync::Arc;

use serde::{Serialize, Deserialize};

use plant_hpi::{Pipeline, PipelineConfig};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Studio settings.  Loaded from an optional JSON file; command-line flags
/// override individual fields afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Address the HTTP server binds to.
    pub addr:             String,
    /// Where uploaded images are saved under their sanitized file name.
    pub upload_dir:       PathBuf,
    /// Where `spectral_<file name>.png` heat-maps are written and served from.
    pub spectral_dir:     PathBuf,
    /// Uploads larger than this are rejected before decoding.
    pub max_upload_bytes: usize,
    pub pipeline:         PipelineConfig,
}

impl Default for StudioConfig {
    fn default() -> Self {
        StudioConfig {
            addr:             "127.0.0.1:5000".into(),
            upload_dir:       PathBuf::from("uploads"),
            spectral_dir:     PathBuf::from("static/spectral_images"),
            max_upload_bytes: 16 * 1024 * 1024,
            pipeline:         PipelineConfig::default(),
        }
    }
}

impl StudioConfig {
    /// Deserializes a `StudioConfig` from a JSON file.
    pub fn load_json(path: &str) -> std::io::Result<StudioConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Everything a handler needs.  Read-only after startup, so handlers share
/// it without locking.
pub struct StudioState {
    pub config:   StudioConfig,
    pub pipeline: Pipeline,
}

impl StudioState {
    pub fn new(config: StudioConfig) -> Self {
        let pipeline = Pipeline::new(config.pipeline.clone());
        StudioState { config, pipeline }
    }

    /// Creates the upload and heat-map directories if they are missing.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config.upload_dir)?;
        std::fs::create_dir_all(&self.config.spectral_dir)
    }
}

/// Shared state type — an `Arc<StudioState>` passed to every handler.
pub type SharedState = Arc<StudioState>;
