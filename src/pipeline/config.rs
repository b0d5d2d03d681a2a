use serde::{Serialize, Deserialize};

use crate::hpi::normalize::ZeroDivisorPolicy;
use crate::render::config::RenderConfig;

/// Configuration for a `Pipeline`.
///
/// # Fields
/// - `zero_divisor` — what a uniform image normalizes to
/// - `render`       — heat-map layout
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub zero_divisor: ZeroDivisorPolicy,
    pub render: RenderConfig,
}

impl PipelineConfig {
    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a `PipelineConfig` from a JSON file.  Missing fields take
    /// their defaults.
    pub fn load_json(path: &str) -> std::io::Result<PipelineConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
