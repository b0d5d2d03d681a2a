pub mod classifier;
pub mod config;
pub mod naming;
pub mod pipeline;

pub use classifier::{AcceptAll, PlantClassifier};
pub use config::PipelineConfig;
pub use naming::{sanitize_file_name, spectral_file_name};
pub use pipeline::{compute_health_index, HealthReport, HpiAnalysis, Pipeline};
