pub mod error;
pub mod math;
pub mod hpi;
pub mod render;
pub mod pipeline;

// Convenience re-exports
pub use error::{ErrorKind, HpiError, HpiWarning};
pub use math::{IntensityMatrix, Matrix};
pub use hpi::{HealthCategory, NormalizedIndex, ZeroDivisorPolicy};
pub use render::RenderConfig;
pub use pipeline::{compute_health_index, HealthReport, HpiAnalysis, Pipeline, PipelineConfig, PlantClassifier};
