pub mod analyze;
pub mod spectral;
