pub mod matrix;
pub mod intensity;

pub use matrix::Matrix;
pub use intensity::IntensityMatrix;
