pub mod grayscale;
pub mod normalize;
pub mod classify;

pub use grayscale::{decode, to_grayscale};
pub use normalize::{normalize, NormalizedIndex, ZeroDivisorPolicy};
pub use classify::{classify, HealthCategory};
