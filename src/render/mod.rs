pub mod canvas;
pub mod colormap;
pub mod config;
pub mod heatmap;

pub use config::RenderConfig;
pub use heatmap::{render, render_to_path};
