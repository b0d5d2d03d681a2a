use std::path::Path;

use image::Rgba;
use log::debug;

use crate::error::HpiError;
use crate::math::matrix::Matrix;
use crate::render::canvas::{encode_png, Canvas, GLYPH_H};
use crate::render::colormap::{jet, jet_percent};
use crate::render::config::RenderConfig;

const TICK_COLOR: Rgba<u8> = Rgba([51, 51, 51, 255]);
const LABEL_GAP: u32 = 2;
/// Upper bound for each legend dimension and the padding.
const MAX_LEGEND_EXTENT: u32 = 4096;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Renders a percentage index as a jet heat-map PNG.
///
/// Layout, left to right: the plot (one pixel per matrix cell, so the plot
/// has the source image's dimensions), a transparent gap, the color-scale
/// legend (100 at the top, 0 at the bottom) with its tick marks and labels.
/// Everything else is transparent, and the canvas is cropped to its content
/// plus `config.padding`.
///
/// Identical input always yields byte-identical output.
pub fn render(percentage: &Matrix, config: &RenderConfig) -> Result<Vec<u8>, HpiError> {
    if percentage.is_empty() {
        return Err(HpiError::Render("cannot render an empty index".into()));
    }
    let width  = u32::try_from(percentage.cols)
        .map_err(|_| HpiError::Render("index is too wide to render".into()))?;
    let height = u32::try_from(percentage.rows)
        .map_err(|_| HpiError::Render("index is too tall to render".into()))?;

    let layout = Layout::new(width, height, config)?;
    let mut canvas = Canvas::new(layout.canvas_width, height);

    draw_plot(&mut canvas, percentage);
    draw_colorbar(&mut canvas, &layout, height, config);

    let img = canvas.into_cropped(config.padding)?;
    debug!("rendered {}x{} heat-map into {}x{} canvas", width, height, img.width(), img.height());
    encode_png(&img)
}

/// Renders and writes the PNG to `path`.  Where the file lives is the
/// caller's decision; the parent directory must already exist.
pub fn render_to_path(percentage: &Matrix, config: &RenderConfig, path: &Path) -> Result<(), HpiError> {
    let bytes = render(percentage, config)?;
    std::fs::write(path, bytes)
        .map_err(|e| HpiError::Render(format!("could not write '{}': {}", path.display(), e)))
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

struct Layout {
    bar_x:        u32,
    tick_x:       u32,
    label_x:      u32,
    /// `config.ticks`, capped at one tick per legend row.
    ticks:        u32,
    show_labels:  bool,
    canvas_width: u32,
}

impl Layout {
    fn new(plot_width: u32, plot_height: u32, config: &RenderConfig) -> Result<Layout, HpiError> {
        for (name, value) in [
            ("colorbar_width", config.colorbar_width),
            ("colorbar_gap", config.colorbar_gap),
            ("tick_length", config.tick_length),
            ("padding", config.padding),
        ] {
            if value > MAX_LEGEND_EXTENT {
                return Err(HpiError::Render(format!(
                    "{} = {} exceeds the {} pixel limit", name, value, MAX_LEGEND_EXTENT
                )));
            }
        }
        let too_wide = || HpiError::Render("heat-map canvas is too wide".into());

        let bar_x   = plot_width.checked_add(config.colorbar_gap).ok_or_else(too_wide)?;
        let tick_x  = bar_x.checked_add(config.colorbar_width).ok_or_else(too_wide)?;
        let label_x = tick_x.checked_add(config.tick_length + LABEL_GAP).ok_or_else(too_wide)?;

        let ticks = config.ticks.min(plot_height);
        // Labels need one glyph height per tick plus a pixel of spacing.
        let show_labels = config.tick_labels
            && ticks >= 2
            && plot_height / (GLYPH_H + 1) >= ticks;

        let right_edge = if show_labels {
            label_x.checked_add(Canvas::text_width("100")).ok_or_else(too_wide)?
        } else if ticks >= 2 {
            tick_x.checked_add(config.tick_length).ok_or_else(too_wide)?
        } else {
            tick_x
        };

        Ok(Layout { bar_x, tick_x, label_x, ticks, show_labels, canvas_width: right_edge })
    }
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

fn draw_plot(canvas: &mut Canvas, percentage: &Matrix) {
    for (y, row) in percentage.data.iter().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            canvas.put(x as u32, y as u32, jet_percent(value));
        }
    }
}

/// Fraction of the scale shown at legend row `y` (1 at the top).
fn legend_fraction(y: u32, height: u32) -> f64 {
    if height <= 1 {
        return 1.0;
    }
    1.0 - y as f64 / (height - 1) as f64
}

/// Legend row for a scale fraction (inverse of `legend_fraction`).
fn legend_row(fraction: f64, height: u32) -> u32 {
    ((1.0 - fraction) * height.saturating_sub(1) as f64).round() as u32
}

fn draw_colorbar(canvas: &mut Canvas, layout: &Layout, height: u32, config: &RenderConfig) {
    for y in 0..height {
        canvas.fill_rect(layout.bar_x, y, config.colorbar_width, 1, jet(legend_fraction(y, height)));
    }

    if layout.ticks < 2 {
        return;
    }
    for i in 0..layout.ticks {
        let fraction = i as f64 / (layout.ticks - 1) as f64;
        let y = legend_row(fraction, height);
        canvas.fill_rect(layout.tick_x, y, config.tick_length, 1, TICK_COLOR);

        if layout.show_labels {
            let label = format!("{}", (fraction * 100.0).round() as u32);
            // Center the glyph on the tick, kept inside the canvas.
            let top = y.saturating_sub(GLYPH_H / 2).min(height.saturating_sub(GLYPH_H));
            canvas.draw_text(layout.label_x, top, &label, TICK_COLOR);
        }
    }
}
