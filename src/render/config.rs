use serde::{Serialize, Deserialize};

/// Layout of the rendered heat-map.
///
/// # Fields
/// - `colorbar_width` — width in pixels of the color-scale legend bar
/// - `colorbar_gap`   — transparent pixels between the plot and the legend
/// - `ticks`          — number of evenly spaced tick marks on the legend,
///                      including both ends (`0` or `1` disables ticks)
/// - `tick_length`    — length in pixels of each tick mark
/// - `tick_labels`    — draw the percentage next to each tick when the plot
///                      is tall enough to fit them without overlap
/// - `padding`        — transparent border kept around the cropped content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub colorbar_width: u32,
    pub colorbar_gap:   u32,
    pub ticks:          u32,
    pub tick_length:    u32,
    pub tick_labels:    bool,
    pub padding:        u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            colorbar_width: 12,
            colorbar_gap:   6,
            ticks:          5,
            tick_length:    3,
            tick_labels:    true,
            padding:        0,
        }
    }
}
