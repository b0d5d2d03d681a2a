//! The "jet" false-color gradient.
//!
//! dark blue → blue → cyan → yellow → red → dark red.  Each channel is a
//! piecewise-linear ramp through the anchor points below (the classic
//! matplotlib `jet` segment data).

use image::Rgba;

type Segment = &'static [(f64, f64)];

const RED: Segment   = &[(0.0, 0.0), (0.35, 0.0), (0.66, 1.0), (0.89, 1.0), (1.0, 0.5)];
const GREEN: Segment = &[(0.0, 0.0), (0.125, 0.0), (0.375, 1.0), (0.64, 1.0), (0.91, 0.0), (1.0, 0.0)];
const BLUE: Segment  = &[(0.0, 0.5), (0.11, 1.0), (0.34, 1.0), (0.65, 0.0), (1.0, 0.0)];

/// Interpolates one channel at `t` (already clamped to [0, 1]).
fn channel(segment: Segment, t: f64) -> f64 {
    for pair in segment.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if t <= x1 {
            return y0 + (y1 - y0) * (t - x0) / (x1 - x0);
        }
    }
    segment.last().map_or(0.0, |&(_, y)| y)
}

fn to_u8(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Maps `t` in [0, 1] to an opaque jet color.  Out-of-range values are
/// clamped; NaN maps to the low end.
pub fn jet(t: f64) -> Rgba<u8> {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    Rgba([
        to_u8(channel(RED, t)),
        to_u8(channel(GREEN, t)),
        to_u8(channel(BLUE, t)),
        255,
    ])
}

/// Maps a percentage in [0, 100] to a jet color.
pub fn jet_percent(p: f64) -> Rgba<u8> {
    jet(p / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints() {
        assert_eq!(jet(0.0), Rgba([0, 0, 128, 255]));
        assert_eq!(jet(1.0), Rgba([128, 0, 0, 255]));
    }

    #[test]
    fn midpoint_is_greenish() {
        assert_eq!(jet(0.5), Rgba([123, 255, 123, 255]));
        assert_eq!(jet_percent(50.0), jet(0.5));
    }

    #[test]
    fn hue_order_blue_green_yellow_red() {
        let blue   = jet(0.2);
        let green  = jet(0.5);
        let yellow = jet(0.65);
        let red    = jet(0.85);
        assert!(blue.0[2] > blue.0[0] && blue.0[2] > blue.0[1]);
        assert!(green.0[1] > green.0[0] && green.0[1] > green.0[2]);
        assert!(yellow.0[0] > 200 && yellow.0[1] > 200 && yellow.0[2] < 50);
        assert!(red.0[0] > red.0[1] && red.0[0] > red.0[2]);
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(jet(-3.0), jet(0.0));
        assert_eq!(jet(7.0), jet(1.0));
        assert_eq!(jet(f64::NAN), jet(0.0));
    }
}
