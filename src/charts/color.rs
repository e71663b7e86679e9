//! Sequential color ramps for map shading.

use plotters::style::RGBColor;

/// A piecewise-linear color ramp over equally spaced stops.
pub struct ColorRamp {
    stops: &'static [(u8, u8, u8)],
}

/// Sequential reds (light to dark), used for new-case maps.
pub const REDS: ColorRamp = ColorRamp {
    stops: &[
        (255, 245, 240),
        (252, 187, 161),
        (251, 106, 74),
        (203, 24, 29),
        (103, 0, 13),
    ],
};

/// Warm light-to-deep ramp, used for cumulative-total maps.
pub const MATTER: ColorRamp = ColorRamp {
    stops: &[
        (253, 237, 176),
        (241, 156, 124),
        (201, 95, 117),
        (130, 64, 110),
        (47, 36, 77),
    ],
};

impl ColorRamp {
    /// Maps `t` in `[0, 1]` (clamped) to an interpolated color.
    pub fn sample(&self, t: f64) -> RGBColor {
        let t = t.clamp(0.0, 1.0);
        let segments = (self.stops.len() - 1) as f64;
        let pos = t * segments;
        let idx = (pos.floor() as usize).min(self.stops.len() - 2);
        let frac = pos - idx as f64;

        let (r0, g0, b0) = self.stops[idx];
        let (r1, g1, b1) = self.stops[idx + 1];

        RGBColor(
            lerp(r0, r1, frac),
            lerp(g0, g1, frac),
            lerp(b0, b1, frac),
        )
    }

    /// Whether the color at `t` is dark enough to need light label text.
    pub fn is_dark_at(&self, t: f64) -> bool {
        let RGBColor(r, g, b) = self.sample(t);
        // Perceived luminance, ITU-R BT.601 weights.
        let luma = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
        luma < 140.0
    }
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(REDS.sample(0.0), RGBColor(255, 245, 240));
        assert_eq!(REDS.sample(1.0), RGBColor(103, 0, 13));
    }

    #[test]
    fn test_out_of_range_clamps() {
        assert_eq!(REDS.sample(-1.0), REDS.sample(0.0));
        assert_eq!(REDS.sample(2.0), REDS.sample(1.0));
    }

    #[test]
    fn test_midpoint_is_between_stops() {
        let RGBColor(r, _, _) = REDS.sample(0.5);
        assert_eq!(r, 251);
    }

    #[test]
    fn test_label_contrast() {
        assert!(!REDS.is_dark_at(0.0));
        assert!(REDS.is_dark_at(1.0));
        assert!(MATTER.is_dark_at(1.0));
    }
}
