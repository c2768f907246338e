//! Circular clip path with anti-aliased edges.

/// Half the diagonal of a unit pixel. A pixel whose centre is further than
/// this from the edge lies wholly on one side of it.
const PIXEL_HALF_DIAGONAL: f64 = std::f64::consts::SQRT_2 / 2.0;

/// Samples per axis when a pixel straddles the edge.
const SUPERSAMPLES: u32 = 4;

/// Circle in surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleClip {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

impl CircleClip {
    pub fn new(center_x: f64, center_y: f64, radius: f64) -> Self {
        Self {
            center_x,
            center_y,
            radius: radius.max(0.0),
        }
    }

    /// Largest circle centred in a `width x height` surface.
    pub fn inscribed(width: u32, height: u32) -> Self {
        let cx = width as f64 / 2.0;
        let cy = height as f64 / 2.0;
        Self::new(cx, cy, cx.min(cy))
    }

    #[inline]
    fn contains(&self, x: f64, y: f64) -> bool {
        let dx = x - self.center_x;
        let dy = y - self.center_y;
        dx * dx + dy * dy <= self.radius * self.radius
    }

    /// Fraction of pixel `(px, py)` covered by the circle, 0.0 to 1.0.
    ///
    /// Interior and exterior pixels are decided from the pixel centre alone;
    /// only edge pixels are supersampled.
    pub fn coverage(&self, px: u32, py: u32) -> f32 {
        let x = px as f64 + 0.5;
        let y = py as f64 + 0.5;
        let dist = ((x - self.center_x).powi(2) + (y - self.center_y).powi(2)).sqrt();

        if dist + PIXEL_HALF_DIAGONAL <= self.radius {
            return 1.0;
        }
        if dist - PIXEL_HALF_DIAGONAL >= self.radius {
            return 0.0;
        }

        let step = 1.0 / SUPERSAMPLES as f64;
        let mut inside = 0u32;
        for sy in 0..SUPERSAMPLES {
            for sx in 0..SUPERSAMPLES {
                let sample_x = px as f64 + (sx as f64 + 0.5) * step;
                let sample_y = py as f64 + (sy as f64 + 0.5) * step;
                if self.contains(sample_x, sample_y) {
                    inside += 1;
                }
            }
        }
        inside as f32 / (SUPERSAMPLES * SUPERSAMPLES) as f32
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: coverage is 1 strictly inside the circle and 0 strictly outside.
        #[test]
        fn prop_coverage_matches_geometry(
            side in 2u32..=120,
            (fx, fy) in (0.0f64..1.0, 0.0f64..1.0),
        ) {
            let px = (side as f64 * fx) as u32;
            let py = (side as f64 * fy) as u32;
            let clip = CircleClip::inscribed(side, side);
            let r = side as f64 / 2.0;

            // Farthest and nearest points of the pixel square to the centre
            let far_x = (px as f64 - r).abs().max((px as f64 + 1.0 - r).abs());
            let far_y = (py as f64 - r).abs().max((py as f64 + 1.0 - r).abs());
            let near_x = if (px as f64) <= r && r <= px as f64 + 1.0 { 0.0 } else { (px as f64 - r).abs().min((px as f64 + 1.0 - r).abs()) };
            let near_y = if (py as f64) <= r && r <= py as f64 + 1.0 { 0.0 } else { (py as f64 - r).abs().min((py as f64 + 1.0 - r).abs()) };

            let cov = clip.coverage(px, py);
            prop_assert!((0.0..=1.0).contains(&cov));
            if (far_x * far_x + far_y * far_y).sqrt() < r {
                prop_assert_eq!(cov, 1.0);
            }
            if (near_x * near_x + near_y * near_y).sqrt() > r {
                prop_assert_eq!(cov, 0.0);
            }
        }
    }
}
