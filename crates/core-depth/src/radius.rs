//! Depth-to-radius model for dilation structuring elements

/// Radius that shrinks with distance: `round(scale_px_m / depth)`, clamped
///
/// A structure at depth `d` meters appears roughly `1/d` times as large, so
/// nearer bands grow further. Non-positive depths map to `max_px`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusModel {
    /// Radius in pixels of a structure one meter away
    pub scale_px_m: f32,
    /// Upper bound on the radius
    pub max_px: i32,
}

impl RadiusModel {
    pub fn new(scale_px_m: f32, max_px: i32) -> Self {
        Self { scale_px_m, max_px }
    }

    /// Radius in pixels for a physical depth in meters
    pub fn radius(&self, depth_m: f32) -> i32 {
        if depth_m <= 0.0 || !depth_m.is_finite() {
            return self.max_px;
        }
        let r = (self.scale_px_m / depth_m).round();
        if r >= self.max_px as f32 {
            self.max_px
        } else {
            r as i32
        }
    }
}

impl Default for RadiusModel {
    fn default() -> Self {
        Self {
            scale_px_m: 4.0,
            max_px: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_shrinks_with_depth() {
        let model = RadiusModel::new(4.0, 8);
        assert_eq!(model.radius(1.0), 4);
        assert_eq!(model.radius(2.0), 2);
        assert_eq!(model.radius(4.0), 1);
        assert_eq!(model.radius(20.0), 0);
    }

    #[test]
    fn test_radius_clamped() {
        let model = RadiusModel::new(4.0, 8);
        assert_eq!(model.radius(0.1), 8);
        assert_eq!(model.radius(0.0), 8);
        assert_eq!(model.radius(-1.0), 8);
    }
}
