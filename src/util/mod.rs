use crate::geometry::{EPSILON, FloatType};

/// Linear RGB color / light intensity, unbounded above.
pub type Color = rgb::RGB<FloatType>;

pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

pub trait ColorExt {
    /// Componentwise product, used for filtering light through coefficients.
    fn modulate(&self, other: &Color) -> Color;

    /// True if every channel is strictly below the threshold.
    fn all_below(&self, threshold: FloatType) -> bool;
}

impl ColorExt for Color {
    fn modulate(&self, other: &Color) -> Color {
        Color::new(self.r * other.r, self.g * other.g, self.b * other.b)
    }

    fn all_below(&self, threshold: FloatType) -> bool {
        self.r < threshold && self.g < threshold && self.b < threshold
    }
}

pub fn near_zero(x: FloatType) -> bool {
    x.abs() < EPSILON
}

/// Replaces values that are within rounding noise of zero with an exact zero.
pub fn snap_to_zero(x: FloatType) -> FloatType {
    if near_zero(x) { 0.0 } else { x }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;

    #[test]
    fn snapping() {
        assert!(snap_to_zero(1e-12) == 0.0);
        assert!(snap_to_zero(-1e-12) == 0.0);
        assert!(snap_to_zero(1e-3) == 1e-3);
    }

    #[test]
    fn color_arithmetic() {
        let mut c = Color::new(0.5, 0.25, 1.0) * 2.0;
        c += Color::new(1.0, 1.0, 1.0);
        assert!(c == Color::new(2.0, 1.5, 3.0));
        assert!(c + BLACK == c);
    }

    #[test]
    fn modulation() {
        let c = Color::new(0.5, 2.0, 1.0).modulate(&Color::new(0.5, 0.25, 0.0));
        assert!(c == Color::new(0.25, 0.5, 0.0));
        assert!(c.modulate(&WHITE) == c);
    }

    #[test]
    fn threshold() {
        assert!(Color::new(1e-4, 0.0, 5e-4).all_below(1e-3));
        assert!(!Color::new(1e-4, 1e-3, 5e-4).all_below(1e-3));
        assert!(BLACK.all_below(1e-3));
    }
}
