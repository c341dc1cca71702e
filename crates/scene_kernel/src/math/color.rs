//! Linear RGB color

use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

/// RGB color with float channels, nominally in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    /// Opaque white
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };

    /// Black
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };

    /// Create a color from channels
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a packed `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 255) as f32 / 255.0,
            g: ((hex >> 8) & 255) as f32 / 255.0,
            b: (hex & 255) as f32 / 255.0,
        }
    }

    /// Pack into `0xRRGGBB`, clamping each channel
    pub fn to_hex(&self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Raise each channel to `gamma_factor`
    pub fn gamma_to_linear(&self, gamma_factor: f32) -> Self {
        Self::new(
            self.r.powf(gamma_factor),
            self.g.powf(gamma_factor),
            self.b.powf(gamma_factor),
        )
    }

    /// Raise each channel to `1 / gamma_factor`; a non-positive factor leaves the color unchanged
    pub fn linear_to_gamma(&self, gamma_factor: f32) -> Self {
        let inverse = if gamma_factor > 0.0 { 1.0 / gamma_factor } else { 1.0 };
        Self::new(self.r.powf(inverse), self.g.powf(inverse), self.b.powf(inverse))
    }

    /// Add a scalar to every channel
    pub fn add_scalar(&self, s: f32) -> Self {
        Self::new(self.r + s, self.g + s, self.b + s)
    }

    /// Interpolate towards `other`
    pub fn lerp(&self, other: &Color, alpha: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * alpha,
            self.g + (other.g - self.g) * alpha,
            self.b + (other.b - self.b) * alpha,
        )
    }

    /// Channels as an array
    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        Color::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl Mul for Color {
    type Output = Color;

    fn mul(self, rhs: Color) -> Color {
        Color::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b)
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, s: f32) -> Color {
        Color::new(self.r * s, self.g * s, self.b * s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hex_conversion() {
        let c = Color::from_hex(0xff8000);
        assert_relative_eq!(c.r, 1.0);
        assert_relative_eq!(c.g, 128.0 / 255.0);
        assert_relative_eq!(c.b, 0.0);
        assert_eq!(c.to_hex(), 0xff8000);
        assert_eq!(Color::new(2.0, -1.0, 0.0).to_hex(), 0xff0000);
    }

    #[test]
    fn test_gamma_roundtrip() {
        let c = Color::new(0.25, 0.5, 0.81);
        let linear = c.gamma_to_linear(2.0);
        assert_relative_eq!(linear.r, 0.0625);
        let back = linear.linear_to_gamma(2.0);
        assert_relative_eq!(back.b, 0.81, epsilon = 1e-6);
        assert_eq!(c.linear_to_gamma(0.0), c);
    }

    #[test]
    fn test_arithmetic() {
        let a = Color::new(0.1, 0.2, 0.3);
        let b = Color::new(0.5, 0.5, 0.5);
        let sum = a + b;
        assert_relative_eq!(sum.g, 0.7);
        assert_relative_eq!((a * b).b, 0.15);
        assert_relative_eq!((a * 2.0).r, 0.2);
        assert_relative_eq!(a.add_scalar(0.1).r, 0.2);
        assert_relative_eq!(Color::BLACK.lerp(&Color::WHITE, 0.25).g, 0.25);
    }
}
