/// Linear RGBA color with straight alpha.
///
/// Invariant:
/// - components live in linear space, so values can be written directly into
///   uniform buffers and sRGB render targets (the hardware encodes on store).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from sRGB bytes (`0`–`255`).
    ///
    /// This is the preferred constructor for colors coming from hex literals;
    /// each channel is decoded to linear space.
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: srgb_to_linear(r as f32 / 255.0),
            g: srgb_to_linear(g as f32 / 255.0),
            b: srgb_to_linear(b as f32 / 255.0),
            a: 1.0,
        }
    }

    /// Returns the array form uniform buffers expect.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Converts to the f64 color that wgpu clear operations take.
    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }

    /// Clamps all channels to [0, 1].
    ///
    /// Intended for user-provided inputs.
    #[inline]
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }
}

/// sRGB decode (IEC 61966-2-1).
#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_u8_endpoints_decode_exactly() {
        let c = Color::from_srgb_u8(0, 255, 0);
        assert_eq!(c.r, 0.0);
        assert!((c.g - 1.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn srgb_u8_midtone_is_darker_than_normalized_byte() {
        // Linear 128/255 would be ~0.502; decoded sRGB must land well below.
        let c = Color::from_srgb_u8(128, 128, 128);
        assert!(c.r > 0.2 && c.r < 0.25);
    }

    #[test]
    fn clamped_bounds_channels() {
        let c = Color::rgba(-1.0, 2.0, 0.5, 3.0).clamped();
        assert_eq!(c, Color::rgba(0.0, 1.0, 0.5, 1.0));
    }

    #[test]
    fn to_array_matches_fields() {
        assert_eq!(Color::rgb(0.1, 0.2, 0.3).to_array(), [0.1, 0.2, 0.3, 1.0]);
    }
}
