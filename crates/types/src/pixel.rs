//! Packed 24-bit RGB pixel.

/// A 24-bit RGB color packed into a `u32` as `0x00RRGGBB`.
///
/// Channels are extracted by shift and mask; the value is `Copy` and has no
/// identity beyond its bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pixel(u32);

impl Pixel {
    pub const BLACK: Pixel = Pixel::new(0, 0, 0);
    pub const WHITE: Pixel = Pixel::new(255, 255, 255);
    pub const RED: Pixel = Pixel::new(255, 0, 0);
    pub const GREEN: Pixel = Pixel::new(0, 255, 0);
    pub const BLUE: Pixel = Pixel::new(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    /// Build from a packed value; the top byte is discarded.
    pub const fn from_packed(value: u32) -> Self {
        Self(value & 0x00FF_FFFF)
    }

    pub const fn packed(self) -> u32 {
        self.0
    }

    pub const fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    pub const fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    pub const fn is_black(self) -> bool {
        self.0 == 0
    }

    /// Multiply every channel by `factor` (clamped to `0.0..=1.0`).
    pub fn scale(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        let ch = |c: u8| (c as f32 * f) as u8;
        Self::new(ch(self.r()), ch(self.g()), ch(self.b()))
    }

    /// Fade toward black by `amount`/256 of each channel.
    pub fn fade(self, amount: u8) -> Self {
        let keep = 256 - amount as u32;
        let ch = |c: u8| ((c as u32 * keep) >> 8) as u8;
        Self::new(ch(self.r()), ch(self.g()), ch(self.b()))
    }

    /// Per-channel saturating add.
    pub fn saturating_add(self, other: Pixel) -> Self {
        Self::new(
            self.r().saturating_add(other.r()),
            self.g().saturating_add(other.g()),
            self.b().saturating_add(other.b()),
        )
    }

    /// Per-channel maximum. Applying the same overlay twice is a no-op.
    pub fn lighten(self, other: Pixel) -> Self {
        Self::new(
            self.r().max(other.r()),
            self.g().max(other.g()),
            self.b().max(other.b()),
        )
    }
}

impl From<(u8, u8, u8)> for Pixel {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}
