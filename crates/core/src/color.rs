//! Color helpers and the installation palette.

use crate::types::Pixel;

pub const ORANGE_RED: Pixel = Pixel::new(255, 69, 0);
pub const RED_WINE: Pixel = Pixel::new(114, 14, 38);
pub const GREEN_GRASS: Pixel = Pixel::new(52, 160, 20);
pub const PURPLE: Pixel = Pixel::new(110, 0, 160);
pub const SOFT_WHITE: Pixel = Pixel::new(190, 170, 140);
pub const DIM_BLUE: Pixel = Pixel::new(0, 50, 100);

/// Party wave palette, innermost band first.
pub const PARTY_PALETTE: [Pixel; 4] = [RED_WINE, GREEN_GRASS, PURPLE, SOFT_WHITE];

/// Failure red at full, medium and low intensity.
pub const FAIL_RED_BRIGHT: Pixel = Pixel::new(255, 0, 0);
pub const FAIL_RED_MEDIUM: Pixel = Pixel::new(150, 0, 0);
pub const FAIL_RED_DARK: Pixel = Pixel::new(80, 0, 0);

/// HSV to RGB. Hue in degrees (wrapped), saturation and value in `0.0..=1.0`.
pub fn hsv_to_pixel(h: f32, s: f32, v: f32) -> Pixel {
    let h = h.rem_euclid(360.0);
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);

    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h as u32 {
        0..=59 => (c, x, 0.0),
        60..=119 => (x, c, 0.0),
        120..=179 => (0.0, c, x),
        180..=239 => (0.0, x, c),
        240..=299 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let ch = |f: f32| ((f + m) * 255.0) as u8;
    Pixel::new(ch(r), ch(g), ch(b))
}

/// Fully saturated hue at full brightness.
pub fn hue(h: f32) -> Pixel {
    hsv_to_pixel(h, 1.0, 1.0)
}

/// Green used for code digit `k` of an entered code.
pub fn code_digit_color(k: usize) -> Pixel {
    hsv_to_pixel(90.0 + 15.0 * k as f32, 1.0, 1.0)
}

/// Blue gradient used behind code entry; `progress` runs 0 at the start to 1 at the end.
pub fn code_gradient(progress: f32) -> Pixel {
    let p = progress.clamp(0.0, 1.0);
    hsv_to_pixel(240.0 - 40.0 * p, 1.0, 0.4 + 0.6 * p)
}

/// Sawtooth beat: ramps 0..=255 `bpm` times per minute.
pub fn beat8(bpm: u32, elapsed_ms: u64) -> u8 {
    ((elapsed_ms * bpm as u64 * 256 / 60_000) % 256) as u8
}
