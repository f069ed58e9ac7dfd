//! Music volume laws.

/// Amplify volume: `((pressed + 2) / (total + 2))^2`.
///
/// Strictly increasing in `pressed`, never 0, and exactly 1.0 only when every
/// button is pressed.
pub fn amplify_volume(pressed: usize, total: usize) -> f32 {
    let ratio = (pressed.min(total) + 2) as f32 / (total + 2) as f32;
    ratio * ratio
}

/// Party reduction volume: `1 - spread / (2 * max_spread)`, clamped to `0.0..=1.0`.
pub fn reduction_volume(spread: usize, max_spread: usize) -> f32 {
    if max_spread == 0 {
        return 1.0;
    }
    (1.0 - spread as f32 / (2 * max_spread) as f32).clamp(0.0, 1.0)
}
