//! # Display Helpers
//!
//! Turns analyzer output into numbers a renderer can draw directly: bar
//! heights, a decayed peak display, a dB level for the VU meter and packed
//! colors. No GUI types live here so the mapping can be tested headless.

/// Floor of the VU scale in dB.
pub const DB_FLOOR: f32 = -90.0;

/// Small epsilon value to prevent log(0) errors.
const EPSILON: f32 = 1e-12;

/// Groups `magnitudes` into `bars` bands and log-scales each into `[0, 1]`.
///
/// Each band shows its loudest bin. Heights are `ln(1 + m) / ln(1 + u16::MAX)`
/// so silence is 0 and a saturated bin is 1.
pub fn bar_heights(magnitudes: &[u16], bars: usize) -> Vec<f32> {
    if bars == 0 || magnitudes.is_empty() {
        return vec![0.0; bars];
    }

    let log_max = (u16::MAX as f32 + 1.0).ln();
    (0..bars)
        .map(|bar| {
            let start = bar * magnitudes.len() / bars;
            let end = ((bar + 1) * magnitudes.len() / bars).max(start + 1);
            let peak = magnitudes[start..end.min(magnitudes.len())]
                .iter()
                .copied()
                .max()
                .unwrap_or(0);
            ((peak as f32 + 1.0).ln() / log_max).clamp(0.0, 1.0)
        })
        .collect()
}

/// Peak-hold fall-off: each height becomes `max(current, previous * factor)`.
///
/// `previous` is resized to match `current` first.
pub fn decay_into(previous: &mut Vec<f32>, current: &[f32], factor: f32) {
    previous.resize(current.len(), 0.0);
    for (held, &now) in previous.iter_mut().zip(current) {
        *held = now.max(*held * factor);
    }
}

/// Converts a block intensity into dB, floored at [`DB_FLOOR`].
pub fn intensity_db(intensity: f32) -> f32 {
    if !intensity.is_finite() || intensity <= 0.0 {
        return DB_FLOOR;
    }
    (10.0 * (intensity + EPSILON).log10()).max(DB_FLOOR)
}

/// Packs a color for a normalized level as `0xRRGGBB`.
///
/// Green at 0, yellow at 0.5, red at 1; levels outside `[0, 1]` are clamped.
pub fn pack_rgb(level: f32) -> u32 {
    let level = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };
    let (r, g) = if level < 0.5 {
        ((level * 2.0 * 255.0).round() as u32, 255)
    } else {
        (255, ((1.0 - level) * 2.0 * 255.0).round() as u32)
    };
    (r << 16) | (g << 8)
}

/// Splits a packed `0xRRGGBB` color into its channels.
pub fn unpack_rgb(color: u32) -> (u8, u8, u8) {
    ((color >> 16) as u8, (color >> 8) as u8, color as u8)
}
