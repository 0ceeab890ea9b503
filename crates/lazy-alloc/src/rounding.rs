//! Presentation rounding for deltas.
//!
//! Rounding is applied after allocation, never inside it. Rounded deltas can
//! miss the contribution by up to `n * 0.5 * 10^-decimals`.

/// Two decimal places.
pub const CENTS: u32 = 2;

/// Most places an f64 delta can meaningfully carry.
pub const MAX_DECIMALS: u32 = 15;

/// Round one delta to `decimals` places, half away from zero.
///
/// `-0.0` results are normalised to `0.0`. Above [`MAX_DECIMALS`], or when
/// scaling would overflow, the delta is returned unrounded.
pub fn round_delta(delta: f64, decimals: u32) -> f64 {
    if decimals > MAX_DECIMALS {
        return delta;
    }
    let scale = 10f64.powi(decimals as i32);
    let scaled = delta * scale;
    if !scaled.is_finite() {
        return delta;
    }
    let rounded = scaled.round() / scale;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

pub fn round_deltas(deltas: &[f64], decimals: u32) -> Vec<f64> {
    deltas.iter().map(|d| round_delta(*d, decimals)).collect()
}
