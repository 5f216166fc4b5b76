use crate::{RetintError, RetintResult};

/// Every channel above this value counts as "near white" for blend-mode
/// selection. The comparison is strict.
pub const NEAR_WHITE_THRESHOLD: u8 = 230;
/// Lower bound applied to each target channel before multiply blending.
pub const CHANNEL_LOWER_BOUND: u8 = 50;
/// Upper bound applied to each target channel before multiply blending.
pub const CHANNEL_UPPER_BOUND: u8 = 230;

/// How masked pixels are shifted toward the target color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Per-channel `original * target / 255`.
    Multiply,
    /// Replace each channel with the pixel's channel average. Used for
    /// near-white targets, where a literal white multiply would be a no-op.
    Grayscale,
}

/// Parse a `#RRGGBB` color code (leading `#` optional) into RGB bytes.
pub fn parse_hex_color(code: &str) -> RetintResult<[u8; 3]> {
    let digits = code.strip_prefix('#').unwrap_or(code);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(RetintError::ColorParse(code.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|_| RetintError::ColorParse(code.to_string()))
    };
    Ok([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

/// Select the blend mode for a target color.
///
/// Runs on the unclamped color: clamping caps channels at the threshold, so
/// the grayscale arm would otherwise be unreachable.
pub fn select_blend_mode(target: [u8; 3]) -> BlendMode {
    if target.iter().all(|&c| c > NEAR_WHITE_THRESHOLD) {
        BlendMode::Grayscale
    } else {
        BlendMode::Multiply
    }
}

/// Clamp each target channel into the usable mid-range before blending.
///
/// Keeps fully saturated channels from producing pure-black or unmodified
/// multiply results.
pub fn clamp_for_blend(target: [u8; 3]) -> [u8; 3] {
    target.map(|c| c.clamp(CHANNEL_LOWER_BOUND, CHANNEL_UPPER_BOUND))
}
