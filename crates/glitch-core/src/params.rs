//! Glitch parameters and their sanitization.
//!
//! Parameters arrive as loosely-typed values (from JSON, from JavaScript, or
//! from Rust callers that only care about one knob). They are never rejected:
//! missing or non-numeric fields fall back to [`DEFAULT_PARAMS`], numeric
//! fields are clamped and rounded.

use serde::de::{Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize};

/// Sanitized glitch parameters.
///
/// Every field is always present and in range. Build one through
/// [`sanitize`] or [`GlitchParams::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlitchParams {
    /// Value written at each corrupted offset, as a percentage of 256 (0 to 100).
    pub amount: u8,
    /// Number of offsets hit in the scan data (at least 1).
    pub iterations: u32,
    /// JPEG quality used before corruption (0 to 100).
    pub quality: u8,
    /// Position of each hit inside its slice of the scan data (0 to 100).
    pub seed: u8,
}

/// Defaults applied to any missing or malformed parameter.
pub const DEFAULT_PARAMS: GlitchParams = GlitchParams {
    amount: 35,
    iterations: 20,
    quality: 30,
    seed: 25,
};

impl Default for GlitchParams {
    fn default() -> Self {
        DEFAULT_PARAMS
    }
}

/// Unsanitized parameters as supplied by a caller.
///
/// Deserialization is lenient: a field holding a string, a boolean, `null`,
/// an object or anything else that is not a number is read as unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGlitchParams {
    #[serde(default, deserialize_with = "lenient_number")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub iterations: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub quality: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub seed: Option<f64>,
}

impl RawGlitchParams {
    /// Create an empty parameter set (everything falls back to defaults).
    pub fn new() -> Self {
        Self::default()
    }

    /// Byte value written at each offset, as a percentage (0-100).
    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Number of offsets to corrupt.
    pub fn iterations(mut self, iterations: f64) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// JPEG quality used before corruption (0-100).
    pub fn quality(mut self, quality: f64) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Position inside each slice, as a percentage (0-100).
    pub fn seed(mut self, seed: f64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Apply defaults, clamping and rounding.
    pub fn sanitize(&self) -> GlitchParams {
        sanitize(self)
    }
}

impl From<GlitchParams> for RawGlitchParams {
    fn from(params: GlitchParams) -> Self {
        Self {
            amount: Some(f64::from(params.amount)),
            iterations: Some(f64::from(params.iterations)),
            quality: Some(f64::from(params.quality)),
            seed: Some(f64::from(params.seed)),
        }
    }
}

/// Sanitize raw parameters.
///
/// `amount`, `quality` and `seed` are clamped to `[0, 100]` then rounded.
/// `iterations` is not clamped but must round to a positive finite integer,
/// otherwise the default is used. The function is idempotent.
pub fn sanitize(raw: &RawGlitchParams) -> GlitchParams {
    GlitchParams {
        amount: percentage(raw.amount, DEFAULT_PARAMS.amount),
        iterations: iteration_count(raw.iterations),
        quality: percentage(raw.quality, DEFAULT_PARAMS.quality),
        seed: percentage(raw.seed, DEFAULT_PARAMS.seed),
    }
}

fn percentage(value: Option<f64>, default: u8) -> u8 {
    match value {
        Some(v) if !v.is_nan() => round_half_up(v.clamp(0.0, 100.0)) as u8,
        _ => default,
    }
}

fn iteration_count(value: Option<f64>) -> u32 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => {
            let rounded = round_half_up(v);
            if rounded < 1.0 {
                DEFAULT_PARAMS.iterations
            } else {
                // float-to-int casts saturate
                rounded as u32
            }
        }
        _ => DEFAULT_PARAMS.iterations,
    }
}

/// Round to the nearest integer with halves going up (`2.5 -> 3`, `-2.5 -> -2`).
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Number(f64),
        Other(IgnoredAny),
    }

    Ok(match Lenient::deserialize(deserializer)? {
        Lenient::Number(n) => Some(n),
        Lenient::Other(_) => None,
    })
}
