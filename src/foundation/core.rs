use crate::foundation::error::{MoshError, MoshResult};

/// 0-based index of a processed frame.
///
/// The first decoded frame only seeds the pipeline, so index 0 is the second decoded frame.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> MoshResult<Self> {
        if den == 0 {
            return Err(MoshError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(MoshError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Parse ffprobe-style rates such as `"30000/1001"` or `"25"`.
    pub fn parse_ratio(s: &str) -> MoshResult<Self> {
        let s = s.trim();
        let (num, den) = match s.split_once('/') {
            Some((n, d)) => (n.trim(), d.trim()),
            None => (s, "1"),
        };
        let num = num
            .parse::<u32>()
            .map_err(|e| MoshError::validation(format!("invalid fps numerator '{num}': {e}")))?;
        let den = den
            .parse::<u32>()
            .map_err(|e| MoshError::validation(format!("invalid fps denominator '{den}': {e}")))?;
        Self::new(num, den)
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
