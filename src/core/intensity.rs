//! Intensity Engine: maps thread score and keyword boost to an actuation level
//!
//! level = min((min + (1 - min) * score / max_score) * boost, 1.0)

use crate::types::EffectiveSettings;

/// Score-to-intensity mapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityEngine {
    /// Level at score zero
    min_intensity: f64,
    /// Score where the unboosted level reaches 1.0
    max_score: u32,
}

impl IntensityEngine {
    /// Create new engine
    ///
    /// `max_score` must be non-zero; the settings resolver guarantees it.
    pub fn new(min_intensity: f64, max_score: u32) -> Self {
        Self { min_intensity, max_score: max_score.max(1) }
    }

    /// Engine for the resolved settings
    pub fn from_settings(settings: &EffectiveSettings) -> Self {
        Self::new(settings.min_intensity, settings.max_score)
    }

    /// Replace a non-positive score with 1 so an unvoted thread still pulses
    pub fn effective_score(raw: i64) -> i64 {
        if raw <= 0 { 1 } else { raw }
    }

    /// Level before the boost; not clamped, exceeds 1.0 above `max_score`
    pub fn base_intensity(&self, score: i64) -> f64 {
        let scaled = score as f64 / self.max_score as f64;
        self.min_intensity + (1.0 - self.min_intensity) * scaled
    }

    /// Final level, clamped at 1.0 from above only
    ///
    /// A boost below 1.0 can take the level under `min_intensity`.
    pub fn intensity(&self, score: i64, boost: f64) -> f64 {
        (self.base_intensity(score) * boost).min(1.0)
    }

    /// Minimum intensity
    pub fn min_intensity(&self) -> f64 {
        self.min_intensity
    }

    /// Score for full intensity
    pub fn max_score(&self) -> u32 {
        self.max_score
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> IntensityEngine {
        IntensityEngine::new(0.2, 100)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_half_score_no_boost() {
        assert!(close(engine().intensity(50, 1.0), 0.6));
    }

    #[test]
    fn test_half_score_with_boost() {
        assert!(close(engine().intensity(50, 1.5), 0.9));
    }

    #[test]
    fn test_zero_score_substituted() {
        let score = IntensityEngine::effective_score(0);
        assert_eq!(score, 1);
        assert!(close(engine().intensity(score, 1.0), 0.208));
        assert_eq!(IntensityEngine::effective_score(-40), 1);
        assert_eq!(IntensityEngine::effective_score(7), 7);
    }

    #[test]
    fn test_full_score_reaches_one() {
        assert!(close(engine().intensity(100, 1.0), 1.0));
    }

    #[test]
    fn test_monotonic_up_to_max() {
        let e = engine();
        let mut last = e.intensity(1, 1.0);
        for s in 2..=100 {
            let level = e.intensity(s, 1.0);
            assert!(level >= last, "intensity dropped at score {}", s);
            last = level;
        }
    }

    #[test]
    fn test_clamp_holds_for_any_boost() {
        let e = engine();
        for score in [1, 10, 99, 100, 5_000, 1_000_000] {
            for boost in [0.0, 0.5, 1.0, 1.5, 3.0, 100.0] {
                assert!(e.intensity(score, boost) <= 1.0);
            }
        }
    }

    #[test]
    fn test_weak_boost_goes_below_minimum() {
        let level = engine().intensity(1, 0.5);
        assert!(level < 0.2);
        assert!(close(level, 0.104));
    }

    #[test]
    fn test_base_is_unclamped() {
        assert!(engine().base_intensity(200) > 1.0);
        assert!(close(engine().intensity(200, 1.0), 1.0));
    }

    #[test]
    fn test_determinism() {
        let e = engine();
        assert_eq!(e.intensity(37, 1.5), e.intensity(37, 1.5));
    }
}
