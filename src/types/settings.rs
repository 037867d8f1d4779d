//! Settings records: the resolved configuration and its partial layers

use serde::{Deserialize, Serialize};
use crate::{
    DEFAULT_THREAD_ID, DEFAULT_MIN_INTENSITY, DEFAULT_MAX_SCORE,
    DEFAULT_KEYWORDS, DEFAULT_MULTIPLIER,
};

/// Configuration in effect for the whole run
///
/// Field names on disk follow the settings cache format
/// (`post_id`, `min_intensity`, `max_upvotes`, `keywords`, `multiplier`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveSettings {
    /// Thread being monitored
    #[serde(rename = "post_id")]
    pub thread_id: String,
    /// Intensity at (near) zero score, in [0, 1]
    pub min_intensity: f64,
    /// Score at which intensity reaches 1.0, never zero
    #[serde(rename = "max_upvotes")]
    pub max_score: u32,
    /// Lowercase keyword triggers, in order
    pub keywords: Vec<String>,
    /// Boost applied on a keyword hit
    pub multiplier: f64,
}

impl Default for EffectiveSettings {
    fn default() -> Self {
        Self {
            thread_id: DEFAULT_THREAD_ID.to_string(),
            min_intensity: DEFAULT_MIN_INTENSITY,
            max_score: DEFAULT_MAX_SCORE,
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            multiplier: DEFAULT_MULTIPLIER,
        }
    }
}

/// One layer of settings where every field may be absent
///
/// Used for both run-time overrides and the on-disk cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialSettings {
    #[serde(rename = "post_id", default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_intensity: Option<f64>,
    #[serde(rename = "max_upvotes", default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,
}

impl PartialSettings {
    /// Layer with nothing set
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Split a comma-separated keyword list: trimmed, lowercased, no empties
    pub fn parse_keywords(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_keys_on_disk() {
        let json = serde_json::to_value(EffectiveSettings::default()).unwrap();
        assert_eq!(json["post_id"], "gxvdih");
        assert_eq!(json["max_upvotes"], 100);
        assert_eq!(json["min_intensity"], 0.2);
        assert_eq!(json["multiplier"], 1.5);
        assert_eq!(json["keywords"][0], "knot");
    }

    #[test]
    fn test_partial_accepts_missing_fields() {
        let partial: PartialSettings = serde_json::from_str(r#"{"min_intensity": 0.4}"#).unwrap();
        assert_eq!(partial.min_intensity, Some(0.4));
        assert!(partial.thread_id.is_none());
        assert!(partial.keywords.is_none());
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(
            PartialSettings::parse_keywords(" Knot, ,CHOKE,puppy "),
            vec!["knot", "choke", "puppy"]
        );
        assert!(PartialSettings::parse_keywords(",,").is_empty());
    }

    #[test]
    fn test_empty_layer() {
        assert!(PartialSettings::empty().is_empty());
        let layer = PartialSettings { multiplier: Some(2.0), ..PartialSettings::empty() };
        assert!(!layer.is_empty());
    }
}
