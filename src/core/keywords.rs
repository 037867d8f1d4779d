//! Keyword classifier: picks the boost for a comment

use crate::types::EffectiveSettings;

/// Result of classifying one comment body
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// First trigger found, in configured order
    pub keyword: Option<String>,
    /// Multiplier to apply
    pub boost: f64,
}

/// Case-insensitive substring matcher over the trigger list
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    keywords: Vec<String>,
    multiplier: f64,
}

impl KeywordClassifier {
    /// Create new classifier
    pub fn new(keywords: &[String], multiplier: f64) -> Self {
        Self {
            keywords: keywords
                .iter()
                .map(|k| k.to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            multiplier,
        }
    }

    /// Classifier for the resolved settings
    pub fn from_settings(settings: &EffectiveSettings) -> Self {
        Self::new(&settings.keywords, settings.multiplier)
    }

    /// Classify a comment body
    pub fn classify(&self, body: &str) -> Classification {
        let text = body.to_lowercase();
        match self.keywords.iter().find(|k| text.contains(k.as_str())) {
            Some(keyword) => Classification { keyword: Some(keyword.clone()), boost: self.multiplier },
            None => Classification { keyword: None, boost: 1.0 },
        }
    }

    /// Configured triggers
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> KeywordClassifier {
        KeywordClassifier::new(&["knot".to_string(), "choke".to_string()], 1.5)
    }

    #[test]
    fn test_uppercase_body_matches() {
        let c = classifier().classify("what a KNOT");
        assert_eq!(c.keyword.as_deref(), Some("knot"));
        assert_eq!(c.boost, 1.5);
    }

    #[test]
    fn test_substring_match() {
        assert!(classifier().classify("unknotted").keyword.is_some());
    }

    #[test]
    fn test_no_match_is_neutral() {
        let c = classifier().classify("nice weather");
        assert!(c.keyword.is_none());
        assert_eq!(c.boost, 1.0);
    }

    #[test]
    fn test_first_trigger_in_order_wins() {
        let c = classifier().classify("choke on a knot");
        assert_eq!(c.keyword.as_deref(), Some("knot"));
    }

    #[test]
    fn test_uppercase_trigger_normalized() {
        let c = KeywordClassifier::new(&["Puppy".to_string()], 2.0);
        assert!(c.classify("PUPPY!").keyword.is_some());
        assert_eq!(c.keywords(), &["puppy".to_string()]);
    }

    #[test]
    fn test_empty_trigger_list_never_boosts() {
        let c = KeywordClassifier::new(&[], 2.0);
        assert!(c.classify("anything").keyword.is_none());
    }
}
