//! Settings resolution: override > cache > default, then write back
//!
//! The merge itself is a pure function over three records; the cache file is
//! handled by `SettingsCache`.

use std::path::{Path, PathBuf};
use tracing::{info, warn};
use crate::types::{EffectiveSettings, PartialSettings, MonitorError, MonitorResult};

/// Merge the three tiers field by field
///
/// Invalid overrides are a configuration error; invalid cached values are
/// dropped so the default shows through.
pub fn resolve(
    overrides: &PartialSettings,
    cached: &PartialSettings,
    defaults: &EffectiveSettings,
) -> MonitorResult<EffectiveSettings> {
    validate(overrides).map_err(MonitorError::Config)?;
    let cached = sanitize_cache(cached);

    Ok(EffectiveSettings {
        thread_id: overrides
            .thread_id
            .clone()
            .or(cached.thread_id)
            .unwrap_or_else(|| defaults.thread_id.clone()),
        min_intensity: overrides
            .min_intensity
            .or(cached.min_intensity)
            .unwrap_or(defaults.min_intensity),
        max_score: overrides
            .max_score
            .or(cached.max_score)
            .unwrap_or(defaults.max_score),
        keywords: overrides
            .keywords
            .clone()
            .or(cached.keywords)
            .unwrap_or_else(|| defaults.keywords.clone()),
        multiplier: overrides
            .multiplier
            .or(cached.multiplier)
            .unwrap_or(defaults.multiplier),
    })
}

/// Check every present field, returning the first problem found
fn validate(layer: &PartialSettings) -> Result<(), String> {
    if let Some(id) = &layer.thread_id {
        check_thread_id(id)?;
    }
    if let Some(min) = layer.min_intensity {
        check_min_intensity(min)?;
    }
    if let Some(max) = layer.max_score {
        check_max_score(max)?;
    }
    if let Some(multiplier) = layer.multiplier {
        check_multiplier(multiplier)?;
    }
    Ok(())
}

fn check_thread_id(id: &str) -> Result<(), String> {
    if id.trim().is_empty() {
        return Err("thread id must not be empty".to_string());
    }
    Ok(())
}

fn check_min_intensity(min: f64) -> Result<(), String> {
    if !(0.0..=1.0).contains(&min) {
        return Err(format!("minimum intensity {} is outside 0.0-1.0", min));
    }
    Ok(())
}

fn check_max_score(max: u32) -> Result<(), String> {
    if max == 0 {
        return Err("max upvotes must be greater than zero".to_string());
    }
    Ok(())
}

fn check_multiplier(multiplier: f64) -> Result<(), String> {
    if !(multiplier.is_finite() && multiplier >= 0.0) {
        return Err(format!("multiplier {} must be a finite value >= 0", multiplier));
    }
    Ok(())
}

/// Drop cached fields that would fail validation
fn sanitize_cache(cached: &PartialSettings) -> PartialSettings {
    let mut clean = cached.clone();

    if let Some(Err(reason)) = clean.thread_id.as_deref().map(check_thread_id) {
        warn!("Ignoring cached post_id: {}", reason);
        clean.thread_id = None;
    }
    if let Some(Err(reason)) = clean.min_intensity.map(check_min_intensity) {
        warn!("Ignoring cached min_intensity: {}", reason);
        clean.min_intensity = None;
    }
    if let Some(Err(reason)) = clean.max_score.map(check_max_score) {
        warn!("Ignoring cached max_upvotes: {}", reason);
        clean.max_score = None;
    }
    if let Some(Err(reason)) = clean.multiplier.map(check_multiplier) {
        warn!("Ignoring cached multiplier: {}", reason);
        clean.multiplier = None;
    }
    clean
}

// =============================================================================
// CACHE FILE
// =============================================================================

/// Flat JSON document holding the last resolved settings
#[derive(Debug, Clone)]
pub struct SettingsCache {
    path: PathBuf,
}

impl SettingsCache {
    /// Cache stored at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location on disk
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cache; a missing or malformed file reads as empty
    pub fn load(&self) -> PartialSettings {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(_) => return PartialSettings::empty(),
        };

        match serde_json::from_str(&json) {
            Ok(cached) => cached,
            Err(e) => {
                warn!("Settings cache {} is malformed ({}), ignoring it", self.path.display(), e);
                PartialSettings::empty()
            }
        }
    }

    /// Overwrite the cache with all five fields
    pub fn save(&self, settings: &EffectiveSettings) -> MonitorResult<()> {
        let json = serde_json::to_string_pretty(settings)?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Delete the cache file; returns whether one existed
    pub fn reset(&self) -> MonitorResult<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// RESOLVER
// =============================================================================

/// Startup settings resolution bound to a cache file
#[derive(Debug, Clone)]
pub struct SettingsResolver {
    cache: SettingsCache,
    defaults: EffectiveSettings,
}

impl SettingsResolver {
    /// Resolver with built-in defaults
    pub fn new(cache: SettingsCache) -> Self {
        Self::with_defaults(cache, EffectiveSettings::default())
    }

    /// Resolver with custom defaults
    pub fn with_defaults(cache: SettingsCache, defaults: EffectiveSettings) -> Self {
        Self { cache, defaults }
    }

    /// Reset (if asked), merge the tiers and persist the result
    pub fn resolve(&self, overrides: &PartialSettings, reset: bool) -> MonitorResult<EffectiveSettings> {
        if reset && self.cache.reset()? {
            info!("Cache reset.");
        }

        let cached = self.cache.load();
        let settings = resolve(overrides, &cached, &self.defaults)?;
        self.cache.save(&settings)?;
        Ok(settings)
    }

    /// Underlying cache
    pub fn cache(&self) -> &SettingsCache {
        &self.cache
    }
}

// =============================================================================
// TESTS
// =============================================================================
