use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::RankingThresholds;
use crate::models::{CompatibilityWeights, ScoringWeights};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub booking: BookingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub compatibility: CompatibilityWeightsConfig,
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
}

/// Venue score weights, overridable for tuning; must sum to 1.0
#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_distance_weight")]
    pub distance: f64,
    #[serde(default = "default_interests_weight")]
    pub interests: f64,
    #[serde(default = "default_price_weight")]
    pub price: f64,
    #[serde(default = "default_history_weight")]
    pub history: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            distance: default_distance_weight(),
            interests: default_interests_weight(),
            price: default_price_weight(),
            history: default_history_weight(),
        }
    }
}

fn default_distance_weight() -> f64 {
    0.25
}
fn default_interests_weight() -> f64 {
    0.35
}
fn default_price_weight() -> f64 {
    0.15
}
fn default_history_weight() -> f64 {
    0.25
}

impl From<WeightsConfig> for ScoringWeights {
    fn from(w: WeightsConfig) -> Self {
        Self {
            distance: w.distance,
            interests: w.interests,
            price: w.price,
            history: w.history,
        }
    }
}

/// Compatibility weights; must sum to 1.0
#[derive(Debug, Clone, Deserialize)]
pub struct CompatibilityWeightsConfig {
    #[serde(default = "default_shared_interests_weight")]
    pub shared_interests: f64,
    #[serde(default = "default_proximity_weight")]
    pub proximity: f64,
    #[serde(default = "default_compat_price_weight")]
    pub price: f64,
}

impl Default for CompatibilityWeightsConfig {
    fn default() -> Self {
        Self {
            shared_interests: default_shared_interests_weight(),
            proximity: default_proximity_weight(),
            price: default_compat_price_weight(),
        }
    }
}

fn default_shared_interests_weight() -> f64 {
    0.40
}
fn default_proximity_weight() -> f64 {
    0.30
}
fn default_compat_price_weight() -> f64 {
    0.30
}

impl From<CompatibilityWeightsConfig> for CompatibilityWeights {
    fn from(w: CompatibilityWeightsConfig) -> Self {
        Self {
            shared_interests: w.shared_interests,
            proximity: w.proximity,
            price: w.price,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdsConfig {
    #[serde(default = "default_venue_radius_km")]
    pub venue_radius_km: f64,
    #[serde(default)]
    pub distance_floor: f64,
    #[serde(default = "default_view_cap_secs")]
    pub view_cap_secs: u32,
    #[serde(default = "default_min_relevance")]
    pub min_relevance: f64,
    #[serde(default = "default_interest_signal_threshold")]
    pub interest_signal_threshold: f64,
    #[serde(default = "default_compatibility_threshold")]
    pub compatibility_threshold: f64,
    #[serde(default = "default_max_interested_users")]
    pub max_interested_users: usize,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            venue_radius_km: default_venue_radius_km(),
            distance_floor: 0.0,
            view_cap_secs: default_view_cap_secs(),
            min_relevance: default_min_relevance(),
            interest_signal_threshold: default_interest_signal_threshold(),
            compatibility_threshold: default_compatibility_threshold(),
            max_interested_users: default_max_interested_users(),
        }
    }
}

fn default_venue_radius_km() -> f64 {
    3.0
}
fn default_view_cap_secs() -> u32 {
    60
}
fn default_min_relevance() -> f64 {
    5.0
}
fn default_interest_signal_threshold() -> f64 {
    0.3
}
fn default_compatibility_threshold() -> f64 {
    40.0
}
fn default_max_interested_users() -> usize {
    5
}

impl From<ThresholdsConfig> for RankingThresholds {
    fn from(t: ThresholdsConfig) -> Self {
        Self {
            venue_radius_km: t.venue_radius_km,
            distance_floor: t.distance_floor,
            view_cap_secs: t.view_cap_secs,
            min_relevance: t.min_relevance,
            interest_signal_threshold: t.interest_signal_threshold,
            compatibility_threshold: t.compatibility_threshold,
            max_interested_users: t.max_interested_users,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingSettings {
    #[serde(default = "default_group_size_threshold")]
    pub group_size_threshold: usize,
    #[serde(default = "default_code_length")]
    pub confirmation_code_length: usize,
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            group_size_threshold: default_group_size_threshold(),
            confirmation_code_length: default_code_length(),
        }
    }
}

fn default_group_size_threshold() -> usize {
    4
}
fn default_code_length() -> usize {
    8
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with LUNA__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g. LUNA__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("LUNA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("LUNA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let w = WeightsConfig::default();
        assert!((w.distance + w.interests + w.price + w.history - 1.0).abs() < 1e-9);

        let c = CompatibilityWeightsConfig::default();
        assert!((c.shared_interests + c.proximity + c.price - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_default_weights() {
        let w = WeightsConfig::default();
        assert_eq!(w.distance, 0.25);
        assert_eq!(w.interests, 0.35);
        assert_eq!(w.price, 0.15);
        assert_eq!(w.history, 0.25);
    }

    #[test]
    fn test_default_thresholds() {
        let t = ThresholdsConfig::default();
        assert_eq!(t.venue_radius_km, 3.0);
        assert_eq!(t.view_cap_secs, 60);
        assert_eq!(t.max_interested_users, 5);
    }

    #[test]
    fn test_default_booking_settings() {
        let b = BookingSettings::default();
        assert_eq!(b.group_size_threshold, 4);
        assert_eq!(b.confirmation_code_length, 8);
    }
}
