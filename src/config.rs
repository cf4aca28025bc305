use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub system: SystemConfig,
    pub edge: EdgeThresholds,
    #[serde(default)]
    pub parlay: ParlayConfig,
    pub scanner: ScannerConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    pub dry_run: bool,
    pub database_path: String,
}

/// Three-factor gate for EDGE classification. All three must clear before
/// a market is shown as actionable.
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeThresholds {
    pub min_deviation_points: f64,
    pub min_confidence: f64,
    pub max_variance_for_edge: f64,
}

/// Volatility bucket thresholds for parlay evaluation. Product/UX tuning
/// knobs, not mathematical constants.
#[derive(Debug, Clone, Deserialize)]
pub struct ParlayConfig {
    #[serde(default = "default_low_max_legs")]
    pub low_max_legs: usize,
    #[serde(default = "default_extreme_min_legs")]
    pub extreme_min_legs: usize,
    #[serde(default = "default_high_min_legs")]
    pub high_min_legs: usize,
    #[serde(default = "default_low_min_probability")]
    pub low_min_probability: f64,
    #[serde(default = "default_extreme_max_probability")]
    pub extreme_max_probability: f64,
    #[serde(default = "default_high_max_probability")]
    pub high_max_probability: f64,
    #[serde(default = "default_stake")]
    pub default_stake: f64,
    #[serde(default = "default_max_legs")]
    pub max_candidate_legs: usize,
}

fn default_low_max_legs() -> usize { 2 }
fn default_extreme_min_legs() -> usize { 5 }
fn default_high_min_legs() -> usize { 4 }
fn default_low_min_probability() -> f64 { 0.35 }
fn default_extreme_max_probability() -> f64 { 0.05 }
fn default_high_max_probability() -> f64 { 0.15 }
fn default_stake() -> f64 { 100.0 }
fn default_max_legs() -> usize { 4 }

impl Default for ParlayConfig {
    fn default() -> Self {
        Self {
            low_max_legs: default_low_max_legs(),
            extreme_min_legs: default_extreme_min_legs(),
            high_min_legs: default_high_min_legs(),
            low_min_probability: default_low_min_probability(),
            extreme_max_probability: default_extreme_max_probability(),
            high_max_probability: default_high_max_probability(),
            default_stake: default_stake(),
            max_candidate_legs: default_max_legs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScannerConfig {
    pub polling_interval_secs: u64,
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub csv_logging: bool,
    pub csv_log_path: String,
}

#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub dry_run: bool,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }
}

impl EnvConfig {
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        Ok(Self {
            api_base_url: std::env::var("BEATVEGAS_API_URL")
                .unwrap_or_else(|_| "https://api.beatvegas.app".to_string()),
            api_token: std::env::var("BEATVEGAS_API_TOKEN").ok(),
            dry_run: std::env::var("DRY_RUN")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parlay_defaults() {
        let cfg = ParlayConfig::default();
        assert_eq!(cfg.low_max_legs, 2);
        assert_eq!(cfg.extreme_min_legs, 5);
        assert!((cfg.low_min_probability - 0.35).abs() < 1e-9);
        assert!((cfg.extreme_max_probability - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_parse_minimal_config() {
        let toml_str = r#"
            [system]
            dry_run = true
            database_path = "signals.db"

            [edge]
            min_deviation_points = 3.0
            min_confidence = 70.0
            max_variance_for_edge = 50.0

            [scanner]
            polling_interval_secs = 300
            cache_ttl_secs = 120

            [monitoring]
            csv_logging = false
            csv_log_path = "signals.csv"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert!((config.edge.min_deviation_points - 3.0).abs() < 1e-9);
        // [parlay] omitted entirely, defaults kick in
        assert_eq!(config.parlay.low_max_legs, 2);
        assert!((config.parlay.default_stake - 100.0).abs() < 1e-9);
    }
}
