use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::coverage::{DEFAULT_MAX_BATCHES, DEFAULT_MAX_SAMPLES};

/// Coverage radius around each store in meters
pub const DEFAULT_RADIUS_M: f64 = 800.0;
/// Monte Carlo samples per km²; 50-500 keeps city-scale ratios stable
pub const DEFAULT_DENSITY_PER_KM2: f64 = 50.0;

fn default_radius() -> f64 {
    DEFAULT_RADIUS_M
}
fn default_density() -> f64 {
    DEFAULT_DENSITY_PER_KM2
}
fn default_max_batches() -> usize {
    DEFAULT_MAX_BATCHES
}
fn default_max_samples() -> usize {
    DEFAULT_MAX_SAMPLES
}
fn default_verbose() -> bool {
    false
}

#[derive(Debug, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default = "default_density")]
    pub density: f64,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_max_batches")]
    pub max_batches: usize,
    #[serde(default = "default_max_samples")]
    pub max_samples: usize,
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    #[serde(default)]
    pub overpass: Option<OverpassConfig>,
    #[serde(default)]
    pub nominatim: Option<NominatimConfig>,
}

fn default_overpass_urls() -> Vec<String> {
    vec![
        "https://overpass-api.de/api/interpreter".to_string(),
        "https://overpass.private.coffee/api/interpreter".to_string(),
        "https://maps.mail.ru/osm/tools/overpass/api/interpreter".to_string(),
    ]
}

fn default_timeout_secs() -> u64 {
    200
}

fn default_max_retries() -> u32 {
    3
}

#[derive(Debug, Deserialize, Clone)]
pub struct OverpassConfig {
    #[serde(default = "default_overpass_urls")]
    pub urls: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            urls: default_overpass_urls(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_nominatim_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct NominatimConfig {
    #[serde(default = "default_nominatim_url")]
    pub url: String,
    #[serde(default = "default_nominatim_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            url: default_nominatim_url(),
            timeout_secs: default_nominatim_timeout_secs(),
        }
    }
}

impl FileConfig {
    /// Load the first parseable config file from the standard search paths
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// Load an explicitly requested config file; unlike `load`, any failure is an error
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("coverage-map.toml"),
        PathBuf::from(".coverage-map.toml"),
    ];

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("coverage-map").join("config.toml"));
        paths.push(config_dir.join("coverage-map.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".coverage-map.toml"));
        paths.push(home.join(".config").join("coverage-map").join("config.toml"));
    }

    paths
}
