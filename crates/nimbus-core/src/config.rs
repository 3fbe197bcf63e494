use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Url;

use crate::error::ConfigError;
use crate::locale::Language;

/// Environment variables checked, in order, for the text-generation credential.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// A display preference value that could not be parsed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unrecognized {kind}: {value}")]
pub struct ParsePreferenceError {
    pub kind: &'static str,
    pub value: String,
}

impl ParsePreferenceError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Temperature unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "C",
            TemperatureUnit::Fahrenheit => "F",
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = ParsePreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "celsius" | "°c" => Ok(TemperatureUnit::Celsius),
            "f" | "fahrenheit" | "°f" => Ok(TemperatureUnit::Fahrenheit),
            other => Err(ParsePreferenceError::new("temperature unit", other)),
        }
    }
}

/// Wind speed unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WindSpeedUnit {
    #[default]
    #[serde(rename = "kmh")]
    KilometersPerHour,
    #[serde(rename = "mph")]
    MilesPerHour,
    #[serde(rename = "ms")]
    MetersPerSecond,
}

impl WindSpeedUnit {
    pub fn label(self) -> &'static str {
        match self {
            WindSpeedUnit::KilometersPerHour => "km/h",
            WindSpeedUnit::MilesPerHour => "mph",
            WindSpeedUnit::MetersPerSecond => "m/s",
        }
    }
}

impl FromStr for WindSpeedUnit {
    type Err = ParsePreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kmh" | "km/h" | "kph" => Ok(WindSpeedUnit::KilometersPerHour),
            "mph" => Ok(WindSpeedUnit::MilesPerHour),
            "ms" | "m/s" => Ok(WindSpeedUnit::MetersPerSecond),
            other => Err(ParsePreferenceError::new("wind unit", other)),
        }
    }
}

/// Weather overlay drawn over the base map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MapLayer {
    #[default]
    Clouds,
    Precipitation,
}

impl FromStr for MapLayer {
    type Err = ParsePreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clouds" | "satellite" => Ok(MapLayer::Clouds),
            "precipitation" | "precip" | "radar" => Ok(MapLayer::Precipitation),
            other => Err(ParsePreferenceError::new("map layer", other)),
        }
    }
}

/// Which weather provider fills in the snapshot after geocoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Randomized placeholder data
    #[default]
    Synthetic,
    /// Open-Meteo forecast API
    OpenMeteo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    /// Base URL of the Nominatim-compatible search service
    pub base_url: String,
    /// User-Agent sent with every lookup (required by the Nominatim usage policy)
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "Nimbus/0.1.0 (terminal weather dashboard)".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub provider: ProviderKind,
    pub open_meteo_url: String,
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Synthetic,
            open_meteo_url: "https://api.open-meteo.com".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Base URL of the Gemini API
    pub base_url: String,
    pub model: String,
    /// API key; usually left unset here and provided through the environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl SummaryConfig {
    /// API key from the config file, else from `GEMINI_API_KEY` / `API_KEY`.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                API_KEY_ENV_VARS
                    .iter()
                    .find_map(|var| std::env::var(var).ok())
                    .filter(|k| !k.trim().is_empty())
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// XYZ template for the base layer
    pub base_tile_url: String,
    /// Host serving the weather overlay tiles
    pub overlay_base_url: String,
    pub initial_zoom: u8,
    pub follow_zoom: u8,
    pub max_zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            base_tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            overlay_base_url: "https://tilecache.rainviewer.com".to_string(),
            initial_zoom: 7,
            follow_zoom: 8,
            max_zoom: 18,
        }
    }
}

/// Display preferences the dashboard starts with
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,
    #[serde(default)]
    pub wind_unit: WindSpeedUnit,
    #[serde(default)]
    pub map_layer: MapLayer,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub summary: SummaryConfig,

    #[serde(default)]
    pub map: MapConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Load configuration from the default location, falling back to defaults
    /// when no file exists yet.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Validate a loaded configuration, logging warnings.
    ///
    /// Returns an error if validation fails with critical errors.
    pub fn into_validated(self) -> Result<(Self, ValidationResult), ConfigError> {
        let validation = self.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((self, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        validate_url(&self.geocoding.base_url, "geocoding.base_url", &mut result);
        validate_url(
            &self.weather.open_meteo_url,
            "weather.open_meteo_url",
            &mut result,
        );
        validate_url(&self.summary.base_url, "summary.base_url", &mut result);
        validate_url(
            &self.map.overlay_base_url,
            "map.overlay_base_url",
            &mut result,
        );

        if self.geocoding.user_agent.trim().is_empty() {
            result.add_error(
                "geocoding.user_agent",
                "A User-Agent is required by the geocoding service",
            );
        }

        for (field, secs) in [
            ("geocoding.timeout_secs", self.geocoding.timeout_secs),
            ("weather.timeout_secs", self.weather.timeout_secs),
            ("summary.timeout_secs", self.summary.timeout_secs),
        ] {
            if secs == 0 {
                result.add_error(field, "Timeout must be greater than 0");
            }
        }

        if ["{z}", "{x}", "{y}"]
            .iter()
            .any(|p| !self.map.base_tile_url.contains(p))
        {
            result.add_error(
                "map.base_tile_url",
                "Tile template must contain {z}, {x} and {y}",
            );
        }

        if self.map.initial_zoom > self.map.max_zoom || self.map.follow_zoom > self.map.max_zoom
        {
            result.add_error("map", "Zoom levels cannot exceed map.max_zoom");
        }

        if self.summary.model.trim().is_empty() {
            result.add_error("summary.model", "Model identifier cannot be empty");
        }

        if self.summary.resolved_api_key().is_none() {
            result.add_warning(
                "summary.api_key",
                "No text-generation API key configured - AI analysis will be unavailable",
            );
        }

        result
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("nimbus");

        Ok(config_dir.join("config.toml"))
    }
}

fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }

            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(
            result.is_valid(),
            "Default config should be valid: {:?}",
            result.errors
        );
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.geocoding.base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "geocoding.base_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.summary.base_url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result
            .errors
            .iter()
            .any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_timeout_is_error() {
        let mut config = Config::default();
        config.geocoding.timeout_secs = 0;
        let result = config.validate();
        assert!(result
            .errors
            .iter()
            .any(|e| e.field == "geocoding.timeout_secs"));
    }

    #[test]
    fn test_tile_template_requires_placeholders() {
        let mut config = Config::default();
        config.map.base_tile_url = "https://tiles.example.com/static.png".to_string();
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "map.base_tile_url"));
    }

    #[test]
    fn test_zoom_above_max_is_error() {
        let mut config = Config::default();
        config.map.follow_zoom = 30;
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "map"));
    }

    #[test]
    fn test_configured_api_key_takes_precedence() {
        let mut config = Config::default();
        config.summary.api_key = Some("from-file".to_string());
        assert_eq!(
            config.summary.resolved_api_key().as_deref(),
            Some("from-file")
        );
    }

    #[test]
    fn test_into_validated_rejects_invalid_config() {
        let mut config = Config::default();
        config.summary.model = "  ".to_string();
        let err = config.into_validated().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("summary.model")));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.ui.language = Language::English;
        config.ui.wind_unit = WindSpeedUnit::MilesPerHour;
        config.weather.provider = ProviderKind::OpenMeteo;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.ui.language, Language::English);
        assert_eq!(loaded.ui.wind_unit, WindSpeedUnit::MilesPerHour);
        assert_eq!(loaded.weather.provider, ProviderKind::OpenMeteo);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\nlanguage = \"ar\"\ntemperature_unit = \"fahrenheit\"\n")
            .unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.ui.language, Language::Arabic);
        assert_eq!(loaded.ui.temperature_unit, TemperatureUnit::Fahrenheit);
        assert_eq!(loaded.map.initial_zoom, 7);
        assert_eq!(loaded.summary.model, "gemini-3-flash-preview");
    }

    #[test]
    fn test_partial_section_fills_remaining_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[summary]\napi_key = \"abc\"\n\n[map]\nfollow_zoom = 9\n",
        )
        .unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.summary.api_key.as_deref(), Some("abc"));
        assert_eq!(loaded.summary.base_url, SummaryConfig::default().base_url);
        assert_eq!(loaded.summary.timeout_secs, 30);
        assert_eq!(loaded.map.follow_zoom, 9);
        assert_eq!(loaded.map.initial_zoom, 7);
        assert!(loaded.validate().is_valid());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui\nlanguage = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn test_preference_parsing_accepts_aliases() {
        assert_eq!("F".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Fahrenheit);
        assert_eq!("m/s".parse::<WindSpeedUnit>().unwrap(), WindSpeedUnit::MetersPerSecond);
        assert_eq!("radar".parse::<MapLayer>().unwrap(), MapLayer::Precipitation);
        assert!("kelvin".parse::<TemperatureUnit>().is_err());
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
