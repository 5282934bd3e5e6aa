use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub geocoder: GeocoderConfig,
    pub local: LocalConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("ward-geocode/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
        }
    }
}

/// Which backend to put into the geocoder chain
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    AddressPointsApi,
    StreetCenterLinesApi,
    Census,
    Nominatim,
    AddressPointsFile,
}

impl BackendKind {
    /// Name used in the config file
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::AddressPointsApi => "address_points_api",
            BackendKind::StreetCenterLinesApi => "street_center_lines_api",
            BackendKind::Census => "census",
            BackendKind::Nominatim => "nominatim",
            BackendKind::AddressPointsFile => "address_points_file",
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeocoderConfig {
    /// Tried in order, first hit wins
    pub backends: Vec<BackendKind>,
    /// Appended to free-text queries ("1110 N STATE ST, Chicago IL")
    pub city_suffix: String,
    pub nominatim_interval_ms: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            backends: vec![
                BackendKind::AddressPointsApi,
                BackendKind::StreetCenterLinesApi,
                BackendKind::Census,
                BackendKind::Nominatim,
            ],
            city_suffix: "Chicago IL".to_string(),
            nominatim_interval_ms: 1000,
        }
    }
}

impl GeocoderConfig {
    /// Minimum spacing of Nominatim requests
    pub fn nominatim_interval(&self) -> Duration {
        Duration::from_millis(self.nominatim_interval_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LocalConfig {
    /// Address points CSV for the `address_points_file` backend
    pub address_points: Option<PathBuf>,
    /// How far (in house numbers) a nearby address may be from the one asked for
    pub fuzziness: u32,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            address_points: None,
            fuzziness: 10,
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        Self::from_toml(&content)
    }

    /// Parse config from TOML text; missing sections take defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_empty() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.geocoder.city_suffix, "Chicago IL");
        assert_eq!(config.geocoder.backends.len(), 4);
        assert_eq!(config.geocoder.nominatim_interval(), Duration::from_secs(1));
        assert_eq!(config.local.fuzziness, 10);
        assert!(config.local.address_points.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml(
            r#"
            [geocoder]
            backends = ["address_points_file", "census"]

            [local]
            address_points = "data/geocode/Address_Points.csv"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.geocoder.backends,
            vec![BackendKind::AddressPointsFile, BackendKind::Census]
        );
        assert_eq!(config.geocoder.nominatim_interval_ms, 1000);
        assert_eq!(
            config.local.address_points.as_deref(),
            Some(Path::new("data/geocode/Address_Points.csv"))
        );
        assert_eq!(config.local.fuzziness, 10);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(Config::from_toml("[geocoder]\nbackends = [\"bing\"]").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\nuser_agent = \"test-agent\"\ntimeout_secs = 5").unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.http.user_agent, "test-agent");
        assert_eq!(config.http.timeout_secs, 5);
    }

    #[test]
    fn test_missing_file() {
        assert!(Config::load_from_file("/nonexistent/ward-geocode.toml").is_err());
    }
}
