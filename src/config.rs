use std::env;
use std::time::Duration;
use url::Url;

use crate::food::config::ConfigError;

pub const DEFAULT_API_URL: &str = "https://api.nutritionix.com/v1_1";
/// Nutritionix refuses pages larger than this.
pub const MAX_PAGE_SIZE: usize = 50;
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: Url,
    pub page_size: usize,
    pub timeout: Duration,
    pub histogram_bins: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API url is valid"),
            page_size: MAX_PAGE_SIZE,
            timeout: Duration::from_secs(30),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the config from any variable lookup, falling back to defaults per field.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // Get API URL from env or use default
        let api_url = match var("NUTRITIONIX_API_URL") {
            Some(raw) => parse_api_url(&raw)?,
            None => defaults.api_url,
        };

        let page_size = var("NUTRITIONIX_PAGE_SIZE")
            .and_then(|s| s.parse::<usize>().ok())
            .map(|n| n.clamp(1, MAX_PAGE_SIZE))
            .unwrap_or(defaults.page_size);

        let timeout = var("NUTRITIONIX_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        let histogram_bins = var("MENU_HISTOGRAM_BINS")
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(defaults.histogram_bins);

        Ok(Self {
            api_url,
            page_size,
            timeout,
            histogram_bins,
        })
    }

    pub fn with_api_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_url = parse_api_url(raw)?;
        Ok(self)
    }

    /// Endpoint under the base url, e.g. `endpoint("brand/search")`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url.as_str().trim_end_matches('/'), path)
    }
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let config = ClientConfig::default().with_api_url("http://127.0.0.1:8080/v1_1/").unwrap();
        assert_eq!(config.endpoint("search"), "http://127.0.0.1:8080/v1_1/search");

        let config = ClientConfig::default();
        assert_eq!(config.endpoint("brand/search"), "https://api.nutritionix.com/v1_1/brand/search");
    }

    fn config_from(pairs: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ClientConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_url.as_str(), "https://api.nutritionix.com/v1_1");
        assert_eq!(config.page_size, MAX_PAGE_SIZE);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.histogram_bins, DEFAULT_HISTOGRAM_BINS);
    }

    #[test]
    fn test_page_size_is_clamped() {
        assert_eq!(config_from(&[("NUTRITIONIX_PAGE_SIZE", "500")]).unwrap().page_size, 50);
        assert_eq!(config_from(&[("NUTRITIONIX_PAGE_SIZE", "0")]).unwrap().page_size, 1);
        assert_eq!(config_from(&[("NUTRITIONIX_PAGE_SIZE", "25")]).unwrap().page_size, 25);
        assert_eq!(config_from(&[("NUTRITIONIX_PAGE_SIZE", "lots")]).unwrap().page_size, 50);
    }

    #[test]
    fn test_zero_bins_falls_back_to_default() {
        assert_eq!(config_from(&[("MENU_HISTOGRAM_BINS", "0")]).unwrap().histogram_bins, 20);
        assert_eq!(config_from(&[("MENU_HISTOGRAM_BINS", "8")]).unwrap().histogram_bins, 8);
    }

    #[test]
    fn test_variables_override_defaults() {
        let config = config_from(&[
            ("NUTRITIONIX_API_URL", "http://localhost:9000/v1_1"),
            ("NUTRITIONIX_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(config.endpoint("search"), "http://localhost:9000/v1_1/search");
        assert_eq!(config.timeout, Duration::from_secs(5));

        assert!(config_from(&[("NUTRITIONIX_API_URL", "not a url")]).is_err());
    }

    #[test]
    fn test_rejects_invalid_url() {
        assert!(ClientConfig::default().with_api_url("not a url").is_err());
    }
}
