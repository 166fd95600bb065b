use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} environment variable not set (or pass it on the command line)")]
    Missing(&'static str),
    #[error("Invalid API url {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
}

/// Nutritionix application credentials, sent with every request.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub app_id: String,
    pub app_key: String,
}

impl Credentials {
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_key: app_key.into(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(None, None)
    }

    /// Explicit values win over `NUTRITIONIX_APP_ID` / `NUTRITIONIX_APP_KEY`.
    pub fn resolve(app_id: Option<String>, app_key: Option<String>) -> Result<Self, ConfigError> {
        let app_id = match app_id {
            Some(id) => id,
            None => std::env::var("NUTRITIONIX_APP_ID")
                .map_err(|_| ConfigError::Missing("NUTRITIONIX_APP_ID"))?,
        };
        let app_key = match app_key {
            Some(key) => key,
            None => std::env::var("NUTRITIONIX_APP_KEY")
                .map_err(|_| ConfigError::Missing("NUTRITIONIX_APP_KEY"))?,
        };
        Ok(Self { app_id, app_key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_credentials_skip_env() {
        let creds = Credentials::resolve(Some("id".into()), Some("key".into())).unwrap();
        assert_eq!(creds.app_id, "id");
        assert_eq!(creds.app_key, "key");
    }
}
