use serde::Deserialize;
use url::Url;

use crate::errors::{RepositoryError, Result};
use super::url_management::with_trailing_slash;

/// Backend settings as the host hands them over: every field optional,
/// nothing validated yet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendSettings {
    pub url: Option<String>,
    pub media_folder: Option<String>,
    pub public_folder: Option<String>,
}

/// Validated, normalized repository configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    base_url: String,
    media_folder: String,
    public_folder: Option<String>,
}

/// Request configuration for WebDAV operations
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub timeout_seconds: u64,
}

/// Concurrency configuration for WebDAV operations
#[derive(Debug, Clone)]
pub struct ConcurrencyConfig {
    pub max_concurrent_downloads: usize,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            max_concurrent_downloads: 8,
        }
    }
}

impl RequestConfig {
    /// Gets the timeout duration
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }
}

impl RepositoryConfig {
    /// Creates a configuration, validating and normalizing every field
    pub fn new(base_url: &str, media_folder: &str, public_folder: Option<&str>) -> Result<Self> {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            return Err(RepositoryError::configuration(
                "URL is not defined in the backend configuration",
            ));
        }

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(RepositoryError::configuration(format!(
                "URL must start with http:// or https://, got '{}'",
                base_url
            )));
        }

        Url::parse(base_url).map_err(|e| {
            RepositoryError::configuration(format!("URL '{}' is invalid: {}", base_url, e))
        })?;

        let media_folder = media_folder.trim().trim_start_matches('/');
        if media_folder.is_empty() {
            return Err(RepositoryError::configuration(
                "media folder must name a directory below the repository URL",
            ));
        }

        let public_folder = public_folder
            .map(str::trim)
            .filter(|folder| !folder.is_empty())
            .map(with_trailing_slash);

        Ok(Self {
            base_url: with_trailing_slash(base_url),
            media_folder: with_trailing_slash(media_folder),
            public_folder,
        })
    }

    /// Validates the host's settings once, failing fast on missing fields
    pub fn from_settings(settings: &BackendSettings) -> Result<Self> {
        let url = settings.url.as_deref().ok_or_else(|| {
            RepositoryError::configuration("URL is not defined in the backend configuration")
        })?;
        let media_folder = settings
            .media_folder
            .as_deref()
            .ok_or_else(|| RepositoryError::configuration("media folder is not defined"))?;

        Self::new(url, media_folder, settings.public_folder.as_deref())
    }

    /// Repository base URL, always ending in `/`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Media folder relative to the base URL, always ending in `/`
    pub fn media_folder(&self) -> &str {
        &self.media_folder
    }

    /// Public URL prefix for media, always ending in `/` when present
    pub fn public_folder(&self) -> Option<&str> {
        self.public_folder.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_all_folders() {
        let config = RepositoryConfig::new(
            "https://dav.example.com/repo",
            "/static/media",
            Some("/media"),
        )
        .unwrap();

        assert_eq!(config.base_url(), "https://dav.example.com/repo/");
        assert_eq!(config.media_folder(), "static/media/");
        assert_eq!(config.public_folder(), Some("/media/"));
    }

    #[test]
    fn test_already_normalized_input_is_unchanged() {
        let config =
            RepositoryConfig::new("https://dav.example.com/repo/", "media/", None).unwrap();

        assert_eq!(config.base_url(), "https://dav.example.com/repo/");
        assert_eq!(config.media_folder(), "media/");
        assert_eq!(config.public_folder(), None);
    }

    #[test]
    fn test_blank_public_folder_is_absent() {
        let config = RepositoryConfig::new("http://localhost/dav", "media", Some("  ")).unwrap();
        assert_eq!(config.public_folder(), None);
    }

    #[test]
    fn test_missing_url_is_configuration_error() {
        let settings = BackendSettings {
            url: None,
            media_folder: Some("media".to_string()),
            public_folder: None,
        };
        let err = RepositoryConfig::from_settings(&settings).unwrap_err();
        assert!(matches!(err, RepositoryError::Configuration { .. }));

        assert!(RepositoryConfig::new("   ", "media", None).is_err());
    }

    #[test]
    fn test_missing_media_folder_is_configuration_error() {
        let settings = BackendSettings {
            url: Some("https://dav.example.com".to_string()),
            media_folder: None,
            public_folder: None,
        };
        assert!(matches!(
            RepositoryConfig::from_settings(&settings),
            Err(RepositoryError::Configuration { .. })
        ));
        assert!(RepositoryConfig::new("https://dav.example.com", "/", None).is_err());
    }

    #[test]
    fn test_rejects_non_http_urls() {
        assert!(RepositoryConfig::new("ftp://dav.example.com", "media", None).is_err());
        assert!(RepositoryConfig::new("dav.example.com/repo", "media", None).is_err());
        assert!(RepositoryConfig::new("https://", "media", None).is_err());
    }

    #[test]
    fn test_settings_deserialize_from_host_json() {
        let settings: BackendSettings = serde_json::from_str(
            r#"{"url":"https://dav.example.com/repo","media_folder":"media"}"#,
        )
        .unwrap();
        let config = RepositoryConfig::from_settings(&settings).unwrap();
        assert_eq!(config.base_url(), "https://dav.example.com/repo/");
        assert_eq!(config.public_folder(), None);
    }
}
