use anyhow::{anyhow, Result};
use std::env;

use crate::models::Credentials;
use crate::services::webdav::{BackendSettings, ConcurrencyConfig, RepositoryConfig, RequestConfig};

#[derive(Clone, Debug)]
pub struct Config {
    pub repository: RepositoryConfig,
    pub credentials: Credentials,
    pub request: RequestConfig,
    pub concurrency: ConcurrencyConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = BackendSettings {
            url: env::var("WEBDAV_URL").ok(),
            media_folder: env::var("WEBDAV_MEDIA_FOLDER").ok(),
            public_folder: env::var("WEBDAV_PUBLIC_FOLDER").ok(),
        };
        let repository = RepositoryConfig::from_settings(&settings)?;

        let mut request = RequestConfig::default();
        if let Some(timeout) = parse_var("WEBDAV_TIMEOUT_SECONDS")? {
            request.timeout_seconds = timeout;
        }

        let mut concurrency = ConcurrencyConfig::default();
        if let Some(limit) = parse_var("WEBDAV_MAX_CONCURRENT_DOWNLOADS")? {
            concurrency.max_concurrent_downloads = limit;
        }

        Ok(Config {
            repository,
            credentials: Credentials::new(
                env::var("WEBDAV_USERNAME").unwrap_or_default(),
                env::var("WEBDAV_PASSWORD").unwrap_or_default(),
            ),
            request,
            concurrency,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("{} must be a positive number, got '{}'", name, value)),
        Err(_) => Ok(None),
    }
}
