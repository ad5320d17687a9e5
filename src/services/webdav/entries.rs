use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::models::{EntryFile, EntryRecord};
use super::auth::AuthContext;
use super::config::ConcurrencyConfig;
use super::connection::WebDAVConnection;

const ENTRY_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Reads and writes text entries
#[derive(Debug, Clone)]
pub struct WebDAVEntryStore {
    connection: WebDAVConnection,
    concurrency_config: ConcurrencyConfig,
}

impl WebDAVEntryStore {
    pub fn new(connection: WebDAVConnection, concurrency_config: ConcurrencyConfig) -> Self {
        Self {
            connection,
            concurrency_config,
        }
    }

    /// Fetches one entry; any non-success status fails the call
    pub async fn get_entry(&self, auth: &AuthContext, file: EntryFile) -> Result<EntryRecord> {
        debug!("⬇️ Fetching entry: {}", file.path);
        let data = self.connection.get_text(auth, &file.path).await?;
        Ok(EntryRecord { file, data })
    }

    /// Fetches every file, skipping the ones that fail.
    ///
    /// Results keep the input order no matter which request finishes first.
    pub async fn fetch_many(&self, auth: &AuthContext, files: Vec<EntryFile>) -> Vec<EntryRecord> {
        let requested = files.len();
        let limit = self.concurrency_config.max_concurrent_downloads.max(1);

        let results: Vec<_> = stream::iter(files)
            .map(|file| {
                let path = file.path.clone();
                async move { (path, self.get_entry(auth, file).await) }
            })
            .buffered(limit)
            .collect()
            .await;

        let records: Vec<EntryRecord> = results
            .into_iter()
            .filter_map(|(path, result)| match result {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping entry '{}': {}", path, e);
                    None
                }
            })
            .collect();

        info!("📊 Fetched {} of {} entries", records.len(), requested);
        records
    }

    /// Overwrites the entry at `path` with `raw`
    pub async fn persist_entry(&self, auth: &AuthContext, path: &str, raw: &str) -> Result<()> {
        debug!("⬆️ Writing entry: {} ({} bytes)", path, raw.len());
        self.connection
            .put(auth, path, raw.to_string(), ENTRY_CONTENT_TYPE)
            .await
    }
}
