use async_trait::async_trait;
use tracing::{info, warn};

use crate::errors::{RepositoryError, Result, UnsupportedOperation};
use crate::models::{AssetRecord, CollectionSpec, Credentials, EntryFile, EntryRecord, MediaFile};

use super::auth::AuthContext;
use super::config::{ConcurrencyConfig, RepositoryConfig, RequestConfig};
use super::connection::WebDAVConnection;
use super::discovery::WebDAVDiscovery;
use super::entries::WebDAVEntryStore;
use super::media::WebDAVMediaStore;
use super::url_management::WebDAVUrlManager;

/// The capability set a content-editing host expects from a storage backend.
///
/// Operations the WebDAV backend cannot offer are still part of the trait
/// and fail with [`RepositoryError::Unsupported`].
#[async_trait]
pub trait ContentBackend: Send + Sync {
    async fn authenticate(&mut self, credentials: Credentials) -> Result<()>;
    fn logout(&mut self);
    fn restore_user(&self) -> Option<Credentials>;

    async fn entries_by_folder(&self, collection: &CollectionSpec) -> Result<Vec<EntryRecord>>;
    async fn entries_by_files(&self, collection: &CollectionSpec) -> Result<Vec<EntryRecord>>;
    async fn get_entry(&self, path: &str) -> Result<EntryRecord>;
    async fn persist_entry(&self, path: &str, raw: &str) -> Result<()>;

    async fn get_media(&self) -> Result<Vec<AssetRecord>>;
    async fn persist_media(&self, file: MediaFile) -> Result<AssetRecord>;
    async fn delete_file(&self, path: &str) -> Result<()>;

    async fn get_token(&self) -> Result<String> {
        Err(RepositoryError::unsupported(UnsupportedOperation::GetToken))
    }

    async fn traverse_cursor(&self) -> Result<Vec<EntryRecord>> {
        Err(RepositoryError::unsupported(UnsupportedOperation::TraverseCursor))
    }

    async fn unpublished_entries(&self) -> Result<Vec<EntryRecord>> {
        Err(RepositoryError::unsupported(UnsupportedOperation::UnpublishedEntries))
    }

    async fn unpublished_entry(&self, _collection: &str, _slug: &str) -> Result<EntryRecord> {
        Err(RepositoryError::unsupported(UnsupportedOperation::UnpublishedEntry))
    }

    async fn delete_unpublished_entry(&self, _collection: &str, _slug: &str) -> Result<()> {
        Err(RepositoryError::unsupported(UnsupportedOperation::DeleteUnpublishedEntry))
    }

    async fn update_unpublished_entry_status(
        &self,
        _collection: &str,
        _slug: &str,
        _status: &str,
    ) -> Result<()> {
        Err(RepositoryError::unsupported(UnsupportedOperation::UpdateUnpublishedEntryStatus))
    }

    async fn publish_unpublished_entry(&self, _collection: &str, _slug: &str) -> Result<()> {
        Err(RepositoryError::unsupported(UnsupportedOperation::PublishUnpublishedEntry))
    }
}

/// WebDAV server used as a content repository
///
/// Starts unauthenticated; `authenticate` stores credentials only after the
/// server accepted them, and `logout` drops them again. Listing, fetch and
/// write operations are meant to be called while authenticated.
#[derive(Debug, Clone)]
pub struct WebDAVRepository {
    config: RepositoryConfig,
    auth: AuthContext,
    connection: WebDAVConnection,
    discovery: WebDAVDiscovery,
    entries: WebDAVEntryStore,
    media: WebDAVMediaStore,
}

impl WebDAVRepository {
    /// Creates a repository with default request and concurrency settings
    pub fn new(config: RepositoryConfig) -> Result<Self> {
        Self::new_with_configs(config, RequestConfig::default(), ConcurrencyConfig::default())
    }

    pub fn new_with_configs(
        config: RepositoryConfig,
        request_config: RequestConfig,
        concurrency_config: ConcurrencyConfig,
    ) -> Result<Self> {
        let url_manager = WebDAVUrlManager::new(config.clone());
        let connection = WebDAVConnection::new(url_manager, &request_config)?;

        Ok(Self {
            config,
            auth: AuthContext::new(),
            discovery: WebDAVDiscovery::new(connection.clone()),
            entries: WebDAVEntryStore::new(connection.clone(), concurrency_config),
            media: WebDAVMediaStore::new(connection.clone()),
            connection,
        })
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_set()
    }

    /// Name of the logged-in user; empty for anonymous sessions
    pub fn current_user(&self) -> Option<&str> {
        self.auth.credentials().map(|c| c.username.as_str())
    }

    pub fn discovery(&self) -> &WebDAVDiscovery {
        &self.discovery
    }

    /// Resolves a collection of either kind and fetches its entries,
    /// skipping files that cannot be read
    async fn collection_entries(&self, collection: &CollectionSpec) -> Result<Vec<EntryRecord>> {
        let auth = self.auth();
        let files = self.discovery.resolve(auth, collection).await?;
        Ok(self.entries.fetch_many(auth, files).await)
    }

    fn auth(&self) -> &AuthContext {
        if !self.auth.is_set() {
            warn!("Repository operation issued before authentication");
        }
        &self.auth
    }
}

#[async_trait]
impl ContentBackend for WebDAVRepository {
    /// Checks the credentials with a GET on the repository root and keeps
    /// them on success. On failure the previous session is left untouched.
    async fn authenticate(&mut self, credentials: Credentials) -> Result<()> {
        info!("🔐 Authenticating against {}", self.config.base_url());
        let candidate = AuthContext::with_credentials(credentials.clone());

        match self.connection.probe(&candidate).await {
            Ok(()) => {
                if credentials.is_anonymous() {
                    info!("✅ Anonymous access accepted");
                } else {
                    info!("✅ Authenticated as '{}'", credentials.username);
                }
                self.auth.set_credentials(credentials);
                Ok(())
            }
            Err(e) => {
                warn!("❌ Authentication failed: {}", e);
                Err(e)
            }
        }
    }

    fn logout(&mut self) {
        info!("Logging out of {}", self.config.base_url());
        self.auth.clear();
    }

    /// Sessions are never persisted, so there is nothing to restore
    fn restore_user(&self) -> Option<Credentials> {
        None
    }

    async fn entries_by_folder(&self, collection: &CollectionSpec) -> Result<Vec<EntryRecord>> {
        match collection {
            CollectionSpec::Folder { .. } => self.collection_entries(collection).await,
            CollectionSpec::Files { .. } => Err(RepositoryError::configuration(
                "entries_by_folder needs a folder collection; use entries_by_files for a file list",
            )),
        }
    }

    /// Manifest-driven listing; never scans the server
    async fn entries_by_files(&self, collection: &CollectionSpec) -> Result<Vec<EntryRecord>> {
        match collection {
            CollectionSpec::Files { .. } => self.collection_entries(collection).await,
            CollectionSpec::Folder { .. } => Err(RepositoryError::configuration(
                "entries_by_files needs a file list collection; use entries_by_folder for a folder",
            )),
        }
    }

    async fn get_entry(&self, path: &str) -> Result<EntryRecord> {
        let file = EntryFile::new(path.trim_start_matches('/'));
        self.entries.get_entry(self.auth(), file).await
    }

    async fn persist_entry(&self, path: &str, raw: &str) -> Result<()> {
        self.entries
            .persist_entry(self.auth(), path.trim_start_matches('/'), raw)
            .await
    }

    async fn get_media(&self) -> Result<Vec<AssetRecord>> {
        self.media.list(self.auth()).await
    }

    async fn persist_media(&self, file: MediaFile) -> Result<AssetRecord> {
        self.media.persist(self.auth(), file).await
    }

    async fn delete_file(&self, path: &str) -> Result<()> {
        self.media.delete(self.auth(), path).await
    }
}
