use tracing::{debug, info, warn};

use crate::errors::{RepositoryError, Result};
use crate::models::{ChildEntry, CollectionSpec, EntryFile, ListingEntry};
use super::auth::AuthContext;
use super::connection::{Depth, WebDAVConnection};
use super::url_management::strip_prefix_len;

/// Directory listing and collection resolution
#[derive(Debug, Clone)]
pub struct WebDAVDiscovery {
    connection: WebDAVConnection,
}

impl WebDAVDiscovery {
    pub fn new(connection: WebDAVConnection) -> Self {
        Self { connection }
    }

    /// Depth-1 listing of a folder: the folder itself plus its direct children
    pub async fn list(&self, auth: &AuthContext, folder: &str) -> Result<Vec<ListingEntry>> {
        self.connection.propfind(auth, folder, Depth::One).await
    }

    /// Length of the folder's own href as the server spells it.
    ///
    /// Servers disagree on whether hrefs are full URLs or absolute paths,
    /// so a depth-0 request on the folder itself is the only reliable way
    /// to learn how long the prefix of its children is.
    pub async fn prefix_len(&self, auth: &AuthContext, folder: &str) -> Result<usize> {
        let listing = self.connection.propfind(auth, folder, Depth::Zero).await?;
        let own = listing.first().ok_or_else(|| {
            RepositoryError::parse(format!("depth-0 listing of '{}' reported no entries", folder))
        })?;
        Ok(own.path.len())
    }

    /// Files directly under `folder` whose name ends with `extension`,
    /// relative to `folder`.
    ///
    /// Sub-directories are dropped even when their name matches.
    pub async fn list_filtered(
        &self,
        auth: &AuthContext,
        folder: &str,
        extension: &str,
    ) -> Result<Vec<ChildEntry>> {
        let prefix_len = self.prefix_len(auth, folder).await?;
        let listing = self.list(auth, folder).await?;
        let suffix = normalize_extension(extension);

        let children: Vec<ChildEntry> = listing
            .into_iter()
            .filter(|entry| !entry.is_collection)
            .filter_map(|entry| match relative_child(&entry.path, prefix_len) {
                Some("") => None,
                Some(relative) => Some(relative.to_string()),
                None => {
                    warn!(
                        "Ignoring href '{}' shorter than the listed folder's own href",
                        entry.path
                    );
                    None
                }
            })
            .filter(|relative| relative.ends_with(&suffix))
            .map(|path| ChildEntry { path })
            .collect();

        debug!("Folder '{}': {} files matching '{}'", folder, children.len(), suffix);
        Ok(children)
    }

    /// Repository-relative files of a collection, whichever way its
    /// membership is declared.
    pub async fn resolve(&self, auth: &AuthContext, collection: &CollectionSpec) -> Result<Vec<EntryFile>> {
        match collection {
            CollectionSpec::Folder { folder, extension } => {
                let folder = self.connection.url_manager().normalize_folder(folder);
                info!("🔍 Discovering entries in folder: {}", folder);

                let children = self.list_filtered(auth, &folder, extension).await?;
                Ok(children
                    .into_iter()
                    .map(|child| EntryFile::new(format!("{}{}", folder, child.path)))
                    .collect())
            }
            CollectionSpec::Files { files } => Ok(files
                .iter()
                .map(|entry| {
                    EntryFile::with_label(entry.file.trim_start_matches('/'), entry.label.clone())
                })
                .collect()),
        }
    }
}

fn normalize_extension(extension: &str) -> String {
    format!(".{}", extension.trim_start_matches('.'))
}

/// Child href with the folder's own href cut off. A self href spelled
/// without a trailing slash leaves one in front of every child.
fn relative_child(href: &str, prefix_len: usize) -> Option<&str> {
    strip_prefix_len(href, prefix_len).map(|relative| relative.trim_start_matches('/'))
}
