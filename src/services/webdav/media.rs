use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::models::{AssetRecord, MediaFile};
use super::auth::AuthContext;
use super::connection::{Depth, WebDAVConnection};

/// Binary assets under the configured media folder
#[derive(Debug, Clone)]
pub struct WebDAVMediaStore {
    connection: WebDAVConnection,
}

impl WebDAVMediaStore {
    pub fn new(connection: WebDAVConnection) -> Self {
        Self { connection }
    }

    fn asset(&self, name: &str, size: u64) -> AssetRecord {
        let url_manager = self.connection.url_manager();
        let path = url_manager.media_path(name);
        AssetRecord {
            id: path.clone(),
            name: name.to_string(),
            path,
            size,
            url: url_manager.asset_url(name),
        }
    }

    /// Files directly in the media folder.
    ///
    /// The listing carries no sizes, so every asset reports `size == 0`.
    /// Names are percent-decoded so they match what `persist` returns for
    /// the same upload.
    pub async fn list(&self, auth: &AuthContext) -> Result<Vec<AssetRecord>> {
        let url_manager = self.connection.url_manager();
        let media_folder = url_manager.config().media_folder();
        let folder_url = url_manager.media_folder_url();

        let listing = self.connection.propfind(auth, media_folder, Depth::One).await?;

        let assets: Vec<AssetRecord> = listing
            .iter()
            .filter(|entry| !entry.is_collection)
            .filter_map(|entry| match url_manager.href_relative_to(&entry.path, &folder_url) {
                Some("") => None,
                Some(name) => Some(self.asset(&decode_name(name), 0)),
                None => {
                    warn!("Ignoring media href '{}' outside {}", entry.path, folder_url);
                    None
                }
            })
            .collect();

        info!("🖼️ Found {} media files in {}", assets.len(), media_folder);
        Ok(assets)
    }

    /// Uploads a file into the media folder.
    ///
    /// Returns once the PUT has succeeded; the descriptor is derived from
    /// configuration alone, never from the server's reply.
    pub async fn persist(&self, auth: &AuthContext, file: MediaFile) -> Result<AssetRecord> {
        let name = file.name.trim_start_matches('/').to_string();
        let asset = self.asset(&name, file.size);
        let content_type = mime_guess::from_path(&name).first_or_octet_stream();

        debug!("⬆️ Uploading media: {} ({} bytes, {})", asset.path, file.size, content_type);
        self.connection
            .put(auth, &asset.path, file.content, content_type.essence_str())
            .await?;

        Ok(asset)
    }

    /// Deletes any repository-relative path, media or entry
    pub async fn delete(&self, auth: &AuthContext, path: &str) -> Result<()> {
        info!("🗑️ Deleting: {}", path);
        self.connection.delete(auth, path).await
    }
}

/// Decodes a percent-encoded href segment, keeping it as-is when it is not
/// valid UTF-8 once decoded
fn decode_name(name: &str) -> String {
    urlencoding::decode(name)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(name))
        .into_owned()
}
