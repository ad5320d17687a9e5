use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use tracing::{debug, warn};

use crate::errors::{RepositoryError, Result};
use crate::models::ListingEntry;
use crate::webdav_xml_parser::parse_multistatus;
use super::auth::AuthContext;
use super::config::RequestConfig;
use super::url_management::WebDAVUrlManager;

const PROPFIND_BODY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<D:propfind xmlns:D="DAV:">
    <D:prop>
        <D:resourcetype/>
    </D:prop>
</D:propfind>"#;

/// PROPFIND traversal depth; deeper listings are never issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Zero,
    One,
}

impl Depth {
    pub fn as_str(&self) -> &'static str {
        match self {
            Depth::Zero => "0",
            Depth::One => "1",
        }
    }
}

fn propfind_method() -> Result<Method> {
    Method::from_bytes(b"PROPFIND")
        .map_err(|e| RepositoryError::configuration(format!("invalid PROPFIND method: {}", e)))
}

/// HTTP transport for the repository.
///
/// Takes repository-relative paths, turns them into URLs exactly once, and
/// maps every failure onto [`RepositoryError`]. Requests are never retried.
#[derive(Debug, Clone)]
pub struct WebDAVConnection {
    client: Client,
    url_manager: WebDAVUrlManager,
}

impl WebDAVConnection {
    pub fn new(url_manager: WebDAVUrlManager, request_config: &RequestConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_config.timeout())
            .build()
            .map_err(|e| RepositoryError::configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, url_manager))
    }

    pub fn with_client(client: Client, url_manager: WebDAVUrlManager) -> Self {
        Self {
            client,
            url_manager,
        }
    }

    pub fn url_manager(&self) -> &WebDAVUrlManager {
        &self.url_manager
    }

    fn request(&self, auth: &AuthContext, method: Method, path: &str) -> RequestBuilder {
        let url = self.url_manager.relative_path_to_url(path);
        debug!("{} {}", method, url);
        self.client
            .request(method, url)
            .headers(auth.headers_for())
            .header(CACHE_CONTROL, "no-store")
    }

    async fn send(&self, method: &Method, path: &str, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| RepositoryError::network(method, path, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} on '{}' failed with status {}", method, path, status);
            return Err(RepositoryError::http_status(method, path, status));
        }

        Ok(response)
    }

    /// Authenticated GET against the repository root with credentials that
    /// are not stored anywhere yet. A 401 means the credentials are wrong.
    ///
    /// Errors carry the root's repository-relative path, `""`.
    pub async fn probe(&self, auth: &AuthContext) -> Result<()> {
        let method = Method::GET;
        let root = "";
        let response = self
            .request(auth, method.clone(), root)
            .send()
            .await
            .map_err(|e| RepositoryError::network(&method, root, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(RepositoryError::AuthenticationFailed);
        }
        if !status.is_success() {
            return Err(RepositoryError::http_status(&method, root, status));
        }

        Ok(())
    }

    /// PROPFIND on a repository-relative path
    pub async fn propfind(&self, auth: &AuthContext, path: &str, depth: Depth) -> Result<Vec<ListingEntry>> {
        let method = propfind_method()?;
        let request = self
            .request(auth, method.clone(), path)
            .header("Depth", depth.as_str())
            .header(CONTENT_TYPE, "application/xml")
            .body(PROPFIND_BODY);

        let response = self.send(&method, path, request).await?;
        let body = response
            .text()
            .await
            .map_err(|e| RepositoryError::network(&method, path, e))?;

        let entries = parse_multistatus(&body)?;
        debug!("PROPFIND depth {} on '{}' reported {} entries", depth.as_str(), path, entries.len());
        Ok(entries)
    }

    /// GET a repository-relative path as text
    pub async fn get_text(&self, auth: &AuthContext, path: &str) -> Result<String> {
        let method = Method::GET;
        let request = self.request(auth, method.clone(), path);
        let response = self.send(&method, path, request).await?;
        response
            .text()
            .await
            .map_err(|e| RepositoryError::network(&method, path, e))
    }

    /// PUT a body to a repository-relative path, overwriting what is there
    pub async fn put<B: Into<reqwest::Body>>(
        &self,
        auth: &AuthContext,
        path: &str,
        body: B,
        content_type: &str,
    ) -> Result<()> {
        let method = Method::PUT;
        let request = self
            .request(auth, method.clone(), path)
            .header(CONTENT_TYPE, content_type)
            .body(body);
        self.send(&method, path, request).await?;
        Ok(())
    }

    /// DELETE a repository-relative path
    pub async fn delete(&self, auth: &AuthContext, path: &str) -> Result<()> {
        let method = Method::DELETE;
        let request = self.request(auth, method.clone(), path);
        self.send(&method, path, request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_header_values() {
        assert_eq!(Depth::Zero.as_str(), "0");
        assert_eq!(Depth::One.as_str(), "1");
    }

    #[test]
    fn test_propfind_method_is_extension_method() {
        assert_eq!(propfind_method().unwrap().as_str(), "PROPFIND");
    }
}
