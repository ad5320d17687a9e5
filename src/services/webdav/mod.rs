// WebDAV repository modules organized by functionality

pub mod auth;
pub mod config;
pub mod connection;
pub mod discovery;
pub mod entries;
pub mod media;
pub mod service;
pub mod url_management;

// Re-export main types for convenience
pub use auth::AuthContext;
pub use config::{BackendSettings, ConcurrencyConfig, RepositoryConfig, RequestConfig};
pub use connection::{Depth, WebDAVConnection};
pub use discovery::WebDAVDiscovery;
pub use entries::WebDAVEntryStore;
pub use media::WebDAVMediaStore;
pub use service::{ContentBackend, WebDAVRepository};
pub use url_management::{
    join_url, resolve_public_url, strip_prefix_len, with_trailing_slash, WebDAVUrlManager,
};

// Test modules
#[cfg(test)]
mod url_construction_tests;
