pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod webdav_xml_parser;

pub use errors::{AppError, RepositoryError, Result, UnsupportedOperation};
pub use models::{
    AssetRecord, ChildEntry, CollectionSpec, Credentials, EntryFile, EntryRecord, ListingEntry,
    ManifestEntry, MediaFile,
};
pub use services::webdav::{ContentBackend, RepositoryConfig, WebDAVRepository};
