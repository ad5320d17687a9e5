use serde::{Deserialize, Serialize};

/// Username/password pair collected by the host's login form.
///
/// An empty username together with an empty password means anonymous
/// access: no `Authorization` header is sent.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new<U: Into<String>, P: Into<String>>(username: U, password: P) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_anonymous(&self) -> bool {
        self.username.is_empty() && self.password.is_empty()
    }
}

// Keep the password out of logs and panic messages.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One node reported by a PROPFIND response, in server coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    pub path: String,
    pub is_collection: bool,
}

/// A child of a listed directory, relative to that directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildEntry {
    pub path: String,
}

/// One item of an explicit file manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// How the host declares a collection's membership
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CollectionSpec {
    /// Every file with `extension` directly under `folder`
    Folder {
        folder: String,
        #[serde(default = "default_extension")]
        extension: String,
    },
    /// An explicit manifest of repository-relative files
    Files { files: Vec<ManifestEntry> },
}

fn default_extension() -> String {
    "md".to_string()
}

impl CollectionSpec {
    pub fn folder<S: Into<String>>(folder: S) -> Self {
        CollectionSpec::Folder {
            folder: folder.into(),
            extension: default_extension(),
        }
    }

    pub fn files(files: Vec<ManifestEntry>) -> Self {
        CollectionSpec::Files { files }
    }
}

/// Repository-relative location of an entry, with its manifest label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFile {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl EntryFile {
    pub fn new<S: Into<String>>(path: S) -> Self {
        Self {
            path: path.into(),
            label: None,
        }
    }

    pub fn with_label<S: Into<String>>(path: S, label: Option<String>) -> Self {
        Self {
            path: path.into(),
            label,
        }
    }
}

/// One content item returned to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub file: EntryFile,
    pub data: String,
}

/// One media file descriptor.
///
/// `id` and `path` are repository-relative; `url` is what a browser should
/// load the asset from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: String,
    pub name: String,
    pub path: String,
    pub size: u64,
    pub url: String,
}

/// A media upload handed over by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub name: String,
    pub content: Vec<u8>,
    pub size: u64,
}

impl MediaFile {
    pub fn new<S: Into<String>>(name: S, content: Vec<u8>) -> Self {
        let size = content.len() as u64;
        Self {
            name: name.into(),
            content,
            size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_credentials() {
        assert!(Credentials::anonymous().is_anonymous());
        assert!(!Credentials::new("alice", "").is_anonymous());
        assert!(!Credentials::new("", "secret").is_anonymous());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let debug = format!("{:?}", Credentials::new("alice", "hunter2"));
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_collection_spec_from_host_json() {
        let folder: CollectionSpec =
            serde_json::from_str(r#"{"type":"folder","folder":"posts"}"#).unwrap();
        assert_eq!(folder, CollectionSpec::folder("posts"));

        let files: CollectionSpec = serde_json::from_str(
            r#"{"type":"files","files":[{"file":"site/about.md","label":"About"}]}"#,
        )
        .unwrap();
        assert_eq!(
            files,
            CollectionSpec::files(vec![ManifestEntry {
                file: "site/about.md".to_string(),
                label: Some("About".to_string()),
            }])
        );
    }
}
