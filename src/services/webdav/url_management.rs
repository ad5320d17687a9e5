use url::Url;

use super::config::RepositoryConfig;

/// Appends `/` unless the string already ends with one
pub fn with_trailing_slash(s: &str) -> String {
    if s.ends_with('/') {
        s.to_string()
    } else {
        format!("{}/", s)
    }
}

/// Drops the first `prefix_len` bytes of `s`.
///
/// Returns `None` when `s` is shorter than the prefix or the cut would
/// split a UTF-8 character.
pub fn strip_prefix_len(s: &str, prefix_len: usize) -> Option<&str> {
    s.get(prefix_len..)
}

/// Externally visible URL of a media asset: `public_folder + name` when a
/// public folder is configured, otherwise the repository URL itself.
pub fn resolve_public_url(repo_url: &str, public_folder: Option<&str>, relative_name: &str) -> String {
    match public_folder {
        Some(folder) => format!("{}{}", folder, relative_name),
        None => repo_url.to_string(),
    }
}

/// Joins a base URL and a relative path with exactly one `/` between them
pub fn join_url(base_url: &str, relative_path: &str) -> String {
    let clean_path = relative_path.trim_start_matches('/');
    format!("{}{}", with_trailing_slash(base_url), clean_path)
}

/// Centralized URL and path management for repository operations
///
/// Every lookup key handled by the repository is relative to the base URL;
/// this is the single place where relative paths become request URLs.
#[derive(Debug, Clone)]
pub struct WebDAVUrlManager {
    config: RepositoryConfig,
}

impl WebDAVUrlManager {
    pub fn new(config: RepositoryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Get the repository base URL, always ending in `/`
    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// Convert a repository-relative path to a full request URL
    ///
    /// Input:  "posts/a.md"
    /// Output: "https://dav.example.com/repo/posts/a.md"
    pub fn relative_path_to_url(&self, relative_path: &str) -> String {
        join_url(self.config.base_url(), relative_path)
    }

    /// URL of a repository folder, with the trailing slash collections expect
    pub fn folder_url(&self, folder: &str) -> String {
        with_trailing_slash(&self.relative_path_to_url(folder))
    }

    /// Repository-relative folder path with a trailing slash and no leading one
    pub fn normalize_folder(&self, folder: &str) -> String {
        let trimmed = folder.trim_start_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            with_trailing_slash(trimmed)
        }
    }

    /// URL of the configured media folder
    pub fn media_folder_url(&self) -> String {
        self.relative_path_to_url(self.config.media_folder())
    }

    /// Repository-relative path of a media file
    pub fn media_path(&self, name: &str) -> String {
        format!("{}{}", self.config.media_folder(), name.trim_start_matches('/'))
    }

    /// Public URL of a media file, see [`resolve_public_url`]
    pub fn asset_url(&self, name: &str) -> String {
        let name = name.trim_start_matches('/');
        let repo_url = self.relative_path_to_url(&self.media_path(name));
        resolve_public_url(&repo_url, self.config.public_folder(), name)
    }

    /// Strip a listed folder's own address from a child href.
    ///
    /// Servers report hrefs either as full URLs or as absolute paths, so
    /// both forms of `folder_url` are tried.
    ///
    /// Input:  "/repo/media/cat.png" with folder "https://dav.example.com/repo/media/"
    /// Output: "cat.png"
    pub fn href_relative_to<'a>(&self, href: &'a str, folder_url: &str) -> Option<&'a str> {
        if let Some(rest) = href.strip_prefix(folder_url) {
            return Some(rest);
        }

        let folder_path = Url::parse(folder_url).ok()?.path().to_string();
        href.strip_prefix(folder_path.as_str())
    }
}
