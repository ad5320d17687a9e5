#[cfg(test)]
mod tests {
    use super::super::{join_url, RepositoryConfig, WebDAVUrlManager};

// Helper function to create a URL manager for a repository below a path
fn create_nested_manager() -> WebDAVUrlManager {
    let config = RepositoryConfig::new(
        "https://dav.example.com/remote.php/webdav/site",
        "static/uploads",
        None,
    )
    .unwrap();

    WebDAVUrlManager::new(config)
}

// Helper function to create a URL manager for a repository at the host root
fn create_root_manager() -> WebDAVUrlManager {
    let config = RepositoryConfig::new("http://localhost:8080/", "/media/", Some("/assets")).unwrap();

    WebDAVUrlManager::new(config)
}

fn assert_single_slashes(url: &str) {
    let (scheme, rest) = url.split_once("://").expect("absolute URL");
    assert!(!scheme.is_empty());
    assert!(!rest.contains("//"), "double slash in {}", url);
}

#[test]
fn test_entry_urls_under_nested_base() {
    let manager = create_nested_manager();

    let url = manager.relative_path_to_url("posts/2024/hello.md");
    assert_eq!(url, "https://dav.example.com/remote.php/webdav/site/posts/2024/hello.md");
    assert_single_slashes(&url);
}

#[test]
fn test_leading_slash_in_path_does_not_double() {
    let manager = create_nested_manager();

    let with_slash = manager.relative_path_to_url("/posts/hello.md");
    let without_slash = manager.relative_path_to_url("posts/hello.md");
    assert_eq!(with_slash, without_slash);
    assert_single_slashes(&with_slash);
}

#[test]
fn test_folder_urls_end_with_exactly_one_slash() {
    let manager = create_nested_manager();

    for folder in ["posts", "posts/", "/posts", "/posts/"] {
        let url = manager.folder_url(folder);
        assert_eq!(url, "https://dav.example.com/remote.php/webdav/site/posts/");
        assert_single_slashes(&url);
    }
}

#[test]
fn test_root_folder_is_base_url() {
    let manager = create_root_manager();

    assert_eq!(manager.folder_url(""), "http://localhost:8080/");
    assert_eq!(manager.relative_path_to_url("/"), "http://localhost:8080/");
}

#[test]
fn test_media_urls_with_and_without_public_folder() {
    let manager = create_nested_manager();
    assert_eq!(manager.media_path("cat.png"), "static/uploads/cat.png");
    assert_eq!(
        manager.asset_url("cat.png"),
        "https://dav.example.com/remote.php/webdav/site/static/uploads/cat.png"
    );
    assert_single_slashes(&manager.asset_url("cat.png"));

    let manager = create_root_manager();
    assert_eq!(manager.media_path("/cat.png"), "media/cat.png");
    assert_eq!(manager.asset_url("cat.png"), "/assets/cat.png");
}

#[test]
fn test_encoded_names_pass_through_unchanged() {
    let manager = create_root_manager();

    let url = manager.relative_path_to_url("posts/Hello%20World.md");
    assert_eq!(url, "http://localhost:8080/posts/Hello%20World.md");
}

#[test]
fn test_join_is_applied_once() {
    let manager = create_root_manager();
    let path = manager.media_path("cat.png");

    let url = join_url(manager.base_url(), &path);
    assert_eq!(url, manager.relative_path_to_url(&path));
    assert_eq!(url.matches("http://").count(), 1);
}
}
