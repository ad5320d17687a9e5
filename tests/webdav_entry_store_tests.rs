use std::time::Duration;

use davrepo::services::webdav::{
    ConcurrencyConfig, ContentBackend, RepositoryConfig, RequestConfig, WebDAVRepository,
};
use davrepo::{CollectionSpec, Credentials, ManifestEntry, RepositoryError};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn create_authenticated_repository(
    mock_server: &MockServer,
    concurrency_config: ConcurrencyConfig,
) -> WebDAVRepository {
    Mock::given(method("GET"))
        .and(path("/repo/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(mock_server)
        .await;

    let config = RepositoryConfig::new(&format!("{}/repo/", mock_server.uri()), "media", None)
        .expect("valid config");
    let mut repository =
        WebDAVRepository::new_with_configs(config, RequestConfig::default(), concurrency_config)
            .expect("Failed to create repository");
    repository
        .authenticate(Credentials::anonymous())
        .await
        .expect("anonymous access");
    repository
}

fn manifest(files: &[&str]) -> CollectionSpec {
    CollectionSpec::files(
        files
            .iter()
            .map(|file| ManifestEntry {
                file: file.to_string(),
                label: Some(format!("label for {}", file)),
            })
            .collect(),
    )
}

#[tokio::test]
async fn test_persist_then_get_returns_same_content() {
    let mock_server = MockServer::start().await;
    let content = "---\ntitle: Hello\n---\nBody text\n";

    Mock::given(method("PUT"))
        .and(path("/repo/posts/hello.md"))
        .and(body_string(content))
        .and(header("Content-Type", "text/plain; charset=utf-8"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repo/posts/hello.md"))
        .respond_with(ResponseTemplate::new(200).set_body_string(content))
        .mount(&mock_server)
        .await;

    let repository = create_authenticated_repository(&mock_server, ConcurrencyConfig::default()).await;
    repository.persist_entry("posts/hello.md", content).await.unwrap();

    let entry = repository.get_entry("posts/hello.md").await.unwrap();
    assert_eq!(entry.file.path, "posts/hello.md");
    assert_eq!(entry.data, content);
}

#[tokio::test]
async fn test_get_entry_failure_carries_path_and_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repo/posts/missing.md"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let repository = create_authenticated_repository(&mock_server, ConcurrencyConfig::default()).await;
    let err = repository.get_entry("/posts/missing.md").await.unwrap_err();

    match err {
        RepositoryError::Transport { method, path, status, .. } => {
            assert_eq!(method, "GET");
            assert_eq!(path, "posts/missing.md");
            assert_eq!(status, Some(404));
        }
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_persist_entry_failure_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/repo/posts/locked.md"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&mock_server)
        .await;

    let repository = create_authenticated_repository(&mock_server, ConcurrencyConfig::default()).await;
    let err = repository
        .persist_entry("posts/locked.md", "text")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(403));
}

#[tokio::test]
async fn test_read_and_write_errors_report_the_same_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repo/posts/locked.md"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/repo/posts/locked.md"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let repository = create_authenticated_repository(&mock_server, ConcurrencyConfig::default()).await;
    let read_err = repository.get_entry("/posts/locked.md").await.unwrap_err();
    let write_err = repository
        .persist_entry("/posts/locked.md", "text")
        .await
        .unwrap_err();

    for err in [read_err, write_err] {
        match err {
            RepositoryError::Transport { path, .. } => assert_eq!(path, "posts/locked.md"),
            other => panic!("expected transport error, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_fetch_many_skips_failures_and_keeps_order() {
    let mock_server = MockServer::start().await;

    // The first file answers last, so completion order differs from input order.
    Mock::given(method("GET"))
        .and(path("/repo/pages/one.md"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("one")
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repo/pages/two.md"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repo/pages/three.md"))
        .respond_with(ResponseTemplate::new(200).set_body_string("three"))
        .mount(&mock_server)
        .await;

    let repository = create_authenticated_repository(
        &mock_server,
        ConcurrencyConfig { max_concurrent_downloads: 3 },
    )
    .await;
    let entries = repository
        .entries_by_files(&manifest(&["pages/one.md", "pages/two.md", "pages/three.md"]))
        .await
        .unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].file.path, "pages/one.md");
    assert_eq!(entries[0].data, "one");
    assert_eq!(entries[0].file.label.as_deref(), Some("label for pages/one.md"));
    assert_eq!(entries[1].file.path, "pages/three.md");
    assert_eq!(entries[1].data, "three");
}

#[tokio::test]
async fn test_files_collection_issues_no_listing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repo/site/about.md"))
        .respond_with(ResponseTemplate::new(200).set_body_string("about"))
        .mount(&mock_server)
        .await;
    Mock::given(method("PROPFIND"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let repository = create_authenticated_repository(
        &mock_server,
        ConcurrencyConfig { max_concurrent_downloads: 1 },
    )
    .await;
    let entries = repository
        .entries_by_files(&manifest(&["/site/about.md"]))
        .await
        .unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].file.path, "site/about.md");
    assert_eq!(entries[0].data, "about");
}

#[tokio::test]
async fn test_requests_are_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repo/flaky.md"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&mock_server)
        .await;

    let repository = create_authenticated_repository(&mock_server, ConcurrencyConfig::default()).await;
    assert!(repository.get_entry("flaky.md").await.is_err());
}

#[tokio::test]
async fn test_slow_server_hits_request_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repo/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repo/slow.md"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let config = RepositoryConfig::new(&format!("{}/repo", mock_server.uri()), "media", None).unwrap();
    let mut repository = WebDAVRepository::new_with_configs(
        config,
        RequestConfig { timeout_seconds: 1 },
        ConcurrencyConfig::default(),
    )
    .unwrap();
    repository.authenticate(Credentials::anonymous()).await.unwrap();

    let err = repository.get_entry("slow.md").await.unwrap_err();
    match err {
        RepositoryError::Transport { status, message, .. } => {
            assert_eq!(status, None);
            assert!(message.contains("timed out"));
        }
        other => panic!("expected transport error, got {:?}", other),
    }
}
