//! Tests for the HTTP and directory fragment sources.

#[cfg(test)]
mod tests {
    use super::super::*;
    use std::time::Duration;
    use url::Url;

    async fn http_source(server: &mockito::ServerGuard) -> HttpSource {
        let base = Url::parse(&server.url()).unwrap();
        HttpSource::new(base, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn http_fetch_sends_accept_and_no_cache_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/components/sidebar.html")
            .match_header("accept", "text/html")
            .match_header("cache-control", "no-cache")
            .with_status(200)
            .with_body("<nav>ok</nav>")
            .create_async()
            .await;

        let source = http_source(&server).await;
        let body = source
            .fetch("/components/sidebar.html", Accept::Html)
            .await
            .unwrap();

        assert_eq!(body, "<nav>ok</nav>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn http_non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/components/footer.html")
            .with_status(503)
            .create_async()
            .await;

        let source = http_source(&server).await;
        let err = source
            .fetch("/components/footer.html", Accept::Html)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn http_blank_body_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/components/cta.html")
            .with_status(200)
            .with_body("   ")
            .create_async()
            .await;

        let source = http_source(&server).await;
        let err = source.fetch("/components/cta.html", Accept::Html).await.unwrap_err();
        assert!(matches!(err, FetchError::EmptyBody(_)));
    }

    #[tokio::test]
    async fn http_json_fixture_uses_json_accept() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/assets/data/formations.json")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let source = http_source(&server).await;
        assert_eq!(
            source
                .fetch("/assets/data/formations.json", Accept::Json)
                .await
                .unwrap(),
            "[]"
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn directory_source_reads_under_root() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("components")).unwrap();
        std::fs::write(root.path().join("components/footer.html"), "<footer></footer>").unwrap();

        let source = DirectorySource::new(root.path());
        assert_eq!(
            source
                .fetch("/components/footer.html", Accept::Html)
                .await
                .unwrap(),
            "<footer></footer>"
        );
        assert!(matches!(
            source.fetch("/components/missing.html", Accept::Html).await,
            Err(FetchError::NotFound(_))
        ));
        assert!(matches!(
            source.fetch("/../etc/passwd", Accept::Html).await,
            Err(FetchError::InvalidPath { .. })
        ));
    }

    #[tokio::test]
    async fn directory_source_rejects_blank_files() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("empty.html"), "\n").unwrap();
        let source = DirectorySource::new(root.path());
        assert!(matches!(
            source.fetch("empty.html", Accept::Html).await,
            Err(FetchError::EmptyBody(_))
        ));
    }
}
