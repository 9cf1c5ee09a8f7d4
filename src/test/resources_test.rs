#[cfg(test)]
pub mod tests {
    use reqwest::Url;
    use std::time::Duration;

    use crate::cores::resources::{file_name_from_url, media_kind, FetchError, ResourceFetcher};
    use crate::test::support::{spawn_media_server, PNG_BYTES};

    fn fetcher() -> ResourceFetcher {
        ResourceFetcher::new(Duration::from_secs(5)).unwrap()
    }

    fn url(base: &str, path: &str) -> Url {
        Url::parse(&format!("{}{}", base, path)).unwrap()
    }

    #[test]
    fn test_media_kind() {
        assert_eq!(media_kind("image/"), "image");
        assert_eq!(media_kind("audio/"), "audio");
        assert_eq!(media_kind(""), "resource");
    }

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(file_name_from_url(&Url::parse("https://example.com/a/photo.jpg?x=1").unwrap()), "photo.jpg");
        assert_eq!(file_name_from_url(&Url::parse("https://example.com/a/b/").unwrap()), "b");
        assert_eq!(file_name_from_url(&Url::parse("https://example.com").unwrap()), "upload");
    }

    #[test]
    fn test_fetch_error_messages() {
        let err = FetchError::MediaType { kind: "image".to_string() };
        assert_eq!(err.to_string(), "Error fetching image from URL: URL does not point to a valid image file");
        assert!(err.is_client_error());

        let err = FetchError::Status { kind: "audio".to_string(), code: 404, reason: "Not Found".to_string() };
        assert_eq!(err.to_string(), "Error fetching audio from URL: Failed to fetch audio: 404 Not Found");
        assert!(err.is_client_error());

        let err = FetchError::Transport { kind: "image".to_string(), message: "connection refused".to_string() };
        assert_eq!(err.to_string(), "Error fetching image from URL: connection refused");
        assert!(!err.is_client_error());
    }

    #[actix_rt::test]
    async fn test_fetch_image() {
        let base = spawn_media_server();
        let resource = fetcher().fetch_typed_resource(&url(&base, "/photo.png"), "image/").await.unwrap();

        assert_eq!(&resource.bytes[..], PNG_BYTES);
        assert_eq!(resource.content_type, "image/png");
        assert_eq!(resource.file_name, "photo.png");
    }

    #[actix_rt::test]
    async fn test_fetch_audio() {
        let base = spawn_media_server();
        let resource = fetcher().fetch_typed_resource(&url(&base, "/clip.wav"), "audio/").await.unwrap();
        assert_eq!(resource.content_type, "audio/wav");

        let err = fetcher().fetch_typed_resource(&url(&base, "/clip.wav"), "image/").await.unwrap_err();
        assert_eq!(err, FetchError::MediaType { kind: "image".to_string() });
    }

    #[actix_rt::test]
    async fn test_fetch_rejects_wrong_media_type() {
        let base = spawn_media_server();
        let err = fetcher().fetch_typed_resource(&url(&base, "/page.html"), "image/").await.unwrap_err();
        assert!(err.to_string().contains("not point to a valid image file"));
    }

    #[actix_rt::test]
    async fn test_fetch_reports_status() {
        let base = spawn_media_server();
        let err = fetcher().fetch_typed_resource(&url(&base, "/missing.png"), "image/").await.unwrap_err();
        match err {
            FetchError::Status { code, .. } => assert_eq!(code, 404),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn test_fetch_unreachable_host() {
        let err = fetcher()
            .fetch_typed_resource(&Url::parse("http://127.0.0.1:9/photo.png").unwrap(), "image/")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }
}
