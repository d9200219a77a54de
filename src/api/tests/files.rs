use super::*;
use axum::http::header;

/// Create `<root>/<folder>/` holding the given files
async fn seed_folder(downloader: &SocialDownloader, folder: &str, files: &[(&str, &[u8])]) {
    let dir = downloader.config().download_dir().join(folder);
    tokio::fs::create_dir_all(&dir).await.unwrap();
    for (name, contents) in files {
        tokio::fs::write(dir.join(name), contents).await.unwrap();
    }
}

#[tokio::test]
async fn test_download_file_streams_attachment() {
    let (app, downloader, _temp_dir, _youtube) = create_test_app(|_| {});
    seed_folder(
        &downloader,
        "youtube_20240101_120000",
        &[("clip.mp4", b"video-bytes")],
    )
    .await;

    let response = app
        .oneshot(empty_request(
            "/download-file/youtube_20240101_120000/clip.mp4",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(headers[header::CONTENT_TYPE], "video/mp4");
    assert_eq!(headers[header::CONTENT_LENGTH], "11");
    assert!(
        headers[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .starts_with("attachment; filename=\"clip.mp4\"")
    );
    assert_eq!(body_bytes(response).await, b"video-bytes");
}

#[tokio::test]
async fn test_download_file_decodes_percent_encoded_names() {
    let (app, downloader, _temp_dir, _youtube) = create_test_app(|_| {});
    seed_folder(
        &downloader,
        "youtube_20240101_120000",
        &[("my clip.mp4", b"v")],
    )
    .await;

    let response = app
        .oneshot(empty_request(
            "/download-file/youtube_20240101_120000/my%20clip.mp4",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"v");
}

#[tokio::test]
async fn test_download_file_missing_is_404() {
    let (app, _downloader, _temp_dir, _youtube) = create_test_app(|_| {});

    let response = app
        .oneshot(empty_request("/download-file/nope/clip.mp4"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "File not found");
}

#[tokio::test]
async fn test_download_file_rejects_traversal() {
    let (app, downloader, temp_dir, _youtube) = create_test_app(|_| {});
    tokio::fs::write(temp_dir.path().join("secret.txt"), b"top secret")
        .await
        .unwrap();
    seed_folder(&downloader, "youtube_20240101_120000", &[("clip.mp4", b"v")]).await;

    for uri in [
        "/download-file/../secret.txt",
        "/download-file/%2E%2E/secret.txt",
        "/download-file/youtube_20240101_120000/..%2F..%2Fsecret.txt",
    ] {
        let response = app.clone().oneshot(empty_request(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn test_download_file_rejects_directories() {
    let (app, downloader, _temp_dir, _youtube) = create_test_app(|_| {});
    seed_folder(&downloader, "youtube_20240101_120000", &[("clip.mp4", b"v")]).await;

    let response = app
        .oneshot(empty_request("/download-file/youtube_20240101_120000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_download_folder_single_video_streams_it() {
    let (app, downloader, _temp_dir, _youtube) = create_test_app(|_| {});
    seed_folder(
        &downloader,
        "tiktok_20240101_120000",
        &[("only.mp4", b"one"), ("thumb.jpg", b"img")],
    )
    .await;

    let response = app
        .oneshot(empty_request("/download-folder/tiktok_20240101_120000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "video/mp4");
    assert_eq!(body_bytes(response).await, b"one");
}

#[tokio::test]
async fn test_download_folder_several_videos_lists_urls() {
    let (app, downloader, _temp_dir, _youtube) = create_test_app(|_| {});
    seed_folder(
        &downloader,
        "youtube_20240101_120000",
        &[("b.mp4", b"2"), ("a.mp4", b"1"), ("info.json", b"{}")],
    )
    .await;

    let response = app
        .oneshot(empty_request("/download-folder/youtube_20240101_120000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["folder"], "youtube_20240101_120000");
    assert_eq!(
        body["files"],
        serde_json::json!([
            {"name": "a.mp4", "url": "/download-file/youtube_20240101_120000/a.mp4"},
            {"name": "b.mp4", "url": "/download-file/youtube_20240101_120000/b.mp4"},
        ])
    );
}

#[tokio::test]
async fn test_download_folder_without_videos() {
    let (app, downloader, _temp_dir, _youtube) = create_test_app(|_| {});
    seed_folder(
        &downloader,
        "instagram_20240101_120000",
        &[("post.jpg", b"img")],
    )
    .await;

    let response = app
        .oneshot(empty_request("/download-folder/instagram_20240101_120000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "No MP4 videos found in folder");
}

#[tokio::test]
async fn test_download_folder_missing_is_404() {
    let (app, _downloader, _temp_dir, _youtube) = create_test_app(|_| {});

    for uri in ["/download-folder/nope", "/download-folder/.."] {
        let response = app.clone().oneshot(empty_request(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");

        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Folder not found");
    }
}
