//! End-to-end tests
//!
//! Drive the full router (multipart upload, pipeline, one-shot download)
//! against the fixture backends.

use axum::body::Body;
use axum::http::{header, Request};

/// Boundary used by `multipart_request`
pub const BOUNDARY: &str = "----subtitle-burner-test-boundary";

/// Build a `POST /generate` request with an optional file part and text fields
pub fn multipart_request(file: Option<(&str, &[u8])>, fields: &[(&str, &str)]) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }

    if let Some((filename, data)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
                 Content-Type: video/mp4\r\n\r\n",
                BOUNDARY, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/generate")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .expect("valid request")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::create_router;
    use crate::integration::fixtures::{
        test_config, test_state, FailingTranscoder, FailingTranscriber, RecordingTranscoder,
        StaticTranscriber,
    };
    use crate::state::AppState;
    use axum::http::StatusCode;
    use axum::response::Response;
    use axum::Router;
    use std::path::Path;
    use std::sync::Arc;
    use tower::util::ServiceExt;

    const VIDEO: &[u8] = b"\x00\x00\x00\x18ftypmp42 pretend video bytes";

    async fn body_bytes(response: Response) -> bytes::Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn file_count(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    }

    fn app(state: AppState) -> Router {
        create_router(Arc::new(state))
    }

    #[tokio::test]
    async fn test_generate_then_download_once() {
        let (state, _root) = test_state(
            Arc::new(StaticTranscriber::default()),
            Arc::new(RecordingTranscoder::default()),
        );
        let upload_dir = state.config.upload_dir.clone();
        let temp_dir = state.config.temp_dir.clone();
        let app = app(state);

        let request = multipart_request(
            Some(("clip.mp4", VIDEO)),
            &[("position", "Top"), ("font_size", "30")],
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["download_url"], "/download/clip_subtitled.mp4");
        assert!(!json["message"].as_str().unwrap().is_empty());

        // Intermediates are gone, the output waits for its download
        assert_eq!(file_count(&upload_dir), 0);
        assert_eq!(file_count(&temp_dir), 1);

        let response = app
            .clone()
            .oneshot(get("/download/clip_subtitled.mp4"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"clip_subtitled.mp4\""
        );
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "video/mp4");
        assert_eq!(
            response.headers().get(header::CONTENT_LENGTH).unwrap(),
            VIDEO.len().to_string().as_str()
        );
        // Unlinked before the body is read; the stream holds the open handle
        if cfg!(unix) {
            assert_eq!(file_count(&temp_dir), 0);
        }
        assert_eq!(&body_bytes(response).await[..], VIDEO);

        let response = app
            .oneshot(get("/download/clip_subtitled.mp4"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(&body_bytes(response).await[..], b"File not found");
    }

    #[tokio::test]
    async fn test_disallowed_extension_writes_nothing() {
        let (state, _root) = test_state(
            Arc::new(StaticTranscriber::default()),
            Arc::new(RecordingTranscoder::default()),
        );
        let upload_dir = state.config.upload_dir.clone();
        let temp_dir = state.config.temp_dir.clone();

        let response = app(state)
            .oneshot(multipart_request(Some(("video.exe", VIDEO)), &[]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Invalid file type");
        assert_eq!(file_count(&upload_dir), 0);
        assert_eq!(file_count(&temp_dir), 0);
    }

    #[tokio::test]
    async fn test_missing_file_part() {
        let (state, _root) = test_state(
            Arc::new(StaticTranscriber::default()),
            Arc::new(RecordingTranscoder::default()),
        );

        let response = app(state)
            .oneshot(multipart_request(None, &[("font_family", "Arial")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["message"], "No file part");
    }

    #[tokio::test]
    async fn test_empty_filename() {
        let (state, _root) = test_state(
            Arc::new(StaticTranscriber::default()),
            Arc::new(RecordingTranscoder::default()),
        );

        let response = app(state)
            .oneshot(multipart_request(Some(("", &b""[..])), &[]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["message"], "No selected file");
    }

    #[tokio::test]
    async fn test_transcoder_failure_is_500_and_cleans_up() {
        let (state, _root) = test_state(
            Arc::new(StaticTranscriber::default()),
            Arc::new(FailingTranscoder),
        );
        let upload_dir = state.config.upload_dir.clone();
        let temp_dir = state.config.temp_dir.clone();

        let response = app(state)
            .oneshot(multipart_request(Some(("clip.mp4", VIDEO)), &[]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(json["status"], "error");
        assert!(json["message"]
            .as_str()
            .unwrap()
            .contains("Invalid data found when processing input"));
        assert_eq!(file_count(&upload_dir), 0);
        assert_eq!(file_count(&temp_dir), 0);
    }

    #[tokio::test]
    async fn test_transcription_failure_is_500() {
        let (state, _root) = test_state(
            Arc::new(FailingTranscriber),
            Arc::new(RecordingTranscoder::default()),
        );
        let upload_dir = state.config.upload_dir.clone();

        let response = app(state)
            .oneshot(multipart_request(Some(("clip.mp4", VIDEO)), &[]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json_body(response).await["message"]
            .as_str()
            .unwrap()
            .contains("model exploded"));
        assert_eq!(file_count(&upload_dir), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_real_ffmpeg_failure_is_500() {
        // The production transcoder pointed at a binary that always exits 1
        let root = tempfile::tempdir().unwrap();
        let mut config = test_config(root.path());
        config.transcoder.binary_path = "false".to_string();
        let state = AppState::with_backends(
            config.clone(),
            Arc::new(StaticTranscriber::default()),
            Arc::new(crate::transcode::FfmpegTranscoder::new(config.transcoder.clone())),
        );
        state.ensure_dirs().unwrap();

        let response = app(state)
            .oneshot(multipart_request(Some(("clip.mp4", VIDEO)), &[]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json_body(response).await["message"]
            .as_str()
            .unwrap()
            .contains("FFmpeg exited with"));
        assert_eq!(file_count(&config.upload_dir), 0);
        assert_eq!(file_count(&config.temp_dir), 0);
    }

    #[tokio::test]
    async fn test_download_rejects_traversal_and_scratch_files() {
        let (state, root) = test_state(
            Arc::new(StaticTranscriber::default()),
            Arc::new(RecordingTranscoder::default()),
        );
        std::fs::write(root.path().join("secret_subtitled.mp4"), b"secret").unwrap();
        std::fs::write(state.config.temp_dir.join("abc.srt"), b"1\n").unwrap();
        let app = app(state);

        for uri in [
            "/download/..%2Fsecret_subtitled.mp4",
            "/download/abc.srt",
            "/download/missing_subtitled.mp4",
        ] {
            let response = app.clone().oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        }
        assert!(root.path().join("secret_subtitled.mp4").exists());
    }

    #[tokio::test]
    async fn test_body_limit() {
        let root = tempfile::tempdir().unwrap();
        let config = crate::config::ServerConfig {
            max_upload_mb: 1,
            ..test_config(root.path())
        };
        let state = AppState::with_backends(
            config,
            Arc::new(StaticTranscriber::default()),
            Arc::new(RecordingTranscoder::default()),
        );
        state.ensure_dirs().unwrap();
        let upload_dir = state.config.upload_dir.clone();

        let big = vec![0u8; 2 * 1024 * 1024];
        let response = app(state)
            .oneshot(multipart_request(Some(("clip.mp4", &big[..])), &[]))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
        assert_eq!(file_count(&upload_dir), 0);
    }

    #[tokio::test]
    async fn test_version_reports_transcoder() {
        let (state, _root) = test_state(
            Arc::new(StaticTranscriber::default()),
            Arc::new(RecordingTranscoder::default()),
        );

        let response = app(state).oneshot(get("/version")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "online");
        assert_eq!(json["ffmpeg"], "ffmpeg version test");
    }

    #[tokio::test]
    async fn test_over_real_socket() {
        let (state, _root) = test_state(
            Arc::new(StaticTranscriber::default()),
            Arc::new(RecordingTranscoder::default()),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app(state)).await.unwrap();
        });

        let client = reqwest::Client::new();
        let form = reqwest::multipart::Form::new()
            .text("position", "center")
            .text("font_color", "&H00FFFF&")
            .part(
                "file",
                reqwest::multipart::Part::bytes(VIDEO.to_vec()).file_name("My Clip.mp4"),
            );
        let json: serde_json::Value = client
            .post(format!("http://{}/generate", addr))
            .multipart(form)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["download_url"], "/download/My_Clip_subtitled.mp4");

        let first = client
            .get(format!("http://{}{}", addr, json["download_url"].as_str().unwrap()))
            .send()
            .await
            .unwrap();
        assert_eq!(first.status(), reqwest::StatusCode::OK);
        assert_eq!(&first.bytes().await.unwrap()[..], VIDEO);

        let second = client
            .get(format!("http://{}/download/My_Clip_subtitled.mp4", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(second.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
