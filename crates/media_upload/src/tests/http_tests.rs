use super::*;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

#[derive(Debug)]
struct ReceivedUpload {
    preset: Option<String>,
    file_name: Option<String>,
    content_type: Option<String>,
    file_bytes: Vec<u8>,
}

#[derive(Clone)]
struct ServerState {
    tx: Arc<Mutex<Option<oneshot::Sender<ReceivedUpload>>>>,
    status: StatusCode,
    body: Value,
}

async fn handle_upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    let mut received = ReceivedUpload {
        preset: None,
        file_name: None,
        content_type: None,
        file_bytes: Vec::new(),
    };
    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        match field.name().map(str::to_string).as_deref() {
            Some("file") => {
                received.file_name = field.file_name().map(str::to_string);
                received.content_type = field.content_type().map(str::to_string);
                received.file_bytes = field.bytes().await.expect("file bytes").to_vec();
            }
            Some("upload_preset") => {
                received.preset = Some(field.text().await.expect("preset text"));
            }
            _ => {}
        }
    }
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(received);
    }
    (state.status, Json(state.body))
}

async fn spawn_upload_server(
    status: StatusCode,
    body: Value,
) -> (String, oneshot::Receiver<ReceivedUpload>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, rx) = oneshot::channel();
    let state = ServerState {
        tx: Arc::new(Mutex::new(Some(tx))),
        status,
        body,
    };
    let app = Router::new()
        .route("/v1_1/demo/image/upload", post(handle_upload))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), rx)
}

fn config(base_url: &str) -> UploadConfig {
    UploadConfig {
        base_url: base_url.to_string(),
        cloud_name: "demo".to_string(),
        upload_preset: "phonebook_preset".to_string(),
        timeout: Duration::from_secs(5),
    }
}

fn png() -> ImagePayload {
    ImagePayload::new("amy.png", "image/png", b"\x89PNG fake".to_vec()).expect("png payload")
}

#[test]
fn endpoint_is_built_from_cloud_name() {
    let uploader =
        HttpImageUploader::new(&config("https://api.cloudinary.com")).expect("uploader");
    assert_eq!(
        uploader.endpoint().as_str(),
        "https://api.cloudinary.com/v1_1/demo/image/upload"
    );

    let nested = HttpImageUploader::new(&config("http://media.local/api/")).expect("uploader");
    assert_eq!(
        nested.endpoint().as_str(),
        "http://media.local/api/v1_1/demo/image/upload"
    );

    assert!(matches!(
        HttpImageUploader::new(&config("not a url")),
        Err(UploadError::Endpoint(_))
    ));
}

#[tokio::test]
async fn successful_upload_returns_image_ref() {
    let (base_url, received) = spawn_upload_server(
        StatusCode::OK,
        json!({
            "secure_url": "https://res.example/demo/amy.png",
            "public_id": "contacts/amy",
        }),
    )
    .await;
    let uploader = HttpImageUploader::new(&config(&base_url)).expect("uploader");

    let image = uploader.upload(png()).await.expect("upload");
    assert_eq!(
        image,
        ImageRef {
            url: "https://res.example/demo/amy.png".into(),
            public_id: "contacts/amy".into(),
        }
    );

    let received = received.await.expect("server saw upload");
    assert_eq!(received.preset.as_deref(), Some("phonebook_preset"));
    assert_eq!(received.file_name.as_deref(), Some("amy.png"));
    assert_eq!(received.content_type.as_deref(), Some("image/png"));
    assert_eq!(received.file_bytes, b"\x89PNG fake");
}

#[tokio::test]
async fn provider_error_message_is_surfaced() {
    let (base_url, _received) = spawn_upload_server(
        StatusCode::BAD_REQUEST,
        json!({ "error": { "message": "Upload preset not found" } }),
    )
    .await;
    let uploader = HttpImageUploader::new(&config(&base_url)).expect("uploader");

    let err = uploader.upload(png()).await.expect_err("rejected");
    match err {
        UploadError::Rejected { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Upload preset not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn response_without_url_is_an_error() {
    let (base_url, _received) =
        spawn_upload_server(StatusCode::OK, json!({ "public_id": "orphan" })).await;
    let uploader = HttpImageUploader::new(&config(&base_url)).expect("uploader");

    let err = uploader.upload(png()).await.expect_err("no url");
    assert!(matches!(err, UploadError::MissingUrl));
}

#[tokio::test]
async fn unsupported_payload_never_reaches_the_network() {
    let (base_url, mut received) =
        spawn_upload_server(StatusCode::OK, json!({ "secure_url": "https://x" })).await;
    let uploader = HttpImageUploader::new(&config(&base_url)).expect("uploader");

    let sneaky = ImagePayload {
        filename: "clip.gif".into(),
        mime_type: "image/gif".into(),
        bytes: b"GIF89a".to_vec(),
    };
    let err = uploader.upload(sneaky).await.expect_err("gif");
    assert!(matches!(err, UploadError::UnsupportedType(_)));
    assert!(received.try_recv().is_err());
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let uploader = HttpImageUploader::new(&config(&format!("http://{addr}"))).expect("uploader");
    let err = uploader.upload(png()).await.expect_err("refused");
    assert!(matches!(err, UploadError::Transport(_)));
}
