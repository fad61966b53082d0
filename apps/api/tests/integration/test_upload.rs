use super::helpers::{
    FormPart, assert_status, expect_status, file_upload_request, get_request, multipart_body,
    read_bytes, read_json, read_text, send, spawn_app, spawn_with_config, build_config,
    tiny_png_bytes, upload_request,
};
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use upload_api::config::StorageTarget;

#[tokio::test]
async fn upload_rejects_request_without_file_part() {
    let app = spawn_app(StorageTarget::Local).await;

    let (boundary, body) = multipart_body(&[FormPart::Text("caption", "sunset over the bay")]);
    let res = send(&app.app, upload_request(&boundary, body)).await;

    assert_status(res.status(), StatusCode::BAD_REQUEST);
    let payload: Value = read_json(res).await;
    assert_eq!(payload, json!({ "error": "No files received." }));
    assert!(
        !app.public_dir().exists() || std::fs::read_dir(app.public_dir()).unwrap().next().is_none(),
        "nothing should be written when no file is sent"
    );
}

#[tokio::test]
async fn upload_treats_empty_file_input_as_missing() {
    let app = spawn_app(StorageTarget::Local).await;

    let (boundary, body) = multipart_body(&[FormPart::File {
        field: "file",
        file_name: "",
        content_type: "application/octet-stream",
        data: &[],
    }]);
    let res = send(&app.app, upload_request(&boundary, body)).await;

    assert_status(res.status(), StatusCode::BAD_REQUEST);
    let payload: Value = read_json(res).await;
    assert_eq!(payload["error"], "No files received.");
}

#[tokio::test]
async fn upload_without_multipart_content_type_is_rejected() {
    let app = spawn_app(StorageTarget::Local).await;

    let req = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .expect("failed to build request");

    let res = send(&app.app, req).await;
    assert_status(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");

    let payload: Value = read_json(res).await;
    let error = payload["error"].as_str().expect("error should be a string");
    assert!(error.contains("boundary"), "{error}");
    assert!(payload.get("url").is_none());
}

#[tokio::test]
async fn multipart_without_boundary_answers_with_json_error() {
    let app = spawn_app(StorageTarget::Local).await;

    let req = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(header::CONTENT_TYPE, "multipart/form-data")
        .body(Body::empty())
        .expect("failed to build request");

    let res = send(&app.app, req).await;
    assert_status(res.status(), StatusCode::BAD_REQUEST);
    let payload: Value = read_json(res).await;
    assert!(payload["error"].is_string(), "{payload}");
}

#[tokio::test]
async fn local_upload_returns_created_and_url_serves_same_bytes() {
    let app = spawn_app(StorageTarget::Local).await;
    let png = tiny_png_bytes();

    let res = send(&app.app, file_upload_request("beach day.png", "image/png", &png)).await;
    let res = expect_status(res, StatusCode::CREATED).await;
    let payload: Value = read_json(res).await;

    assert_eq!(payload["message"], "Success");
    let filename = payload["filename"].as_str().expect("filename missing");
    let url = payload["url"].as_str().expect("url missing");
    assert!(filename.ends_with("_beach_day.png"), "unexpected filename {filename}");
    assert_eq!(url, format!("/uploads/{}", filename));
    assert_eq!(payload["width"], 2);
    assert_eq!(payload["height"], 2);
    assert!(payload.get("localPath").is_none());

    let served = expect_status(send(&app.app, get_request(url)).await, StatusCode::OK).await;
    assert_eq!(read_bytes(served).await, png);
}

#[tokio::test]
async fn non_image_upload_has_no_dimensions() {
    let app = spawn_app(StorageTarget::Local).await;

    let res = send(
        &app.app,
        file_upload_request("notes.txt", "text/plain", b"remember to post at 9"),
    )
    .await;
    let payload: Value = read_json(expect_status(res, StatusCode::CREATED).await).await;

    assert!(payload.get("width").is_none());
    assert!(payload.get("height").is_none());

    let url = payload["url"].as_str().unwrap();
    let served = expect_status(send(&app.app, get_request(url)).await, StatusCode::OK).await;
    assert_eq!(read_text(served).await, "remember to post at 9");
}

#[tokio::test]
async fn identical_uploads_get_distinct_names() {
    let app = spawn_app(StorageTarget::Local).await;
    let png = tiny_png_bytes();

    let first: Value = read_json(
        expect_status(
            send(&app.app, file_upload_request("same.png", "image/png", &png)).await,
            StatusCode::CREATED,
        )
        .await,
    )
    .await;
    let second: Value = read_json(
        expect_status(
            send(&app.app, file_upload_request("same.png", "image/png", &png)).await,
            StatusCode::CREATED,
        )
        .await,
    )
    .await;

    assert_ne!(first["filename"], second["filename"]);
    assert_ne!(first["url"], second["url"]);
    assert_eq!(std::fs::read_dir(app.public_dir()).unwrap().count(), 2);
}

#[tokio::test]
async fn first_matching_field_wins_and_other_fields_are_ignored() {
    let app = spawn_app(StorageTarget::Local).await;

    let (boundary, body) = multipart_body(&[
        FormPart::Text("caption", "ignored"),
        FormPart::File {
            field: "attachment",
            file_name: "wrong.txt",
            content_type: "text/plain",
            data: b"wrong field",
        },
        FormPart::File {
            field: "file",
            file_name: "first.txt",
            content_type: "text/plain",
            data: b"first",
        },
        FormPart::File {
            field: "file",
            file_name: "second.txt",
            content_type: "text/plain",
            data: b"second",
        },
    ]);
    let res = send(&app.app, upload_request(&boundary, body)).await;
    let payload: Value = read_json(expect_status(res, StatusCode::CREATED).await).await;

    assert!(payload["filename"].as_str().unwrap().ends_with("_first.txt"));
    let url = payload["url"].as_str().unwrap();
    let served = expect_status(send(&app.app, get_request(url)).await, StatusCode::OK).await;
    assert_eq!(read_text(served).await, "first");
}

#[tokio::test]
async fn configured_field_name_is_honoured() {
    let root = tempfile::tempdir().unwrap();
    let mut config = build_config(StorageTarget::Local, &root);
    config.upload_field_name = "image".to_string();
    let app = spawn_with_config(config, root).await;

    let res = send(&app.app, file_upload_request("a.txt", "text/plain", b"a")).await;
    assert_status(res.status(), StatusCode::BAD_REQUEST);

    let (boundary, body) = multipart_body(&[FormPart::File {
        field: "image",
        file_name: "a.txt",
        content_type: "text/plain",
        data: b"a",
    }]);
    let res = send(&app.app, upload_request(&boundary, body)).await;
    assert_status(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let root = tempfile::tempdir().unwrap();
    let mut config = build_config(StorageTarget::Local, &root);
    config.max_upload_bytes = 1024;
    let app = spawn_with_config(config, root).await;

    let big = vec![7u8; 8 * 1024];
    let res = send(&app.app, file_upload_request("big.bin", "application/octet-stream", &big)).await;

    assert_status(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let payload: Value = read_json(res).await;
    assert!(payload["error"].is_string());
    assert!(payload.get("url").is_none());
}

#[tokio::test]
async fn path_components_in_filename_are_stripped() {
    let app = spawn_app(StorageTarget::Local).await;

    let res = send(
        &app.app,
        file_upload_request("../../escape.txt", "text/plain", b"nope"),
    )
    .await;
    let payload: Value = read_json(expect_status(res, StatusCode::CREATED).await).await;

    let filename = payload["filename"].as_str().unwrap();
    assert!(!filename.contains('/'));
    assert!(app.public_dir().join(filename).is_file());
}

#[tokio::test]
async fn long_accented_filename_is_stored_under_ascii_name() {
    let app = spawn_app(StorageTarget::Local).await;
    let original = format!("{}.png", "\u{e9}".repeat(150));

    let res = send(
        &app.app,
        file_upload_request(&original, "image/png", &tiny_png_bytes()),
    )
    .await;
    let payload: Value = read_json(expect_status(res, StatusCode::CREATED).await).await;

    let filename = payload["filename"].as_str().unwrap();
    assert!(filename.is_ascii(), "{filename}");
    assert!(filename.ends_with(".png"), "{filename}");
    assert!(app.public_dir().join(filename).is_file());

    let url = payload["url"].as_str().unwrap();
    assert_status(
        send(&app.app, get_request(url)).await.status(),
        StatusCode::OK,
    );
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = spawn_app(StorageTarget::Local).await;

    let res = send(&app.app, get_request("/health")).await;
    assert!(res.headers().contains_key("x-request-id"));

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .header("x-request-id", "dashboard-trace-42")
        .body(Body::empty())
        .unwrap();
    let res = send(&app.app, req).await;
    assert_eq!(res.headers()["x-request-id"], "dashboard-trace-42");
}

#[tokio::test]
async fn health_reports_storage_target() {
    let app = spawn_app(StorageTarget::LocalShared).await;

    let res = expect_status(send(&app.app, get_request("/health")).await, StatusCode::OK).await;
    let payload: Value = read_json(res).await;

    assert_eq!(payload["status"], "healthy");
    assert_eq!(payload["storage"], "local+shared");
}
