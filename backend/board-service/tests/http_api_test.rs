//! Integration Tests: HTTP surface
//!
//! Exercises the actix-web routes against in-memory collaborators:
//! session cookie issuance, multipart thread/comment creation, listings,
//! the explicit sweep trigger, and error status mapping.

mod common;

use actix_web::cookie::Cookie;
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use board_service::handlers::{self, AppState, SESSION_COOKIE};
use common::{png, services, TestServices};
use std::time::Duration;

const BOUNDARY: &str = "----boardtestboundary";

fn app_state(s: &TestServices, request_max_bytes: usize) -> web::Data<AppState> {
    web::Data::new(AppState {
        threads: s.threads.clone(),
        comments: s.comments.clone(),
        identities: s.identities.clone(),
        archival: s.archival.clone(),
        request_max_bytes,
    })
}

/// Build a multipart body from text fields and `images` parts
fn multipart(fields: &[(&str, &str)], images: &[Vec<u8>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    for (i, bytes) in images.iter().enumerate() {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"images\"; filename=\"img{}.png\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, i
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn multipart_request(uri: &str, body: Vec<u8>) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(body)
}

#[actix_web::test]
async fn test_session_thread_and_comment_flow() {
    let s = services(Duration::from_secs(900));
    let app = test::init_service(
        App::new()
            .app_data(app_state(&s, 10 << 20))
            .configure(handlers::configure),
    )
    .await;

    // first visit mints an identity and sets the cookie
    let resp = test::call_service(&app, test::TestRequest::get().uri("/session/me").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let token = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .expect("session cookie");

    // known session: no new cookie
    let req = test::TestRequest::get()
        .uri("/session/me")
        .cookie(Cookie::new(SESSION_COOKIE, token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.response().cookies().next().is_none());
    let me: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(me["name"], "Character 1");

    let body = multipart(&[("title", "Hello World"), ("content", "first!")], &[png()]);
    let req = multipart_request("/threads", body)
        .cookie(Cookie::new(SESSION_COOKIE, token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let thread: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(thread["title"], "Hello World");
    assert_eq!(thread["is_archived"], false);
    assert_eq!(thread["author"]["name"], "Character 1");
    assert_eq!(thread["image_refs"].as_array().unwrap().len(), 1);
    let thread_id = thread["id"].as_str().unwrap().to_string();

    let body = multipart(&[("content", "nice thread")], &[]);
    let req = multipart_request(&format!("/threads/{}/comments", thread_id), body)
        .cookie(Cookie::new(SESSION_COOKIE, token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let comment: serde_json::Value = test::read_body_json(resp).await;
    let comment_id = comment["id"].as_str().unwrap().to_string();

    let body = multipart(&[("content", "reply"), ("parent_id", &comment_id)], &[]);
    let req = multipart_request(&format!("/threads/{}/comments", thread_id), body)
        .cookie(Cookie::new(SESSION_COOKIE, token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&format!("/threads/{}/comments", thread_id))
        .to_request();
    let comments: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let comments = comments.as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[1]["parent_id"], comment_id.as_str());

    let req = test::TestRequest::get().uri("/threads").to_request();
    let active: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(active.as_array().unwrap().len(), 1);

    let req = test::TestRequest::get().uri("/threads/archive").to_request();
    let archived: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert!(archived.as_array().unwrap().is_empty());

    let req = test::TestRequest::post().uri("/archive/sweep").to_request();
    let report: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(report["archived"], 0);
}

#[actix_web::test]
async fn test_error_statuses() {
    let s = services(Duration::from_secs(900));
    let (token, _) = s.identities.create().await.unwrap();
    let app = test::init_service(
        App::new()
            .app_data(app_state(&s, 64))
            .configure(handlers::configure),
    )
    .await;
    let cookie = || Cookie::new(SESSION_COOKIE, token.as_str().to_string());

    // no cookie
    let body = multipart(&[("title", "Hello World")], &[]);
    let resp = test::call_service(&app, multipart_request("/threads", body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // title too short
    let body = multipart(&[("title", "Hi")], &[]);
    let req = multipart_request("/threads", body).cookie(cookie()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(error["status"], 400);

    // not an image
    let body = multipart(&[("title", "Hello World")], &[b"plain text".to_vec()]);
    let req = multipart_request("/threads", body).cookie(cookie()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    // cumulative image bytes over the request ceiling
    let body = multipart(&[("title", "Hello World")], &[vec![0u8; 40], vec![0u8; 40]]);
    let req = multipart_request("/threads", body).cookie(cookie()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let req = test::TestRequest::get()
        .uri(&format!("/threads/{}", uuid::Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert_eq!(s.board.post_count(), 0);
    assert_eq!(s.storage.len(), 0);
}
