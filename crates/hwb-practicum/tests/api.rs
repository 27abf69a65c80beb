//! PracticumClient against a local axum stand-in for the homework API.

use std::collections::HashMap;

use axum::{
    extract::Query,
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use hwb_core::{errors::Error, ports::HomeworkSource};
use hwb_practicum::PracticumClient;

const TOKEN: &str = "good-token";

async fn homework_statuses(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if auth != format!("OAuth {TOKEN}") {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let from_date: i64 = params
        .get("from_date")
        .and_then(|v| v.parse().ok())
        .ok_or(StatusCode::BAD_REQUEST)?;

    if from_date > 0 {
        return Ok(Json(json!({"homeworks": [], "current_date": from_date})));
    }
    Ok(Json(json!({
        "homeworks": [{"homework_name": "proj1", "status": "approved"}],
        "current_date": 1700000000
    })))
}

async fn spawn_server() -> String {
    let app = Router::new()
        .route("/homework_statuses/", get(homework_statuses))
        .route(
            "/broken/",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route("/garbage/", get(|| async { "<html>not json</html>" }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn returns_decoded_body_on_200() {
    let base = spawn_server().await;
    let client = PracticumClient::new(format!("{base}/homework_statuses/"), TOKEN);

    let body = client.fetch(0).await.unwrap();
    assert_eq!(body["homeworks"][0]["homework_name"], "proj1");
    assert_eq!(body["homeworks"][0]["status"], "approved");
}

#[tokio::test]
async fn forwards_from_date() {
    let base = spawn_server().await;
    let client = PracticumClient::new(format!("{base}/homework_statuses/"), TOKEN);

    let body = client.fetch(1_700_000_000).await.unwrap();
    assert_eq!(body["homeworks"], json!([]));
    assert_eq!(body["current_date"], 1_700_000_000);
}

#[tokio::test]
async fn non_200_is_a_fetch_error_with_context() {
    let base = spawn_server().await;
    let endpoint = format!("{base}/broken/");
    let client = PracticumClient::new(endpoint.clone(), TOKEN);

    let Err(Error::Fetch(e)) = client.fetch(0).await else {
        panic!("expected fetch error");
    };
    assert_eq!(e.endpoint, endpoint);
    assert_eq!(e.status, Some(500));
    assert_eq!(
        e.headers,
        vec![("Authorization".to_string(), "OAuth ***".to_string())]
    );
    assert!(!e.to_string().contains(TOKEN));
}

#[tokio::test]
async fn wrong_token_is_a_fetch_error() {
    let base = spawn_server().await;
    let client = PracticumClient::new(format!("{base}/homework_statuses/"), "bad-token");

    let Err(Error::Fetch(e)) = client.fetch(0).await else {
        panic!("expected fetch error");
    };
    assert_eq!(e.status, Some(401));
}

#[tokio::test]
async fn non_json_body_is_a_fetch_error() {
    let base = spawn_server().await;
    let client = PracticumClient::new(format!("{base}/garbage/"), TOKEN);

    let Err(Error::Fetch(e)) = client.fetch(0).await else {
        panic!("expected fetch error");
    };
    assert_eq!(e.status, Some(200));
    assert!(e.reason.starts_with("json error"));
}

#[tokio::test]
async fn transport_failure_has_no_status() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = PracticumClient::new(format!("http://{addr}/homework_statuses/"), TOKEN);
    let Err(Error::Fetch(e)) = client.fetch(0).await else {
        panic!("expected fetch error");
    };
    assert_eq!(e.status, None);
}
