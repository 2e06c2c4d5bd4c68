use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use booksearch_server::{build_app, ServerOptions};
use http_body_util::BodyExt;
use serde_json::Value;
use std::fs;
use tempfile::{tempdir, TempDir};

const BOOKS: &str = "\
title,authors,text_reviews_count
Dune,Frank Herbert,5000
Dune Messiah,Frank Herbert,1200
Emma,Jane Austen,800
The Hobbit,J.R.R. Tolkien,32871
Solaris,Stanislaw Lem,
Persuasion,Jane Austen,650
Neuromancer,William Gibson,3100
Foundation,Isaac Asimov,2900
";

fn tiny_app() -> (TempDir, Router) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("books.csv");
    fs::write(&path, BOOKS).unwrap();
    let app = build_app(&path, &ServerOptions::default()).unwrap();
    (dir, app)
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, String) {
    let resp = tower::ServiceExt::oneshot(app, req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_form(query: &str) -> Request<Body> {
    Request::post("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("query={query}")))
        .unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let (_dir, app) = tiny_app();
    let (status, body) = call(app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let (_dir, app) = tiny_app();
    let (status, body) = call(app, get("/search?q=messiah&threshold=0.1")).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["total_hits"].as_u64(), Some(1));
    let entries = json["pages"][0]["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["doc_id"].as_u64(), Some(1));
    assert_eq!(entries[0]["title"].as_str(), Some("Dune Messiah"));
    assert!(json["message"].is_null());
}

#[tokio::test]
async fn search_below_default_threshold_has_message() {
    let (_dir, app) = tiny_app();
    let (_, body) = call(app, get("/search?q=messiah")).await;
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["pages"].as_array().map(Vec::len), Some(0));
    assert_eq!(json["message"].as_str(), Some("No matching books found above threshold 1.0."));
}

#[tokio::test]
async fn form_page_renders() {
    let (_dir, app) = tiny_app();
    let (status, body) = call(app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<form method=\"post\""));
    assert!(!body.contains("results"));
}

#[tokio::test]
async fn form_post_renders_pages() {
    let (_dir, app) = tiny_app();
    // repeating the term raises its weight past the 1.0 threshold
    let (status, body) = call(app, post_form("Solaris+Solaris")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Page 1:<br>Book ID: 4, Title: Solaris, Author: Stanislaw Lem, Score: "));
}

#[tokio::test]
async fn form_post_reports_threshold() {
    let (_dir, app) = tiny_app();
    let (_, body) = call(app, post_form("Solaris")).await;
    assert!(body.contains("No matching books found above threshold 1.0."));
}

#[test]
fn corpus_without_expected_column_fails_at_startup() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("books.csv");
    fs::write(&path, "title,authors\nDune,Frank Herbert\n").unwrap();
    let Err(err) = build_app(&path, &ServerOptions::default()) else {
        panic!("corpus without a description column must not load");
    };
    assert!(format!("{err:#}").contains("text_reviews_count"));
}

async fn hits_for(raw_query: bool, q: &str) -> u64 {
    let dir = tempdir().unwrap();
    let path = dir.path().join("books.csv");
    fs::write(&path, "title,authors,text_reviews_count\nThe Running Man,Stephen King,900\nCarrie,Stephen King,1500\nMisery,Stephen King,1200\n").unwrap();
    let options = ServerOptions { raw_query, ..ServerOptions::default() };
    let app = build_app(&path, &options).unwrap();
    let (_, body) = call(app, get(&format!("/search?q={q}&threshold=0.0"))).await;
    let json: Value = serde_json::from_str(&body).unwrap();
    json["total_hits"].as_u64().unwrap()
}

#[tokio::test]
async fn raw_query_skips_stemming() {
    // the title is indexed as "run man"
    assert_eq!(hits_for(false, "running").await, 1);
    assert_eq!(hits_for(true, "running").await, 0);
    assert_eq!(hits_for(true, "run").await, 1);
}
