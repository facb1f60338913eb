mod common;

use common::serve_once;
use serde_json::{json, Value};
use statboard::api::post_board::{posts_from_records, NewPost, PostBoardClient};
use statboard::state::BackgroundEvent;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn serve_board(
    status: &'static str,
    body: &'static str,
) -> (String, thread::JoinHandle<(String, String)>) {
    let (base, handle) = serve_once(status, body);
    (format!("{}/posts.json", base), handle)
}

#[test]
fn test_fetch_posts_normalizes_board() {
    let (url, server) = serve_board(
        "200 OK",
        r#"{"-x":{"title":"Old","body":"a","when":"2023-01-01T00:00:00.000Z"},
            "-y":{"title":"New","body":"b","when":"2024-01-01T00:00:00.000Z"},
            "-z":{"title":"","body":""}}"#,
    );

    let posts = PostBoardClient::new(&url).fetch_posts().unwrap();
    let (request_line, _) = server.join().unwrap();

    assert!(request_line.starts_with("GET /posts.json"));
    let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["New", "Old"]);
}

#[test]
fn test_empty_board_is_null() {
    let (url, server) = serve_board("200 OK", "null");
    let posts = PostBoardClient::new(&url).fetch_posts().unwrap();
    server.join().unwrap();
    assert!(posts.is_empty());
}

#[test]
fn test_create_post_sends_trimmed_fields_and_timestamp() {
    let (url, server) = serve_board("200 OK", r#"{"name":"-NewId"}"#);

    let post = NewPost::new("  Walks are good ", " OBP > AVG ").unwrap();
    let id = PostBoardClient::new(&url).create_post(&post).unwrap();
    let (request_line, body) = server.join().unwrap();

    assert_eq!(id, "-NewId");
    assert!(request_line.starts_with("POST /posts.json"));

    let sent: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(sent["title"], "Walks are good");
    assert_eq!(sent["body"], "OBP > AVG");
    let when = sent["when"].as_str().unwrap();
    assert!(when.ends_with('Z'));
    assert!(chrono::DateTime::parse_from_rfc3339(when).is_ok());
}

#[test]
fn test_failed_post_is_an_error() {
    let (url, server) = serve_board("500 Internal Server Error", r#"{"error":"down"}"#);

    let post = NewPost::new("t", "b").unwrap();
    let result = PostBoardClient::new(&url).create_post(&post);
    server.join().unwrap();

    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("500"));
}

#[test]
fn test_spawn_fetch_reports_through_channel() {
    let (url, server) = serve_board("200 OK", r#"{"-a":{"title":"Hi","body":"there"}}"#);
    let (tx, rx) = mpsc::channel();

    PostBoardClient::new(&url).spawn_fetch(tx);
    let event = rx.recv_timeout(Duration::from_secs(10)).unwrap();
    server.join().unwrap();

    match event {
        BackgroundEvent::PostsFetched(Ok(posts)) => {
            assert_eq!(posts.len(), 1);
            assert_eq!(posts[0].id, "-a");
            assert_eq!(posts[0].when, "");
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn test_records_with_extra_fields() {
    let records = json!({
        "-a": {"title": "T", "body": "B", "when": "2024-02-02T10:00:00.000Z", "author": "x"}
    });
    let posts = posts_from_records(&records);
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title, "T");
}
