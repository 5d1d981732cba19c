mod common;

use std::path::Path;

use common::{content_length, split_response, static_root};
use staticd::http::handler::Handler;
use staticd::http::response::StatusCode;
use staticd::logging::AccessLog;
use staticd::static_files::StaticFiles;

fn logged_handler(root: &Path, log: &Path) -> Handler {
    Handler::new(StaticFiles::new(root, "index.html"), AccessLog::new(true, log))
}

fn log_lines(log: &Path) -> Vec<String> {
    std::fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .map(|line| line.split_once("] ").unwrap().1.to_string())
        .collect()
}

fn queued(handler: &Handler, head: &[u8]) -> (StatusCode, String, Vec<u8>, bool) {
    let dispatch = handler.handle(head);
    let mut out = Vec::new();
    let mut writer = dispatch.writer;
    while !writer.is_complete() {
        writer.write_to(&mut out).unwrap();
    }
    let (head, body) = split_response(&out);
    (dispatch.status, head, body, dispatch.body.is_some())
}

#[test]
fn test_each_outcome_logs_exactly_one_line() {
    let root = static_root();
    let logs = tempfile::tempdir().unwrap();
    let log = logs.path().join("server.log");
    let handler = logged_handler(root.path(), &log);

    let cases: &[(&[u8], StatusCode)] = &[
        (b"GET / HTTP/1.1", StatusCode::Ok),
        (b"HEAD /index.html HTTP/1.1", StatusCode::Ok),
        (b"GET /../etc/passwd HTTP/1.1", StatusCode::Forbidden),
        (b"DELETE /index.html HTTP/1.1", StatusCode::MethodNotAllowed),
        (b"GET /missing.txt HTTP/1.1", StatusCode::NotFound),
        (b"GET /sub HTTP/1.1", StatusCode::Forbidden),
        (b"BROKEN", StatusCode::BadRequest),
    ];

    for (head, expected) in cases {
        assert_eq!(handler.handle(head).status, *expected);
    }

    assert_eq!(
        log_lines(&log),
        vec![
            "GET / - 200",
            "HEAD /index.html - 200",
            "GET /../etc/passwd - 403",
            "DELETE /index.html - 405",
            "GET /missing.txt - 404",
            "GET /sub - 403",
            "- - - 400",
        ]
    );
}

#[test]
fn test_get_queues_head_and_opens_body() {
    let root = static_root();
    let handler = common::handler(root.path());

    let (status, head, body, has_file) = queued(&handler, b"GET / HTTP/1.1\r\nHost: x");

    assert_eq!(status, StatusCode::Ok);
    assert_eq!(
        head,
        "HTTP/1.1 200 OK\r\nServer: Static File Server\r\nContent-Type: text/html\r\nContent-Length: 37\r\nConnection: close\r\n\r\n"
    );
    assert!(body.is_empty());
    assert!(has_file);
}

#[test]
fn test_head_never_holds_file() {
    let root = static_root();
    let handler = common::handler(root.path());

    let (status, head, body, has_file) = queued(&handler, b"HEAD /big.bin HTTP/1.1");

    assert_eq!(status, StatusCode::Ok);
    assert!(head.contains("Content-Type: application/octet-stream\r\n"));
    assert_eq!(content_length(&head), 100_000);
    assert!(body.is_empty());
    assert!(!has_file);
}

#[test]
fn test_error_responses_carry_html_body() {
    let root = static_root();
    let handler = common::handler(root.path());

    let (status, head, body, has_file) = queued(&handler, b"DELETE /index.html HTTP/1.1");

    assert_eq!(status, StatusCode::MethodNotAllowed);
    assert!(head.starts_with("HTTP/1.1 405 Method Not Allowed\r\n"));
    assert!(head.contains("Content-Type: text/html\r\n"));
    assert_eq!(content_length(&head), body.len() as u64);
    assert!(String::from_utf8(body).unwrap().contains("<h1>405 Method Not Allowed</h1>"));
    assert!(!has_file);
}

#[test]
fn test_head_error_keeps_length_but_drops_body() {
    let root = static_root();
    let handler = common::handler(root.path());

    let (status, head, body, _) = queued(&handler, b"HEAD /missing.txt HTTP/1.1");

    assert_eq!(status, StatusCode::NotFound);
    assert!(content_length(&head) > 0);
    assert!(body.is_empty());
}

#[test]
fn test_overlong_target_gets_414() {
    let root = static_root();
    let handler = Handler::new(
        StaticFiles::new(root.path(), "index.html").with_max_path_len(64),
        AccessLog::disabled(),
    );
    let request = format!("GET /{} HTTP/1.1", "a".repeat(80));

    assert_eq!(handler.handle(request.as_bytes()).status, StatusCode::UriTooLong);
}

#[test]
fn test_clones_share_log_file() {
    let root = static_root();
    let logs = tempfile::tempdir().unwrap();
    let log = logs.path().join("server.log");
    let handler = logged_handler(root.path(), &log);
    let other = handler.clone();

    handler.handle(b"GET / HTTP/1.1");
    other.handle(b"GET /nope HTTP/1.1");

    assert_eq!(log_lines(&log), vec!["GET / - 200", "GET /nope - 404"]);
}

#[test]
fn test_unsupported_method_is_refused_before_path_checks() {
    let root = static_root();
    let handler = common::handler(root.path());

    assert_eq!(handler.handle(b"DELETE /../etc/passwd HTTP/1.1").status, StatusCode::MethodNotAllowed);
    assert_eq!(handler.handle(b"GET /../etc/passwd HTTP/1.1").status, StatusCode::Forbidden);
}

#[test]
fn test_unsupported_method_never_looks_at_static_root() {
    let parent = tempfile::tempdir().unwrap();
    let handler = Handler::new(
        StaticFiles::new(parent.path().join("does-not-exist"), "index.html"),
        AccessLog::disabled(),
    );

    for method in ["DELETE", "POST", "PUT", "OPTIONS"] {
        let request = format!("{} /index.html HTTP/1.1", method);
        assert_eq!(handler.handle(request.as_bytes()).status, StatusCode::MethodNotAllowed);
    }
    assert_eq!(handler.handle(b"GET /index.html HTTP/1.1").status, StatusCode::NotFound);
}

#[test]
fn test_query_string_is_not_stripped() {
    let root = static_root();
    let handler = common::handler(root.path());

    assert_eq!(handler.handle(b"GET /index.html?x=1 HTTP/1.1").status, StatusCode::NotFound);
    assert_eq!(handler.handle(b"GET /index.html#frag HTTP/1.1").status, StatusCode::NotFound);
    assert_eq!(handler.handle(b"GET index.html HTTP/1.1").status, StatusCode::NotFound);
}
