//! Integration tests for the conversation HTTP client
//!
//! Each test serves exactly one canned HTTP response from a local socket.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use voicemode_chat::api::{ChatGptClient, ConversationSource};
use voicemode_chat::error::PollError;
use voicemode_chat::types::Role;

/// Serve one response; the request head comes back through the receiver.
fn serve_once(status: &str, body: &str) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let base = format!("http://{}/backend-api", listener.local_addr().unwrap());
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone"));
        let mut head = String::new();
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
                break;
            }
            head.push_str(&line);
        }
        stream.write_all(response.as_bytes()).expect("write");
        let _ = tx.send(head);
    });

    (base, rx)
}

#[tokio::test]
async fn test_latest_conversation_request() {
    let body = r#"{"items":[{"id":"abc","title":"Voice","update_time":"2024-07-01T10:15:30.123456Z"}],"total":1}"#;
    let (base, requests) = serve_once("200 OK", body);
    let client = ChatGptClient::new(base).unwrap();

    let summary = client
        .find_latest_conversation("tok-123")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(summary.id, "abc");
    assert_eq!(summary.title.as_deref(), Some("Voice"));
    assert_eq!(summary.update_time.unix_timestamp(), 1_719_828_930);

    let head = requests.recv().unwrap();
    assert!(head.starts_with("GET /backend-api/conversations?offset=0&limit=1&order=updated "));
    assert!(head.to_ascii_lowercase().contains("authorization: bearer tok-123"));
}

#[tokio::test]
async fn test_empty_items_is_none() {
    let (base, _requests) = serve_once("200 OK", r#"{"items":[]}"#);
    let client = ChatGptClient::new(base).unwrap();

    assert!(client.find_latest_conversation("tok").await.unwrap().is_none());
}

#[tokio::test]
async fn test_unauthorized() {
    let (base, _requests) = serve_once("401 Unauthorized", r#"{"detail":"expired"}"#);
    let client = ChatGptClient::new(base).unwrap();

    let err = client.fetch_conversation("tok", "abc").await.unwrap_err();
    assert!(matches!(err, PollError::Unauthorized));
    assert!(err.is_user_facing());
}

#[tokio::test]
async fn test_server_error_keeps_body() {
    let (base, _requests) = serve_once("503 Service Unavailable", "down");
    let client = ChatGptClient::new(base).unwrap();

    match client.fetch_conversation("tok", "abc").await.unwrap_err() {
        PollError::Status { status, body } => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(body, "down");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn test_conversation_snapshot_keeps_mapping_order() {
    let body = r#"{
        "title": "Voice",
        "mapping": {
            "root": {"id": "root", "message": null, "parent": null, "children": ["m2"]},
            "m2": {"id": "m2", "message": {"id": "m2", "author": {"role": "user"},
                   "content": {"content_type": "text", "parts": ["second"]}, "create_time": 2.0},
                   "parent": "root", "children": ["m1"]},
            "m1": {"id": "m1", "message": {"id": "m1", "author": {"role": "assistant"},
                   "content": {"content_type": "text", "parts": ["first"]}, "create_time": 1.0},
                   "parent": "m2", "children": []}
        }
    }"#;
    let (base, requests) = serve_once("200 OK", body);
    let client = ChatGptClient::new(base).unwrap();

    let snapshot = client.fetch_conversation("tok", "abc").await.unwrap();

    let ids: Vec<&str> = snapshot.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["root", "m2", "m1"]);
    assert!(snapshot.nodes[0].message.is_none());
    let first = snapshot.nodes[1].message.as_ref().unwrap();
    assert_eq!(first.author_role, Role::User);
    assert_eq!(first.first_text(), "second");

    let head = requests.recv().unwrap();
    assert!(head.starts_with("GET /backend-api/conversation/abc "));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let (base, _requests) = serve_once("200 OK", "not json");
    let client = ChatGptClient::new(base).unwrap();

    let err = client.find_latest_conversation("tok").await.unwrap_err();
    assert!(matches!(err, PollError::Parse(_)));
    assert!(!err.is_user_facing());
}
