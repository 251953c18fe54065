//! HTTP behaviour of the inference backend against a local one-shot server.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::Value;

use anonyx_ner::{AnonyxError, HfInferenceBackend, InferenceBackend};

struct Captured {
    request_line: String,
    authorization: Option<String>,
    body: String,
}

/// Serve exactly one request with `status` and `body`, reporting what arrived.
fn serve_once(status: &'static str, body: &'static str) -> (String, mpsc::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut authorization = None;
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                match name.to_ascii_lowercase().as_str() {
                    "authorization" => authorization = Some(value.trim().to_string()),
                    "content-length" => content_length = value.trim().parse().unwrap(),
                    _ => {}
                }
            }
        }
        let mut received = vec![0u8; content_length];
        reader.read_exact(&mut received).unwrap();

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let mut stream = stream;
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();

        tx.send(Captured {
            request_line: request_line.trim_end().to_string(),
            authorization,
            body: String::from_utf8(received).unwrap(),
        })
        .unwrap();
    });

    (format!("http://{addr}/models/test-model"), rx)
}

fn backend(endpoint: &str) -> HfInferenceBackend {
    HfInferenceBackend::new(
        endpoint,
        "test-model",
        SecretString::from("hf_test_token".to_string()),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[test]
fn test_success_posts_inputs_with_bearer() {
    let (endpoint, rx) = serve_once(
        "200 OK",
        r#"[{"entity_group":"PER","start":0,"end":4,"score":0.99,"word":"John"}]"#,
    );
    let response = backend(&endpoint).infer("John Smith").unwrap();
    assert_eq!(response[0]["entity_group"], "PER");

    let captured = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(captured.request_line, "POST /models/test-model HTTP/1.1");
    assert_eq!(captured.authorization.as_deref(), Some("Bearer hf_test_token"));
    let sent: Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(sent, serde_json::json!({ "inputs": "John Smith" }));
}

#[test]
fn test_non_success_status_carries_service_message() {
    let (endpoint, _rx) = serve_once(
        "503 Service Unavailable",
        r#"{"error":"Model test-model is currently loading","estimated_time":20.0}"#,
    );
    match backend(&endpoint).infer("John") {
        Err(AnonyxError::ServiceStatus { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "Model test-model is currently loading");
        }
        other => panic!("expected a status error, got {other:?}"),
    }
}

#[test]
fn test_non_json_success_body() {
    let (endpoint, _rx) = serve_once("200 OK", "<html>gateway</html>");
    assert!(matches!(backend(&endpoint).infer("John"), Err(AnonyxError::Adapter(_))));
}

#[test]
fn test_refused_connection_is_service_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = backend(&format!("http://{addr}/models/test-model")).infer("John").unwrap_err();
    assert!(matches!(err, AnonyxError::Service(_)), "got {err:?}");
    assert!(err.is_service_error());
}

#[test]
fn test_model_id_reported() {
    assert_eq!(backend("http://127.0.0.1:9/models/test-model").model_id(), "test-model");
}
