//! テスト共通ヘルパー
//!
//! - FakeRecognizer: 呼び出し回数を数え、決まった結果を返す認識サービス
//! - FailingHistoryStore: 常に書き込みに失敗する履歴ストア
//! - spawn_mock_endpoint: axumによるモック認識API
//! - spawn_status_line_endpoint: 任意のステータス行を返す素のTCPサーバ

#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use photo_recog::error::{RecogError, Result};
use photo_recog::history::HistoryStore;
use photo_recog::recognizer::Recognizer;
use photo_recog::{HistoryEntry, RecognitionResult, SubmissionRequest};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub fn cat_result() -> RecognitionResult {
    RecognitionResult {
        prediction: "cat".to_string(),
        accuracy: 97.5,
        process_time: "120ms".to_string(),
    }
}

pub const CAT_BODY: &str = r#"{"prediction":"cat","accuracy":97.5,"process_time":"120ms"}"#;

/// FakeRecognizerの応答
pub enum Script {
    Success(RecognitionResult),
    Remote(u16, &'static str),
    Transport(&'static str),
}

pub struct FakeRecognizer {
    script: Script,
    calls: AtomicUsize,
    requests: Mutex<Vec<SubmissionRequest>>,
}

impl FakeRecognizer {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<SubmissionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Recognizer for FakeRecognizer {
    async fn recognize(&self, request: &SubmissionRequest) -> Result<RecognitionResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        match &self.script {
            Script::Success(result) => Ok(result.clone()),
            Script::Remote(status, text) => Err(RecogError::Remote {
                status: *status,
                status_text: text.to_string(),
            }),
            Script::Transport(msg) => Err(RecogError::Transport(msg.to_string())),
        }
    }
}

pub struct FailingHistoryStore;

impl HistoryStore for FailingHistoryStore {
    fn append(&self, _entry: HistoryEntry) -> Result<()> {
        Err(RecogError::Persistence("disk full".to_string()))
    }

    fn load_all(&self) -> Result<Vec<HistoryEntry>> {
        Ok(Vec::new())
    }
}

/// モックAPIが受け取ったmultipartの内容
#[derive(Debug, Clone, Default)]
pub struct CapturedRequest {
    pub invert: Option<String>,
    pub image_file_name: Option<String>,
    pub image_content_type: Option<String>,
    pub image_bytes: Vec<u8>,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: &'static str,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

async fn predict(State(state): State<MockState>, mut multipart: Multipart) -> impl IntoResponse {
    let mut captured = CapturedRequest::default();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "invert" => captured.invert = field.text().await.ok(),
            "image" => {
                captured.image_file_name = field.file_name().map(str::to_string);
                captured.image_content_type = field.content_type().map(str::to_string);
                captured.image_bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
            }
            _ => {}
        }
    }
    state.captured.lock().unwrap().push(captured);

    (state.status, [(header::CONTENT_TYPE, "application/json")], state.body)
}

/// モック認識APIを起動し、`(エンドポイントURL, 受信記録)` を返す
pub async fn spawn_mock_endpoint(
    status: StatusCode,
    body: &'static str,
) -> (String, Arc<Mutex<Vec<CapturedRequest>>>) {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        status,
        body,
        captured: captured.clone(),
    };
    let app = Router::new().route("/predict", post(predict)).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{}/predict", addr), captured)
}

/// リクエストを読み切ってから `status_line`（例: "499 Model Warming Up"）で応答する
///
/// axumでは独自の理由句を返せないため、レスポンスを直接書く。
pub async fn spawn_status_line_endpoint(status_line: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };

        let mut received = Vec::new();
        let mut buf = [0u8; 4096];
        let header_end = loop {
            let n = socket.read(&mut buf).await.unwrap_or(0);
            if n == 0 {
                return;
            }
            received.extend_from_slice(&buf[..n]);
            if let Some(pos) = received.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let headers = String::from_utf8_lossy(&received[..header_end]).to_ascii_lowercase();
        let content_length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while received.len() < header_end + content_length {
            let n = socket.read(&mut buf).await.unwrap_or(0);
            if n == 0 {
                break;
            }
            received.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
            status_line
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    format!("http://{}/predict", addr)
}
