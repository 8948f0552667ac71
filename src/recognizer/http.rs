//! HTTP (multipart) による認識API呼び出し

use super::Recognizer;
use crate::error::{RecogError, Result};
use crate::selection::mime_type_for;
use async_trait::async_trait;
use hyper::ext::ReasonPhrase;
use photo_recog_common::{parse_recognition_response, RecognitionResult, SubmissionRequest};
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::debug;

/// 認識APIクライアント
#[derive(Debug, Clone)]
pub struct HttpRecognizer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRecognizer {
    /// `timeout` が None ならタイムアウトなし
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RecogError::Transport(format!("HTTPクライアントの初期化に失敗: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_form(request: &SubmissionRequest) -> Result<Form> {
        let image = Part::bytes(request.image_bytes.clone())
            .file_name(request.file_name.clone())
            .mime_str(mime_type_for(&request.file_name))
            .map_err(|e| RecogError::Transport(format!("multipartの作成に失敗: {}", e)))?;

        Ok(Form::new()
            .text("invert", request.invert.to_string())
            .part("image", image))
    }
}

/// サーバが返した理由句。標準と同じなら hyper は保持しないので標準の理由句を使う
fn status_text(response: &reqwest::Response) -> String {
    let status = response.status();
    response
        .extensions()
        .get::<ReasonPhrase>()
        .map(|reason| String::from_utf8_lossy(reason.as_bytes()).into_owned())
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| status.as_str().to_string())
}

#[async_trait]
impl Recognizer for HttpRecognizer {
    async fn recognize(&self, request: &SubmissionRequest) -> Result<RecognitionResult> {
        debug!(
            endpoint = %self.endpoint,
            file = %request.file_name,
            bytes = request.image_bytes.len(),
            invert = request.invert,
            "認識リクエスト送信"
        );

        let form = Self::build_form(request)?;
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RecogError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecogError::Remote {
                status: status.as_u16(),
                status_text: status_text(&response),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| RecogError::Transport(format!("レスポンスの読み込みに失敗: {}", e)))?;

        if tracing::enabled!(tracing::Level::DEBUG) {
            let preview: String = body.chars().take(500).collect();
            debug!(status = status.as_u16(), body = %preview, "認識レスポンス受信");
        }

        Ok(parse_recognition_response(&body)?)
    }
}
