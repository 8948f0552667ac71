//! 画像認識APIクライアント

mod http;

pub use http::HttpRecognizer;

use crate::error::Result;
use async_trait::async_trait;
use photo_recog_common::{RecognitionResult, SubmissionRequest};

/// 認識サービス
///
/// 1回の呼び出しで1回だけリクエストを送る。リトライはしない。
#[async_trait]
pub trait Recognizer: Send + Sync {
    async fn recognize(&self, request: &SubmissionRequest) -> Result<RecognitionResult>;
}
