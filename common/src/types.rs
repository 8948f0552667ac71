//! 認識結果と履歴の型定義
//!
//! - SubmissionRequest: 送信ごとに組み立てるリクエスト（永続化しない）
//! - RecognitionResult: 認識APIのレスポンス
//! - HistoryEntry: 履歴1件（送信成功ごとに1件だけ作成）

use serde::{Deserialize, Serialize};

/// 高信頼とみなす精度の下限（この値より大きければ高信頼）
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 50.0;

/// 認識APIへの送信内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub file_name: String,
    pub image_bytes: Vec<u8>,
    pub invert: bool,
}

/// 認識結果
///
/// APIレスポンスからのみ生成され、受信後は変更しない
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub prediction: String,

    /// 精度（0〜100）
    pub accuracy: f64,

    /// 処理時間（"120ms" のような表示用文字列）
    pub process_time: String,
}

impl RecognitionResult {
    pub fn confidence(&self) -> Confidence {
        Confidence::from_accuracy(self.accuracy)
    }

    /// 表示用の精度 ("97.5%")
    pub fn accuracy_label(&self) -> String {
        format!("{}%", self.accuracy)
    }
}

/// 精度の信頼度区分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    High,
    Low,
}

impl Confidence {
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy > HIGH_CONFIDENCE_THRESHOLD {
            Confidence::High
        } else {
            Confidence::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Confidence::High => "高信頼",
            Confidence::Low => "低信頼",
        }
    }
}

/// 履歴エントリ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub filename: String,
    pub invert: bool,
    pub response: RecognitionResult,
}

impl HistoryEntry {
    pub fn new(filename: impl Into<String>, invert: bool, response: RecognitionResult) -> Self {
        Self {
            filename: filename.into(),
            invert,
            response,
        }
    }
}
