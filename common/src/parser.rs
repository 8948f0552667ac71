//! レスポンス・履歴パーサー
//!
//! 認識APIのレスポンスボディと、永続化された履歴JSONをパースする

use crate::error::{Error, Result};
use crate::types::{HistoryEntry, RecognitionResult};

/// エラーメッセージに含めるボディの最大文字数
const BODY_PREVIEW_CHARS: usize = 200;

/// 認識APIのレスポンスボディをパース
///
/// 期待する形式: `{"prediction": "...", "accuracy": 97.5, "process_time": "..."}`
///
/// # Examples
/// ```
/// use photo_recog_common::parse_recognition_response;
///
/// let body = r#"{"prediction": "cat", "accuracy": 97.5, "process_time": "120ms"}"#;
/// let result = parse_recognition_response(body).unwrap();
/// assert_eq!(result.prediction, "cat");
/// ```
pub fn parse_recognition_response(body: &str) -> Result<RecognitionResult> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(Error::Parse("レスポンスが空です".into()));
    }

    serde_json::from_str(trimmed).map_err(|e| {
        let preview: String = trimmed.chars().take(BODY_PREVIEW_CHARS).collect();
        Error::Parse(format!("認識レスポンスのパースに失敗: {} ({})", e, preview))
    })
}

/// 永続化された履歴JSONをパース
///
/// 配列以外や要素の形が違う場合はエラー。空文字列は空の履歴として扱う。
pub fn parse_history(raw: &str) -> Result<Vec<HistoryEntry>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let entries: Vec<HistoryEntry> = serde_json::from_str(raw)?;
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recognition_response() {
        let body = r#"{"prediction": "cat", "accuracy": 97.5, "process_time": "120ms"}"#;
        let result = parse_recognition_response(body).unwrap();
        assert_eq!(result.prediction, "cat");
        assert_eq!(result.accuracy, 97.5);
        assert_eq!(result.process_time, "120ms");
    }

    #[test]
    fn test_parse_recognition_response_with_whitespace() {
        let body = "\n  {\"prediction\": \"7\", \"accuracy\": 12, \"process_time\": \"3ms\"}\n";
        let result = parse_recognition_response(body).unwrap();
        assert_eq!(result.prediction, "7");
        assert_eq!(result.accuracy, 12.0);
    }

    #[test]
    fn test_parse_recognition_response_ignores_extra_fields() {
        let body = r#"{"prediction": "cat", "accuracy": 97.5, "process_time": "120ms", "model": "v2"}"#;
        assert!(parse_recognition_response(body).is_ok());
    }

    #[test]
    fn test_parse_recognition_response_missing_field() {
        let body = r#"{"prediction": "cat", "accuracy": 97.5}"#;
        let result = parse_recognition_response(body);
        if let Err(Error::Parse(msg)) = result {
            assert!(msg.contains("process_time"));
        } else {
            panic!("Expected Parse error");
        }
    }

    #[test]
    fn test_parse_recognition_response_empty() {
        assert!(matches!(parse_recognition_response("  "), Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_recognition_response_html_error_page() {
        let body = "<html><body>502 Bad Gateway</body></html>";
        assert!(parse_recognition_response(body).is_err());
    }

    #[test]
    fn test_parse_history_empty_string() {
        assert!(parse_history("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_history_array() {
        let raw = r#"[
            {"filename": "a.png", "invert": false, "response": {"prediction": "a", "accuracy": 10, "process_time": "1ms"}},
            {"filename": "b.png", "invert": true, "response": {"prediction": "b", "accuracy": 90, "process_time": "2ms"}}
        ]"#;
        let entries = parse_history(raw).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].filename, "a.png");
        assert_eq!(entries[1].filename, "b.png");
        assert!(entries[1].invert);
    }

    #[test]
    fn test_parse_history_not_array() {
        assert!(parse_history(r#"{"filename": "a.png"}"#).is_err());
        assert!(parse_history("not json").is_err());
    }
}
