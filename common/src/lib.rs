//! Photo Recog Common Library
//!
//! CLIと将来のフロントエンドで共有される型とユーティリティ

pub mod types;
pub mod error;
pub mod parser;

pub use types::{Confidence, HistoryEntry, RecognitionResult, SubmissionRequest};
pub use error::{Error, Result};
pub use parser::{parse_history, parse_recognition_response};
