//! photo-recog: 画像認識APIへの送信と、送信履歴の管理
//!
//! - `submission`: 送信フォームの状態機械（選択・確認・送信・結果）
//! - `history`: 追記専用の送信履歴ストア
//! - `recognizer`: 認識APIクライアント
//!
//! # Example
//!
//! ```no_run
//! use photo_recog::history::{FileHistoryStore, HistoryStore};
//!
//! let store = FileHistoryStore::new("/tmp/photo-recog");
//! for entry in store.load_all()? {
//!     println!("{} -> {}", entry.filename, entry.response.prediction);
//! }
//! # Ok::<(), photo_recog::error::RecogError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod recognizer;
pub mod selection;
pub mod submission;

pub use photo_recog_common::{Confidence, HistoryEntry, RecognitionResult, SubmissionRequest};
pub use submission::{SubmissionController, SubmissionStatus, SubmitReport};
