//! 送信履歴ストア
//!
//! 追記専用。更新・削除の操作は持たない。

mod file_store;

pub use file_store::{FileHistoryStore, CORRUPT_SUFFIX, HISTORY_FILE_NAME, HISTORY_KEY, LOCK_SUFFIX};

use crate::error::{RecogError, Result};
use photo_recog_common::HistoryEntry;
use std::sync::Mutex;

/// 履歴ストア
///
/// `append` は読み込み・追加・書き戻しを1つのクリティカルセクションとして扱う。
pub trait HistoryStore: Send + Sync {
    /// 1件追記する。書き込み失敗は必ずエラーとして返す
    fn append(&self, entry: HistoryEntry) -> Result<()>;

    /// 全件を追記順で返す。未保存なら空
    fn load_all(&self) -> Result<Vec<HistoryEntry>>;
}

/// メモリ上の履歴ストア（テスト・組み込み用）
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    entries: Mutex<Vec<HistoryEntry>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn append(&self, entry: HistoryEntry) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| RecogError::Persistence("履歴ロックが破損しています".into()))?;
        entries.push(entry);
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<HistoryEntry>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| RecogError::Persistence("履歴ロックが破損しています".into()))?;
        Ok(entries.clone())
    }
}
