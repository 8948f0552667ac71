//! JSONファイルによる履歴の永続化
//!
//! 固定キー `imageHistory` のファイルに、履歴全体を1つのJSON配列として保存する。
//! 書き込みは一意な一時ファイル + rename で置き換え、途中状態は見えない。
//! 追記は隣の `imageHistory.json.lock` の排他ロックを取ってから行うため、
//! 別インスタンス・別プロセスからの同時追記でもエントリを失わない。

use super::HistoryStore;
use crate::error::{RecogError, Result};
use fd_lock::RwLock;
use photo_recog_common::{parse_history, HistoryEntry};
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::PathBuf;
use tracing::{debug, warn};

/// 履歴の保存キー
pub const HISTORY_KEY: &str = "imageHistory";

/// 履歴ファイル名
pub const HISTORY_FILE_NAME: &str = "imageHistory.json";

/// 壊れた履歴を退避するときの接尾辞
pub const CORRUPT_SUFFIX: &str = ".corrupt";

/// 追記用ロックファイルの接尾辞
pub const LOCK_SUFFIX: &str = ".lock";

/// 永続化された値の読み込み結果
enum Stored {
    Absent,
    Entries(Vec<HistoryEntry>),
    Corrupt(String),
}

fn persist_err(what: &str, e: impl std::fmt::Display) -> RecogError {
    RecogError::Persistence(format!("{}: {}", what, e))
}

/// ファイル履歴ストア
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    dir: PathBuf,
}

impl FileHistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 履歴ファイルのパス
    pub fn path(&self) -> PathBuf {
        self.dir.join(HISTORY_FILE_NAME)
    }

    fn lock_path(&self) -> PathBuf {
        self.dir.join(format!("{}{}", HISTORY_FILE_NAME, LOCK_SUFFIX))
    }

    /// 未使用の退避先。`.corrupt`, `.corrupt.1`, `.corrupt.2`, ... の順
    fn next_corrupt_path(&self) -> PathBuf {
        let base = format!("{}{}", HISTORY_FILE_NAME, CORRUPT_SUFFIX);
        let first = self.dir.join(&base);
        if !first.exists() {
            return first;
        }
        (1u64..)
            .map(|n| self.dir.join(format!("{}.{}", base, n)))
            .find(|p| !p.exists())
            .unwrap_or(first)
    }

    fn read_stored(&self) -> Result<Stored> {
        let path = self.path();
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Stored::Absent),
            Err(e) => {
                return Err(RecogError::Persistence(format!(
                    "{} の読み込みに失敗: {}",
                    path.display(),
                    e
                )))
            }
        };

        let text = match String::from_utf8(bytes) {
            Ok(t) => t,
            Err(e) => return Ok(Stored::Corrupt(e.to_string())),
        };

        match parse_history(&text) {
            Ok(entries) => Ok(Stored::Entries(entries)),
            Err(e) => Ok(Stored::Corrupt(e.to_string())),
        }
    }

    /// 壊れた履歴ファイルを上書き前に退避（既存の退避ファイルは残す）
    fn preserve_corrupt(&self) -> Result<()> {
        let from = self.path();
        let to = self.next_corrupt_path();
        fs::rename(&from, &to).map_err(|e| {
            RecogError::Persistence(format!("壊れた履歴の退避に失敗 ({}): {}", to.display(), e))
        })?;
        warn!(path = %to.display(), "壊れた履歴ファイルを退避しました");
        Ok(())
    }

    fn write_atomic(&self, entries: &[HistoryEntry]) -> Result<()> {
        let path = self.path();
        let mut temp = tempfile::Builder::new()
            .prefix(HISTORY_FILE_NAME)
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .map_err(|e| persist_err("一時ファイルの作成に失敗", e))?;

        {
            let mut writer = BufWriter::new(&mut temp);
            serde_json::to_writer(&mut writer, entries)
                .map_err(|e| persist_err("履歴のシリアライズに失敗", e))?;
            writer.flush().map_err(|e| persist_err("一時ファイルの書き込みに失敗", e))?;
        }
        temp.as_file()
            .sync_all()
            .map_err(|e| persist_err("一時ファイルの同期に失敗", e))?;

        // 失敗時は一時ファイルも削除される
        temp.persist(&path)
            .map_err(|e| persist_err("履歴ファイルの置き換えに失敗", e))?;

        debug!(path = %path.display(), count = entries.len(), "履歴を保存");
        Ok(())
    }
}

impl HistoryStore for FileHistoryStore {
    fn append(&self, entry: HistoryEntry) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| persist_err("履歴ディレクトリの作成に失敗", e))?;

        let lock_file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(|e| persist_err("ロックファイルを開けません", e))?;
        let mut lock = RwLock::new(lock_file);
        let _guard = lock
            .write()
            .map_err(|e| persist_err("履歴ロックの取得に失敗", e))?;

        let mut entries = match self.read_stored()? {
            Stored::Absent => Vec::new(),
            Stored::Entries(entries) => entries,
            Stored::Corrupt(reason) => {
                warn!(%reason, "履歴が壊れているため空として扱います");
                self.preserve_corrupt()?;
                Vec::new()
            }
        };

        entries.push(entry);
        self.write_atomic(&entries)
    }

    fn load_all(&self) -> Result<Vec<HistoryEntry>> {
        match self.read_stored()? {
            Stored::Absent => Ok(Vec::new()),
            Stored::Entries(entries) => Ok(entries),
            Stored::Corrupt(reason) => {
                warn!(path = %self.path().display(), %reason, "履歴が壊れているため空として扱います");
                Ok(Vec::new())
            }
        }
    }
}
