//! 送信フォームの状態機械
//!
//! Idle → AwaitingConfirmation → Submitting → Completed | Failed
//! 確認待ちでキャンセルすると Idle に戻る。`select_file` / `request_submit` は
//! どの状態からでも新しいサイクルを始め、実行中の送信を無効にする。

mod state;

pub use state::{SubmissionStatus, Ticket};

use crate::error::{ErrorKind, RecogError, Result};
use crate::history::HistoryStore;
use crate::recognizer::Recognizer;
use crate::selection::{Preview, SelectedFile};
use photo_recog_common::{HistoryEntry, RecognitionResult, SubmissionRequest};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 確認済みで送信を待つリクエスト
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    ticket: Ticket,
    request: SubmissionRequest,
}

impl PendingSubmission {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn request(&self) -> &SubmissionRequest {
        &self.request
    }

    /// 認識APIを1回だけ呼び出す
    pub async fn run(&self, recognizer: &dyn Recognizer) -> Result<RecognitionResult> {
        recognizer.recognize(&self.request).await
    }
}

/// 送信成功の結果
///
/// 履歴への保存に失敗しても認識結果は有効。失敗は `history_error` で返す。
#[derive(Debug)]
pub struct SubmitReport {
    pub result: RecognitionResult,
    pub history_error: Option<RecogError>,
}

/// 送信コントローラ
pub struct SubmissionController {
    recognizer: Arc<dyn Recognizer>,
    history: Arc<dyn HistoryStore>,
    selected: Option<SelectedFile>,
    preview: Option<Preview>,
    invert: bool,
    status: SubmissionStatus,
    last_result: Option<RecognitionResult>,
    last_error: Option<String>,
    generation: u64,
    in_flight: Option<Ticket>,
}

impl SubmissionController {
    pub fn new(recognizer: Arc<dyn Recognizer>, history: Arc<dyn HistoryStore>) -> Self {
        Self {
            recognizer,
            history,
            selected: None,
            preview: None,
            invert: false,
            status: SubmissionStatus::Idle,
            last_result: None,
            last_error: None,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn invert(&self) -> bool {
        self.invert
    }

    pub fn last_result(&self) -> Option<&RecognitionResult> {
        self.last_result.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// 実行中の送信を無効にして新しいサイクルを始める
    fn restart_cycle(&mut self) {
        self.generation += 1;
        if let Some(stale) = self.in_flight.take() {
            debug!(?stale, "実行中の送信を無効化");
        }
        self.last_error = None;
    }

    /// ファイルを選択（プレビューも作り直す）
    pub fn select_file(&mut self, file: SelectedFile) {
        self.restart_cycle();
        self.preview = Some(Preview::generate(&file));
        self.selected = Some(file);
        self.status = SubmissionStatus::Idle;
    }

    pub fn set_invert(&mut self, invert: bool) {
        self.invert = invert;
    }

    /// 送信を要求する。ファイル未選択なら通信せずに Failed
    pub fn request_submit(&mut self) -> Result<()> {
        self.restart_cycle();

        if self.selected.is_none() {
            let err = RecogError::NoImageSelected;
            self.status = SubmissionStatus::Failed;
            self.last_error = Some(err.to_string());
            return Err(err);
        }

        self.status = SubmissionStatus::AwaitingConfirmation;
        Ok(())
    }

    /// 確認待ちを取り消して Idle に戻る
    pub fn cancel_submit(&mut self) -> Result<()> {
        if self.status != SubmissionStatus::AwaitingConfirmation {
            return Err(RecogError::InvalidState(format!("キャンセルできません ({})", self.status)));
        }
        self.status = SubmissionStatus::Idle;
        Ok(())
    }

    /// 確認を受けて送信を開始する（通信は呼び出し側で行う）
    pub fn begin_submit(&mut self) -> Result<PendingSubmission> {
        if self.status != SubmissionStatus::AwaitingConfirmation {
            return Err(RecogError::InvalidState(format!("確認待ちではありません ({})", self.status)));
        }
        let file = self.selected.as_ref().ok_or(RecogError::NoImageSelected)?;

        self.generation += 1;
        let ticket = Ticket(self.generation);
        let request = SubmissionRequest {
            file_name: file.file_name.clone(),
            image_bytes: file.bytes.clone(),
            invert: self.invert,
        };

        self.in_flight = Some(ticket);
        self.status = SubmissionStatus::Submitting;
        debug!(?ticket, file = %request.file_name, invert = request.invert, "送信開始");

        Ok(PendingSubmission { ticket, request })
    }

    /// 送信結果を反映する。無効になった送信の結果は状態を変えずに破棄する
    pub fn finish_submit(
        &mut self,
        pending: PendingSubmission,
        outcome: Result<RecognitionResult>,
    ) -> Result<SubmitReport> {
        if self.in_flight != Some(pending.ticket) {
            debug!(ticket = ?pending.ticket, "古い送信の結果を破棄");
            return Err(RecogError::Superseded);
        }
        self.in_flight = None;

        match outcome {
            Ok(result) => {
                self.last_result = Some(result.clone());
                self.last_error = None;
                self.status = SubmissionStatus::Completed;
                info!(
                    file = %pending.request.file_name,
                    prediction = %result.prediction,
                    accuracy = result.accuracy,
                    "認識完了"
                );

                let entry = HistoryEntry::new(
                    pending.request.file_name,
                    pending.request.invert,
                    result.clone(),
                );
                let history_error = match self.history.append(entry) {
                    Ok(()) => None,
                    Err(e) => {
                        warn!(error = %e, "履歴の保存に失敗");
                        Some(e)
                    }
                };

                Ok(SubmitReport { result, history_error })
            }
            Err(e) => {
                match e.kind() {
                    ErrorKind::Transport => error!(error = %e, "認識リクエストに失敗"),
                    _ => warn!(error = %e, "認識APIがエラーを返しました"),
                }
                self.status = SubmissionStatus::Failed;
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// 確認済みの送信を実行する（通信は1回だけ）
    pub async fn confirm_submit(&mut self) -> Result<SubmitReport> {
        let pending = self.begin_submit()?;
        let outcome = pending.run(self.recognizer.as_ref()).await;
        self.finish_submit(pending, outcome)
    }
}
