use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecogError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像が選択されていません。認識には画像が必要です")]
    NoImageSelected,

    #[error("認識APIエラー: {status_text}")]
    Remote { status: u16, status_text: String },

    #[error("通信エラー: {0}")]
    Transport(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("履歴の保存・読み込みに失敗: {0}")]
    Persistence(String),

    #[error("現在の状態では実行できません: {0}")]
    InvalidState(String),

    #[error("より新しい送信が開始されたため結果を破棄しました")]
    Superseded,

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("CLI実行エラー: {0}")]
    CliExecution(String),
}

impl RecogError {
    /// 送信フローでの分類
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecogError::NoImageSelected => ErrorKind::Validation,
            RecogError::Remote { .. } => ErrorKind::Remote,
            RecogError::Transport(_) | RecogError::ApiParse(_) => ErrorKind::Transport,
            RecogError::Persistence(_) => ErrorKind::Persistence,
            _ => ErrorKind::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Remote,
    Transport,
    Persistence,
    Other,
}

impl From<photo_recog_common::Error> for RecogError {
    fn from(e: photo_recog_common::Error) -> Self {
        match e {
            photo_recog_common::Error::Io(e) => RecogError::Io(e),
            photo_recog_common::Error::Json(e) => RecogError::JsonParse(e),
            photo_recog_common::Error::Parse(msg) => RecogError::ApiParse(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, RecogError>;
