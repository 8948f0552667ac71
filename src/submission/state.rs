/// 送信フォームの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    AwaitingConfirmation,
    Submitting,
    Completed,
    Failed,
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Idle => write!(f, "idle"),
            SubmissionStatus::AwaitingConfirmation => write!(f, "awaiting-confirmation"),
            SubmissionStatus::Submitting => write!(f, "submitting"),
            SubmissionStatus::Completed => write!(f, "completed"),
            SubmissionStatus::Failed => write!(f, "failed"),
        }
    }
}

/// 送信1回分の識別子。新しい送信サイクルが始まると古いものは無効になる
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(pub(crate) u64);
