use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photo-recog")]
#[command(about = "画像認識APIへの送信と履歴管理ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 履歴ディレクトリ（省略時は設定またはデータディレクトリ）
    #[arg(long, global = true)]
    pub history_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像を認識APIに送信
    Submit {
        /// 画像ファイルのパス
        #[arg(required = true)]
        file: PathBuf,

        /// 画像を反転して認識
        #[arg(short, long)]
        invert: bool,

        /// 確認をスキップ
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// 送信履歴を表示
    History {
        /// JSONで出力
        #[arg(long)]
        json: bool,

        /// 履歴ファイルの情報を表示
        #[arg(long)]
        info: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 認識APIのエンドポイントを設定
        #[arg(long)]
        set_endpoint: Option<String>,

        /// タイムアウト秒数を設定（0で無効）
        #[arg(long)]
        set_timeout: Option<u64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
