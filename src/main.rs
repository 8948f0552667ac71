use clap::Parser;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use photo_recog::history::{FileHistoryStore, HistoryStore, HISTORY_KEY};
use photo_recog::recognizer::HttpRecognizer;
use photo_recog::{cli, config, error, selection};
use photo_recog::{HistoryEntry, RecognitionResult, SubmissionController};
use cli::{Cli, Commands};
use config::Config;
use error::{RecogError, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Submit { file, invert, yes } => {
            println!("📸 photo-recog - 画像認識\n");

            let history_dir = config.resolve_history_dir(cli.history_dir)?;
            let history = Arc::new(FileHistoryStore::new(history_dir));
            let timeout = (config.timeout_seconds > 0).then(|| Duration::from_secs(config.timeout_seconds));
            let recognizer = Arc::new(HttpRecognizer::new(config.effective_endpoint(), timeout)?);
            let endpoint = recognizer.endpoint().to_string();
            let mut controller = SubmissionController::new(recognizer, history);

            // 1. ファイル選択
            controller.select_file(selection::load_image(&file)?);
            controller.set_invert(invert);
            if let Some(preview) = controller.preview() {
                println!("✔ 選択: {}", preview.summary());
            }
            println!("  反転: {}", if invert { "あり" } else { "なし" });
            println!("  送信先: {}\n", endpoint);

            // 2. 確認
            controller.request_submit()?;
            let confirmed = yes
                || Confirm::new()
                    .with_prompt("この画像を認識しますか?")
                    .default(true)
                    .interact()
                    .map_err(|e| RecogError::CliExecution(e.to_string()))?;

            if !confirmed {
                controller.cancel_submit()?;
                println!("キャンセルしました");
                return Ok(());
            }

            // 3. 送信
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.set_message("画像を送信中...");
            spinner.enable_steady_tick(Duration::from_millis(100));
            let outcome = controller.confirm_submit().await;
            spinner.finish_and_clear();

            let report = outcome?;
            print_result(&report.result);

            match report.history_error {
                None => println!("\n✔ 履歴に保存しました"),
                Some(e) => println!("\n⚠ 履歴の保存に失敗しました: {}", e),
            }
        }

        Commands::History { json, info } => {
            let history_dir = config.resolve_history_dir(cli.history_dir)?;
            let store = FileHistoryStore::new(history_dir);

            if info {
                let path = store.path();
                println!("履歴情報:");
                println!("  キー: {}", HISTORY_KEY);
                println!("  パス: {}", path.display());
                println!("  件数: {}", store.load_all()?.len());
                if let Ok(meta) = std::fs::metadata(&path) {
                    println!("  サイズ: {} bytes", meta.len());
                }
                return Ok(());
            }

            let entries = store.load_all()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print_history(&entries);
            }
        }

        Commands::Config { set_endpoint, set_timeout, show } => {
            let mut config = config;

            if let Some(endpoint) = set_endpoint {
                config.set_endpoint(endpoint)?;
                println!("✔ エンドポイントを設定しました");
            }

            if let Some(seconds) = set_timeout {
                config.set_timeout(seconds)?;
                println!("✔ タイムアウトを設定しました");
            }

            if show {
                println!("設定:");
                println!("  エンドポイント: {}", config.effective_endpoint());
                if config.timeout_seconds > 0 {
                    println!("  タイムアウト: {}秒", config.timeout_seconds);
                } else {
                    println!("  タイムアウト: なし");
                }
                println!("  履歴: {}", config.resolve_history_dir(cli.history_dir)?.display());
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_result(result: &RecognitionResult) {
    println!("認識結果");
    println!("  予測: {}", result.prediction);
    println!("  精度: {} ({})", result.accuracy_label(), result.confidence().label());
    println!("  処理時間: {}", result.process_time);
}

fn print_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("履歴はまだありません");
        return;
    }

    println!("📜 送信履歴 ({}件)\n", entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let response = &entry.response;
        println!(
            "{:>3}. {}{} → {} {} ({}) / {}",
            i + 1,
            entry.filename,
            if entry.invert { " [反転]" } else { "" },
            response.prediction,
            response.accuracy_label(),
            response.confidence().label(),
            response.process_time,
        );
    }
}
