use crate::error::{RecogError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 既定の認識APIエンドポイント
pub const DEFAULT_ENDPOINT: &str = "http://ec2-54-81-142-28.compute-1.amazonaws.com:8080/predict";

/// エンドポイントを上書きする環境変数
pub const ENDPOINT_ENV: &str = "PHOTO_RECOG_ENDPOINT";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    /// 0ならタイムアウトなし
    pub timeout_seconds: u64,
    pub history_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            timeout_seconds: 120,
            history_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| RecogError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("photo-recog").join("config.json"))
    }

    /// 実際に使うエンドポイント（環境変数を優先）
    pub fn effective_endpoint(&self) -> String {
        match std::env::var(ENDPOINT_ENV) {
            Ok(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => self.endpoint.clone(),
        }
    }

    /// 履歴ディレクトリ: 引数 > 設定 > データディレクトリ
    pub fn resolve_history_dir(&self, override_dir: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = override_dir.or_else(|| self.history_dir.clone()) {
            return Ok(dir);
        }
        let data = dirs::data_dir()
            .ok_or_else(|| RecogError::Config("データディレクトリが見つかりません".into()))?;
        Ok(data.join("photo-recog"))
    }

    pub fn set_endpoint(&mut self, endpoint: String) -> Result<()> {
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(RecogError::Config(format!(
                "エンドポイントはhttp(s)のURLで指定してください: {}",
                endpoint
            )));
        }
        self.endpoint = endpoint;
        self.save()
    }

    pub fn set_timeout(&mut self, seconds: u64) -> Result<()> {
        self.timeout_seconds = seconds;
        self.save()
    }
}
