//! 画像ファイル選択とプレビュー生成
//!
//! 内容の検証（形式・サイズ）はここでは行わない。判定は認識API側に任せる。

mod exif;

use crate::error::{RecogError, Result};
use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// 選択された画像ファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        mime_type_for(&self.file_name)
    }
}

/// ファイル名の拡張子から推定したMIMEタイプ
pub fn mime_type_for(file_name: &str) -> &'static str {
    ImageFormat::from_path(file_name)
        .map(|f| f.to_mime_type())
        .unwrap_or("application/octet-stream")
}

/// 表示用プレビュー情報
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
    pub file_name: String,
    pub byte_len: usize,
    /// 画像として読めた場合の (幅, 高さ)
    pub dimensions: Option<(u32, u32)>,
    /// EXIFの撮影日時
    pub date: Option<String>,
}

impl Preview {
    /// 選択ファイルからプレビューを生成（失敗しても送信は妨げない）
    pub fn generate(file: &SelectedFile) -> Self {
        let dimensions = ImageReader::new(Cursor::new(file.bytes.as_slice()))
            .with_guessed_format()
            .ok()
            .and_then(|reader| reader.into_dimensions().ok());

        Self {
            file_name: file.file_name.clone(),
            byte_len: file.bytes.len(),
            dimensions,
            date: exif::extract_date(&file.bytes).ok(),
        }
    }

    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{} bytes", self.byte_len)];
        if let Some((w, h)) = self.dimensions {
            parts.push(format!("{}x{}", w, h));
        }
        if let Some(date) = &self.date {
            parts.push(format!("撮影 {}", date));
        }
        format!("{} ({})", self.file_name, parts.join(", "))
    }
}

/// パスから画像ファイルを読み込む
pub fn load_image(path: &Path) -> Result<SelectedFile> {
    if !path.is_file() {
        return Err(RecogError::FileNotFound(path.display().to_string()));
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let bytes = std::fs::read(path)?;

    Ok(SelectedFile::new(file_name, bytes))
}
