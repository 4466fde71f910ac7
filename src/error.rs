use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("請求書JSONが不正: {path}: {source}")]
    InvalidInvoice {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("画像エンコードエラー: {0}")]
    ImageEncode(#[from] image::ImageError),

    #[error("描画エラー: {0}")]
    Canvas(String),

    #[error(transparent)]
    Common(#[from] desc_diff_common::Error),
}

pub type Result<T> = std::result::Result<T, DiffError>;
