use crate::error::{DiffError, Result};
use crate::render::{FontChain, FontSource};
use desc_diff_common::layout::{default_headers, BODY_FONT_SIZE, HEADER_FONT_SIZE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// `config` サブコマンドの編集内容
#[derive(Debug, Clone, Default)]
pub struct ConfigEdit {
    pub reset: bool,
    pub add_font: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 優先して試すフォントファイル
    pub font_files: Vec<PathBuf>,
    /// フォントファイルの次に試すシステムフォント
    pub font_families: Vec<String>,
    pub body_font_size: f32,
    pub header_font_size: f32,
    pub headers: [String; 3],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            font_files: vec![
                PathBuf::from("/System/Library/Fonts/Helvetica.ttc"),
                PathBuf::from("arial.ttf"),
            ],
            font_families: vec!["Helvetica".into(), "Arial".into(), "DejaVu Sans".into()],
            body_font_size: BODY_FONT_SIZE,
            header_font_size: HEADER_FONT_SIZE,
            headers: default_headers(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| DiffError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("desc-diff").join("config.json"))
    }

    /// フォントファイル → システムフォント → 組み込み の順
    pub fn font_chain(&self) -> FontChain {
        let files = self.font_files.iter().cloned().map(FontSource::File);
        let families = self.font_families.iter().cloned().map(FontSource::System);
        FontChain::new(files.chain(families).chain([FontSource::Builtin]).collect())
    }

    /// 編集を適用し、変更があれば保存する。戻り値の bool は保存したかどうか
    ///
    /// reset 時は既存ファイルを読まないので、壊れた設定も初期化できる。
    pub fn apply_edit(path: &Path, edit: ConfigEdit) -> Result<(Self, bool)> {
        let mut config = if edit.reset {
            Self::default()
        } else {
            Self::load_from(path)?
        };
        let mut changed = edit.reset;

        if let Some(font) = edit.add_font {
            config.add_font_file(font);
            changed = true;
        }

        if changed {
            config.save_to(path)?;
        }
        Ok((config, changed))
    }

    /// 先頭に追加（最優先）
    pub fn add_font_file(&mut self, path: PathBuf) {
        self.font_files.retain(|p| p != &path);
        self.font_files.insert(0, path);
    }
}
