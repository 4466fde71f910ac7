//! 請求書ペアの検出と読み込み
//!
//! 変更後フォルダ直下の `invoice_*.json` を列挙し、
//! 同名ファイルが正解フォルダにあるものだけをペアにする。

use crate::error::{DiffError, Result};
use desc_diff_common::Invoice;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const INVOICE_PREFIX: &str = "invoice_";
const INVOICE_EXTENSION: &str = "json";

/// 既定の正解フォルダ名（変更後フォルダの兄弟）
pub const GOLDEN_DIR_NAME: &str = "golden_invoices";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoicePair {
    pub file_name: String,
    pub golden: PathBuf,
    pub modified: PathBuf,
}

/// 既定の正解フォルダ: `<modified_dir>/../golden_invoices`
pub fn default_golden_dir(modified_dir: &Path) -> PathBuf {
    modified_dir.join("..").join(GOLDEN_DIR_NAME)
}

fn is_invoice_file_name(name: &str) -> bool {
    !name.starts_with('_')
        && name.starts_with(INVOICE_PREFIX)
        && Path::new(name)
            .extension()
            .is_some_and(|ext| ext == INVOICE_EXTENSION)
}

pub fn find_invoice_pairs(modified_dir: &Path, golden_dir: &Path) -> Result<Vec<InvoicePair>> {
    if !modified_dir.is_dir() {
        return Err(DiffError::FolderNotFound(modified_dir.display().to_string()));
    }

    let mut pairs = Vec::new();

    for entry in WalkDir::new(modified_dir)
        .max_depth(1)  // 直下のみ
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_string();
        if !is_invoice_file_name(&file_name) {
            continue;
        }

        let golden = golden_dir.join(&file_name);
        if !golden.is_file() {
            tracing::debug!(file = %file_name, "正解ファイルがないためスキップ");
            continue;
        }

        pairs.push(InvoicePair {
            file_name,
            golden,
            modified: path.to_path_buf(),
        });
    }

    // ファイル名でソート
    pairs.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(pairs)
}

pub fn load_invoice(path: &Path) -> Result<Invoice> {
    if !path.exists() {
        return Err(DiffError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    Invoice::from_json(&content).map_err(|e| match e {
        desc_diff_common::Error::Json(source) => DiffError::InvalidInvoice {
            path: path.to_path_buf(),
            source,
        },
        other => DiffError::Common(other),
    })
}

/// ペアを読み込み（正解, 変更後）
pub fn load_pair(pair: &InvoicePair) -> Result<(Invoice, Invoice)> {
    Ok((load_invoice(&pair.golden)?, load_invoice(&pair.modified)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_is_invoice_file_name() {
        assert!(is_invoice_file_name("invoice_001.json"));
        assert!(is_invoice_file_name("invoice_.json"));
        assert!(!is_invoice_file_name("_invoice_001.json"));
        assert!(!is_invoice_file_name("invoice_001.txt"));
        assert!(!is_invoice_file_name("receipt_001.json"));
        assert!(!is_invoice_file_name("invoice_001.json.bak"));
    }

    #[test]
    fn test_default_golden_dir() {
        let dir = default_golden_dir(Path::new("/data/line_item_description"));
        assert_eq!(dir, Path::new("/data/line_item_description/../golden_invoices"));
    }

    #[test]
    fn test_pairs_require_golden_counterpart() {
        let root = tempdir().unwrap();
        let modified = root.path().join("modified");
        let golden = root.path().join(GOLDEN_DIR_NAME);
        fs::create_dir_all(&modified).unwrap();
        fs::create_dir_all(&golden).unwrap();

        for name in ["invoice_b.json", "invoice_a.json", "invoice_c.json", "_invoice_a.json", "notes.json"] {
            fs::write(modified.join(name), "{}").unwrap();
        }
        fs::write(golden.join("invoice_a.json"), "{}").unwrap();
        fs::write(golden.join("invoice_b.json"), "{}").unwrap();
        fs::write(golden.join("_invoice_a.json"), "{}").unwrap();

        let pairs = find_invoice_pairs(&modified, &golden).unwrap();
        let names: Vec<_> = pairs.iter().map(|p| p.file_name.as_str()).collect();
        assert_eq!(names, vec!["invoice_a.json", "invoice_b.json"]);
        assert_eq!(pairs[0].golden, golden.join("invoice_a.json"));
    }

    #[test]
    fn test_subfolders_not_scanned() {
        let root = tempdir().unwrap();
        let nested = root.path().join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("invoice_1.json"), "{}").unwrap();

        let pairs = find_invoice_pairs(root.path(), root.path()).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_load_invoice_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invoice_bad.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_invoice(&path).unwrap_err();
        assert!(matches!(err, DiffError::InvalidInvoice { .. }));
        assert!(err.to_string().contains("invoice_bad.json"));
    }

    #[test]
    fn test_load_invoice_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invoice_ok.json");
        fs::write(&path, r#"{"line_items": [{"item_id": 1, "description": "Bolt"}, {"item_id": 2}]}"#).unwrap();

        let records = load_invoice(&path).unwrap().records();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_load_invoice_missing() {
        let err = load_invoice(Path::new("/nonexistent/invoice_1.json")).unwrap_err();
        assert!(matches!(err, DiffError::FileNotFound(_)));
    }
}
