//! 照合対象の型定義
//!
//! - LineItem: 請求書の明細1行（識別子 + 説明文）
//! - RecordSet: 識別子 → 明細 のマップ（挿入順を保持）
//! - Comparison: 照合結果（正解説明文, 変更後説明文, 類似度）

use crate::error::Result;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;

/// 明細の識別子
///
/// JSONの数値 `1` と文字列 `"1"` は別の識別子として扱う。
/// 数値は値で比較する（`2.0` と `2` は同じ、u64を超える整数も保持）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "RawItemId")]
pub enum ItemId {
    Int(i128),
    /// 整数でない数値（f64のビット列）
    Float(u64),
    Text(String),
}

/// JSON上の識別子（数値 or 文字列）
#[derive(Deserialize)]
#[serde(untagged)]
enum RawItemId {
    Number(serde_json::Number),
    Text(String),
}

impl From<RawItemId> for ItemId {
    fn from(raw: RawItemId) -> Self {
        match raw {
            RawItemId::Text(s) => ItemId::Text(s),
            RawItemId::Number(n) => ItemId::from_number(&n),
        }
    }
}

impl ItemId {
    /// 数値を正規化（整数値の浮動小数点は整数として扱う）
    pub fn from_number(n: &serde_json::Number) -> Self {
        if let Some(i) = n.as_i64() {
            return ItemId::Int(i as i128);
        }
        if let Some(u) = n.as_u64() {
            return ItemId::Int(u as i128);
        }
        let f = n.as_f64().unwrap_or(f64::NAN);
        if f.fract() == 0.0 && f.abs() < i128::MAX as f64 {
            ItemId::Int(f as i128)
        } else {
            ItemId::Float(f.to_bits())
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Int(n) => write!(f, "{}", n),
            ItemId::Float(bits) => write!(f, "{}", f64::from_bits(*bits)),
            ItemId::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        ItemId::Int(n as i128)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::Text(s.to_string())
    }
}

/// 請求書の明細行
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LineItem {
    pub item_id: ItemId,
    pub description: String,
}

impl LineItem {
    pub fn new(item_id: impl Into<ItemId>, description: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            description: description.into(),
        }
    }
}

/// 識別子 → 明細 のマップ
///
/// 重複した識別子は後の値で上書きされるが、位置は最初の出現位置のまま。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    items: IndexMap<ItemId, LineItem>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item: LineItem) {
        self.items.insert(item.item_id.clone(), item);
    }

    pub fn get(&self, id: &ItemId) -> Option<&LineItem> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &LineItem)> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<LineItem> for RecordSet {
    fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
        let mut set = RecordSet::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

/// 請求書JSON
///
/// 明細は一旦 `serde_json::Value` で受け取り、`records()` で型付けする。
/// 必須フィールドが欠けた明細はスキップする。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Invoice {
    #[serde(default)]
    pub line_items: Option<Vec<serde_json::Value>>,
}

impl Invoice {
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// 型付けできた明細のみを RecordSet にまとめる
    pub fn records(&self) -> RecordSet {
        let Some(items) = &self.line_items else {
            return RecordSet::new();
        };

        items
            .iter()
            .enumerate()
            .filter_map(|(index, value)| {
                match serde_json::from_value::<LineItem>(value.clone()) {
                    Ok(item) => Some(item),
                    Err(e) => {
                        tracing::warn!(index, error = %e, "明細をスキップ");
                        None
                    }
                }
            })
            .collect()
    }
}

/// 照合結果1件
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// 正解側の説明文
    pub golden: String,
    /// 変更後の説明文
    pub modified: String,
    /// 類似度（0〜100）
    pub similarity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_int_and_text_are_distinct() {
        let json = r#"{"line_items": [
            {"item_id": 1, "description": "数値ID"},
            {"item_id": "1", "description": "文字列ID"}
        ]}"#;
        let records = Invoice::from_json(json).unwrap().records();
        assert_eq!(records.len(), 2);
        assert_eq!(records.get(&ItemId::Int(1)).unwrap().description, "数値ID");
        assert_eq!(records.get(&ItemId::from("1")).unwrap().description, "文字列ID");
    }

    #[test]
    fn test_duplicate_id_keeps_first_position_last_value() {
        let records: RecordSet = vec![
            LineItem::new(1, "first"),
            LineItem::new(2, "second"),
            LineItem::new(1, "replaced"),
        ]
        .into_iter()
        .collect();

        let order: Vec<_> = records.iter().map(|(id, item)| (id.clone(), item.description.clone())).collect();
        assert_eq!(
            order,
            vec![
                (ItemId::Int(1), "replaced".to_string()),
                (ItemId::Int(2), "second".to_string()),
            ]
        );
    }

    #[test]
    fn test_malformed_items_skipped() {
        let json = r#"{"line_items": [
            {"item_id": 1},
            {"description": "IDなし"},
            {"item_id": 2, "description": 42},
            {"item_id": 3, "description": "正常", "quantity": 5}
        ]}"#;
        let records = Invoice::from_json(json).unwrap().records();
        assert_eq!(records.len(), 1);
        assert!(records.contains(&ItemId::Int(3)));
    }

    #[test]
    fn test_missing_or_null_line_items() {
        assert!(Invoice::from_json("{}").unwrap().records().is_empty());
        assert!(Invoice::from_json(r#"{"line_items": null}"#).unwrap().records().is_empty());
    }

    #[test]
    fn test_invalid_json() {
        assert!(Invoice::from_json("not json").is_err());
    }

    #[test]
    fn test_numeric_ids_compare_by_value() {
        let golden = Invoice::from_json(r#"{"line_items": [
            {"item_id": 10000000000000000000, "description": "big"},
            {"item_id": 2.0, "description": "float two"},
            {"item_id": 1e19, "description": "exp"},
            {"item_id": 0.5, "description": "half"}
        ]}"#)
        .unwrap()
        .records();
        // 10000000000000000000 と 1e19 は同じ識別子
        assert_eq!(golden.len(), 3);
        assert_eq!(golden.get(&ItemId::Int(10_000_000_000_000_000_000)).unwrap().description, "exp");
        assert_eq!(golden.get(&ItemId::from(2)).unwrap().description, "float two");
        assert!(golden.contains(&ItemId::Float(0.5f64.to_bits())));

        let modified = Invoice::from_json(r#"{"line_items": [
            {"item_id": 1e19, "description": "big"},
            {"item_id": 2, "description": "float two"}
        ]}"#)
        .unwrap()
        .records();
        assert_eq!(crate::matcher::match_records(&golden, &modified).len(), 2);
    }

    #[test]
    fn test_non_number_non_string_id_skipped() {
        let json = r#"{"line_items": [
            {"item_id": true, "description": "bool"},
            {"item_id": null, "description": "null"},
            {"item_id": [1], "description": "list"}
        ]}"#;
        assert!(Invoice::from_json(json).unwrap().records().is_empty());
    }

    #[test]
    fn test_item_id_display() {
        assert_eq!(ItemId::Int(7).to_string(), "7");
        assert_eq!(ItemId::from("A-1").to_string(), "\"A-1\"");
        assert_eq!(ItemId::Float(2.5f64.to_bits()).to_string(), "2.5");
    }
}
