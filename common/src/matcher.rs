//! 明細の照合
//!
//! 正解側の挿入順で、変更後にも存在する識別子だけを比較する。
//! 片方にしかない識別子は黙ってスキップする。

use crate::similarity::similarity_score;
use crate::types::{Comparison, Invoice, RecordSet};

/// 2つの RecordSet を識別子で照合
pub fn match_records(golden: &RecordSet, modified: &RecordSet) -> Vec<Comparison> {
    golden
        .iter()
        .filter_map(|(id, golden_item)| {
            let modified_item = modified.get(id)?;
            let similarity = similarity_score(&golden_item.description, &modified_item.description);
            tracing::trace!(item_id = %id, similarity, "明細を照合");
            Some(Comparison {
                golden: golden_item.description.clone(),
                modified: modified_item.description.clone(),
                similarity,
            })
        })
        .collect()
}

/// 請求書1組を照合
pub fn compare_invoices(golden: &Invoice, modified: &Invoice) -> Vec<Comparison> {
    match_records(&golden.records(), &modified.records())
}

/// 複数の請求書ペアを順に照合して連結
pub fn compare_all<'a, I>(pairs: I) -> Vec<Comparison>
where
    I: IntoIterator<Item = (&'a Invoice, &'a Invoice)>,
{
    pairs
        .into_iter()
        .flat_map(|(golden, modified)| compare_invoices(golden, modified))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LineItem;

    fn records(items: &[(i64, &str)]) -> RecordSet {
        items.iter().map(|(id, d)| LineItem::new(*id, *d)).collect()
    }

    #[test]
    fn test_only_shared_ids_compared() {
        let golden = records(&[(1, "A"), (2, "B")]);
        let modified = records(&[(1, "A'"), (3, "C")]);

        let comparisons = match_records(&golden, &modified);
        assert_eq!(comparisons.len(), 1);
        assert_eq!(comparisons[0].golden, "A");
        assert_eq!(comparisons[0].modified, "A'");
        assert_eq!(comparisons[0].similarity, 0.0);
    }

    #[test]
    fn test_order_follows_golden() {
        let golden = records(&[(3, "c"), (1, "a"), (2, "b")]);
        let modified = records(&[(1, "a"), (2, "b"), (3, "c")]);

        let order: Vec<_> = match_records(&golden, &modified)
            .into_iter()
            .map(|c| c.golden)
            .collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_no_overlap() {
        let golden = records(&[(1, "a")]);
        let modified = records(&[(2, "a")]);
        assert!(match_records(&golden, &modified).is_empty());
        assert!(match_records(&RecordSet::new(), &RecordSet::new()).is_empty());
    }

    #[test]
    fn test_compare_all_concatenates_in_pair_order() {
        let g1 = Invoice::from_json(r#"{"line_items":[{"item_id":1,"description":"steel bolt"}]}"#).unwrap();
        let m1 = Invoice::from_json(r#"{"line_items":[{"item_id":1,"description":"steel nut"}]}"#).unwrap();
        let g2 = Invoice::from_json(r#"{"line_items":[{"item_id":"x","description":"copper pipe"}]}"#).unwrap();
        let m2 = Invoice::from_json(r#"{"line_items":[{"item_id":"x","description":"Copper Pipe"}]}"#).unwrap();

        let comparisons = compare_all([(&g1, &m1), (&g2, &m2)]);
        assert_eq!(comparisons.len(), 2);
        assert_eq!(comparisons[0].golden, "steel bolt");
        assert!((comparisons[0].similarity - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(comparisons[1].similarity, 100.0);
    }
}
