//! desc-diff Common Library
//!
//! 請求書明細の照合・類似度計算・表レイアウト計算（I/Oなし）

pub mod error;
pub mod layout;
pub mod matcher;
pub mod similarity;
pub mod types;

pub use error::{Error, Result};
pub use layout::{default_headers, format_score, row_cells, Column, TableLayout, TextExtent, HEADER_LABELS};
pub use matcher::{compare_all, compare_invoices, match_records};
pub use similarity::{similarity_score, tokenize};
pub use types::{Comparison, Invoice, ItemId, LineItem, RecordSet};
