//! 表レイアウト計算モジュール
//!
//! px基準のレイアウト定義。文字幅の計測は呼び出し側から関数で受け取り、
//! ここでは列幅・キャンバスサイズ・行の配置だけを計算する。

use crate::error::{Error, Result};
use crate::types::Comparison;

// ============================================
// px基準レイアウト
// ============================================

/// 外側の余白（px）
pub const MARGIN_PX: u32 = 20;

/// ヘッダー行の高さ（px）
pub const HEADER_HEIGHT_PX: u32 = 32;

/// データ行の高さ（px）
pub const ROW_HEIGHT_PX: u32 = 28;

/// セル内の左右余白の合計（px）。テキストは左から半分の位置に置く
pub const CELL_PADDING_PX: u32 = 8;

/// 本文・ヘッダーのフォントサイズ（px）
pub const BODY_FONT_SIZE: f32 = 12.0;
pub const HEADER_FONT_SIZE: f32 = 14.0;

/// 列見出し
pub const HEADER_LABELS: [&str; 3] = ["Golden Description", "Modified Description", "Similarity Score"];

// ============================================
// 型定義
// ============================================

/// 計測したテキストの外形（px）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextExtent {
    pub width: u32,
    pub height: u32,
}

impl TextExtent {
    pub const ZERO: TextExtent = TextExtent { width: 0, height: 0 };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// 列（見出し + 幅）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub label: String,
    pub width: u32,
}

/// 表レイアウト設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub margin: u32,
    pub header_height: u32,
    pub row_height: u32,
    pub cell_padding: u32,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            margin: MARGIN_PX,
            header_height: HEADER_HEIGHT_PX,
            row_height: ROW_HEIGHT_PX,
            cell_padding: CELL_PADDING_PX,
        }
    }
}

impl TableLayout {
    /// 列幅を計算
    ///
    /// 各列の幅 = max(見出し幅, 全セル幅) + cell_padding。
    /// 見出しは `measure_header`、セルは `measure_cell` で計測する。
    pub fn columns<H, C>(
        &self,
        headers: &[String; 3],
        comparisons: &[Comparison],
        mut measure_header: H,
        mut measure_cell: C,
    ) -> Vec<Column>
    where
        H: FnMut(&str) -> TextExtent,
        C: FnMut(&str) -> TextExtent,
    {
        let mut widths = [0u32; 3];
        for (width, header) in widths.iter_mut().zip(headers) {
            *width = measure_header(header).width;
        }

        for comparison in comparisons {
            for (width, cell) in widths.iter_mut().zip(row_cells(comparison)) {
                *width = (*width).max(measure_cell(cell.as_str()).width);
            }
        }

        headers
            .iter()
            .zip(widths)
            .map(|(label, width)| Column {
                label: label.clone(),
                width: width.saturating_add(self.cell_padding),
            })
            .collect()
    }

    /// キャンバスサイズ（幅, 高さ）
    pub fn canvas_size(&self, columns: &[Column], rows: usize) -> Result<(u32, u32)> {
        let overflow = || Error::Layout("キャンバスサイズがu32の範囲を超えています".into());

        let width = columns
            .iter()
            .try_fold(0u32, |acc, c| acc.checked_add(c.width))
            .and_then(|w| w.checked_add(self.margin.checked_mul(2)?))
            .ok_or_else(overflow)?;

        let rows = u32::try_from(rows).map_err(|_| overflow())?;
        let height = self
            .row_height
            .checked_mul(rows)
            .and_then(|h| h.checked_add(self.header_height))
            .and_then(|h| h.checked_add(self.margin.checked_mul(2)?))
            .ok_or_else(overflow)?;

        if width == 0 || height == 0 {
            return Err(Error::Layout(format!("キャンバスが空です: {}x{}", width, height)));
        }

        Ok((width, height))
    }

    /// 各列の左端X座標
    pub fn column_lefts(&self, columns: &[Column]) -> Vec<u32> {
        columns
            .iter()
            .scan(self.margin, |x, column| {
                let left = *x;
                *x += column.width;
                Some(left)
            })
            .collect()
    }

    /// ヘッダー行の上端Y座標
    pub fn header_top(&self) -> u32 {
        self.margin
    }

    /// データ行 `row` の上端Y座標
    pub fn row_top(&self, row: usize) -> u32 {
        self.margin + self.header_height + self.row_height * row as u32
    }

    /// 行の背景を網掛けにするか
    ///
    /// 行番号の偶奇ではなく、絶対Y座標を 2*row_height で割った余りが
    /// margin + header_height と一致するかで判定する。
    pub fn is_shaded_row(&self, top: u32) -> bool {
        let period = self.row_height.saturating_mul(2);
        if period == 0 {
            return false;
        }
        top % period == self.margin + self.header_height
    }

    /// ヘッダーの見出し描画位置（セル中央揃え）
    pub fn header_text_origin(&self, left: u32, column_width: u32, extent: TextExtent) -> (i64, i64) {
        let x = left as i64 + (column_width as i64 - extent.width as i64).div_euclid(2);
        let y = self.header_top() as i64
            + (self.header_height as i64 - extent.height as i64).div_euclid(2);
        (x, y)
    }

    /// データセルの文字描画位置（左寄せ・上下中央）
    pub fn cell_text_origin(&self, left: u32, top: u32, extent: TextExtent) -> (i64, i64) {
        let x = left as i64 + (self.cell_padding / 2) as i64;
        let y = top as i64 + (self.row_height as i64 - extent.height as i64).div_euclid(2);
        (x, y)
    }
}

// ============================================
// ヘルパー関数
// ============================================

/// 類似度の表示形式: 87.5 → "87.50%"
pub fn format_score(score: f64) -> String {
    format!("{:.2}%", score)
}

/// 1行分のセル文字列
pub fn row_cells(comparison: &Comparison) -> [String; 3] {
    [
        comparison.golden.clone(),
        comparison.modified.clone(),
        format_score(comparison.similarity),
    ]
}

/// 既定の見出し
pub fn default_headers() -> [String; 3] {
    HEADER_LABELS.map(String::from)
}
