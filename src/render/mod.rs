//! 比較表の画像出力
//!
//! 1. 列幅計算（ヘッダー・全セルの計測幅の最大 + 余白）
//! 2. キャンバスサイズ計算
//! 3. ヘッダー描画（アクセント色、中央揃え）
//! 4. データ行描画（絶対Y座標による網掛け、左寄せ）
//! 5. 一時ファイルに書き出してから置き換え

pub mod builtin;
pub mod canvas;
pub mod font;

use crate::error::{DiffError, Result};
use canvas::{Canvas, ACCENT, BLACK, SHADE, WHITE};
use desc_diff_common::layout::{default_headers, row_cells, TableLayout};
use desc_diff_common::Comparison;
use font::Typeface;
use image::{ImageFormat, RgbImage};
use std::io::{BufWriter, Write};
use std::path::Path;

pub use builtin::BuiltinFont;
pub use font::{Font, FontChain, FontFace, FontSource};

/// 比較表レンダラ
pub struct TableRenderer<T: Typeface> {
    pub layout: TableLayout,
    pub headers: [String; 3],
    pub header_font: T,
    pub body_font: T,
}

impl<T: Typeface> TableRenderer<T> {
    pub fn new(header_font: T, body_font: T) -> Self {
        Self {
            layout: TableLayout::default(),
            headers: default_headers(),
            header_font,
            body_font,
        }
    }

    pub fn with_headers(mut self, headers: [String; 3]) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_layout(mut self, layout: TableLayout) -> Self {
        self.layout = layout;
        self
    }

    /// 比較表をRGB画像に描画
    pub fn render(&self, comparisons: &[Comparison]) -> Result<RgbImage> {
        let layout = &self.layout;
        let columns = layout.columns(
            &self.headers,
            comparisons,
            |text| self.header_font.measure(text),
            |text| self.body_font.measure(text),
        );
        let (width, height) = layout.canvas_size(&columns, comparisons.len())?;
        let lefts = layout.column_lefts(&columns);
        tracing::debug!(width, height, rows = comparisons.len(), "キャンバスサイズ");

        let mut canvas = Canvas::new(width, height, WHITE)?;

        // ヘッダー
        let top = layout.header_top();
        for (column, &left) in columns.iter().zip(&lefts) {
            canvas.cell(left, top, column.width, layout.header_height, ACCENT, BLACK);
            let extent = self.header_font.measure(&column.label);
            let (x, y) = layout.header_text_origin(left, column.width, extent);
            self.header_font.draw(&mut canvas, &column.label, x, y, WHITE);
        }

        // データ行
        for (row, comparison) in comparisons.iter().enumerate() {
            let top = layout.row_top(row);
            let fill = if layout.is_shaded_row(top) { SHADE } else { WHITE };

            for ((column, &left), text) in columns.iter().zip(&lefts).zip(row_cells(comparison)) {
                canvas.cell(left, top, column.width, layout.row_height, fill, BLACK);
                let extent = self.body_font.measure(&text);
                let (x, y) = layout.cell_text_origin(left, top, extent);
                self.body_font.draw(&mut canvas, &text, x, y, BLACK);
            }
        }

        canvas.into_rgb_image()
    }

    /// 描画してファイルに保存し、画像サイズを返す
    pub fn render_to_file(&self, comparisons: &[Comparison], output: &Path) -> Result<(u32, u32)> {
        let image = self.render(comparisons)?;
        save_image(&image, output)?;
        Ok(image.dimensions())
    }
}

impl TableRenderer<Font> {
    /// フォントチェーンを解決してレンダラを作成
    pub fn from_chain(chain: &FontChain, header_size: f32, body_size: f32) -> Self {
        let face = chain.resolve();
        Self::new(face.sized(header_size), face.sized(body_size))
    }
}

/// 出力形式（拡張子なしはPNG）
pub fn output_format(path: &Path) -> Result<ImageFormat> {
    if path.extension().is_none() {
        return Ok(ImageFormat::Png);
    }
    match ImageFormat::from_path(path)? {
        format @ (ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Bmp) => Ok(format),
        other => Err(DiffError::Config(format!(
            "未対応の出力形式です: {:?}（png/jpg/bmp）",
            other
        ))),
    }
}

/// 画像を保存
///
/// 出力先と同じフォルダの一時ファイルに書き込んでから置き換える。
/// 失敗時は一時ファイルが削除され、出力先には何も残らない。
pub fn save_image(image: &RgbImage, output: &Path) -> Result<()> {
    let format = output_format(output)?;
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        image.write_to(&mut writer, format)?;
        writer.flush()?;
    }
    temp.persist(output).map_err(|e| DiffError::Io(e.error))?;

    tracing::debug!(path = %output.display(), "画像を保存");
    Ok(())
}
