//! tiny-skia の Pixmap をラップした描画キャンバス
//!
//! 矩形は両端を含む（x..=x+w, y..=y+h）。隣接セルは境界線を共有する。

use crate::error::{DiffError, Result};
use image::RgbImage;
use tiny_skia::{FillRule, Paint, Path, Pixmap, Rect, Transform};

pub type Rgb = [u8; 3];

pub const WHITE: Rgb = [0xFF, 0xFF, 0xFF];
pub const BLACK: Rgb = [0x00, 0x00, 0x00];
/// ヘッダー背景
pub const ACCENT: Rgb = [0x4A, 0x90, 0xE2];
/// 網掛け行の背景
pub const SHADE: Rgb = [0xF5, 0xF5, 0xF5];

pub struct Canvas {
    pixmap: Pixmap,
}

fn solid(color: Rgb, anti_alias: bool) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], 0xFF);
    paint.anti_alias = anti_alias;
    paint
}

impl Canvas {
    /// 背景色で塗りつぶしたキャンバスを作成
    pub fn new(width: u32, height: u32, background: Rgb) -> Result<Self> {
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| DiffError::Canvas(format!("Pixmapを確保できません: {}x{}", width, height)))?;
        pixmap.fill(tiny_skia::Color::from_rgba8(background[0], background[1], background[2], 0xFF));
        Ok(Self { pixmap })
    }

    /// 半開区間の矩形を塗る（w x h px）
    pub fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, color: Rgb) {
        // キャンバス外やサイズ0は何もしない
        let Some(rect) = Rect::from_xywh(x as f32, y as f32, w as f32, h as f32) else {
            return;
        };
        self.pixmap
            .fill_rect(rect, &solid(color, false), Transform::identity(), None);
    }

    /// 塗り + 1px枠のセル（両端を含む）
    pub fn cell(&mut self, x: u32, y: u32, w: u32, h: u32, fill: Rgb, outline: Rgb) {
        let (x, y) = (x as i64, y as i64);
        self.fill_rect(x, y, w + 1, h + 1, fill);
        self.fill_rect(x, y, w + 1, 1, outline);
        self.fill_rect(x, y + h as i64, w + 1, 1, outline);
        self.fill_rect(x, y, 1, h + 1, outline);
        self.fill_rect(x + w as i64, y, 1, h + 1, outline);
    }

    pub fn fill_path(&mut self, path: &Path, color: Rgb) {
        self.pixmap.fill_path(
            path,
            &solid(color, true),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        let p = self.pixmap.pixel(x, y)?;
        Some([p.red(), p.green(), p.blue()])
    }

    /// RGB画像に変換（常に不透明なのでアルファは捨てる）
    pub fn into_rgb_image(self) -> Result<RgbImage> {
        let (w, h) = (self.pixmap.width(), self.pixmap.height());
        let mut rgb = Vec::with_capacity(w as usize * h as usize * 3);
        for px in self.pixmap.data().chunks_exact(4) {
            rgb.extend_from_slice(&px[..3]);
        }
        RgbImage::from_raw(w, h, rgb)
            .ok_or_else(|| DiffError::Canvas("RGBバッファのサイズが不正です".into()))
    }
}
