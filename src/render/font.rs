//! フォントの解決と文字計測
//!
//! FontChain に並べたフォント源を順に試し、最初に読めたものを使う。
//! 全て失敗した場合は組み込みビットマップフォントになるので、解決は失敗しない。

use super::builtin::BuiltinFont;
use super::canvas::{Canvas, Rgb};
use desc_diff_common::TextExtent;
use std::path::PathBuf;
use std::sync::Arc;
use tiny_skia::PathBuilder;
use ttf_parser::{Face, GlyphId, OutlineBuilder};

/// 文字の計測と描画
pub trait Typeface {
    fn measure(&self, text: &str) -> TextExtent;

    /// (x, y) を行の上端（アセンダ位置）として描画
    fn draw(&self, canvas: &mut Canvas, text: &str, x: i64, y: i64, color: Rgb);
}

/// フォント源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// フォントファイル（ttf/otf/ttc、先頭フェイス）
    File(PathBuf),
    /// システムフォントのファミリー名
    System(String),
    /// 組み込みフォント
    Builtin,
}

/// 読み込み済みのアウトラインフォント
#[derive(Clone)]
pub struct OutlineFace {
    pub name: String,
    data: Arc<Vec<u8>>,
    index: u32,
}

impl std::fmt::Debug for OutlineFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineFace")
            .field("name", &self.name)
            .field("index", &self.index)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl OutlineFace {
    /// バイト列を検証して読み込み
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>, index: u32) -> Option<Self> {
        if let Err(e) = Face::parse(&data, index) {
            tracing::debug!(error = %e, "フォントの解析に失敗");
            return None;
        }
        Some(Self {
            name: name.into(),
            data: Arc::new(data),
            index,
        })
    }

    fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.data, self.index).ok()
    }
}

/// 解決済みのフォント（サイズ未指定）
#[derive(Debug, Clone)]
pub enum FontFace {
    Outline(OutlineFace),
    Builtin,
}

impl FontFace {
    pub fn name(&self) -> &str {
        match self {
            FontFace::Outline(face) => &face.name,
            FontFace::Builtin => "builtin",
        }
    }

    pub fn sized(&self, size: f32) -> Font {
        match self {
            FontFace::Outline(face) if size > 0.0 && size.is_finite() => Font::Outline {
                face: face.clone(),
                size,
            },
            FontFace::Outline(_) => {
                tracing::warn!(size, "フォントサイズが不正なため組み込みフォントを使用");
                Font::Builtin(BuiltinFont)
            }
            FontFace::Builtin => Font::Builtin(BuiltinFont),
        }
    }
}

/// サイズ指定済みのフォント
#[derive(Debug, Clone)]
pub enum Font {
    Outline { face: OutlineFace, size: f32 },
    Builtin(BuiltinFont),
}

impl Font {
    pub fn is_builtin(&self) -> bool {
        matches!(self, Font::Builtin(_))
    }
}

fn glyph_id(face: &Face<'_>, c: char) -> GlyphId {
    face.glyph_index(c).unwrap_or(GlyphId(0))
}

/// フォント単位 → px 変換しながら tiny-skia のパスを組み立てる
struct GlyphPathBuilder {
    builder: PathBuilder,
    origin_x: f32,
    baseline: f32,
    scale: f32,
}

impl GlyphPathBuilder {
    fn point(&self, x: f32, y: f32) -> (f32, f32) {
        (self.origin_x + x * self.scale, self.baseline - y * self.scale)
    }
}

impl OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x, y) = self.point(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x2, y2) = self.point(x2, y2);
        let (x, y) = self.point(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

impl Typeface for Font {
    fn measure(&self, text: &str) -> TextExtent {
        let (face, size) = match self {
            Font::Builtin(builtin) => return builtin.measure(text),
            Font::Outline { face, size } => (face, *size),
        };
        if text.is_empty() {
            return TextExtent::ZERO;
        }
        let Some(face) = face.face() else {
            return BuiltinFont.measure(text);
        };

        let scale = size / face.units_per_em() as f32;
        let advance: f32 = text
            .chars()
            .map(|c| face.glyph_hor_advance(glyph_id(&face, c)).unwrap_or(0) as f32)
            .sum();
        let line = (face.ascender() as f32 - face.descender() as f32).max(0.0);

        TextExtent::new((advance * scale).ceil() as u32, (line * scale).ceil() as u32)
    }

    fn draw(&self, canvas: &mut Canvas, text: &str, x: i64, y: i64, color: Rgb) {
        let (face, size) = match self {
            Font::Builtin(builtin) => return builtin.draw(canvas, text, x, y, color),
            Font::Outline { face, size } => (face, *size),
        };
        let Some(face) = face.face() else {
            return BuiltinFont.draw(canvas, text, x, y, color);
        };

        let scale = size / face.units_per_em() as f32;
        let mut glyphs = GlyphPathBuilder {
            builder: PathBuilder::new(),
            origin_x: x as f32,
            baseline: y as f32 + face.ascender() as f32 * scale,
            scale,
        };

        for c in text.chars() {
            let id = glyph_id(&face, c);
            face.outline_glyph(id, &mut glyphs);
            glyphs.origin_x += face.glyph_hor_advance(id).unwrap_or(0) as f32 * scale;
        }

        // 空白のみの文字列はパスにならない
        if let Some(path) = glyphs.builder.finish() {
            canvas.fill_path(&path, color);
        }
    }
}

/// フォント源の優先順リスト
#[derive(Debug, Clone, Default)]
pub struct FontChain {
    sources: Vec<FontSource>,
}

impl FontChain {
    pub fn new(sources: Vec<FontSource>) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &[FontSource] {
        &self.sources
    }

    /// 先頭から順に試し、最初に読めたフォントを返す
    pub fn resolve(&self) -> FontFace {
        let mut system: Option<fontdb::Database> = None;

        for source in &self.sources {
            let loaded = match source {
                FontSource::File(path) => load_file(path),
                FontSource::System(family) => {
                    let db = system.get_or_insert_with(|| {
                        let mut db = fontdb::Database::new();
                        db.load_system_fonts();
                        tracing::debug!(faces = db.len(), "システムフォントを読み込み");
                        db
                    });
                    load_system(db, family)
                }
                FontSource::Builtin => return FontFace::Builtin,
            };

            match loaded {
                Some(face) => {
                    tracing::debug!(font = %face.name, "フォントを使用");
                    return FontFace::Outline(face);
                }
                None => tracing::debug!(?source, "フォントを読めないため次を試行"),
            }
        }

        tracing::warn!("利用できるフォントがないため組み込みフォントを使用");
        FontFace::Builtin
    }
}

fn load_file(path: &std::path::Path) -> Option<OutlineFace> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "フォントファイルを読めません");
            return None;
        }
    };
    OutlineFace::from_bytes(path.display().to_string(), data, 0)
}

fn load_system(db: &fontdb::Database, family: &str) -> Option<OutlineFace> {
    let query = fontdb::Query {
        families: &[fontdb::Family::Name(family)],
        ..fontdb::Query::default()
    };
    let id = db.query(&query)?;
    let (data, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
    OutlineFace::from_bytes(family, data, index)
}
