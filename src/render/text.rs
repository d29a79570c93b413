//! Multi-line text layout and glyph rasterization for text annotations

use std::path::Path;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use tiny_skia::{ColorU8, Pixmap, PixmapPaint, Transform};

use crate::config::ShapeColor;
use crate::domain::Point;

/// DejaVu Sans, used when no font is configured or the configured one is unusable
const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Load the configured font, falling back to the bundled one
pub fn load_font(configured: Option<&Path>) -> Option<FontArc> {
    if let Some(path) = configured {
        match std::fs::read(path).map(FontArc::try_from_vec) {
            Ok(Ok(font)) => return Some(font),
            Ok(Err(err)) => log::warn!("Invalid font {}: {}", path.display(), err),
            Err(err) => log::warn!("Cannot read font {}: {}", path.display(), err),
        }
    }

    match FontArc::try_from_slice(BUNDLED_FONT) {
        Ok(font) => Some(font),
        Err(err) => {
            log::error!("Bundled font is invalid: {}", err);
            None
        }
    }
}

/// Break `text` into lines no wider than `max_width`.
///
/// Explicit newlines are kept. Lines break at the last whitespace when possible,
/// otherwise between characters. A single character wider than `max_width` still
/// gets its own line.
pub fn layout_lines(text: &str, max_width: f32, advance: impl Fn(char) -> f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut width = 0.0;
        // Byte index of the last whitespace in `line` and the width up to and including it
        let mut break_at: Option<(usize, f32)> = None;
        let mut wrapped = false;

        for ch in paragraph.chars() {
            let w = advance(ch);
            if width + w > max_width && !line.is_empty() {
                match break_at.take() {
                    Some((index, width_at)) => {
                        let rest = line.split_off(index + 1);
                        lines.push(line.trim_end().to_string());
                        line = rest;
                        width -= width_at;
                    }
                    None => {
                        lines.push(std::mem::take(&mut line));
                        width = 0.0;
                    }
                }
                wrapped = true;
            }
            if wrapped && line.is_empty() && ch.is_whitespace() {
                // Leading whitespace on a wrapped line
                continue;
            }
            line.push(ch);
            width += w;
            if ch.is_whitespace() {
                break_at = Some((line.len() - ch.len_utf8(), width));
            }
        }

        lines.push(line.trim_end().to_string());
    }

    lines
}

/// Font size, spacing and color of a text annotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub line_spacing: f32,
    pub color: ShapeColor,
}

impl TextStyle {
    pub fn line_height(&self) -> f32 {
        self.font_size * self.line_spacing
    }
}

/// Lay out `text` for `max_width` and rasterize it with its top-left corner at `origin`.
///
/// Returns the number of lines drawn.
pub fn draw_text(
    pixmap: &mut Pixmap,
    font: &FontArc,
    origin: Point,
    max_width: f32,
    text: &str,
    style: &TextStyle,
) -> usize {
    let scale = PxScale::from(style.font_size);
    let scaled = font.as_scaled(scale);
    let lines = layout_lines(text, max_width, |ch| scaled.h_advance(scaled.glyph_id(ch)));
    let [r, g, b, a] = style.color.to_rgba_u8();

    // Drawn over transparent pixels, the alpha channel ends up as coverage times colour alpha
    let mut glyphs = RgbaImage::new(pixmap.width(), pixmap.height());
    for (index, line) in lines.iter().enumerate() {
        let top = origin.y + index as f32 * style.line_height();
        draw_text_mut(
            &mut glyphs,
            Rgba([r, g, b, a]),
            origin.x.round() as i32,
            top.round() as i32,
            scale,
            font,
            line,
        );
    }

    let Some(mut layer) = Pixmap::new(pixmap.width(), pixmap.height()) else {
        return 0;
    };
    for (dst, src) in layer.pixels_mut().iter_mut().zip(glyphs.pixels()) {
        let alpha = src[3];
        if alpha > 0 {
            *dst = ColorU8::from_rgba(r, g, b, alpha).premultiply();
        }
    }
    pixmap.draw_pixmap(
        0,
        0,
        layer.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );

    lines.len()
}
