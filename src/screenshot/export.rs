//! Composition of the clip region with its annotations, and image encoding

use std::io;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::RgbaImage;
use image::codecs::jpeg::JpegEncoder;
use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::domain::{ClipRegion, Point};
use crate::error::{Error, Result};

/// Encoded image bytes with their MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

/// Everything produced by one export
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// `data:image/png;base64,...`
    pub data_url: String,
    /// JPEG encoding of `raster`
    pub blob: EncodedImage,
    pub raster: RgbaImage,
}

/// Crop the background to `region` and draw the annotation surface over it.
///
/// `background` holds device pixels of the whole page, so the region is shifted by
/// the scroll offset and scaled by `pixel_ratio`. The annotation surface is stretched
/// to the output size.
pub fn compose(
    background: &Pixmap,
    region: &ClipRegion,
    annotations: Option<&Pixmap>,
    pixel_ratio: f32,
    scroll: Point,
) -> Result<Pixmap> {
    let r = pixel_ratio;
    let width = (region.w * r).round() as u32;
    let height = (region.h * r).round() as u32;
    let mut canvas = Pixmap::new(width, height).ok_or(Error::Surface { width, height })?;

    let offset_x = -(region.x + scroll.x) * r;
    let offset_y = -(region.y + scroll.y) * r;
    canvas.draw_pixmap(
        0,
        0,
        background.as_ref(),
        &PixmapPaint::default(),
        Transform::from_translate(offset_x, offset_y),
        None,
    );

    if let Some(layer) = annotations {
        let sx = width as f32 / layer.width() as f32;
        let sy = height as f32 / layer.height() as f32;
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..Default::default()
        };
        canvas.draw_pixmap(
            0,
            0,
            layer.as_ref(),
            &paint,
            Transform::from_scale(sx, sy),
            None,
        );
    }

    Ok(canvas)
}

/// Straight-alpha copy of a premultiplied pixmap
pub fn to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut out = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in out.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    out
}

pub fn encode_jpeg(image: &RgbaImage, quality: u8) -> Result<EncodedImage> {
    // JPEG has no alpha channel; transparent pixels come out black
    let rgb = image::DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(|err| Error::Encode(err.to_string()))?;
    Ok(EncodedImage {
        bytes,
        mime: "image/jpeg",
    })
}

fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}

pub fn png_data_url(image: &RgbaImage) -> Result<String> {
    let mut bytes = Vec::new();
    write_png(&mut bytes, image).map_err(|err| Error::Encode(err.to_string()))?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&bytes)))
}

/// Encode a composed raster into both output forms
pub fn encode(raster: RgbaImage, quality: u8) -> Result<ExportResult> {
    let blob = encode_jpeg(&raster, quality)?;
    let data_url = png_data_url(&raster)?;
    Ok(ExportResult {
        data_url,
        blob,
        raster,
    })
}

/// Compose on the caller's thread, then encode on the blocking pool
pub async fn export(
    background: &Pixmap,
    region: &ClipRegion,
    annotations: Option<&Pixmap>,
    pixel_ratio: f32,
    scroll: Point,
    quality: u8,
) -> Result<ExportResult> {
    let composed = compose(background, region, annotations, pixel_ratio, scroll)?;
    let raster = to_rgba_image(&composed);
    log::debug!(
        "Encoding {}x{} export (quality {quality})",
        raster.width(),
        raster.height()
    );

    tokio::task::spawn_blocking(move || encode(raster, quality))
        .await
        .map_err(|err| Error::Encode(err.to_string()))?
}
