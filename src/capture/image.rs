//! Page snapshot type

use image::RgbaImage;
use tiny_skia::{ColorU8, Pixmap};

use crate::error::{Error, Result};

/// Rasterized page in device pixels
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub rgba: RgbaImage,
}

impl Snapshot {
    pub fn new(rgba: RgbaImage) -> Self {
        log::debug!("Snapshot captured: {}x{} pixels", rgba.width(), rgba.height());
        Self { rgba }
    }

    /// Get the width of the image
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    /// Get the height of the image
    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    /// Premultiplied copy for compositing
    pub fn to_pixmap(&self) -> Result<Pixmap> {
        let (width, height) = self.rgba.dimensions();
        let mut pixmap = Pixmap::new(width, height).ok_or(Error::Surface { width, height })?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(self.rgba.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        Ok(pixmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pixmap_premultiplies() {
        let mut rgba = RgbaImage::new(2, 1);
        rgba.put_pixel(0, 0, image::Rgba([200, 100, 50, 255]));
        rgba.put_pixel(1, 0, image::Rgba([200, 100, 50, 128]));
        let snapshot = Snapshot::new(rgba);

        let pixmap = snapshot.to_pixmap().unwrap();
        let opaque = pixmap.pixel(0, 0).unwrap();
        assert_eq!((opaque.red(), opaque.green(), opaque.alpha()), (200, 100, 255));
        let half = pixmap.pixel(1, 0).unwrap();
        assert_eq!(half.alpha(), 128);
        assert!(half.red() < 200);
    }

    #[test]
    fn test_empty_snapshot_has_no_pixmap() {
        let snapshot = Snapshot::new(RgbaImage::new(0, 0));
        assert!(snapshot.to_pixmap().is_err());
    }
}
