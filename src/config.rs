//! Configuration persistence for pageclip settings

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Serializable RGBA color, components in 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Default for ShapeColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl ShapeColor {
    pub const BLACK: Self = Self::rgb8(0, 0, 0);
    pub const WHITE: Self = Self::rgb8(255, 255, 255);
    pub const RED: Self = Self::rgb8(255, 0, 0);
    pub const GREEN: Self = Self::rgb8(0, 128, 0);
    pub const BLUE: Self = Self::rgb8(0, 0, 255);
    pub const YELLOW: Self = Self::rgb8(255, 255, 0);
    pub const BROWN: Self = Self::rgb8(165, 42, 42);
    pub const PURPLE: Self = Self::rgb8(128, 0, 128);

    /// Colors offered by the toolbar's option panel, in display order
    pub const PALETTE: [(&'static str, ShapeColor); 8] = [
        ("black", Self::BLACK),
        ("white", Self::WHITE),
        ("red", Self::RED),
        ("green", Self::GREEN),
        ("blue", Self::BLUE),
        ("yellow", Self::YELLOW),
        ("brown", Self::BROWN),
        ("purple", Self::PURPLE),
    ];

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Look up a palette color by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::PALETTE
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, color)| *color)
    }

    /// Convert to image crate RGBA format (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            (self.a * 255.0).round() as u8,
        ]
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        let [r, g, b, a] = self.to_rgba_u8();
        tiny_skia::Color::from_rgba8(r, g, b, a)
    }
}

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageClipConfig {
    /// Radius of the handle dots, also the handle hit tolerance
    pub dot_radius: f32,
    /// Clip rectangle border and handle color
    pub border_color: ShapeColor,
    /// Translucent mask painted outside the clip region
    pub mask_color: ShapeColor,
    /// Base name for saved exports (".jpg" is appended)
    pub save_file_name: String,
    /// JPEG quality for exports (1-100)
    pub jpeg_quality: u8,
    /// Stacking order of the mask layer; annotation and toolbar layers sit above it
    pub z_index: i32,
    /// Line height as a multiple of the font size for committed text
    pub text_line_spacing: f32,
    /// Font used to rasterize text annotations (system fonts are tried when unset)
    pub font_path: Option<PathBuf>,
    /// Element selectors the page rasterizer should skip
    pub ignore_elements: Vec<String>,
}

impl Default for PageClipConfig {
    fn default() -> Self {
        Self {
            dot_radius: 3.0,
            border_color: ShapeColor::RED,
            mask_color: ShapeColor::BLACK.with_alpha(0.4),
            save_file_name: "screenshot".to_string(),
            jpeg_quality: 95,
            z_index: 5000,
            text_line_spacing: 1.2,
            font_path: None,
            ignore_elements: Vec::new(),
        }
    }
}

impl PageClipConfig {
    /// Directory name under the user config dir
    pub const ID: &'static str = "pageclip";

    /// Default location of the config file
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            log::error!("No config directory available for saving");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {:?}", err);
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// File name suggested for a save action
    pub fn save_file(&self) -> String {
        format!("{}.jpg", self.save_file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_overlay_style() {
        let config = PageClipConfig::default();
        assert_eq!(config.dot_radius, 3.0);
        assert_eq!(config.border_color, ShapeColor::RED);
        assert_eq!(config.mask_color.to_rgba_u8(), [0, 0, 0, 102]);
        assert_eq!(config.save_file(), "screenshot.jpg");
    }

    #[test]
    fn test_palette_lookup() {
        assert_eq!(ShapeColor::from_name("Purple"), Some(ShapeColor::PURPLE));
        assert_eq!(ShapeColor::from_name("teal"), None);
        assert_eq!(ShapeColor::BROWN.to_rgba_u8(), [165, 42, 42, 255]);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = PageClipConfig {
            save_file_name: "capture".to_string(),
            jpeg_quality: 80,
            ignore_elements: vec!["#toolbar".to_string()],
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        let loaded = PageClipConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "dot_radius": 5.0, "border_color": { "r": 0.0, "g": 0.0, "b": 1.0 } }"#)
            .unwrap();

        let loaded = PageClipConfig::load_from(&path).unwrap();
        assert_eq!(loaded.dot_radius, 5.0);
        assert_eq!(loaded.border_color, ShapeColor::BLUE);
        assert_eq!(loaded.jpeg_quality, 95);
    }
}
