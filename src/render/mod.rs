//! Annotation and overlay rendering
//!
//! This module contains:
//! - Geometry calculations shared by the shape drawing functions
//! - Stroke drawing into per-stroke layers using tiny-skia
//! - Text layout and glyph rasterization
//! - The selection overlay mask

pub mod geometry;
pub mod image;
pub mod overlay;
pub mod text;
