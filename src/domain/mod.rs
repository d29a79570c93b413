//! Pure domain types with minimal dependencies
//!
//! This module contains the geometry, handle model and tool types shared by the
//! selection controller, the annotation engine and the export step. Nothing here
//! touches pixels.

pub mod annotation;
pub mod geometry;
pub mod selection;

pub use annotation::*;
pub use geometry::*;
pub use selection::*;
