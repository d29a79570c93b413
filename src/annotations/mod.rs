//! Annotation engine
//!
//! This module provides:
//! - Stroke layers and the undo stack
//! - The text entry sub-mode
//! - The engine routing pointer input to the active tool

pub mod engine;
pub mod stroke;
pub mod text;

pub use engine::AnnotationEngine;
pub use stroke::{AnnotationStack, Stroke};
pub use text::TextEditSession;
