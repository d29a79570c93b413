//! Region selection, annotation and export over a captured page snapshot.
//!
//! A [`screenshot::Session`] masks the page, lets the user drag and adjust a clip
//! region, draw shapes and text over it, and exports the result as JPEG plus a PNG
//! data URL.

pub mod annotations;
pub mod capture;
pub mod config;
pub mod core;
pub mod domain;
pub mod error;
pub mod render;
pub mod screenshot;
pub mod session;

pub use error::{Error, Result};
