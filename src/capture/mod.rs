//! Page capture
//!
//! This module provides:
//! - The snapshot type (image.rs)
//! - The rasterizer collaborator and a file-backed implementation

pub mod image;

use std::path::PathBuf;

use anyhow::Context;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

pub use self::image::Snapshot;

/// What the rasterizer should leave out of the capture
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureOptions {
    /// Element identifiers excluded from the snapshot
    pub ignore_elements: Vec<String>,
}

/// Renders the whole page into a snapshot. Called once per session before input.
pub trait PageRasterizer {
    fn capture<'a>(&'a self, options: &'a CaptureOptions) -> BoxFuture<'a, anyhow::Result<Snapshot>>;
}

/// Rasterizer that loads a previously rendered page from disk
#[derive(Debug, Clone)]
pub struct FileRasterizer {
    path: PathBuf,
}

impl FileRasterizer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PageRasterizer for FileRasterizer {
    fn capture<'a>(&'a self, options: &'a CaptureOptions) -> BoxFuture<'a, anyhow::Result<Snapshot>> {
        Box::pin(async move {
            if !options.ignore_elements.is_empty() {
                log::debug!(
                    "Ignoring {} element(s) has no effect on a pre-rendered page",
                    options.ignore_elements.len()
                );
            }
            let path = self.path.clone();
            let rgba = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
                let image = ::image::open(&path)
                    .with_context(|| format!("Failed to decode page image {}", path.display()))?;
                Ok(image.to_rgba8())
            })
            .await??;
            Ok(Snapshot::new(rgba))
        })
    }
}
