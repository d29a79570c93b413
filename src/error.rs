//! Error type shared by the selection, annotation and export engines

/// Failures surfaced by the library.
///
/// `InvalidState` and `CanvasLocked` are caller contract violations and are never
/// recovered internally. `Encode` is operational: the caller decides whether to retry.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    #[error("annotation surface cannot be repositioned while {0} stroke(s) exist")]
    CanvasLocked(usize),
    #[error("no background snapshot available for export")]
    MissingSnapshot,
    #[error("no clip region selected for export")]
    MissingRegion,
    #[error("cannot allocate a {width}x{height} surface")]
    Surface { width: u32, height: u32 },
    #[error("failed to encode image: {0}")]
    Encode(String),
    #[error("page capture failed: {0}")]
    Capture(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
