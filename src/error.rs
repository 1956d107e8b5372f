//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the helico crate.
#[derive(Debug)]
pub enum HelicoError {
    /// The surface handle was missing or no rendering context could be
    /// created for it. Fatal at mount.
    SurfaceUnavailable(RenderContextError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for HelicoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SurfaceUnavailable(e) => {
                write!(f, "rendering surface unavailable: {e}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for HelicoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SurfaceUnavailable(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for HelicoError {
    fn from(e: RenderContextError) -> Self {
        Self::SurfaceUnavailable(e)
    }
}

impl From<std::io::Error> for HelicoError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
