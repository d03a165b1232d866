use std::path::PathBuf;

use thiserror::Error;

use crate::geometry::boundaries::BoundaryKind;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Errors raised while parsing isochore files or building envelopes.
#[derive(Debug, Error)]
pub enum IsochoreError {
    /// A file violates the fixed SoWat layout.
    #[error("{file}, line {line}: {reason}")]
    Format {
        file: String,
        /// 1-based line number inside the file.
        line: usize,
        reason: String,
    },

    /// A filename stem does not follow `Sample_Assemblage-Inclusion`.
    #[error("invalid identifier '{identifier}': {reason}")]
    Identifier { identifier: String, reason: String },

    /// No isochore of a sample crosses one of the reference boundaries.
    #[error("sample {sample}: no isochore intersects the {boundary} boundary")]
    ModelAssumption { sample: String, boundary: BoundaryKind },

    #[error("reading {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IsochoreError {
    pub(crate) fn format(file: &str, line: usize, reason: impl Into<String>) -> Self {
        IsochoreError::Format {
            file: file.to_string(),
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn identifier(identifier: &str, reason: impl Into<String>) -> Self {
        IsochoreError::Identifier {
            identifier: identifier.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IsochoreError>;
