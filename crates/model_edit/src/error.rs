use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The broad class of an [`EditError`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    NotFound,
    Decode,
    Mutation,
    Persist,
    Backup,
}

/// An error that occurs while customizing an asset.
#[derive(Error, Debug)]
pub enum EditError {
    #[error("asset not found: {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid glTF document: {0}")]
    InvalidDocument(#[from] gltf::Error),
    #[error("unsupported glTF version {0:?}")]
    UnsupportedVersion(String),
    #[error("invalid document JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid color {input:?}: {reason}")]
    InvalidColor { input: String, reason: &'static str },
    #[error("invalid scale factor {0:?}")]
    InvalidScale(String),
    #[error("mutation failed: {0}")]
    Mutation(String),
    #[error("failed to encode document: {0}")]
    Encode(#[source] gltf::Error),
    #[error("failed to write {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("backup of {} failed: {source}", .path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl EditError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EditError::NotFound { .. } => ErrorKind::NotFound,
            EditError::Read { .. }
            | EditError::InvalidDocument(_)
            | EditError::UnsupportedVersion(_)
            | EditError::InvalidJson(_)
            | EditError::InvalidColor { .. }
            | EditError::InvalidScale(_) => ErrorKind::Decode,
            EditError::Mutation(_) => ErrorKind::Mutation,
            EditError::Encode(_) | EditError::Persist { .. } => ErrorKind::Persist,
            EditError::Backup { .. } => ErrorKind::Backup,
        }
    }

    /// True for errors caused by caller-supplied edit parameters rather than
    /// by the asset or the file system.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, EditError::InvalidColor { .. } | EditError::InvalidScale(_))
    }
}

pub type Result<T, E = EditError> = std::result::Result<T, E>;
