use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fatal errors for the postlint library.
///
/// These stop a run before any document is processed: a missing content
/// directory, an unreadable or malformed config file, or an invalid exclude
/// pattern. Problems with individual documents are never reported through
/// this type; they are collected as [`FileFailure`] values instead.
#[derive(Debug, thiserror::Error)]
pub enum PostlintError {
    /// The content directory to walk does not exist.
    #[error("Content directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// IO error occurred while reading configuration.
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has unknown fields.
    #[error("Invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// An exclude pattern could not be compiled.
    #[error("Invalid exclude pattern: {0}")]
    Glob(#[from] globset::Error),
}

/// Convenience Result type for postlint operations.
pub type Result<T> = std::result::Result<T, PostlintError>;

/// The kind of per-document failure recorded during a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFailureKind {
    /// The document could not be read (permissions, invalid UTF-8, ...).
    UnreadableFile,
    /// Writing the fixed document back failed; the original is untouched.
    WriteFailure,
}

impl FileFailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnreadableFile => "UnreadableFile",
            Self::WriteFailure => "WriteFailure",
        }
    }
}

impl std::fmt::Display for FileFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A document that could not be processed. Recorded, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub kind: FileFailureKind,
    pub message: String,
}

impl FileFailure {
    pub fn unreadable(path: PathBuf, err: &std::io::Error) -> Self {
        Self {
            path,
            kind: FileFailureKind::UnreadableFile,
            message: err.to_string(),
        }
    }

    /// An entry the directory walk could not read.
    pub fn unreadable_entry(path: PathBuf, message: String) -> Self {
        Self {
            path,
            kind: FileFailureKind::UnreadableFile,
            message,
        }
    }

    pub fn write_failure(path: PathBuf, err: &std::io::Error) -> Self {
        Self {
            path,
            kind: FileFailureKind::WriteFailure,
            message: err.to_string(),
        }
    }
}
