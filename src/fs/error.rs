//! VFS error taxonomy.

use thiserror::Error;

/// POSIX-style error kinds surfaced by every VFS operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FsError {
    #[error("ENOENT: no such file or directory, {operation} '{path}'")]
    NotFound { path: String, operation: String },

    #[error("EEXIST: file already exists, {operation} '{path}'")]
    AlreadyExists { path: String, operation: String },

    #[error("EISDIR: illegal operation on a directory, {operation} '{path}'")]
    IsDirectory { path: String, operation: String },

    #[error("ENOTDIR: not a directory, {operation} '{path}'")]
    NotDirectory { path: String, operation: String },

    #[error("ENOTEMPTY: directory not empty, {operation} '{path}'")]
    NotEmpty { path: String, operation: String },

    #[error("{message}")]
    Other { message: String },
}

impl FsError {
    /// Short POSIX-style errno tag, used by builtins that render `mkdir: ... : File exists`.
    pub fn kind_str(&self) -> &'static str {
        match self {
            FsError::NotFound { .. } => "ENOENT",
            FsError::AlreadyExists { .. } => "EEXIST",
            FsError::IsDirectory { .. } => "EISDIR",
            FsError::NotDirectory { .. } => "ENOTDIR",
            FsError::NotEmpty { .. } => "ENOTEMPTY",
            FsError::Other { .. } => "EOTHER",
        }
    }
}
