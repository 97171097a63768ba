//! Error types for project and workspace operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for EWARM operations.
pub type EwarmResult<T> = Result<T, EwarmError>;

/// Errors that can occur while creating or editing EWARM projects.
///
/// Every variant renders as a single line naming the offending path or
/// value, suitable for printing as the tool's final diagnostic.
#[derive(Debug, Error)]
pub enum EwarmError {
    /// A required file does not exist.
    #[error("Can not find \"{}\" file", path.display())]
    FileNotFound {
        /// Path that was expected to be a file.
        path: PathBuf,
    },

    /// A required folder does not exist.
    #[error("Can not find \"{}\" folder", path.display())]
    FolderNotFound {
        /// Path that was expected to be a folder.
        path: PathBuf,
    },

    /// The destination of a create, copy or rename is already taken.
    #[error("\"{}\" already exists", path.display())]
    AlreadyExists {
        /// The occupied path.
        path: PathBuf,
    },

    /// A descriptor path does not carry the expected extension.
    #[error("\"{}\" is not *.{expected} file", path.display())]
    WrongExtension {
        /// The offending path.
        path: PathBuf,
        /// Extension that was expected, without the dot.
        expected: &'static str,
    },

    /// The device identifier is not an STM32F part.
    #[error("Undefined device \"{device}\"")]
    UndefinedDevice {
        /// Identifier as given by the user.
        device: String,
    },

    /// The device identifier has the right prefix but is malformed.
    #[error("Invalid device \"{device}\": {message}")]
    InvalidDevice {
        /// Identifier as given by the user.
        device: String,
        /// Description of what's wrong.
        message: String,
    },

    /// The series digit does not map to a known Cortex-M core.
    #[error("Can not define device core for \"{device}\"")]
    UnrecognizedCore {
        /// Identifier as given by the user.
        device: String,
    },

    /// A project or workspace name is not usable as a file name.
    #[error("Invalid name \"{name}\": {message}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Description of what's wrong.
        message: String,
    },

    /// An operating system call failed.
    #[error("Can not {action} \"{}\": {source}", path.display())]
    Io {
        /// What was being attempted ("copy", "rename", "delete", ...).
        action: &'static str,
        /// Path the operation was applied to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The project descriptor is not well-formed XML.
    #[error("Can not parse \"{}\": {message}", path.display())]
    Xml {
        /// Path to the descriptor.
        path: PathBuf,
        /// Description from the XML reader or writer.
        message: String,
    },
}

impl EwarmError {
    /// Creates a file-not-found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Creates a folder-not-found error.
    pub fn folder_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FolderNotFound { path: path.into() }
    }

    /// Creates an already-exists error.
    pub fn already_exists(path: impl Into<PathBuf>) -> Self {
        Self::AlreadyExists { path: path.into() }
    }

    /// Creates a wrong-extension error.
    pub fn wrong_extension(path: impl Into<PathBuf>, expected: &'static str) -> Self {
        Self::WrongExtension {
            path: path.into(),
            expected,
        }
    }

    /// Creates an invalid-device error.
    pub fn invalid_device(device: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDevice {
            device: device.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid-name error.
    pub fn invalid_name(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an I/O error for the given action.
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Creates an XML error.
    pub fn xml(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Xml {
            path: path.into(),
            message: message.into(),
        }
    }
}
