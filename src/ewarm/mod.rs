//! IAR Embedded Workbench for ARM (EWARM) project handling.
//!
//! This module creates and edits the two descriptor files of an EWARM
//! project:
//!
//! - `.eww`: workspace, referencing projects as `$WS_DIR$\<name>.ewp`
//! - `.ewp`: project, an XML tree of options, `<group>`s and `<file>`s
//!
//! # Project Layout
//!
//! ```text
//! <name>/
//!   EWARM/<name>.eww, <name>.ewp
//!   source/
//!     CMSIS/Include/...                 core headers
//!     CMSIS/Device/ST/<FAMILY>/...      device headers, startup, linker script
//!     user/main.c, user/inc/, user/src/
//!     <added folders>/
//! ```
//!
//! # Operations
//!
//! | Operation | Function |
//! |---|---|
//! | create | [`create::create`] |
//! | add_folder | [`folder::add_folder`] |
//! | clean | [`workspace::clean`] |
//! | rename_workspace | [`workspace::rename_workspace`] |
//! | rename_project | [`workspace::rename_project`] |
//! | rename | [`workspace::rename`] |

pub mod create;
pub mod device;
pub mod error;
pub mod folder;
pub mod layout;
pub mod project;
pub mod substitute;
pub mod synth;
pub mod workspace;

pub use device::{Core, Device};
pub use error::{EwarmError, EwarmResult};
pub use layout::TemplateLayout;
pub use synth::{FolderSynthesizer, IgnoreList, Node};

use std::path::{Path, PathBuf};

/// The two descriptor file types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    /// `.eww` workspace.
    Workspace,
    /// `.ewp` project.
    Project,
}

impl DescriptorKind {
    /// File extension, without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Workspace => "eww",
            Self::Project => "ewp",
        }
    }

    /// Checks that `path` is an existing file with this kind's extension.
    ///
    /// # Errors
    ///
    /// Returns [`EwarmError::FileNotFound`] or [`EwarmError::WrongExtension`].
    pub fn check(self, path: &Path) -> EwarmResult<()> {
        if !path.is_file() {
            return Err(EwarmError::file_not_found(path));
        }
        if !crate::fsutil::has_extension(path, self.extension()) {
            return Err(EwarmError::wrong_extension(path, self.extension()));
        }
        Ok(())
    }

    /// `<folder of path>/<name>.<ext>`.
    #[must_use]
    pub fn sibling(self, path: &Path, name: &str) -> PathBuf {
        path.with_file_name(format!("{name}.{}", self.extension()))
    }

    /// Returns `true` if `file_name` ends in `.eww` or `.ewp`.
    #[must_use]
    pub fn is_descriptor(file_name: &str) -> bool {
        [Self::Workspace, Self::Project]
            .iter()
            .any(|kind| crate::fsutil::has_extension(Path::new(file_name), kind.extension()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_keeps_folder() {
        assert_eq!(
            DescriptorKind::Project.sibling(Path::new("Blinky/EWARM/template.ewp"), "Blinky"),
            PathBuf::from("Blinky/EWARM/Blinky.ewp")
        );
        assert_eq!(
            DescriptorKind::Workspace.sibling(Path::new("template.eww"), "app"),
            PathBuf::from("app.eww")
        );
    }

    #[test]
    fn descriptor_names() {
        assert!(DescriptorKind::is_descriptor("Blinky.eww"));
        assert!(DescriptorKind::is_descriptor("Blinky.ewp"));
        assert!(!DescriptorKind::is_descriptor("Blinky.ewd"));
        assert!(!DescriptorKind::is_descriptor("Blinky.dep"));
        assert!(!DescriptorKind::is_descriptor("ewp"));
        assert!(DescriptorKind::is_descriptor(".eww"));
    }

    #[test]
    fn dot_named_descriptor_passes_check() {
        let dir = tempfile::tempdir().unwrap();
        let hidden = dir.path().join(".eww");
        std::fs::write(&hidden, "").unwrap();
        assert!(DescriptorKind::Workspace.check(&hidden).is_ok());
        assert!(matches!(
            DescriptorKind::Project.check(&hidden),
            Err(EwarmError::WrongExtension { .. })
        ));
    }
}
