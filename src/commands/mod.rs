//! Command dispatch.
//!
//! [`Command`] is the fully resolved form of one CLI invocation; [`run`]
//! executes it against a [`Config`]. Nothing here prints or exits: the
//! binary owns that boundary.

pub mod usage;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;
use crate::ewarm::create::create;
use crate::ewarm::folder::add_folder;
use crate::ewarm::workspace::{clean, rename, rename_project, rename_workspace};
use crate::ewarm::{EwarmResult, IgnoreList};

/// The six verbs the tool understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// `create`
    Create,
    /// `add_folder`
    AddFolder,
    /// `clean`
    Clean,
    /// `rename_workspace`
    RenameWorkspace,
    /// `rename_project`
    RenameProject,
    /// `rename`
    Rename,
}

impl Verb {
    /// Command-line spelling.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::AddFolder => "add_folder",
            Self::Clean => "clean",
            Self::RenameWorkspace => "rename_workspace",
            Self::RenameProject => "rename_project",
            Self::Rename => "rename",
        }
    }

    /// Usage text for this verb.
    #[must_use]
    pub const fn usage(self) -> &'static str {
        match self {
            Self::Create => usage::CREATE,
            Self::AddFolder => usage::ADD_FOLDER,
            Self::Clean => usage::CLEAN,
            Self::RenameWorkspace => usage::RENAME_WORKSPACE,
            Self::RenameProject => usage::RENAME_PROJECT,
            Self::Rename => usage::RENAME,
        }
    }
}

/// One fully specified command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Scaffold a new project in the working directory.
    Create {
        /// Project name (folder and descriptor base name).
        name: String,
        /// Device identifier, e.g. `stm32f407xx`.
        device: String,
    },
    /// Copy a folder into a project and list it in the descriptor.
    AddFolder {
        /// The `.ewp` descriptor.
        project: PathBuf,
        /// Folder to copy.
        folder: PathBuf,
        /// Slash-separated file endings to leave out.
        ignore: Option<String>,
    },
    /// Delete build artifacts next to a workspace.
    Clean {
        /// The `.eww` descriptor.
        workspace: PathBuf,
    },
    /// Rename a workspace descriptor.
    RenameWorkspace {
        /// The `.eww` descriptor.
        workspace: PathBuf,
        /// New base name.
        name: String,
    },
    /// Rename a project descriptor and fix the workspace reference.
    RenameProject {
        /// The `.ewp` descriptor.
        project: PathBuf,
        /// The `.eww` descriptor referencing it.
        workspace: PathBuf,
        /// New base name.
        name: String,
    },
    /// Rename the project, then the workspace.
    Rename {
        /// The `.ewp` descriptor.
        project: PathBuf,
        /// The `.eww` descriptor referencing it.
        workspace: PathBuf,
        /// New base name for both.
        name: String,
    },
}

impl Command {
    /// The verb this command was invoked as.
    #[must_use]
    pub const fn verb(&self) -> Verb {
        match self {
            Self::Create { .. } => Verb::Create,
            Self::AddFolder { .. } => Verb::AddFolder,
            Self::Clean { .. } => Verb::Clean,
            Self::RenameWorkspace { .. } => Verb::RenameWorkspace,
            Self::RenameProject { .. } => Verb::RenameProject,
            Self::Rename { .. } => Verb::Rename,
        }
    }
}

/// Executes `command`.
///
/// `create` builds the project in the working directory using the template
/// and CMSIS folders from `config`.
///
/// # Errors
///
/// Returns the first error raised by the underlying operation.
pub fn run(command: &Command, config: &Config) -> EwarmResult<()> {
    run_in(command, config, Path::new(""))
}

/// Executes `command`, creating new projects below `parent`.
///
/// # Errors
///
/// Returns the first error raised by the underlying operation.
pub fn run_in(command: &Command, config: &Config, parent: &Path) -> EwarmResult<()> {
    debug!(command = command.verb().name(), "Running command");
    match command {
        Command::Create { name, device } => {
            create(&config.layout(), parent, name, device)?;
        }
        Command::AddFolder {
            project,
            folder,
            ignore,
        } => {
            let ignore = ignore.as_deref().map(IgnoreList::parse).unwrap_or_default();
            add_folder(project, folder, &ignore, &config.source_prefix)?;
        }
        Command::Clean { workspace } => {
            clean(workspace)?;
        }
        Command::RenameWorkspace { workspace, name } => {
            rename_workspace(workspace, name)?;
        }
        Command::RenameProject {
            project,
            workspace,
            name,
        } => {
            rename_project(project, workspace, name)?;
        }
        Command::Rename {
            project,
            workspace,
            name,
        } => {
            rename(project, workspace, name)?;
        }
    }
    Ok(())
}
