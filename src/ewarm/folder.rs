//! `add_folder`: copy a folder into a project and list it in the descriptor.

use std::path::{Path, PathBuf};

use tracing::info;

use super::layout::SOURCE_DIR;
use super::synth::{self, FolderSynthesizer, IgnoreList};
use super::{DescriptorKind, EwarmError, EwarmResult};
use crate::fsutil;

/// Returns the project root for a descriptor path: the parent of the folder
/// holding the `.ewp`, i.e. what `$PROJ_DIR$/..` resolves to.
#[must_use]
pub fn project_root(project_path: &Path) -> PathBuf {
    let ewarm = fsutil::parent_dir(project_path);
    match ewarm.parent() {
        Some(root) if !root.as_os_str().is_empty() => root.to_path_buf(),
        _ => ewarm.join(".."),
    }
}

/// Copies `folder` to `<project root>/source/<folder name>` and appends a
/// matching group to the project descriptor.
///
/// The copy happens first; the descriptor is only touched once the copy has
/// succeeded. Returns the destination folder.
///
/// # Errors
///
/// - [`EwarmError::FileNotFound`] if `project_path` is not a file
/// - [`EwarmError::WrongExtension`] if it is not an `.ewp`
/// - [`EwarmError::FolderNotFound`] if `folder` is not a folder
/// - [`EwarmError::AlreadyExists`] if the destination folder exists
/// - I/O or XML errors from the copy and the descriptor update
pub fn add_folder(
    project_path: &Path,
    folder: &Path,
    ignore: &IgnoreList,
    source_prefix: &str,
) -> EwarmResult<PathBuf> {
    DescriptorKind::Project.check(project_path)?;
    if !folder.is_dir() {
        return Err(EwarmError::folder_not_found(folder));
    }
    let name = fsutil::base_name(folder).ok_or_else(|| {
        EwarmError::invalid_name(
            folder.display().to_string(),
            "folder path must end in a folder name",
        )
    })?;

    let destination = project_root(project_path).join(SOURCE_DIR).join(&name);
    if destination.exists() {
        return Err(EwarmError::already_exists(destination));
    }
    fsutil::copy_tree(folder, &destination)?;

    let tree = FolderSynthesizer::new(source_prefix)
        .with_ignore(ignore.clone())
        .synthesize(&destination)?;
    let entries = tree.count();
    synth::splice_into_file(project_path, &[tree])?;

    info!(
        project = %project_path.display(),
        folder = %destination.display(),
        entries,
        "Folder added"
    );
    Ok(destination)
}
