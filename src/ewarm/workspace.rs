//! Renaming descriptors and cleaning the workspace folder.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::substitute::replace_in_file;
use super::{DescriptorKind, EwarmError, EwarmResult};
use crate::fsutil;

/// Prefix EWARM puts in front of project paths inside a workspace.
pub const WS_DIR_MARKER: &str = r"$WS_DIR$\";

/// Validates a project or workspace name for use as a file name.
///
/// # Errors
///
/// Returns [`EwarmError::InvalidName`] for empty names, `.`/`..`, and names
/// containing `/` or `\`.
pub fn validate_name(name: &str) -> EwarmResult<()> {
    if name.is_empty() {
        return Err(EwarmError::invalid_name(name, "name must not be empty"));
    }
    if name.contains(['/', '\\']) {
        return Err(EwarmError::invalid_name(
            name,
            "name must not contain path separators",
        ));
    }
    if name == "." || name == ".." {
        return Err(EwarmError::invalid_name(name, "name must be a file name"));
    }
    Ok(())
}

/// Renames the workspace descriptor to `<name>.eww` in the same folder.
///
/// Returns the new path.
///
/// # Errors
///
/// Returns an error if the workspace is missing or not an `.eww`, the name
/// is invalid, the target exists, or the rename fails.
pub fn rename_workspace(workspace: &Path, name: &str) -> EwarmResult<PathBuf> {
    DescriptorKind::Workspace.check(workspace)?;
    validate_name(name)?;

    let renamed = DescriptorKind::Workspace.sibling(workspace, name);
    fsutil::rename(workspace, &renamed)?;
    info!(from = %workspace.display(), to = %renamed.display(), "Workspace renamed");
    Ok(renamed)
}

/// Renames the project descriptor to `<name>.ewp` and updates the
/// `$WS_DIR$\<file>` reference inside `workspace`.
///
/// Returns the new project path.
///
/// # Errors
///
/// Returns an error if either descriptor is missing or has the wrong
/// extension (project checked first), the name is invalid, the target
/// exists, or a file operation fails.
pub fn rename_project(project: &Path, workspace: &Path, name: &str) -> EwarmResult<PathBuf> {
    if !project.is_file() {
        return Err(EwarmError::file_not_found(project));
    }
    if !workspace.is_file() {
        return Err(EwarmError::file_not_found(workspace));
    }
    DescriptorKind::Project.check(project)?;
    DescriptorKind::Workspace.check(workspace)?;
    validate_name(name)?;

    let old_file = project
        .file_name()
        .ok_or_else(|| EwarmError::file_not_found(project))?
        .to_string_lossy()
        .into_owned();
    let renamed = DescriptorKind::Project.sibling(project, name);
    fsutil::rename(project, &renamed)?;

    replace_in_file(
        workspace,
        &format!("{WS_DIR_MARKER}{old_file}"),
        &format!("{WS_DIR_MARKER}{name}.{}", DescriptorKind::Project.extension()),
    )?;

    info!(
        from = %project.display(),
        to = %renamed.display(),
        workspace = %workspace.display(),
        "Project renamed"
    );
    Ok(renamed)
}

/// Renames the project, then the workspace, to `name`.
///
/// Returns the new `(project, workspace)` paths.
///
/// # Errors
///
/// See [`rename_project`] and [`rename_workspace`].
pub fn rename(project: &Path, workspace: &Path, name: &str) -> EwarmResult<(PathBuf, PathBuf)> {
    let project = rename_project(project, workspace, name)?;
    let workspace = rename_workspace(workspace, name)?;
    Ok((project, workspace))
}

/// Deletes everything next to the workspace descriptor except `.eww` and
/// `.ewp` files. Folders are removed whatever their name.
///
/// Returns the number of removed entries.
///
/// # Errors
///
/// Returns an error if the workspace is missing or not an `.eww`, or on the
/// first entry that cannot be deleted.
pub fn clean(workspace: &Path) -> EwarmResult<usize> {
    DescriptorKind::Workspace.check(workspace)?;
    let folder = fsutil::parent_dir(workspace);

    let mut removed = 0;
    for entry in fsutil::sorted_entries(&folder)? {
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| EwarmError::io("delete", &path, e))?;

        if file_type.is_dir() {
            fs::remove_dir_all(&path).map_err(|e| EwarmError::io("delete", &path, e))?;
        } else if DescriptorKind::is_descriptor(&entry.file_name().to_string_lossy()) {
            continue;
        } else {
            fs::remove_file(&path).map_err(|e| EwarmError::io("delete", &path, e))?;
        }
        debug!(path = %path.display(), "Removed");
        removed += 1;
    }

    info!(folder = %folder.display(), removed, "Workspace folder cleaned");
    Ok(removed)
}
