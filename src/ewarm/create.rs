//! `create`: scaffold a new project from the templates and the CMSIS tree.

use std::path::{Path, PathBuf};

use tracing::info;

use super::device::Device;
use super::layout::{self, TemplateLayout, EWARM_DIR, SOURCE_DIR};
use super::substitute::replace_in_file;
use super::{project, workspace, EwarmError, EwarmResult};
use crate::fsutil;

/// Family header include in `template_main.c`.
pub const MAIN_INCLUDE: &str = "#include \"stm32f4xx.h\"";

/// Paths of a freshly created project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedProject {
    /// Project root folder.
    pub root: PathBuf,
    /// The `.ewp` descriptor.
    pub project: PathBuf,
    /// The `.eww` descriptor.
    pub workspace: PathBuf,
    /// The generated `main.c`.
    pub main: PathBuf,
}

/// Creates `<parent>/<name>` for `device` from the templates in `layout`.
///
/// The device, its core and the template folders are all checked before
/// anything is written. Later failures leave the partially created project
/// in place.
///
/// # Errors
///
/// - [`EwarmError::InvalidName`] if `name` is not a plain file name
/// - [`EwarmError::AlreadyExists`] if the project folder exists
/// - [`EwarmError::UndefinedDevice`], [`EwarmError::InvalidDevice`] or
///   [`EwarmError::UnrecognizedCore`] for unusable devices
/// - [`EwarmError::FolderNotFound`] if the template or CMSIS folder is missing
/// - [`EwarmError::FileNotFound`] if a template or vendor file is missing
/// - I/O errors from copying and rewriting
pub fn create(
    layout: &TemplateLayout,
    parent: &Path,
    name: &str,
    device: &str,
) -> EwarmResult<CreatedProject> {
    workspace::validate_name(name)?;
    let root = parent.join(name);
    if root.exists() {
        return Err(EwarmError::already_exists(root));
    }

    let device = Device::parse(device)?;
    let core = device.core()?;

    if !layout.template_dir().is_dir() {
        return Err(EwarmError::folder_not_found(layout.template_dir()));
    }
    if !layout.cmsis_dir().is_dir() {
        return Err(EwarmError::folder_not_found(layout.cmsis_dir()));
    }

    let (project_path, workspace_path) = copy_descriptors(layout, &root, name)?;
    copy_cmsis(layout, &root, &device)?;
    project::retarget(&project_path, &device, name)?;
    let main = write_main(layout, &root, &device)?;

    info!(
        project = name,
        device = %device,
        core = %core,
        root = %root.display(),
        "Project created"
    );
    Ok(CreatedProject {
        root,
        project: project_path,
        workspace: workspace_path,
        main,
    })
}

/// Copies the template descriptors into `EWARM/` and renames them to `name`.
fn copy_descriptors(
    layout: &TemplateLayout,
    root: &Path,
    name: &str,
) -> EwarmResult<(PathBuf, PathBuf)> {
    let ewarm = root.join(EWARM_DIR);
    fsutil::make_dir(&ewarm)?;

    let workspace_copy = fsutil::copy_file_into(&layout.workspace_template(), &ewarm)?;
    let project_copy = fsutil::copy_file_into(&layout.project_template(), &ewarm)?;

    workspace::rename(&project_copy, &workspace_copy, name)
}

/// Copies the CMSIS core headers and the device's vendor files.
fn copy_cmsis(layout: &TemplateLayout, root: &Path, device: &Device) -> EwarmResult<()> {
    let cmsis = root.join(SOURCE_DIR).join("CMSIS");
    fsutil::copy_tree(&layout.cmsis_include_dir(), &cmsis.join("Include"))?;

    for folder in layout::cmsis_skeleton(device) {
        fsutil::make_dir(&cmsis.join(folder))?;
    }
    for file in layout.device_files(device) {
        let dest = cmsis.join(&file.dest_dir);
        fsutil::make_dir(&dest)?;
        fsutil::copy_file_into(&file.source, &dest)?;
    }
    Ok(())
}

/// Creates the user folders and `main.c` with the family header include.
fn write_main(layout: &TemplateLayout, root: &Path, device: &Device) -> EwarmResult<PathBuf> {
    let user = root.join(SOURCE_DIR).join("user");
    fsutil::make_dir(&user.join("inc"))?;
    fsutil::make_dir(&user.join("src"))?;

    let main = user.join("main.c");
    fsutil::copy_file(&layout.main_template(), &main)?;
    replace_in_file(
        &main,
        MAIN_INCLUDE,
        &format!("#include \"{}.h\"", device.family_lower()),
    )?;
    Ok(main)
}
