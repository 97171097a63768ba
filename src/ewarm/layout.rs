//! Where templates and vendor files come from, and where they land.
//!
//! The tool expects two trees beside it (or wherever the configuration
//! points):
//!
//! ```text
//! template/
//!   template.eww
//!   template.ewp
//!   template_main.c
//! CMSIS/
//!   Include/                         core headers, copied whole
//!   Device/ST/STM32F4xx/
//!     Include/stm32f4xx.h, stm32f407xx.h, system_stm32f4xx.h
//!     Source/Templates/system_stm32f4xx.c
//!     Source/Templates/iar/startup_stm32f407xx.s
//!     Source/Templates/iar/linker/stm32f407xx_flash.icf
//! ```
//!
//! A generated project mirrors the device part under `source/CMSIS/`.

use std::path::{Path, PathBuf};

use super::device::Device;

/// Folder holding the descriptors inside a project.
pub const EWARM_DIR: &str = "EWARM";

/// Folder holding all sources inside a project.
pub const SOURCE_DIR: &str = "source";

/// Name of the template workspace descriptor.
pub const WORKSPACE_TEMPLATE: &str = "template.eww";

/// Name of the template project descriptor.
pub const PROJECT_TEMPLATE: &str = "template.ewp";

/// Name of the template `main.c`.
pub const MAIN_TEMPLATE: &str = "template_main.c";

/// One vendor file to copy into a new project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceFile {
    /// Absolute or working-directory-relative source path.
    pub source: PathBuf,
    /// Destination folder relative to the project's `source/CMSIS/`.
    pub dest_dir: PathBuf,
}

/// Locations of the template and CMSIS trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLayout {
    template_dir: PathBuf,
    cmsis_dir: PathBuf,
}

impl TemplateLayout {
    /// Creates a layout rooted at the given folders.
    pub fn new(template_dir: impl Into<PathBuf>, cmsis_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: template_dir.into(),
            cmsis_dir: cmsis_dir.into(),
        }
    }

    /// The template folder.
    #[must_use]
    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    /// The CMSIS folder.
    #[must_use]
    pub fn cmsis_dir(&self) -> &Path {
        &self.cmsis_dir
    }

    /// Path of `template.eww`.
    #[must_use]
    pub fn workspace_template(&self) -> PathBuf {
        self.template_dir.join(WORKSPACE_TEMPLATE)
    }

    /// Path of `template.ewp`.
    #[must_use]
    pub fn project_template(&self) -> PathBuf {
        self.template_dir.join(PROJECT_TEMPLATE)
    }

    /// Path of `template_main.c`.
    #[must_use]
    pub fn main_template(&self) -> PathBuf {
        self.template_dir.join(MAIN_TEMPLATE)
    }

    /// The CMSIS core header folder, copied whole into every project.
    #[must_use]
    pub fn cmsis_include_dir(&self) -> PathBuf {
        self.cmsis_dir.join("Include")
    }

    /// The vendor files a project for `device` needs, in copy order.
    #[must_use]
    pub fn device_files(&self, device: &Device) -> Vec<DeviceFile> {
        let fam = device.family_lower();
        let name = device.name();

        let vendor = self.cmsis_dir.join(device_family_dir(device));
        let templates = vendor.join("Source").join("Templates");
        let dest = device_family_dir(device);

        vec![
            DeviceFile {
                source: vendor.join("Include").join(format!("{fam}.h")),
                dest_dir: dest.join("Include"),
            },
            DeviceFile {
                source: vendor.join("Include").join(format!("{name}.h")),
                dest_dir: dest.join("Include"),
            },
            DeviceFile {
                source: vendor.join("Include").join(format!("system_{fam}.h")),
                dest_dir: dest.join("Include"),
            },
            DeviceFile {
                source: templates.join(format!("system_{fam}.c")),
                dest_dir: dest.join("Source"),
            },
            DeviceFile {
                source: templates.join("iar").join(format!("startup_{name}.s")),
                dest_dir: dest.join("Source").join("iar"),
            },
            DeviceFile {
                source: templates
                    .join("iar")
                    .join("linker")
                    .join(format!("{name}_flash.icf")),
                dest_dir: dest.join("Source").join("iar").join("linker"),
            },
        ]
    }
}

impl Default for TemplateLayout {
    fn default() -> Self {
        Self::new("template", "CMSIS")
    }
}

/// `Device/ST/<FAMILY>`, relative to a CMSIS root.
#[must_use]
pub fn device_family_dir(device: &Device) -> PathBuf {
    Path::new("Device").join("ST").join(device.family())
}

/// Folders created empty in every new project's `source/CMSIS/`.
#[must_use]
pub fn cmsis_skeleton(device: &Device) -> Vec<PathBuf> {
    let family = device_family_dir(device);
    vec![
        Path::new("Lib").join("ARM"),
        family.join("Include"),
        family.join("Source").join("iar").join("linker"),
    ]
}
