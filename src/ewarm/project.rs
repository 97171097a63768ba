//! Retargeting a template project descriptor to another device.
//!
//! `template.ewp` is written for the reference device `STM32F407xx`. Rather
//! than parse the descriptor (device names appear inside option values,
//! include lists and group names alike), every reference-device string the
//! template is known to contain is replaced literally.

use std::path::Path;

use tracing::info;

use super::device::{Core, Device};
use super::substitute::Substitutions;
use super::EwarmResult;

/// Device define the template is written for.
pub const REFERENCE_DEFINE: &str = "STM32F407xx";

/// Family folder the template is written for.
pub const REFERENCE_FAMILY: &str = "STM32F4xx";

/// Core header the template includes.
pub const REFERENCE_CORE: &str = "core_cm4.h";

/// Base name the template uses for its build outputs.
pub const REFERENCE_OUTPUT: &str = "template";

const CMSIS_DEVICE_DIR: &str = r"$PROJ_DIR$\..\source\CMSIS\Device\ST\";
const CMSIS_INCLUDE_DIR: &str = r"$PROJ_DIR$\..\source\CMSIS\Include\";

/// Builds the substitution table that retargets `template.ewp` to `device`.
#[must_use]
pub fn retarget_table(device: &Device, core: Core, project_name: &str) -> Substitutions {
    let name = device.name();
    let family = device.family();
    let fam = device.family_lower();

    let old = format!("{CMSIS_DEVICE_DIR}{REFERENCE_FAMILY}");
    let new = format!("{CMSIS_DEVICE_DIR}{family}");

    Substitutions::new()
        .with(REFERENCE_DEFINE, device.define())
        .with(old.as_str(), new.as_str())
        .with(format!(r"{old}\Include"), format!(r"{new}\Include"))
        .with(
            format!(r"{old}\Include\stm32f407xx.h"),
            format!(r"{new}\Include\{name}.h"),
        )
        .with(
            format!(r"{old}\Include\stm32f4xx.h"),
            format!(r"{new}\Include\{fam}.h"),
        )
        .with(
            format!(r"{old}\Include\system_stm32f4xx.h"),
            format!(r"{new}\Include\system_{fam}.h"),
        )
        .with(
            format!(r"{old}\Source\system_stm32f4xx.c"),
            format!(r"{new}\Source\system_{fam}.c"),
        )
        .with(
            format!(r"{old}\Source\iar\startup_stm32f407xx.s"),
            format!(r"{new}\Source\iar\startup_{name}.s"),
        )
        .with(
            format!(r"{old}\Source\iar\linker\stm32f407xx_flash.icf"),
            format!(r"{new}\Source\iar\linker\{name}_flash.icf"),
        )
        .with(
            format!(r"{old}\Source\iar\linker\stm32f412rx_flash.icf"),
            format!(r"{new}\Source\iar\linker\{name}_flash.icf"),
        )
        .with(
            format!("<name>{REFERENCE_FAMILY}</name>"),
            format!("<name>{family}</name>"),
        )
        .with(
            format!("{CMSIS_INCLUDE_DIR}{REFERENCE_CORE}"),
            format!("{CMSIS_INCLUDE_DIR}{}", core.header()),
        )
        .with(
            format!("{REFERENCE_OUTPUT}.hex"),
            format!("{project_name}.hex"),
        )
        .with(
            format!("{REFERENCE_OUTPUT}.out"),
            format!("{project_name}.out"),
        )
}

/// Rewrites the project descriptor at `path` for `device`.
///
/// # Errors
///
/// Returns [`super::EwarmError::UnrecognizedCore`] if the device's series has
/// no known core, [`super::EwarmError::FileNotFound`] if `path` is missing, or
/// an I/O error if it cannot be rewritten.
pub fn retarget(path: &Path, device: &Device, project_name: &str) -> EwarmResult<()> {
    let core = device.core()?;
    retarget_table(device, core, project_name).apply_to_file(path)?;
    info!(
        project = %path.display(),
        device = %device,
        core = %core,
        "Project retargeted"
    );
    Ok(())
}
