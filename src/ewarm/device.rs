//! STM32F device identifiers and the names derived from them.
//!
//! A device is given the way ST names its CMSIS headers, for example
//! `stm32f407xx` (`CMSIS/Device/ST/STM32F4xx/Include/stm32f407xx.h`). The
//! identifier decides every per-device path the tool writes:
//!
//! | Derived value | Example | Used for |
//! |---|---|---|
//! | [`Device::name`] | `stm32f407xx` | device header, startup file, linker script |
//! | [`Device::family`] | `STM32F4xx` | CMSIS folder, descriptor group name |
//! | [`Device::family_lower`] | `stm32f4xx` | family and `system_` files |
//! | [`Device::define`] | `STM32F407xx` | preprocessor define |
//! | [`Device::core`] | `core_cm4.h` | Cortex-M core header |

use std::fmt;

use super::{EwarmError, EwarmResult};

/// Family prefix every supported identifier starts with (compared
/// case-insensitively).
pub const FAMILY_PREFIX: &str = "stm32f";

/// Shortest identifier that still names a series and a line, e.g. `stm32f0xx`.
const MIN_DEVICE_LEN: usize = 9;

/// Cortex-M core of an STM32F series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Core {
    /// Cortex-M0 (F0).
    Cm0,
    /// Cortex-M3 (F1, F2).
    Cm3,
    /// Cortex-M4 (F3, F4).
    Cm4,
    /// Cortex-M7 (F7).
    Cm7,
}

impl Core {
    /// Maps an STM32F series digit to its core.
    #[must_use]
    pub const fn from_series(series: char) -> Option<Self> {
        match series {
            '0' => Some(Self::Cm0),
            '1' | '2' => Some(Self::Cm3),
            '3' | '4' => Some(Self::Cm4),
            '7' => Some(Self::Cm7),
            _ => None,
        }
    }

    /// Returns the CMSIS core header name.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Cm0 => "core_cm0.h",
            Self::Cm3 => "core_cm3.h",
            Self::Cm4 => "core_cm4.h",
            Self::Cm7 => "core_cm7.h",
        }
    }
}

impl fmt::Display for Core {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// A validated STM32F device identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    /// Identifier as the user typed it, kept for diagnostics.
    raw: String,
    /// Lowercase identifier.
    name: String,
}

impl Device {
    /// Parses and validates a device identifier.
    ///
    /// # Errors
    ///
    /// - [`EwarmError::UndefinedDevice`] if `id` does not start with `stm32f`
    ///   (any case)
    /// - [`EwarmError::InvalidDevice`] if it is shorter than nine characters,
    ///   contains anything but ASCII letters and digits, or has no series digit
    pub fn parse(id: &str) -> EwarmResult<Self> {
        let name = id.to_ascii_lowercase();
        if !name.starts_with(FAMILY_PREFIX) {
            return Err(EwarmError::UndefinedDevice {
                device: id.to_string(),
            });
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(EwarmError::invalid_device(
                id,
                "only ASCII letters and digits are allowed",
            ));
        }
        if name.len() < MIN_DEVICE_LEN {
            return Err(EwarmError::invalid_device(
                id,
                format!("expected at least {MIN_DEVICE_LEN} characters, e.g. stm32f407xx"),
            ));
        }
        if !name.as_bytes()[FAMILY_PREFIX.len()].is_ascii_digit() {
            return Err(EwarmError::invalid_device(
                id,
                "missing series digit after \"stm32f\"",
            ));
        }

        Ok(Self {
            raw: id.to_string(),
            name,
        })
    }

    /// Lowercase identifier, e.g. `stm32f407xx`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Series digit, e.g. `'4'`.
    #[must_use]
    pub fn series(&self) -> char {
        // Validated ASCII digit at this position.
        char::from(self.name.as_bytes()[FAMILY_PREFIX.len()])
    }

    /// Family name, e.g. `STM32F4xx`.
    #[must_use]
    pub fn family(&self) -> String {
        format!("{}xx", self.name[..=FAMILY_PREFIX.len()].to_ascii_uppercase())
    }

    /// Lowercase family name, e.g. `stm32f4xx`.
    #[must_use]
    pub fn family_lower(&self) -> String {
        self.family().to_ascii_lowercase()
    }

    /// Preprocessor define, e.g. `STM32F407xx`: the first nine characters
    /// upper-cased, the package suffix lower-cased.
    #[must_use]
    pub fn define(&self) -> String {
        let (line, suffix) = self.name.split_at(MIN_DEVICE_LEN);
        format!("{}{suffix}", line.to_ascii_uppercase())
    }

    /// Resolves the Cortex-M core from the series digit.
    ///
    /// # Errors
    ///
    /// Returns [`EwarmError::UnrecognizedCore`] for series without a known
    /// core (5, 6, 8, 9).
    pub fn core(&self) -> EwarmResult<Core> {
        Core::from_series(self.series()).ok_or_else(|| EwarmError::UnrecognizedCore {
            device: self.raw.clone(),
        })
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
