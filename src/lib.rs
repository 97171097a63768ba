//! ipm: IAR Embedded Workbench project manager for STM32F microcontrollers
//!
//! This library creates and maintains IAR EWARM project (`.ewp`) and
//! workspace (`.eww`) descriptors:
//!
//! - **create**: new project from templates plus the device's CMSIS files
//! - **add_folder**: copy a folder into the project and mirror it as
//!   `<group>`/`<file>` nodes in the descriptor
//! - **clean**: remove build output next to the workspace
//! - **rename**: rename project and workspace, keeping references intact
//!
//! # Modules
//!
//! - [`commands`]: Command dispatch and usage texts
//! - [`config`]: Configuration loading and validation
//! - [`error`]: Configuration error types
//! - [`ewarm`]: Descriptor handling and the operations themselves
//! - [`fsutil`]: File copy, rename and codepage-preserving text I/O

pub mod commands;
pub mod config;
pub mod error;
pub mod ewarm;
pub mod fsutil;
