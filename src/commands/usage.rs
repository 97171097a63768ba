//! Usage texts printed for `-h`, missing parameters and unknown commands.

/// Top-level usage.
pub const MAIN: &str = "\
IPM - IAR Embedded Workbench project manager for STM32F (Cortex-M0/M3/M4/M7).

  - create a new project with the standard ST CMSIS files
  - add a folder structure to an existing project
  - clean the EWARM workspace folder
  - rename an existing workspace and project

usage: ipm [--config <file>] [-v...] [-q] <command> <args> [-h | --help]

commands:
    create              Create new project
    add_folder          Copy folder to project and add it to the project file
    clean               Clean workspace folder
    rename_workspace    Rename workspace
    rename_project      Rename project
    rename              Rename both workspace and project

For details use: ipm <command> -h
";

/// `create` usage.
pub const CREATE: &str = "\
Create a new IAR EWARM project with the given name and device.

usage: ipm create <name> <device> [-h | --help]

parameters:
  -n, --name <name>      New project name
  -d, --device <device>  New project device

The device is named as in \"CMSIS/Device/ST/STM32Fxxx/Include/stm32fxxx.h\",
e.g. stm32f407xx. The \"template\" and \"CMSIS\" folders are looked up in the
working directory unless the configuration file points elsewhere.
";

/// `add_folder` usage.
pub const ADD_FOLDER: &str = "\
Copy a folder to the project source directory and add it to the project file.

usage: ipm add_folder <project_path> <folder_path> [ignore] [-h | --help]

parameters:
  -p, --project_path <path>     Project path (*.ewp)
  -f, --folder_path <path>      Folder path
  -i, --ignore <ignore>         File endings to leave out of the project

Ignored endings are separated with \"/\", for example \"-i o/obj/\".
";

/// `clean` usage.
pub const CLEAN: &str = "\
Clean the workspace folder: delete all files and folders except *.eww and *.ewp.

usage: ipm clean <workspace_path> [-h | --help]

parameters:
  -w, --workspace_path <path>   Workspace path (*.eww)
";

/// `rename_workspace` usage.
pub const RENAME_WORKSPACE: &str = "\
Rename a workspace.

usage: ipm rename_workspace <workspace_path> <name> [-h | --help]

parameters:
  -w, --workspace_path <path>   Workspace path (*.eww)
  -n, --name <name>             New workspace name
";

/// `rename_project` usage.
pub const RENAME_PROJECT: &str = "\
Rename a project and update its reference in the workspace.

usage: ipm rename_project <project_path> <workspace_path> <name> [-h | --help]

parameters:
  -p, --project_path <path>     Project path (*.ewp)
  -w, --workspace_path <path>   Workspace containing the project (*.eww)
  -n, --name <name>             New project name
";

/// `rename` usage.
pub const RENAME: &str = "\
Rename both a project and its workspace.

usage: ipm rename <project_path> <workspace_path> <name> [-h | --help]

parameters:
  -p, --project_path <path>     Project path (*.ewp)
  -w, --workspace_path <path>   Workspace containing the project (*.eww)
  -n, --name <name>             New project and workspace name
";
