//! ipm: IAR Embedded Workbench project manager
//!
//! Command-line front end. Parses arguments, loads the configuration, runs
//! one command and turns its outcome into an exit status: 0 on success, 1
//! after printing a usage text or a one-line diagnostic on stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

use ipm::commands::{self, usage, Command, Verb};
use ipm::config;

/// IAR Embedded Workbench project manager for STM32F devices.
#[derive(Parser, Debug)]
#[command(name = "ipm")]
#[command(author, version, about, long_about = None)]
#[command(disable_help_flag = true, disable_help_subcommand = true)]
struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,

    /// Print usage
    #[arg(short, long)]
    help: bool,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Create new project
    #[command(name = "create", disable_help_flag = true)]
    Create(CreateArgs),

    /// Copy folder to project and add it to the project file
    #[command(name = "add_folder", disable_help_flag = true)]
    AddFolder(AddFolderArgs),

    /// Clean workspace folder
    #[command(name = "clean", disable_help_flag = true)]
    Clean(CleanArgs),

    /// Rename workspace
    #[command(name = "rename_workspace", disable_help_flag = true)]
    RenameWorkspace(RenameWorkspaceArgs),

    /// Rename project
    #[command(name = "rename_project", disable_help_flag = true)]
    RenameProject(RenameArgs),

    /// Rename both workspace and project
    #[command(name = "rename", disable_help_flag = true)]
    Rename(RenameArgs),
}

#[derive(clap::Args, Debug)]
struct CreateArgs {
    /// New project name
    #[arg(short, long)]
    name: Option<String>,

    /// New project device
    #[arg(short, long)]
    device: Option<String>,

    /// Print usage
    #[arg(short, long)]
    help: bool,

    /// Positional form: <name> <device>
    #[arg(value_name = "ARGS")]
    args: Vec<String>,
}

#[derive(clap::Args, Debug)]
struct AddFolderArgs {
    /// Project path
    #[arg(short, long = "project_path")]
    project_path: Option<String>,

    /// Folder path
    #[arg(short, long = "folder_path")]
    folder_path: Option<String>,

    /// Ignored file endings, separated with "/"
    #[arg(short, long)]
    ignore: Option<String>,

    /// Print usage
    #[arg(short, long)]
    help: bool,

    /// Positional form: <project_path> <folder_path> [ignore]
    #[arg(value_name = "ARGS")]
    args: Vec<String>,
}

#[derive(clap::Args, Debug)]
struct CleanArgs {
    /// Workspace path
    #[arg(short, long = "workspace_path")]
    workspace_path: Option<String>,

    /// Print usage
    #[arg(short, long)]
    help: bool,

    /// Positional form: <workspace_path>
    #[arg(value_name = "ARGS")]
    args: Vec<String>,
}

#[derive(clap::Args, Debug)]
struct RenameWorkspaceArgs {
    /// Workspace path
    #[arg(short, long = "workspace_path")]
    workspace_path: Option<String>,

    /// New workspace name
    #[arg(short, long)]
    name: Option<String>,

    /// Print usage
    #[arg(short, long)]
    help: bool,

    /// Positional form: <workspace_path> <name>
    #[arg(value_name = "ARGS")]
    args: Vec<String>,
}

#[derive(clap::Args, Debug)]
struct RenameArgs {
    /// Project path
    #[arg(short, long = "project_path")]
    project_path: Option<String>,

    /// Workspace path
    #[arg(short, long = "workspace_path")]
    workspace_path: Option<String>,

    /// New name
    #[arg(short, long)]
    name: Option<String>,

    /// Print usage
    #[arg(short, long)]
    help: bool,

    /// Positional form: <project_path> <workspace_path> <name>
    #[arg(value_name = "ARGS")]
    args: Vec<String>,
}

/// Fills the parameters not given as flags from the positional arguments,
/// in order. Returns `None` if positional arguments are left over.
fn merge<const N: usize>(
    flags: [Option<String>; N],
    positional: Vec<String>,
) -> Option<[Option<String>; N]> {
    let mut rest = positional.into_iter();
    let merged = flags.map(|flag| flag.or_else(|| rest.next()));
    rest.next().is_none().then_some(merged)
}

impl CliCommand {
    /// Turns parsed arguments into a [`Command`], or the verb whose usage
    /// should be shown instead.
    fn resolve(self) -> Result<Command, Verb> {
        match self {
            Self::Create(a) => match merge([a.name, a.device], a.args) {
                Some([Some(name), Some(device)]) if !a.help => Ok(Command::Create { name, device }),
                _ => Err(Verb::Create),
            },
            Self::AddFolder(a) => {
                match merge([a.project_path, a.folder_path, a.ignore], a.args) {
                    Some([Some(project), Some(folder), ignore]) if !a.help => {
                        Ok(Command::AddFolder {
                            project: project.into(),
                            folder: folder.into(),
                            ignore,
                        })
                    }
                    _ => Err(Verb::AddFolder),
                }
            }
            Self::Clean(a) => match merge([a.workspace_path], a.args) {
                Some([Some(workspace)]) if !a.help => Ok(Command::Clean {
                    workspace: workspace.into(),
                }),
                _ => Err(Verb::Clean),
            },
            Self::RenameWorkspace(a) => match merge([a.workspace_path, a.name], a.args) {
                Some([Some(workspace), Some(name)]) if !a.help => Ok(Command::RenameWorkspace {
                    workspace: workspace.into(),
                    name,
                }),
                _ => Err(Verb::RenameWorkspace),
            },
            Self::RenameProject(a) => match a.into_paths() {
                Some((project, workspace, name)) => Ok(Command::RenameProject {
                    project,
                    workspace,
                    name,
                }),
                None => Err(Verb::RenameProject),
            },
            Self::Rename(a) => match a.into_paths() {
                Some((project, workspace, name)) => Ok(Command::Rename {
                    project,
                    workspace,
                    name,
                }),
                None => Err(Verb::Rename),
            },
        }
    }
}

impl RenameArgs {
    fn into_paths(self) -> Option<(PathBuf, PathBuf, String)> {
        if self.help {
            return None;
        }
        match merge([self.project_path, self.workspace_path, self.name], self.args)? {
            [Some(project), Some(workspace), Some(name)] => {
                Some((project.into(), workspace.into(), name))
            }
            _ => None,
        }
    }
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Renders an error and its sources on one line.
fn one_line(error: &dyn std::error::Error) -> String {
    let mut line = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        line.push_str(": ");
        line.push_str(&cause.to_string());
        source = cause.source();
    }
    line
}

/// Entry point for the ipm command-line tool.
fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::DisplayVersion => {
            print!("{e}");
            return ExitCode::SUCCESS;
        }
        Err(_) => {
            print!("{}", usage::MAIN);
            return ExitCode::FAILURE;
        }
    };

    let Some(cli_command) = cli.command.filter(|_| !cli.help) else {
        print!("{}", usage::MAIN);
        return ExitCode::FAILURE;
    };
    let command = match cli_command.resolve() {
        Ok(command) => command,
        Err(verb) => {
            print!("{}", verb.usage());
            return ExitCode::FAILURE;
        }
    };

    let cfg = match config::load_config(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            println!("Configuration error: {}", one_line(&e));
            return ExitCode::FAILURE;
        }
    };

    init_tracing(get_log_level(cli.verbose, cli.quiet, &cfg.logging.level));

    info!(
        version = env!("CARGO_PKG_VERSION"),
        command = command.verb().name(),
        "Starting ipm"
    );

    match commands::run(&command, &cfg) {
        Ok(()) => {
            debug!("Command finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!(error = ?e, "Command failed");
            println!("{e}");
            ExitCode::FAILURE
        }
    }
}
