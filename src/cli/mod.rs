pub mod commands;
mod core;
mod help;
pub mod output;
mod registry;
mod shell;
mod shell_context;

pub use self::core::CommandError;
pub use shell::{run_cli, SCRIPT_ENV};
pub use shell_context::{CliMode, ShellContext};
