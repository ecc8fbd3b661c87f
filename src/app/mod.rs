// Application layer: the command front end used by the `depot` binary.

pub mod cli;
pub mod commands;
pub mod shell;

pub use cli::Cli;
pub use commands::{execute, parse_shell_line, Command};
pub use shell::run_shell;
