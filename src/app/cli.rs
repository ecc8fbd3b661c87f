use crate::app::commands::Command;
use crate::config::CliConfig;
use clap::Parser;

/// Command line of the `depot` binary.
#[derive(Debug, Parser)]
#[command(name = "depot")]
#[command(about = "Track customers and parcels awaiting collection at a depot")]
pub struct Cli {
    #[command(flatten)]
    pub config: CliConfig,

    #[command(subcommand)]
    pub command: Command,
}
