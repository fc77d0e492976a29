use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "servicemaker")]
#[command(version, about = "Install this program as a systemd service")]
pub struct Args {
    #[command(subcommand)]
    pub sub: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Provision the user, stage files, write and enable the unit (requires root)
    Install {
        /// Path to the TOML install spec
        #[arg(long, short = 's')]
        spec: PathBuf,

        /// Don't seed config.json even if none exists
        #[arg(long)]
        skip_config: bool,
    },
    /// Print the unit file the install spec would produce
    RenderUnit {
        /// Path to the TOML install spec
        #[arg(long, short = 's')]
        spec: PathBuf,
    },
    /// Print a sample install spec
    ExampleSpec,
}
