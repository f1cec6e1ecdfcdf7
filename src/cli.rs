use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use nspace_voxel::EditorMode;

#[derive(Parser, Debug)]
#[command(name = "nspace", version, about = "Voxel level editor core: check, mesh and play levels")]
pub struct Cli {
    /// Editor configuration (TOML). Missing file means defaults.
    #[arg(long, default_value = "nspace.toml")]
    pub config: PathBuf,
    /// Also write the log to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a level and report what it contains.
    Check { level: PathBuf },
    /// Build every voxel mesh and report totals.
    Mesh {
        level: PathBuf,
        /// Overrides the configured mode.
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
    },
    /// Run a play session for a number of ticks.
    Play {
        level: PathBuf,
        #[arg(long, default_value_t = 60)]
        ticks: u32,
    },
    /// Re-check and re-mesh whenever the level file changes.
    Watch { level: PathBuf },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    Edit,
    Play,
}

impl From<ModeArg> for EditorMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Edit => EditorMode::Edit,
            ModeArg::Play => EditorMode::Play,
        }
    }
}
