use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "trackforge")]
#[command(
    author,
    version,
    about = "Repackage Matroska files with curated tracks and a canonical name"
)]
pub struct Cli {
    /// Input file, or a glob pattern such as "/media/Show*.mkv"
    pub input: String,

    /// Path to config file (defaults to $TRACKFORGE_CONFIG or the standard locations)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
