use crate::processors::GeometryKind;
use crate::utils::SecondsScale;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "obstacle-processor")]
#[command(about = "Flight obstacle report and registry processing")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Suppress progress bars")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Configuration file (TOML)")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Print the result as JSON")]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Locate obstacles penetrating a visual surface segment
    Surface {
        #[arg(short, long, help = "Visual surface segment report")]
        input: Option<PathBuf>,

        #[arg(
            short,
            long,
            help = "Output CSV path [default: <output_dir>/VSS_Point_Coord_{YYYYMMDD_HHMM}.csv]"
        )]
        output: Option<PathBuf>,

        #[arg(long, help = "Lines to skip before the first table")]
        preamble_lines: Option<usize>,

        #[arg(long, help = "Seconds encoding: whole or tenths")]
        seconds_scale: Option<SecondsScale>,

        #[arg(long, help = "Identifier column of the penetration table (IDENT or ID)")]
        ident_column: Option<String>,
    },

    /// Measure how far relocated obstacles moved
    Relocation {
        #[arg(long, help = "Current obstacle table (CSV export)")]
        current: Option<PathBuf>,

        #[arg(long, help = "Previous obstacle table (CSV export)")]
        previous: Option<PathBuf>,

        #[arg(short, long, help = "Site code used in the title and file name")]
        site: Option<String>,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long, help = "Point geometry: planar, geographic or packed")]
        geometry: Option<GeometryKind>,
    },

    /// Collect significant obstacles to delete from the registry
    Significant {
        #[arg(short, long, help = "Directory searched for obstacle tables")]
        root: Option<PathBuf>,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long, help = "Minimum height above ground in metres")]
        min_height: Option<f64>,
    },

    /// List obstacles with an unclear procedure
    Unclear {
        #[arg(long, help = "Obstacle table (CSV export)")]
        obstacles: Option<PathBuf>,

        #[arg(long, help = "Registry table (CSV export)")]
        registry: Option<PathBuf>,

        #[arg(short, long)]
        site: Option<String>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert a packed DDMMSS[S] coordinate to decimal degrees
    Convert {
        packed: String,

        #[arg(long, default_value = "whole")]
        seconds_scale: SecondsScale,
    },
}
