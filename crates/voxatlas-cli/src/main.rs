//! voxatlas CLI - Voxel material atlas and palette compiler
//!
//! This binary compiles a directory of per-material texture sets and a
//! voxel→material mapping document into four packed atlases and a palette
//! lookup table.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process::ExitCode;

mod commands;

use commands::build::BuildArgs;

/// voxatlas - Voxel Material Atlas Compiler
#[derive(Parser)]
#[command(name = "voxatlas")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a material directory and mapping into atlases and a palette
    Build {
        /// Directory of per-material texture subdirectories
        #[arg(short, long)]
        materials: String,

        /// Path to the voxel→material mapping document (JSON)
        #[arg(short = 'p', long)]
        mapping: String,

        /// Cell resolution in pixels (each material occupies one cell)
        #[arg(short, long)]
        resolution: u32,

        /// Output directory for the five artifacts
        #[arg(short, long, default_value = ".")]
        out_dir: String,

        /// Upper bound on atlas pixel width
        #[arg(long, default_value_t = 4096)]
        max_atlas_width: u32,

        /// Override the palette table output path
        #[arg(long)]
        palette_out: Option<String>,

        /// Override the color atlas output path
        #[arg(long)]
        color_out: Option<String>,

        /// Override the emission atlas output path
        #[arg(long)]
        emission_out: Option<String>,

        /// Override the normal atlas output path
        #[arg(long)]
        normal_out: Option<String>,

        /// Override the RSMA atlas output path
        #[arg(long)]
        rsma_out: Option<String>,

        /// Print the material table and populated palette rows
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            materials,
            mapping,
            resolution,
            out_dir,
            max_atlas_width,
            palette_out,
            color_out,
            emission_out,
            normal_out,
            rsma_out,
            verbose,
        } => commands::build::run(&BuildArgs {
            materials,
            mapping,
            resolution,
            out_dir,
            max_atlas_width,
            palette_out,
            color_out,
            emission_out,
            normal_out,
            rsma_out,
            verbose,
        }),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
