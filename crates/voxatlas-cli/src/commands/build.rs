//! Build command implementation
//!
//! Compiles a material directory and mapping document into the four atlas
//! canvases and the palette table, then writes the five PNG artifacts.

use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use voxatlas_core::{
    compile, write_outputs, Compilation, CompileConfig, FlagBits, OutputPaths, PngConfig,
    VoxelFaceMapping, FACE_COUNT, FACE_NAMES,
};

/// Arguments of the build command.
pub struct BuildArgs {
    /// Directory of per-material subdirectories.
    pub materials: String,
    /// Path to the mapping document.
    pub mapping: String,
    /// Cell resolution in pixels.
    pub resolution: u32,
    /// Output directory for default artifact paths.
    pub out_dir: String,
    /// Upper bound on atlas pixel width.
    pub max_atlas_width: u32,
    /// Optional per-artifact path overrides.
    pub palette_out: Option<String>,
    pub color_out: Option<String>,
    pub emission_out: Option<String>,
    pub normal_out: Option<String>,
    pub rsma_out: Option<String>,
    /// Print the material table and populated palette rows.
    pub verbose: bool,
}

impl BuildArgs {
    fn output_paths(&self) -> OutputPaths {
        let mut paths = OutputPaths::in_dir(Path::new(&self.out_dir));
        let overrides = [
            (&self.palette_out, &mut paths.palette),
            (&self.color_out, &mut paths.color),
            (&self.emission_out, &mut paths.emission),
            (&self.normal_out, &mut paths.normal),
            (&self.rsma_out, &mut paths.rsma),
        ];
        for (over, path) in overrides {
            if let Some(over) = over {
                *path = PathBuf::from(over);
            }
        }
        paths
    }
}

/// Run the build command.
///
/// # Returns
/// Exit code: 0 on success (with or without per-material warnings), 1 on
/// any fatal error.
pub fn run(args: &BuildArgs) -> Result<ExitCode> {
    println!("{} {}", "Compiling materials:".cyan().bold(), args.materials);
    println!("{} {}", "Mapping:".cyan().bold(), args.mapping);
    println!("{} {}", "Resolution:".dimmed(), args.resolution);

    let mut config = CompileConfig::new(args.resolution);
    config.max_atlas_width = args.max_atlas_width;

    let mapping = match VoxelFaceMapping::from_path(Path::new(&args.mapping)) {
        Ok(mapping) => mapping,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            return Ok(ExitCode::FAILURE);
        }
    };

    let compilation = match compile(&config, &mapping, Path::new(&args.materials)) {
        Ok(compilation) => compilation,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            return Ok(ExitCode::FAILURE);
        }
    };

    println!(
        "{} {}x{}",
        "Slices:".dimmed(),
        compilation.layout.cols,
        compilation.layout.rows
    );

    for warning in &compilation.warnings {
        println!(
            "  {} {} (layer {}): {}",
            "!".yellow(),
            warning.name,
            warning.layer,
            warning.error
        );
    }

    if args.verbose {
        print_materials(&compilation, &config.flag_bits);
        print_palette(&compilation, &config.flag_bits);
    }

    let paths = args.output_paths();
    if let Err(err) = write_outputs(&compilation, &paths, &PngConfig::default()) {
        eprintln!("{} {}", "error:".red().bold(), err);
        return Ok(ExitCode::FAILURE);
    }

    for path in [
        &paths.palette,
        &paths.color,
        &paths.emission,
        &paths.normal,
        &paths.rsma,
    ] {
        println!("  {} {}", "Wrote".green(), path.display());
    }

    Ok(ExitCode::SUCCESS)
}

fn flag_names(flags: u8, bits: &FlagBits) -> String {
    let mut parts = Vec::new();
    if flags & bits.is_opaque != 0 {
        parts.push("IS_OPAQUE");
    }
    if flags & bits.has_color != 0 {
        parts.push("HAS_COLOR");
    }
    if flags & bits.has_emission != 0 {
        parts.push("HAS_EMISSION");
    }
    if flags & bits.has_normal != 0 {
        parts.push("HAS_NORMAL");
    }
    if flags & bits.has_rsma != 0 {
        parts.push("HAS_RSMA");
    }
    parts.join(" ")
}

fn print_materials(compilation: &Compilation, bits: &FlagBits) {
    println!("{}", "Materials:".cyan().bold());
    for (i, name) in compilation.layout.names.iter().enumerate() {
        match compilation.atlases.flags.get(name) {
            Some(&flags) => println!("{i:3}: {} ({})", name, flag_names(flags, bits).dimmed()),
            None => println!("{i:3}: {} ({})", name, "failed".red()),
        }
    }
}

fn print_palette(compilation: &Compilation, bits: &FlagBits) {
    println!("{}", "Palette (used items only):".cyan().bold());
    for voxel in 0..=255u8 {
        if !compilation.palette.row_in_use(voxel) {
            continue;
        }
        println!("Voxel value {voxel}:");
        for face in 0..FACE_COUNT {
            let (layer, flags) = compilation.palette.entry(voxel, face);
            let name = compilation
                .layout
                .names
                .get(layer as usize)
                .map(String::as_str)
                .unwrap_or("?");
            println!(
                "  Face {} ({}): layer {layer} {name} {}",
                face,
                FACE_NAMES[face],
                flag_names(flags, bits).dimmed()
            );
        }
    }
}
