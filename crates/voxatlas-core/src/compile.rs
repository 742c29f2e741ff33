//! The batch compilation entry point.
//!
//! `compile` runs the whole pipeline in memory — layout, material builds,
//! atlas packing, palette fill, opacity validation — and `write_outputs`
//! serializes the five artifacts. The split keeps the compilation result
//! inspectable and testable without touching disk.

use std::path::{Path, PathBuf};

use crate::atlas::{pack_atlases, AtlasLayout, AtlasSet, MaterialWarning};
use crate::config::CompileConfig;
use crate::error::{CompileError, CompileResult};
use crate::mapping::VoxelFaceMapping;
use crate::palette::{validate_opacity, PaletteTable};
use crate::png::{write_texture, PngConfig};
use crate::texture::Texture;

/// Everything one compilation run produces.
#[derive(Debug)]
pub struct Compilation {
    /// The layer/grid assignment.
    pub layout: AtlasLayout,
    /// The four packed canvases and lookup maps.
    pub atlases: AtlasSet,
    /// The finished, validated palette table.
    pub palette: PaletteTable,
    /// Per-material failures that did not abort the batch.
    pub warnings: Vec<MaterialWarning>,
}

/// Compile one material directory and mapping into atlases and a palette.
pub fn compile(
    config: &CompileConfig,
    mapping: &VoxelFaceMapping,
    materials_dir: &Path,
) -> CompileResult<Compilation> {
    config.validate()?;

    if !materials_dir.is_dir() {
        return Err(CompileError::MaterialsDirNotFound {
            path: materials_dir.to_path_buf(),
        });
    }

    let layout = AtlasLayout::assign(
        mapping.referenced_names(),
        config.resolution,
        config.max_atlas_width,
    )?;

    let (atlases, warnings) = pack_atlases(&layout, materials_dir, config);
    if warnings.len() == layout.names.len() {
        return Err(CompileError::NoMaterialsLoaded);
    }

    let palette = PaletteTable::fill(mapping, &atlases.layers, &atlases.flags)?;
    validate_opacity(&palette, config.flag_bits.is_opaque)?;

    Ok(Compilation {
        layout,
        atlases,
        palette,
        warnings,
    })
}

/// Destination paths of the five artifacts.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    /// The 6×256 palette table image.
    pub palette: PathBuf,
    /// Color atlas, RGBA.
    pub color: PathBuf,
    /// Emission atlas, RGB.
    pub emission: PathBuf,
    /// Normal atlas, RGB.
    pub normal: PathBuf,
    /// RSMA atlas, RGBA.
    pub rsma: PathBuf,
}

impl OutputPaths {
    /// The default artifact names under one output directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            palette: dir.join("Palette.png"),
            color: dir.join("Color.png"),
            emission: dir.join("Emission.png"),
            normal: dir.join("Normal.png"),
            rsma: dir.join("RSMA.png"),
        }
    }
}

/// Serialize a finished compilation to its five PNG artifacts.
pub fn write_outputs(
    compilation: &Compilation,
    paths: &OutputPaths,
    png: &PngConfig,
) -> CompileResult<()> {
    let write = |texture: &Texture, path: &Path| -> CompileResult<()> {
        write_texture(texture, path, png).map_err(|source| CompileError::Write {
            path: path.to_path_buf(),
            source,
        })
    };

    write(&compilation.palette.to_texture(), &paths.palette)?;
    write(&compilation.atlases.color, &paths.color)?;
    write(&compilation.atlases.emission, &paths.emission)?;
    write(&compilation.atlases.normal, &paths.normal)?;
    write(&compilation.atlases.rsma, &paths.rsma)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn mapping(doc: &str) -> VoxelFaceMapping {
        serde_json::from_str(doc).unwrap()
    }

    #[test]
    fn missing_materials_dir_is_fatal() {
        let config = CompileConfig::new(4);
        let err = compile(
            &config,
            &mapping(r#"{"materials": {"1": ["stone"]}}"#),
            Path::new("/nonexistent/materials"),
        )
        .unwrap_err();
        assert!(matches!(err, CompileError::MaterialsDirNotFound { .. }));
    }

    #[test]
    fn mapping_without_materials_is_fatal() {
        let root = TempDir::new().unwrap();
        let config = CompileConfig::new(4);
        let err = compile(&config, &mapping(r#"{"materials": {}}"#), root.path()).unwrap_err();
        assert!(matches!(err, CompileError::EmptyMapping));
    }

    #[test]
    fn all_materials_failing_is_fatal() {
        let root = TempDir::new().unwrap();
        let config = CompileConfig::new(4);
        let err = compile(
            &config,
            &mapping(r#"{"materials": {"1": ["ghost"], "2": ["phantom"]}}"#),
            root.path(),
        )
        .unwrap_err();
        assert!(matches!(err, CompileError::NoMaterialsLoaded));
    }

    #[test]
    fn output_paths_use_the_canonical_artifact_names() {
        let paths = OutputPaths::in_dir(Path::new("out"));
        assert_eq!(paths.palette, Path::new("out/Palette.png"));
        assert_eq!(paths.rsma, Path::new("out/RSMA.png"));
    }
}
