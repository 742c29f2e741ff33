//! Material assembly.
//!
//! A material is the PBR texture set for a single voxel face: color,
//! emission, normal+height, and RSMA. Textures a material does not provide
//! keep their default fill and are flagged absent, so the renderer can
//! skip sampling them.

use std::fs;
use std::path::{Path, PathBuf};

use crate::channel::{load_channel, MapKind};
use crate::config::{CompileConfig, FlagBits};
use crate::error::MaterialError;
use crate::texture::Texture;

/// One built material: four textures plus presence and opacity flags.
#[derive(Debug, Clone)]
pub struct Material {
    /// Base color, RGBA.
    pub color: Texture,
    /// Emission (RGB meaningful, alpha unused).
    pub emission: Texture,
    /// Normal in RG, height in B.
    pub normal: Texture,
    /// Roughness/specular/metallic/ambient-occlusion.
    pub rsma: Texture,
    /// At least one source contributed to the color texture.
    pub has_color: bool,
    /// At least one source contributed to the emission texture.
    pub has_emission: bool,
    /// At least one source contributed to the normal texture.
    pub has_normal: bool,
    /// At least one source contributed to the RSMA texture.
    pub has_rsma: bool,
    /// Color is present and its alpha plane is 255 everywhere.
    pub is_opaque: bool,
}

impl Material {
    /// Build a material from its source directory.
    ///
    /// Runs every channel group of the config's plan, ORing per-texture
    /// presence. A directory that contributes nothing is invalid — it
    /// signals a misconfigured name.
    pub fn build(dir: &Path, config: &CompileConfig) -> Result<Self, MaterialError> {
        let res = config.resolution;
        let defaults = &config.defaults;

        let mut color = Texture::filled(res, res, defaults.color);
        let mut emission = Texture::filled(res, res, defaults.emission);
        let mut normal = Texture::filled(res, res, defaults.normal);
        let mut rsma = Texture::filled(res, res, defaults.rsma);

        let mut has_color = false;
        let mut has_emission = false;
        let mut has_normal = false;
        let mut has_rsma = false;

        for group in &config.plan.groups {
            let (texture, flag) = match group.target {
                MapKind::Color => (&mut color, &mut has_color),
                MapKind::Emission => (&mut emission, &mut has_emission),
                MapKind::Normal => (&mut normal, &mut has_normal),
                MapKind::Rsma => (&mut rsma, &mut has_rsma),
            };
            *flag |= load_channel(dir, group, res, texture)?;
        }

        if !(has_color || has_emission || has_normal || has_rsma) {
            return Err(MaterialError::Empty {
                dir: dir.to_path_buf(),
            });
        }

        // Opacity is derived strictly from the color alpha plane; a
        // material without color is never opaque.
        let is_opaque = has_color && color.plane_all(3, 255);

        Ok(Self {
            color,
            emission,
            normal,
            rsma,
            has_color,
            has_emission,
            has_normal,
            has_rsma,
            is_opaque,
        })
    }

    /// The texture of one kind.
    pub fn texture(&self, kind: MapKind) -> &Texture {
        match kind {
            MapKind::Color => &self.color,
            MapKind::Emission => &self.emission,
            MapKind::Normal => &self.normal,
            MapKind::Rsma => &self.rsma,
        }
    }

    /// Presence flag of one texture kind.
    pub fn has(&self, kind: MapKind) -> bool {
        match kind {
            MapKind::Color => self.has_color,
            MapKind::Emission => self.has_emission,
            MapKind::Normal => self.has_normal,
            MapKind::Rsma => self.has_rsma,
        }
    }

    /// Pack the five booleans into the palette flag byte.
    pub fn flags(&self, bits: &FlagBits) -> u8 {
        let mut flags = 0;
        if self.is_opaque {
            flags |= bits.is_opaque;
        }
        if self.has_color {
            flags |= bits.has_color;
        }
        if self.has_emission {
            flags |= bits.has_emission;
        }
        if self.has_normal {
            flags |= bits.has_normal;
        }
        if self.has_rsma {
            flags |= bits.has_rsma;
        }
        flags
    }
}

/// Resolve a material name to its directory under `materials_dir`.
///
/// `<materials_dir>/<name>` wins when it is a directory. Otherwise entries
/// matching `<name>.*` are searched: exactly one match resolves to that
/// entry, more than one is ambiguous, and zero falls through to the plain
/// path (which the builder then reports as empty).
pub fn resolve_material_dir(materials_dir: &Path, name: &str) -> Result<PathBuf, MaterialError> {
    let plain = materials_dir.join(name);
    if plain.is_dir() {
        return Ok(plain);
    }

    let prefix = format!("{name}.");
    let mut matches: Vec<PathBuf> = Vec::new();
    if let Ok(entries) = fs::read_dir(materials_dir) {
        for entry in entries.flatten() {
            if let Some(file_name) = entry.file_name().to_str() {
                if file_name.starts_with(&prefix) {
                    matches.push(entry.path());
                }
            }
        }
    }
    matches.sort();

    match matches.len() {
        0 => Ok(plain),
        1 => Ok(matches.remove(0)),
        _ => Err(MaterialError::AmbiguousDir {
            name: name.to_string(),
            matches,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::png::{write_raw, PngConfig};
    use tempfile::TempDir;

    fn write_fixture(dir: &Path, name: &str, data: &[u8], res: u32, channels: usize) {
        write_raw(data, res, res, channels, &dir.join(name), &PngConfig::default()).unwrap();
    }

    fn config() -> CompileConfig {
        CompileConfig::new(4)
    }

    #[test]
    fn empty_directory_is_rejected() {
        let dir = TempDir::new().unwrap();
        let err = Material::build(dir.path(), &config()).unwrap_err();
        assert!(matches!(err, MaterialError::Empty { .. }));
    }

    #[test]
    fn color_only_material_sets_color_flags() {
        let dir = TempDir::new().unwrap();
        let data = vec![200u8; 4 * 4 * 4];
        write_fixture(dir.path(), "color.png", &data, 4, 4);

        let mat = Material::build(dir.path(), &config()).unwrap();
        assert!(mat.has_color);
        assert!(!mat.has_emission);
        assert!(!mat.has_normal);
        assert!(!mat.has_rsma);
        // Alpha plane is not uniformly 255.
        assert!(!mat.is_opaque);
        assert_eq!(mat.flags(&FlagBits::default()), 2);

        // Unloaded textures keep their defaults.
        assert!(mat.normal.plane_all(0, 128));
        assert!(mat.normal.plane_all(2, 255));
        assert!(mat.rsma.plane_all(0, 255));
        assert!(mat.rsma.plane_all(1, 128));
    }

    #[test]
    fn opaque_color_sets_opacity_bit() {
        let dir = TempDir::new().unwrap();
        let mut data = Vec::new();
        for _ in 0..4 * 4 {
            data.extend_from_slice(&[30, 40, 50, 255]);
        }
        write_fixture(dir.path(), "color.png", &data, 4, 4);

        let mat = Material::build(dir.path(), &config()).unwrap();
        assert!(mat.is_opaque);
        assert_eq!(mat.flags(&FlagBits::default()), 1 | 2);
    }

    #[test]
    fn scalar_maps_assemble_the_rsma_texture() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path(), "roughness.png", &vec![10u8; 16], 4, 1);
        write_fixture(dir.path(), "metallic.png", &vec![20u8; 16], 4, 1);

        let mat = Material::build(dir.path(), &config()).unwrap();
        assert!(mat.has_rsma);
        assert!(!mat.is_opaque, "material without color is never opaque");
        assert_eq!(mat.flags(&FlagBits::default()), 16);

        assert!(mat.rsma.plane_all(0, 10));
        assert!(mat.rsma.plane_all(2, 20));
        // Specular and AO keep the default fill.
        assert!(mat.rsma.plane_all(1, 128));
        assert!(mat.rsma.plane_all(3, 255));
    }

    #[test]
    fn normal_and_height_share_a_texture() {
        let dir = TempDir::new().unwrap();
        let mut normal = Vec::new();
        for _ in 0..16 {
            normal.extend_from_slice(&[100, 150, 0]);
        }
        write_fixture(dir.path(), "normal.png", &normal, 4, 3);
        write_fixture(dir.path(), "height.png", &vec![70u8; 16], 4, 1);

        let mat = Material::build(dir.path(), &config()).unwrap();
        assert!(mat.has_normal);
        assert!(mat.normal.plane_all(0, 100));
        assert!(mat.normal.plane_all(1, 150));
        assert!(mat.normal.plane_all(2, 70), "height fills the blue plane");
    }

    #[test]
    fn plain_directory_resolves_directly() {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("stone")).unwrap();

        let dir = resolve_material_dir(root.path(), "stone").unwrap();
        assert_eq!(dir, root.path().join("stone"));
    }

    #[test]
    fn single_suffixed_entry_resolves() {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("007.stone")).unwrap();

        let dir = resolve_material_dir(root.path(), "007").unwrap();
        assert_eq!(dir, root.path().join("007.stone"));
    }

    #[test]
    fn multiple_suffixed_entries_are_ambiguous() {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("007.stone")).unwrap();
        fs::create_dir(root.path().join("007.dirt")).unwrap();

        let err = resolve_material_dir(root.path(), "007").unwrap_err();
        match err {
            MaterialError::AmbiguousDir { name, matches } => {
                assert_eq!(name, "007");
                assert_eq!(matches.len(), 2);
            }
            other => panic!("expected AmbiguousDir, got {other:?}"),
        }
    }

    #[test]
    fn unmatched_name_falls_through_to_plain_path() {
        let root = TempDir::new().unwrap();
        let dir = resolve_material_dir(root.path(), "missing").unwrap();
        assert_eq!(dir, root.path().join("missing"));
    }
}
