//! Atlas layout and packing.
//!
//! Distinct material names are sorted lexicographically and assigned
//! layers `0..N-1`; that sort is the sole source of determinism, so two
//! runs over the same inputs produce identical layer assignments and
//! identical atlas pixels. Each material occupies one grid cell in each of
//! the four canvases (color RGBA, emission RGB, normal RGB, RSMA RGBA).

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::CompileConfig;
use crate::error::{CompileError, CompileResult, MaterialError};
use crate::material::{resolve_material_dir, Material};
use crate::texture::Texture;

/// Deterministic assignment of material names to layers and grid cells.
#[derive(Debug, Clone)]
pub struct AtlasLayout {
    /// Distinct names in layer order (lexicographically sorted).
    pub names: Vec<String>,
    /// Cell resolution.
    pub res: u32,
    /// Grid columns.
    pub cols: u32,
    /// Grid rows.
    pub rows: u32,
}

impl AtlasLayout {
    /// Sort and deduplicate `names`, then compute the grid.
    ///
    /// The grid grows column-first up to `max_width` pixels, then wraps
    /// into further rows.
    pub fn assign(mut names: Vec<String>, res: u32, max_width: u32) -> CompileResult<Self> {
        names.sort();
        names.dedup();
        if names.is_empty() {
            return Err(CompileError::EmptyMapping);
        }

        let count = names.len() as u32;
        let cols = (count * res).min(max_width) / res;
        let rows = count.div_ceil(cols);

        Ok(Self {
            names,
            res,
            cols,
            rows,
        })
    }

    /// Atlas pixel width.
    pub fn width(&self) -> u32 {
        self.cols * self.res
    }

    /// Atlas pixel height.
    pub fn height(&self) -> u32 {
        self.rows * self.res
    }

    /// Top-left pixel of a layer's grid cell.
    pub fn cell(&self, layer: u16) -> (u32, u32) {
        let col = layer as u32 % self.cols;
        let row = layer as u32 / self.cols;
        (col * self.res, row * self.res)
    }
}

/// The four packed canvases plus the name lookup maps.
#[derive(Debug, Clone)]
pub struct AtlasSet {
    /// Color canvas, RGBA.
    pub color: Texture,
    /// Emission canvas, RGB.
    pub emission: Texture,
    /// Normal canvas, RGB.
    pub normal: Texture,
    /// RSMA canvas, RGBA.
    pub rsma: Texture,
    /// Material name → layer index.
    pub layers: BTreeMap<String, u16>,
    /// Material name → flag byte, successfully built materials only.
    pub flags: BTreeMap<String, u8>,
}

/// A per-material build failure, downgraded to a warning.
#[derive(Debug)]
pub struct MaterialWarning {
    /// The material that failed.
    pub name: String,
    /// Its assigned layer (the marker cell).
    pub layer: u16,
    /// What went wrong.
    pub error: MaterialError,
}

/// Build every material of the layout and place it into the canvases.
///
/// A material that fails to build gets the error marker painted into the
/// RGB planes of its color cell and a warning recorded; the batch
/// continues. Its layer assignment stands either way, and the palette
/// degrades its flags to zero.
pub fn pack_atlases(
    layout: &AtlasLayout,
    materials_dir: &Path,
    config: &CompileConfig,
) -> (AtlasSet, Vec<MaterialWarning>) {
    let mut color = Texture::zeroed(layout.width(), layout.height(), 4);
    let mut emission = Texture::zeroed(layout.width(), layout.height(), 3);
    let mut normal = Texture::zeroed(layout.width(), layout.height(), 3);
    let mut rsma = Texture::zeroed(layout.width(), layout.height(), 4);
    let marker = error_marker(layout.res);

    let mut layers = BTreeMap::new();
    let mut flags = BTreeMap::new();
    let mut warnings = Vec::new();

    for (i, name) in layout.names.iter().enumerate() {
        let layer = i as u16;
        let (x, y) = layout.cell(layer);
        layers.insert(name.clone(), layer);

        let built = resolve_material_dir(materials_dir, name)
            .and_then(|dir| Material::build(&dir, config));
        match built {
            Ok(material) => {
                color.blit(x, y, &material.color);
                emission.blit(x, y, &material.emission);
                normal.blit(x, y, &material.normal);
                rsma.blit(x, y, &material.rsma);
                flags.insert(name.clone(), material.flags(&config.flag_bits));
            }
            Err(error) => {
                color.blit(x, y, &marker);
                warnings.push(MaterialWarning {
                    name: name.clone(),
                    layer,
                    error,
                });
            }
        }
    }

    (
        AtlasSet {
            color,
            emission,
            normal,
            rsma,
            layers,
            flags,
        },
        warnings,
    )
}

/// A red diagonal cross with a border ring, marking a failed cell.
pub fn error_marker(res: u32) -> Texture {
    let mut marker = Texture::zeroed(res, res, 3);

    if res < 8 {
        // Too small for geometry, flood the cell instead.
        for y in 0..res {
            for x in 0..res {
                marker.set(x, y, 0, 255);
            }
        }
        return marker;
    }

    // 3px border rectangle, inset by one pixel
    for t in 1..4 {
        for x in 1..res - 1 {
            marker.set(x, t, 0, 255);
            marker.set(x, res - 1 - t, 0, 255);
        }
        for y in 1..res - 1 {
            marker.set(t, y, 0, 255);
            marker.set(res - 1 - t, y, 0, 255);
        }
    }

    // Both diagonals, 3px wide
    for y in 0..res {
        for d in -1i64..=1 {
            let x = y as i64 + d;
            if (0..res as i64).contains(&x) {
                marker.set(x as u32, y, 0, 255);
                marker.set(res - 1 - x as u32, y, 0, 255);
            }
        }
    }

    marker
}
