//! On-disk material tree fixtures.
//!
//! Fixture images are tiny (4×4) and written with the crate's own
//! deterministic PNG writer, so the tests exercise the same codec path the
//! compiler reads back.

use std::fs;
use std::path::{Path, PathBuf};

use voxatlas_core::png::{write_raw, PngConfig};

/// Fixture cell resolution.
pub const RES: u32 = 4;

/// A solid `RES`×`RES` pixel block.
pub fn solid(pixel: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity((RES * RES) as usize * pixel.len());
    for _ in 0..RES * RES {
        data.extend_from_slice(pixel);
    }
    data
}

/// Write a fixture PNG with the deterministic encoder.
pub fn write_png(path: &Path, data: &[u8], channels: usize) {
    write_raw(data, RES, RES, channels, path, &PngConfig::default()).unwrap();
}

/// Create (or reuse) a material directory under `root`.
pub fn material_dir(root: &Path, name: &str) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// An opaque single-color material (color.png only).
pub fn opaque_material(root: &Path, name: &str, rgb: [u8; 3]) -> PathBuf {
    let dir = material_dir(root, name);
    write_png(&dir.join("color.png"), &solid(&[rgb[0], rgb[1], rgb[2], 255]), 4);
    dir
}

/// A material whose color alpha is uniformly `alpha` (not opaque for
/// values below 255).
pub fn translucent_material(root: &Path, name: &str, alpha: u8) -> PathBuf {
    let dir = material_dir(root, name);
    write_png(&dir.join("color.png"), &solid(&[90, 90, 90, alpha]), 4);
    dir
}

/// Write a mapping document and return its path.
pub fn write_mapping(root: &Path, doc: &str) -> PathBuf {
    let path = root.join("palette.json");
    fs::write(&path, doc).unwrap();
    path
}
