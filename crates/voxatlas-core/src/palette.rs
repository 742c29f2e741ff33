//! The 256×6 palette table and its consistency check.
//!
//! Each entry maps (voxel value, face) to `[layer_low, layer_high, flags]`
//! where `layer = layer_low | (layer_high << 8)`. Row 0 is reserved for
//! "empty/air" and stays zero-filled. Filling and validation are separate
//! phases: [`PaletteTable::fill`] builds the finished table, and the pure
//! [`validate_opacity`] pass checks it afterwards.

use std::collections::BTreeMap;

use crate::error::{CompileError, CompileResult};
use crate::mapping::VoxelFaceMapping;
use crate::texture::Texture;

/// Faces per voxel, in the fixed canonical order.
pub const FACE_COUNT: usize = 6;

/// Rows of the table; voxel values are 8-bit.
pub const VOXEL_COUNT: usize = 256;

/// Bytes per entry: `[layer_low, layer_high, flags]`.
pub const ENTRY_BYTES: usize = 3;

/// Face names in table order.
pub const FACE_NAMES: [&str; FACE_COUNT] = ["+X", "-X", "+Y", "-Y", "+Z", "-Z"];

/// The fixed 256×6×3 lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteTable {
    data: Vec<u8>,
}

impl Default for PaletteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PaletteTable {
    /// An all-zero table.
    pub fn new() -> Self {
        Self {
            data: vec![0; VOXEL_COUNT * FACE_COUNT * ENTRY_BYTES],
        }
    }

    #[inline]
    fn offset(voxel: u8, face: usize) -> usize {
        (voxel as usize * FACE_COUNT + face) * ENTRY_BYTES
    }

    /// Store one entry, splitting the layer into two 8-bit lanes.
    pub fn set_entry(&mut self, voxel: u8, face: usize, layer: u16, flags: u8) {
        let i = Self::offset(voxel, face);
        self.data[i] = (layer & 255) as u8;
        self.data[i + 1] = (layer >> 8) as u8;
        self.data[i + 2] = flags;
    }

    /// Decode one entry back into `(layer, flags)`.
    pub fn entry(&self, voxel: u8, face: usize) -> (u16, u8) {
        let i = Self::offset(voxel, face);
        let layer = self.data[i] as u16 | ((self.data[i + 1] as u16) << 8);
        (layer, self.data[i + 2])
    }

    /// True if any face of the row holds a non-zero entry.
    pub fn row_in_use(&self, voxel: u8) -> bool {
        let i = Self::offset(voxel, 0);
        self.data[i..i + FACE_COUNT * ENTRY_BYTES].iter().any(|&b| b != 0)
    }

    /// Populate a table from the mapping and the packer's lookup maps.
    ///
    /// Single-name entries broadcast to all six faces. Names absent from
    /// the maps degrade to layer 0 / flags 0 rather than failing, so a
    /// material may be declared in the mapping before its directory
    /// exists.
    pub fn fill(
        mapping: &VoxelFaceMapping,
        layers: &BTreeMap<String, u16>,
        flags: &BTreeMap<String, u8>,
    ) -> CompileResult<Self> {
        let mut table = Self::new();

        for (key, names) in &mapping.materials {
            let voxel = parse_voxel(key)?;

            let count = names.len();
            if count != 1 && count != FACE_COUNT {
                return Err(CompileError::InvalidFaceCount { voxel, count });
            }

            for face in 0..FACE_COUNT {
                let name = if count == 1 { &names[0] } else { &names[face] };
                let layer = layers.get(name).copied().unwrap_or(0);
                let flag = flags.get(name).copied().unwrap_or(0);
                table.set_entry(voxel, face, layer, flag);
            }
        }

        Ok(table)
    }

    /// The table as a 6×256 three-channel image.
    pub fn to_texture(&self) -> Texture {
        Texture::from_raw(
            FACE_COUNT as u32,
            VOXEL_COUNT as u32,
            ENTRY_BYTES,
            self.data.clone(),
        )
    }
}

/// Parse a mapping key as a decimal voxel value in 1..=255.
fn parse_voxel(key: &str) -> CompileResult<u8> {
    let value = if key.bytes().all(|b| b.is_ascii_digit()) {
        key.parse::<u32>().ok()
    } else {
        None
    };
    match value {
        Some(v @ 1..=255) => Ok(v as u8),
        _ => Err(CompileError::InvalidVoxelValue {
            value: key.to_string(),
        }),
    }
}

/// Check that no voxel mixes opaque and transparent faces.
///
/// A row whose opaque-face count is strictly between 1 and 5 corrupts the
/// renderer's backface-culling assumptions. Offenders are collected across
/// the whole table and reported together.
pub fn validate_opacity(table: &PaletteTable, opaque_bit: u8) -> CompileResult<()> {
    let mut offenders = Vec::new();

    for voxel in 0..VOXEL_COUNT {
        let opaque = (0..FACE_COUNT)
            .filter(|&face| table.entry(voxel as u8, face).1 & opaque_bit != 0)
            .count();
        if (1..FACE_COUNT).contains(&opaque) {
            offenders.push(voxel as u8);
        }
    }

    if offenders.is_empty() {
        Ok(())
    } else {
        Err(CompileError::MixedOpacity { voxels: offenders })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(doc: &str) -> VoxelFaceMapping {
        serde_json::from_str(doc).unwrap()
    }

    fn maps(entries: &[(&str, u16, u8)]) -> (BTreeMap<String, u16>, BTreeMap<String, u8>) {
        let layers = entries.iter().map(|(n, l, _)| (n.to_string(), *l)).collect();
        let flags = entries.iter().map(|(n, _, f)| (n.to_string(), *f)).collect();
        (layers, flags)
    }

    #[test]
    fn entry_split_round_trips_across_the_16_bit_range() {
        let mut table = PaletteTable::new();
        for &layer in &[0u16, 1, 255, 256, 300, 4095, 65535] {
            table.set_entry(9, 2, layer, 0b10011);
            assert_eq!(table.entry(9, 2), (layer, 0b10011));
        }
        // layer 300 splits into low 44, high 1
        table.set_entry(9, 2, 300, 0);
        let i = (9 * FACE_COUNT + 2) * ENTRY_BYTES;
        assert_eq!(&table.data[i..i + 3], &[44, 1, 0]);
    }

    #[test]
    fn single_name_broadcasts_to_all_faces() {
        let (layers, flags) = maps(&[("stone", 2, 3)]);
        let table =
            PaletteTable::fill(&mapping(r#"{"materials": {"5": ["stone"]}}"#), &layers, &flags)
                .unwrap();

        for face in 0..FACE_COUNT {
            assert_eq!(table.entry(5, face), (2, 3));
        }
        assert!(table.row_in_use(5));
        assert!(!table.row_in_use(4));
    }

    #[test]
    fn six_names_populate_faces_in_order() {
        let (layers, flags) = maps(&[
            ("a", 0, 1),
            ("b", 1, 2),
            ("c", 2, 3),
            ("d", 3, 4),
            ("e", 4, 5),
            ("f", 5, 6),
        ]);
        let doc = r#"{"materials": {"6": ["a", "b", "c", "d", "e", "f"]}}"#;
        let table = PaletteTable::fill(&mapping(doc), &layers, &flags).unwrap();

        for face in 0..FACE_COUNT {
            assert_eq!(table.entry(6, face), (face as u16, face as u8 + 1));
        }
    }

    #[test]
    fn other_name_counts_are_rejected() {
        let (layers, flags) = maps(&[("a", 0, 0)]);
        for doc in [
            r#"{"materials": {"3": []}}"#,
            r#"{"materials": {"3": ["a", "a"]}}"#,
            r#"{"materials": {"3": ["a", "a", "a", "a", "a", "a", "a"]}}"#,
        ] {
            let err = PaletteTable::fill(&mapping(doc), &layers, &flags).unwrap_err();
            assert!(matches!(err, CompileError::InvalidFaceCount { voxel: 3, .. }));
        }
    }

    #[test]
    fn voxel_keys_are_range_checked() {
        let (layers, flags) = maps(&[("a", 0, 0)]);
        for key in ["0", "256", "999", "abc", "-1", "+5", "1.5", ""] {
            let doc = format!(r#"{{"materials": {{"{key}": ["a"]}}}}"#);
            let err = PaletteTable::fill(&mapping(&doc), &layers, &flags).unwrap_err();
            match err {
                CompileError::InvalidVoxelValue { value } => assert_eq!(value, key),
                other => panic!("expected InvalidVoxelValue for {key:?}, got {other:?}"),
            }
        }
        for key in ["1", "255"] {
            let doc = format!(r#"{{"materials": {{"{key}": ["a"]}}}}"#);
            assert!(PaletteTable::fill(&mapping(&doc), &layers, &flags).is_ok());
        }
    }

    #[test]
    fn unknown_names_degrade_to_zero() {
        let (layers, flags) = maps(&[]);
        let table =
            PaletteTable::fill(&mapping(r#"{"materials": {"9": ["ghost"]}}"#), &layers, &flags)
                .unwrap();
        assert_eq!(table.entry(9, 0), (0, 0));
    }

    #[test]
    fn mixed_opacity_collects_every_offender() {
        let mut table = PaletteTable::new();
        // Voxel 7: five opaque faces out of six.
        for face in 0..5 {
            table.set_entry(7, face, 0, 1);
        }
        // Voxel 9: one opaque face.
        table.set_entry(9, 0, 0, 1);
        // Voxel 12: fully opaque, fine.
        for face in 0..FACE_COUNT {
            table.set_entry(12, face, 0, 1);
        }

        let err = validate_opacity(&table, 1).unwrap_err();
        match err {
            CompileError::MixedOpacity { voxels } => assert_eq!(voxels, vec![7, 9]),
            other => panic!("expected MixedOpacity, got {other:?}"),
        }
    }

    #[test]
    fn uniform_rows_pass_validation() {
        let mut table = PaletteTable::new();
        for face in 0..FACE_COUNT {
            table.set_entry(7, face, 0, 1);
        }
        // Voxel 8 stays fully transparent.
        validate_opacity(&table, 1).unwrap();
    }

    #[test]
    fn palette_texture_is_6_by_256() {
        let table = PaletteTable::new();
        let texture = table.to_texture();
        assert_eq!(texture.width, 6);
        assert_eq!(texture.height, 256);
        assert_eq!(texture.channels, 3);
    }
}
