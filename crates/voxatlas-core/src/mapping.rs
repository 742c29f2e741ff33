//! The declarative voxel→material mapping document.
//!
//! A JSON object of the shape `{"materials": {"<voxel>": [name] | [six
//! names]}}`. Keys are decimal voxel values 1..=255; a single name applies
//! to all six faces, six names apply per face in the fixed face order.
//! Shape validation (value range, list length) happens in the palette
//! compiler, not here.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, CompileResult};

/// Voxel-value → material-name mapping document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoxelFaceMapping {
    /// Voxel value (digit string) → one or six material names.
    pub materials: BTreeMap<String, Vec<String>>,
}

impl VoxelFaceMapping {
    /// Load and parse a mapping document from disk.
    pub fn from_path(path: &Path) -> CompileResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| CompileError::MappingRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| CompileError::MappingParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Every distinct material name referenced anywhere in the mapping,
    /// sorted lexicographically. This order is the sole source of layer
    /// assignment determinism.
    pub fn referenced_names(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .materials
            .values()
            .flatten()
            .map(String::as_str)
            .collect();
        set.into_iter().map(str::to_string).collect()
    }
}
