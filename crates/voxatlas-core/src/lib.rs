//! Voxel Material Atlas Compiler
//!
//! This crate compiles per-material PBR texture sets into two deployable
//! artifacts: four packed texture atlases (color, emission, normal/height,
//! RSMA) with one grid cell per material, and a 256×6 palette table that
//! maps a voxel value and cube face to an atlas layer index and a flag
//! byte describing which channel groups are present and whether the face
//! is fully opaque.
//!
//! # Pipeline
//!
//! - **Channel loading**: candidate filenames per channel group, decode at
//!   native depth, Lanczos resize, channel remap into the material texture
//! - **Material assembly**: eight canonical groups, presence flags,
//!   alpha-derived opacity
//! - **Atlas packing**: lexicographic layer assignment, failed materials
//!   marked instead of aborting the batch
//! - **Palette compilation**: fill from the voxel→material mapping, then a
//!   pure opacity-consistency pass over the finished table
//! - **Output**: five PNGs with pinned encoder settings
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use voxatlas_core::{compile, write_outputs, CompileConfig, OutputPaths, PngConfig, VoxelFaceMapping};
//!
//! let config = CompileConfig::new(512);
//! let mapping = VoxelFaceMapping::from_path(Path::new("palette.json")).unwrap();
//! let compilation = compile(&config, &mapping, Path::new("Materials")).unwrap();
//! write_outputs(&compilation, &OutputPaths::in_dir(Path::new("out")), &PngConfig::default()).unwrap();
//! ```
//!
//! # Determinism
//!
//! Compiling the same inputs twice yields byte-identical artifacts:
//!
//! - Layer assignment is the rank of a material's name in lexicographic
//!   order among all referenced names
//! - The mapping document is held in ordered maps, never hash-ordered
//! - PNG encoding uses fixed compression and filter settings

pub mod atlas;
pub mod channel;
pub mod compile;
pub mod config;
pub mod error;
pub mod mapping;
pub mod material;
pub mod palette;
pub mod png;
pub mod texture;

// Re-export main types for convenience
pub use atlas::{error_marker, pack_atlases, AtlasLayout, AtlasSet, MaterialWarning};
pub use channel::{find_candidate, load_channel, ChannelGroup, MapKind};
pub use compile::{compile, write_outputs, Compilation, OutputPaths};
pub use config::{CompileConfig, FlagBits, MaterialPlan, TextureDefaults};
pub use error::{CompileError, CompileResult, MaterialError};
pub use mapping::VoxelFaceMapping;
pub use palette::{validate_opacity, PaletteTable, FACE_COUNT, FACE_NAMES, VOXEL_COUNT};
pub use png::{hash_png, write_texture, PngConfig, PngError};
pub use texture::Texture;
