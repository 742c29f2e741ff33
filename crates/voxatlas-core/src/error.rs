//! Error taxonomy for the atlas compiler.
//!
//! [`CompileError`] covers fatal conditions that abort a run: bad
//! configuration, mapping validation, the deferred opacity-consistency
//! check, and output I/O. [`MaterialError`] covers per-material failures
//! that are downgraded to warnings by the packer (the material's cell is
//! marked instead of aborting the batch).

use std::path::PathBuf;

use thiserror::Error;

use crate::png::PngError;

/// Result type for compiler operations.
pub type CompileResult<T> = Result<T, CompileError>;

/// Fatal errors that abort a compilation run.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Resolution is zero or larger than the atlas width limit.
    #[error("invalid resolution: {res} (must be in 1..={max_width})")]
    InvalidResolution {
        /// The rejected resolution.
        res: u32,
        /// The configured atlas width limit.
        max_width: u32,
    },

    /// A channel group in the material plan violates its invariant.
    #[error("invalid channel group for {target}: {message}")]
    InvalidChannelGroup {
        /// Destination texture of the offending group.
        target: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// The materials path does not exist or is not a directory.
    #[error("materials path is not a directory: {}", path.display())]
    MaterialsDirNotFound {
        /// The rejected path.
        path: PathBuf,
    },

    /// The mapping document could not be read.
    #[error("failed to read mapping document {}: {source}", path.display())]
    MappingRead {
        /// Path of the document.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The mapping document is not valid JSON of the expected shape.
    #[error("failed to parse mapping document {}: {source}", path.display())]
    MappingParse {
        /// Path of the document.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// The mapping document references no materials at all.
    #[error("mapping document references no materials")]
    EmptyMapping,

    /// A mapping key is not a decimal integer in 1..=255.
    #[error("invalid voxel value: {value}")]
    InvalidVoxelValue {
        /// The offending key, verbatim.
        value: String,
    },

    /// A mapping entry has a name list that is neither 1 nor 6 long.
    #[error("invalid material names at voxel {voxel:03}: expected 1 or 6 names, got {count}")]
    InvalidFaceCount {
        /// The voxel value of the offending entry.
        voxel: u8,
        /// The rejected list length.
        count: usize,
    },

    /// Voxels whose six faces mix opaque and transparent materials.
    ///
    /// Collected across the whole table so the operator sees every
    /// offender in one pass.
    #[error("palette entries with mixed opaque and transparent faces: {voxels:?}")]
    MixedOpacity {
        /// Every offending voxel value, ascending.
        voxels: Vec<u8>,
    },

    /// Every referenced material failed to build.
    #[error("no materials could be loaded")]
    NoMaterialsLoaded,

    /// An output artifact could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Path of the failed artifact.
        path: PathBuf,
        /// Underlying encoder or I/O error.
        source: PngError,
    },
}

/// Per-material failures, recoverable at the batch level.
#[derive(Debug, Error)]
pub enum MaterialError {
    /// None of the eight channel groups found a source file.
    #[error("could not load any channels for material: {}", dir.display())]
    Empty {
        /// The material directory that contributed nothing.
        dir: PathBuf,
    },

    /// A source image has fewer channels than the group requires.
    #[error("{}: image has {have} channels, but at least {need} are required", path.display())]
    ChannelCount {
        /// The offending source image.
        path: PathBuf,
        /// Channels the decoded image actually has.
        have: usize,
        /// Channels the group needs.
        need: usize,
    },

    /// More than one `<name>.*` entry matched a material name.
    #[error("ambiguous directory names for material '{name}': {matches:?}")]
    AmbiguousDir {
        /// The material name being resolved.
        name: String,
        /// Every matching entry.
        matches: Vec<PathBuf>,
    },

    /// A source image could not be decoded.
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        /// The unreadable source image.
        path: PathBuf,
        /// Underlying decoder error.
        source: image::ImageError,
    },
}
