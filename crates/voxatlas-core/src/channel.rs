//! Channel loading: candidate file search, decode, resize, channel remap.
//!
//! One [`ChannelGroup`] describes how a subset of a source image's channels
//! lands in a subset of a destination texture's channels, e.g. a grayscale
//! height map filling the blue plane of the normal texture. Loading mutates
//! the destination in place and reports whether a source file existed, so
//! the material builder can OR the results into its presence flags.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::DynamicImage;

use crate::error::{CompileError, MaterialError};
use crate::texture::Texture;

/// The four canonical material textures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapKind {
    /// Base color, RGBA.
    Color,
    /// Emission, RGB.
    Emission,
    /// Tangent-space normal in RG, height in B.
    Normal,
    /// Roughness/specular/metallic/ambient-occlusion, one scalar per channel.
    Rsma,
}

impl MapKind {
    /// The texture kind as a lowercase string.
    pub fn as_str(self) -> &'static str {
        match self {
            MapKind::Color => "color",
            MapKind::Emission => "emission",
            MapKind::Normal => "normal",
            MapKind::Rsma => "rsma",
        }
    }
}

/// A remap of source image channels into destination texture channels.
///
/// `src` and `dst` are parallel index lists: source channel `src[i]` is
/// copied into destination channel `dst[i]`. Both must be equally long and
/// non-empty.
#[derive(Debug, Clone)]
pub struct ChannelGroup {
    /// Destination texture this group contributes to.
    pub target: MapKind,
    /// Destination channel indices.
    pub dst: Vec<usize>,
    /// Source channel indices.
    pub src: Vec<usize>,
    /// Candidate filenames, checked in priority order.
    pub candidates: Vec<String>,
}

impl ChannelGroup {
    /// Build a group from index and candidate lists.
    pub fn new(target: MapKind, dst: &[usize], src: &[usize], candidates: &[&str]) -> Self {
        Self {
            target,
            dst: dst.to_vec(),
            src: src.to_vec(),
            candidates: candidates.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Check the group invariant: equal-length non-empty index lists, and
    /// destination indices inside the four-channel material texture.
    pub fn validate(&self) -> Result<(), CompileError> {
        if self.src.is_empty() || self.src.len() != self.dst.len() {
            return Err(CompileError::InvalidChannelGroup {
                target: self.target.as_str(),
                message: format!(
                    "source and destination channel lists must be equal length and non-empty, got {} and {}",
                    self.src.len(),
                    self.dst.len()
                ),
            });
        }
        if let Some(&bad) = self.dst.iter().find(|&&d| d >= 4) {
            return Err(CompileError::InvalidChannelGroup {
                target: self.target.as_str(),
                message: format!("destination channel index {bad} is out of range 0..4"),
            });
        }
        Ok(())
    }
}

/// Find the first existing candidate file in `dir`, in priority order.
pub fn find_candidate(dir: &Path, candidates: &[String]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Load one channel group from a material directory into `out`.
///
/// Returns `Ok(false)` when no candidate file exists (the caller applies
/// its default), `Ok(true)` when a source was found and copied. The source
/// is resized to `res`×`res` with Lanczos interpolation when its
/// dimensions differ, and an opaque alpha plane is synthesized when four
/// slots are requested from a three-channel source.
pub fn load_channel(
    dir: &Path,
    group: &ChannelGroup,
    res: u32,
    out: &mut Texture,
) -> Result<bool, MaterialError> {
    let Some(path) = find_candidate(dir, &group.candidates) else {
        return Ok(false);
    };

    let mut img = image::open(&path).map_err(|source| MaterialError::Decode {
        path: path.clone(),
        source,
    })?;

    if (img.width(), img.height()) != (res, res) {
        img = img.resize_exact(res, res, FilterType::Lanczos3);
    }

    let source = decode_planes(img, group.src.len());

    let need = group.src.iter().copied().max().unwrap_or(0) + 1;
    if source.channels < need {
        return Err(MaterialError::ChannelCount {
            path,
            have: source.channels,
            need,
        });
    }

    for (&dst, &src) in group.dst.iter().zip(group.src.iter()) {
        out.copy_plane(dst, &source, src);
    }

    Ok(true)
}

/// Extract interleaved byte planes at the depth the group needs.
///
/// Single-slot groups collapse the source to one grayscale plane. Other
/// groups keep the native channel count, except that a three-channel
/// source grows an opaque alpha plane when four slots are requested.
fn decode_planes(img: DynamicImage, slots: usize) -> Texture {
    let (width, height) = (img.width(), img.height());

    if slots == 1 {
        return Texture::from_raw(width, height, 1, img.into_luma8().into_raw());
    }

    let native = img.color().channel_count() as usize;
    let channels = if slots == 4 && native == 3 { 4 } else { native };
    match channels {
        1 => Texture::from_raw(width, height, 1, img.into_luma8().into_raw()),
        2 => Texture::from_raw(width, height, 2, img.into_luma_alpha8().into_raw()),
        3 => Texture::from_raw(width, height, 3, img.into_rgb8().into_raw()),
        _ => Texture::from_raw(width, height, 4, img.into_rgba8().into_raw()),
    }
}
