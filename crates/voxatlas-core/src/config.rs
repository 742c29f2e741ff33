//! Compiler configuration.
//!
//! Everything that shapes a compilation run lives in one [`CompileConfig`]
//! value passed into the entry point: resolution, atlas width limit,
//! default fills, flag-bit positions, and the channel-group plan. Nothing
//! is process-global, so several configurations can compile in the same
//! process without interference.

use crate::channel::{ChannelGroup, MapKind};
use crate::error::CompileResult;

/// Default fill colors for the four material textures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDefaults {
    /// Color fill, applied before any source is loaded.
    pub color: [u8; 4],
    /// Emission fill.
    pub emission: [u8; 4],
    /// Normal/height fill: flat +Z normal, full height.
    pub normal: [u8; 4],
    /// RSMA fill: fully rough, half specular, non-metallic, no occlusion.
    pub rsma: [u8; 4],
}

impl Default for TextureDefaults {
    fn default() -> Self {
        Self {
            color: [0, 0, 0, 255],
            emission: [0, 0, 0, 255],
            normal: [128, 128, 255, 255],
            rsma: [255, 128, 0, 255],
        }
    }
}

impl TextureDefaults {
    /// The fill for one texture kind.
    pub fn fill(&self, kind: MapKind) -> [u8; 4] {
        match kind {
            MapKind::Color => self.color,
            MapKind::Emission => self.emission,
            MapKind::Normal => self.normal,
            MapKind::Rsma => self.rsma,
        }
    }
}

/// Bit positions of the palette flag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagBits {
    /// Set when color is present and its alpha plane is 255 everywhere.
    pub is_opaque: u8,
    /// Set when at least one source contributed to the color texture.
    pub has_color: u8,
    /// Set when at least one source contributed to the emission texture.
    pub has_emission: u8,
    /// Set when at least one source contributed to the normal texture.
    pub has_normal: u8,
    /// Set when at least one source contributed to the RSMA texture.
    pub has_rsma: u8,
}

impl Default for FlagBits {
    fn default() -> Self {
        Self {
            is_opaque: 1,
            has_color: 2,
            has_emission: 4,
            has_normal: 8,
            has_rsma: 16,
        }
    }
}

/// The ordered channel-group loads that assemble one material.
#[derive(Debug, Clone)]
pub struct MaterialPlan {
    /// Groups, applied in order; later groups may overwrite earlier planes.
    pub groups: Vec<ChannelGroup>,
}

impl MaterialPlan {
    /// The canonical eight-group plan: color RGBA, emission RGB, normal RG,
    /// height into normal B, and one scalar each for roughness, specular,
    /// metallic and ambient occlusion into the RSMA channels.
    pub fn standard() -> Self {
        Self {
            groups: vec![
                ChannelGroup::new(MapKind::Color, &[0, 1, 2, 3], &[0, 1, 2, 3], &["color.png", "color.jpg"]),
                ChannelGroup::new(MapKind::Emission, &[0, 1, 2], &[0, 1, 2], &["emission.png", "emission.jpg"]),
                ChannelGroup::new(MapKind::Normal, &[0, 1], &[0, 1], &["normal.png", "normal.jpg"]),
                ChannelGroup::new(MapKind::Normal, &[2], &[0], &["height.png", "height.jpg"]),
                ChannelGroup::new(MapKind::Rsma, &[0], &[0], &["roughness.png", "roughness.jpg"]),
                ChannelGroup::new(MapKind::Rsma, &[1], &[0], &["specular.png", "specular.jpg"]),
                ChannelGroup::new(MapKind::Rsma, &[2], &[0], &["metallic.png", "metallic.jpg"]),
                ChannelGroup::new(MapKind::Rsma, &[3], &[0], &["ao.png", "ao.jpg"]),
            ],
        }
    }
}

/// Configuration for one compilation run.
#[derive(Debug, Clone)]
pub struct CompileConfig {
    /// Cell resolution; every material occupies one `res`×`res` grid cell.
    pub resolution: u32,
    /// Upper bound on atlas pixel width.
    pub max_atlas_width: u32,
    /// Default fills applied before loading.
    pub defaults: TextureDefaults,
    /// Flag-byte bit positions.
    pub flag_bits: FlagBits,
    /// Channel-group plan per material.
    pub plan: MaterialPlan,
}

impl CompileConfig {
    /// Config with the standard plan and a 4096-pixel atlas width limit.
    pub fn new(resolution: u32) -> Self {
        Self {
            resolution,
            max_atlas_width: 4096,
            defaults: TextureDefaults::default(),
            flag_bits: FlagBits::default(),
            plan: MaterialPlan::standard(),
        }
    }

    /// Reject configurations no run could satisfy.
    pub fn validate(&self) -> CompileResult<()> {
        if self.resolution == 0 || self.resolution > self.max_atlas_width {
            return Err(crate::error::CompileError::InvalidResolution {
                res: self.resolution,
                max_width: self.max_atlas_width,
            });
        }
        for group in &self.plan.groups {
            group.validate()?;
        }
        Ok(())
    }
}
