//! Deterministic PNG writer.
//!
//! Uses fixed compression settings so that re-running a compilation over
//! identical inputs produces byte-identical artifacts. Atlas canvases and
//! the palette table are interleaved byte planes already, so the writer
//! works on [`Texture`] buffers directly and dispatches the PNG color type
//! from the channel count.

use std::io::Write;
use std::path::Path;

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use thiserror::Error;

use crate::texture::Texture;

/// Errors from PNG operations.
#[derive(Debug, Error)]
pub enum PngError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error("Unsupported channel count: {0}")]
    UnsupportedChannels(usize),
}

/// PNG export configuration for deterministic output.
#[derive(Debug, Clone)]
pub struct PngConfig {
    /// Compression level. Use a fixed value for determinism.
    pub compression: Compression,
    /// Filter type. Use a fixed value for determinism.
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            // Adaptive filtering is deterministic but varies output across
            // encoder versions; no filtering is stable.
            filter: FilterType::NoFilter,
        }
    }
}

impl PngConfig {
    /// Config optimized for file size (slower, still deterministic).
    pub fn best_compression() -> Self {
        Self {
            compression: Compression::Best,
            filter: FilterType::Paeth,
        }
    }

    /// Config optimized for speed (faster, larger files).
    pub fn fast() -> Self {
        Self {
            compression: Compression::Fast,
            filter: FilterType::NoFilter,
        }
    }
}

fn color_type(channels: usize) -> Result<ColorType, PngError> {
    match channels {
        1 => Ok(ColorType::Grayscale),
        2 => Ok(ColorType::GrayscaleAlpha),
        3 => Ok(ColorType::Rgb),
        4 => Ok(ColorType::Rgba),
        n => Err(PngError::UnsupportedChannels(n)),
    }
}

/// Write a texture buffer to a PNG file.
pub fn write_texture(texture: &Texture, path: &Path, config: &PngConfig) -> Result<(), PngError> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    write_texture_to_writer(texture, writer, config)
}

/// Write a texture buffer to any writer.
pub fn write_texture_to_writer<W: Write>(
    texture: &Texture,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    let mut encoder = Encoder::new(writer, texture.width, texture.height);
    encoder.set_color(color_type(texture.channels)?);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&texture.data)?;

    Ok(())
}

/// Write raw interleaved bytes to a PNG file.
pub fn write_raw(
    data: &[u8],
    width: u32,
    height: u32,
    channels: usize,
    path: &Path,
    config: &PngConfig,
) -> Result<(), PngError> {
    let texture = Texture::from_raw(width, height, channels, data.to_vec());
    write_texture(&texture, path, config)
}

/// Compute the BLAKE3 hash of encoded PNG data.
pub fn hash_png(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Encode a texture to an in-memory PNG and return the bytes and hash.
pub fn write_texture_to_vec_with_hash(
    texture: &Texture,
    config: &PngConfig,
) -> Result<(Vec<u8>, String), PngError> {
    let mut data = Vec::new();
    write_texture_to_writer(texture, &mut data, config)?;
    let hash = hash_png(&data);
    Ok((data, hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(channels: usize) -> Texture {
        let mut t = Texture::zeroed(16, 16, channels);
        for y in 0..16 {
            for x in 0..16 {
                for c in 0..channels {
                    t.set(x, y, c, (x * 16 + y + c as u32) as u8);
                }
            }
        }
        t
    }

    #[test]
    fn rgba_encode_is_deterministic() {
        let texture = gradient(4);
        let config = PngConfig::default();

        let (data1, hash1) = write_texture_to_vec_with_hash(&texture, &config).unwrap();
        let (data2, hash2) = write_texture_to_vec_with_hash(&texture, &config).unwrap();

        assert_eq!(data1, data2, "PNG data should be identical");
        assert_eq!(hash1, hash2, "PNG hashes should be identical");
    }

    #[test]
    fn rgb_encode_is_deterministic() {
        let texture = gradient(3);
        let config = PngConfig::default();

        let (data1, hash1) = write_texture_to_vec_with_hash(&texture, &config).unwrap();
        let (_, hash2) = write_texture_to_vec_with_hash(&texture, &config).unwrap();

        assert!(!data1.is_empty());
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn unsupported_channel_count_is_rejected() {
        let texture = Texture::zeroed(4, 4, 5);
        let config = PngConfig::default();

        let result = write_texture_to_vec_with_hash(&texture, &config);
        assert!(matches!(result, Err(PngError::UnsupportedChannels(5))));
    }

    #[test]
    fn round_trip_preserves_bytes() {
        let texture = gradient(4);
        let (data, _) = write_texture_to_vec_with_hash(&texture, &PngConfig::default()).unwrap();

        let decoder = png::Decoder::new(data.as_slice());
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();

        assert_eq!(info.width, 16);
        assert_eq!(info.height, 16);
        assert_eq!(&buf[..info.buffer_size()], texture.data.as_slice());
    }
}
