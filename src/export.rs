//! JPEG export of decoded images.
//!
//! Encoding is delegated to the `image` crate; this module only checks that the
//! image is encodable and decides where the output goes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use thiserror::Error;

use crate::config::ExportConfig;
use crate::format::{CaffContainer, CiffImage, BYTES_PER_PIXEL};

/// Largest width or height a baseline JPEG can carry.
pub const MAX_JPEG_DIMENSION: u64 = u16::MAX as u64;

/// Errors produced while exporting images.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JPEG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("cannot export an empty {width}x{height} image")]
    EmptyImage { width: u64, height: u64 },
    #[error("image {width}x{height} exceeds the JPEG limit of 65535 pixels per side")]
    TooLarge { width: u64, height: u64 },
    #[error("pixel buffer holds {actual} bytes, image needs {expected}")]
    BufferMismatch { expected: u64, actual: u64 },
    #[error("container has no frames to export")]
    NoFrames,
}

/// Output path for `input`: same location, extension replaced by `.jpg`.
#[must_use]
pub fn jpeg_path_for(input: &Path) -> PathBuf {
    input.with_extension("jpg")
}

/// Output path for frame `index` of `input`: `<stem>_<index>.jpg` next to it.
#[must_use]
pub fn frame_path_for(input: &Path, index: usize) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}_{index}.jpg"))
}

/// Encode `image` as a JPEG at `path`.
///
/// The file is only created once encoding has succeeded, so a failed export
/// leaves nothing behind.
pub fn write_jpeg(image: &CiffImage, path: &Path, quality: u8) -> Result<(), ExportError> {
    let (width, height) = (image.width(), image.height());
    if image.is_empty() {
        return Err(ExportError::EmptyImage { width, height });
    }
    if width > MAX_JPEG_DIMENSION || height > MAX_JPEG_DIMENSION {
        return Err(ExportError::TooLarge { width, height });
    }

    // Both sides fit in u16, so this cannot overflow.
    let expected = width * height * BYTES_PER_PIXEL;
    let actual = image.pixels.len() as u64;
    if actual != expected {
        return Err(ExportError::BufferMismatch { expected, actual });
    }

    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(&mut encoded, quality).encode(
        &image.pixels,
        width as u32,
        height as u32,
        ExtendedColorType::Rgb8,
    )?;
    fs::write(path, &encoded)?;

    tracing::info!(path = %path.display(), width, height, "wrote JPEG");
    Ok(())
}

/// Export a standalone CIFF next to its source file. Returns the written path.
pub fn export_ciff(image: &CiffImage, input: &Path, config: &ExportConfig) -> Result<PathBuf, ExportError> {
    let path = jpeg_path_for(input);
    write_jpeg(image, &path, config.quality)?;
    Ok(path)
}

/// Export a CAFF's first frame, or every frame when `config.all_frames` is set.
pub fn export_caff(
    container: &CaffContainer,
    input: &Path,
    config: &ExportConfig,
) -> Result<Vec<PathBuf>, ExportError> {
    if config.all_frames {
        if container.frames.is_empty() {
            return Err(ExportError::NoFrames);
        }
        container
            .images()
            .enumerate()
            .map(|(index, image)| {
                let path = frame_path_for(input, index);
                write_jpeg(image, &path, config.quality)?;
                Ok(path)
            })
            .collect()
    } else {
        let first = container.first_image().ok_or(ExportError::NoFrames)?;
        let path = jpeg_path_for(input);
        write_jpeg(first, &path, config.quality)?;
        Ok(vec![path])
    }
}
