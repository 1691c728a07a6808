//! Cross-field checks shared by the CIFF and CAFF decoders.
//!
//! All functions are pure: they take values that were already read and never
//! touch the stream.

use crate::format::{BYTES_PER_PIXEL, FIXED_CIFF_HEADER_OVERHEAD};
use crate::reader::DecodeError;

/// Header size implied by a caption of `caption_len` bytes and the given tag lengths.
pub fn expected_header_size(caption_len: u64, tag_lens: impl IntoIterator<Item = u64>) -> u64 {
    tag_lens
        .into_iter()
        .fold(FIXED_CIFF_HEADER_OVERHEAD + caption_len, |acc, len| acc + len + 1)
}

/// Length of the tag region left after the fixed fields and the caption.
///
/// Fails when the declared header cannot even hold the fixed fields and caption.
pub fn tag_region_len(header_size: u64, caption_len: u64) -> Result<u64, DecodeError> {
    header_size
        .checked_sub(FIXED_CIFF_HEADER_OVERHEAD)
        .and_then(|rest| rest.checked_sub(caption_len))
        .ok_or(DecodeError::TagBoundaryMismatch {
            declared: header_size,
            consumed: FIXED_CIFF_HEADER_OVERHEAD + caption_len,
        })
}

/// Tags must end exactly on the tag-region boundary.
pub fn check_tag_boundary(region_len: u64, consumed: u64) -> Result<(), DecodeError> {
    if consumed == region_len {
        Ok(())
    } else {
        Err(DecodeError::TagBoundaryMismatch {
            declared: region_len,
            consumed,
        })
    }
}

/// `content_size` must equal `width * height * 3`; a zero-area image carries no pixels.
pub fn check_dimensions(width: u64, height: u64, content_size: u64) -> Result<(), DecodeError> {
    let expected = width
        .checked_mul(height)
        .and_then(|px| px.checked_mul(BYTES_PER_PIXEL));
    if expected == Some(content_size) {
        Ok(())
    } else {
        Err(DecodeError::InvalidDimensions {
            width,
            height,
            content_size,
        })
    }
}

/// A zero-area image must come with an empty pixel buffer.
pub fn check_pixel_buffer(width: u64, height: u64, pixel_bytes: u64) -> Result<(), DecodeError> {
    if (width == 0 || height == 0) && pixel_bytes != 0 {
        return Err(DecodeError::InvalidDimensions {
            width,
            height,
            content_size: pixel_bytes,
        });
    }
    Ok(())
}

/// A standalone CIFF ends exactly where its pixel buffer ends.
pub fn check_standalone_remaining(content_size: u64, remaining: u64) -> Result<(), DecodeError> {
    if content_size == remaining {
        Ok(())
    } else {
        Err(DecodeError::SizeMismatch {
            expected: content_size,
            actual: remaining,
        })
    }
}
