//! CIFF decoder: header (fixed fields, caption, tags) followed by the raw pixel buffer.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Seek};
use std::path::Path;

use crate::format::{
    CiffHeader, CiffImage, CAPTION_DELIMITER, CIFF_MAGIC, FIXED_CIFF_HEADER_OVERHEAD,
    TAG_DELIMITER,
};
use crate::magic;
use crate::reader::{ByteReader, DecodeError};
use crate::validate;

/// Where a CIFF record sits, which decides how its start and end are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CiffMode {
    /// A whole file: the magic is scanned for and nothing may follow the pixels.
    Standalone,
    /// Inside a CAFF animation block: read at the cursor, trailing bytes belong to the container.
    Embedded,
}

/// Read a CIFF header at the cursor.
pub fn decode_header<R: BufRead + Seek>(reader: &mut ByteReader<R>) -> Result<CiffHeader, DecodeError> {
    let magic = reader.read_fixed::<4>("ciff.magic")?;
    if magic != CIFF_MAGIC {
        return Err(DecodeError::BadMagic {
            expected: "CIFF",
            found: magic,
        });
    }

    let header_size = reader.read_u64_le("ciff.header_size")?;
    let content_size = reader.read_u64_le("ciff.content_size")?;
    let width = reader.read_u64_le("ciff.width")?;
    let height = reader.read_u64_le("ciff.height")?;

    // Caption plus its terminator must fit in what the header declares.
    let caption_limit = header_size.saturating_sub(FIXED_CIFF_HEADER_OVERHEAD - 1);
    let caption = reader
        .read_delimited_within(CAPTION_DELIMITER, caption_limit, "ciff.caption")?
        // the caption runs at least one byte past its limit
        .ok_or(DecodeError::TagBoundaryMismatch {
            declared: caption_limit,
            consumed: caption_limit + 1,
        })?;

    let region = validate::tag_region_len(header_size, caption.len() as u64)?;
    let mut consumed: u64 = 0;
    let mut tags = Vec::new();
    while consumed < region {
        let tag = reader
            .read_delimited_within(TAG_DELIMITER, region - consumed, "ciff.tag")?
            // likewise for a tag and the region boundary
            .ok_or(DecodeError::TagBoundaryMismatch {
                declared: region,
                consumed: region + 1,
            })?;
        consumed += tag.len() as u64 + 1;
        if !tag.is_empty() {
            tags.push(String::from_utf8_lossy(&tag).into_owned());
        }
    }
    validate::check_tag_boundary(region, consumed)?;

    Ok(CiffHeader {
        header_size,
        content_size,
        width,
        height,
        caption: String::from_utf8_lossy(&caption).into_owned(),
        tags,
    })
}

/// Read exactly `header.content_size` pixel bytes.
pub fn decode_pixels<R: BufRead + Seek>(
    reader: &mut ByteReader<R>,
    header: &CiffHeader,
) -> Result<Vec<u8>, DecodeError> {
    reader.read_bytes(header.content_size, "ciff.pixels")
}

/// Decode one CIFF image and validate it.
pub fn decode<R: BufRead + Seek>(reader: &mut ByteReader<R>, mode: CiffMode) -> Result<CiffImage, DecodeError> {
    if mode == CiffMode::Standalone {
        magic::locate(reader, &CIFF_MAGIC, "CIFF")?;
    }

    let header = decode_header(reader)?;
    if mode == CiffMode::Standalone {
        let remaining = reader.remaining()?;
        validate::check_standalone_remaining(header.content_size, remaining)?;
    }

    let pixels = decode_pixels(reader, &header)?;
    validate::check_pixel_buffer(header.width, header.height, pixels.len() as u64)?;
    validate::check_dimensions(header.width, header.height, header.content_size)?;

    tracing::debug!(
        width = header.width,
        height = header.height,
        tags = header.tags.len(),
        ?mode,
        "decoded CIFF image"
    );
    Ok(CiffImage { header, pixels })
}

impl CiffImage {
    /// Open a standalone .ciff file and decode it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DecodeError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Decode a standalone CIFF from any buffered, seekable source.
    pub fn from_reader<R: BufRead + Seek>(source: R) -> Result<Self, DecodeError> {
        decode(&mut ByteReader::new(source), CiffMode::Standalone)
    }

    /// Decode a standalone CIFF held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::from_reader(Cursor::new(bytes))
    }
}
