//! CIFF/CAFF binary format types and constants.
//!
//! Defines field widths, magic tokens, block ids and the decoded record types
//! for both formats. All multi-byte integers are little-endian.

#[cfg(feature = "serde")]
use serde::Serialize;

/// Magic bytes at the start of every CIFF image: "CIFF".
pub const CIFF_MAGIC: [u8; 4] = *b"CIFF";

/// Magic bytes at the start of every CAFF header: "CAFF".
pub const CAFF_MAGIC: [u8; 4] = *b"CAFF";

/// Width of the magic token in bytes.
pub const MAGIC_LEN: u64 = 4;

/// Width of every 8-byte integer field (sizes, dimensions, lengths, durations).
pub const U64_FIELD_LEN: u64 = 8;

/// Terminates the CIFF caption.
pub const CAPTION_DELIMITER: u8 = b'\n';

/// Terminates each CIFF tag.
pub const TAG_DELIMITER: u8 = 0;

/// Bytes of a CIFF header that do not depend on caption or tags:
/// magic + header_size + content_size + width + height + caption terminator.
pub const FIXED_CIFF_HEADER_OVERHEAD: u64 = MAGIC_LEN + 4 * U64_FIELD_LEN + 1;

/// Size of the CAFF header as written by conforming producers:
/// magic + header_size + num_animations.
pub const CAFF_HEADER_LEN: u64 = MAGIC_LEN + 2 * U64_FIELD_LEN;

/// Bytes per pixel (RGB).
pub const BYTES_PER_PIXEL: u64 = 3;

/// Block id of the CAFF credits block.
pub const BLOCK_ID_CREDITS: u8 = 2;

/// Block id of a CAFF animation block.
pub const BLOCK_ID_ANIMATION: u8 = 3;

/// Parsed CIFF header.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CiffHeader {
    /// Declared length of the header region, magic through last tag terminator.
    pub header_size: u64,
    /// Declared pixel buffer length in bytes.
    pub content_size: u64,
    pub width: u64,
    pub height: u64,
    pub caption: String,
    /// Non-empty tags in file order. Lone `\0` padding is not recorded.
    pub tags: Vec<String>,
}

impl CiffHeader {
    /// Header size implied by the caption and recorded tags.
    ///
    /// Equals `header_size` for every header whose tag region carries no
    /// padding terminators.
    #[must_use]
    pub fn expected_header_size(&self) -> u64 {
        crate::validate::expected_header_size(
            self.caption.len() as u64,
            self.tags.iter().map(|t| t.len() as u64),
        )
    }
}

/// A decoded CIFF image: header plus row-major RGB pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CiffImage {
    pub header: CiffHeader,
    /// `header.content_size` bytes of RGB triples.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub pixels: Vec<u8>,
}

impl CiffImage {
    #[must_use]
    pub fn width(&self) -> u64 {
        self.header.width
    }

    #[must_use]
    pub fn height(&self) -> u64 {
        self.header.height
    }

    /// True when either dimension is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.header.width == 0 || self.header.height == 0
    }
}

/// Parsed CAFF header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CaffHeader {
    /// Declared header size (20 for conforming files; not enforced).
    pub header_size: u64,
    /// Number of animation blocks that follow.
    pub num_animations: u64,
}

/// Contents of the CAFF credits block.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CaffCredits {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    /// Creator name; length-prefixed in the file, not terminated.
    pub creator: String,
}

/// One animation block: an embedded CIFF image and how long it is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CaffFrame {
    /// Display duration in milliseconds.
    pub duration: u64,
    pub image: CiffImage,
}

/// A decoded CAFF container.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CaffContainer {
    pub header: CaffHeader,
    pub credits: CaffCredits,
    /// Exactly `header.num_animations` frames, in block order.
    pub frames: Vec<CaffFrame>,
}

impl CaffContainer {
    /// Images in block order, without their durations.
    pub fn images(&self) -> impl Iterator<Item = &CiffImage> {
        self.frames.iter().map(|f| &f.image)
    }

    /// The first animation frame's image, if the container has any.
    #[must_use]
    pub fn first_image(&self) -> Option<&CiffImage> {
        self.frames.first().map(|f| &f.image)
    }
}
