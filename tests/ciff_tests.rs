//! CIFF decoder tests: standalone files, header accounting and validation failures.

mod common;

use std::io::Cursor;

use caff::ciff::{self, CiffMode};
use caff::{ByteReader, CiffImage, DecodeError, ErrorKind};
use common::{example_generator_ciff, write_file, CiffFixture};

/// The example generator's 200x200 white image decodes with no tags.
#[test]
fn example_generator_output_decodes() {
    let image = CiffImage::from_bytes(&example_generator_ciff()).unwrap();
    assert_eq!(image.header.width, 200);
    assert_eq!(image.header.height, 200);
    assert_eq!(image.header.content_size, 120_000);
    assert_eq!(image.header.header_size, 38);
    assert_eq!(image.header.caption, "");
    assert!(image.header.tags.is_empty());
    assert_eq!(image.pixels.len(), 120_000);
    assert!(image.pixels.iter().all(|&b| b == 255));
}

/// Caption and tags come back in order and account for the declared header size.
#[test]
fn caption_and_tags() {
    let fixture = CiffFixture::new(3, 2)
        .caption("Beautiful scenery")
        .tag("landscape")
        .tag("sunset")
        .tag("mountains");
    let image = CiffImage::from_bytes(&fixture.to_bytes()).unwrap();

    assert_eq!(image.header.caption, "Beautiful scenery");
    assert_eq!(image.header.tags, ["landscape", "sunset", "mountains"]);
    assert_eq!(image.header.header_size, fixture.computed_header_size());
    assert_eq!(image.header.expected_header_size(), image.header.header_size);
    assert_eq!(image.pixels, fixture.pixels);
}

/// A lone terminator in the tag region is padding, not an empty tag.
#[test]
fn empty_tags_are_padding() {
    let fixture = CiffFixture::new(1, 1).tag("a").tag("").tag("b");
    let image = CiffImage::from_bytes(&fixture.to_bytes()).unwrap();
    assert_eq!(image.header.tags, ["a", "b"]);
}

/// Junk before the magic is skipped in standalone mode.
#[test]
fn junk_before_magic_is_skipped() {
    let mut bytes = b"\x00\x01junkCIF".to_vec();
    bytes.extend_from_slice(&CiffFixture::new(2, 2).caption("x").to_bytes());
    let image = CiffImage::from_bytes(&bytes).unwrap();
    assert_eq!(image.header.caption, "x");
    assert_eq!(image.pixels.len(), 12);
}

#[test]
fn missing_magic() {
    let err = CiffImage::from_bytes(b"this is not an image").unwrap_err();
    assert!(matches!(err, DecodeError::MagicNotFound { token: "CIFF" }));
}

/// Embedded records are read in place, so a wrong token is BadMagic, not a scan.
#[test]
fn embedded_bad_magic() {
    let mut bytes = CiffFixture::new(1, 1).to_bytes();
    bytes[3] = b'X';
    let mut reader = ByteReader::new(Cursor::new(bytes.as_slice()));
    let err = ciff::decode(&mut reader, CiffMode::Embedded).unwrap_err();
    assert!(matches!(err, DecodeError::BadMagic { expected: "CIFF", found } if &found == b"CIFX"));
}

/// Cutting the stream inside an 8-byte field is truncation, never a partial record.
#[test]
fn truncated_mid_header() {
    let bytes = CiffFixture::new(2, 2).to_bytes();
    // magic + header_size + 3 bytes of content_size
    let err = CiffImage::from_bytes(&bytes[..4 + 8 + 3]).unwrap_err();
    match err {
        DecodeError::TruncatedInput { field } => assert_eq!(field, "ciff.content_size"),
        other => panic!("expected truncation, got {other:?}"),
    }
}

#[test]
fn truncated_inside_caption() {
    let bytes = CiffFixture::new(1, 1).caption("long caption").to_bytes();
    let err = CiffImage::from_bytes(&bytes[..40]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TruncatedInput);
}

/// Declared header one byte short: the last tag would cross the boundary.
#[test]
fn tag_overshoot() {
    let fixture = CiffFixture::new(1, 1).tag("ab");
    let bytes = fixture.clone().header_size(fixture.computed_header_size() - 1).to_bytes();
    let err = CiffImage::from_bytes(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TagBoundaryMismatch);
}

/// Declared header too long: the tag region runs into pixel data.
#[test]
fn tag_region_too_long() {
    let fixture = CiffFixture::new(2, 2).tag("ab").pixels(vec![0xff; 12]);
    let bytes = fixture.clone().header_size(fixture.computed_header_size() + 2).to_bytes();
    let err = CiffImage::from_bytes(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TagBoundaryMismatch);
}

/// A 37-byte header leaves room for the caption terminator only; the overflow
/// is reported against that one-byte limit.
#[test]
fn header_too_small_for_caption() {
    let bytes = CiffFixture::new(1, 1).caption("hello").header_size(37).to_bytes();
    let err = CiffImage::from_bytes(&bytes).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::TagBoundaryMismatch { declared: 1, consumed: 2 }
    ));
}

/// Declared content size 100 with only 90 bytes left.
#[test]
fn standalone_missing_bytes() {
    let bytes = CiffFixture::new(2, 2).pixels(vec![7; 90]).content_size(100).to_bytes();
    let err = CiffImage::from_bytes(&bytes).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::SizeMismatch {
            expected: 100,
            actual: 90
        }
    ));
}

#[test]
fn standalone_trailing_bytes() {
    let mut bytes = CiffFixture::new(2, 2).to_bytes();
    bytes.extend_from_slice(&[1, 2, 3]);
    let err = CiffImage::from_bytes(&bytes).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::SizeMismatch {
            expected: 12,
            actual: 15
        }
    ));
}

/// Zero width with a non-empty pixel buffer.
#[test]
fn zero_area_with_pixels() {
    let bytes = CiffFixture::new(0, 5).pixels(vec![1, 2, 3]).to_bytes();
    let err = CiffImage::from_bytes(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidDimensions);
}

#[test]
fn zero_area_without_pixels() {
    let image = CiffImage::from_bytes(&CiffFixture::new(0, 0).to_bytes()).unwrap();
    assert!(image.is_empty());
    assert!(image.pixels.is_empty());
}

#[test]
fn content_size_disagrees_with_dimensions() {
    let bytes = CiffFixture::new(2, 2).pixels(vec![0; 9]).to_bytes();
    let err = CiffImage::from_bytes(&bytes).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::InvalidDimensions {
            width: 2,
            height: 2,
            content_size: 9
        }
    ));
}

/// Invalid UTF-8 in the caption is replaced, while byte accounting still holds.
#[test]
fn non_utf8_caption() {
    let mut bytes = CiffFixture::new(1, 1).header_size(37 + 2).to_bytes();
    // splice two invalid bytes in front of the caption terminator
    let caption_at = 4 + 32;
    bytes.splice(caption_at..caption_at, [0xff, 0xfe]);
    let image = CiffImage::from_bytes(&bytes).unwrap();
    assert_eq!(image.header.caption, "\u{fffd}\u{fffd}");
    assert!(image.header.tags.is_empty());
}

#[test]
fn open_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "image.ciff", &CiffFixture::new(4, 3).caption("file").to_bytes());
    let image = CiffImage::open(&path).unwrap();
    assert_eq!((image.width(), image.height()), (4, 3));
    assert_eq!(image.header.caption, "file");
}

#[test]
fn open_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = CiffImage::open(dir.path().join("nope.ciff")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IoFailure);
}
