//! CAFF/CIFF — decoder for CrySyS animation (.caff) and image (.ciff) files.
//!
//! This crate provides:
//! - **Format types** (`format`): records, field widths, constants (CIFF_MAGIC, FIXED_CIFF_HEADER_OVERHEAD, etc.).
//! - **Reader** (`reader`): `ByteReader`, the bounds-checked little-endian cursor, and `DecodeError`.
//! - **Decoders** (`ciff`, `caff`): `CiffImage::open(path)` and `CaffContainer::open(path)`.
//! - **Validator** (`validate`): pure cross-field checks shared by both decoders.
//! - **Export** (`export`): write decoded images as JPEG (binary `caff-parser`).

pub mod caff;
pub mod ciff;
pub mod config;
pub mod export;
pub mod format;
pub mod magic;
pub mod reader;
pub mod validate;

pub use caff::BlockKind;
pub use ciff::CiffMode;
pub use config::{ConfigError, ExportConfig};
pub use export::{export_caff, export_ciff, jpeg_path_for, write_jpeg, ExportError};
pub use format::{
    CaffContainer, CaffCredits, CaffFrame, CaffHeader, CiffHeader, CiffImage, CAFF_MAGIC, CIFF_MAGIC,
    FIXED_CIFF_HEADER_OVERHEAD,
};
pub use reader::{ByteReader, DecodeError, ErrorKind};
