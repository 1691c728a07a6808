//! Primitive reader: little-endian integers, fixed blocks and delimited strings
//! over a forward-only cursor.
//!
//! Every short read in the crate surfaces here as [`DecodeError::TruncatedInput`],
//! tagged with the field that was being read.

use std::io::{self, BufRead, Read, Seek, SeekFrom};

use thiserror::Error;

/// Errors produced while decoding CIFF or CAFF input.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("truncated input while reading {field}")]
    TruncatedInput { field: &'static str },
    #[error("magic {token:?} not found in input")]
    MagicNotFound { token: &'static str },
    #[error("invalid magic: expected {expected:?}, found {found:?}")]
    BadMagic { expected: &'static str, found: [u8; 4] },
    #[error("tag region does not match header size: expected {declared} bytes, consumed {consumed}")]
    TagBoundaryMismatch { declared: u64, consumed: u64 },
    #[error("content size {content_size} does not fit a {width}x{height} RGB image")]
    InvalidDimensions {
        width: u64,
        height: u64,
        content_size: u64,
    },
    #[error("content size mismatch: header declares {expected} bytes, stream holds {actual}")]
    SizeMismatch { expected: u64, actual: u64 },
    #[error("unknown block id: {0}")]
    UnknownBlockId(u8),
    #[error("container truncated: {declared} animations declared, {found} present")]
    TruncatedContainer { declared: u64, found: u64 },
    #[error("container has no credits block")]
    MissingCredits,
}

/// Fieldless category of a [`DecodeError`], for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    IoFailure,
    TruncatedInput,
    MagicNotFound,
    BadMagic,
    TagBoundaryMismatch,
    InvalidDimensions,
    SizeMismatch,
    UnknownBlockId,
    TruncatedContainer,
    MissingCredits,
}

impl DecodeError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::Io(_) => ErrorKind::IoFailure,
            DecodeError::TruncatedInput { .. } => ErrorKind::TruncatedInput,
            DecodeError::MagicNotFound { .. } => ErrorKind::MagicNotFound,
            DecodeError::BadMagic { .. } => ErrorKind::BadMagic,
            DecodeError::TagBoundaryMismatch { .. } => ErrorKind::TagBoundaryMismatch,
            DecodeError::InvalidDimensions { .. } => ErrorKind::InvalidDimensions,
            DecodeError::SizeMismatch { .. } => ErrorKind::SizeMismatch,
            DecodeError::UnknownBlockId(_) => ErrorKind::UnknownBlockId,
            DecodeError::TruncatedContainer { .. } => ErrorKind::TruncatedContainer,
            DecodeError::MissingCredits => ErrorKind::MissingCredits,
        }
    }
}

/// Saved cursor position, valid only for the reader that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(u64);

impl Mark {
    /// The position `n` bytes past this mark.
    #[must_use]
    pub fn advanced(self, n: u64) -> Mark {
        Mark(self.0 + n)
    }
}

/// Forward-only byte cursor over a buffered, seekable source.
///
/// Seeking is limited to [`ByteReader::rewind_to`] (used by the magic scanner)
/// and the non-moving [`ByteReader::remaining`] query.
pub struct ByteReader<R> {
    inner: R,
}

impl<R: BufRead + Seek> ByteReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Read exactly `N` bytes.
    pub fn read_fixed<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], DecodeError> {
        let mut buf = [0u8; N];
        self.inner.read_exact(&mut buf).map_err(|e| truncated(e, field))?;
        Ok(buf)
    }

    /// Read exactly `n` bytes. The buffer grows with the data actually read,
    /// so a bogus declared length cannot force a huge allocation.
    pub fn read_bytes(&mut self, n: u64, field: &'static str) -> Result<Vec<u8>, DecodeError> {
        let mut buf = Vec::new();
        (&mut self.inner).take(n).read_to_end(&mut buf)?;
        if (buf.len() as u64) < n {
            return Err(DecodeError::TruncatedInput { field });
        }
        Ok(buf)
    }

    pub fn read_u8(&mut self, field: &'static str) -> Result<u8, DecodeError> {
        Ok(self.read_fixed::<1>(field)?[0])
    }

    pub fn read_u16_le(&mut self, field: &'static str) -> Result<u16, DecodeError> {
        Ok(u16::from_le_bytes(self.read_fixed(field)?))
    }

    pub fn read_u64_le(&mut self, field: &'static str) -> Result<u64, DecodeError> {
        Ok(u64::from_le_bytes(self.read_fixed(field)?))
    }

    /// Read up to and including `delim`; the delimiter is not returned.
    pub fn read_delimited(&mut self, delim: u8, field: &'static str) -> Result<Vec<u8>, DecodeError> {
        let mut buf = Vec::new();
        self.inner.read_until(delim, &mut buf)?;
        if buf.pop() != Some(delim) {
            return Err(DecodeError::TruncatedInput { field });
        }
        Ok(buf)
    }

    /// Like [`ByteReader::read_delimited`], but gives up after `limit` bytes
    /// (delimiter included). Returns `None` when `limit` bytes were read
    /// without finding `delim`; a stream that ends first is still truncation.
    pub fn read_delimited_within(
        &mut self,
        delim: u8,
        limit: u64,
        field: &'static str,
    ) -> Result<Option<Vec<u8>>, DecodeError> {
        let mut buf = Vec::new();
        (&mut self.inner).take(limit).read_until(delim, &mut buf)?;
        if buf.last() == Some(&delim) {
            buf.pop();
            return Ok(Some(buf));
        }
        if (buf.len() as u64) < limit {
            return Err(DecodeError::TruncatedInput { field });
        }
        Ok(None)
    }

    /// Skip `n` bytes without keeping them.
    pub fn skip(&mut self, n: u64, field: &'static str) -> Result<(), DecodeError> {
        let skipped = io::copy(&mut (&mut self.inner).take(n), &mut io::sink())?;
        if skipped < n {
            return Err(DecodeError::TruncatedInput { field });
        }
        Ok(())
    }

    pub fn position(&mut self) -> Result<u64, DecodeError> {
        Ok(self.inner.stream_position()?)
    }

    pub fn mark(&mut self) -> Result<Mark, DecodeError> {
        Ok(Mark(self.position()?))
    }

    pub fn rewind_to(&mut self, mark: Mark) -> Result<(), DecodeError> {
        self.inner.seek(SeekFrom::Start(mark.0))?;
        Ok(())
    }

    /// Bytes between the cursor and the end of the stream. The cursor does not move.
    pub fn remaining(&mut self) -> Result<u64, DecodeError> {
        let here = self.inner.stream_position()?;
        let end = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(here))?;
        Ok(end.saturating_sub(here))
    }

    /// True when no byte is left to read.
    pub fn is_at_end(&mut self) -> Result<bool, DecodeError> {
        Ok(self.inner.fill_buf()?.is_empty())
    }
}

fn truncated(err: io::Error, field: &'static str) -> DecodeError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        DecodeError::TruncatedInput { field }
    } else {
        DecodeError::Io(err)
    }
}
