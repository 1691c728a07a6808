//! Magic-token scanner for top-level container entry.
//!
//! Producers may place arbitrary bytes (for CAFF, typically the header block's
//! id and length) before the magic. Nested blocks are read at fixed offsets and
//! never scanned.

use std::io::{BufRead, Seek};

use crate::reader::{ByteReader, DecodeError};

/// Advance to the first occurrence of `token`, leaving the cursor on its first byte.
///
/// `name` is reported in [`DecodeError::MagicNotFound`] when the stream ends
/// without a match.
pub fn locate<R: BufRead + Seek>(
    reader: &mut ByteReader<R>,
    token: &[u8; 4],
    name: &'static str,
) -> Result<(), DecodeError> {
    let start = reader.mark()?;
    let mut window = [0u8; 4];
    let mut consumed: u64 = 0;

    loop {
        let byte = match reader.read_u8("magic") {
            Ok(b) => b,
            Err(DecodeError::TruncatedInput { .. }) => {
                return Err(DecodeError::MagicNotFound { token: name });
            }
            Err(e) => return Err(e),
        };
        window.rotate_left(1);
        window[3] = byte;
        consumed += 1;

        if consumed >= 4 && &window == token {
            let skipped = consumed - 4;
            if skipped > 0 {
                tracing::debug!(skipped, token = name, "skipped leading bytes before magic");
            }
            return reader.rewind_to(start.advanced(skipped));
        }
    }
}
