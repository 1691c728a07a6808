//! CAFF decoder: locate the header, then walk credits and animation blocks
//! until the declared number of animations has been read.
//!
//! Only `num_animations` is authoritative for where the container ends: the
//! decoder checks the count after every block and reads nothing past the block
//! that completes it. The per-block length is advisory; it is compared against
//! what was actually consumed and a disagreement is only traced.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Seek};
use std::path::Path;

use tracing::{debug, warn};

use crate::ciff::{self, CiffMode};
use crate::format::{
    CaffContainer, CaffCredits, CaffFrame, CaffHeader, BLOCK_ID_ANIMATION, BLOCK_ID_CREDITS,
    CAFF_HEADER_LEN, CAFF_MAGIC,
};
use crate::magic;
use crate::reader::{ByteReader, DecodeError};

/// Kind of a CAFF block, from its id byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Credits,
    Animation,
    Unknown(u8),
}

impl From<u8> for BlockKind {
    fn from(id: u8) -> Self {
        match id {
            BLOCK_ID_CREDITS => BlockKind::Credits,
            BLOCK_ID_ANIMATION => BlockKind::Animation,
            other => BlockKind::Unknown(other),
        }
    }
}

/// Decoder states. Each transition consumes input; `Done` carries the result.
enum State {
    AwaitHeaderBlock,
    AwaitBlocks(Progress),
    Done(CaffContainer),
}

/// What has been collected while in `AwaitBlocks`.
struct Progress {
    header: CaffHeader,
    credits: Option<CaffCredits>,
    frames: Vec<CaffFrame>,
}

impl Progress {
    fn new(header: CaffHeader) -> Self {
        Self {
            header,
            credits: None,
            frames: Vec::new(),
        }
    }

    fn animations_seen(&self) -> u64 {
        self.frames.len() as u64
    }

    fn all_animations_seen(&self) -> bool {
        self.animations_seen() == self.header.num_animations
    }

    /// Result of reaching end of stream before the container was complete.
    fn end_of_stream(&self) -> DecodeError {
        if self.all_animations_seen() {
            DecodeError::MissingCredits
        } else {
            DecodeError::TruncatedContainer {
                declared: self.header.num_animations,
                found: self.animations_seen(),
            }
        }
    }

    /// Close the container once the declared count is reached. Credits must
    /// have been read by then; nothing after this block is looked at.
    fn finish(self) -> Result<CaffContainer, DecodeError> {
        let credits = self.credits.ok_or(DecodeError::MissingCredits)?;
        Ok(CaffContainer {
            header: self.header,
            credits,
            frames: self.frames,
        })
    }
}

/// Read the fixed CAFF header at the cursor.
pub fn decode_header<R: BufRead + Seek>(reader: &mut ByteReader<R>) -> Result<CaffHeader, DecodeError> {
    let magic = reader.read_fixed::<4>("caff.magic")?;
    if magic != CAFF_MAGIC {
        return Err(DecodeError::BadMagic {
            expected: "CAFF",
            found: magic,
        });
    }
    let header_size = reader.read_u64_le("caff.header_size")?;
    let num_animations = reader.read_u64_le("caff.num_animations")?;
    if header_size != CAFF_HEADER_LEN {
        debug!(header_size, "CAFF header declares a non-standard size");
    }
    Ok(CaffHeader {
        header_size,
        num_animations,
    })
}

/// Read a credits block payload.
pub fn decode_credits<R: BufRead + Seek>(reader: &mut ByteReader<R>) -> Result<CaffCredits, DecodeError> {
    let year = reader.read_u16_le("credits.year")?;
    let month = reader.read_u8("credits.month")?;
    let day = reader.read_u8("credits.day")?;
    let hour = reader.read_u8("credits.hour")?;
    let minute = reader.read_u8("credits.minute")?;
    let creator_len = reader.read_u64_le("credits.creator_len")?;
    let creator = reader.read_bytes(creator_len, "credits.creator")?;
    Ok(CaffCredits {
        year,
        month,
        day,
        hour,
        minute,
        creator: String::from_utf8_lossy(&creator).into_owned(),
    })
}

/// Read an animation block payload: duration, then an embedded CIFF.
pub fn decode_animation<R: BufRead + Seek>(reader: &mut ByteReader<R>) -> Result<CaffFrame, DecodeError> {
    let duration = reader.read_u64_le("animation.duration")?;
    let image = ciff::decode(reader, CiffMode::Embedded)?;
    Ok(CaffFrame { duration, image })
}

/// Read one block header and dispatch on its kind.
fn decode_block<R: BufRead + Seek>(reader: &mut ByteReader<R>, progress: &mut Progress) -> Result<(), DecodeError> {
    let id = reader.read_u8("block.id")?;
    let length = reader.read_u64_le("block.length")?;
    let start = reader.position()?;

    match BlockKind::from(id) {
        BlockKind::Credits => {
            let credits = decode_credits(reader)?;
            if progress.credits.replace(credits).is_some() {
                warn!("duplicate credits block; keeping the later one");
            }
        }
        BlockKind::Animation => {
            let frame = decode_animation(reader)?;
            // only reachable with num_animations == 0
            if progress.all_animations_seen() {
                debug!("animation block in a container that declares none");
            } else {
                progress.frames.push(frame);
            }
        }
        BlockKind::Unknown(id) => return Err(DecodeError::UnknownBlockId(id)),
    }

    let consumed = reader.position()?.saturating_sub(start);
    if consumed != length {
        debug!(id, declared = length, consumed, "block length disagrees with payload");
    }
    Ok(())
}

/// Decode a CAFF container, scanning for its magic first.
pub fn decode<R: BufRead + Seek>(reader: &mut ByteReader<R>) -> Result<CaffContainer, DecodeError> {
    let mut state = State::AwaitHeaderBlock;
    loop {
        state = match state {
            State::AwaitHeaderBlock => {
                magic::locate(reader, &CAFF_MAGIC, "CAFF")?;
                let header = decode_header(reader)?;
                debug!(num_animations = header.num_animations, "decoded CAFF header");
                State::AwaitBlocks(Progress::new(header))
            }
            State::AwaitBlocks(mut progress) => {
                if reader.is_at_end()? {
                    return Err(progress.end_of_stream());
                }
                decode_block(reader, &mut progress)?;
                if progress.all_animations_seen() {
                    State::Done(progress.finish()?)
                } else {
                    State::AwaitBlocks(progress)
                }
            }
            State::Done(container) => {
                debug!(frames = container.frames.len(), "decoded CAFF container");
                return Ok(container);
            }
        };
    }
}

impl CaffContainer {
    /// Open a .caff file and decode it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DecodeError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Decode a CAFF from any buffered, seekable source.
    pub fn from_reader<R: BufRead + Seek>(source: R) -> Result<Self, DecodeError> {
        decode(&mut ByteReader::new(source))
    }

    /// Decode a CAFF held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::from_reader(Cursor::new(bytes))
    }
}
