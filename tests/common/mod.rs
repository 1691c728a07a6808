//! Byte-level fixture builders for CIFF and CAFF test inputs.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// A CIFF image to serialize. Sizes are derived from the contents unless overridden.
#[derive(Debug, Clone)]
pub struct CiffFixture {
    pub width: u64,
    pub height: u64,
    pub caption: String,
    pub tags: Vec<String>,
    pub pixels: Vec<u8>,
    pub header_size: Option<u64>,
    pub content_size: Option<u64>,
}

impl CiffFixture {
    /// `width` x `height` image with a repeating byte pattern.
    pub fn new(width: u64, height: u64) -> Self {
        let len = (width * height * 3) as usize;
        Self {
            width,
            height,
            caption: String::new(),
            tags: Vec::new(),
            pixels: (0..len).map(|i| (i % 251) as u8).collect(),
            header_size: None,
            content_size: None,
        }
    }

    pub fn caption(mut self, caption: &str) -> Self {
        self.caption = caption.to_string();
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    pub fn pixels(mut self, pixels: Vec<u8>) -> Self {
        self.pixels = pixels;
        self
    }

    pub fn header_size(mut self, n: u64) -> Self {
        self.header_size = Some(n);
        self
    }

    pub fn content_size(mut self, n: u64) -> Self {
        self.content_size = Some(n);
        self
    }

    pub fn computed_header_size(&self) -> u64 {
        37 + self.caption.len() as u64 + self.tags.iter().map(|t| t.len() as u64 + 1).sum::<u64>()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"CIFF");
        out.extend_from_slice(&self.header_size.unwrap_or_else(|| self.computed_header_size()).to_le_bytes());
        out.extend_from_slice(&self.content_size.unwrap_or(self.pixels.len() as u64).to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(self.caption.as_bytes());
        out.push(b'\n');
        for tag in &self.tags {
            out.extend_from_slice(tag.as_bytes());
            out.push(0);
        }
        out.extend_from_slice(&self.pixels);
        out
    }
}

/// Same bytes the reference example generator writes: 200x200 white,
/// empty caption, one padding terminator, header size 38.
pub fn example_generator_ciff() -> Vec<u8> {
    let (width, height) = (200u64, 200u64);
    let mut out = Vec::new();
    out.extend_from_slice(b"CIFF");
    out.extend_from_slice(&(4u64 + 8 * 4 + 1 + 1).to_le_bytes());
    out.extend_from_slice(&(width * height * 3).to_le_bytes());
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.push(b'\n');
    out.push(0);
    out.extend(std::iter::repeat(255u8).take((width * height * 3) as usize));
    out
}

/// Credits block fields.
#[derive(Debug, Clone)]
pub struct Credits {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub creator: String,
}

impl Credits {
    pub fn sample() -> Self {
        Self {
            year: 2023,
            month: 11,
            day: 5,
            hour: 14,
            minute: 30,
            creator: "Test Creator".to_string(),
        }
    }

    pub fn payload(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.year.to_le_bytes());
        out.extend_from_slice(&[self.month, self.day, self.hour, self.minute]);
        out.extend_from_slice(&(self.creator.len() as u64).to_le_bytes());
        out.extend_from_slice(self.creator.as_bytes());
        out
    }
}

/// A CAFF container to serialize, block by block.
#[derive(Debug, Clone, Default)]
pub struct CaffFixture {
    pub prefix: Vec<u8>,
    pub num_animations: Option<u64>,
    pub blocks: Vec<u8>,
    pub trailer: Vec<u8>,
    animations: u64,
}

impl CaffFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written before the "CAFF" magic.
    pub fn prefix(mut self, bytes: &[u8]) -> Self {
        self.prefix = bytes.to_vec();
        self
    }

    /// Override the declared animation count (defaults to the number of animation blocks added).
    pub fn num_animations(mut self, n: u64) -> Self {
        self.num_animations = Some(n);
        self
    }

    pub fn raw_block(mut self, id: u8, length: u64, payload: &[u8]) -> Self {
        self.blocks.push(id);
        self.blocks.extend_from_slice(&length.to_le_bytes());
        self.blocks.extend_from_slice(payload);
        self
    }

    pub fn credits(self, credits: &Credits) -> Self {
        let payload = credits.payload();
        self.raw_block(2, payload.len() as u64, &payload)
    }

    pub fn animation(mut self, duration: u64, ciff: &[u8]) -> Self {
        self.animations += 1;
        let mut payload = duration.to_le_bytes().to_vec();
        payload.extend_from_slice(ciff);
        self.raw_block(3, payload.len() as u64, &payload)
    }

    /// Bytes appended after the last block.
    pub fn trailer(mut self, bytes: &[u8]) -> Self {
        self.trailer = bytes.to_vec();
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.prefix.clone();
        out.extend_from_slice(b"CAFF");
        out.extend_from_slice(&20u64.to_le_bytes());
        out.extend_from_slice(&self.num_animations.unwrap_or(self.animations).to_le_bytes());
        out.extend_from_slice(&self.blocks);
        out.extend_from_slice(&self.trailer);
        out
    }
}

/// Write `bytes` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
