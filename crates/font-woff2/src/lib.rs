//! WOFF2 container handling.
//!
//! The font itself is decompressed to plain sfnt data so the table crates can
//! work on it. The optional extended metadata and private data blocks are kept
//! as raw bytes next to it and re-attached when the font is written back.
//!
//! # Example
//!
//! ```no_run
//! use fixfont_font_woff2::Woff2Font;
//!
//! let data = std::fs::read("Roboto-Bold.woff2").unwrap();
//! let mut font = Woff2Font::from_bytes(&data).unwrap();
//! font.strip_extended_metadata();
//! std::fs::write("Roboto-Bold.woff2", font.to_bytes().unwrap()).unwrap();
//! ```

use std::fmt;

use anyhow::{Context, Result, anyhow, bail};
use log::{debug, info};
use read_fonts::{FontData, types::Tag};
use ttf2woff2::{BrotliQuality, encode};
use wuff::decompress_woff2;

/// Size of the fixed WOFF2 header.
pub const HEADER_LEN: usize = 48;

const WOFF2_SIGNATURE: Tag = Tag::new(b"wOF2");
const WOFF_SIGNATURE: Tag = Tag::new(b"wOFF");

/// Byte offsets of the WOFF2 header fields that get patched.
mod header {
    pub const LENGTH: usize = 8;
    pub const META_OFFSET: usize = 28;
    pub const META_LENGTH: usize = 32;
    pub const META_ORIG_LENGTH: usize = 36;
    pub const PRIV_OFFSET: usize = 40;
    pub const PRIV_LENGTH: usize = 44;
}

/// Container flavor of a font file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Woff2,
    Woff,
    /// Anything else: TrueType, CFF, collections, garbage.
    Sfnt,
}

impl Flavor {
    /// Detect the flavor from the leading signature.
    pub fn detect(data: &[u8]) -> Self {
        match FontData::new(data).read_at::<Tag>(0) {
            Ok(tag) if tag == WOFF2_SIGNATURE => Flavor::Woff2,
            Ok(tag) if tag == WOFF_SIGNATURE => Flavor::Woff,
            _ => Flavor::Sfnt,
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Flavor::Woff2 => "woff2",
            Flavor::Woff => "woff",
            Flavor::Sfnt => "sfnt",
        })
    }
}

/// The extended metadata block, still brotli-compressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataBlock {
    pub compressed: Vec<u8>,
    /// Uncompressed length, as recorded in `metaOrigLength`.
    pub orig_length: u32,
}

/// A decompressed WOFF2 font plus its optional trailing blocks.
#[derive(Debug, Clone)]
pub struct Woff2Font {
    sfnt: Vec<u8>,
    metadata: Option<MetadataBlock>,
    private_data: Option<Vec<u8>>,
}

impl Woff2Font {
    /// Parse a WOFF2 file.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let flavor = Flavor::detect(data);
        if flavor != Flavor::Woff2 {
            bail!("Expected a WOFF2 font, found {flavor}");
        }

        let (metadata, private_data) = read_blocks(data)?;
        let sfnt: Vec<u8> = decompress_woff2(data)
            .map_err(|e| anyhow!("Failed to decompress WOFF2 data: {e:?}"))?
            .into();

        info!(
            "Loaded WOFF2 font: {} bytes sfnt, metadata: {}, private data: {}",
            sfnt.len(),
            metadata.is_some(),
            private_data.is_some()
        );
        Ok(Self { sfnt, metadata, private_data })
    }

    /// The decompressed sfnt data.
    pub fn sfnt(&self) -> &[u8] {
        &self.sfnt
    }

    /// Replace the sfnt data with the result of `f`.
    pub fn transform(&mut self, f: impl FnOnce(&[u8]) -> Result<Vec<u8>>) -> Result<()> {
        self.sfnt = f(&self.sfnt)?;
        Ok(())
    }

    pub fn metadata(&self) -> Option<&MetadataBlock> {
        self.metadata.as_ref()
    }

    pub fn private_data(&self) -> Option<&[u8]> {
        self.private_data.as_deref()
    }

    /// Drop both the extended metadata and the private data block.
    pub fn strip_extended_metadata(&mut self) {
        self.metadata = None;
        self.private_data = None;
        info!("Stripped extended metadata and private data");
    }

    /// Compress back to a WOFF2 file.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let woff2 = encode(&self.sfnt, BrotliQuality::default())
            .map_err(|e| anyhow!("Failed to compress WOFF2 data: {e:?}"))?;
        attach_blocks(woff2, self.metadata.as_ref(), self.private_data.as_deref())
    }
}

/// Read the metadata and private blocks referenced by the header.
fn read_blocks(data: &[u8]) -> Result<(Option<MetadataBlock>, Option<Vec<u8>>)> {
    if data.len() < HEADER_LEN {
        bail!("Truncated WOFF2 header ({} bytes)", data.len());
    }

    let font_data = FontData::new(data);
    let field = |offset: usize| font_data.read_at::<u32>(offset).map(|v| v as usize);

    let meta_offset = field(header::META_OFFSET)?;
    let meta_length = field(header::META_LENGTH)?;
    let meta_orig_length = font_data.read_at::<u32>(header::META_ORIG_LENGTH)?;
    let priv_offset = field(header::PRIV_OFFSET)?;
    let priv_length = field(header::PRIV_LENGTH)?;

    let block = |offset: usize, length: usize, what: &str| -> Result<Option<Vec<u8>>> {
        if length == 0 {
            return Ok(None);
        }
        data.get(offset..offset + length)
            .map(|bytes| Some(bytes.to_vec()))
            .with_context(|| format!("WOFF2 {what} block out of bounds"))
    };

    let metadata = block(meta_offset, meta_length, "metadata")?
        .map(|compressed| MetadataBlock { compressed, orig_length: meta_orig_length });
    let private_data = block(priv_offset, priv_length, "private data")?;

    Ok((metadata, private_data))
}

/// Append the metadata and private blocks to encoded WOFF2 data and point the
/// header at them. Each block starts on a 4-byte boundary.
fn attach_blocks(
    mut woff2: Vec<u8>,
    metadata: Option<&MetadataBlock>,
    private_data: Option<&[u8]>,
) -> Result<Vec<u8>> {
    if woff2.len() < HEADER_LEN {
        bail!("Encoder produced a truncated WOFF2 header");
    }
    if metadata.is_none() && private_data.is_none() {
        return Ok(woff2);
    }

    if let Some(meta) = metadata {
        pad4(&mut woff2);
        let offset = woff2.len();
        woff2.extend_from_slice(&meta.compressed);
        put_u32(&mut woff2, header::META_OFFSET, offset)?;
        put_u32(&mut woff2, header::META_LENGTH, meta.compressed.len())?;
        put_u32(&mut woff2, header::META_ORIG_LENGTH, meta.orig_length as usize)?;
        debug!("Metadata block at {offset}, {} bytes", meta.compressed.len());
    }

    if let Some(private) = private_data {
        pad4(&mut woff2);
        let offset = woff2.len();
        woff2.extend_from_slice(private);
        put_u32(&mut woff2, header::PRIV_OFFSET, offset)?;
        put_u32(&mut woff2, header::PRIV_LENGTH, private.len())?;
        debug!("Private data block at {offset}, {} bytes", private.len());
    }

    let total = woff2.len();
    put_u32(&mut woff2, header::LENGTH, total)?;
    Ok(woff2)
}

fn pad4(data: &mut Vec<u8>) {
    data.resize(data.len().next_multiple_of(4), 0);
}

fn put_u32(data: &mut [u8], offset: usize, value: usize) -> Result<()> {
    let value = u32::try_from(value).context("WOFF2 field exceeds 32 bits")?;
    data[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
    Ok(())
}
