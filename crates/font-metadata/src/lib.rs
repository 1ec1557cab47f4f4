//! Style attribute manipulation (weight class, width class, italic flags).
//!
//! Fields are patched in the raw table bytes so bits that the table types
//! do not model (reserved `fsSelection`/`macStyle` bits) survive untouched.

use anyhow::{Context, Result};
use fixfont_font_ops::rewrite_font;
use log::info;
use read_fonts::{FontData, FontRef, types::Tag};

const OS2: Tag = Tag::new(b"OS/2");
const HEAD: Tag = Tag::new(b"head");

/// Byte offsets of the patched fields.
mod offset {
    pub const OS2_WEIGHT_CLASS: usize = 4;
    pub const OS2_WIDTH_CLASS: usize = 6;
    pub const OS2_FS_SELECTION: usize = 62;
    pub const HEAD_MAC_STYLE: usize = 44;
}

/// `OS/2.fsSelection` bit 0.
pub const FS_SELECTION_ITALIC: u16 = 0x0001;
/// `head.macStyle` bit 1.
pub const MAC_STYLE_ITALIC: u16 = 0x0002;

/// Requested change to the italic style bits.
///
/// Absence (`None` in [`StyleSettings::italic`]) leaves both bits alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItalicChange {
    Set,
    Clear,
}

impl ItalicChange {
    pub fn from_flag(italic: bool) -> Self {
        if italic { Self::Set } else { Self::Clear }
    }

    /// Set or clear `bit` in `value`; every other bit is kept.
    pub fn apply_bit(self, value: u16, bit: u16) -> u16 {
        match self {
            Self::Set => value | bit,
            Self::Clear => value & !bit,
        }
    }
}

/// Style attribute settings. Every field is optional; `None` means untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StyleSettings {
    /// `OS/2.usWeightClass`, set verbatim.
    pub weight_class: Option<u16>,
    /// `OS/2.usWidthClass`, set verbatim.
    pub width_class: Option<u16>,
    pub italic: Option<ItalicChange>,
}

impl StyleSettings {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply style settings to sfnt font data.
    ///
    /// Modifies the OS/2 table, and the head table when the italic state changes.
    /// Fonts without the needed tables are rejected.
    pub fn apply(&self, data: &[u8]) -> Result<Vec<u8>> {
        if self.is_empty() {
            return Ok(data.to_vec());
        }

        rewrite_font(data, |font, builder| {
            let mut os2 = raw_table(font, OS2)?;

            if let Some(weight) = self.weight_class {
                let old = update_u16(&mut os2, offset::OS2_WEIGHT_CLASS, |_| weight)?;
                info!("Weight class: {old} -> {weight}");
            }
            if let Some(width) = self.width_class {
                let old = update_u16(&mut os2, offset::OS2_WIDTH_CLASS, |_| width)?;
                info!("Width class: {old} -> {width}");
            }
            if let Some(italic) = self.italic {
                let mut head = raw_table(font, HEAD)?;
                update_u16(&mut os2, offset::OS2_FS_SELECTION, |v| {
                    italic.apply_bit(v, FS_SELECTION_ITALIC)
                })?;
                update_u16(&mut head, offset::HEAD_MAC_STYLE, |v| {
                    italic.apply_bit(v, MAC_STYLE_ITALIC)
                })?;
                info!("Italic flags: {italic:?}");
                builder.add_raw(HEAD, head);
            }

            builder.add_raw(OS2, os2);
            Ok(())
        })
    }
}

/// An owned copy of a table's bytes.
fn raw_table(font: &FontRef, tag: Tag) -> Result<Vec<u8>> {
    font.table_data(tag)
        .map(|data| data.as_ref().to_vec())
        .with_context(|| format!("Font has no {tag} table"))
}

/// Replace the big-endian `u16` at `offset` with `f(old)`, returning `old`.
fn update_u16(table: &mut [u8], offset: usize, f: impl FnOnce(u16) -> u16) -> Result<u16> {
    let old = FontData::new(table)
        .read_at::<u16>(offset)
        .with_context(|| format!("Table too short for field at offset {offset}"))?;
    table[offset..offset + 2].copy_from_slice(&f(old).to_be_bytes());
    Ok(old)
}
