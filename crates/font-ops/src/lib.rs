//! Generic sfnt table manipulation utilities.
//!
//! These helpers are the only place that touches raw table data. Everything
//! above them works in terms of name IDs, strings and owned tables.

use anyhow::{Context, Result, bail};
use log::warn;
use read_fonts::{
    FontRef, TableProvider,
    tables::name::{Encoding, MacRomanMapping},
    types::NameId,
};
use write_fonts::{
    FontBuilder,
    tables::name::{Name, NameRecord},
};

/// Name table IDs touched by renaming.
pub mod name_id {
    pub const FAMILY: u16 = 1;
    pub const SUBFAMILY: u16 = 2;
    pub const FULL_NAME: u16 = 4;
    pub const POSTSCRIPT_NAME: u16 = 6;
    pub const TYPOGRAPHIC_FAMILY: u16 = 16;
    pub const TYPOGRAPHIC_SUBFAMILY: u16 = 17;
    pub const WWS_FAMILY: u16 = 21;
    pub const WWS_SUBFAMILY: u16 = 22;
}

/// Rewrite font data by applying a transformation function.
///
/// Copies all tables from the source font, then calls `f` to modify or add tables.
/// The function receives a reference to the source font and a mutable builder
/// that already contains all original tables.
pub fn rewrite_font(
    data: &[u8],
    f: impl FnOnce(&FontRef, &mut FontBuilder) -> Result<()>,
) -> Result<Vec<u8>> {
    let font = FontRef::new(data).context("Failed to parse font")?;
    let mut builder = FontBuilder::new();

    for record in font.table_directory.table_records() {
        let tag = record.tag();
        if let Some(table_data) = font.table_data(tag) {
            builder.add_raw(tag, table_data);
        }
    }

    f(&font, &mut builder)?;
    Ok(builder.build())
}

/// Map name table records using a transformation function.
///
/// The mapper receives `(name_id, current_string)` and returns:
/// - `Some(new_string)` to replace the record's string
/// - `None` to keep the current string unchanged
///
/// Platform, encoding and language IDs are carried over untouched. A
/// replacement that cannot be stored in a Mac Roman record is an error.
pub fn map_name_records(
    font: &FontRef,
    mut mapper: impl FnMut(u16, &str) -> Option<String>,
) -> Result<Name> {
    let name = font.name().context("Font has no name table")?;
    let mut new_records = Vec::new();

    for record in name.name_record() {
        let name_id = record.name_id().to_u16();
        let current = match record.string(name.string_data()) {
            Ok(s) => s.chars().collect::<String>(),
            Err(e) => {
                warn!("Dropping undecodable name record {name_id}: {e}");
                continue;
            }
        };

        let new_string = match mapper(name_id, &current) {
            Some(new_string) => {
                check_encodable(record.platform_id(), record.encoding_id(), name_id, &new_string)?;
                new_string
            }
            None => current,
        };

        new_records.push(NameRecord::new(
            record.platform_id(),
            record.encoding_id(),
            record.language_id(),
            NameId::new(name_id),
            new_string.into(),
        ));
    }

    Ok(Name::new(new_records))
}

/// Reject strings the record's encoding cannot represent.
fn check_encodable(platform_id: u16, encoding_id: u16, name_id: u16, value: &str) -> Result<()> {
    if Encoding::new(platform_id, encoding_id) == Encoding::MacRoman
        && let Some(c) = value.chars().find(|c| MacRomanMapping.encode(*c).is_none())
    {
        bail!("Name ID {name_id} is Mac Roman encoded and cannot hold '{c}' in “{value}”");
    }
    Ok(())
}
