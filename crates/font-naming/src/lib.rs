//! Font naming: inferring family/subfamily from a filename and rewriting
//! the name table records that must agree with them.

use std::path::Path;

use anyhow::Result;
use deunicode::deunicode;
use fixfont_font_ops::{map_name_records, name_id, rewrite_font};
use log::{debug, info};

/// Maximum length of a PostScript name (name ID 6).
pub const MAX_POSTSCRIPT_LEN: usize = 63;

/// Characters excluded from PostScript names on top of non-printables.
const POSTSCRIPT_RESERVED: &[char] = &[' ', '[', ']', '(', ')', '{', '}', '<', '>', '/', '%'];

/// The filename could not be split into family and subfamily.
#[derive(Debug, thiserror::Error)]
#[error("Could not figure out names from “{filename}”")]
pub struct NameInferenceError {
    pub filename: String,
}

/// Resolved family and subfamily for a font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontNaming {
    pub family: String,
    pub subfamily: String,
}

impl FontNaming {
    pub fn new(family: impl Into<String>, subfamily: impl Into<String>) -> Self {
        Self { family: family.into(), subfamily: subfamily.into() }
    }

    /// Resolve names from `path`, letting each explicit override win for its field.
    ///
    /// The file stem is split on its only hyphen, or failing that on its only
    /// space. Empty overrides count as absent.
    pub fn resolve(
        path: &Path,
        family: Option<&str>,
        subfamily: Option<&str>,
    ) -> Result<Self, NameInferenceError> {
        let family = family.filter(|s| !s.is_empty());
        let subfamily = subfamily.filter(|s| !s.is_empty());

        if let (Some(family), Some(subfamily)) = (family, subfamily) {
            return Ok(Self::new(family, subfamily));
        }

        let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        let (derived_family, derived_subfamily) =
            split_stem(&stem).ok_or_else(|| NameInferenceError { filename: stem.clone() })?;
        debug!("Derived names from “{stem}”: {derived_family:?} / {derived_subfamily:?}");

        Ok(Self::new(
            family.unwrap_or(derived_family),
            subfamily.unwrap_or(derived_subfamily),
        ))
    }

    /// Name ID 4: `"{family} {subfamily}"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.family, self.subfamily)
    }

    /// Name ID 6: sanitized family and subfamily joined by a hyphen,
    /// truncated to [`MAX_POSTSCRIPT_LEN`] characters.
    pub fn postscript_name(&self) -> String {
        format!("{}-{}", postscriptify(&self.family), postscriptify(&self.subfamily))
            .chars()
            .take(MAX_POSTSCRIPT_LEN)
            .collect()
    }

    /// The replacement string for `name_id`, or `None` if the record is not
    /// one of the tracked IDs.
    pub fn value_for(&self, id: u16) -> Option<String> {
        match id {
            name_id::FAMILY | name_id::TYPOGRAPHIC_FAMILY | name_id::WWS_FAMILY => {
                Some(self.family.clone())
            }
            name_id::SUBFAMILY | name_id::TYPOGRAPHIC_SUBFAMILY | name_id::WWS_SUBFAMILY => {
                Some(self.subfamily.clone())
            }
            name_id::FULL_NAME => Some(self.full_name()),
            name_id::POSTSCRIPT_NAME => Some(self.postscript_name()),
            _ => None,
        }
    }

    /// Apply this naming to sfnt font data.
    ///
    /// Rewrites name IDs 1, 2, 4, 6, 16, 17, 21 and 22 where present; every
    /// other record is kept as is. No records are added.
    pub fn apply(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut updated = 0;

        let out = rewrite_font(data, |font, builder| {
            let new_name = map_name_records(font, |id, _current| {
                let value = self.value_for(id);
                updated += usize::from(value.is_some());
                value
            })?;
            builder.add_table(&new_name)?;
            Ok(())
        })?;

        info!(
            "Set name to '{}' ({}), updated {updated} records",
            self.full_name(),
            self.postscript_name()
        );
        Ok(out)
    }
}

/// Split a file stem on its single hyphen, else on its single space.
fn split_stem(stem: &str) -> Option<(&str, &str)> {
    ['-', ' ']
        .into_iter()
        .find(|&sep| stem.matches(sep).count() == 1)
        .and_then(|sep| stem.split_once(sep))
}

/// Map arbitrary text to a PostScript-safe token.
///
/// Non-ASCII characters are transliterated first, then everything outside
/// the printable range 33..=126 and the reserved characters are dropped.
pub fn postscriptify(name: &str) -> String {
    deunicode(name)
        .chars()
        .filter(|c| (33..=126).contains(&(*c as u32)) && !POSTSCRIPT_RESERVED.contains(c))
        .collect()
}
