//! Font file I/O and output path derivation.

use std::{
    fs::{read, write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

/// A font file handle for I/O operations.
#[derive(Debug, Clone)]
pub struct FontFile {
    path: PathBuf,
}

impl FontFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read font data from the file.
    pub fn read(&self) -> Result<Vec<u8>> {
        read(&self.path).with_context(|| format!("Failed to read font: {}", self.path.display()))
    }

    /// Write font data to the file, replacing any existing file.
    pub fn write(&self, data: impl AsRef<[u8]>) -> Result<()> {
        write(&self.path, data)
            .with_context(|| format!("Failed to write font: {}", self.path.display()))
    }
}

/// Pick an output path next to `input` that does not exist yet.
///
/// A trailing `#<n>` is dropped from the stem, then `<stem><ext>` is tried,
/// then `<stem>#1<ext>`, `<stem>#2<ext>`, ...
pub fn make_output_path(input: &Path) -> PathBuf {
    let dir = input.parent().unwrap_or(Path::new(""));
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let stem = strip_counter(&stem);
    let ext = input
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let mut candidate = dir.join(format!("{stem}{ext}"));
    let mut n = 1;
    while candidate.exists() {
        candidate = dir.join(format!("{stem}#{n}{ext}"));
        n += 1;
    }
    candidate
}

/// `Foo#12` -> `Foo`; anything else is returned unchanged.
fn strip_counter(stem: &str) -> &str {
    match stem.rsplit_once('#') {
        Some((base, n)) if !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()) => base,
        _ => stem,
    }
}
