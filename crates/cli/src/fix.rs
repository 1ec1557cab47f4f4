//! The single-pass fix pipeline.

use std::path::PathBuf;

use anyhow::{Context, Result};
use fixfont_font_metadata::StyleSettings;
use fixfont_font_naming::FontNaming;
use fixfont_font_woff2::{Flavor, Woff2Font};
use log::info;

use crate::{
    error::FixError,
    io::{FontFile, make_output_path},
};

/// Everything one run needs, fixed before any file is touched.
#[derive(Debug, Clone, Default)]
pub struct FixOptions {
    pub input: PathBuf,
    /// Explicit output path; derived from `input` when `None`.
    pub output: Option<PathBuf>,
    pub family_name: Option<String>,
    pub subfamily_name: Option<String>,
    /// Rewrite the name table. Off with `--no-rename`.
    pub rename: bool,
    pub style: StyleSettings,
    pub strip_extended_metadata: bool,
}

impl FixOptions {
    /// Load, fix and save the font. Returns the path written.
    ///
    /// Nothing is written unless every step succeeds.
    pub fn run(&self) -> Result<PathBuf> {
        let data = FontFile::new(&self.input).read()?;

        let flavor = Flavor::detect(&data);
        if flavor != Flavor::Woff2 {
            return Err(FixError::UnsupportedFlavor { flavor }.into());
        }
        let mut font = Woff2Font::from_bytes(&data)
            .with_context(|| format!("Failed to load font: {}", self.input.display()))?;

        if self.rename {
            let naming = FontNaming::resolve(
                &self.input,
                self.family_name.as_deref(),
                self.subfamily_name.as_deref(),
            )
            .map_err(FixError::from)?;
            font.transform(|sfnt| naming.apply(sfnt))?;
        }

        font.transform(|sfnt| self.style.apply(sfnt))?;

        if self.strip_extended_metadata {
            font.strip_extended_metadata();
        }

        let output = match &self.output {
            Some(path) => path.clone(),
            None => make_output_path(&self.input),
        };
        FontFile::new(&output).write(font.to_bytes()?)?;
        info!("Wrote {}", output.display());

        Ok(output)
    }
}
