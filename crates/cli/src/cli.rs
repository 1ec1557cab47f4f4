//! CLI definitions.

use std::{
    io::{Write, stdout},
    path::PathBuf,
};

use anyhow::Result;
use clap::Parser;
use fixfont_font_metadata::{ItalicChange, StyleSettings};

use crate::fix::FixOptions;

#[derive(Debug, Parser)]
#[command(name = "fixfont")]
#[command(about = "Rename a WOFF2 font and adjust its style flags")]
pub struct Cli {
    /// Source WOFF2 font.
    pub input: PathBuf,

    /// Family name; derived from the filename when omitted.
    #[arg(short, long)]
    pub family_name: Option<String>,

    /// Subfamily name; derived from the filename when omitted.
    #[arg(short, long)]
    pub subfamily_name: Option<String>,

    /// Leave the name table alone.
    #[arg(long)]
    pub no_rename: bool,

    /// OS/2 weight class.
    #[arg(long)]
    pub weight_class: Option<u16>,

    /// OS/2 width class.
    #[arg(long)]
    pub width_class: Option<u16>,

    /// Set the italic style bits.
    #[arg(short, long, overrides_with = "no_italic")]
    pub italic: bool,

    /// Clear the italic style bits.
    #[arg(long, overrides_with = "italic")]
    pub no_italic: bool,

    /// Remove the extended metadata and private data blocks.
    #[arg(long)]
    pub strip_extended_metadata: bool,

    /// Output path. Defaults to a fresh name next to the input.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Tri-state italic: `None` when neither flag was given.
    pub fn italic(&self) -> Option<ItalicChange> {
        (self.italic || self.no_italic).then(|| ItalicChange::from_flag(self.italic))
    }

    pub fn options(&self) -> FixOptions {
        FixOptions {
            input: self.input.clone(),
            output: self.output.clone(),
            family_name: self.family_name.clone(),
            subfamily_name: self.subfamily_name.clone(),
            rename: !self.no_rename,
            style: StyleSettings {
                weight_class: self.weight_class,
                width_class: self.width_class,
                italic: self.italic(),
            },
            strip_extended_metadata: self.strip_extended_metadata,
        }
    }

    pub fn run(self) -> Result<()> {
        self.run_with(&mut stdout().lock())
    }

    /// Run, reporting a derived output path to `out`.
    pub fn run_with(self, out: &mut impl Write) -> Result<()> {
        let output = self.options().run()?;
        if self.output.is_none() {
            writeln!(out, "Output saved in “{}”", output.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("fixfont").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let options = parse(&["Roboto-Bold.woff2"]).options();
        assert_eq!(options.input, PathBuf::from("Roboto-Bold.woff2"));
        assert!(options.rename);
        assert!(options.style.is_empty());
        assert!(!options.strip_extended_metadata);
        assert!(options.output.is_none());
    }

    #[test]
    fn test_all_flags() {
        let cli = parse(&[
            "in.woff2",
            "-f",
            "Brand",
            "-s",
            "Light",
            "--no-rename",
            "--weight-class",
            "300",
            "--width-class",
            "4",
            "-i",
            "--strip-extended-metadata",
            "-o",
            "out.woff2",
        ]);
        let options = cli.options();
        assert_eq!(options.family_name.as_deref(), Some("Brand"));
        assert_eq!(options.subfamily_name.as_deref(), Some("Light"));
        assert!(!options.rename);
        assert_eq!(
            options.style,
            StyleSettings {
                weight_class: Some(300),
                width_class: Some(4),
                italic: Some(ItalicChange::Set),
            }
        );
        assert!(options.strip_extended_metadata);
        assert_eq!(options.output, Some(PathBuf::from("out.woff2")));
    }

    #[test]
    fn test_italic_tri_state() {
        assert_eq!(parse(&["a.woff2"]).italic(), None);
        assert_eq!(parse(&["a.woff2", "--italic"]).italic(), Some(ItalicChange::Set));
        assert_eq!(parse(&["a.woff2", "--no-italic"]).italic(), Some(ItalicChange::Clear));
        assert_eq!(parse(&["a.woff2", "-i", "--no-italic"]).italic(), Some(ItalicChange::Clear));
        assert_eq!(parse(&["a.woff2", "--no-italic", "-i"]).italic(), Some(ItalicChange::Set));
    }

    #[test]
    fn test_weight_class_must_be_integer() {
        let args = ["fixfont", "a.woff2", "--weight-class", "bold"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["fixfont"]).is_err());
    }
}
