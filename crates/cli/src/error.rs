//! User-facing failures of a fix run.

use fixfont_font_naming::NameInferenceError;
use fixfont_font_woff2::Flavor;

#[derive(Debug, thiserror::Error)]
pub enum FixError {
    #[error("Input file is not a WOFF2 font (flavor: {flavor})")]
    UnsupportedFlavor { flavor: Flavor },

    #[error(transparent)]
    NameInference(#[from] NameInferenceError),
}
