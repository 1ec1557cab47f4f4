//! fixfont CLI library.

pub mod cli;
pub mod error;
pub mod fix;
pub mod io;

pub use error::FixError;
pub use fix::FixOptions;

// Re-export from the font crates for convenience
pub use fixfont_font_metadata::{ItalicChange, StyleSettings};
pub use fixfont_font_naming::{FontNaming, postscriptify};
pub use fixfont_font_woff2::{Flavor, Woff2Font};
