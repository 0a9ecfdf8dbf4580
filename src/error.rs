use crate::font::BuiltinFont;
use crate::units::Pt;
use derive_more::Display;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for composition operations
pub type Result<T> = std::result::Result<T, ComposeError>;

/// All fatal errors that composing a document can produce
#[derive(Error, Debug)]
pub enum ComposeError {
    /// The document failed validation; nothing was laid out
    #[error("invalid document{}: {reason}", location(.section, .block))]
    InvalidDocument {
        reason: String,
        section: Option<usize>,
        block: Option<usize>,
    },

    /// The measurement service could not size a block
    #[error("could not measure block {block} of section {section}: {source}")]
    MeasurementFailure {
        section: usize,
        block: usize,
        #[source]
        source: MeasureError,
    },

    /// The output destination could not be opened, written, or flushed
    #[error("failed to write document{}: {source}", destination(.path))]
    SinkWriteFailure {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    /// A page id in the page order had no page behind it
    #[error("page {0} is missing from the page list")]
    PageMissing(usize),
}

fn location(section: &Option<usize>, block: &Option<usize>) -> String {
    match (*section, *block) {
        (Some(s), Some(b)) => format!(" (section {s}, block {b})"),
        (Some(s), None) => format!(" (section {s})"),
        _ => String::new(),
    }
}

fn destination(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" to {}", p.display()))
        .unwrap_or_default()
}

impl ComposeError {
    pub(crate) fn invalid<S: ToString>(reason: S) -> ComposeError {
        ComposeError::InvalidDocument {
            reason: reason.to_string(),
            section: None,
            block: None,
        }
    }

    pub(crate) fn invalid_at<S: ToString>(
        reason: S,
        section: usize,
        block: Option<usize>,
    ) -> ComposeError {
        ComposeError::InvalidDocument {
            reason: reason.to_string(),
            section: Some(section),
            block,
        }
    }

    pub(crate) fn sink(path: Option<PathBuf>, source: std::io::Error) -> ComposeError {
        ComposeError::SinkWriteFailure { path, source }
    }
}

/// Errors reported by a [Measure](crate::measure::Measure) implementation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    /// The font has no glyph for this character
    #[error("{font:?} cannot set character {ch:?}")]
    UnsupportedCharacter { ch: char, font: BuiltinFont },

    /// A size or width that cannot be laid out (negative, zero, or not finite)
    #[error("invalid size {0}")]
    InvalidSize(f32),

    /// Any other failure from a third-party measurer
    #[error("{0}")]
    Other(String),
}

/// Non-fatal conditions recorded while composing
#[derive(Debug, Clone, PartialEq, Display)]
pub enum Warning {
    /// A block taller than the usable page area was placed as-is and overflows
    #[display(
        "block {block} of section {section} is {height}pt tall but only {usable}pt fit on a page; placed as-is"
    )]
    OverflowBlock {
        section: usize,
        block: usize,
        height: Pt,
        usable: Pt,
    },
    /// Vertical whitespace was cut short by the end of a page
    #[display("gap of {requested}pt after block {block} of section {section} clipped to {available}pt")]
    GapClipped {
        section: usize,
        block: usize,
        requested: Pt,
        available: Pt,
    },
    /// A footer was wider than the footer strip and its label was shortened
    #[display("footer of page {page} is {width}pt wide but the strip is {available}pt; label shortened")]
    FooterTruncated { page: usize, width: Pt, available: Pt },
}
