//! A paginated document compositor.
//!
//! Content is described as a [Document]: sections of abstract blocks such as
//! headings, paragraphs, bullet lists and colour swatch grids. The
//! [Assembler] flows those blocks onto fixed-size pages, breaking pages when
//! space runs out and starting every section on a fresh page, then revisits
//! every page to stamp a "Page i of N" footer once N is known. The finished
//! document is written as a PDF to any [std::io::Write] sink, a file, or an
//! in-memory [Artifact].
//!
//! Text is measured through the [Measure] trait; [StandardMetrics] measures
//! the built-in Helvetica faces.
//!
//! The [brand] module builds brand guideline documents from an upstream
//! brand kit payload.

mod assembler;
pub use assembler::*;

/// Brand guideline documents built from an upstream brand kit
pub mod brand;

mod colour;
pub use colour::*;

mod composition;
pub use composition::*;

mod config;
pub use config::*;

mod content;

mod cursor;
pub use cursor::*;

mod error;
pub use error::*;

mod font;
pub use font::*;

mod footer;
pub use footer::*;

mod grid;
pub use grid::*;

mod info;
pub use info::*;

mod measure;
pub use measure::*;

mod model;
pub use model::*;

mod outline;
pub use outline::*;

mod page;
pub use page::*;

/// Standard page sizes
pub mod pagesize;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod sink;
pub use sink::*;

mod toc;
pub use toc::*;

mod units;
pub use units::*;
