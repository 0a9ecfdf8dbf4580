//! Page numbers for table of contents entries.
//!
//! Like footers, the page a section starts on is only known once every
//! section has been placed. Contents entries are drawn without their number
//! and leave a [PageReference] behind; [stamp_page_numbers] revisits those
//! lines afterwards and writes a dot leader and the number.

use crate::colour::Colour;
use crate::composition::Composition;
use crate::error::{ComposeError, Result};
use crate::measure::Measure;
use crate::page::{SpanFont, SpanLayout};
use crate::units::Pt;

/// A contents line waiting for the page number of the section it names
#[derive(Debug, Clone, PartialEq)]
pub struct PageReference {
    /// Section and block of the contents entry itself
    pub origin: (usize, usize),
    /// Section whose first page is wanted
    pub target: usize,
    pub page_index: usize,
    /// Top of the line that takes the number, from the top of the page
    pub top: Pt,
    /// Where the entry's text ends on that line
    pub text_end: Pt,
    pub font: SpanFont,
    pub colour: Colour,
}

/// Write the page number each reference points at, right-aligned to the
/// content edge, with a dot leader from the end of the entry's text.
/// `section_pages` holds the 0-based first page of every section. Returns the
/// number of references stamped.
pub fn stamp_page_numbers<M: Measure + ?Sized>(
    pages: &mut Composition,
    references: &[PageReference],
    section_pages: &[usize],
    measurer: &M,
) -> Result<usize> {
    let right = pages.config.margin + pages.config.content_width();
    let mut stamped = 0;

    for reference in references {
        let Some(target) = section_pages.get(reference.target) else {
            log::warn!(
                "contents entry points at section {}, which does not exist",
                reference.target
            );
            continue;
        };
        let number = (target + 1).to_string();
        let font = reference.font;
        let width = |text: &str| {
            measurer
                .text_width(text, font.font, font.size)
                .map_err(|source| ComposeError::MeasurementFailure {
                    section: reference.origin.0,
                    block: reference.origin.1,
                    source,
                })
        };
        let number_width = width(&number)?;
        let dot = width(".")?;
        let space = width(" ")?;

        let leader_start = reference.text_end + space;
        let leader_end = right - number_width - space;
        let dots = if dot > Pt::ZERO && leader_end > leader_start {
            ((leader_end - leader_start).0 / dot.0).floor() as usize
        } else {
            0
        };

        let Some(page) = pages.page_mut(reference.page_index) else {
            log::warn!(
                "page {} vanished before its contents numbers were stamped",
                reference.page_index
            );
            continue;
        };
        let baseline = page.y_from_top(reference.top + font.size * font.font.ascent());
        if dots > 0 {
            page.add_span(SpanLayout {
                text: ".".repeat(dots),
                font,
                colour: reference.colour,
                coords: (leader_end - dot * dots as f32, baseline),
            });
        }
        page.add_span(SpanLayout {
            text: number,
            font,
            colour: reference.colour,
            coords: (right - number_width, baseline),
        });
        stamped += 1;
    }

    log::debug!("stamped {stamped} contents page numbers");
    Ok(stamped)
}
