//! Rendering of placed page elements into PDF content stream operators.

use crate::colour::Colour;
use crate::font::to_winansi_bytes;
use crate::page::{PageContents, SpanLayout};
use std::io::Write;

/// Renders page contents to an (uncompressed) PDF content stream.
#[allow(clippy::write_with_newline)]
pub(crate) fn render_contents(contents: &[PageContents]) -> Result<Vec<u8>, std::io::Error> {
    if contents.is_empty() {
        return Ok(Vec::default());
    }

    let mut content: Vec<u8> = Vec::default();

    for page_content in contents.iter() {
        match page_content {
            PageContents::Text(span) => render_span(&mut content, span)?,
            PageContents::Fill { rect, colour } => {
                write!(&mut content, "q\n")?;
                write_colour(&mut content, *colour, false)?;
                write!(
                    &mut content,
                    "{} {} {} {} re f\n",
                    rect.x1,
                    rect.y1,
                    rect.width(),
                    rect.height()
                )?;
                write!(&mut content, "Q\n")?;
            }
            PageContents::Outline {
                rect,
                colour,
                width,
            } => {
                write!(&mut content, "q\n")?;
                write_colour(&mut content, *colour, true)?;
                write!(&mut content, "{width} w\n")?;
                write!(
                    &mut content,
                    "{} {} {} {} re S\n",
                    rect.x1,
                    rect.y1,
                    rect.width(),
                    rect.height()
                )?;
                write!(&mut content, "Q\n")?;
            }
            PageContents::Line {
                from,
                to,
                colour,
                width,
            } => {
                write!(&mut content, "q\n")?;
                write_colour(&mut content, *colour, true)?;
                write!(&mut content, "{width} w\n")?;
                write!(&mut content, "{} {} m {} {} l S\n", from.0, from.1, to.0, to.1)?;
                write!(&mut content, "Q\n")?;
            }
        }
    }

    Ok(content)
}

#[allow(clippy::write_with_newline)]
fn render_span(content: &mut Vec<u8>, span: &SpanLayout) -> Result<(), std::io::Error> {
    if span.text.is_empty() {
        return Ok(());
    }

    write!(content, "q\n")?;
    write_colour(content, span.colour, false)?;
    write!(content, "BT\n")?;
    write!(content, "/F{} {} Tf\n", span.font.font.index(), span.font.size)?;
    write!(content, "{} {} Td\n", span.coords.0, span.coords.1)?;
    write!(content, "<")?;
    for byte in to_winansi_bytes(&span.text) {
        write!(content, "{byte:02x}")?;
    }
    write!(content, "> Tj\n")?;
    write!(content, "ET\n")?;
    write!(content, "Q\n")?;
    Ok(())
}

#[allow(clippy::write_with_newline)]
fn write_colour(content: &mut Vec<u8>, colour: Colour, stroke: bool) -> Result<(), std::io::Error> {
    match (colour, stroke) {
        (Colour::RGB { r, g, b }, false) => write!(content, "{r} {g} {b} rg\n"),
        (Colour::RGB { r, g, b }, true) => write!(content, "{r} {g} {b} RG\n"),
        (Colour::CMYK { c, m, y, k }, false) => write!(content, "{c} {m} {y} {k} k\n"),
        (Colour::CMYK { c, m, y, k }, true) => write!(content, "{c} {m} {y} {k} K\n"),
        (Colour::Grey { g }, false) => write!(content, "{g} g\n"),
        (Colour::Grey { g }, true) => write!(content, "{g} G\n"),
    }
}
