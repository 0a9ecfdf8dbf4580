use crate::colour::Colour;
use crate::config::LayoutConfig;
use crate::content::render_contents;
use crate::font::BuiltinFont;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::units::Pt;
use crate::error::{ComposeError, Result};
use pdf_writer::{Filter, Finish, Name, Pdf};

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub font: BuiltinFont,
    pub size: Pt,
}

/// A single line of text, positioned by its baseline origin in page space
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub font: SpanFont,
    pub colour: Colour,
    pub coords: (Pt, Pt),
}

/// Everything that can be drawn on a page, in page space (origin bottom-left)
#[derive(Clone, PartialEq, Debug)]
pub enum PageContents {
    Text(SpanLayout),
    Fill {
        rect: Rect,
        colour: Colour,
    },
    Outline {
        rect: Rect,
        colour: Colour,
        width: Pt,
    },
    Line {
        from: (Pt, Pt),
        to: (Pt, Pt),
        colour: Colour,
        width: Pt,
    },
}

/// One page of the composed document. Pages keep every placed element so
/// they can be revisited (e.g. to stamp footers) until the document is written.
#[derive(Debug, Clone)]
pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    /// Where flowed content can live: within the margins and above the footer strip
    pub content_box: Rect,
    /// The strip between the content box and the bottom margin
    pub footer_box: Rect,
    /// Index of the section that opened this page
    pub section: usize,
    /// The placed elements, in drawing order
    pub contents: Vec<PageContents>,
    /// The footer text, once stamped
    pub footer: Option<String>,
}

impl Page {
    pub fn new(config: &LayoutConfig, section: usize) -> Page {
        let (width, height) = config.page_size;
        let margin = config.margin;
        Page {
            media_box: Rect {
                x1: Pt::ZERO,
                y1: Pt::ZERO,
                x2: width,
                y2: height,
            },
            content_box: Rect {
                x1: margin,
                y1: margin + config.footer_height,
                x2: width - margin,
                y2: height - margin,
            },
            footer_box: Rect {
                x1: margin,
                y1: margin,
                x2: width - margin,
                y2: margin + config.footer_height,
            },
            section,
            contents: Vec::default(),
            footer: None,
        }
    }

    /// Convert a distance measured down from the top edge into a page-space y
    pub fn y_from_top(&self, offset: Pt) -> Pt {
        self.media_box.y2 - offset
    }

    /// `true` while nothing has been placed on the page
    pub fn is_blank(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn add_span(&mut self, span: SpanLayout) {
        self.contents.push(PageContents::Text(span));
    }

    pub fn add_fill(&mut self, rect: Rect, colour: Colour) {
        self.contents.push(PageContents::Fill { rect, colour });
    }

    pub fn add_outline(&mut self, rect: Rect, colour: Colour, width: Pt) {
        self.contents.push(PageContents::Outline {
            rect,
            colour,
            width,
        });
    }

    pub fn add_line(&mut self, from: (Pt, Pt), to: (Pt, Pt), colour: Colour, width: Pt) {
        self.contents.push(PageContents::Line {
            from,
            to,
            colour,
            width,
        });
    }

    /// All text on the page, in placement order
    pub fn text(&self) -> impl Iterator<Item = &str> {
        self.contents.iter().filter_map(|c| match c {
            PageContents::Text(span) => Some(span.text.as_str()),
            _ => None,
        })
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        compress: bool,
        writer: &mut Pdf,
    ) -> Result<()> {
        let id = refs
            .get(RefType::Page(page_index))
            .ok_or(ComposeError::PageMissing(page_index))?;
        let parent = refs
            .get(RefType::PageTree)
            .ok_or(ComposeError::PageMissing(page_index))?;
        let content_id = refs.gen(RefType::ContentForPage(page_index));

        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.art_box(self.content_box.into());
        page.parent(parent);

        let mut resources = page.resources();
        let mut resource_fonts = resources.fonts();
        for font in BuiltinFont::ALL {
            if let Some(font_ref) = refs.get(RefType::Font(font.index())) {
                resource_fonts.pair(Name(format!("F{}", font.index()).as_bytes()), font_ref);
            }
        }
        resource_fonts.finish();
        resources.finish();

        page.contents(content_id);
        page.finish();

        let rendered =
            render_contents(&self.contents).map_err(|e| ComposeError::sink(None, e))?;
        if compress {
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
                rendered.as_slice(),
                miniz_oxide::deflate::CompressionLevel::DefaultCompression as u8,
            );
            writer
                .stream(content_id, compressed.as_slice())
                .filter(Filter::FlateDecode);
        } else {
            writer.stream(content_id, rendered.as_slice());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxes_follow_margins_and_footer_strip() {
        let config = LayoutConfig::default()
            .with_page_size((Pt(200.0), Pt(300.0)))
            .with_margin(Pt(20.0))
            .with_footer_height(Pt(10.0));
        let page = Page::new(&config, 3);
        assert_eq!(page.section, 3);
        assert_eq!(page.content_box.y1, Pt(30.0));
        assert_eq!(page.content_box.y2, Pt(280.0));
        assert_eq!(page.footer_box.y2, page.content_box.y1);
        assert_eq!(page.content_box.height(), config.usable_height());
        assert_eq!(page.y_from_top(Pt(20.0)), Pt(280.0));
        assert!(page.is_blank());
    }
}
