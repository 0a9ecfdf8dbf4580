//! Turns a [Document] into a finished, paginated [Composition].
//!
//! The assembler walks a strict sequence of states:
//!
//! ```text
//! Idle -> ComposingSection(0) -> .. -> ComposingSection(n-1)
//!      -> StampingFooters -> [Writing] -> Done
//! ```
//!
//! `Writing` is only visited when the composition is sent to a sink, and
//! `Done` is entered only after the sink has accepted and flushed every
//! byte. Any error moves the assembler to `Failed` instead.

use crate::{
    colour::{colours, Colour},
    composition::{Composition, Placement},
    config::LayoutConfig,
    cursor::{FlowCursor, PagePosition},
    error::{ComposeError, Result, Warning},
    footer::{check_footer_labels, stamp_footers},
    grid::{layout_grid, GridSpec},
    info::Info,
    measure::{lead_height, measure_block, mock_element_height, Measure, Measured},
    model::{ContentBlock, Document, MockElement, ParagraphStyle, SwatchEntry, Theme},
    page::{Page, SpanFont, SpanLayout},
    rect::Rect,
    toc::{stamp_page_numbers, PageReference},
    units::Pt,
};
use std::io::Write;
use std::time::Instant;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AssemblerState {
    Idle,
    ComposingSection(usize),
    StampingFooters,
    /// Serialising to the output sink
    Writing,
    Done,
    Failed,
}

/// Summary of a composition that was written to a sink
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub page_count: usize,
    pub bytes_written: usize,
    pub warnings: Vec<Warning>,
}

pub struct Assembler<'m, M: Measure + ?Sized> {
    measurer: &'m M,
    config: LayoutConfig,
    state: AssemblerState,
    history: Vec<AssemblerState>,
}

impl<'m, M: Measure + ?Sized> Assembler<'m, M> {
    pub fn new(measurer: &'m M, config: LayoutConfig) -> Assembler<'m, M> {
        Assembler {
            measurer,
            config,
            state: AssemblerState::Idle,
            history: vec![AssemblerState::Idle],
        }
    }

    pub fn state(&self) -> AssemblerState {
        self.state
    }

    /// Every state visited by the last run, in order
    pub fn history(&self) -> &[AssemblerState] {
        &self.history
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out the document and stamp its footers. The result lives in
    /// memory and can be written with [Composition::write].
    pub fn compose(&mut self, document: &Document) -> Result<Composition> {
        match self.layout(document) {
            Ok(composition) => {
                self.enter(AssemblerState::Done);
                Ok(composition)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Lay out the document and write it to `sink`. Returns once the sink has
    /// been flushed.
    pub fn compose_to_writer<W: Write>(
        &mut self,
        document: &Document,
        sink: W,
    ) -> Result<Report> {
        let composition = self.layout(document).map_err(|e| self.fail(e))?;

        self.enter(AssemblerState::Writing);
        let started = Instant::now();
        let bytes_written = composition.write(sink).map_err(|e| self.fail(e))?;
        log::info!(
            "wrote {} pages ({} bytes) in {:?}",
            composition.page_count(),
            bytes_written,
            started.elapsed()
        );

        self.enter(AssemblerState::Done);
        Ok(Report {
            page_count: composition.page_count(),
            bytes_written,
            warnings: composition.warnings,
        })
    }

    fn enter(&mut self, state: AssemblerState) {
        log::trace!("assembler: {:?} -> {:?}", self.state, state);
        self.state = state;
        self.history.push(state);
    }

    fn fail(&mut self, error: ComposeError) -> ComposeError {
        log::error!("composition failed in state {:?}: {}", self.state, error);
        self.enter(AssemblerState::Failed);
        error
    }

    fn layout(&mut self, document: &Document) -> Result<Composition> {
        // each run starts from scratch
        self.state = AssemblerState::Idle;
        self.history = vec![AssemblerState::Idle];

        self.config.validate().map_err(ComposeError::invalid)?;
        document.validate()?;
        check_footer_labels(self.measurer, &self.config, document)?;

        let started = Instant::now();
        let config = self.config.clone();
        let mut info = Info::new(&document.title, document.created);
        info.author = document.author.clone();
        info.subject = document.subject.clone();
        info.keywords = document.keywords.clone();

        let mut flow = Flow {
            measurer: self.measurer,
            config: &config,
            theme: &document.theme,
            cursor: FlowCursor::new(&config),
            pages: Composition::new(info, config.clone()),
            references: Vec::new(),
        };

        let mut section_starts = Vec::with_capacity(document.sections.len());
        for (si, section) in document.sections.iter().enumerate() {
            self.enter(AssemblerState::ComposingSection(si));
            flow.cursor.begin_section(si);
            log::debug!(
                "composing section {} {:?} ({} blocks)",
                si,
                section.name,
                section.blocks.len()
            );

            let first_placement = flow.pages.placements.len();
            for (bi, block) in section.blocks.iter().enumerate() {
                flow.place(si, bi, block, section.blocks.get(bi + 1))?;
            }
            section_starts.push(
                flow.pages
                    .placements
                    .get(first_placement)
                    .map(|p| p.page_index),
            );
        }

        // a document of empty sections still gets a page
        flow.cursor.ensure_page(&mut flow.pages);
        let mut pages = flow.pages;
        let references = flow.references;

        let section_pages = bookmark_pages(&section_starts, pages.page_count());
        for (section, page_index) in document.sections.iter().zip(&section_pages) {
            pages.outline.add_bookmark(*page_index, section.name.clone());
        }
        log::info!(
            "laid out {} blocks on {} pages in {:?}",
            document.block_count(),
            pages.page_count(),
            started.elapsed()
        );

        self.enter(AssemblerState::StampingFooters);
        let started = Instant::now();
        let names: Vec<String> = document.sections.iter().map(|s| s.name.clone()).collect();
        let stamped = stamp_footers(&mut pages, &names, self.measurer)?;
        stamp_page_numbers(&mut pages, &references, &section_pages, self.measurer)?;
        log::info!("stamped {} footers in {:?}", stamped, started.elapsed());

        Ok(pages)
    }
}

/// The page each section's bookmark points at. A section without content
/// points where the next section's content starts, or at the last page.
fn bookmark_pages(section_starts: &[Option<usize>], page_count: usize) -> Vec<usize> {
    let last_page = page_count.saturating_sub(1);
    let mut next = last_page;
    let mut pages: Vec<usize> = section_starts
        .iter()
        .rev()
        .map(|start| {
            if let Some(start) = start {
                next = *start;
            }
            next
        })
        .collect();
    pages.reverse();
    pages
}

/// Mutable state of one layout run
struct Flow<'a, M: Measure + ?Sized> {
    measurer: &'a M,
    config: &'a LayoutConfig,
    theme: &'a Theme,
    cursor: FlowCursor,
    pages: Composition,
    /// Contents entries waiting for their page numbers
    references: Vec<PageReference>,
}

impl<M: Measure + ?Sized> Flow<'_, M> {
    fn measure(&self, section: usize, block: usize, content: &ContentBlock) -> Result<Measured> {
        let config = self.config;
        measure_block(self.measurer, content, self.theme, config, config.content_width()).map_err(
            |source| ComposeError::MeasurementFailure {
                section,
                block,
                source,
            },
        )
    }

    /// Place one block. `next` is the block that follows it in the same
    /// section, if any.
    fn place(
        &mut self,
        section: usize,
        block: usize,
        content: &ContentBlock,
        next: Option<&ContentBlock>,
    ) -> Result<()> {
        let config = self.config;
        let theme = self.theme;
        let width = config.content_width();
        let left = config.margin;
        let measured = self.measure(section, block, content)?;
        log::trace!(
            "block {} of section {}: {} is {}pt",
            block,
            section,
            content.kind(),
            measured.height
        );

        let typography = &theme.typography;
        match content {
            ContentBlock::Heading { level, colour, .. } => {
                let (font, size) = theme.heading_style(*level);
                let colour = colour.unwrap_or_else(|| theme.heading_colour(*level));
                // keep the heading on the same page as the start of what follows it
                if let Some(next) = next {
                    let following = self.measure(section, block + 1, next)?;
                    let keep = measured.height + lead_height(next, &following, config);
                    self.cursor.soft_break(keep);
                }
                let position = self.reserve(section, block, measured.body_height());
                self.lines(&position, left, &measured, SpanFont { font, size }, colour)?;
                self.cursor.skip(measured.gap);
            }
            ContentBlock::Paragraph { style, .. } => {
                let (font, size) = theme.paragraph_style(*style);
                let font = SpanFont { font, size };
                let colour = match style {
                    ParagraphStyle::Small => theme.muted,
                    _ => theme.text,
                };
                for line in measured.runs.iter().flatten() {
                    let position = self.reserve(section, block, measured.pitch);
                    self.text(position.page_index, (left, position.y), line, font, colour)?;
                }
                self.cursor.skip(measured.gap);
            }
            ContentBlock::BulletList { .. } => {
                let font = SpanFont {
                    font: typography.body_font,
                    size: typography.body,
                };
                let colour = theme.text;
                for item in &measured.runs {
                    for (i, line) in item.iter().enumerate() {
                        let position = self.reserve(section, block, measured.pitch);
                        if i == 0 {
                            let bullet_x = left + measured.indent * 0.4;
                            let at = (bullet_x, position.y);
                            self.text(position.page_index, at, "•", font, colour)?;
                        }
                        self.text(
                            position.page_index,
                            (left + measured.indent, position.y),
                            line,
                            font,
                            colour,
                        )?;
                    }
                }
                self.cursor.skip(measured.gap);
            }
            ContentBlock::SwatchGrid { entries, columns } => {
                let spec = GridSpec::swatches(config, *columns);
                let layout = layout_grid(&mut self.cursor, &mut self.pages, entries, &spec);
                for row in &layout.rows {
                    if row.overflowed {
                        self.overflow(section, block, spec.row_height());
                    }
                    self.pages.placements.push(Placement {
                        section,
                        block,
                        page_index: row.page_index,
                        top: row.top,
                        bottom: row.bottom,
                    });
                }
                for cell in &layout.cells {
                    self.swatch(cell.page_index, (cell.x, cell.y), cell.entry)?;
                }
                self.cursor.skip(measured.gap);
            }
            ContentBlock::KeyValueRow {
                label, value_colour, ..
            } => {
                let position = self.reserve(section, block, measured.body_height());
                let size = typography.body;
                let label_font = SpanFont {
                    font: typography.heading_font,
                    size,
                };
                let value_font = SpanFont {
                    font: typography.body_font,
                    size,
                };
                self.text(position.page_index, (left, position.y), label, label_font, theme.text)?;
                let colour = value_colour.unwrap_or(theme.text);
                self.lines(&position, left + measured.indent, &measured, value_font, colour)?;
                self.cursor.skip(measured.gap);
            }
            ContentBlock::TemplatePreview { elements } => {
                let position = self.reserve(section, block, measured.body_height());
                self.preview(&position, measured.body_height(), elements)?;
                self.cursor.skip(measured.gap);
            }
            ContentBlock::TocEntry { section: target, .. } => {
                let font = SpanFont {
                    font: typography.body_font,
                    size: typography.body,
                };
                let x = left + measured.indent;
                let count = measured.line_count();
                for (i, line) in measured.runs.iter().flatten().enumerate() {
                    let position = self.reserve(section, block, measured.pitch);
                    self.text(position.page_index, (x, position.y), line, font, theme.text)?;
                    if i + 1 == count {
                        let line_width = self
                            .measurer
                            .text_width(line, font.font, font.size)
                            .map_err(|source| ComposeError::MeasurementFailure {
                                section,
                                block,
                                source,
                            })?;
                        self.references.push(PageReference {
                            origin: (section, block),
                            target: *target,
                            page_index: position.page_index,
                            top: position.y,
                            text_end: x + line_width,
                            font,
                            colour: theme.text,
                        });
                    }
                }
                self.cursor.skip(measured.gap);
            }
            ContentBlock::Rule => {
                let position = self.reserve(section, block, measured.body_height());
                let thickness = config.rule_thickness;
                let page = self.page(position.page_index)?;
                let y = page.y_from_top(position.y + config.paragraph_gap + thickness / 2.0);
                page.add_line((left, y), (left + width, y), colours::RULE, thickness);
            }
            ContentBlock::Spacer { height } => {
                let at_top = self.cursor.at_page_top();
                let advanced = self.cursor.skip(*height);
                if !at_top && advanced < *height {
                    log::warn!(
                        "spacer of {}pt in block {} of section {} clipped to {}pt",
                        height,
                        block,
                        section,
                        advanced
                    );
                    self.pages.warnings.push(Warning::GapClipped {
                        section,
                        block,
                        requested: *height,
                        available: advanced,
                    });
                }
            }
            ContentBlock::Banner {
                title,
                subtitle,
                colour,
            } => {
                let position = self.reserve(section, block, measured.body_height());
                let height = measured.body_height();
                self.banner(&position, height, title, subtitle.as_deref(), *colour)?;
                self.cursor.skip(measured.gap);
            }
        }

        Ok(())
    }

    /// Reserve space for one atomic write and record where it went
    fn reserve(&mut self, section: usize, block: usize, height: Pt) -> PagePosition {
        let position = self.cursor.reserve(&mut self.pages, height);
        if position.overflowed {
            self.overflow(section, block, height);
        }
        self.pages.placements.push(Placement {
            section,
            block,
            page_index: position.page_index,
            top: position.y,
            bottom: position.y + height,
        });
        position
    }

    fn overflow(&mut self, section: usize, block: usize, height: Pt) {
        let usable = self.config.usable_height();
        log::warn!(
            "block {} of section {} is {}pt tall, only {}pt fit on a page",
            block,
            section,
            height,
            usable
        );
        self.pages.warnings.push(Warning::OverflowBlock {
            section,
            block,
            height,
            usable,
        });
    }

    fn page(&mut self, page_index: usize) -> Result<&mut Page> {
        self.pages
            .page_mut(page_index)
            .ok_or(ComposeError::PageMissing(page_index))
    }

    /// Place a line of text whose line box starts `at.1` points below the top
    /// of the page
    fn text(
        &mut self,
        page_index: usize,
        at: (Pt, Pt),
        text: &str,
        font: SpanFont,
        colour: Colour,
    ) -> Result<()> {
        let page = self.page(page_index)?;
        let baseline = page.y_from_top(at.1 + font.size * font.font.ascent());
        page.add_span(SpanLayout {
            text: text.to_string(),
            font,
            colour,
            coords: (at.0, baseline),
        });
        Ok(())
    }

    /// Place every measured line of an atomically reserved block
    fn lines(
        &mut self,
        position: &PagePosition,
        x: Pt,
        measured: &Measured,
        font: SpanFont,
        colour: Colour,
    ) -> Result<()> {
        for (i, line) in measured.runs.iter().flatten().enumerate() {
            let top = position.y + measured.pitch * i as f32;
            self.text(position.page_index, (x, top), line, font, colour)?;
        }
        Ok(())
    }

    fn swatch(&mut self, page_index: usize, at: (Pt, Pt), entry: &SwatchEntry) -> Result<()> {
        let cell = self.config.swatch;
        let label = SpanFont {
            font: self.theme.typography.heading_font,
            size: self.config.swatch_label_size,
        };
        let value = SpanFont {
            font: self.theme.typography.body_font,
            size: self.config.swatch_label_size,
        };
        let text_colour = self.theme.text;
        let muted = self.theme.muted;

        let page = self.page(page_index)?;
        let bottom = page.y_from_top(at.1 + cell.height);
        let rect = Rect::from_origin(at.0, bottom, cell.width, cell.height);
        page.add_fill(rect, entry.colour);
        if entry.colour.needs_outline() {
            page.add_outline(rect, colours::RULE, Pt(0.5));
        }

        let label_top = at.1 + cell.height + Pt(6.0);
        self.text(page_index, (at.0, label_top), &entry.label.to_uppercase(), label, text_colour)?;
        self.text(
            page_index,
            (at.0, label_top + label.size * 1.2),
            &entry.colour.to_hex(),
            value,
            muted,
        )
    }

    fn preview(
        &mut self,
        position: &PagePosition,
        height: Pt,
        elements: &[MockElement],
    ) -> Result<()> {
        let config = self.config;
        let left = config.margin;
        let width = config.content_width();
        let padding = config.preview_padding;
        let caption = SpanFont {
            font: self.theme.typography.body_font,
            size: self.theme.typography.small,
        };
        let muted = self.theme.muted;
        let heights: Vec<Pt> = elements
            .iter()
            .map(|e| mock_element_height(self.measurer, e, self.theme, config))
            .collect();

        let page_index = position.page_index;
        let page = self.page(page_index)?;
        let frame = Rect::from_origin(left, page.y_from_top(position.y + height), width, height);
        page.add_outline(frame, colours::RULE, Pt(0.75));

        let inner_x = left + padding;
        let inner_width = width - padding * 2.0;
        let mut top = position.y + padding;
        for (element, h) in elements.iter().zip(heights) {
            match element {
                MockElement::Bar { colour, .. } => {
                    let page = self.page(page_index)?;
                    let rect = Rect::from_origin(inner_x, page.y_from_top(top + h), inner_width, h);
                    page.add_fill(rect, *colour);
                }
                MockElement::TextLines {
                    count,
                    width_fraction,
                } => {
                    let pitch = config.preview_line_pitch;
                    let length = inner_width * width_fraction.clamp(0.0, 1.0);
                    let page = self.page(page_index)?;
                    for k in 0..*count {
                        let y = page.y_from_top(top + pitch * k as f32 + pitch / 2.0);
                        let width = pitch * 0.4;
                        page.add_line((inner_x, y), (inner_x + length, y), colours::RULE, width);
                    }
                }
                MockElement::Placeholder { label, .. } => {
                    let page = self.page(page_index)?;
                    let rect = Rect::from_origin(inner_x, page.y_from_top(top + h), inner_width, h);
                    page.add_outline(rect, muted, Pt(0.5));
                    let label_top = top + (h - caption.size) / 2.0;
                    self.text(page_index, (inner_x + padding, label_top), label, caption, muted)?;
                }
                MockElement::Caption { text } => {
                    self.text(page_index, (inner_x, top), text, caption, muted)?;
                }
            }
            top += h + padding / 2.0;
        }

        Ok(())
    }

    fn banner(
        &mut self,
        position: &PagePosition,
        height: Pt,
        title: &str,
        subtitle: Option<&str>,
        colour: Colour,
    ) -> Result<()> {
        let (title_font, title_size) = self.theme.heading_style(2);
        let subtitle_font = SpanFont {
            font: self.theme.typography.accent_font,
            size: self.theme.typography.body,
        };
        let text_colour = if colour.needs_outline() {
            self.theme.text
        } else {
            colours::WHITE
        };
        let left = self.config.margin;

        let page = self.page(position.page_index)?;
        let band = Rect::from_origin(
            Pt::ZERO,
            page.y_from_top(position.y + height),
            page.media_box.width(),
            height,
        );
        page.add_fill(band, colour);

        let title_top = position.y + height * 0.3;
        self.text(
            position.page_index,
            (left, title_top),
            title,
            SpanFont {
                font: title_font,
                size: title_size,
            },
            text_colour,
        )?;
        if let Some(subtitle) = subtitle {
            self.text(
                position.page_index,
                (left, title_top + title_size * 1.5),
                subtitle,
                subtitle_font,
                text_colour,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeasureError;
    use crate::measure::testing::FixedMetrics;
    use crate::model::Section;
    use crate::measure::StandardMetrics;

    /// 120pt of usable height, no gaps: every 12pt body line takes exactly 12pt
    fn tight_config() -> LayoutConfig {
        let mut config = LayoutConfig::default()
            .with_page_size((Pt(300.0), Pt(160.0)))
            .with_margin(Pt(10.0))
            .with_footer_height(Pt(20.0))
            .with_compression(false);
        config.line_gap = Pt::ZERO;
        config.paragraph_gap = Pt::ZERO;
        config
    }

    fn lines(n: usize) -> ContentBlock {
        ContentBlock::Paragraph {
            text: vec!["line"; n].join("\n"),
            style: ParagraphStyle::Body,
        }
    }

    #[test]
    fn visits_every_state_in_order() {
        let document = Document::new("Acme")
            .with_section(Section::new("One").with(lines(3)))
            .with_section(Section::new("Two").with(lines(3)));
        let mut assembler = Assembler::new(&FixedMetrics, tight_config());
        assembler.compose_to_writer(&document, Vec::new()).unwrap();
        assert_eq!(
            assembler.history(),
            &[
                AssemblerState::Idle,
                AssemblerState::ComposingSection(0),
                AssemblerState::ComposingSection(1),
                AssemblerState::StampingFooters,
                AssemblerState::Writing,
                AssemblerState::Done,
            ]
        );
    }

    #[test]
    fn exact_fit_is_one_page() {
        let document = Document::new("Acme").with_section(Section::new("One").with(lines(10)));
        let composition = Assembler::new(&FixedMetrics, tight_config())
            .compose(&document)
            .unwrap();
        assert_eq!(composition.page_count(), 1);
        assert!(composition.warnings.is_empty());
    }

    #[test]
    fn one_line_over_spills_to_a_second_page() {
        let document = Document::new("Acme").with_section(Section::new("One").with(lines(11)));
        let composition = Assembler::new(&FixedMetrics, tight_config())
            .compose(&document)
            .unwrap();
        assert_eq!(composition.page_count(), 2);
        let bottom = tight_config().content_bottom();
        assert!(composition.placements.iter().all(|p| p.bottom <= bottom));
    }

    #[test]
    fn sections_start_on_fresh_pages() {
        let document = Document::new("Acme")
            .with_section(Section::new("One").with(lines(2)))
            .with_section(Section::new("Two").with(lines(2)));
        let composition = Assembler::new(&FixedMetrics, tight_config())
            .compose(&document)
            .unwrap();
        assert_eq!(composition.page_count(), 2);
        assert_eq!(composition.page(1).map(|p| p.section), Some(1));
    }

    #[test]
    fn empty_sections_take_no_page_but_keep_a_bookmark() {
        let document = Document::new("Acme")
            .with_section(Section::new("One").with(lines(2)))
            .with_section(Section::new("Empty"))
            .with_section(Section::new("Three").with(lines(2)));
        let composition = Assembler::new(&FixedMetrics, tight_config())
            .compose(&document)
            .unwrap();
        assert_eq!(composition.page_count(), 2);
        let targets: Vec<usize> = composition
            .outline
            .entries
            .iter()
            .map(|e| e.page_index)
            .collect();
        assert_eq!(targets, vec![0, 1, 1]);
    }

    #[test]
    fn only_empty_sections_still_make_one_page() {
        let document = Document::new("Acme").with_section(Section::new("Empty"));
        let composition = Assembler::new(&FixedMetrics, tight_config())
            .compose(&document)
            .unwrap();
        assert_eq!(composition.page_count(), 1);
        assert_eq!(
            composition.page(0).and_then(|p| p.footer.clone()),
            Some("Acme — Page 1 of 1".to_string())
        );
    }

    #[test]
    fn oversized_block_is_placed_and_recorded() {
        let preview = ContentBlock::TemplatePreview {
            elements: vec![MockElement::Bar {
                height: Pt(500.0),
                colour: colours::BLACK,
            }],
        };
        let document = Document::new("Acme").with_section(Section::new("One").with(preview));
        let composition = Assembler::new(&FixedMetrics, tight_config())
            .compose(&document)
            .unwrap();
        assert_eq!(composition.page_count(), 1);
        assert!(matches!(
            composition.warnings.as_slice(),
            [Warning::OverflowBlock {
                section: 0,
                block: 0,
                ..
            }]
        ));
    }

    fn heading(text: &str) -> ContentBlock {
        ContentBlock::Heading {
            level: 3,
            text: text.into(),
            colour: None,
        }
    }

    #[test]
    fn heading_moves_with_the_following_content() {
        let config = tight_config();
        let document = Document::new("Acme").with_section(
            Section::new("One")
                .with(lines(8))
                .with(ContentBlock::Heading {
                    level: 3,
                    text: "Next".into(),
                    colour: None,
                })
                .with(lines(1)),
        );
        let composition = Assembler::new(&FixedMetrics, config)
            .compose(&document)
            .unwrap();
        // 24pt remain after the paragraph: the 20pt heading would fit, but
        // not with its 12pt gap and the first line after it
        let heading = composition
            .placements
            .iter()
            .find(|p| p.block == 1)
            .map(|p| p.page_index);
        assert_eq!(heading, Some(1));
    }

    #[test]
    fn heading_that_exactly_fits_with_its_content_stays() {
        let mut config = tight_config();
        config.heading_gap = Pt::ZERO;
        let h2 = ContentBlock::Heading {
            level: 2,
            text: "Next".into(),
            colour: None,
        };
        // 72 + 24 + 24 fills the 120pt exactly
        let document = Document::new("Acme").with_section(
            Section::new("One")
                .with(lines(6))
                .with(h2.clone())
                .with(lines(2)),
        );
        let composition = Assembler::new(&FixedMetrics, config.clone())
            .compose(&document)
            .unwrap();
        assert_eq!(composition.page_count(), 1);

        // one line more: the heading and two lines still fit, the last
        // line spills over
        let document = Document::new("Acme").with_section(
            Section::new("One")
                .with(lines(6))
                .with(h2)
                .with(lines(3)),
        );
        let composition = Assembler::new(&FixedMetrics, config)
            .compose(&document)
            .unwrap();
        assert_eq!(composition.page_count(), 2);
        let heading = composition
            .placements
            .iter()
            .find(|p| p.block == 1)
            .map(|p| p.page_index);
        assert_eq!(heading, Some(0));
    }

    #[test]
    fn heading_ending_a_section_is_not_pushed_on() {
        // 96pt of text leaves 24pt, enough for the 20pt heading alone
        let document = Document::new("Acme")
            .with_section(Section::new("One").with(lines(8)).with(heading("Last")))
            .with_section(Section::new("Two").with(lines(1)));
        let composition = Assembler::new(&FixedMetrics, tight_config())
            .compose(&document)
            .unwrap();
        assert_eq!(composition.page_count(), 2);
        let heading = composition
            .placements_of(0)
            .find(|p| p.block == 1)
            .map(|p| p.page_index);
        assert_eq!(heading, Some(0));
    }

    #[test]
    fn heading_keeps_with_the_first_grid_row() {
        let config = tight_config().with_page_size((Pt(300.0), Pt(200.0)));
        // 160pt usable, 95pt rows: after 48pt of text a heading and its
        // first row (32 + 95) no longer fit
        let grid = ContentBlock::SwatchGrid {
            entries: vec![SwatchEntry::new("primary", colours::BLACK)],
            columns: 3,
        };
        let document = Document::new("Acme").with_section(
            Section::new("One")
                .with(ContentBlock::Paragraph {
                    text: vec!["line"; 4].join("\n"),
                    style: ParagraphStyle::Emphasis,
                })
                .with(heading("Colours"))
                .with(grid),
        );
        let composition = Assembler::new(&FixedMetrics, config)
            .compose(&document)
            .unwrap();
        let pages: Vec<(usize, usize)> = composition
            .placements
            .iter()
            .map(|p| (p.block, p.page_index))
            .collect();
        assert_eq!(pages.last(), Some(&(2, 1)));
        assert!(pages.contains(&(1, 1)));
    }

    #[test]
    fn contents_entries_get_their_target_pages() {
        let toc = |title: &str, section| ContentBlock::TocEntry {
            title: title.into(),
            section,
        };
        let document = Document::new("Acme")
            .with_section(
                Section::new("Contents")
                    .with(toc("One", 1))
                    .with(toc("Two", 2))
                    .with(toc("Three", 3)),
            )
            .with_section(Section::new("One").with(lines(15)))
            .with_section(Section::new("Two"))
            .with_section(Section::new("Three").with(lines(1)));
        let composition = Assembler::new(&FixedMetrics, tight_config())
            .compose(&document)
            .unwrap();

        let targets: Vec<String> = composition.outline.entries[1..]
            .iter()
            .map(|e| (e.page_index + 1).to_string())
            .collect();
        assert_eq!(targets, vec!["2", "4", "4"]);

        let contents: Vec<&str> = composition.page(0).unwrap().text().collect();
        for number in &targets {
            assert!(contents.contains(&number.as_str()), "{number} missing");
        }
        assert!(contents.iter().any(|t| t.starts_with("...")));
    }

    #[test]
    fn unsettable_footer_titles_fail_before_any_page() {
        let document =
            Document::new("ブランド Guide").with_section(Section::new("One").with(lines(1)));
        let mut assembler = Assembler::new(&StandardMetrics, tight_config());
        let err = assembler.compose(&document).unwrap_err();
        assert!(matches!(err, ComposeError::InvalidDocument { .. }));
        assert_eq!(
            assembler.history(),
            &[AssemblerState::Idle, AssemblerState::Failed]
        );
    }

    #[test]
    fn invalid_documents_fail_before_any_page() {
        let mut assembler = Assembler::new(&FixedMetrics, tight_config());
        let err = assembler.compose(&Document::new("Acme")).unwrap_err();
        assert!(matches!(err, ComposeError::InvalidDocument { .. }));
        assert_eq!(
            assembler.history(),
            &[AssemblerState::Idle, AssemblerState::Failed]
        );
    }

    #[test]
    fn measurement_failures_carry_their_location() {
        let document = Document::new("Acme").with_section(
            Section::new("One")
                .with(lines(1))
                .with(ContentBlock::Paragraph {
                    text: "ブランド".into(),
                    style: ParagraphStyle::Body,
                }),
        );
        let mut assembler = Assembler::new(&StandardMetrics, tight_config());
        let err = assembler.compose(&document).unwrap_err();
        match err {
            ComposeError::MeasurementFailure {
                section,
                block,
                source,
            } => {
                assert_eq!((section, block), (0, 1));
                assert!(matches!(source, MeasureError::UnsupportedCharacter { .. }));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(assembler.state(), AssemblerState::Failed);
    }

    #[test]
    fn swatches_draw_fill_label_and_value() {
        let grid = ContentBlock::SwatchGrid {
            entries: vec![
                SwatchEntry::new("Primary", Colour::new_rgb_bytes(0x2a, 0x5c, 0xaa)),
                SwatchEntry::new("Light", Colour::new_rgb_bytes(0xec, 0xf0, 0xf1)),
            ],
            columns: 3,
        };
        let document = Document::new("Acme").with_section(Section::new("Colours").with(grid));
        let composition = Assembler::new(&FixedMetrics, LayoutConfig::default())
            .compose(&document)
            .unwrap();
        let page = composition.page(0).unwrap();
        let text: Vec<&str> = page.text().collect();
        assert!(text.contains(&"PRIMARY"));
        assert!(text.contains(&"#2A5CAA"));
        assert!(text.contains(&"#ECF0F1"));
        // only the light swatch gets an outline
        let outlines = page
            .contents
            .iter()
            .filter(|c| matches!(c, crate::page::PageContents::Outline { .. }))
            .count();
        assert_eq!(outlines, 1);
    }

    #[test]
    fn bookmark_pages_fill_forward() {
        assert_eq!(bookmark_pages(&[Some(0), None, Some(2)], 3), vec![0, 2, 2]);
        assert_eq!(bookmark_pages(&[Some(0), None], 1), vec![0, 0]);
        assert_eq!(bookmark_pages(&[None], 0), vec![0]);
    }
}
