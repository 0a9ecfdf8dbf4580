//! The footer pass: runs once every page exists, since each footer names the
//! total page count.

use crate::composition::Composition;
use crate::config::{FooterLabel, LayoutConfig};
use crate::error::{ComposeError, Result, Warning};
use crate::font::BuiltinFont;
use crate::measure::Measure;
use crate::model::Document;
use crate::page::{SpanFont, SpanLayout};
use crate::units::Pt;

const FOOTER_FONT: BuiltinFont = BuiltinFont::Helvetica;

/// The text stamped at the bottom of page `page_index` (0-based) of `page_count`
pub fn footer_text(label: &str, page_index: usize, page_count: usize) -> String {
    format!("{label} — Page {} of {page_count}", page_index + 1)
}

/// Make sure every label that can end up in a footer can be set in the
/// footer font. Runs before any page is opened.
pub fn check_footer_labels<M: Measure + ?Sized>(
    measurer: &M,
    config: &LayoutConfig,
    document: &Document,
) -> Result<()> {
    let check = |label: &str, section: Option<usize>| {
        measurer
            .text_width(&footer_text(label, 0, 1), FOOTER_FONT, config.footer_font_size)
            .map(|_| ())
            .map_err(|e| ComposeError::InvalidDocument {
                reason: format!("footer label {label:?} cannot be set: {e}"),
                section,
                block: None,
            })
    };

    match config.footer_label {
        FooterLabel::DocumentTitle => check(&document.title, None),
        FooterLabel::SectionName => document
            .sections
            .iter()
            .enumerate()
            .try_for_each(|(si, section)| check(&section.name, Some(si))),
    }
}

/// The footer for one page, with the label shortened until the whole footer
/// fits in `available`. The second value is the unshortened width when the
/// label had to be shortened.
fn fitted_footer<M: Measure + ?Sized>(
    measurer: &M,
    font: SpanFont,
    label: &str,
    page_index: usize,
    page_count: usize,
    available: Pt,
) -> Result<(String, Option<Pt>)> {
    let width = |text: &str| {
        measurer
            .text_width(text, font.font, font.size)
            .map_err(|e| ComposeError::invalid(format!("footer {text:?} cannot be set: {e}")))
    };

    let text = footer_text(label, page_index, page_count);
    let full = width(&text)?;
    if full <= available {
        return Ok((text, None));
    }

    let mut kept: Vec<char> = label.chars().collect();
    while kept.pop().is_some() {
        let short: String = kept.iter().collect();
        let text = footer_text(&format!("{}…", short.trim_end()), page_index, page_count);
        if width(&text)? <= available {
            return Ok((text, Some(full)));
        }
    }
    Ok((footer_text("…", page_index, page_count), Some(full)))
}

/// Stamp every page with its footer and a separator rule above it. Footers
/// go in the strip below the content area, so nothing already placed moves
/// and no page is added. A footer wider than the strip has its label
/// shortened and a [Warning::FooterTruncated] recorded. Returns the number of
/// pages stamped.
pub fn stamp_footers<M: Measure + ?Sized>(
    pages: &mut Composition,
    section_names: &[String],
    measurer: &M,
) -> Result<usize> {
    let page_count = pages.page_count();
    let config = pages.config.clone();
    let title = pages.info.title.clone();
    let font = SpanFont {
        font: FOOTER_FONT,
        size: config.footer_font_size,
    };
    let mut warnings = Vec::new();

    for page_index in 0..page_count {
        let Some(page) = pages.page_mut(page_index) else {
            log::warn!("page {page_index} vanished before its footer was stamped");
            continue;
        };

        let label = match config.footer_label {
            FooterLabel::DocumentTitle => title.as_str(),
            FooterLabel::SectionName => section_names
                .get(page.section)
                .map(String::as_str)
                .unwrap_or(title.as_str()),
        };
        let strip = page.footer_box;
        let (text, truncated) =
            fitted_footer(measurer, font, label, page_index, page_count, strip.width())?;
        if let Some(width) = truncated {
            log::warn!(
                "footer of page {} is {}pt wide, more than the {}pt strip; label shortened",
                page_index,
                width,
                strip.width()
            );
            warnings.push(Warning::FooterTruncated {
                page: page_index,
                width,
                available: strip.width(),
            });
        }

        let rule_y = strip.y2 - strip.height() * 0.15;
        page.add_line(
            (strip.x1, rule_y),
            (strip.x2, rule_y),
            config.footer_colour,
            Pt(0.5),
        );

        let baseline =
            strip.y1 + (strip.height() - font.size * font.font.ascent()) / 2.0;
        page.add_span(SpanLayout {
            text: text.clone(),
            font,
            colour: config.footer_colour,
            coords: (strip.x1, baseline),
        });
        page.footer = Some(text);
    }

    pages.warnings.extend(warnings);
    Ok(page_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::Info;
    use crate::measure::testing::FixedMetrics;
    use crate::measure::StandardMetrics;
    use crate::model::Section;
    use chrono::Utc;

    fn composition(pages: usize, config: LayoutConfig) -> Composition {
        let mut doc = Composition::new(Info::new("Acme Brand Guidelines", Utc::now()), config);
        for i in 0..pages {
            doc.open_page(i / 2);
        }
        doc
    }

    #[test]
    fn footer_text_names_position_and_total() {
        assert_eq!(footer_text("Acme", 0, 3), "Acme — Page 1 of 3");
    }

    #[test]
    fn every_page_gets_a_strictly_increasing_counter() {
        let mut doc = composition(5, LayoutConfig::default());
        assert_eq!(stamp_footers(&mut doc, &[], &FixedMetrics).unwrap(), 5);

        let footers: Vec<String> = doc
            .iter_pages()
            .map(|p| p.footer.clone().unwrap_or_default())
            .collect();
        for (i, footer) in footers.iter().enumerate() {
            assert!(footer.contains("of 5"), "{footer}");
            assert!(footer.starts_with("Acme Brand Guidelines"));
            assert!(footer.contains(&format!("Page {} of", i + 1)));
        }
    }

    #[test]
    fn footers_stay_inside_the_footer_strip() {
        let mut doc = composition(2, LayoutConfig::default());
        stamp_footers(&mut doc, &[], &FixedMetrics).unwrap();
        for page in doc.iter_pages() {
            for content in &page.contents {
                match content {
                    crate::page::PageContents::Text(span) => {
                        assert!(span.coords.1 >= page.footer_box.y1);
                        assert!(span.coords.1 < page.content_box.y1);
                    }
                    crate::page::PageContents::Line { from, .. } => {
                        assert!(from.1 <= page.footer_box.y2);
                    }
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn section_name_label() {
        let config = LayoutConfig::default().with_footer_label(FooterLabel::SectionName);
        let mut doc = composition(3, config);
        let names = ["Cover".to_string(), "Colours".to_string()];
        stamp_footers(&mut doc, &names, &FixedMetrics).unwrap();
        let footers: Vec<_> = doc.iter_pages().filter_map(|p| p.footer.clone()).collect();
        assert_eq!(
            footers,
            vec![
                "Cover — Page 1 of 3",
                "Cover — Page 2 of 3",
                "Colours — Page 3 of 3"
            ]
        );
    }

    #[test]
    fn stamping_adds_no_pages() {
        let mut doc = composition(0, LayoutConfig::default());
        assert_eq!(stamp_footers(&mut doc, &[], &FixedMetrics).unwrap(), 0);
        assert_eq!(doc.page_count(), 0);
    }

    #[test]
    fn long_labels_are_shortened_to_fit_the_strip() {
        // A4 strip is 495.28pt wide; at 10pt every character is 5pt wide
        let title = "Guidelines ".repeat(12);
        let mut doc = Composition::new(Info::new(&title, Utc::now()), LayoutConfig::default());
        doc.open_page(0);
        doc.open_page(0);
        stamp_footers(&mut doc, &[], &FixedMetrics).unwrap();

        for (i, page) in doc.iter_pages().enumerate() {
            let footer = page.footer.clone().unwrap_or_default();
            assert!(footer.ends_with(&format!("… — Page {} of 2", i + 1)), "{footer}");
            assert!(footer.chars().count() as f32 * 5.0 <= 495.28);
        }
        assert_eq!(doc.warnings.len(), 2);
        assert!(matches!(
            doc.warnings[0],
            Warning::FooterTruncated { page: 0, available, .. } if (available.0 - 495.28).abs() < 0.01
        ));
    }

    #[test]
    fn labels_outside_the_footer_font_are_rejected() {
        let document = Document::new("ブランド Guide").with_section(Section::new("Cover"));
        let err = check_footer_labels(&StandardMetrics, &LayoutConfig::default(), &document)
            .unwrap_err();
        assert!(matches!(
            err,
            ComposeError::InvalidDocument { section: None, .. }
        ));

        let config = LayoutConfig::default().with_footer_label(FooterLabel::SectionName);
        let document = Document::new("Guide")
            .with_section(Section::new("Cover"))
            .with_section(Section::new("Färger ✓"));
        let err = check_footer_labels(&StandardMetrics, &config, &document).unwrap_err();
        assert!(matches!(
            err,
            ComposeError::InvalidDocument {
                section: Some(1),
                ..
            }
        ));
        assert!(check_footer_labels(&StandardMetrics, &LayoutConfig::default(), &document).is_ok());
    }
}
