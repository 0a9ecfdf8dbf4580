//! Text measurement and block sizing.
//!
//! The compositor never computes glyph metrics itself; it asks a [Measure]
//! implementation how wide a run of text is and how tall a line is, and lets
//! it break text into lines. [StandardMetrics] answers for the built-in
//! Helvetica family. Other measurers (a shaping engine, or a fixed-size stub in
//! tests) can be plugged in instead.
//!
//! [measure_block] turns a [ContentBlock] into a [Measured] value: its wrapped
//! lines and the height it will occupy, which is the block's minimum-height
//! contract used by the page-break policy.

use crate::config::LayoutConfig;
use crate::error::MeasureError;
use crate::font::{winansi_byte, BuiltinFont};
use crate::model::{ContentBlock, MockElement, Theme};
use crate::units::Pt;

const TABSIZE: usize = 4;

/// A text measurement capability
pub trait Measure {
    /// Width of `text` set on a single line
    fn text_width(&self, text: &str, font: BuiltinFont, size: Pt) -> Result<Pt, MeasureError>;

    /// Distance from one baseline to the next for the given font and size
    fn line_height(&self, font: BuiltinFont, size: Pt) -> Pt;

    /// Break text into lines no wider than `width`. Words are kept intact
    /// where possible; a word wider than the line is split between characters.
    /// Explicit newlines always start a new line.
    fn wrap(
        &self,
        text: &str,
        font: BuiltinFont,
        size: Pt,
        width: Pt,
    ) -> Result<Vec<String>, MeasureError> {
        if !(size.0.is_finite() && size.0 > 0.0) {
            return Err(MeasureError::InvalidSize(size.0));
        }
        if !(width.0.is_finite() && width.0 > 0.0) {
            return Err(MeasureError::InvalidSize(width.0));
        }

        // replace tabs with spaces, normalize newlines
        let text = text
            .replace('\t', &" ".repeat(TABSIZE))
            .replace("\r\n", "\n")
            .replace('\r', "\n");

        let space = self.text_width(" ", font, size)?;
        let mut lines: Vec<String> = Vec::new();

        for hard_line in text.split('\n') {
            let mut current = String::new();
            let mut current_width = Pt::ZERO;

            for word in hard_line.split_whitespace() {
                let word_width = self.text_width(word, font, size)?;
                let gap = if current.is_empty() { Pt::ZERO } else { space };

                if current_width + gap + word_width <= width {
                    if !current.is_empty() {
                        current.push(' ');
                    }
                    current.push_str(word);
                    current_width += gap + word_width;
                    continue;
                }

                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = Pt::ZERO;
                }

                if word_width <= width {
                    current.push_str(word);
                    current_width = word_width;
                    continue;
                }

                // no break point - force character breaks
                for ch in word.chars() {
                    let mut buf = [0u8; 4];
                    let ch_width = self.text_width(ch.encode_utf8(&mut buf), font, size)?;
                    if !current.is_empty() && current_width + ch_width > width {
                        lines.push(std::mem::take(&mut current));
                        current_width = Pt::ZERO;
                    }
                    current.push(ch);
                    current_width += ch_width;
                }
            }

            lines.push(current);
        }

        // a trailing newline doesn't open another line
        while lines.len() > 1 && lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }

        Ok(lines)
    }
}

/// Metrics of the standard Helvetica faces over the WinAnsi code page
#[derive(Debug, Default, Copy, Clone)]
pub struct StandardMetrics;

impl StandardMetrics {
    /// Line height as a multiple of the font size
    pub const LINE_SPACING: f32 = 1.2;
}

impl Measure for StandardMetrics {
    fn text_width(&self, text: &str, font: BuiltinFont, size: Pt) -> Result<Pt, MeasureError> {
        if !(size.0.is_finite() && size.0 > 0.0) {
            return Err(MeasureError::InvalidSize(size.0));
        }
        let mut units = 0.0;
        for ch in text.chars() {
            let byte = winansi_byte(ch).ok_or(MeasureError::UnsupportedCharacter { ch, font })?;
            units += font.glyph_width(byte);
        }
        Ok(size * (units / 1000.0))
    }

    fn line_height(&self, _font: BuiltinFont, size: Pt) -> Pt {
        size * Self::LINE_SPACING
    }
}

/// A block after measurement: its text broken into lines and the vertical
/// space it takes up, trailing gap included
#[derive(Debug, Clone, PartialEq)]
pub struct Measured {
    /// Total height of the block
    pub height: Pt,
    /// Wrapped text runs. One run for headings, paragraphs and key/value
    /// values, one per item for bullet lists, one per caption for previews.
    pub runs: Vec<Vec<String>>,
    /// Vertical advance per line of text
    pub pitch: Pt,
    /// Horizontal offset of the text from the content edge
    pub indent: Pt,
    /// Space left after the block
    pub gap: Pt,
}

impl Measured {
    fn fixed(height: Pt, gap: Pt) -> Measured {
        Measured {
            height: height + gap,
            runs: Vec::new(),
            pitch: Pt::ZERO,
            indent: Pt::ZERO,
            gap,
        }
    }

    /// Height without the trailing gap
    pub fn body_height(&self) -> Pt {
        self.height - self.gap
    }

    pub fn line_count(&self) -> usize {
        self.runs.iter().map(Vec::len).sum()
    }
}

/// Number of swatch rows needed for `count` entries
pub fn grid_rows(count: usize, columns: usize) -> usize {
    if columns == 0 {
        0
    } else {
        count.div_ceil(columns)
    }
}

/// Height of a swatch grid: every row plus the gaps between rows
pub fn grid_height(count: usize, columns: usize, config: &LayoutConfig) -> Pt {
    let rows = grid_rows(count, columns);
    if rows == 0 {
        return Pt::ZERO;
    }
    config.swatch_row_height() * rows as f32 + config.swatch_row_gap * (rows - 1) as f32
}

/// Height of the first part of a block that cannot be split across pages:
/// its first line of text, its first grid row, or the whole block when it is
/// placed in one piece
pub fn lead_height(block: &ContentBlock, measured: &Measured, config: &LayoutConfig) -> Pt {
    match block {
        ContentBlock::Paragraph { .. }
        | ContentBlock::BulletList { .. }
        | ContentBlock::TocEntry { .. } => measured.pitch,
        ContentBlock::SwatchGrid { .. } => config.swatch_row_height(),
        ContentBlock::Spacer { .. } => Pt::ZERO,
        ContentBlock::Heading { .. }
        | ContentBlock::KeyValueRow { .. }
        | ContentBlock::TemplatePreview { .. }
        | ContentBlock::Rule
        | ContentBlock::Banner { .. } => measured.body_height(),
    }
}

/// Height of a single mock element inside a template preview
pub fn mock_element_height<M: Measure + ?Sized>(
    measurer: &M,
    element: &MockElement,
    theme: &Theme,
    config: &LayoutConfig,
) -> Pt {
    match element {
        MockElement::Bar { height, .. } | MockElement::Placeholder { height, .. } => *height,
        MockElement::TextLines { count, .. } => config.preview_line_pitch * *count as f32,
        MockElement::Caption { .. } => {
            measurer.line_height(theme.typography.body_font, theme.typography.small)
        }
    }
}

/// Measure a block laid out in `width` points of horizontal space
pub fn measure_block<M: Measure + ?Sized>(
    measurer: &M,
    block: &ContentBlock,
    theme: &Theme,
    config: &LayoutConfig,
    width: Pt,
) -> Result<Measured, MeasureError> {
    let measured = match block {
        ContentBlock::Heading { level, text, .. } => {
            let (font, size) = theme.heading_style(*level);
            let lines = measurer.wrap(text, font, size, width)?;
            let pitch = measurer.line_height(font, size);
            Measured {
                height: pitch * lines.len() as f32 + config.heading_gap,
                runs: vec![lines],
                pitch,
                indent: Pt::ZERO,
                gap: config.heading_gap,
            }
        }
        ContentBlock::Paragraph { text, style } => {
            let (font, size) = theme.paragraph_style(*style);
            let lines = measurer.wrap(text, font, size, width)?;
            let pitch = measurer.line_height(font, size) + config.line_gap;
            Measured {
                height: pitch * lines.len() as f32 + config.paragraph_gap,
                runs: vec![lines],
                pitch,
                indent: Pt::ZERO,
                gap: config.paragraph_gap,
            }
        }
        ContentBlock::BulletList { items } => {
            let (font, size) = (theme.typography.body_font, theme.typography.body);
            let pitch = measurer.line_height(font, size) + config.line_gap;
            let item_width = width - config.bullet_indent;
            let runs = items
                .iter()
                .map(|item| measurer.wrap(item, font, size, item_width))
                .collect::<Result<Vec<_>, _>>()?;
            let lines: usize = runs.iter().map(Vec::len).sum();
            Measured {
                height: pitch * lines as f32 + config.paragraph_gap,
                runs,
                pitch,
                indent: config.bullet_indent,
                gap: config.paragraph_gap,
            }
        }
        ContentBlock::SwatchGrid { entries, columns } => {
            for entry in entries {
                measurer.text_width(
                    &entry.label.to_uppercase(),
                    theme.typography.heading_font,
                    config.swatch_label_size,
                )?;
            }
            Measured::fixed(
                grid_height(entries.len(), *columns, config),
                config.paragraph_gap,
            )
        }
        ContentBlock::KeyValueRow { label, value, .. } => {
            let size = theme.typography.body;
            let label_width = measurer.text_width(label, theme.typography.heading_font, size)?
                + measurer.text_width(" ", theme.typography.body_font, size)?;
            let value_width = (width - label_width).max(Pt(1.0));
            let lines = measurer.wrap(value, theme.typography.body_font, size, value_width)?;
            let pitch = measurer.line_height(theme.typography.body_font, size) + config.line_gap;
            Measured {
                height: pitch * lines.len() as f32,
                runs: vec![lines],
                pitch,
                indent: label_width,
                gap: Pt::ZERO,
            }
        }
        ContentBlock::TemplatePreview { elements } => {
            let inner_width = width - config.preview_padding * 2.0;
            let mut runs = Vec::new();
            for element in elements {
                let font = theme.typography.body_font;
                let size = theme.typography.small;
                match element {
                    MockElement::Caption { text } => {
                        measurer.text_width(text, font, size)?;
                        runs.push(vec![text.clone()]);
                    }
                    MockElement::Placeholder { label, .. } => {
                        measurer.text_width(label, font, size)?;
                    }
                    _ => {}
                }
            }
            let inner: Pt = elements
                .iter()
                .map(|e| mock_element_height(measurer, e, theme, config))
                .sum();
            let spacing = config.preview_padding / 2.0 * elements.len().saturating_sub(1) as f32;
            let mut measured = Measured::fixed(
                inner + spacing + config.preview_padding * 2.0,
                config.paragraph_gap,
            );
            measured.runs = runs;
            measured.indent = (width - inner_width) / 2.0;
            measured
        }
        ContentBlock::TocEntry { title, .. } => {
            let (font, size) = (theme.typography.body_font, theme.typography.body);
            let text_width = width - config.toc_indent - config.toc_number_width;
            let lines = measurer.wrap(title, font, size, text_width)?;
            let pitch = measurer.line_height(font, size) + config.line_gap;
            Measured {
                height: pitch * lines.len() as f32,
                runs: vec![lines],
                pitch,
                indent: config.toc_indent,
                gap: Pt::ZERO,
            }
        }
        ContentBlock::Rule => Measured::fixed(
            config.rule_thickness + config.paragraph_gap * 2.0,
            Pt::ZERO,
        ),
        ContentBlock::Spacer { height } => Measured::fixed(Pt::ZERO, *height),
        ContentBlock::Banner {
            title, subtitle, ..
        } => {
            let (font, size) = theme.heading_style(2);
            measurer.text_width(title, font, size)?;
            if let Some(subtitle) = subtitle {
                measurer.text_width(subtitle, theme.typography.body_font, theme.typography.body)?;
            }
            Measured::fixed(config.banner_height, config.paragraph_gap)
        }
    };

    Ok(measured)
}


#[cfg(test)]
mod tests {
    use super::testing::FixedMetrics;
    use super::*;
    use crate::model::ParagraphStyle;

    #[test]
    fn wraps_on_word_boundaries() {
        // 10pt font: every char is 5pt wide, so 50pt fits 10 chars
        let lines = FixedMetrics
            .wrap("alpha beta gamma delta", BuiltinFont::Helvetica, Pt(10.0), Pt(50.0))
            .unwrap();
        assert_eq!(lines, vec!["alpha beta", "gamma", "delta"]);
    }

    #[test]
    fn splits_words_longer_than_the_line() {
        let lines = FixedMetrics
            .wrap("abcdefghijkl", BuiltinFont::Helvetica, Pt(10.0), Pt(25.0))
            .unwrap();
        assert_eq!(lines, vec!["abcde", "fghij", "kl"]);
    }

    #[test]
    fn keeps_explicit_newlines() {
        let lines = FixedMetrics
            .wrap("one\n\ntwo\n", BuiltinFont::Helvetica, Pt(10.0), Pt(100.0))
            .unwrap();
        assert_eq!(lines, vec!["one", "", "two"]);
    }

    #[test]
    fn rejects_non_positive_width() {
        let err = FixedMetrics
            .wrap("text", BuiltinFont::Helvetica, Pt(10.0), Pt(0.0))
            .unwrap_err();
        assert_eq!(err, MeasureError::InvalidSize(0.0));
    }

    #[test]
    fn lead_height_is_the_first_unsplittable_part() {
        let config = LayoutConfig::default();
        let theme = Theme::default();
        let measure = |block: &ContentBlock| {
            let measured =
                measure_block(&FixedMetrics, block, &theme, &config, config.content_width())
                    .unwrap();
            lead_height(block, &measured, &config)
        };

        let paragraph = ContentBlock::Paragraph {
            text: "one\ntwo\nthree".into(),
            style: ParagraphStyle::Body,
        };
        // 12pt body line plus the 5pt line gap
        assert_eq!(measure(&paragraph), Pt(17.0));

        let grid = ContentBlock::SwatchGrid {
            entries: (0..7)
                .map(|i| crate::model::SwatchEntry::new(i, crate::colour::colours::BLACK))
                .collect(),
            columns: 3,
        };
        assert_eq!(measure(&grid), config.swatch_row_height());

        assert_eq!(measure(&ContentBlock::Spacer { height: Pt(40.0) }), Pt::ZERO);
        assert_eq!(
            measure(&ContentBlock::Rule),
            config.rule_thickness + config.paragraph_gap * 2.0
        );
    }

    #[test]
    fn standard_metrics_use_helvetica_widths() {
        let w = StandardMetrics
            .text_width("Hi", BuiltinFont::Helvetica, Pt(10.0))
            .unwrap();
        // H = 722, i = 222
        assert!((w.0 - 9.44).abs() < 1e-4);
    }

    #[test]
    fn standard_metrics_reject_characters_outside_winansi() {
        let err = StandardMetrics
            .text_width("ブランド", BuiltinFont::Helvetica, Pt(12.0))
            .unwrap_err();
        assert!(matches!(err, MeasureError::UnsupportedCharacter { ch: 'ブ', .. }));
    }

    #[test]
    fn paragraph_height_counts_lines_and_gap() {
        let config = LayoutConfig::default();
        let theme = Theme::default();
        let block = ContentBlock::Paragraph {
            text: "alpha beta gamma delta".into(),
            style: ParagraphStyle::Body,
        };
        // body is 12pt: 6pt per char, 60pt fits "alpha beta"
        let m = measure_block(&FixedMetrics, &block, &theme, &config, Pt(60.0)).unwrap();
        assert_eq!(m.line_count(), 3);
        assert_eq!(m.pitch, Pt(12.0) + config.line_gap);
        assert_eq!(m.height, m.pitch * 3.0 + config.paragraph_gap);
        assert_eq!(m.body_height(), m.pitch * 3.0);
    }

    #[test]
    fn grid_height_is_rows_times_row_height() {
        let config = LayoutConfig::default();
        assert_eq!(grid_rows(5, 3), 2);
        assert_eq!(grid_rows(6, 3), 2);
        assert_eq!(grid_rows(7, 3), 3);
        assert_eq!(
            grid_height(5, 3, &config),
            config.swatch_row_height() * 2.0 + config.swatch_row_gap
        );
    }

    #[test]
    fn preview_height_sums_elements() {
        let config = LayoutConfig::default();
        let theme = Theme::default();
        let block = ContentBlock::TemplatePreview {
            elements: vec![
                MockElement::Bar {
                    height: Pt(20.0),
                    colour: theme.primary,
                },
                MockElement::TextLines {
                    count: 4,
                    width_fraction: 0.8,
                },
            ],
        };
        let m = measure_block(&FixedMetrics, &block, &theme, &config, Pt(400.0)).unwrap();
        let expected = Pt(20.0)
            + config.preview_line_pitch * 4.0
            + config.preview_padding / 2.0
            + config.preview_padding * 2.0;
        assert_eq!(m.body_height(), expected);
    }
}
