//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use brandkit_pdf::{
    BuiltinFont, ContentBlock, LayoutConfig, Measure, MeasureError, ParagraphStyle, Pt,
};

/// Every character is half the font size wide and every line is exactly the
/// font size tall, so block heights are easy to predict
pub struct FixedMetrics;

impl Measure for FixedMetrics {
    fn text_width(&self, text: &str, _font: BuiltinFont, size: Pt) -> Result<Pt, MeasureError> {
        Ok(size * (text.chars().count() as f32 * 0.5))
    }

    fn line_height(&self, _font: BuiltinFont, size: Pt) -> Pt {
        size
    }
}

/// A measurer that fails on any text containing `needle`
pub struct RejectingMetrics {
    pub needle: &'static str,
}

impl Measure for RejectingMetrics {
    fn text_width(&self, text: &str, font: BuiltinFont, size: Pt) -> Result<Pt, MeasureError> {
        if text.contains(self.needle) {
            return Err(MeasureError::Other(format!("cannot measure {text:?}")));
        }
        FixedMetrics.text_width(text, font, size)
    }

    fn line_height(&self, font: BuiltinFont, size: Pt) -> Pt {
        FixedMetrics.line_height(font, size)
    }
}

/// Usable height of [tight_config]
pub const USABLE: f32 = 120.0;

/// A small page with 120pt of usable height and no gaps between blocks, so
/// a body paragraph of `n` lines is exactly `12 * n` points tall
pub fn tight_config() -> LayoutConfig {
    let mut config = LayoutConfig::default()
        .with_page_size((Pt(300.0), Pt(160.0)))
        .with_margin(Pt(10.0))
        .with_footer_height(Pt(20.0))
        .with_compression(false);
    config.line_gap = Pt::ZERO;
    config.paragraph_gap = Pt::ZERO;
    config.heading_gap = Pt::ZERO;
    config
}

/// A body paragraph of `n` short lines
pub fn lines(n: usize) -> ContentBlock {
    ContentBlock::Paragraph {
        text: vec!["line"; n].join("\n"),
        style: ParagraphStyle::Body,
    }
}
