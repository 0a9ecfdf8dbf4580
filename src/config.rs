//! Layout configuration: page geometry, spacing, and grid metrics.

use crate::colour::{colours, Colour};
use crate::pagesize::{self, PageSize};
use crate::units::Pt;
use serde::{Deserialize, Serialize};

/// What the footer of each page names before the page counter
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FooterLabel {
    /// The document title, on every page
    #[default]
    DocumentTitle,
    /// The name of the section the page belongs to
    SectionName,
}

/// Width and height of one grid cell, excluding its label strip
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellSize {
    pub width: Pt,
    pub height: Pt,
}

/// Parameters of the page-flow layout. The defaults reproduce the brand
/// guidelines layout: A4, 50pt margins, three swatches per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// (width, height) of every page
    pub page_size: PageSize,
    /// Uniform margin on all four sides
    pub margin: Pt,
    /// Strip above the bottom margin reserved for the footer
    pub footer_height: Pt,
    pub footer_font_size: Pt,
    pub footer_colour: Colour,
    pub footer_label: FooterLabel,
    /// Extra space between consecutive lines of text
    pub line_gap: Pt,
    /// Space after text blocks and rules
    pub paragraph_gap: Pt,
    /// Space after headings
    pub heading_gap: Pt,
    pub bullet_indent: Pt,
    pub swatch: CellSize,
    pub swatch_column_gap: Pt,
    pub swatch_row_gap: Pt,
    /// Room below each swatch for its name and value
    pub swatch_label_height: Pt,
    pub swatch_label_size: Pt,
    pub preview_padding: Pt,
    /// Distance between the strokes of a mock text block
    pub preview_line_pitch: Pt,
    pub banner_height: Pt,
    /// Indent of table of contents entries
    pub toc_indent: Pt,
    /// Room kept free for the page number at the end of a contents entry
    pub toc_number_width: Pt,
    pub rule_thickness: Pt,
    /// Deflate page content streams
    pub compress: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            page_size: pagesize::A4,
            margin: Pt(50.0),
            footer_height: Pt(30.0),
            footer_font_size: Pt(10.0),
            footer_colour: colours::MUTED,
            footer_label: FooterLabel::DocumentTitle,
            line_gap: Pt(5.0),
            paragraph_gap: Pt(10.0),
            heading_gap: Pt(12.0),
            bullet_indent: Pt(30.0),
            swatch: CellSize {
                width: Pt(60.0),
                height: Pt(60.0),
            },
            swatch_column_gap: Pt(120.0),
            swatch_row_gap: Pt(30.0),
            swatch_label_height: Pt(35.0),
            swatch_label_size: Pt(10.0),
            preview_padding: Pt(12.0),
            preview_line_pitch: Pt(8.0),
            banner_height: Pt(120.0),
            toc_indent: Pt(20.0),
            toc_number_width: Pt(40.0),
            rule_thickness: Pt(0.75),
            compress: true,
        }
    }
}

impl LayoutConfig {
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_margin(mut self, margin: Pt) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_footer_height(mut self, footer_height: Pt) -> Self {
        self.footer_height = footer_height;
        self
    }

    pub fn with_footer_label(mut self, footer_label: FooterLabel) -> Self {
        self.footer_label = footer_label;
        self
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Parse a configuration from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<LayoutConfig, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Top edge of the content area, measured down from the top of the page
    pub fn content_top(&self) -> Pt {
        self.margin
    }

    /// Lowest point content may reach, measured down from the top of the
    /// page. The footer strip sits below it.
    pub fn content_bottom(&self) -> Pt {
        self.page_size.1 - self.margin - self.footer_height
    }

    /// Vertical room for content on one page
    pub fn usable_height(&self) -> Pt {
        self.content_bottom() - self.content_top()
    }

    pub fn content_width(&self) -> Pt {
        self.page_size.0 - self.margin * 2.0
    }

    /// Height of one swatch grid row: the cell plus its label strip
    pub fn swatch_row_height(&self) -> Pt {
        self.swatch.height + self.swatch_label_height
    }

    /// The page geometry cannot hold any content
    pub(crate) fn validate(&self) -> Result<(), String> {
        let (w, h) = self.page_size;
        if !(w.is_valid_length() && h.is_valid_length()) {
            return Err(format!("page size {w}x{h} is invalid"));
        }
        if !self.margin.is_valid_length() || !self.footer_height.is_valid_length() {
            return Err("margins must be non-negative".into());
        }
        if self.usable_height() <= Pt::ZERO || self.content_width() <= Pt::ZERO {
            return Err("margins and footer leave no room for content".into());
        }
        Ok(())
    }
}
