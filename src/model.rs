//! The content model: what goes into a document, independent of pages.
//!
//! A [Document] is an ordered list of [Section]s, each an ordered list of
//! [ContentBlock]s, plus the metadata and [Theme] used to render them. The
//! model is plain data; it can be built in code or deserialised from JSON.

use crate::colour::{colours, Colour};
use crate::error::{ComposeError, Result};
use crate::font::BuiltinFont;
use crate::units::Pt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One atomic layout unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// A heading of level 1 to 3. Without a colour the theme decides.
    Heading {
        level: u8,
        text: String,
        #[serde(default)]
        colour: Option<Colour>,
    },
    Paragraph {
        text: String,
        #[serde(default)]
        style: ParagraphStyle,
    },
    BulletList { items: Vec<String> },
    /// Colour swatches laid out in a fixed number of columns
    SwatchGrid {
        entries: Vec<SwatchEntry>,
        columns: usize,
    },
    /// A bold label followed by a value on the same line
    KeyValueRow {
        label: String,
        value: String,
        #[serde(default)]
        value_colour: Option<Colour>,
    },
    /// A framed mock-up of a template built from placeholder elements
    TemplatePreview { elements: Vec<MockElement> },
    /// A thin horizontal separator
    Rule,
    /// Vertical whitespace
    Spacer { height: Pt },
    /// A table of contents line naming another section. The page number is
    /// filled in once every section has been placed.
    TocEntry { title: String, section: usize },
    /// A full-width colour band with a title, as used on cover pages
    Banner {
        title: String,
        #[serde(default)]
        subtitle: Option<String>,
        colour: Colour,
    },
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphStyle {
    #[default]
    Body,
    Small,
    Emphasis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwatchEntry {
    pub label: String,
    pub colour: Colour,
}

impl SwatchEntry {
    pub fn new<S: ToString>(label: S, colour: Colour) -> SwatchEntry {
        SwatchEntry {
            label: label.to_string(),
            colour,
        }
    }
}

/// Building blocks of a [ContentBlock::TemplatePreview]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MockElement {
    /// A solid bar spanning the preview, e.g. a letterhead strip
    Bar { height: Pt, colour: Colour },
    /// Grey strokes standing in for running copy
    TextLines { count: usize, width_fraction: f32 },
    /// An outlined box marking where an image or logo goes
    Placeholder { label: String, height: Pt },
    /// A single line of real text
    Caption { text: String },
}

/// A named run of blocks that always starts on a fresh page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
}

impl Section {
    pub fn new<S: ToString>(name: S) -> Section {
        Section {
            name: name.to_string(),
            blocks: Vec::new(),
        }
    }

    /// Append a block, returning the section for chaining
    pub fn with(mut self, block: ContentBlock) -> Section {
        self.blocks.push(block);
        self
    }

    pub fn push(&mut self, block: ContentBlock) -> &mut Self {
        self.blocks.push(block);
        self
    }
}

/// Font sizes for each text role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Typography {
    pub h1: Pt,
    pub h2: Pt,
    pub h3: Pt,
    pub body: Pt,
    pub small: Pt,
    pub heading_font: BuiltinFont,
    pub body_font: BuiltinFont,
    pub accent_font: BuiltinFont,
}

impl Default for Typography {
    fn default() -> Self {
        Typography {
            h1: Pt(32.0),
            h2: Pt(24.0),
            h3: Pt(20.0),
            body: Pt(12.0),
            small: Pt(10.0),
            heading_font: BuiltinFont::HelveticaBold,
            body_font: BuiltinFont::Helvetica,
            accent_font: BuiltinFont::HelveticaOblique,
        }
    }
}

/// Colours and typography applied while rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub primary: Colour,
    pub secondary: Colour,
    pub accent: Colour,
    pub text: Colour,
    pub muted: Colour,
    pub typography: Typography,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            primary: Colour::new_rgb_bytes(0x2a, 0x5c, 0xaa),
            secondary: Colour::new_rgb_bytes(0xf4, 0xb2, 0x23),
            accent: Colour::new_rgb_bytes(0xe7, 0x4c, 0x3c),
            text: colours::TEXT,
            muted: colours::MUTED,
            typography: Typography::default(),
        }
    }
}

impl Theme {
    /// Font and size used to set a heading of the given level
    pub fn heading_style(&self, level: u8) -> (BuiltinFont, Pt) {
        let size = match level {
            1 => self.typography.h1,
            2 => self.typography.h2,
            _ => self.typography.h3,
        };
        (self.typography.heading_font, size)
    }

    /// Default colour of a heading: primary for level 1, text for 2, muted after
    pub fn heading_colour(&self, level: u8) -> Colour {
        match level {
            1 => self.primary,
            2 => self.text,
            _ => self.muted,
        }
    }

    pub fn paragraph_style(&self, style: ParagraphStyle) -> (BuiltinFont, Pt) {
        match style {
            ParagraphStyle::Body => (self.typography.body_font, self.typography.body),
            ParagraphStyle::Small => (self.typography.body_font, self.typography.small),
            ParagraphStyle::Emphasis => (self.typography.accent_font, self.typography.body),
        }
    }
}

/// Everything needed to compose one paginated document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub theme: Theme,
    pub sections: Vec<Section>,
}

impl Document {
    pub fn new<S: ToString>(title: S) -> Document {
        Document {
            title: title.to_string(),
            author: None,
            subject: None,
            keywords: None,
            created: Utc::now(),
            theme: Theme::default(),
            sections: Vec::new(),
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Document {
        self.theme = theme;
        self
    }

    pub fn with_section(mut self, section: Section) -> Document {
        self.sections.push(section);
        self
    }

    pub fn add_section(&mut self, section: Section) -> &mut Self {
        self.sections.push(section);
        self
    }

    /// Total number of blocks across all sections
    pub fn block_count(&self) -> usize {
        self.sections.iter().map(|s| s.blocks.len()).sum()
    }

    /// Check that the document can be laid out. Runs before any page exists so
    /// that malformed input fails fast.
    pub fn validate(&self) -> Result<()> {
        if self.sections.is_empty() {
            return Err(ComposeError::invalid("document has no sections"));
        }
        if self.title.trim().is_empty() {
            return Err(ComposeError::invalid("document title is empty"));
        }

        for (si, section) in self.sections.iter().enumerate() {
            if section.name.trim().is_empty() {
                return Err(ComposeError::invalid_at("section name is empty", si, None));
            }
            for (bi, block) in section.blocks.iter().enumerate() {
                block
                    .validate()
                    .map_err(|reason| ComposeError::invalid_at(reason, si, Some(bi)))?;
                if let ContentBlock::TocEntry { section: target, .. } = block {
                    if *target >= self.sections.len() {
                        return Err(ComposeError::invalid_at(
                            format!("contents entry points at missing section {target}"),
                            si,
                            Some(bi),
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}

impl ContentBlock {
    /// Short name of the variant, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            ContentBlock::Heading { .. } => "heading",
            ContentBlock::Paragraph { .. } => "paragraph",
            ContentBlock::BulletList { .. } => "bullet list",
            ContentBlock::SwatchGrid { .. } => "swatch grid",
            ContentBlock::KeyValueRow { .. } => "key/value row",
            ContentBlock::TemplatePreview { .. } => "template preview",
            ContentBlock::Rule => "rule",
            ContentBlock::Spacer { .. } => "spacer",
            ContentBlock::TocEntry { .. } => "contents entry",
            ContentBlock::Banner { .. } => "banner",
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let blank = |s: &str| s.trim().is_empty();
        match self {
            ContentBlock::Heading { level, text, .. } => {
                if !(1..=3).contains(level) {
                    return Err(format!("heading level {level} is not between 1 and 3"));
                }
                if blank(text) {
                    return Err("heading text is empty".into());
                }
            }
            ContentBlock::Paragraph { text, .. } => {
                if blank(text) {
                    return Err("paragraph text is empty".into());
                }
            }
            ContentBlock::BulletList { items } => {
                if items.is_empty() {
                    return Err("bullet list has no items".into());
                }
                if let Some(i) = items.iter().position(|item| blank(item)) {
                    return Err(format!("bullet list item {i} is empty"));
                }
            }
            ContentBlock::SwatchGrid { entries, columns } => {
                if *columns == 0 {
                    return Err("swatch grid needs at least one column".into());
                }
                if entries.is_empty() {
                    return Err("swatch grid has no entries".into());
                }
                if let Some(i) = entries.iter().position(|e| blank(&e.label)) {
                    return Err(format!("swatch {i} has no label"));
                }
            }
            ContentBlock::KeyValueRow { label, value, .. } => {
                if blank(label) {
                    return Err("key/value row has no label".into());
                }
                if blank(value) {
                    return Err(format!("key/value row {label:?} has no value"));
                }
            }
            ContentBlock::TemplatePreview { elements } => {
                if elements.is_empty() {
                    return Err("template preview has no elements".into());
                }
                for element in elements {
                    element.validate()?;
                }
            }
            ContentBlock::Rule => {}
            ContentBlock::Spacer { height } => {
                if !height.is_valid_length() {
                    return Err(format!("spacer height {height} is invalid"));
                }
            }
            ContentBlock::Banner { title, .. } => {
                if blank(title) {
                    return Err("banner title is empty".into());
                }
            }
            ContentBlock::TocEntry { title, .. } => {
                if blank(title) {
                    return Err("contents entry has no title".into());
                }
            }
        }
        Ok(())
    }
}

impl MockElement {
    fn validate(&self) -> std::result::Result<(), String> {
        match self {
            MockElement::Bar { height, .. } | MockElement::Placeholder { height, .. }
                if !height.is_valid_length() =>
            {
                Err(format!("mock element height {height} is invalid"))
            }
            MockElement::TextLines { count: 0, .. } => Err("mock text lines need a count".into()),
            MockElement::TextLines { width_fraction, .. }
                if !(*width_fraction > 0.0 && *width_fraction <= 1.0) =>
            {
                Err(format!("mock text width {width_fraction} is not in (0, 1]"))
            }
            MockElement::Caption { text } if text.trim().is_empty() => {
                Err("mock caption is empty".into())
            }
            _ => Ok(()),
        }
    }
}
