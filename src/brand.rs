//! Brand guideline documents.
//!
//! A [BrandKit] is the payload an upload front end hands over: the brand's
//! name, palette, font roles and guideline copy, plus references to the
//! images that were uploaded. [build_document] turns it into a [Document]
//! with one section per chapter of the guidelines. Image analysis is not
//! performed; [stub_palette] stands in for it.

use crate::colour::{Colour, ParseColourError};
use crate::font::BuiltinFont;
use crate::model::{
    ContentBlock, Document, MockElement, ParagraphStyle, Section, SwatchEntry, Theme, Typography,
};
use crate::units::Pt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Problems with an upstream brand kit payload
#[derive(Error, Debug)]
pub enum BrandError {
    #[error("invalid brand kit JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid colour {0}")]
    InvalidColour(String),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("unknown font {0:?}")]
    UnknownFont(String),
}

/// Palette roles in the order they are presented
const ROLE_ORDER: [&str; 5] = ["primary", "secondary", "accent", "dark", "light"];

/// A reference to an uploaded image. The image itself is never opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontRoles {
    pub heading: String,
    pub body: String,
    pub accent: String,
}

impl Default for FontRoles {
    fn default() -> Self {
        FontRoles {
            heading: BuiltinFont::HelveticaBold.base_name().to_string(),
            body: BuiltinFont::Helvetica.base_name().to_string(),
            accent: BuiltinFont::HelveticaOblique.base_name().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingSizes {
    pub h1: f32,
    pub h2: f32,
    pub h3: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySizes {
    pub normal: f32,
    pub small: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographySizes {
    pub heading_sizes: HeadingSizes,
    pub body_sizes: BodySizes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogoUsage {
    pub clearspace: String,
    pub sizes: Vec<String>,
    pub incorrect_usage: Vec<String>,
}

impl Default for LogoUsage {
    fn default() -> Self {
        LogoUsage {
            clearspace: "20px clearance".into(),
            sizes: vec!["Full color".into(), "Monochrome".into(), "Reverse".into()],
            incorrect_usage: vec![
                "Don't stretch".into(),
                "Don't recolor".into(),
                "Don't rotate".into(),
            ],
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoGuidelines {
    /// Description of the logo's style. Filler copy is used when empty.
    pub analysis: String,
    pub usage: LogoUsage,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Imagery {
    pub style: String,
    pub composition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandVoice {
    pub tone: String,
    pub attributes: Vec<String>,
}

impl Default for BrandVoice {
    fn default() -> Self {
        BrandVoice {
            tone: "Professional yet approachable".into(),
            attributes: vec![
                "Innovative".into(),
                "Reliable".into(),
                "Forward-thinking".into(),
            ],
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Everything the upstream collaborator supplies for one brand guidelines
/// document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandKit {
    pub brand_name: String,
    #[serde(default = "default_tagline")]
    pub tagline: String,
    #[serde(default = "default_version")]
    pub version: String,
    /// Semantic name to hex colour. Without one, the stub palette is used.
    #[serde(default)]
    pub colors: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub fonts: FontRoles,
    #[serde(default)]
    pub typography: Option<TypographySizes>,
    #[serde(default)]
    pub logo: LogoGuidelines,
    #[serde(default)]
    pub imagery: Imagery,
    #[serde(default)]
    pub brand_voice: BrandVoice,
    #[serde(default)]
    pub contact: Contact,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

fn default_tagline() -> String {
    "Innovating tomorrow".to_string()
}

fn default_version() -> String {
    "1.0".to_string()
}

impl BrandKit {
    pub fn new<S: ToString>(brand_name: S) -> BrandKit {
        BrandKit {
            brand_name: brand_name.to_string(),
            tagline: default_tagline(),
            version: default_version(),
            colors: None,
            fonts: FontRoles::default(),
            typography: None,
            logo: LogoGuidelines::default(),
            imagery: Imagery::default(),
            brand_voice: BrandVoice::default(),
            contact: Contact::default(),
            images: Vec::new(),
            author: None,
            created: None,
        }
    }

    pub fn from_json(json: &str) -> Result<BrandKit, BrandError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The palette in presentation order: the well-known roles first, then
    /// any other names alphabetically
    pub fn palette(&self) -> Result<Vec<(String, Colour)>, BrandError> {
        let Some(colors) = self.colors.as_ref().filter(|c| !c.is_empty()) else {
            return Ok(stub_palette(&self.images));
        };

        let mut palette = Vec::with_capacity(colors.len());
        for role in ROLE_ORDER {
            if let Some(value) = colors.get(role) {
                palette.push((role.to_string(), parse_colour(role, value)?));
            }
        }
        for (name, value) in colors {
            if !ROLE_ORDER.contains(&name.as_str()) {
                palette.push((name.clone(), parse_colour(name, value)?));
            }
        }
        Ok(palette)
    }
}

fn parse_colour(role: &str, value: &str) -> Result<Colour, BrandError> {
    Colour::from_hex(value).map_err(|ParseColourError(reason)| {
        BrandError::InvalidColour(format!("{role} = {value:?}: {reason}"))
    })
}

/// The palette reported for a set of uploaded images. Always the same five
/// colours; no pixels are read.
pub fn stub_palette(images: &[ImageRef]) -> Vec<(String, Colour)> {
    log::debug!("using the stub palette for {} images", images.len());
    vec![
        ("primary".into(), Colour::new_rgb_bytes(0x2a, 0x5c, 0xaa)),
        ("secondary".into(), Colour::new_rgb_bytes(0xf4, 0xb2, 0x23)),
        ("accent".into(), Colour::new_rgb_bytes(0xe7, 0x4c, 0x3c)),
        ("dark".into(), Colour::new_rgb_bytes(0x2c, 0x3e, 0x50)),
        ("light".into(), Colour::new_rgb_bytes(0xec, 0xf0, 0xf1)),
    ]
}

fn font(name: &str) -> Result<BuiltinFont, BrandError> {
    BuiltinFont::from_base_name(name).ok_or_else(|| BrandError::UnknownFont(name.to_string()))
}

fn or_filler(text: &str, words: usize) -> String {
    if text.trim().is_empty() {
        lipsum::lipsum(words)
    } else {
        text.to_string()
    }
}

fn heading(level: u8, text: impl ToString) -> ContentBlock {
    ContentBlock::Heading {
        level,
        text: text.to_string(),
        colour: None,
    }
}

fn paragraph(text: impl ToString) -> ContentBlock {
    ContentBlock::Paragraph {
        text: text.to_string(),
        style: ParagraphStyle::Body,
    }
}

/// Add a sub-heading and a bullet list, unless there is nothing to list
fn push_list<I: IntoIterator<Item = String>>(section: &mut Section, title: &str, items: I) {
    let items: Vec<String> = items
        .into_iter()
        .filter(|item| !item.trim().is_empty())
        .collect();
    if !items.is_empty() {
        section
            .push(heading(3, title))
            .push(ContentBlock::BulletList { items });
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Chapter titles, numbered as they appear in the table of contents
const CHAPTERS: [&str; 7] = [
    "Introduction",
    "Brand Colors",
    "Typography",
    "Logo Usage",
    "Imagery Guidelines",
    "Brand Voice",
    "Contact Information",
];

fn chapter(number: usize) -> String {
    format!("{}. {}", number, CHAPTERS[number - 1])
}

/// Build the brand guidelines document for a kit
pub fn build_document(kit: &BrandKit) -> Result<Document, BrandError> {
    if kit.brand_name.trim().is_empty() {
        return Err(BrandError::MissingField("brandName"));
    }

    let palette = kit.palette()?;
    let role = |name: &str, fallback: Colour| {
        palette
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| *c)
            .unwrap_or(fallback)
    };

    let mut typography = Typography {
        heading_font: font(&kit.fonts.heading)?,
        body_font: font(&kit.fonts.body)?,
        accent_font: font(&kit.fonts.accent)?,
        ..Typography::default()
    };
    if let Some(sizes) = &kit.typography {
        typography.h1 = Pt(sizes.heading_sizes.h1);
        typography.h2 = Pt(sizes.heading_sizes.h2);
        typography.h3 = Pt(sizes.heading_sizes.h3);
        typography.body = Pt(sizes.body_sizes.normal);
        typography.small = Pt(sizes.body_sizes.small);
    }

    let defaults = Theme::default();
    let theme = Theme {
        primary: role("primary", defaults.primary),
        secondary: role("secondary", defaults.secondary),
        accent: role("accent", defaults.accent),
        typography,
        ..defaults
    };

    let created = kit.created.unwrap_or_else(Utc::now);
    let brand = kit.brand_name.trim();
    let mut document = Document::new(format!("{brand} Brand Guidelines"));
    document.author = Some(
        kit.author
            .clone()
            .unwrap_or_else(|| format!("{brand} Creative Team")),
    );
    document.subject = Some(format!("Visual and verbal identity of {brand}"));
    document.keywords = Some("brand,guidelines,design".into());
    document.created = created;

    document
        .add_section(
            Section::new("Cover")
                .with(ContentBlock::Banner {
                    title: brand.to_string(),
                    subtitle: Some(kit.tagline.clone()).filter(|t| !t.trim().is_empty()),
                    colour: theme.primary,
                })
                .with(ContentBlock::Paragraph {
                    text: format!("Version {} | {}", kit.version, created.format("%-d %B %Y")),
                    style: ParagraphStyle::Small,
                }),
        )
        .add_section(table_of_contents())
        .add_section(introduction(kit, brand))
        .add_section(colours(&palette, &theme))
        .add_section(typography_section(&theme))
        .add_section(logo_usage(kit, &theme))
        .add_section(imagery(kit))
        .add_section(voice(kit))
        .add_section(contact(kit));

    let document = document.with_theme(theme);
    log::debug!(
        "built brand document {:?}: {} sections, {} blocks",
        document.title,
        document.sections.len(),
        document.block_count()
    );
    Ok(document)
}

/// Chapter `n` is section `n + 1`, after the cover and this page
fn table_of_contents() -> Section {
    let mut section = Section::new("Table of Contents").with(heading(1, "Table of Contents"));
    for number in 1..=CHAPTERS.len() {
        section.push(ContentBlock::TocEntry {
            title: chapter(number),
            section: number + 1,
        });
    }
    section
}

fn introduction(kit: &BrandKit, brand: &str) -> Section {
    let mut section = Section::new(CHAPTERS[0])
        .with(heading(1, chapter(1)))
        .with(paragraph(format!(
            "Welcome to the {brand} Brand Guidelines. This document serves as the foundation \
             for all visual and verbal communications representing our brand."
        )));
    let attributes: Vec<&str> = kit
        .brand_voice
        .attributes
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();
    if !attributes.is_empty() {
        section.push(paragraph(format!(
            "Our brand identity is built on the principles of {}. These guidelines ensure \
             consistency across all touchpoints.",
            attributes.join(", ")
        )));
    }
    section
}

fn colours(palette: &[(String, Colour)], theme: &Theme) -> Section {
    let usage = |label: &str, value: &str, colour: Colour| ContentBlock::KeyValueRow {
        label: label.to_string(),
        value: value.to_string(),
        value_colour: Some(colour),
    };

    Section::new(CHAPTERS[1])
        .with(heading(1, chapter(2)))
        .with(heading(3, "Primary Color Palette"))
        .with(ContentBlock::SwatchGrid {
            entries: palette
                .iter()
                .map(|(name, colour)| SwatchEntry::new(name, *colour))
                .collect(),
            columns: 3,
        })
        .with(heading(3, "Color Application"))
        .with(usage(
            "Primary Color:",
            "Use for primary actions and key brand elements",
            theme.primary,
        ))
        .with(usage(
            "Secondary Color:",
            "Use for secondary actions and highlights",
            theme.secondary,
        ))
        .with(usage(
            "Accent Color:",
            "Use sparingly for alerts and important notices",
            theme.accent,
        ))
}

fn typography_section(theme: &Theme) -> Section {
    Section::new(CHAPTERS[2])
        .with(heading(1, chapter(3)))
        .with(heading(3, "Heading Styles"))
        .with(heading(1, "Heading 1"))
        .with(heading(2, "Heading 2"))
        .with(heading(3, "Heading 3"))
        .with(heading(3, "Body Text"))
        .with(paragraph(
            "This is normal body text. Use for paragraphs and general content.",
        ))
        .with(ContentBlock::Paragraph {
            text: "This is small body text. Use for captions and secondary information.".into(),
            style: ParagraphStyle::Small,
        })
        .with(heading(3, "Recommended Pairings"))
        .with(ContentBlock::Heading {
            level: 3,
            text: "Heading in Primary Color".into(),
            colour: Some(theme.primary),
        })
        .with(paragraph(
            "Paired with body text in dark gray for optimal readability and visual hierarchy.",
        ))
}

/// One mock template per uploaded image, showing where the logo sits
fn logo_preview(label: &str, caption: &str, theme: &Theme) -> ContentBlock {
    ContentBlock::TemplatePreview {
        elements: vec![
            MockElement::Bar {
                height: Pt(18.0),
                colour: theme.primary,
            },
            MockElement::Placeholder {
                label: label.to_string(),
                height: Pt(60.0),
            },
            MockElement::TextLines {
                count: 4,
                width_fraction: 0.8,
            },
            MockElement::Caption {
                text: caption.to_string(),
            },
        ],
    }
}

fn logo_usage(kit: &BrandKit, theme: &Theme) -> Section {
    let usage = &kit.logo.usage;
    let mut section = Section::new(CHAPTERS[3])
        .with(heading(1, chapter(4)))
        .with(paragraph(or_filler(&kit.logo.analysis, 30)))
        .with(heading(3, "Clear Space Requirements"))
        .with(paragraph(format!(
            "Maintain minimum {} around the logo at all times.",
            or_filler(&usage.clearspace, 3)
        )));
    push_list(
        &mut section,
        "Correct Usage",
        usage.sizes.iter().map(|s| format!("{s} version")),
    );
    push_list(&mut section, "Incorrect Usage", usage.incorrect_usage.iter().cloned());
    section.push(heading(3, "Templates"));

    if kit.images.is_empty() {
        section.push(logo_preview("Logo", "Letterhead", theme));
    }
    for image in &kit.images {
        let caption = image.description.as_deref().unwrap_or(image.name.as_str());
        section.push(logo_preview(&image.name, caption, theme));
    }
    section
}

fn imagery(kit: &BrandKit) -> Section {
    Section::new(CHAPTERS[4])
        .with(heading(1, chapter(5)))
        .with(heading(3, "Style"))
        .with(paragraph(or_filler(&kit.imagery.style, 20)))
        .with(heading(3, "Composition"))
        .with(paragraph(or_filler(&kit.imagery.composition, 20)))
}

fn voice(kit: &BrandKit) -> Section {
    let mut section = Section::new(CHAPTERS[5])
        .with(heading(1, chapter(6)))
        .with(heading(3, "Tone"))
        .with(paragraph(or_filler(&kit.brand_voice.tone, 12)));
    push_list(&mut section, "Key Attributes", kit.brand_voice.attributes.iter().cloned());
    section
}

fn contact(kit: &BrandKit) -> Section {
    let mut section = Section::new(CHAPTERS[6])
        .with(heading(1, chapter(7)))
        .with(heading(3, "Brand Team"))
        .with(paragraph(
            "For brand-related inquiries and asset requests, please contact:",
        ));
    for (label, value) in [("Email:", &kit.contact.email), ("Phone:", &kit.contact.phone)] {
        if let Some(value) = non_blank(value) {
            section.push(ContentBlock::KeyValueRow {
                label: label.into(),
                value: value.to_string(),
                value_colour: None,
            });
        }
    }
    section.with(ContentBlock::Rule)
}
