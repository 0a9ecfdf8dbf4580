use crate::refs::{ObjectReferences, RefType};
use pdf_writer::{Name, Pdf};
use serde::{Deserialize, Serialize};

/// The fonts the compositor sets text in. These are standard PDF fonts that
/// every viewer ships, so nothing is embedded in the generated document; text
/// is encoded with WinAnsi (Windows-1252).
///
/// Fonts are referred to in content streams by their index, i.e. `/F0`..`/F2`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuiltinFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
}

impl BuiltinFont {
    pub const ALL: [BuiltinFont; 3] = [
        BuiltinFont::Helvetica,
        BuiltinFont::HelveticaBold,
        BuiltinFont::HelveticaOblique,
    ];

    /// Index of the font within the page resources
    pub fn index(self) -> usize {
        match self {
            BuiltinFont::Helvetica => 0,
            BuiltinFont::HelveticaBold => 1,
            BuiltinFont::HelveticaOblique => 2,
        }
    }

    /// The PostScript name of the font, as written to `/BaseFont`
    pub fn base_name(self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
            BuiltinFont::HelveticaOblique => "Helvetica-Oblique",
        }
    }

    /// Parse the PostScript name back into a font; used for the upstream
    /// "font role" assignments
    pub fn from_base_name(name: &str) -> Option<BuiltinFont> {
        BuiltinFont::ALL
            .into_iter()
            .find(|f| f.base_name().eq_ignore_ascii_case(name.trim()))
    }

    /// Advance width of a WinAnsi byte, in 1/1000 em
    pub fn glyph_width(self, byte: u8) -> f32 {
        let table = match self {
            BuiltinFont::HelveticaBold => &HELVETICA_BOLD_ASCII,
            // the oblique cut shares the upright metrics
            BuiltinFont::Helvetica | BuiltinFont::HelveticaOblique => &HELVETICA_ASCII,
        };
        let bold = self == BuiltinFont::HelveticaBold;
        match byte {
            0..=31 => 0.0,
            32..=126 => table[(byte - 32) as usize],
            0x80 => 556.0,
            0x85 | 0x89 | 0x97 => 1000.0,
            0x91 | 0x92 => {
                if bold {
                    278.0
                } else {
                    222.0
                }
            }
            0x93 | 0x94 => {
                if bold {
                    500.0
                } else {
                    333.0
                }
            }
            0x95 => 350.0,
            0x96 => 556.0,
            0x99 => 1000.0,
            0xA0 => 278.0,
            0xA9 | 0xAE => 737.0,
            0xB0 => 400.0,
            0xC0..=0xDF => 722.0,
            _ => 556.0,
        }
    }

    /// Ascender height as a fraction of the font size
    pub fn ascent(self) -> f32 {
        0.718
    }

    /// Descender depth as a (negative) fraction of the font size
    pub fn descent(self) -> f32 {
        -0.207
    }

    pub(crate) fn write(self, refs: &mut ObjectReferences, writer: &mut Pdf) {
        let id = refs.gen(RefType::Font(self.index()));
        writer
            .type1_font(id)
            .base_font(Name(self.base_name().as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }
}

/// Map a single character into the WinAnsi code page, or [None] if it has no
/// representation there
pub fn winansi_byte(c: char) -> Option<u8> {
    match c as u32 {
        0x0000..=0x007F => Some(c as u8),
        0x00A0..=0x00FF => Some(c as u8),
        0x20AC => Some(0x80),
        0x201A => Some(0x82),
        0x0192 => Some(0x83),
        0x201E => Some(0x84),
        0x2026 => Some(0x85),
        0x2020 => Some(0x86),
        0x2021 => Some(0x87),
        0x02C6 => Some(0x88),
        0x2030 => Some(0x89),
        0x0160 => Some(0x8A),
        0x2039 => Some(0x8B),
        0x0152 => Some(0x8C),
        0x017D => Some(0x8E),
        0x2018 => Some(0x91),
        0x2019 => Some(0x92),
        0x201C => Some(0x93),
        0x201D => Some(0x94),
        0x2022 => Some(0x95),
        0x2013 => Some(0x96),
        0x2014 => Some(0x97),
        0x02DC => Some(0x98),
        0x2122 => Some(0x99),
        0x0161 => Some(0x9A),
        0x203A => Some(0x9B),
        0x0153 => Some(0x9C),
        0x017E => Some(0x9E),
        0x0178 => Some(0x9F),
        _ => None,
    }
}

/// Encode text for a WinAnsi content stream. Characters outside the code page
/// are replaced with `?`; measurement rejects them before anything is placed,
/// so this only matters for text that bypassed measurement (footers).
pub fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars().map(|c| winansi_byte(c).unwrap_or(b'?')).collect()
}

#[rustfmt::skip]
const HELVETICA_ASCII: [f32; 95] = [
    278.0, 278.0, 355.0, 556.0, 556.0, 889.0, 667.0, 191.0, 333.0, 333.0, 389.0, 584.0, 278.0, 333.0, 278.0, 278.0,
    556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 278.0, 278.0, 584.0, 584.0, 584.0, 556.0,
    1015.0, 667.0, 667.0, 722.0, 722.0, 667.0, 611.0, 778.0, 722.0, 278.0, 500.0, 667.0, 556.0, 833.0, 722.0, 778.0,
    667.0, 778.0, 722.0, 667.0, 611.0, 722.0, 667.0, 944.0, 667.0, 667.0, 611.0, 278.0, 278.0, 278.0, 469.0, 556.0,
    333.0, 556.0, 556.0, 500.0, 556.0, 556.0, 278.0, 556.0, 556.0, 222.0, 222.0, 500.0, 222.0, 833.0, 556.0, 556.0,
    556.0, 556.0, 333.0, 500.0, 278.0, 556.0, 500.0, 722.0, 500.0, 500.0, 500.0, 334.0, 260.0, 334.0, 584.0,
];

#[rustfmt::skip]
const HELVETICA_BOLD_ASCII: [f32; 95] = [
    278.0, 333.0, 474.0, 556.0, 556.0, 889.0, 722.0, 238.0, 333.0, 333.0, 389.0, 584.0, 278.0, 333.0, 278.0, 278.0,
    556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 556.0, 333.0, 333.0, 584.0, 584.0, 584.0, 611.0,
    975.0, 722.0, 722.0, 722.0, 722.0, 667.0, 611.0, 778.0, 722.0, 278.0, 556.0, 722.0, 611.0, 833.0, 722.0, 778.0,
    667.0, 778.0, 722.0, 667.0, 611.0, 722.0, 667.0, 944.0, 667.0, 667.0, 611.0, 333.0, 278.0, 333.0, 584.0, 556.0,
    333.0, 556.0, 611.0, 556.0, 611.0, 556.0, 333.0, 611.0, 611.0, 278.0, 278.0, 556.0, 278.0, 889.0, 611.0, 611.0,
    611.0, 611.0, 389.0, 556.0, 333.0, 611.0, 556.0, 778.0, 556.0, 556.0, 500.0, 389.0, 280.0, 389.0, 584.0,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_widths_come_from_the_tables() {
        assert_eq!(BuiltinFont::Helvetica.glyph_width(b' '), 278.0);
        assert_eq!(BuiltinFont::Helvetica.glyph_width(b'W'), 944.0);
        assert_eq!(BuiltinFont::Helvetica.glyph_width(b'~'), 584.0);
        assert_eq!(BuiltinFont::HelveticaBold.glyph_width(b'm'), 889.0);
        assert_eq!(BuiltinFont::HelveticaOblique.glyph_width(b'i'), 222.0);
    }

    #[test]
    fn typographic_punctuation_maps_into_winansi() {
        assert_eq!(winansi_byte('—'), Some(0x97));
        assert_eq!(winansi_byte('•'), Some(0x95));
        assert_eq!(winansi_byte('é'), Some(0xE9));
        assert_eq!(winansi_byte('漢'), None);
        assert_eq!(to_winansi_bytes("a—漢"), vec![b'a', 0x97, b'?']);
    }

    #[test]
    fn base_names_round_trip() {
        for font in BuiltinFont::ALL {
            assert_eq!(BuiltinFont::from_base_name(font.base_name()), Some(font));
        }
        assert_eq!(BuiltinFont::from_base_name("Comic Sans"), None);
    }
}
