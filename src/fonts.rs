use pdf_writer::{Name, Pdf, Ref};

/// Approximate ascender of Helvetica at 1000 units/em, as a ratio of font size.
pub const ASCENDER_RATIO: f32 = 0.718;

/// The two standard Type1 faces every report uses. Neither is embedded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
}

impl FontFace {
    pub const ALL: [FontFace; 2] = [FontFace::Regular, FontFace::Bold];

    pub(crate) fn pdf_name(self) -> &'static str {
        match self {
            FontFace::Regular => "F1",
            FontFace::Bold => "F2",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            FontFace::Regular => "Helvetica",
            FontFace::Bold => "Helvetica-Bold",
        }
    }

    /// Width of a WinAnsi byte (>= 32) in 1000-units.
    fn width_1000(self, b: u8) -> f32 {
        match self {
            FontFace::Regular => helvetica_width(b),
            FontFace::Bold => helvetica_bold_width(b),
        }
    }
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007F => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Characters outside the code page are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(char_to_winansi)
        .filter(|&b| b >= 32)
        .collect()
}

/// Approximate Helvetica widths at 1000 units/em.
fn helvetica_width(b: u8) -> f32 {
    match b {
        32 => 278.0,                          // space
        33..=47 => 333.0,                     // punctuation
        48..=57 => 556.0,                     // digits
        58..=64 => 333.0,                     // more punctuation
        73 | 74 => 278.0,                     // I J (narrow uppercase)
        77 => 833.0,                          // M (wide)
        87 => 944.0,                          // W
        65..=90 => 667.0,                     // uppercase A-Z (average)
        91..=96 => 333.0,                     // brackets etc.
        102 | 105 | 106 | 108 | 116 => 278.0, // narrow lowercase: f i j l t
        109 | 119 => 833.0,                   // m w (wide)
        97..=122 => 556.0,                    // lowercase a-z (average)
        _ => 556.0,
    }
}

/// Approximate Helvetica-Bold widths at 1000 units/em.
fn helvetica_bold_width(b: u8) -> f32 {
    match b {
        32 => 278.0,
        33..=47 => 333.0,
        48..=57 => 556.0,
        58..=64 => 333.0,
        73 => 278.0,
        74 => 556.0,
        77 => 833.0,
        87 => 944.0,
        65..=90 => 722.0,
        91..=96 => 333.0,
        105 | 106 | 108 => 278.0,
        102 | 116 => 333.0,
        109 => 889.0,
        119 => 778.0,
        97..=122 => 611.0,
        _ => 556.0,
    }
}

pub fn text_width(face: FontFace, text: &str, font_size: f32) -> f32 {
    to_winansi_bytes(text)
        .iter()
        .map(|&b| face.width_1000(b) * font_size / 1000.0)
        .sum()
}

/// Write the standard font dictionaries and return their resource names and refs.
pub(crate) fn register_fonts(
    pdf: &mut Pdf,
    alloc: &mut impl FnMut() -> Ref,
) -> Vec<(&'static str, Ref)> {
    FontFace::ALL
        .iter()
        .map(|&face| {
            let font_ref = alloc();
            pdf.type1_font(font_ref)
                .base_font(Name(face.base_font().as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            (face.pdf_name(), font_ref)
        })
        .collect()
}
