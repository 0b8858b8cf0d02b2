/// Built-in base-14 fonts used by the report. No embedding: every viewer
/// ships Helvetica, and the layout only needs approximate advance widths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    pub(crate) fn base_name(&self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Resource name inside page content streams.
    pub(crate) fn pdf_name(&self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }

    pub(crate) const ALL: [Font; 2] = [Font::Helvetica, Font::HelveticaBold];
}

/// Map a single Unicode char to its WinAnsi (Windows-1252) byte, or 0 if
/// unmappable. Bytes 0x80-0x9F carry the usual remapped punctuation.
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

/// Convert a UTF-8 string to WinAnsi bytes for PDF Str encoding.
/// Unmappable characters are dropped rather than substituted.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(char_to_winansi)
        .filter(|&b| b != 0)
        .collect()
}

/// Approximate Helvetica advance width at 1000 units/em. Close enough for
/// wrapping and column alignment; the viewer's real metrics draw the text.
fn regular_width_1000(byte: u8) -> f32 {
    match byte {
        32 => 278.0,                          // space
        33..=47 => 333.0,                     // punctuation
        48..=57 => 556.0,                     // digits
        58..=64 => 333.0,                     // more punctuation
        73 | 74 => 278.0,                     // I J (narrow uppercase)
        77 | 87 => 889.0,                     // M W (wide)
        65..=90 => 667.0,                     // uppercase A-Z (average)
        91..=96 => 333.0,                     // brackets etc.
        102 | 105 | 106 | 108 | 116 => 278.0, // narrow lowercase: f i j l t
        109 | 119 => 833.0,                   // m w (wide)
        97..=122 => 556.0,                    // lowercase a-z (average)
        _ => 556.0,
    }
}

pub(crate) fn char_width_1000(font: Font, ch: char) -> f32 {
    let byte = char_to_winansi(ch);
    if byte < 32 {
        return 0.0;
    }
    let w = regular_width_1000(byte);
    match font {
        Font::Helvetica => w,
        // Helvetica-Bold runs about 5% wider on average
        Font::HelveticaBold => w * 1.05,
    }
}

/// Advance width of a string at the given size, in points.
pub(crate) fn text_width(font: Font, text: &str, size: f32) -> f32 {
    text.chars()
        .map(|ch| char_width_1000(font, ch) * size / 1000.0)
        .sum()
}
