//! Standard PDF fonts and their advance widths.
//!
//! Widths are the Adobe AFM values in 1/1000 em for the WinAnsi code
//! points 32..=126. Accented Latin-1 letters borrow the width of their base
//! letter; anything else uses the font's missing width. The text is
//! invisible, so widths only need to be consistent with what is emitted.

use std::str::FromStr;

use crate::error::Error;

/// Standard 14 fonts with built-in metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
    Helvetica,
    HelveticaOblique,
    TimesRoman,
}

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const TIMES_ROMAN_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

impl StandardFont {
    /// PostScript name written as `/BaseFont`.
    pub fn base_font(&self) -> &'static str {
        match self {
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
            StandardFont::CourierOblique => "Courier-Oblique",
            StandardFont::CourierBoldOblique => "Courier-BoldOblique",
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
            StandardFont::TimesRoman => "Times-Roman",
        }
    }

    /// True for the Courier family.
    pub fn is_fixed_pitch(&self) -> bool {
        matches!(
            self,
            StandardFont::Courier
                | StandardFont::CourierBold
                | StandardFont::CourierOblique
                | StandardFont::CourierBoldOblique
        )
    }

    fn missing_width(&self) -> u16 {
        match self {
            _ if self.is_fixed_pitch() => 600,
            StandardFont::Helvetica | StandardFont::HelveticaOblique => 556,
            _ => 500,
        }
    }

    /// Advance width of one WinAnsi code in 1/1000 em.
    pub fn code_width(&self, code: u8) -> u16 {
        if self.is_fixed_pitch() {
            return 600;
        }
        let table = match self {
            StandardFont::Helvetica | StandardFont::HelveticaOblique => &HELVETICA_WIDTHS,
            _ => &TIMES_ROMAN_WIDTHS,
        };

        match code {
            32..=126 => table[usize::from(code - 32)],
            0x85 | 0x97 => 1000,
            0x95 => 350,
            0xA0 => table[0],
            _ => match latin1_base_letter(code) {
                Some(base) => table[usize::from(base - 32)],
                None => self.missing_width(),
            },
        }
    }

    /// Width of already-encoded text in points at `size`.
    pub fn encoded_width(&self, encoded: &[u8], size: f64) -> f64 {
        let units: u32 = encoded.iter().map(|&c| u32::from(self.code_width(c))).sum();
        f64::from(units) * size / 1000.0
    }

    /// Width of `text` in points at `size`.
    pub fn string_width(&self, text: &str, size: f64) -> f64 {
        self.encoded_width(&encode_win_ansi(text), size)
    }
}

impl FromStr for StandardFont {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let font = match s.trim() {
            "Courier" => StandardFont::Courier,
            "Courier-Bold" => StandardFont::CourierBold,
            "Courier-Oblique" => StandardFont::CourierOblique,
            "Courier-BoldOblique" => StandardFont::CourierBoldOblique,
            "Helvetica" => StandardFont::Helvetica,
            "Helvetica-Oblique" => StandardFont::HelveticaOblique,
            "Times-Roman" => StandardFont::TimesRoman,
            other => return Err(Error::UnknownFont(other.to_string())),
        };
        Ok(font)
    }
}

impl std::fmt::Display for StandardFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.base_font())
    }
}

/// Encode text as WinAnsi bytes; unmappable characters become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            ' '..='~' => ch as u8,
            '\u{A0}'..='\u{FF}' => ch as u32 as u8,
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            _ => b'?',
        })
        .collect()
}

fn latin1_base_letter(code: u8) -> Option<u8> {
    let base = match code {
        0xC0..=0xC5 => b'A',
        0xC7 => b'C',
        0xC8..=0xCB => b'E',
        0xCC..=0xCF => b'I',
        0xD1 => b'N',
        0xD2..=0xD6 | 0xD8 => b'O',
        0xD9..=0xDC => b'U',
        0xDD => b'Y',
        0xE0..=0xE5 => b'a',
        0xE7 => b'c',
        0xE8..=0xEB => b'e',
        0xEC..=0xEF => b'i',
        0xF1 => b'n',
        0xF2..=0xF6 | 0xF8 => b'o',
        0xF9..=0xFC => b'u',
        0xFD | 0xFF => b'y',
        0x91 | 0x92 => b'\'',
        0x93 | 0x94 => b'"',
        0x96 => b'-',
        _ => return None,
    };
    Some(base)
}
