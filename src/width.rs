//! On-screen width measurement for Unicode text.
//!
//! Every string the renderer prints is measured here before it is
//! positioned. A single mis-measured label skews every column to its right
//! for the rest of the run, so the UTF-16 path refuses malformed input
//! instead of guessing.

use thiserror::Error;

/// A UTF-16 buffer that cannot be decoded into code points.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodingError {
    /// A low surrogate appeared without a preceding high surrogate.
    #[error("unpaired low surrogate 0x{0:04x} at unit {1}")]
    UnpairedLow(u16, usize),
    /// A high surrogate at end of input or not followed by a low surrogate.
    #[error("unpaired high surrogate 0x{0:04x} at unit {1}")]
    UnpairedHigh(u16, usize),
}

/// Decision rule for how many terminal columns a code point occupies.
pub trait WidthRule: Send {
    fn char_width(&self, c: char) -> usize;
}

/// Default rule: symbol/emoji-like code points are double width, everything
/// else is a single column. Covers the dingbat block (U+2700..U+27FF) and
/// the pictograph range U+1F300..U+1F600 the status glyphs come from.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymbolRule;

impl WidthRule for SymbolRule {
    fn char_width(&self, c: char) -> usize {
        let cp = c as u32;
        if (cp & 0xff00) == 0x2700 || (0x1f300..0x1f600).contains(&cp) {
            2
        } else {
            1
        }
    }
}

/// Rule backed by the Unicode East Asian Width tables, for hosts whose item
/// names go beyond the symbol ranges [`SymbolRule`] handles.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeRule;

impl WidthRule for UnicodeRule {
    fn char_width(&self, c: char) -> usize {
        unicode_width::UnicodeWidthChar::width(c).unwrap_or(0)
    }
}

/// Number of terminal columns `text` occupies under `rule`.
pub fn str_width(text: &str, rule: &dyn WidthRule) -> usize {
    text.chars().map(|c| rule.char_width(c)).sum()
}

/// Width of a raw UTF-16 buffer, decoding surrogate pairs into single code
/// points before applying `rule`.
///
/// This is the boundary API for hosts holding UTF-16 text; `&str` input can
/// never be malformed and goes through [`str_width`] instead.
pub fn utf16_width(units: &[u16], rule: &dyn WidthRule) -> Result<usize, EncodingError> {
    let mut sum = 0;
    let mut i = 0;
    while i < units.len() {
        let unit = units[i];
        i += 1;
        if unit & 0xf800 != 0xd800 {
            sum += char::from_u32(u32::from(unit)).map_or(1, |c| rule.char_width(c));
            continue;
        }
        if unit & 0x0400 != 0 {
            return Err(EncodingError::UnpairedLow(unit, i - 1));
        }
        let low = match units.get(i) {
            Some(&low) if low & 0xfc00 == 0xdc00 => low,
            _ => return Err(EncodingError::UnpairedHigh(unit, i - 1)),
        };
        i += 1;
        let cp = 0x10000 + ((u32::from(unit) & 0x3ff) << 10 | (u32::from(low) & 0x3ff));
        sum += char::from_u32(cp).map_or(1, |c| rule.char_width(c));
    }
    Ok(sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("", 0)]
    #[case("a", 1)]
    #[case("hello", 5)]
    #[case("mod-core-utils", 14)]
    fn ascii_width_matches_length(#[case] text: &str, #[case] expected: usize) {
        assert_eq!(str_width(text, &SymbolRule), expected);
    }

    #[rstest]
    #[case("\u{2705}", 2)] // white heavy check mark
    #[case("\u{274c}", 2)] // cross mark
    #[case("\u{1f504}", 2)] // anticlockwise arrows
    #[case("a\u{2705}b", 4)]
    fn symbols_are_double_width(#[case] text: &str, #[case] expected: usize) {
        assert_eq!(str_width(text, &SymbolRule), expected);
    }

    #[test]
    fn unicode_rule_handles_east_asian_width() {
        assert_eq!(str_width("abc", &UnicodeRule), 3);
        assert_eq!(str_width("\u{754c}", &UnicodeRule), 2); // CJK ideograph
    }

    #[test]
    fn utf16_pair_decodes_to_one_code_point() {
        // U+1F504 encoded as a surrogate pair.
        assert_eq!(utf16_width(&[0xd83d, 0xdd04], &SymbolRule), Ok(2));
        // BMP symbol needs no pairing.
        assert_eq!(utf16_width(&[0x2705], &SymbolRule), Ok(2));
        assert_eq!(utf16_width(&[0x0041, 0x0042], &SymbolRule), Ok(2));
    }

    #[rstest]
    #[case(&[0xdd04], EncodingError::UnpairedLow(0xdd04, 0))]
    #[case(&[0xd83d], EncodingError::UnpairedHigh(0xd83d, 0))]
    #[case(&[0xd83d, 0x0041], EncodingError::UnpairedHigh(0xd83d, 0))]
    #[case(&[0x0041, 0xd83d], EncodingError::UnpairedHigh(0xd83d, 1))]
    fn malformed_utf16_fails_loudly(#[case] units: &[u16], #[case] expected: EncodingError) {
        assert_eq!(utf16_width(units, &SymbolRule), Err(expected));
    }
}
