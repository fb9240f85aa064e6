// Copy-number symbols and the printable integer codec.

use std::fmt;

/// Largest copy number the printable codec can represent (`0-9`, then `A-Z`).
pub const MAX_ENCODABLE_CN: u8 = 35;

/// Printable form of the gap symbol.
pub const GAP_CHAR: char = '-';

/// One position of a copy-number profile.
///
/// Copy numbers are plain integers; the gap and the separator are sentinels
/// that never take part in arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    /// Marks an un-observed or absent segment.
    Gap,
    /// Number of DNA copies at a segment.
    CopyNumber(u8),
    /// Marks a chromosome or contig boundary.
    Separator,
}

impl Symbol {
    /// Copy-number value, or `None` for the sentinels.
    #[inline]
    pub fn copy_number(self) -> Option<u8> {
        match self {
            Symbol::CopyNumber(cn) => Some(cn),
            Symbol::Gap | Symbol::Separator => None,
        }
    }

    #[inline]
    pub fn is_separator(self) -> bool {
        matches!(self, Symbol::Separator)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Gap => write!(f, "{GAP_CHAR}"),
            Symbol::CopyNumber(cn) => match cn_to_char(*cn) {
                Some(ch) => write!(f, "{ch}"),
                None => write!(f, "<{cn}>"),
            },
            Symbol::Separator => write!(f, "<sep>"),
        }
    }
}

/// Encode a copy number as its printable character.
///
/// Returns `None` above [`MAX_ENCODABLE_CN`].
#[inline]
pub fn cn_to_char(cn: u8) -> Option<char> {
    char::from_digit(u32::from(cn), u32::from(MAX_ENCODABLE_CN) + 1).map(|c| c.to_ascii_uppercase())
}

/// Decode a printable character back to its copy number.
///
/// Lowercase letters are accepted as aliases of their uppercase forms.
#[inline]
pub fn char_to_cn(ch: char) -> Option<u8> {
    ch.to_digit(u32::from(MAX_ENCODABLE_CN) + 1)
        .and_then(|v| u8::try_from(v).ok())
}
