// Symbol table: label-to-string and string-to-label mapping, plus its binary block.

use hashbrown::HashMap;

use crate::{FstError, Label};

/// Printable name of the epsilon label.
pub const EPSILON_SYMBOL: &str = "<eps>";

/// Bijection between labels and printable symbol strings.
///
/// Label 0 is always epsilon. Labels are assigned densely in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    /// Maps label to its string representation.
    symbol_strings: Vec<String>,
    /// Maps a string back to its label.
    string_to_symbol: HashMap<String, Label>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Create a table holding only epsilon.
    pub fn new() -> Self {
        let mut table = Self {
            symbol_strings: Vec::new(),
            string_to_symbol: HashMap::new(),
        };
        table.add_symbol(EPSILON_SYMBOL);
        table
    }

    /// Add a symbol, returning its label. Adding an existing symbol returns
    /// the label it already has.
    pub fn add_symbol(&mut self, symbol: &str) -> Label {
        if let Some(&label) = self.string_to_symbol.get(symbol) {
            return label;
        }
        let label = self.symbol_strings.len() as Label;
        self.symbol_strings.push(symbol.to_string());
        self.string_to_symbol.insert(symbol.to_string(), label);
        label
    }

    pub fn find(&self, symbol: &str) -> Option<Label> {
        self.string_to_symbol.get(symbol).copied()
    }

    pub fn symbol(&self, label: Label) -> Option<&str> {
        self.symbol_strings.get(label as usize).map(String::as_str)
    }

    /// Number of symbols, epsilon included.
    pub fn len(&self) -> usize {
        self.symbol_strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbol_strings.is_empty()
    }

    /// Iterate over `(label, symbol)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (Label, &str)> {
        self.symbol_strings
            .iter()
            .enumerate()
            .map(|(i, s)| (i as Label, s.as_str()))
    }

    /// Append the binary block: symbol count (u16 LE) followed by
    /// null-terminated UTF-8 strings.
    pub(crate) fn write_block(&self, buf: &mut Vec<u8>) -> Result<(), FstError> {
        let count = u16::try_from(self.symbol_strings.len()).map_err(|_| {
            FstError::InvalidSymbolTable(format!("too many symbols: {}", self.symbol_strings.len()))
        })?;
        buf.extend_from_slice(&count.to_le_bytes());
        for symbol in &self.symbol_strings {
            if symbol.as_bytes().contains(&0) {
                return Err(FstError::InvalidSymbolTable(format!(
                    "symbol {symbol:?} contains a null byte"
                )));
            }
            buf.extend_from_slice(symbol.as_bytes());
            buf.push(0);
        }
        Ok(())
    }
}

/// Parse a symbol table block starting at `offset`.
///
/// Returns the table (or `None` for an empty block) and the byte offset
/// immediately after the block, before any padding.
pub fn parse_symbol_table(
    data: &[u8],
    offset: usize,
) -> Result<(Option<SymbolTable>, usize), FstError> {
    if offset + 2 > data.len() {
        return Err(FstError::TooShort {
            expected: offset + 2,
            actual: data.len(),
        });
    }

    let symbol_count = u16::from_le_bytes([data[offset], data[offset + 1]]);
    let mut pos = offset + 2;
    if symbol_count == 0 {
        return Ok((None, pos));
    }

    let mut table = SymbolTable {
        symbol_strings: Vec::with_capacity(symbol_count as usize),
        string_to_symbol: HashMap::with_capacity(symbol_count as usize),
    };

    for i in 0..symbol_count {
        let str_start = pos;
        while pos < data.len() && data[pos] != 0 {
            pos += 1;
        }
        if pos >= data.len() {
            return Err(FstError::InvalidSymbolTable(
                "unterminated symbol string".to_string(),
            ));
        }

        let symbol_str = std::str::from_utf8(&data[str_start..pos])
            .map_err(|_| FstError::InvalidSymbolTable(format!("invalid UTF-8 in symbol {i}")))?;
        pos += 1; // skip null terminator

        if table.string_to_symbol.contains_key(symbol_str) {
            return Err(FstError::InvalidSymbolTable(format!(
                "duplicate symbol {symbol_str:?}"
            )));
        }
        table.add_symbol(symbol_str);
    }

    Ok((Some(table), pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_block(symbols: &[&str]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(symbols.len() as u16).to_le_bytes());
        for sym in symbols {
            buf.extend_from_slice(sym.as_bytes());
            buf.push(0);
        }
        buf
    }

    #[test]
    fn new_table_holds_epsilon() {
        let table = SymbolTable::new();
        assert_eq!(table.len(), 1);
        assert_eq!(table.symbol(0), Some(EPSILON_SYMBOL));
        assert_eq!(table.find(EPSILON_SYMBOL), Some(0));
    }

    #[test]
    fn add_symbol_is_idempotent() {
        let mut table = SymbolTable::new();
        let a = table.add_symbol("a");
        let b = table.add_symbol("b");
        assert_eq!((a, b), (1, 2));
        assert_eq!(table.add_symbol("a"), 1);
        assert_eq!(table.len(), 3);
        assert_eq!(table.symbol(2), Some("b"));
        assert_eq!(table.symbol(3), None);
    }

    #[test]
    fn iter_in_label_order() {
        let mut table = SymbolTable::new();
        table.add_symbol("x");
        let collected: Vec<_> = table.iter().collect();
        assert_eq!(collected, vec![(0, EPSILON_SYMBOL), (1, "x")]);
    }

    #[test]
    fn block_round_trip() {
        let mut table = SymbolTable::new();
        table.add_symbol("-");
        table.add_symbol("0");
        table.add_symbol("X");
        let mut buf = Vec::new();
        table.write_block(&mut buf).unwrap();
        let (parsed, end) = parse_symbol_table(&buf, 0).unwrap();
        assert_eq!(parsed, Some(table));
        assert_eq!(end, buf.len());
    }

    #[test]
    fn parse_with_offset() {
        let mut data = vec![0u8; 16];
        data.extend_from_slice(&make_block(&["<eps>", "x", "y"]));
        let (table, end) = parse_symbol_table(&data, 16).unwrap();
        let table = table.unwrap();
        assert_eq!(table.find("y"), Some(2));
        assert_eq!(end, data.len());
    }

    #[test]
    fn parse_empty_block() {
        let data = make_block(&[]);
        let (table, end) = parse_symbol_table(&data, 0).unwrap();
        assert!(table.is_none());
        assert_eq!(end, 2);
    }

    #[test]
    fn reject_truncated_data() {
        assert!(matches!(
            parse_symbol_table(&[0u8; 1], 0),
            Err(FstError::TooShort { .. })
        ));
    }

    #[test]
    fn reject_unterminated_string() {
        let mut data = Vec::new();
        data.extend_from_slice(&2u16.to_le_bytes());
        data.push(0);
        data.extend_from_slice(b"abc");
        assert!(matches!(
            parse_symbol_table(&data, 0),
            Err(FstError::InvalidSymbolTable(_))
        ));
    }

    #[test]
    fn reject_duplicate_symbol() {
        let data = make_block(&["<eps>", "a", "a"]);
        assert!(matches!(
            parse_symbol_table(&data, 0),
            Err(FstError::InvalidSymbolTable(_))
        ));
    }
}
