// Symbol table factory: label layout of the copy-number alphabet.

use std::sync::Arc;

use medfst_core::{ConfigError, GAP_CHAR, Symbol, char_to_cn, cn_to_char, validate_alphabet};
use medfst_fst::{Label, SymbolTable};

use crate::error::ModelError;

/// Label of the gap symbol.
const GAP_LABEL: Label = 1;

/// Label of copy number zero; copy number `k` has label `FIRST_CN_LABEL + k`.
const FIRST_CN_LABEL: Label = 2;

/// The alphabet of a model: gap, copy numbers `0..=max_cn` and an optional
/// separator, bound to a shared [`SymbolTable`].
///
/// Labels are laid out as `0` epsilon, `1` gap, `2..=max_cn + 2` copy
/// numbers in increasing order, then the separator.
#[derive(Debug, Clone)]
pub struct Alphabet {
    max_cn: u8,
    separator: Option<char>,
    table: Arc<SymbolTable>,
}

impl Alphabet {
    /// Build the alphabet for copy numbers `0..=max_cn`.
    ///
    /// Fails if `max_cn` is zero or beyond the printable codec, or if the
    /// separator would shadow a copy-number character or the gap.
    pub fn new(max_cn: u8, separator: Option<char>) -> Result<Self, ConfigError> {
        validate_alphabet(max_cn, separator)?;

        let mut table = SymbolTable::new();
        table.add_symbol(&GAP_CHAR.to_string());
        for cn in 0..=max_cn {
            let ch = cn_to_char(cn).ok_or(ConfigError::MaxCopyNumberTooLarge {
                max_cn,
                limit: medfst_core::MAX_ENCODABLE_CN,
            })?;
            table.add_symbol(&ch.to_string());
        }
        if let Some(sep) = separator {
            table.add_symbol(&sep.to_string());
        }

        tracing::debug!(max_cn, symbols = table.len(), "built alphabet");
        Ok(Self {
            max_cn,
            separator,
            table: Arc::new(table),
        })
    }

    #[inline]
    pub fn max_cn(&self) -> u8 {
        self.max_cn
    }

    #[inline]
    pub fn separator(&self) -> Option<char> {
        self.separator
    }

    /// The shared symbol table every model transducer is built against.
    #[inline]
    pub fn symbol_table(&self) -> Arc<SymbolTable> {
        Arc::clone(&self.table)
    }

    /// Label of `symbol`, or `None` if the alphabet does not hold it.
    pub fn label(&self, symbol: Symbol) -> Option<Label> {
        match symbol {
            Symbol::Gap => Some(GAP_LABEL),
            Symbol::CopyNumber(cn) => self.cn_label(cn),
            Symbol::Separator => self.separator_label(),
        }
    }

    /// Symbol carried by `label`. Epsilon and out-of-range labels give `None`.
    pub fn symbol(&self, label: Label) -> Option<Symbol> {
        let last_cn = FIRST_CN_LABEL + Label::from(self.max_cn);
        match label {
            GAP_LABEL => Some(Symbol::Gap),
            l if (FIRST_CN_LABEL..=last_cn).contains(&l) => {
                Some(Symbol::CopyNumber((l - FIRST_CN_LABEL) as u8))
            }
            l if l == last_cn + 1 && self.separator.is_some() => Some(Symbol::Separator),
            _ => None,
        }
    }

    #[inline]
    pub fn cn_label(&self, cn: u8) -> Option<Label> {
        (cn <= self.max_cn).then(|| FIRST_CN_LABEL + Label::from(cn))
    }

    #[inline]
    pub fn gap_label(&self) -> Label {
        GAP_LABEL
    }

    #[inline]
    pub fn zero_label(&self) -> Label {
        FIRST_CN_LABEL
    }

    #[inline]
    pub fn separator_label(&self) -> Option<Label> {
        self.separator
            .map(|_| FIRST_CN_LABEL + Label::from(self.max_cn) + 1)
    }

    /// `(copy number, label)` for every copy number, in increasing order.
    pub fn copy_number_labels(&self) -> impl Iterator<Item = (u8, Label)> + '_ {
        (0..=self.max_cn).map(|cn| (cn, FIRST_CN_LABEL + Label::from(cn)))
    }

    /// Parse a printable profile into symbols.
    pub fn parse_profile(&self, profile: &str) -> Result<Vec<Symbol>, ModelError> {
        profile
            .chars()
            .map(|ch| {
                if Some(ch) == self.separator {
                    Ok(Symbol::Separator)
                } else if ch == GAP_CHAR {
                    Ok(Symbol::Gap)
                } else {
                    match char_to_cn(ch) {
                        Some(cn) if cn <= self.max_cn => Ok(Symbol::CopyNumber(cn)),
                        _ => Err(ModelError::UnknownSymbol(ch)),
                    }
                }
            })
            .collect()
    }

    /// Printable form of a profile, the inverse of
    /// [`Alphabet::parse_profile`].
    pub fn format_profile(&self, symbols: &[Symbol]) -> String {
        symbols
            .iter()
            .map(|&symbol| match symbol {
                Symbol::Separator => self.separator.unwrap_or(GAP_CHAR),
                Symbol::Gap => GAP_CHAR,
                Symbol::CopyNumber(cn) => cn_to_char(cn).unwrap_or(GAP_CHAR),
            })
            .collect()
    }

    /// Labels of a printable profile.
    pub fn encode_profile(&self, profile: &str) -> Result<Vec<Label>, ModelError> {
        Ok(self
            .parse_profile(profile)?
            .into_iter()
            .filter_map(|symbol| self.label(symbol))
            .collect())
    }

    /// Printable profile of a label sequence. Labels outside the alphabet
    /// are skipped.
    pub fn decode_labels(&self, labels: &[Label]) -> String {
        let symbols: Vec<Symbol> = labels.iter().filter_map(|&l| self.symbol(l)).collect();
        self.format_profile(&symbols)
    }
}
