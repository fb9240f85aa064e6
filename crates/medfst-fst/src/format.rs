// Binary model format: header, symbol block, state and transition tables.

use bytemuck::Zeroable;

use crate::fst::VectorFst;
use crate::symbols::{self, SymbolTable};
use crate::transition::{StoredState, StoredTransition, Transition};
use crate::{FstError, StateId, TropicalWeight};

/// Header magic constants (little-endian).
const COOKIE1: u32 = 0x4D45_4446;
const COOKIE2: u32 = 0x0057_5354;

/// Current format version.
pub const FORMAT_VERSION: u32 = 1;

/// Size of the binary header in bytes.
pub const HEADER_SIZE: usize = 32;

/// Alignment of the state and transition tables.
const TABLE_ALIGN: usize = 16;

/// Start field value of a transducer without a start state.
const NO_START: u32 = u32::MAX;

/// Parsed file header.
///
/// The header occupies the first 32 bytes of a model file:
/// - bytes 0..4: cookie1 (magic number)
/// - bytes 4..8: cookie2 (magic number)
/// - bytes 8..12: format version
/// - bytes 12..16: start state, `u32::MAX` if none
/// - bytes 16..20: number of states
/// - bytes 20..24: number of transitions
/// - bytes 24..32: reserved (zero)
///
/// The header is followed by the symbol block (see
/// [`symbols::parse_symbol_table`]), zero padding to a 16-byte boundary,
/// the [`StoredState`] table and the [`StoredTransition`] table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FstHeader {
    pub version: u32,
    pub start: Option<StateId>,
    pub num_states: u32,
    pub num_transitions: u32,
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

fn align_up(offset: usize) -> usize {
    let partial = offset % TABLE_ALIGN;
    if partial > 0 {
        offset + (TABLE_ALIGN - partial)
    } else {
        offset
    }
}

/// Parse and validate the 32-byte header.
pub fn parse_header(data: &[u8]) -> Result<FstHeader, FstError> {
    if data.len() < HEADER_SIZE {
        return Err(FstError::TooShort {
            expected: HEADER_SIZE,
            actual: data.len(),
        });
    }
    if read_u32(data, 0) != COOKIE1 || read_u32(data, 4) != COOKIE2 {
        return Err(FstError::InvalidMagic);
    }
    let version = read_u32(data, 8);
    if version != FORMAT_VERSION {
        return Err(FstError::UnsupportedVersion(version));
    }
    let start = read_u32(data, 12);
    Ok(FstHeader {
        version,
        start: (start != NO_START).then_some(start),
        num_states: read_u32(data, 16),
        num_transitions: read_u32(data, 20),
    })
}

impl VectorFst {
    /// Serialize to the binary model format.
    ///
    /// Fails only if the symbol table cannot be stored (more than
    /// `u16::MAX` symbols or a symbol containing a null byte) or the
    /// transducer is too large for 32-bit counts.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FstError> {
        let too_large = |what: &str| FstError::InvalidLayout(format!("too many {what}"));
        let num_states = u32::try_from(self.num_states()).map_err(|_| too_large("states"))?;
        let num_transitions =
            u32::try_from(self.num_transitions()).map_err(|_| too_large("transitions"))?;

        let mut buf = Vec::with_capacity(
            HEADER_SIZE
                + TABLE_ALIGN
                + (self.num_states() + self.num_transitions()) * size_of::<StoredState>(),
        );
        buf.extend_from_slice(&COOKIE1.to_le_bytes());
        buf.extend_from_slice(&COOKIE2.to_le_bytes());
        buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        buf.extend_from_slice(&self.start().unwrap_or(NO_START).to_le_bytes());
        buf.extend_from_slice(&num_states.to_le_bytes());
        buf.extend_from_slice(&num_transitions.to_le_bytes());
        buf.extend_from_slice(&[0u8; 8]);

        match self.symbols() {
            Some(table) => table.write_block(&mut buf)?,
            None => buf.extend_from_slice(&0u16.to_le_bytes()),
        }
        buf.resize(align_up(buf.len()), 0);

        let mut states = Vec::with_capacity(self.num_states());
        let mut transitions: Vec<StoredTransition> = Vec::with_capacity(self.num_transitions());
        for q in self.states() {
            let arcs = self.transitions(q);
            states.push(StoredState {
                first_transition: transitions.len() as u32,
                transition_count: arcs.len() as u32,
                final_weight: self.final_weight(q).value(),
                _reserved: 0,
            });
            transitions.extend(arcs.iter().map(StoredTransition::from));
        }
        buf.extend_from_slice(bytemuck::cast_slice(&states));
        buf.extend_from_slice(bytemuck::cast_slice(&transitions));
        Ok(buf)
    }

    /// Load a transducer written by [`VectorFst::to_bytes`].
    ///
    /// The tables are copied into aligned storage, so `data` may start at
    /// any address. Every state range and transition target is checked.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FstError> {
        let header = parse_header(data)?;
        let (symbols, sym_end) = symbols::parse_symbol_table(data, HEADER_SIZE)?;

        let state_offset = align_up(sym_end);
        let num_states = header.num_states as usize;
        let num_transitions = header.num_transitions as usize;
        let transition_offset = state_offset + num_states * size_of::<StoredState>();
        let end = transition_offset + num_transitions * size_of::<StoredTransition>();
        if end > data.len() {
            return Err(FstError::TooShort {
                expected: end,
                actual: data.len(),
            });
        }

        // Copy into aligned Vecs
        let mut stored_states = vec![StoredState::zeroed(); num_states];
        bytemuck::cast_slice_mut::<StoredState, u8>(&mut stored_states)
            .copy_from_slice(&data[state_offset..transition_offset]);
        let mut stored_transitions = vec![StoredTransition::zeroed(); num_transitions];
        bytemuck::cast_slice_mut::<StoredTransition, u8>(&mut stored_transitions)
            .copy_from_slice(&data[transition_offset..end]);

        if let Some(start) = header.start {
            if start as usize >= num_states {
                return Err(FstError::InvalidLayout(format!(
                    "start state {start} out of range ({num_states} states)"
                )));
            }
        }

        let mut fst = Self::new();
        fst.set_symbols(symbols.map(std::sync::Arc::new));
        fst.add_states(num_states);
        if let Some(start) = header.start {
            fst.set_start_unchecked(start);
        }

        for (q, state) in stored_states.iter().enumerate() {
            let first = state.first_transition as usize;
            let last = first + state.transition_count as usize;
            if last > num_transitions {
                return Err(FstError::InvalidLayout(format!(
                    "state {q} references transitions {first}..{last} of {num_transitions}"
                )));
            }
            *fst.final_weight_mut(q as StateId) = TropicalWeight::new(state.final_weight);
            let arcs = fst.transitions_mut(q as StateId);
            for stored in &stored_transitions[first..last] {
                if stored.target_state as usize >= num_states {
                    return Err(FstError::InvalidLayout(format!(
                        "transition of state {q} targets missing state {}",
                        stored.target_state
                    )));
                }
                arcs.push(Transition::from(stored));
            }
        }
        Ok(fst)
    }
}

/// Read just the symbol table of a serialized transducer.
pub fn read_symbols(data: &[u8]) -> Result<Option<SymbolTable>, FstError> {
    parse_header(data)?;
    symbols::parse_symbol_table(data, HEADER_SIZE).map(|(table, _)| table)
}
