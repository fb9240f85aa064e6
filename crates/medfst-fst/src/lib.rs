//! Weighted finite state transducer engine over the tropical semiring.
//!
//! This crate provides construction and the rational operations needed to
//! assemble distance models: composition, inversion, union, epsilon removal,
//! determinization, minimization and shortest distances. Every operation is
//! pure and returns a new [`VectorFst`].
//!
//! # Architecture
//!
//! - [`weight`] -- Tropical `(min, +)` weights
//! - [`symbols`] -- Symbol table (label-to-string and string-to-label mapping)
//! - [`transition`] -- In-memory and stored transition layouts
//! - [`fst`] -- Mutable vector-backed transducer
//! - [`ops`] -- Rational and canonicalization operations
//! - [`format`] -- Binary header parsing and (de)serialization

pub mod format;
pub mod fst;
pub mod ops;
pub mod symbols;
pub mod transition;
pub mod weight;

pub use fst::{SortKey, VectorFst};
pub use symbols::SymbolTable;
pub use transition::Transition;
pub use weight::TropicalWeight;

/// Label identifier. Label [`EPSILON`] is reserved for the empty symbol.
pub type Label = u32;

/// State identifier, dense from zero.
pub type StateId = u32;

/// The empty label.
pub const EPSILON: Label = 0;

/// Maximum number of states determinization may create.
/// Acts as a safety limit for inputs without the twins property.
pub const MAX_DETERMINIZED_STATES: usize = 1 << 20;

/// Error type for transducer construction, operations and loading.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FstError {
    #[error("state {state} does not exist (fst has {num_states} states)")]
    NoSuchState { state: StateId, num_states: usize },
    #[error(
        "composition requires the left fst sorted by output label or the right fst sorted by input label"
    )]
    NotSorted,
    #[error("symbol tables of the combined transducers differ")]
    SymbolTableMismatch,
    #[error("determinization exceeded {limit} states")]
    StateLimitExceeded { limit: usize },
    #[error("invalid magic number in fst header")]
    InvalidMagic,
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u32),
    #[error("data too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },
    #[error("invalid symbol table: {0}")]
    InvalidSymbolTable(String),
    #[error("invalid transition table: {0}")]
    InvalidLayout(String),
}
