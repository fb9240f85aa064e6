// Rational and canonicalization operations on `VectorFst`.
//
// Every operation is pure: it borrows its inputs and returns a new transducer.
//
// Architecture:
//   - `arc_sort`: order transitions by input or output label
//   - `compose`: composition (requires one side sorted on the matching label)
//   - `invert`, `union`: label exchange and alternation
//   - `connect`, `rm_epsilon`: trimming and epsilon removal
//   - `shortest_distance`: Dijkstra distances, total weight
//   - `determinize`, `minimize`: canonicalization over label pairs
//   - `score`: weight of the best path relating two strings

mod arc_sort;
mod compose;
mod connect;
mod determinize;
mod invert;
mod minimize;
mod rm_epsilon;
mod score;
mod shortest_distance;
mod union;

pub use arc_sort::arc_sort;
pub use compose::{compose, compose_all};
pub use connect::connect;
pub use determinize::determinize;
pub use invert::invert;
pub use minimize::{encode_determinize_minimize, minimize, push_weights};
pub use rm_epsilon::rm_epsilon;
pub use score::score;
pub use shortest_distance::{shortest_distance, shortest_distance_reverse, total_weight};
pub use union::union;

use crate::{FstError, VectorFst};

/// Check that two transducers may be combined: either side without a table
/// is accepted, otherwise the tables must be equal.
pub(crate) fn check_symbols(a: &VectorFst, b: &VectorFst) -> Result<(), FstError> {
    match (a.symbols(), b.symbols()) {
        (Some(sa), Some(sb)) if !std::sync::Arc::ptr_eq(sa, sb) && sa != sb => {
            Err(FstError::SymbolTableMismatch)
        }
        _ => Ok(()),
    }
}
