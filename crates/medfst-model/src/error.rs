// Error type of the model layer.

use medfst_core::ConfigError;
use medfst_fst::FstError;

/// Errors raised while building or scoring distance models.
///
/// Configuration and engine errors are surfaced unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fst(#[from] FstError),
    #[error("character {0:?} is not in the alphabet")]
    UnknownSymbol(char),
    #[error("profiles differ in length: {left} and {right}")]
    ProfileLengthMismatch { left: usize, right: usize },
    #[error("no finite distance between {} profile pair(s): {}", .0.len(), format_pairs(.0))]
    UnreachablePairs(Vec<(String, String)>),
    #[error("invalid simulation parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

fn format_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(a, b)| format!("{a}/{b}"))
        .collect::<Vec<_>>()
        .join(", ")
}
