//! Shared types for the medfst workspace.
//!
//! - [`symbol`] -- copy-number symbols and the printable integer codec
//! - [`config`] -- model configuration and its validation errors

pub mod config;
pub mod symbol;

pub use config::{Combination, ConfigError, LossWeights, ModelConfig, WgdRatio, validate_alphabet};
pub use symbol::{GAP_CHAR, MAX_ENCODABLE_CN, Symbol, char_to_cn, cn_to_char};
