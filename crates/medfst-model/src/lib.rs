//! Minimum event distance models for copy-number profiles.
//!
//! A distance model is a weighted transducer whose best path between two
//! profiles prices the fewest mutational events explaining their
//! difference: contiguous single-copy losses and gains, loss of
//! heterozygosity and whole-genome doubling.
//!
//! # Architecture
//!
//! Leaves first:
//! - [`alphabet`] -- symbol table and label layout for a given `max_cn`
//! - [`elementary`] -- single-event transducers (bounded loss, LOH, WGD)
//! - [`expand`] -- bounded n-step closures by self-composition
//! - [`assemble`] -- combination of the above into the final model
//! - [`distance`] -- scoring profile pairs and pairwise matrices; doubling detection
//! - [`simulate`] -- stochastic mutation simulator for tests
//!
//! ```
//! use medfst_core::ModelConfig;
//! use medfst_model::{Alphabet, build_model, med_distance};
//!
//! let config = ModelConfig { max_cn: 4, ..ModelConfig::default() };
//! let model = build_model(&config)?;
//! let alphabet = Alphabet::new(config.max_cn, config.separator)?;
//! let d = med_distance(&model, &alphabet, "22X1", "12X1")?;
//! assert_eq!(d, 1.0);
//! # Ok::<(), medfst_model::ModelError>(())
//! ```

pub mod alphabet;
pub mod assemble;
pub mod distance;
pub mod elementary;
pub mod error;
pub mod expand;
pub mod simulate;

pub use alphabet::Alphabet;
pub use assemble::{ModelParts, build_model, build_model_parts};
pub use distance::{
    DistanceMatrix, detect_wgd, med_distance, pairwise_distances, shorten_profiles,
};
pub use error::ModelError;
pub use expand::expand;
pub use simulate::{SimulationParams, SimulationResult, simulate};
