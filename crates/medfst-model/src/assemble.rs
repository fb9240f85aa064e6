// Distance model assembler: combines elementary and expanded transducers.

use medfst_core::{Combination, ModelConfig};
use medfst_fst::ops::{
    arc_sort, compose, compose_all, encode_determinize_minimize, invert, minimize, rm_epsilon,
    union,
};
use medfst_fst::{SortKey, VectorFst};

use crate::alphabet::Alphabet;
use crate::elementary::{bounded_loss, loss_of_heterozygosity, whole_genome_doubling};
use crate::error::ModelError;
use crate::expand::expand;

/// The final model together with the intermediate transducers it was
/// assembled from.
#[derive(Debug, Clone)]
pub struct ModelParts {
    /// The distance model.
    pub model: VectorFst,
    /// Loss of heterozygosity.
    pub loh: VectorFst,
    /// Bounded doubling closure, absent when WGD is disabled.
    pub wgd: Option<VectorFst>,
    /// Bounded loss closure, never dropping to zero.
    pub loss: VectorFst,
    /// Bounded loss closure usable before a doubling, zero allowed.
    pub loss_with_zero: VectorFst,
    /// Gain closure: `loss` with input and output exchanged.
    pub gain: VectorFst,
    /// Loss phase followed by gain phase.
    pub loss_gain: VectorFst,
}

/// Number of extra doubling steps the alphabet can represent:
/// `min(max_num_wgds, floor(log2(alphabet size))) - 1`.
fn wgd_steps(config: &ModelConfig) -> u32 {
    let representable = config.alphabet_size().ilog2();
    config.max_num_wgds.min(representable).saturating_sub(1)
}

/// Canonical composition of two transducers.
fn compose_minimized(a: &VectorFst, b: &VectorFst) -> Result<VectorFst, ModelError> {
    let left = arc_sort(a, SortKey::Output);
    Ok(encode_determinize_minimize(&compose(&left, b)?)?)
}

/// Build the distance model described by `config`.
pub fn build_model(config: &ModelConfig) -> Result<VectorFst, ModelError> {
    Ok(build_model_parts(config)?.model)
}

/// Build the distance model and keep every intermediate transducer.
///
/// The configuration is validated before anything is built.
pub fn build_model_parts(config: &ModelConfig) -> Result<ModelParts, ModelError> {
    config.validate()?;
    let alphabet = Alphabet::new(config.max_cn, config.separator)?;
    let max_cn = u32::from(config.max_cn);

    let loss = expand(
        max_cn - 1,
        &bounded_loss(&alphabet, true, config.loss_weights)?,
    )?;
    let gain = invert(&loss);
    let loss_gain = compose_minimized(&loss, &gain)?;
    let loss_with_zero = expand(
        config.max_pre_wgd_losses - 1,
        &bounded_loss(&alphabet, false, config.loss_weights)?,
    )?;
    let loh = loss_of_heterozygosity(&alphabet)?;

    let wgd = if config.enable_wgd {
        let elementary = whole_genome_doubling(
            &alphabet,
            config.wgd_cost,
            config.wgd_ratio(),
            config.total_cn,
        )?;
        Some(expand(wgd_steps(config), &elementary)?)
    } else {
        None
    };

    let model = match (&wgd, config.combination) {
        (Some(w), Combination::ExactWgd) => compose_all(&[&loss_with_zero, w, &loss_gain])?,
        (Some(w), Combination::Exact) => {
            // Not determinizable; partition refinement only.
            let with_wgd = minimize(&compose_all(&[&loh, w, &loss_gain])?)?;
            let without_wgd = compose_minimized(&loss_with_zero, &gain)?;
            rm_epsilon(&union(&with_wgd, &without_wgd)?)
        }
        (Some(w), Combination::Legacy) => compose_all(&[&loh, w, &loss_gain])?,
        (None, Combination::Exact | Combination::ExactWgd) => {
            compose_minimized(&loss_with_zero, &gain)?
        }
        (None, Combination::Legacy) => compose_all(&[&loh, &loss_gain])?,
    };

    tracing::info!(
        combination = %config.combination,
        max_cn = config.max_cn,
        wgd = config.enable_wgd,
        states = model.num_states(),
        transitions = model.num_transitions(),
        "assembled distance model"
    );

    Ok(ModelParts {
        model,
        loh,
        wgd,
        loss,
        loss_with_zero,
        gain,
        loss_gain,
    })
}
