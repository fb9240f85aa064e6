// Minimum event distance between profiles, and pairwise distance matrices.

use medfst_core::{ModelConfig, Symbol};
use medfst_fst::ops::score;
use medfst_fst::{TropicalWeight, VectorFst};

use crate::alphabet::Alphabet;
use crate::assemble::build_model;
use crate::error::ModelError;

/// Weight of the best path of `model` from profile `from` to profile `to`.
///
/// No shortening is applied. [`TropicalWeight::ZERO`] if the model cannot
/// relate the two profiles.
pub fn score_profiles(
    model: &VectorFst,
    alphabet: &Alphabet,
    from: &str,
    to: &str,
) -> Result<TropicalWeight, ModelError> {
    let table = alphabet.symbol_table();
    let input = VectorFst::linear_acceptor(&alphabet.encode_profile(from)?, Some(table.clone()));
    let output = VectorFst::linear_acceptor(&alphabet.encode_profile(to)?, Some(table));
    Ok(score(model, &input, &output)?)
}

/// Drop every column that repeats the previous column in both profiles.
///
/// Such columns never change the distance. Fails if the profiles differ in
/// length.
pub fn shorten_profiles(a: &str, b: &str) -> Result<(String, String), ModelError> {
    let left: Vec<char> = a.chars().collect();
    let right: Vec<char> = b.chars().collect();
    if left.len() != right.len() {
        return Err(ModelError::ProfileLengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    let mut short_a = String::with_capacity(a.len());
    let mut short_b = String::with_capacity(b.len());
    for i in 0..left.len() {
        if i == 0 || left[i] != left[i - 1] || right[i] != right[i - 1] {
            short_a.push(left[i]);
            short_b.push(right[i]);
        }
    }
    Ok((short_a, short_b))
}

/// Minimum event distance from `from` to `to` under `model`.
///
/// The profiles are shortened first. Returns `f32::INFINITY` if the model
/// cannot relate them.
pub fn med_distance(
    model: &VectorFst,
    alphabet: &Alphabet,
    from: &str,
    to: &str,
) -> Result<f32, ModelError> {
    let (short_from, short_to) = shorten_profiles(from, to)?;
    Ok(score_profiles(model, alphabet, &short_from, &short_to)?.value())
}

/// Whether `profile` is explained more cheaply from the normal diploid
/// profile with whole-genome doubling than without.
///
/// The diploid profile has the shape of `profile` with every copy number
/// replaced by one (two for total copy numbers). `config` is built once with
/// doubling enabled and once without; its own `enable_wgd` is ignored.
pub fn detect_wgd(
    config: &ModelConfig,
    alphabet: &Alphabet,
    profile: &str,
) -> Result<bool, ModelError> {
    let normal_cn = if config.total_cn { 2 } else { 1 };
    let diploid: Vec<Symbol> = alphabet
        .parse_profile(profile)?
        .into_iter()
        .map(|symbol| match symbol {
            Symbol::CopyNumber(_) => Symbol::CopyNumber(normal_cn),
            other => other,
        })
        .collect();
    let diploid = alphabet.format_profile(&diploid);

    let wgd_model = build_model(&ModelConfig {
        enable_wgd: true,
        ..config.clone()
    })?;
    let no_wgd_model = build_model(&ModelConfig {
        enable_wgd: false,
        ..config.clone()
    })?;
    let with_wgd = med_distance(&wgd_model, alphabet, &diploid, profile)?;
    let without_wgd = med_distance(&no_wgd_model, alphabet, &diploid, profile)?;

    tracing::debug!(with_wgd, without_wgd, "scored profile against diploid");
    Ok(with_wgd < without_wgd)
}

/// Symmetric matrix of distances between named profiles.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    labels: Vec<String>,
    /// Row-major, `labels.len()` squared entries.
    values: Vec<f32>,
}

impl DistanceMatrix {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Distance between the `i`-th and `j`-th profile.
    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        let n = self.len();
        (i < n && j < n).then(|| self.values[i * n + j])
    }

    /// Distance between two profiles by name.
    pub fn get_by_label(&self, a: &str, b: &str) -> Option<f32> {
        let i = self.labels.iter().position(|l| l == a)?;
        let j = self.labels.iter().position(|l| l == b)?;
        self.get(i, j)
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.values.chunks(self.len().max(1))
    }
}

/// Distances between every pair of named profiles.
///
/// For each pair `(i, j)` with `i < j` the distance from profile `i` to
/// profile `j` is computed once and stored in both cells. Fails with
/// [`ModelError::UnreachablePairs`] listing every pair the model cannot
/// relate.
pub fn pairwise_distances(
    model: &VectorFst,
    alphabet: &Alphabet,
    profiles: &[(&str, &str)],
) -> Result<DistanceMatrix, ModelError> {
    let n = profiles.len();
    let mut values = vec![0.0; n * n];
    let mut unreachable = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            let (name_a, profile_a) = profiles[i];
            let (name_b, profile_b) = profiles[j];
            let d = med_distance(model, alphabet, profile_a, profile_b)?;
            if d.is_infinite() {
                unreachable.push((name_a.to_string(), name_b.to_string()));
            }
            values[i * n + j] = d;
            values[j * n + i] = d;
        }
    }

    if !unreachable.is_empty() {
        tracing::warn!(pairs = unreachable.len(), "profile pairs with infinite distance");
        return Err(ModelError::UnreachablePairs(unreachable));
    }

    tracing::debug!(profiles = n, "computed pairwise distances");
    Ok(DistanceMatrix {
        labels: profiles.iter().map(|(name, _)| (*name).to_string()).collect(),
        values,
    })
}
