// Model configuration: the immutable record that shapes a distance model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::symbol::{GAP_CHAR, MAX_ENCODABLE_CN, char_to_cn};

/// Configuration errors. All of them are raised before any automaton is built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("max_cn must be at least 1")]
    ZeroMaxCopyNumber,
    #[error("max_cn {max_cn} exceeds the largest encodable copy number {limit}")]
    MaxCopyNumberTooLarge { max_cn: u8, limit: u8 },
    #[error("separator {0:?} collides with a copy-number or gap symbol")]
    SeparatorCollision(char),
    #[error("unknown combination mode: {0}")]
    UnknownCombination(String),
    #[error("max_num_wgds must be at least 1 when WGD is enabled")]
    NoWgdApplications,
    #[error("max_pre_wgd_losses must be at least 1")]
    NoPreWgdLosses,
    #[error("invalid WGD cost: {0}")]
    InvalidWgdCost(f32),
    #[error("invalid loss weight {name}: {value}")]
    InvalidLossWeight { name: &'static str, value: f32 },
}

/// How the elementary transducers are combined into the final model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Combination {
    /// Union of a WGD branch and a loss/gain-only branch.
    #[default]
    Exact,
    /// Pre-WGD losses (including runs reaching zero), bounded doubling, then
    /// the post-WGD loss/gain bridge.
    ExactWgd,
    /// LOH, doubling, then the loss/gain bridge, without the union.
    Legacy,
}

impl Combination {
    pub fn as_str(self) -> &'static str {
        match self {
            Combination::Exact => "exact",
            Combination::ExactWgd => "exact_wgd",
            Combination::Legacy => "legacy",
        }
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Combination {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(Combination::Exact),
            "exact_wgd" | "exact-wgd" => Ok(Combination::ExactWgd),
            "legacy" => Ok(Combination::Legacy),
            other => Err(ConfigError::UnknownCombination(other.to_string())),
        }
    }
}

/// How a whole-genome doubling maps a copy number to its doubled value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WgdRatio {
    /// `cn -> 2 * cn`.
    Times2,
    /// `cn -> cn + shift`, where the shift is 1 for allele-specific and 2 for
    /// total copy numbers.
    PlusOne,
}

/// Weights of the bounded-loss transducer arcs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LossWeights {
    /// Identity step outside a loss window.
    pub stay: f32,
    /// First position of a loss window.
    pub open: f32,
    /// Every further position of an open window.
    pub extend: f32,
}

impl Default for LossWeights {
    fn default() -> Self {
        Self {
            stay: 0.0,
            open: 1.0,
            extend: 0.0,
        }
    }
}

/// Immutable record controlling the shape of a distance model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Largest copy number in the alphabet.
    pub max_cn: u8,
    /// Chromosome separator character; `None` builds an alphabet without one.
    pub separator: Option<char>,
    pub enable_wgd: bool,
    pub wgd_cost: f32,
    /// Upper bound on doublings; further capped by what the alphabet can hold.
    pub max_num_wgds: u32,
    /// Doubling multiplies by two instead of adding a fixed shift.
    pub wgd_x2: bool,
    pub combination: Combination,
    /// Number of loss runs usable before a doubling event.
    pub max_pre_wgd_losses: u32,
    /// Profiles hold total copy numbers instead of allele-specific ones.
    pub total_cn: bool,
    pub loss_weights: LossWeights,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            max_cn: 8,
            separator: Some('X'),
            enable_wgd: true,
            wgd_cost: 1.0,
            max_num_wgds: 3,
            wgd_x2: false,
            combination: Combination::Exact,
            max_pre_wgd_losses: 8,
            total_cn: false,
            loss_weights: LossWeights::default(),
        }
    }
}

impl ModelConfig {
    /// Number of copy-number symbols (`0..=max_cn`).
    #[inline]
    pub fn alphabet_size(&self) -> usize {
        usize::from(self.max_cn) + 1
    }

    #[inline]
    pub fn wgd_ratio(&self) -> WgdRatio {
        if self.wgd_x2 {
            WgdRatio::Times2
        } else {
            WgdRatio::PlusOne
        }
    }

    /// Check every field. Called before any automaton is constructed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_alphabet(self.max_cn, self.separator)?;
        if self.enable_wgd {
            if self.max_num_wgds == 0 {
                return Err(ConfigError::NoWgdApplications);
            }
            if !self.wgd_cost.is_finite() || self.wgd_cost < 0.0 {
                return Err(ConfigError::InvalidWgdCost(self.wgd_cost));
            }
        }
        if self.max_pre_wgd_losses == 0 {
            return Err(ConfigError::NoPreWgdLosses);
        }
        let weights = &self.loss_weights;
        for (name, value) in [
            ("stay", weights.stay),
            ("open", weights.open),
            ("extend", weights.extend),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidLossWeight { name, value });
            }
        }
        Ok(())
    }
}

/// Check that `max_cn` is representable and that the separator does not
/// shadow a copy-number character or the gap.
pub fn validate_alphabet(max_cn: u8, separator: Option<char>) -> Result<(), ConfigError> {
    if max_cn == 0 {
        return Err(ConfigError::ZeroMaxCopyNumber);
    }
    if max_cn > MAX_ENCODABLE_CN {
        return Err(ConfigError::MaxCopyNumberTooLarge {
            max_cn,
            limit: MAX_ENCODABLE_CN,
        });
    }
    if let Some(sep) = separator {
        let shadows_cn = char_to_cn(sep).is_some_and(|cn| cn <= max_cn);
        if shadows_cn || sep == GAP_CHAR {
            return Err(ConfigError::SeparatorCollision(sep));
        }
    }
    Ok(())
}
