// Stochastic mutation simulator, used as a test oracle for the models.

use medfst_core::Symbol;
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::Poisson;

use crate::alphabet::Alphabet;
use crate::error::ModelError;

/// Parameters of [`simulate`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    /// Expected number of events (Poisson mean).
    pub mu: f64,
    /// Probability that a focal run stops after each position.
    pub run_length_decay: f64,
    /// Probability that an event is a whole-genome doubling.
    pub p_wgd: f64,
    /// Probability that a focal event is a gain rather than a loss.
    pub p_gain: f64,
    pub min_cn: u8,
    pub max_cn: u8,
    /// Seed for reproducible runs; `None` seeds from the operating system.
    pub seed: Option<u64>,
    pub max_wgds: u32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            mu: 2.0,
            run_length_decay: 0.5,
            p_wgd: 0.0,
            p_gain: 0.5,
            min_cn: 0,
            max_cn: 8,
            seed: None,
            max_wgds: 1,
        }
    }
}

impl SimulationParams {
    fn validate(&self, alphabet: &Alphabet) -> Result<(), ModelError> {
        if !self.mu.is_finite() || self.mu < 0.0 {
            return Err(ModelError::InvalidParameter {
                name: "mu",
                value: self.mu,
            });
        }
        for (name, value) in [
            ("run_length_decay", self.run_length_decay),
            ("p_wgd", self.p_wgd),
            ("p_gain", self.p_gain),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ModelError::InvalidParameter { name, value });
            }
        }
        if self.min_cn > self.max_cn {
            return Err(ModelError::InvalidParameter {
                name: "min_cn",
                value: f64::from(self.min_cn),
            });
        }
        if self.max_cn > alphabet.max_cn() {
            return Err(ModelError::InvalidParameter {
                name: "max_cn",
                value: f64::from(self.max_cn),
            });
        }
        Ok(())
    }
}

/// Outcome of [`simulate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationResult {
    /// The mutated profile, in printable form.
    pub profile: String,
    pub losses: u32,
    pub gains: u32,
    pub wgds: u32,
}

/// Number of events drawn from a Poisson distribution with mean `mu`.
fn event_count<R: Rng>(rng: &mut R, mu: f64) -> Result<u32, ModelError> {
    if mu == 0.0 {
        return Ok(0);
    }
    let poisson = Poisson::new(mu).map_err(|_| ModelError::InvalidParameter {
        name: "mu",
        value: mu,
    })?;
    let draw: f64 = poisson.sample(rng);
    Ok(draw as u32)
}

/// Mutate `profile` by a random sequence of events.
///
/// A Poisson number of events (mean `mu`) is drawn. Each event is a
/// whole-genome doubling with probability `p_wgd` while fewer than
/// `max_wgds` have happened; otherwise it is a focal gain (probability
/// `p_gain`) or loss. A focal event starts at a random eligible position
/// (gains need a non-zero copy number, losses one above `min_cn`) and
/// extends to the right until it stops with probability `run_length_decay`
/// or meets a separator, a gap or the end of the profile. Events with no
/// eligible position are skipped and not counted. Every copy number is
/// clamped to `[min_cn, max_cn]`.
pub fn simulate(
    alphabet: &Alphabet,
    profile: &str,
    params: &SimulationParams,
) -> Result<SimulationResult, ModelError> {
    params.validate(alphabet)?;
    let mut symbols = alphabet.parse_profile(profile)?;
    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut result = SimulationResult {
        profile: String::new(),
        losses: 0,
        gains: 0,
        wgds: 0,
    };

    let events = event_count(&mut rng, params.mu)?;
    for _ in 0..events {
        if result.wgds < params.max_wgds && rng.gen_bool(params.p_wgd) {
            for symbol in &mut symbols {
                if let Symbol::CopyNumber(cn) = symbol {
                    *cn = cn.saturating_mul(2).min(params.max_cn);
                }
            }
            result.wgds += 1;
            continue;
        }

        let gain = rng.gen_bool(params.p_gain);
        let eligible: Vec<usize> = symbols
            .iter()
            .enumerate()
            .filter_map(|(i, symbol)| match symbol.copy_number() {
                Some(cn) if gain && cn > 0 => Some(i),
                Some(cn) if !gain && cn > params.min_cn => Some(i),
                _ => None,
            })
            .collect();
        if eligible.is_empty() {
            continue;
        }

        let mut position = eligible[rng.gen_range(0..eligible.len())];
        loop {
            if let Symbol::CopyNumber(cn) = &mut symbols[position] {
                *cn = if gain {
                    if *cn > 0 { (*cn + 1).min(params.max_cn) } else { 0 }
                } else {
                    cn.saturating_sub(1).max(params.min_cn)
                };
            }
            position += 1;
            let continues = symbols
                .get(position)
                .is_some_and(|s| s.copy_number().is_some());
            if !continues || rng.gen_bool(params.run_length_decay) {
                break;
            }
        }
        if gain {
            result.gains += 1;
        } else {
            result.losses += 1;
        }
    }

    result.profile = alphabet.format_profile(&symbols);
    tracing::trace!(
        events,
        losses = result.losses,
        gains = result.gains,
        wgds = result.wgds,
        "simulated profile"
    );
    Ok(result)
}
