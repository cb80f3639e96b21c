//! Simulated players for exercising the checker over many seeded sessions.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::bundle::{Bundle, Choice, Item};
use crate::error::{ChoiceError, SimError};
use crate::session::Session;
use crate::warp::{evaluate_warp, WarpVerdict};

pub trait Chooser {
    fn name(&self) -> &str;
    fn choose(&mut self, bundle: &Bundle, rng: &mut StdRng) -> Choice;
}

/// Picks the single best item under a fixed ranking. Unranked items lose to
/// ranked ones and tie-break by name.
#[derive(Debug, Clone)]
pub struct StrictPreference {
    pub ranking: Vec<Item>,
}

impl Chooser for StrictPreference {
    fn name(&self) -> &str {
        "strict_preference"
    }

    fn choose(&mut self, bundle: &Bundle, _rng: &mut StdRng) -> Choice {
        let rank = |item: &Item| self.ranking.iter().position(|r| r == item).unwrap_or(usize::MAX);
        Choice::new(bundle.items().min_by_key(|item| rank(*item)).cloned())
    }
}

/// Takes every item offered.
#[derive(Debug, Clone, Default)]
pub struct TakeAll;

impl Chooser for TakeAll {
    fn name(&self) -> &str {
        "take_all"
    }

    fn choose(&mut self, bundle: &Bundle, _rng: &mut StdRng) -> Choice {
        Choice::new(bundle.items().cloned())
    }
}

/// Uniformly random non-empty subset of the bundle.
#[derive(Debug, Clone, Default)]
pub struct RandomSubset;

impl Chooser for RandomSubset {
    fn name(&self) -> &str {
        "random_subset"
    }

    fn choose(&mut self, bundle: &Bundle, rng: &mut StdRng) -> Choice {
        if bundle.is_empty() {
            return Choice::default();
        }
        // Fair coin per item, redrawn when nothing was kept.
        loop {
            let choice = Choice::new(bundle.items().filter(|_| rng.gen_bool(0.5)).cloned());
            if !choice.is_empty() {
                return choice;
            }
        }
    }
}

/// Play `session` to completion with `chooser` and evaluate it. Stops at the
/// first choice the session rejects.
pub fn play_out<R: Rng>(
    session: &mut Session<R>,
    chooser: &mut dyn Chooser,
    rng: &mut StdRng,
) -> Result<WarpVerdict, ChoiceError> {
    while let Some(bundle) = session.pending().cloned() {
        let choice = chooser.choose(&bundle, rng);
        session.submit(choice)?;
    }
    Ok(evaluate_warp(session))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimSummary {
    pub model: String,
    pub sessions: usize,
    pub violations: usize,
    pub violation_rate: f64,
}

/// Run `sessions` independent sessions. The bundle order and the chooser draw
/// from separate streams derived from `seed`.
pub fn simulate(
    bundles: &[Bundle],
    chooser: &mut dyn Chooser,
    sessions: usize,
    seed: u64,
) -> Result<SimSummary, SimError> {
    let mut session = Session::start(bundles.to_vec(), StdRng::seed_from_u64(seed))?;
    let mut choice_rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    let mut violations = 0;
    for n in 0..sessions {
        if n > 0 {
            session.restart();
        }
        let verdict = play_out(&mut session, chooser, &mut choice_rng).map_err(|source| SimError::Choice {
            model: chooser.name().to_string(),
            source,
        })?;
        if verdict.is_violation() {
            violations += 1;
        }
    }
    Ok(SimSummary {
        model: chooser.name().to_string(),
        sessions,
        violations,
        violation_rate: if sessions == 0 { 0.0 } else { violations as f64 / sessions as f64 },
    })
}
