//! Session controller: draws bundles without replacement and records choices.
//!
//! ```text
//!   start ──► AwaitingChoice(bundle) ──submit──► AwaitingChoice(next) ... ──► Completed
//!                  ▲                                                            │
//!                  └────────────────────────── restart ─────────────────────────┘
//! ```
//!
//! The session owns its randomness source. Seed it with
//! `StdRng::seed_from_u64` to replay an exact bundle order.

use rand::rngs::StdRng;
use rand::Rng;
use serde_json::json;
use std::collections::HashSet;

use crate::bundle::{universe_of, Bundle, Choice, Item, Trial};
use crate::error::{ChoiceError, ConfigError};
use crate::logging::{log, obj, v_num, v_str, Domain, Level};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    AwaitingChoice(Bundle),
    Completed,
}

#[derive(Debug, Clone)]
pub struct Session<R = StdRng> {
    bundles: Vec<Bundle>,
    // First-appearance order over `bundles`; fixes the pair order used by the evaluator.
    universe: Vec<Item>,
    // Not yet shown, in generator order. The pending bundle is already removed.
    remaining: Vec<Bundle>,
    trials: Vec<Trial>,
    state: SessionState,
    rng: R,
}

impl<R: Rng> Session<R> {
    pub fn start(bundles: Vec<Bundle>, rng: R) -> Result<Self, ConfigError> {
        if bundles.is_empty() {
            return Err(ConfigError::NoBundles);
        }
        let mut seen = HashSet::new();
        for bundle in &bundles {
            if !seen.insert(bundle) {
                return Err(ConfigError::DuplicateBundle(bundle.clone()));
            }
        }

        let mut session = Self {
            remaining: Vec::with_capacity(bundles.len()),
            trials: Vec::with_capacity(bundles.len()),
            universe: universe_of(&bundles),
            bundles,
            state: SessionState::Completed,
            rng,
        };
        session.reset();
        Ok(session)
    }

    /// Record `choice` for the pending bundle and draw the next one.
    pub fn submit(&mut self, choice: Choice) -> Result<(), ChoiceError> {
        let bundle = match &self.state {
            SessionState::AwaitingChoice(bundle) => bundle,
            SessionState::Completed => return Err(ChoiceError::SessionComplete),
        };
        validate_choice(bundle, &choice)?;

        log(
            Level::Debug,
            Domain::Session,
            "choice_recorded",
            obj(&[
                ("bundle", v_str(&bundle.to_string())),
                ("choice", v_str(&choice.to_string())),
                ("trial", v_num(self.trials.len() as f64 + 1.0)),
            ]),
        );
        let trial = Trial::new(bundle.clone(), choice);
        self.trials.push(trial);
        self.state = self.draw_next();
        Ok(())
    }

    /// Discard every recorded trial and draw a fresh first bundle.
    pub fn restart(&mut self) {
        log(
            Level::Debug,
            Domain::Session,
            "restart",
            obj(&[("discarded_trials", v_num(self.trials.len() as f64))]),
        );
        self.reset();
    }

    fn reset(&mut self) {
        self.remaining = self.bundles.clone();
        self.trials.clear();
        self.state = self.draw_next();
    }

    fn draw_next(&mut self) -> SessionState {
        if self.remaining.is_empty() {
            log(
                Level::Debug,
                Domain::Session,
                "session_complete",
                obj(&[("trials", v_num(self.trials.len() as f64))]),
            );
            return SessionState::Completed;
        }
        let idx = self.rng.gen_range(0..self.remaining.len());
        let bundle = self.remaining.remove(idx);
        log(
            Level::Debug,
            Domain::Session,
            "bundle_drawn",
            obj(&[
                ("bundle", v_str(&bundle.to_string())),
                ("remaining", json!(self.remaining.len())),
            ]),
        );
        SessionState::AwaitingChoice(bundle)
    }
}

impl<R> Session<R> {
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn pending(&self) -> Option<&Bundle> {
        match &self.state {
            SessionState::AwaitingChoice(bundle) => Some(bundle),
            SessionState::Completed => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, SessionState::Completed)
    }

    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    pub fn bundles(&self) -> &[Bundle] {
        &self.bundles
    }

    pub fn universe(&self) -> &[Item] {
        &self.universe
    }

    pub fn total(&self) -> usize {
        self.bundles.len()
    }

    /// Bundles still to be shown, not counting the pending one.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// 1-based position of the pending bundle ("Bundle #k of N").
    pub fn bundle_number(&self) -> Option<usize> {
        self.pending().map(|_| self.trials.len() + 1)
    }
}

pub fn validate_choice(bundle: &Bundle, choice: &Choice) -> Result<(), ChoiceError> {
    if choice.is_empty() {
        return Err(ChoiceError::Empty);
    }
    if let Some(item) = choice.items().find(|item| !bundle.contains(item)) {
        return Err(ChoiceError::NotInBundle { item: item.clone() });
    }
    Ok(())
}

// =============================================================================
// Value-passing interface
// =============================================================================

pub fn start_session<R: Rng>(bundles: Vec<Bundle>, rng: R) -> Result<Session<R>, ConfigError> {
    Session::start(bundles, rng)
}

/// Returns the advanced session; `session` itself is never modified.
pub fn submit_choice<R: Rng + Clone>(session: &Session<R>, choice: Choice) -> Result<Session<R>, ChoiceError> {
    let mut next = session.clone();
    next.submit(choice)?;
    Ok(next)
}

pub fn is_complete<R>(session: &Session<R>) -> bool {
    session.is_complete()
}

pub fn restart<R: Rng>(mut session: Session<R>) -> Session<R> {
    session.restart();
    session
}
