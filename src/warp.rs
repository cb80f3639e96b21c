//! Pairwise WARP check over a trial log.
//!
//! For each pair {x, y} the check looks only at trials whose bundle offered
//! both. If either item was never chosen there, nothing is revealed about the
//! pair. Otherwise an item that was chosen in some but not all of those
//! trials is flagged as inconsistently chosen.
//!
//! This is a teaching heuristic, not a full revealed-preference cycle check,
//! and passing it does not establish rationality.

use serde::Serialize;
use crate::bundle::{combinations, Item, Trial};
use crate::logging::{log, log_digest, obj, v_num, v_str, Domain, Level};
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViolationReport {
    /// Item chosen in some but not all bundles offering both.
    pub inconsistent: Item,
    pub other: Item,
    /// Last trial where `inconsistent` was chosen.
    pub chosen: Trial,
    /// Last trial where `other` was chosen and `inconsistent` was not. Absent
    /// when the trials without `inconsistent` picked neither item.
    pub not_chosen: Option<Trial>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PairOutcome {
    InsufficientData,
    Consistent,
    Violation(ViolationReport),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairCheck {
    pub x: Item,
    pub y: Item,
    /// Trials whose bundle offered both items.
    pub shared: usize,
    pub chose_x: usize,
    pub chose_y: usize,
    pub outcome: PairOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum WarpVerdict {
    Violation(ViolationReport),
    /// Consistent with the tested data only.
    NoViolation { pairs_checked: usize, inconclusive: usize },
}

impl WarpVerdict {
    pub fn is_violation(&self) -> bool {
        matches!(self, WarpVerdict::Violation(_))
    }

    pub fn report(&self) -> Option<&ViolationReport> {
        match self {
            WarpVerdict::Violation(report) => Some(report),
            WarpVerdict::NoViolation { .. } => None,
        }
    }
}

pub fn check_pair(trials: &[Trial], x: &Item, y: &Item) -> PairCheck {
    let shared: Vec<&Trial> = trials.iter().filter(|t| t.offers(x, y)).collect();
    let chose_x = shared.iter().filter(|t| t.chose(x)).count();
    let chose_y = shared.iter().filter(|t| t.chose(y)).count();

    let outcome = if chose_x == 0 || chose_y == 0 {
        PairOutcome::InsufficientData
    } else if let Some(report) =
        inconsistency(&shared, x, y, chose_x).or_else(|| inconsistency(&shared, y, x, chose_y))
    {
        PairOutcome::Violation(report)
    } else {
        PairOutcome::Consistent
    };

    PairCheck {
        x: x.clone(),
        y: y.clone(),
        shared: shared.len(),
        chose_x,
        chose_y,
        outcome,
    }
}

fn inconsistency(shared: &[&Trial], a: &Item, b: &Item, chose_a: usize) -> Option<ViolationReport> {
    if chose_a == 0 || chose_a >= shared.len() {
        return None;
    }
    let chosen = shared.iter().rev().find(|t| t.chose(a))?;
    let not_chosen = shared.iter().rev().find(|t| !t.chose(a) && t.chose(b));
    Some(ViolationReport {
        inconsistent: a.clone(),
        other: b.clone(),
        chosen: (*chosen).clone(),
        not_chosen: not_chosen.map(|t| (*t).clone()),
    })
}

fn pairs(universe: &[Item]) -> impl Iterator<Item = (&Item, &Item)> {
    combinations(universe.len(), 2)
        .into_iter()
        .map(move |pair| (&universe[pair[0]], &universe[pair[1]]))
}

/// Outcome of every pair, without stopping at the first violation.
pub fn evaluate_pairs(trials: &[Trial], universe: &[Item]) -> Vec<PairCheck> {
    pairs(universe).map(|(x, y)| check_pair(trials, x, y)).collect()
}

/// Scan pairs in combination order over `universe` and report the first
/// violation. Within a pair, the item earlier in `universe` is tested first.
pub fn evaluate(trials: &[Trial], universe: &[Item]) -> WarpVerdict {
    let mut pairs_checked = 0;
    let mut inconclusive = 0;
    for (x, y) in pairs(universe) {
        pairs_checked += 1;
        match check_pair(trials, x, y).outcome {
            PairOutcome::Violation(report) => return WarpVerdict::Violation(report),
            PairOutcome::InsufficientData => inconclusive += 1,
            PairOutcome::Consistent => {}
        }
    }
    WarpVerdict::NoViolation {
        pairs_checked,
        inconclusive,
    }
}

/// Evaluate the trials recorded so far in `session`.
pub fn evaluate_warp<R>(session: &Session<R>) -> WarpVerdict {
    let verdict = evaluate(session.trials(), session.universe());
    let (outcome, item) = match &verdict {
        WarpVerdict::Violation(report) => ("violation", report.inconsistent.as_str()),
        WarpVerdict::NoViolation { .. } => ("no_violation", ""),
    };
    log(
        Level::Debug,
        Domain::Evaluate,
        "warp_evaluated",
        obj(&[
            ("outcome", v_str(outcome)),
            ("inconsistent", v_str(item)),
            ("trials", v_num(session.trials().len() as f64)),
            ("complete", serde_json::Value::Bool(session.is_complete())),
            ("digest", v_str(&log_digest(session.trials()))),
        ]),
    );
    verdict
}
