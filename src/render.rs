//! Text rendering of the trial table and the verdict explanation.

use crate::bundle::Trial;
use crate::warp::{PairCheck, PairOutcome, ViolationReport, WarpVerdict};

pub const INCONSISTENT_HEADLINE: &str = "Your choices were inconsistent according to WARP.";
pub const CONSISTENT_HEADLINE: &str = "No WARP violations detected.";
pub const NOT_A_PROOF: &str =
    "Your choices are consistent with the menus you were shown. That is not proof of rationality: \
     a finite set of menus cannot rule out every inconsistency.";

/// Two-column table of every menu shown and what was picked, in presentation order.
pub fn render_trial_table(trials: &[Trial]) -> String {
    const BUNDLE: &str = "Bundle";
    const CHOICE: &str = "Choice";

    let rows: Vec<(String, String)> = trials
        .iter()
        .map(|t| (t.bundle.to_string(), t.choice.to_string()))
        .collect();
    let left = rows
        .iter()
        .map(|(bundle, _)| bundle.chars().count())
        .chain(std::iter::once(BUNDLE.len()))
        .max()
        .unwrap_or(BUNDLE.len());
    let right = rows
        .iter()
        .map(|(_, choice)| choice.chars().count())
        .chain(std::iter::once(CHOICE.len()))
        .max()
        .unwrap_or(CHOICE.len());

    let mut out = String::new();
    out.push_str(&format!("| {:<left$} | {:<right$} |\n", BUNDLE, CHOICE));
    out.push_str(&format!("|{}|{}|\n", "-".repeat(left + 2), "-".repeat(right + 2)));
    for (bundle, choice) in &rows {
        out.push_str(&format!("| {:<left$} | {:<right$} |\n", bundle, choice));
    }
    out
}

pub fn render_explanation(report: &ViolationReport) -> String {
    let x = &report.inconsistent;
    let y = &report.other;
    let a = &report.chosen;

    let mut lines = Vec::new();
    match &report.not_chosen {
        Some(b) => {
            lines.push(format!("Let's call bundles A = {} and B = {}.", a.bundle, b.bundle));
            lines.push("Your choices were:".to_string());
            lines.push(format!("C(A) = C{} = {}", a.bundle, a.choice));
            lines.push(format!("C(B) = C{} = {}", b.bundle, b.choice));
            lines.push(format!("Both {} and {} were available in bundles A and B.", x, y));
            lines.push(format!("{} was chosen from A and {} was chosen from B.", x, y));
            lines.push(format!("However {} was not chosen from B.", x));
        }
        None => {
            lines.push(format!("Let's call bundle A = {}.", a.bundle));
            lines.push("Your choice was:".to_string());
            lines.push(format!("C(A) = C{} = {}", a.bundle, a.choice));
            lines.push(format!("Both {} and {} were available in A, and {} was chosen.", x, y, x));
            lines.push(format!(
                "{} and {} were also offered together elsewhere, where you picked {} only some of the time.",
                x, y, x
            ));
        }
    }
    lines.push("Therefore, WARP is violated.".to_string());
    lines.join("\n")
}

pub fn render_verdict(verdict: &WarpVerdict) -> String {
    match verdict {
        WarpVerdict::Violation(report) => {
            format!("{}\n\nExplanation:\n{}", INCONSISTENT_HEADLINE, render_explanation(report))
        }
        WarpVerdict::NoViolation { pairs_checked, inconclusive } => format!(
            "{}\n{} of {} item pairs could not be tested with these menus.\n{}",
            CONSISTENT_HEADLINE, inconclusive, pairs_checked, NOT_A_PROOF
        ),
    }
}

/// One line per item pair: how often it was offered together, how often each
/// side was picked, and what that reveals.
pub fn render_pair_breakdown(checks: &[PairCheck]) -> String {
    let mut out = String::from("Pair breakdown:\n");
    for check in checks {
        let outcome = match &check.outcome {
            PairOutcome::InsufficientData => "not enough data".to_string(),
            PairOutcome::Consistent => "consistent".to_string(),
            PairOutcome::Violation(report) => format!("{} chosen inconsistently", report.inconsistent),
        };
        out.push_str(&format!(
            "  {} / {}: offered together {}, {} picked {}, {} picked {} -> {}\n",
            check.x, check.y, check.shared, check.x, check.chose_x, check.y, check.chose_y, outcome
        ));
    }
    out
}
