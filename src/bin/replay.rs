//! Scripted play: drive a session from JSON lines on stdin.
//!
//! ```text
//! {"type":"choose","items":["Apple","Mango"]}
//! {"type":"pick","positions":[1]}
//! {"type":"restart"}
//! ```
//!
//! Positions are 1-based; a `pick` naming a position the pending bundle does
//! not have rejects the whole line. Uses the same `WARP_*` configuration as the interactive game; set
//! `WARP_SEED` for a reproducible bundle order. Prints the trial log and the
//! verdict as one JSON object, with the outcome of every item pair under
//! `pairs`.

use anyhow::Result;
use serde_json::json;
use std::io::{self, BufRead};

use warpcheck::config::GameConfig;
use warpcheck::logging::{log, log_digest, obj, v_num, v_str, Domain, Level};
use warpcheck::warp::evaluate_pairs;
use warpcheck::{evaluate_warp, Choice, Item, Session};

#[derive(Debug, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum InputEvent {
    Choose { items: Vec<String> },
    Pick { positions: Vec<usize> },
    Restart,
}

fn main() -> Result<()> {
    let cfg = GameConfig::load()?;
    let mut session = Session::start(cfg.bundles()?, cfg.rng())?;
    let mut rejected = 0usize;

    let stdin = io::stdin();
    for (line_no, line) in stdin.lock().lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let evt: InputEvent = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(err) => {
                eprintln!("line {}: bad event json: {}", line_no + 1, err);
                rejected += 1;
                continue;
            }
        };

        let choice = match evt {
            InputEvent::Restart => {
                session.restart();
                continue;
            }
            InputEvent::Choose { items } => Choice::new(items.into_iter().map(Item::new)),
            InputEvent::Pick { positions } => match session.pending() {
                Some(bundle) => match Choice::from_positions(bundle, &positions) {
                    Ok(choice) => choice,
                    Err(err) => {
                        eprintln!("line {}: {}", line_no + 1, err);
                        rejected += 1;
                        continue;
                    }
                },
                // Let the session report that it is already complete.
                None => Choice::default(),
            },
        };

        if let Err(err) = session.submit(choice) {
            eprintln!("line {}: {}", line_no + 1, err);
            rejected += 1;
        }
    }

    let verdict = evaluate_warp(&session);
    log(
        Level::Info,
        Domain::Evaluate,
        "replay_verdict",
        obj(&[
            ("violation", json!(verdict.is_violation())),
            ("trials", v_num(session.trials().len() as f64)),
            ("rejected", v_num(rejected as f64)),
            ("digest", v_str(&log_digest(session.trials()))),
        ]),
    );

    println!(
        "{}",
        json!({
            "complete": session.is_complete(),
            "total_bundles": session.total(),
            "rejected_lines": rejected,
            "digest": log_digest(session.trials()),
            "trials": session.trials(),
            "verdict": verdict,
            "pairs": evaluate_pairs(session.trials(), session.universe()),
        })
    );
    Ok(())
}
