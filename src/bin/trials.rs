//! Run the checker against simulated players and print violation rates.
//!
//! `WARP_SESSIONS` sets sessions per model; `WARP_SEED` (default 42) fixes
//! both the bundle order and the players' draws.

use anyhow::Result;

use warpcheck::config::GameConfig;
use warpcheck::logging::{log, obj, v_num, v_str, Domain, Level};
use warpcheck::sim::{simulate, Chooser, RandomSubset, StrictPreference, TakeAll};

fn main() -> Result<()> {
    let cfg = GameConfig::load()?;
    let bundles = cfg.bundles()?;
    let seed = cfg.seed.unwrap_or(42);

    let mut models: Vec<Box<dyn Chooser>> = vec![
        Box::new(StrictPreference {
            ranking: cfg.items.clone(),
        }),
        Box::new(TakeAll),
        Box::new(RandomSubset),
    ];

    println!("model,sessions,violations,violation_rate");
    for model in models.iter_mut() {
        let summary = simulate(&bundles, model.as_mut(), cfg.sessions, seed)?;
        log(
            Level::Info,
            Domain::Evaluate,
            "trial_summary",
            obj(&[
                ("model", v_str(&summary.model)),
                ("sessions", v_num(summary.sessions as f64)),
                ("violations", v_num(summary.violations as f64)),
                ("seed", v_num(seed as f64)),
            ]),
        );
        println!(
            "{},{},{},{:.4}",
            summary.model, summary.sessions, summary.violations, summary.violation_rate
        );
    }
    Ok(())
}
