use anyhow::Result;
use serde_json::json;
use std::io::{self, BufRead, Write};

use warpcheck::config::GameConfig;
use warpcheck::logging::{log, log_digest, obj, v_num, v_str, Domain, Level};
use warpcheck::render::{render_pair_breakdown, render_trial_table, render_verdict};
use warpcheck::warp::evaluate_pairs;
use warpcheck::{evaluate_warp, Choice, Session};

const QUIT: &str = ":quit";
const RESTART: &str = ":restart";

fn intro(cfg: &GameConfig, total: usize) -> String {
    let names: Vec<&str> = cfg.items.iter().map(|i| i.as_str()).collect();
    format!(
        "WARP checker\n\
         Suppose there are {} items: {}.\n\
         You will be shown {} menus. Based on your tastes, pick one or more items from each.\n\
         Type item numbers or names separated by spaces. {} starts over, {} exits.\n",
        names.len(),
        names.join(", "),
        total,
        RESTART,
        QUIT
    )
}

fn prompt(out: &mut impl Write, session: &Session) -> Result<()> {
    if let (Some(bundle), Some(number)) = (session.pending(), session.bundle_number()) {
        writeln!(out)?;
        writeln!(
            out,
            "Bundle #{} of {}. Please select one or more items.",
            number,
            session.total()
        )?;
        for (i, item) in bundle.items().enumerate() {
            writeln!(out, "  {}. {}", i + 1, item)?;
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    Ok(())
}

fn finish(out: &mut impl Write, session: &Session) -> Result<()> {
    let verdict = evaluate_warp(session);
    log(
        Level::Info,
        Domain::Evaluate,
        "verdict",
        obj(&[
            ("msg", v_str("session evaluated")),
            ("violation", json!(verdict.is_violation())),
            ("trials", v_num(session.trials().len() as f64)),
            ("digest", v_str(&log_digest(session.trials()))),
        ]),
    );
    writeln!(out, "\nAll bundles have been shown.\n")?;
    write!(out, "{}", render_trial_table(session.trials()))?;
    writeln!(out, "\n{}\n", render_verdict(&verdict))?;
    writeln!(out, "{}", render_pair_breakdown(&evaluate_pairs(session.trials(), session.universe())))?;
    write!(out, "Play again? [y/N] ")?;
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let cfg = GameConfig::load()?;
    let bundles = cfg.bundles()?;
    let total = bundles.len();
    let mut session = Session::start(bundles, cfg.rng())?;
    log(
        Level::Info,
        Domain::System,
        "startup",
        obj(&[
            ("items", v_num(cfg.items.len() as f64)),
            ("bundles", v_num(total as f64)),
            ("seeded", json!(cfg.seed.is_some())),
        ]),
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write!(out, "{}", intro(&cfg, total))?;
    prompt(&mut out, &session)?;

    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();
        if input == QUIT {
            break;
        }
        if input == RESTART {
            session.restart();
            log(Level::Info, Domain::Session, "restart", obj(&[("msg", v_str("player restarted"))]));
            prompt(&mut out, &session)?;
            continue;
        }

        let Some(bundle) = session.pending() else {
            if input.eq_ignore_ascii_case("y") || input.eq_ignore_ascii_case("yes") {
                session.restart();
                log(Level::Info, Domain::Session, "restart", obj(&[("msg", v_str("new game"))]));
                prompt(&mut out, &session)?;
                continue;
            }
            break;
        };

        let choice = Choice::parse_for(bundle, input);
        match session.submit(choice) {
            Ok(()) if session.is_complete() => finish(&mut out, &session)?,
            Ok(()) => prompt(&mut out, &session)?,
            Err(err) => {
                writeln!(out, "{}", err)?;
                prompt(&mut out, &session)?;
            }
        }
    }

    log(
        Level::Info,
        Domain::System,
        "shutdown",
        obj(&[("trials", v_num(session.trials().len() as f64))]),
    );
    Ok(())
}
