//! End-to-end play: seeded sessions driven to completion and evaluated.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

use warpcheck::bundle::default_items;
use warpcheck::render::{render_trial_table, render_verdict, CONSISTENT_HEADLINE, INCONSISTENT_HEADLINE};
use warpcheck::{
    evaluate_warp, generate_bundles, is_complete, restart, start_session, submit_choice, Bundle, Choice,
    ChoiceError, Item, Session, WarpVerdict,
};

fn item(name: &str) -> Item {
    Item::from(name)
}

fn fruit_session(seed: u64) -> Session {
    let bundles = generate_bundles(&default_items()).unwrap();
    start_session(bundles, StdRng::seed_from_u64(seed)).unwrap()
}

fn play(session: &mut Session, mut pick: impl FnMut(&Bundle) -> Choice) -> Vec<Bundle> {
    let mut shown = Vec::new();
    while let Some(bundle) = session.pending().cloned() {
        session.submit(pick(&bundle)).unwrap();
        shown.push(bundle);
    }
    shown
}

/// Apple whenever offered, except Banana from (Apple, Banana, Mango).
fn apple_lover_slip(bundle: &Bundle) -> Choice {
    let abm = Bundle::new(vec![item("Apple"), item("Banana"), item("Mango")]);
    if *bundle == abm || !bundle.contains(&item("Apple")) {
        Choice::new(vec![item("Banana")])
    } else {
        Choice::new(vec![item("Apple")])
    }
}

#[test]
fn test_apple_banana_violation_regardless_of_order() {
    for seed in 0..20 {
        let mut session = fruit_session(seed);
        play(&mut session, apple_lover_slip);
        assert!(is_complete(&session));

        let verdict = evaluate_warp(&session);
        let report = verdict.report().expect("violation expected");
        assert_eq!(report.inconsistent, item("Apple"));
        assert_eq!(report.other, item("Banana"));
        assert_eq!(report.chosen.choice, Choice::new(vec![item("Apple")]));
        assert_eq!(
            report.chosen.bundle,
            Bundle::new(vec![item("Apple"), item("Banana"), item("Orange")])
        );
        let not_chosen = report.not_chosen.as_ref().expect("counter-witness expected");
        assert_eq!(not_chosen.choice, Choice::new(vec![item("Banana")]));

        assert!(render_verdict(&verdict).starts_with(INCONSISTENT_HEADLINE));
    }
}

#[test]
fn test_full_bundle_every_time_is_not_flagged() {
    let mut session = fruit_session(8);
    play(&mut session, |bundle| Choice::new(bundle.items().cloned()));
    let verdict = evaluate_warp(&session);
    assert!(matches!(verdict, WarpVerdict::NoViolation { pairs_checked: 6, .. }));
    assert!(render_verdict(&verdict).starts_with(CONSISTENT_HEADLINE));
}

#[test]
fn test_every_bundle_shown_exactly_once() {
    let bundles = generate_bundles(&default_items()).unwrap();
    for seed in 0..20 {
        let mut session = fruit_session(seed);
        let mut checks = 0;
        let shown = play(&mut session, |bundle| {
            checks += 1;
            Choice::new(bundle.items().take(1).cloned())
        });
        assert_eq!(checks, bundles.len());
        let distinct: HashSet<_> = shown.iter().collect();
        assert_eq!(distinct.len(), bundles.len());
        assert!(bundles.iter().all(|b| distinct.contains(b)));
    }
}

#[test]
fn test_complete_only_after_last_bundle() {
    let mut session = fruit_session(2);
    for n in 1..=4 {
        assert!(!session.is_complete(), "complete after {} of 4", n - 1);
        let bundle = session.pending().cloned().unwrap();
        session.submit(Choice::new(bundle.items().take(1).cloned())).unwrap();
    }
    assert!(session.is_complete());
}

#[test]
fn test_empty_submission_is_rejected() {
    let session = fruit_session(4);
    assert_eq!(submit_choice(&session, Choice::default()).err(), Some(ChoiceError::Empty));
    assert!(session.trials().is_empty());
    assert_eq!(session.bundle_number(), Some(1));
}

#[test]
fn test_restart_discards_log_and_redraws() {
    let mut session = fruit_session(13);
    let first_order = play(&mut session, |b| Choice::new(b.items().take(1).cloned()));

    let mut orders = HashSet::new();
    orders.insert(first_order);
    for _ in 0..10 {
        session = restart(session);
        assert!(!session.is_complete());
        assert!(session.trials().is_empty());
        assert_eq!(session.bundle_number(), Some(1));
        orders.insert(play(&mut session, |b| Choice::new(b.items().take(1).cloned())));
    }
    // 24 possible orders; eleven draws landing on one would mean the source is not advancing.
    assert!(orders.len() > 1);
}

#[test]
fn test_trial_table_lists_presentation_order() {
    let mut session = fruit_session(21);
    let shown = play(&mut session, apple_lover_slip);
    let table = render_trial_table(session.trials());
    let rows: Vec<&str> = table.lines().skip(2).collect();
    assert_eq!(rows.len(), shown.len());
    for (row, bundle) in rows.iter().zip(&shown) {
        assert!(row.contains(&bundle.to_string()));
    }
}

#[test]
fn test_mixed_sizes_session() {
    let bundles = warpcheck::generate_bundles_sized(&default_items(), &[2, 3]).unwrap();
    let mut session = Session::start(bundles, StdRng::seed_from_u64(5)).unwrap();
    assert_eq!(session.total(), 10);
    play(&mut session, |b| Choice::new(b.items().take(1).cloned()));
    assert_eq!(session.trials().len(), 10);
}

#[test]
fn test_configured_item_order_decides_flagged_item() {
    let cfg = warpcheck::config::GameConfig::from_lookup(|key: &str| {
        (key == "WARP_ITEMS").then(|| "Orange, Apple, Banana, Mango".to_string())
    })
    .unwrap();
    // Orange from (O,A,B), Apple from (O,A,M), Banana everywhere else.
    let favourite = |bundle: &Bundle| {
        let has = |name| bundle.contains(&item(name));
        let pick = match (has("Orange"), has("Apple"), has("Banana")) {
            (true, true, true) => "Orange",
            (true, true, false) => "Apple",
            _ => "Banana",
        };
        Choice::new(vec![item(pick)])
    };
    for seed in 0..10 {
        let mut session = Session::start(cfg.bundles().unwrap(), StdRng::seed_from_u64(seed)).unwrap();
        assert_eq!(session.universe(), cfg.items.as_slice());
        play(&mut session, favourite);

        let verdict = evaluate_warp(&session);
        let report = verdict.report().expect("violation expected");
        assert_eq!(report.inconsistent, item("Orange"));
        assert_eq!(report.other, item("Apple"));
        assert_eq!(report.chosen.bundle.to_string(), "(Orange, Apple, Banana)");
    }
}
