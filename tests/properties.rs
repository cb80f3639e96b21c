//! Property tests for bundle generation, session coverage and evaluator determinism.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

use warpcheck::sim::{play_out, Chooser, RandomSubset, StrictPreference};
use warpcheck::{evaluate, generate_bundles, Choice, ChoiceError, Item, Session};

fn universe(n: usize) -> Vec<Item> {
    (0..n).map(|i| Item::new(format!("item-{:02}", i))).collect()
}

fn binomial(n: usize, k: usize) -> usize {
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// C(n, 3) distinct three-item bundles, same list on every call.
    #[test]
    fn bundle_count_and_shape(n in 3usize..9) {
        let items = universe(n);
        let bundles = generate_bundles(&items).unwrap();
        prop_assert_eq!(bundles.len(), binomial(n, 3));
        prop_assert!(bundles.iter().all(|b| b.len() == 3));
        let distinct: HashSet<_> = bundles.iter().collect();
        prop_assert_eq!(distinct.len(), bundles.len());
        prop_assert_eq!(generate_bundles(&items).unwrap(), bundles);
    }

    /// Universes below three items are a configuration error.
    #[test]
    fn small_universe_rejected(n in 0usize..3) {
        prop_assert!(generate_bundles(&universe(n)).is_err());
    }

    /// Any seed shows every bundle exactly once and ends complete.
    #[test]
    fn session_covers_all_bundles(n in 3usize..7, seed in any::<u64>()) {
        let bundles = generate_bundles(&universe(n)).unwrap();
        let mut session = Session::start(bundles.clone(), StdRng::seed_from_u64(seed)).unwrap();
        let mut shown = HashSet::new();
        while let Some(bundle) = session.pending().cloned() {
            prop_assert!(!session.is_complete());
            prop_assert!(shown.insert(bundle.clone()));
            session.submit(Choice::new(bundle.items().take(1).cloned())).unwrap();
        }
        prop_assert!(session.is_complete());
        prop_assert_eq!(shown.len(), bundles.len());
    }

    /// Rejected submissions never change what is pending.
    #[test]
    fn empty_submission_is_noop(seed in any::<u64>(), steps in 0usize..4) {
        let bundles = generate_bundles(&universe(4)).unwrap();
        let mut session = Session::start(bundles, StdRng::seed_from_u64(seed)).unwrap();
        for _ in 0..steps {
            let bundle = session.pending().cloned().unwrap();
            session.submit(Choice::new(bundle.items().cloned())).unwrap();
        }
        let pending = session.pending().cloned();
        let trials = session.trials().len();
        prop_assert_eq!(session.submit(Choice::default()), Err(ChoiceError::Empty));
        prop_assert_eq!(session.pending().cloned(), pending);
        prop_assert_eq!(session.trials().len(), trials);
    }

    /// A single strict ranking never reveals an inconsistency.
    #[test]
    fn strict_preference_never_flagged(n in 3usize..7, seed in any::<u64>()) {
        let items = universe(n);
        let mut ranking = items.clone();
        let mut rng = StdRng::seed_from_u64(seed);
        for i in (1..ranking.len()).rev() {
            ranking.swap(i, rng.gen_range(0..=i));
        }
        let mut chooser = StrictPreference { ranking };
        let mut session = Session::start(generate_bundles(&items).unwrap(), StdRng::seed_from_u64(seed)).unwrap();
        let verdict = play_out(&mut session, &mut chooser, &mut rng).unwrap();
        prop_assert!(!verdict.is_violation());
    }

    /// The verdict depends only on the trial log.
    #[test]
    fn evaluation_is_deterministic(seed in any::<u64>()) {
        let mut session = Session::start(generate_bundles(&universe(5)).unwrap(), StdRng::seed_from_u64(seed)).unwrap();
        let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);
        let first = play_out(&mut session, &mut RandomSubset as &mut dyn Chooser, &mut rng).unwrap();
        prop_assert_eq!(evaluate(session.trials(), session.universe()), first.clone());
        prop_assert_eq!(evaluate(session.trials(), session.universe()), first);
    }
}
