use keyed_query::{range_between, IntoQuery};
use proptest::prelude::*;
use std::collections::BTreeSet;

// Lazy operators agree with the equivalent std Iterator chain.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_lazy_chain_matches_iterator(
        data in proptest::collection::vec(-1_000i32..1_000, 0..64),
        skip in 0usize..70,
        take in 0usize..70,
        modulus in 1i32..7,
    ) {
        let got = data
            .query()
            .filter(|n| **n % modulus == 0)
            .select(|n| n * 3)
            .skip(skip)
            .take(take)
            .to_vec();
        let want: Vec<i32> = data
            .iter()
            .filter(|n| **n % modulus == 0)
            .map(|n| n * 3)
            .skip(skip)
            .take(take)
            .collect();
        prop_assert_eq!(got, want);
    }

    #[test]
    fn prop_concat_and_count(
        a in proptest::collection::vec(any::<u8>(), 0..32),
        b in proptest::collection::vec(any::<u8>(), 0..32),
    ) {
        let q = a.query().concat(b.query());
        prop_assert_eq!(q.count(), a.len() + b.len());
        let want: Vec<u8> = a.iter().chain(b.iter()).copied().collect();
        prop_assert_eq!(q.copied().to_vec(), want);
    }

    // distinct over numbers equals the sorted set of inputs.
    #[test]
    fn prop_distinct_is_sorted_set(data in proptest::collection::vec(-50i64..50, 0..80)) {
        let got = data.query().copied().distinct().unwrap().to_vec();
        let want: Vec<i64> = data.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        prop_assert_eq!(got, want);
    }

    // order_by is a stable ascending sort; descending reverses it.
    #[test]
    fn prop_order_by_matches_stable_sort(data in proptest::collection::vec((0u8..10, any::<u16>()), 0..64)) {
        let got = data.query().copied().order_by(|p| p.0).unwrap().to_vec();
        let mut want = data.clone();
        want.sort_by_key(|p| p.0);
        prop_assert_eq!(&got, &want);

        let desc: Vec<u8> = data.query().order_by_descending(|p| p.0).unwrap().select(|p| p.0).to_vec();
        let mut keys: Vec<u8> = want.iter().map(|p| p.0).collect();
        keys.reverse();
        prop_assert_eq!(desc, keys);
    }

    // Full-width integers sort exactly, including past 2^53.
    #[test]
    fn prop_wide_integers_sort_exactly(data in proptest::collection::vec(any::<i64>(), 0..64)) {
        let got = data.query().copied().order_by(|n| *n).unwrap().to_vec();
        let mut want = data.clone();
        want.sort();
        prop_assert_eq!(got, want);

        let unique = data.query().copied().distinct().unwrap().to_vec();
        let set: Vec<i64> = data.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        prop_assert_eq!(unique, set);
    }

    #[test]
    fn prop_at_agrees_with_get(data in proptest::collection::vec(any::<i16>(), 0..40), index in 0usize..50) {
        match data.get(index) {
            Some(v) => prop_assert_eq!(data.query().at(index), Ok(v)),
            None => prop_assert!(data.query().at(index).is_err()),
        }
    }

    #[test]
    fn prop_range_between_len(start in -200i64..200, end in -200i64..200) {
        let q = range_between(start, end);
        prop_assert_eq!(q.count() as i64, (end - start).abs() + 1);
        prop_assert_eq!(q.first(), Ok(start));
        prop_assert_eq!(q.last(), Ok(end));
    }
}
