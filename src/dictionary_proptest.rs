#![cfg(test)]

// Property tests for Dictionary kept inside the crate next to the bucket
// schedule they check against.

use crate::dictionary::Dictionary;
use crate::hash::{hash_string, KeyHash};
use crate::schedule::{BUCKET_COUNTS, LOAD_FACTOR};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::Hash;

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}
impl KeyHash for Key {
    fn hash_code(&self) -> u32 {
        hash_string(&self.0)
    }
}

// Every instance hashes alike, so all entries share one chain.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
struct Colliding(String);
impl KeyHash for Colliding {
    fn hash_code(&self) -> u32 {
        0x9e37_79b9
    }
}

// Pool-indexed operations: indices shrink to earlier keys, the pool
// shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Add(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=40).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Add(i, v)),
            1 => idx.clone().prop_map(OpI::Remove),
            1 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

// State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - `add` inserts or overwrites; count tracks unique keys.
// - `get_value`/`contains_key` parity with the model.
// - `remove` returns the model's pair, and absent removes are no-ops.
// - Enumeration yields each live key exactly once.
// - The bucket count stays on the schedule and the load factor holds.
fn run_scenario<K, F>(pool: &[String], ops: Vec<OpI>, make: F) -> Result<(), TestCaseError>
where
    K: KeyHash + Eq + Hash + Ord + Clone + fmt::Debug,
    F: Fn(&str) -> K,
{
    let mut sut: Dictionary<K, i32> = Dictionary::new();
    let mut model: HashMap<K, i32> = HashMap::new();

    for op in ops {
        match op {
            OpI::Add(i, v) => {
                let k = make(&pool[i]);
                sut.add(k.clone(), v)
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;
                model.insert(k, v);
            }
            OpI::Remove(i) => {
                let k = make(&pool[i]);
                let removed = sut.remove(&k);
                let expected = model.remove_entry(&k);
                prop_assert_eq!(removed, expected);
                prop_assert!(!sut.contains_key(&k));
            }
            OpI::Get(i) => {
                let k = make(&pool[i]);
                prop_assert_eq!(sut.get_value(&k), model.get(&k));
            }
            OpI::Contains(s) => {
                let k = make(&s);
                prop_assert_eq!(sut.contains_key(&k), model.contains_key(&k));
            }
            OpI::Mutate(i, d) => {
                let k = make(&pool[i]);
                if let Some(v) = sut.get_value_mut(&k) {
                    *v = v.saturating_add(d);
                }
                if let Some(v) = model.get_mut(&k) {
                    *v = v.saturating_add(d);
                }
            }
            OpI::Iterate => {
                let keys: Vec<K> = sut.keys().cloned().to_vec();
                let unique: BTreeSet<K> = keys.iter().cloned().collect();
                prop_assert_eq!(keys.len(), unique.len(), "each key enumerated once");
                let m_keys: BTreeSet<K> = model.keys().cloned().collect();
                prop_assert_eq!(unique, m_keys);
            }
        }

        prop_assert_eq!(sut.count(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(BUCKET_COUNTS.contains(&sut.bucket_count()));
        prop_assert!(sut.count() <= LOAD_FACTOR * sut.bucket_count());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(&pool, ops, |s| Key(s.to_string()))?;
    }

    // Same invariants under worst-case collisions, stressing equality
    // probing within a single chain.
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(&pool, ops, |s| Colliding(s.to_string()))?;
    }

    // Borrowed `&str` lookups agree with owned-key lookups.
    #[test]
    fn prop_borrowed_lookup(keys in proptest::collection::vec("[a-z]{0,6}", 0..64), probe in "[a-z]{0,6}") {
        let mut sut: Dictionary<Key, usize> = Dictionary::new();
        for (i, k) in keys.iter().enumerate() {
            sut.add(Key(k.clone()), i).map_err(|e| TestCaseError::fail(e.to_string()))?;
        }
        let owned = Key(probe.clone());
        prop_assert_eq!(sut.contains_key(probe.as_str()), sut.contains_key(&owned));
        prop_assert_eq!(sut.get_value(probe.as_str()), sut.get_value(&owned));
        let last = keys.iter().rposition(|k| *k == probe);
        prop_assert_eq!(sut.get_value(probe.as_str()).copied(), last);
    }
}
