//! Dictionary: chained hash table over a prime bucket schedule.
//!
//! Entries live in a slot map; each bucket is an ordered chain of slot keys.
//! Every entry stores the hash computed when it was inserted, and rebalancing
//! reuses it, so `KeyHash` runs once per insertion.

use crate::cursor::{Cursor, CursorIter, Enumerable};
use crate::error::{Error, Result};
use crate::hash::KeyHash;
use crate::probe_guard::ProbeGuard;
use crate::query::Query;
use crate::schedule::{self, BUCKET_COUNTS, LOAD_FACTOR};
use core::borrow::Borrow;
use core::fmt;
use slotmap::{DefaultKey, SlotMap};

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    hash: u32,
}

/// Mapping from unique keys to values.
///
/// Enumeration order is unspecified: it follows bucket index, then insertion
/// order within a bucket, and changes whenever the table rebalances.
pub struct Dictionary<K, V> {
    slots: SlotMap<DefaultKey, Entry<K, V>>,
    buckets: Vec<Vec<DefaultKey>>,
    size_index: usize,
    probe: ProbeGuard,
}

#[inline]
fn bucket_of(hash: u32, bucket_count: usize) -> usize {
    hash as usize % bucket_count
}

/// Position within `chain` and slot of the entry whose key equals `q`.
fn find_in_chain<K, V, Q>(
    slots: &SlotMap<DefaultKey, Entry<K, V>>,
    chain: &[DefaultKey],
    hash: u32,
    q: &Q,
) -> Option<(usize, DefaultKey)>
where
    K: Borrow<Q>,
    Q: ?Sized + Eq,
{
    chain.iter().enumerate().find_map(|(pos, &slot)| {
        slots
            .get(slot)
            .filter(|e| e.hash == hash && Borrow::<Q>::borrow(&e.key) == q)
            .map(|_| (pos, slot))
    })
}

impl<K, V> Dictionary<K, V> {
    fn with_size_index(size_index: usize, bucket_count: usize) -> Self {
        Self {
            slots: SlotMap::with_key(),
            buckets: vec![Vec::new(); bucket_count],
            size_index,
            probe: ProbeGuard::new(),
        }
    }

    /// Number of entries. O(1).
    pub fn count(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current number of buckets; always an entry of [`BUCKET_COUNTS`].
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Lazy view over `(key, value)` pairs.
    pub fn query(&self) -> Query<Entries<'_, K, V>> {
        Query::new(Entries { dict: self })
    }

    /// Lazy view over the keys; walks the buckets when enumerated.
    pub fn keys(&self) -> Query<Keys<'_, K, V>> {
        Query::new(Keys { dict: self })
    }

    /// Lazy view over the values.
    pub fn values(&self) -> Query<Values<'_, K, V>> {
        Query::new(Values { dict: self })
    }

    pub fn iter(&self) -> CursorIter<DictionaryCursor<'_, K, V>> {
        CursorIter::new(DictionaryCursor::new(self))
    }

    /// Pairs in enumeration order.
    pub fn to_vec(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }

    /// Call `op` with each pair and its position.
    pub fn for_each<F>(&self, mut op: F)
    where
        F: FnMut((&K, &V), usize),
    {
        for (index, pair) in self.iter().enumerate() {
            op(pair, index);
        }
    }

    /// Like [`for_each`](Self::for_each), returning the dictionary for chaining.
    pub fn inspect_each<F>(&self, op: F) -> &Self
    where
        F: FnMut((&K, &V), usize),
    {
        self.for_each(op);
        self
    }

    fn rebalance(&mut self) -> Result<()> {
        let _probe = self.probe.enter("rebalance");
        let next_index = self.size_index + 1;
        let next_count = schedule::bucket_count(next_index)?;
        let mut next: Vec<Vec<DefaultKey>> = vec![Vec::new(); next_count];

        for chain in &self.buckets {
            for &slot in chain {
                if let Some(entry) = self.slots.get(slot) {
                    next[bucket_of(entry.hash, next_count)].push(slot);
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            from_buckets = self.buckets.len(),
            to_buckets = next_count,
            entries = self.slots.len(),
            "dictionary rebalanced"
        );

        self.buckets = next;
        self.size_index = next_index;
        Ok(())
    }
}

impl<K, V> Dictionary<K, V>
where
    K: KeyHash + Eq,
{
    /// Empty dictionary sized for [`DEFAULT_CAPACITY`](schedule::DEFAULT_CAPACITY) entries.
    pub fn new() -> Self {
        Self::with_size_index(0, BUCKET_COUNTS[0])
    }

    /// Empty dictionary that holds at least `capacity` entries before its
    /// first rebalance.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let size_index = schedule::index_for_capacity(capacity)?;
        Ok(Self::with_size_index(
            size_index,
            schedule::bucket_count(size_index)?,
        ))
    }

    /// Insert `key`, or overwrite its value if an equal key is present.
    ///
    /// Fails with [`Error::InvalidKey`] for unspecified keys and
    /// [`Error::CapacityExceeded`] when a new entry would need a bucket
    /// count past the end of the schedule.
    pub fn add(&mut self, key: K, value: V) -> Result<&mut Self> {
        if !key.is_specified() {
            return Err(Error::InvalidKey);
        }
        if self.insert_entry(key, value)? {
            self.rebalance_if_necessary()?;
        }
        Ok(self)
    }

    /// Returns `true` if a new entry was created.
    fn insert_entry(&mut self, key: K, value: V) -> Result<bool> {
        let _probe = self.probe.enter("add");
        let hash = key.hash_code();
        let index = bucket_of(hash, self.buckets.len());

        if let Some((_, slot)) = find_in_chain(&self.slots, &self.buckets[index], hash, &key) {
            if let Some(entry) = self.slots.get_mut(slot) {
                entry.value = value;
            }
            return Ok(false);
        }

        let needs_growth = self.slots.len() + 1 > LOAD_FACTOR * self.buckets.len();
        if needs_growth && self.size_index + 1 >= BUCKET_COUNTS.len() {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                entries = self.slots.len(),
                buckets = self.buckets.len(),
                "dictionary bucket schedule exhausted"
            );
            return Err(Error::CapacityExceeded {
                requested: self.slots.len() + 1,
            });
        }

        let slot = self.slots.insert(Entry { key, value, hash });
        self.buckets[index].push(slot);
        Ok(true)
    }

    fn rebalance_if_necessary(&mut self) -> Result<()> {
        if self.slots.len() > LOAD_FACTOR * self.buckets.len() {
            self.rebalance()?;
        }
        Ok(())
    }

    /// Remove the entry whose key equals `q`, returning it. Absent keys are
    /// a no-op. The table never shrinks.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + KeyHash + Eq,
    {
        let _probe = self.probe.enter("remove");
        let hash = q.hash_code();
        let index = bucket_of(hash, self.buckets.len());
        let (pos, slot) = find_in_chain(&self.slots, &self.buckets[index], hash, q)?;
        self.buckets[index].remove(pos);
        self.slots.remove(slot).map(|e| (e.key, e.value))
    }

    pub fn get_value<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + KeyHash + Eq,
    {
        let _probe = self.probe.enter("get_value");
        let hash = q.hash_code();
        let chain = &self.buckets[bucket_of(hash, self.buckets.len())];
        let (_, slot) = find_in_chain(&self.slots, chain, hash, q)?;
        self.slots.get(slot).map(|e| &e.value)
    }

    pub fn get_value_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + KeyHash + Eq,
    {
        let _probe = self.probe.enter("get_value_mut");
        let hash = q.hash_code();
        let chain = &self.buckets[bucket_of(hash, self.buckets.len())];
        let (_, slot) = find_in_chain(&self.slots, chain, hash, q)?;
        self.slots.get_mut(slot).map(|e| &mut e.value)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + KeyHash + Eq,
    {
        let _probe = self.probe.enter("contains_key");
        let hash = q.hash_code();
        let chain = &self.buckets[bucket_of(hash, self.buckets.len())];
        find_in_chain(&self.slots, chain, hash, q).is_some()
    }
}

impl<K, V> Default for Dictionary<K, V>
where
    K: KeyHash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Dictionary<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V> IntoIterator for &'a Dictionary<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = CursorIter<DictionaryCursor<'a, K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Consumes the dictionary, yielding owned pairs in enumeration order.
impl<K, V> IntoIterator for Dictionary<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(mut self) -> Self::IntoIter {
        let mut pairs = Vec::with_capacity(self.slots.len());
        for chain in &self.buckets {
            for &slot in chain {
                if let Some(entry) = self.slots.remove(slot) {
                    pairs.push((entry.key, entry.value));
                }
            }
        }
        pairs.into_iter()
    }
}

/// Cursor over a dictionary's buckets in index order.
pub struct DictionaryCursor<'a, K, V> {
    dict: &'a Dictionary<K, V>,
    // (bucket, position in chain) of the current entry.
    position: Option<(usize, usize)>,
}

impl<'a, K, V> DictionaryCursor<'a, K, V> {
    fn new(dict: &'a Dictionary<K, V>) -> Self {
        Self {
            dict,
            position: None,
        }
    }
}

impl<K, V> Clone for DictionaryCursor<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            dict: self.dict,
            position: self.position,
        }
    }
}

impl<'a, K, V> Cursor for DictionaryCursor<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn advance(&mut self) -> bool {
        let buckets = &self.dict.buckets;
        let (mut bucket, mut pos) = match self.position {
            None => (0, 0),
            Some((bucket, pos)) => (bucket, pos + 1),
        };
        while bucket < buckets.len() {
            if pos < buckets[bucket].len() {
                self.position = Some((bucket, pos));
                return true;
            }
            bucket += 1;
            pos = 0;
        }
        self.position = Some((buckets.len(), 0));
        false
    }

    fn current(&self) -> Option<(&'a K, &'a V)> {
        let dict = self.dict;
        let (bucket, pos) = self.position?;
        let slot = *dict.buckets.get(bucket)?.get(pos)?;
        dict.slots.get(slot).map(|e| (&e.key, &e.value))
    }
}

/// Enumerable view over a dictionary's pairs.
pub struct Entries<'a, K, V> {
    dict: &'a Dictionary<K, V>,
}

/// Enumerable view over a dictionary's keys.
pub struct Keys<'a, K, V> {
    dict: &'a Dictionary<K, V>,
}

/// Enumerable view over a dictionary's values.
pub struct Values<'a, K, V> {
    dict: &'a Dictionary<K, V>,
}

macro_rules! copy_view {
    ($($view:ident),*) => {
        $(
            impl<K, V> Clone for $view<'_, K, V> {
                fn clone(&self) -> Self {
                    *self
                }
            }
            impl<K, V> Copy for $view<'_, K, V> {}
        )*
    };
}

copy_view!(Entries, Keys, Values);

impl<'a, K, V> Enumerable for Entries<'a, K, V> {
    type Item = (&'a K, &'a V);
    type Cursor = DictionaryCursor<'a, K, V>;

    fn cursor(&self) -> Self::Cursor {
        DictionaryCursor::new(self.dict)
    }
}

impl<'a, K, V> Enumerable for &'a Dictionary<K, V> {
    type Item = (&'a K, &'a V);
    type Cursor = DictionaryCursor<'a, K, V>;

    fn cursor(&self) -> Self::Cursor {
        DictionaryCursor::new(self)
    }
}

impl<'a, K, V> Enumerable for Keys<'a, K, V> {
    type Item = &'a K;
    type Cursor = KeyCursor<'a, K, V>;

    fn cursor(&self) -> Self::Cursor {
        KeyCursor(DictionaryCursor::new(self.dict))
    }
}

impl<'a, K, V> Enumerable for Values<'a, K, V> {
    type Item = &'a V;
    type Cursor = ValueCursor<'a, K, V>;

    fn cursor(&self) -> Self::Cursor {
        ValueCursor(DictionaryCursor::new(self.dict))
    }
}

pub struct KeyCursor<'a, K, V>(DictionaryCursor<'a, K, V>);

impl<'a, K, V> Cursor for KeyCursor<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn advance(&mut self) -> bool {
        self.0.advance()
    }

    #[inline]
    fn current(&self) -> Option<&'a K> {
        self.0.current().map(|(k, _)| k)
    }
}

pub struct ValueCursor<'a, K, V>(DictionaryCursor<'a, K, V>);

impl<'a, K, V> Cursor for ValueCursor<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn advance(&mut self) -> bool {
        self.0.advance()
    }

    #[inline]
    fn current(&self) -> Option<&'a V> {
        self.0.current().map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::IntoQuery;
    use std::collections::BTreeSet;

    /// Key whose hash is constant, forcing every entry into one chain.
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Colliding(&'static str);

    impl KeyHash for Colliding {
        fn hash_code(&self) -> u32 {
            7
        }
    }

    /// Invariant: adding an existing key overwrites in place without changing count.
    #[test]
    fn add_overwrites_existing_key() {
        let mut d: Dictionary<String, i32> = Dictionary::new();
        d.add("dup".to_string(), 1).unwrap();
        d.add("dup".to_string(), 2).unwrap();
        assert_eq!(d.count(), 1);
        assert_eq!(d.get_value("dup"), Some(&2));
    }

    #[test]
    fn add_is_chainable() {
        let mut d = Dictionary::new();
        d.add("a", 1)
            .unwrap()
            .add("b", 2)
            .unwrap()
            .add("c", 3)
            .unwrap();
        assert_eq!(d.count(), 3);
    }

    /// Invariant: unspecified keys are rejected and leave the table unchanged.
    #[test]
    fn unspecified_key_is_rejected() {
        let mut d: Dictionary<Option<i32>, &str> = Dictionary::new();
        assert_eq!(d.add(None, "x").unwrap_err(), Error::InvalidKey);
        assert!(d.is_empty());
        d.add(Some(1), "one").unwrap();
        assert_eq!(d.get_value(&Some(1)), Some(&"one"));
    }

    /// Invariant: `get_value(k).is_some() == contains_key(k)` for present/absent keys.
    #[test]
    fn get_value_contains_key_parity() {
        let mut d: Dictionary<String, usize> = Dictionary::new();
        for (i, k) in ["a", "b", "c"].iter().enumerate() {
            d.add((*k).to_string(), i).unwrap();
        }
        for k in ["a", "b", "c"] {
            assert!(d.get_value(k).is_some());
            assert!(d.contains_key(k));
        }
        for k in ["x", "y", "z"] {
            assert!(d.get_value(k).is_none());
            assert!(!d.contains_key(k));
        }
    }

    /// Invariant: remove makes the key absent; removing an absent key is a no-op.
    #[test]
    fn remove_then_lookup_is_absent() {
        let mut d: Dictionary<i32, &str> = Dictionary::new();
        d.add(1, "one").unwrap().add(2, "two").unwrap();
        assert_eq!(d.remove(&1), Some((1, "one")));
        assert_eq!(d.get_value(&1), None);
        assert!(!d.contains_key(&1));
        assert_eq!(d.count(), 1);

        assert_eq!(d.remove(&42), None);
        assert_eq!(d.count(), 1);

        d.add(1, "uno").unwrap();
        assert_eq!(d.get_value(&1), Some(&"uno"));
    }

    #[test]
    fn get_value_mut_updates_in_place() {
        let mut d: Dictionary<&str, i32> = Dictionary::new();
        d.add("k", 10).unwrap();
        if let Some(v) = d.get_value_mut(&"k") {
            *v += 5;
        }
        assert_eq!(d.get_value(&"k"), Some(&15));
        assert!(d.get_value_mut(&"missing").is_none());
    }

    /// Invariant: inserting past `LOAD_FACTOR * buckets` grows through the
    /// schedule and keeps every entry reachable with its latest value.
    #[test]
    fn rebalance_preserves_entries() {
        let mut d: Dictionary<u32, u32> = Dictionary::new();
        assert_eq!(d.bucket_count(), 7);
        for i in 0..1_000 {
            d.add(i, i * 10).unwrap();
            assert!(d.count() <= LOAD_FACTOR * d.bucket_count());
        }
        for i in (0..1_000).step_by(3) {
            d.add(i, i + 1).unwrap();
        }
        assert_eq!(d.count(), 1_000);
        assert_eq!(d.bucket_count(), 631);
        for i in 0..1_000 {
            let expected = if i % 3 == 0 { i + 1 } else { i * 10 };
            assert_eq!(d.get_value(&i), Some(&expected), "key {i}");
        }
    }

    /// Invariant: each entry sits in the bucket its stored hash maps to.
    #[test]
    fn entries_live_in_their_hash_bucket() {
        let mut d: Dictionary<String, ()> = Dictionary::new();
        for i in 0..200 {
            d.add(format!("key-{i}"), ()).unwrap();
        }
        let buckets = d.bucket_count();
        let mut total = 0;
        for (index, chain) in d.buckets.iter().enumerate() {
            for &slot in chain {
                let entry = d.slots.get(slot).expect("chain points at live slot");
                assert_eq!(entry.hash, entry.key.hash_code());
                assert_eq!(bucket_of(entry.hash, buckets), index);
                total += 1;
            }
        }
        assert_eq!(total, d.count());
    }

    #[test]
    fn with_capacity_picks_schedule_entry() {
        let d: Dictionary<i32, i32> = Dictionary::with_capacity(1_000).unwrap();
        assert_eq!(d.bucket_count(), 631);
        let small: Dictionary<i32, i32> = Dictionary::with_capacity(0).unwrap();
        assert_eq!(small.bucket_count(), 7);
        assert!(matches!(
            Dictionary::<i32, i32>::with_capacity(usize::MAX),
            Err(Error::CapacityExceeded { .. })
        ));
    }

    /// Invariant: collisions resolve through `Eq`, not hash equality.
    #[test]
    fn collisions_resolve_by_equality() {
        let mut d: Dictionary<Colliding, i32> = Dictionary::new();
        for (i, name) in ["a", "b", "c", "d", "e"].iter().enumerate() {
            d.add(Colliding(name), i as i32).unwrap();
        }
        assert_eq!(d.count(), 5);
        assert_eq!(d.get_value(&Colliding("c")), Some(&2));
        assert_eq!(d.remove(&Colliding("b")), Some((Colliding("b"), 1)));
        assert_eq!(d.get_value(&Colliding("c")), Some(&2));
        assert!(!d.contains_key(&Colliding("b")));
        assert_eq!(d.get_value(&Colliding("z")), None);
    }

    /// Invariant: enumeration visits buckets in index order and, inside a
    /// bucket, entries in insertion order.
    #[test]
    fn enumeration_follows_buckets_then_insertion() {
        let mut d: Dictionary<Colliding, i32> = Dictionary::new();
        d.add(Colliding("z"), 1).unwrap();
        d.add(Colliding("a"), 2).unwrap();
        d.add(Colliding("m"), 3).unwrap();
        let keys: Vec<&str> = d.keys().select(|k| k.0).to_vec();
        assert_eq!(keys, vec!["z", "a", "m"]);

        let mut ints: Dictionary<u32, ()> = Dictionary::new();
        for k in [5_u32, 1, 3, 2, 4] {
            ints.add(k, ()).unwrap();
        }
        let buckets: Vec<usize> = ints
            .keys()
            .select(|k| bucket_of(k.hash_code(), ints.bucket_count()))
            .to_vec();
        assert!(buckets.windows(2).all(|w| w[0] <= w[1]), "{buckets:?}");
    }

    /// Invariant: key, value and pair views are live views over the same entries.
    #[test]
    fn views_cover_all_entries() {
        let mut d: Dictionary<&str, i32> = Dictionary::new();
        d.add("x", 1)
            .unwrap()
            .add("y", 2)
            .unwrap()
            .add("z", 3)
            .unwrap();

        let keys: BTreeSet<&str> = d.keys().copied().into_iter().collect();
        assert_eq!(keys, BTreeSet::from(["x", "y", "z"]));
        assert_eq!(d.values().copied().sum_by(|v| f64::from(v)), 6.0);
        assert_eq!(d.query().count(), 3);
        assert_eq!((&d).query().count(), 3);
        assert_eq!(d.to_vec().len(), 3);

        let mut positions = Vec::new();
        d.inspect_each(|_, i| positions.push(i))
            .for_each(|_, _| {});
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn views_enumerate_repeatedly() {
        let mut d: Dictionary<i32, i32> = Dictionary::new();
        d.add(1, 1).unwrap().add(2, 4).unwrap();
        let keys = d.keys();
        assert_eq!(keys.count(), 2);
        assert_eq!(keys.count(), 2);
    }

    #[test]
    fn into_iter_yields_owned_pairs() {
        let mut d: Dictionary<String, Vec<u8>> = Dictionary::new();
        d.add("a".into(), vec![1]).unwrap();
        d.add("b".into(), vec![2, 3]).unwrap();
        let mut pairs: Vec<(String, Vec<u8>)> = d.into_iter().collect();
        pairs.sort();
        assert_eq!(pairs, vec![("a".into(), vec![1]), ("b".into(), vec![2, 3])]);
    }

    #[test]
    fn debug_formats_as_map() {
        let mut d: Dictionary<i32, &str> = Dictionary::new();
        d.add(1, "one").unwrap();
        assert_eq!(format!("{d:?}"), r#"{1: "one"}"#);
    }

    /// Invariant (debug-only): re-entering the dictionary from key equality
    /// during a probe panics.
    #[cfg(debug_assertions)]
    #[test]
    fn reentrancy_from_eq_panics() {
        use std::cell::Cell;

        struct Reentrant {
            id: u8,
            map: Cell<*const Dictionary<Reentrant, i32>>,
        }
        impl KeyHash for Reentrant {
            fn hash_code(&self) -> u32 {
                0
            }
        }
        impl PartialEq for Reentrant {
            fn eq(&self, other: &Self) -> bool {
                let map = other.map.get();
                if !map.is_null() {
                    // Re-enter the dictionary while it is probing.
                    unsafe {
                        let _ = (*map).count();
                        let probe = Reentrant {
                            id: 99,
                            map: Cell::new(core::ptr::null()),
                        };
                        let _ = (*map).contains_key(&probe);
                    }
                }
                self.id == other.id
            }
        }
        impl Eq for Reentrant {}

        let mut d: Dictionary<Reentrant, i32> = Dictionary::new();
        d.add(
            Reentrant {
                id: 1,
                map: Cell::new(core::ptr::null()),
            },
            1,
        )
        .unwrap();
        let query = Reentrant {
            id: 2,
            map: Cell::new(&d as *const _),
        };
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = d.contains_key(&query);
        }));
        assert!(
            res.is_err(),
            "expected re-entrant probe to panic in debug builds"
        );
    }

    #[test]
    fn slices_and_dictionaries_share_the_query_surface() {
        let mut d: Dictionary<i32, i32> = Dictionary::new();
        for (k, v) in [(1, 10), (2, 20)] {
            d.add(k, v).unwrap();
        }
        let total: i32 = [1, 2]
            .query()
            .select(|k| *d.get_value(k).unwrap_or(&0))
            .into_iter()
            .sum();
        assert_eq!(total, 30);
    }
}
