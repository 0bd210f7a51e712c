//! Query pipeline.
//!
//! [`Query`] wraps any [`Enumerable`] and offers the operator set on top of
//! it. Operators that can run lazily (`filter`, `select`, `select_many`,
//! `skip`, `take`, `concat`) consume the query and return a new one whose
//! cursor wraps the parent's cursor; nothing is read until a terminal
//! operator or a `for` loop drives it. Operators that cannot be lazy over a
//! forward-only source (`reverse`, `order_by*`, `distinct`, `execute`) drain
//! the parent into a shared [`Materialized`] buffer.
//!
//! ```
//! use keyed_query::IntoQuery;
//!
//! let data = [5, 3, 8, 1, 9, 2];
//! let picked = data
//!     .query()
//!     .filter(|n| **n > 2)
//!     .select(|n| n * 10)
//!     .take(3)
//!     .to_vec();
//! assert_eq!(picked, vec![50, 30, 80]);
//! ```

mod aggregate;
mod operators;
mod order;

pub use aggregate::Numeric;
pub use operators::{
    Concat, ConcatCursor, Filter, FilterCursor, Select, SelectCursor, SelectMany,
    SelectManyCursor, Skip, SkipCursor, Take, TakeCursor,
};
pub use order::{
    compare_booleans, compare_dates, compare_numbers, compare_strings, KeyKind, Orderable,
    SortKey,
};

use crate::cursor::{self, Cursor, CursorIter, Enumerable, Materialized, Slice};
use crate::dictionary::{Dictionary, Entries};
use crate::error::Result;
use crate::hash::KeyHash;
use crate::list::List;
use core::fmt;

/// A composable, re-enumerable sequence.
///
/// Cloning a query clones its operator chain, not the data: closures are
/// shared and sources are borrowed or reference-counted.
#[derive(Debug, Clone, Copy)]
pub struct Query<S> {
    source: S,
}

impl<S> Query<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<T> Query<Materialized<T>> {
    /// Query over an owned buffer.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self::new(Materialized::new(items))
    }
}

impl<T> From<Vec<T>> for Query<Materialized<T>> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

impl<S: Enumerable> Enumerable for Query<S> {
    type Item = S::Item;
    type Cursor = S::Cursor;

    #[inline]
    fn cursor(&self) -> Self::Cursor {
        self.source.cursor()
    }
}

impl<S: Enumerable> IntoIterator for Query<S> {
    type Item = S::Item;
    type IntoIter = CursorIter<S::Cursor>;

    fn into_iter(self) -> Self::IntoIter {
        CursorIter::new(self.source.cursor())
    }
}

impl<S: Enumerable> IntoIterator for &Query<S> {
    type Item = S::Item;
    type IntoIter = CursorIter<S::Cursor>;

    fn into_iter(self) -> Self::IntoIter {
        CursorIter::new(self.source.cursor())
    }
}

/// Comma-joined elements.
impl<S> fmt::Display for Query<S>
where
    S: Enumerable,
    S::Item: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, item) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

/// `.query()` for collections and sequences.
pub trait IntoQuery {
    type Source: Enumerable;

    fn query(self) -> Query<Self::Source>;
}

impl<'a, T> IntoQuery for &'a [T] {
    type Source = Slice<'a, T>;

    fn query(self) -> Query<Slice<'a, T>> {
        Query::new(Slice::new(self))
    }
}

impl<'a, T> IntoQuery for &'a Vec<T> {
    type Source = Slice<'a, T>;

    fn query(self) -> Query<Slice<'a, T>> {
        Query::new(Slice::new(self.as_slice()))
    }
}

impl<'a, T, const N: usize> IntoQuery for &'a [T; N] {
    type Source = Slice<'a, T>;

    fn query(self) -> Query<Slice<'a, T>> {
        Query::new(Slice::new(self.as_slice()))
    }
}

impl<'a, K, V> IntoQuery for &'a Dictionary<K, V> {
    type Source = Entries<'a, K, V>;

    fn query(self) -> Query<Entries<'a, K, V>> {
        Dictionary::query(self)
    }
}

impl<'a, T> IntoQuery for &'a List<T> {
    type Source = Slice<'a, T>;

    fn query(self) -> Query<Slice<'a, T>> {
        Query::new(Slice::new(self.as_slice()))
    }
}

impl<S: Enumerable> IntoQuery for Query<S> {
    type Source = S;

    fn query(self) -> Query<S> {
        self
    }
}

#[inline]
fn copy_item<T: Copy>(item: &T) -> T {
    *item
}

impl<'a, T: 'a, S> Query<S>
where
    S: Enumerable<Item = &'a T>,
{
    /// Clone every borrowed element.
    pub fn cloned(self) -> Query<Select<S, fn(&'a T) -> T>>
    where
        T: Clone,
    {
        Query::new(Select::new(self.source, <T as Clone>::clone as fn(&'a T) -> T))
    }

    /// Copy every borrowed element.
    pub fn copied(self) -> Query<Select<S, fn(&'a T) -> T>>
    where
        T: Copy,
    {
        Query::new(Select::new(self.source, copy_item::<T> as fn(&'a T) -> T))
    }
}

impl<S: Enumerable> Query<S> {
    /// Rust iterator over a fresh traversal.
    pub fn iter(&self) -> CursorIter<S::Cursor> {
        CursorIter::new(self.source.cursor())
    }

    /// Drain a fresh traversal into a `Vec`.
    pub fn to_vec(&self) -> Vec<S::Item> {
        self.iter().collect()
    }

    /// Same as [`to_vec`](Self::to_vec).
    pub fn result(&self) -> Vec<S::Item> {
        self.to_vec()
    }

    /// Number of elements; walks the whole sequence.
    pub fn count(&self) -> usize {
        let mut cursor = self.source.cursor();
        let mut count = 0;
        while cursor.advance() {
            count += 1;
        }
        count
    }

    pub fn for_each<F>(&self, op: F)
    where
        F: FnMut(S::Item, usize),
    {
        cursor::for_each(&self.source, op);
    }

    /// Run `op` over every element now and return the query unchanged.
    pub fn inspect_each<F>(&self, op: F) -> &Self
    where
        F: FnMut(S::Item, usize),
    {
        self.for_each(op);
        self
    }

    /// Elements accepted by `predicate`.
    pub fn filter<P>(self, predicate: P) -> Query<Filter<S, P>>
    where
        P: Fn(&S::Item) -> bool,
    {
        Query::new(Filter::new(self.source, predicate))
    }

    /// Elements passed through `selector` as they are read.
    pub fn select<U, F>(self, selector: F) -> Query<Select<S, F>>
    where
        F: Fn(S::Item) -> U,
    {
        Query::new(Select::new(self.source, selector))
    }

    /// Concatenation of the sequences `selector` produces per element.
    pub fn select_many<I, F>(self, selector: F) -> Query<SelectMany<S, F>>
    where
        I: Enumerable,
        F: Fn(S::Item) -> I,
    {
        Query::new(SelectMany::new(self.source, selector))
    }

    pub fn skip(self, count: usize) -> Query<Skip<S>> {
        Query::new(Skip::new(self.source, count))
    }

    pub fn take(self, count: usize) -> Query<Take<S>> {
        Query::new(Take::new(self.source, count))
    }

    /// This sequence followed by `other`.
    pub fn concat<B>(self, other: B) -> Query<Concat<S, B>>
    where
        B: Enumerable<Item = S::Item>,
    {
        Query::new(Concat::new(self.source, other))
    }

    /// Materialize and reverse.
    pub fn reverse(&self) -> Query<Materialized<S::Item>>
    where
        S::Item: Clone,
    {
        let mut items = self.to_vec();
        items.reverse();
        #[cfg(feature = "tracing")]
        tracing::trace!(elements = items.len(), "reverse materialized sequence");
        Query::from_vec(items)
    }

    /// Freeze the current result so later changes to the sources are not
    /// observed.
    pub fn execute(&self) -> Query<Materialized<S::Item>>
    where
        S::Item: Clone,
    {
        let items = self.to_vec();
        #[cfg(feature = "tracing")]
        tracing::trace!(elements = items.len(), "execute materialized sequence");
        Query::from_vec(items)
    }

    /// Distinct elements by `KeyHash` + `Eq`.
    ///
    /// Numbers, strings, booleans and dates come back in ascending order.
    /// Other element types come back in dictionary order, which is
    /// unspecified. Fails with `InvalidKey` if an element is unspecified.
    pub fn distinct(&self) -> Result<Query<Materialized<S::Item>>>
    where
        S::Item: KeyHash + Eq + Orderable + Clone,
    {
        let mut seen: Dictionary<S::Item, ()> = Dictionary::new();
        let mut cursor = self.source.cursor();
        while cursor.advance() {
            if let Some(item) = cursor.current() {
                seen.add(item, ())?;
            }
        }
        let keys: Vec<S::Item> = seen.into_iter().map(|(key, ())| key).collect();

        match order::shared_kind(&keys) {
            Some(_) => Query::from_vec(keys).order_by(|item| item.clone()),
            None => {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    elements = keys.len(),
                    "distinct elements are not orderable; keeping dictionary order"
                );
                Ok(Query::from_vec(keys))
            }
        }
    }

    /// Materialize into a dictionary sized for the whole sequence. Later
    /// duplicate keys overwrite earlier ones.
    pub fn to_dictionary<K, V, FK, FV>(&self, key: FK, value: FV) -> Result<Dictionary<K, V>>
    where
        K: KeyHash + Eq,
        FK: Fn(&S::Item) -> K,
        FV: Fn(&S::Item) -> V,
    {
        let items = self.to_vec();
        let mut dictionary = Dictionary::with_capacity(items.len())?;
        for item in &items {
            dictionary.add(key(item), value(item))?;
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(
            elements = items.len(),
            entries = dictionary.count(),
            "to_dictionary materialized sequence"
        );
        Ok(dictionary)
    }
}
