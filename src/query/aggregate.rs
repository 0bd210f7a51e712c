//! Terminal operators that fold, measure or pick elements.

use super::Query;
use crate::cursor::{Cursor, Enumerable};
use crate::error::{Error, Result};

/// Elements that `sum`, `min` and `max` can read as a number.
pub trait Numeric {
    fn to_f64(&self) -> f64;
}

macro_rules! numeric {
    ($($t:ty),* $(,)?) => {
        $(
            impl Numeric for $t {
                #[inline]
                fn to_f64(&self) -> f64 {
                    *self as f64
                }
            }
        )*
    };
}

numeric!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl<T: Numeric + ?Sized> Numeric for &T {
    #[inline]
    fn to_f64(&self) -> f64 {
        (**self).to_f64()
    }
}

/// Fold `selector(item)` with `pick`, starting at `sentinel`. `None` when
/// the sequence is empty, or when the fold never left an infinite sentinel
/// because no element equals it.
fn extreme<S, F>(seq: &S, selector: &F, sentinel: f64, pick: fn(f64, f64) -> f64) -> Option<f64>
where
    S: Enumerable,
    F: Fn(S::Item) -> f64,
{
    let mut cursor = seq.cursor();
    let mut result = sentinel;
    let mut any = false;
    while cursor.advance() {
        if let Some(item) = cursor.current() {
            result = pick(result, selector(item));
            any = true;
        }
    }
    if !any {
        return None;
    }
    if result.is_infinite() {
        let mut recheck = seq.cursor();
        let mut matched = false;
        while recheck.advance() {
            if recheck
                .current()
                .is_some_and(|item| selector(item) == result)
            {
                matched = true;
                break;
            }
        }
        if !matched {
            return None;
        }
    }
    Some(result)
}

fn smaller(acc: f64, value: f64) -> f64 {
    if acc < value {
        acc
    } else {
        value
    }
}

fn larger(acc: f64, value: f64) -> f64 {
    if acc > value {
        acc
    } else {
        value
    }
}

impl<S: Enumerable> Query<S> {
    /// Fold with the first element as the seed. Fails with `EmptySequence`
    /// on empty input.
    pub fn aggregate<F>(&self, accumulator: F) -> Result<S::Item>
    where
        F: Fn(S::Item, S::Item) -> S::Item,
    {
        let mut cursor = self.cursor();
        let mut acc = None;
        while cursor.advance() {
            if let Some(item) = cursor.current() {
                acc = Some(match acc {
                    None => item,
                    Some(acc) => accumulator(acc, item),
                });
            }
        }
        acc.ok_or(Error::EmptySequence)
    }

    /// Fold from `seed`; empty input returns `seed`.
    pub fn aggregate_seeded<A, F>(&self, seed: A, accumulator: F) -> A
    where
        F: Fn(A, S::Item) -> A,
    {
        self.iter().fold(seed, accumulator)
    }

    /// Sum of the elements; `0.0` when empty.
    pub fn sum(&self) -> f64
    where
        S::Item: Numeric,
    {
        self.sum_by(|item| item.to_f64())
    }

    pub fn sum_by<F>(&self, selector: F) -> f64
    where
        F: Fn(S::Item) -> f64,
    {
        self.aggregate_seeded(0.0, |acc, item| acc + selector(item))
    }

    /// Smallest element, or `None` when empty.
    pub fn min(&self) -> Option<f64>
    where
        S::Item: Numeric,
    {
        self.min_by(|item| item.to_f64())
    }

    pub fn min_by<F>(&self, selector: F) -> Option<f64>
    where
        F: Fn(S::Item) -> f64,
    {
        extreme(self, &selector, f64::INFINITY, smaller)
    }

    /// Largest element, or `None` when empty.
    pub fn max(&self) -> Option<f64>
    where
        S::Item: Numeric,
    {
        self.max_by(|item| item.to_f64())
    }

    pub fn max_by<F>(&self, selector: F) -> Option<f64>
    where
        F: Fn(S::Item) -> f64,
    {
        extreme(self, &selector, f64::NEG_INFINITY, larger)
    }

    /// Whether the sequence has at least one element. Reads at most one.
    pub fn has_any(&self) -> bool {
        self.cursor().advance()
    }

    pub fn has_any_by<P>(&self, predicate: P) -> bool
    where
        P: Fn(&S::Item) -> bool,
    {
        self.iter().any(|item| predicate(&item))
    }

    pub fn has_none(&self) -> bool {
        !self.has_any()
    }

    pub fn has_none_by<P>(&self, predicate: P) -> bool
    where
        P: Fn(&S::Item) -> bool,
    {
        !self.has_any_by(predicate)
    }

    /// First element; fails with `EmptySequence` when there is none.
    pub fn first(&self) -> Result<S::Item> {
        self.first_or_default().ok_or(Error::EmptySequence)
    }

    pub fn first_by<P>(&self, predicate: P) -> Result<S::Item>
    where
        P: Fn(&S::Item) -> bool,
    {
        self.first_or_default_by(predicate)
            .ok_or(Error::EmptySequence)
    }

    pub fn first_or_default(&self) -> Option<S::Item> {
        self.iter().next()
    }

    pub fn first_or_default_by<P>(&self, predicate: P) -> Option<S::Item>
    where
        P: Fn(&S::Item) -> bool,
    {
        self.iter().find(|item| predicate(item))
    }

    /// Last element; fails with `EmptySequence` when there is none.
    pub fn last(&self) -> Result<S::Item> {
        self.last_or_default().ok_or(Error::EmptySequence)
    }

    pub fn last_by<P>(&self, predicate: P) -> Result<S::Item>
    where
        P: Fn(&S::Item) -> bool,
    {
        self.last_or_default_by(predicate)
            .ok_or(Error::EmptySequence)
    }

    pub fn last_or_default(&self) -> Option<S::Item> {
        self.iter().last()
    }

    pub fn last_or_default_by<P>(&self, predicate: P) -> Option<S::Item>
    where
        P: Fn(&S::Item) -> bool,
    {
        self.iter().filter(|item| predicate(item)).last()
    }

    /// The only element. Fails with `EmptySequence` or `MultipleMatches`.
    pub fn single(&self) -> Result<S::Item> {
        self.single_by(|_| true)
    }

    pub fn single_by<P>(&self, predicate: P) -> Result<S::Item>
    where
        P: Fn(&S::Item) -> bool,
    {
        self.single_or_default_by(predicate)?
            .ok_or(Error::EmptySequence)
    }

    /// The only element, `None` when empty. Fails with `MultipleMatches`.
    pub fn single_or_default(&self) -> Result<Option<S::Item>> {
        self.single_or_default_by(|_| true)
    }

    pub fn single_or_default_by<P>(&self, predicate: P) -> Result<Option<S::Item>>
    where
        P: Fn(&S::Item) -> bool,
    {
        let mut matches = self.iter().filter(|item| predicate(item));
        let found = matches.next();
        if found.is_some() && matches.next().is_some() {
            return Err(Error::MultipleMatches);
        }
        Ok(found)
    }

    /// Element at zero-based `index`; fails with `IndexOutOfRange` past the
    /// end.
    pub fn at(&self, index: usize) -> Result<S::Item> {
        let mut cursor = self.cursor();
        let mut len = 0;
        while cursor.advance() {
            if len == index {
                return cursor
                    .current()
                    .ok_or(Error::IndexOutOfRange { index, len });
            }
            len += 1;
        }
        Err(Error::IndexOutOfRange { index, len })
    }
}
