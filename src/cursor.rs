//! The cursor protocol every sequence implements, plus the root sources
//! (slices, materialized buffers, ranges, generators) queries start from.
//!
//! A [`Cursor`] has two operations: `advance` moves to the next element and
//! reports whether there is one, `current` reads the element the cursor is
//! positioned on. An [`Enumerable`] hands out a fresh cursor per call, so a
//! sequence can be traversed any number of times, independently.
//!
//! Cursors never borrow the sequence value that created them; they borrow
//! (or share) the underlying data instead. That keeps operator nodes
//! movable and lets nested sequences be dropped once their cursor exists.

use crate::error::{Error, Result};
use crate::query::Query;
use core::marker::PhantomData;
use std::rc::Rc;

/// Forward-only traversal state over a sequence.
///
/// Not safe for use by more than one consumer at a time; `advance` takes
/// `&mut self` so the borrow checker enforces that.
pub trait Cursor {
    type Item;

    /// Move to the next element. Returns `false` once the sequence is
    /// exhausted; every later call also returns `false`.
    fn advance(&mut self) -> bool;

    /// The element the last successful `advance` positioned on, or `None`
    /// before the first `advance` and after exhaustion.
    fn current(&self) -> Option<Self::Item>;
}

/// A sequence that can be traversed from the start any number of times.
pub trait Enumerable {
    type Item;
    type Cursor: Cursor<Item = Self::Item>;

    /// Start a new traversal. Performs no iteration by itself.
    fn cursor(&self) -> Self::Cursor;
}

/// Drive a fresh cursor over `seq` to completion, passing each element and
/// its zero-based position to `op`.
pub fn for_each<E, F>(seq: &E, mut op: F)
where
    E: Enumerable + ?Sized,
    F: FnMut(E::Item, usize),
{
    let mut cursor = seq.cursor();
    let mut index = 0;
    while cursor.advance() {
        if let Some(item) = cursor.current() {
            op(item, index);
        }
        index += 1;
    }
}

/// Adapts a [`Cursor`] to [`Iterator`].
#[derive(Debug, Clone)]
pub struct CursorIter<C> {
    cursor: C,
}

impl<C: Cursor> CursorIter<C> {
    pub fn new(cursor: C) -> Self {
        Self { cursor }
    }
}

impl<C: Cursor> Iterator for CursorIter<C> {
    type Item = C::Item;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.advance() {
            self.cursor.current()
        } else {
            None
        }
    }
}

/// Borrowed slice source; yields `&'a T`.
#[derive(Debug)]
pub struct Slice<'a, T> {
    items: &'a [T],
}

impl<'a, T> Slice<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self { items }
    }
}

impl<T> Clone for Slice<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Slice<'_, T> {}

impl<'a, T> Enumerable for Slice<'a, T> {
    type Item = &'a T;
    type Cursor = SliceCursor<'a, T>;

    fn cursor(&self) -> Self::Cursor {
        SliceCursor {
            items: self.items,
            next: 0,
        }
    }
}

impl<'a, T> Enumerable for &'a [T] {
    type Item = &'a T;
    type Cursor = SliceCursor<'a, T>;

    fn cursor(&self) -> Self::Cursor {
        Slice::new(*self).cursor()
    }
}

impl<'a, T> Enumerable for &'a Vec<T> {
    type Item = &'a T;
    type Cursor = SliceCursor<'a, T>;

    fn cursor(&self) -> Self::Cursor {
        Slice::new((*self).as_slice()).cursor()
    }
}

impl<'a, T, const N: usize> Enumerable for &'a [T; N] {
    type Item = &'a T;
    type Cursor = SliceCursor<'a, T>;

    fn cursor(&self) -> Self::Cursor {
        Slice::new((*self).as_slice()).cursor()
    }
}

#[derive(Debug)]
pub struct SliceCursor<'a, T> {
    items: &'a [T],
    // One past the current position; 0 means not started.
    next: usize,
}

impl<T> Clone for SliceCursor<'_, T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items,
            next: self.next,
        }
    }
}

impl<'a, T> Cursor for SliceCursor<'a, T> {
    type Item = &'a T;

    #[inline]
    fn advance(&mut self) -> bool {
        if self.next < self.items.len() {
            self.next += 1;
            true
        } else {
            self.next = self.items.len() + 1;
            false
        }
    }

    #[inline]
    fn current(&self) -> Option<&'a T> {
        self.next.checked_sub(1).and_then(|i| self.items.get(i))
    }
}

/// Owned buffer produced by materializing operators (`order_by`, `reverse`,
/// `distinct`, `execute`). Shared between cursors; yields clones of `T`.
#[derive(Debug)]
pub struct Materialized<T> {
    items: Rc<[T]>,
}

impl<T> Materialized<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: items.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> Clone for Materialized<T> {
    fn clone(&self) -> Self {
        Self {
            items: Rc::clone(&self.items),
        }
    }
}

impl<T: Clone> Enumerable for Materialized<T> {
    type Item = T;
    type Cursor = MaterializedCursor<T>;

    fn cursor(&self) -> Self::Cursor {
        MaterializedCursor {
            items: Rc::clone(&self.items),
            next: 0,
        }
    }
}

#[derive(Debug)]
pub struct MaterializedCursor<T> {
    items: Rc<[T]>,
    next: usize,
}

impl<T: Clone> Cursor for MaterializedCursor<T> {
    type Item = T;

    #[inline]
    fn advance(&mut self) -> bool {
        if self.next < self.items.len() {
            self.next += 1;
            true
        } else {
            self.next = self.items.len() + 1;
            false
        }
    }

    #[inline]
    fn current(&self) -> Option<T> {
        self.next
            .checked_sub(1)
            .and_then(|i| self.items.get(i))
            .cloned()
    }
}

/// Inclusive arithmetic progression from `start` towards `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    start: i64,
    increment: i64,
    end: i64,
}

impl Enumerable for Range {
    type Item = i64;
    type Cursor = RangeCursor;

    fn cursor(&self) -> Self::Cursor {
        RangeCursor {
            range: *self,
            current: None,
            done: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RangeCursor {
    range: Range,
    current: Option<i64>,
    done: bool,
}

impl RangeCursor {
    fn within(&self, value: i64) -> bool {
        if self.range.increment > 0 {
            value <= self.range.end
        } else {
            value >= self.range.end
        }
    }
}

impl Cursor for RangeCursor {
    type Item = i64;

    fn advance(&mut self) -> bool {
        if self.done {
            return false;
        }
        let next = match self.current {
            None => Some(self.range.start),
            Some(value) => value.checked_add(self.range.increment),
        };
        match next {
            Some(value) if self.within(value) => {
                self.current = Some(value);
                true
            }
            _ => {
                self.current = None;
                self.done = true;
                false
            }
        }
    }

    fn current(&self) -> Option<i64> {
        self.current
    }
}

/// `0, 1, …, end` (or `0, -1, …, end` for negative `end`).
pub fn range(end: i64) -> Query<Range> {
    range_between(0, end)
}

/// `start` to `end` inclusive, stepping by `1` or `-1` towards `end`.
pub fn range_between(start: i64, end: i64) -> Query<Range> {
    let increment = if end < start { -1 } else { 1 };
    Query::new(Range {
        start,
        increment,
        end,
    })
}

/// `start` to `end` inclusive in steps of `increment`.
///
/// Fails if `increment` is zero or points away from `end`.
pub fn range_step(start: i64, increment: i64, end: i64) -> Result<Query<Range>> {
    if increment == 0 {
        return Err(Error::InvalidRange("the increment cannot be zero"));
    }
    if increment > 0 && start > end {
        return Err(Error::InvalidRange(
            "a positive increment requires start <= end",
        ));
    }
    if increment < 0 && start < end {
        return Err(Error::InvalidRange(
            "a negative increment requires start >= end",
        ));
    }
    Ok(Query::new(Range {
        start,
        increment,
        end,
    }))
}

/// A sequence with no elements.
#[derive(Debug)]
pub struct Empty<T> {
    _item: PhantomData<fn() -> T>,
}

impl<T> Clone for Empty<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Empty<T> {}

impl<T> Enumerable for Empty<T> {
    type Item = T;
    type Cursor = Empty<T>;

    fn cursor(&self) -> Self::Cursor {
        *self
    }
}

impl<T> Cursor for Empty<T> {
    type Item = T;

    fn advance(&mut self) -> bool {
        false
    }

    fn current(&self) -> Option<T> {
        None
    }
}

pub fn empty<T>() -> Query<Empty<T>> {
    Query::new(Empty { _item: PhantomData })
}

/// Unbounded sequence whose `n`th element is `generator(n)`.
///
/// Elements are produced when read, not when the cursor advances. Bound the
/// sequence with `take` before any terminal operator.
pub struct Generate<F> {
    generator: Rc<F>,
}

impl<F> Clone for Generate<F> {
    fn clone(&self) -> Self {
        Self {
            generator: Rc::clone(&self.generator),
        }
    }
}

impl<T, F: Fn(usize) -> T> Enumerable for Generate<F> {
    type Item = T;
    type Cursor = GenerateCursor<F>;

    fn cursor(&self) -> Self::Cursor {
        GenerateCursor {
            generator: Rc::clone(&self.generator),
            next: 0,
        }
    }
}

pub struct GenerateCursor<F> {
    generator: Rc<F>,
    next: usize,
}

impl<T, F: Fn(usize) -> T> Cursor for GenerateCursor<F> {
    type Item = T;

    fn advance(&mut self) -> bool {
        self.next = self.next.saturating_add(1);
        true
    }

    fn current(&self) -> Option<T> {
        self.next.checked_sub(1).map(|n| (self.generator)(n))
    }
}

pub fn generate<T, F: Fn(usize) -> T>(generator: F) -> Query<Generate<F>> {
    Query::new(Generate {
        generator: Rc::new(generator),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn slice_cursor_protocol() {
        let data = [10, 20];
        let mut c = Slice::new(&data).cursor();
        assert_eq!(c.current(), None, "not positioned before advance");
        assert!(c.advance());
        assert_eq!(c.current(), Some(&10));
        assert!(c.advance());
        assert_eq!(c.current(), Some(&20));
        assert!(!c.advance());
        assert_eq!(c.current(), None, "not positioned after exhaustion");
        assert!(!c.advance());
    }

    /// Invariant: each cursor is an independent traversal from the start.
    #[test]
    fn cursors_are_independent() {
        let data = vec![1, 2, 3];
        let seq = &data;
        let mut a = seq.cursor();
        assert!(a.advance());
        assert!(a.advance());
        let mut b = seq.cursor();
        assert!(b.advance());
        assert_eq!(a.current(), Some(&2));
        assert_eq!(b.current(), Some(&1));
    }

    #[test]
    fn for_each_passes_positions() {
        let data = ["a", "b", "c"];
        let mut seen = Vec::new();
        for_each(&&data, |item, index| seen.push((index, *item)));
        assert_eq!(seen, vec![(0, "a"), (1, "b"), (2, "c")]);

        let none: &[i32] = &[];
        let mut calls = 0;
        for_each(&none, |_, _| calls += 1);
        assert_eq!(calls, 0);
    }

    #[test]
    fn materialized_buffers_share_storage() {
        let m = Materialized::new(vec![String::from("x"), String::from("y")]);
        let copy = m.clone();
        assert_eq!(m.len(), 2);
        assert!(core::ptr::eq(m.as_slice(), copy.as_slice()));
        let collected: Vec<String> = CursorIter::new(copy.cursor()).collect();
        assert_eq!(collected, vec!["x", "y"]);
    }

    #[rstest]
    #[case::up_to_end(range(5), vec![0, 1, 2, 3, 4, 5])]
    #[case::down_to_end(range(-2), vec![0, -1, -2])]
    #[case::between(range_between(3, 7), vec![3, 4, 5, 6, 7])]
    #[case::between_descending(range_between(5, 1), vec![5, 4, 3, 2, 1])]
    #[case::single(range_between(4, 4), vec![4])]
    fn range_forms(#[case] q: Query<Range>, #[case] expected: Vec<i64>) {
        assert_eq!(q.to_vec(), expected);
    }

    #[test]
    fn range_step_forms_and_errors() {
        assert_eq!(range_step(5, -1, 1).unwrap().to_vec(), vec![5, 4, 3, 2, 1]);
        assert_eq!(range_step(0, 3, 10).unwrap().to_vec(), vec![0, 3, 6, 9]);
        assert_eq!(
            range_step(4, 0, 8).unwrap_err(),
            Error::InvalidRange("the increment cannot be zero")
        );
        assert!(range_step(8, 1, 4).is_err());
        assert!(range_step(4, -1, 8).is_err());
    }

    #[test]
    fn range_stops_at_integer_limits() {
        assert_eq!(
            range_step(i64::MAX - 1, 5, i64::MAX).unwrap().to_vec(),
            vec![i64::MAX - 1]
        );
    }

    #[test]
    fn empty_yields_nothing() {
        assert_eq!(empty::<u8>().count(), 0);
        assert!(empty::<u8>().first_or_default().is_none());
    }

    #[test]
    fn generate_is_unbounded_until_taken() {
        let squares = generate(|n| n * n);
        assert_eq!(squares.take(4).to_vec(), vec![0, 1, 4, 9]);
    }
}
