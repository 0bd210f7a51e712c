//! Lazy operator nodes. Each node wraps its parent sequence and, when asked
//! for a cursor, wraps the parent's cursor; nothing touches parent data
//! until `advance` is called.

use crate::cursor::{Cursor, Enumerable};
use std::rc::Rc;

/// Elements of the parent accepted by a predicate.
///
/// The cursor keeps no copy of the accepted element: `advance` reads the
/// parent's current element to test it and `current` reads it again. Over
/// a `select` parent the selector therefore runs once for every rejected
/// element and twice for every accepted one that is read. Call `execute`
/// first when the selector is expensive.
pub struct Filter<S, P> {
    parent: S,
    predicate: Rc<P>,
}

impl<S, P> Filter<S, P> {
    pub(crate) fn new(parent: S, predicate: P) -> Self {
        Self {
            parent,
            predicate: Rc::new(predicate),
        }
    }
}

impl<S: Clone, P> Clone for Filter<S, P> {
    fn clone(&self) -> Self {
        Self {
            parent: self.parent.clone(),
            predicate: Rc::clone(&self.predicate),
        }
    }
}

impl<S, P> Enumerable for Filter<S, P>
where
    S: Enumerable,
    P: Fn(&S::Item) -> bool,
{
    type Item = S::Item;
    type Cursor = FilterCursor<S::Cursor, P>;

    fn cursor(&self) -> Self::Cursor {
        FilterCursor {
            parent: self.parent.cursor(),
            predicate: Rc::clone(&self.predicate),
        }
    }
}

pub struct FilterCursor<C, P> {
    parent: C,
    predicate: Rc<P>,
}

impl<C, P> Cursor for FilterCursor<C, P>
where
    C: Cursor,
    P: Fn(&C::Item) -> bool,
{
    type Item = C::Item;

    fn advance(&mut self) -> bool {
        while self.parent.advance() {
            if self
                .parent
                .current()
                .is_some_and(|item| (self.predicate)(&item))
            {
                return true;
            }
        }
        false
    }

    fn current(&self) -> Option<C::Item> {
        self.parent.current()
    }
}

/// Parent elements passed through a selector at read time.
pub struct Select<S, F> {
    parent: S,
    selector: Rc<F>,
}

impl<S, F> Select<S, F> {
    pub(crate) fn new(parent: S, selector: F) -> Self {
        Self {
            parent,
            selector: Rc::new(selector),
        }
    }
}

impl<S: Clone, F> Clone for Select<S, F> {
    fn clone(&self) -> Self {
        Self {
            parent: self.parent.clone(),
            selector: Rc::clone(&self.selector),
        }
    }
}

impl<S, F, U> Enumerable for Select<S, F>
where
    S: Enumerable,
    F: Fn(S::Item) -> U,
{
    type Item = U;
    type Cursor = SelectCursor<S::Cursor, F>;

    fn cursor(&self) -> Self::Cursor {
        SelectCursor {
            parent: self.parent.cursor(),
            selector: Rc::clone(&self.selector),
        }
    }
}

pub struct SelectCursor<C, F> {
    parent: C,
    selector: Rc<F>,
}

impl<C, F, U> Cursor for SelectCursor<C, F>
where
    C: Cursor,
    F: Fn(C::Item) -> U,
{
    type Item = U;

    #[inline]
    fn advance(&mut self) -> bool {
        self.parent.advance()
    }

    #[inline]
    fn current(&self) -> Option<U> {
        self.parent.current().map(|item| (self.selector)(item))
    }
}

/// The parent with its first `count` elements discarded.
#[derive(Clone)]
pub struct Skip<S> {
    parent: S,
    count: usize,
}

impl<S> Skip<S> {
    pub(crate) fn new(parent: S, count: usize) -> Self {
        Self { parent, count }
    }
}

impl<S: Enumerable> Enumerable for Skip<S> {
    type Item = S::Item;
    type Cursor = SkipCursor<S::Cursor>;

    fn cursor(&self) -> Self::Cursor {
        SkipCursor {
            parent: self.parent.cursor(),
            remaining: self.count,
        }
    }
}

pub struct SkipCursor<C> {
    parent: C,
    remaining: usize,
}

impl<C: Cursor> Cursor for SkipCursor<C> {
    type Item = C::Item;

    fn advance(&mut self) -> bool {
        while self.remaining > 0 {
            if !self.parent.advance() {
                return false;
            }
            self.remaining -= 1;
        }
        self.parent.advance()
    }

    fn current(&self) -> Option<C::Item> {
        if self.remaining > 0 {
            None
        } else {
            self.parent.current()
        }
    }
}

/// At most the first `count` elements of the parent.
#[derive(Clone)]
pub struct Take<S> {
    parent: S,
    count: usize,
}

impl<S> Take<S> {
    pub(crate) fn new(parent: S, count: usize) -> Self {
        Self { parent, count }
    }
}

impl<S: Enumerable> Enumerable for Take<S> {
    type Item = S::Item;
    type Cursor = TakeCursor<S::Cursor>;

    fn cursor(&self) -> Self::Cursor {
        TakeCursor {
            parent: self.parent.cursor(),
            remaining: self.count,
            positioned: false,
        }
    }
}

pub struct TakeCursor<C> {
    parent: C,
    remaining: usize,
    positioned: bool,
}

impl<C: Cursor> Cursor for TakeCursor<C> {
    type Item = C::Item;

    fn advance(&mut self) -> bool {
        // Once the quota is spent the parent is never advanced again.
        self.positioned = self.remaining > 0 && self.parent.advance();
        if self.positioned {
            self.remaining -= 1;
        }
        self.positioned
    }

    fn current(&self) -> Option<C::Item> {
        if self.positioned {
            self.parent.current()
        } else {
            None
        }
    }
}

/// All of `first`, then all of `second`.
#[derive(Clone)]
pub struct Concat<A, B> {
    first: A,
    second: B,
}

impl<A, B> Concat<A, B> {
    pub(crate) fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A, B> Enumerable for Concat<A, B>
where
    A: Enumerable,
    B: Enumerable<Item = A::Item>,
{
    type Item = A::Item;
    type Cursor = ConcatCursor<A::Cursor, B::Cursor>;

    fn cursor(&self) -> Self::Cursor {
        ConcatCursor {
            first: self.first.cursor(),
            second: self.second.cursor(),
            on_second: false,
        }
    }
}

pub struct ConcatCursor<A, B> {
    first: A,
    second: B,
    on_second: bool,
}

impl<A, B> Cursor for ConcatCursor<A, B>
where
    A: Cursor,
    B: Cursor<Item = A::Item>,
{
    type Item = A::Item;

    fn advance(&mut self) -> bool {
        if !self.on_second {
            if self.first.advance() {
                return true;
            }
            self.on_second = true;
        }
        self.second.advance()
    }

    fn current(&self) -> Option<A::Item> {
        if self.on_second {
            self.second.current()
        } else {
            self.first.current()
        }
    }
}

/// The concatenation of the sequences a selector produces for each parent
/// element. Each inner sequence is created when the traversal reaches its
/// parent element and dropped once its cursor exists.
pub struct SelectMany<S, F> {
    parent: S,
    selector: Rc<F>,
}

impl<S, F> SelectMany<S, F> {
    pub(crate) fn new(parent: S, selector: F) -> Self {
        Self {
            parent,
            selector: Rc::new(selector),
        }
    }
}

impl<S: Clone, F> Clone for SelectMany<S, F> {
    fn clone(&self) -> Self {
        Self {
            parent: self.parent.clone(),
            selector: Rc::clone(&self.selector),
        }
    }
}

impl<S, F, I> Enumerable for SelectMany<S, F>
where
    S: Enumerable,
    F: Fn(S::Item) -> I,
    I: Enumerable,
{
    type Item = I::Item;
    type Cursor = SelectManyCursor<S::Cursor, F, I>;

    fn cursor(&self) -> Self::Cursor {
        SelectManyCursor {
            outer: self.parent.cursor(),
            selector: Rc::clone(&self.selector),
            inner: None,
        }
    }
}

pub struct SelectManyCursor<C, F, I: Enumerable> {
    outer: C,
    selector: Rc<F>,
    inner: Option<I::Cursor>,
}

impl<C, F, I> Cursor for SelectManyCursor<C, F, I>
where
    C: Cursor,
    F: Fn(C::Item) -> I,
    I: Enumerable,
{
    type Item = I::Item;

    fn advance(&mut self) -> bool {
        loop {
            if let Some(inner) = self.inner.as_mut() {
                if inner.advance() {
                    return true;
                }
            }
            if !self.outer.advance() {
                self.inner = None;
                return false;
            }
            self.inner = self
                .outer
                .current()
                .map(|item| (self.selector)(item).cursor());
        }
    }

    fn current(&self) -> Option<I::Item> {
        self.inner.as_ref().and_then(Cursor::current)
    }
}
