//! Ordering: sort keys, the default comparers and the `order_by` family.

use super::Query;
use crate::cursor::{Enumerable, Materialized};
use crate::error::{Error, Result};
use crate::hash::date_millis;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use core::cmp::Ordering;
use std::borrow::Cow;
use std::rc::Rc;
use std::sync::Arc;

/// Kinds the default comparer knows how to order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Number,
    Text,
    Boolean,
    Date,
}

impl KeyKind {
    pub fn name(self) -> &'static str {
        match self {
            KeyKind::Number => "number",
            KeyKind::Text => "string",
            KeyKind::Boolean => "boolean",
            KeyKind::Date => "date",
        }
    }
}

const COMPARABLE_KINDS: &str = "number, string, boolean or date";

/// The value the default comparer orders by.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey<'a> {
    /// Absent key; sorts before every specified key.
    Unspecified,
    Number(f64),
    /// Integers compare exactly; mixed with `Number` they compare by value.
    Integer(i128),
    Unsigned(u128),
    Text(Cow<'a, str>),
    Boolean(bool),
    /// Milliseconds since the Unix epoch.
    Date(i64),
    /// A type with no default ordering, named for error reports.
    Unsupported(&'static str),
}

impl SortKey<'_> {
    /// `None` for unspecified and unsupported keys.
    pub fn kind(&self) -> Option<KeyKind> {
        match self {
            SortKey::Number(_) | SortKey::Integer(_) | SortKey::Unsigned(_) => {
                Some(KeyKind::Number)
            }
            SortKey::Text(_) => Some(KeyKind::Text),
            SortKey::Boolean(_) => Some(KeyKind::Boolean),
            SortKey::Date(_) => Some(KeyKind::Date),
            SortKey::Unspecified | SortKey::Unsupported(_) => None,
        }
    }
}

/// Values usable as `order_by` keys with the default comparer.
///
/// Types without a natural key can opt in with an empty impl; they report
/// [`SortKey::Unsupported`] and `order_by` rejects them, while `distinct`
/// falls back to dictionary order.
pub trait Orderable {
    fn sort_key(&self) -> SortKey<'_> {
        SortKey::Unsupported(core::any::type_name::<Self>())
    }
}

macro_rules! numeric_orderable {
    ($variant:ident as $wide:ty: $($t:ty),*) => {
        $(
            impl Orderable for $t {
                #[inline]
                fn sort_key(&self) -> SortKey<'_> {
                    SortKey::$variant(*self as $wide)
                }
            }
        )*
    };
}

numeric_orderable!(Integer as i128: i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);
numeric_orderable!(Unsigned as u128: u128);
numeric_orderable!(Number as f64: f32, f64);

impl Orderable for bool {
    fn sort_key(&self) -> SortKey<'_> {
        SortKey::Boolean(*self)
    }
}

impl Orderable for char {
    fn sort_key(&self) -> SortKey<'_> {
        SortKey::Text(Cow::Owned(self.to_string()))
    }
}

impl Orderable for str {
    fn sort_key(&self) -> SortKey<'_> {
        SortKey::Text(Cow::Borrowed(self))
    }
}

impl Orderable for String {
    fn sort_key(&self) -> SortKey<'_> {
        SortKey::Text(Cow::Borrowed(self.as_str()))
    }
}

impl<Tz: TimeZone> Orderable for DateTime<Tz> {
    fn sort_key(&self) -> SortKey<'_> {
        SortKey::Date(self.timestamp_millis())
    }
}

impl Orderable for NaiveDateTime {
    fn sort_key(&self) -> SortKey<'_> {
        SortKey::Date(self.and_utc().timestamp_millis())
    }
}

impl Orderable for NaiveDate {
    fn sort_key(&self) -> SortKey<'_> {
        SortKey::Date(date_millis(self))
    }
}

impl<T: Orderable> Orderable for Option<T> {
    fn sort_key(&self) -> SortKey<'_> {
        self.as_ref().map_or(SortKey::Unspecified, Orderable::sort_key)
    }
}

macro_rules! forwarding_orderable {
    ($($wrapper:ident),*) => {
        $(
            impl<T: Orderable + ?Sized> Orderable for $wrapper<T> {
                #[inline]
                fn sort_key(&self) -> SortKey<'_> {
                    (**self).sort_key()
                }
            }
        )*
    };
}

forwarding_orderable!(Box, Rc, Arc);

impl<T: Orderable + ?Sized> Orderable for &T {
    #[inline]
    fn sort_key(&self) -> SortKey<'_> {
        (**self).sort_key()
    }
}

fn unspecified_first<T>(
    a: Option<T>,
    b: Option<T>,
    compare: impl FnOnce(T, T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => compare(a, b),
    }
}

/// Numeric order; `None` first. `-0.0 == 0.0`; NaN sorts after every
/// number.
pub fn compare_numbers(a: Option<f64>, b: Option<f64>) -> Ordering {
    unspecified_first(a, b, |a, b| {
        a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
    })
}

/// 2^127 and 2^128, the first floats past `i128::MAX` and `u128::MAX`.
const I128_END: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
const U128_END: f64 = 340_282_366_920_938_463_463_374_607_431_768_211_456.0;

/// Exact order of an integer against a float. NaN placement follows
/// `total_cmp`: positive NaN after every integer, negative NaN before.
fn compare_integer_number(a: i128, b: f64) -> Ordering {
    if b.is_nan() {
        return if b.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    match (a as f64).partial_cmp(&b) {
        // Equal after rounding means `b` is integral and at most 2^127.
        Some(Ordering::Equal) if b < I128_END => a.cmp(&(b as i128)),
        Some(Ordering::Equal) => Ordering::Less,
        Some(ord) => ord,
        None => Ordering::Less,
    }
}

fn compare_unsigned_number(a: u128, b: f64) -> Ordering {
    if let Ok(a) = i128::try_from(a) {
        return compare_integer_number(a, b);
    }
    if b.is_nan() {
        return if b.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    match (a as f64).partial_cmp(&b) {
        Some(Ordering::Equal) if b < U128_END => a.cmp(&(b as u128)),
        Some(Ordering::Equal) => Ordering::Less,
        Some(ord) => ord,
        None => Ordering::Less,
    }
}

fn compare_integer_unsigned(a: i128, b: u128) -> Ordering {
    u128::try_from(a).map_or(Ordering::Less, |a| a.cmp(&b))
}

/// Case-insensitive order, ties broken with lowercase first; `None` first.
pub fn compare_strings(a: Option<&str>, b: Option<&str>) -> Ordering {
    unspecified_first(a, b, |a, b| {
        let folded_a = a.chars().flat_map(char::to_lowercase);
        let folded_b = b.chars().flat_map(char::to_lowercase);
        folded_a.cmp(folded_b).then_with(|| b.cmp(a))
    })
}

/// `false` before `true`; `None` first.
pub fn compare_booleans(a: Option<bool>, b: Option<bool>) -> Ordering {
    unspecified_first(a, b, |a, b| a.cmp(&b))
}

/// Chronological order of epoch milliseconds; `None` first.
pub fn compare_dates(a: Option<i64>, b: Option<i64>) -> Ordering {
    unspecified_first(a, b, |a, b| a.cmp(&b))
}

/// Order two keys already known to share a kind.
fn compare_keys(a: &SortKey<'_>, b: &SortKey<'_>) -> Ordering {
    use SortKey::*;
    match (a, b) {
        (Unspecified, Unspecified) => Ordering::Equal,
        (Unspecified, _) => Ordering::Less,
        (_, Unspecified) => Ordering::Greater,
        (Number(a), Number(b)) => compare_numbers(Some(*a), Some(*b)),
        (Integer(a), Integer(b)) => a.cmp(b),
        (Unsigned(a), Unsigned(b)) => a.cmp(b),
        (Integer(a), Unsigned(b)) => compare_integer_unsigned(*a, *b),
        (Unsigned(a), Integer(b)) => compare_integer_unsigned(*b, *a).reverse(),
        (Integer(a), Number(b)) => compare_integer_number(*a, *b),
        (Number(a), Integer(b)) => compare_integer_number(*b, *a).reverse(),
        (Unsigned(a), Number(b)) => compare_unsigned_number(*a, *b),
        (Number(a), Unsigned(b)) => compare_unsigned_number(*b, *a).reverse(),
        (Text(a), Text(b)) => compare_strings(Some(&**a), Some(&**b)),
        (Boolean(a), Boolean(b)) => compare_booleans(Some(*a), Some(*b)),
        (Date(a), Date(b)) => compare_dates(Some(*a), Some(*b)),
        _ => Ordering::Equal,
    }
}

/// The kind every specified key shares, or `IncomparableType`.
fn infer_kind(keys: &[SortKey<'_>]) -> Result<Option<KeyKind>> {
    let mut inferred: Option<KeyKind> = None;
    for key in keys {
        let found = match key {
            SortKey::Unspecified => continue,
            SortKey::Unsupported(type_name) => {
                return Err(Error::IncomparableType {
                    expected: inferred.map_or(COMPARABLE_KINDS, KeyKind::name),
                    found: *type_name,
                })
            }
            _ => match key.kind() {
                Some(kind) => kind,
                None => continue,
            },
        };
        match inferred {
            None => inferred = Some(found),
            Some(expected) if expected != found => {
                return Err(Error::IncomparableType {
                    expected: expected.name(),
                    found: found.name(),
                })
            }
            Some(_) => {}
        }
    }
    Ok(inferred)
}

/// Kind shared by every element, if the default comparer can order them.
pub(crate) fn shared_kind<T: Orderable>(items: &[T]) -> Option<KeyKind> {
    let keys: Vec<SortKey<'_>> = items.iter().map(Orderable::sort_key).collect();
    infer_kind(&keys).ok().flatten()
}

/// Positions of `items` in ascending key order. With `descending`, the
/// specified keys are reversed and unspecified keys trail.
fn default_order<T, K, F>(items: &[T], selector: F, descending: bool) -> Result<Vec<usize>>
where
    K: Orderable,
    F: Fn(&T) -> K,
{
    let selected: Vec<K> = items.iter().map(selector).collect();
    let keys: Vec<SortKey<'_>> = selected.iter().map(Orderable::sort_key).collect();
    infer_kind(&keys)?;

    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| compare_keys(&keys[a], &keys[b]));
    if !descending {
        return Ok(order);
    }
    let (specified, unspecified): (Vec<usize>, Vec<usize>) = order
        .into_iter()
        .partition(|&i| !matches!(keys[i], SortKey::Unspecified));
    Ok(specified.into_iter().rev().chain(unspecified).collect())
}

fn order_with<T, K, F, C>(items: &[T], selector: F, comparer: C) -> Vec<usize>
where
    F: Fn(&T) -> K,
    C: Fn(&K, &K) -> Ordering,
{
    let selected: Vec<K> = items.iter().map(selector).collect();
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| comparer(&selected[a], &selected[b]));
    order
}

fn permute<T>(items: Vec<T>, order: &[usize]) -> Vec<T> {
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    order.iter().filter_map(|&i| slots[i].take()).collect()
}

impl<S: Enumerable> Query<S>
where
    S::Item: Clone,
{
    fn sorted<O>(&self, operation: &'static str, order: O) -> Result<Query<Materialized<S::Item>>>
    where
        O: FnOnce(&[S::Item]) -> Result<Vec<usize>>,
    {
        let items = self.to_vec();
        let order = order(&items)?;
        #[cfg(feature = "tracing")]
        tracing::trace!(
            elements = items.len(),
            operation,
            "sorted materialized sequence"
        );
        #[cfg(not(feature = "tracing"))]
        let _ = operation;
        Ok(Query::from_vec(permute(items, &order)))
    }

    /// Stable ascending sort by the default comparer for the selected key.
    ///
    /// Every specified key must share one kind (number, string, boolean or
    /// date); otherwise fails with `IncomparableType`. Unspecified keys sort
    /// first. The selector runs once per element.
    pub fn order_by<K, F>(&self, selector: F) -> Result<Query<Materialized<S::Item>>>
    where
        K: Orderable,
        F: Fn(&S::Item) -> K,
    {
        self.sorted("order_by", |items| default_order(items, selector, false))
    }

    /// Descending counterpart of [`order_by`](Self::order_by). Elements with
    /// specified keys come out in reverse ascending order, followed by the
    /// unspecified ones.
    pub fn order_by_descending<K, F>(&self, selector: F) -> Result<Query<Materialized<S::Item>>>
    where
        K: Orderable,
        F: Fn(&S::Item) -> K,
    {
        self.sorted("order_by_descending", |items| default_order(items, selector, true))
    }

    /// Stable ascending sort with a caller-supplied comparer.
    pub fn order_by_with<K, F, C>(&self, selector: F, comparer: C) -> Query<Materialized<S::Item>>
    where
        F: Fn(&S::Item) -> K,
        C: Fn(&K, &K) -> Ordering,
    {
        let items = self.to_vec();
        let order = order_with(&items, selector, comparer);
        Query::from_vec(permute(items, &order))
    }

    /// Stable descending sort with a caller-supplied comparer.
    pub fn order_by_descending_with<K, F, C>(
        &self,
        selector: F,
        comparer: C,
    ) -> Query<Materialized<S::Item>>
    where
        F: Fn(&S::Item) -> K,
        C: Fn(&K, &K) -> Ordering,
    {
        self.order_by_with(selector, move |a: &K, b: &K| comparer(b, a))
    }
}
