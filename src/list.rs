//! Indexable collection with checked access.

use crate::cursor::{Enumerable, Slice, SliceCursor};
use crate::error::{Error, Result};
use crate::query::Query;

/// Growable list whose out-of-bounds accesses return
/// [`Error::IndexOutOfRange`] instead of panicking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List<T> {
    items: Vec<T>,
}

impl<T> List<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn add(&mut self, item: T) -> &mut Self {
        self.items.push(item);
        self
    }

    /// Append every element of `items` in traversal order.
    pub fn add_range<E>(&mut self, items: E) -> &mut Self
    where
        E: Enumerable<Item = T>,
    {
        crate::cursor::for_each(&items, |item, _| self.items.push(item));
        self
    }

    /// Remove every element equal to `item`.
    pub fn remove(&mut self, item: &T) -> &mut Self
    where
        T: PartialEq,
    {
        self.items.retain(|candidate| candidate != item);
        self
    }

    pub fn remove_at(&mut self, index: usize) -> Result<&mut Self> {
        self.check(index)?;
        self.items.remove(index);
        Ok(self)
    }

    pub fn clear(&mut self) -> &mut Self {
        self.items.clear();
        self
    }

    pub fn get(&self, index: usize) -> Result<&T> {
        self.items.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    /// Replace the element at `index`.
    pub fn set(&mut self, index: usize, item: T) -> Result<&mut Self> {
        self.check(index)?;
        self.items[index] = item;
        Ok(self)
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn query(&self) -> Query<Slice<'_, T>> {
        Query::new(Slice::new(&self.items))
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    fn check(&self, index: usize) -> Result<()> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for List<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> Enumerable for &'a List<T> {
    type Item = &'a T;
    type Cursor = SliceCursor<'a, T>;

    fn cursor(&self) -> Self::Cursor {
        Slice::new(self.items.as_slice()).cursor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::range;

    #[test]
    fn add_and_index() {
        let mut list = List::new();
        list.add("a").add("b");
        assert_eq!(list.count(), 2);
        assert_eq!(list.get(1), Ok(&"b"));
        assert_eq!(
            list.get(2),
            Err(Error::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn add_range_appends_in_order() {
        let mut list: List<i64> = List::from(vec![-1]);
        list.add_range(range(2)).add_range(range_of_two());
        assert_eq!(list.as_slice(), &[-1, 0, 1, 2, 7, 8]);
    }

    fn range_of_two() -> Query<crate::cursor::Range> {
        crate::cursor::range_between(7, 8)
    }

    /// Invariant: remove drops every equal element and nothing else.
    #[test]
    fn remove_drops_all_equal_items() {
        let mut list: List<i32> = [1, 2, 1, 3, 1].into_iter().collect();
        list.remove(&1);
        assert_eq!(list.as_slice(), &[2, 3]);
        list.remove(&42);
        assert_eq!(list.count(), 2);
    }

    #[test]
    fn positional_mutation_is_checked() {
        let mut list = List::from(vec!['x', 'y', 'z']);
        list.set(1, 'Y').unwrap().remove_at(0).unwrap();
        assert_eq!(list.as_slice(), &['Y', 'z']);
        assert_eq!(
            list.remove_at(2).unwrap_err(),
            Error::IndexOutOfRange { index: 2, len: 2 }
        );
        assert!(list.set(5, 'q').is_err());
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn lists_are_queryable() {
        let list = List::from(vec![4, 8, 15, 16, 23, 42]);
        assert_eq!(
            list.query().filter(|n| **n % 2 == 1).copied().to_vec(),
            vec![15, 23]
        );
        let mut seen = 0;
        crate::cursor::for_each(&&list, |_, _| seen += 1);
        assert_eq!(seen, 6);
    }
}
