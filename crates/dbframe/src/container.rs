//! Destination containers.
//!
//! Readers never own their destination. They only insert into it through
//! one of these two traits, so any caller-owned collection with matching
//! semantics can be a destination.

use std::collections::{BTreeMap, HashMap, LinkedList, VecDeque};
use std::hash::Hash;

/// Ordered, append-only container; duplicates allowed.
pub trait Sequence<T> {
    fn append(&mut self, item: T);

    fn last_mut(&mut self) -> Option<&mut T>;

    /// Element at `index` in iteration order.
    fn get_mut_at(&mut self, index: usize) -> Option<&mut T>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Key to entity container with get-or-insert semantics.
pub trait Associative<K, V> {
    fn lookup_mut(&mut self, key: &K) -> Option<&mut V>;

    /// Existing entity for `key`, or a default one inserted in a single lookup.
    fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default;

    fn contains(&self, key: &K) -> bool;
}

impl<T> Sequence<T> for Vec<T> {
    fn append(&mut self, item: T) {
        self.push(item);
    }

    fn last_mut(&mut self) -> Option<&mut T> {
        <[T]>::last_mut(self)
    }

    fn get_mut_at(&mut self, index: usize) -> Option<&mut T> {
        self.get_mut(index)
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl<T> Sequence<T> for VecDeque<T> {
    fn append(&mut self, item: T) {
        self.push_back(item);
    }

    fn last_mut(&mut self) -> Option<&mut T> {
        self.back_mut()
    }

    fn get_mut_at(&mut self, index: usize) -> Option<&mut T> {
        self.get_mut(index)
    }

    fn len(&self) -> usize {
        VecDeque::len(self)
    }
}

impl<T> Sequence<T> for LinkedList<T> {
    fn append(&mut self, item: T) {
        self.push_back(item);
    }

    fn last_mut(&mut self) -> Option<&mut T> {
        self.back_mut()
    }

    // O(n); prefer Vec or VecDeque for indexed readers.
    fn get_mut_at(&mut self, index: usize) -> Option<&mut T> {
        self.iter_mut().nth(index)
    }

    fn len(&self) -> usize {
        LinkedList::len(self)
    }
}

impl<K: Eq + Hash, V> Associative<K, V> for HashMap<K, V> {
    fn lookup_mut(&mut self, key: &K) -> Option<&mut V> {
        self.get_mut(key)
    }

    fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entry(key).or_default()
    }

    fn contains(&self, key: &K) -> bool {
        self.contains_key(key)
    }
}

impl<K: Ord, V> Associative<K, V> for BTreeMap<K, V> {
    fn lookup_mut(&mut self, key: &K) -> Option<&mut V> {
        self.get_mut(key)
    }

    fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entry(key).or_default()
    }

    fn contains(&self, key: &K) -> bool {
        self.contains_key(key)
    }
}
