use super::{FieldReader, read_key};
use crate::container::Sequence;
use crate::error::{OrmError, OrmResult};
use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

/// Grouping that keeps first-appearance order without requiring sorted input.
///
/// A key to position index remembers where each key's entity landed in the
/// sequence. The index belongs to the reader and outlives a single pass, so
/// reusing the reader against a different sequence requires [`reset`] (or
/// [`clear_index`]) first; otherwise a stale position is reported as
/// [`OrmError::Misconfigured`].
///
/// [`reset`]: IndexedGroupReader::reset
/// [`clear_index`]: IndexedGroupReader::clear_index
pub struct IndexedGroupReader<KR, F, K, T> {
    key_reader: KR,
    reader: F,
    index: HashMap<K, usize>,
    _marker: PhantomData<fn() -> T>,
}

impl<KR, F, K, T> IndexedGroupReader<KR, F, K, T> {
    pub fn new(key_reader: KR, reader: F) -> Self {
        Self {
            key_reader,
            reader,
            index: HashMap::new(),
            _marker: PhantomData,
        }
    }

    pub fn clear_index(&mut self) {
        self.index.clear();
    }

    /// Drop the key index so the reader can fill a new sequence.
    ///
    /// Nested readers keep their state; [`FieldReader::reset`] resets them too.
    pub fn reset(&mut self) {
        self.clear_index();
    }

    /// Number of distinct keys seen since the last reset.
    pub fn indexed_keys(&self) -> usize {
        self.index.len()
    }
}

impl<R, C, KR, F, K, T> FieldReader<R, C> for IndexedGroupReader<KR, F, K, T>
where
    R: ?Sized,
    C: ?Sized + Sequence<T>,
    KR: FieldReader<R, K>,
    F: FieldReader<R, T>,
    K: Default + Eq + Hash,
    T: Default,
{
    fn read(&mut self, row: &R, dest: &mut C) -> OrmResult<()> {
        let key: K = read_key(&mut self.key_reader, row)?;

        let position = match self.index.get(&key) {
            Some(&position) => position,
            None => {
                let position = dest.len();
                dest.append(T::default());
                self.index.insert(key, position);
                position
            }
        };

        let len = dest.len();
        let entity = dest.get_mut_at(position).ok_or_else(|| {
            OrmError::misconfigured(format!(
                "group index points at position {position} but the sequence has {len} entries; \
                 reset the reader before reusing it"
            ))
        })?;
        self.reader.read(row, entity)
    }

    fn reset(&mut self) {
        IndexedGroupReader::reset(self);
        self.key_reader.reset();
        self.reader.reset();
    }
}
