use super::{Boxed, FieldReader, read_key};
use crate::container::Associative;
use crate::error::OrmResult;
use std::marker::PhantomData;

/// Keyed upsert: one entity per distinct key in an [`Associative`] container.
///
/// Per row the key is read first; a failed key read leaves the container
/// untouched. Otherwise the entity for the key is fetched or default-inserted
/// and the field reader runs against it, so repeated keys never duplicate
/// and the last row wins field by field.
pub struct AssociativeReader<KR, F, K, T> {
    key_reader: KR,
    reader: F,
    _marker: PhantomData<fn() -> (K, T)>,
}

impl<KR, F, K, T> AssociativeReader<KR, F, K, T> {
    pub fn new(key_reader: KR, reader: F) -> Self {
        Self {
            key_reader,
            reader,
            _marker: PhantomData,
        }
    }
}

impl<KR, F, K, T> AssociativeReader<KR, Boxed<F>, K, Box<T>> {
    /// Reader for maps of heap-allocated entities (`HashMap<K, Box<T>>`).
    pub fn boxed(key_reader: KR, reader: F) -> Self {
        Self::new(key_reader, Boxed(reader))
    }
}

impl<R, C, KR, F, K, T> FieldReader<R, C> for AssociativeReader<KR, F, K, T>
where
    R: ?Sized,
    C: ?Sized + Associative<K, T>,
    KR: FieldReader<R, K>,
    F: FieldReader<R, T>,
    K: Default,
    T: Default,
{
    fn read(&mut self, row: &R, dest: &mut C) -> OrmResult<()> {
        let key = read_key(&mut self.key_reader, row)?;
        let entity = dest.get_or_insert_default(key);
        self.reader.read(row, entity)
    }

    fn reset(&mut self) {
        self.key_reader.reset();
        self.reader.reset();
    }
}
