use super::{FieldReader, read_key};
use crate::container::Sequence;
use crate::error::{OrmError, OrmResult};
use crate::row::ModelPk;
use std::marker::PhantomData;

/// Grouping for input already ordered by key.
///
/// Compares the row's key with the key of the last entity in the sequence
/// and starts a new entity only when it changes. No lookup structure is kept.
///
/// The ordering is not checked: if rows for one key are not contiguous, the
/// key gets one entity per run (`[1, 2, 1]` yields three entities). The field
/// reader is expected to write the key into the entity, since a freshly
/// appended entity holds `K::default()` until it does.
pub struct SortedGroupReader<KR, F, K, T> {
    key_reader: KR,
    reader: F,
    _marker: PhantomData<fn() -> (K, T)>,
}

impl<KR, F, K, T> SortedGroupReader<KR, F, K, T> {
    pub fn new(key_reader: KR, reader: F) -> Self {
        Self {
            key_reader,
            reader,
            _marker: PhantomData,
        }
    }
}

impl<R, C, KR, F, K, T> FieldReader<R, C> for SortedGroupReader<KR, F, K, T>
where
    R: ?Sized,
    C: ?Sized + Sequence<T>,
    KR: FieldReader<R, K>,
    F: FieldReader<R, T>,
    K: Default + PartialEq,
    T: Default + ModelPk<Id = K>,
{
    fn read(&mut self, row: &R, dest: &mut C) -> OrmResult<()> {
        let key: K = read_key(&mut self.key_reader, row)?;

        let starts_group = dest.last_mut().is_none_or(|last| *last.pk() != key);
        if starts_group {
            dest.append(T::default());
        }

        let current = dest
            .last_mut()
            .ok_or_else(|| OrmError::misconfigured("sequence dropped the entity just appended"))?;
        self.reader.read(row, current)
    }

    fn reset(&mut self) {
        self.key_reader.reset();
        self.reader.reset();
    }
}
