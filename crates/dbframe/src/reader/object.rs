use super::{Boxed, FieldReader};
use crate::container::Sequence;
use crate::error::OrmResult;
use std::marker::PhantomData;

/// Reads one entity per row and appends it to a [`Sequence`].
///
/// The entity is built off to the side and only appended once every field
/// has been read, so a failing row appends nothing and the error is returned.
pub struct ObjectReader<F, T> {
    reader: F,
    _marker: PhantomData<fn() -> T>,
}

impl<F, T> ObjectReader<F, T> {
    pub fn new(reader: F) -> Self {
        Self {
            reader,
            _marker: PhantomData,
        }
    }

    pub fn reader(&self) -> &F {
        &self.reader
    }
}

impl<F, T> ObjectReader<Boxed<F>, Box<T>> {
    /// Reader that appends heap-allocated entities (`Vec<Box<T>>` and the like).
    pub fn boxed(reader: F) -> Self {
        Self::new(Boxed(reader))
    }
}

impl<R, C, F, T> FieldReader<R, C> for ObjectReader<F, T>
where
    R: ?Sized,
    C: ?Sized + Sequence<T>,
    F: FieldReader<R, T>,
    T: Default,
{
    fn read(&mut self, row: &R, dest: &mut C) -> OrmResult<()> {
        let mut object = T::default();
        self.reader.read(row, &mut object)?;
        dest.append(object);
        Ok(())
    }

    fn reset(&mut self) {
        self.reader.reset();
    }
}
