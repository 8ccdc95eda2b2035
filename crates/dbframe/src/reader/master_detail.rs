use super::{FieldReader, read_key};
use crate::container::Associative;
use crate::error::{OrmError, OrmResult};
use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

/// Consolidates joined one-to-many rows into parents with nested details.
///
/// Rows are keyed by the parent key. The first row for a key creates the
/// parent, reads its fields once and builds a detail reader for it through
/// the factory; every later row for that key skips the parent fields and
/// only feeds the stored detail reader. Detail readers are usually a
/// [`Project`](super::Project) onto a child collection, which may itself be
/// read by another `MasterDetailReader` for deeper nesting.
///
/// The row result is the parent read result. Row-level detail failures are
/// absorbed: they are logged at `debug` on `dbframe.reader` and counted in
/// [`detail_failures`](Self::detail_failures). Any other detail error, such
/// as [`OrmError::Misconfigured`], is returned as the row result. A factory
/// returning `None` means the parent gets no detail for this pass.
///
/// A parent whose field read failed stays in the container, partially
/// filled; later rows for its key are treated as hits.
pub struct MasterDetailReader<KR, F, Mk, D, K, P> {
    key_reader: KR,
    reader: F,
    make_detail: Mk,
    details: HashMap<K, D>,
    detail_failures: u64,
    _marker: PhantomData<fn(&mut P)>,
}

impl<KR, F, Mk, D, K, P> MasterDetailReader<KR, F, Mk, D, K, P>
where
    Mk: FnMut(&P) -> Option<D>,
{
    pub fn new(key_reader: KR, reader: F, make_detail: Mk) -> Self {
        Self {
            key_reader,
            reader,
            make_detail,
            details: HashMap::new(),
            detail_failures: 0,
            _marker: PhantomData,
        }
    }
}

impl<KR, F, Mk, D, K, P> MasterDetailReader<KR, F, Mk, D, K, P> {
    /// Detail reads that failed since the last reset.
    pub fn detail_failures(&self) -> u64 {
        self.detail_failures
    }

    /// Parents currently holding a detail reader.
    pub fn detail_readers(&self) -> usize {
        self.details.len()
    }

    /// Forget every per-key detail reader and the failure count.
    ///
    /// The key and parent field readers are left as they are; resetting
    /// through [`FieldReader::reset`] clears those too.
    pub fn reset(&mut self) {
        self.details.clear();
        self.detail_failures = 0;
    }

    fn absorb(&mut self, outcome: OrmResult<()>) -> OrmResult<()> {
        let err = match outcome {
            Ok(()) => return Ok(()),
            Err(err) if !err.is_row_level() => return Err(err),
            Err(err) => err,
        };
        self.detail_failures += 1;
        tracing::debug!(
            target: "dbframe.reader",
            error = %err,
            failures = self.detail_failures,
            "detail read failed; parent row kept"
        );
        Ok(())
    }
}

impl<R, C, KR, F, Mk, D, K, P> FieldReader<R, C> for MasterDetailReader<KR, F, Mk, D, K, P>
where
    R: ?Sized,
    C: ?Sized + Associative<K, P>,
    KR: FieldReader<R, K>,
    F: FieldReader<R, P>,
    Mk: FnMut(&P) -> Option<D>,
    D: FieldReader<R, P>,
    K: Default + Eq + Hash + Clone,
    P: Default,
{
    fn read(&mut self, row: &R, dest: &mut C) -> OrmResult<()> {
        let key: K = read_key(&mut self.key_reader, row)?;

        if let Some(parent) = dest.lookup_mut(&key) {
            let outcome = match self.details.get_mut(&key) {
                Some(detail) => detail.read(row, parent),
                None => Ok(()),
            };
            return self.absorb(outcome);
        }

        let parent = dest.get_or_insert_default(key.clone());
        let result = self.reader.read(row, parent);
        tracing::trace!(target: "dbframe.reader", ok = result.is_ok(), "new master entry");

        match (self.make_detail)(parent) {
            Some(mut detail) => {
                let outcome = detail.read(row, parent);
                self.details.insert(key, detail);
                self.absorb(outcome)?;
            }
            None => {
                self.details.remove(&key);
            }
        }

        result
    }

    fn reset(&mut self) {
        MasterDetailReader::reset(self);
        self.key_reader.reset();
        self.reader.reset();
    }
}
