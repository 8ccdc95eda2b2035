//! Readers: turn rows of a forward-only cursor into object graphs.
//!
//! Every reader implements [`FieldReader<R, T>`]: "read the current row `R`
//! into `T`". Leaf readers fill an entity's fields; container readers treat
//! the whole destination container as their `T`, so the same trait composes
//! all the way up:
//!
//! ```ignore
//! use dbframe::reader::*;
//!
//! // customers ⟶ accounts (one-to-many), rows joined and flattened
//! let mut customers: HashMap<i64, Customer> = HashMap::new();
//! let mut reader = MasterDetailReader::new(
//!     column::<i64>("customer_id"),
//!     fields::<Customer>(),
//!     |_: &Customer| Some(Project::new(
//!         |c: &mut Customer| &mut c.accounts,
//!         ObjectReader::new(fields::<Account>()),
//!     )),
//! );
//! Executor::default().read_all(&mut dataset, &mut reader, &mut customers)?;
//! ```
//!
//! Readers never own the destination: it is passed in on every call, so a
//! reader tree can be reused across passes once its state is [`reset`].
//!
//! [`reset`]: FieldReader::reset

mod associative;
mod bound;
mod field;
mod indexed;
mod master_detail;
mod object;
mod sorted;


pub use associative::AssociativeReader;
pub use bound::{Bound, DatasetReader, ReaderPair};
pub use field::{Boxed, Column, Fields, Pair, Project, column, fields};
pub use indexed::IndexedGroupReader;
pub use master_detail::MasterDetailReader;
pub use object::ObjectReader;
pub use sorted::SortedGroupReader;

use crate::error::OrmResult;

/// Reads the current row into a target.
///
/// `R` is the row type exposed by the dataset, `T` the target: an entity
/// for leaf readers, a container for container readers, a key for key readers.
/// A failed read may leave earlier fields of the target already written.
pub trait FieldReader<R: ?Sized, T: ?Sized> {
    fn read(&mut self, row: &R, target: &mut T) -> OrmResult<()>;

    /// Drop state retained from previous rows (indexes, per-key readers).
    fn reset(&mut self) {}
}

impl<R, T, F> FieldReader<R, T> for F
where
    R: ?Sized,
    T: ?Sized,
    F: FnMut(&R, &mut T) -> OrmResult<()>,
{
    fn read(&mut self, row: &R, target: &mut T) -> OrmResult<()> {
        self(row, target)
    }
}

/// Read a key with `key_reader` into a fresh default value.
pub(crate) fn read_key<R, K, KR>(key_reader: &mut KR, row: &R) -> OrmResult<K>
where
    R: ?Sized,
    K: Default,
    KR: FieldReader<R, K>,
{
    let mut key = K::default();
    key_reader
        .read(row, &mut key)
        .map_err(crate::error::OrmError::key_read)?;
    Ok(key)
}
