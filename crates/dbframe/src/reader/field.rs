//! Leaf readers and same-target combinators.

use super::FieldReader;
use crate::error::{OrmError, OrmResult};
use crate::row::{FieldAccess, ReadFields};
use std::borrow::Cow;
use std::marker::PhantomData;
use std::ops::DerefMut;

/// Reads one column into the target. The usual key reader.
#[derive(Debug, Clone)]
pub struct Column<T> {
    name: Cow<'static, str>,
    _marker: PhantomData<fn() -> T>,
}

/// Shorthand for [`Column::new`].
pub fn column<T>(name: impl Into<Cow<'static, str>>) -> Column<T> {
    Column::new(name)
}

impl<T> Column<T> {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<R, T> FieldReader<R, T> for Column<T>
where
    R: ?Sized + FieldAccess<T>,
{
    fn read(&mut self, row: &R, target: &mut T) -> OrmResult<()> {
        *target = row.field_value(&self.name)?;
        Ok(())
    }
}

/// Reads an entity through its [`ReadFields`] implementation.
#[derive(Debug)]
pub struct Fields<T> {
    _marker: PhantomData<fn(&mut T)>,
}

/// Shorthand for `Fields::<T>::default()`.
pub fn fields<T>() -> Fields<T> {
    Fields {
        _marker: PhantomData,
    }
}

impl<T> Default for Fields<T> {
    fn default() -> Self {
        fields()
    }
}

impl<T> Clone for Fields<T> {
    fn clone(&self) -> Self {
        fields()
    }
}

impl<R, T> FieldReader<R, T> for Fields<T>
where
    R: ?Sized,
    T: ReadFields<R>,
{
    fn read(&mut self, row: &R, target: &mut T) -> OrmResult<()> {
        target.read_fields(row)
    }
}

/// Adapts a reader of `T` to handles that dereference to `T` (`Box<T>` and the like).
#[derive(Debug, Clone, Default)]
pub struct Boxed<F>(pub F);

impl<R, P, F> FieldReader<R, P> for Boxed<F>
where
    R: ?Sized,
    P: DerefMut,
    F: FieldReader<R, P::Target>,
{
    fn read(&mut self, row: &R, target: &mut P) -> OrmResult<()> {
        self.0.read(row, &mut **target)
    }

    fn reset(&mut self) {
        self.0.reset();
    }
}

/// Runs a reader against one member of the target.
///
/// This is how nested collections and one-to-one sub-objects are wired:
/// the projection picks the member, the inner reader fills it.
pub struct Project<P, M, F> {
    project: fn(&mut P) -> &mut M,
    reader: F,
}

impl<P, M, F> Project<P, M, F> {
    pub fn new(project: fn(&mut P) -> &mut M, reader: F) -> Self {
        Self { project, reader }
    }

    pub fn reader(&self) -> &F {
        &self.reader
    }
}

impl<R, P, M, F> FieldReader<R, P> for Project<P, M, F>
where
    R: ?Sized,
    F: FieldReader<R, M>,
{
    fn read(&mut self, row: &R, target: &mut P) -> OrmResult<()> {
        self.reader.read(row, (self.project)(target))
    }

    fn reset(&mut self) {
        self.reader.reset();
    }
}

fn both(first: bool, second: bool) -> bool {
    first && second
}

/// Two readers over the same target, combined by a predicate.
///
/// Both readers always run, in order. The row succeeds iff
/// `op(first_ok, second_ok)`; the default predicate is logical AND.
pub struct Pair<A, B, Op = fn(bool, bool) -> bool> {
    first: A,
    second: B,
    op: Op,
}

impl<A, B> Pair<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
            op: both,
        }
    }
}

impl<A, B, Op> Pair<A, B, Op>
where
    Op: Fn(bool, bool) -> bool,
{
    pub fn with_op(first: A, second: B, op: Op) -> Self {
        Self { first, second, op }
    }

    pub fn first(&self) -> &A {
        &self.first
    }

    pub fn second(&self) -> &B {
        &self.second
    }
}

/// Fold two outcomes with `op`, keeping the first error when the row fails.
///
/// Errors that are not row-level win over the predicate.
pub(crate) fn combine(
    first: OrmResult<()>,
    second: OrmResult<()>,
    op: impl Fn(bool, bool) -> bool,
) -> OrmResult<()> {
    let hard = |outcome: &OrmResult<()>| matches!(outcome, Err(err) if !err.is_row_level());
    if hard(&first) {
        return first;
    }
    if hard(&second) {
        return second;
    }
    if op(first.is_ok(), second.is_ok()) {
        return Ok(());
    }
    first?;
    second?;
    Err(OrmError::validation("row rejected by pair predicate"))
}

impl<R, T, A, B, Op> FieldReader<R, T> for Pair<A, B, Op>
where
    R: ?Sized,
    T: ?Sized,
    A: FieldReader<R, T>,
    B: FieldReader<R, T>,
    Op: Fn(bool, bool) -> bool,
{
    fn read(&mut self, row: &R, target: &mut T) -> OrmResult<()> {
        let first = self.first.read(row, target);
        let second = self.second.read(row, target);
        combine(first, second, &self.op)
    }

    fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
    }
}
