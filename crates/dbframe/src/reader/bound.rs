//! Top-level readers: what the executor drives once per row.

use super::FieldReader;
use super::field::combine;
use crate::error::OrmResult;

/// A reader that already knows its destination.
///
/// The executor calls [`begin_pass`](Self::begin_pass) once before the first
/// row (when configured to), then [`read`](Self::read) once per row.
pub trait DatasetReader<R: ?Sized> {
    fn read(&mut self, row: &R) -> OrmResult<()>;

    fn begin_pass(&mut self) {}
}

impl<R, F> DatasetReader<R> for F
where
    R: ?Sized,
    F: FnMut(&R) -> OrmResult<()>,
{
    fn read(&mut self, row: &R) -> OrmResult<()> {
        self(row)
    }
}

/// A reader tree bound to the caller's destination container for one session.
pub struct Bound<'a, F, C: ?Sized> {
    reader: F,
    dest: &'a mut C,
}

impl<'a, F, C: ?Sized> Bound<'a, F, C> {
    pub fn new(reader: F, dest: &'a mut C) -> Self {
        Self { reader, dest }
    }

    pub fn reader(&self) -> &F {
        &self.reader
    }

    pub fn reader_mut(&mut self) -> &mut F {
        &mut self.reader
    }

    pub fn into_parts(self) -> (F, &'a mut C) {
        (self.reader, self.dest)
    }
}

impl<R, F, C> DatasetReader<R> for Bound<'_, F, C>
where
    R: ?Sized,
    C: ?Sized,
    F: FieldReader<R, C>,
{
    fn read(&mut self, row: &R) -> OrmResult<()> {
        self.reader.read(row, self.dest)
    }

    fn begin_pass(&mut self) {
        self.reader.reset();
    }
}

/// Two independent reader chains fed the same row.
///
/// Both always run; see [`Pair`](super::Pair) for the combining rule.
pub struct ReaderPair<A, B, Op = fn(bool, bool) -> bool> {
    first: A,
    second: B,
    op: Op,
}

impl<A, B> ReaderPair<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
            op: |a, b| a && b,
        }
    }
}

impl<A, B, Op> ReaderPair<A, B, Op>
where
    Op: Fn(bool, bool) -> bool,
{
    pub fn with_op(first: A, second: B, op: Op) -> Self {
        Self { first, second, op }
    }

    pub fn into_parts(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<R, A, B, Op> DatasetReader<R> for ReaderPair<A, B, Op>
where
    R: ?Sized,
    A: DatasetReader<R>,
    B: DatasetReader<R>,
    Op: Fn(bool, bool) -> bool,
{
    fn read(&mut self, row: &R) -> OrmResult<()> {
        let first = self.first.read(row);
        let second = self.second.read(row);
        combine(first, second, &self.op)
    }

    fn begin_pass(&mut self) {
        self.first.begin_pass();
        self.second.begin_pass();
    }
}
